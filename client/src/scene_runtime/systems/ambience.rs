use crate::ambience::{FIREFLY_DRIFT, PETAL_DRIFT, petal_rotation, scatter};
use crate::scene_runtime::components::{
    BirthdayCamera, Firefly, FireflyLightSlot, Floating, RosePetal,
};
use crate::settings::SettingsResource;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;
use std::cmp::Ordering;

pub const MAX_FIREFLY_LIGHTS: usize = 12;
const FIREFLY_LUMENS: f32 = 4_000.0;
const FIREFLY_LIGHT_RANGE: f32 = 5.0;
const FIREFLY_COLOR: Color = Color::srgb(1.0, 1.0, 0.4);

pub fn spawn_ambience(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Option<Res<SettingsResource>>,
) {
    let ambience = settings
        .map(|settings| settings.current.ambience.clone())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();

    let firefly_mesh = meshes.add(Sphere::new(0.1).mesh().uv(8, 8));
    let firefly_material = materials.add(StandardMaterial {
        base_color: FIREFLY_COLOR,
        emissive: LinearRgba::rgb(2.0, 2.0, 0.8),
        unlit: true,
        ..default()
    });
    let fireflies = scatter(
        &mut rng,
        ambience.firefly_count,
        ambience.spread,
        ambience.firefly_max_height,
        FIREFLY_DRIFT,
    );
    for floater in &fireflies {
        commands.spawn((
            Firefly,
            Floating(*floater),
            Mesh3d(firefly_mesh.clone()),
            MeshMaterial3d(firefly_material.clone()),
            Transform::from_translation(floater.anchor),
            NotShadowCaster,
        ));
    }

    for slot in 0..MAX_FIREFLY_LIGHTS {
        commands.spawn((
            FireflyLightSlot(slot),
            PointLight {
                color: FIREFLY_COLOR,
                intensity: 0.0,
                range: FIREFLY_LIGHT_RANGE,
                shadows_enabled: false,
                ..default()
            },
            Transform::IDENTITY,
            Visibility::Hidden,
        ));
    }

    let petal_mesh = meshes.add(Rectangle::new(0.2, 0.4));
    let petal_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.42, 0.42, 0.7),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let petals = scatter(
        &mut rng,
        ambience.petal_count,
        ambience.spread,
        ambience.petal_max_height,
        PETAL_DRIFT,
    );
    for floater in &petals {
        commands.spawn((
            RosePetal,
            Floating(*floater),
            Mesh3d(petal_mesh.clone()),
            MeshMaterial3d(petal_material.clone()),
            Transform::from_translation(floater.anchor).with_rotation(petal_rotation(&mut rng)),
            NotShadowCaster,
        ));
    }

    info!(
        "Ambience ready: {} fireflies, {} petals",
        fireflies.len(),
        petals.len()
    );
}

pub fn animate_floaters(time: Res<Time>, mut floaters: Query<(&Floating, &mut Transform)>) {
    let now = time.elapsed_secs();
    for (floating, mut transform) in &mut floaters {
        transform.translation = floating.0.position(now);
    }
}

/// Lend the light pool to the fireflies closest to the camera, twinkling.
pub fn update_firefly_lights(
    time: Res<Time>,
    cameras: Query<&Transform, With<BirthdayCamera>>,
    fireflies: Query<&Floating, With<Firefly>>,
    mut pool: Query<
        (
            &FireflyLightSlot,
            &mut PointLight,
            &mut Transform,
            &mut Visibility,
        ),
        Without<BirthdayCamera>,
    >,
) {
    let now = time.elapsed_secs();
    let viewer = cameras
        .single()
        .map(|transform| transform.translation)
        .unwrap_or(Vec3::ZERO);

    let lit = nearest_lights(
        fireflies
            .iter()
            .map(|floating| (floating.0.position(now), floating.0.twinkle(now))),
        viewer,
        MAX_FIREFLY_LIGHTS,
    );

    for (slot, mut point_light, mut transform, mut visibility) in &mut pool {
        if let Some(&(position, twinkle)) = lit.get(slot.0) {
            point_light.intensity = FIREFLY_LUMENS * twinkle;
            transform.translation = position;
            *visibility = Visibility::Inherited;
        } else {
            point_light.intensity = 0.0;
            *visibility = Visibility::Hidden;
        }
    }
}

/// The `budget` lights closest to `viewer`, nearest first.
fn nearest_lights(
    lights: impl Iterator<Item = (Vec3, f32)>,
    viewer: Vec3,
    budget: usize,
) -> Vec<(Vec3, f32)> {
    let mut candidates: Vec<(f32, Vec3, f32)> = lights
        .map(|(position, twinkle)| (position.distance_squared(viewer), position, twinkle))
        .collect();
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    candidates
        .into_iter()
        .take(budget)
        .map(|(_, position, twinkle)| (position, twinkle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_budget_goes_to_the_nearest_fireflies() {
        let lights = [
            (Vec3::new(30.0, 1.0, 0.0), 1.0),
            (Vec3::new(2.0, 1.0, 0.0), 1.2),
            (Vec3::new(-10.0, 1.0, 0.0), 0.7),
        ];
        let lit = nearest_lights(lights.into_iter(), Vec3::ZERO, 2);
        assert_eq!(
            lit,
            vec![(Vec3::new(2.0, 1.0, 0.0), 1.2), (Vec3::new(-10.0, 1.0, 0.0), 0.7)]
        );
    }
}
