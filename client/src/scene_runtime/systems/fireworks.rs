use crate::fireworks::particle::VISIBILITY_THRESHOLD;
use crate::fireworks::{ExplosionLight, SparkKind, SparkVisual};
use crate::scene_runtime::components::{ExplosionLightSlot, SparkSlot};
use crate::session::BirthdaySession;
use birthday_common::color_to_rgb;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const MAX_EXPLOSION_LIGHTS: usize = 8;
/// Lumens per unit of simulated flash intensity.
const LIGHT_LUMENS_PER_UNIT: f32 = 60_000.0;
const EXPLOSION_LIGHT_RANGE: f32 = 50.0;
/// Opacity is bucketed so the material cache stays small.
const OPACITY_STEPS: f32 = 32.0;

const SHELL_RADIUS: f32 = 0.25;
const BURST_RADIUS: f32 = 0.15;
const GHOST_RADIUS: f32 = 0.06;

#[derive(Resource)]
pub struct SparkRenderAssets {
    pub mesh: Handle<Mesh>,
}

#[derive(Default)]
pub(crate) struct SparkMaterialCache {
    materials: HashMap<[u8; 4], Handle<StandardMaterial>>,
}

impl SparkMaterialCache {
    fn get_or_create(
        &mut self,
        materials: &mut Assets<StandardMaterial>,
        color: u32,
        opacity: f32,
    ) -> Handle<StandardMaterial> {
        let key = spark_material_key(color, opacity);
        self.materials
            .entry(key)
            .or_insert_with(|| {
                let [r, g, b, a] = key.map(|channel| channel as f32 / 255.0);
                materials.add(StandardMaterial {
                    base_color: Color::srgba(r, g, b, a),
                    emissive: LinearRgba::rgb(r, g, b) * a,
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    ..default()
                })
            })
            .clone()
    }
}

pub fn setup_firework_rendering(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(SparkRenderAssets {
        mesh: meshes.add(Sphere::new(1.0).mesh().uv(8, 6)),
    });

    for slot in 0..MAX_EXPLOSION_LIGHTS {
        commands.spawn((
            ExplosionLightSlot(slot),
            PointLight {
                intensity: 0.0,
                range: EXPLOSION_LIGHT_RANGE,
                shadows_enabled: false,
                ..default()
            },
            Transform::IDENTITY,
            Visibility::Hidden,
        ));
    }
    info!("Explosion light pool ready: {} slots", MAX_EXPLOSION_LIGHTS);
}

/// Project the engine's sparks onto a grow-only pool of sphere entities.
pub fn update_firework_sparks(
    mut commands: Commands,
    session: Res<BirthdaySession>,
    assets: Option<Res<SparkRenderAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cache: Local<SparkMaterialCache>,
    mut pool: Query<(
        &SparkSlot,
        &mut Transform,
        &mut MeshMaterial3d<StandardMaterial>,
        &mut Visibility,
    )>,
) {
    let Some(assets) = assets else {
        return;
    };

    let sparks: Vec<SparkVisual> = session
        .engine()
        .sparks()
        .filter(|spark| spark.opacity >= VISIBILITY_THRESHOLD)
        .collect();

    let mut pooled = 0;
    for (slot, mut transform, mut material, mut visibility) in &mut pool {
        pooled = pooled.max(slot.0 + 1);
        let Some(spark) = sparks.get(slot.0) else {
            if *visibility != Visibility::Hidden {
                *visibility = Visibility::Hidden;
            }
            continue;
        };

        *transform = spark_transform(spark);
        let handle = cache.get_or_create(&mut materials, spark.color, spark.opacity);
        if material.0 != handle {
            material.0 = handle;
        }
        if *visibility != Visibility::Inherited {
            *visibility = Visibility::Inherited;
        }
    }

    for (slot, spark) in sparks.iter().enumerate().skip(pooled) {
        commands.spawn((
            SparkSlot(slot),
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(cache.get_or_create(&mut materials, spark.color, spark.opacity)),
            spark_transform(spark),
            Visibility::Inherited,
            NotShadowCaster,
        ));
    }
}

pub fn update_explosion_lights(
    session: Res<BirthdaySession>,
    mut pool: Query<(
        &ExplosionLightSlot,
        &mut PointLight,
        &mut Transform,
        &mut Visibility,
    )>,
) {
    let mut lights: Vec<ExplosionLight> = session.engine().lights().collect();
    lights.sort_by(|a, b| {
        b.intensity
            .partial_cmp(&a.intensity)
            .unwrap_or(Ordering::Equal)
    });

    for (slot, mut point_light, mut transform, mut visibility) in &mut pool {
        if let Some(light) = lights.get(slot.0) {
            let [r, g, b] = color_to_rgb(light.color);
            point_light.color = Color::srgb(r, g, b);
            point_light.intensity = light.intensity * LIGHT_LUMENS_PER_UNIT;
            transform.translation = light.position;
            *visibility = Visibility::Inherited;
        } else {
            point_light.intensity = 0.0;
            *visibility = Visibility::Hidden;
        }
    }
}

fn spark_transform(spark: &SparkVisual) -> Transform {
    let radius = match spark.kind {
        SparkKind::Shell => SHELL_RADIUS,
        SparkKind::Burst => BURST_RADIUS,
        SparkKind::Ghost => GHOST_RADIUS,
    };
    Transform::from_translation(spark.position).with_scale(Vec3::splat(radius))
}

fn spark_material_key(color: u32, opacity: f32) -> [u8; 4] {
    let [r, g, b] = color_to_rgb(color);
    let alpha = (opacity.clamp(0.0, 1.0) * OPACITY_STEPS).ceil() / OPACITY_STEPS;
    quantize_color([r, g, b, alpha])
}

fn quantize_color(color: [f32; 4]) -> [u8; 4] {
    [
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        (color[3] * 255.0).round() as u8,
    ]
}
