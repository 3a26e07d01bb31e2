use crate::scene_runtime::components::{Cake, CandleFlame, Ground, Moon, MoonLight, StarField};
use crate::session::BirthdaySession;
use bevy::light::GlobalAmbientLight;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use rand::Rng;

pub const NIGHT_SKY: Color = Color::srgb(0.0, 0.0, 0.067);

const GROUND_SIZE: f32 = 100.0;
const STAR_COUNT: usize = 2000;
const STAR_DOME_RADIUS: f32 = 600.0;
const CAKE_LIFT: f32 = 0.5;
const CANDLE_OFFSETS: [Vec2; 5] = [
    Vec2::ZERO,
    Vec2::new(0.6, 0.6),
    Vec2::new(-0.6, 0.6),
    Vec2::new(0.6, -0.6),
    Vec2::new(-0.6, -0.6),
];

/// Ground, sky, moon and lights.
pub fn spawn_night_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ambient_light: ResMut<GlobalAmbientLight>,
) {
    ambient_light.color = Color::srgb(0.25, 0.25, 0.25);
    ambient_light.brightness = 300.0;

    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.4, 0.2),
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::IDENTITY,
    ));

    commands.spawn((
        MoonLight,
        DirectionalLight {
            color: Color::srgb(0.565, 0.565, 1.0),
            illuminance: 3_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 30.0,
            ..default()
        },
        Transform::from_xyz(0.0, 5.0, 0.0),
    ));

    commands.spawn((
        Moon,
        Mesh3d(meshes.add(Sphere::new(5.0).mesh().uv(32, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 1.0, 0.8),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(40.0, 30.0, -100.0),
    ));

    commands.spawn((
        StarField,
        Mesh3d(meshes.add(star_field_mesh(&mut rand::thread_rng()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
    ));
}

/// Points scattered over the upper hemisphere.
fn star_field_mesh<R: Rng + ?Sized>(rng: &mut R) -> Mesh {
    let positions: Vec<[f32; 3]> = (0..STAR_COUNT)
        .map(|_| {
            let direction = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(0.05..=1.0),
                rng.gen_range(-1.0..=1.0),
            )
            .try_normalize()
            .unwrap_or(Vec3::Y);
            (direction * STAR_DOME_RADIUS).to_array()
        })
        .collect();

    Mesh::new(PrimitiveTopology::PointList, default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

/// Cake with candles at the interactable's position.
pub fn spawn_cake(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<BirthdaySession>,
) {
    let anchor = session.interactable().position + Vec3::Y * CAKE_LIFT;

    let cake = commands
        .spawn((
            Cake,
            Transform::from_translation(anchor),
            Visibility::default(),
        ))
        .id();

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(1.5, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.976, 0.878, 0.463),
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::IDENTITY,
        ChildOf(cake),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(1.52, 0.3))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.5,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.65, 0.0),
        ChildOf(cake),
    ));

    let candle_mesh = meshes.add(Cylinder::new(0.1, 0.6));
    let flame_mesh = meshes.add(Cone::new(0.1, 0.3));
    let flame_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 1.0, 0.267),
        emissive: LinearRgba::rgb(1.5, 1.5, 0.4),
        unlit: true,
        ..default()
    });
    let candle_materials = [
        materials.add(Color::srgb(1.0, 0.267, 0.267)),
        materials.add(Color::srgb(0.267, 0.267, 1.0)),
    ];

    for (index, offset) in CANDLE_OFFSETS.iter().enumerate() {
        let candle = commands
            .spawn((
                Mesh3d(candle_mesh.clone()),
                MeshMaterial3d(candle_materials[index % 2].clone()),
                Transform::from_xyz(offset.x, 0.8 + 0.3, offset.y),
                ChildOf(cake),
            ))
            .id();

        commands.spawn((
            CandleFlame,
            Mesh3d(flame_mesh.clone()),
            MeshMaterial3d(flame_material.clone()),
            PointLight {
                color: Color::srgb(1.0, 1.0, 0.267),
                intensity: 20_000.0,
                range: 2.0,
                ..default()
            },
            Transform::from_xyz(0.0, 0.45, 0.0),
            ChildOf(candle),
        ));
    }

    info!("Cake placed at {:?}", anchor);
}
