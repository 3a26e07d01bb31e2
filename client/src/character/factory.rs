use super::types::{Actor, CharacterRoot, CharacterVisual, PlaceholderBody};
use bevy::prelude::*;

const PLACEHOLDER_SIZE: Vec3 = Vec3::new(0.5, 1.0, 0.5);
const PLACEHOLDER_COLOR: Color = Color::srgb(1.0, 0.41, 0.71);

pub struct CharacterFactory;

impl CharacterFactory {
    /// Spawn the character hierarchy: root (actor transform) -> visual (bob
    /// offset) -> placeholder box. The loaded model later replaces the box.
    pub fn spawn(
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
        actor: &Actor,
    ) -> Entity {
        let root = commands
            .spawn((actor.transform(), Visibility::default(), CharacterRoot))
            .id();

        let visual = commands
            .spawn((
                Transform::IDENTITY,
                Visibility::default(),
                CharacterVisual,
                ChildOf(root),
            ))
            .id();

        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(PLACEHOLDER_SIZE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: PLACEHOLDER_COLOR,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(Vec3::Y * PLACEHOLDER_SIZE.y * 0.5),
            PlaceholderBody,
            ChildOf(visual),
        ));

        root
    }
}
