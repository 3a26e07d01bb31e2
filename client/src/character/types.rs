use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tunables for the player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSettings {
    /// World units per second.
    pub move_speed: f32,
    /// Facing interpolation rate, per second.
    pub turn_speed: f32,
    pub spawn_position: [f32; 3],
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_speed: 3.0,
            spawn_position: [0.0, 0.0, 0.0],
        }
    }
}

/// The single player character as seen by the simulation.
///
/// Only a position and a yaw are tracked; whether the visual is the
/// placeholder box or the loaded model does not matter here.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub position: Vec3,
    pub yaw: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Actor {
    pub fn new(settings: &CharacterSettings) -> Self {
        let mut position = Vec3::from(settings.spawn_position);
        position.y = 0.0;
        Self {
            position,
            yaw: 0.0,
            move_speed: settings.move_speed,
            turn_speed: settings.turn_speed,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_rotation_y(self.yaw))
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(&CharacterSettings::default())
    }
}

/// Marker for the character root entity.
#[derive(Component)]
pub struct CharacterRoot;

/// Marker for the wireframe-style box shown until (or instead of) the model.
#[derive(Component)]
pub struct PlaceholderBody;

/// Marker for the glTF scene child of the character root.
#[derive(Component)]
pub struct CharacterModel;

/// Child entity that carries the procedural bob offset.
#[derive(Component)]
pub struct CharacterVisual;
