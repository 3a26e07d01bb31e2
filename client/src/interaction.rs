//! Proximity-gated one-shot interaction with the cake.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub position: [f32; 3],
    pub radius: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            position: [10.0, 0.0, -10.0],
            radius: 3.0,
        }
    }
}

/// Emitted once per session when the player interacts in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeginCelebration;

#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub position: Vec3,
    pub radius: f32,
    consumed: bool,
    within_range: bool,
}

impl Interactable {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            consumed: false,
            within_range: false,
        }
    }

    pub fn from_settings(settings: &InteractionSettings) -> Self {
        Self::new(Vec3::from(settings.position), settings.radius)
    }

    pub fn consumed(&self) -> bool {
        self.consumed
    }

    /// Result of the most recent [`update_proximity`](Self::update_proximity).
    pub fn within_range(&self) -> bool {
        self.within_range
    }

    /// Whether the "press E" prompt should be shown.
    pub fn prompt_visible(&self) -> bool {
        self.within_range && !self.consumed
    }

    /// Distance on the ground plane; height differences are ignored.
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        Vec2::new(point.x - self.position.x, point.z - self.position.z).length()
    }

    pub fn update_proximity(&mut self, actor_position: Vec3) -> bool {
        self.within_range = self.planar_distance(actor_position) < self.radius;
        self.within_range
    }

    /// Handle an interact press. Fires at most once per session.
    pub fn interact(&mut self) -> Option<BeginCelebration> {
        if !self.within_range || self.consumed {
            return None;
        }
        self.consumed = true;
        info!("Cake interaction triggered; starting celebration");
        Some(BeginCelebration)
    }
}

impl Default for Interactable {
    fn default() -> Self {
        Self::from_settings(&InteractionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_uses_strict_planar_distance() {
        let mut cake = Interactable::new(Vec3::ZERO, 3.0);

        assert!(cake.update_proximity(Vec3::new(2.0, 0.0, 0.0)));
        assert!(!cake.update_proximity(Vec3::new(5.0, 0.0, 0.0)));
        assert!(!cake.update_proximity(Vec3::new(3.0, 0.0, 0.0)));
        assert!(cake.update_proximity(Vec3::new(0.0, 40.0, 2.0)));
    }

    #[test]
    fn interaction_fires_once() {
        let mut cake = Interactable::new(Vec3::ZERO, 3.0);
        cake.update_proximity(Vec3::new(1.0, 0.0, 1.0));

        assert_eq!(cake.interact(), Some(BeginCelebration));
        assert!(cake.consumed());
        assert_eq!(cake.interact(), None);
        assert!(!cake.prompt_visible());
    }

    #[test]
    fn out_of_range_interaction_does_not_consume() {
        let mut cake = Interactable::new(Vec3::ZERO, 3.0);
        cake.update_proximity(Vec3::new(10.0, 0.0, 0.0));

        assert_eq!(cake.interact(), None);
        assert!(!cake.consumed());
    }
}
