use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub orbit_distance: f32,
    /// Height above the actor's feet the third-person camera looks at.
    pub look_target_height: f32,
    pub eye_height: f32,
    /// Radians per pixel of pointer motion.
    pub sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub initial_yaw: f32,
    pub initial_pitch: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            orbit_distance: 10.0,
            look_target_height: 1.0,
            eye_height: 1.7,
            sensitivity: 0.003,
            min_pitch: 0.1,
            // Straight up would make the look-at basis degenerate.
            max_pitch: FRAC_PI_2 - 0.01,
            initial_yaw: 0.0,
            initial_pitch: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    ThirdPerson,
    FirstPerson,
    /// Debug free-fly camera; the rig does not drive the camera.
    Free,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::ThirdPerson => "third-person",
            Self::FirstPerson => "first-person",
            Self::Free => "free",
        }
    }
}

/// World-space camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub mode: CameraMode,
    /// Mode to return to when the free camera is switched off.
    pub follow_mode: CameraMode,
    pub yaw: f32,
    pub pitch: f32,
    pub settings: CameraSettings,
}

impl CameraRig {
    pub fn new(settings: CameraSettings) -> Self {
        let mut rig = Self {
            mode: CameraMode::ThirdPerson,
            follow_mode: CameraMode::ThirdPerson,
            yaw: settings.initial_yaw,
            pitch: settings.initial_pitch,
            settings,
        };
        rig.pitch = rig.clamp_pitch(rig.pitch);
        rig
    }

    /// Apply raw pointer motion (pixels).
    pub fn apply_look_delta(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.settings.sensitivity;
        self.pitch = self.clamp_pitch(self.pitch - delta.y * self.settings.sensitivity);
    }

    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        let (low, high) = if self.settings.min_pitch <= self.settings.max_pitch {
            (self.settings.min_pitch, self.settings.max_pitch)
        } else {
            (self.settings.max_pitch, self.settings.min_pitch)
        };
        if pitch.is_nan() {
            return low;
        }
        pitch.clamp(low, high)
    }

    /// Switch between third- and first-person. Ignored in free mode.
    pub fn toggle_view(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::Free => CameraMode::Free,
        };
        if self.mode != CameraMode::Free {
            self.follow_mode = self.mode;
        }
        self.mode
    }

    pub fn toggle_free(&mut self) -> CameraMode {
        self.mode = if self.mode == CameraMode::Free {
            self.follow_mode
        } else {
            CameraMode::Free
        };
        self.mode
    }

    pub fn is_free(&self) -> bool {
        self.mode == CameraMode::Free
    }

    /// Unit vector along the actor's forward, tilted up by pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Offset from the actor to the orbiting third-person camera.
    pub fn orbit_offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let distance = self.settings.orbit_distance;
        Vec3::new(
            sin_yaw * distance * cos_pitch,
            sin_pitch * distance,
            cos_yaw * distance * cos_pitch,
        )
    }

    /// Camera pose for the actor at `actor_position`, `None` in free mode.
    pub fn derive_pose(&self, actor_position: Vec3) -> Option<CameraPose> {
        match self.mode {
            CameraMode::ThirdPerson => Some(CameraPose {
                position: actor_position + self.orbit_offset(),
                target: actor_position + Vec3::Y * self.settings.look_target_height,
            }),
            CameraMode::FirstPerson => {
                let eye = actor_position + Vec3::Y * self.settings.eye_height;
                Some(CameraPose {
                    position: eye,
                    target: eye + self.look_direction(),
                })
            }
            CameraMode::Free => None,
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn pitch_is_clamped_both_ways() {
        let mut rig = CameraRig::default();
        rig.apply_look_delta(Vec2::new(0.0, 10_000.0));
        assert_eq!(rig.pitch, rig.settings.min_pitch);
        rig.apply_look_delta(Vec2::new(0.0, -10_000.0));
        assert_eq!(rig.pitch, rig.settings.max_pitch);
    }

    #[test]
    fn third_person_sits_behind_and_above_at_orbit_distance() {
        let rig = CameraRig::default();
        let actor = Vec3::new(4.0, 0.0, -2.0);
        let pose = rig.derive_pose(actor).expect("third-person pose");

        assert!(((pose.position - actor).length() - rig.settings.orbit_distance).abs() < EPSILON);
        assert!(pose.position.y > actor.y);
        // Behind means opposite the walking forward (-Z at yaw 0).
        assert!(pose.position.z > actor.z);
        assert_eq!(pose.target, actor + Vec3::Y);
    }

    #[test]
    fn first_person_looks_along_forward() {
        let mut rig = CameraRig::default();
        rig.toggle_view();
        rig.pitch = rig.settings.min_pitch;
        let pose = rig.derive_pose(Vec3::ZERO).expect("first-person pose");

        assert_eq!(pose.position, Vec3::new(0.0, 1.7, 0.0));
        let direction = pose.target - pose.position;
        assert!((direction.length() - 1.0).abs() < EPSILON);
        assert!(direction.z < 0.0);
    }

    #[test]
    fn free_mode_yields_no_pose_and_restores_follow_mode() {
        let mut rig = CameraRig::default();
        rig.toggle_view();
        assert_eq!(rig.toggle_free(), CameraMode::Free);
        assert!(rig.derive_pose(Vec3::ZERO).is_none());
        assert_eq!(rig.toggle_view(), CameraMode::Free);
        assert_eq!(rig.toggle_free(), CameraMode::FirstPerson);
    }

    #[test]
    fn nan_pitch_is_clamped_not_propagated() {
        let rig = CameraRig::default();
        assert_eq!(rig.clamp_pitch(f32::NAN), rig.settings.min_pitch);
    }
}
