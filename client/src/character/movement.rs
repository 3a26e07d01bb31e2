use super::types::Actor;
use crate::input::MovementKeys;
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Result of one locomotion step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionStep {
    pub direction: Vec3,
    pub displacement: Vec3,
}

impl LocomotionStep {
    pub fn moved(&self) -> bool {
        self.displacement != Vec3::ZERO
    }
}

/// Camera-relative forward on the ground plane: `(0, 0, -1)` rotated by yaw.
pub fn camera_forward(camera_yaw: f32) -> Vec3 {
    Quat::from_rotation_y(camera_yaw) * Vec3::NEG_Z
}

/// Camera-relative right on the ground plane: `(1, 0, 0)` rotated by yaw.
pub fn camera_right(camera_yaw: f32) -> Vec3 {
    Quat::from_rotation_y(camera_yaw) * Vec3::X
}

/// Normalized desired walking direction, or zero when keys cancel out.
pub fn desired_direction(keys: MovementKeys, camera_yaw: f32) -> Vec3 {
    let forward = camera_forward(camera_yaw);
    let right = camera_right(camera_yaw);

    let mut direction = Vec3::ZERO;
    if keys.forward {
        direction += forward;
    }
    if keys.back {
        direction -= forward;
    }
    if keys.left {
        direction -= right;
    }
    if keys.right {
        direction += right;
    }
    direction.y = 0.0;
    direction.normalize_or_zero()
}

/// Move and turn the actor for one frame.
pub fn advance_actor(
    actor: &mut Actor,
    keys: MovementKeys,
    camera_yaw: f32,
    dt: f32,
) -> LocomotionStep {
    let direction = desired_direction(keys, camera_yaw);
    if direction == Vec3::ZERO || dt <= 0.0 {
        return LocomotionStep {
            direction,
            displacement: Vec3::ZERO,
        };
    }

    let target_yaw = direction.x.atan2(direction.z);
    actor.yaw = approach_angle(actor.yaw, target_yaw, (actor.turn_speed * dt).min(1.0));

    let displacement = direction * actor.move_speed * dt;
    actor.position += displacement;
    actor.position.y = 0.0;

    LocomotionStep {
        direction,
        displacement,
    }
}

/// Interpolate from `current` toward `target` by `factor` along the shorter arc.
pub fn approach_angle(current: f32, target: f32, factor: f32) -> f32 {
    let delta = wrap_angle(target - current);
    wrap_angle(current + delta * factor.clamp(0.0, 1.0))
}

/// Wrap into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
