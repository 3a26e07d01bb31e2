use crate::scene_runtime::components::BirthdayCamera;
use crate::session::BirthdaySession;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::input::EguiWantsInput;

/// UI marker for debug free camera hint text.
#[derive(Component)]
pub struct DebugFreeCameraHint;

#[derive(Resource)]
pub struct DebugFreeCameraController {
    pub enabled: bool,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for DebugFreeCameraController {
    fn default() -> Self {
        Self {
            enabled: false,
            move_speed: 15.0,
            look_sensitivity: 0.0025,
            zoom_sensitivity: 2.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

pub fn spawn_birthday_camera(mut commands: Commands, session: Res<BirthdaySession>) {
    let transform = session
        .camera_pose()
        .map(|pose| pose.transform())
        .unwrap_or_default();
    commands.spawn((Camera3d::default(), transform, BirthdayCamera));
}

/// Place the camera where the rig says; the free camera drives it otherwise.
pub fn apply_camera_pose(
    session: Res<BirthdaySession>,
    mut camera_query: Query<&mut Transform, With<BirthdayCamera>>,
) {
    let Some(pose) = session.camera_pose() else {
        return;
    };
    for mut transform in &mut camera_query {
        *transform = pose.transform();
    }
}

pub fn spawn_debug_free_camera_hint(mut commands: Commands) {
    commands.spawn((
        DebugFreeCameraHint,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(14.0),
            left: Val::Px(14.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        Visibility::Hidden,
    ));
}

pub fn update_debug_free_camera_hint(
    controller: Res<DebugFreeCameraController>,
    mut hints: Query<(&mut Text, &mut Visibility), With<DebugFreeCameraHint>>,
) {
    if !controller.is_changed() {
        return;
    }
    for (mut text, mut visibility) in &mut hints {
        text.0 = "[DEBUG] O: exit free camera | WASD move | Space/Shift up/down | Right mouse look | Scroll zoom".into();
        *visibility = if controller.enabled {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Follow the session's camera mode; seed yaw/pitch from the current view on entry.
pub fn sync_debug_free_camera(
    session: Res<BirthdaySession>,
    mut controller: ResMut<DebugFreeCameraController>,
    camera_query: Query<&Transform, With<BirthdayCamera>>,
) {
    let enabled = session.rig().is_free();
    if controller.enabled == enabled {
        return;
    }
    controller.enabled = enabled;

    if enabled {
        if let Ok(transform) = camera_query.single() {
            let forward = transform.forward();
            // Bevy's yaw rotates -Z toward -X, so negate both components.
            controller.yaw = (-forward.x).atan2(-forward.z);
            controller.pitch = forward.y.clamp(-0.999, 0.999).asin();
        }
    }

    info!(
        "Debug free camera {}",
        if controller.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
}

pub fn control_debug_free_camera(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    egui_wants_input: Option<Res<EguiWantsInput>>,
    mut controller: ResMut<DebugFreeCameraController>,
    mut camera_query: Query<&mut Transform, With<BirthdayCamera>>,
) {
    if !controller.enabled {
        // Drain events while disabled so accumulated movement isn't applied on toggle.
        for _ in mouse_motion.read() {}
        for _ in mouse_wheel.read() {}
        return;
    }

    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let pointer_over_ui = egui_wants_input
        .as_deref()
        .is_some_and(EguiWantsInput::wants_any_pointer_input);

    let mut mouse_delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        mouse_delta += motion.delta;
    }
    if free_look_engaged(mouse_buttons.pressed(MouseButton::Right), pointer_over_ui) {
        controller.yaw -= mouse_delta.x * controller.look_sensitivity;
        controller.pitch =
            (controller.pitch - mouse_delta.y * controller.look_sensitivity).clamp(-1.54, 1.54);
        transform.rotation = Quat::from_euler(EulerRot::YXZ, controller.yaw, controller.pitch, 0.0);
    }

    let mut move_dir = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        move_dir += *transform.forward();
    }
    if keys.pressed(KeyCode::KeyS) {
        move_dir -= *transform.forward();
    }
    if keys.pressed(KeyCode::KeyA) {
        move_dir -= *transform.right();
    }
    if keys.pressed(KeyCode::KeyD) {
        move_dir += *transform.right();
    }
    if keys.pressed(KeyCode::Space) {
        move_dir += Vec3::Y;
    }
    if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
        move_dir -= Vec3::Y;
    }
    if move_dir.length_squared() > f32::EPSILON {
        transform.translation += move_dir.normalize() * controller.move_speed * time.delta_secs();
    }

    let mut zoom_units = 0.0;
    for wheel in mouse_wheel.read() {
        if pointer_over_ui {
            continue;
        }
        let unit_scale = match wheel.unit {
            MouseScrollUnit::Line => 1.0,
            MouseScrollUnit::Pixel => 0.03,
        };
        zoom_units += wheel.y * unit_scale;
    }
    if zoom_units.abs() > f32::EPSILON {
        let forward = *transform.forward();
        transform.translation += forward * zoom_units * controller.zoom_sensitivity;
    }
}

/// Right mouse steers the free camera unless the UI owns the pointer.
fn free_look_engaged(right_pressed: bool, pointer_over_ui: bool) -> bool {
    right_pressed && !pointer_over_ui
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_look_yields_to_the_ui() {
        assert!(free_look_engaged(true, false));
        assert!(!free_look_engaged(true, true));
        assert!(!free_look_engaged(false, false));
    }
}
