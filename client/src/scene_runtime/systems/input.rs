use crate::input::{InputState, MovementKeys};
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use bevy_egui::input::EguiWantsInput;

/// Translate raw keyboard and mouse state into the session's [`InputState`].
pub fn sample_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut input: ResMut<InputState>,
    egui_wants_input: Option<Res<EguiWantsInput>>,
    mut cursor_options: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    input.set_movement(MovementKeys {
        forward: keys.pressed(KeyCode::KeyW),
        back: keys.pressed(KeyCode::KeyS),
        left: keys.pressed(KeyCode::KeyA),
        right: keys.pressed(KeyCode::KeyD),
    });

    if keys.just_pressed(KeyCode::KeyE) {
        input.trigger_interact();
    }
    if keys.just_pressed(KeyCode::KeyV) {
        input.trigger_toggle_view();
    }
    if keys.just_pressed(KeyCode::KeyO) {
        input.trigger_toggle_debug_camera();
    }

    let pointer_over_ui = egui_wants_input
        .as_deref()
        .is_some_and(EguiWantsInput::wants_any_pointer_input);

    if mouse_buttons.just_pressed(MouseButton::Left) {
        if input.engage_look_lock_on_click(pointer_over_ui) {
            set_cursor_grab(&mut cursor_options, true);
        }
    } else if keys.just_pressed(KeyCode::Escape) && input.look_locked {
        input.release_look_lock();
        set_cursor_grab(&mut cursor_options, false);
    }

    for motion in mouse_motion.read() {
        input.push_look_delta(motion.delta);
    }
}

fn set_cursor_grab(cursor_options: &mut Query<&mut CursorOptions, With<PrimaryWindow>>, locked: bool) {
    let Ok(mut cursor) = cursor_options.single_mut() else {
        return;
    };
    cursor.grab_mode = if locked {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
    cursor.visible = !locked;
}
