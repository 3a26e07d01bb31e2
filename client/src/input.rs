//! Per-frame input snapshot consumed by the session tick.

use bevy::prelude::*;

/// Held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementKeys {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Discrete actions triggered this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputActions {
    pub interact: bool,
    pub toggle_view: bool,
    pub toggle_debug_camera: bool,
}

/// Everything the simulation reads from the player in one frame.
///
/// Actions and the look delta are one-frame values; [`InputState::consume_frame`]
/// hands them out and resets them, while held keys and look-lock persist.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub movement: MovementKeys,
    /// Raw pointer motion accumulated since the last tick (pixels).
    pub look_delta: Vec2,
    /// Pointer motion only steers the camera while this is engaged.
    pub look_locked: bool,
    pub actions: InputActions,
}

impl InputState {
    pub fn set_movement(&mut self, movement: MovementKeys) {
        self.movement = movement;
    }

    pub fn engage_look_lock(&mut self) {
        self.look_locked = true;
    }

    /// Engage look-lock for a world click. Clicks the UI consumes never lock.
    ///
    /// Returns whether the lock was newly engaged.
    pub fn engage_look_lock_on_click(&mut self, pointer_over_ui: bool) -> bool {
        if pointer_over_ui || self.look_locked {
            return false;
        }
        self.engage_look_lock();
        true
    }

    pub fn release_look_lock(&mut self) {
        self.look_locked = false;
        self.look_delta = Vec2::ZERO;
    }

    /// Accumulate pointer motion; ignored while look-lock is released.
    pub fn push_look_delta(&mut self, delta: Vec2) {
        if self.look_locked {
            self.look_delta += delta;
        }
    }

    pub fn trigger_interact(&mut self) {
        self.actions.interact = true;
    }

    pub fn trigger_toggle_view(&mut self) {
        self.actions.toggle_view = true;
    }

    pub fn trigger_toggle_debug_camera(&mut self) {
        self.actions.toggle_debug_camera = true;
    }

    /// Take this frame's one-shot values, leaving held state in place.
    pub fn consume_frame(&mut self) -> FrameInput {
        let frame = FrameInput {
            movement: self.movement,
            look_delta: if self.look_locked {
                self.look_delta
            } else {
                Vec2::ZERO
            },
            actions: self.actions,
        };
        self.look_delta = Vec2::ZERO;
        self.actions = InputActions::default();
        frame
    }
}

/// Immutable per-tick view of [`InputState`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MovementKeys,
    pub look_delta: Vec2,
    pub actions: InputActions,
}
