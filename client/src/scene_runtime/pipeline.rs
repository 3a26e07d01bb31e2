use bevy::prelude::*;

/// Per-frame ordering of the birthday scene.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FramePipeline {
    /// Keyboard/mouse sampling into `InputState`.
    Input,
    /// Model loading and clip installation.
    Load,
    /// The session tick.
    Simulate,
    /// Writing session output onto entities.
    Present,
    Camera,
}
