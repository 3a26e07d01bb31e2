#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod ambience;
pub mod camera;
pub mod character;
pub mod fireworks;
pub mod input;
pub mod interaction;
pub mod scene_runtime;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod ui;

pub use scene_runtime::registration::{BirthdaySimulationPlugin, register_scene_runtime};
pub use session::{BirthdaySession, FrameReport};
