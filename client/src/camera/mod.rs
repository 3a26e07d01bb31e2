pub mod rig;

pub use rig::{CameraMode, CameraPose, CameraRig, CameraSettings};
