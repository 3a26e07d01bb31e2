pub mod ambience;
pub mod camera;
pub mod fireworks;
pub mod input;
pub mod scenery;
pub mod session;

pub use ambience::{
    MAX_FIREFLY_LIGHTS, animate_floaters, spawn_ambience, update_firefly_lights,
};
pub use camera::{
    DebugFreeCameraController, DebugFreeCameraHint, apply_camera_pose, control_debug_free_camera,
    spawn_birthday_camera, spawn_debug_free_camera_hint, sync_debug_free_camera,
    update_debug_free_camera_hint,
};
pub use fireworks::{
    MAX_EXPLOSION_LIGHTS, SparkRenderAssets, setup_firework_rendering, update_explosion_lights,
    update_firework_sparks,
};
pub use input::sample_player_input;
pub use scenery::{NIGHT_SKY, spawn_cake, spawn_night_environment};
pub use session::drive_session;
