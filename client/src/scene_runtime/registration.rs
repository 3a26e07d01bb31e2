use crate::character::{
    apply_character_clip_weights, bind_character_animation_players,
    initialize_character_animation_library, spawn_character, sync_character_transform,
};
use crate::input::InputState;
use crate::scene_runtime::pipeline::FramePipeline;
use crate::scene_runtime::systems::{
    DebugFreeCameraController, animate_floaters, apply_camera_pose, control_debug_free_camera,
    drive_session, sample_player_input, setup_firework_rendering, spawn_ambience,
    spawn_birthday_camera, spawn_cake, spawn_debug_free_camera_hint, spawn_night_environment,
    sync_debug_free_camera, update_debug_free_camera_hint, update_explosion_lights,
    update_firefly_lights, update_firework_sparks,
};
use crate::session::BirthdaySession;
use bevy::prelude::*;

/// Input state, the session resource and the per-frame tick.
///
/// Runs headless; windowing and rendering come from [`register_scene_runtime`].
pub struct BirthdaySimulationPlugin;

impl Plugin for BirthdaySimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<BirthdaySession>()
            .configure_sets(
                Update,
                (
                    FramePipeline::Input,
                    FramePipeline::Load,
                    FramePipeline::Simulate,
                    FramePipeline::Present,
                    FramePipeline::Camera,
                )
                    .chain(),
            )
            .add_systems(Update, drive_session.in_set(FramePipeline::Simulate));
    }
}

pub fn register_scene_runtime(app: &mut App) {
    app.add_plugins(BirthdaySimulationPlugin)
        .init_resource::<DebugFreeCameraController>()
        .add_systems(
            Startup,
            (
                spawn_birthday_camera,
                spawn_night_environment,
                spawn_cake,
                spawn_ambience,
                spawn_character,
                setup_firework_rendering,
                spawn_debug_free_camera_hint,
            ),
        )
        .add_systems(Update, sample_player_input.in_set(FramePipeline::Input))
        .add_systems(
            Update,
            (
                initialize_character_animation_library,
                bind_character_animation_players,
            )
                .chain()
                .in_set(FramePipeline::Load),
        )
        .add_systems(
            Update,
            (
                sync_character_transform,
                apply_character_clip_weights,
                update_firework_sparks,
                update_explosion_lights,
                animate_floaters,
                update_firefly_lights,
            )
                .in_set(FramePipeline::Present),
        )
        .add_systems(
            Update,
            (
                apply_camera_pose,
                sync_debug_free_camera,
                control_debug_free_camera,
                update_debug_free_camera_hint,
            )
                .chain()
                .in_set(FramePipeline::Camera),
        );
}
