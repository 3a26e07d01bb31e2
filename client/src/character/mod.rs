pub mod animation;
pub mod clips;
pub mod crossfade;
pub mod factory;
pub mod movement;
pub mod types;

pub use animation::{
    CHARACTER_MODEL_PATH, CharacterAnimationLibrary, ModelLoadState, apply_character_clip_weights,
    bind_character_animation_players, initialize_character_animation_library, spawn_character,
    sync_character_transform,
};
pub use clips::{ClipRoles, ClipSource, ProceduralBob, select_clip_roles};
pub use crossfade::{AnimationError, AnimationStateMachine, CROSSFADE_SECONDS, IDLE_CLIP, WALK_CLIP};
pub use factory::CharacterFactory;
pub use movement::advance_actor;
pub use types::{Actor, CharacterModel, CharacterRoot, CharacterSettings, CharacterVisual, PlaceholderBody};
