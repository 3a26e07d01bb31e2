use super::clips::{ClipSource, select_clip_roles};
use super::crossfade::{IDLE_CLIP, WALK_CLIP};
use super::factory::CharacterFactory;
use super::types::{CharacterModel, CharacterRoot, CharacterVisual, PlaceholderBody};
use crate::session::BirthdaySession;
use bevy::asset::{AssetId, LoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::collections::HashMap;

pub const CHARACTER_MODEL_PATH: &str = "models/character.glb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoadState {
    #[default]
    Loading,
    Ready,
    /// The placeholder stays for the rest of the session.
    Failed,
}

/// Animation graph built from the character model.
#[derive(Resource)]
pub struct CharacterAnimationLibrary {
    pub gltf_handle: Handle<Gltf>,
    pub graph_handle: Option<Handle<AnimationGraph>>,
    pub animation_nodes: Vec<AnimationNodeIndex>,
    pub animation_names: Vec<String>,
    pub state: ModelLoadState,
}

impl CharacterAnimationLibrary {
    pub fn new(gltf_handle: Handle<Gltf>) -> Self {
        Self {
            gltf_handle,
            graph_handle: None,
            animation_nodes: Vec::new(),
            animation_names: Vec::new(),
            state: ModelLoadState::Loading,
        }
    }
}

pub fn spawn_character(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    session: Res<BirthdaySession>,
) {
    CharacterFactory::spawn(&mut commands, &mut meshes, &mut materials, session.actor());
    commands.insert_resource(CharacterAnimationLibrary::new(
        asset_server.load(CHARACTER_MODEL_PATH),
    ));
}

/// Swap in the model and hand its clips to the session once the glTF is loaded.
pub fn initialize_character_animation_library(
    mut commands: Commands,
    library: Option<ResMut<CharacterAnimationLibrary>>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    clips: Res<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut session: ResMut<BirthdaySession>,
    visuals: Query<Entity, With<CharacterVisual>>,
    placeholders: Query<Entity, With<PlaceholderBody>>,
) {
    let Some(mut library) = library else {
        return;
    };
    if library.state != ModelLoadState::Loading {
        return;
    }

    if let LoadState::Failed(error) = asset_server.load_state(&library.gltf_handle) {
        error!(
            "Failed to load '{}': {}. Keeping placeholder with procedural clips.",
            CHARACTER_MODEL_PATH, error
        );
        library.state = ModelLoadState::Failed;
        return;
    }

    let Some(gltf) = gltfs.get(&library.gltf_handle) else {
        return;
    };
    // Looping playback needs real clip lengths; wait until every clip asset is in.
    let Some(durations) =
        collect_clip_durations(gltf.animations.iter().map(|handle| clips.get(handle)))
    else {
        return;
    };
    library.state = ModelLoadState::Ready;

    let scene = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned());
    match (scene, visuals.single()) {
        (Some(scene), Ok(visual)) => {
            for placeholder in &placeholders {
                commands.entity(placeholder).despawn();
            }
            commands.spawn((SceneRoot(scene), CharacterModel, ChildOf(visual)));
        }
        (None, _) => warn!("'{}' has no scenes; keeping placeholder", CHARACTER_MODEL_PATH),
        (Some(_), Err(error)) => warn!("Character visual unavailable: {}", error),
    }

    let mut names: Vec<String> = (0..gltf.animations.len())
        .map(|i| format!("clip{i:02}"))
        .collect();
    let index_by_clip_id: HashMap<AssetId<AnimationClip>, usize> = gltf
        .animations
        .iter()
        .enumerate()
        .map(|(i, h)| (h.id(), i))
        .collect();
    for (name, handle) in &gltf.named_animations {
        if let Some(&idx) = index_by_clip_id.get(&handle.id()) {
            names[idx] = name.to_string();
        }
    }

    let roles = select_clip_roles(&names);
    session.install_clip_roles(roles, &durations);

    if gltf.animations.is_empty() {
        info!(
            "'{}' loaded without animations; using procedural clips",
            CHARACTER_MODEL_PATH
        );
        return;
    }

    let mut graph = AnimationGraph::new();
    let animation_nodes: Vec<AnimationNodeIndex> = graph
        .add_clips(gltf.animations.iter().cloned(), 1.0, graph.root)
        .collect();

    info!(
        "Character clips: idle={:?} walk={:?} ({} loaded: {})",
        roles.idle.source,
        roles.walk.source,
        names.len(),
        names.join(", ")
    );

    library.graph_handle = Some(graphs.add(graph));
    library.animation_nodes = animation_nodes;
    library.animation_names = names;
}

/// Marker for animation players already attached to the character graph.
#[derive(Component)]
pub struct CharacterAnimationBound;

/// Attach the shared graph to animation players spawned inside the model scene.
pub fn bind_character_animation_players(
    mut commands: Commands,
    library: Option<Res<CharacterAnimationLibrary>>,
    players: Query<Entity, (With<AnimationPlayer>, Without<CharacterAnimationBound>)>,
    parents: Query<&ChildOf>,
    models: Query<(), With<CharacterModel>>,
) {
    let Some(graph_handle) = library.and_then(|library| library.graph_handle.clone()) else {
        return;
    };

    for entity in &players {
        if !has_ancestor(entity, &parents, &models) {
            continue;
        }
        commands.entity(entity).insert((
            AnimationGraphHandle(graph_handle.clone()),
            CharacterAnimationBound,
        ));
    }
}

fn has_ancestor(
    entity: Entity,
    parents: &Query<&ChildOf>,
    models: &Query<(), With<CharacterModel>>,
) -> bool {
    let mut current = entity;
    while let Ok(parent) = parents.get(current) {
        current = parent.parent();
        if models.contains(current) {
            return true;
        }
    }
    false
}

/// Mirror the session's blend weights and clip times onto the bound players.
///
/// When both roles share one asset clip their weights add up and the clip
/// follows the heavier role's playback time.
pub fn apply_character_clip_weights(
    session: Res<BirthdaySession>,
    library: Option<Res<CharacterAnimationLibrary>>,
    mut players: Query<&mut AnimationPlayer, With<CharacterAnimationBound>>,
) {
    let Some(library) = library else {
        return;
    };
    if library.animation_nodes.is_empty() {
        return;
    }

    let animation = session.animation();
    let roles = session.clip_roles();
    let mut blend: HashMap<usize, (f32, f32, f32)> = HashMap::new();
    for (role, binding) in [(IDLE_CLIP, &roles.idle), (WALK_CLIP, &roles.walk)] {
        let ClipSource::Asset(index) = binding.source else {
            continue;
        };
        let Some(clip) = animation.clip(role) else {
            continue;
        };
        let entry = blend.entry(index).or_insert((0.0, 0.0, clip.time));
        if clip.weight > entry.1 {
            entry.1 = clip.weight;
            entry.2 = clip.time;
        }
        entry.0 += clip.weight;
    }

    for mut player in &mut players {
        for (index, &node) in library.animation_nodes.iter().enumerate() {
            match blend.get(&index) {
                Some(&(weight, _, time)) if weight > 0.0 => {
                    if !player.is_playing_animation(node) {
                        player.play(node).repeat();
                    }
                    if let Some(active) = player.animation_mut(node) {
                        active.set_weight(weight).set_speed(0.0).seek_to(time);
                    }
                }
                _ => {
                    if player.is_playing_animation(node) {
                        player.stop(node);
                    }
                }
            }
        }
    }
}

pub fn sync_character_transform(
    session: Res<BirthdaySession>,
    mut roots: Query<&mut Transform, (With<CharacterRoot>, Without<CharacterVisual>)>,
    mut visuals: Query<&mut Transform, (With<CharacterVisual>, Without<CharacterRoot>)>,
) {
    for mut transform in &mut roots {
        *transform = session.actor().transform();
    }
    let bob = session.procedural_bob_offset();
    for mut transform in &mut visuals {
        transform.translation.y = bob;
    }
}

/// Durations of every clip, or `None` while any of them is still missing.
fn collect_clip_durations<'a>(
    clips: impl IntoIterator<Item = Option<&'a AnimationClip>>,
) -> Option<Vec<f32>> {
    clips
        .into_iter()
        .map(|clip| clip.map(AnimationClip::duration))
        .collect()
}
