//! Frame driver: owns all simulation state and advances it once per frame.

use crate::camera::{CameraMode, CameraPose, CameraRig};
use crate::character::clips::{ClipRoles, ClipSource};
use crate::character::crossfade::{AnimationStateMachine, IDLE_CLIP, WALK_CLIP};
use crate::character::movement::{LocomotionStep, advance_actor};
use crate::character::types::Actor;
use crate::fireworks::{CelebrationShow, FireworkEngine, FireworkEvent};
use crate::input::{FrameInput, MovementKeys};
use crate::interaction::Interactable;
use crate::settings::{GameSettings, SettingsResource};
use bevy::prelude::*;

/// What happened during one [`BirthdaySession::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub step: LocomotionStep,
    pub view_changed: Option<CameraMode>,
    pub celebration_started: bool,
    pub launched: u32,
    pub exploded: usize,
    pub retired: usize,
}

#[derive(Resource)]
pub struct BirthdaySession {
    actor: Actor,
    rig: CameraRig,
    animation: AnimationStateMachine,
    clip_roles: ClipRoles,
    cake: Interactable,
    show: CelebrationShow,
    engine: FireworkEngine,
    held_keys: MovementKeys,
    camera_pose: Option<CameraPose>,
    elapsed: f32,
}

impl BirthdaySession {
    pub fn new(settings: &GameSettings) -> Self {
        let anchor = Vec3::from(settings.interaction.position);
        Self::assemble(
            settings,
            CelebrationShow::new(settings.show.clone()),
            FireworkEngine::new(settings.fireworks.clone(), anchor),
        )
    }

    /// Session with deterministic fireworks and show timing.
    pub fn with_seed(settings: &GameSettings, seed: u64) -> Self {
        let anchor = Vec3::from(settings.interaction.position);
        Self::assemble(
            settings,
            CelebrationShow::with_seed(settings.show.clone(), seed),
            FireworkEngine::with_seed(settings.fireworks.clone(), anchor, seed.wrapping_add(1)),
        )
    }

    fn assemble(settings: &GameSettings, show: CelebrationShow, engine: FireworkEngine) -> Self {
        let actor = Actor::new(&settings.character);
        let rig = CameraRig::new(settings.camera.clone());
        let camera_pose = rig.derive_pose(actor.position);

        let mut session = Self {
            actor,
            rig,
            animation: AnimationStateMachine::new(),
            clip_roles: ClipRoles::procedural(),
            cake: Interactable::from_settings(&settings.interaction),
            show,
            engine,
            held_keys: MovementKeys::default(),
            camera_pose,
            elapsed: 0.0,
        };
        session.install_clip_roles(ClipRoles::procedural(), &[]);
        session
    }

    /// Replace the clip set, keeping the active role.
    ///
    /// `durations` holds the length of each loaded clip by asset index.
    pub fn install_clip_roles(&mut self, roles: ClipRoles, durations: &[f32]) {
        let role = if self.held_keys.any() {
            WALK_CLIP
        } else {
            IDLE_CLIP
        };

        let mut machine = AnimationStateMachine::new();
        roles.register(&mut machine, durations);
        machine.request_state(role);

        self.animation = machine;
        self.clip_roles = roles;
    }

    /// Advance every subsystem by `dt` seconds in a fixed order.
    pub fn tick(&mut self, dt: f32, input: FrameInput) -> FrameReport {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        let mut report = FrameReport::default();

        if input.actions.toggle_debug_camera {
            let mode = self.rig.toggle_free();
            info!("Camera mode: {}", mode.label());
            report.view_changed = Some(mode);
        }
        if input.actions.toggle_view && !self.rig.is_free() {
            let mode = self.rig.toggle_view();
            info!("Camera mode: {}", mode.label());
            report.view_changed = Some(mode);
        }

        // The free camera owns the keyboard; the actor stands still meanwhile.
        let movement = if self.rig.is_free() {
            MovementKeys::default()
        } else {
            self.rig.apply_look_delta(input.look_delta);
            input.movement
        };

        report.step = advance_actor(&mut self.actor, movement, self.rig.yaw, dt);

        if movement != self.held_keys {
            self.held_keys = movement;
            let role = if movement.any() { WALK_CLIP } else { IDLE_CLIP };
            self.animation.request_state(role);
        }
        self.animation.advance(dt);

        self.camera_pose = self.rig.derive_pose(self.actor.position);

        self.cake.update_proximity(self.actor.position);
        if input.actions.interact && self.cake.interact().is_some() {
            report.celebration_started = self.show.begin();
        }

        report.launched = self.show.tick(dt, &mut self.engine);

        for event in self.engine.update(dt) {
            match event {
                FireworkEvent::Exploded { .. } => report.exploded += 1,
                FireworkEvent::Retired { .. } => report.retired += 1,
            }
        }
        self.show.notify_explosions(report.exploded);

        report
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// `None` while the debug free camera is active.
    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.camera_pose
    }

    pub fn animation(&self) -> &AnimationStateMachine {
        &self.animation
    }

    pub fn clip_roles(&self) -> &ClipRoles {
        &self.clip_roles
    }

    pub fn interactable(&self) -> &Interactable {
        &self.cake
    }

    pub fn show(&self) -> &CelebrationShow {
        &self.show
    }

    pub fn engine(&self) -> &FireworkEngine {
        &self.engine
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn prompt_visible(&self) -> bool {
        self.cake.prompt_visible()
    }

    pub fn message_visible(&self) -> bool {
        self.show.message_visible()
    }

    /// Blended vertical offset from procedural clips; zero for asset clips.
    pub fn procedural_bob_offset(&self) -> f32 {
        [(IDLE_CLIP, &self.clip_roles.idle), (WALK_CLIP, &self.clip_roles.walk)]
            .into_iter()
            .filter_map(|(role, binding)| match binding.source {
                ClipSource::Procedural(bob) => self
                    .animation
                    .clip(role)
                    .map(|clip| clip.weight * bob.sample(clip.time)),
                ClipSource::Asset(_) => None,
            })
            .sum()
    }
}

impl FromWorld for BirthdaySession {
    fn from_world(world: &mut World) -> Self {
        let settings = world
            .get_resource::<SettingsResource>()
            .map(|resource| resource.current.clone())
            .unwrap_or_default();
        Self::new(&settings)
    }
}
