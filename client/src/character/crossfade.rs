//! Character animation state machine with time-based crossfades.
//!
//! The machine only tracks weights, playback times and speeds of named clips;
//! applying them to an `AnimationPlayer` or to a procedural offset is left to
//! the presentation systems.

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

/// Fixed crossfade window in seconds.
pub const CROSSFADE_SECONDS: f32 = 0.5;

pub const IDLE_CLIP: &str = "idle";
pub const WALK_CLIP: &str = "walk";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("animation clip '{0}' is not registered")]
    UnknownClip(String),
}

/// Registration data for a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpec {
    pub time_scale: f32,
    pub looping: bool,
    /// Length in seconds when known; used to wrap looping playback time.
    pub duration: Option<f32>,
}

impl Default for ClipSpec {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            looping: true,
            duration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub weight: f32,
    pub time: f32,
    pub time_scale: f32,
    pub looping: bool,
    pub duration: Option<f32>,
}

impl ClipState {
    fn new(spec: ClipSpec) -> Self {
        Self {
            weight: 0.0,
            time: 0.0,
            time_scale: spec.time_scale,
            looping: spec.looping,
            duration: spec.duration.filter(|d| d.is_finite() && *d > 0.0),
        }
    }

    fn advance(&mut self, dt: f32) {
        self.time += dt * self.time_scale;
        if let Some(duration) = self.duration {
            if self.looping {
                self.time = self.time.rem_euclid(duration);
            } else {
                self.time = self.time.min(duration);
            }
        }
    }
}

/// In-flight blend from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub elapsed: f32,
    pub duration: f32,
    /// Weight `from` had when the blend started (1.0 unless interrupted).
    pub from_start_weight: f32,
}

impl Transition {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn from_weight(&self) -> f32 {
        self.from_start_weight * (1.0 - self.progress())
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationStateMachine {
    clips: HashMap<String, ClipState>,
    current: Option<String>,
    previous: Option<String>,
    transition: Option<Transition>,
}

impl AnimationStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a clip. Replacing keeps nothing of the old state.
    pub fn register_clip(&mut self, name: impl Into<String>, spec: ClipSpec) {
        let name = name.into();
        let mut state = ClipState::new(spec);
        if self.current.as_deref() == Some(name.as_str()) && self.transition.is_none() {
            state.weight = 1.0;
        }
        self.clips.insert(name, state);
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn clip(&self, name: &str) -> Option<&ClipState> {
        self.clips.get(name)
    }

    pub fn weight(&self, name: &str) -> f32 {
        self.clips.get(name).map(|clip| clip.weight).unwrap_or(0.0)
    }

    pub fn clips(&self) -> impl Iterator<Item = (&str, &ClipState)> {
        self.clips.iter().map(|(name, clip)| (name.as_str(), clip))
    }

    /// Request a switch to `name`, logging and ignoring unknown clips.
    ///
    /// Returns whether a new state was entered.
    pub fn request_state(&mut self, name: &str) -> bool {
        match self.try_request_state(name) {
            Ok(changed) => changed,
            Err(error) => {
                debug!("Ignoring animation request: {error}");
                false
            }
        }
    }

    pub fn try_request_state(&mut self, name: &str) -> Result<bool, AnimationError> {
        if !self.clips.contains_key(name) {
            return Err(AnimationError::UnknownClip(name.to_string()));
        }
        if self.current.as_deref() == Some(name) {
            return Ok(false);
        }

        let Some(outgoing) = self.current.replace(name.to_string()) else {
            // First activation: no blend partner, start at full weight.
            if let Some(clip) = self.clips.get_mut(name) {
                clip.weight = 1.0;
                clip.time = 0.0;
            }
            return Ok(true);
        };

        let from_start_weight = self.weight(&outgoing);
        let resumes_partner = self
            .transition
            .as_ref()
            .is_some_and(|transition| transition.from == name);

        for (clip_name, clip) in self.clips.iter_mut() {
            if clip_name == &outgoing {
                continue;
            }
            if clip_name == name {
                clip.weight = 1.0 - from_start_weight;
                // Only a fresh start rewinds; a clip still fading out keeps its phase.
                if !resumes_partner {
                    clip.time = 0.0;
                }
            } else {
                clip.weight = 0.0;
            }
        }

        self.previous = Some(outgoing.clone());
        self.transition = Some(Transition {
            from: outgoing,
            to: name.to_string(),
            elapsed: 0.0,
            duration: CROSSFADE_SECONDS,
            from_start_weight,
        });
        Ok(true)
    }

    /// Advance playback of weighted clips and any blend by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        for clip in self.clips.values_mut() {
            if clip.weight > 0.0 {
                clip.advance(dt);
            }
        }

        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.elapsed += dt;

        let from_weight = transition.from_weight();
        let complete = transition.is_complete();
        let from = transition.from.clone();
        let to = transition.to.clone();

        if complete {
            self.transition = None;
            if let Some(clip) = self.clips.get_mut(&from) {
                clip.weight = 0.0;
            }
            if let Some(clip) = self.clips.get_mut(&to) {
                clip.weight = 1.0;
            }
            return;
        }

        if let Some(clip) = self.clips.get_mut(&from) {
            clip.weight = from_weight;
        }
        if let Some(clip) = self.clips.get_mut(&to) {
            clip.weight = 1.0 - from_weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn machine() -> AnimationStateMachine {
        let mut machine = AnimationStateMachine::new();
        machine.register_clip(IDLE_CLIP, ClipSpec::default());
        machine.register_clip(WALK_CLIP, ClipSpec::default());
        machine
    }

    #[test]
    fn first_activation_starts_at_full_weight() {
        let mut machine = machine();
        assert!(machine.request_state(IDLE_CLIP));
        assert_eq!(machine.weight(IDLE_CLIP), 1.0);
        assert_eq!(machine.weight(WALK_CLIP), 0.0);
        assert!(machine.transition().is_none());
    }

    #[test]
    fn repeated_request_is_a_no_op() {
        let mut machine = machine();
        machine.request_state(IDLE_CLIP);
        assert!(!machine.request_state(IDLE_CLIP));
        assert!(machine.previous().is_none());
    }

    #[test]
    fn unknown_clip_keeps_current_state() {
        let mut machine = machine();
        machine.request_state(IDLE_CLIP);
        assert_eq!(
            machine.try_request_state("dance"),
            Err(AnimationError::UnknownClip("dance".to_string()))
        );
        assert!(!machine.request_state("dance"));
        assert_eq!(machine.current(), Some(IDLE_CLIP));
        assert_eq!(machine.weight(IDLE_CLIP), 1.0);
    }

    #[test]
    fn crossfade_weights_sum_to_one_and_move_monotonically() {
        let mut machine = machine();
        machine.request_state(IDLE_CLIP);
        machine.request_state(WALK_CLIP);

        let mut last_idle = machine.weight(IDLE_CLIP);
        let mut last_walk = machine.weight(WALK_CLIP);
        assert!((last_idle + last_walk - 1.0).abs() < EPSILON);

        for _ in 0..40 {
            machine.advance(1.0 / 60.0);
            let idle = machine.weight(IDLE_CLIP);
            let walk = machine.weight(WALK_CLIP);
            assert!((idle + walk - 1.0).abs() < EPSILON);
            assert!(idle <= last_idle + EPSILON);
            assert!(walk + EPSILON >= last_walk);
            last_idle = idle;
            last_walk = walk;
        }

        assert!(machine.transition().is_none());
        assert_eq!(machine.weight(IDLE_CLIP), 0.0);
        assert_eq!(machine.weight(WALK_CLIP), 1.0);
    }

    #[test]
    fn blend_speed_does_not_depend_on_frame_count() {
        let mut coarse = machine();
        coarse.request_state(IDLE_CLIP);
        coarse.request_state(WALK_CLIP);
        coarse.advance(0.25);

        let mut fine = machine();
        fine.request_state(IDLE_CLIP);
        fine.request_state(WALK_CLIP);
        for _ in 0..25 {
            fine.advance(0.01);
        }

        assert!((coarse.weight(WALK_CLIP) - 0.5).abs() < EPSILON);
        assert!((fine.weight(WALK_CLIP) - coarse.weight(WALK_CLIP)).abs() < 1e-4);
    }

    #[test]
    fn interrupted_blend_converges_to_last_request() {
        let mut machine = machine();
        machine.request_state(IDLE_CLIP);
        machine.request_state(WALK_CLIP);
        machine.advance(0.1);
        machine.request_state(IDLE_CLIP);
        machine.advance(0.1);

        let idle = machine.weight(IDLE_CLIP);
        let walk = machine.weight(WALK_CLIP);
        assert!((idle + walk - 1.0).abs() < EPSILON);

        machine.advance(CROSSFADE_SECONDS);
        assert_eq!(machine.current(), Some(IDLE_CLIP));
        assert_eq!(machine.weight(IDLE_CLIP), 1.0);
        assert_eq!(machine.weight(WALK_CLIP), 0.0);
    }

    #[test]
    fn playback_time_scales_and_wraps() {
        let mut machine = AnimationStateMachine::new();
        machine.register_clip(
            WALK_CLIP,
            ClipSpec {
                time_scale: 1.5,
                looping: true,
                duration: Some(1.0),
            },
        );
        machine.request_state(WALK_CLIP);
        machine.advance(1.0);

        let time = machine.clip(WALK_CLIP).map(|clip| clip.time).unwrap_or(-1.0);
        assert!((time - 0.5).abs() < EPSILON);
    }
}
