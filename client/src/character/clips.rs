use super::crossfade::{AnimationStateMachine, ClipSpec, IDLE_CLIP, WALK_CLIP};

const IDLE_KEYWORDS: [&str; 5] = ["idle", "stand", "wait", "stationary", "rest"];
const WALK_KEYWORDS: [&str; 6] = ["walk", "run", "move", "pace", "stride", "jog"];

/// Playback speed of the walk role when it has to reuse the idle clip.
pub const REUSED_WALK_TIME_SCALE: f32 = 1.5;

/// Looping vertical bob used when the model ships without animations.
///
/// Keyframes are `0 -> amplitude -> 0` over `period` seconds, sampled
/// piecewise-linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProceduralBob {
    pub amplitude: f32,
    pub period: f32,
}

impl ProceduralBob {
    pub const IDLE: Self = Self {
        amplitude: 0.1,
        period: 2.0,
    };
    pub const WALK: Self = Self {
        amplitude: 0.2,
        period: 1.0,
    };

    pub fn sample(&self, time: f32) -> f32 {
        if self.period <= 0.0 {
            return 0.0;
        }
        let phase = time.rem_euclid(self.period) / self.period;
        let ramp = if phase < 0.5 {
            phase * 2.0
        } else {
            (1.0 - phase) * 2.0
        };
        self.amplitude * ramp
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipSource {
    /// Index into the loaded model's animation list.
    Asset(usize),
    Procedural(ProceduralBob),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBinding {
    pub source: ClipSource,
    pub time_scale: f32,
}

impl ClipBinding {
    fn asset(index: usize) -> Self {
        Self {
            source: ClipSource::Asset(index),
            time_scale: 1.0,
        }
    }

    fn procedural(bob: ProceduralBob) -> Self {
        Self {
            source: ClipSource::Procedural(bob),
            time_scale: 1.0,
        }
    }

    fn spec(&self, duration: Option<f32>) -> ClipSpec {
        let duration = match self.source {
            ClipSource::Procedural(bob) => Some(bob.period),
            ClipSource::Asset(_) => duration,
        };
        ClipSpec {
            time_scale: self.time_scale,
            looping: true,
            duration,
        }
    }
}

/// The two roles the character state machine needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRoles {
    pub idle: ClipBinding,
    pub walk: ClipBinding,
}

impl ClipRoles {
    pub fn procedural() -> Self {
        Self {
            idle: ClipBinding::procedural(ProceduralBob::IDLE),
            walk: ClipBinding::procedural(ProceduralBob::WALK),
        }
    }

    pub fn binding(&self, role: &str) -> Option<&ClipBinding> {
        match role {
            IDLE_CLIP => Some(&self.idle),
            WALK_CLIP => Some(&self.walk),
            _ => None,
        }
    }

    /// Register both roles; `durations` holds clip lengths by asset index.
    pub fn register(&self, machine: &mut AnimationStateMachine, durations: &[f32]) {
        for (role, binding) in [(IDLE_CLIP, &self.idle), (WALK_CLIP, &self.walk)] {
            let duration = match binding.source {
                ClipSource::Asset(index) => durations.get(index).copied(),
                ClipSource::Procedural(_) => None,
            };
            machine.register_clip(role, binding.spec(duration));
        }
    }
}

/// Map a loaded motion set onto the idle/walk roles.
///
/// Names are matched case-insensitively against keyword families; without a
/// match the first clip becomes idle and the second (or a faster copy of the
/// first) becomes walk. An empty set yields procedural bobs.
pub fn select_clip_roles<S: AsRef<str>>(names: &[S]) -> ClipRoles {
    if names.is_empty() {
        return ClipRoles::procedural();
    }

    let idle = find_by_keywords(names, &IDLE_KEYWORDS)
        .map(ClipBinding::asset)
        .unwrap_or_else(|| ClipBinding::asset(0));

    let walk = match find_by_keywords(names, &WALK_KEYWORDS) {
        Some(index) => ClipBinding::asset(index),
        None if names.len() > 1 => ClipBinding::asset(1),
        None => ClipBinding {
            source: ClipSource::Asset(0),
            time_scale: REUSED_WALK_TIME_SCALE,
        },
    };

    ClipRoles { idle, walk }
}

fn find_by_keywords<S: AsRef<str>>(names: &[S], keywords: &[&str]) -> Option<usize> {
    names.iter().position(|name| {
        let lowered = name.as_ref().to_lowercase();
        keywords.iter().any(|keyword| lowered.contains(keyword))
    })
}
