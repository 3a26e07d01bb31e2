use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tunables for shells, bursts and trails. Ranges are inclusive `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkSettings {
    /// Downward acceleration on rising shells (units/s²).
    pub gravity: f32,
    /// A rising shell whose vertical speed drops below this explodes early.
    pub stall_velocity: f32,
    /// Planar distance of launch sites from the anchor.
    pub anchor_radius: [f32; 2],
    pub launch_speed: [f32; 2],
    pub explosion_height_base: f32,
    /// Two independent draws from this range are added to the base height.
    pub explosion_height_jitter: [f32; 2],
    pub shell_trail_chance: f32,
    pub shell_trail_opacity: f32,
    /// Seconds a shell trail ghost stays visible.
    pub shell_trail_lifetime: f32,
    pub particle_count: [u32; 2],
    pub white_spark_chance: f32,
    pub complementary_spark_chance: f32,
    /// Per-tick downward velocity added to burst particles.
    pub particle_gravity: [f32; 2],
    /// Per-tick opacity multiplier for burst particles.
    pub fade_rate: [f32; 2],
    pub trail_chance: f32,
    pub trail_interval: f32,
    pub trail_max_ghosts: [u32; 2],
    pub trail_ghost_opacity: f32,
    pub trail_ghost_fade_rate: f32,
    pub light_intensity: f32,
    pub light_decay: f32,
    pub light_threshold: f32,
}

impl Default for FireworkSettings {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            stall_velocity: 0.5,
            anchor_radius: [30.0, 70.0],
            launch_speed: [15.0, 22.0],
            explosion_height_base: 15.0,
            explosion_height_jitter: [0.0, 20.0],
            shell_trail_chance: 0.3,
            shell_trail_opacity: 0.7,
            shell_trail_lifetime: 0.8,
            particle_count: [150, 299],
            white_spark_chance: 0.3,
            complementary_spark_chance: 0.2,
            particle_gravity: [0.15, 0.25],
            fade_rate: [0.97, 0.99],
            trail_chance: 0.3,
            trail_interval: 0.05,
            trail_max_ghosts: [5, 14],
            trail_ghost_opacity: 0.7,
            trail_ghost_fade_rate: 0.92,
            light_intensity: 8.0,
            light_decay: 0.95,
            light_threshold: 0.1,
        }
    }
}

impl FireworkSettings {
    /// Replace non-finite values (e.g. `.nan` or `.inf` in YAML) with defaults.
    pub fn sanitized(self) -> Self {
        let fallback = Self::default();
        Self {
            gravity: finite_or(self.gravity, fallback.gravity),
            stall_velocity: finite_or(self.stall_velocity, fallback.stall_velocity),
            anchor_radius: finite_range_or(self.anchor_radius, fallback.anchor_radius),
            launch_speed: finite_range_or(self.launch_speed, fallback.launch_speed),
            explosion_height_base: finite_or(
                self.explosion_height_base,
                fallback.explosion_height_base,
            ),
            explosion_height_jitter: finite_range_or(
                self.explosion_height_jitter,
                fallback.explosion_height_jitter,
            ),
            shell_trail_chance: finite_or(self.shell_trail_chance, fallback.shell_trail_chance),
            shell_trail_opacity: finite_or(self.shell_trail_opacity, fallback.shell_trail_opacity),
            shell_trail_lifetime: finite_or(
                self.shell_trail_lifetime,
                fallback.shell_trail_lifetime,
            ),
            particle_count: self.particle_count,
            white_spark_chance: finite_or(self.white_spark_chance, fallback.white_spark_chance),
            complementary_spark_chance: finite_or(
                self.complementary_spark_chance,
                fallback.complementary_spark_chance,
            ),
            particle_gravity: finite_range_or(self.particle_gravity, fallback.particle_gravity),
            fade_rate: finite_range_or(self.fade_rate, fallback.fade_rate),
            trail_chance: finite_or(self.trail_chance, fallback.trail_chance),
            trail_interval: finite_or(self.trail_interval, fallback.trail_interval),
            trail_max_ghosts: self.trail_max_ghosts,
            trail_ghost_opacity: finite_or(self.trail_ghost_opacity, fallback.trail_ghost_opacity),
            trail_ghost_fade_rate: finite_or(
                self.trail_ghost_fade_rate,
                fallback.trail_ghost_fade_rate,
            ),
            light_intensity: finite_or(self.light_intensity, fallback.light_intensity),
            light_decay: finite_or(self.light_decay, fallback.light_decay),
            light_threshold: finite_or(self.light_threshold, fallback.light_threshold),
        }
    }
}

pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

pub(crate) fn finite_range_or(range: [f32; 2], fallback: [f32; 2]) -> [f32; 2] {
    if range.iter().all(|bound| bound.is_finite()) {
        range
    } else {
        fallback
    }
}

/// Uniform draw from an inclusive range; reversed or degenerate ranges are tolerated.
///
/// A non-finite bound collapses the range onto the other bound (or zero).
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    let (low, high) = match (range[0].is_finite(), range[1].is_finite()) {
        (true, true) => ordered(range[0], range[1]),
        (true, false) => (range[0], range[0]),
        (false, true) => (range[1], range[1]),
        (false, false) => (0.0, 0.0),
    };
    if low == high {
        return low;
    }
    if !(high - low).is_finite() {
        return low / 2.0 + high / 2.0;
    }
    rng.gen_range(low..=high)
}

pub fn sample_count<R: Rng + ?Sized>(rng: &mut R, range: [u32; 2]) -> u32 {
    let (low, high) = if range[0] <= range[1] {
        (range[0], range[1])
    } else {
        (range[1], range[0])
    };
    rng.gen_range(low..=high)
}

/// Bernoulli draw; the probability is clamped to `[0, 1]` and NaN never hits.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0) as f64)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
