//! Drifting scene decorations: fireflies and rose petals.
//!
//! Each decoration orbits its anchor on a small ellipse driven by the scene
//! clock, with a per-instance phase so the swarm never moves in lockstep.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Peak drift of a firefly from its anchor on each axis.
pub const FIREFLY_DRIFT: Vec3 = Vec3::new(0.2, 0.1, 0.2);
pub const PETAL_DRIFT: Vec3 = Vec3::new(0.1, 0.05, 0.1);
/// Twinkle cycles run this many times faster than the drift.
const TWINKLE_RATE: f32 = 5.0;
const TWINKLE_DEPTH: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbienceSettings {
    pub firefly_count: u32,
    pub petal_count: u32,
    /// Side of the square area decorations are scattered over, centred on the origin.
    pub spread: f32,
    pub firefly_max_height: f32,
    pub petal_max_height: f32,
}

impl Default for AmbienceSettings {
    fn default() -> Self {
        Self {
            firefly_count: 20,
            petal_count: 30,
            spread: 80.0,
            firefly_max_height: 10.0,
            petal_max_height: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floater {
    pub anchor: Vec3,
    /// Radians added to the clock so neighbours drift out of phase.
    pub phase: f32,
    pub amplitude: Vec3,
}

impl Floater {
    pub fn offset(&self, time: f32) -> Vec3 {
        let angle = time + self.phase;
        Vec3::new(
            angle.sin() * self.amplitude.x,
            angle.cos() * self.amplitude.y,
            angle.sin() * self.amplitude.z,
        )
    }

    pub fn position(&self, time: f32) -> Vec3 {
        self.anchor + self.offset(time)
    }

    /// Light multiplier in `[0.5, 1.5]`.
    pub fn twinkle(&self, time: f32) -> f32 {
        1.0 + (time * TWINKLE_RATE + self.phase).sin() * TWINKLE_DEPTH
    }
}

/// Scatter `count` floaters over a `spread`-wide square, up to `max_height`.
pub fn scatter<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    spread: f32,
    max_height: f32,
    amplitude: Vec3,
) -> Vec<Floater> {
    let half = if spread.is_finite() { spread.abs() / 2.0 } else { 0.0 };
    let height = if max_height.is_finite() { max_height.max(0.0) } else { 0.0 };

    (0..count)
        .map(|_| Floater {
            anchor: Vec3::new(
                rng.gen_range(-half..=half),
                rng.gen_range(0.0..=height),
                rng.gen_range(-half..=half),
            ),
            phase: rng.gen_range(0.0..TAU),
            amplitude,
        })
        .collect()
}

/// Random tumble for a petal lying about the ground.
pub fn petal_rotation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        rng.gen_range(0.0..PI),
        rng.gen_range(0.0..PI),
        rng.gen_range(0.0..PI),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn floater(phase: f32) -> Floater {
        Floater {
            anchor: Vec3::new(3.0, 4.0, -2.0),
            phase,
            amplitude: FIREFLY_DRIFT,
        }
    }

    #[test]
    fn drift_follows_the_phase_shifted_ellipse() {
        let at_rest = floater(0.0);
        assert!(at_rest.offset(0.0).abs_diff_eq(Vec3::new(0.0, 0.1, 0.0), EPSILON));

        let quarter = floater(FRAC_PI_2);
        assert!(quarter.offset(0.0).abs_diff_eq(Vec3::new(0.2, 0.0, 0.2), EPSILON));
        assert!(
            quarter
                .position(0.0)
                .abs_diff_eq(Vec3::new(3.2, 4.0, -1.8), EPSILON)
        );
    }

    #[test]
    fn drift_stays_within_amplitude() {
        let floater = floater(1.3);
        for step in 0..200 {
            let offset = floater.offset(step as f32 * 0.05);
            assert!(offset.abs().cmple(FIREFLY_DRIFT + EPSILON).all());
        }
    }

    #[test]
    fn twinkle_swings_around_full_brightness() {
        let floater = floater(0.0);
        assert!((floater.twinkle(0.0) - 1.0).abs() < EPSILON);
        assert!((floater.twinkle(FRAC_PI_2 / TWINKLE_RATE) - 1.5).abs() < EPSILON);
        for step in 0..200 {
            let value = floater.twinkle(step as f32 * 0.037);
            assert!((0.5 - EPSILON..=1.5 + EPSILON).contains(&value));
        }
    }

    #[test]
    fn scatter_keeps_anchors_inside_the_area() {
        let mut rng = StdRng::seed_from_u64(12);
        let floaters = scatter(&mut rng, 50, 80.0, 10.0, PETAL_DRIFT);
        assert_eq!(floaters.len(), 50);
        for floater in &floaters {
            assert!(floater.anchor.x.abs() <= 40.0 && floater.anchor.z.abs() <= 40.0);
            assert!((0.0..=10.0).contains(&floater.anchor.y));
            assert!((0.0..TAU).contains(&floater.phase));
            assert_eq!(floater.amplitude, PETAL_DRIFT);
        }
    }

    #[test]
    fn degenerate_area_collapses_to_the_origin() {
        let mut rng = StdRng::seed_from_u64(3);
        let floaters = scatter(&mut rng, 3, f32::NAN, -1.0, FIREFLY_DRIFT);
        assert!(floaters.iter().all(|floater| floater.anchor == Vec3::ZERO));
    }
}
