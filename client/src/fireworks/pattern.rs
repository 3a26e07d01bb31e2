//! Closed-form burst velocity for each explosion pattern.

use birthday_common::ExplosionPattern;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Angular step between consecutive spiral particles (radians).
const SPIRAL_ANGLE_STEP: f32 = 0.15;

/// Initial velocity of particle `index` out of `total` in a burst.
pub fn burst_velocity<R: Rng + ?Sized>(
    pattern: ExplosionPattern,
    index: usize,
    total: usize,
    rng: &mut R,
) -> Vec3 {
    let (speed_min, speed_max) = pattern.speed_range();
    let speed = rng.gen_range(speed_min..=speed_max);
    let theta = rng.gen_range(0.0..TAU);

    match pattern {
        ExplosionPattern::Sphere => {
            let phi = rng.gen_range(0.0..=PI);
            Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()) * speed
        }
        ExplosionPattern::Ring => {
            let lift: f32 = rng.gen_range(-0.25..=0.25);
            Vec3::new(theta.cos(), lift, theta.sin()) * speed
        }
        ExplosionPattern::DoubleRing => {
            let tilt: f32 = rng.gen_range(0.1..=0.5);
            let lift = if rng.gen_bool(0.5) { tilt } else { -tilt };
            Vec3::new(theta.cos(), lift, theta.sin()) * speed
        }
        ExplosionPattern::Heart => {
            let (scale_min, scale_max) = pattern.speed_scale_range();
            let scale = rng.gen_range(scale_min..=scale_max);
            let depth: f32 = rng.gen_range(-1.0..=1.0);
            heart_direction(theta, depth) * speed * scale
        }
        ExplosionPattern::Spiral => spiral_direction(index, total) * speed,
    }
}

/// Normalized heart-curve direction at parameter `t` with some z depth.
pub fn heart_direction(t: f32, depth: f32) -> Vec3 {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    Vec3::new(x, y, depth).try_normalize().unwrap_or(Vec3::Y)
}

/// Normalized helix direction: angle grows with index, particles rise with it.
pub fn spiral_direction(index: usize, total: usize) -> Vec3 {
    let total = total.max(1) as f32;
    let fraction = index as f32 / total;
    let angle = index as f32 * SPIRAL_ANGLE_STEP;
    Vec3::new(
        angle.cos() * (1.0 + fraction),
        fraction * 2.0,
        angle.sin() * (1.0 + fraction),
    )
    .try_normalize()
    .unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TOLERANCE: f32 = 1e-3;

    /// Rings carry their lift on top of the base speed, so only their
    /// horizontal component is bound by the speed range.
    fn bounded_speed(pattern: ExplosionPattern, velocity: Vec3) -> f32 {
        match pattern {
            ExplosionPattern::Ring | ExplosionPattern::DoubleRing => {
                Vec2::new(velocity.x, velocity.z).length()
            }
            _ => velocity.length(),
        }
    }

    fn assert_within_bounds(pattern: ExplosionPattern, velocity: Vec3) {
        let (low, high) = pattern.effective_speed_bounds();
        let speed = bounded_speed(pattern, velocity);
        assert!(velocity.is_finite(), "{pattern:?} produced {velocity:?}");
        assert!(velocity.length() > 0.0, "{pattern:?} produced a zero vector");
        assert!(
            speed >= low - TOLERANCE && speed <= high + TOLERANCE,
            "{pattern:?} speed {speed} outside [{low}, {high}]"
        );
    }

    #[test]
    fn heart_samples_are_finite_and_within_speed_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for index in 0..100 {
            let velocity = burst_velocity(ExplosionPattern::Heart, index, 100, &mut rng);
            assert_within_bounds(ExplosionPattern::Heart, velocity);
        }
    }

    #[test]
    fn heart_direction_is_unit_for_every_theta() {
        for step in 0..3600 {
            let theta = step as f32 / 3600.0 * TAU;
            for depth in [-1.0, 0.0, 1.0] {
                let direction = heart_direction(theta, depth);
                assert!(direction.is_finite());
                assert!((direction.length() - 1.0).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn every_pattern_respects_its_speed_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for pattern in ExplosionPattern::ALL {
            for index in 0..200 {
                let velocity = burst_velocity(*pattern, index, 200, &mut rng);
                assert_within_bounds(*pattern, velocity);
            }
        }
    }

    #[test]
    fn ring_stays_flat_and_double_ring_splits() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut upper = 0;
        let mut lower = 0;
        for index in 0..200 {
            let ring = burst_velocity(ExplosionPattern::Ring, index, 200, &mut rng);
            assert!(ring.y.abs() <= 0.25 * 12.0 + TOLERANCE);

            let double = burst_velocity(ExplosionPattern::DoubleRing, index, 200, &mut rng);
            assert!(double.y.abs() >= 0.1 * 8.0 - TOLERANCE);
            if double.y > 0.0 {
                upper += 1;
            } else {
                lower += 1;
            }
        }
        assert!(upper > 0 && lower > 0);
    }

    #[test]
    fn spiral_rises_with_index() {
        let first = spiral_direction(0, 100);
        let last = spiral_direction(99, 100);
        assert_eq!(first.y, 0.0);
        assert!(last.y > first.y);
    }
}
