use bevy::prelude::*;

/// Opacity below which particles and ghosts are no longer drawn.
pub const VISIBILITY_THRESHOLD: f32 = 0.01;

/// Ground height; burst particles falling below it are retired.
pub const GROUND_LEVEL: f32 = 0.0;

/// Short-lived afterimage left behind a moving particle or shell.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailGhost {
    pub position: Vec3,
    pub opacity: f32,
    /// Per-tick opacity multiplier.
    pub fade_rate: f32,
    /// Seconds left before forced removal, when time-limited.
    pub time_to_live: Option<f32>,
}

impl TrailGhost {
    pub fn fading(position: Vec3, opacity: f32, fade_rate: f32) -> Self {
        Self {
            position,
            opacity,
            fade_rate,
            time_to_live: None,
        }
    }

    pub fn timed(position: Vec3, opacity: f32, time_to_live: f32) -> Self {
        Self {
            position,
            opacity,
            fade_rate: 1.0,
            time_to_live: Some(time_to_live),
        }
    }

    /// Age the ghost by one tick; returns `false` once it should be dropped.
    pub fn step(&mut self, dt: f32) -> bool {
        self.opacity *= self.fade_rate;
        if let Some(remaining) = self.time_to_live.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                return false;
            }
        }
        self.opacity >= VISIBILITY_THRESHOLD
    }
}

/// Drop expired ghosts after stepping every one of them.
pub fn step_ghosts(ghosts: &mut Vec<TrailGhost>, dt: f32) {
    ghosts.retain_mut(|ghost| ghost.step(dt));
}

/// Periodic ghost emission attached to a trailing particle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailEmitter {
    pub timer: f32,
    pub interval: f32,
    pub emitted: u32,
    pub max_emitted: u32,
    pub ghost_opacity: f32,
    pub ghost_fade_rate: f32,
    pub ghosts: Vec<TrailGhost>,
}

impl TrailEmitter {
    pub fn new(interval: f32, max_emitted: u32, ghost_opacity: f32, ghost_fade_rate: f32) -> Self {
        Self {
            timer: 0.0,
            interval,
            emitted: 0,
            max_emitted,
            ghost_opacity,
            ghost_fade_rate,
            ghosts: Vec::new(),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.emitted >= self.max_emitted
    }

    fn step(&mut self, position: Vec3, dt: f32) {
        self.timer += dt;
        if self.timer > self.interval && !self.exhausted() {
            self.ghosts.push(TrailGhost::fading(
                position,
                self.ghost_opacity,
                self.ghost_fade_rate,
            ));
            self.timer = 0.0;
            self.emitted += 1;
        }
        step_ghosts(&mut self.ghosts, dt);
    }
}

/// One spark produced when a shell explodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstParticle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Added to the velocity once per tick.
    pub gravity: Vec3,
    /// Per-tick opacity multiplier in `(0, 1)`.
    pub fade_rate: f32,
    pub opacity: f32,
    /// Packed `0xRRGGBB`.
    pub color: u32,
    pub trail: Option<TrailEmitter>,
}

impl BurstParticle {
    /// Integrate one tick. Returns `false` when the particle should retire.
    pub fn step(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.velocity += self.gravity;

        if let Some(trail) = self.trail.as_mut() {
            trail.step(self.position, dt);
        }

        self.opacity *= self.fade_rate;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.opacity >= VISIBILITY_THRESHOLD && self.position.y >= GROUND_LEVEL
    }

    pub fn ghosts(&self) -> &[TrailGhost] {
        self.trail
            .as_ref()
            .map(|trail| trail.ghosts.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(fade_rate: f32) -> BurstParticle {
        BurstParticle {
            position: Vec3::new(0.0, 30.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            gravity: Vec3::new(0.0, -0.2, 0.0),
            fade_rate,
            opacity: 1.0,
            color: 0xffffff,
            trail: None,
        }
    }

    #[test]
    fn opacity_follows_fade_rate_each_step() {
        for dt in [0.0, 0.016, 0.1, 1.0] {
            let mut spark = particle(0.98);
            let before = spark.opacity;
            spark.step(dt);
            assert!((spark.opacity - before * 0.98).abs() < 1e-6);
        }
    }

    #[test]
    fn opacity_never_increases() {
        let mut spark = particle(0.97);
        let mut last = spark.opacity;
        while spark.step(1.0 / 60.0) {
            assert!(spark.opacity <= last);
            last = spark.opacity;
        }
        assert!(spark.opacity < VISIBILITY_THRESHOLD || spark.position.y < GROUND_LEVEL);
    }

    #[test]
    fn gravity_is_applied_per_tick() {
        let mut spark = particle(0.99);
        spark.step(0.5);
        assert_eq!(spark.position, Vec3::new(0.5, 30.0, 0.0));
        assert_eq!(spark.velocity, Vec3::new(1.0, -0.2, 0.0));
    }

    #[test]
    fn falling_below_ground_retires() {
        let mut spark = particle(0.99);
        spark.position.y = 0.05;
        spark.velocity = Vec3::new(0.0, -1.0, 0.0);
        assert!(!spark.step(0.1));
    }

    #[test]
    fn trail_emits_up_to_its_budget() {
        let mut spark = particle(0.999);
        spark.trail = Some(TrailEmitter::new(0.05, 3, 0.7, 0.92));

        for _ in 0..20 {
            spark.step(0.06);
        }

        let trail = spark.trail.as_ref().expect("trail");
        assert_eq!(trail.emitted, 3);
        assert!(trail.exhausted());
        assert!(spark.ghosts().len() <= 3);
    }

    #[test]
    fn ghosts_fade_out_and_disappear() {
        let mut ghosts = vec![TrailGhost::fading(Vec3::ZERO, 0.7, 0.92)];
        let mut steps = 0;
        while !ghosts.is_empty() {
            step_ghosts(&mut ghosts, 1.0 / 60.0);
            steps += 1;
            assert!(steps < 1_000);
        }
        // 0.7 * 0.92^n < 0.01 first holds at n = 51.
        assert_eq!(steps, 51);
    }

    #[test]
    fn timed_ghost_expires_by_clock() {
        let mut ghosts = vec![TrailGhost::timed(Vec3::ZERO, 0.7, 0.8)];
        step_ghosts(&mut ghosts, 0.5);
        assert_eq!(ghosts.len(), 1);
        assert_eq!(ghosts[0].opacity, 0.7);
        step_ghosts(&mut ghosts, 0.5);
        assert!(ghosts.is_empty());
    }
}
