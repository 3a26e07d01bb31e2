use super::particle::{BurstParticle, TrailEmitter, TrailGhost, step_ghosts};
use super::pattern::burst_velocity;
use super::settings::{FireworkSettings, chance, sample_count, sample_range};
use birthday_common::{ExplosionPattern, WHITE, complementary_color};
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FireworkId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireworkPhase {
    /// Shell rising toward its explosion height.
    Ascending,
    /// Burst particles (and possibly the flash light) are still alive.
    Exploded,
    /// Nothing left to draw; dropped from the active set.
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireworkEvent {
    Exploded {
        id: FireworkId,
        position: Vec3,
        color: u32,
        pattern: ExplosionPattern,
        particles: usize,
    },
    Retired {
        id: FireworkId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Firework {
    pub id: FireworkId,
    pub phase: FireworkPhase,
    pub position: Vec3,
    pub velocity: Vec3,
    pub explosion_height: f32,
    pub color: u32,
    pub pattern: ExplosionPattern,
    /// Engine clock (seconds) at launch.
    pub created_at: f32,
    pub particles: Vec<BurstParticle>,
    /// Ghosts dropped by the rising shell.
    pub shell_trail: Vec<TrailGhost>,
    /// Flash light intensity after the explosion, until it decays away.
    pub light_intensity: Option<f32>,
}

impl Firework {
    pub fn is_ascending(&self) -> bool {
        self.phase == FireworkPhase::Ascending
    }

    pub fn is_retired(&self) -> bool {
        self.phase == FireworkPhase::Retired
    }

    /// Advance one tick.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        settings: &FireworkSettings,
        rng: &mut R,
    ) -> Option<FireworkEvent> {
        match self.phase {
            FireworkPhase::Ascending => self.step_ascending(dt, settings, rng),
            FireworkPhase::Exploded => self.step_exploded(dt, settings),
            FireworkPhase::Retired => None,
        }
    }

    fn step_ascending<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        settings: &FireworkSettings,
        rng: &mut R,
    ) -> Option<FireworkEvent> {
        self.position += self.velocity * dt;
        self.velocity.y -= settings.gravity * dt;

        step_ghosts(&mut self.shell_trail, dt);
        if chance(rng, settings.shell_trail_chance) {
            self.shell_trail.push(TrailGhost::timed(
                self.position,
                settings.shell_trail_opacity,
                settings.shell_trail_lifetime,
            ));
        }

        if self.position.y >= self.explosion_height || self.velocity.y < settings.stall_velocity {
            return Some(self.explode(settings, rng));
        }
        None
    }

    fn step_exploded(&mut self, dt: f32, settings: &FireworkSettings) -> Option<FireworkEvent> {
        self.particles.retain_mut(|particle| particle.step(dt));
        step_ghosts(&mut self.shell_trail, dt);

        if let Some(intensity) = self.light_intensity {
            let decayed = intensity * settings.light_decay;
            self.light_intensity = (decayed >= settings.light_threshold).then_some(decayed);
        }

        if self.particles.is_empty() && self.light_intensity.is_none() {
            self.phase = FireworkPhase::Retired;
            self.shell_trail.clear();
            return Some(FireworkEvent::Retired { id: self.id });
        }
        None
    }

    /// Switch to the exploded phase and spawn the burst. Runs once per shell.
    fn explode<R: Rng + ?Sized>(&mut self, settings: &FireworkSettings, rng: &mut R) -> FireworkEvent {
        let count = sample_count(rng, settings.particle_count) as usize;
        self.particles.reserve(count);

        for index in 0..count {
            let trail = chance(rng, settings.trail_chance).then(|| {
                TrailEmitter::new(
                    settings.trail_interval,
                    sample_count(rng, settings.trail_max_ghosts),
                    settings.trail_ghost_opacity,
                    settings.trail_ghost_fade_rate,
                )
            });

            self.particles.push(BurstParticle {
                position: self.position,
                velocity: burst_velocity(self.pattern, index, count, rng),
                gravity: Vec3::new(0.0, -sample_range(rng, settings.particle_gravity), 0.0),
                fade_rate: sample_range(rng, settings.fade_rate).clamp(0.0, 1.0),
                opacity: 1.0,
                color: spark_color(self.color, settings, rng),
                trail,
            });
        }

        self.light_intensity = Some(settings.light_intensity);
        self.phase = FireworkPhase::Exploded;

        FireworkEvent::Exploded {
            id: self.id,
            position: self.position,
            color: self.color,
            pattern: self.pattern,
            particles: count,
        }
    }
}

/// White sparks for contrast, occasionally the complement, otherwise the shell color.
fn spark_color<R: Rng + ?Sized>(color: u32, settings: &FireworkSettings, rng: &mut R) -> u32 {
    if chance(rng, settings.white_spark_chance) {
        WHITE
    } else if chance(rng, settings.complementary_spark_chance) {
        complementary_color(color)
    } else {
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shell(velocity_y: f32, explosion_height: f32) -> Firework {
        Firework {
            id: FireworkId(1),
            phase: FireworkPhase::Ascending,
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, velocity_y, 0.0),
            explosion_height,
            color: 0xff1a1a,
            pattern: ExplosionPattern::Sphere,
            created_at: 0.0,
            particles: Vec::new(),
            shell_trail: Vec::new(),
            light_intensity: None,
        }
    }

    fn run_until_exploded(firework: &mut Firework, rng: &mut StdRng) -> usize {
        let settings = FireworkSettings::default();
        for tick in 1..=10_000 {
            if let Some(FireworkEvent::Exploded { .. }) = firework.step(1.0 / 60.0, &settings, rng) {
                return tick;
            }
        }
        panic!("shell never exploded");
    }

    #[test]
    fn shell_explodes_at_target_height() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut firework = shell(20.0, 10.0);
        run_until_exploded(&mut firework, &mut rng);

        assert_eq!(firework.phase, FireworkPhase::Exploded);
        assert!(firework.position.y >= 10.0);
        assert!((150..300).contains(&firework.particles.len()));
        assert_eq!(firework.light_intensity, Some(8.0));
    }

    #[test]
    fn underpowered_shell_still_explodes_when_it_stalls() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut firework = shell(3.0, 1_000.0);
        let ticks = run_until_exploded(&mut firework, &mut rng);

        assert!(ticks < 60);
        assert!(firework.position.y < 1_000.0);
        assert!(firework.velocity.y < FireworkSettings::default().stall_velocity);
    }

    #[test]
    fn exploded_firework_retires_once_sparks_and_light_are_gone() {
        let settings = FireworkSettings::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut firework = shell(20.0, 5.0);
        run_until_exploded(&mut firework, &mut rng);

        let mut retired = false;
        for _ in 0..5_000 {
            if let Some(FireworkEvent::Retired { id }) = firework.step(1.0 / 60.0, &settings, &mut rng) {
                assert_eq!(id, FireworkId(1));
                retired = true;
                break;
            }
            assert_eq!(firework.phase, FireworkPhase::Exploded);
        }

        assert!(retired);
        assert!(firework.is_retired());
        assert!(firework.particles.is_empty());
        assert!(firework.light_intensity.is_none());
        assert_eq!(firework.step(1.0 / 60.0, &settings, &mut rng), None);
    }

    #[test]
    fn burst_particles_start_at_shell_with_configured_decay() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut firework = shell(20.0, 5.0);
        run_until_exploded(&mut firework, &mut rng);

        for particle in &firework.particles {
            assert_eq!(particle.position, firework.position);
            assert!(particle.fade_rate >= 0.97 && particle.fade_rate <= 0.99);
            assert!(particle.gravity.y <= -0.15 && particle.gravity.y >= -0.25);
            assert_eq!(particle.opacity, 1.0);
        }
    }
}
