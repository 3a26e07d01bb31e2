use super::firework::{Firework, FireworkEvent, FireworkId, FireworkPhase};
use super::settings::{FireworkSettings, sample_range};
use birthday_common::{ExplosionPattern, FIREWORK_PALETTE};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparkKind {
    Shell,
    Burst,
    Ghost,
}

/// Renderable point produced by the engine each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkVisual {
    pub kind: SparkKind,
    pub position: Vec3,
    pub opacity: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionLight {
    pub firework: FireworkId,
    pub position: Vec3,
    pub color: u32,
    pub intensity: f32,
}

/// Owns every active firework and the randomness that drives them.
pub struct FireworkEngine {
    settings: FireworkSettings,
    anchor: Vec3,
    fireworks: Vec<Firework>,
    next_id: u64,
    clock: f32,
    rng: StdRng,
}

impl FireworkEngine {
    pub fn new(settings: FireworkSettings, anchor: Vec3) -> Self {
        Self::with_rng(settings, anchor, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and replays.
    pub fn with_seed(settings: FireworkSettings, anchor: Vec3, seed: u64) -> Self {
        Self::with_rng(settings, anchor, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: FireworkSettings, anchor: Vec3, rng: StdRng) -> Self {
        Self {
            settings: settings.sanitized(),
            anchor,
            fireworks: Vec::new(),
            next_id: 1,
            clock: 0.0,
            rng,
        }
    }

    pub fn settings(&self) -> &FireworkSettings {
        &self.settings
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn is_idle(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn ascending_count(&self) -> usize {
        self.fireworks.iter().filter(|firework| firework.is_ascending()).count()
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|firework| firework.particles.len()).sum()
    }

    /// Launch a shell with a random pattern.
    pub fn spawn(&mut self) -> FireworkId {
        let index = self.rng.gen_range(0..ExplosionPattern::ALL.len());
        self.spawn_pattern(ExplosionPattern::ALL[index])
    }

    /// Launch a shell from a random site around the anchor.
    pub fn spawn_pattern(&mut self, pattern: ExplosionPattern) -> FireworkId {
        let settings = &self.settings;
        let rng = &mut self.rng;

        let color = FIREWORK_PALETTE[rng.gen_range(0..FIREWORK_PALETTE.len())];
        let angle = rng.gen_range(0.0..TAU);
        let radius = sample_range(rng, settings.anchor_radius);
        let launch_speed = sample_range(rng, settings.launch_speed);
        let explosion_height = settings.explosion_height_base
            + sample_range(rng, settings.explosion_height_jitter)
            + sample_range(rng, settings.explosion_height_jitter);

        let id = FireworkId(self.next_id);
        self.next_id += 1;

        let position = Vec3::new(
            self.anchor.x + angle.cos() * radius,
            0.0,
            self.anchor.z + angle.sin() * radius,
        );

        debug!(
            "Launching firework {:?}: pattern={} height={:.1}",
            id,
            pattern.name(),
            explosion_height
        );

        self.fireworks.push(Firework {
            id,
            phase: FireworkPhase::Ascending,
            position,
            velocity: Vec3::new(0.0, launch_speed, 0.0),
            explosion_height,
            color,
            pattern,
            created_at: self.clock,
            particles: Vec::new(),
            shell_trail: Vec::new(),
            light_intensity: None,
        });
        id
    }

    /// Integrate every firework by one tick and drop the retired ones.
    pub fn update(&mut self, dt: f32) -> Vec<FireworkEvent> {
        self.clock += dt;

        let mut events = Vec::new();
        for firework in &mut self.fireworks {
            if let Some(event) = firework.step(dt, &self.settings, &mut self.rng) {
                events.push(event);
            }
        }
        self.fireworks.retain(|firework| !firework.is_retired());
        events
    }

    pub fn clear(&mut self) {
        self.fireworks.clear();
    }

    pub fn sparks(&self) -> impl Iterator<Item = SparkVisual> + '_ {
        self.fireworks.iter().flat_map(firework_sparks)
    }

    pub fn lights(&self) -> impl Iterator<Item = ExplosionLight> + '_ {
        self.fireworks.iter().filter_map(|firework| {
            firework.light_intensity.map(|intensity| ExplosionLight {
                firework: firework.id,
                position: firework.position,
                color: firework.color,
                intensity,
            })
        })
    }
}

fn firework_sparks(firework: &Firework) -> impl Iterator<Item = SparkVisual> + '_ {
    let shell = firework.is_ascending().then_some(SparkVisual {
        kind: SparkKind::Shell,
        position: firework.position,
        opacity: 1.0,
        color: firework.color,
    });

    let shell_trail = firework.shell_trail.iter().map(move |ghost| SparkVisual {
        kind: SparkKind::Ghost,
        position: ghost.position,
        opacity: ghost.opacity,
        color: firework.color,
    });

    let bursts = firework.particles.iter().flat_map(|particle| {
        let spark = SparkVisual {
            kind: SparkKind::Burst,
            position: particle.position,
            opacity: particle.opacity,
            color: particle.color,
        };
        std::iter::once(spark).chain(particle.ghosts().iter().map(move |ghost| SparkVisual {
            kind: SparkKind::Ghost,
            position: ghost.position,
            opacity: ghost.opacity,
            color: particle.color,
        }))
    });

    shell.into_iter().chain(shell_trail).chain(bursts)
}
