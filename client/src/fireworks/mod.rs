pub mod engine;
pub mod firework;
pub mod particle;
pub mod pattern;
pub mod settings;
pub mod show;

pub use engine::{ExplosionLight, FireworkEngine, SparkKind, SparkVisual};
pub use firework::{Firework, FireworkEvent, FireworkId, FireworkPhase};
pub use particle::{BurstParticle, TrailEmitter, TrailGhost};
pub use settings::FireworkSettings;
pub use show::{CelebrationShow, ShowSettings, ShowTask};
