use crate::ambience::Floater;
use bevy::prelude::*;

/// The single world camera driven by the session's camera rig.
#[derive(Component)]
pub struct BirthdayCamera;

/// Pooled firework spark; `0` indexes the engine's spark snapshot.
#[derive(Component, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct SparkSlot(pub usize);

#[derive(Component, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ExplosionLightSlot(pub usize);

#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct Cake;

#[derive(Component)]
pub struct CandleFlame;

#[derive(Component)]
pub struct Moon;

/// Directional light standing in for moonlight; shadow quality targets it.
#[derive(Component)]
pub struct MoonLight;

#[derive(Component)]
pub struct StarField;

/// Decoration drifting around a fixed anchor.
#[derive(Component, Clone, Copy, Debug)]
pub struct Floating(pub Floater);

#[derive(Component)]
pub struct Firefly;

#[derive(Component)]
pub struct RosePetal;

/// Pooled point light lent to one of the fireflies nearest the camera.
#[derive(Component, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct FireflyLightSlot(pub usize);
