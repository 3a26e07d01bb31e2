//! Birthday Scene Shared Definitions
//!
//! Plain data shared by the simulation and the renderer: the closed set of
//! firework explosion patterns (with their launch speed ranges) and the
//! firework color palette.
//!
//! Colors are packed `0xRRGGBB` integers so this crate stays dependency-free.

/// Explosion shape chosen for a firework when it is launched.
///
/// Discriminants are the stable pattern ids used in logs and settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExplosionPattern {
    /// Uniform spherical burst
    Sphere = 0,

    /// Flat horizontal ring
    Ring = 1,

    /// Two rings, one tilted up and one tilted down
    DoubleRing = 2,

    /// Parametric heart curve in the vertical plane
    Heart = 3,

    /// Particles fan out helically and rise with their index
    Spiral = 4,
}

impl ExplosionPattern {
    pub const ALL: &'static [ExplosionPattern] = &[
        ExplosionPattern::Sphere,
        ExplosionPattern::Ring,
        ExplosionPattern::DoubleRing,
        ExplosionPattern::Heart,
        ExplosionPattern::Spiral,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|pattern| pattern.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExplosionPattern::Sphere => "Sphere",
            ExplosionPattern::Ring => "Ring",
            ExplosionPattern::DoubleRing => "DoubleRing",
            ExplosionPattern::Heart => "Heart",
            ExplosionPattern::Spiral => "Spiral",
        }
    }

    /// Base burst speed range `(min, max)` for particles of this pattern.
    ///
    /// The heart pattern additionally scales each particle by `[0.5, 1.0]`,
    /// see [`ExplosionPattern::speed_scale_range`].
    pub fn speed_range(&self) -> (f32, f32) {
        match self {
            ExplosionPattern::Sphere => (7.0, 12.0),
            ExplosionPattern::Ring | ExplosionPattern::DoubleRing => (8.0, 12.0),
            ExplosionPattern::Heart => (7.0, 10.0),
            ExplosionPattern::Spiral => (6.0, 10.0),
        }
    }

    /// Per-particle multiplier applied on top of the base speed.
    pub fn speed_scale_range(&self) -> (f32, f32) {
        match self {
            ExplosionPattern::Heart => (0.5, 1.0),
            _ => (1.0, 1.0),
        }
    }

    /// Smallest and largest speed a burst particle of this pattern can have.
    pub fn effective_speed_bounds(&self) -> (f32, f32) {
        let (speed_min, speed_max) = self.speed_range();
        let (scale_min, scale_max) = self.speed_scale_range();
        (speed_min * scale_min, speed_max * scale_max)
    }
}

/// Bright night-sky colors a firework shell can take.
pub const FIREWORK_PALETTE: [u32; 12] = [
    0xff1a1a, // red
    0x33ff33, // green
    0x3333ff, // blue
    0xffff00, // yellow
    0xff33ff, // magenta
    0x00ffff, // cyan
    0xff9900, // orange
    0xff66b2, // pink
    0x9900ff, // purple
    0xffdd00, // gold
    0x00ff99, // mint
    0xee82ee, // violet
];

pub const WHITE: u32 = 0xffffff;

/// Complement of a packed color (`0xFFFFFF - color`).
pub fn complementary_color(color: u32) -> u32 {
    WHITE - (color & WHITE)
}

/// Unpack `0xRRGGBB` into linear-agnostic `[r, g, b]` floats in `[0, 1]`.
pub fn color_to_rgb(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_ids_round_trip_through_from_id() {
        for pattern in ExplosionPattern::ALL {
            assert_eq!(ExplosionPattern::from_id(pattern.id()), Some(*pattern));
        }
        assert_eq!(ExplosionPattern::from_id(5), None);
    }

    #[test]
    fn heart_bounds_include_scale() {
        assert_eq!(ExplosionPattern::Heart.effective_speed_bounds(), (3.5, 10.0));
        assert_eq!(ExplosionPattern::Ring.effective_speed_bounds(), (8.0, 12.0));
    }

    #[test]
    fn complementary_of_red_is_cyan_ish() {
        assert_eq!(complementary_color(0xff1a1a), 0x00e5e5);
        assert_eq!(complementary_color(WHITE), 0);
    }

    #[test]
    fn color_unpacks_channels() {
        assert_eq!(color_to_rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(color_to_rgb(0x0000ff), [0.0, 0.0, 1.0]);
    }
}
