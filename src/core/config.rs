//! Arena configuration.
//!
//! Sessions are configured at startup via `ArenaConfig`:
//! - Board dimensions
//! - Starting health and the destruction floor
//! - Duel damage (`DamageRoll`) and cascade splash damage
//! - RNG seed for randomized damage
//!
//! The defaults reproduce the reference rules: a 3×3 board, pieces at
//! 100 health, fixed 25 base damage, splash of 20% base damage and a
//! floor of 0.

use serde::{Deserialize, Serialize};

use super::GameRng;

/// Side length of the default board.
pub const BOARD_SIZE: u8 = 3;

/// Health every piece is created with.
pub const STARTING_HEALTH: f32 = 100.0;

/// Base duel damage before the payoff multiplier.
pub const BASE_DAMAGE: f32 = 25.0;

/// Health at or below which a piece is destroyed.
pub const HEALTH_THRESHOLD: f32 = 0.0;

/// Fraction of base damage dealt to neighbours of a destroyed piece.
pub const SPLASH_FRACTION: f32 = 0.2;

/// How a duel's base damage is determined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DamageRoll {
    /// Same base damage for every duel.
    Fixed(f32),
    /// Base damage drawn uniformly from `min..=max` per duel.
    Uniform { min: f32, max: f32 },
}

impl DamageRoll {
    /// Produce the base damage for one duel.
    ///
    /// `Fixed` never touches the RNG, so fixed-damage sessions are
    /// independent of the seed.
    pub fn roll(&self, rng: &mut GameRng) -> f32 {
        match *self {
            DamageRoll::Fixed(amount) => amount,
            DamageRoll::Uniform { min, max } => rng.gen_range_f32(min..=max),
        }
    }

    /// Check that the rule can always produce a finite roll.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            DamageRoll::Fixed(amount) => amount.is_finite(),
            DamageRoll::Uniform { min, max } => min.is_finite() && max.is_finite() && min <= max,
        }
    }

    /// Expected base damage, used to derive the default splash amount.
    #[must_use]
    pub fn mean(&self) -> f32 {
        match *self {
            DamageRoll::Fixed(amount) => amount,
            DamageRoll::Uniform { min, max } => (min + max) / 2.0,
        }
    }
}

impl Default for DamageRoll {
    fn default() -> Self {
        DamageRoll::Fixed(BASE_DAMAGE)
    }
}

/// Complete arena configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Side length N of the N×N board.
    pub board_size: u8,

    /// Health assigned to newly placed pieces.
    pub starting_health: f32,

    /// Base duel damage.
    pub damage: DamageRoll,

    /// Destruction floor (inclusive).
    pub health_threshold: f32,

    /// Damage dealt to each occupied neighbour of a destroyed piece.
    pub splash_damage: f32,

    /// Seed for the damage RNG stream.
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            starting_health: STARTING_HEALTH,
            damage: DamageRoll::default(),
            health_threshold: HEALTH_THRESHOLD,
            splash_damage: BASE_DAMAGE * SPLASH_FRACTION,
            seed: 0,
        }
    }
}

impl ArenaConfig {
    /// Create the reference configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board side length.
    #[must_use]
    pub fn with_board_size(mut self, size: u8) -> Self {
        assert!(size > 0, "Board must have at least one square");
        self.board_size = size;
        self
    }

    /// Set the starting health of placed pieces.
    #[must_use]
    pub fn with_starting_health(mut self, health: f32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the duel damage rule.
    ///
    /// Splash damage is not re-derived; set it explicitly if needed.
    #[must_use]
    pub fn with_damage(mut self, damage: DamageRoll) -> Self {
        assert!(damage.is_valid(), "Damage range must be finite with min <= max");
        self.damage = damage;
        self
    }

    /// Set the destruction floor.
    #[must_use]
    pub fn with_health_threshold(mut self, threshold: f32) -> Self {
        self.health_threshold = threshold;
        self
    }

    /// Set the splash damage dealt during cascades.
    #[must_use]
    pub fn with_splash_damage(mut self, splash: f32) -> Self {
        self.splash_damage = splash;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of squares on the board.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.board_size) * usize::from(self.board_size)
    }
}
