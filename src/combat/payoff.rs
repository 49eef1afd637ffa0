//! Non-transitive payoff table.
//!
//! Maps an ordered (attacker, defender) pair of kinds to the multiplier
//! applied to base damage. The standard table encodes the cycle
//! Rock > Scissors > Paper > Rock with independent policy constants per
//! direction; mirror matchups are neutral.

use rustc_hash::FxHashMap;

use crate::core::{PayoffError, PieceKind};

/// Multiplier used for mirror matchups and lookup misses.
pub const NEUTRAL_MULTIPLIER: f32 = 1.0;

/// Authoritative attacker/defender damage multipliers.
///
/// Duels and anything else that needs a matchup value must query this
/// table rather than re-derive the cycle.
#[derive(Clone, Debug)]
pub struct PayoffTable {
    entries: FxHashMap<(PieceKind, PieceKind), f32>,
}

impl PayoffTable {
    /// The reference table.
    ///
    /// | attacker \ defender | Rock | Paper | Scissors |
    /// |---------------------|------|-------|----------|
    /// | Rock                | 1.0  | 0.8   | 1.2      |
    /// | Paper               | 1.1  | 1.0   | 0.9      |
    /// | Scissors            | 0.85 | 1.15  | 1.0      |
    #[must_use]
    pub fn standard() -> Self {
        use PieceKind::{Paper, Rock, Scissors};

        let mut table = Self::empty();
        for kind in PieceKind::ALL {
            table.set(kind, kind, NEUTRAL_MULTIPLIER);
        }
        table.set(Rock, Scissors, 1.2);
        table.set(Rock, Paper, 0.8);
        table.set(Paper, Rock, 1.1);
        table.set(Paper, Scissors, 0.9);
        table.set(Scissors, Paper, 1.15);
        table.set(Scissors, Rock, 0.85);
        table
    }

    /// A table with no entries. Every lookup misses.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Define or replace one directed entry.
    ///
    /// Multipliers must be positive.
    pub fn set(&mut self, attacker: PieceKind, defender: PieceKind, multiplier: f32) {
        assert!(multiplier > 0.0, "Payoff multipliers must be positive");
        self.entries.insert((attacker, defender), multiplier);
    }

    /// Builder form of [`PayoffTable::set`].
    #[must_use]
    pub fn with_entry(mut self, attacker: PieceKind, defender: PieceKind, multiplier: f32) -> Self {
        self.set(attacker, defender, multiplier);
        self
    }

    /// Strict lookup.
    pub fn lookup(&self, attacker: PieceKind, defender: PieceKind) -> Result<f32, PayoffError> {
        self.entries
            .get(&(attacker, defender))
            .copied()
            .ok_or(PayoffError::UndefinedPayoff { attacker, defender })
    }

    /// Total lookup: misses are a data-integrity warning and resolve to neutral.
    #[must_use]
    pub fn multiplier(&self, attacker: PieceKind, defender: PieceKind) -> f32 {
        match self.lookup(attacker, defender) {
            Ok(multiplier) => multiplier,
            Err(err) => {
                tracing::warn!(%err, "payoff table incomplete, using neutral multiplier");
                NEUTRAL_MULTIPLIER
            }
        }
    }

    /// Check that every ordered pair of kinds has an entry.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        PieceKind::ALL
            .iter()
            .all(|&a| PieceKind::ALL.iter().all(|&d| self.entries.contains_key(&(a, d))))
    }

    /// Whether `attacker` gets the better multiplier in its matchup with `defender`.
    #[must_use]
    pub fn has_advantage(&self, attacker: PieceKind, defender: PieceKind) -> bool {
        self.multiplier(attacker, defender) > self.multiplier(defender, attacker)
    }
}

impl Default for PayoffTable {
    fn default() -> Self {
        Self::standard()
    }
}
