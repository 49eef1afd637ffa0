//! Combat rules: payoff table, duels and chain reactions.
//!
//! A placement triggers at most four duels (one per enemy neighbour).
//! Duels schedule pieces that fall to the destruction floor; the cascade
//! engine then removes them and splashes their neighbours until the
//! board settles.

mod payoff;
mod duel;
mod cascade;

pub use payoff::{PayoffTable, NEUTRAL_MULTIPLIER};
pub use duel::{DuelOutcome, DuelResolver, DuelResult, NoOpReason};
pub use cascade::{CascadeAborted, CascadeBatch, CascadeEngine, CascadeReport, CascadeState};
