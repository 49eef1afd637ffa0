//! Error types.
//!
//! Placement errors are recoverable and reported to the caller. Payoff
//! misses degrade to a neutral multiplier. Cascade errors are internal
//! invariant violations. Sink and progression errors never affect game state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{PieceKind, Position};

/// Why a placement was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("position {0} is already occupied")]
    Occupied(Position),

    #[error("no active session")]
    SessionInactive,

    #[error("piece at {0} has health outside the living range")]
    InvalidHealth(Position),
}

/// Payoff table lookup miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PayoffError {
    #[error("no payoff defined for {attacker} attacking {defender}")]
    UndefinedPayoff {
        attacker: PieceKind,
        defender: PieceKind,
    },
}

/// Cascade invariant violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CascadeError {
    #[error("cascade pass {pass} destroyed nothing")]
    NoProgress { pass: usize },

    #[error("cascade exceeded {limit} passes")]
    PassLimitExceeded { limit: usize },
}

/// A notification sink refused an event.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("notification sink failed: {0}")]
pub struct SinkError(pub String);

/// The progression collaborator failed to store or load a snapshot.
#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("progression store unavailable: {0}")]
    Unavailable(String),
}
