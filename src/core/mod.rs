//! Core types: positions, pieces, players, RNG, configuration, errors.
//!
//! Everything here is plain data with no knowledge of the board or the
//! combat rules built on top of it.

pub mod position;
pub mod piece;
pub mod rng;
pub mod config;
pub mod error;

pub use position::Position;
pub use piece::{Piece, PieceKind, PlayerId};
pub use rng::{GameRng, GameRngState};
pub use config::{
    ArenaConfig, DamageRoll, BASE_DAMAGE, BOARD_SIZE, HEALTH_THRESHOLD, SPLASH_FRACTION,
    STARTING_HEALTH,
};
pub use error::{CascadeError, PayoffError, PlacementError, ProgressionError, SinkError};
