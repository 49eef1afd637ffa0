//! # rps-arena
//!
//! A turn-based combat resolver for a small square grid.
//!
//! Players place Rock, Paper and Scissors pieces on an N×N board (3×3 by
//! default). A new piece immediately duels every orthogonally adjacent
//! enemy using a non-transitive payoff table. Pieces pushed to the
//! destruction floor are removed, splashing their neighbours, which may
//! in turn be destroyed: the chain reaction repeats until the board
//! settles.
//!
//! ## Design Principles
//!
//! 1. **Settled boards only**: a placement resolves every duel and cascade
//!    pass before returning. Nothing partially updated is observable.
//!
//! 2. **Bounded resolution**: at most four duels per placement and at most
//!    N² cascade passes, driven by an explicit loop.
//!
//! 3. **Optional collaborators**: notification sinks and progression
//!    stores are injected capabilities; their failures never touch game
//!    state.
//!
//! ## Modules
//!
//! - `core`: Positions, pieces, players, RNG, configuration, errors
//! - `board`: Bounded grid with occupancy and adjacency rules
//! - `combat`: Payoff table, duel resolver, cascade engine
//! - `events`: Typed notifications and sinks
//! - `progression`: Snapshots and the persistence collaborator
//! - `session`: Turn sequencing

pub mod core;
pub mod board;
pub mod combat;
pub mod events;
pub mod progression;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ArenaConfig, DamageRoll, GameRng, GameRngState,
    Piece, PieceKind, PlayerId, Position,
    CascadeError, PayoffError, PlacementError, ProgressionError, SinkError,
};

pub use crate::board::Board;

pub use crate::combat::{
    CascadeAborted, CascadeBatch, CascadeEngine, CascadeReport, CascadeState,
    DuelOutcome, DuelResolver, DuelResult, NoOpReason, PayoffTable,
};

pub use crate::events::{ArenaEvent, EventLog, NotificationSink, Notifier, TracingSink};

pub use crate::progression::{MemoryStore, ProgressionStore, SessionSnapshot};

pub use crate::session::{PlacementReport, Session};
