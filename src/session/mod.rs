//! Session controller: turn sequencing over the board and combat engine.
//!
//! A placement runs, in order:
//! 1. activity and board validation (rejections publish `InvalidPlacement`)
//! 2. insertion
//! 3. one duel per enemy neighbour, in adjacency order
//! 4. the chain reaction, if any duel left a piece at the floor
//! 5. turn advance, `PiecePlaced`, progression sync

mod controller;

pub use controller::{PlacementReport, Session};
