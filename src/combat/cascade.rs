//! Chain reaction engine.
//!
//! Two states: `Idle` (nothing pending) and `Cascading` (draining the
//! pending destruction set). Each pass:
//!
//! 1. takes the pending set as this pass's batch and empties it
//! 2. removes every batch position from the board
//! 3. splashes every occupied neighbour of the removed squares once,
//!    scheduling any that fall to the floor
//! 4. publishes one `ChainReaction` for the batch
//!
//! and repeats while anything is pending. Every pass removes at least one
//! piece, so a board of N² squares settles in at most N² passes. The
//! pending set is emptied and the state returns to `Idle` on every exit,
//! including errors.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::board::Board;
use crate::core::{ArenaConfig, CascadeError, Piece, Position};
use crate::events::{ArenaEvent, Notifier};

/// Engine state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CascadeState {
    #[default]
    Idle,
    Cascading,
}

/// What one pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeBatch {
    /// Squares cleared in this pass, in processing order.
    pub destroyed: Vec<Position>,
    /// Neighbours after taking splash damage, in processing order.
    pub splashed: Vec<Piece>,
}

/// Summary of a complete cascade.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeReport {
    pub batches: Vec<CascadeBatch>,
}

impl CascadeReport {
    /// Number of passes run.
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.batches.len()
    }

    /// Every destroyed square across all passes.
    #[must_use]
    pub fn destroyed(&self) -> Vec<Position> {
        self.batches
            .iter()
            .flat_map(|b| b.destroyed.iter().copied())
            .collect()
    }

    /// Check if the cascade did nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// A cascade that stopped early, with the passes it completed.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{error} after {} completed passes", .partial.pass_count())]
pub struct CascadeAborted {
    pub error: CascadeError,
    /// Batches that were removed and announced before the failure.
    pub partial: CascadeReport,
}

/// Owns the pending destruction set and drives it to a fixed point.
#[derive(Clone, Debug, Default)]
pub struct CascadeEngine {
    /// Insertion-ordered pending squares.
    pending: Vec<Position>,
    /// Membership index for `pending`.
    scheduled: FxHashSet<Position>,
    state: CascadeState,
}

impl CascadeEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == CascadeState::Idle && self.pending.is_empty()
    }

    /// Pending squares, in scheduling order.
    #[must_use]
    pub fn pending(&self) -> &[Position] {
        &self.pending
    }

    /// Schedule a square for destruction.
    ///
    /// Returns false if it was already pending.
    pub fn schedule(&mut self, pos: Position) -> bool {
        if self.scheduled.insert(pos) {
            self.pending.push(pos);
            true
        } else {
            false
        }
    }

    /// Drop everything pending and return to `Idle`.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.scheduled.clear();
        self.state = CascadeState::Idle;
    }

    /// Run passes until nothing is pending.
    ///
    /// On error the board keeps whatever consistent state the last
    /// completed step left it in, and the passes completed so far are
    /// returned in [`CascadeAborted::partial`]. The engine is always reset.
    pub fn run(
        &mut self,
        board: &mut Board,
        config: &ArenaConfig,
        notifier: &mut Notifier<'_>,
    ) -> Result<CascadeReport, CascadeAborted> {
        let mut report = CascadeReport::default();
        if self.pending.is_empty() {
            return Ok(report);
        }

        self.state = CascadeState::Cascading;
        let result = self.drive(board, config, notifier, &mut report);
        self.reset();

        match result {
            Ok(()) => Ok(report),
            Err(error) => {
                tracing::error!(%error, passes = report.pass_count(), "cascade aborted");
                Err(CascadeAborted {
                    error,
                    partial: report,
                })
            }
        }
    }

    fn drive(
        &mut self,
        board: &mut Board,
        config: &ArenaConfig,
        notifier: &mut Notifier<'_>,
        report: &mut CascadeReport,
    ) -> Result<(), CascadeError> {
        let limit = board.capacity();
        let mut pass = 0;

        while !self.pending.is_empty() {
            pass += 1;
            if pass > limit {
                return Err(CascadeError::PassLimitExceeded { limit });
            }

            let batch = std::mem::take(&mut self.pending);
            self.scheduled.clear();

            let mut destroyed = Vec::with_capacity(batch.len());
            for pos in batch {
                if board.remove(pos) {
                    destroyed.push(pos);
                    notifier.publish(ArenaEvent::BoardChanged {
                        revision: board.revision(),
                    });
                }
            }
            if destroyed.is_empty() {
                return Err(CascadeError::NoProgress { pass });
            }

            // A neighbour shared by several destroyed squares is hit once per pass.
            let mut hit = FxHashSet::default();
            let mut splashed = Vec::new();
            for &pos in &destroyed {
                for neighbour in board.adjacent_positions(pos) {
                    if !hit.insert(neighbour) {
                        continue;
                    }
                    let Some(piece) = board.apply_damage(neighbour, config.splash_damage) else {
                        continue;
                    };
                    if piece.is_destroyed(config.health_threshold) {
                        self.schedule(neighbour);
                    }
                    splashed.push(piece);
                }
            }

            tracing::debug!(
                pass,
                destroyed = destroyed.len(),
                splashed = splashed.len(),
                next = self.pending.len(),
                "cascade pass"
            );
            notifier.publish(ArenaEvent::ChainReaction {
                positions: destroyed.clone(),
            });
            report.batches.push(CascadeBatch { destroyed, splashed });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceKind, PlayerId};
    use crate::events::EventLog;

    fn place(board: &mut Board, x: i32, y: i32, owner: u32, health: f32) {
        let pos = Position::new(x, y);
        board
            .place(pos, Piece::new(pos, PieceKind::Rock, PlayerId::new(owner), health))
            .unwrap();
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = CascadeEngine::new();
        assert!(engine.is_idle());
        assert_eq!(engine.state(), CascadeState::Idle);
        assert!(engine.pending().is_empty());
    }

    #[test]
    fn test_schedule_dedupes() {
        let mut engine = CascadeEngine::new();

        assert!(engine.schedule(Position::new(0, 0)));
        assert!(!engine.schedule(Position::new(0, 0)));
        assert!(engine.schedule(Position::new(1, 0)));

        assert_eq!(engine.pending().len(), 2);
        assert!(!engine.is_idle());

        engine.reset();
        assert!(engine.is_idle());
    }

    #[test]
    fn test_run_with_nothing_pending() {
        let mut engine = CascadeEngine::new();
        let mut board = Board::new(3);
        let mut notifier = Notifier::silent();

        let report = engine.run(&mut board, &ArenaConfig::new(), &mut notifier).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_single_pass_splashes_neighbours() {
        let mut board = Board::new(3);
        place(&mut board, 1, 1, 1, 0.0);
        place(&mut board, 1, 0, 2, 50.0);
        place(&mut board, 0, 1, 1, 50.0);
        place(&mut board, 2, 2, 2, 50.0); // Diagonal, untouched

        let mut engine = CascadeEngine::new();
        engine.schedule(Position::new(1, 1));
        let log = EventLog::new();
        let mut notifier = Notifier::new(log.clone());

        let report = engine.run(&mut board, &ArenaConfig::new(), &mut notifier).unwrap();

        assert_eq!(report.pass_count(), 1);
        assert_eq!(report.destroyed(), vec![Position::new(1, 1)]);
        assert_eq!(board.get(Position::new(1, 0)).unwrap().health, 45.0);
        assert_eq!(board.get(Position::new(0, 1)).unwrap().health, 45.0);
        assert_eq!(board.get(Position::new(2, 2)).unwrap().health, 50.0);
        assert_eq!(log.named("chain_reaction").len(), 1);
        assert_eq!(log.named("board_changed").len(), 1);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_shared_neighbour_hit_once_per_batch() {
        let mut board = Board::new(3);
        place(&mut board, 0, 0, 1, 0.0);
        place(&mut board, 1, 1, 1, 0.0);
        place(&mut board, 1, 0, 2, 50.0); // Adjacent to both

        let mut engine = CascadeEngine::new();
        engine.schedule(Position::new(0, 0));
        engine.schedule(Position::new(1, 1));

        let report = engine
            .run(&mut board, &ArenaConfig::new(), &mut Notifier::silent())
            .unwrap();

        assert_eq!(report.pass_count(), 1);
        assert_eq!(board.get(Position::new(1, 0)).unwrap().health, 45.0);
    }

    #[test]
    fn test_chain_runs_in_sequential_batches() {
        let mut board = Board::new(3);
        place(&mut board, 0, 0, 1, 0.0);
        place(&mut board, 1, 0, 1, 3.0);
        place(&mut board, 2, 0, 1, 3.0);

        let mut engine = CascadeEngine::new();
        engine.schedule(Position::new(0, 0));
        let log = EventLog::new();
        let mut notifier = Notifier::new(log.clone());

        let report = engine.run(&mut board, &ArenaConfig::new(), &mut notifier).unwrap();

        assert_eq!(report.pass_count(), 3);
        assert_eq!(report.batches[0].destroyed, vec![Position::new(0, 0)]);
        assert_eq!(report.batches[1].destroyed, vec![Position::new(1, 0)]);
        assert_eq!(report.batches[2].destroyed, vec![Position::new(2, 0)]);
        assert!(board.is_empty());
        assert_eq!(log.named("chain_reaction").len(), 3);
    }

    #[test]
    fn test_failure_still_resets() {
        let mut board = Board::new(3);
        let mut engine = CascadeEngine::new();
        engine.schedule(Position::new(2, 2)); // Nothing there

        let result = engine.run(&mut board, &ArenaConfig::new(), &mut Notifier::silent());

        assert_eq!(
            result,
            Err(CascadeAborted {
                error: CascadeError::NoProgress { pass: 1 },
                partial: CascadeReport::default(),
            })
        );
        assert!(engine.is_idle());
        assert!(engine.pending().is_empty());
    }
}
