//! Session controller.

use crate::board::Board;
use crate::combat::{
    CascadeEngine, CascadeReport, DuelOutcome, DuelResolver, DuelResult, PayoffTable,
};
use crate::core::{
    ArenaConfig, CascadeError, GameRng, Piece, PieceKind, PlacementError, PlayerId, Position,
};
use crate::events::{ArenaEvent, NotificationSink, Notifier};
use crate::progression::{ProgressionStore, SessionSnapshot};

/// RNG context for duel damage rolls.
const DAMAGE_STREAM: &str = "damage";

/// Everything a successful placement caused.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementReport {
    pub position: Position,
    /// The placed piece after all combat, `None` if it was destroyed.
    pub piece: Option<Piece>,
    /// Duels against enemy neighbours, in adjacency order.
    pub duels: Vec<DuelOutcome>,
    /// Passes of the resulting chain reaction, if any.
    pub cascade: CascadeReport,
    /// Set if the chain reaction hit an internal invariant violation.
    pub cascade_failure: Option<CascadeError>,
}

impl PlacementReport {
    /// Squares destroyed by the chain reaction.
    #[must_use]
    pub fn destroyed(&self) -> Vec<Position> {
        self.cascade.destroyed()
    }
}

/// Turn sequencing over a board.
///
/// All mutation for one placement (insert, duels, cascade) completes
/// before `place_piece` returns, so callers only ever observe settled
/// boards.
///
/// ```
/// use rps_arena::core::{ArenaConfig, PieceKind, PlayerId};
/// use rps_arena::session::Session;
///
/// let mut session = Session::new(ArenaConfig::new());
/// session.initialize();
///
/// session.place_piece(1, 1, PieceKind::Rock, PlayerId::new(1)).unwrap();
/// let report = session.place_piece(1, 2, PieceKind::Paper, PlayerId::new(2)).unwrap();
///
/// assert_eq!(report.duels.len(), 1);
/// assert_eq!(session.turn_number(), 2);
/// ```
pub struct Session<'a> {
    config: ArenaConfig,
    board: Board,
    payoff: PayoffTable,
    cascade: CascadeEngine,
    rng: GameRng,
    turn: u32,
    active: bool,
    notifier: Notifier<'a>,
    progression: Option<Box<dyn ProgressionStore + 'a>>,
}

impl<'a> Session<'a> {
    /// Create an inactive session. Call [`Session::initialize`] before playing.
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        assert!(config.damage.is_valid(), "Damage range must be finite with min <= max");
        Self {
            board: Board::new(config.board_size),
            payoff: PayoffTable::standard(),
            cascade: CascadeEngine::new(),
            rng: GameRng::new(config.seed).for_context(DAMAGE_STREAM),
            turn: 0,
            active: false,
            notifier: Notifier::silent(),
            progression: None,
            config,
        }
    }

    /// Attach a notification sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl NotificationSink + 'a) -> Self {
        self.notifier = Notifier::new(sink);
        self
    }

    /// Attach a progression store.
    #[must_use]
    pub fn with_progression(mut self, store: impl ProgressionStore + 'a) -> Self {
        self.progression = Some(Box::new(store));
        self
    }

    /// Replace the payoff table.
    #[must_use]
    pub fn with_payoff(mut self, payoff: PayoffTable) -> Self {
        self.payoff = payoff;
        self
    }

    // === Accessors ===

    /// Current turn number (0 right after `initialize`).
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    /// Check if placements are accepted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Read-only view of the settled board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Independent copy of the board (O(1)).
    #[must_use]
    pub fn board_snapshot(&self) -> Board {
        self.board.clone()
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    #[must_use]
    pub fn payoff(&self) -> &PayoffTable {
        &self.payoff
    }

    /// Check that no destruction is pending. Holds between calls.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.cascade.is_idle()
    }

    /// Capture turn, active flag, pieces and RNG position.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turn_number: self.turn,
            active: self.active,
            pieces: self.board.all_pieces(),
            rng: self.rng.state(),
        }
    }

    // === Lifecycle ===

    /// Start a fresh game: empty board, turn 0, active.
    pub fn initialize(&mut self) {
        self.board.clear();
        self.publish_board_changed();
        self.cascade.reset();
        self.rng = GameRng::new(self.config.seed).for_context(DAMAGE_STREAM);
        self.turn = 0;
        self.active = true;

        tracing::info!(size = self.board.size(), seed = self.config.seed, "session initialized");
        self.notifier.publish(ArenaEvent::Initialized);
        self.sync();
    }

    /// Stop accepting placements and clear the board.
    ///
    /// The turn counter keeps its final value until the next `initialize`.
    pub fn end_game(&mut self) {
        self.active = false;
        self.board.clear();
        self.publish_board_changed();
        self.cascade.reset();

        tracing::info!(final_turn = self.turn, "game ended");
        self.notifier.publish(ArenaEvent::GameEnded {
            final_turn: self.turn,
        });
        self.sync();
    }

    /// Replace the session state with a snapshot.
    ///
    /// Fails without touching the session if any piece is out of bounds,
    /// two pieces share a square, or a piece's health is not in
    /// `(health_threshold, starting_health]`. Settled boards never hold
    /// such pieces.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), PlacementError> {
        let mut staged = Board::new(self.config.board_size);
        for piece in &snapshot.pieces {
            if !self.is_living_health(piece.health) {
                return Err(PlacementError::InvalidHealth(piece.position));
            }
            staged.place(piece.position, *piece)?;
        }

        self.board.clear();
        for piece in staged.all_pieces() {
            self.board.place(piece.position, piece)?;
        }
        self.publish_board_changed();
        self.cascade.reset();
        self.rng = GameRng::from_state(&snapshot.rng);
        self.turn = snapshot.turn_number;
        self.active = snapshot.active;

        tracing::info!(turn = self.turn, pieces = self.board.len(), "session restored");
        self.sync();
        Ok(())
    }

    // === Turns ===

    /// Place a new piece and resolve all combat it causes.
    ///
    /// Rejections publish `InvalidPlacement` and leave all state untouched.
    pub fn place_piece(
        &mut self,
        x: i32,
        y: i32,
        kind: PieceKind,
        owner: PlayerId,
    ) -> Result<PlacementReport, PlacementError> {
        let position = Position::new(x, y);
        if !self.active {
            return Err(self.reject(position, PlacementError::SessionInactive));
        }

        let piece = Piece::new(position, kind, owner, self.config.starting_health);
        if let Err(reason) = self.board.place(position, piece) {
            return Err(self.reject(position, reason));
        }
        self.publish_board_changed();

        let duels = self.resolve_duels(position, owner);

        let (cascade, cascade_failure) =
            match self
                .cascade
                .run(&mut self.board, &self.config, &mut self.notifier)
            {
                Ok(report) => (report, None),
                Err(aborted) => (aborted.partial, Some(aborted.error)),
            };

        self.turn = self.turn.saturating_add(1);
        tracing::debug!(
            turn = self.turn,
            %position,
            %kind,
            duels = duels.len(),
            destroyed = cascade.destroyed().len(),
            "piece placed"
        );
        self.notifier.publish(ArenaEvent::PiecePlaced {
            position,
            kind,
            owner,
        });
        self.sync();

        Ok(PlacementReport {
            position,
            piece: self.board.get(position),
            duels,
            cascade,
            cascade_failure,
        })
    }

    /// Duel every enemy neighbour of `position`, scheduling casualties.
    fn resolve_duels(&mut self, position: Position, owner: PlayerId) -> Vec<DuelOutcome> {
        let mut duels = Vec::new();

        for neighbour in self.board.adjacent_positions(position) {
            match self.board.get(neighbour) {
                Some(other) if other.owner != owner => {}
                _ => continue,
            }

            let base_damage = self.config.damage.roll(&mut self.rng);
            let result = DuelResolver::resolve(
                &mut self.board,
                &self.payoff,
                position,
                neighbour,
                base_damage,
                self.config.health_threshold,
            );

            match result {
                DuelResult::Resolved(outcome) => {
                    for event in outcome.events() {
                        self.notifier.publish(event);
                    }
                    for &pos in &outcome.destroyed {
                        self.cascade.schedule(pos);
                    }
                    duels.push(outcome);
                }
                DuelResult::NoOp(reason) => {
                    tracing::debug!(?reason, %neighbour, "duel skipped");
                }
            }
        }

        duels
    }

    fn is_living_health(&self, health: f32) -> bool {
        health.is_finite()
            && health > self.config.health_threshold
            && health <= self.config.starting_health
    }

    fn reject(&mut self, position: Position, reason: PlacementError) -> PlacementError {
        tracing::debug!(%position, %reason, "placement rejected");
        self.notifier
            .publish(ArenaEvent::InvalidPlacement { position, reason });
        reason
    }

    fn publish_board_changed(&mut self) {
        self.notifier.publish(ArenaEvent::BoardChanged {
            revision: self.board.revision(),
        });
    }

    /// Push a snapshot to the progression store, if any. Failures are logged only.
    fn sync(&mut self) {
        if self.progression.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(store) = self.progression.as_mut() {
            if let Err(err) = store.sync(&snapshot) {
                tracing::warn!(%err, turn = snapshot.turn_number, "progression sync failed");
            }
        }
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("turn", &self.turn)
            .field("active", &self.active)
            .field("pieces", &self.board.len())
            .field("notifier", &self.notifier)
            .field("progression", &self.progression.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;

    fn started() -> Session<'static> {
        let mut session = Session::new(ArenaConfig::new());
        session.initialize();
        session
    }

    #[test]
    fn test_new_session_is_inactive() {
        let mut session = Session::new(ArenaConfig::new());

        assert!(!session.is_active());
        assert_eq!(
            session.place_piece(0, 0, PieceKind::Rock, PlayerId::new(1)),
            Err(PlacementError::SessionInactive)
        );
        assert!(session.board().is_empty());
    }

    #[test]
    fn test_initialize() {
        let log = EventLog::new();
        let mut session = Session::new(ArenaConfig::new()).with_sink(log.clone());

        session.initialize();

        assert!(session.is_active());
        assert_eq!(session.turn_number(), 0);
        assert_eq!(
            log.events(),
            vec![ArenaEvent::BoardChanged { revision: 1 }, ArenaEvent::Initialized]
        );
    }

    #[test]
    fn test_place_without_neighbours() {
        let mut session = started();

        let report = session
            .place_piece(0, 0, PieceKind::Scissors, PlayerId::new(1))
            .unwrap();

        assert!(report.duels.is_empty());
        assert!(report.cascade.is_empty());
        assert_eq!(report.piece.unwrap().health, 100.0);
        assert_eq!(session.turn_number(), 1);
    }

    #[test]
    fn test_friendly_neighbours_do_not_duel() {
        let mut session = started();
        session.place_piece(1, 1, PieceKind::Rock, PlayerId::new(1)).unwrap();

        let report = session
            .place_piece(1, 2, PieceKind::Paper, PlayerId::new(1))
            .unwrap();

        assert!(report.duels.is_empty());
        assert_eq!(session.board().get(Position::new(1, 1)).unwrap().health, 100.0);
    }

    #[test]
    fn test_rejections_do_not_advance_turn() {
        let log = EventLog::new();
        let mut session = Session::new(ArenaConfig::new()).with_sink(log.clone());
        session.initialize();
        session.place_piece(0, 0, PieceKind::Rock, PlayerId::new(1)).unwrap();

        assert_eq!(
            session.place_piece(0, 0, PieceKind::Paper, PlayerId::new(2)),
            Err(PlacementError::Occupied(Position::new(0, 0)))
        );
        assert_eq!(
            session.place_piece(3, 0, PieceKind::Paper, PlayerId::new(2)),
            Err(PlacementError::OutOfBounds(Position::new(3, 0)))
        );

        assert_eq!(session.turn_number(), 1);
        assert_eq!(log.named("invalid_placement").len(), 2);
        assert_eq!(session.board().get(Position::new(0, 0)).unwrap().kind, PieceKind::Rock);
    }

    #[test]
    fn test_end_game() {
        let log = EventLog::new();
        let mut session = Session::new(ArenaConfig::new()).with_sink(log.clone());
        session.initialize();
        session.place_piece(0, 0, PieceKind::Rock, PlayerId::new(1)).unwrap();
        session.place_piece(2, 2, PieceKind::Rock, PlayerId::new(2)).unwrap();

        session.end_game();

        assert!(!session.is_active());
        assert!(session.board().all_pieces().is_empty());
        assert_eq!(session.turn_number(), 2);
        assert_eq!(log.events().last(), Some(&ArenaEvent::GameEnded { final_turn: 2 }));
        assert!(session.is_settled());
    }

    #[test]
    fn test_reinitialize_resets() {
        let mut session = started();
        session.place_piece(0, 0, PieceKind::Rock, PlayerId::new(1)).unwrap();

        session.initialize();

        assert_eq!(session.turn_number(), 0);
        assert!(session.board().is_empty());
    }

    #[test]
    #[should_panic(expected = "Damage range must be finite with min <= max")]
    fn test_session_rejects_inverted_damage() {
        let mut config = ArenaConfig::new();
        config.damage = crate::core::DamageRoll::Uniform { min: 40.0, max: 10.0 };
        let _ = Session::new(config);
    }

    #[test]
    fn test_turn_counter_saturates() {
        let mut session = started();
        session
            .restore(&SessionSnapshot {
                turn_number: u32::MAX,
                active: true,
                pieces: Vec::new(),
                rng: GameRng::new(0).state(),
            })
            .unwrap();

        session.place_piece(0, 0, PieceKind::Rock, PlayerId::new(1)).unwrap();

        assert_eq!(session.turn_number(), u32::MAX);
        assert_eq!(session.board().len(), 1);
    }
}
