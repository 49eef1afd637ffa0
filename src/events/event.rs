//! Arena events.
//!
//! A closed set of variants replaces string-keyed event names. Each
//! variant still exposes its stable wire name through [`ArenaEvent::name`]
//! for sinks that forward to string-keyed observers.

use serde::{Deserialize, Serialize};

use crate::core::{PieceKind, PlacementError, PlayerId, Position};

/// Something observable that happened during a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// Session (re)started with an empty board.
    Initialized,

    /// Board occupancy changed (place, effective remove or clear).
    BoardChanged { revision: u64 },

    /// A piece was placed and all resulting combat has resolved.
    PiecePlaced {
        position: Position,
        kind: PieceKind,
        owner: PlayerId,
    },

    /// One direction of a duel. `position` is the damaged piece's square.
    DuelResolved {
        attacker: PlayerId,
        defender: PlayerId,
        damage: f32,
        position: Position,
    },

    /// One cascade batch destroyed these positions.
    ChainReaction { positions: Vec<Position> },

    /// Session ended.
    GameEnded { final_turn: u32 },

    /// A placement request was rejected.
    InvalidPlacement {
        position: Position,
        reason: PlacementError,
    },
}

impl ArenaEvent {
    /// Stable snake_case event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ArenaEvent::Initialized => "initialized",
            ArenaEvent::BoardChanged { .. } => "board_changed",
            ArenaEvent::PiecePlaced { .. } => "piece_placed",
            ArenaEvent::DuelResolved { .. } => "duel_resolved",
            ArenaEvent::ChainReaction { .. } => "chain_reaction",
            ArenaEvent::GameEnded { .. } => "game_ended",
            ArenaEvent::InvalidPlacement { .. } => "invalid_placement",
        }
    }
}

impl std::fmt::Display for ArenaEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArenaEvent::Initialized => write!(f, "initialized"),
            ArenaEvent::BoardChanged { revision } => write!(f, "board_changed r{revision}"),
            ArenaEvent::PiecePlaced { position, kind, owner } => {
                write!(f, "piece_placed {kind} at {position} by {owner}")
            }
            ArenaEvent::DuelResolved {
                attacker,
                defender,
                damage,
                position,
            } => write!(
                f,
                "duel_resolved {attacker} hits {defender} at {position} for {damage:.2}"
            ),
            ArenaEvent::ChainReaction { positions } => {
                write!(f, "chain_reaction destroyed {} piece(s)", positions.len())
            }
            ArenaEvent::GameEnded { final_turn } => write!(f, "game_ended on turn {final_turn}"),
            ArenaEvent::InvalidPlacement { position, reason } => {
                write!(f, "invalid_placement at {position}: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ArenaEvent::Initialized.name(), "initialized");
        assert_eq!(
            ArenaEvent::ChainReaction { positions: vec![] }.name(),
            "chain_reaction"
        );
        assert_eq!(
            ArenaEvent::InvalidPlacement {
                position: Position::new(0, 0),
                reason: PlacementError::SessionInactive,
            }
            .name(),
            "invalid_placement"
        );
    }

    #[test]
    fn test_display() {
        let event = ArenaEvent::PiecePlaced {
            position: Position::new(1, 2),
            kind: PieceKind::Paper,
            owner: PlayerId::new(2),
        };
        assert_eq!(event.to_string(), "piece_placed Paper at (1, 2) by Player 2");
    }

    #[test]
    fn test_event_serialization() {
        let event = ArenaEvent::DuelResolved {
            attacker: PlayerId::new(1),
            defender: PlayerId::new(2),
            damage: 27.5,
            position: Position::new(1, 1),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: ArenaEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
