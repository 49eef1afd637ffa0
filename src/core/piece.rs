//! Players, piece kinds and placed pieces.
//!
//! ## PlayerId
//!
//! Type-safe owner identifier. Two pieces are enemies iff their owners differ.
//!
//! ## Piece
//!
//! Pieces are immutable snapshots: damage produces a new value that
//! replaces the board entry.

use serde::{Deserialize, Serialize};

use super::Position;

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// The three token types of the non-transitive cycle.
///
/// There is no "empty" kind: an unoccupied square is `None` at the board level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Rock,
    Paper,
    Scissors,
}

impl PieceKind {
    /// All kinds, in declaration order.
    pub const ALL: [PieceKind; 3] = [PieceKind::Rock, PieceKind::Paper, PieceKind::Scissors];

    /// The kind this one has the advantage over.
    #[must_use]
    pub const fn beats(self) -> PieceKind {
        match self {
            PieceKind::Rock => PieceKind::Scissors,
            PieceKind::Paper => PieceKind::Rock,
            PieceKind::Scissors => PieceKind::Paper,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Rock => "Rock",
            PieceKind::Paper => "Paper",
            PieceKind::Scissors => "Scissors",
        };
        f.write_str(name)
    }
}

/// A token on the board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub position: Position,
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub health: f32,
}

impl Piece {
    /// Create a piece at full health.
    #[must_use]
    pub fn new(position: Position, kind: PieceKind, owner: PlayerId, health: f32) -> Self {
        Self {
            position,
            kind,
            owner,
            health,
        }
    }

    /// Return a copy with `amount` subtracted from health.
    ///
    /// Negative amounts are treated as zero; health never increases.
    #[must_use]
    pub fn damaged(self, amount: f32) -> Self {
        Self {
            health: self.health - amount.max(0.0),
            ..self
        }
    }

    /// Check whether this piece is at or below the destruction floor.
    #[must_use]
    pub fn is_destroyed(&self, threshold: f32) -> bool {
        self.health <= threshold
    }

    /// Check whether `other` belongs to a different player.
    #[must_use]
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.owner != other.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beats_is_a_cycle() {
        for kind in PieceKind::ALL {
            assert_ne!(kind.beats(), kind);
            assert_eq!(kind.beats().beats().beats(), kind);
        }
        assert_eq!(PieceKind::Rock.beats(), PieceKind::Scissors);
    }

    #[test]
    fn test_damaged_never_heals() {
        let piece = Piece::new(Position::new(0, 0), PieceKind::Rock, PlayerId::new(1), 10.0);

        assert_eq!(piece.damaged(4.0).health, 6.0);
        assert_eq!(piece.damaged(-5.0).health, 10.0);
        // Original snapshot untouched
        assert_eq!(piece.health, 10.0);
    }

    #[test]
    fn test_destruction_floor_is_inclusive() {
        let piece = Piece::new(Position::new(0, 0), PieceKind::Paper, PlayerId::new(1), 0.0);
        assert!(piece.is_destroyed(0.0));
        assert!(!piece.damaged(-1.0).is_destroyed(-0.5));
    }

    #[test]
    fn test_enemy() {
        let a = Piece::new(Position::new(0, 0), PieceKind::Rock, PlayerId::new(1), 1.0);
        let b = Piece::new(Position::new(0, 1), PieceKind::Rock, PlayerId::new(2), 1.0);
        let c = Piece::new(Position::new(1, 0), PieceKind::Rock, PlayerId::new(1), 1.0);

        assert!(a.is_enemy_of(&b));
        assert!(!a.is_enemy_of(&c));
        assert_eq!(format!("{}", a.owner), "Player 1");
    }
}
