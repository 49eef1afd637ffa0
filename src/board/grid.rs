//! The N×N board.
//!
//! `Board` owns the position → piece mapping and enforces two invariants:
//! - every key lies within `0..N` on both axes
//! - a position is present iff a piece occupies it
//!
//! Storage is an `im::OrdMap`, so cloning the board for a read-only
//! snapshot is O(1) and iteration order is deterministic (row-major by
//! `Position` ordering).

use im::OrdMap;
use smallvec::SmallVec;

use crate::core::{Piece, PlacementError, Position};

/// Square grid of pieces.
///
/// Occupancy changes (`place`, effective `remove`, `clear`) bump a
/// revision counter. The board never publishes notifications itself;
/// whoever owns it announces `BoardChanged` with the new revision.
///
/// ## Usage
///
/// ```
/// use rps_arena::board::Board;
/// use rps_arena::core::{Piece, PieceKind, PlayerId, Position};
///
/// let mut board = Board::new(3);
/// let pos = Position::new(1, 1);
///
/// board.place(pos, Piece::new(pos, PieceKind::Rock, PlayerId::new(1), 100.0)).unwrap();
/// assert!(board.is_occupied(pos));
/// assert_eq!(board.adjacent_positions(pos).len(), 4);
/// assert_eq!(board.adjacent_positions(Position::new(0, 0)).len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    size: u8,
    pieces: OrdMap<Position, Piece>,
    revision: u64,
}

impl Board {
    /// Create an empty board with side length `size`.
    #[must_use]
    pub fn new(size: u8) -> Self {
        assert!(size > 0, "Board must have at least one square");
        Self {
            size,
            pieces: OrdMap::new(),
            revision: 0,
        }
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Total number of squares.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    /// Number of occupied squares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Check if no piece is on the board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Occupancy revision, bumped on every effective place/remove/clear.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check that both coordinates are within `0..N`.
    #[must_use]
    pub fn is_valid_position(&self, pos: Position) -> bool {
        let n = i32::from(self.size);
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    /// Check if a piece occupies `pos`. False for invalid positions.
    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.pieces.contains_key(&pos)
    }

    /// Put a piece on an empty square.
    ///
    /// The stored piece's `position` is normalised to `pos`. A rejected
    /// placement leaves the board untouched.
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<(), PlacementError> {
        if !self.is_valid_position(pos) {
            return Err(PlacementError::OutOfBounds(pos));
        }
        if self.is_occupied(pos) {
            return Err(PlacementError::Occupied(pos));
        }

        self.pieces.insert(pos, Piece { position: pos, ..piece });
        self.revision += 1;
        Ok(())
    }

    /// Remove the piece at `pos`.
    ///
    /// Returns true if a piece was actually removed.
    pub fn remove(&mut self, pos: Position) -> bool {
        if self.pieces.remove(&pos).is_some() {
            self.revision += 1;
            true
        } else {
            false
        }
    }

    /// Get a copy of the piece at `pos`.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.pieces.get(&pos).copied()
    }

    /// Replace the piece at `pos` with a copy that has taken `amount` damage.
    ///
    /// Returns the updated piece, or `None` if the square is empty.
    /// Health changes do not bump the occupancy revision.
    pub fn apply_damage(&mut self, pos: Position, amount: f32) -> Option<Piece> {
        let damaged = self.pieces.get(&pos)?.damaged(amount);
        self.pieces.insert(pos, damaged);
        Some(damaged)
    }

    /// In-bounds orthogonal neighbours of `pos`, ordered up, down, left, right.
    ///
    /// The order is part of the contract: duel and splash sequencing follow it.
    #[must_use]
    pub fn adjacent_positions(&self, pos: Position) -> SmallVec<[Position; 4]> {
        pos.neighbours()
            .into_iter()
            .filter(|&p| self.is_valid_position(p))
            .collect()
    }

    /// Occupied neighbours of `pos`, in adjacency order.
    #[must_use]
    pub fn occupied_neighbours(&self, pos: Position) -> SmallVec<[Piece; 4]> {
        self.adjacent_positions(pos)
            .into_iter()
            .filter_map(|p| self.get(p))
            .collect()
    }

    /// Snapshot of every piece, ordered by position.
    #[must_use]
    pub fn all_pieces(&self) -> Vec<Piece> {
        self.pieces.values().copied().collect()
    }

    /// Every unoccupied square, ordered by position.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        let n = i32::from(self.size);
        (0..n)
            .flat_map(|x| (0..n).map(move |y| Position::new(x, y)))
            .filter(|p| !self.is_occupied(*p))
            .collect()
    }

    /// Remove all pieces.
    ///
    /// Always counts as one occupancy change, even on an empty board.
    pub fn clear(&mut self) {
        self.pieces.clear();
        self.revision += 1;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::core::BOARD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceKind, PlayerId};

    fn rock(x: i32, y: i32, owner: u32) -> Piece {
        Piece::new(Position::new(x, y), PieceKind::Rock, PlayerId::new(owner), 100.0)
    }

    #[test]
    fn test_bounds() {
        let board = Board::new(3);

        assert!(board.is_valid_position(Position::new(0, 0)));
        assert!(board.is_valid_position(Position::new(2, 2)));
        assert!(!board.is_valid_position(Position::new(3, 0)));
        assert!(!board.is_valid_position(Position::new(0, -1)));
        assert!(!board.is_occupied(Position::new(-1, -1)));
    }

    #[test]
    fn test_place_and_get() {
        let mut board = Board::new(3);
        let pos = Position::new(1, 2);

        assert!(board.place(pos, rock(0, 0, 1)).is_ok());

        let piece = board.get(pos).unwrap();
        assert_eq!(piece.position, pos); // Normalised to the square
        assert_eq!(board.len(), 1);
        assert_eq!(board.revision(), 1);
    }

    #[test]
    fn test_rejected_placement_is_idempotent() {
        let mut board = Board::new(3);
        let pos = Position::new(0, 0);
        board.place(pos, rock(0, 0, 1)).unwrap();
        let before = board.all_pieces();
        let revision = board.revision();

        assert_eq!(
            board.place(pos, rock(0, 0, 2)),
            Err(PlacementError::Occupied(pos))
        );
        assert_eq!(
            board.place(Position::new(5, 5), rock(5, 5, 2)),
            Err(PlacementError::OutOfBounds(Position::new(5, 5)))
        );

        assert_eq!(board.all_pieces(), before);
        assert_eq!(board.revision(), revision);
    }

    #[test]
    fn test_remove() {
        let mut board = Board::new(3);
        let pos = Position::new(2, 2);
        board.place(pos, rock(2, 2, 1)).unwrap();

        assert!(board.remove(pos));
        assert!(!board.remove(pos));
        assert!(!board.remove(Position::new(9, 9)));
        assert_eq!(board.revision(), 2);
        assert!(board.get(pos).is_none());
    }

    #[test]
    fn test_adjacency_order_and_filtering() {
        let board = Board::new(3);

        let corner = board.adjacent_positions(Position::new(0, 0));
        assert_eq!(corner.as_slice(), &[Position::new(0, 1), Position::new(1, 0)]);

        let edge = board.adjacent_positions(Position::new(2, 1));
        assert_eq!(
            edge.as_slice(),
            &[Position::new(2, 0), Position::new(2, 2), Position::new(1, 1)]
        );

        assert!(board.adjacent_positions(Position::new(i32::MIN, i32::MAX)).is_empty());
        assert!(board.occupied_neighbours(Position::new(i32::MAX, 0)).is_empty());
    }

    #[test]
    fn test_occupied_neighbours() {
        let mut board = Board::new(3);
        board.place(Position::new(1, 0), rock(1, 0, 1)).unwrap();
        board.place(Position::new(2, 1), rock(2, 1, 2)).unwrap();

        let neighbours = board.occupied_neighbours(Position::new(1, 1));
        let positions: Vec<_> = neighbours.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![Position::new(1, 0), Position::new(2, 1)]);
    }

    #[test]
    fn test_apply_damage() {
        let mut board = Board::new(3);
        let pos = Position::new(1, 1);
        board.place(pos, rock(1, 1, 1)).unwrap();
        let revision = board.revision();

        let damaged = board.apply_damage(pos, 30.0).unwrap();
        assert_eq!(damaged.health, 70.0);
        assert_eq!(board.get(pos).unwrap().health, 70.0);
        assert_eq!(board.revision(), revision);

        assert!(board.apply_damage(Position::new(0, 0), 5.0).is_none());
    }

    #[test]
    fn test_clear() {
        let mut board = Board::new(3);
        board.place(Position::new(0, 0), rock(0, 0, 1)).unwrap();
        board.place(Position::new(0, 1), rock(0, 1, 2)).unwrap();

        board.clear();

        assert!(board.all_pieces().is_empty());
        assert!(board.is_empty());
        assert_eq!(board.revision(), 3);
        assert_eq!(board.empty_positions().len(), 9);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut board = Board::new(3);
        board.place(Position::new(0, 0), rock(0, 0, 1)).unwrap();

        let snapshot = board.clone();
        board.remove(Position::new(0, 0));

        assert_eq!(snapshot.len(), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_all_pieces_ordered() {
        let mut board = Board::new(3);
        board.place(Position::new(2, 0), rock(2, 0, 1)).unwrap();
        board.place(Position::new(0, 2), rock(0, 2, 1)).unwrap();
        board.place(Position::new(0, 1), rock(0, 1, 1)).unwrap();

        let positions: Vec<_> = board.all_pieces().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(2, 0)]
        );
    }
}
