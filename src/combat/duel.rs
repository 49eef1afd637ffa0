//! Pairwise duel resolution.
//!
//! Duels are bidirectional and simultaneous: both pieces deal
//! `multiplier(own, other) * base_damage` to each other from their
//! pre-duel snapshots, then both updated pieces are written back.
//! The resolver reports which squares crossed the destruction floor but
//! never removes anything; that is the cascade engine's job.

use smallvec::SmallVec;

use crate::board::Board;
use crate::core::{PieceKind, PlayerId, Position};
use crate::events::ArenaEvent;

use super::PayoffTable;

/// Result of a duel that actually happened.
#[derive(Clone, Debug, PartialEq)]
pub struct DuelOutcome {
    /// Square of the initiating piece.
    pub attacker: Position,
    /// Square of the responding piece.
    pub defender: Position,
    pub attacker_owner: PlayerId,
    pub defender_owner: PlayerId,
    /// Damage dealt by the attacker to the defender.
    pub damage_to_defender: f32,
    /// Damage dealt by the defender to the attacker.
    pub damage_to_attacker: f32,
    /// Attacker health after the duel.
    pub attacker_health: f32,
    /// Defender health after the duel.
    pub defender_health: f32,
    /// Squares whose piece is now at or below the floor (attacker first).
    pub destroyed: SmallVec<[Position; 2]>,
}

impl DuelOutcome {
    /// Check if either piece crossed the floor.
    #[must_use]
    pub fn has_destruction(&self) -> bool {
        !self.destroyed.is_empty()
    }

    /// One `DuelResolved` event per direction, attacker's hit first.
    #[must_use]
    pub fn events(&self) -> [ArenaEvent; 2] {
        [
            ArenaEvent::DuelResolved {
                attacker: self.attacker_owner,
                defender: self.defender_owner,
                damage: self.damage_to_defender,
                position: self.defender,
            },
            ArenaEvent::DuelResolved {
                attacker: self.defender_owner,
                defender: self.attacker_owner,
                damage: self.damage_to_attacker,
                position: self.attacker,
            },
        ]
    }
}

/// Why a duel request did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoOpReason {
    /// No piece on this square.
    Vacant(Position),
    /// Both pieces belong to the same player.
    SameOwner,
    /// The squares do not share an edge.
    NotAdjacent,
}

/// Result of a duel request.
#[derive(Clone, Debug, PartialEq)]
pub enum DuelResult {
    Resolved(DuelOutcome),
    NoOp(NoOpReason),
}

impl DuelResult {
    /// The outcome, if the duel happened.
    #[must_use]
    pub fn outcome(&self) -> Option<&DuelOutcome> {
        match self {
            DuelResult::Resolved(outcome) => Some(outcome),
            DuelResult::NoOp(_) => None,
        }
    }
}

/// Resolves duels on a board.
pub struct DuelResolver;

impl DuelResolver {
    /// Damage `attacker` deals to `defender` for a given base.
    #[must_use]
    pub fn damage(
        payoff: &PayoffTable,
        attacker: PieceKind,
        defender: PieceKind,
        base_damage: f32,
    ) -> f32 {
        payoff.multiplier(attacker, defender) * base_damage
    }

    /// Resolve a duel between the pieces on `attacker` and `defender`.
    ///
    /// Vacant squares, friendly pairs and non-adjacent squares are
    /// reported as `NoOp` and leave the board untouched.
    pub fn resolve(
        board: &mut Board,
        payoff: &PayoffTable,
        attacker: Position,
        defender: Position,
        base_damage: f32,
        health_threshold: f32,
    ) -> DuelResult {
        let Some(first) = board.get(attacker) else {
            return DuelResult::NoOp(NoOpReason::Vacant(attacker));
        };
        let Some(second) = board.get(defender) else {
            return DuelResult::NoOp(NoOpReason::Vacant(defender));
        };
        if !attacker.is_adjacent(defender) {
            return DuelResult::NoOp(NoOpReason::NotAdjacent);
        }
        if !first.is_enemy_of(&second) {
            return DuelResult::NoOp(NoOpReason::SameOwner);
        }

        let to_defender = Self::damage(payoff, first.kind, second.kind, base_damage);
        let to_attacker = Self::damage(payoff, second.kind, first.kind, base_damage);

        let first = first.damaged(to_attacker);
        let second = second.damaged(to_defender);
        // Both squares are occupied, checked above.
        board.apply_damage(attacker, to_attacker);
        board.apply_damage(defender, to_defender);

        let mut destroyed: SmallVec<[Position; 2]> = SmallVec::new();
        if first.is_destroyed(health_threshold) {
            destroyed.push(attacker);
        }
        if second.is_destroyed(health_threshold) {
            destroyed.push(defender);
        }

        tracing::debug!(
            %attacker,
            %defender,
            to_defender,
            to_attacker,
            destroyed = destroyed.len(),
            "duel resolved"
        );

        DuelResult::Resolved(DuelOutcome {
            attacker,
            defender,
            attacker_owner: first.owner,
            defender_owner: second.owner,
            damage_to_defender: to_defender,
            damage_to_attacker: to_attacker,
            attacker_health: first.health,
            defender_health: second.health,
            destroyed,
        })
    }
}
