//! Two-tier move validator
//!
//! The verdict says *why* a move was allowed, so callers and tests can tell a
//! table match from a fallback match from an unconfigured piece type.

use super::fallback::{FallbackRules, MoveContext};
use crate::board::BoardIndex;
use crate::piece::Piece;
use crate::types::Displacement;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Legality {
    /// The piece type has an empty moves table; everything is allowed
    Unconfigured,
    /// The displacement (or its negation) is in the moves table
    Table,
    /// Not in the table, but the type's fallback rule accepts it
    Fallback,
}

#[derive(Debug, Clone, Default)]
pub struct MoveValidator {
    fallback: FallbackRules,
}

impl MoveValidator {
    pub fn new(fallback: FallbackRules) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &FallbackRules {
        &self.fallback
    }

    pub fn fallback_mut(&mut self) -> &mut FallbackRules {
        &mut self.fallback
    }

    /// Decide whether `piece` may make `displacement`
    ///
    /// Returns `None` when neither tier matches. Bounds are not checked here.
    pub fn check(
        &self,
        piece: &Piece,
        displacement: Displacement,
        board: &BoardIndex,
    ) -> Option<Legality> {
        let table = piece.moves();
        if table.is_empty() {
            return Some(Legality::Unconfigured);
        }
        if table.permits(displacement) {
            return Some(Legality::Table);
        }

        let from = piece.logical_cell();
        let enemy_at_destination = board
            .color_at(from + displacement)
            .is_some_and(|color| color != piece.color());
        let ctx = MoveContext {
            displacement,
            color: piece.color(),
            from,
            board_height: board.extents().height,
            enemy_at_destination,
        };
        if self.fallback.allows(piece.kind().code(), &ctx) {
            return Some(Legality::Fallback);
        }

        debug!(
            "[RULES] {} rejected displacement {} from {}",
            piece.id(),
            displacement,
            from
        );
        None
    }

    pub fn is_legal(&self, piece: &Piece, displacement: Displacement, board: &BoardIndex) -> bool {
        self.check(piece, displacement, board).is_some()
    }
}
