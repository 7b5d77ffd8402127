//! Collision and capture resolution, plus the end-of-game check
//!
//! Only this module and the move-commit step in the dispatcher remove or
//! reposition board entries.

use crate::board::BoardIndex;
use crate::piece::Piece;
use crate::state::Phase;
use crate::types::{Cell, Millis, PieceColor, Player};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// Nothing stands on the destination
    Vacant,
    /// A piece of the mover's own colour stands there
    Friendly { occupant: String },
    /// The mover is not on the board
    MissingMover,
}

#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    Captured {
        /// The removed piece, as it was at the moment of capture
        captured: Piece,
        at: Cell,
        from: Cell,
    },
    Blocked(BlockReason),
}

impl CaptureOutcome {
    pub fn is_capture(&self) -> bool {
        matches!(self, CaptureOutcome::Captured { .. })
    }
}

/// Resolve the mover arriving on an occupied `destination`
///
/// An enemy occupant is removed and the mover takes its exact cell, entering
/// `phase` at `now`. Anything else leaves the board untouched.
pub fn resolve(
    board: &mut BoardIndex,
    mover_id: &str,
    destination: Cell,
    phase: Phase,
    now: Millis,
) -> CaptureOutcome {
    let Some(mover) = board.get(mover_id) else {
        return CaptureOutcome::Blocked(BlockReason::MissingMover);
    };
    let mover_color = mover.color();
    let from = mover.logical_cell();

    let Some(occupant) = board.occupant_at(destination) else {
        return CaptureOutcome::Blocked(BlockReason::Vacant);
    };
    if occupant.color() == mover_color {
        debug!(
            "[CAPTURE] {} blocked by friendly {} at {}",
            mover_id,
            occupant.id(),
            destination
        );
        return CaptureOutcome::Blocked(BlockReason::Friendly {
            occupant: occupant.id().to_string(),
        });
    }

    let occupant_id = occupant.id().to_string();
    let Some(captured) = board.remove(&occupant_id) else {
        return CaptureOutcome::Blocked(BlockReason::Vacant);
    };
    let at = captured.logical_cell();
    if let Some(mover) = board.get_mut(mover_id) {
        mover.place_at(at);
        mover.state.set_phase(phase, now);
    }

    info!(
        "[CAPTURE] {} took {} at {} (from {})",
        mover_id,
        captured.id(),
        at,
        from
    );
    CaptureOutcome::Captured { captured, at, from }
}

/// Scan the board for both kings
///
/// A missing white king is checked first, so a board with neither king
/// reports black as the winner.
pub fn check_winner(board: &BoardIndex) -> Option<Player> {
    if !board.has_king(PieceColor::White) {
        return Some(Player::Black);
    }
    if !board.has_king(PieceColor::Black) {
        return Some(Player::White);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MovesTable;
    use crate::state::DEFAULT_SLOWDOWN;
    use crate::types::{BoardExtents, PieceKind};
    use std::sync::Arc;

    fn board(pieces: &[(&str, i32, i32)]) -> BoardIndex {
        BoardIndex::from_pieces(
            BoardExtents::default(),
            pieces.iter().map(|&(id, x, y)| {
                Piece::new(id, Cell::new(x, y), Arc::new(MovesTable::default()), DEFAULT_SLOWDOWN)
                    .unwrap()
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_capture_removes_exactly_one_piece() {
        //! White at (3,3) takes black at (4,4) and lands on its cell
        let mut board = board(&[("QW", 3, 3), ("NB1", 4, 4), ("KW", 4, 7), ("KB", 4, 0)]);
        let outcome = resolve(&mut board, "QW", Cell::new(4, 4), Phase::Rest, 500);

        let CaptureOutcome::Captured { captured, at, from } = outcome else {
            panic!("Expected a capture");
        };
        assert_eq!(captured.id(), "NB1");
        assert_eq!(captured.kind(), PieceKind::Knight);
        assert_eq!((at, from), (Cell::new(4, 4), Cell::new(3, 3)));
        assert_eq!(board.len(), 3, "Exactly one piece should be removed");
        assert!(!board.contains("NB1"));

        let queen = board.get("QW").unwrap();
        assert_eq!(queen.cell(), Cell::new(4, 4));
        assert_eq!(queen.phase(), Phase::Rest);
        assert!(!queen.can_act(500), "Mover must be inactive after capturing");
    }

    #[test]
    fn test_friendly_collision_mutates_nothing() {
        let mut board = board(&[("RW1", 0, 7), ("PW1", 0, 6)]);
        let outcome = resolve(&mut board, "RW1", Cell::new(0, 6), Phase::Rest, 0);
        assert!(matches!(
            outcome,
            CaptureOutcome::Blocked(BlockReason::Friendly { ref occupant }) if occupant == "PW1"
        ));
        assert_eq!(board.len(), 2);
        assert_eq!(board.get("RW1").unwrap().cell(), Cell::new(0, 7));
        assert_eq!(board.get("PW1").unwrap().cell(), Cell::new(0, 6));
        assert_eq!(board.get("RW1").unwrap().phase(), Phase::Idle);
    }

    #[test]
    fn test_vacant_destination_is_blocked() {
        let mut board = board(&[("RW1", 0, 7)]);
        assert!(matches!(
            resolve(&mut board, "RW1", Cell::new(0, 3), Phase::Rest, 0),
            CaptureOutcome::Blocked(BlockReason::Vacant)
        ));
        assert!(matches!(
            resolve(&mut board, "ZZ", Cell::new(0, 7), Phase::Rest, 0),
            CaptureOutcome::Blocked(BlockReason::MissingMover)
        ));
    }

    #[test]
    fn test_king_capture_names_winner() {
        //! Taking the black king makes white the winner
        let mut board = board(&[("RW1", 4, 1), ("KB", 4, 0), ("KW", 4, 7)]);
        assert_eq!(check_winner(&board), None);
        resolve(&mut board, "RW1", Cell::new(4, 0), Phase::Rest, 0);
        assert_eq!(check_winner(&board), Some(Player::White));
    }

    #[test]
    fn test_missing_white_king_checked_first() {
        let board = board(&[("QW", 0, 0)]);
        assert_eq!(check_winner(&board), Some(Player::Black));
    }
}
