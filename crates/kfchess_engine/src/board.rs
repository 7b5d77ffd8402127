//! Board index - the authoritative piece-id → piece map
//!
//! Occupancy is derived, never stored: a lookup scans logical positions
//! within a small tolerance so floating-point drift from interpolation cannot
//! hide a piece. Only the capture resolver and the move-commit step remove or
//! reposition entries.

use crate::error::{EngineError, EngineResult};
use crate::piece::Piece;
use crate::types::{BoardExtents, Cell, PieceColor, PieceKind, Player};
use std::collections::BTreeMap;

/// Positional tolerance for occupancy lookups, in cells
pub const DEFAULT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct BoardIndex {
    pieces: BTreeMap<String, Piece>,
    extents: BoardExtents,
    tolerance: f64,
}

impl BoardIndex {
    pub fn new(extents: BoardExtents) -> Self {
        Self {
            pieces: BTreeMap::new(),
            extents,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Build an index from loader output, checking placement rules
    pub fn from_pieces(
        extents: BoardExtents,
        pieces: impl IntoIterator<Item = Piece>,
    ) -> EngineResult<Self> {
        let mut board = Self::new(extents);
        for piece in pieces {
            board.insert(piece)?;
        }
        Ok(board)
    }

    /// Add a piece; its cell must be on the board and free
    pub fn insert(&mut self, piece: Piece) -> EngineResult<()> {
        let cell = piece.logical_cell();
        if !self.extents.contains(cell) {
            return Err(EngineError::OutOfBoard {
                x: cell.x,
                y: cell.y,
                width: self.extents.width,
                height: self.extents.height,
            });
        }
        if self.pieces.contains_key(piece.id()) {
            return Err(EngineError::DuplicatePiece {
                id: piece.id().to_string(),
            });
        }
        if let Some(occupant) = self.occupant_at(cell) {
            return Err(EngineError::CellOccupied {
                x: cell.x,
                y: cell.y,
                occupant: occupant.id().to_string(),
            });
        }
        self.pieces.insert(piece.id().to_string(), piece);
        Ok(())
    }

    pub fn extents(&self) -> BoardExtents {
        self.extents
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Piece> {
        self.pieces.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pieces.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Piece> {
        self.pieces.remove(id)
    }

    /// Pieces in id order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pieces.keys().map(String::as_str)
    }

    /// Piece whose logical position lies within tolerance of `cell`
    pub fn occupant_at(&self, cell: Cell) -> Option<&Piece> {
        let (cx, cy) = (cell.x as f64, cell.y as f64);
        self.pieces.values().find(|piece| {
            let (px, py) = piece.logical_position();
            ((px - cx).powi(2) + (py - cy).powi(2)).sqrt() <= self.tolerance
        })
    }

    pub fn color_at(&self, cell: Cell) -> Option<PieceColor> {
        self.occupant_at(cell).map(Piece::color)
    }

    pub fn is_vacant(&self, cell: Cell) -> bool {
        self.occupant_at(cell).is_none()
    }

    /// Ids of the pieces `player` may select, in cycling order
    ///
    /// Ownership comes from each piece's colour, not from searching its id for
    /// a marker letter (`BW1` is a white bishop).
    pub fn player_piece_ids(&self, player: Player) -> Vec<String> {
        self.pieces
            .values()
            .filter(|piece| player.color() == Some(piece.color()))
            .map(|piece| piece.id().to_string())
            .collect()
    }

    /// Whether a king of `color` is still on the board. Kings are found by
    /// their id prefix (`KW`, `KB`).
    pub fn has_king(&self, color: PieceColor) -> bool {
        let prefix: String = [PieceKind::King.code(), color.marker()].iter().collect();
        self.pieces.keys().any(|id| id.starts_with(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MovesTable;
    use crate::state::DEFAULT_SLOWDOWN;
    use std::sync::Arc;

    fn piece(id: &str, x: i32, y: i32) -> Piece {
        Piece::new(id, Cell::new(x, y), Arc::new(MovesTable::default()), DEFAULT_SLOWDOWN).unwrap()
    }

    fn board(pieces: &[(&str, i32, i32)]) -> BoardIndex {
        BoardIndex::from_pieces(
            BoardExtents::default(),
            pieces.iter().map(|&(id, x, y)| piece(id, x, y)),
        )
        .unwrap()
    }

    #[test]
    fn test_board_occupancy_lookup() {
        //! Verifies occupant lookup by cell
        let board = board(&[("PW1", 3, 3), ("PB1", 6, 0)]);
        assert_eq!(board.occupant_at(Cell::new(3, 3)).map(Piece::id), Some("PW1"));
        assert_eq!(board.color_at(Cell::new(6, 0)), Some(PieceColor::Black));
        assert!(board.is_vacant(Cell::new(2, 2)), "Adjacent square should be empty");
    }

    #[test]
    fn test_lookup_tolerates_drift() {
        //! A position a few hundredths off still counts as on the cell
        let mut board = board(&[("NW1", 1, 0)]);
        board.get_mut("NW1").unwrap().set_position(1.05, 0.02);
        assert!(board.occupant_at(Cell::new(1, 0)).is_some());
        board.get_mut("NW1").unwrap().set_position(1.5, 0.0);
        assert!(board.occupant_at(Cell::new(1, 0)).is_none());
    }

    #[test]
    fn test_insert_rejects_overlap_and_duplicates() {
        let mut board = board(&[("KW", 4, 7)]);
        assert!(matches!(
            board.insert(piece("QW", 4, 7)),
            Err(EngineError::CellOccupied { .. })
        ));
        assert!(matches!(
            board.insert(piece("KW", 0, 0)),
            Err(EngineError::DuplicatePiece { .. })
        ));
        assert!(matches!(
            board.insert(piece("QW", 8, 0)),
            Err(EngineError::OutOfBoard { .. })
        ));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_player_pieces_by_colour() {
        //! A white bishop id starts with B but still belongs to white
        let board = board(&[("BW1", 2, 7), ("BB1", 2, 0), ("KW", 4, 7)]);
        assert_eq!(board.player_piece_ids(Player::White), vec!["BW1", "KW"]);
        assert_eq!(board.player_piece_ids(Player::Black), vec!["BB1"]);
        assert!(board.player_piece_ids(Player::System).is_empty());
    }

    #[test]
    fn test_has_king() {
        let mut board = board(&[("KW", 4, 7), ("KB", 4, 0)]);
        assert!(board.has_king(PieceColor::White));
        board.remove("KB");
        assert!(!board.has_king(PieceColor::Black));
    }
}
