//! Default pieces and board layouts
//!
//! The factory owns one shared [`MovesTable`] per type code and stamps out
//! pieces from it. Layouts put white on the bottom rows (high `y`) and black
//! on the top rows.
//!
//! # Default Moves
//!
//! - Rook: orthogonal rays of length 1..7
//! - Bishop: diagonal rays of length 1..7
//! - Queen: both of the above
//! - Knight: the eight L-jumps
//! - King: the eight neighbours
//! - Pawn: `0,1` only; the forward two-step and diagonal capture come from
//!   the fallback rules

use crate::board::BoardIndex;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::moves::MovesTable;
use crate::piece::Piece;
use crate::types::{Cell, Displacement, Millis, PieceColor, PieceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Back-rank order from file `a` to file `h`
const BACK_RANK: [(PieceKind, u8); 8] = [
    (PieceKind::Rook, 1),
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Queen, 0),
    (PieceKind::King, 0),
    (PieceKind::Bishop, 2),
    (PieceKind::Knight, 2),
    (PieceKind::Rook, 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Full 32-piece starting position
    #[default]
    Standard,
    /// Back rank only, eight pieces per side
    BackRank,
}

#[derive(Debug, Clone)]
pub struct PieceFactory {
    tables: HashMap<char, Arc<MovesTable>>,
    config: EngineConfig,
}

impl PieceFactory {
    /// Factory with the default moves table for every standard type
    pub fn new(config: EngineConfig) -> Self {
        let cooldown = config.default_cooldown_ms;
        let tables = PieceKind::STANDARD
            .iter()
            .map(|&kind| (kind.code(), Arc::new(default_table(kind, cooldown))))
            .collect();
        Self { tables, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace or add the moves table for a type code
    pub fn with_table(mut self, code: char, table: MovesTable) -> Self {
        self.tables.insert(code.to_ascii_uppercase(), Arc::new(table));
        self
    }

    pub fn table_for(&self, code: char) -> EngineResult<Arc<MovesTable>> {
        self.tables
            .get(&code.to_ascii_uppercase())
            .cloned()
            .ok_or(EngineError::UnknownPieceType { code })
    }

    pub fn create(&self, id: &str, cell: Cell) -> EngineResult<Piece> {
        let code = id
            .chars()
            .next()
            .ok_or_else(|| EngineError::InvalidPieceId { id: id.to_string() })?;
        let moves = self.table_for(code)?;
        Piece::new(id, cell, moves, self.config.slowdown_factor)
    }

    /// Build a board from `(id, x, y)` placements
    pub fn build(&self, placements: &[(&str, i32, i32)]) -> EngineResult<BoardIndex> {
        let pieces = placements
            .iter()
            .map(|&(id, x, y)| self.create(id, Cell::new(x, y)))
            .collect::<EngineResult<Vec<_>>>()?;
        let board = BoardIndex::from_pieces(self.config.extents(), pieces)?;
        Ok(board.with_tolerance(self.config.collision_tolerance))
    }

    pub fn layout(&self, kind: LayoutKind) -> EngineResult<BoardIndex> {
        let placements = layout_placements(kind, self.config.board_height);
        let borrowed: Vec<(&str, i32, i32)> = placements
            .iter()
            .map(|(id, x, y)| (id.as_str(), *x, *y))
            .collect();
        let board = self.build(&borrowed)?;
        debug!("[SETUP] Built {:?} layout with {} pieces", kind, board.len());
        Ok(board)
    }
}

/// Ids and cells for a layout on a board of `height` rows
pub fn layout_placements(kind: LayoutKind, height: i32) -> Vec<(String, i32, i32)> {
    let mut placements = Vec::new();
    for color in [PieceColor::White, PieceColor::Black] {
        let (back_row, pawn_row) = match color {
            PieceColor::White => (height - 1, height - 2),
            PieceColor::Black => (0, 1),
        };
        for (x, (kind, suffix)) in BACK_RANK.iter().enumerate() {
            let mut id = format!("{}{}", kind.code(), color.marker());
            if *suffix > 0 {
                id.push_str(&suffix.to_string());
            }
            placements.push((id, x as i32, back_row));
        }
        if kind == LayoutKind::Standard {
            for x in 0..8 {
                let id = format!("{}{}{}", PieceKind::Pawn.code(), color.marker(), x + 1);
                placements.push((id, x, pawn_row));
            }
        }
    }
    placements
}

pub fn default_moves(kind: PieceKind) -> Vec<Displacement> {
    let rays = |dirs: &[(i32, i32)]| -> Vec<Displacement> {
        (1..=7)
            .flat_map(|i| dirs.iter().map(move |&(dx, dy)| Displacement::new(dx * i, dy * i)))
            .collect()
    };
    const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    const DIAGONAL: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

    match kind {
        PieceKind::Pawn => vec![Displacement::new(0, 1)],
        PieceKind::Rook => rays(&ORTHOGONAL),
        PieceKind::Bishop => rays(&DIAGONAL),
        PieceKind::Queen => {
            let mut moves = rays(&ORTHOGONAL);
            moves.extend(rays(&DIAGONAL));
            moves
        }
        PieceKind::Knight => [(2, 1), (2, -1), (-2, 1), (-2, -1), (1, 2), (1, -2), (-1, 2), (-1, -2)]
            .iter()
            .map(|&(dx, dy)| Displacement::new(dx, dy))
            .collect(),
        PieceKind::King => ORTHOGONAL
            .iter()
            .chain(DIAGONAL.iter())
            .map(|&(dx, dy)| Displacement::new(dx, dy))
            .collect(),
        PieceKind::Other(_) => Vec::new(),
    }
}

pub fn default_table(kind: PieceKind, cooldown_ms: Millis) -> MovesTable {
    MovesTable::new(default_moves(kind), cooldown_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> PieceFactory {
        PieceFactory::new(EngineConfig::default())
    }

    #[test]
    fn test_standard_layout() {
        //! 32 pieces, kings on the e-file, pawns on the second rows
        let board = factory().layout(LayoutKind::Standard).unwrap();
        assert_eq!(board.len(), 32);
        assert_eq!(board.get("KW").unwrap().cell(), Cell::new(4, 7));
        assert_eq!(board.get("KB").unwrap().cell(), Cell::new(4, 0));
        assert_eq!(board.get("QW").unwrap().cell(), Cell::new(3, 7));
        assert_eq!(board.get("PW5").unwrap().cell(), Cell::new(4, 6));
        assert_eq!(board.get("PB1").unwrap().cell(), Cell::new(0, 1));
        assert_eq!(board.get("RB2").unwrap().cell(), Cell::new(7, 0));
    }

    #[test]
    fn test_back_rank_layout() {
        let board = factory().layout(LayoutKind::BackRank).unwrap();
        assert_eq!(board.len(), 16);
        assert!(board.get("PW1").is_none());
        assert_eq!(board.player_piece_ids(crate::types::Player::White).len(), 8);
    }

    #[test]
    fn test_pieces_of_a_type_share_one_table() {
        let factory = factory();
        let a = factory.create("NW1", Cell::new(1, 7)).unwrap();
        let b = factory.create("NB2", Cell::new(6, 0)).unwrap();
        assert!(Arc::ptr_eq(&a.moves_handle(), &b.moves_handle()));
        assert_eq!(a.state.base_cooldown(), 2000, "1000ms cooldown doubled by the slow-down");
    }

    #[test]
    fn test_default_move_counts() {
        assert_eq!(default_moves(PieceKind::Rook).len(), 28);
        assert_eq!(default_moves(PieceKind::Queen).len(), 56);
        assert_eq!(default_moves(PieceKind::Knight).len(), 8);
        assert_eq!(default_moves(PieceKind::King).len(), 8);
        assert_eq!(default_moves(PieceKind::Pawn), vec![Displacement::new(0, 1)]);
    }

    #[test]
    fn test_unknown_type_and_overlap_are_errors() {
        let factory = factory();
        assert_eq!(
            factory.create("XW", Cell::new(0, 0)).unwrap_err(),
            EngineError::UnknownPieceType { code: 'X' }
        );
        assert!(matches!(
            factory.build(&[("KW", 4, 7), ("QW", 4, 7)]),
            Err(EngineError::CellOccupied { .. })
        ));
    }

    #[test]
    fn test_custom_table_overrides_default() {
        let factory = factory().with_table('n', MovesTable::unconfigured(500));
        let knight = factory.create("NW1", Cell::new(1, 7)).unwrap();
        assert!(knight.moves().is_empty());
        assert_eq!(knight.state.base_cooldown(), 1000);
    }
}
