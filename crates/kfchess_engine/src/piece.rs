//! Board pieces
//!
//! Position is continuous so a renderer can show a piece part-way through a
//! motion. Gameplay only looks at the piece's logical cell: the destination
//! of its in-flight motion if there is one, otherwise its rounded position.

use crate::error::EngineResult;
use crate::moves::MovesTable;
use crate::state::{Phase, PieceStateMachine};
use crate::types::{parse_piece_id, Cell, Millis, PieceColor, PieceKind};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct Piece {
    id: String,
    kind: PieceKind,
    color: PieceColor,
    pub x: f64,
    pub y: f64,
    pub state: PieceStateMachine,
    #[serde(skip)]
    moves: Arc<MovesTable>,
    in_flight: Option<Cell>,
}

impl Piece {
    /// Build a piece from its id; type and colour are read from the id
    pub fn new(id: impl Into<String>, cell: Cell, moves: Arc<MovesTable>, slowdown: u64) -> EngineResult<Self> {
        let id = id.into();
        let (kind, color) = parse_piece_id(&id)?;
        let state = PieceStateMachine::new(moves.cooldown_ms(), slowdown);
        Ok(Self {
            id,
            kind,
            color,
            x: cell.x as f64,
            y: cell.y as f64,
            state,
            moves,
            in_flight: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    pub fn is_white(&self) -> bool {
        self.color == PieceColor::White
    }

    pub fn moves(&self) -> &MovesTable {
        &self.moves
    }

    pub fn moves_handle(&self) -> Arc<MovesTable> {
        Arc::clone(&self.moves)
    }

    /// Nearest whole cell to the current (possibly interpolated) position
    pub fn cell(&self) -> Cell {
        Cell::from_position(self.x, self.y)
    }

    /// Cell the piece occupies for collision and capture purposes
    pub fn logical_cell(&self) -> Cell {
        self.in_flight.unwrap_or_else(|| self.cell())
    }

    pub fn logical_position(&self) -> (f64, f64) {
        match self.in_flight {
            Some(cell) => (cell.x as f64, cell.y as f64),
            None => (self.x, self.y),
        }
    }

    pub fn in_flight(&self) -> Option<Cell> {
        self.in_flight
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Snap to a whole cell and clear any in-flight destination
    pub fn place_at(&mut self, cell: Cell) {
        self.set_position(cell.x as f64, cell.y as f64);
        self.in_flight = None;
    }

    pub(crate) fn begin_flight(&mut self, destination: Cell) {
        self.in_flight = Some(destination);
    }

    pub fn can_act(&self, now: Millis) -> bool {
        self.state.can_act(now)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_SLOWDOWN;

    fn piece(id: &str, x: i32, y: i32) -> Piece {
        Piece::new(id, Cell::new(x, y), Arc::new(MovesTable::default()), DEFAULT_SLOWDOWN).unwrap()
    }

    #[test]
    fn test_identity_from_id() {
        let p = piece("QB", 3, 0);
        assert_eq!(p.kind(), PieceKind::Queen);
        assert_eq!(p.color(), PieceColor::Black);
        assert!(!p.is_white());
        assert_eq!(p.cell(), Cell::new(3, 0));
    }

    #[test]
    fn test_logical_cell_follows_flight() {
        //! While a motion runs, the destination is the occupied cell
        let mut p = piece("RW1", 0, 7);
        p.begin_flight(Cell::new(0, 6));
        p.set_position(0.0, 6.6);
        assert_eq!(p.logical_cell(), Cell::new(0, 6));
        assert_eq!(p.logical_position(), (0.0, 6.0));
        p.place_at(Cell::new(0, 6));
        assert_eq!(p.in_flight(), None);
        assert_eq!(p.cell(), Cell::new(0, 6));
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let result = Piece::new("Z", Cell::new(0, 0), Arc::new(MovesTable::default()), DEFAULT_SLOWDOWN);
        assert!(result.is_err());
    }
}
