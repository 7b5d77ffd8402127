//! Plain-text board view for the terminal
//!
//! White pieces print as upper-case type codes, black as lower-case. Moving
//! pieces are drawn on the cell nearest their current position.

use kfchess_engine::{BoardExtents, Cell, PieceColor, Snapshot};
use std::fmt;

pub struct BoardView<'a> {
    snapshot: &'a Snapshot,
    extents: BoardExtents,
}

impl<'a> BoardView<'a> {
    pub fn new(snapshot: &'a Snapshot, extents: BoardExtents) -> Self {
        Self { snapshot, extents }
    }

    fn glyph_at(&self, cell: Cell) -> char {
        self.snapshot
            .pieces
            .iter()
            .find(|piece| Cell::from_position(piece.x, piece.y) == cell)
            .map_or('.', |piece| {
                let code = piece.kind.code();
                match piece.color {
                    PieceColor::White => code.to_ascii_uppercase(),
                    PieceColor::Black => code.to_ascii_lowercase(),
                }
            })
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let BoardExtents { width, height } = self.extents;
        let border = format!("  +{}+", "-".repeat((width * 2 + 1) as usize));

        writeln!(
            f,
            "(t={}ms, {:?}, moves: {})",
            self.snapshot.now, self.snapshot.status, self.snapshot.move_count
        )?;
        writeln!(f, "{}", border)?;
        for y in 0..height {
            write!(f, "{} | ", height - y)?;
            for x in 0..width {
                write!(f, "{} ", self.glyph_at(Cell::new(x, y)))?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", border)?;
        let files: Vec<String> = (0..width)
            .map(|x| Cell::new(x, 0).to_notation(height).chars().take(1).collect())
            .collect();
        writeln!(f, "    {}", files.join(" "))
    }
}
