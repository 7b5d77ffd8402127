//! Core value types shared by every engine module
//!
//! Piece identity is encoded in its id the same way the board layouts do it:
//! the first character is the type code (`P`, `N`, `B`, `R`, `Q`, `K`) and the
//! second is the colour marker (`W` or `B`). Anything after that is a
//! disambiguating suffix (`RW1`, `PB7`).

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Milliseconds on the engine clock
pub type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PieceColor {
    #[default]
    White,
    Black,
}

impl PieceColor {
    pub fn marker(self) -> char {
        match self {
            PieceColor::White => 'W',
            PieceColor::Black => 'B',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker.to_ascii_uppercase() {
            'W' => Some(PieceColor::White),
            'B' => Some(PieceColor::Black),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Row direction a pawn of this colour advances in. White starts at the
    /// bottom of the board (high `y`) and moves up.
    pub fn forward(self) -> i32 {
        match self {
            PieceColor::White => -1,
            PieceColor::Black => 1,
        }
    }
}

/// Piece type, identified by its single-letter type code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// A type code registered by the embedding application
    Other(char),
}

impl PieceKind {
    pub fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
            PieceKind::Other(code) => code,
        }
    }

    pub fn from_code(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            other => PieceKind::Other(other),
        }
    }

    /// Standard piece kinds, in the order layouts list them
    pub const STANDARD: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];
}

/// Split a piece id into its type and colour
///
/// `"RW1"` → `(Rook, White)`. The id must be at least two characters with a
/// valid colour marker in second position.
pub fn parse_piece_id(id: &str) -> EngineResult<(PieceKind, PieceColor)> {
    let mut chars = id.chars();
    let (Some(code), Some(marker)) = (chars.next(), chars.next()) else {
        return Err(EngineError::InvalidPieceId { id: id.to_string() });
    };
    let color = PieceColor::from_marker(marker)
        .ok_or_else(|| EngineError::InvalidPieceId { id: id.to_string() })?;
    Ok((PieceKind::from_code(code), color))
}

/// Who issued a command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
    System,
}

impl Player {
    pub fn color(self) -> Option<PieceColor> {
        match self {
            Player::White => Some(PieceColor::White),
            Player::Black => Some(PieceColor::Black),
            Player::System => None,
        }
    }

    /// Whether this player may act on a piece of `color`. The system player
    /// controls every piece.
    pub fn owns(self, color: PieceColor) -> bool {
        self.color().map_or(true, |own| own == color)
    }

    /// Single-letter prefix used by the command codec
    pub fn prefix(self) -> char {
        match self {
            Player::White => 'W',
            Player::Black => 'B',
            Player::System => 'S',
        }
    }
}

impl From<PieceColor> for Player {
    fn from(color: PieceColor) -> Self {
        match color {
            PieceColor::White => Player::White,
            PieceColor::Black => Player::Black,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Player::White => "WHITE",
            Player::Black => "BLACK",
            Player::System => "SYSTEM",
        };
        f.write_str(name)
    }
}

/// Integer `(dx, dy)` offset, the unit of move legality
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn negated(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.dx, self.dy)
    }
}

/// Whole board cell. `x` is the file (column), `y` the row from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Nearest cell to a continuous position
    pub fn from_position(x: f64, y: f64) -> Self {
        Self::new(x.round() as i32, y.round() as i32)
    }

    pub fn offset_to(self, other: Cell) -> Displacement {
        Displacement::new(other.x - self.x, other.y - self.y)
    }

    /// Algebraic notation for a board of `height` rows: `(4, 6)` on an 8-row
    /// board is `e2`
    pub fn to_notation(self, height: i32) -> String {
        let file = u8::try_from(self.x)
            .ok()
            .and_then(|x| b'a'.checked_add(x))
            .map(char::from)
            .unwrap_or('?');
        format!("{}{}", file, height - self.y)
    }

    /// Inverse of [`Cell::to_notation`], case-insensitive
    pub fn from_notation(text: &str, height: i32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidSquare {
            text: text.to_string(),
        };
        let text = text.trim();
        let mut chars = text.chars();
        let file = chars.next().filter(char::is_ascii_alphabetic).ok_or_else(invalid)?;
        let rank: i32 = chars.as_str().parse().map_err(|_| invalid())?;
        let x = (file.to_ascii_lowercase() as u8 - b'a') as i32;
        Ok(Cell::new(x, height - rank))
    }
}

impl Add<Displacement> for Cell {
    type Output = Cell;

    fn add(self, d: Displacement) -> Cell {
        Cell::new(self.x + d.dx, self.y + d.dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions in cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardExtents {
    pub width: i32,
    pub height: i32,
}

impl Default for BoardExtents {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
        }
    }
}

impl BoardExtents {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }
}
