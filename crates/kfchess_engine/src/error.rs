//! Error types for the engine crate
//!
//! Only setup paths (moves-table parsing, layout building, notation parsing)
//! produce these. Gameplay never raises; it reports a
//! [`crate::dispatcher::Rejection`] instead.

use thiserror::Error;

/// Errors that can occur while building engine state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A moves-table line could not be read as `dx,dy`
    #[error("Malformed move entry on line {line}: {text:?}")]
    MalformedMove { line: usize, text: String },

    /// Piece id does not start with a known type code and colour marker
    #[error("Invalid piece id: {id:?}")]
    InvalidPieceId { id: String },

    /// No fallback rule or template exists for this type code
    #[error("Unknown piece type code: {code}")]
    UnknownPieceType { code: char },

    /// Two ids in one layout
    #[error("Duplicate piece id in layout: {id}")]
    DuplicatePiece { id: String },

    /// Two pieces placed on one cell
    #[error("Cell ({x}, {y}) is already occupied by {occupant}")]
    CellOccupied { x: i32, y: i32, occupant: String },

    /// Placement outside the board extents
    #[error("Cell ({x}, {y}) is outside a {width}x{height} board")]
    OutOfBoard {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Square notation such as `E2` could not be parsed
    #[error("Invalid square notation: {text:?}")]
    InvalidSquare { text: String },
}

/// Result type alias for engine setup operations
pub type EngineResult<T> = Result<T, EngineError>;
