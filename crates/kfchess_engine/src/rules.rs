//! Move legality
//!
//! Two tiers decide whether a displacement is legal for a piece: the piece
//! type's configured [`MovesTable`](crate::moves::MovesTable) first, then a
//! hardcoded per-type fallback rule. The fallback keeps the game playable when
//! move data is missing or incomplete.

pub mod fallback;
pub mod validator;

pub use fallback::{FallbackRule, FallbackRules, MoveContext};
pub use validator::{Legality, MoveValidator};
