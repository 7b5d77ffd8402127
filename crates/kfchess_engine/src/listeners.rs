//! Event bus listeners shipped with the engine
//!
//! Presentation layers subscribe their own listeners; these two cover the
//! bookkeeping every frontend needs.

pub mod move_log;
pub mod score;

pub use move_log::MoveLog;
pub use score::{capture_value, MoveRecord, ScoreBoard};
