//! Input module - turns keyboards and text into engine commands
//!
//! - [`keys`] - raw key codes → `W_`/`B_` key commands
//! - [`text`] - line-oriented command text, used by stdin and replay scripts

pub mod keys;
pub mod text;

pub use keys::{KeyBindings, KeyLocation, KeyPress, PlayerKeys};
pub use text::{feed_lines, parse_line, InputLine};
