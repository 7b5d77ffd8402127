//! Command model
//!
//! A [`Command`] is the immutable unit of input: every key press, scripted
//! move and control action becomes one before the dispatcher sees it. The
//! canonical text is always populated. Commands built from fields derive it;
//! parsed commands keep the normalized text they came from.
//!
//! # Text Format
//!
//! | Kind         | Text                               | Example          |
//! |--------------|------------------------------------|------------------|
//! | Move         | `<P><PieceId> <From>-><To>`        | `WQW D1->D4`     |
//! | Jump         | `<P><PieceId> <From>-><To> JUMP`   | `BNB1 B8->C6 JUMP` |
//! | Key input    | `<P>_<KEY>`                        | `W_UP`           |
//! | Game control | the action itself                  | `END_GAME`       |
//!
//! `<P>` is `W` or `B`. Squares use algebraic notation. See [`codec`] for
//! the parsing rules.

pub mod codec;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Move,
    Jump,
    KeyInput,
    GameControl,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandKind::Move => "MOVE",
            CommandKind::Jump => "JUMP",
            CommandKind::KeyInput => "KEY_INPUT",
            CommandKind::GameControl => "GAME_CONTROL",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    kind: CommandKind,
    player: Player,
    piece_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    key: Option<String>,
    /// Wall-clock creation time, Unix milliseconds
    timestamp: i64,
    text: String,
    well_formed: bool,
}

impl Command {
    /// Structured move of `piece_id` between two squares
    pub fn movement(player: Player, piece_id: &str, from: &str, to: &str) -> Self {
        Self::positional(CommandKind::Move, player, piece_id, from, to)
    }

    pub fn jump(player: Player, piece_id: &str, from: &str, to: &str) -> Self {
        Self::positional(CommandKind::Jump, player, piece_id, from, to)
    }

    pub fn key(player: Player, key: &str) -> Self {
        let key = key.trim().to_uppercase();
        let text = codec::encode_key(player, &key);
        Self {
            kind: CommandKind::KeyInput,
            player,
            piece_id: None,
            from: None,
            to: None,
            key: Some(key),
            timestamp: now_millis(),
            text,
            well_formed: true,
        }
    }

    /// System-level control action such as `START_GAME` or `END_GAME`
    pub fn control(action: &str) -> Self {
        let action = action.trim().to_uppercase();
        Self {
            kind: CommandKind::GameControl,
            player: Player::System,
            piece_id: None,
            from: None,
            to: None,
            key: Some(action.clone()),
            timestamp: now_millis(),
            text: action,
            well_formed: true,
        }
    }

    /// Parse canonical text. Never fails; see [`codec::parse`].
    pub fn parse(text: &str) -> Self {
        codec::parse(text)
    }

    fn positional(kind: CommandKind, player: Player, piece_id: &str, from: &str, to: &str) -> Self {
        let piece_id = piece_id.trim().to_uppercase();
        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();
        let text = codec::encode_positional(kind, player, &piece_id, &from, &to);
        Self {
            kind,
            player,
            piece_id: Some(piece_id),
            from: Some(from),
            to: Some(to),
            key: None,
            timestamp: now_millis(),
            text,
            well_formed: true,
        }
    }

    /// Replace the creation time, e.g. when replaying a recorded script
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn piece_id(&self) -> Option<&str> {
        self.piece_id.as_deref()
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Key name for key input, action name for game control
    pub fn key_input(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Canonical textual form
    pub fn text(&self) -> &str {
        &self.text
    }

    /// False when parsing fell back to wrapping unreadable text
    pub fn is_well_formed(&self) -> bool {
        self.well_formed
    }

    pub fn is_movement(&self) -> bool {
        matches!(self.kind, CommandKind::Move | CommandKind::Jump)
    }

    pub fn is_key_input(&self) -> bool {
        self.kind == CommandKind::KeyInput
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.kind, self.text)
    }
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_text() {
        let cmd = Command::movement(Player::White, "qw", "d1", "d4");
        assert_eq!(cmd.text(), "WQW D1->D4");
        assert!(cmd.is_movement());
        assert!(!cmd.is_key_input());
        assert_eq!(cmd.piece_id(), Some("QW"));
    }

    #[test]
    fn test_jump_text_is_distinct() {
        let cmd = Command::jump(Player::Black, "NB1", "b8", "c6");
        assert_eq!(cmd.kind(), CommandKind::Jump);
        assert_eq!(cmd.text(), "BNB1 B8->C6 JUMP");
        assert!(cmd.is_movement());
    }

    #[test]
    fn test_key_and_control_text() {
        assert_eq!(Command::key(Player::White, "space").text(), "W_SPACE");
        assert_eq!(Command::key(Player::Black, "UP").text(), "B_UP");
        let control = Command::control("end_game");
        assert_eq!(control.kind(), CommandKind::GameControl);
        assert_eq!(control.player(), Player::System);
        assert_eq!(control.key_input(), Some("END_GAME"));
        assert_eq!(control.text(), "END_GAME");
    }

    #[test]
    fn test_display_starts_with_timestamp() {
        //! Log lines look like `[1700000000000] MOVE: WQW C1->C4`
        let cmd = Command::movement(Player::White, "QW", "c1", "c4").with_timestamp(42);
        assert_eq!(cmd.to_string(), "[42] MOVE: WQW C1->C4");
    }
}
