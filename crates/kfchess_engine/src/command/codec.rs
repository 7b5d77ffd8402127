//! Command text codec
//!
//! Parsing trims and uppercases the input, then decides by shape:
//!
//! 1. Text containing `_` is key input. `W_`, `B_` and `S_` prefixes name
//!    the player; any other underscored text is a system key such as
//!    `ARROW_LEFT`
//! 2. Otherwise text containing `->` is a movement (`JUMP` suffix makes it a
//!    jump). The id prefix is `W`, `B` or `S`
//! 3. Anything else is a game-control action
//!
//! Parsing never fails. Text that looks like a movement or key but cannot be
//! read is wrapped as a game-control command whose
//! [`Command::is_well_formed`] is false, so callers can still tell the two
//! apart.

use super::{now_millis, Command, CommandKind};
use crate::types::Player;

const MOVE_ARROW: &str = "->";
const JUMP_SUFFIX: &str = "JUMP";

pub fn encode_positional(kind: CommandKind, player: Player, piece_id: &str, from: &str, to: &str) -> String {
    let mut text = format!("{}{} {}{}{}", player.prefix(), piece_id, from, MOVE_ARROW, to);
    if kind == CommandKind::Jump {
        text.push(' ');
        text.push_str(JUMP_SUFFIX);
    }
    text
}

pub fn encode_key(player: Player, key: &str) -> String {
    format!("{}_{}", player.prefix(), key)
}

pub fn parse(text: &str) -> Command {
    let normalized = text.trim().to_uppercase();
    let parsed = if normalized.contains('_') {
        parse_key(&normalized)
    } else if normalized.contains(MOVE_ARROW) {
        parse_positional(&normalized)
    } else if normalized.is_empty() {
        None
    } else {
        Some(Command::control(&normalized))
    };

    match parsed {
        Some(mut command) => {
            command.text = normalized;
            command
        }
        None => wrap_malformed(normalized),
    }
}

fn parse_positional(text: &str) -> Option<Command> {
    let (head, squares) = text.split_once(' ')?;
    let mut head_chars = head.chars();
    let player = match head_chars.next()? {
        'W' => Player::White,
        'B' => Player::Black,
        'S' => Player::System,
        _ => return None,
    };
    let piece_id = head_chars.as_str();
    if piece_id.is_empty() {
        return None;
    }

    let squares = squares.trim();
    let (squares, kind) = match squares.strip_suffix(JUMP_SUFFIX) {
        Some(rest) => (rest.trim_end(), CommandKind::Jump),
        None => (squares, CommandKind::Move),
    };
    let (from, to) = squares.split_once(MOVE_ARROW)?;
    let (from, to) = (from.trim(), to.trim());
    if !is_square(from) || !is_square(to) {
        return None;
    }

    Some(Command::positional(kind, player, piece_id, from, to))
}

fn parse_key(text: &str) -> Option<Command> {
    let (player, key) = if let Some(key) = text.strip_prefix("W_") {
        (Player::White, key)
    } else if let Some(key) = text.strip_prefix("B_") {
        (Player::Black, key)
    } else if let Some(key) = text.strip_prefix("S_") {
        (Player::System, key)
    } else {
        (Player::System, text)
    };
    if key.trim().is_empty() {
        return None;
    }
    Some(Command::key(player, key))
}

/// A file letter followed by a rank number, e.g. `E2`
fn is_square(text: &str) -> bool {
    let mut chars = text.chars();
    let file_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rank = chars.as_str();
    file_ok && !rank.is_empty() && rank.chars().all(|c| c.is_ascii_digit())
}

fn wrap_malformed(text: String) -> Command {
    Command {
        kind: CommandKind::GameControl,
        player: Player::System,
        piece_id: None,
        from: None,
        to: None,
        key: Some(text.clone()),
        timestamp: now_millis(),
        text,
        well_formed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        //! Squares and ids are uppercased
        let cmd = parse("  wq e2->e4 ");
        assert_eq!(cmd.kind(), CommandKind::Move);
        assert_eq!(cmd.player(), Player::White);
        assert_eq!(cmd.piece_id(), Some("Q"));
        assert_eq!(cmd.from(), Some("E2"));
        assert_eq!(cmd.to(), Some("E4"));
        assert_eq!(cmd.key_input(), None);
        assert_eq!(cmd.text(), "WQ E2->E4");
        assert!(cmd.is_well_formed());
    }

    #[test]
    fn test_movement_roundtrip() {
        //! Encoding then parsing keeps kind, player, piece and squares
        for command in [
            Command::movement(Player::Black, "PB3", "c7", "c5"),
            Command::jump(Player::White, "NW1", "b1", "c3"),
            Command::movement(Player::System, "QW", "d1", "d4"),
            Command::jump(Player::System, "KB", "e8", "e8"),
        ] {
            let parsed = parse(command.text());
            assert_eq!(parsed.kind(), command.kind());
            assert_eq!(parsed.player(), command.player());
            assert_eq!(parsed.piece_id(), command.piece_id());
            assert_eq!(parsed.from(), command.from());
            assert_eq!(parsed.to(), command.to());
        }
    }

    #[test]
    fn test_parse_key_input() {
        let cmd = parse("W_SPACE");
        assert_eq!(cmd.kind(), CommandKind::KeyInput);
        assert_eq!(cmd.player(), Player::White);
        assert_eq!(cmd.piece_id(), None);
        assert_eq!(cmd.key_input(), Some("SPACE"));

        let cmd = parse("b_hover_left");
        assert_eq!(cmd.player(), Player::Black);
        assert_eq!(cmd.key_input(), Some("HOVER_LEFT"));
    }

    #[test]
    fn test_ids_with_b_and_w_are_not_key_prefixes() {
        //! A movement of a black bishop is never read as a black key press
        let cmd = parse("BBB1 C8->D7");
        assert_eq!(cmd.kind(), CommandKind::Move);
        assert_eq!(cmd.piece_id(), Some("BB1"));
    }

    #[test]
    fn test_unprefixed_underscore_is_system_key() {
        let cmd = parse("ARROW_LEFT");
        assert_eq!(cmd.kind(), CommandKind::KeyInput);
        assert_eq!(cmd.player(), Player::System);
        assert_eq!(cmd.key_input(), Some("ARROW_LEFT"));
    }

    #[test]
    fn test_plain_text_is_control() {
        let cmd = parse("pause");
        assert_eq!(cmd.kind(), CommandKind::GameControl);
        assert_eq!(cmd.player(), Player::System);
        assert_eq!(cmd.key_input(), Some("PAUSE"));
        assert!(cmd.is_well_formed());
    }

    #[test]
    fn test_malformed_input_degrades_to_control() {
        //! Unreadable text never raises; it is wrapped and flagged
        for text in ["WQ E2->", "X1 A1->A2", "W E2->E4", "WQW E2->99", "W_", ""] {
            let cmd = parse(text);
            assert_eq!(cmd.kind(), CommandKind::GameControl, "{text:?}");
            assert_eq!(cmd.player(), Player::System);
            assert!(!cmd.is_well_formed(), "{text:?} should be flagged malformed");
            assert_eq!(cmd.text(), text.trim().to_uppercase());
        }
    }

    #[test]
    fn test_system_key_roundtrip() {
        //! System keys encode with `S_` so keys without an underscore still
        //! read back as key input
        assert_eq!(encode_key(Player::System, "ENTER"), "S_ENTER");
        assert_eq!(encode_key(Player::White, "ENTER"), "W_ENTER");
        for key in ["ENTER", "ARROW_LEFT"] {
            let cmd = Command::key(Player::System, key);
            let parsed = parse(cmd.text());
            assert_eq!(parsed.kind(), CommandKind::KeyInput, "{key}");
            assert_eq!(parsed.player(), Player::System);
            assert_eq!(parsed.key_input(), Some(key));
        }
    }

    #[test]
    fn test_underscore_checked_before_arrow() {
        //! Text carrying both markers is key input, never a movement
        let cmd = parse("W_QW E2->E4");
        assert_eq!(cmd.kind(), CommandKind::KeyInput);
        assert_eq!(cmd.player(), Player::White);
        assert_eq!(cmd.key_input(), Some("QW E2->E4"));
    }
}
