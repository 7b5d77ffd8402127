//! Raw keyboard codes → key commands
//!
//! Both players share one keyboard. White steers with `WASD`, hovers with
//! `Q E Z C` and confirms with `SPACE`; black uses the arrows, `U O J L` and
//! `ENTER`. Left shift jumps for white, right shift for black. Digits `1`-`8`
//! pick a piece by number, with shift held for black. `ESC` leaves movement
//! mode for both players.
//!
//! Codes are AWT virtual key codes, which match ASCII for letters and digits.

use kfchess_engine::{Command, Player};
use serde::{Deserialize, Serialize};

pub mod codes {
    pub const ENTER: u32 = 10;
    pub const SHIFT: u32 = 16;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const DIGIT_1: u32 = 49;
    pub const DIGIT_8: u32 = 56;
    pub const A: u32 = 65;
    pub const C: u32 = 67;
    pub const D: u32 = 68;
    pub const E: u32 = 69;
    pub const J: u32 = 74;
    pub const L: u32 = 76;
    pub const O: u32 = 79;
    pub const Q: u32 = 81;
    pub const S: u32 = 83;
    pub const U: u32 = 85;
    pub const V: u32 = 86;
    pub const W: u32 = 87;
    pub const X: u32 = 88;
    pub const Z: u32 = 90;
}

/// Which physical key of a pair was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLocation {
    #[default]
    Standard,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: u32,
    pub location: KeyLocation,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(code: u32) -> Self {
        Self {
            code,
            location: KeyLocation::Standard,
            shift: false,
        }
    }

    /// Read `[shift+]<code>[:left|:right]`, e.g. `87`, `shift+50`, `16:right`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        let (shift, rest) = match text.strip_prefix("shift+") {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (code, location) = match rest.split_once(':') {
            Some((code, "left")) => (code, KeyLocation::Left),
            Some((code, "right")) => (code, KeyLocation::Right),
            Some(_) => return None,
            None => (rest, KeyLocation::Standard),
        };
        Some(Self {
            code: code.trim().parse().ok()?,
            location,
            shift,
        })
    }
}

/// One player's key codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKeys {
    pub up: u32,
    pub down: u32,
    pub left: u32,
    pub right: u32,
    pub hover_up: u32,
    pub hover_down: u32,
    pub hover_left: u32,
    pub hover_right: u32,
    pub confirm: u32,
    pub select_hover: u32,
}

impl PlayerKeys {
    pub fn white() -> Self {
        Self {
            up: codes::W,
            down: codes::S,
            left: codes::A,
            right: codes::D,
            hover_up: codes::Q,
            hover_down: codes::E,
            hover_left: codes::Z,
            hover_right: codes::C,
            confirm: codes::SPACE,
            select_hover: codes::X,
        }
    }

    pub fn black() -> Self {
        Self {
            up: codes::UP,
            down: codes::DOWN,
            left: codes::LEFT,
            right: codes::RIGHT,
            hover_up: codes::U,
            hover_down: codes::O,
            hover_left: codes::J,
            hover_right: codes::L,
            confirm: codes::ENTER,
            select_hover: codes::V,
        }
    }

    /// Dispatcher key name bound to `code`
    pub fn action(&self, code: u32) -> Option<&'static str> {
        let table = [
            (self.up, "UP"),
            (self.down, "DOWN"),
            (self.left, "LEFT"),
            (self.right, "RIGHT"),
            (self.hover_up, "HOVER_UP"),
            (self.hover_down, "HOVER_DOWN"),
            (self.hover_left, "HOVER_LEFT"),
            (self.hover_right, "HOVER_RIGHT"),
            (self.confirm, "CONFIRM"),
            (self.select_hover, "SELECT_HOVER"),
        ];
        table
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, name)| *name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub white: PlayerKeys,
    pub black: PlayerKeys,
    pub escape: u32,
    pub jump: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            white: PlayerKeys::white(),
            black: PlayerKeys::black(),
            escape: codes::ESCAPE,
            jump: codes::SHIFT,
        }
    }
}

impl KeyBindings {
    /// Commands produced by one key press; empty when the key is unbound
    pub fn translate(&self, press: KeyPress) -> Vec<Command> {
        if press.code == self.jump {
            return match press.location {
                KeyLocation::Left => vec![Command::key(Player::White, "JUMP")],
                KeyLocation::Right => vec![Command::key(Player::Black, "JUMP")],
                KeyLocation::Standard => Vec::new(),
            };
        }
        if press.code == self.escape {
            return vec![
                Command::key(Player::White, "ESCAPE"),
                Command::key(Player::Black, "ESCAPE"),
            ];
        }
        if (codes::DIGIT_1..=codes::DIGIT_8).contains(&press.code) {
            let player = if press.shift { Player::Black } else { Player::White };
            let number = press.code - codes::DIGIT_1 + 1;
            return vec![Command::key(player, &number.to_string())];
        }

        [(Player::White, &self.white), (Player::Black, &self.black)]
            .into_iter()
            .filter_map(|(player, keys)| keys.action(press.code).map(|name| Command::key(player, name)))
            .collect()
    }
}
