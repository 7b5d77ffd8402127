//! Capture scoring and the per-player move table
//!
//! Tracks pieces captured by each player and calculates material advantage
//! from `PieceMoved` events.
//!
//! # Material Values
//!
//! - Pawn: 1
//! - Knight/Bishop: 3
//! - Rook: 5
//! - Queen: 9
//! - King: 0 (its capture ends the game instead)
//!
//! Positive advantage means White is ahead, negative means Black is ahead.

use crate::events::{EventListener, GameEvent};
use crate::types::{Millis, PieceKind, Player};
use serde::Serialize;

/// One row of a player's move table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub move_number: u32,
    /// `mm:ss` on the engine clock
    pub time: String,
    pub piece_id: String,
    pub piece_type: PieceKind,
    pub from: String,
    pub to: String,
    pub captured: Option<PieceKind>,
}

impl MoveRecord {
    /// `e2 → e4` or `e2 → e4 xN` for a capture
    pub fn describe(&self) -> String {
        match self.captured {
            Some(kind) => format!("{} → {} x{}", self.from, self.to, kind.code()),
            None => format!("{} → {}", self.from, self.to),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ScoreBoard {
    /// Black pieces that White has captured
    pub white_captured: Vec<PieceKind>,
    /// White pieces that Black has captured
    pub black_captured: Vec<PieceKind>,
    white_moves: Vec<MoveRecord>,
    black_moves: Vec<MoveRecord>,
    winner: Option<Player>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `player` with capturing a piece of `kind`
    pub fn add_capture(&mut self, player: Player, kind: PieceKind) {
        match player {
            Player::White => self.white_captured.push(kind),
            Player::Black => self.black_captured.push(kind),
            Player::System => {}
        }
    }

    pub fn score(&self, player: Player) -> u32 {
        let captured = match player {
            Player::White => &self.white_captured,
            Player::Black => &self.black_captured,
            Player::System => return 0,
        };
        captured.iter().map(|&kind| capture_value(kind)).sum()
    }

    pub fn material_advantage(&self) -> i32 {
        self.score(Player::White) as i32 - self.score(Player::Black) as i32
    }

    pub fn moves(&self, player: Player) -> &[MoveRecord] {
        match player {
            Player::White => &self.white_moves,
            Player::Black => &self.black_moves,
            Player::System => &[],
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Clear all state (for new game)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl EventListener for ScoreBoard {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => self.clear(),
            GameEvent::GameEnded { winner } => self.winner = Some(*winner),
            GameEvent::PieceMoved {
                piece_id,
                from,
                to,
                player,
                piece_type,
                move_number,
                captured_piece_type,
                at,
            } => {
                if let Some(kind) = captured_piece_type {
                    self.add_capture(*player, *kind);
                }
                let record = MoveRecord {
                    move_number: *move_number,
                    time: format_clock(*at),
                    piece_id: piece_id.clone(),
                    piece_type: *piece_type,
                    from: from.clone(),
                    to: to.clone(),
                    captured: *captured_piece_type,
                };
                match player {
                    Player::White => self.white_moves.push(record),
                    Player::Black => self.black_moves.push(record),
                    Player::System => {}
                }
            }
            GameEvent::Sound { .. } => {}
        }
    }
}

/// Material value of a captured piece
pub fn capture_value(kind: PieceKind) -> u32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
        PieceKind::Other(_) => 0,
    }
}

fn format_clock(ms: Millis) -> String {
    format!("{:02}:{:02}", (ms / 60_000) % 60, (ms / 1000) % 60)
}
