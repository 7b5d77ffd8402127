//! Command log collaborator
//!
//! The dispatcher hands every command to a [`CommandLog`] before acting on it,
//! and every capture after it happens. The engine never reads the log back.

use crate::command::Command;
use crate::events::Shared;
use crate::types::{PieceKind, Player};
use std::collections::HashMap;
use tracing::info;

pub trait CommandLog: Send {
    fn log_command(&mut self, command: &Command);

    /// `player` captured the piece `captured_id` with `command`
    fn log_capture(&mut self, player: Player, captured_id: &str, command: &Command);
}

impl<L: CommandLog> CommandLog for Shared<L> {
    fn log_command(&mut self, command: &Command) {
        self.lock().log_command(command);
    }

    fn log_capture(&mut self, player: Player, captured_id: &str, command: &Command) {
        self.lock().log_capture(player, captured_id, command);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCommandLog;

impl CommandLog for NullCommandLog {
    fn log_command(&mut self, _command: &Command) {}

    fn log_capture(&mut self, _player: Player, _captured_id: &str, _command: &Command) {}
}

/// Writes each command as an `info!` line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCommandLog;

impl CommandLog for TracingCommandLog {
    fn log_command(&mut self, command: &Command) {
        info!("[LOG] {}", command);
    }

    fn log_capture(&mut self, player: Player, captured_id: &str, command: &Command) {
        info!("[LOG] {} captured {} with {}", player, captured_id, command.text());
    }
}

/// Points awarded per captured type. A king is worth 100 so a king capture
/// always decides the leader.
pub fn log_capture_value(kind: PieceKind) -> u32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight | PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 100,
        PieceKind::Other(_) => 0,
    }
}

/// In-memory log with per-player histories and capture scores
#[derive(Debug, Default, Clone)]
pub struct MemoryCommandLog {
    commands: Vec<Command>,
    per_player: HashMap<Player, Vec<Command>>,
    scores: HashMap<Player, u32>,
}

impl MemoryCommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn player_log(&self, player: Player) -> &[Command] {
        self.per_player
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// The last `count` commands, oldest first
    pub fn recent(&self, count: usize) -> &[Command] {
        let start = self.commands.len().saturating_sub(count);
        &self.commands[start..]
    }

    /// Commands whose timestamp lies in `start..=end`
    pub fn in_time_range(&self, start: i64, end: i64) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|cmd| (start..=end).contains(&cmd.timestamp()))
            .collect()
    }

    /// Player with the higher capture score; `None` on a tie
    pub fn leader(&self) -> Option<Player> {
        let (white, black) = (self.score(Player::White), self.score(Player::Black));
        match white.cmp(&black) {
            std::cmp::Ordering::Greater => Some(Player::White),
            std::cmp::Ordering::Less => Some(Player::Black),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// One `WHITE: 4 points (12 moves)` line per player
    pub fn summary(&self) -> Vec<String> {
        [Player::White, Player::Black]
            .into_iter()
            .map(|player| {
                format!(
                    "{}: {} points ({} moves)",
                    player,
                    self.score(player),
                    self.player_log(player).len()
                )
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.per_player.clear();
        self.scores.clear();
    }
}

impl CommandLog for MemoryCommandLog {
    fn log_command(&mut self, command: &Command) {
        self.commands.push(command.clone());
        self.per_player
            .entry(command.player())
            .or_default()
            .push(command.clone());
    }

    /// Scores only; the capturing command was already logged by `log_command`
    fn log_capture(&mut self, player: Player, captured_id: &str, _command: &Command) {
        let points = captured_id
            .chars()
            .next()
            .map_or(0, |code| log_capture_value(PieceKind::from_code(code)));
        *self.scores.entry(player).or_insert(0) += points;
    }
}
