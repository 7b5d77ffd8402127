//! Flat move history, one `from → to` line per committed move

use crate::events::{EventListener, GameEvent};
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct MoveLog {
    moves: Vec<String>,
}

impl MoveLog {
    pub fn moves(&self) -> &[String] {
        &self.moves
    }
}

impl EventListener for MoveLog {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PieceMoved { from, to, .. } => {
                let line = format!("{from} → {to}");
                debug!("[MOVES] {}", line);
                self.moves.push(line);
            }
            GameEvent::GameStarted => self.moves.clear(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Player};

    #[test]
    fn test_move_lines() {
        let mut log = MoveLog::default();
        log.on_event(&GameEvent::PieceMoved {
            piece_id: "PW5".into(),
            from: "e2".into(),
            to: "e4".into(),
            player: Player::White,
            piece_type: PieceKind::Pawn,
            move_number: 1,
            captured_piece_type: None,
            at: 0,
        });
        log.on_event(&GameEvent::Sound { kind: crate::events::SoundKind::Move });
        assert_eq!(log.moves(), &["e2 → e4".to_string()]);
    }
}
