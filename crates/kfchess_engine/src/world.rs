//! Mutable game state the dispatcher works on
//!
//! Everything a command may touch lives here so one `&mut World` is the whole
//! critical section of a dispatch.

use crate::board::BoardIndex;
use crate::capture::check_winner;
use crate::command_log::{CommandLog, NullCommandLog};
use crate::events::{EventBus, GameEvent};
use crate::scheduler::MotionScheduler;
use crate::types::{Cell, Player};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum GameStatus {
    /// Built but `START_GAME` not yet seen
    #[default]
    Ready,
    Running,
    /// Ended by a king capture (`Some`) or by an `END_GAME` control (`None`)
    Ended { winner: Option<Player> },
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Ended { .. })
    }
}

pub struct World {
    pub board: BoardIndex,
    pub scheduler: MotionScheduler,
    pub bus: EventBus,
    pub log: Box<dyn CommandLog>,
    status: GameStatus,
    move_count: u32,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("board", &self.board)
            .field("scheduler", &self.scheduler)
            .field("bus", &self.bus)
            .field("status", &self.status)
            .field("move_count", &self.move_count)
            .finish_non_exhaustive()
    }
}

impl World {
    pub fn new(board: BoardIndex, scheduler: MotionScheduler) -> Self {
        Self {
            board,
            scheduler,
            bus: EventBus::new(),
            log: Box::new(NullCommandLog),
            status: GameStatus::Ready,
            move_count: 0,
        }
    }

    pub fn with_log(mut self, log: impl CommandLog + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Count one committed move and return its 1-based number
    pub(crate) fn next_move_number(&mut self) -> u32 {
        self.move_count += 1;
        self.move_count
    }

    pub fn notation(&self, cell: Cell) -> String {
        cell.to_notation(self.board.extents().height)
    }

    /// Mark the game running and announce it. Returns false if it already
    /// started or ended.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Ready {
            return false;
        }
        self.status = GameStatus::Running;
        self.move_count = 0;
        info!("[GAME] Game started with {} pieces", self.board.len());
        self.bus.publish(&GameEvent::GameStarted);
        true
    }

    /// Stop the game without a winner
    pub fn abort(&mut self) -> bool {
        if self.status.is_over() {
            return false;
        }
        self.status = GameStatus::Ended { winner: None };
        info!("[GAME] Game ended by control command");
        true
    }

    /// Re-run the king scan and end the game if a side has lost its king.
    /// `GameEnded` is published the first time only.
    pub fn check_game_end(&mut self) -> Option<Player> {
        if self.status.is_over() {
            return None;
        }
        let winner = check_winner(&self.board)?;
        self.status = GameStatus::Ended {
            winner: Some(winner),
        };
        info!("[GAME] {} wins: opposing king is gone", winner);
        self.bus.publish(&GameEvent::GameEnded { winner });
        Some(winner)
    }
}
