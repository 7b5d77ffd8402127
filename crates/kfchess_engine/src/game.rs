//! Game engine facade
//!
//! Owns the world, both player sessions and the clock. Callers serialize
//! access (the runtime keeps the engine behind one mutex) so each
//! [`GameEngine::dispatch`] and [`GameEngine::tick`] is one critical section.

use crate::board::BoardIndex;
use crate::clock::{Clock, SystemClock};
use crate::command::Command;
use crate::command_log::CommandLog;
use crate::config::EngineConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::EngineResult;
use crate::events::EventBus;
use crate::scheduler::{Arrival, MotionScheduler};
use crate::session::PlayerSession;
use crate::setup::{LayoutKind, PieceFactory};
use crate::state::{Phase, PhaseTransition};
use crate::types::{Millis, PieceColor, PieceKind, Player};
use crate::world::{GameStatus, World};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// What one tick changed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    pub arrivals: Vec<Arrival>,
    pub transitions: Vec<(String, PhaseTransition)>,
    /// Set on the tick that ended the game
    pub winner: Option<Player>,
}

/// Render-side view of one piece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceView {
    pub id: String,
    pub kind: PieceKind,
    pub color: PieceColor,
    pub x: f64,
    pub y: f64,
    pub phase: Phase,
    pub remaining_ms: Millis,
}

/// Cloned frame for renderers; holds no references into the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub now: Millis,
    pub status: GameStatus,
    pub move_count: u32,
    pub pieces: Vec<PieceView>,
    pub white: PlayerSession,
    pub black: PlayerSession,
}

pub struct GameEngine {
    world: World,
    dispatcher: Dispatcher,
    white: PlayerSession,
    black: PlayerSession,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("world", &self.world)
            .field("white", &self.white)
            .field("black", &self.black)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    pub fn new(config: EngineConfig, board: BoardIndex) -> Self {
        let scheduler = MotionScheduler::new(config.move_duration_ms);
        Self {
            world: World::new(board, scheduler),
            dispatcher: Dispatcher::default(),
            white: PlayerSession::new(Player::White),
            black: PlayerSession::new(Player::Black),
            clock: Arc::new(SystemClock::default()),
            config,
        }
    }

    /// Engine on one of the built-in layouts with default moves tables
    pub fn from_layout(config: EngineConfig, layout: LayoutKind) -> EngineResult<Self> {
        let board = PieceFactory::new(config.clone()).layout(layout)?;
        Ok(Self::new(config, board))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_log(mut self, log: impl CommandLog + 'static) -> Self {
        self.world.log = Box::new(log);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn board(&self) -> &BoardIndex {
        &self.world.board
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut self.world.bus
    }

    pub fn status(&self) -> GameStatus {
        self.world.status()
    }

    pub fn session(&self, player: Player) -> Option<&PlayerSession> {
        match player {
            Player::White => Some(&self.white),
            Player::Black => Some(&self.black),
            Player::System => None,
        }
    }

    /// Start the game: both players begin with their first piece selected
    pub fn start(&mut self) -> bool {
        if !self.world.start() {
            return false;
        }
        self.reset_sessions();
        true
    }

    fn reset_sessions(&mut self) {
        for session in [&mut self.white, &mut self.black] {
            let first = self.world.board.player_piece_ids(session.player()).into_iter().next();
            debug!("[GAME] {} starts on {:?}", session.player(), first);
            session.reset(first);
        }
    }

    pub fn dispatch(&mut self, command: &Command) -> DispatchOutcome {
        let now = self.clock.now();
        let was_ready = self.world.status() == GameStatus::Ready;

        let session = match command.player() {
            Player::White => Some(&mut self.white),
            Player::Black => Some(&mut self.black),
            Player::System => None,
        };
        let outcome = self.dispatcher.dispatch(&mut self.world, session, command, now);

        if was_ready && self.world.status() == GameStatus::Running {
            self.reset_sessions();
        }
        if let Some(captured) = outcome.captured_id() {
            self.white.forget(captured);
            self.black.forget(captured);
        }
        outcome
    }

    /// Parse and dispatch one line of command text
    pub fn dispatch_text(&mut self, text: &str) -> DispatchOutcome {
        self.dispatch(&Command::parse(text))
    }

    /// Advance motions and phase timers to the current time, then re-check
    /// for a winner
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let arrivals = self.world.scheduler.advance(&mut self.world.board, now);
        for arrival in &arrivals {
            debug!("[GAME] {} arrived at {}", arrival.piece_id, arrival.at);
        }

        let transitions = self
            .world
            .board
            .pieces_mut()
            .filter_map(|piece| {
                let transition = piece.state.tick(now)?;
                Some((piece.id().to_string(), transition))
            })
            .collect();

        let winner = self.world.check_game_end();
        if let Some(winner) = winner {
            info!("[GAME] Game over on tick, winner {}", winner);
        }
        TickReport {
            arrivals,
            transitions,
            winner,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        let pieces = self
            .world
            .board
            .pieces()
            .map(|piece| PieceView {
                id: piece.id().to_string(),
                kind: piece.kind(),
                color: piece.color(),
                x: piece.x,
                y: piece.y,
                phase: piece.phase(),
                remaining_ms: piece.state.remaining(now),
            })
            .collect();
        Snapshot {
            now,
            status: self.world.status(),
            move_count: self.world.move_count(),
            pieces,
            white: self.white.clone(),
            black: self.black.clone(),
        }
    }
}
