//! Real-time chess engine
//!
//! Both players move at once. Instead of turns, every piece runs its own
//! timed state machine: after it moves or jumps, it must rest before it can
//! act again. This crate is pure logic with no threads and no I/O. Callers
//! feed it [`Command`]s and call [`GameEngine::tick`] at a fixed rate.
//!
//! # Architecture
//!
//! - **state** - per-piece phase machine (`Idle`, `Move`, `Rest`, `Jump`,
//!   `ShortRest`, `Exhaust`)
//! - **moves** / **rules** - per-type moves tables with a fallback rule tier
//! - **board** - piece id → piece map with tolerant cell lookup
//! - **capture** - collision resolution and the king-presence check
//! - **command** - immutable input model and its text codec
//! - **dispatcher** - command → mutation, with explicit rejection reasons
//! - **scheduler** - sole owner of position interpolation
//! - **events** - typed publish/subscribe bus
//! - **game** - the facade tying it together
//!
//! # Usage
//!
//! ```rust,ignore
//! use kfchess_engine::{EngineConfig, GameEngine, LayoutKind};
//!
//! let mut engine = GameEngine::from_layout(EngineConfig::default(), LayoutKind::Standard)?;
//! engine.start();
//! engine.dispatch_text("WPW5 E2->E4");
//! engine.tick();
//! ```

pub mod board;
pub mod capture;
pub mod clock;
pub mod command;
pub mod command_log;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod game;
pub mod listeners;
pub mod moves;
pub mod piece;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod setup;
pub mod state;
pub mod types;
pub mod world;

pub use board::BoardIndex;
pub use capture::{check_winner, BlockReason, CaptureOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, CommandKind};
pub use command_log::{CommandLog, MemoryCommandLog, NullCommandLog, TracingCommandLog};
pub use config::EngineConfig;
pub use dispatcher::{ControlAction, DispatchOutcome, Dispatcher, Rejection};
pub use error::{EngineError, EngineResult};
pub use events::{shared, EventBus, EventKind, EventListener, GameEvent, Shared, SoundKind};
pub use game::{GameEngine, PieceView, Snapshot, TickReport};
pub use listeners::{MoveLog, ScoreBoard};
pub use moves::MovesTable;
pub use piece::Piece;
pub use rules::{FallbackRules, Legality, MoveValidator};
pub use scheduler::MotionScheduler;
pub use session::{PlayerSession, SessionMode};
pub use setup::{LayoutKind, PieceFactory};
pub use state::{Phase, PieceStateMachine};
pub use types::{BoardExtents, Cell, Displacement, Millis, PieceColor, PieceKind, Player};
pub use world::{GameStatus, World};
