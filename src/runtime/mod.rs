//! Runtime - the tick thread and its command queue
//!
//! The engine lives behind one `parking_lot::Mutex`. Input sources never
//! touch it: they push [`Command`]s into a `crossbeam_channel` queue through
//! a [`GameHandle`]. On every tick the runtime thread takes the lock, drains
//! the queue in arrival order, dispatches each command and then advances the
//! engine. One lock per tick makes each dispatch a single critical section.
//!
//! What happened is reported back on a second channel as [`RuntimeEvent`]s.

use crate::core::{CoreError, CoreResult, GameSettings};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use kfchess_engine::{
    Command, CommandLog, DispatchOutcome, GameEngine, PieceFactory, Snapshot, TickReport,
    TracingCommandLog,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Build the configured board and engine, logging commands through `tracing`
pub fn build_engine(settings: &GameSettings) -> CoreResult<GameEngine> {
    build_engine_with_log(settings, TracingCommandLog)
}

/// Build the configured board and engine with `log` as the command log
pub fn build_engine_with_log(
    settings: &GameSettings,
    log: impl CommandLog + 'static,
) -> CoreResult<GameEngine> {
    let board = PieceFactory::new(settings.engine.clone()).layout(settings.layout)?;
    info!(
        "[RUNTIME] Built {:?} layout with {} pieces",
        settings.layout,
        board.len()
    );
    Ok(GameEngine::new(settings.engine.clone(), board).with_log(log))
}

enum RuntimeMessage {
    Command(Command),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    Dispatched {
        command: String,
        outcome: DispatchOutcome,
    },
    /// Only sent for ticks that changed something
    Ticked(TickReport),
}

/// Cloneable access point for input threads and renderers
#[derive(Clone)]
pub struct GameHandle {
    session_id: Uuid,
    engine: Arc<Mutex<GameEngine>>,
    sender: Sender<RuntimeMessage>,
}

impl GameHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Queue a command for the next tick
    pub fn send(&self, command: Command) -> CoreResult<()> {
        self.sender
            .send(RuntimeMessage::Command(command))
            .map_err(|e| CoreError::RuntimeStopped {
                message: format!("command {} not queued", e.0.text()),
            })
    }

    /// Cloned frame; holds the lock only while copying
    pub fn snapshot(&self) -> Snapshot {
        self.engine.lock().snapshot()
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut GameEngine) -> R) -> R {
        f(&mut self.engine.lock())
    }
}

impl RuntimeMessage {
    fn text(&self) -> &str {
        match self {
            RuntimeMessage::Command(command) => command.text(),
            RuntimeMessage::Shutdown => "<shutdown>",
        }
    }
}

pub struct GameRuntime {
    handle: GameHandle,
    events: Receiver<RuntimeEvent>,
    thread: Option<JoinHandle<()>>,
}

impl GameRuntime {
    /// Start the tick thread. The engine is started first if it is not
    /// running yet.
    pub fn spawn(mut engine: GameEngine, tick_interval: Duration) -> CoreResult<Self> {
        engine.start();
        let session_id = Uuid::new_v4();
        let engine = Arc::new(Mutex::new(engine));
        let (sender, commands) = crossbeam_channel::unbounded();
        let (event_sender, events) = crossbeam_channel::unbounded();

        let shared = Arc::clone(&engine);
        let thread = std::thread::Builder::new()
            .name("kfchess-tick".to_string())
            .spawn(move || run_loop(shared, commands, event_sender, tick_interval))?;
        info!(
            "[RUNTIME] Session {} ticking every {:?}",
            session_id, tick_interval
        );

        Ok(Self {
            handle: GameHandle {
                session_id,
                engine,
                sender,
            },
            events,
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    pub fn events(&self) -> &Receiver<RuntimeEvent> {
        &self.events
    }

    /// Throw away events already waiting; for callers that do not watch
    pub fn discard_events(&self) -> usize {
        self.events.try_iter().count()
    }

    /// Keep discarding events for `period`. Returns how many were dropped.
    pub fn settle(&self, period: Duration) -> usize {
        let deadline = Instant::now() + period;
        let mut dropped = 0;
        while let Some(left) = deadline.checked_duration_since(Instant::now()) {
            if self.events.recv_timeout(left).is_err() {
                break;
            }
            dropped += 1;
        }
        dropped
    }

    /// Stop the tick thread after it drains what is already queued, and
    /// return the final frame
    pub fn shutdown(mut self) -> Snapshot {
        self.stop();
        self.handle.snapshot()
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        if self.handle.sender.send(RuntimeMessage::Shutdown).is_err() {
            debug!("[RUNTIME] Tick thread already gone");
        }
        if thread.join().is_err() {
            warn!("[RUNTIME] Tick thread panicked");
        }
        info!("[RUNTIME] Session {} stopped", self.handle.session_id);
    }
}

impl Drop for GameRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    engine: Arc<Mutex<GameEngine>>,
    commands: Receiver<RuntimeMessage>,
    events: Sender<RuntimeEvent>,
    tick_interval: Duration,
) {
    let ticker = crossbeam_channel::tick(tick_interval);
    loop {
        if ticker.recv().is_err() {
            break;
        }
        let mut engine = engine.lock();
        let keep_running = drain(&mut engine, &commands, &events);

        let report = engine.tick();
        if !report.arrivals.is_empty() || !report.transitions.is_empty() || report.winner.is_some() {
            let _ = events.send(RuntimeEvent::Ticked(report));
        }
        if !keep_running {
            break;
        }
    }
    debug!("[RUNTIME] Tick loop exited");
}

/// Dispatch every queued command. Returns false once shutdown was requested
/// or every sender is gone.
fn drain(
    engine: &mut GameEngine,
    commands: &Receiver<RuntimeMessage>,
    events: &Sender<RuntimeEvent>,
) -> bool {
    loop {
        let message = match commands.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        };
        let RuntimeMessage::Command(command) = message else {
            debug!("[RUNTIME] Shutdown requested");
            return false;
        };
        let outcome = engine.dispatch(&command);
        debug!("[RUNTIME] {} -> {:?}", command.text(), outcome);
        // The receiver may be gone when nobody is watching
        let _ = events.send(RuntimeEvent::Dispatched {
            command: command.text().to_string(),
            outcome,
        });
    }
}
