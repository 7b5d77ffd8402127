//! Typed publish/subscribe bus
//!
//! Events are a tagged union; listeners subscribe per [`EventKind`] and are
//! called synchronously, in registration order, on the publishing thread.
//! Publishing with no subscribers is a no-op.
//!
//! ```rust,ignore
//! let moves = shared(MoveLog::default());
//! bus.subscribe(EventKind::PieceMoved, Arc::clone(&moves));
//! bus.subscribe_fn(EventKind::Sound, |event| println!("{event:?}"));
//! ```

use crate::types::{Millis, PieceKind, Player};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SoundKind {
    Move,
    Jump,
    Capture,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PieceMoved {
        piece_id: String,
        /// Squares in algebraic notation
        from: String,
        to: String,
        player: Player,
        piece_type: PieceKind,
        /// 1-based count of completed moves and jumps in this game
        move_number: u32,
        captured_piece_type: Option<PieceKind>,
        /// Engine clock time the move was committed
        at: Millis,
    },
    GameStarted,
    GameEnded {
        winner: Player,
    },
    Sound {
        kind: SoundKind,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    PieceMoved,
    GameStarted,
    GameEnded,
    Sound,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::PieceMoved,
        EventKind::GameStarted,
        EventKind::GameEnded,
        EventKind::Sound,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PieceMoved { .. } => EventKind::PieceMoved,
            GameEvent::GameStarted => EventKind::GameStarted,
            GameEvent::GameEnded { .. } => EventKind::GameEnded,
            GameEvent::Sound { .. } => EventKind::Sound,
        }
    }
}

pub trait EventListener: Send {
    fn on_event(&mut self, event: &GameEvent);
}

/// Listener state the owner keeps a handle to after subscribing
pub type Shared<T> = Arc<Mutex<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

impl<L: EventListener> EventListener for Arc<Mutex<L>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.lock().on_event(event);
    }
}

struct FnListener<F>(F);

impl<F> EventListener for FnListener<F>
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<Box<dyn EventListener>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&EventKind, usize> =
            self.listeners.iter().map(|(kind, list)| (kind, list.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L>(&mut self, kind: EventKind, listener: L)
    where
        L: EventListener + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(listener));
    }

    pub fn subscribe_fn<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.subscribe(kind, FnListener(listener));
    }

    /// Subscribe one shared listener to several kinds
    pub fn subscribe_shared<L>(&mut self, kinds: &[EventKind], listener: &Shared<L>)
    where
        L: EventListener + 'static,
    {
        for &kind in kinds {
            self.subscribe(kind, Arc::clone(listener));
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn publish(&mut self, event: &GameEvent) {
        let kind = event.kind();
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            return;
        };
        trace!("[EVENTS] Publishing {:?} to {} listeners", kind, listeners.len());
        for listener in listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}
