//! Runtime Integration Tests
//!
//! Drives the tick thread through its command queue:
//! - Settings → engine construction
//! - Queued commands dispatched in order
//! - Arrivals reported once the clock passes the move duration
//! - Shutdown and handles that outlive the runtime
//! - Script input through the key bindings
//! - Command log wiring and unwatched event streams

use crossbeam_channel::Receiver;
use kfchess::input::{feed_lines, KeyBindings};
use kfchess::{build_engine, build_engine_with_log, CoreError, GameRuntime, GameSettings, RuntimeEvent};
use kfchess_engine::{
    shared, Cell, Command, DispatchOutcome, GameStatus, LayoutKind, ManualClock, MemoryCommandLog,
    Player, Rejection,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(2);
const PATIENCE: Duration = Duration::from_secs(5);

/// Standard board on a hand-driven clock, already ticking
fn runtime() -> (GameRuntime, ManualClock) {
    let clock = ManualClock::new(0);
    let engine = build_engine(&GameSettings::default())
        .expect("default layout builds")
        .with_clock(Arc::new(clock.clone()));
    let runtime = GameRuntime::spawn(engine, TICK).expect("tick thread starts");
    (runtime, clock)
}

/// First event matching `wanted`, skipping the rest
fn wait_for(
    events: &Receiver<RuntimeEvent>,
    wanted: impl Fn(&RuntimeEvent) -> bool,
) -> Option<RuntimeEvent> {
    let deadline = Instant::now() + PATIENCE;
    while let Some(left) = deadline.checked_duration_since(Instant::now()) {
        match events.recv_timeout(left) {
            Ok(event) if wanted(&event) => return Some(event),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
    None
}

fn dispatched(event: &RuntimeEvent) -> bool {
    matches!(event, RuntimeEvent::Dispatched { .. })
}

// ============================================================================
// Setup Tests
// ============================================================================

#[test]
fn test_build_engine_from_settings() {
    let mut settings = GameSettings::default();
    settings.layout = LayoutKind::BackRank;
    let engine = build_engine(&settings).unwrap();
    assert_eq!(engine.board().len(), 16, "Back rank layout has eight pieces a side");
    assert_eq!(engine.status(), GameStatus::Ready);
}

#[test]
fn test_spawn_starts_the_game() {
    let (runtime, _clock) = runtime();
    let snapshot = runtime.handle().snapshot();
    assert_eq!(snapshot.status, GameStatus::Running);
    assert_eq!(snapshot.white.selected.as_deref(), Some("BW1"));
    assert_eq!(snapshot.pieces.len(), 32);
}

// ============================================================================
// Queue Tests
// ============================================================================

#[test]
fn test_commands_dispatch_in_queue_order() {
    let (runtime, _clock) = runtime();
    let handle = runtime.handle();
    handle.send(Command::parse("WPW5 E2->E4")).unwrap();
    handle.send(Command::parse("WPW5 E4->E5")).unwrap();

    let first = wait_for(runtime.events(), dispatched).expect("first dispatch");
    let second = wait_for(runtime.events(), dispatched).expect("second dispatch");
    assert!(matches!(
        first,
        RuntimeEvent::Dispatched { outcome: DispatchOutcome::Moved { .. }, .. }
    ));
    assert_eq!(
        second,
        RuntimeEvent::Dispatched {
            command: "WPW5 E4->E5".into(),
            outcome: DispatchOutcome::Rejected(Rejection::Cooling),
        },
        "The pawn is still moving when the second command runs"
    );
}

#[test]
fn test_arrival_reported_after_move_duration() {
    let (runtime, clock) = runtime();
    let handle = runtime.handle();
    handle.send(Command::parse("BPB4 D7->D5")).unwrap();
    wait_for(runtime.events(), dispatched).expect("dispatch");

    clock.set(2000);
    let arrived = wait_for(runtime.events(), |event| {
        matches!(event, RuntimeEvent::Ticked(report) if !report.arrivals.is_empty())
    });
    let Some(RuntimeEvent::Ticked(report)) = arrived else {
        panic!("no arrival reported");
    };
    assert_eq!(report.arrivals[0].piece_id, "PB4");
    assert_eq!(report.arrivals[0].at, Cell::new(3, 3));

    let snapshot = runtime.shutdown();
    let pawn = snapshot.pieces.iter().find(|p| p.id == "PB4").unwrap();
    assert_eq!((pawn.x, pawn.y), (3.0, 3.0));
}

#[test]
fn test_handle_fails_after_shutdown() {
    let (runtime, _clock) = runtime();
    let handle = runtime.handle();
    let session = handle.session_id();
    let last = runtime.shutdown();
    assert_eq!(last.status, GameStatus::Running);

    assert_eq!(handle.session_id(), session);
    assert!(matches!(
        handle.send(Command::parse("W_UP")),
        Err(CoreError::RuntimeStopped { .. })
    ));
    assert_eq!(handle.snapshot().pieces.len(), 32, "State stays readable");
}

// ============================================================================
// Script Input Tests
// ============================================================================

#[test]
fn test_script_keys_reach_the_engine() {
    //! `key` lines go through the default bindings: D cycles white's
    //! selection forward, digits select by number
    let (runtime, _clock) = runtime();
    let handle = runtime.handle();
    let script = "# white\nkey 68\nkey 52\n";
    let sent = feed_lines(script.as_bytes(), &KeyBindings::default(), |c| handle.send(c)).unwrap();
    assert_eq!(sent, 2);

    let first = wait_for(runtime.events(), dispatched).unwrap();
    let second = wait_for(runtime.events(), dispatched).unwrap();
    assert_eq!(
        first,
        RuntimeEvent::Dispatched {
            command: "W_RIGHT".into(),
            outcome: DispatchOutcome::Selected { piece_id: "BW2".into() },
        }
    );
    let RuntimeEvent::Dispatched { outcome, .. } = second else {
        unreachable!()
    };
    assert_eq!(outcome, DispatchOutcome::Selected { piece_id: "NW1".into() });
}

// ============================================================================
// Logging and Event Stream Tests
// ============================================================================

#[test]
fn test_command_log_sees_runtime_commands() {
    //! Every command the tick thread dispatches reaches the attached log
    let log = shared(MemoryCommandLog::new());
    let engine = build_engine_with_log(&GameSettings::default(), Arc::clone(&log))
        .expect("default layout builds");
    let runtime = GameRuntime::spawn(engine, TICK).expect("tick thread starts");
    let handle = runtime.handle();
    handle.send(Command::parse("WPW5 E2->E4")).unwrap();
    handle.send(Command::parse("B_DOWN")).unwrap();
    runtime.shutdown();

    let log = log.lock();
    let texts: Vec<&str> = log.commands().iter().map(|c| c.text()).collect();
    assert_eq!(texts, ["WPW5 E2->E4", "B_DOWN"], "Logged in queue order");
    assert_eq!(log.player_log(Player::White).len(), 1);
    assert_eq!(log.player_log(Player::Black).len(), 1);
}

#[test]
fn test_unwatched_events_are_discarded() {
    let (runtime, _clock) = runtime();
    runtime.handle().send(Command::parse("W_DOWN")).unwrap();
    assert!(
        runtime.settle(Duration::from_millis(200)) >= 1,
        "The dispatch event is consumed while settling"
    );
    assert_eq!(runtime.discard_events(), 0);
    assert!(runtime.events().is_empty(), "Nothing is left queued");
}
