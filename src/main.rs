//! Terminal front end: reads commands from stdin or a script and prints what
//! the engine did.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kfchess::core::settings::{self, load_or_default, save_settings};
use kfchess::input::feed_lines;
use kfchess::render::BoardView;
use kfchess::{build_engine, GameHandle, GameRuntime, GameSettings, RuntimeEvent};
use kfchess_engine::{shared, BoardExtents, DispatchOutcome, EventKind, MoveLog, Player, ScoreBoard};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Settings file to use instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Play interactively, one command per stdin line
    Play {
        /// Tick interval override in milliseconds
        #[arg(long, value_name = "MILLISECONDS")]
        tick_ms: Option<u64>,
    },
    /// Run a command script and print the result
    Replay {
        script: PathBuf,
        #[arg(long, value_name = "MILLISECONDS")]
        tick_ms: Option<u64>,
        /// Time to let pieces finish moving after the last line
        #[arg(long, value_name = "MILLISECONDS", default_value_t = 2500)]
        settle_ms: u64,
    },
    /// Write the default settings file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let path = args.config.clone().unwrap_or_else(settings::settings_path);
    let settings = load_or_default(&path);
    init_tracing(&settings.log_filter);
    info!("[SETTINGS] Using settings from {:?}", path);

    match args.command.unwrap_or(CliCommand::Play { tick_ms: None }) {
        CliCommand::Play { tick_ms } => play(&settings, tick_ms),
        CliCommand::Replay {
            script,
            tick_ms,
            settle_ms,
        } => replay(&settings, &script, tick_ms, Duration::from_millis(settle_ms)),
        CliCommand::InitConfig { force } => {
            if path.exists() && !force {
                warn!("[SETTINGS] {:?} already exists; pass --force to overwrite", path);
                return Ok(());
            }
            save_settings(&GameSettings::default(), &path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote default settings to {}", path.display());
            Ok(())
        }
    }
}

fn tick_interval(settings: &GameSettings, tick_ms: Option<u64>) -> Duration {
    Duration::from_millis(tick_ms.unwrap_or(settings.engine.tick_interval_ms).max(1))
}

fn play(settings: &GameSettings, tick_ms: Option<u64>) -> Result<()> {
    let engine = build_engine(settings).context("building the board")?;
    let runtime = GameRuntime::spawn(engine, tick_interval(settings, tick_ms))?;
    let handle = runtime.handle();
    let extents = settings.engine.extents();
    println!("{}", BoardView::new(&handle.snapshot(), extents));

    let bindings = settings.keys.clone();
    let input = handle.clone();
    let (done, input_closed) = crossbeam_channel::bounded::<()>(1);
    std::thread::Builder::new()
        .name("kfchess-stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            if let Err(e) = feed_lines(stdin.lock(), &bindings, |command| input.send(command)) {
                warn!("[INPUT] Stdin reader stopped: {}", e);
            }
            let _ = done.send(());
        })?;

    loop {
        let mut stop = false;
        crossbeam_channel::select! {
            recv(runtime.events()) -> event => match event {
                Ok(event) => show(event, &handle, extents),
                Err(_) => stop = true,
            },
            recv(input_closed) -> _ => {
                info!("[INPUT] End of input");
                stop = true;
            }
        }
        if stop || handle.snapshot().status.is_over() {
            break;
        }
    }
    let last = runtime.shutdown();
    println!("Game over: {:?}", last.status);
    Ok(())
}

fn show(event: RuntimeEvent, handle: &GameHandle, extents: BoardExtents) {
    match event {
        RuntimeEvent::Dispatched { command, outcome } => {
            println!("{} => {}", command, describe(&outcome));
            if moved(&outcome) {
                println!("{}", BoardView::new(&handle.snapshot(), extents));
            }
        }
        RuntimeEvent::Ticked(report) => {
            if !report.arrivals.is_empty() {
                println!("{}", BoardView::new(&handle.snapshot(), extents));
            }
            if let Some(winner) = report.winner {
                println!("{} wins", winner);
            }
        }
    }
}

fn replay(
    settings: &GameSettings,
    script: &Path,
    tick_ms: Option<u64>,
    settle: Duration,
) -> Result<()> {
    let file = File::open(script).with_context(|| format!("opening {}", script.display()))?;

    let scores = shared(ScoreBoard::new());
    let moves = shared(MoveLog::default());
    let mut engine = build_engine(settings).context("building the board")?;
    engine.events().subscribe_shared(&EventKind::ALL, &scores);
    engine.events().subscribe_shared(&[EventKind::PieceMoved], &moves);

    let runtime = GameRuntime::spawn(engine, tick_interval(settings, tick_ms))?;
    let handle = runtime.handle();
    let sent = feed_lines(BufReader::new(file), &settings.keys, |command| {
        runtime.discard_events();
        handle.send(command)
    })?;
    runtime.settle(settle);
    let last = runtime.shutdown();
    info!("[RUNTIME] Replayed {} commands from {:?}", sent, script);

    println!("{}", BoardView::new(&last, settings.engine.extents()));
    for line in moves.lock().moves() {
        println!("{}", line);
    }
    let scores = scores.lock();
    for player in [Player::White, Player::Black] {
        println!("{}: {} points", player, scores.score(player));
    }
    if let Some(winner) = scores.winner() {
        println!("{} wins", winner);
    }
    Ok(())
}

fn moved(outcome: &DispatchOutcome) -> bool {
    matches!(
        outcome,
        DispatchOutcome::Moved { .. } | DispatchOutcome::Captured { .. } | DispatchOutcome::Jumped { .. }
    )
}

fn describe(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Moved { piece_id, from, to } => format!("{} moving {} -> {}", piece_id, from, to),
        DispatchOutcome::Captured {
            piece_id,
            captured_id,
            at,
            ..
        } => format!("{} took {} at {}", piece_id, captured_id, at),
        DispatchOutcome::Jumped { piece_id, to, .. } => format!("{} jumped to {}", piece_id, to),
        DispatchOutcome::Rejected(reason) => format!("rejected ({:?})", reason),
        other => format!("{:?}", other),
    }
}
