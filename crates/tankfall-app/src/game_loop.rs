//! Game loop thread: runs the simulation engine at the nominal tick rate.
//!
//! The engine is created inside this thread so it never crosses a thread
//! boundary. Commands arrive via an `mpsc` channel; the latest snapshot is
//! stored in shared state for polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tankfall_core::commands::TickInput;
use tankfall_core::constants::TICK_RATE;
use tankfall_core::data::DataContext;
use tankfall_core::state::GameStateSnapshot;
use tankfall_sim::{SimConfig, SimulationEngine};

use crate::autopilot;
use crate::state::{GameLoopCommand, LoopHandle};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the game loop in a new thread.
pub fn spawn_game_loop(
    config: SimConfig,
    data: DataContext,
) -> io::Result<(LoopHandle, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let join = std::thread::Builder::new()
        .name("tankfall-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config, data);
            run_game_loop(engine, cmd_rx, &shared);
        })?;

    Ok((LoopHandle::new(cmd_tx, latest_snapshot), join))
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut next_tick_time = Instant::now();
    let mut manual_input: Option<TickInput> = None;
    let mut input = TickInput::default();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Input(i)) => manual_input = Some(i),
                Ok(GameLoopCommand::Shutdown) => {
                    log::info!("Game loop shutting down at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (the engine handles pause semantics itself)
        let snapshot = engine.tick(manual_input.as_ref().unwrap_or(&input));
        if manual_input.is_none() {
            input = autopilot::next_input(&snapshot);
        }

        // 3. Store the latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next tick, adjusted for time scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            log::debug!("Game loop fell behind; resetting tick clock");
            next_tick_time = now;
        }
    }
}
