//! TANKFALL command-line runner.
//!
//! Headless by default: fast-forwards a session with the built-in autopilot
//! and reports a summary. `--realtime` runs the threaded game loop instead.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use tankfall_app::autopilot;
use tankfall_app::game_loop::spawn_game_loop;
use tankfall_app::state::GameLoopCommand;
use tankfall_core::commands::{PlayerCommand, TickInput};
use tankfall_core::data::DataContext;
use tankfall_core::enums::GamePhase;
use tankfall_sim::{SimConfig, SimulationEngine};

/// Simulated time spent in game over before the autopilot respawns.
const RESPAWN_DELAY_MS: f64 = 3000.0;

#[derive(Parser, Debug)]
#[command(name = "tankfall")]
#[command(about = "Run a TANKFALL session with the built-in autopilot")]
struct Args {
    /// RNG seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Session length in seconds (simulated, or wall clock with --realtime)
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Directory holding crafts.json and waves.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// SimConfig JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the fixed-rate game loop thread instead of fast-forwarding
    #[arg(long)]
    realtime: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    simulated_secs: f64,
    score: u64,
    kills: u32,
    deaths: u32,
    highest_wave: u32,
    difficulty_level: u32,
    power_ups_delivered: u32,
    power_ups_collected: u32,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn run_headless(config: SimConfig, data: DataContext, seconds: f64) -> Summary {
    let seed = config.seed;
    let mut engine = SimulationEngine::new(config, data);
    engine.queue_command(PlayerCommand::StartSession);

    let mut summary = Summary {
        seed,
        ..Default::default()
    };
    let mut input = TickInput::default();
    let mut down_since: Option<f64> = None;
    let mut last_tick = 0;
    let limit_ms = seconds.max(0.0) * 1000.0;

    while engine.time().elapsed_ms < limit_ms {
        let snap = engine.tick(&input);
        input = autopilot::next_input(&snap);
        summary.highest_wave = summary.highest_wave.max(snap.wave.wave_number);

        let now = snap.time.elapsed_ms;
        match (snap.phase, down_since) {
            (GamePhase::GameOver, None) => {
                summary.deaths += 1;
                down_since = Some(now);
                log::info!("Tank destroyed at {:.1}s (score {})", now / 1000.0, snap.score.score);
            }
            (GamePhase::GameOver, Some(t)) if now - t >= RESPAWN_DELAY_MS => {
                engine.queue_command(PlayerCommand::RespawnTank);
                down_since = None;
            }
            _ => {}
        }
        if snap.time.tick == last_tick {
            // Zero time scale or no session: the clock will never reach the limit.
            log::warn!("Simulation clock stopped at tick {last_tick}; ending run");
            break;
        }
        last_tick = snap.time.tick;
    }

    let time = engine.time();
    let score = engine.score();
    summary.ticks = time.tick;
    summary.simulated_secs = time.elapsed_secs();
    summary.score = score.score;
    summary.kills = score.kills;
    summary.power_ups_delivered = score.power_ups_delivered;
    summary.power_ups_collected = score.power_ups_collected;
    summary.difficulty_level = engine.waves().difficulty_level();
    summary
}

fn run_realtime(config: SimConfig, data: DataContext, seconds: f64) -> Result<Summary> {
    let seed = config.seed;
    let (handle, join) = spawn_game_loop(config, data).context("spawning game loop thread")?;
    handle.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartSession));

    let started = Instant::now();
    let deadline = started + Duration::from_secs_f64(seconds.max(0.0));
    let mut summary = Summary {
        seed,
        ..Default::default()
    };
    let mut down_since: Option<Instant> = None;

    while Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(250));
        let Some(snap) = handle.snapshot() else {
            continue;
        };
        summary.highest_wave = summary.highest_wave.max(snap.wave.wave_number);

        match (snap.phase, down_since) {
            (GamePhase::GameOver, None) => {
                summary.deaths += 1;
                down_since = Some(Instant::now());
            }
            (GamePhase::GameOver, Some(t))
                if t.elapsed() >= Duration::from_secs_f64(RESPAWN_DELAY_MS / 1000.0) =>
            {
                handle.send(GameLoopCommand::PlayerCommand(PlayerCommand::RespawnTank));
                down_since = None;
            }
            _ => {}
        }
        log::debug!(
            "t={:.1}s wave {} enemies {} score {}",
            snap.time.elapsed_secs(),
            snap.wave.wave_number,
            snap.enemies.len(),
            snap.score.score
        );
    }

    let last = handle.snapshot();
    handle.send(GameLoopCommand::Shutdown);
    join.join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;

    if let Some(snap) = last {
        summary.ticks = snap.time.tick;
        summary.simulated_secs = snap.time.elapsed_secs();
        summary.score = snap.score.score;
        summary.kills = snap.score.kills;
        summary.power_ups_delivered = snap.score.power_ups_delivered;
        summary.power_ups_collected = snap.score.power_ups_collected;
        summary.difficulty_level = snap.wave.difficulty_level;
    }
    Ok(summary)
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,tankfall_sim=info"),
    )
    .format_timestamp_millis()
    .try_init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let data = match args.data_dir.as_deref() {
        Some(dir) => DataContext::load_or_empty(dir),
        None => DataContext::empty(),
    };
    log::info!(
        "Seed {}, {} craft entries, {} mode",
        config.seed,
        data.craft_count(),
        if args.realtime { "realtime" } else { "headless" }
    );

    let summary = if args.realtime {
        run_realtime(config, data, args.seconds)?
    } else {
        run_headless(config, data, args.seconds)
    };

    if args.summary_json {
        let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
        println!("{json}");
    } else {
        println!(
            "Ran {:.1}s: score {}, {} kills, {} deaths, wave {}, difficulty {}",
            summary.simulated_secs,
            summary.score,
            summary.kills,
            summary.deaths,
            summary.highest_wave,
            summary.difficulty_level
        );
    }
    Ok(())
}
