//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the tank, the wave scheduler and
//! the power-up economy. It processes player commands, runs all systems in a
//! fixed order, and produces `GameStateSnapshot`s. Completely headless, which
//! keeps it deterministic and testable.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use tankfall_core::commands::{DebugCommand, PlayerCommand, TickInput};
use tankfall_core::components::{Lifecycle, PowerUp};
use tankfall_core::constants::*;
use tankfall_core::data::DataContext;
use tankfall_core::enums::{EnemyKind, GamePhase, PowerUpKind, UnknownCraft};
use tankfall_core::events::{AudioEvent, VisualEvent};
use tankfall_core::state::GameStateSnapshot;
use tankfall_core::types::{Position, SimTime};

use crate::combat::{self, Kill, Outbox};
use crate::ordnance::{AreaBlast, ProjectileSpawn};
use crate::schedule::{EventQueue, ScheduledEvent};
use crate::session::ScoreState;
use crate::systems;
use crate::systems::power_ups::{Delivery, SelectionContext};
use crate::systems::wave_scheduler::{WaveScheduler, WaveTiming};
use crate::tank::Tank;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Nominal tick length in ms.
    pub frame_ms: f64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub first_wave_delay_ms: f64,
    pub wave_delay_ms: f64,
    pub difficulty_interval_ms: f64,
    pub tank_max_health: f64,
    /// Disable support-unit deliveries entirely.
    pub power_ups_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frame_ms: FRAME_MS,
            time_scale: 1.0,
            first_wave_delay_ms: FIRST_WAVE_DELAY_MS,
            wave_delay_ms: WAVE_DELAY_MS,
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,
            tank_max_health: TANK_MAX_HEALTH,
            power_ups_enabled: true,
        }
    }
}

impl SimConfig {
    fn wave_timing(&self) -> WaveTiming {
        WaveTiming {
            first_wave_delay_ms: self.first_wave_delay_ms,
            wave_delay_ms: self.wave_delay_ms,
            difficulty_interval_ms: self.difficulty_interval_ms,
        }
    }
}

/// A rejected operator command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    UnknownCraft(#[from] UnknownCraft),
    #[error("weapon level {0} is out of range (0..=3)")]
    InvalidLevel(u8),
    #[error("spawn position ({x}, {y}) is not finite")]
    InvalidPosition { x: f64, y: f64 },
    #[error("no session is running")]
    NoSession,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    time_scale: f64,
    rng: ChaCha8Rng,
    data: DataContext,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    outbox: Outbox,

    tank: Tank,
    waves: WaveScheduler,
    delivery: Delivery,
    score: ScoreState,
    events: EventQueue,

    // Per-tick scratch, kept to avoid reallocating.
    pending_spawns: Vec<ProjectileSpawn>,
    blasts: Vec<AreaBlast>,
    kills: Vec<Kill>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config and data tables.
    pub fn new(config: SimConfig, data: DataContext) -> Self {
        log::info!(
            "Engine created: seed {}, {} craft entries",
            config.seed,
            data.craft_count()
        );
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            data,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            outbox: Outbox::default(),
            tank: Tank::new(config.tank_max_health),
            waves: WaveScheduler::new(config.wave_timing()),
            delivery: Delivery::new(config.power_ups_enabled),
            score: ScoreState::default(),
            events: EventQueue::new(),
            pending_spawns: Vec::new(),
            blasts: Vec::new(),
            kills: Vec::new(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one nominal frame (scaled) and return the snapshot.
    /// A time scale queued for this tick already applies to it.
    pub fn tick(&mut self, input: &TickInput) -> GameStateSnapshot {
        self.process_commands();
        let dt_ms = self.config.frame_ms * self.time_scale;
        self.step(input, dt_ms)
    }

    /// Advance the simulation by `dt_ms` simulated milliseconds.
    pub fn tick_with_delta(&mut self, input: &TickInput, dt_ms: f64) -> GameStateSnapshot {
        self.process_commands();
        self.step(input, dt_ms)
    }

    fn step(&mut self, input: &TickInput, dt_ms: f64) -> GameStateSnapshot {
        let running = matches!(self.phase, GamePhase::Active | GamePhase::GameOver);
        if running && dt_ms > 0.0 && dt_ms.is_finite() {
            self.run_systems(input, dt_ms);
            self.time.advance(dt_ms);
        }

        self.snapshot()
    }

    /// Build a snapshot of the current state. Drains pending audio/visual events.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let (alive, _) = systems::enemy_ai::count_alive(&self.world, 0);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.tank,
            self.waves.view(alive),
            &self.score,
            &mut self.outbox,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tank(&self) -> &Tank {
        &self.tank
    }

    pub fn tank_mut(&mut self) -> &mut Tank {
        &mut self.tank
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Deferred events still waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Spawn an enemy directly, outside the wave schedule (operator tools and tests).
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Position) -> hecs::Entity {
        let direction = if position.x < PLAYFIELD_WIDTH * 0.5 {
            1.0
        } else {
            -1.0
        };
        world_setup::spawn_enemy(
            &mut self.world,
            &self.data,
            kind,
            position,
            direction,
            None,
            0,
        )
    }

    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> hecs::Entity {
        world_setup::spawn_projectile(&mut self.world, spawn)
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, position: Position) -> hecs::Entity {
        world_setup::spawn_power_up(&mut self.world, kind, position)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartSession => {
                if self.phase == GamePhase::Idle {
                    self.begin_session();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::RespawnTank => {
                if self.phase == GamePhase::GameOver {
                    let now = self.time.elapsed_ms;
                    self.tank.respawn();
                    self.waves.resume(now);
                    self.delivery.reset(now);
                    self.phase = GamePhase::Active;
                    log::info!("Tank respawned; replaying wave {}", self.waves.wave_number());
                }
            }
            PlayerCommand::NewCampaign => {
                log::info!("New campaign");
                self.begin_session();
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = if scale.is_finite() {
                    scale.clamp(0.0, 4.0)
                } else {
                    1.0
                };
            }
            PlayerCommand::Debug { command } => {
                if let Err(e) = self.handle_debug(command) {
                    log::warn!("Debug command rejected: {e}");
                }
            }
        }
    }

    /// Reset all session state and start a fresh session at the current time.
    fn begin_session(&mut self) {
        let now = self.time.elapsed_ms;
        self.world.clear();
        self.events.clear();
        self.outbox.clear();
        self.pending_spawns.clear();
        self.blasts.clear();
        self.kills.clear();

        world_setup::setup_session(&mut self.world);
        self.tank = Tank::new(self.config.tank_max_health);
        self.score = ScoreState::default();
        self.waves = WaveScheduler::new(self.config.wave_timing());
        self.waves.start(now);
        self.delivery = Delivery::new(self.config.power_ups_enabled);
        self.delivery.reset(now);
        self.phase = GamePhase::Active;
        log::info!("Session started at {now:.0} ms");
    }

    /// Apply an operator command through the public contracts.
    pub fn handle_debug(&mut self, command: DebugCommand) -> Result<(), CommandError> {
        if self.phase == GamePhase::Idle {
            return Err(CommandError::NoSession);
        }
        let now = self.time.elapsed_ms;
        match command {
            DebugCommand::SetWeapon { weapon, level } => {
                if level > MAX_WEAPON_LEVEL {
                    return Err(CommandError::InvalidLevel(level));
                }
                self.tank.arsenal.set_level(weapon, level);
            }
            DebugCommand::ActivateEffect {
                power_up,
                duration_ms,
            } => match power_up.timed_effect() {
                Some(effect) => self.tank.effects.activate(effect, duration_ms),
                None => systems::power_ups::apply_effect(
                    power_up,
                    &mut self.world,
                    &mut self.tank,
                    &mut self.score,
                    &mut self.kills,
                    &mut self.outbox,
                ),
            },
            DebugCommand::AdvanceWave => {
                let wave = self.waves.advance_wave(now, &self.data, &mut self.rng);
                self.outbox.audio.push(AudioEvent::WaveStart { wave });
            }
            DebugCommand::RetreatWave => {
                let wave = self.waves.retreat_wave(now, &self.data, &mut self.rng);
                self.outbox.audio.push(AudioEvent::WaveStart { wave });
            }
            DebugCommand::SpawnEnemy { craft, x, y } => {
                let kind: EnemyKind = craft.parse()?;
                let position = Position::new(x, y);
                if !position.is_finite() {
                    return Err(CommandError::InvalidPosition { x, y });
                }
                self.spawn_enemy(kind, position);
            }
            DebugCommand::SetInvincible { enabled } => {
                self.tank.invincible = enabled;
            }
            DebugCommand::ResetPowerUps => {
                self.tank.effects.clear();
                systems::support_unit::clear_all(&mut self.world);
                for (_entity, (_power_up, life)) in
                    self.world.query_mut::<(&PowerUp, &mut Lifecycle)>()
                {
                    life.destroyed = true;
                }
                self.delivery.reset(now);
            }
        }
        Ok(())
    }

    fn spawn_pending(&mut self) {
        for spawn in self.pending_spawns.drain(..) {
            world_setup::spawn_projectile(&mut self.world, spawn);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, input: &TickInput, dt_ms: f64) {
        let now = self.time.elapsed_ms + dt_ms;
        let active = self.phase == GamePhase::Active;

        // 1. Scheduled events
        while let Some(event) = self.events.pop_due(now) {
            match event {
                ScheduledEvent::EnemyShot { source } => {
                    if self.tank.destroyed {
                        continue;
                    }
                    let shot = combat::entity(source).and_then(|e| {
                        systems::enemy_ai::fire_follow_up(&self.world, e, self.tank.position)
                    });
                    if let Some(shot) = shot {
                        self.pending_spawns.push(shot);
                    }
                }
                ScheduledEvent::EvacuationComplete => {
                    let removed = systems::enemy_ai::clear_evacuees(&mut self.world);
                    log::info!("Evacuation complete; {removed} stragglers removed");
                }
            }
        }
        self.spawn_pending();

        // 2. Wave/difficulty scheduler
        if active {
            let (alive, in_batch) =
                systems::enemy_ai::count_alive(&self.world, self.waves.wave_number());
            let update = self
                .waves
                .update(now, alive, in_batch, &self.data, &mut self.rng);
            if let Some(wave) = update.started {
                self.outbox.audio.push(AudioEvent::WaveStart { wave });
            }
            for order in update.spawns {
                let position = world_setup::spawn_position(&mut self.rng, order.kind, order.side);
                world_setup::spawn_enemy(
                    &mut self.world,
                    &self.data,
                    order.kind,
                    position,
                    order.side.inward_direction(),
                    order.difficulty,
                    order.wave,
                );
            }
        }

        // 3. Enemy AI
        systems::enemy_ai::run(
            &mut self.world,
            &mut self.tank,
            dt_ms,
            now,
            &mut self.events,
            &mut self.pending_spawns,
            &mut self.outbox,
        );
        self.spawn_pending();

        // 4. Tank
        if active {
            systems::tank::run(
                &self.world,
                &mut self.tank,
                input,
                dt_ms,
                &mut self.pending_spawns,
                &mut self.outbox,
            );
            self.spawn_pending();
            self.score.survival_ms += dt_ms;
        }

        // 5. Projectiles
        systems::projectiles::run(&mut self.world, &self.tank, dt_ms, &mut self.blasts);

        // 6. Movement, support units, power-ups
        systems::movement::run(&mut self.world, dt_ms);
        for (kind, position) in systems::support_unit::run(&mut self.world, now) {
            world_setup::spawn_power_up(&mut self.world, kind, position);
        }
        systems::power_ups::run(&mut self.world, now);

        // 7. Collision passes
        systems::collision::player_projectiles_vs_enemies(
            &mut self.world,
            self.tank.position,
            &mut self.blasts,
            &mut self.kills,
            &mut self.outbox,
        );
        systems::collision::enemy_projectiles_vs_tank(
            &mut self.world,
            &mut self.tank,
            &mut self.blasts,
            &mut self.outbox,
        );
        systems::collision::projectile_intercepts(&mut self.world, &mut self.outbox);
        systems::collision::enemy_contact(
            &mut self.world,
            &mut self.tank,
            now,
            &mut self.kills,
            &mut self.outbox,
        );
        for kind in systems::collision::collect_power_ups(&mut self.world, &self.tank) {
            self.score.power_ups_collected += 1;
            systems::power_ups::apply_effect(
                kind,
                &mut self.world,
                &mut self.tank,
                &mut self.score,
                &mut self.kills,
                &mut self.outbox,
            );
        }
        systems::collision::area_pass(
            &mut self.world,
            &mut self.tank,
            &mut self.blasts,
            &mut self.kills,
            &mut self.pending_spawns,
            &mut self.outbox,
        );

        // 8. Kill bookkeeping, then deferred children
        self.process_kills();
        self.spawn_pending();

        // 9. Power-up delivery
        if active && !self.tank.destroyed {
            let (alive, _) = systems::enemy_ai::count_alive(&self.world, 0);
            let ctx = SelectionContext {
                health_fraction: self.tank.health_fraction(),
                weapon_tier: self.tank.arsenal.tier(),
                enemy_count: alive as usize,
                elapsed_ms: self.score.survival_ms,
            };
            if let Some(kind) = self.delivery.evaluate(now, &ctx, &mut self.rng) {
                systems::support_unit::dispatch(
                    &mut self.world,
                    &mut self.rng,
                    self.tank.position.x,
                    kind,
                    &mut self.outbox,
                );
                self.score.power_ups_delivered += 1;
            }
        }

        // 10. Tank death
        if active && self.tank.destroyed {
            self.game_over(now);
        }

        // 11. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn process_kills(&mut self) {
        for kill in self.kills.drain(..) {
            self.score.add_points(kill.points as u64);
            if let Some((kind, wave)) = kill.enemy {
                self.score.kills += 1;
                self.waves.on_enemy_destroyed(wave);
                self.delivery.on_enemy_destroyed();
                self.outbox.audio.push(AudioEvent::EnemyDestroyed { kind });
            }
            self.outbox.visual.push(VisualEvent::DestructionEffect {
                position: kill.position,
            });
        }
    }

    fn game_over(&mut self, now: f64) {
        self.phase = GamePhase::GameOver;
        self.outbox.audio.push(AudioEvent::TankDestroyed);
        self.outbox.visual.push(VisualEvent::DestructionEffect {
            position: self.tank.position,
        });

        let evacuating = systems::enemy_ai::evacuate_all(&mut self.world);
        self.events
            .cancel_where(|e| matches!(e, ScheduledEvent::EnemyShot { .. }));
        self.events
            .push(now + EVACUATION_TIMEOUT_MS, ScheduledEvent::EvacuationComplete);
        systems::support_unit::force_exit_all(&mut self.world);

        log::info!(
            "Tank destroyed at {:.1} s with score {}; {evacuating} enemies evacuating",
            now / 1000.0,
            self.score.score
        );
    }
}
