//! Wave/difficulty scheduler.
//!
//! Two independent clocks: the wave clock starts the next batch once the
//! previous one is fully spawned and cleared, and the difficulty clock raises
//! the difficulty level on a fixed interval regardless of waves.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use tankfall_core::constants::*;
use tankfall_core::data::{DataContext, WaveTableEntry};
use tankfall_core::enums::{EnemyKind, SpawnSide, WaveSource};
use tankfall_core::state::WaveView;

use tankfall_enemy_ai::profiles::heavy_kinds;

/// Timing knobs taken from the simulation config.
#[derive(Debug, Clone, Copy)]
pub struct WaveTiming {
    pub first_wave_delay_ms: f64,
    pub wave_delay_ms: f64,
    pub difficulty_interval_ms: f64,
}

impl Default for WaveTiming {
    fn default() -> Self {
        Self {
            first_wave_delay_ms: FIRST_WAVE_DELAY_MS,
            wave_delay_ms: WAVE_DELAY_MS,
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,
        }
    }
}

/// A resolved batch definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDefinition {
    pub source: WaveSource,
    pub roster: Vec<EnemyKind>,
    pub duration_ms: Option<f64>,
}

/// An enemy the engine should spawn now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub side: SpawnSide,
    /// 1-based wave number.
    pub wave: u32,
    /// Difficulty level for health scaling; procedural enemies only.
    pub difficulty: Option<u32>,
}

#[derive(Debug, Default)]
pub struct WaveUpdate {
    /// Wave number started this tick, if any.
    pub started: Option<u32>,
    pub spawns: Vec<SpawnOrder>,
}

#[derive(Debug, Clone, Copy)]
struct PendingSpawn {
    kind: EnemyKind,
    side: SpawnSide,
    due_ms: f64,
}

#[derive(Debug, Clone)]
struct WaveBatch {
    number: u32,
    source: WaveSource,
    in_wave: u32,
    spawned: u32,
    pending: VecDeque<PendingSpawn>,
    complete: bool,
    kills: u32,
}

#[derive(Debug, Clone)]
pub struct WaveScheduler {
    timing: WaveTiming,
    running: bool,
    /// 0-based index of the next batch to start.
    next_index: u32,
    batch: Option<WaveBatch>,
    next_wave_at_ms: Option<f64>,
    difficulty_level: u32,
    next_difficulty_ms: f64,
    stall_since_ms: Option<f64>,
    stalled: bool,
}

impl WaveScheduler {
    pub fn new(timing: WaveTiming) -> Self {
        Self {
            timing,
            running: false,
            next_index: 0,
            batch: None,
            next_wave_at_ms: None,
            difficulty_level: 0,
            next_difficulty_ms: timing.difficulty_interval_ms,
            stall_since_ms: None,
            stalled: false,
        }
    }

    /// Begin a fresh session at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        *self = Self::new(self.timing);
        self.running = true;
        self.next_wave_at_ms = Some(now_ms + self.timing.first_wave_delay_ms);
        self.next_difficulty_ms = now_ms + self.timing.difficulty_interval_ms;
    }

    /// Replay the current wave after a respawn. Difficulty is kept.
    pub fn resume(&mut self, now_ms: f64) {
        if let Some(batch) = self.batch.take() {
            self.next_index = batch.number - 1;
        }
        self.running = true;
        self.next_wave_at_ms = Some(now_ms + self.timing.first_wave_delay_ms);
        self.clear_stall();
    }

    pub fn difficulty_level(&self) -> u32 {
        self.difficulty_level
    }

    /// 1-based number of the current (or last) batch; 0 before the first wave.
    pub fn wave_number(&self) -> u32 {
        self.batch.as_ref().map_or(0, |b| b.number)
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Completion condition: fully spawned and no enemies alive anywhere.
    pub fn wave_complete(&self, alive_total: u32) -> bool {
        self.batch
            .as_ref()
            .is_some_and(|b| b.pending.is_empty() && b.spawned == b.in_wave && alive_total == 0)
    }

    pub fn on_enemy_destroyed(&mut self, wave: u32) {
        if let Some(batch) = self.batch.as_mut() {
            if batch.number == wave {
                batch.kills += 1;
            }
        }
    }

    /// Advance both clocks. `alive_in_batch` counts live enemies spawned for the current batch.
    pub fn update(
        &mut self,
        now_ms: f64,
        alive_total: u32,
        alive_in_batch: u32,
        data: &DataContext,
        rng: &mut ChaCha8Rng,
    ) -> WaveUpdate {
        let mut out = WaveUpdate::default();
        if !self.running {
            return out;
        }

        while now_ms >= self.next_difficulty_ms {
            self.difficulty_level += 1;
            self.next_difficulty_ms += self.timing.difficulty_interval_ms;
            log::info!("Difficulty level {}", self.difficulty_level);
        }

        if self.next_wave_at_ms.is_some_and(|at| now_ms >= at) {
            self.next_wave_at_ms = None;
            out.started = Some(self.start_wave(self.next_index, now_ms, data, rng));
        }

        let level = self.difficulty_level;
        let Some(batch) = self.batch.as_mut() else {
            return out;
        };

        let procedural = batch.source == WaveSource::Procedural;
        while batch.pending.front().is_some_and(|p| p.due_ms <= now_ms) {
            if let Some(p) = batch.pending.pop_front() {
                batch.spawned += 1;
                out.spawns.push(SpawnOrder {
                    kind: p.kind,
                    side: p.side,
                    wave: batch.number,
                    difficulty: procedural.then_some(level),
                });
            }
        }

        if batch.complete || !batch.pending.is_empty() || batch.spawned < batch.in_wave {
            return out;
        }

        let fresh = out.spawns.len() as u32;
        let alive_total = alive_total + fresh;
        let alive_in_batch = alive_in_batch + fresh;

        if alive_total == 0 {
            batch.complete = true;
            log::info!(
                "Wave {} cleared ({} kills); next in {} ms",
                batch.number,
                batch.kills,
                self.timing.wave_delay_ms
            );
            self.next_wave_at_ms = Some(now_ms + self.timing.wave_delay_ms);
            self.clear_stall();
        } else if alive_in_batch == 0 {
            // Only stragglers from elsewhere are holding the wave open.
            let since = *self.stall_since_ms.get_or_insert(now_ms);
            if !self.stalled && now_ms - since >= WAVE_STALL_WARN_MS {
                self.stalled = true;
                log::warn!(
                    "Wave {} stalled: {} enemies outside the batch still alive after {} ms",
                    batch.number,
                    alive_total,
                    WAVE_STALL_WARN_MS
                );
            }
        } else {
            self.clear_stall();
        }
        out
    }

    /// Drop pending spawns and start the following wave now.
    pub fn advance_wave(
        &mut self,
        now_ms: f64,
        data: &DataContext,
        rng: &mut ChaCha8Rng,
    ) -> u32 {
        let target = match &self.batch {
            Some(b) => b.number,
            None => self.next_index,
        };
        self.jump_to(target, now_ms, data, rng)
    }

    /// Drop pending spawns and start the previous wave now.
    pub fn retreat_wave(
        &mut self,
        now_ms: f64,
        data: &DataContext,
        rng: &mut ChaCha8Rng,
    ) -> u32 {
        let target = match &self.batch {
            Some(b) => (b.number - 1).saturating_sub(1),
            None => self.next_index.saturating_sub(1),
        };
        self.jump_to(target, now_ms, data, rng)
    }

    fn jump_to(&mut self, index: u32, now_ms: f64, data: &DataContext, rng: &mut ChaCha8Rng) -> u32 {
        if let Some(batch) = &self.batch {
            log::info!(
                "Wave {} cancelled with {} spawns pending",
                batch.number,
                batch.pending.len()
            );
        }
        self.running = true;
        self.next_wave_at_ms = None;
        self.clear_stall();
        self.start_wave(index, now_ms, data, rng)
    }

    fn clear_stall(&mut self) {
        self.stall_since_ms = None;
        self.stalled = false;
    }

    fn start_wave(
        &mut self,
        index: u32,
        now_ms: f64,
        data: &DataContext,
        rng: &mut ChaCha8Rng,
    ) -> u32 {
        let number = index + 1;
        let mut def = resolve_wave(index, data);
        def.roster.shuffle(rng);

        let count = def.roster.len() as u32;
        let interval = match def.duration_ms {
            Some(d) if count > 0 => d / count as f64,
            _ => FALLBACK_SPAWN_INTERVAL_MS,
        };
        let pending = def
            .roster
            .iter()
            .enumerate()
            .map(|(i, &kind)| PendingSpawn {
                kind,
                side: if i % 2 == 0 {
                    SpawnSide::Left
                } else {
                    SpawnSide::Right
                },
                due_ms: now_ms + i as f64 * interval,
            })
            .collect();

        log::info!(
            "Wave {number} started from {:?}: {count} enemies, {interval:.0} ms apart",
            def.source
        );

        self.batch = Some(WaveBatch {
            number,
            source: def.source,
            in_wave: count,
            spawned: 0,
            pending,
            complete: false,
            kills: 0,
        });
        self.next_index = index + 1;
        number
    }

    pub fn view(&self, alive_total: u32) -> WaveView {
        match &self.batch {
            Some(b) => WaveView {
                wave_number: b.number,
                source: Some(b.source),
                enemies_in_wave: b.in_wave,
                enemies_spawned: b.spawned,
                enemies_alive: alive_total,
                difficulty_level: self.difficulty_level,
                stalled: self.stalled,
            },
            None => WaveView {
                enemies_alive: alive_total,
                difficulty_level: self.difficulty_level,
                ..WaveView::default()
            },
        }
    }
}

/// Survival table key for a 0-based wave index: `(tier, level, wave)`.
pub fn survival_key(index: u32) -> (u32, u32, u32) {
    (
        index / (WAVES_PER_LEVEL * LEVELS_PER_TIER),
        (index / WAVES_PER_LEVEL) % LEVELS_PER_TIER,
        index % WAVES_PER_LEVEL,
    )
}

/// Resolve a batch: survival table, then generic table, then procedural.
pub fn resolve_wave(index: u32, data: &DataContext) -> WaveDefinition {
    let (tier, level, wave) = survival_key(index);
    if let Some(entry) = data.survival_wave(tier, level, wave) {
        let roster = roster_from(entry);
        if !roster.is_empty() {
            return WaveDefinition {
                source: WaveSource::Survival { tier, level, wave },
                roster,
                duration_ms: entry.duration_ms,
            };
        }
    }
    if let Some(entry) = data.generic_wave(index) {
        let roster = roster_from(entry);
        if !roster.is_empty() {
            return WaveDefinition {
                source: WaveSource::Generic { index },
                roster,
                duration_ms: entry.duration_ms,
            };
        }
    }
    WaveDefinition {
        source: WaveSource::Procedural,
        roster: procedural_roster(index + 1),
        duration_ms: None,
    }
}

fn roster_from(entry: &WaveTableEntry) -> Vec<EnemyKind> {
    let mut roster = Vec::new();
    for spawn in &entry.spawns {
        match spawn.craft_id.parse::<EnemyKind>() {
            Ok(kind) => roster.extend(std::iter::repeat(kind).take(spawn.quantity as usize)),
            Err(e) => log::warn!("Skipping wave entry: {e}"),
        }
    }
    roster
}

const TIER_1: &[EnemyKind] = &[EnemyKind::Scout, EnemyKind::Jeep, EnemyKind::Fighter];
const TIER_2: &[EnemyKind] = &[
    EnemyKind::Scout,
    EnemyKind::Fighter,
    EnemyKind::Jeep,
    EnemyKind::LightTank,
    EnemyKind::Bomber,
];
const TIER_3: &[EnemyKind] = &[
    EnemyKind::Fighter,
    EnemyKind::Interceptor,
    EnemyKind::LightTank,
    EnemyKind::Apc,
    EnemyKind::Bomber,
    EnemyKind::Kamikaze,
    EnemyKind::Deflector,
];
const TIER_4: &[EnemyKind] = &[
    EnemyKind::Interceptor,
    EnemyKind::AceFighter,
    EnemyKind::Gunship,
    EnemyKind::HeavyBomber,
    EnemyKind::StealthBomber,
    EnemyKind::RocketTruck,
    EnemyKind::Artillery,
    EnemyKind::Deflector,
    EnemyKind::Satellite,
    EnemyKind::FlakTank,
];
const TIER_5: &[EnemyKind] = &[
    EnemyKind::AceFighter,
    EnemyKind::Gunship,
    EnemyKind::HeavyBomber,
    EnemyKind::StealthBomber,
    EnemyKind::MissileBoat,
    EnemyKind::HeavyTank,
    EnemyKind::Walker,
    EnemyKind::Satellite,
    EnemyKind::Dropship,
    EnemyKind::Kamikaze,
];

/// Procedural roster for a 1-based wave number.
pub fn procedural_roster(number: u32) -> Vec<EnemyKind> {
    let (kinds, count): (&[EnemyKind], u32) = match number {
        0..=3 => (TIER_1, 3 + number),
        4..=6 => (TIER_2, 4 + number),
        7..=10 => (TIER_3, 5 + number),
        11..=15 => (TIER_4, 4 + number),
        16..=20 => (TIER_5, 2 + number),
        _ => {
            // Endless: an even split across every heavy type.
            let heavy = heavy_kinds();
            let each = 2 + (number - 21) / 5;
            return heavy
                .iter()
                .flat_map(|k| std::iter::repeat(*k).take(each as usize))
                .collect();
        }
    };
    (0..count as usize).map(|i| kinds[i % kinds.len()]).collect()
}
