//! Game state snapshot: the complete visible state handed to the
//! rendering and audio collaborators after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, VisualEvent};
use crate::types::{Position, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub tank: TankView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub power_ups: Vec<PowerUpView>,
    pub support_units: Vec<SupportUnitView>,
    pub scenery: Vec<SceneryView>,
    pub wave: WaveView,
    pub score: ScoreView,
    pub audio_events: Vec<AudioEvent>,
    pub visual_events: Vec<VisualEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TankView {
    pub position: Position,
    pub aim_angle: f64,
    pub health: f64,
    pub max_health: f64,
    pub destroyed: bool,
    pub weapons: Vec<WeaponView>,
    pub effects: Vec<EffectView>,
    pub visual_state: VisualState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub weapon: WeaponKind,
    pub level: u8,
    pub cooldown_ms: f64,
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub effect: TimedEffect,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub position: Position,
    /// Facing angle (0 = right, PI = left).
    pub angle: f64,
    pub health: f64,
    pub max_health: f64,
    pub visual_state: VisualState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub owner: Owner,
    pub tag: String,
    pub position: Position,
    pub angle: f64,
    pub visual_state: VisualState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: u64,
    pub kind: PowerUpKind,
    pub position: Position,
    pub visual_state: VisualState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportUnitView {
    pub id: u64,
    pub position: Position,
    pub angle: f64,
    pub carrying: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneryView {
    pub id: u64,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// 1-based wave number of the current (or last) batch.
    pub wave_number: u32,
    pub source: Option<WaveSource>,
    pub enemies_in_wave: u32,
    pub enemies_spawned: u32,
    pub enemies_alive: u32,
    pub difficulty_level: u32,
    /// Completion has been blocked by enemies outside the batch for too long.
    pub stalled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u64,
    pub kills: u32,
    pub power_ups_delivered: u32,
    pub power_ups_collected: u32,
    pub survival_secs: f64,
}
