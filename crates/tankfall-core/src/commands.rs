//! Commands and per-tick input sent from the shell to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Session-level actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a session from Idle.
    StartSession,
    Pause,
    Resume,
    /// Bring the tank back after game over. Weapon levels are kept.
    RespawnTank,
    /// Reset everything, including weapon levels, and start over.
    NewCampaign,
    /// Set time scale (1.0 = normal, clamped to 0.0..=4.0).
    SetTimeScale { scale: f64 },
    /// Operator/debug action.
    Debug { command: DebugCommand },
}

/// Operator interface. Every action goes through public simulation contracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum DebugCommand {
    SetWeapon { weapon: WeaponKind, level: u8 },
    ActivateEffect { power_up: PowerUpKind, duration_ms: f64 },
    AdvanceWave,
    RetreatWave,
    SpawnEnemy { craft: String, x: f64, y: f64 },
    SetInvincible { enabled: bool },
    ResetPowerUps,
}

/// Input intents sampled by the input collaborator for one tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub pointer: Position,
    pub fire: bool,
    pub special: bool,
}
