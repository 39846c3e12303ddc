//! Events emitted by the simulation for the audio and rendering collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Named audio triggers. Playback failures never feed back into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    ShieldActivate,
    EnemyDestroyed { kind: EnemyKind },
    LowHealth,
    ShieldBlock,
    SatelliteCharge,
    LaserFire,
    WeaponFire { weapon: WeaponKind },
    PowerUp { kind: PowerUpKind },
    Nuke,
    Deflect,
    SupportInbound,
    TankDestroyed,
    WaveStart { wave: u32 },
}

impl AudioEvent {
    /// Stable event name handed to the audio player.
    pub fn name(&self) -> &'static str {
        match self {
            AudioEvent::ShieldActivate => "shield_activate",
            AudioEvent::EnemyDestroyed { .. } => "enemy_destroyed",
            AudioEvent::LowHealth => "low_health",
            AudioEvent::ShieldBlock => "shield_block",
            AudioEvent::SatelliteCharge => "satellite_charge",
            AudioEvent::LaserFire => "laser_fire",
            AudioEvent::WeaponFire { .. } => "weapon_fire",
            AudioEvent::PowerUp { .. } => "power_up",
            AudioEvent::Nuke => "nuke",
            AudioEvent::Deflect => "deflect",
            AudioEvent::SupportInbound => "support_inbound",
            AudioEvent::TankDestroyed => "tank_destroyed",
            AudioEvent::WaveStart { .. } => "wave_start",
        }
    }
}

/// Cosmetic effects requested from the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VisualEvent {
    /// Area-damage detonation.
    Explosion { position: Position, radius: f64 },
    /// Two projectiles intercepted each other.
    Spark { position: Position },
    /// An enemy, scenery piece or the tank was destroyed.
    DestructionEffect { position: Position },
}
