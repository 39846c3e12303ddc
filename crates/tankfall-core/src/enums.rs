//! Enumeration types used throughout the simulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Enemy craft archetype. The snake_case name is the key into the craft data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    // --- Aircraft ---
    Scout,
    Fighter,
    Interceptor,
    AceFighter,
    Gunship,
    Kamikaze,
    Bomber,
    HeavyBomber,
    StealthBomber,
    Dropship,
    Deflector,
    Satellite,
    MissileBoat,
    // --- Ground ---
    Jeep,
    LightTank,
    Apc,
    HeavyTank,
    Artillery,
    RocketTruck,
    FlakTank,
    Walker,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 21] = [
        EnemyKind::Scout,
        EnemyKind::Fighter,
        EnemyKind::Interceptor,
        EnemyKind::AceFighter,
        EnemyKind::Gunship,
        EnemyKind::Kamikaze,
        EnemyKind::Bomber,
        EnemyKind::HeavyBomber,
        EnemyKind::StealthBomber,
        EnemyKind::Dropship,
        EnemyKind::Deflector,
        EnemyKind::Satellite,
        EnemyKind::MissileBoat,
        EnemyKind::Jeep,
        EnemyKind::LightTank,
        EnemyKind::Apc,
        EnemyKind::HeavyTank,
        EnemyKind::Artillery,
        EnemyKind::RocketTruck,
        EnemyKind::FlakTank,
        EnemyKind::Walker,
    ];

    /// Craft name used by the data provider and the debug interface.
    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Scout => "scout",
            EnemyKind::Fighter => "fighter",
            EnemyKind::Interceptor => "interceptor",
            EnemyKind::AceFighter => "ace_fighter",
            EnemyKind::Gunship => "gunship",
            EnemyKind::Kamikaze => "kamikaze",
            EnemyKind::Bomber => "bomber",
            EnemyKind::HeavyBomber => "heavy_bomber",
            EnemyKind::StealthBomber => "stealth_bomber",
            EnemyKind::Dropship => "dropship",
            EnemyKind::Deflector => "deflector",
            EnemyKind::Satellite => "satellite",
            EnemyKind::MissileBoat => "missile_boat",
            EnemyKind::Jeep => "jeep",
            EnemyKind::LightTank => "light_tank",
            EnemyKind::Apc => "apc",
            EnemyKind::HeavyTank => "heavy_tank",
            EnemyKind::Artillery => "artillery",
            EnemyKind::RocketTruck => "rocket_truck",
            EnemyKind::FlakTank => "flak_tank",
            EnemyKind::Walker => "walker",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a craft name does not match any known archetype.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown craft name: {0}")]
pub struct UnknownCraft(pub String);

impl FromStr for EnemyKind {
    type Err = UnknownCraft;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownCraft(s.to_string()))
    }
}

/// Enemy movement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Constant lateral velocity, optional vertical correction toward the player.
    Straight,
    /// Locked to the ground line, horizontal only.
    Ground,
    /// Slows laterally near the player for precise drops.
    BomberApproach,
}

/// Geometric condition that must hold for an enemy to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireGeometry {
    /// Horizontally close and above the target.
    BomberDrop,
    /// Same altitude band, in range, facing the target.
    GroundLineOfSight,
    /// Horizontally within aimed-fire range.
    Aimed,
}

/// Player weapon kinds, in fixed acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    MachineGun,
    Cannon,
    HomingMissile,
    Railgun,
    ClusterMortar,
}

impl WeaponKind {
    /// Acquisition order.
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::MachineGun,
        WeaponKind::Cannon,
        WeaponKind::HomingMissile,
        WeaponKind::Railgun,
        WeaponKind::ClusterMortar,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Power-up kinds delivered by the support unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    WeaponUpgrade,
    SpreadShot,
    RapidFire,
    SpeedBoost,
    EnhancedGun,
    Nuke,
    ScreenLaser,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; crate::constants::POWER_UP_KIND_COUNT] = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::WeaponUpgrade,
        PowerUpKind::SpreadShot,
        PowerUpKind::RapidFire,
        PowerUpKind::SpeedBoost,
        PowerUpKind::EnhancedGun,
        PowerUpKind::Nuke,
        PowerUpKind::ScreenLaser,
    ];

    /// The timed effect this power-up grants, if it is not instantaneous.
    pub fn timed_effect(self) -> Option<TimedEffect> {
        match self {
            PowerUpKind::Shield => Some(TimedEffect::Shield),
            PowerUpKind::SpreadShot => Some(TimedEffect::SpreadShot),
            PowerUpKind::RapidFire => Some(TimedEffect::RapidFire),
            PowerUpKind::SpeedBoost => Some(TimedEffect::SpeedBoost),
            PowerUpKind::EnhancedGun => Some(TimedEffect::EnhancedGun),
            PowerUpKind::Health
            | PowerUpKind::WeaponUpgrade
            | PowerUpKind::Nuke
            | PowerUpKind::ScreenLaser => None,
        }
    }
}

/// Temporary effects carried by the tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedEffect {
    Shield,
    SpeedBoost,
    RapidFire,
    SpreadShot,
    EnhancedGun,
}

impl TimedEffect {
    pub const ALL: [TimedEffect; 5] = [
        TimedEffect::Shield,
        TimedEffect::SpeedBoost,
        TimedEffect::RapidFire,
        TimedEffect::SpreadShot,
        TimedEffect::EnhancedGun,
    ];

    pub fn default_duration_ms(self) -> f64 {
        match self {
            TimedEffect::Shield => crate::constants::SHIELD_DURATION_MS,
            _ => crate::constants::TIMED_EFFECT_DURATION_MS,
        }
    }
}

/// Which side fired a projectile. Determines valid collision targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

/// Deflector shield cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeflectorPhase {
    #[default]
    Recharging,
    Active,
}

/// Satellite beam cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SatellitePhase {
    #[default]
    Charging,
    Active,
    Cooldown,
}

/// Power-up descent state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerUpPhase {
    /// Parachute descent.
    Falling,
    /// On the ground since the given time.
    Landed { since_ms: f64 },
}

/// Support unit delivery state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SupportPhase {
    Inbound,
    Hovering { until_ms: f64 },
    Outbound,
    ForcedExit,
}

/// Playfield edge an enemy spawns from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnSide {
    Left,
    Right,
}

impl SpawnSide {
    pub fn opposite(self) -> Self {
        match self {
            SpawnSide::Left => SpawnSide::Right,
            SpawnSide::Right => SpawnSide::Left,
        }
    }

    /// Horizontal travel direction for an entity entering from this side.
    pub fn inward_direction(self) -> f64 {
        match self {
            SpawnSide::Left => 1.0,
            SpawnSide::Right => -1.0,
        }
    }
}

/// Discrete visual state consumed by the rendering collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualState {
    #[default]
    Normal,
    DamageFlash,
    Shielded,
    Charging,
    Beaming,
    Recharging,
    Evacuating,
    Falling,
    Landed,
    Tinted,
    Glowing,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Active,
    Paused,
    /// The tank was destroyed; the world keeps running so enemies can evacuate.
    GameOver,
}

/// Where a wave batch definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveSource {
    Survival { tier: u32, level: u32, wave: u32 },
    Generic { index: u32 },
    Procedural,
}
