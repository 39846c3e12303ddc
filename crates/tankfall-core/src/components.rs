//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems,
//! not components; the only methods here are trivial accessors.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Bounds, Position};

/// Opaque, serializable reference to another entity (hecs `Entity::to_bits`).
/// Holders must check liveness before every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Destroyed flag shared by every simulated entity. Set by the owning pass,
/// acted on only by the cleanup system.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Lifecycle {
    pub destroyed: bool,
}

/// Half extents of an entity's axis-aligned collision box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub half_width: f64,
    pub half_height: f64,
}

impl Hitbox {
    pub fn new(half_width: f64, half_height: f64) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    pub fn bounds(&self, at: Position) -> Bounds {
        Bounds::centered(at, self.half_width, self.half_height)
    }
}

/// Hostile unit state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: f64,
    pub max_health: f64,
    /// Score awarded on destruction.
    pub points: u32,
    /// Lateral cruise speed (px/s).
    pub speed: f64,
    /// Minimum frames between shots.
    pub fire_gap_frames: u64,
    /// Time alive; the frame counter is derived from it.
    pub age_ms: f64,
    pub last_fire_frame: Option<u64>,
    /// +1.0 moving right, -1.0 moving left.
    pub direction: f64,
    pub last_contact_ms: Option<f64>,
    /// Remaining damage-flash time.
    pub flash_ms: f64,
    pub special: SpecialBehavior,
    pub evacuating: bool,
    /// Wave number this enemy was spawned for (0 = debug spawn).
    pub wave: u32,
}

/// Type-specific special behavior, matched explicitly instead of probed at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SpecialBehavior {
    #[default]
    None,
    Deflector(DeflectorState),
    Satellite(SatelliteState),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeflectorState {
    pub phase: DeflectorPhase,
    pub phase_elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SatelliteState {
    pub phase: SatellitePhase,
    pub phase_elapsed_ms: f64,
}

impl SpecialBehavior {
    /// Whether incoming player projectiles are currently reflected.
    pub fn is_deflecting(&self) -> bool {
        matches!(
            self,
            SpecialBehavior::Deflector(DeflectorState {
                phase: DeflectorPhase::Active,
                ..
            })
        )
    }

    /// Whether a satellite beam is currently firing.
    pub fn is_beaming(&self) -> bool {
        matches!(
            self,
            SpecialBehavior::Satellite(SatelliteState {
                phase: SatellitePhase::Active,
                ..
            })
        )
    }
}

/// Homing target: a fixed point, another entity, or the tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HomingTarget {
    Point(Position),
    Entity(EntityHandle),
    /// The tank lives outside the ECS and is resolved by the engine.
    Tank,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homing {
    pub target: HomingTarget,
    /// Fraction of the angular error closed per nominal frame (0..=1).
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosive {
    pub radius: f64,
    /// Fragment children, 30 % damage / 60 % speed, evenly spaced from angle 0.
    pub fragments: u32,
    /// Burst children, 50 % damage / 80 % speed, evenly spaced from the parent angle.
    pub bursts: u32,
}

/// Optional special behavior flags carried by a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectileBehavior {
    pub homing: Option<Homing>,
    /// Vertical acceleration (px/s²), positive = downward.
    pub gravity: Option<f64>,
    pub explosive: Option<Explosive>,
    /// Survives impacts.
    pub piercing: bool,
    /// Non-explosive area damage radius.
    pub splash_radius: f64,
    /// Cosmetic only.
    pub glow: bool,
}

/// A moving munition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Owner,
    pub angle: f64,
    pub speed: f64,
    pub damage: f64,
    pub tag: String,
    pub behavior: ProjectileBehavior,
    pub age_ms: f64,
    pub lifetime_ms: f64,
    /// Enemies already struck (piercing rounds damage each enemy once).
    pub struck: Vec<EntityHandle>,
    pub splash_applied: bool,
    /// Reflected by a deflector; rendered tinted.
    pub deflected: bool,
    /// Explosive rounds detonate when they reach this point.
    pub detonate_at: Option<Position>,
}

/// Collectible dropped by the support unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub phase: PowerUpPhase,
}

/// Destructible background element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scenery {
    pub health: f64,
    pub max_health: f64,
    pub points: u32,
    pub nuke_vulnerable: bool,
}

/// Scripted non-combat unit carrying one power-up to a drop point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SupportUnit {
    pub payload: PowerUpKind,
    pub phase: SupportPhase,
    pub drop_x: f64,
    /// +1.0 moving right, -1.0 moving left.
    pub direction: f64,
}
