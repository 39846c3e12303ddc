//! Enemy firing gate.
//!
//! A shot is taken only when all three conditions hold: the frame counter
//! crossed a check boundary this tick, the per-craft gap has elapsed since the
//! last shot, and the craft's firing geometry is satisfied.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::DVec2;
use tankfall_core::constants::*;
use tankfall_core::enums::FireGeometry;
use tankfall_core::types::{frame_gate_crossed, Position};

use crate::profiles::EnemyWeapon;

/// Input to the firing gate for a single enemy.
pub struct FireContext {
    pub position: Position,
    pub direction: f64,
    pub target: Position,
    /// Frame counter before this tick's age advance.
    pub prev_frame: u64,
    pub frame: u64,
    pub last_fire_frame: Option<u64>,
    pub fire_gap_frames: u64,
    pub evacuating: bool,
}

/// Minimum frames between shots for a given fire interval.
pub fn fire_gap_frames(fire_interval_ms: f64) -> u64 {
    if fire_interval_ms.is_finite() && fire_interval_ms > 0.0 {
        (fire_interval_ms / FRAME_MS).ceil() as u64
    } else {
        ENEMY_DEFAULT_FIRE_GAP_FRAMES
    }
}

pub fn geometry_holds(
    geometry: FireGeometry,
    from: Position,
    direction: f64,
    target: Position,
) -> bool {
    let DVec2 { x: dx, y: dy } = target.as_vec() - from.as_vec();
    match geometry {
        FireGeometry::BomberDrop => dx.abs() < BOMBER_DROP_RANGE && from.y < target.y,
        FireGeometry::GroundLineOfSight => {
            dx.abs() < GROUND_FIRE_RANGE
                && dy.abs() < GROUND_FIRE_ALTITUDE_BAND
                && dx * direction > 0.0
        }
        FireGeometry::Aimed => dx.abs() < AIMED_FIRE_RANGE,
    }
}

/// Evaluate the three-condition gate.
pub fn should_fire(ctx: &FireContext, weapon: &EnemyWeapon) -> bool {
    if ctx.evacuating {
        return false;
    }
    if !frame_gate_crossed(ctx.prev_frame, ctx.frame, ENEMY_FIRE_CHECK_FRAMES) {
        return false;
    }
    if let Some(last) = ctx.last_fire_frame {
        if ctx.frame.saturating_sub(last) < ctx.fire_gap_frames {
            return false;
        }
    }
    geometry_holds(weapon.geometry, ctx.position, ctx.direction, ctx.target)
}

/// Launch angle for a shot. Bombs drop straight down, ground fire is level,
/// lobbed rounds leave at 45 degrees toward the target, everything else is
/// aimed directly.
pub fn launch_angle(weapon: &EnemyWeapon, from: Position, target: Position) -> f64 {
    let dx = target.x - from.x;
    if weapon.tag.contains("mortar") {
        return if dx >= 0.0 { -FRAC_PI_4 } else { -PI + FRAC_PI_4 };
    }
    match weapon.geometry {
        FireGeometry::BomberDrop => FRAC_PI_2,
        FireGeometry::GroundLineOfSight => {
            if dx >= 0.0 {
                0.0
            } else {
                PI
            }
        }
        FireGeometry::Aimed => from.bearing_to(&target),
    }
}
