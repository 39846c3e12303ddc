//! Enemy movement patterns and evacuation steering.

use tankfall_core::constants::*;
use tankfall_core::enums::{EnemyKind, MovementPattern};
use tankfall_core::types::{Position, Velocity};

use crate::error::EnemyAiError;
use crate::profiles::get_profile;

/// Input to the movement step for a single enemy.
pub struct MovementContext {
    pub kind: EnemyKind,
    pub position: Position,
    /// +1.0 right, -1.0 left.
    pub direction: f64,
    pub speed: f64,
    pub evacuating: bool,
    /// Tank position.
    pub target: Position,
}

/// Output from the movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementUpdate {
    pub velocity: Velocity,
    pub direction: f64,
    /// Ground units are pinned to this altitude.
    pub locked_y: Option<f64>,
}

/// Compute this tick's velocity for one enemy.
pub fn steer(ctx: &MovementContext) -> Result<MovementUpdate, EnemyAiError> {
    if !ctx.position.is_finite() {
        return Err(EnemyAiError::NonFinitePosition {
            kind: ctx.kind,
            x: ctx.position.x,
            y: ctx.position.y,
        });
    }
    if !ctx.speed.is_finite() {
        return Err(EnemyAiError::NonFiniteSpeed {
            kind: ctx.kind,
            speed: ctx.speed,
        });
    }

    let profile = get_profile(ctx.kind);
    let locked_y = profile
        .is_ground()
        .then(|| GROUND_Y - profile.half_height);

    if ctx.evacuating {
        let direction = evacuation_direction(ctx.position.x);
        return Ok(MovementUpdate {
            velocity: Velocity::new(direction * EVACUATION_SPEED, 0.0),
            direction,
            locked_y,
        });
    }

    let direction = patrol_direction(ctx.position.x, ctx.direction);
    let dx = ctx.target.x - ctx.position.x;

    let velocity = match profile.pattern {
        MovementPattern::Ground => Velocity::new(direction * ctx.speed, 0.0),
        MovementPattern::BomberApproach => {
            let speed = if dx.abs() < BOMBER_SLOWDOWN_RANGE {
                ctx.speed * BOMBER_SLOWDOWN_FACTOR
            } else {
                ctx.speed
            };
            Velocity::new(direction * speed, 0.0)
        }
        MovementPattern::Straight => {
            let vy = if profile.vertical_correction {
                vertical_correction(ctx.kind, ctx.position.y, ctx.target.y, ctx.speed)
            } else {
                0.0
            };
            Velocity::new(direction * ctx.speed, vy)
        }
    };

    Ok(MovementUpdate {
        velocity,
        direction,
        locked_y,
    })
}

/// Turn around once beyond the margin while still heading outward.
pub fn patrol_direction(x: f64, direction: f64) -> f64 {
    if x < -ENEMY_OOB_MARGIN && direction < 0.0 {
        1.0
    } else if x > PLAYFIELD_WIDTH + ENEMY_OOB_MARGIN && direction > 0.0 {
        -1.0
    } else {
        direction
    }
}

/// Toward the nearer lateral edge.
pub fn evacuation_direction(x: f64) -> f64 {
    if x < PLAYFIELD_WIDTH * 0.5 {
        -1.0
    } else {
        1.0
    }
}

/// Whether an evacuating enemy has fully left the playfield.
pub fn has_left_field(x: f64) -> bool {
    x < -ENEMY_OOB_MARGIN || x > PLAYFIELD_WIDTH + ENEMY_OOB_MARGIN
}

fn vertical_correction(kind: EnemyKind, y: f64, target_y: f64, speed: f64) -> f64 {
    let desired = if kind == EnemyKind::Kamikaze {
        target_y
    } else {
        target_y.min(AIR_FLOOR_Y)
    };
    let max = speed * VERTICAL_CORRECTION_FACTOR;
    // Proportional approach toward the target line.
    ((desired - y) * 2.0).clamp(-max, max)
}
