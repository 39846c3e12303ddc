//! Projectile flight: homing, gravity, lifetime, bounds and ground/aim-point detonation.

use std::collections::HashMap;

use glam::DVec2;
use hecs::{Entity, World};

use tankfall_core::components::{HomingTarget, Lifecycle, Projectile};
use tankfall_core::constants::*;
use tankfall_core::types::{wrap_angle, Position, Velocity};

use crate::combat::{entity, is_live};
use crate::ordnance::{self, homing_turn_fraction, AreaBlast};
use crate::tank::Tank;

/// Advance every live projectile by `dt_ms`. Detonations are queued in `blasts`.
pub fn run(world: &mut World, tank: &Tank, dt_ms: f64, blasts: &mut Vec<AreaBlast>) {
    let tracked = resolve_entity_targets(world);
    let dt = dt_ms / 1000.0;

    for (e, (projectile, pos, vel, life)) in
        world.query_mut::<(&mut Projectile, &mut Position, &mut Velocity, &mut Lifecycle)>()
    {
        if life.destroyed {
            continue;
        }

        if let Some(homing) = projectile.behavior.homing {
            let aim = match homing.target {
                HomingTarget::Point(p) => Some(p),
                HomingTarget::Tank => (!tank.destroyed).then_some(tank.position),
                HomingTarget::Entity(_) => tracked.get(&e).copied().flatten(),
            };
            match aim {
                Some(target) => {
                    let error = wrap_angle(pos.bearing_to(&target) - projectile.angle);
                    let turn = homing_turn_fraction(homing.strength, dt_ms);
                    projectile.angle = wrap_angle(projectile.angle + error * turn);
                    *vel = Velocity::from_angle(projectile.angle, projectile.speed);
                }
                // Target lost: keep flying straight.
                None => projectile.behavior.homing = None,
            }
        }

        if let Some(gravity) = projectile.behavior.gravity {
            vel.y += gravity * dt;
            projectile.angle = vel.heading();
        }

        let before = *pos;
        pos.advance(vel, dt_ms);
        projectile.age_ms += dt_ms;

        if !pos.is_finite() || projectile.age_ms > projectile.lifetime_ms || out_of_bounds(pos) {
            // Expired or off-field rounds never splash.
            projectile.splash_applied = true;
            life.destroyed = true;
            continue;
        }

        let grounded = pos.y >= GROUND_Y;
        let at_aim_point = projectile
            .detonate_at
            .is_some_and(|p| reached(before, *pos, p));

        if projectile.behavior.explosive.is_some() && (grounded || at_aim_point) {
            if let Some(blast) = ordnance::detonate(projectile, *pos) {
                blasts.push(blast);
            }
            life.destroyed = true;
        } else if grounded {
            if !projectile.splash_applied {
                if let Some(blast) = ordnance::splash(projectile, *pos) {
                    blasts.push(blast);
                    projectile.splash_applied = true;
                }
            }
            life.destroyed = true;
        }
    }
}

/// Current position of every entity-homing projectile's target; `None` when it is gone.
fn resolve_entity_targets(world: &World) -> HashMap<Entity, Option<Position>> {
    let mut targets = HashMap::new();
    for (e, projectile) in world.query::<&Projectile>().iter() {
        let Some(homing) = projectile.behavior.homing else {
            continue;
        };
        if let HomingTarget::Entity(h) = homing.target {
            let pos = entity(h)
                .filter(|t| is_live(world, *t))
                .and_then(|t| world.get::<&Position>(t).ok().map(|p| *p));
            targets.insert(e, pos);
        }
    }
    targets
}

/// The segment travelled this tick passed within a projectile's width of `point`.
fn reached(from: Position, to: Position, point: Position) -> bool {
    let a: DVec2 = from.as_vec();
    let ab: DVec2 = to.as_vec() - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((point.as_vec() - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a + ab * t).distance(point.as_vec()) <= PROJECTILE_HALF_SIZE * 2.0
}

fn out_of_bounds(pos: &Position) -> bool {
    pos.x < -PROJECTILE_OOB_MARGIN
        || pos.x > PLAYFIELD_WIDTH + PROJECTILE_OOB_MARGIN
        || pos.y < -PROJECTILE_OOB_MARGIN
        || pos.y > PLAYFIELD_HEIGHT + PROJECTILE_OOB_MARGIN
}
