//! Tank system: movement, aim, timers and weapon fire from the tick input.

use hecs::World;

use tankfall_core::commands::TickInput;
use tankfall_core::components::{Enemy, HomingTarget, Lifecycle};
use tankfall_core::constants::SPECIAL_COOLDOWN_MS;
use tankfall_core::enums::WeaponKind;
use tankfall_core::events::AudioEvent;
use tankfall_core::types::{Position, Velocity};

use crate::combat::{handle, Outbox};
use crate::ordnance::ProjectileSpawn;
use crate::tank::Tank;

/// Distance from the turret pivot to the muzzle.
const MUZZLE_OFFSET: f64 = 20.0;

pub fn run(
    world: &World,
    tank: &mut Tank,
    input: &TickInput,
    dt_ms: f64,
    spawns: &mut Vec<ProjectileSpawn>,
    outbox: &mut Outbox,
) {
    if tank.destroyed {
        return;
    }

    tank.update_movement(input.pointer.x, dt_ms);
    tank.update_aim(input.pointer, dt_ms);
    tank.tick_timers(dt_ms);

    if !input.fire && !input.special {
        return;
    }

    let origin = muzzle(tank);
    let target = homing_target(world, tank.aim_point);
    let weapons: Vec<WeaponKind> = tank.arsenal.active().collect();
    let volley = input.special && tank.special_cooldown_ms <= 0.0;

    for kind in weapons {
        let shots = if volley {
            tank.arsenal
                .fire_volley(kind, origin, tank.aim_angle, &tank.effects, target)
        } else if input.fire {
            tank.arsenal
                .fire(kind, origin, tank.aim_angle, &tank.effects, target)
        } else {
            Vec::new()
        };
        if !shots.is_empty() {
            outbox.audio.push(AudioEvent::WeaponFire { weapon: kind });
            spawns.extend(shots);
        }
    }

    if volley {
        tank.special_cooldown_ms = SPECIAL_COOLDOWN_MS;
        log::debug!("Special volley fired");
    }
}

/// Where projectiles leave the barrel.
pub fn muzzle(tank: &Tank) -> Position {
    let turret = tank.turret();
    let offset = Velocity::from_angle(tank.aim_angle, MUZZLE_OFFSET);
    Position::new(turret.x + offset.x, turret.y + offset.y)
}

/// Homing target for player missiles: the live enemy nearest the aim point, else the point itself.
pub fn homing_target(world: &World, aim_point: Position) -> HomingTarget {
    world
        .query::<(&Enemy, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (enemy, pos, life))| !life.destroyed && !enemy.evacuating && pos.is_finite())
        .map(|(e, (_, pos, _))| (e, pos.distance_to(&aim_point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(HomingTarget::Point(aim_point), |(e, _)| {
            HomingTarget::Entity(handle(e))
        })
}
