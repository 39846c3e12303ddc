//! Enemy AI system: movement, special behaviors and firing for every enemy.
//!
//! Calls the pure functions in tankfall-enemy-ai, then applies the results to
//! ECS components. A failed update removes only the offending enemy.

use hecs::{Entity, World};

use tankfall_core::components::{Enemy, HomingTarget, Lifecycle};
use tankfall_core::enums::Owner;
use tankfall_core::events::AudioEvent;
use tankfall_core::types::{frame_index, Position, Velocity};

use tankfall_enemy_ai::firing::{launch_angle, should_fire, FireContext};
use tankfall_enemy_ai::fsm::{self, beam_covers, beam_damage, SpecialTransition};
use tankfall_enemy_ai::movement::{has_left_field, steer, MovementContext};
use tankfall_enemy_ai::profiles::{enemy_weapon, EnemyWeapon};

use crate::combat::{handle, Outbox};
use crate::ordnance::ProjectileSpawn;
use crate::schedule::{EventQueue, ScheduledEvent};
use crate::tank::Tank;

/// Run the enemy AI for one tick.
pub fn run(
    world: &mut World,
    tank: &mut Tank,
    dt_ms: f64,
    now_ms: f64,
    events: &mut EventQueue,
    spawns: &mut Vec<ProjectileSpawn>,
    outbox: &mut Outbox,
) {
    let target = tank.position;
    let tank_alive = !tank.destroyed;
    let mut beam_hits = 0.0;

    for (entity, (enemy, pos, vel, life)) in
        world.query_mut::<(&mut Enemy, &mut Position, &mut Velocity, &mut Lifecycle)>()
    {
        if life.destroyed {
            continue;
        }

        let prev_frame = frame_index(enemy.age_ms);
        enemy.age_ms += dt_ms;
        let frame = frame_index(enemy.age_ms);
        enemy.flash_ms = (enemy.flash_ms - dt_ms).max(0.0);

        if !enemy.evacuating {
            if let Some(transition) = fsm::advance(&mut enemy.special, dt_ms) {
                match transition {
                    SpecialTransition::DeflectorActivated => {
                        outbox.audio.push(AudioEvent::ShieldActivate)
                    }
                    SpecialTransition::SatelliteCharging => {
                        outbox.audio.push(AudioEvent::SatelliteCharge)
                    }
                    SpecialTransition::SatelliteActive => outbox.audio.push(AudioEvent::LaserFire),
                    SpecialTransition::DeflectorRecharging
                    | SpecialTransition::SatelliteCooldown => {}
                }
            }
            if tank_alive && enemy.special.is_beaming() && beam_covers(pos.x, target.x) {
                beam_hits += beam_damage(dt_ms);
            }
        }

        let ctx = MovementContext {
            kind: enemy.kind,
            position: *pos,
            direction: enemy.direction,
            speed: enemy.speed,
            evacuating: enemy.evacuating,
            target,
        };
        let update = match steer(&ctx) {
            Ok(update) => update,
            Err(e) => {
                log::warn!("Removing enemy {entity:?}: {e}");
                life.destroyed = true;
                continue;
            }
        };
        enemy.direction = update.direction;
        *vel = update.velocity;
        if let Some(y) = update.locked_y {
            pos.y = y;
        }

        if enemy.evacuating {
            if has_left_field(pos.x) {
                life.destroyed = true;
            }
            continue;
        }

        if !tank_alive {
            continue;
        }
        let Some(weapon) = enemy_weapon(enemy.kind.name()) else {
            continue;
        };
        let fire = FireContext {
            position: *pos,
            direction: enemy.direction,
            target,
            prev_frame,
            frame,
            last_fire_frame: enemy.last_fire_frame,
            fire_gap_frames: enemy.fire_gap_frames,
            evacuating: enemy.evacuating,
        };
        if !should_fire(&fire, &weapon) {
            continue;
        }

        enemy.last_fire_frame = Some(frame);
        spawns.push(enemy_shot(&weapon, *pos, target));
        for i in 1..weapon.volley {
            events.push(
                now_ms + i as f64 * weapon.volley_spacing_ms,
                ScheduledEvent::EnemyShot {
                    source: handle(entity),
                },
            );
        }
        log::debug!("{} fired a {}-shot volley", enemy.kind, weapon.volley);
    }

    // Shield blocks the beam before it reaches the damage path.
    if beam_hits > 0.0 && !tank.is_shielded() {
        tank.take_damage(beam_hits, &mut outbox.audio);
    }
}

/// Build one enemy projectile aimed at `target`.
pub fn enemy_shot(weapon: &EnemyWeapon, from: Position, target: Position) -> ProjectileSpawn {
    let angle = launch_angle(weapon, from, target);
    let spawn = ProjectileSpawn::new(from, angle, weapon.speed, weapon.damage, Owner::Enemy, weapon.tag)
        .with_homing_target(HomingTarget::Tank);
    if weapon.tag.contains("flak") {
        spawn.detonating_at(target)
    } else {
        spawn
    }
}

/// Fire a queued follow-up shot if its source is still live and not evacuating.
pub fn fire_follow_up(world: &World, source: Entity, target: Position) -> Option<ProjectileSpawn> {
    let mut query = world
        .query_one::<(&Enemy, &Position, &Lifecycle)>(source)
        .ok()?;
    let (enemy, pos, life) = query.get()?;
    if life.destroyed || enemy.evacuating {
        return None;
    }
    let weapon = enemy_weapon(enemy.kind.name())?;
    Some(enemy_shot(&weapon, *pos, target))
}

/// Put every enemy into evacuation.
pub fn evacuate_all(world: &mut World) -> usize {
    let mut count = 0;
    for (_entity, (enemy, life)) in world.query_mut::<(&mut Enemy, &Lifecycle)>() {
        if !life.destroyed && !enemy.evacuating {
            enemy.evacuating = true;
            count += 1;
        }
    }
    count
}

/// Remove enemies still evacuating. No score is awarded.
pub fn clear_evacuees(world: &mut World) -> usize {
    let mut count = 0;
    for (_entity, (enemy, life)) in world.query_mut::<(&Enemy, &mut Lifecycle)>() {
        if enemy.evacuating && !life.destroyed {
            life.destroyed = true;
            count += 1;
        }
    }
    count
}

/// Count live enemies, total and for one wave number.
pub fn count_alive(world: &World, wave: u32) -> (u32, u32) {
    let mut total = 0;
    let mut in_wave = 0;
    for (_entity, (enemy, life)) in world.query::<(&Enemy, &Lifecycle)>().iter() {
        if life.destroyed {
            continue;
        }
        total += 1;
        if wave > 0 && enemy.wave == wave {
            in_wave += 1;
        }
    }
    (total, in_wave)
}

