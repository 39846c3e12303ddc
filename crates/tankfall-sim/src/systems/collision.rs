//! Collision resolver.
//!
//! Passes run in a fixed order each tick over live entities only:
//!
//! - (a) player projectiles against enemies, including deflection
//! - (b) enemy projectiles against the tank
//! - (c) player projectiles against enemy projectiles
//! - (d) enemy bodies against the tank
//! - (e) the tank against power-ups
//! - (f) area damage from detonations and splash rounds
//!
//! Nothing is despawned here; passes only set `Lifecycle::destroyed`.
//! Overlap is AABB on current bounds.

use hecs::{Entity, World};

use tankfall_core::components::*;
use tankfall_core::constants::*;
use tankfall_core::enums::{EnemyKind, Owner, PowerUpKind};
use tankfall_core::events::{AudioEvent, VisualEvent};
use tankfall_core::types::{falloff, Bounds, Position, Velocity};

use crate::combat::{damage_enemy, damage_scenery, handle, is_live, Kill, Outbox};
use crate::ordnance::{self, AreaBlast, ProjectileSpawn};
use crate::tank::Tank;

#[derive(Debug, Clone, Copy)]
struct Body {
    entity: Entity,
    bounds: Bounds,
}

fn enemy_bodies(world: &World) -> Vec<(Body, bool)> {
    world
        .query::<(&Enemy, &Position, &Hitbox, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, pos, _, life))| !life.destroyed && pos.is_finite())
        .map(|(entity, (enemy, pos, hitbox, _))| {
            (
                Body {
                    entity,
                    bounds: hitbox.bounds(*pos),
                },
                enemy.special.is_deflecting(),
            )
        })
        .collect()
}

fn projectile_bodies(world: &World, owner: Owner) -> Vec<Body> {
    world
        .query::<(&Projectile, &Position, &Hitbox, &Lifecycle)>()
        .iter()
        .filter(|(_, (p, pos, _, life))| p.owner == owner && !life.destroyed && pos.is_finite())
        .map(|(entity, (_, pos, hitbox, _))| Body {
            entity,
            bounds: hitbox.bounds(*pos),
        })
        .collect()
}

fn destroy(world: &mut World, entity: Entity) {
    if let Ok(life) = world.query_one_mut::<&mut Lifecycle>(entity) {
        life.destroyed = true;
    }
}

/// Pass (a): player projectiles against enemies.
pub fn player_projectiles_vs_enemies(
    world: &mut World,
    tank_position: Position,
    blasts: &mut Vec<AreaBlast>,
    kills: &mut Vec<Kill>,
    outbox: &mut Outbox,
) {
    let enemies = enemy_bodies(world);

    for shot in projectile_bodies(world, Owner::Player) {
        for &(enemy, deflecting) in &enemies {
            if !shot.bounds.overlaps(&enemy.bounds) || !is_live(world, enemy.entity) {
                continue;
            }
            let Ok((projectile, velocity, life, pos)) = world
                .query_one_mut::<(&mut Projectile, &mut Velocity, &mut Lifecycle, &Position)>(
                    shot.entity,
                )
            else {
                break;
            };
            if life.destroyed || projectile.owner != Owner::Player {
                break;
            }
            let target = handle(enemy.entity);
            if projectile.struck.contains(&target) {
                continue;
            }

            if deflecting {
                ordnance::deflect(projectile, velocity, *pos, tank_position);
                outbox.audio.push(AudioEvent::Deflect);
                break;
            }

            let damage = projectile.damage;
            projectile.struck.push(target);
            let mut consumed = !projectile.behavior.piercing;
            if let Some(blast) = ordnance::detonate(projectile, *pos) {
                blasts.push(blast);
                consumed = true;
            }
            if consumed {
                life.destroyed = true;
            }

            damage_enemy(world, enemy.entity, damage, kills);
            if consumed {
                break;
            }
        }
    }
}

/// Pass (b): enemy projectiles against the tank.
pub fn enemy_projectiles_vs_tank(
    world: &mut World,
    tank: &mut Tank,
    blasts: &mut Vec<AreaBlast>,
    outbox: &mut Outbox,
) {
    for shot in projectile_bodies(world, Owner::Enemy) {
        if tank.destroyed {
            return;
        }
        if !shot.bounds.overlaps(&tank.bounds()) {
            continue;
        }
        let Ok((projectile, life, pos)) =
            world.query_one_mut::<(&mut Projectile, &mut Lifecycle, &Position)>(shot.entity)
        else {
            continue;
        };
        life.destroyed = true;

        if tank.is_shielded() {
            projectile.splash_applied = true;
            outbox.audio.push(AudioEvent::ShieldBlock);
            continue;
        }

        let damage = projectile.damage;
        if let Some(mut blast) = ordnance::detonate(projectile, *pos) {
            blast.exclude_tank = true;
            blasts.push(blast);
        }
        tank.take_damage(damage, &mut outbox.audio);
    }
}

/// Pass (c): player projectiles intercepting enemy projectiles.
pub fn projectile_intercepts(world: &mut World, outbox: &mut Outbox) {
    let enemy_shots = projectile_bodies(world, Owner::Enemy);

    for shot in projectile_bodies(world, Owner::Player) {
        for other in &enemy_shots {
            if !shot.bounds.overlaps(&other.bounds)
                || !is_live(world, shot.entity)
                || !is_live(world, other.entity)
            {
                continue;
            }
            destroy(world, shot.entity);
            destroy(world, other.entity);
            outbox.visual.push(VisualEvent::Spark {
                position: other.bounds.center(),
            });
            break;
        }
    }
}

/// Pass (d): enemy bodies ramming the tank.
pub fn enemy_contact(
    world: &mut World,
    tank: &mut Tank,
    now_ms: f64,
    kills: &mut Vec<Kill>,
    outbox: &mut Outbox,
) {
    for (enemy, _) in enemy_bodies(world) {
        if tank.destroyed {
            return;
        }
        if !enemy.bounds.overlaps(&tank.bounds()) {
            continue;
        }
        let Ok((state, life)) = world.query_one_mut::<(&mut Enemy, &Lifecycle)>(enemy.entity)
        else {
            continue;
        };
        if life.destroyed
            || state
                .last_contact_ms
                .is_some_and(|t| now_ms - t < CONTACT_COOLDOWN_MS)
        {
            continue;
        }
        state.last_contact_ms = Some(now_ms);

        let (to_tank, to_enemy) = if state.kind == EnemyKind::Kamikaze {
            (KAMIKAZE_CONTACT_DAMAGE, state.health)
        } else {
            (CONTACT_DAMAGE_TO_TANK, CONTACT_DAMAGE_TO_ENEMY)
        };

        tank.take_damage(to_tank, &mut outbox.audio);
        damage_enemy(world, enemy.entity, to_enemy, kills);
    }
}

/// Pass (e): the tank picking up power-ups. Returns the collected kinds in pickup order.
pub fn collect_power_ups(world: &mut World, tank: &Tank) -> Vec<PowerUpKind> {
    let mut collected = Vec::new();
    if tank.destroyed {
        return collected;
    }
    let tank_bounds = tank.bounds();

    for (_entity, (power_up, pos, hitbox, life)) in
        world.query_mut::<(&PowerUp, &Position, &Hitbox, &mut Lifecycle)>()
    {
        if life.destroyed || !pos.is_finite() {
            continue;
        }
        if hitbox.bounds(*pos).overlaps(&tank_bounds) {
            life.destroyed = true;
            collected.push(power_up.kind);
        }
    }
    collected
}

/// Pass (f): apply queued detonations and pending splash rounds.
/// Fragment and burst children are moved into `children` for spawning after the pass.
pub fn area_pass(
    world: &mut World,
    tank: &mut Tank,
    blasts: &mut Vec<AreaBlast>,
    kills: &mut Vec<Kill>,
    children: &mut Vec<ProjectileSpawn>,
    outbox: &mut Outbox,
) {
    // Non-explosive splash rounds consumed earlier in this tick.
    for (_entity, (projectile, pos, life)) in
        world.query_mut::<(&mut Projectile, &Position, &Lifecycle)>()
    {
        if !life.destroyed || projectile.splash_applied || !pos.is_finite() {
            continue;
        }
        if let Some(blast) = ordnance::splash(projectile, *pos) {
            projectile.splash_applied = true;
            blasts.push(blast);
        }
    }

    for blast in blasts.drain(..) {
        outbox.visual.push(VisualEvent::Explosion {
            position: blast.position,
            radius: blast.radius,
        });

        match blast.owner {
            Owner::Player => blast_player_side(world, &blast, kills),
            Owner::Enemy => {
                if !blast.exclude_tank && !tank.destroyed {
                    let scale = falloff(blast.position.distance_to(&tank.position), blast.radius);
                    if scale > 0.0 {
                        tank.take_damage(blast.damage * scale, &mut outbox.audio);
                    }
                }
            }
        }

        children.extend(blast.children);
    }
}

fn blast_player_side(world: &mut World, blast: &AreaBlast, kills: &mut Vec<Kill>) {
    let in_reach = |pos: &Position| {
        let scale = falloff(blast.position.distance_to(pos), blast.radius);
        (scale > 0.0).then_some(blast.damage * scale)
    };

    let enemies: Vec<(Entity, f64)> = world
        .query::<(&Enemy, &Position, &Lifecycle)>()
        .iter()
        .filter(|(e, (_, _, life))| !life.destroyed && !blast.exclude.contains(&handle(*e)))
        .filter_map(|(e, (_, pos, _))| in_reach(pos).map(|d| (e, d)))
        .collect();
    for (enemy, damage) in enemies {
        damage_enemy(world, enemy, damage, kills);
    }

    let scenery: Vec<(Entity, f64)> = world
        .query::<(&Scenery, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .filter_map(|(e, (_, pos, _))| in_reach(pos).map(|d| (e, d)))
        .collect();
    for (piece, damage) in scenery {
        damage_scenery(world, piece, damage, kills);
    }
}
