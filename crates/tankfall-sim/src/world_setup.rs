//! Entity spawn factories for setting up the simulation world.
//!
//! Creates enemies, projectiles, power-ups, support units and scenery with
//! the appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankfall_core::components::*;
use tankfall_core::constants::*;
use tankfall_core::data::{CraftStats, DataContext};
use tankfall_core::enums::*;
use tankfall_core::types::{Position, Velocity};

use tankfall_enemy_ai::firing::fire_gap_frames;
use tankfall_enemy_ai::profiles::{get_profile, initial_special};

use crate::ordnance::ProjectileSpawn;

/// Default scenery line-up: (x, half width, half height, health, points, nuke-vulnerable).
const DEFAULT_SCENERY: [(f64, f64, f64, f64, u32, bool); 4] = [
    (180.0, 30.0, 40.0, 60.0, 100, true),
    (460.0, 20.0, 24.0, 30.0, 50, false),
    (820.0, 20.0, 24.0, 30.0, 50, false),
    (1100.0, 30.0, 40.0, 60.0, 100, true),
];

/// Set up the initial session world: background scenery.
/// Enemies are spawned by the wave scheduler.
pub fn setup_session(world: &mut World) {
    for (x, hw, hh, health, points, nuke_vulnerable) in DEFAULT_SCENERY {
        spawn_scenery(
            world,
            Position::new(x, GROUND_Y - hh),
            hw,
            hh,
            health,
            points,
            nuke_vulnerable,
        );
    }
}

/// Stats for a craft: the data table entry, else the built-in default.
pub fn craft_stats(data: &DataContext, kind: EnemyKind) -> CraftStats {
    match data.craft(kind.name()) {
        Some(stats) => *stats,
        None => {
            log::debug!("No craft data for {kind}; using defaults");
            get_profile(kind).stats
        }
    }
}

/// Health after difficulty scaling: `floor(base * (1 + level * step))`, never below 1.
pub fn scaled_health(base: f64, difficulty_level: u32) -> f64 {
    (base * (1.0 + difficulty_level as f64 * DIFFICULTY_HEALTH_STEP))
        .floor()
        .max(1.0)
}

/// Entry point just outside the given edge.
pub fn spawn_position(rng: &mut ChaCha8Rng, kind: EnemyKind, side: SpawnSide) -> Position {
    let profile = get_profile(kind);
    let x = match side {
        SpawnSide::Left => -SPAWN_EDGE_OFFSET,
        SpawnSide::Right => PLAYFIELD_WIDTH + SPAWN_EDGE_OFFSET,
    };
    let y = if profile.is_ground() {
        GROUND_Y - profile.half_height
    } else if kind == EnemyKind::Satellite {
        AIR_SPAWN_MIN_Y
    } else {
        rng.gen_range(AIR_SPAWN_MIN_Y..AIR_SPAWN_MAX_Y)
    };
    Position::new(x, y)
}

/// Spawn one enemy. `difficulty` scales health for procedurally generated enemies only.
pub fn spawn_enemy(
    world: &mut World,
    data: &DataContext,
    kind: EnemyKind,
    position: Position,
    direction: f64,
    difficulty: Option<u32>,
    wave: u32,
) -> hecs::Entity {
    let profile = get_profile(kind);
    let stats = craft_stats(data, kind);
    let health = match difficulty {
        Some(level) => scaled_health(stats.armor, level),
        None => stats.armor,
    };

    let enemy = Enemy {
        kind,
        health,
        max_health: health,
        points: stats.points,
        speed: stats.speed,
        fire_gap_frames: fire_gap_frames(stats.fire_interval_ms),
        age_ms: 0.0,
        last_fire_frame: None,
        direction: if direction < 0.0 { -1.0 } else { 1.0 },
        last_contact_ms: None,
        flash_ms: 0.0,
        special: initial_special(kind),
        evacuating: false,
        wave,
    };

    world.spawn((
        position,
        Velocity::new(enemy.direction * stats.speed, 0.0),
        Hitbox::new(profile.half_width, profile.half_height),
        Lifecycle::default(),
        enemy,
    ))
}

pub fn spawn_projectile(world: &mut World, spawn: ProjectileSpawn) -> hecs::Entity {
    let (position, velocity, projectile) = spawn.into_parts();
    world.spawn((
        position,
        velocity,
        Hitbox::new(PROJECTILE_HALF_SIZE, PROJECTILE_HALF_SIZE),
        Lifecycle::default(),
        projectile,
    ))
}

pub fn spawn_power_up(world: &mut World, kind: PowerUpKind, position: Position) -> hecs::Entity {
    world.spawn((
        position,
        Velocity::new(0.0, POWER_UP_FALL_SPEED),
        Hitbox::new(POWER_UP_HALF_SIZE, POWER_UP_HALF_SIZE),
        Lifecycle::default(),
        PowerUp {
            kind,
            phase: PowerUpPhase::Falling,
        },
    ))
}

pub fn spawn_support_unit(
    world: &mut World,
    payload: PowerUpKind,
    side: SpawnSide,
    drop_x: f64,
) -> hecs::Entity {
    let x = match side {
        SpawnSide::Left => -SUPPORT_HALF_WIDTH - SPAWN_EDGE_OFFSET,
        SpawnSide::Right => PLAYFIELD_WIDTH + SUPPORT_HALF_WIDTH + SPAWN_EDGE_OFFSET,
    };
    let direction = side.inward_direction();
    world.spawn((
        Position::new(x, SUPPORT_Y),
        Velocity::new(direction * SUPPORT_SPEED, 0.0),
        Hitbox::new(SUPPORT_HALF_WIDTH, SUPPORT_HALF_HEIGHT),
        Lifecycle::default(),
        SupportUnit {
            payload,
            phase: SupportPhase::Inbound,
            drop_x,
            direction,
        },
    ))
}

pub fn spawn_scenery(
    world: &mut World,
    position: Position,
    half_width: f64,
    half_height: f64,
    health: f64,
    points: u32,
    nuke_vulnerable: bool,
) -> hecs::Entity {
    world.spawn((
        position,
        Hitbox::new(half_width, half_height),
        Lifecycle::default(),
        Scenery {
            health,
            max_health: health,
            points,
            nuke_vulnerable,
        },
    ))
}
