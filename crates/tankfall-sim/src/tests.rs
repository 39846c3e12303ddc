//! Tests for the simulation engine, combat passes, weapons, waves and the power-up economy.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankfall_core::commands::{DebugCommand, PlayerCommand, TickInput};
use tankfall_core::components::*;
use tankfall_core::constants::*;
use tankfall_core::data::DataContext;
use tankfall_core::enums::*;
use tankfall_core::events::AudioEvent;
use tankfall_core::types::Position;

use crate::combat::{damage_enemy, handle, Kill, Outbox};
use crate::engine::{CommandError, SimConfig, SimulationEngine};
use crate::ordnance::{self, ProjectileSpawn};
use crate::systems::power_ups::{delivery_chance, select_power_up, Delivery, SelectionContext};
use crate::systems::wave_scheduler::{procedural_roster, WaveScheduler, WaveTiming};
use crate::systems::{collision, enemy_ai, movement, power_ups, projectiles, support_unit};
use crate::tank::{EffectTimers, Tank};
use crate::weapons::{Arsenal, UpgradeOutcome};
use crate::world_setup;

fn engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default(), DataContext::empty());
    engine.queue_command(PlayerCommand::StartSession);
    engine.tick(&TickInput::default());
    engine
}

fn idle_input(engine: &SimulationEngine) -> TickInput {
    TickInput {
        pointer: engine.tank().position,
        fire: false,
        special: false,
    }
}

fn spawn(world: &mut World, kind: EnemyKind, x: f64, y: f64) -> hecs::Entity {
    world_setup::spawn_enemy(
        world,
        &DataContext::empty(),
        kind,
        Position::new(x, y),
        1.0,
        None,
        0,
    )
}

fn shot(x: f64, y: f64, damage: f64, owner: Owner, tag: &str) -> ProjectileSpawn {
    ProjectileSpawn::new(Position::new(x, y), 0.0, 0.0, damage, owner, tag)
}

fn enemy_count(world: &World) -> usize {
    world.query::<&Enemy>().iter().count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = SimulationEngine::new(SimConfig::default(), DataContext::empty());
    let mut b = SimulationEngine::new(SimConfig::default(), DataContext::empty());
    a.queue_command(PlayerCommand::StartSession);
    b.queue_command(PlayerCommand::StartSession);

    for i in 0..900 {
        let input = TickInput {
            pointer: Position::new(300.0 + (i % 600) as f64, 200.0),
            fire: true,
            special: i % 300 == 0,
        };
        let snap_a = serde_json::to_string(&a.tick(&input)).unwrap();
        let snap_b = serde_json::to_string(&b.tick(&input)).unwrap();
        assert_eq!(snap_a, snap_b, "Snapshots diverged at tick {i}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut a = SimulationEngine::new(
        SimConfig {
            seed: 1,
            ..Default::default()
        },
        DataContext::empty(),
    );
    let mut b = SimulationEngine::new(
        SimConfig {
            seed: 2,
            ..Default::default()
        },
        DataContext::empty(),
    );
    a.queue_command(PlayerCommand::StartSession);
    b.queue_command(PlayerCommand::StartSession);

    let input = TickInput::default();
    let diverged = (0..600).any(|_| {
        serde_json::to_string(&a.tick(&input)).unwrap()
            != serde_json::to_string(&b.tick(&input)).unwrap()
    });
    assert!(diverged, "Different seeds should produce different spawn positions");
}

// ---- Phase gating ----

#[test]
fn test_idle_engine_does_not_advance() {
    let mut engine = SimulationEngine::new(SimConfig::default(), DataContext::empty());
    let snap = engine.tick(&TickInput::default());
    assert_eq!(snap.phase, GamePhase::Idle);
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_start_session_spawns_scenery() {
    let engine = engine();
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.world().query::<&Scenery>().iter().count(), 4);
    assert_eq!(engine.time().tick, 1);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::Pause);
    let before = engine.time();
    for _ in 0..10 {
        engine.tick(&TickInput::default());
    }
    assert_eq!(engine.phase(), GamePhase::Paused);
    assert_eq!(engine.time().tick, before.tick);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(&TickInput::default());
    assert_eq!(engine.time().tick, before.tick + 1);
}

#[test]
fn test_set_time_scale_clamps() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 9.0 });
    engine.tick(&TickInput::default());
    assert_eq!(engine.time_scale(), 4.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: -1.0 });
    let before = engine.time();
    engine.tick(&TickInput::default());
    assert_eq!(engine.time_scale(), 0.0);
    assert_eq!(engine.time().tick, before.tick, "zero scale freezes the clock");
}

#[test]
fn test_time_scale_applies_on_the_tick_it_is_queued() {
    let mut engine = engine();
    let before = engine.time();
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    engine.tick(&TickInput::default());
    let frame_ms = engine.config().frame_ms;
    assert!((engine.time().elapsed_ms - before.elapsed_ms - 2.0 * frame_ms).abs() < 1e-9);
}

// ---- Enemy damage ----

#[test]
fn test_armor_10_enemy_killed_by_10_damage_round() {
    let mut world = World::new();
    let enemy = spawn(&mut world, EnemyKind::Scout, 400.0, 300.0);
    let round = world_setup::spawn_projectile(&mut world, shot(400.0, 300.0, 10.0, Owner::Player, "bullet"));

    let mut blasts = Vec::new();
    let mut kills = Vec::new();
    let mut outbox = Outbox::default();
    collision::player_projectiles_vs_enemies(
        &mut world,
        Position::new(640.0, TANK_Y),
        &mut blasts,
        &mut kills,
        &mut outbox,
    );

    let state = world.get::<&Enemy>(enemy).unwrap();
    assert_eq!(state.health, 0.0);
    assert!(world.get::<&Lifecycle>(enemy).unwrap().destroyed);
    assert!(world.get::<&Lifecycle>(round).unwrap().destroyed);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].points, 50);
    assert_eq!(kills[0].enemy, Some((EnemyKind::Scout, 0)));
}

#[test]
fn test_engine_kill_awards_score() {
    let mut engine = engine();
    engine.spawn_enemy(EnemyKind::Scout, Position::new(400.0, 300.0));
    engine.spawn_projectile(shot(400.0, 300.0, 10.0, Owner::Player, "bullet"));

    let input = idle_input(&engine);
    let snap = engine.tick(&input);

    assert_eq!(engine.score().score, 50);
    assert_eq!(engine.score().kills, 1);
    assert_eq!(engine.delivery().kills_since_dispatch(), 1);
    assert!(snap.enemies.is_empty());
    assert!(snap.projectiles.is_empty());
    assert!(snap
        .audio_events
        .contains(&AudioEvent::EnemyDestroyed { kind: EnemyKind::Scout }));
}

#[test]
fn test_enemy_health_never_increases() {
    let mut world = World::new();
    let enemy = spawn(&mut world, EnemyKind::HeavyTank, 400.0, 300.0);
    let mut kills = Vec::new();
    let mut last = world.get::<&Enemy>(enemy).unwrap().health;

    for amount in [5.0, 0.0, -20.0, 12.5, 3.0] {
        damage_enemy(&mut world, enemy, amount, &mut kills);
        let health = world.get::<&Enemy>(enemy).unwrap().health;
        assert!(health <= last);
        last = health;
    }
}

#[test]
fn test_non_piercing_round_hits_one_enemy() {
    let mut world = World::new();
    let a = spawn(&mut world, EnemyKind::HeavyTank, 400.0, 300.0);
    let b = spawn(&mut world, EnemyKind::HeavyTank, 402.0, 300.0);
    world_setup::spawn_projectile(&mut world, shot(401.0, 300.0, 10.0, Owner::Player, "bullet"));

    let mut kills = Vec::new();
    collision::player_projectiles_vs_enemies(
        &mut world,
        Position::new(640.0, TANK_Y),
        &mut Vec::new(),
        &mut kills,
        &mut Outbox::default(),
    );

    let damaged = [a, b]
        .iter()
        .filter(|e| {
            let enemy = world.get::<&Enemy>(**e).unwrap();
            enemy.health < enemy.max_health
        })
        .count();
    assert_eq!(damaged, 1);
}

#[test]
fn test_piercing_round_hits_every_overlapping_enemy() {
    let mut world = World::new();
    let a = spawn(&mut world, EnemyKind::HeavyTank, 400.0, 300.0);
    let b = spawn(&mut world, EnemyKind::HeavyTank, 402.0, 300.0);
    let rail = world_setup::spawn_projectile(&mut world, shot(401.0, 300.0, 10.0, Owner::Player, "rail"));

    collision::player_projectiles_vs_enemies(
        &mut world,
        Position::new(640.0, TANK_Y),
        &mut Vec::new(),
        &mut Vec::new(),
        &mut Outbox::default(),
    );

    for e in [a, b] {
        let enemy = world.get::<&Enemy>(e).unwrap();
        assert_eq!(enemy.health, enemy.max_health - 10.0);
    }
    assert!(!world.get::<&Lifecycle>(rail).unwrap().destroyed);
    assert_eq!(world.get::<&Projectile>(rail).unwrap().struck.len(), 2);

    // A second pass must not hit the same enemies again.
    collision::player_projectiles_vs_enemies(
        &mut world,
        Position::new(640.0, TANK_Y),
        &mut Vec::new(),
        &mut Vec::new(),
        &mut Outbox::default(),
    );
    let enemy = world.get::<&Enemy>(a).unwrap();
    assert_eq!(enemy.health, enemy.max_health - 10.0);
}

#[test]
fn test_deflector_reflects_player_round() {
    let mut world = World::new();
    let deflector = spawn(&mut world, EnemyKind::Deflector, 400.0, 300.0);
    world.get::<&mut Enemy>(deflector).unwrap().special = SpecialBehavior::Deflector(DeflectorState {
        phase: DeflectorPhase::Active,
        phase_elapsed_ms: 0.0,
    });
    let round = world_setup::spawn_projectile(
        &mut world,
        ProjectileSpawn::new(Position::new(400.0, 300.0), 0.0, 500.0, 20.0, Owner::Player, "bullet"),
    );

    let mut outbox = Outbox::default();
    collision::player_projectiles_vs_enemies(
        &mut world,
        Position::new(400.0, TANK_Y),
        &mut Vec::new(),
        &mut Vec::new(),
        &mut outbox,
    );

    let projectile = world.get::<&Projectile>(round).unwrap();
    assert_eq!(projectile.owner, Owner::Enemy);
    assert!(projectile.deflected);
    assert!((projectile.speed - 400.0).abs() < 1e-9);
    assert!((projectile.damage - 14.0).abs() < 1e-9);
    // Straight down toward the tank.
    assert!((projectile.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

    let enemy = world.get::<&Enemy>(deflector).unwrap();
    assert_eq!(enemy.health, enemy.max_health);
    assert!(outbox.audio.contains(&AudioEvent::Deflect));
}

#[test]
fn test_projectiles_intercept_each_other() {
    let mut world = World::new();
    let mine = world_setup::spawn_projectile(&mut world, shot(300.0, 300.0, 5.0, Owner::Player, "bullet"));
    let theirs = world_setup::spawn_projectile(&mut world, shot(302.0, 300.0, 5.0, Owner::Enemy, "bullet"));

    let mut outbox = Outbox::default();
    collision::projectile_intercepts(&mut world, &mut outbox);

    assert!(world.get::<&Lifecycle>(mine).unwrap().destroyed);
    assert!(world.get::<&Lifecycle>(theirs).unwrap().destroyed);
    assert_eq!(outbox.visual.len(), 1);
}

// ---- Tank ----

#[test]
fn test_shield_blocks_enemy_projectile() {
    let mut engine = engine();
    engine.tank_mut().effects.activate(TimedEffect::Shield, 1000.0);
    let at = engine.tank().position;
    engine.spawn_projectile(shot(at.x, at.y, 10.0, Owner::Enemy, "bullet"));

    let input = idle_input(&engine);
    let snap = engine.tick(&input);

    assert_eq!(engine.tank().health, TANK_MAX_HEALTH);
    assert!(snap.projectiles.is_empty(), "blocked projectile is consumed");
    assert!(snap.audio_events.contains(&AudioEvent::ShieldBlock));
}

#[test]
fn test_unshielded_tank_takes_damage() {
    let mut engine = engine();
    let at = engine.tank().position;
    engine.spawn_projectile(shot(at.x, at.y, 10.0, Owner::Enemy, "bullet"));

    let input = idle_input(&engine);
    engine.tick(&input);
    assert_eq!(engine.tank().health, TANK_MAX_HEALTH - 10.0);
}

#[test]
fn test_low_health_cue_is_one_shot() {
    let mut tank = Tank::new(100.0);
    let mut audio = Vec::new();
    tank.take_damage(80.0, &mut audio);
    tank.take_damage(5.0, &mut audio);
    tank.heal(0.4);
    tank.take_damage(60.0, &mut audio);
    let cues = audio.iter().filter(|e| **e == AudioEvent::LowHealth).count();
    assert_eq!(cues, 1);
}

#[test]
fn test_contact_damage_respects_cooldown() {
    let mut engine = engine();
    let at = engine.tank().position;
    let enemy = engine.spawn_enemy(EnemyKind::LightTank, at);
    engine.world_mut().get::<&mut Enemy>(enemy).unwrap().speed = 0.0;

    let input = idle_input(&engine);
    engine.tick(&input);
    assert_eq!(engine.tank().health, TANK_MAX_HEALTH - CONTACT_DAMAGE_TO_TANK);

    // Still touching, but inside the cooldown window.
    engine.tick(&input);
    assert_eq!(engine.tank().health, TANK_MAX_HEALTH - CONTACT_DAMAGE_TO_TANK);
}

#[test]
fn test_kamikaze_contact_destroys_it() {
    let mut engine = engine();
    let at = engine.tank().position;
    engine.spawn_enemy(EnemyKind::Kamikaze, at);

    let input = idle_input(&engine);
    engine.tick(&input);
    assert_eq!(engine.tank().health, TANK_MAX_HEALTH - KAMIKAZE_CONTACT_DAMAGE);
    assert_eq!(enemy_count(engine.world()), 0);
}

#[test]
fn test_fire_resets_only_that_weapons_cooldown() {
    let mut arsenal = Arsenal::new();
    arsenal.set_level(WeaponKind::Cannon, 1);
    let effects = EffectTimers::default();
    let target = HomingTarget::Point(Position::new(0.0, 0.0));

    let shots = arsenal.fire(WeaponKind::MachineGun, Position::new(0.0, 0.0), 0.0, &effects, target);
    assert_eq!(shots.len(), 1);
    assert_eq!(arsenal.slot(WeaponKind::MachineGun).cooldown_ms, 150.0);
    assert_eq!(arsenal.slot(WeaponKind::Cannon).cooldown_ms, 0.0);
    assert!(!arsenal.can_fire(WeaponKind::MachineGun));
    assert!(arsenal.can_fire(WeaponKind::Cannon));
}

#[test]
fn test_rapid_fire_halves_cooldown() {
    let mut arsenal = Arsenal::new();
    let mut effects = EffectTimers::default();
    effects.activate(TimedEffect::RapidFire, 1000.0);
    arsenal.fire(
        WeaponKind::MachineGun,
        Position::new(0.0, 0.0),
        0.0,
        &effects,
        HomingTarget::Point(Position::new(0.0, 0.0)),
    );
    assert_eq!(arsenal.slot(WeaponKind::MachineGun).cooldown_ms, 75.0);
}

#[test]
fn test_spread_shot_and_enhanced_gun() {
    let mut arsenal = Arsenal::new();
    let mut effects = EffectTimers::default();
    effects.activate(TimedEffect::SpreadShot, 1000.0);
    effects.activate(TimedEffect::EnhancedGun, 1000.0);
    let shots = arsenal.fire(
        WeaponKind::MachineGun,
        Position::new(0.0, 0.0),
        0.0,
        &effects,
        HomingTarget::Point(Position::new(0.0, 0.0)),
    );
    assert_eq!(shots.len(), 3);
    assert!((shots[0].angle + SPREAD_ANGLE).abs() < 1e-12);
    assert!((shots[2].angle - SPREAD_ANGLE).abs() < 1e-12);
    assert!(shots.iter().all(|s| (s.damage - 7.5).abs() < 1e-12));
}

#[test]
fn test_upgrade_order_and_surplus() {
    let mut arsenal = Arsenal::new();
    assert_eq!(arsenal.apply_upgrade(), UpgradeOutcome::Unlocked(WeaponKind::Cannon));
    assert_eq!(arsenal.apply_upgrade(), UpgradeOutcome::Unlocked(WeaponKind::HomingMissile));
    assert_eq!(arsenal.apply_upgrade(), UpgradeOutcome::Unlocked(WeaponKind::Railgun));
    assert_eq!(arsenal.apply_upgrade(), UpgradeOutcome::Unlocked(WeaponKind::ClusterMortar));
    // All at level 1: the earliest weapon goes first.
    assert_eq!(
        arsenal.apply_upgrade(),
        UpgradeOutcome::Upgraded(WeaponKind::MachineGun, 2)
    );
    for _ in 0..9 {
        assert!(matches!(arsenal.apply_upgrade(), UpgradeOutcome::Upgraded(_, _)));
    }
    assert_eq!(arsenal.tier(), 15);
    assert_eq!(arsenal.apply_upgrade(), UpgradeOutcome::Surplus);
}

#[test]
fn test_special_volley_ignores_cooldown_once() {
    let mut engine = engine();
    let pointer = Position::new(engine.tank().position.x, 100.0);
    engine.tank_mut().arsenal.set_level(WeaponKind::Railgun, 1);

    let fire = TickInput {
        pointer,
        fire: true,
        special: false,
    };
    engine.tick(&fire);
    let cooldown = engine.tank().arsenal.slot(WeaponKind::Railgun).cooldown_ms;
    assert!(cooldown > 0.0);

    let special = TickInput {
        pointer,
        fire: false,
        special: true,
    };
    let snap = engine.tick(&special);
    let fired = snap
        .audio_events
        .iter()
        .filter(|e| matches!(e, AudioEvent::WeaponFire { .. }))
        .count();
    assert_eq!(fired, 2, "every active weapon fires in the volley");
    assert_eq!(engine.tank().special_cooldown_ms, SPECIAL_COOLDOWN_MS);

    let snap = engine.tick(&special);
    assert!(!snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::WeaponFire { .. })));
}

// ---- Projectiles ----

#[test]
fn test_explosive_fragments_on_empty_point() {
    let (_, _, projectile) = ProjectileSpawn::new(
        Position::new(500.0, 300.0),
        0.3,
        400.0,
        50.0,
        Owner::Player,
        "shell",
    )
    .with_explosive(Explosive {
        radius: 50.0,
        fragments: 4,
        bursts: 0,
    })
    .into_parts();

    let blast = ordnance::detonate(&projectile, Position::new(500.0, 300.0)).unwrap();
    assert_eq!(blast.children.len(), 4);
    for (i, child) in blast.children.iter().enumerate() {
        assert!((child.damage - 15.0).abs() < 1e-9);
        assert!((child.speed - 240.0).abs() < 1e-9);
        let expected = std::f64::consts::FRAC_PI_2 * i as f64;
        assert!((child.angle - expected).abs() < 1e-9);
    }

    let mut world = World::new();
    let mut tank = Tank::new(100.0);
    let mut children = Vec::new();
    collision::area_pass(
        &mut world,
        &mut tank,
        &mut vec![blast],
        &mut Vec::new(),
        &mut children,
        &mut Outbox::default(),
    );
    assert_eq!(children.len(), 4);
}

#[test]
fn test_area_damage_falls_off() {
    let mut world = World::new();
    let near = spawn(&mut world, EnemyKind::HeavyTank, 500.0, 300.0);
    let mid = spawn(&mut world, EnemyKind::HeavyTank, 525.0, 300.0);
    let far = spawn(&mut world, EnemyKind::HeavyTank, 560.0, 300.0);

    let (_, _, projectile) = ProjectileSpawn::new(Position::new(500.0, 300.0), 0.0, 0.0, 40.0, Owner::Player, "shell")
        .with_explosive(Explosive {
            radius: 50.0,
            fragments: 0,
            bursts: 0,
        })
        .into_parts();
    let blast = ordnance::detonate(&projectile, Position::new(500.0, 300.0)).unwrap();

    let mut tank = Tank::new(100.0);
    collision::area_pass(
        &mut world,
        &mut tank,
        &mut vec![blast],
        &mut Vec::new(),
        &mut Vec::new(),
        &mut Outbox::default(),
    );

    let lost = |e| {
        let enemy = world.get::<&Enemy>(e).unwrap();
        enemy.max_health - enemy.health
    };
    assert!((lost(near) - 40.0).abs() < 1e-9);
    assert!((lost(mid) - 20.0).abs() < 1e-9);
    assert_eq!(lost(far), 0.0);
}

#[test]
fn test_splash_applied_once_when_destroyed() {
    let mut world = World::new();
    let target = spawn(&mut world, EnemyKind::HeavyTank, 500.0, 300.0);
    let bystander = spawn(&mut world, EnemyKind::HeavyTank, 545.0, 300.0);
    world_setup::spawn_projectile(
        &mut world,
        shot(500.0, 300.0, 25.0, Owner::Player, "shell").with_splash(60.0),
    );

    let mut blasts = Vec::new();
    let mut tank = Tank::new(100.0);
    for _ in 0..2 {
        collision::player_projectiles_vs_enemies(
            &mut world,
            tank.position,
            &mut blasts,
            &mut Vec::new(),
            &mut Outbox::default(),
        );
        collision::area_pass(
            &mut world,
            &mut tank,
            &mut blasts,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut Outbox::default(),
        );
    }

    // The direct hit is excluded from its own splash.
    let hit = world.get::<&Enemy>(target).unwrap();
    assert_eq!(hit.max_health - hit.health, 25.0);
    let side = world.get::<&Enemy>(bystander).unwrap();
    assert!((side.max_health - side.health - 6.25).abs() < 1e-9);
}

#[test]
fn test_expired_splash_round_does_not_splash() {
    let mut world = World::new();
    let nearby = spawn(&mut world, EnemyKind::HeavyTank, 350.0, 300.0);
    world_setup::spawn_projectile(
        &mut world,
        shot(300.0, 300.0, 25.0, Owner::Player, "shell").with_splash(60.0),
    );

    let mut blasts = Vec::new();
    let mut tank = Tank::new(100.0);
    projectiles::run(&mut world, &tank, PROJECTILE_LIFETIME_MS + 1.0, &mut blasts);
    collision::area_pass(
        &mut world,
        &mut tank,
        &mut blasts,
        &mut Vec::new(),
        &mut Vec::new(),
        &mut Outbox::default(),
    );

    let enemy = world.get::<&Enemy>(nearby).unwrap();
    assert_eq!(enemy.health, enemy.max_health);
}

#[test]
fn test_homing_target_lost_flies_straight() {
    let mut world = World::new();
    let enemy = spawn(&mut world, EnemyKind::Scout, 800.0, 100.0);
    let missile = world_setup::spawn_projectile(
        &mut world,
        ProjectileSpawn::new(Position::new(100.0, 300.0), 0.0, 300.0, 10.0, Owner::Player, "missile")
            .with_homing(HomingTarget::Entity(handle(enemy)), 0.5),
    );
    world.despawn(enemy).unwrap();

    let tank = Tank::new(100.0);
    projectiles::run(&mut world, &tank, FRAME_MS, &mut Vec::new());

    let projectile = world.get::<&Projectile>(missile).unwrap();
    assert!(projectile.behavior.homing.is_none());
    assert_eq!(projectile.angle, 0.0);
    assert!(!world.get::<&Lifecycle>(missile).unwrap().destroyed);
}

#[test]
fn test_homing_turns_gradually() {
    let mut world = World::new();
    let missile = world_setup::spawn_projectile(
        &mut world,
        ProjectileSpawn::new(Position::new(100.0, 300.0), 0.0, 300.0, 10.0, Owner::Player, "missile")
            .with_homing(HomingTarget::Point(Position::new(100.0, 0.0)), 0.1),
    );
    let tank = Tank::new(100.0);
    projectiles::run(&mut world, &tank, FRAME_MS, &mut Vec::new());

    let angle = world.get::<&Projectile>(missile).unwrap().angle;
    // Target is straight up (-PI/2); one frame closes 10 % of the error.
    assert!((angle + std::f64::consts::FRAC_PI_2 * 0.1).abs() < 1e-9);
}

#[test]
fn test_projectile_expires_after_lifetime() {
    let mut world = World::new();
    let round = world_setup::spawn_projectile(&mut world, shot(300.0, 300.0, 5.0, Owner::Player, "bullet"));
    let tank = Tank::new(100.0);
    projectiles::run(&mut world, &tank, PROJECTILE_LIFETIME_MS - 1.0, &mut Vec::new());
    assert!(!world.get::<&Lifecycle>(round).unwrap().destroyed);
    projectiles::run(&mut world, &tank, 2.0, &mut Vec::new());
    assert!(world.get::<&Lifecycle>(round).unwrap().destroyed);
}

#[test]
fn test_mortar_detonates_on_ground() {
    let mut world = World::new();
    world_setup::spawn_projectile(
        &mut world,
        ProjectileSpawn::new(
            Position::new(300.0, GROUND_Y - 1.0),
            std::f64::consts::FRAC_PI_2,
            200.0,
            30.0,
            Owner::Player,
            "cluster_mortar",
        )
        .with_explosive(Explosive {
            radius: 50.0,
            fragments: 4,
            bursts: 0,
        }),
    );
    let tank = Tank::new(100.0);
    let mut blasts = Vec::new();
    projectiles::run(&mut world, &tank, FRAME_MS, &mut blasts);
    assert_eq!(blasts.len(), 1);
    assert_eq!(blasts[0].children.len(), 4);
}

// ---- Enemy AI ----

#[test]
fn test_satellite_beam_hurts_unshielded_tank() {
    let mut world = World::new();
    let mut tank = Tank::new(100.0);
    let sat = spawn(&mut world, EnemyKind::Satellite, tank.position.x, AIR_SPAWN_MIN_Y);
    world.get::<&mut Enemy>(sat).unwrap().special = SpecialBehavior::Satellite(SatelliteState {
        phase: SatellitePhase::Active,
        phase_elapsed_ms: 0.0,
    });

    let mut outbox = Outbox::default();
    enemy_ai::run(
        &mut world,
        &mut tank,
        1000.0,
        1000.0,
        &mut crate::schedule::EventQueue::new(),
        &mut Vec::new(),
        &mut outbox,
    );
    assert!((tank.health - (100.0 - SATELLITE_BEAM_DPS)).abs() < 1e-9);

    tank.effects.activate(TimedEffect::Shield, 5000.0);
    let before = tank.health;
    enemy_ai::run(
        &mut world,
        &mut tank,
        500.0,
        1500.0,
        &mut crate::schedule::EventQueue::new(),
        &mut Vec::new(),
        &mut outbox,
    );
    assert_eq!(tank.health, before);
}

#[test]
fn test_evacuating_enemies_leave_and_are_removed() {
    let mut world = World::new();
    let mut tank = Tank::new(100.0);
    let enemy = spawn(&mut world, EnemyKind::Scout, 100.0, 200.0);
    assert_eq!(enemy_ai::evacuate_all(&mut world), 1);

    let mut spawns = Vec::new();
    for _ in 0..60 {
        enemy_ai::run(
            &mut world,
            &mut tank,
            FRAME_MS,
            0.0,
            &mut crate::schedule::EventQueue::new(),
            &mut spawns,
            &mut Outbox::default(),
        );
        movement::run(&mut world, FRAME_MS);
    }
    assert!(spawns.is_empty(), "evacuating enemies never fire");
    assert!(world.get::<&Lifecycle>(enemy).unwrap().destroyed);
}

// ---- Game over and respawn ----

#[test]
fn test_tank_death_triggers_game_over_and_evacuation() {
    let mut engine = engine();
    engine.spawn_enemy(EnemyKind::HeavyTank, Position::new(200.0, 300.0));
    engine.tank_mut().health = 5.0;
    let at = engine.tank().position;
    engine.spawn_projectile(shot(at.x, at.y, 10.0, Owner::Enemy, "bullet"));

    let input = idle_input(&engine);
    let snap = engine.tick(&input);

    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.tank.destroyed);
    assert!(snap.audio_events.contains(&AudioEvent::TankDestroyed));
    assert!(snap
        .enemies
        .iter()
        .all(|e| e.visual_state == VisualState::Evacuating));
    assert_eq!(engine.pending_events(), 1);

    // Stragglers are cleared by the evacuation deadline.
    for _ in 0..((EVACUATION_TIMEOUT_MS / 100.0) as usize + 1) {
        engine.tick_with_delta(&input, 100.0);
    }
    assert_eq!(enemy_count(engine.world()), 0);
    assert_eq!(engine.pending_events(), 0);
}

#[test]
fn test_support_units_exit_on_player_death() {
    let mut engine = engine();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let at = engine.tank().position;
    support_unit::dispatch(
        engine.world_mut(),
        &mut rng,
        at.x,
        PowerUpKind::Health,
        &mut Outbox::default(),
    );
    engine.tank_mut().health = 1.0;
    engine.spawn_projectile(shot(at.x, at.y, 10.0, Owner::Enemy, "bullet"));

    let input = idle_input(&engine);
    engine.tick(&input);
    let unit = engine.world().query::<&SupportUnit>().iter().next().map(|(_, u)| *u).unwrap();
    assert_eq!(unit.phase, SupportPhase::ForcedExit);

    for _ in 0..200 {
        engine.tick(&input);
    }
    assert_eq!(engine.world().query::<&SupportUnit>().iter().count(), 0);
    assert_eq!(engine.world().query::<&PowerUp>().iter().count(), 0);
}

#[test]
fn test_respawn_keeps_weapons_new_campaign_resets() {
    let mut engine = engine();
    engine.tank_mut().arsenal.set_level(WeaponKind::Railgun, 2);
    engine.tank_mut().health = 1.0;
    let at = engine.tank().position;
    engine.spawn_projectile(shot(at.x, at.y, 10.0, Owner::Enemy, "bullet"));
    let input = idle_input(&engine);
    engine.tick(&input);
    assert_eq!(engine.phase(), GamePhase::GameOver);

    engine.queue_command(PlayerCommand::RespawnTank);
    engine.tick(&input);
    assert_eq!(engine.phase(), GamePhase::Active);
    assert_eq!(engine.tank().health, TANK_MAX_HEALTH);
    assert!(!engine.tank().low_health_cued);
    assert_eq!(engine.tank().arsenal.level(WeaponKind::Railgun), 2);

    engine.queue_command(PlayerCommand::NewCampaign);
    engine.tick(&input);
    assert_eq!(engine.tank().arsenal.level(WeaponKind::Railgun), 0);
    assert_eq!(engine.tank().arsenal.tier(), 1);
    assert_eq!(engine.score().score, 0);
}

// ---- Waves ----

#[test]
fn test_difficulty_clock_three_increments_in_36s() {
    let mut data_rng = ChaCha8Rng::seed_from_u64(9);
    let data = DataContext::empty();
    let mut waves = WaveScheduler::new(WaveTiming::default());
    waves.start(0.0);

    let mut now = 0.0;
    while now < 36_000.0 {
        now += 500.0;
        // Keep one enemy alive so the wave clock does not interfere.
        waves.update(now, 1, 1, &data, &mut data_rng);
    }
    assert_eq!(waves.difficulty_level(), 3);
}

#[test]
fn test_difficulty_applies_to_later_spawns_only() {
    let mut world = World::new();
    let data = DataContext::empty();
    let early = world_setup::spawn_enemy(&mut world, &data, EnemyKind::Scout, Position::new(0.0, 100.0), 1.0, Some(0), 1);
    let late = world_setup::spawn_enemy(&mut world, &data, EnemyKind::Scout, Position::new(0.0, 100.0), 1.0, Some(3), 1);

    assert_eq!(world.get::<&Enemy>(early).unwrap().max_health, 10.0);
    assert_eq!(world.get::<&Enemy>(late).unwrap().max_health, 16.0);
    assert_eq!(world_setup::scaled_health(3.0, 0), 3.0);
    assert_eq!(world_setup::scaled_health(0.2, 1), 1.0);
}

#[test]
fn test_wave_completion_waits_for_spawns_and_kills() {
    let data = DataContext::empty();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut waves = WaveScheduler::new(WaveTiming::default());
    waves.start(0.0);

    let update = waves.update(FIRST_WAVE_DELAY_MS, 0, 0, &data, &mut rng);
    assert_eq!(update.started, Some(1));
    assert_eq!(update.spawns.len(), 1);
    assert!(!waves.wave_complete(0), "batch still has pending spawns");

    let mut alive = 1;
    let mut now = FIRST_WAVE_DELAY_MS;
    while alive < 4 {
        now += FALLBACK_SPAWN_INTERVAL_MS;
        let update = waves.update(now, alive, alive, &data, &mut rng);
        assert!(update.started.is_none());
        alive += update.spawns.len() as u32;
    }
    assert!(!waves.wave_complete(alive), "enemies still alive");
    assert!(waves.wave_complete(0));

    // Everyone dies; the next wave follows after the inter-wave delay.
    let update = waves.update(now + 10.0, 0, 0, &data, &mut rng);
    assert!(update.started.is_none());
    let update = waves.update(now + 10.0 + WAVE_DELAY_MS, 0, 0, &data, &mut rng);
    assert_eq!(update.started, Some(2));
}

#[test]
fn test_wave_skip_drops_pending_spawns() {
    let data = DataContext::empty();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut waves = WaveScheduler::new(WaveTiming::default());
    waves.start(0.0);
    waves.update(FIRST_WAVE_DELAY_MS, 0, 0, &data, &mut rng);

    assert_eq!(waves.advance_wave(2000.0, &data, &mut rng), 2);
    let view = waves.view(0);
    assert_eq!(view.wave_number, 2);
    assert_eq!(view.enemies_in_wave, procedural_roster(2).len() as u32);

    assert_eq!(waves.retreat_wave(2100.0, &data, &mut rng), 1);
    assert_eq!(waves.wave_number(), 1);
}

#[test]
fn test_wave_stall_flagged_not_forced() {
    let data = DataContext::empty();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut waves = WaveScheduler::new(WaveTiming::default());
    waves.start(0.0);
    let mut now = FIRST_WAVE_DELAY_MS;
    waves.update(now, 0, 0, &data, &mut rng);
    for _ in 0..3 {
        now += FALLBACK_SPAWN_INTERVAL_MS;
        waves.update(now, 0, 0, &data, &mut rng);
    }

    // The batch is gone but a straggler from elsewhere stays alive.
    let start = now + 1.0;
    waves.update(start, 1, 0, &data, &mut rng);
    waves.update(start + WAVE_STALL_WARN_MS, 1, 0, &data, &mut rng);
    assert!(waves.is_stalled());
    assert!(!waves.wave_complete(1));
    let update = waves.update(start + WAVE_STALL_WARN_MS + 10_000.0, 1, 0, &data, &mut rng);
    assert!(update.started.is_none());
}

// ---- Power-ups ----

fn ctx(health_fraction: f64, weapon_tier: u32, enemy_count: usize, elapsed_ms: f64) -> SelectionContext {
    SelectionContext {
        health_fraction,
        weapon_tier,
        enemy_count,
        elapsed_ms,
    }
}

#[test]
fn test_critical_health_selects_shield() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut rotation = 0;
    let recent = VecDeque::new();
    assert_eq!(
        select_power_up(&ctx(0.2, 10, 0, 0.0), &recent, &mut rotation, &mut rng),
        PowerUpKind::Shield
    );

    let recent: VecDeque<_> = [PowerUpKind::Shield].into_iter().collect();
    let pick = select_power_up(&ctx(0.2, 2, 0, 60_000.0), &recent, &mut rotation, &mut rng);
    assert_eq!(pick, PowerUpKind::WeaponUpgrade);
}

#[test]
fn test_selection_tiers_are_conditional() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut rotation = 0;
    let recent = VecDeque::new();

    // Low tier but too early for an upgrade, small crowd: nothing is forced.
    let early = ctx(1.0, 1, 0, 5_000.0);
    let picks: Vec<_> = (0..64)
        .map(|_| select_power_up(&early, &recent, &mut rotation, &mut rng))
        .collect();
    assert!(picks.iter().any(|k| *k != PowerUpKind::SpreadShot));

    assert_eq!(
        select_power_up(&ctx(1.0, 2, 0, 60_000.0), &recent, &mut rotation, &mut rng),
        PowerUpKind::WeaponUpgrade
    );
    let upgraded: VecDeque<_> = [PowerUpKind::WeaponUpgrade].into_iter().collect();
    assert_eq!(
        select_power_up(&ctx(1.0, 2, 0, 60_000.0), &upgraded, &mut rotation, &mut rng),
        PowerUpKind::SpreadShot
    );

    assert_eq!(
        select_power_up(&ctx(1.0, 8, 15, 0.0), &recent, &mut rotation, &mut rng),
        PowerUpKind::Nuke
    );
    let nuked: VecDeque<_> = [PowerUpKind::Nuke].into_iter().collect();
    assert_eq!(
        select_power_up(&ctx(1.0, 8, 15, 0.0), &nuked, &mut rotation, &mut rng),
        PowerUpKind::ScreenLaser
    );
}

#[test]
fn test_selection_rotates_late_in_the_session() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut rotation = 0;
    let recent = VecDeque::new();
    let late = ctx(1.0, 8, 0, 200_000.0);
    assert_eq!(
        select_power_up(&late, &recent, &mut rotation, &mut rng),
        PowerUpKind::RapidFire
    );
    assert_eq!(
        select_power_up(&late, &recent, &mut rotation, &mut rng),
        PowerUpKind::SpeedBoost
    );
}

#[test]
fn test_selection_uniform_when_no_condition_holds() {
    let calm = ctx(1.0, 15, 2, 60_000.0);
    let recent = VecDeque::new();
    let mut seen = std::collections::HashSet::new();
    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rotation = 0;
        seen.insert(select_power_up(&calm, &recent, &mut rotation, &mut rng));
    }
    assert!(seen.len() >= 5, "expected a spread of kinds, got {seen:?}");

    let recent: VecDeque<_> = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::Nuke,
        PowerUpKind::WeaponUpgrade,
        PowerUpKind::SpreadShot,
    ]
    .into_iter()
    .collect();
    for seed in 0..50 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut rotation = 0;
        let pick = select_power_up(&calm, &recent, &mut rotation, &mut rng);
        assert!(!recent.contains(&pick));
    }
}

#[test]
fn test_delivery_chance_capped() {
    assert!((delivery_chance(&ctx(1.0, 10, 0, 0.0)) - DELIVERY_BASE_CHANCE).abs() < 1e-12);
    assert_eq!(delivery_chance(&ctx(0.1, 1, 50, 1_000_000.0)), DELIVERY_MAX_CHANCE);
}

#[test]
fn test_delivery_respects_minimum_interval() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut delivery = Delivery::new(true);
    delivery.reset(0.0);
    let urgent = ctx(0.1, 1, 50, 1_000_000.0);

    let mut now = 0.0;
    while now < DELIVERY_MIN_INTERVAL_MS - 1.0 {
        assert!(delivery.evaluate(now, &urgent, &mut rng).is_none());
        now += 100.0;
    }

    let mut dispatched = 0;
    while now < 200_000.0 {
        if delivery.evaluate(now, &urgent, &mut rng).is_some() {
            dispatched += 1;
        }
        now += 100.0;
    }
    assert!(dispatched >= 1);
    assert!(dispatched <= (200_000.0 / DELIVERY_MIN_INTERVAL_MS) as usize);
    assert!(delivery.recent().len() <= RECENT_DELIVERY_WINDOW);
}

#[test]
fn test_support_unit_delivers_then_leaves() {
    let mut world = World::new();
    world_setup::spawn_support_unit(&mut world, PowerUpKind::Health, SpawnSide::Left, 200.0);

    let mut released = Vec::new();
    let mut now = 0.0;
    for _ in 0..120 {
        now += 100.0;
        movement::run(&mut world, 100.0);
        released.extend(support_unit::run(&mut world, now));
    }
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].0, PowerUpKind::Health);
    assert!((released[0].1.x - 200.0).abs() < 1e-9);

    let gone = world
        .query::<(&SupportUnit, &Lifecycle)>()
        .iter()
        .all(|(_, (_, life))| life.destroyed);
    assert!(gone);
}

#[test]
fn test_power_up_lands_and_expires() {
    let mut world = World::new();
    let drop = world_setup::spawn_power_up(&mut world, PowerUpKind::Shield, Position::new(300.0, GROUND_Y - 20.0));
    movement::run(&mut world, 200.0);
    power_ups::run(&mut world, 200.0);
    assert!(matches!(
        world.get::<&PowerUp>(drop).unwrap().phase,
        PowerUpPhase::Landed { .. }
    ));

    power_ups::run(&mut world, 200.0 + POWER_UP_GROUND_EXPIRY_MS - 1.0);
    assert!(!world.get::<&Lifecycle>(drop).unwrap().destroyed);
    power_ups::run(&mut world, 200.0 + POWER_UP_GROUND_EXPIRY_MS);
    assert!(world.get::<&Lifecycle>(drop).unwrap().destroyed);
}

#[test]
fn test_collecting_health_and_upgrade() {
    let mut engine = engine();
    engine.tank_mut().health = 50.0;
    let at = engine.tank().position;
    engine.spawn_power_up(PowerUpKind::Health, at);
    engine.spawn_power_up(PowerUpKind::WeaponUpgrade, at);

    let input = idle_input(&engine);
    let snap = engine.tick(&input);
    assert_eq!(engine.tank().health, 90.0);
    assert_eq!(engine.tank().arsenal.level(WeaponKind::Cannon), 1);
    assert_eq!(engine.score().power_ups_collected, 2);
    assert!(snap.power_ups.is_empty());
}

#[test]
fn test_timed_effect_resets_without_stacking() {
    let mut engine = engine();
    let at = engine.tank().position;
    engine.spawn_power_up(PowerUpKind::SpeedBoost, at);
    let input = idle_input(&engine);
    engine.tick(&input);
    engine.tick_with_delta(&input, 4000.0);
    engine.spawn_power_up(PowerUpKind::SpeedBoost, engine.tank().position);
    engine.tick_with_delta(&input, 1.0);

    let remaining = engine.tank().effects.remaining(TimedEffect::SpeedBoost);
    assert!(remaining <= TIMED_EFFECT_DURATION_MS);
    assert!(remaining > TIMED_EFFECT_DURATION_MS - 10.0);
}

#[test]
fn test_surplus_upgrade_awards_score() {
    let mut world = World::new();
    let mut tank = Tank::new(100.0);
    for kind in WeaponKind::ALL {
        tank.arsenal.set_level(kind, MAX_WEAPON_LEVEL);
    }
    let mut score = crate::session::ScoreState::default();
    power_ups::apply_effect(
        PowerUpKind::WeaponUpgrade,
        &mut world,
        &mut tank,
        &mut score,
        &mut Vec::new(),
        &mut Outbox::default(),
    );
    assert_eq!(score.score, SURPLUS_UPGRADE_SCORE);
}

#[test]
fn test_nuke_clears_enemies_projectiles_and_scenery() {
    let mut world = World::new();
    world_setup::setup_session(&mut world);
    for x in [100.0, 300.0, 500.0] {
        spawn(&mut world, EnemyKind::HeavyTank, x, 200.0);
    }
    let enemy_round = world_setup::spawn_projectile(&mut world, shot(50.0, 50.0, 5.0, Owner::Enemy, "bullet"));
    let player_round = world_setup::spawn_projectile(&mut world, shot(60.0, 50.0, 5.0, Owner::Player, "bullet"));

    let mut tank = Tank::new(100.0);
    let mut score = crate::session::ScoreState::default();
    let mut kills: Vec<Kill> = Vec::new();
    let mut outbox = Outbox::default();
    power_ups::apply_effect(PowerUpKind::Nuke, &mut world, &mut tank, &mut score, &mut kills, &mut outbox);

    let enemy_kills = kills.iter().filter(|k| k.enemy.is_some()).count();
    let scenery_kills = kills.iter().filter(|k| k.enemy.is_none()).count();
    assert_eq!(enemy_kills, 3);
    assert_eq!(scenery_kills, 2, "only nuke-vulnerable scenery is destroyed");
    assert!(world.get::<&Lifecycle>(enemy_round).unwrap().destroyed);
    assert!(!world.get::<&Lifecycle>(player_round).unwrap().destroyed);
    assert!(outbox.audio.contains(&AudioEvent::Nuke));
}

#[test]
fn test_screen_laser_damages_every_enemy() {
    let mut world = World::new();
    let weak = spawn(&mut world, EnemyKind::Scout, 100.0, 200.0);
    let tough = spawn(&mut world, EnemyKind::HeavyTank, 500.0, 200.0);
    let mut kills = Vec::new();
    power_ups::apply_effect(
        PowerUpKind::ScreenLaser,
        &mut world,
        &mut Tank::new(100.0),
        &mut crate::session::ScoreState::default(),
        &mut kills,
        &mut Outbox::default(),
    );
    assert!(world.get::<&Lifecycle>(weak).unwrap().destroyed);
    let enemy = world.get::<&Enemy>(tough).unwrap();
    assert_eq!(enemy.max_health - enemy.health, SCREEN_LASER_DAMAGE);
    assert_eq!(kills.len(), 1);
}

// ---- Debug commands ----

#[test]
fn test_debug_spawn_rejects_unknown_craft() {
    let mut engine = engine();
    let result = engine.handle_debug(DebugCommand::SpawnEnemy {
        craft: "zeppelin".into(),
        x: 100.0,
        y: 100.0,
    });
    assert!(matches!(result, Err(CommandError::UnknownCraft(_))));
    assert_eq!(enemy_count(engine.world()), 0);

    engine
        .handle_debug(DebugCommand::SpawnEnemy {
            craft: "gunship".into(),
            x: 100.0,
            y: 100.0,
        })
        .unwrap();
    assert_eq!(enemy_count(engine.world()), 1);
}

#[test]
fn test_debug_set_weapon_validates_level() {
    let mut engine = engine();
    assert!(matches!(
        engine.handle_debug(DebugCommand::SetWeapon {
            weapon: WeaponKind::Railgun,
            level: 7,
        }),
        Err(CommandError::InvalidLevel(7))
    ));
    engine
        .handle_debug(DebugCommand::SetWeapon {
            weapon: WeaponKind::Railgun,
            level: 3,
        })
        .unwrap();
    assert_eq!(engine.tank().arsenal.level(WeaponKind::Railgun), 3);
    assert_eq!(engine.tank().arsenal.slot(WeaponKind::Railgun).ammo, Some(20));
}

#[test]
fn test_debug_reset_power_ups() {
    let mut engine = engine();
    engine
        .handle_debug(DebugCommand::ActivateEffect {
            power_up: PowerUpKind::Shield,
            duration_ms: 5000.0,
        })
        .unwrap();
    let at = engine.tank().position;
    engine.spawn_power_up(PowerUpKind::Nuke, Position::new(at.x + 400.0, 200.0));
    assert!(engine.tank().is_shielded());

    engine.queue_command(PlayerCommand::Debug {
        command: DebugCommand::ResetPowerUps,
    });
    let input = idle_input(&engine);
    let snap = engine.tick(&input);
    assert!(!engine.tank().is_shielded());
    assert!(snap.power_ups.is_empty());
}

#[test]
fn test_debug_rejected_while_idle() {
    let mut engine = SimulationEngine::new(SimConfig::default(), DataContext::empty());
    assert!(matches!(
        engine.handle_debug(DebugCommand::AdvanceWave),
        Err(CommandError::NoSession)
    ));
}

// ---- Snapshot ----

#[test]
fn test_snapshot_views_sorted_and_tagged() {
    let mut engine = engine();
    engine.spawn_enemy(EnemyKind::Deflector, Position::new(300.0, 200.0));
    engine.spawn_enemy(EnemyKind::Scout, Position::new(900.0, 200.0));
    engine.spawn_projectile(
        ProjectileSpawn::new(Position::new(600.0, 100.0), 0.0, 0.0, 5.0, Owner::Player, "rail").with_glow(true),
    );

    let input = idle_input(&engine);
    let snap = engine.tick(&input);
    assert_eq!(snap.enemies.len(), 2);
    assert!(snap.enemies.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(snap.enemies[0].visual_state, VisualState::Recharging);
    assert_eq!(snap.projectiles[0].visual_state, VisualState::Glowing);
    assert_eq!(snap.scenery.len(), 4);
}
