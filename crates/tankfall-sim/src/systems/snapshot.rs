//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use tankfall_core::components::*;
use tankfall_core::enums::*;
use tankfall_core::state::*;
use tankfall_core::types::{Position, SimTime};

use crate::combat::{handle, Outbox};
use crate::session::ScoreState;
use crate::tank::Tank;

/// Build a complete GameStateSnapshot from the current world state.
/// Takes the tick's events out of the outbox.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    tank: &Tank,
    wave: WaveView,
    score: &ScoreState,
    outbox: &mut Outbox,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        tank: tank.view(),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        power_ups: build_power_ups(world),
        support_units: build_support_units(world),
        scenery: build_scenery(world),
        wave,
        score: score.view(),
        audio_events: std::mem::take(&mut outbox.audio),
        visual_events: std::mem::take(&mut outbox.visual),
    }
}

fn enemy_visual_state(enemy: &Enemy) -> VisualState {
    if enemy.evacuating {
        return VisualState::Evacuating;
    }
    if enemy.flash_ms > 0.0 {
        return VisualState::DamageFlash;
    }
    match &enemy.special {
        SpecialBehavior::Deflector(d) => match d.phase {
            DeflectorPhase::Active => VisualState::Shielded,
            DeflectorPhase::Recharging => VisualState::Recharging,
        },
        SpecialBehavior::Satellite(s) => match s.phase {
            SatellitePhase::Charging => VisualState::Charging,
            SatellitePhase::Active => VisualState::Beaming,
            SatellitePhase::Cooldown => VisualState::Recharging,
        },
        SpecialBehavior::None => VisualState::Normal,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .map(|(e, (enemy, pos, _))| EnemyView {
            id: handle(e).0,
            kind: enemy.kind,
            position: *pos,
            angle: if enemy.direction < 0.0 {
                std::f64::consts::PI
            } else {
                0.0
            },
            health: enemy.health,
            max_health: enemy.max_health,
            visual_state: enemy_visual_state(enemy),
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .map(|(e, (projectile, pos, _))| ProjectileView {
            id: handle(e).0,
            owner: projectile.owner,
            tag: projectile.tag.clone(),
            position: *pos,
            angle: projectile.angle,
            visual_state: if projectile.deflected {
                VisualState::Tinted
            } else if projectile.behavior.glow {
                VisualState::Glowing
            } else {
                VisualState::Normal
            },
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_power_ups(world: &World) -> Vec<PowerUpView> {
    let mut power_ups: Vec<PowerUpView> = world
        .query::<(&PowerUp, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .map(|(e, (power_up, pos, _))| PowerUpView {
            id: handle(e).0,
            kind: power_up.kind,
            position: *pos,
            visual_state: match power_up.phase {
                PowerUpPhase::Falling => VisualState::Falling,
                PowerUpPhase::Landed { .. } => VisualState::Landed,
            },
        })
        .collect();

    power_ups.sort_by_key(|p| p.id);
    power_ups
}

fn build_support_units(world: &World) -> Vec<SupportUnitView> {
    let mut units: Vec<SupportUnitView> = world
        .query::<(&SupportUnit, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .map(|(e, (unit, pos, _))| SupportUnitView {
            id: handle(e).0,
            position: *pos,
            angle: if unit.direction < 0.0 {
                std::f64::consts::PI
            } else {
                0.0
            },
            carrying: matches!(
                unit.phase,
                SupportPhase::Inbound | SupportPhase::Hovering { .. }
            ),
        })
        .collect();

    units.sort_by_key(|u| u.id);
    units
}

fn build_scenery(world: &World) -> Vec<SceneryView> {
    let mut scenery: Vec<SceneryView> = world
        .query::<(&Scenery, &Position, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, life))| !life.destroyed)
        .map(|(e, (piece, pos, _))| SceneryView {
            id: handle(e).0,
            position: *pos,
            health: piece.health,
            max_health: piece.max_health,
        })
        .collect();

    scenery.sort_by_key(|s| s.id);
    scenery
}
