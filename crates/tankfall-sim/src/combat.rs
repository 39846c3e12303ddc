//! Damage intake and kill bookkeeping shared by every damage source.

use hecs::{Entity, World};

use tankfall_core::components::{Enemy, EntityHandle, Lifecycle, Scenery};
use tankfall_core::constants::DAMAGE_FLASH_MS;
use tankfall_core::enums::EnemyKind;
use tankfall_core::events::{AudioEvent, VisualEvent};
use tankfall_core::types::Position;

/// Audio and visual events collected during a tick.
#[derive(Debug, Default)]
pub struct Outbox {
    pub audio: Vec<AudioEvent>,
    pub visual: Vec<VisualEvent>,
}

impl Outbox {
    pub fn clear(&mut self) {
        self.audio.clear();
        self.visual.clear();
    }
}

/// A destruction that awards score, processed after the collision pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub position: Position,
    pub points: u32,
    /// `None` for scenery.
    pub enemy: Option<(EnemyKind, u32)>,
}

/// Hecs handle for an entity, as stored in components.
pub fn handle(entity: Entity) -> EntityHandle {
    EntityHandle(entity.to_bits().get())
}

pub fn entity(handle: EntityHandle) -> Option<Entity> {
    Entity::from_bits(handle.0)
}

/// Liveness check required before every cross-entity access.
pub fn is_live(world: &World, entity: Entity) -> bool {
    world.contains(entity)
        && world
            .get::<&Lifecycle>(entity)
            .map(|l| !l.destroyed)
            .unwrap_or(false)
}

/// Subtract health from an enemy. Returns true if this call destroyed it.
pub fn damage_enemy(
    world: &mut World,
    target: Entity,
    amount: f64,
    kills: &mut Vec<Kill>,
) -> bool {
    let Ok((enemy, life, pos)) =
        world.query_one_mut::<(&mut Enemy, &mut Lifecycle, &Position)>(target)
    else {
        return false;
    };
    if life.destroyed || amount <= 0.0 {
        return false;
    }
    enemy.health -= amount;
    enemy.flash_ms = DAMAGE_FLASH_MS;
    if enemy.health > 0.0 {
        return false;
    }
    life.destroyed = true;
    kills.push(Kill {
        position: *pos,
        points: enemy.points,
        enemy: Some((enemy.kind, enemy.wave)),
    });
    true
}

/// Subtract health from a scenery element. Returns true if this call destroyed it.
pub fn damage_scenery(
    world: &mut World,
    target: Entity,
    amount: f64,
    kills: &mut Vec<Kill>,
) -> bool {
    let Ok((scenery, life, pos)) =
        world.query_one_mut::<(&mut Scenery, &mut Lifecycle, &Position)>(target)
    else {
        return false;
    };
    if life.destroyed || amount <= 0.0 {
        return false;
    }
    scenery.health -= amount;
    if scenery.health > 0.0 {
        return false;
    }
    life.destroyed = true;
    kills.push(Kill {
        position: *pos,
        points: scenery.points,
        enemy: None,
    });
    true
}
