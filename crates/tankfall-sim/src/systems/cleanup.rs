//! Cleanup system: removes entities flagged as destroyed.
//!
//! This is the only place entities leave the world. Every other pass sets
//! `Lifecycle::destroyed` and leaves the entity in place until here.

use hecs::{Entity, World};

use tankfall_core::components::Lifecycle;

/// Despawn every destroyed entity. Returns how many were removed.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();

    for (entity, life) in world.query_mut::<&Lifecycle>() {
        if life.destroyed {
            despawn_buffer.push(entity);
        }
    }

    let count = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    count
}
