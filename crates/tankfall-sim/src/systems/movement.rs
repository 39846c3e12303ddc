//! Kinematic integration system.
//!
//! Updates Position from Velocity each tick: position += velocity * dt.
//! Projectiles integrate themselves in the projectile system.

use hecs::World;

use tankfall_core::components::{Lifecycle, Projectile};
use tankfall_core::types::{Position, Velocity};

/// Run kinematic integration for every live non-projectile entity with Position + Velocity.
pub fn run(world: &mut World, dt_ms: f64) {
    for (_entity, (pos, vel, life)) in world
        .query_mut::<(&mut Position, &Velocity, &Lifecycle)>()
        .without::<&Projectile>()
    {
        if !life.destroyed {
            pos.advance(vel, dt_ms);
        }
    }
}
