//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus the engine-owned state they need. Run order is fixed by the engine.

pub mod cleanup;
pub mod collision;
pub mod enemy_ai;
pub mod movement;
pub mod power_ups;
pub mod projectiles;
pub mod snapshot;
pub mod support_unit;
pub mod tank;
pub mod wave_scheduler;
