//! Combat simulation for TANKFALL.
//!
//! Owns the hecs ECS world and the player tank, runs the systems in a fixed
//! order each tick, and produces GameStateSnapshots for the shell. Driven
//! entirely by the simulated millisecond clock, so a fixed seed and a fixed
//! delta sequence always replay the same session.

pub mod combat;
pub mod engine;
pub mod ordnance;
pub mod schedule;
pub mod session;
pub mod systems;
pub mod tank;
pub mod weapons;
pub mod world_setup;

pub use engine::{CommandError, SimConfig, SimulationEngine};
pub use tankfall_core as core;

#[cfg(test)]
mod tests;
