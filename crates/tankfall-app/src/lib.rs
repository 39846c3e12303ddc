//! TANKFALL runner.
//!
//! Wires the simulation crates to a fixed-rate game loop thread and a
//! headless autopilot used by the command-line binary.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use tankfall_core as core;
