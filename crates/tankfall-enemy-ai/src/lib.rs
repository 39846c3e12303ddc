//! Enemy AI for TANKFALL.
//!
//! Implements movement patterns, the deflector/satellite state machines,
//! the frame-gated firing decision and per-craft profiles.

pub mod error;
pub mod firing;
pub mod fsm;
pub mod movement;
pub mod profiles;

pub use error::EnemyAiError;
pub use tankfall_core as core;
