//! Core types and definitions for the TANKFALL simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, constants and the
//! read-only wave/craft data context.

pub mod commands;
pub mod components;
pub mod constants;
pub mod data;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
