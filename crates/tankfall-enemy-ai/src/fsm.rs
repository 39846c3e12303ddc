//! Special-behavior state machines.
//!
//! Pure functions over the `SpecialBehavior` variant carried by an enemy.
//! No ECS dependency; the simulation applies the returned transitions.

use tankfall_core::components::{DeflectorState, SatelliteState, SpecialBehavior};
use tankfall_core::constants::*;
use tankfall_core::enums::{DeflectorPhase, SatellitePhase};

/// A phase change the caller may need to announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialTransition {
    DeflectorActivated,
    DeflectorRecharging,
    SatelliteCharging,
    SatelliteActive,
    SatelliteCooldown,
}

/// Advance the special behavior by `dt_ms`. Overshoot carries into the next phase.
pub fn advance(special: &mut SpecialBehavior, dt_ms: f64) -> Option<SpecialTransition> {
    match special {
        SpecialBehavior::None => None,
        SpecialBehavior::Deflector(state) => advance_deflector(state, dt_ms),
        SpecialBehavior::Satellite(state) => advance_satellite(state, dt_ms),
    }
}

fn advance_deflector(state: &mut DeflectorState, dt_ms: f64) -> Option<SpecialTransition> {
    state.phase_elapsed_ms += dt_ms;
    let duration = match state.phase {
        DeflectorPhase::Active => DEFLECTOR_ACTIVE_MS,
        DeflectorPhase::Recharging => DEFLECTOR_RECHARGE_MS,
    };
    if state.phase_elapsed_ms < duration {
        return None;
    }
    state.phase_elapsed_ms -= duration;
    match state.phase {
        DeflectorPhase::Active => {
            state.phase = DeflectorPhase::Recharging;
            Some(SpecialTransition::DeflectorRecharging)
        }
        DeflectorPhase::Recharging => {
            state.phase = DeflectorPhase::Active;
            Some(SpecialTransition::DeflectorActivated)
        }
    }
}

fn advance_satellite(state: &mut SatelliteState, dt_ms: f64) -> Option<SpecialTransition> {
    state.phase_elapsed_ms += dt_ms;
    let duration = match state.phase {
        SatellitePhase::Charging => SATELLITE_CHARGE_MS,
        SatellitePhase::Active => SATELLITE_ACTIVE_MS,
        SatellitePhase::Cooldown => SATELLITE_COOLDOWN_MS,
    };
    if state.phase_elapsed_ms < duration {
        return None;
    }
    state.phase_elapsed_ms -= duration;
    let (next, transition) = match state.phase {
        SatellitePhase::Charging => (SatellitePhase::Active, SpecialTransition::SatelliteActive),
        SatellitePhase::Active => (
            SatellitePhase::Cooldown,
            SpecialTransition::SatelliteCooldown,
        ),
        SatellitePhase::Cooldown => (
            SatellitePhase::Charging,
            SpecialTransition::SatelliteCharging,
        ),
    };
    state.phase = next;
    Some(transition)
}

/// Whether a satellite beam at `satellite_x` covers a tank at `tank_x`.
pub fn beam_covers(satellite_x: f64, tank_x: f64) -> bool {
    (tank_x - satellite_x).abs() <= SATELLITE_BEAM_HALF_WIDTH
}

/// Beam damage dealt over `dt_ms`.
pub fn beam_damage(dt_ms: f64) -> f64 {
    SATELLITE_BEAM_DPS * dt_ms / 1000.0
}
