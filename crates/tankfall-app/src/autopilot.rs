//! Built-in input source for headless runs: chase power-ups, aim at the nearest threat.

use tankfall_core::commands::TickInput;
use tankfall_core::constants::AIM_POINT_DISTANCE;
use tankfall_core::state::GameStateSnapshot;
use tankfall_core::types::Position;

/// Enemy count at which the autopilot spends its special volley.
const VOLLEY_CROWD: usize = 6;

/// Derive the next tick's input from the last snapshot.
pub fn next_input(snapshot: &GameStateSnapshot) -> TickInput {
    let tank = snapshot.tank.position;
    let nearest = |positions: &mut dyn Iterator<Item = Position>| {
        positions.min_by(|a, b| a.distance_to(&tank).total_cmp(&b.distance_to(&tank)))
    };

    let threat = nearest(&mut snapshot.enemies.iter().map(|e| e.position));
    let pickup = nearest(&mut snapshot.power_ups.iter().map(|p| p.position));

    // Drive under a pickup but keep the barrel on the nearest threat when there is one.
    let pointer = match (pickup, threat) {
        (Some(p), Some(t)) => Position::new(p.x, t.y.min(p.y)),
        (Some(p), None) => p,
        (None, Some(t)) => t,
        (None, None) => Position::new(tank.x, tank.y - AIM_POINT_DISTANCE),
    };

    TickInput {
        pointer,
        fire: threat.is_some(),
        special: snapshot.enemies.len() >= VOLLEY_CROWD,
    }
}
