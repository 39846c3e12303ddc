//! Support unit flights: fly in, hover over the drop point, release, fly out.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankfall_core::components::{Lifecycle, SupportUnit};
use tankfall_core::constants::*;
use tankfall_core::enums::{PowerUpKind, SpawnSide, SupportPhase};
use tankfall_core::events::AudioEvent;
use tankfall_core::types::{Position, Velocity};

use crate::combat::Outbox;
use crate::world_setup;

/// Send a support unit carrying `payload` toward the tank.
pub fn dispatch(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    tank_x: f64,
    payload: PowerUpKind,
    outbox: &mut Outbox,
) {
    let side = if tank_x < PLAYFIELD_WIDTH * 0.5 {
        SpawnSide::Left
    } else {
        SpawnSide::Right
    };
    let drop_x = (tank_x + rng.gen_range(-SUPPORT_DROP_JITTER..=SUPPORT_DROP_JITTER))
        .clamp(TANK_MIN_X, TANK_MAX_X);
    world_setup::spawn_support_unit(world, payload, side, drop_x);
    outbox.audio.push(AudioEvent::SupportInbound);
    log::debug!("Support unit inbound from {side:?} with {payload:?}, drop at x={drop_x:.0}");
}

/// Advance every support unit. Released payloads are returned as `(kind, position)`.
pub fn run(world: &mut World, now_ms: f64) -> Vec<(PowerUpKind, Position)> {
    let mut released = Vec::new();

    for (_entity, (unit, pos, vel, life)) in
        world.query_mut::<(&mut SupportUnit, &mut Position, &mut Velocity, &mut Lifecycle)>()
    {
        if life.destroyed {
            continue;
        }
        match unit.phase {
            SupportPhase::Inbound => {
                if unit.direction * (unit.drop_x - pos.x) <= 0.0 {
                    pos.x = unit.drop_x;
                    *vel = Velocity::default();
                    unit.phase = SupportPhase::Hovering {
                        until_ms: now_ms + SUPPORT_HOVER_MS,
                    };
                }
            }
            SupportPhase::Hovering { until_ms } => {
                if now_ms >= until_ms {
                    released.push((
                        unit.payload,
                        Position::new(pos.x, pos.y + SUPPORT_HALF_HEIGHT + POWER_UP_HALF_SIZE),
                    ));
                    unit.phase = SupportPhase::Outbound;
                    *vel = Velocity::new(unit.direction * SUPPORT_SPEED, 0.0);
                }
            }
            SupportPhase::Outbound | SupportPhase::ForcedExit => {
                if off_field(pos.x) {
                    life.destroyed = true;
                }
            }
        }
    }

    released
}

/// Abort every delivery: units leave at exit speed toward the nearer edge and never release.
pub fn force_exit_all(world: &mut World) {
    for (_entity, (unit, pos, vel, life)) in
        world.query_mut::<(&mut SupportUnit, &Position, &mut Velocity, &Lifecycle)>()
    {
        if life.destroyed || unit.phase == SupportPhase::ForcedExit {
            continue;
        }
        unit.direction = if pos.x < PLAYFIELD_WIDTH * 0.5 { -1.0 } else { 1.0 };
        unit.phase = SupportPhase::ForcedExit;
        *vel = Velocity::new(unit.direction * SUPPORT_EXIT_SPEED, 0.0);
    }
}

/// Remove every support unit at once.
pub fn clear_all(world: &mut World) {
    for (_entity, (_unit, life)) in world.query_mut::<(&SupportUnit, &mut Lifecycle)>() {
        life.destroyed = true;
    }
}

fn off_field(x: f64) -> bool {
    let margin = SUPPORT_HALF_WIDTH + SPAWN_EDGE_OFFSET;
    x < -margin || x > PLAYFIELD_WIDTH + margin
}
