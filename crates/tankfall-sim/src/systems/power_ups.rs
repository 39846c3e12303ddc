//! Power-up economy: what to drop, when to drop it, and what collecting it does.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tankfall_core::components::{Enemy, Lifecycle, PowerUp, Projectile, Scenery};
use tankfall_core::constants::*;
use tankfall_core::enums::{Owner, PowerUpKind, PowerUpPhase};
use tankfall_core::events::AudioEvent;
use tankfall_core::types::{Position, Velocity};

use crate::combat::{damage_enemy, damage_scenery, Kill, Outbox};
use crate::session::ScoreState;
use crate::tank::Tank;
use crate::weapons::UpgradeOutcome;

/// Late-game rotation order.
const ROTATION: [PowerUpKind; 4] = [
    PowerUpKind::RapidFire,
    PowerUpKind::SpeedBoost,
    PowerUpKind::EnhancedGun,
    PowerUpKind::ScreenLaser,
];

/// Inputs to power-up selection, sampled when a drop is decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionContext {
    pub health_fraction: f64,
    /// Sum of all weapon levels.
    pub weapon_tier: u32,
    pub enemy_count: usize,
    pub elapsed_ms: f64,
}

/// Pick the next power-up. Each tier skips anything in `recent` and falls through.
pub fn select_power_up(
    ctx: &SelectionContext,
    recent: &VecDeque<PowerUpKind>,
    rotation: &mut usize,
    rng: &mut ChaCha8Rng,
) -> PowerUpKind {
    let fresh = |kind: PowerUpKind| !recent.contains(&kind);

    if ctx.health_fraction < CRITICAL_HEALTH_FRACTION && fresh(PowerUpKind::Shield) {
        return PowerUpKind::Shield;
    }

    if ctx.weapon_tier < LOW_WEAPON_TIER && ctx.elapsed_ms >= WEAPON_UPGRADE_MIN_ELAPSED_MS {
        if let Some(kind) = [PowerUpKind::WeaponUpgrade, PowerUpKind::SpreadShot]
            .into_iter()
            .find(|k| fresh(*k))
        {
            return kind;
        }
    }

    if ctx.enemy_count >= HIGH_ENEMY_COUNT {
        if let Some(kind) = [PowerUpKind::Nuke, PowerUpKind::ScreenLaser]
            .into_iter()
            .find(|k| fresh(*k))
        {
            return kind;
        }
    }

    if ctx.elapsed_ms >= LONG_SURVIVAL_MS {
        for _ in 0..ROTATION.len() {
            let kind = ROTATION[*rotation % ROTATION.len()];
            *rotation = (*rotation + 1) % ROTATION.len();
            if fresh(kind) {
                return kind;
            }
        }
    }

    let candidates: Vec<PowerUpKind> = PowerUpKind::ALL.into_iter().filter(|k| fresh(*k)).collect();
    let pool: &[PowerUpKind] = if candidates.is_empty() {
        &PowerUpKind::ALL
    } else {
        &candidates
    };
    pool.choose(rng).copied().unwrap_or(PowerUpKind::Health)
}

/// Probability that a delivery check dispatches a support unit.
pub fn delivery_chance(ctx: &SelectionContext) -> f64 {
    let mut chance = DELIVERY_BASE_CHANCE;
    if ctx.health_fraction < 0.5 {
        chance += DELIVERY_HEALTH_BONUS;
    }
    if ctx.weapon_tier < LOW_WEAPON_TIER {
        chance += DELIVERY_WEAPON_BONUS;
    }
    chance += (ctx.elapsed_ms / 1000.0 / 600.0).min(DELIVERY_TIME_BONUS_MAX);
    chance += (ctx.enemy_count as f64 * DELIVERY_ENEMY_BONUS_PER).min(DELIVERY_ENEMY_BONUS_MAX);
    chance.min(DELIVERY_MAX_CHANCE)
}

/// Delivery timers and history.
#[derive(Debug, Clone)]
pub struct Delivery {
    last_dispatch_ms: f64,
    next_check_ms: f64,
    recent: VecDeque<PowerUpKind>,
    rotation: usize,
    kills_since_dispatch: u32,
    enabled: bool,
}

impl Delivery {
    pub fn new(enabled: bool) -> Self {
        Self {
            last_dispatch_ms: 0.0,
            next_check_ms: DELIVERY_CHECK_INTERVAL_MS,
            recent: VecDeque::with_capacity(RECENT_DELIVERY_WINDOW + 1),
            rotation: 0,
            kills_since_dispatch: 0,
            enabled,
        }
    }

    /// Restart the timers at `now_ms`. History is cleared.
    pub fn reset(&mut self, now_ms: f64) {
        self.last_dispatch_ms = now_ms;
        self.next_check_ms = now_ms + DELIVERY_CHECK_INTERVAL_MS;
        self.recent.clear();
        self.rotation = 0;
        self.kills_since_dispatch = 0;
    }

    /// Kill notification from the engine's bookkeeping.
    pub fn on_enemy_destroyed(&mut self) {
        self.kills_since_dispatch += 1;
    }

    pub fn kills_since_dispatch(&self) -> u32 {
        self.kills_since_dispatch
    }

    pub fn recent(&self) -> &VecDeque<PowerUpKind> {
        &self.recent
    }

    pub fn record(&mut self, kind: PowerUpKind) {
        self.recent.push_back(kind);
        while self.recent.len() > RECENT_DELIVERY_WINDOW {
            self.recent.pop_front();
        }
    }

    /// Coarse periodic check. Returns the payload to dispatch, if any.
    pub fn evaluate(
        &mut self,
        now_ms: f64,
        ctx: &SelectionContext,
        rng: &mut ChaCha8Rng,
    ) -> Option<PowerUpKind> {
        if !self.enabled || now_ms < self.next_check_ms {
            return None;
        }
        self.next_check_ms = now_ms + DELIVERY_CHECK_INTERVAL_MS;
        if now_ms - self.last_dispatch_ms < DELIVERY_MIN_INTERVAL_MS {
            return None;
        }

        let chance = delivery_chance(ctx);
        if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
            log::debug!("Delivery check missed (chance {chance:.2})");
            return None;
        }

        let kind = select_power_up(ctx, &self.recent, &mut self.rotation, rng);
        self.record(kind);
        self.last_dispatch_ms = now_ms;
        log::debug!(
            "Dispatching {kind:?} (chance {chance:.2}, {} kills since last drop)",
            self.kills_since_dispatch
        );
        self.kills_since_dispatch = 0;
        Some(kind)
    }
}

/// Land falling power-ups and expire ones that sat on the ground too long.
pub fn run(world: &mut World, now_ms: f64) {
    for (_entity, (power_up, pos, vel, life)) in
        world.query_mut::<(&mut PowerUp, &mut Position, &mut Velocity, &mut Lifecycle)>()
    {
        if life.destroyed {
            continue;
        }
        match power_up.phase {
            PowerUpPhase::Falling => {
                if pos.y + POWER_UP_HALF_SIZE >= GROUND_Y {
                    pos.y = GROUND_Y - POWER_UP_HALF_SIZE;
                    *vel = Velocity::default();
                    power_up.phase = PowerUpPhase::Landed { since_ms: now_ms };
                }
            }
            PowerUpPhase::Landed { since_ms } => {
                if now_ms - since_ms >= POWER_UP_GROUND_EXPIRY_MS {
                    life.destroyed = true;
                }
            }
        }
    }
}

/// Apply a collected power-up.
pub fn apply_effect(
    kind: PowerUpKind,
    world: &mut World,
    tank: &mut Tank,
    score: &mut ScoreState,
    kills: &mut Vec<Kill>,
    outbox: &mut Outbox,
) {
    outbox.audio.push(AudioEvent::PowerUp { kind });

    if let Some(effect) = kind.timed_effect() {
        tank.effects.activate(effect, effect.default_duration_ms());
        return;
    }

    match kind {
        PowerUpKind::Health => tank.heal(HEAL_FRACTION),
        PowerUpKind::WeaponUpgrade => match tank.arsenal.apply_upgrade() {
            UpgradeOutcome::Surplus => {
                log::debug!("All weapons maxed; awarding {SURPLUS_UPGRADE_SCORE}");
                score.add_points(SURPLUS_UPGRADE_SCORE);
            }
            outcome => log::debug!("Weapon upgrade: {outcome:?}"),
        },
        PowerUpKind::Nuke => nuke(world, kills, outbox),
        PowerUpKind::ScreenLaser => {
            outbox.audio.push(AudioEvent::LaserFire);
            for enemy in live_enemies(world) {
                damage_enemy(world, enemy, SCREEN_LASER_DAMAGE, kills);
            }
        }
        _ => {}
    }
}

fn nuke(world: &mut World, kills: &mut Vec<Kill>, outbox: &mut Outbox) {
    outbox.audio.push(AudioEvent::Nuke);

    for enemy in live_enemies(world) {
        damage_enemy(world, enemy, f64::INFINITY, kills);
    }

    for (_entity, (projectile, life)) in world.query_mut::<(&Projectile, &mut Lifecycle)>() {
        if projectile.owner == Owner::Enemy {
            life.destroyed = true;
        }
    }

    let targets: Vec<Entity> = world
        .query::<(&Scenery, &Lifecycle)>()
        .iter()
        .filter(|(_, (s, l))| s.nuke_vulnerable && !l.destroyed)
        .map(|(e, _)| e)
        .collect();
    for target in targets {
        damage_scenery(world, target, f64::INFINITY, kills);
    }
}

fn live_enemies(world: &World) -> Vec<Entity> {
    world
        .query::<(&Enemy, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, l))| !l.destroyed)
        .map(|(e, _)| e)
        .collect()
}
