//! The player tank: a singleton owned by the engine, outside the ECS.

use tankfall_core::components::Hitbox;
use tankfall_core::constants::*;
use tankfall_core::enums::{TimedEffect, VisualState};
use tankfall_core::events::AudioEvent;
use tankfall_core::state::{EffectView, TankView};
use tankfall_core::types::{wrap_angle, Bounds, Position, Velocity};

use crate::weapons::Arsenal;

/// Remaining time of each temporary effect. Zero = inactive.
#[derive(Debug, Clone, Default)]
pub struct EffectTimers {
    remaining_ms: [f64; 5],
}

fn effect_index(effect: TimedEffect) -> usize {
    match effect {
        TimedEffect::Shield => 0,
        TimedEffect::SpeedBoost => 1,
        TimedEffect::RapidFire => 2,
        TimedEffect::SpreadShot => 3,
        TimedEffect::EnhancedGun => 4,
    }
}

impl EffectTimers {
    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.remaining(effect) > 0.0
    }

    pub fn remaining(&self, effect: TimedEffect) -> f64 {
        self.remaining_ms[effect_index(effect)]
    }

    /// Start or restart an effect at full duration. Repeat activations do not stack.
    pub fn activate(&mut self, effect: TimedEffect, duration_ms: f64) {
        self.remaining_ms[effect_index(effect)] = duration_ms.max(0.0);
    }

    pub fn tick(&mut self, dt_ms: f64) {
        for r in &mut self.remaining_ms {
            *r = (*r - dt_ms).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.remaining_ms = [0.0; 5];
    }

    pub fn views(&self) -> Vec<EffectView> {
        TimedEffect::ALL
            .into_iter()
            .filter(|e| self.is_active(*e))
            .map(|effect| EffectView {
                effect,
                remaining_ms: self.remaining(effect),
            })
            .collect()
    }
}

/// Result of a damage attempt against the tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield or invincibility absorbed it.
    Blocked,
    Applied,
    /// This hit reduced health to zero.
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Tank {
    pub position: Position,
    /// Horizontal velocity (px/s).
    pub velocity_x: f64,
    pub health: f64,
    pub max_health: f64,
    pub aim_angle: f64,
    pub aim_point: Position,
    pub arsenal: Arsenal,
    pub effects: EffectTimers,
    pub low_health_cued: bool,
    pub invincible: bool,
    pub special_cooldown_ms: f64,
    pub flash_ms: f64,
    pub destroyed: bool,
    hitbox: Hitbox,
}

impl Tank {
    pub fn new(max_health: f64) -> Self {
        let position = Position::new(PLAYFIELD_WIDTH * 0.5, TANK_Y);
        let mut tank = Self {
            position,
            velocity_x: 0.0,
            health: max_health,
            max_health,
            aim_angle: -std::f64::consts::FRAC_PI_2,
            aim_point: position,
            arsenal: Arsenal::new(),
            effects: EffectTimers::default(),
            low_health_cued: false,
            invincible: false,
            special_cooldown_ms: 0.0,
            flash_ms: 0.0,
            destroyed: false,
            hitbox: Hitbox::new(TANK_HALF_WIDTH, TANK_HALF_HEIGHT),
        };
        tank.aim_point = tank.project_aim_point();
        tank
    }

    pub fn bounds(&self) -> Bounds {
        self.hitbox.bounds(self.position)
    }

    /// Turret pivot, where projectiles leave.
    pub fn turret(&self) -> Position {
        Position::new(self.position.x, self.position.y - TURRET_HEIGHT)
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn is_shielded(&self) -> bool {
        self.effects.is_active(TimedEffect::Shield)
    }

    pub fn max_speed(&self) -> f64 {
        if self.effects.is_active(TimedEffect::SpeedBoost) {
            TANK_MAX_SPEED * 2.0
        } else {
            TANK_MAX_SPEED
        }
    }

    /// Chase the pointer's x with eased acceleration.
    pub fn update_movement(&mut self, pointer_x: f64, dt_ms: f64) {
        let dt = dt_ms / 1000.0;
        let max = self.max_speed();
        let dx = pointer_x - self.position.x;

        if dx.abs() <= TANK_SETTLE_DISTANCE {
            self.velocity_x *= TANK_DAMPING.powf(dt_ms / FRAME_MS);
        } else {
            let target = (dx * TANK_POINTER_GAIN).clamp(-max, max);
            let diff = target - self.velocity_x;
            let same_direction = self.velocity_x * target > 0.0;
            let ease = if same_direction {
                (1.0 - self.velocity_x.abs() / target.abs()).max(0.0)
            } else {
                1.0
            };
            let step = (TANK_ACCEL * ease * dt).min(diff.abs());
            self.velocity_x += step * diff.signum();
        }

        self.velocity_x = self.velocity_x.clamp(-max, max);
        self.position.x += self.velocity_x * dt;

        if self.position.x <= TANK_MIN_X {
            self.position.x = TANK_MIN_X;
            self.velocity_x = 0.0;
        } else if self.position.x >= TANK_MAX_X {
            self.position.x = TANK_MAX_X;
            self.velocity_x = 0.0;
        }
    }

    /// Ease the turret toward the pointer.
    pub fn update_aim(&mut self, pointer: Position, dt_ms: f64) {
        let turret = self.turret();
        if turret.distance_to(&pointer) > f64::EPSILON {
            let desired = turret.bearing_to(&pointer);
            let error = wrap_angle(desired - self.aim_angle);
            let alpha = 1.0 - (1.0 - AIM_SMOOTHING).powf(dt_ms / FRAME_MS);
            self.aim_angle = wrap_angle(self.aim_angle + error * alpha);
        }
        self.aim_point = self.project_aim_point();
    }

    fn project_aim_point(&self) -> Position {
        let turret = self.turret();
        let offset = Velocity::from_angle(self.aim_angle, AIM_POINT_DISTANCE);
        Position::new(turret.x + offset.x, turret.y + offset.y)
    }

    /// Advance effect, weapon and special cooldowns.
    pub fn tick_timers(&mut self, dt_ms: f64) {
        self.effects.tick(dt_ms);
        self.arsenal.tick(dt_ms);
        self.special_cooldown_ms = (self.special_cooldown_ms - dt_ms).max(0.0);
        self.flash_ms = (self.flash_ms - dt_ms).max(0.0);
    }

    pub fn take_damage(&mut self, amount: f64, audio: &mut Vec<AudioEvent>) -> DamageOutcome {
        if self.destroyed {
            return DamageOutcome::Blocked;
        }
        if self.is_shielded() || self.invincible || amount <= 0.0 {
            return DamageOutcome::Blocked;
        }

        self.health = (self.health - amount).max(0.0);
        self.flash_ms = DAMAGE_FLASH_MS;

        if !self.low_health_cued && self.health_fraction() <= LOW_HEALTH_FRACTION {
            self.low_health_cued = true;
            audio.push(AudioEvent::LowHealth);
        }

        if self.health <= 0.0 {
            self.destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Applied
        }
    }

    /// Restore a fraction of max health.
    pub fn heal(&mut self, fraction: f64) {
        self.health = (self.health + self.max_health * fraction).min(self.max_health);
    }

    /// Bring the tank back after game over. Weapon levels survive.
    pub fn respawn(&mut self) {
        self.health = self.max_health;
        self.destroyed = false;
        self.low_health_cued = false;
        self.effects.clear();
        self.special_cooldown_ms = 0.0;
        self.flash_ms = 0.0;
        self.velocity_x = 0.0;
        self.position = Position::new(PLAYFIELD_WIDTH * 0.5, TANK_Y);
        self.aim_point = self.project_aim_point();
    }

    pub fn view(&self) -> TankView {
        let visual_state = if self.destroyed {
            VisualState::Normal
        } else if self.is_shielded() {
            VisualState::Shielded
        } else if self.flash_ms > 0.0 {
            VisualState::DamageFlash
        } else {
            VisualState::Normal
        };
        TankView {
            position: self.position,
            aim_angle: self.aim_angle,
            health: self.health,
            max_health: self.max_health,
            destroyed: self.destroyed,
            weapons: self.arsenal.views(),
            effects: self.effects.views(),
            visual_state,
        }
    }
}
