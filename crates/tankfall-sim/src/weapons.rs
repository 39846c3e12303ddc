//! Player weapon profiles and the per-weapon arsenal.
//!
//! Each weapon keeps its own level, cooldown and ammo. Firing one weapon never
//! touches another weapon's cooldown.

use tankfall_core::components::{Explosive, HomingTarget};
use tankfall_core::constants::*;
use tankfall_core::enums::{Owner, TimedEffect, WeaponKind};
use tankfall_core::state::WeaponView;
use tankfall_core::types::Position;

use crate::ordnance::ProjectileSpawn;
use crate::tank::EffectTimers;

/// Per-level firing profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub damage: f64,
    pub interval_ms: f64,
    pub speed: f64,
    pub tag: &'static str,
    /// `None` = unlimited.
    pub ammo: Option<u32>,
    /// Angle offsets of each barrel; one projectile per entry.
    pub barrels: &'static [f64],
    pub homing: Option<f64>,
    pub explosive: Option<Explosive>,
    pub splash_radius: f64,
    pub piercing: bool,
    pub gravity: Option<f64>,
    pub glow: bool,
}

const SINGLE: &[f64] = &[0.0];
const TWIN: &[f64] = &[-0.05, 0.05];

const BASE: WeaponProfile = WeaponProfile {
    damage: 0.0,
    interval_ms: 0.0,
    speed: 0.0,
    tag: "bullet",
    ammo: None,
    barrels: SINGLE,
    homing: None,
    explosive: None,
    splash_radius: 0.0,
    piercing: false,
    gravity: None,
    glow: false,
};

/// Profile for a weapon at `level` (1..=3). Level 0 has no profile.
pub fn profile(kind: WeaponKind, level: u8) -> Option<WeaponProfile> {
    let level = match level {
        1..=3 => level,
        _ => return None,
    };
    let p = match (kind, level) {
        (WeaponKind::MachineGun, l) => WeaponProfile {
            damage: [5.0, 6.0, 7.0][l as usize - 1],
            interval_ms: [150.0, 120.0, 100.0][l as usize - 1],
            speed: 700.0,
            barrels: if l == 3 { TWIN } else { SINGLE },
            ..BASE
        },
        (WeaponKind::Cannon, l) => WeaponProfile {
            damage: [25.0, 30.0, 35.0][l as usize - 1],
            interval_ms: [900.0, 800.0, 700.0][l as usize - 1],
            speed: 520.0,
            tag: "shell",
            splash_radius: [30.0, 40.0, 50.0][l as usize - 1],
            ..BASE
        },
        (WeaponKind::HomingMissile, l) => WeaponProfile {
            damage: [20.0, 24.0, 28.0][l as usize - 1],
            interval_ms: [1500.0, 1300.0, 1100.0][l as usize - 1],
            speed: 360.0,
            tag: "missile",
            ammo: Some(30),
            homing: Some([0.08, 0.12, 0.16][l as usize - 1]),
            explosive: (l == 3).then_some(Explosive {
                radius: 40.0,
                fragments: 0,
                bursts: 0,
            }),
            ..BASE
        },
        (WeaponKind::Railgun, l) => WeaponProfile {
            damage: [40.0, 50.0, 60.0][l as usize - 1],
            interval_ms: [2000.0, 1800.0, 1500.0][l as usize - 1],
            speed: 1200.0,
            tag: "rail",
            ammo: Some(20),
            piercing: true,
            glow: l == 3,
            ..BASE
        },
        (WeaponKind::ClusterMortar, l) => WeaponProfile {
            damage: [30.0, 34.0, 38.0][l as usize - 1],
            interval_ms: [2200.0, 2000.0, 1800.0][l as usize - 1],
            speed: 460.0,
            tag: "cluster_mortar",
            ammo: Some(15),
            gravity: Some(BOMB_GRAVITY),
            explosive: Some(Explosive {
                radius: [50.0, 60.0, 70.0][l as usize - 1],
                fragments: [4, 6, 8][l as usize - 1],
                bursts: 0,
            }),
            ..BASE
        },
    };
    Some(p)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponSlot {
    /// 0 = not acquired.
    pub level: u8,
    pub cooldown_ms: f64,
    pub ammo: Option<u32>,
}

impl WeaponSlot {
    pub fn is_active(&self) -> bool {
        self.level > 0
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo.map_or(true, |n| n > 0)
    }
}

/// Result of applying one weapon upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Unlocked(WeaponKind),
    Upgraded(WeaponKind, u8),
    /// Everything is maxed; the caller awards surplus score.
    Surplus,
}

/// The tank's weapons, indexed by `WeaponKind::index`.
#[derive(Debug, Clone)]
pub struct Arsenal {
    slots: [WeaponSlot; 5],
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new()
    }
}

impl Arsenal {
    /// Fresh arsenal: machine gun at level 1, everything else locked.
    pub fn new() -> Self {
        let mut arsenal = Self {
            slots: [WeaponSlot::default(); 5],
        };
        arsenal.set_level(WeaponKind::MachineGun, 1);
        arsenal
    }

    pub fn slot(&self, kind: WeaponKind) -> &WeaponSlot {
        &self.slots[kind.index()]
    }

    pub fn level(&self, kind: WeaponKind) -> u8 {
        self.slot(kind).level
    }

    pub fn is_active(&self, kind: WeaponKind) -> bool {
        self.slot(kind).is_active()
    }

    /// Active weapons in acquisition order.
    pub fn active(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        WeaponKind::ALL
            .into_iter()
            .filter(move |k| self.is_active(*k))
    }

    /// Weapon tier: sum of all levels.
    pub fn tier(&self) -> u32 {
        self.slots.iter().map(|s| s.level as u32).sum()
    }

    pub fn tick(&mut self, dt_ms: f64) {
        for slot in &mut self.slots {
            slot.cooldown_ms = (slot.cooldown_ms - dt_ms).max(0.0);
        }
    }

    pub fn can_fire(&self, kind: WeaponKind) -> bool {
        let slot = self.slot(kind);
        slot.is_active() && slot.cooldown_ms <= 0.0 && slot.has_ammo()
    }

    /// Active with ammo, regardless of cooldown (special volley).
    pub fn can_volley(&self, kind: WeaponKind) -> bool {
        let slot = self.slot(kind);
        slot.is_active() && slot.has_ammo()
    }

    /// Fire one weapon if ready. Returns the projectiles to spawn.
    pub fn fire(
        &mut self,
        kind: WeaponKind,
        origin: Position,
        angle: f64,
        effects: &EffectTimers,
        target: HomingTarget,
    ) -> Vec<ProjectileSpawn> {
        if !self.can_fire(kind) {
            return Vec::new();
        }
        self.discharge(kind, origin, angle, effects, target)
    }

    /// Fire one weapon ignoring its cooldown; the cooldown is then reset as for a normal shot.
    pub fn fire_volley(
        &mut self,
        kind: WeaponKind,
        origin: Position,
        angle: f64,
        effects: &EffectTimers,
        target: HomingTarget,
    ) -> Vec<ProjectileSpawn> {
        if !self.can_volley(kind) {
            return Vec::new();
        }
        self.discharge(kind, origin, angle, effects, target)
    }

    fn discharge(
        &mut self,
        kind: WeaponKind,
        origin: Position,
        angle: f64,
        effects: &EffectTimers,
        target: HomingTarget,
    ) -> Vec<ProjectileSpawn> {
        let slot = &mut self.slots[kind.index()];
        let Some(p) = profile(kind, slot.level) else {
            return Vec::new();
        };

        let rapid = effects.is_active(TimedEffect::RapidFire);
        slot.cooldown_ms = if rapid {
            p.interval_ms * RAPID_FIRE_INTERVAL_FACTOR
        } else {
            p.interval_ms
        };
        if let Some(n) = slot.ammo.as_mut() {
            *n = n.saturating_sub(1);
        }

        let damage_factor = if effects.is_active(TimedEffect::EnhancedGun) {
            ENHANCED_GUN_DAMAGE_FACTOR
        } else {
            1.0
        };
        let fan: &[f64] = if effects.is_active(TimedEffect::SpreadShot) {
            &[-SPREAD_ANGLE, 0.0, SPREAD_ANGLE]
        } else {
            &[0.0]
        };

        let mut out = Vec::with_capacity(p.barrels.len() * fan.len());
        for barrel in p.barrels {
            for spread in fan {
                out.push(build(&p, origin, angle + barrel + spread, damage_factor, target));
            }
        }
        out
    }

    /// Apply one upgrade: unlock the next weapon, else raise the lowest level.
    pub fn apply_upgrade(&mut self) -> UpgradeOutcome {
        if let Some(kind) = WeaponKind::ALL.into_iter().find(|k| !self.is_active(*k)) {
            self.set_level(kind, 1);
            return UpgradeOutcome::Unlocked(kind);
        }
        // min_by_key returns the first minimum, i.e. the earliest in acquisition order.
        let lowest = WeaponKind::ALL
            .into_iter()
            .filter(|k| self.level(*k) < MAX_WEAPON_LEVEL)
            .min_by_key(|k| self.level(*k));
        match lowest {
            Some(kind) => {
                let level = self.level(kind) + 1;
                self.set_level(kind, level);
                UpgradeOutcome::Upgraded(kind, level)
            }
            None => UpgradeOutcome::Surplus,
        }
    }

    /// Set a weapon's level directly (0 deactivates). Ammo is refilled.
    pub fn set_level(&mut self, kind: WeaponKind, level: u8) {
        let level = level.min(MAX_WEAPON_LEVEL);
        let slot = &mut self.slots[kind.index()];
        slot.level = level;
        slot.ammo = profile(kind, level).and_then(|p| p.ammo);
        if level == 0 {
            slot.cooldown_ms = 0.0;
        }
    }

    pub fn views(&self) -> Vec<WeaponView> {
        WeaponKind::ALL
            .into_iter()
            .map(|kind| {
                let slot = self.slot(kind);
                WeaponView {
                    weapon: kind,
                    level: slot.level,
                    cooldown_ms: slot.cooldown_ms,
                    ammo: slot.ammo,
                }
            })
            .collect()
    }
}

fn build(
    p: &WeaponProfile,
    origin: Position,
    angle: f64,
    damage_factor: f64,
    target: HomingTarget,
) -> ProjectileSpawn {
    let mut spawn = ProjectileSpawn::new(origin, angle, p.speed, p.damage, Owner::Player, p.tag)
        .scale_damage(damage_factor)
        .with_piercing(p.piercing)
        .with_splash(p.splash_radius)
        .with_glow(p.glow);
    if let Some(strength) = p.homing {
        spawn = spawn.with_homing(target, strength);
    }
    if let Some(explosive) = p.explosive {
        spawn = spawn.with_explosive(explosive);
    }
    if let Some(gravity) = p.gravity {
        spawn = spawn.with_gravity(gravity);
    }
    spawn
}
