//! Per-craft behavioral profiles and the enemy weapon table.
//!
//! Base stats here are fallbacks; the data provider overrides them when a
//! craft entry is available.

use tankfall_core::components::{DeflectorState, SatelliteState, SpecialBehavior};
use tankfall_core::data::CraftStats;
use tankfall_core::enums::{EnemyKind, FireGeometry, MovementPattern};

/// Behavioral profile for a craft archetype.
#[derive(Debug, Clone, Copy)]
pub struct CraftProfile {
    /// Default stats used when the data provider has no entry.
    pub stats: CraftStats,
    pub pattern: MovementPattern,
    pub half_width: f64,
    pub half_height: f64,
    /// Steers toward the tank's altitude while cruising.
    pub vertical_correction: bool,
    /// Eligible for the endless-mode heavy mix.
    pub heavy: bool,
}

impl CraftProfile {
    pub fn is_ground(&self) -> bool {
        self.pattern == MovementPattern::Ground
    }
}

const fn stats(armor: f64, points: u32, speed: f64, fire_interval_ms: f64) -> CraftStats {
    CraftStats {
        armor,
        points,
        speed,
        fire_interval_ms,
        frame_count: 1,
    }
}

const fn air(stats: CraftStats, half_width: f64, half_height: f64) -> CraftProfile {
    CraftProfile {
        stats,
        pattern: MovementPattern::Straight,
        half_width,
        half_height,
        vertical_correction: false,
        heavy: false,
    }
}

const fn ground(stats: CraftStats, half_width: f64, half_height: f64) -> CraftProfile {
    CraftProfile {
        stats,
        pattern: MovementPattern::Ground,
        half_width,
        half_height,
        vertical_correction: false,
        heavy: false,
    }
}

const fn bomber(stats: CraftStats, half_width: f64, half_height: f64) -> CraftProfile {
    CraftProfile {
        stats,
        pattern: MovementPattern::BomberApproach,
        half_width,
        half_height,
        vertical_correction: false,
        heavy: false,
    }
}

const fn steering(mut p: CraftProfile) -> CraftProfile {
    p.vertical_correction = true;
    p
}

const fn heavy(mut p: CraftProfile) -> CraftProfile {
    p.heavy = true;
    p
}

/// Get the behavioral profile for a given craft.
pub fn get_profile(kind: EnemyKind) -> CraftProfile {
    match kind {
        EnemyKind::Scout => air(stats(10.0, 50, 160.0, 1800.0), 24.0, 10.0),
        EnemyKind::Fighter => steering(air(stats(20.0, 100, 180.0, 1500.0), 28.0, 12.0)),
        EnemyKind::Interceptor => steering(air(stats(25.0, 120, 240.0, 1400.0), 28.0, 12.0)),
        EnemyKind::AceFighter => steering(air(stats(40.0, 250, 220.0, 1200.0), 30.0, 12.0)),
        EnemyKind::Gunship => heavy(air(stats(80.0, 300, 90.0, 1600.0), 44.0, 20.0)),
        EnemyKind::Kamikaze => steering(air(stats(15.0, 80, 260.0, 0.0), 16.0, 10.0)),
        EnemyKind::Bomber => bomber(stats(60.0, 150, 110.0, 1800.0), 40.0, 16.0),
        EnemyKind::HeavyBomber => heavy(bomber(stats(120.0, 300, 80.0, 2000.0), 48.0, 20.0)),
        EnemyKind::StealthBomber => bomber(stats(70.0, 350, 140.0, 2200.0), 40.0, 14.0),
        EnemyKind::Dropship => heavy(air(stats(90.0, 200, 100.0, 0.0), 44.0, 22.0)),
        EnemyKind::Deflector => air(stats(60.0, 250, 120.0, 2000.0), 30.0, 16.0),
        EnemyKind::Satellite => air(stats(100.0, 400, 60.0, 0.0), 24.0, 24.0),
        EnemyKind::MissileBoat => heavy(air(stats(110.0, 350, 70.0, 2500.0), 48.0, 20.0)),
        EnemyKind::Jeep => ground(stats(30.0, 50, 140.0, 1200.0), 24.0, 12.0),
        EnemyKind::LightTank => ground(stats(60.0, 100, 90.0, 1800.0), 30.0, 14.0),
        EnemyKind::Apc => ground(stats(80.0, 120, 80.0, 1600.0), 32.0, 16.0),
        EnemyKind::HeavyTank => heavy(ground(stats(150.0, 250, 60.0, 2200.0), 38.0, 18.0)),
        EnemyKind::Artillery => ground(stats(90.0, 200, 50.0, 3000.0), 32.0, 16.0),
        EnemyKind::RocketTruck => ground(stats(70.0, 180, 80.0, 2600.0), 32.0, 16.0),
        EnemyKind::FlakTank => ground(stats(100.0, 220, 70.0, 2000.0), 32.0, 16.0),
        EnemyKind::Walker => heavy(ground(stats(180.0, 400, 50.0, 2000.0), 30.0, 28.0)),
    }
}

/// Initial special-behavior state for a craft.
pub fn initial_special(kind: EnemyKind) -> SpecialBehavior {
    match kind {
        EnemyKind::Deflector => SpecialBehavior::Deflector(DeflectorState::default()),
        EnemyKind::Satellite => SpecialBehavior::Satellite(SatelliteState::default()),
        _ => SpecialBehavior::None,
    }
}

/// Crafts eligible for the endless-mode mix, in declaration order.
pub fn heavy_kinds() -> Vec<EnemyKind> {
    EnemyKind::ALL
        .iter()
        .copied()
        .filter(|k| get_profile(*k).heavy)
        .collect()
}

/// Projectile weapon carried by a craft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyWeapon {
    /// Behavior tag handed to the projectile constructor.
    pub tag: &'static str,
    pub damage: f64,
    pub speed: f64,
    pub geometry: FireGeometry,
    /// Shots per firing decision.
    pub volley: u32,
    /// Delay between shots of one volley.
    pub volley_spacing_ms: f64,
}

const fn weapon(
    tag: &'static str,
    damage: f64,
    speed: f64,
    geometry: FireGeometry,
    volley: u32,
    volley_spacing_ms: f64,
) -> EnemyWeapon {
    EnemyWeapon {
        tag,
        damage,
        speed,
        geometry,
        volley,
        volley_spacing_ms,
    }
}

/// Look up the weapon for a craft name. Unknown names and crafts without a
/// projectile weapon return `None`.
pub fn enemy_weapon(craft: &str) -> Option<EnemyWeapon> {
    use FireGeometry::*;

    let w = match craft {
        "scout" => weapon("bullet", 5.0, 320.0, Aimed, 1, 0.0),
        "fighter" => weapon("bullet", 6.0, 360.0, Aimed, 2, 120.0),
        "interceptor" => weapon("missile", 10.0, 260.0, Aimed, 1, 0.0),
        "ace_fighter" => weapon("bullet", 8.0, 400.0, Aimed, 3, 100.0),
        "gunship" => weapon("flak", 12.0, 280.0, Aimed, 1, 0.0),
        "bomber" => weapon("bomb", 20.0, 120.0, BomberDrop, 3, 250.0),
        "heavy_bomber" => weapon("bomb", 30.0, 100.0, BomberDrop, 4, 200.0),
        "stealth_bomber" => weapon("bomb", 25.0, 120.0, BomberDrop, 2, 300.0),
        "deflector" => weapon("bullet", 8.0, 320.0, Aimed, 1, 0.0),
        "missile_boat" => weapon("missile", 15.0, 240.0, Aimed, 2, 300.0),
        "jeep" => weapon("bullet", 5.0, 340.0, GroundLineOfSight, 2, 120.0),
        "light_tank" => weapon("shell", 15.0, 300.0, GroundLineOfSight, 1, 0.0),
        "apc" => weapon("bullet", 6.0, 340.0, GroundLineOfSight, 3, 120.0),
        "heavy_tank" => weapon("shell", 25.0, 320.0, GroundLineOfSight, 1, 0.0),
        "artillery" => weapon("mortar", 25.0, 380.0, Aimed, 1, 0.0),
        "rocket_truck" => weapon("missile", 15.0, 260.0, Aimed, 2, 250.0),
        "flak_tank" => weapon("flak", 12.0, 300.0, Aimed, 1, 0.0),
        "walker" => weapon("shell", 20.0, 300.0, GroundLineOfSight, 2, 200.0),
        _ => return None,
    };
    Some(w)
}
