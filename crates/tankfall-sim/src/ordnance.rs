//! Projectile construction, tag inference, detonation and deflection.
//!
//! Projectiles are plain components; every rule about how they are built and
//! how they come apart lives here so the systems stay thin.

use std::f64::consts::TAU;

use tankfall_core::components::*;
use tankfall_core::constants::*;
use tankfall_core::enums::Owner;
use tankfall_core::types::{Position, Velocity};

/// Default explosive bundle carried by flak rounds.
const FLAK_EXPLOSIVE: Explosive = Explosive {
    radius: 30.0,
    fragments: 0,
    bursts: 3,
};

/// Default explosive bundle carried by mortar rounds.
const MORTAR_EXPLOSIVE: Explosive = Explosive {
    radius: 40.0,
    fragments: 0,
    bursts: 0,
};

/// A projectile waiting to be spawned into the world.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub origin: Position,
    pub angle: f64,
    pub speed: f64,
    pub damage: f64,
    pub owner: Owner,
    pub tag: String,
    pub behavior: ProjectileBehavior,
    pub detonate_at: Option<Position>,
    pub lifetime_ms: f64,
}

impl ProjectileSpawn {
    /// Build a projectile, inferring its behavior from the tag.
    pub fn new(
        origin: Position,
        angle: f64,
        speed: f64,
        damage: f64,
        owner: Owner,
        tag: &str,
    ) -> Self {
        let mut behavior = infer_behavior(tag);
        if let Some(homing) = behavior.homing.as_mut() {
            // Until a real target is attached, aim at a point straight ahead.
            homing.target = HomingTarget::Point(Position::from_vec(
                origin.as_vec() + Velocity::from_angle(angle, 1000.0).as_vec(),
            ));
        }
        Self {
            origin,
            angle,
            speed,
            damage,
            owner,
            tag: tag.to_string(),
            behavior,
            detonate_at: None,
            lifetime_ms: PROJECTILE_LIFETIME_MS,
        }
    }

    pub fn with_homing(mut self, target: HomingTarget, strength: f64) -> Self {
        self.behavior.homing = Some(Homing {
            target,
            strength: strength.clamp(0.0, 1.0),
        });
        self
    }

    /// Retarget inferred homing, keeping its strength. No-op for non-homing rounds.
    pub fn with_homing_target(mut self, target: HomingTarget) -> Self {
        if let Some(homing) = self.behavior.homing.as_mut() {
            homing.target = target;
        }
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.behavior.gravity = Some(gravity);
        self
    }

    pub fn with_explosive(mut self, explosive: Explosive) -> Self {
        self.behavior.explosive = Some(explosive);
        self
    }

    pub fn with_piercing(mut self, piercing: bool) -> Self {
        self.behavior.piercing = piercing;
        self
    }

    pub fn with_splash(mut self, radius: f64) -> Self {
        self.behavior.splash_radius = radius.max(0.0);
        self
    }

    pub fn with_glow(mut self, glow: bool) -> Self {
        self.behavior.glow = glow;
        self
    }

    pub fn detonating_at(mut self, point: Position) -> Self {
        self.detonate_at = Some(point);
        self
    }

    pub fn scale_damage(mut self, factor: f64) -> Self {
        self.damage *= factor;
        self
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::from_angle(self.angle, self.speed)
    }

    /// Split into the component bundle spawned by the world factory.
    pub fn into_parts(self) -> (Position, Velocity, Projectile) {
        let velocity = self.velocity();
        let projectile = Projectile {
            owner: self.owner,
            angle: self.angle,
            speed: self.speed,
            damage: self.damage,
            tag: self.tag,
            behavior: self.behavior,
            age_ms: 0.0,
            lifetime_ms: self.lifetime_ms,
            struck: Vec::new(),
            splash_applied: false,
            deflected: false,
            detonate_at: self.detonate_at,
        };
        (self.origin, velocity, projectile)
    }
}

/// Behavior flags implied by a projectile tag.
pub fn infer_behavior(tag: &str) -> ProjectileBehavior {
    let mut behavior = ProjectileBehavior::default();
    if tag.contains("missile") {
        behavior.homing = Some(Homing {
            target: HomingTarget::Point(Position::default()),
            strength: DEFAULT_HOMING_STRENGTH,
        });
    }
    if tag.contains("bomb") {
        behavior.gravity = Some(BOMB_GRAVITY);
    }
    if tag.contains("mortar") {
        behavior.gravity = Some(BOMB_GRAVITY);
        behavior.explosive = Some(MORTAR_EXPLOSIVE);
    }
    if tag.contains("rail") {
        behavior.piercing = true;
    }
    if tag.contains("flak") {
        behavior.explosive = Some(FLAK_EXPLOSIVE);
    }
    if tag.contains("glow") {
        behavior.glow = true;
    }
    behavior
}

/// Homing turn fraction for one tick: `strength` per nominal frame, scaled to `dt_ms`.
pub fn homing_turn_fraction(strength: f64, dt_ms: f64) -> f64 {
    let s = strength.clamp(0.0, 1.0);
    1.0 - (1.0 - s).powf(dt_ms / FRAME_MS)
}

/// Area damage requested by a detonation or a splash round.
#[derive(Debug, Clone)]
pub struct AreaBlast {
    pub position: Position,
    pub radius: f64,
    pub damage: f64,
    pub owner: Owner,
    /// Entities already hit directly by the round.
    pub exclude: Vec<EntityHandle>,
    /// The round hit the tank directly.
    pub exclude_tank: bool,
    /// Fragment and burst children, spawned after the collision pass.
    pub children: Vec<ProjectileSpawn>,
}

/// Detonate an explosive round at `at`. Non-explosive rounds yield `None`.
pub fn detonate(projectile: &Projectile, at: Position) -> Option<AreaBlast> {
    let explosive = projectile.behavior.explosive?;
    let mut children = Vec::new();

    let n = explosive.fragments;
    for i in 0..n {
        let angle = TAU * i as f64 / n as f64;
        children.push(ProjectileSpawn::new(
            at,
            angle,
            projectile.speed * FRAGMENT_SPEED_FACTOR,
            projectile.damage * FRAGMENT_DAMAGE_FACTOR,
            projectile.owner,
            "fragment",
        ));
    }

    let n = explosive.bursts;
    for i in 0..n {
        let angle = projectile.angle + TAU * i as f64 / n as f64;
        children.push(ProjectileSpawn::new(
            at,
            angle,
            projectile.speed * BURST_SPEED_FACTOR,
            projectile.damage * BURST_DAMAGE_FACTOR,
            projectile.owner,
            "burst",
        ));
    }

    Some(AreaBlast {
        position: at,
        radius: explosive.radius,
        damage: projectile.damage,
        owner: projectile.owner,
        exclude: projectile.struck.clone(),
        exclude_tank: false,
        children,
    })
}

/// Splash from a non-explosive round that reached the ground or was destroyed.
pub fn splash(projectile: &Projectile, at: Position) -> Option<AreaBlast> {
    if projectile.behavior.explosive.is_some() || projectile.behavior.splash_radius <= 0.0 {
        return None;
    }
    Some(AreaBlast {
        position: at,
        radius: projectile.behavior.splash_radius,
        damage: projectile.damage,
        owner: projectile.owner,
        exclude: projectile.struck.clone(),
        exclude_tank: false,
        children: Vec::new(),
    })
}

/// Reflect a player round back at `target`. Ownership changes in place.
pub fn deflect(projectile: &mut Projectile, velocity: &mut Velocity, from: Position, target: Position) {
    projectile.owner = Owner::Enemy;
    projectile.angle = from.bearing_to(&target);
    projectile.speed *= DEFLECT_SPEED_FACTOR;
    projectile.damage *= DEFLECT_DAMAGE_FACTOR;
    projectile.behavior.homing = None;
    projectile.deflected = true;
    projectile.age_ms = 0.0;
    projectile.struck.clear();
    *velocity = Velocity::from_angle(projectile.angle, projectile.speed);
}
