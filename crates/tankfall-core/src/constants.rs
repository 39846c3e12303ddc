//! Simulation constants and tuning parameters.

/// Nominal tick rate (Hz) the frame-counted checks were authored against.
pub const TICK_RATE: u32 = 60;

/// Milliseconds per nominal frame.
pub const FRAME_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Playfield ---

pub const PLAYFIELD_WIDTH: f64 = 1280.0;
pub const PLAYFIELD_HEIGHT: f64 = 720.0;

/// Ground line (y grows downward).
pub const GROUND_Y: f64 = 640.0;

/// Enemies beyond this distance outside the playfield turn around (or leave, when evacuating).
pub const ENEMY_OOB_MARGIN: f64 = 60.0;

/// Lowest altitude (largest y) aircraft steer to, Kamikaze excepted.
pub const AIR_FLOOR_Y: f64 = 460.0;

/// Altitude band for freshly spawned aircraft.
pub const AIR_SPAWN_MIN_Y: f64 = 80.0;
pub const AIR_SPAWN_MAX_Y: f64 = 320.0;

// --- Projectiles ---

/// Default projectile lifetime.
pub const PROJECTILE_LIFETIME_MS: f64 = 5000.0;

/// Projectiles beyond the playfield plus this margin are destroyed.
pub const PROJECTILE_OOB_MARGIN: f64 = 100.0;

/// Half extent of a projectile's square hitbox.
pub const PROJECTILE_HALF_SIZE: f64 = 4.0;

/// Default homing turn fraction per nominal frame.
pub const DEFAULT_HOMING_STRENGTH: f64 = 0.1;

/// Downward acceleration for gravity-affected ordnance (px/s²).
pub const BOMB_GRAVITY: f64 = 400.0;

/// Fragment children: fraction of parent damage and speed.
pub const FRAGMENT_DAMAGE_FACTOR: f64 = 0.3;
pub const FRAGMENT_SPEED_FACTOR: f64 = 0.6;

/// Burst children: fraction of parent damage and speed.
pub const BURST_DAMAGE_FACTOR: f64 = 0.5;
pub const BURST_SPEED_FACTOR: f64 = 0.8;

/// Spread-shot fan half angle (radians).
pub const SPREAD_ANGLE: f64 = 0.2;

// --- Deflection ---

pub const DEFLECT_SPEED_FACTOR: f64 = 0.8;
pub const DEFLECT_DAMAGE_FACTOR: f64 = 0.7;
pub const DEFLECTOR_ACTIVE_MS: f64 = 3000.0;
pub const DEFLECTOR_RECHARGE_MS: f64 = 4000.0;

// --- Satellite ---

pub const SATELLITE_CHARGE_MS: f64 = 2000.0;
pub const SATELLITE_ACTIVE_MS: f64 = 3000.0;
pub const SATELLITE_COOLDOWN_MS: f64 = 4000.0;
pub const SATELLITE_BEAM_HALF_WIDTH: f64 = 30.0;
pub const SATELLITE_BEAM_DPS: f64 = 25.0;

// --- Enemy AI ---

/// Base firing check runs once every N frames.
pub const ENEMY_FIRE_CHECK_FRAMES: u64 = 40;

/// Fallback minimum frame gap between shots when no interval is known.
pub const ENEMY_DEFAULT_FIRE_GAP_FRAMES: u64 = 90;

pub const BOMBER_DROP_RANGE: f64 = 200.0;
pub const BOMBER_SLOWDOWN_RANGE: f64 = 220.0;
pub const BOMBER_SLOWDOWN_FACTOR: f64 = 0.5;
pub const GROUND_FIRE_RANGE: f64 = 350.0;
pub const GROUND_FIRE_ALTITUDE_BAND: f64 = 80.0;
pub const AIMED_FIRE_RANGE: f64 = 520.0;

/// Vertical correction speed as a fraction of lateral speed.
pub const VERTICAL_CORRECTION_FACTOR: f64 = 0.3;

pub const EVACUATION_SPEED: f64 = 420.0;

/// Stragglers still evacuating after this delay are removed.
pub const EVACUATION_TIMEOUT_MS: f64 = 6000.0;

pub const DAMAGE_FLASH_MS: f64 = 120.0;

// --- Contact ---

pub const CONTACT_DAMAGE_TO_TANK: f64 = 20.0;
pub const KAMIKAZE_CONTACT_DAMAGE: f64 = 35.0;
pub const CONTACT_DAMAGE_TO_ENEMY: f64 = 50.0;
pub const CONTACT_COOLDOWN_MS: f64 = 500.0;

// --- Tank ---

pub const TANK_MAX_HEALTH: f64 = 100.0;
pub const TANK_HALF_WIDTH: f64 = 28.0;
pub const TANK_HALF_HEIGHT: f64 = 16.0;
pub const TANK_Y: f64 = GROUND_Y - TANK_HALF_HEIGHT;
pub const TANK_MIN_X: f64 = 40.0;
pub const TANK_MAX_X: f64 = PLAYFIELD_WIDTH - 40.0;
pub const TANK_MAX_SPEED: f64 = 260.0;
/// Target speed per pixel of pointer offset (1/s).
pub const TANK_POINTER_GAIN: f64 = 4.0;
/// Peak acceleration toward the target speed (px/s²).
pub const TANK_ACCEL: f64 = 1400.0;
/// Per-frame velocity retention once settled near the pointer.
pub const TANK_DAMPING: f64 = 0.85;
pub const TANK_SETTLE_DISTANCE: f64 = 6.0;
/// Turret pivot offset above the tank center.
pub const TURRET_HEIGHT: f64 = 14.0;
/// Fraction of the aim error closed per nominal frame.
pub const AIM_SMOOTHING: f64 = 0.2;
pub const AIM_POINT_DISTANCE: f64 = 120.0;
pub const LOW_HEALTH_FRACTION: f64 = 0.25;
pub const SPECIAL_COOLDOWN_MS: f64 = 10_000.0;
pub const SURPLUS_UPGRADE_SCORE: u64 = 1000;
pub const MAX_WEAPON_LEVEL: u8 = 3;

// --- Waves & difficulty ---

pub const FIRST_WAVE_DELAY_MS: f64 = 1500.0;
pub const WAVE_DELAY_MS: f64 = 3000.0;
pub const FALLBACK_SPAWN_INTERVAL_MS: f64 = 1500.0;
pub const DIFFICULTY_INTERVAL_MS: f64 = 12_000.0;
pub const DIFFICULTY_HEALTH_STEP: f64 = 0.2;
pub const WAVES_PER_LEVEL: u32 = 4;
pub const LEVELS_PER_TIER: u32 = 5;
pub const WAVE_STALL_WARN_MS: f64 = 45_000.0;
/// Spawn x offset outside the playfield edge.
pub const SPAWN_EDGE_OFFSET: f64 = 40.0;

// --- Power-ups ---

pub const POWER_UP_KIND_COUNT: usize = 9;
pub const POWER_UP_HALF_SIZE: f64 = 14.0;
pub const POWER_UP_FALL_SPEED: f64 = 60.0;
pub const POWER_UP_GROUND_EXPIRY_MS: f64 = 30_000.0;
pub const RECENT_DELIVERY_WINDOW: usize = 5;
pub const CRITICAL_HEALTH_FRACTION: f64 = 0.3;
pub const LOW_WEAPON_TIER: u32 = 4;
pub const WEAPON_UPGRADE_MIN_ELAPSED_MS: f64 = 30_000.0;
pub const HIGH_ENEMY_COUNT: usize = 12;
pub const LONG_SURVIVAL_MS: f64 = 180_000.0;
pub const DELIVERY_MIN_INTERVAL_MS: f64 = 20_000.0;
pub const DELIVERY_CHECK_INTERVAL_MS: f64 = 3000.0;
pub const DELIVERY_BASE_CHANCE: f64 = 0.10;
pub const DELIVERY_HEALTH_BONUS: f64 = 0.25;
pub const DELIVERY_WEAPON_BONUS: f64 = 0.15;
pub const DELIVERY_TIME_BONUS_MAX: f64 = 0.2;
pub const DELIVERY_ENEMY_BONUS_PER: f64 = 0.015;
pub const DELIVERY_ENEMY_BONUS_MAX: f64 = 0.15;
pub const DELIVERY_MAX_CHANCE: f64 = 0.6;
pub const HEAL_FRACTION: f64 = 0.4;
pub const SCREEN_LASER_DAMAGE: f64 = 60.0;
pub const SHIELD_DURATION_MS: f64 = 8000.0;
pub const TIMED_EFFECT_DURATION_MS: f64 = 10_000.0;
pub const RAPID_FIRE_INTERVAL_FACTOR: f64 = 0.5;
pub const ENHANCED_GUN_DAMAGE_FACTOR: f64 = 1.5;

// --- Support unit ---

pub const SUPPORT_Y: f64 = 110.0;
pub const SUPPORT_SPEED: f64 = 200.0;
pub const SUPPORT_EXIT_SPEED: f64 = 600.0;
pub const SUPPORT_HOVER_MS: f64 = 1000.0;
pub const SUPPORT_DROP_JITTER: f64 = 80.0;
pub const SUPPORT_HALF_WIDTH: f64 = 36.0;
pub const SUPPORT_HALF_HEIGHT: f64 = 14.0;
