//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in playfield space (pixels).
/// x = right, y = down (screen space). The ground line is at `GROUND_Y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in playfield space (px/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned rectangle used for all pairwise hit checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Simulation time tracking. Milliseconds are the canonical clock.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    /// Bearing to another position in radians (0 = +x, clockwise on screen).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let d = other.as_vec() - self.as_vec();
        d.y.atan2(d.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Advance by `velocity` over `dt_ms` milliseconds.
    pub fn advance(&mut self, velocity: &Velocity, dt_ms: f64) {
        let secs = dt_ms / 1000.0;
        self.x += velocity.x * secs;
        self.y += velocity.y * secs;
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Velocity of magnitude `speed` along `angle`.
    pub fn from_angle(angle: f64, speed: f64) -> Self {
        let v = DVec2::from_angle(angle) * speed;
        Self { x: v.x, y: v.y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Speed magnitude (px/s).
    pub fn speed(&self) -> f64 {
        self.as_vec().length()
    }

    /// Heading in radians (0 = +x).
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Bounds {
    /// Rectangle centered on `center` with the given half extents.
    pub fn centered(center: Position, half_width: f64, half_height: f64) -> Self {
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Strict AABB overlap. Touching edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }
}

impl SimTime {
    /// Advance by one tick of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU)
        - std::f64::consts::PI;
    if wrapped <= -std::f64::consts::PI {
        wrapped + std::f64::consts::TAU
    } else {
        wrapped
    }
}

/// Linear area-damage falloff: 1 at the center, 0 at (and beyond) `radius`.
pub fn falloff(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / radius).max(0.0)
}

/// Frame index for the fixed-cadence checks derived from the millisecond clock.
pub fn frame_index(ms: f64) -> u64 {
    (ms.max(0.0) / crate::constants::FRAME_MS).floor() as u64
}

/// True if a multiple of `every` frames was crossed in `(prev_frame, frame]`.
pub fn frame_gate_crossed(prev_frame: u64, frame: u64, every: u64) -> bool {
    if every == 0 || frame <= prev_frame {
        return false;
    }
    frame / every > prev_frame / every
}
