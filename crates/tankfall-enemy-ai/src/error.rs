use tankfall_core::enums::EnemyKind;
use thiserror::Error;

/// A per-enemy update that could not produce a valid result.
/// The caller removes the offending enemy and keeps ticking.
#[derive(Debug, Error, PartialEq)]
pub enum EnemyAiError {
    #[error("{kind} has non-finite position ({x}, {y})")]
    NonFinitePosition { kind: EnemyKind, x: f64, y: f64 },
    #[error("{kind} has non-finite speed {speed}")]
    NonFiniteSpeed { kind: EnemyKind, speed: f64 },
}
