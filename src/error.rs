//! Error types for the tiles core and the wasm host.
//!
//! A wrong tile or a row passing the strike line is *not* an error: those are
//! ordinary game-over transitions reported through [`crate::engine::Miss`].

use thiserror::Error;

/// Rejected game configuration. Raised at construction, before any geometry
/// is derived from the values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas size must be positive and finite, got {width}x{height}")]
    CanvasSize { width: f64, height: f64 },
    #[error("row count must be at least 1")]
    NoRows,
    #[error("column count must be at least 1")]
    NoColumns,
    #[error("initial speed must be positive and finite, got {0}")]
    Speed(f64),
    #[error("black tile count must be at least 1")]
    NoBlackTiles,
    #[error("multi tile probability must lie in [0, 1], got {0}")]
    Probability(f64),
    #[error("speed ramp increments must be non-negative, got {slow} / {fast}")]
    SpeedRamp { slow: f64, fast: f64 },
    #[error("warm-up distance {distance} must exceed one row height ({row_height})")]
    Warmup { distance: f64, row_height: f64 },
}

/// Click that cannot be resolved against the stack. Ignored by the engine:
/// no score, speed or phase change.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidClick {
    #[error("click at ({x}, {y}) is outside the canvas")]
    OutOfBounds { x: f64, y: f64 },
    #[error("game is over; restart before clicking")]
    NotAccepting,
    #[error("no row is waiting for input")]
    NoFrontier,
    #[error("click does not hit the frontier row")]
    OffFrontier,
    #[error("column {0} is not an active tile")]
    ColumnNotActive(usize),
}

/// Top-level error for engine construction and host entry points.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] getrandom::Error),
    #[cfg(feature = "serde_json")]
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
