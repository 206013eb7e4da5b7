//! Session configuration and derived tile geometry.

use crate::error::ConfigError;

/// Widest canvas the game uses, even on wide viewports.
pub const MAX_CANVAS_WIDTH: f64 = 340.0;

/// Immutable per-session settings. The current scroll speed is engine state;
/// `initial_speed` is what every reset returns to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct GameConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Rows visible at once; also the number of rows a fresh stack holds.
    pub row_count: usize,
    pub col_count: usize,
    /// Pixels per tick at the start of a session.
    pub initial_speed: f64,
    /// Draws made for a multi-tile row (duplicates collapse).
    pub black_tile_count: usize,
    /// A row draw below this value spawns a single tile, otherwise
    /// `black_tile_count` draws are made.
    pub multi_tile_probability: f64,
    /// Created-row count at which the speed ramp switches to the fast increment.
    pub speed_ramp_threshold_rows: usize,
    pub speed_ramp_slow_increment: f64,
    pub speed_ramp_fast_increment: f64,
    /// Distance the fresh stack is pulled back before the first paint.
    pub warmup_distance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: MAX_CANVAS_WIDTH,
            canvas_height: 600.0,
            row_count: 5,
            col_count: 4,
            initial_speed: 2.0,
            black_tile_count: 2,
            multi_tile_probability: 0.7,
            speed_ramp_threshold_rows: 30,
            speed_ramp_slow_increment: 0.1,
            speed_ramp_fast_increment: 0.05,
            warmup_distance: 400.0,
        }
    }
}

impl GameConfig {
    /// Default settings sized for a browser viewport. On very tall screens the
    /// warm-up grows so the first row never starts on the strike line.
    pub fn for_viewport(width: f64, height: f64) -> Self {
        let base = Self::default();
        let row_height = height / base.row_count as f64;
        Self {
            canvas_width: width.min(MAX_CANVAS_WIDTH),
            canvas_height: height,
            warmup_distance: base.warmup_distance.max(row_height * 2.0),
            ..base
        }
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(ConfigError::CanvasSize {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.row_count == 0 {
            return Err(ConfigError::NoRows);
        }
        if self.col_count == 0 {
            return Err(ConfigError::NoColumns);
        }
        if !positive(self.initial_speed) {
            return Err(ConfigError::Speed(self.initial_speed));
        }
        if self.black_tile_count == 0 {
            return Err(ConfigError::NoBlackTiles);
        }
        if !(0.0..=1.0).contains(&self.multi_tile_probability) {
            return Err(ConfigError::Probability(self.multi_tile_probability));
        }
        let (slow, fast) = (
            self.speed_ramp_slow_increment,
            self.speed_ramp_fast_increment,
        );
        if !(slow.is_finite() && fast.is_finite() && slow >= 0.0 && fast >= 0.0) {
            return Err(ConfigError::SpeedRamp { slow, fast });
        }
        if !(self.warmup_distance.is_finite() && self.warmup_distance > self.row_height()) {
            return Err(ConfigError::Warmup {
                distance: self.warmup_distance,
                row_height: self.row_height(),
            });
        }
        Ok(())
    }

    pub fn tile_width(&self) -> f64 {
        self.canvas_width / self.col_count as f64
    }

    pub fn row_height(&self) -> f64 {
        self.canvas_height / self.row_count as f64
    }

    /// The strike line sits on the bottom edge of the canvas.
    pub fn strike_y(&self) -> f64 {
        self.canvas_height
    }

    /// Speed increase for one successful tile, given how many rows the session
    /// has created so far.
    pub fn speed_increment(&self, rows_created: usize) -> f64 {
        if rows_created < self.speed_ramp_threshold_rows {
            self.speed_ramp_slow_increment
        } else {
            self.speed_ramp_fast_increment
        }
    }
}
