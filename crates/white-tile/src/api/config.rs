use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extensions::easing::Easing;

/// Game configuration, provided by the host.
///
/// Every field has a default, so a host can send a partial JSON object such as
/// `{"god_mode": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rows fully visible on screen (default: 4). One extra row slot is kept
    /// for the partially visible row entering at the top.
    pub rows: usize,
    /// Columns per row (default: 4).
    pub columns: usize,
    /// Never fail: wrong taps, skipped rows and timeouts are not punished.
    pub god_mode: bool,
    /// Duration of the first scroll segment in milliseconds (default: 5000).
    pub initial_duration_ms: f64,
    /// Rows scrolled per segment (default: 10).
    pub rows_per_segment: f64,
    /// Duration multiplier applied after every segment, in (0, 1) (default: 0.9).
    pub speedup_factor: f64,
    /// Duration of the rewind after a missed row (default: 500).
    pub rewind_ms: f64,
    /// Curve used while scrolling (default: linear, the curve the classic game
    /// scrolls with).
    pub scroll_easing: Easing,
    /// Tiles generated eagerly on reset (default: 10).
    pub pregenerated_tiles: usize,
    /// Leaderboard entries to watch (default: 50).
    pub leaderboard_size: usize,
    /// Seed for tile generation. `None` lets the host pick one.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            columns: 4,
            god_mode: false,
            initial_duration_ms: 5000.0,
            rows_per_segment: 10.0,
            speedup_factor: 0.9,
            rewind_ms: 500.0,
            scroll_easing: Easing::Linear,
            pregenerated_tiles: 10,
            leaderboard_size: 50,
            seed: None,
        }
    }
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be at least 1")]
    Zero { field: &'static str },
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`speedup_factor` must be in (0, 1), got {0}")]
    SpeedupFactor(f64),
}

impl GameConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::Zero { field: "rows" });
        }
        if self.columns == 0 {
            return Err(ConfigError::Zero { field: "columns" });
        }
        for (field, value) in [
            ("initial_duration_ms", self.initial_duration_ms),
            ("rows_per_segment", self.rows_per_segment),
            ("rewind_ms", self.rewind_ms),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.speedup_factor > 0.0 && self.speedup_factor < 1.0) {
            return Err(ConfigError::SpeedupFactor(self.speedup_factor));
        }
        Ok(())
    }
}
