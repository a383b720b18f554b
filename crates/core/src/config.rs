//! Simulation tuning.
//!
//! Every field defaults to the matching constant in `blockweld-types`, so a
//! partial JSON object only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    BLOCK_FALL_ANIM_SPEED, CLEAR_LINE_DEBOUNCE_SECS, DRAG_FALL_SPEED, EXPLOSION_SPEED, FALL_SPEED,
    LANDING_TIMEOUT_SECS, LASER_CUT_INTERVAL_SECS, LASER_FREE_SPEED, MAX_ROTATE_ADJUSTMENT,
    WELD_ANIM_SPEED,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Passive fall speed (rows per second).
    pub fall_speed: f32,
    /// Fastest a dragged piece moves down (rows per second).
    pub drag_fall_speed: f32,
    /// Seconds a resting piece waits before landing.
    pub landing_timeout: f32,
    /// Seconds between a cascade finding a full row and clearing it.
    pub clear_line_debounce: f32,
    /// Area detonation ring growth (cells per second).
    pub explosion_speed: f32,
    /// Row laser speed over empty cells (cells per second).
    pub laser_free_speed: f32,
    /// Row laser seconds per cut cell.
    pub laser_cut_interval: f32,
    pub max_rotate_adjustment: i32,
    pub weld_anim_speed: f32,
    pub block_fall_anim_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{0}` must be a positive, finite number")]
    NotPositive(&'static str),
    #[error("`{0}` must be a non-negative, finite number")]
    Negative(&'static str),
    #[error("`max_rotate_adjustment` must not be negative")]
    NegativeAdjustment,
}

impl SimulationConfig {
    /// Reject speeds and intervals that would stall a multi-frame step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("fall_speed", self.fall_speed),
            ("drag_fall_speed", self.drag_fall_speed),
            ("explosion_speed", self.explosion_speed),
            ("laser_free_speed", self.laser_free_speed),
            ("laser_cut_interval", self.laser_cut_interval),
            ("weld_anim_speed", self.weld_anim_speed),
            ("block_fall_anim_speed", self.block_fall_anim_speed),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive(name));
            }
        }
        // Zero waits resolve on the next frame.
        for (name, value) in [
            ("landing_timeout", self.landing_timeout),
            ("clear_line_debounce", self.clear_line_debounce),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative(name));
            }
        }
        if self.max_rotate_adjustment < 0 {
            return Err(ConfigError::NegativeAdjustment);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fall_speed: FALL_SPEED,
            drag_fall_speed: DRAG_FALL_SPEED,
            landing_timeout: LANDING_TIMEOUT_SECS,
            clear_line_debounce: CLEAR_LINE_DEBOUNCE_SECS,
            explosion_speed: EXPLOSION_SPEED,
            laser_free_speed: LASER_FREE_SPEED,
            laser_cut_interval: LASER_CUT_INTERVAL_SECS,
            max_rotate_adjustment: MAX_ROTATE_ADJUSTMENT,
            weld_anim_speed: WELD_ANIM_SPEED,
            block_fall_anim_speed: BLOCK_FALL_ANIM_SPEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: SimulationConfig =
            serde_json::from_str(r#"{"fall_speed": 3.0, "max_rotate_adjustment": 1}"#).unwrap();
        assert_eq!(cfg.fall_speed, 3.0);
        assert_eq!(cfg.max_rotate_adjustment, 1);
        assert_eq!(cfg.landing_timeout, LANDING_TIMEOUT_SECS);
        assert_eq!(cfg.laser_cut_interval, LASER_CUT_INTERVAL_SECS);
    }

    #[test]
    fn test_empty_object_is_default() {
        let cfg: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SimulationConfig::default());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_stalling_speeds_are_rejected() {
        let cfg: SimulationConfig = serde_json::from_str(r#"{"explosion_speed": 0.0}"#).unwrap();
        assert_eq!(cfg.validate(), Err(ConfigError::NotPositive("explosion_speed")));

        let cfg = SimulationConfig {
            fall_speed: -1.0,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NotPositive("fall_speed")));

        let cfg = SimulationConfig {
            laser_cut_interval: f32::NAN,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NotPositive("laser_cut_interval")));

        let cfg = SimulationConfig {
            landing_timeout: 0.0,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }
}
