//! Game constants for one approach.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the mother ship's random drift is drawn each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriftModel {
    /// Draw from {-1, 0, 1, 2} and fold 2 back to 0. Zero comes up twice as often.
    #[default]
    Skewed,
    /// Draw evenly from {-1, 0, 1}.
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfig {
    #[error("initial_distance must be positive, got {0}")]
    InitialDistance(i32),
    #[error("max_drift must not be negative, got {0}")]
    MaxDrift(i32),
    #[error("max_ship_width must be at least 2, got {0}")]
    ShipWidth(i32),
    #[error("max_ship_height must be at least 1, got {0}")]
    ShipHeight(i32),
    #[error("max_safe_speed must not be negative, got {0}")]
    SafeSpeed(i32),
    #[error("gear_frame_count must be at least 2, got {0}")]
    GearFrames(usize),
}

/// Fixed numbers that shape an approach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanderConfig {
    /// Distance to the mother ship at the start.
    #[serde(default = "default_initial_distance")]
    pub initial_distance: i32,
    /// Largest offset the mother ship can drift from the sightline, per axis.
    #[serde(default = "default_max_drift")]
    pub max_drift: i32,
    /// Mother ship width at docking range.
    #[serde(default = "default_max_ship_width")]
    pub max_ship_width: i32,
    /// Mother ship height at docking range.
    #[serde(default = "default_max_ship_height")]
    pub max_ship_height: i32,
    /// Fastest speed that still lands safely.
    #[serde(default = "default_max_safe_speed")]
    pub max_safe_speed: i32,
    /// Frames in the landing gear animation. Frame 0 is gear up, the last is gear down.
    #[serde(default = "default_gear_frame_count")]
    pub gear_frame_count: usize,
    #[serde(default)]
    pub drift_model: DriftModel,
}

fn default_initial_distance() -> i32 {
    1476
}
fn default_max_drift() -> i32 {
    18
}
fn default_max_ship_width() -> i32 {
    21
}
fn default_max_ship_height() -> i32 {
    15
}
fn default_max_safe_speed() -> i32 {
    2
}
fn default_gear_frame_count() -> usize {
    4
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            initial_distance: default_initial_distance(),
            max_drift: default_max_drift(),
            max_ship_width: default_max_ship_width(),
            max_ship_height: default_max_ship_height(),
            max_safe_speed: default_max_safe_speed(),
            gear_frame_count: default_gear_frame_count(),
            drift_model: DriftModel::default(),
        }
    }
}

impl LanderConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.initial_distance <= 0 {
            return Err(InvalidConfig::InitialDistance(self.initial_distance));
        }
        if self.max_drift < 0 {
            return Err(InvalidConfig::MaxDrift(self.max_drift));
        }
        if self.max_ship_width < 2 {
            return Err(InvalidConfig::ShipWidth(self.max_ship_width));
        }
        if self.max_ship_height < 1 {
            return Err(InvalidConfig::ShipHeight(self.max_ship_height));
        }
        if self.max_safe_speed < 0 {
            return Err(InvalidConfig::SafeSpeed(self.max_safe_speed));
        }
        if self.gear_frame_count < 2 {
            return Err(InvalidConfig::GearFrames(self.gear_frame_count));
        }
        Ok(())
    }

    /// Below this distance the approach enters its final phase.
    pub fn final_approach_distance(&self) -> i32 {
        self.initial_distance / 10
    }

    /// Gear animation index with the gear fully down.
    pub fn gear_down_index(&self) -> usize {
        self.gear_frame_count.saturating_sub(1)
    }

    /// Horizontal drift at or beyond which the lander misses the bay.
    pub fn miss_radius_x(&self) -> i32 {
        half_rounded_up(self.max_ship_width + 1)
    }

    /// Vertical drift at or beyond which the lander misses the bay.
    pub fn miss_radius_y(&self) -> i32 {
        half_rounded_up(self.max_ship_height + 1)
    }
}

fn half_rounded_up(n: i32) -> i32 {
    (n + 1).div_euclid(2)
}
