//! How an approach ended.

use crate::config::LanderConfig;
use crate::state::LanderSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Drifted outside the landing bay.
    MissedTarget,
    /// Hit the bay above the safe landing speed.
    TooFast,
    /// Docked with the gear down.
    Success,
    /// Docked slowly but with the gear up.
    NoGear,
}

impl Outcome {
    /// Decide the outcome from the final state. Checks run in order: aim, speed, gear.
    pub fn evaluate(state: &LanderSnapshot, config: &LanderConfig) -> Self {
        let missed = state.drift_x.abs() >= config.miss_radius_x()
            || state.drift_y.abs() >= config.miss_radius_y();
        if missed {
            Self::MissedTarget
        } else if state.speed > config.max_safe_speed {
            Self::TooFast
        } else if state.gear_index == config.gear_down_index() {
            Self::Success
        } else {
            Self::NoGear
        }
    }

    /// Banner for the ending screen.
    pub fn headline(self) -> &'static str {
        match self {
            Self::MissedTarget => "Missed the mother ship. No fuel for another try.",
            Self::TooFast => "Too fast! Lander and mother ship destroyed.",
            Self::Success => "Gear down. Docked safely!",
            Self::NoGear => "Gear up. Lander damaged, crew survived.",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}
