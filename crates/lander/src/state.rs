//! Approach phases, gear intent, and the lander state aggregate.

use std::time::Duration;

use engine_core::IVec2;

use crate::config::LanderConfig;

/// Top-level stage of the landing sequence. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApproachPhase {
    /// Waiting for every lever to be switched off.
    Init,
    /// Waiting for every lever to be switched on.
    Preflight,
    /// Closing on the mother ship.
    InFlight,
    /// Close enough to lower the gear.
    Final,
}

impl ApproachPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Preflight => "Preflight",
            Self::InFlight => "In flight",
            Self::Final => "Final",
        }
    }

    /// Phases where the control panel steers the lander.
    pub fn is_flying(self) -> bool {
        matches!(self, Self::InFlight | Self::Final)
    }
}

/// What the landing gear is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GearState {
    #[default]
    Idle,
    Lowering,
    Raising,
}

/// The state of one approach. Only the state machine mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanderState {
    pub(crate) phase: ApproachPhase,
    pub(crate) gear_state: GearState,
    pub(crate) gear_index: usize,
    pub(crate) distance: i32,
    pub(crate) speed: i32,
    pub(crate) drift: IVec2,
    pub(crate) approach_start: Option<Duration>,
}

impl LanderState {
    /// Fresh state at the start of an approach.
    pub fn new(config: &LanderConfig) -> Self {
        Self {
            phase: ApproachPhase::Init,
            gear_state: GearState::Idle,
            gear_index: 0,
            distance: config.initial_distance,
            speed: 0,
            drift: IVec2::ZERO,
            approach_start: None,
        }
    }

    pub fn phase(&self) -> ApproachPhase {
        self.phase
    }

    pub fn gear_state(&self) -> GearState {
        self.gear_state
    }

    /// Current frame of the gear animation; 0 is gear up.
    pub fn gear_index(&self) -> usize {
        self.gear_index
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Offset of the mother ship from the lander's sightline.
    pub fn drift(&self) -> IVec2 {
        self.drift
    }

    /// Clock reading at the first throttle-up, if it happened.
    pub fn approach_start(&self) -> Option<Duration> {
        self.approach_start
    }

    /// The approach is over once the lander has covered the whole distance.
    pub fn is_game_over(&self) -> bool {
        self.distance <= 0
    }

    /// Read-only copy for presentation.
    pub fn snapshot(&self) -> LanderSnapshot {
        LanderSnapshot {
            phase: self.phase,
            gear_state: self.gear_state,
            gear_index: self.gear_index,
            distance: self.distance,
            speed: self.speed,
            drift_x: self.drift.x,
            drift_y: self.drift.y,
            approach_start: self.approach_start,
        }
    }
}

/// Plain copy of [`LanderState`] handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanderSnapshot {
    pub phase: ApproachPhase,
    pub gear_state: GearState,
    pub gear_index: usize,
    pub distance: i32,
    pub speed: i32,
    pub drift_x: i32,
    pub drift_y: i32,
    pub approach_start: Option<Duration>,
}

impl LanderSnapshot {
    pub fn is_game_over(&self) -> bool {
        self.distance <= 0
    }

    pub fn drift(&self) -> IVec2 {
        IVec2::new(self.drift_x, self.drift_y)
    }
}
