//! Scripted pilot: replays lever positions and key holds from a RON script.
//!
//! A script is a list of steps, each held for a number of polls:
//!
//! ```ron
//! [
//!     (levers: (false, false, false), ticks: 1),
//!     (levers: (true, true, true), ticks: 1),
//!     (levers: (true, true, true), key: Some('C'), ticks: 4),
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keypad::{KeyMatrix, KeyPos, KeyState, KeypadState};
use crate::{ControlInputSource, ControlSample, Levers};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("could not read pilot script {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pilot script {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("key '{0}' is not on the control panel")]
    UnknownKey(char),
    #[error("pilot script has no steps")]
    Empty,
}

/// One step of a pilot script as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Thrust, systems and confirm lever positions.
    pub levers: (bool, bool, bool),
    /// Key held for the whole step.
    #[serde(default)]
    pub key: Option<char>,
    /// Number of polls the step lasts.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
}

fn default_ticks() -> u32 {
    1
}

impl ScriptStep {
    pub fn new(levers: (bool, bool, bool), key: Option<char>, ticks: u32) -> Self {
        Self { levers, key, ticks }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedStep {
    levers: Levers,
    key: Option<KeyPos>,
    ticks: u32,
}

/// [`ControlInputSource`] that replays a script through the keypad latch.
#[derive(Debug)]
pub struct ScriptedInput {
    steps: Vec<ResolvedStep>,
    /// Index of the next step to enter.
    next: usize,
    /// Polls left in the current step.
    remaining: u32,
    levers: Levers,
    keypad: KeypadState,
}

impl ScriptedInput {
    /// Build a pilot from parsed steps. Every key label must exist on the panel.
    pub fn new(steps: Vec<ScriptStep>) -> Result<Self, ScriptError> {
        if steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        let steps = steps
            .into_iter()
            .map(|step| {
                let key = match step.key {
                    Some(label) => Some(KeyMatrix::position_of(label).ok_or(ScriptError::UnknownKey(label))?),
                    None => None,
                };
                let (thrust, systems, confirm) = step.levers;
                Ok(ResolvedStep {
                    levers: Levers::new(thrust, systems, confirm),
                    key,
                    ticks: step.ticks,
                })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;

        Ok(Self {
            steps,
            next: 0,
            remaining: 0,
            levers: Levers::default(),
            keypad: KeypadState::new(KeyMatrix::lander_panel()),
        })
    }

    /// Parse a script from RON text. `origin` only labels errors.
    pub fn from_ron(text: &str, origin: &Path) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> = ron::from_str(text).map_err(|source| ScriptError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(steps)
    }

    /// Load a script file.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pilot = Self::from_ron(&text, path)?;
        log::info!("Loaded pilot script {:?} ({} steps)", path, pilot.steps.len());
        Ok(pilot)
    }

    /// The default flight: arm the levers, throttle up, cruise, slow down, drop the gear and coast in.
    pub fn builtin_approach() -> Self {
        const ON: (bool, bool, bool) = (true, true, true);
        let steps = vec![
            ScriptStep::new((false, false, false), None, 1),
            ScriptStep::new(ON, None, 1),
            ScriptStep::new(ON, Some('C'), 6),
            ScriptStep::new(ON, None, 209),
            ScriptStep::new(ON, Some('D'), 4),
            ScriptStep::new(ON, None, 22),
            ScriptStep::new(ON, Some('A'), 4),
            ScriptStep::new(ON, None, 200),
        ];
        Self {
            steps: steps
                .into_iter()
                .map(|s| ResolvedStep {
                    levers: Levers::new(s.levers.0, s.levers.1, s.levers.2),
                    key: s.key.and_then(KeyMatrix::position_of),
                    ticks: s.ticks,
                })
                .collect(),
            next: 0,
            remaining: 0,
            levers: Levers::default(),
            keypad: KeypadState::new(KeyMatrix::lander_panel()),
        }
    }

    /// True once every step has been played out.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0 && self.steps[self.next..].iter().all(|s| s.ticks == 0)
    }

    fn enter_next_step(&mut self) {
        self.keypad.release_all();
        while let Some(step) = self.steps.get(self.next).copied() {
            self.next += 1;
            if step.ticks == 0 {
                continue;
            }
            self.levers = step.levers;
            if let Some(pos) = step.key {
                self.keypad.process_key(pos, KeyState::Pressed);
            }
            self.remaining = step.ticks;
            return;
        }
    }
}

impl ControlInputSource for ScriptedInput {
    fn sample(&mut self) -> ControlSample {
        self.keypad.begin_poll();
        if self.remaining == 0 {
            self.enter_next_step();
        }
        self.remaining = self.remaining.saturating_sub(1);
        ControlSample::new(self.levers, self.keypad.current_action())
    }
}
