//! Control inputs for the lander: levers, the keypad matrix, and input sources.

pub mod keypad;
pub mod script;
pub mod words;

pub use keypad::{KeyMatrix, KeyPos, KeypadState, MATRIX_COLUMNS, MATRIX_ROWS};
pub use script::{ScriptError, ScriptStep, ScriptedInput};
pub use words::read_word;

/// One discrete command from the control panel.
///
/// Only one action reaches the state machine per tick. `Unused` means no
/// control is being pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlAction {
    #[default]
    Unused,
    SteerUp,
    SteerDown,
    SteerLeft,
    SteerRight,
    SteerUpRight,
    SteerUpLeft,
    SteerDownRight,
    SteerDownLeft,
    LowerGear,
    RaiseGear,
    RaiseSpeed,
    LowerSpeed,
}

impl ControlAction {
    /// Decode the panel's numeric action code. Unknown codes decode to `Unused`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::SteerUp,
            2 => Self::SteerDown,
            3 => Self::SteerLeft,
            4 => Self::SteerRight,
            5 => Self::SteerUpRight,
            6 => Self::SteerUpLeft,
            7 => Self::SteerDownRight,
            8 => Self::SteerDownLeft,
            9 => Self::LowerGear,
            10 => Self::RaiseGear,
            11 => Self::RaiseSpeed,
            12 => Self::LowerSpeed,
            _ => Self::Unused,
        }
    }

    /// Drift adjustment `(dx, dy)` for a steering action, `None` for everything else.
    ///
    /// Steering moves the mother ship's offset, so "left" pushes it right (+x).
    pub fn steering_delta(self) -> Option<(i32, i32)> {
        match self {
            Self::SteerUp => Some((0, 1)),
            Self::SteerDown => Some((0, -1)),
            Self::SteerLeft => Some((1, 0)),
            Self::SteerRight => Some((-1, 0)),
            Self::SteerUpRight => Some((-1, 1)),
            Self::SteerUpLeft => Some((1, 1)),
            Self::SteerDownRight => Some((-1, -1)),
            Self::SteerDownLeft => Some((1, -1)),
            _ => None,
        }
    }
}

/// The three toggle levers on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Levers {
    pub thrust: bool,
    pub systems: bool,
    pub confirm: bool,
}

impl Levers {
    pub fn new(thrust: bool, systems: bool, confirm: bool) -> Self {
        Self { thrust, systems, confirm }
    }

    pub fn all_on(&self) -> bool {
        self.thrust && self.systems && self.confirm
    }

    pub fn all_off(&self) -> bool {
        !self.thrust && !self.systems && !self.confirm
    }
}

/// Everything the state machine reads from the panel in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSample {
    pub levers: Levers,
    pub action: ControlAction,
}

impl ControlSample {
    pub fn new(levers: Levers, action: ControlAction) -> Self {
        Self { levers, action }
    }
}

/// Source of lever positions and the current control action.
///
/// Implementations sample synchronously. A held key keeps reporting its action;
/// once released the source reports `ControlAction::Unused`.
pub trait ControlInputSource {
    fn sample(&mut self) -> ControlSample;
}

impl<T: ControlInputSource + ?Sized> ControlInputSource for &mut T {
    fn sample(&mut self) -> ControlSample {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_maps_known_codes() {
        assert_eq!(ControlAction::from_code(0), ControlAction::Unused);
        assert_eq!(ControlAction::from_code(1), ControlAction::SteerUp);
        assert_eq!(ControlAction::from_code(11), ControlAction::RaiseSpeed);
        assert_eq!(ControlAction::from_code(12), ControlAction::LowerSpeed);
    }

    #[test]
    fn from_code_out_of_range_is_unused() {
        assert_eq!(ControlAction::from_code(13), ControlAction::Unused);
        assert_eq!(ControlAction::from_code(255), ControlAction::Unused);
    }

    #[test]
    fn diagonals_adjust_both_axes() {
        assert_eq!(ControlAction::SteerUpLeft.steering_delta(), Some((1, 1)));
        assert_eq!(ControlAction::SteerDownRight.steering_delta(), Some((-1, -1)));
        assert_eq!(ControlAction::RaiseGear.steering_delta(), None);
        assert_eq!(ControlAction::Unused.steering_delta(), None);
    }

    #[test]
    fn levers_all_on_all_off() {
        assert!(Levers::default().all_off());
        assert!(!Levers::default().all_on());
        assert!(Levers::new(true, true, true).all_on());
        let mixed = Levers::new(true, false, false);
        assert!(!mixed.all_on());
        assert!(!mixed.all_off());
    }
}
