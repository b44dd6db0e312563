//! The 4x4 control keypad: key layout, per-poll key tracking and the held-key latch.

use std::collections::HashSet;

use crate::ControlAction;

pub const MATRIX_ROWS: usize = 4;
pub const MATRIX_COLUMNS: usize = 4;

/// Printed key labels, row by row.
const LABELS: [[char; MATRIX_COLUMNS]; MATRIX_ROWS] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Position of a key on the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPos {
    pub row: usize,
    pub col: usize,
}

impl KeyPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Maps keypad positions and labels to control actions.
#[derive(Debug, Clone)]
pub struct KeyMatrix {
    actions: [[ControlAction; MATRIX_COLUMNS]; MATRIX_ROWS],
}

impl Default for KeyMatrix {
    fn default() -> Self {
        Self::lander_panel()
    }
}

impl KeyMatrix {
    /// The lander control panel: steering pad on the left, gear and speed down the right column.
    pub fn lander_panel() -> Self {
        use ControlAction::*;
        Self {
            actions: [
                [SteerUpLeft, SteerUp, SteerUpRight, LowerGear],
                [SteerLeft, Unused, SteerRight, RaiseGear],
                [SteerDownLeft, SteerDown, SteerDownRight, RaiseSpeed],
                [Unused, Unused, Unused, LowerSpeed],
            ],
        }
    }

    /// Action bound to `pos`, `None` if the position is off the matrix.
    pub fn action_at(&self, pos: KeyPos) -> Option<ControlAction> {
        self.actions.get(pos.row)?.get(pos.col).copied()
    }

    /// Position of the key printed with `label`.
    pub fn position_of(label: char) -> Option<KeyPos> {
        let label = label.to_ascii_uppercase();
        LABELS.iter().enumerate().find_map(|(row, keys)| {
            keys.iter().position(|&k| k == label).map(|col| KeyPos::new(row, col))
        })
    }

    /// Label printed on the key at `pos`.
    pub fn label_at(pos: KeyPos) -> Option<char> {
        LABELS.get(pos.row)?.get(pos.col).copied()
    }

    /// Action bound to the key printed with `label`.
    pub fn action_for_label(&self, label: char) -> Option<ControlAction> {
        Self::position_of(label).and_then(|pos| self.action_at(pos))
    }
}

/// Key state for the current poll, plus the latched action.
#[derive(Debug, Default)]
pub struct KeypadState {
    matrix: KeyMatrix,
    /// Keys currently held down.
    keys_held: HashSet<KeyPos>,
    /// Keys pressed this poll.
    keys_pressed: HashSet<KeyPos>,
    /// Keys released this poll.
    keys_released: HashSet<KeyPos>,
    /// Most recently pressed key, cleared when it is released.
    latched: Option<KeyPos>,
}

impl KeypadState {
    pub fn new(matrix: KeyMatrix) -> Self {
        Self {
            matrix,
            ..Self::default()
        }
    }

    /// Clear per-poll state. Call at the start of each poll.
    pub fn begin_poll(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a key event.
    pub fn process_key(&mut self, pos: KeyPos, state: KeyState) {
        match state {
            KeyState::Pressed => {
                if self.keys_held.insert(pos) {
                    self.keys_pressed.insert(pos);
                }
                self.latched = Some(pos);
            }
            KeyState::Released => {
                self.keys_held.remove(&pos);
                self.keys_released.insert(pos);
                if self.latched == Some(pos) {
                    self.latched = None;
                }
            }
        }
    }

    /// Release every held key.
    pub fn release_all(&mut self) {
        let held: Vec<KeyPos> = self.keys_held.iter().copied().collect();
        for pos in held {
            self.process_key(pos, KeyState::Released);
        }
    }

    pub fn is_key_held(&self, pos: KeyPos) -> bool {
        self.keys_held.contains(&pos)
    }

    pub fn is_key_pressed(&self, pos: KeyPos) -> bool {
        self.keys_pressed.contains(&pos)
    }

    pub fn is_key_released(&self, pos: KeyPos) -> bool {
        self.keys_released.contains(&pos)
    }

    /// Action of the latched key, `Unused` when nothing is held.
    pub fn current_action(&self) -> ControlAction {
        self.latched
            .and_then(|pos| self.matrix.action_at(pos))
            .unwrap_or(ControlAction::Unused)
    }
}
