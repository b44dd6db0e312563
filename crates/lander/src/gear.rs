//! Landing gear animation as an explicit transition table.

use crate::state::GearState;

/// Frame index after one tick of `state`, starting from `index`.
///
/// The index never leaves `0..=down_index`.
pub fn next_frame(state: GearState, index: usize, down_index: usize) -> usize {
    match state {
        GearState::Idle => index.min(down_index),
        GearState::Lowering => (index + 1).min(down_index),
        GearState::Raising => index.saturating_sub(1),
    }
}

/// Gear state after the animation reached `index`. Either end of travel stops it.
pub fn settle(state: GearState, index: usize, down_index: usize) -> GearState {
    if index == 0 || index == down_index {
        GearState::Idle
    } else {
        state
    }
}
