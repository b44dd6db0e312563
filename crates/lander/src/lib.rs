//! Lunar lander approach game.
//!
//! The lander closes on a drifting mother ship. The pilot arms the levers,
//! controls speed, steers against the drift, and lowers the landing gear on
//! final approach. [`ApproachStateMachine`] advances the game one polling tick
//! at a time and [`Outcome`] judges the landing once the distance runs out.

pub mod config;
pub mod drift;
pub mod gear;
pub mod machine;
pub mod outcome;
pub mod state;

pub use config::{DriftModel, InvalidConfig, LanderConfig};
pub use drift::{DriftSequence, DriftSource, RandomDrift};
pub use machine::ApproachStateMachine;
pub use outcome::Outcome;
pub use state::{ApproachPhase, GearState, LanderSnapshot, LanderState};
