//! Core engine types shared by the lander crates.
//!
//! This crate provides:
//! - Monotonic clocks (real and manual)
//! - Fixed-period tick pacing for the poll loop

pub mod time;

pub use time::*;

// Re-export commonly used types
pub use glam::IVec2;
