//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` library cannot, so
//! they live here rather than in the meter crate.

use std::time::Duration;

/// Main loop tick (~50 FPS). The loop sleeps if a tick finishes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Interval between synthetic discharge steps while auto-drain is on.
pub const DRAIN_STEP: Duration = Duration::from_millis(750);
