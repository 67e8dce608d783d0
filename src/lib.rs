//! Battery meter engine - turns battery telemetry into meter geometry.
//!
//! This crate computes everything a status-bar battery meter needs to draw,
//! without owning a display, a clock or any I/O:
//!
//! - [`battery`]: Battery snapshot value types
//! - [`levels`]: Threshold-based level color resolution
//! - [`animations`]: Charging-dot alpha pulse state machine
//! - [`meter`]: Icon (portrait) and circle geometry builders
//! - [`engine`]: Mode state machine and the `render()` entry point
//! - [`raster`]: Reference software backend for the produced draw commands
//!
//! # Data Flow
//!
//! ```text
//! telemetry --> MeterEngine --> active MeterDrawable --> DrawCommandList --> backend
//!                                   |         |
//!                          ColorLevelTable  ChargeAnimator --> next_wakeup_delay_ms()
//! ```
//!
//! # no_std Compatibility
//!
//! The library is `no_std` and allocation-free. All collections are
//! fixed-capacity `heapless` containers. Tests run with `std` (via `cfg_attr`).

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod battery;
pub mod bolt;
pub mod colors;
pub mod commands;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod levels;
pub mod meter;
pub mod mode;
pub mod raster;
pub mod styles;

// Re-export commonly used items
pub use battery::{BatteryState, BatteryStatus, PluggedType};
pub use commands::{DrawCommand, DrawCommandList};
pub use config::MeterConfig;
pub use engine::{MeterEngine, Viewport};
pub use error::{MeterError, Result};
pub use mode::MeterMode;
