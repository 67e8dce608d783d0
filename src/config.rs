//! Meter configuration: compile-time defaults plus the runtime [`MeterConfig`].
//!
//! Every tunable has a `const` default here, checked with `const` assertions
//! so a bad edit fails the build rather than a render. Hosts that load their
//! own resources build a [`MeterConfig`] instead; [`MeterConfig::validate`]
//! applies the same rules at runtime and the engine refuses to start on a
//! malformed configuration.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::{String, Vec};

use crate::colors::{BLACK, BOLT_ALPHA, FRAME_ALPHA, LOW_LEVEL, Paint, WHITE};
use crate::error::{MeterError, Result};

// =============================================================================
// Capacities
// =============================================================================

/// Maximum entries in the color level table.
pub const MAX_COLOR_LEVELS: usize = 8;

/// Maximum points in the bolt outline.
pub const MAX_BOLT_POINTS: usize = 16;

/// Maximum characters in the warning glyph string.
pub const WARNING_TEXT_LEN: usize = 4;

// =============================================================================
// Level Thresholds
// =============================================================================

/// Level at or below which the meter shows the warning glyph and an empty body.
pub const CRITICAL_LEVEL: u8 = 5;

/// Levels at or above this are drawn as completely full.
pub const FULL_LEVEL: u8 = 96;

/// Default color table as `(threshold, color)`, ascending. The last entry
/// doubles as the power-save color.
pub const DEFAULT_COLOR_LEVELS: [(u8, Rgb565); 2] = [(15, LOW_LEVEL), (100, WHITE)];

const _: () = assert!(CRITICAL_LEVEL < FULL_LEVEL);
const _: () = assert!(DEFAULT_COLOR_LEVELS[0].0 < DEFAULT_COLOR_LEVELS[1].0);
const _: () = assert!(CRITICAL_LEVEL < DEFAULT_COLOR_LEVELS[0].0);

// =============================================================================
// Icon Geometry
// =============================================================================

/// Height of the terminal button as a fraction of the icon height.
pub const BUTTON_HEIGHT_FRACTION: f32 = 0.105;

/// Left/top inset in pixels that keeps adjacent shapes from leaving an AA seam.
pub const SUBPIXEL_SMOOTHING_LEFT: f32 = 0.0;

/// Right/bottom inset counterpart of [`SUBPIXEL_SMOOTHING_LEFT`].
pub const SUBPIXEL_SMOOTHING_RIGHT: f32 = 0.0;

/// Bolt outline in integer resource units, normalised on load.
pub const DEFAULT_BOLT_POINTS: [(i32, i32); 7] =
    [(73, 0), (392, 0), (201, 259), (442, 259), (4, 703), (157, 334), (0, 334)];

const _: () = assert!(BUTTON_HEIGHT_FRACTION > 0.0 && BUTTON_HEIGHT_FRACTION < 1.0);

// =============================================================================
// Animation / Display
// =============================================================================

/// Delay between charging-dot animation frames.
pub const CHARGE_WAKEUP_MS: u32 = 50;

/// Display density (pixels per dp). Used for the circle text rounding nudge.
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Glyph shown instead of a percentage at critical level.
pub const DEFAULT_WARNING_TEXT: &str = "!";

// =============================================================================
// Runtime Configuration
// =============================================================================

/// One `(threshold, color)` row of the level table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ColorLevel {
    pub threshold: u8,
    pub color: Rgb565,
}

/// All resource-driven inputs to the meter.
#[derive(Clone, Debug)]
pub struct MeterConfig {
    pub color_levels: Vec<ColorLevel, MAX_COLOR_LEVELS>,
    pub bolt_points: Vec<(i32, i32), MAX_BOLT_POINTS>,
    pub frame_paint: Paint,
    pub charge_color: Rgb565,
    pub bolt_paint: Paint,
    pub critical_level: u8,
    pub button_height_fraction: f32,
    pub subpixel_smoothing_left: f32,
    pub subpixel_smoothing_right: f32,
    pub warning_text: String<WARNING_TEXT_LEN>,
    pub wakeup_delay_ms: u32,
    pub density: f32,
    pub show_100_percent: bool,
    pub single_digit_percent: bool,
}

impl MeterConfig {
    /// Check the scalar settings. Table and bolt contents are checked when
    /// they are turned into a `ColorLevelTable` / `BoltShape`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.button_height_fraction) {
            return Err(MeterError::InvalidFraction("button_height_fraction"));
        }
        if !(0.0..1.0).contains(&self.subpixel_smoothing_left) {
            return Err(MeterError::InvalidFraction("subpixel_smoothing_left"));
        }
        if !(0.0..1.0).contains(&self.subpixel_smoothing_right) {
            return Err(MeterError::InvalidFraction("subpixel_smoothing_right"));
        }
        if self.density <= 0.0 {
            return Err(MeterError::InvalidFraction("density"));
        }
        Ok(())
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        let mut color_levels = Vec::new();
        for (threshold, color) in DEFAULT_COLOR_LEVELS {
            color_levels.push(ColorLevel { threshold, color }).ok();
        }

        let mut bolt_points = Vec::new();
        for point in DEFAULT_BOLT_POINTS {
            bolt_points.push(point).ok();
        }

        let mut warning_text = String::new();
        warning_text.push_str(DEFAULT_WARNING_TEXT).ok();

        Self {
            color_levels,
            bolt_points,
            frame_paint: Paint::with_alpha(WHITE, FRAME_ALPHA),
            charge_color: WHITE,
            bolt_paint: Paint::with_alpha(BLACK, BOLT_ALPHA),
            critical_level: CRITICAL_LEVEL,
            button_height_fraction: BUTTON_HEIGHT_FRACTION,
            subpixel_smoothing_left: SUBPIXEL_SMOOTHING_LEFT,
            subpixel_smoothing_right: SUBPIXEL_SMOOTHING_RIGHT,
            warning_text,
            wakeup_delay_ms: CHARGE_WAKEUP_MS,
            density: DEFAULT_DENSITY,
            show_100_percent: false,
            single_digit_percent: false,
        }
    }
}
