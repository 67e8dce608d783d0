//! Threshold-based color selection for battery levels.
//!
//! The table is an ordered list of `(threshold, color)` rows. A level maps to
//! the first row whose threshold is at or above it; a level beyond every
//! threshold degrades to the last row instead of failing. Power-save mode
//! always uses the last row.

use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::config::{ColorLevel, MAX_COLOR_LEVELS};
use crate::error::{MeterError, Result};

/// Validated, immutable color level table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorLevelTable {
    levels: Vec<ColorLevel, MAX_COLOR_LEVELS>,
}

impl ColorLevelTable {
    /// Build a table, rejecting empty or non-ascending input.
    pub fn new(levels: &[ColorLevel]) -> Result<Self> {
        if levels.is_empty() {
            return Err(MeterError::EmptyColorTable);
        }
        for (index, pair) in levels.windows(2).enumerate() {
            if pair[0].threshold >= pair[1].threshold {
                return Err(MeterError::UnsortedColorTable { index: index + 1 });
            }
        }
        let levels = Vec::from_slice(levels).map_err(|_| MeterError::CapacityExceeded("color levels"))?;
        Ok(Self { levels })
    }

    /// Color for a percentage.
    pub fn color_for_level(
        &self,
        percent: i32,
        power_save_active: bool,
    ) -> Rgb565 {
        if power_save_active {
            return self.fallback();
        }
        self.levels
            .iter()
            .find(|level| percent <= i32::from(level.threshold))
            .map_or_else(|| self.fallback(), |level| level.color)
    }

    /// First row's color. Used for the critical warning glyph.
    #[inline]
    pub fn first(&self) -> Rgb565 { self.levels[0].color }

    /// Last row's color (power-save and out-of-range fallback).
    #[inline]
    pub fn fallback(&self) -> Rgb565 { self.levels[self.levels.len() - 1].color }
}
