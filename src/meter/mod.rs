//! Geometry builders for the drawn meter modes.
//!
//! - [`icon`]: rectangular battery with a terminal button, bolt and percentage cutouts
//! - [`circle`]: arc meter with a pulsing charging dot
//!
//! # Architecture
//!
//! Both builders sit behind [`MeterDrawable`], a closed enum the engine holds
//! for the active mode. Each builder:
//! 1. Precomputes size-derived layout in `on_size_changed`
//! 2. Emits an ordered [`DrawCommandList`] from `on_draw`
//! 3. Stops producing output (and cancels any wakeup) once disposed
//!
//! Resources shared across modes (color table, bolt, config, user toggles)
//! are passed per draw in a [`RenderContext`] so a mode switch never has to
//! copy them into the new builder.

mod circle;
mod icon;

use core::fmt::Write;

use heapless::String;

pub use circle::{CircleLayout, CircleMeter, STROKE_DIVISOR};
pub use icon::{
    BOLT_LEVEL_THRESHOLD,
    IconFrames,
    IconMeter,
    bolt_frame,
    bolt_is_opaque,
    bolt_opacity_fraction,
    fill_fraction,
};

use crate::battery::{BatteryState, LEVEL_MAX};
use crate::bolt::BoltShape;
use crate::commands::{DrawCommandList, TEXT_LEN};
use crate::config::MeterConfig;
use crate::levels::ColorLevelTable;
use crate::mode::MeterMode;

// =============================================================================
// Viewport
// =============================================================================

/// Size and padding of the meter view, in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub padding_left: i32,
    pub padding_top: i32,
    pub padding_right: i32,
    pub padding_bottom: i32,
}

impl Viewport {
    /// Viewport without padding.
    pub const fn new(
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            width,
            height,
            padding_left: 0,
            padding_top: 0,
            padding_right: 0,
            padding_bottom: 0,
        }
    }

    pub const fn with_padding(
        self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> Self {
        Self {
            padding_left: left,
            padding_top: top,
            padding_right: right,
            padding_bottom: bottom,
            ..self
        }
    }

    /// Width inside the padding.
    #[inline]
    pub const fn content_width(&self) -> i32 { self.width - self.padding_left - self.padding_right }

    /// Height inside the padding.
    #[inline]
    pub const fn content_height(&self) -> i32 { self.height - self.padding_top - self.padding_bottom }

    /// True when there is nothing to draw into.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.width <= 0 || self.height <= 0 }
}

// =============================================================================
// Render Context
// =============================================================================

/// Per-draw inputs owned by the engine.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub config: &'a MeterConfig,
    pub colors: &'a ColorLevelTable,
    pub bolt: &'a BoltShape,
    pub show_percent: bool,
    pub power_save_active: bool,
}

impl RenderContext<'_> {
    /// Level color, honouring power-save mode.
    #[inline]
    pub fn level_color(
        &self,
        level: u8,
    ) -> embedded_graphics::pixelcolor::Rgb565 {
        self.colors.color_for_level(i32::from(level), self.power_save_active)
    }

    /// Whether a percentage label should be drawn.
    ///
    /// `level` is the level being displayed; `battery` supplies the reported
    /// level for the "hide 100%" rule.
    pub fn shows_percent(
        &self,
        battery: &BatteryState,
        level: u8,
    ) -> bool {
        let hide_100 = battery.level == Some(LEVEL_MAX) && !self.config.show_100_percent;
        level > self.config.critical_level && self.show_percent && !hide_100
    }

    /// Percentage label for `level`.
    pub fn percent_text(
        &self,
        level: u8,
    ) -> String<TEXT_LEN> {
        let value = if self.config.single_digit_percent { level / 10 } else { level };
        let mut text = String::new();
        // u8 never exceeds three digits
        write!(text, "{value}").ok();
        text
    }
}

// =============================================================================
// Meter Drawable
// =============================================================================

/// Geometry builder for the active mode.
#[derive(Clone, Debug)]
pub enum MeterDrawable {
    Icon(IconMeter),
    Circle(CircleMeter),
}

impl MeterDrawable {
    /// Builder for `mode`, or `None` for modes this crate does not draw.
    pub fn for_mode(
        mode: MeterMode,
        viewport: &Viewport,
        config: &MeterConfig,
    ) -> Option<Self> {
        let mut drawable = match mode {
            MeterMode::IconPortrait => Self::Icon(IconMeter::new()),
            MeterMode::Circle => Self::Circle(CircleMeter::new(config.wakeup_delay_ms)),
            MeterMode::Gone | MeterMode::Text => return None,
        };
        drawable.on_size_changed(viewport, config);
        Some(drawable)
    }

    pub fn on_size_changed(
        &mut self,
        viewport: &Viewport,
        config: &MeterConfig,
    ) {
        match self {
            Self::Icon(icon) => icon.on_size_changed(viewport),
            Self::Circle(circle) => circle.on_size_changed(viewport, config),
        }
    }

    pub fn on_draw(
        &mut self,
        battery: &BatteryState,
        ctx: &RenderContext<'_>,
    ) -> DrawCommandList {
        match self {
            Self::Icon(icon) => icon.on_draw(battery, ctx),
            Self::Circle(circle) => circle.on_draw(battery, ctx),
        }
    }

    /// Stop drawing and cancel any pending wakeup.
    pub fn dispose(&mut self) {
        match self {
            Self::Icon(icon) => icon.dispose(),
            Self::Circle(circle) => circle.dispose(),
        }
    }

    pub fn is_disposed(&self) -> bool {
        match self {
            Self::Icon(icon) => icon.is_disposed(),
            Self::Circle(circle) => circle.is_disposed(),
        }
    }

    /// Delay after which the builder wants another `on_draw`.
    pub fn next_wakeup_delay_ms(&self) -> Option<u32> {
        match self {
            Self::Icon(_) => None,
            Self::Circle(circle) => circle.next_wakeup_delay_ms(),
        }
    }
}
