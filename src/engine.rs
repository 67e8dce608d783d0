//! Meter engine: mode state machine and the single render entry point.
//!
//! The host pushes events in (telemetry, size, settings, demo commands) and
//! pulls draw commands out. Nothing here blocks or owns a timer:
//!
//! ```text
//! on_battery_changed / on_size_changed / set_mode / demo_*
//!          |
//!          v
//!   take_redraw_request() == true  -->  render()  -->  DrawCommandList
//!                                          |
//!                           next_wakeup_delay_ms() == Some(ms)
//!                                          |
//!                           host calls render() again after `ms`
//! ```
//!
//! # Visibility
//!
//! The meter is visible while a drawn mode is active and a battery is
//! present. Demo commands are ignored while invisible, and `render()` of an
//! invisible meter is empty.

use log::{debug, warn};

use crate::battery::{BatteryState, clamp_level};
use crate::bolt::BoltShape;
use crate::commands::DrawCommandList;
use crate::config::MeterConfig;
use crate::demo::{DemoCommand, DemoOverride};
use crate::error::{MeterError, Result};
use crate::levels::ColorLevelTable;
pub use crate::meter::Viewport;
use crate::meter::{MeterDrawable, RenderContext, STROKE_DIVISOR};
use crate::mode::MeterMode;

#[derive(Debug)]
pub struct MeterEngine {
    config: MeterConfig,
    colors: ColorLevelTable,
    bolt: BoltShape,

    mode: MeterMode,
    drawable: Option<MeterDrawable>,
    viewport: Viewport,

    battery: BatteryState,
    demo: Option<DemoOverride>,

    show_percent: bool,
    power_save_active: bool,
    visible: bool,
    redraw_requested: bool,
}

impl MeterEngine {
    /// Build an engine in the default icon mode.
    ///
    /// Fails on a malformed configuration (bad fractions, empty or unsorted
    /// color table, degenerate bolt).
    pub fn new(config: MeterConfig) -> Result<Self> {
        config.validate()?;
        let colors = ColorLevelTable::new(&config.color_levels)?;
        let bolt = BoltShape::from_points(&config.bolt_points)?;

        let mode = MeterMode::default();
        let viewport = Viewport::default();
        let drawable = MeterDrawable::for_mode(mode, &viewport, &config);
        let battery = BatteryState::unknown();
        let visible = drawable.is_some() && battery.present;

        Ok(Self {
            config,
            colors,
            bolt,
            mode,
            drawable,
            viewport,
            battery,
            demo: None,
            show_percent: true,
            power_save_active: false,
            visible,
            redraw_requested: visible,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn mode(&self) -> MeterMode { self.mode }

    #[inline]
    pub fn is_visible(&self) -> bool { self.visible }

    #[inline]
    pub fn is_demo_active(&self) -> bool { self.demo.is_some() }

    #[inline]
    pub fn show_percent(&self) -> bool { self.show_percent }

    #[inline]
    pub fn config(&self) -> &MeterConfig { &self.config }

    /// Live telemetry, ignoring any demo override.
    #[inline]
    pub fn live_battery(&self) -> &BatteryState { &self.battery }

    /// State the next render will draw: the demo override when active,
    /// live telemetry otherwise.
    pub fn effective_battery(&self) -> BatteryState {
        match &self.demo {
            Some(demo) => demo.battery_state(&self.battery),
            None => self.battery.clone(),
        }
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool { core::mem::take(&mut self.redraw_requested) }

    fn invalidate_if_visible(&mut self) {
        if self.visible {
            self.redraw_requested = true;
        }
    }

    // =========================================================================
    // Mode and Settings
    // =========================================================================

    /// Switch meter mode. No-op when `mode` is already active.
    pub fn set_mode(
        &mut self,
        mode: MeterMode,
    ) {
        if mode == self.mode {
            return;
        }
        debug!("meter mode {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;

        if let Some(old) = self.drawable.as_mut() {
            old.dispose();
        }
        self.drawable = MeterDrawable::for_mode(mode, &self.viewport, &self.config);

        let present = self.effective_battery().present;
        self.visible = self.drawable.is_some() && present;
        if self.visible {
            self.redraw_requested = true;
        }
    }

    pub fn set_show_percent(
        &mut self,
        show_percent: bool,
    ) {
        self.show_percent = show_percent;
        self.invalidate_if_visible();
    }

    pub fn set_power_save_active(
        &mut self,
        active: bool,
    ) {
        self.power_save_active = active;
        self.invalidate_if_visible();
    }

    /// Apply the user's battery style setting and percent toggle.
    ///
    /// Modes without a drawn meter never show the inside percentage.
    pub fn apply_settings(
        &mut self,
        style: i32,
        show_percent: bool,
    ) {
        let mode = MeterMode::from_style_setting(style);
        self.set_mode(mode);
        self.set_show_percent(show_percent && mode.allows_percent());
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    /// New telemetry. Replaces the live snapshot wholesale; an out-of-range
    /// level is clamped to `0..=100`.
    pub fn on_battery_changed(
        &mut self,
        mut battery: BatteryState,
    ) {
        battery.level = battery.level.map(|level| clamp_level(i32::from(level)));
        self.battery = battery;
        if self.drawable.is_some() {
            self.visible = true;
            self.redraw_requested = true;
        }
    }

    pub fn on_size_changed(
        &mut self,
        viewport: Viewport,
    ) {
        self.viewport = viewport;
        if let Some(drawable) = self.drawable.as_mut() {
            drawable.on_size_changed(&viewport, &self.config);
        }
        self.invalidate_if_visible();
    }

    /// Preferred size for the offered `(width, height)`.
    ///
    /// The circle grows its height to leave room for the stroke and stays
    /// square; other modes take what they are given.
    pub fn measure(
        &self,
        width: i32,
        height: i32,
    ) -> (i32, i32) {
        if self.mode == MeterMode::Circle {
            let height = height + (STROKE_DIVISOR / 3.0) as i32;
            (height, height)
        } else {
            (width, height)
        }
    }

    // =========================================================================
    // Demo Mode
    // =========================================================================

    /// Enter demo mode, seeded from live telemetry.
    pub fn demo_enter(&mut self) {
        if !self.visible || self.demo.is_some() {
            return;
        }
        let demo = DemoOverride::seeded_from(&self.battery);
        debug!("demo enter level={:?} plugged={}", demo.level, demo.plugged);
        self.demo = Some(demo);
    }

    /// Leave demo mode; the next render uses live telemetry again.
    pub fn demo_exit(&mut self) {
        if !self.visible || self.demo.take().is_none() {
            return;
        }
        debug!("demo exit");
        self.redraw_requested = true;
    }

    /// Override demo level and/or plug state. Levels are clamped to `0..=100`.
    pub fn demo_set_battery(
        &mut self,
        level: Option<i32>,
        plugged: Option<bool>,
    ) {
        if !self.visible {
            return;
        }
        if let Some(demo) = self.demo.as_mut() {
            demo.apply(level, plugged);
            debug!("demo battery level={:?} plugged={}", demo.level, demo.plugged);
            self.redraw_requested = true;
        }
    }

    /// Parse and apply a raw demo command.
    ///
    /// Malformed payloads are logged and ignored; demo state is unchanged.
    pub fn dispatch_demo(
        &mut self,
        command: &str,
        level: Option<&str>,
        plugged: Option<&str>,
    ) -> Result<()> {
        match DemoCommand::parse(command, level, plugged) {
            Ok(DemoCommand::Enter) => self.demo_enter(),
            Ok(DemoCommand::Exit) => self.demo_exit(),
            Ok(DemoCommand::Battery { level, plugged }) => self.demo_set_battery(level, plugged),
            Err(err @ MeterError::InvalidDemoPayload(_)) => {
                warn!("ignoring demo command {command}: {err}");
                return Err(err);
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the draw commands for the current state.
    ///
    /// Empty when no drawn mode is active, the meter is invisible, or the
    /// battery level is still unknown.
    pub fn render(&mut self) -> DrawCommandList {
        self.redraw_requested = false;
        if !self.visible {
            return DrawCommandList::new();
        }
        let battery = self.effective_battery();
        let ctx = RenderContext {
            config: &self.config,
            colors: &self.colors,
            bolt: &self.bolt,
            show_percent: self.show_percent,
            power_save_active: self.power_save_active,
        };
        match self.drawable.as_mut() {
            Some(drawable) => drawable.on_draw(&battery, &ctx),
            None => DrawCommandList::new(),
        }
    }

    /// Delay after which the host should call [`render`](Self::render) again,
    /// while the charging pulse is running.
    pub fn next_wakeup_delay_ms(&self) -> Option<u32> {
        if !self.visible {
            return None;
        }
        self.drawable.as_ref().and_then(MeterDrawable::next_wakeup_delay_ms)
    }
}
