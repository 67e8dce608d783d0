//! Circular arc meter.
//!
//! A background ring with a level arc on top, both starting at 12 o'clock
//! and sweeping clockwise `3.6` degrees per percent. While plugged in, a
//! dot in the middle pulses with the [`ChargeAnimator`] alpha; otherwise the
//! middle carries the percentage or the warning glyph.
//!
//! # Layout
//!
//! Everything size-dependent is computed once per size change into a
//! [`CircleLayout`]. The text baseline uses the height of "99" regardless of
//! the digits shown, so one, two and three digit labels share a baseline.

use crate::animations::ChargeAnimator;
use crate::battery::{BatteryState, BatteryStatus, LEVEL_MAX};
use crate::colors::Paint;
use crate::commands::{DrawCommand, DrawCommandList, TextRun, push_command};
use crate::config::MeterConfig;
use crate::geometry::RectF;
use crate::meter::{RenderContext, Viewport};
use crate::styles;

/// Circle diameter divided by this gives the ring stroke width.
pub const STROKE_DIVISOR: f32 = 6.5;

/// 12 o'clock in the arc angle convention.
const START_DEG: f32 = 270.0;

const FULL_SWEEP_DEG: f32 = 360.0;

const DEG_PER_PERCENT: f32 = 3.6;

const UNKNOWN_TEXT: &str = "?";

// =============================================================================
// Layout
// =============================================================================

/// Size-derived geometry of the circle meter.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CircleLayout {
    /// Diameter of the outer edge of the ring.
    pub size: f32,
    pub stroke_width: f32,
    /// Ring centerline bounds (outer bounds inset by half the stroke).
    pub arc_rect: RectF,
    /// Charging dot bounds, half the ring size, centred on it.
    pub dot_rect: RectF,
    pub text_x: f32,
    pub text_y: f32,
    pub text_size: f32,
}

impl CircleLayout {
    pub fn compute(
        viewport: &Viewport,
        density: f32,
    ) -> Self {
        let size = viewport.width.min(viewport.height).max(0) as f32;
        let stroke_width = size / STROKE_DIVISOR;
        let half_stroke = stroke_width / 2.0;
        let pad_left = viewport.padding_left as f32;

        let arc_rect = RectF::new(
            pad_left + half_stroke,
            half_stroke,
            size - half_stroke + pad_left,
            size - half_stroke,
        );

        let dot_rect = RectF::new(
            arc_rect.left / 2.0,
            arc_rect.top / 2.0,
            arc_rect.right / 2.0,
            arc_rect.bottom / 2.0,
        );
        let dot_rect = dot_rect.offset_to(
            arc_rect.center_x() - dot_rect.width() / 2.0,
            arc_rect.center_y() - dot_rect.height() / 2.0,
        );

        let text_size = size / 2.0;
        let text_x = size / 2.0 + pad_left;
        // +density nudges the baseline down to balance rounding at every scale
        let text_y = size / 2.0 + styles::digit_bounds_height(text_size) / 2.0 - half_stroke + density;

        Self {
            size,
            stroke_width,
            arc_rect,
            dot_rect,
            text_x,
            text_y,
            text_size,
        }
    }

    /// The dot as a ring whose stroke covers it from centre to edge.
    fn dot_ring(&self) -> (RectF, f32) {
        let radius = self.dot_rect.width() / 2.0;
        let inset = radius / 2.0;
        let rect = RectF::new(
            self.dot_rect.left + inset,
            self.dot_rect.top + inset,
            self.dot_rect.right - inset,
            self.dot_rect.bottom - inset,
        );
        (rect, radius)
    }

    fn text(
        &self,
        text: &str,
    ) -> TextRun {
        TextRun::new(text, self.text_x, self.text_y, self.text_size)
    }
}

// =============================================================================
// Circle Meter
// =============================================================================

#[derive(Clone, Debug)]
pub struct CircleMeter {
    layout: CircleLayout,
    animator: ChargeAnimator,
    disposed: bool,
}

impl CircleMeter {
    pub fn new(wakeup_delay_ms: u32) -> Self {
        Self {
            layout: CircleLayout::default(),
            animator: ChargeAnimator::new(wakeup_delay_ms),
            disposed: false,
        }
    }

    #[inline]
    pub fn layout(&self) -> &CircleLayout { &self.layout }

    pub fn on_size_changed(
        &mut self,
        viewport: &Viewport,
        config: &MeterConfig,
    ) {
        self.layout = CircleLayout::compute(viewport, config.density);
        self.animator.reset();
    }

    pub fn dispose(&mut self) {
        self.animator.cancel();
        self.disposed = true;
    }

    #[inline]
    pub fn is_disposed(&self) -> bool { self.disposed }

    #[inline]
    pub fn next_wakeup_delay_ms(&self) -> Option<u32> {
        if self.disposed {
            return None;
        }
        self.animator.next_wakeup_delay_ms()
    }

    pub fn on_draw(
        &mut self,
        battery: &BatteryState,
        ctx: &RenderContext<'_>,
    ) -> DrawCommandList {
        let mut commands = DrawCommandList::new();
        if self.disposed || self.layout.size <= 0.0 {
            return commands;
        }
        let Some(reported) = battery.level else {
            self.animator.reset();
            return commands;
        };

        let dot_alpha = self.animator.tick(battery);
        let config = ctx.config;
        let unknown_status = battery.status == BatteryStatus::Unknown;

        let (paint, level) = if unknown_status {
            (config.frame_paint, LEVEL_MAX)
        } else {
            let level = if battery.is_full() { LEVEL_MAX } else { reported };
            (Paint::opaque(ctx.level_color(reported)), level)
        };

        let layout = &self.layout;
        push_command(
            &mut commands,
            DrawCommand::StrokeArc {
                rect: layout.arc_rect,
                start_deg: START_DEG,
                sweep_deg: FULL_SWEEP_DEG,
                paint: config.frame_paint,
                stroke_width: layout.stroke_width,
            },
        );
        push_command(
            &mut commands,
            DrawCommand::StrokeArc {
                rect: layout.arc_rect,
                start_deg: START_DEG,
                sweep_deg: DEG_PER_PERCENT * f32::from(level),
                paint,
                stroke_width: layout.stroke_width,
            },
        );

        if unknown_status {
            push_command(
                &mut commands,
                DrawCommand::DrawText {
                    text: layout.text(UNKNOWN_TEXT),
                    paint,
                },
            );
            // Start the pulse over once a real status arrives
            self.animator.restart_alpha();
        } else if battery.plugged() {
            if dot_alpha > 0 {
                let (rect, radius) = layout.dot_ring();
                push_command(
                    &mut commands,
                    DrawCommand::StrokeArc {
                        rect,
                        start_deg: START_DEG,
                        sweep_deg: FULL_SWEEP_DEG,
                        paint: config.bolt_paint.alpha(dot_alpha),
                        stroke_width: radius,
                    },
                );
            }
        } else {
            self.animator.reset();
            if ctx.shows_percent(battery, level) {
                push_command(
                    &mut commands,
                    DrawCommand::DrawText {
                        text: layout.text(&ctx.percent_text(level)),
                        paint,
                    },
                );
            } else if level <= config.critical_level {
                push_command(
                    &mut commands,
                    DrawCommand::DrawText {
                        text: layout.text(&config.warning_text),
                        paint: Paint::opaque(ctx.colors.first()),
                    },
                );
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::PluggedType;
    use crate::bolt::BoltShape;
    use crate::colors::{LOW_LEVEL, WHITE};
    use crate::config::DEFAULT_BOLT_POINTS;
    use crate::levels::ColorLevelTable;

    struct Fixture {
        config: MeterConfig,
        colors: ColorLevelTable,
        bolt: BoltShape,
    }

    impl Fixture {
        fn new() -> Self {
            let config = MeterConfig::default();
            let colors = ColorLevelTable::new(&config.color_levels).unwrap();
            let bolt = BoltShape::from_points(&DEFAULT_BOLT_POINTS).unwrap();
            Self { config, colors, bolt }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext {
                config: &self.config,
                colors: &self.colors,
                bolt: &self.bolt,
                show_percent: true,
                power_save_active: false,
            }
        }
    }

    fn circle() -> CircleMeter {
        let mut circle = CircleMeter::new(50);
        circle.on_size_changed(&Viewport::new(26, 26), &MeterConfig::default());
        circle
    }

    fn sweep_of(command: &DrawCommand) -> f32 {
        match command {
            DrawCommand::StrokeArc { sweep_deg, .. } => *sweep_deg,
            other => panic!("expected arc, got {other:?}"),
        }
    }

    fn state(
        level: i32,
        plugged: PluggedType,
        status: BatteryStatus,
    ) -> BatteryState {
        BatteryState::with_level(level, plugged, status)
    }

    #[test]
    fn test_layout_for_square_view() {
        let layout = CircleLayout::compute(&Viewport::new(26, 40), 1.0);
        assert_eq!(layout.size, 26.0, "diameter is the shorter side");
        assert_eq!(layout.stroke_width, 4.0);
        assert_eq!(layout.arc_rect, RectF::new(2.0, 2.0, 24.0, 24.0));
        assert_eq!(layout.dot_rect, RectF::new(7.5, 7.5, 18.5, 18.5));
        assert_eq!(layout.text_x, 13.0);
        assert_eq!(layout.text_size, 13.0);
    }

    #[test]
    fn test_layout_shifts_with_left_padding() {
        let layout = CircleLayout::compute(&Viewport::new(26, 26).with_padding(4, 0, 0, 0), 1.0);
        assert_eq!(layout.arc_rect.left, 6.0);
        assert_eq!(layout.text_x, 17.0);
        assert_eq!(layout.dot_rect.center_x(), layout.arc_rect.center_x());
    }

    #[test]
    fn test_sweep_follows_level() {
        let fixture = Fixture::new();
        let mut circle = circle();

        let commands = circle.on_draw(&state(50, PluggedType::None, BatteryStatus::Discharging), &fixture.ctx());
        assert_eq!(sweep_of(&commands[0]), 360.0, "background ring is always full");
        assert_eq!(sweep_of(&commands[1]), 180.0);

        let commands = circle.on_draw(&state(100, PluggedType::None, BatteryStatus::Discharging), &fixture.ctx());
        assert_eq!(sweep_of(&commands[1]), 360.0);
    }

    #[test]
    fn test_full_status_forces_full_sweep() {
        let fixture = Fixture::new();
        let commands = circle().on_draw(&state(97, PluggedType::None, BatteryStatus::Full), &fixture.ctx());
        assert_eq!(sweep_of(&commands[1]), 360.0);
    }

    #[test]
    fn test_unknown_status_draws_question_mark() {
        let fixture = Fixture::new();
        let commands = circle().on_draw(&state(40, PluggedType::None, BatteryStatus::Unknown), &fixture.ctx());

        assert_eq!(commands.len(), 3);
        match &commands[1] {
            DrawCommand::StrokeArc { sweep_deg, paint, .. } => {
                assert_eq!(*sweep_deg, 360.0);
                assert_eq!(*paint, fixture.config.frame_paint, "unknown ring uses the background paint");
            }
            other => panic!("expected arc, got {other:?}"),
        }
        match &commands[2] {
            DrawCommand::DrawText { text, .. } => assert_eq!(text.text.as_str(), "?"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status_restarts_pulse() {
        let fixture = Fixture::new();
        let mut circle = circle();
        let plugged_unknown = state(100, PluggedType::Ac, BatteryStatus::Unknown);
        circle.on_draw(&plugged_unknown, &fixture.ctx());
        assert_eq!(circle.next_wakeup_delay_ms(), Some(50), "scheduled frame is kept");

        let commands = circle.on_draw(&state(40, PluggedType::Ac, BatteryStatus::Charging), &fixture.ctx());
        match &commands[2] {
            DrawCommand::StrokeArc { paint, .. } => assert_eq!(paint.alpha, 5, "pulse starts over"),
            other => panic!("expected dot arc, got {other:?}"),
        }
    }

    #[test]
    fn test_charging_draws_dot_and_schedules() {
        let fixture = Fixture::new();
        let mut circle = circle();
        let battery = state(40, PluggedType::Ac, BatteryStatus::Charging);

        let commands = circle.on_draw(&battery, &fixture.ctx());
        assert_eq!(commands.len(), 3, "no percentage while plugged");
        match &commands[2] {
            DrawCommand::StrokeArc { paint, stroke_width, rect, .. } => {
                assert_eq!(paint.alpha, 5, "first pulse frame");
                assert_eq!(paint.color, fixture.config.bolt_paint.color);
                assert_eq!(*stroke_width, rect.width(), "stroke covers the dot from centre to edge");
            }
            other => panic!("expected dot arc, got {other:?}"),
        }
        assert_eq!(circle.next_wakeup_delay_ms(), Some(50));

        let commands = circle.on_draw(&battery, &fixture.ctx());
        match &commands[2] {
            DrawCommand::StrokeArc { paint, .. } => assert_eq!(paint.alpha, 15),
            other => panic!("expected dot arc, got {other:?}"),
        }
    }

    #[test]
    fn test_unplugged_shows_percentage_and_stops_pulse() {
        let fixture = Fixture::new();
        let mut circle = circle();
        circle.on_draw(&state(40, PluggedType::Ac, BatteryStatus::Charging), &fixture.ctx());

        let commands = circle.on_draw(&state(40, PluggedType::None, BatteryStatus::Discharging), &fixture.ctx());
        assert_eq!(circle.next_wakeup_delay_ms(), None);
        match &commands[2] {
            DrawCommand::DrawText { text, paint } => {
                assert_eq!(text.text.as_str(), "40");
                assert_eq!(paint.color, WHITE);
            }
            other => panic!("expected percentage, got {other:?}"),
        }
    }

    #[test]
    fn test_critical_shows_warning() {
        let fixture = Fixture::new();
        let commands = circle().on_draw(&state(4, PluggedType::None, BatteryStatus::Discharging), &fixture.ctx());
        match &commands[2] {
            DrawCommand::DrawText { text, paint } => {
                assert_eq!(text.text.as_str(), "!");
                assert_eq!(paint.color, LOW_LEVEL);
            }
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_level_draws_nothing() {
        let fixture = Fixture::new();
        assert!(circle().on_draw(&BatteryState::unknown(), &fixture.ctx()).is_empty());
    }

    #[test]
    fn test_size_change_restarts_pulse() {
        let fixture = Fixture::new();
        let mut circle = circle();
        let battery = state(40, PluggedType::Ac, BatteryStatus::Charging);
        for _ in 0..5 {
            circle.on_draw(&battery, &fixture.ctx());
        }
        circle.on_size_changed(&Viewport::new(30, 30), &fixture.config);
        assert_eq!(circle.next_wakeup_delay_ms(), None);
        let commands = circle.on_draw(&battery, &fixture.ctx());
        match &commands[2] {
            DrawCommand::StrokeArc { paint, .. } => assert_eq!(paint.alpha, 5),
            other => panic!("expected dot arc, got {other:?}"),
        }
    }
}
