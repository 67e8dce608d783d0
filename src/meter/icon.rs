//! Portrait battery icon.
//!
//! ```text
//!        +----+            <- button frame (middle half of the width)
//!   +----+    +----+       <- body frame top
//!   |              |
//!   |     /\       |       bolt frame: body inset by
//!   |    /  \      |       w/4.5 left, h/6 top, w/7 right, h/10 bottom
//!   |~~~~~~~~~~~~~~|       <- fill top
//!   |##############|
//!   +--------------+
//! ```
//!
//! # Single Outline
//!
//! Button and body are traced as one closed "keyhole" contour rather than two
//! rectangles, so a cutout (bolt or percentage) subtracts from the whole
//! battery in one operation and the level fill can be clipped from the same
//! path.
//!
//! # Render Order
//!
//! 1. Outline in the frame paint (cutouts show the backdrop)
//! 2. Outline clipped to the fill rectangle, in the level or charge color
//! 3. At most one of: opaque bolt, opaque percentage, warning glyph

use crate::battery::{BatteryState, LEVEL_MAX};
use crate::colors::Paint;
use crate::commands::{DrawCommand, DrawCommandList, TextRun, push_command};
use crate::config::{FULL_LEVEL, MeterConfig};
use crate::geometry::{Path, PointF, Polygon, RectF, polygon_from};
use crate::meter::{RenderContext, Viewport};
use crate::styles;

/// Bolt coverage at or below which the bolt is painted on top instead of cut out.
pub const BOLT_LEVEL_THRESHOLD: f32 = 0.3;

const TEXT_FRACTION_FULL: f32 = 0.45;
const TEXT_FRACTION_DEFAULT: f32 = 0.6;
const TEXT_FRACTION_SINGLE_DIGIT: f32 = 0.75;
const TEXT_BASELINE_FRACTION: f32 = 0.47;

const WARNING_SIZE_FRACTION: f32 = 0.75;
const WARNING_BASELINE_FRACTION: f32 = 0.48;

// =============================================================================
// Layout
// =============================================================================

/// Button and body rectangles of the icon.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct IconFrames {
    pub button: RectF,
    pub body: RectF,
}

impl IconFrames {
    pub fn compute(
        viewport: &Viewport,
        config: &MeterConfig,
    ) -> Self {
        let width = viewport.content_width();
        let height = viewport.content_height();
        let button_height = (height as f32 * config.button_height_fraction) as i32 as f32;

        let left = viewport.padding_left as f32;
        let top = viewport.padding_top as f32;
        let right = left + width as f32;
        let bottom = top + height as f32;

        let shoulder = round_half_up(width as f32 * 0.25);
        let smooth_l = config.subpixel_smoothing_left;
        let smooth_r = config.subpixel_smoothing_right;

        let button = RectF::new(
            left + shoulder + smooth_l,
            top + smooth_l,
            right - shoulder - smooth_r,
            top + button_height,
        );
        let body = RectF::new(
            left + smooth_l,
            top + button_height + smooth_l,
            right - smooth_r,
            bottom - smooth_r,
        );
        Self { button, body }
    }

    /// Y of the fill edge for `draw_frac`. A full battery fills the button too.
    pub fn fill_top(
        &self,
        draw_frac: f32,
    ) -> f32 {
        if draw_frac >= 1.0 {
            self.button.top
        } else {
            self.body.top + self.body.height() * (1.0 - draw_frac)
        }
    }

    /// Keyhole outline: button top edge, down to the body, around the body
    /// and back up.
    pub fn outline(&self) -> Polygon {
        let (b, f) = (&self.button, &self.body);
        polygon_from(&[
            PointF::new(b.left, b.top),
            PointF::new(b.right, b.top),
            PointF::new(b.right, f.top),
            PointF::new(f.right, f.top),
            PointF::new(f.right, f.bottom),
            PointF::new(f.left, f.bottom),
            PointF::new(f.left, f.top),
            PointF::new(b.left, f.top),
        ])
        .unwrap_or_default()
    }
}

/// Portion of the body to fill for `level`.
///
/// Near-full levels snap to 1.0 so no sliver of background remains, and
/// anything at or below `critical_level` shows an empty body.
pub fn fill_fraction(
    level: u8,
    critical_level: u8,
) -> f32 {
    if level >= FULL_LEVEL {
        1.0
    } else if level <= critical_level {
        0.0
    } else {
        f32::from(level) / f32::from(LEVEL_MAX)
    }
}

/// Rectangle the bolt outline is scaled into.
pub fn bolt_frame(body: &RectF) -> RectF {
    RectF::new(
        body.left + body.width() / 4.5,
        body.top + body.height() / 6.0,
        body.right - body.width() / 7.0,
        body.bottom - body.height() / 10.0,
    )
}

/// How much of the bolt height lies below the fill edge, in `[0, 1]`.
pub fn bolt_opacity_fraction(
    bolt: &RectF,
    fill_top: f32,
) -> f32 {
    let height = bolt.height();
    if height <= 0.0 {
        return 0.0;
    }
    ((bolt.bottom - fill_top) / height).clamp(0.0, 1.0)
}

#[inline]
pub fn bolt_is_opaque(opacity_fraction: f32) -> bool { opacity_fraction <= BOLT_LEVEL_THRESHOLD }

/// `floor(x + 0.5)` for the non-negative values layout deals in.
#[inline]
fn round_half_up(x: f32) -> f32 { (x + 0.5) as i32 as f32 }

// =============================================================================
// Icon Meter
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct IconMeter {
    viewport: Viewport,
    warning_size: f32,
    warning_y: f32,
    disposed: bool,
}

impl IconMeter {
    pub fn new() -> Self { Self::default() }

    pub fn on_size_changed(
        &mut self,
        viewport: &Viewport,
    ) {
        self.viewport = *viewport;
        let height = viewport.height as f32;
        self.warning_size = height * WARNING_SIZE_FRACTION;
        self.warning_y = (height + styles::ascent(self.warning_size)) * WARNING_BASELINE_FRACTION;
    }

    pub fn dispose(&mut self) { self.disposed = true; }

    #[inline]
    pub fn is_disposed(&self) -> bool { self.disposed }

    pub fn on_draw(
        &mut self,
        battery: &BatteryState,
        ctx: &RenderContext<'_>,
    ) -> DrawCommandList {
        let mut commands = DrawCommandList::new();
        if self.disposed || self.viewport.is_empty() {
            return commands;
        }
        let Some(level) = battery.level else {
            return commands;
        };

        let config = ctx.config;
        let plugged = battery.plugged();
        let frames = IconFrames::compute(&self.viewport, config);
        let fill_color = if plugged { config.charge_color } else { ctx.level_color(level) };
        let level_top = frames.fill_top(fill_fraction(level, config.critical_level));

        let mut shape = Path::from_polygon(frames.outline());

        // Plugged: bolt is either cut out or drawn on top
        let mut opaque_bolt = None;
        if plugged {
            let bolt_rect = bolt_frame(&frames.body);
            let bolt = ctx.bolt.polygon_in(&bolt_rect);
            if bolt_is_opaque(bolt_opacity_fraction(&bolt_rect, level_top)) {
                opaque_bolt = Some(bolt);
            } else {
                shape.subtract_polygon(bolt);
            }
        }

        // Unplugged: same choice for the percentage
        let mut opaque_text = None;
        if !plugged && ctx.shows_percent(battery, level) {
            let text = self.percent_run(battery, level, ctx);
            if level_top > text.y {
                opaque_text = Some(text);
            } else {
                shape.subtract_text(text);
            }
        }

        let fill = shape.intersect_rect(&frames.body.with_top(level_top));
        push_command(
            &mut commands,
            DrawCommand::FillPolygon {
                path: shape,
                paint: config.frame_paint,
            },
        );
        if !fill.is_empty() {
            push_command(
                &mut commands,
                DrawCommand::FillPolygon {
                    path: fill,
                    paint: Paint::opaque(fill_color),
                },
            );
        }

        if let Some(bolt) = opaque_bolt {
            push_command(
                &mut commands,
                DrawCommand::FillPolygon {
                    path: Path::from_polygon(bolt),
                    paint: config.bolt_paint,
                },
            );
        } else if !plugged {
            if level <= config.critical_level {
                push_command(&mut commands, self.warning_command(ctx));
            } else if let Some(text) = opaque_text {
                push_command(
                    &mut commands,
                    DrawCommand::DrawText {
                        text,
                        paint: Paint::opaque(ctx.level_color(level)),
                    },
                );
            }
        }
        commands
    }

    fn percent_run(
        &self,
        battery: &BatteryState,
        level: u8,
        ctx: &RenderContext<'_>,
    ) -> TextRun {
        let fraction = if ctx.config.single_digit_percent {
            TEXT_FRACTION_SINGLE_DIGIT
        } else if battery.level == Some(LEVEL_MAX) {
            TEXT_FRACTION_FULL
        } else {
            TEXT_FRACTION_DEFAULT
        };
        let size = self.viewport.content_height() as f32 * fraction;
        let x = self.viewport.width as f32 * 0.5;
        let y = (self.viewport.height as f32 + styles::ascent(size)) * TEXT_BASELINE_FRACTION;

        TextRun::new(&ctx.percent_text(level), x, y, size)
    }

    fn warning_command(
        &self,
        ctx: &RenderContext<'_>,
    ) -> DrawCommand {
        DrawCommand::DrawText {
            text: TextRun::new(
                &ctx.config.warning_text,
                self.viewport.width as f32 * 0.5,
                self.warning_y,
                self.warning_size,
            ),
            paint: Paint::opaque(ctx.colors.first()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::{BatteryStatus, PluggedType};
    use crate::bolt::BoltShape;
    use crate::colors::LOW_LEVEL;
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

    fn icon() -> IconMeter {
        let mut icon = IconMeter::new();
        icon.on_size_changed(&Viewport::new(20, 40));
        icon
    }

    fn unplugged(level: i32) -> BatteryState {
        BatteryState::with_level(level, PluggedType::None, BatteryStatus::Discharging)
    }

    fn charging(level: i32) -> BatteryState { BatteryState::with_level(level, PluggedType::Ac, BatteryStatus::Charging) }

    #[test]
    fn test_fill_fraction() {
        for level in 96..=100 {
            assert_eq!(fill_fraction(level, 15), 1.0, "{level}% should draw full");
        }
        for level in 0..=15 {
            assert_eq!(fill_fraction(level, 15), 0.0, "{level}% should draw empty");
        }
        assert_eq!(fill_fraction(50, 15), 0.5);
    }

    #[test]
    fn test_frames_layout() {
        let fixture = Fixture::new();
        let frames = IconFrames::compute(&Viewport::new(20, 40), &fixture.config);
        // 40 * 0.105 = 4.2, truncated to 4; shoulders round(20 * 0.25) = 5
        assert_eq!(frames.button, RectF::new(5.0, 0.0, 15.0, 4.0));
        assert_eq!(frames.body, RectF::new(0.0, 4.0, 20.0, 40.0));
    }

    #[test]
    fn test_frames_respect_padding() {
        let fixture = Fixture::new();
        let vp = Viewport::new(24, 44).with_padding(2, 2, 2, 2);
        let frames = IconFrames::compute(&vp, &fixture.config);
        assert_eq!(frames.button.left, 7.0);
        assert_eq!(frames.body, RectF::new(2.0, 6.0, 22.0, 42.0));
    }

    #[test]
    fn test_outline_is_keyhole() {
        let fixture = Fixture::new();
        let frames = IconFrames::compute(&Viewport::new(20, 40), &fixture.config);
        let path = Path::from_polygon(frames.outline());
        assert_eq!(path.contours()[0].len(), 8);
        assert!(path.contains(PointF::new(10.0, 2.0)), "button area is inside");
        assert!(!path.contains(PointF::new(2.0, 2.0)), "shoulder is outside");
        assert!(path.contains(PointF::new(2.0, 20.0)), "body is inside");
    }

    #[test]
    fn test_fill_top() {
        let fixture = Fixture::new();
        let frames = IconFrames::compute(&Viewport::new(20, 40), &fixture.config);
        assert_eq!(frames.fill_top(1.0), frames.button.top);
        assert_eq!(frames.fill_top(0.0), frames.body.bottom);
        assert_eq!(frames.fill_top(0.5), 22.0);
    }

    #[test]
    fn test_bolt_threshold_boundary() {
        assert!(bolt_is_opaque(0.29));
        assert!(bolt_is_opaque(BOLT_LEVEL_THRESHOLD));
        assert!(!bolt_is_opaque(0.31));
    }

    #[test]
    fn test_bolt_opacity_fraction_clamped() {
        let bolt = RectF::new(0.0, 10.0, 10.0, 20.0);
        assert_eq!(bolt_opacity_fraction(&bolt, 25.0), 0.0);
        assert_eq!(bolt_opacity_fraction(&bolt, 15.0), 0.5);
        assert_eq!(bolt_opacity_fraction(&bolt, 0.0), 1.0);
    }

    #[test]
    fn test_bolt_frame_insets() {
        let frame = bolt_frame(&RectF::new(0.0, 0.0, 90.0, 60.0));
        assert_eq!(frame, RectF::new(20.0, 10.0, 90.0 - 90.0 / 7.0, 54.0));
    }

    #[test]
    fn test_low_charge_draws_opaque_bolt_last() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&charging(10), &fixture.ctx());

        assert_eq!(commands.len(), 3, "frame, fill and bolt");
        match &commands[2] {
            DrawCommand::FillPolygon { path, paint } => {
                assert_eq!(*paint, fixture.config.bolt_paint);
                assert_eq!(path.contours().len(), 1);
            }
            other => panic!("expected bolt fill, got {other:?}"),
        }
        match &commands[0] {
            DrawCommand::FillPolygon { path, .. } => assert_eq!(path.contours().len(), 1, "outline has no cutout"),
            other => panic!("expected outline fill, got {other:?}"),
        }
    }

    #[test]
    fn test_high_charge_cuts_bolt_out() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&charging(80), &fixture.ctx());

        assert_eq!(commands.len(), 2, "no separate bolt command");
        match &commands[1] {
            DrawCommand::FillPolygon { path, paint } => {
                assert_eq!(paint.color, fixture.config.charge_color, "plugged fill uses charge color");
                assert_eq!(path.contours().len(), 2, "bolt hole survives the clip");
            }
            other => panic!("expected level fill, got {other:?}"),
        }
    }

    #[test]
    fn test_critical_draws_warning() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&unplugged(3), &fixture.ctx());

        assert_eq!(commands.len(), 2, "outline and warning; empty fill is skipped");
        match &commands[1] {
            DrawCommand::DrawText { text, paint } => {
                assert_eq!(text.text.as_str(), "!");
                assert_eq!(paint.color, LOW_LEVEL);
                assert_eq!(text.x, 10.0);
            }
            other => panic!("expected warning text, got {other:?}"),
        }
    }

    #[test]
    fn test_low_fill_draws_opaque_percentage() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&unplugged(20), &fixture.ctx());

        assert_eq!(commands.len(), 3);
        match &commands[2] {
            DrawCommand::DrawText { text, .. } => assert_eq!(text.text.as_str(), "20"),
            other => panic!("expected percentage text, got {other:?}"),
        }
    }

    #[test]
    fn test_high_fill_cuts_percentage_out() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&unplugged(90), &fixture.ctx());

        assert_eq!(commands.len(), 2, "text is a cutout, not a command");
        match &commands[0] {
            DrawCommand::FillPolygon { path, .. } => {
                assert_eq!(path.text_cutouts().len(), 1);
                assert_eq!(path.text_cutouts()[0].text.as_str(), "90");
            }
            other => panic!("expected outline fill, got {other:?}"),
        }
    }

    #[test]
    fn test_percentage_hidden_at_100_and_when_disabled() {
        let fixture = Fixture::new();
        let commands = icon().on_draw(&unplugged(100), &fixture.ctx());
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| !matches!(c, DrawCommand::DrawText { .. })));

        let ctx = RenderContext { show_percent: false, ..fixture.ctx() };
        let commands = icon().on_draw(&unplugged(20), &ctx);
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_unknown_level_draws_nothing() {
        let fixture = Fixture::new();
        assert!(icon().on_draw(&BatteryState::unknown(), &fixture.ctx()).is_empty());
    }

    #[test]
    fn test_power_save_uses_fallback_color() {
        let fixture = Fixture::new();
        let ctx = RenderContext { power_save_active: true, ..fixture.ctx() };
        let commands = icon().on_draw(&unplugged(10), &ctx);
        match &commands[1] {
            DrawCommand::FillPolygon { paint, .. } => assert_eq!(paint.color, fixture.colors.fallback()),
            other => panic!("expected level fill, got {other:?}"),
        }
    }
}
