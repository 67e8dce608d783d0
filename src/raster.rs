//! Reference software backend: rasterises a [`DrawCommandList`] into an
//! in-memory Rgb565 framebuffer.
//!
//! # Sampling
//!
//! Every shape is point-sampled at pixel centres; there is no anti-aliasing.
//! - Fills: even-odd test against the path contours, minus any pixel covered
//!   by a text cutout (rendered into a scratch mask first).
//! - Arcs: pixel centre inside the stroke band and within the clockwise
//!   sweep from the start angle (0 deg at +x, 270 deg at the top, y down).
//! - Text: ProFont glyphs, centred on `x` with the alphabetic baseline at `y`.
//!
//! All paints alpha-blend over what is already in the buffer, so the command
//! order is the compositing order.
//!
//! # DrawTarget
//!
//! [`Framebuffer`] is an embedded-graphics [`DrawTarget`], so hosts can draw
//! their own decorations into it, and a window or panel driver can blit
//! [`Framebuffer::pixels`] row by row.

use core::convert::Infallible;
use core::f32::consts::PI;

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};
use embedded_graphics::text::Text;
use heapless::Vec;
use micromath::F32;

use crate::colors::{Paint, blend};
use crate::commands::{DrawCommand, TextRun};
use crate::error::{MeterError, Result};
use crate::geometry::{Path, PointF, RectF};
use crate::styles;

// =============================================================================
// Framebuffer
// =============================================================================

/// Fixed-capacity Rgb565 framebuffer of at most `N` pixels.
#[derive(Clone, Debug)]
pub struct Framebuffer<const N: usize> {
    width: u32,
    height: u32,
    background: Rgb565,
    pixels: Vec<Rgb565, N>,
    /// Scratch coverage mask for text cutouts.
    mask: Vec<bool, N>,
}

impl<const N: usize> Framebuffer<N> {
    /// Buffer cleared to `background`. Fails if `width * height` exceeds `N`.
    pub fn new(
        width: u32,
        height: u32,
        background: Rgb565,
    ) -> Result<Self> {
        let len = (width as usize) * (height as usize);
        if len > N {
            return Err(MeterError::CapacityExceeded("framebuffer pixels"));
        }
        let mut pixels = Vec::new();
        pixels.resize(len, background).map_err(|_| MeterError::CapacityExceeded("framebuffer pixels"))?;
        let mut mask = Vec::new();
        mask.resize(len, false).map_err(|_| MeterError::CapacityExceeded("framebuffer mask"))?;
        Ok(Self {
            width,
            height,
            background,
            pixels,
            mask,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 { self.width }

    #[inline]
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    pub fn background(&self) -> Rgb565 { self.background }

    /// Row-major pixel data.
    #[inline]
    pub fn pixels(&self) -> &[Rgb565] { &self.pixels }

    /// Reset every pixel to the background color.
    pub fn clear(&mut self) {
        let background = self.background;
        self.pixels.iter_mut().for_each(|p| *p = background);
    }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        color: Rgb565,
    ) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    #[inline]
    fn blend_pixel(
        &mut self,
        x: i32,
        y: i32,
        paint: Paint,
    ) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(self.pixels[i], paint.color, paint.alpha);
        }
    }

    /// Pixel bounds `(x0, y0, x1, y1)` (exclusive end) covering `rect`,
    /// clipped to the buffer.
    fn pixel_span(
        &self,
        rect: &RectF,
    ) -> (i32, i32, i32, i32) {
        let x0 = F32(rect.left).floor().0.max(0.0) as i32;
        let y0 = F32(rect.top).floor().0.max(0.0) as i32;
        let x1 = (F32(rect.right).ceil().0 as i32).min(self.width as i32);
        let y1 = (F32(rect.bottom).ceil().0 as i32).min(self.height as i32);
        (x0, y0, x1, y1)
    }
}

impl<const N: usize> OriginDimensions for Framebuffer<N> {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl<const N: usize> DrawTarget for Framebuffer<N> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

// =============================================================================
// Text Targets
// =============================================================================

/// Blends glyph pixels into the framebuffer with a fixed alpha.
struct BlendCanvas<'a, const N: usize> {
    fb: &'a mut Framebuffer<N>,
    alpha: u8,
}

impl<const N: usize> OriginDimensions for BlendCanvas<'_, N> {
    fn size(&self) -> Size { self.fb.size() }
}

impl<const N: usize> DrawTarget for BlendCanvas<'_, N> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.fb.blend_pixel(point.x, point.y, Paint::with_alpha(color, self.alpha));
        }
        Ok(())
    }
}

/// Records glyph coverage into the scratch mask.
struct MaskCanvas<'a> {
    mask: &'a mut [bool],
    width: u32,
    height: u32,
}

impl OriginDimensions for MaskCanvas<'_> {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for MaskCanvas<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, _) in pixels {
            if point.x < 0 || point.y < 0 || point.x as u32 >= self.width || point.y as u32 >= self.height {
                continue;
            }
            self.mask[point.y as usize * self.width as usize + point.x as usize] = true;
        }
        Ok(())
    }
}

fn draw_text_run<D>(
    run: &TextRun,
    color: Rgb565,
    target: &mut D,
) where
    D: DrawTarget<Color = Rgb565, Error = Infallible>,
{
    let style = MonoTextStyle::new(styles::font_for_size(run.size), color);
    let position = Point::new(round_px(run.x), round_px(run.y));
    Text::with_text_style(&run.text, position, style, styles::CENTERED).draw(target).ok();
}

#[inline]
fn round_px(v: f32) -> i32 { F32(v + 0.5).floor().0 as i32 }

// =============================================================================
// Rasterisation
// =============================================================================

/// Paint `commands` into `fb` in order.
pub fn rasterize<const N: usize>(
    commands: &[DrawCommand],
    fb: &mut Framebuffer<N>,
) {
    for command in commands {
        match command {
            DrawCommand::FillPolygon { path, paint } => fill_path(fb, path, *paint),
            DrawCommand::StrokeArc {
                rect,
                start_deg,
                sweep_deg,
                paint,
                stroke_width,
            } => stroke_arc(fb, rect, *start_deg, *sweep_deg, *paint, *stroke_width),
            DrawCommand::DrawText { text, paint } => {
                let mut canvas = BlendCanvas { fb: &mut *fb, alpha: paint.alpha };
                draw_text_run(text, paint.color, &mut canvas);
            }
        }
    }
}

fn fill_path<const N: usize>(
    fb: &mut Framebuffer<N>,
    path: &Path,
    paint: Paint,
) {
    let Some(bounds) = path.bounds() else {
        return;
    };

    let has_cutouts = !path.text_cutouts().is_empty();
    if has_cutouts {
        fb.mask.iter_mut().for_each(|m| *m = false);
        let (width, height) = (fb.width, fb.height);
        let mut canvas = MaskCanvas { mask: &mut fb.mask, width, height };
        for run in path.text_cutouts() {
            draw_text_run(run, paint.color, &mut canvas);
        }
    }

    let (x0, y0, x1, y1) = fb.pixel_span(&bounds);
    for y in y0..y1 {
        for x in x0..x1 {
            let centre = PointF::new(x as f32 + 0.5, y as f32 + 0.5);
            if !path.contains(centre) {
                continue;
            }
            if has_cutouts && fb.index(x, y).is_some_and(|i| fb.mask[i]) {
                continue;
            }
            fb.blend_pixel(x, y, paint);
        }
    }
}

fn stroke_arc<const N: usize>(
    fb: &mut Framebuffer<N>,
    rect: &RectF,
    start_deg: f32,
    sweep_deg: f32,
    paint: Paint,
    stroke_width: f32,
) {
    if sweep_deg <= 0.0 || stroke_width <= 0.0 {
        return;
    }
    let cx = rect.center_x();
    let cy = rect.center_y();
    let radius = rect.width().min(rect.height()) / 2.0;
    let outer = radius + stroke_width / 2.0;
    let inner = (radius - stroke_width / 2.0).max(0.0);
    let (outer_sq, inner_sq) = (outer * outer, inner * inner);
    let full_circle = sweep_deg >= 360.0;

    let band = RectF::new(cx - outer, cy - outer, cx + outer, cy + outer);
    let (x0, y0, x1, y1) = fb.pixel_span(&band);
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > outer_sq || dist_sq < inner_sq {
                continue;
            }
            if !full_circle && !within_sweep(dx, dy, start_deg, sweep_deg) {
                continue;
            }
            fb.blend_pixel(x, y, paint);
        }
    }
}

/// Whether the direction `(dx, dy)` lies in the clockwise sweep.
fn within_sweep(
    dx: f32,
    dy: f32,
    start_deg: f32,
    sweep_deg: f32,
) -> bool {
    let angle = F32(dy).atan2(F32(dx)).0 * 180.0 / PI;
    let mut offset = angle - start_deg;
    while offset < 0.0 {
        offset += 360.0;
    }
    while offset >= 360.0 {
        offset -= 360.0;
    }
    offset <= sweep_deg
}
