//! Abstract draw commands produced by a render pass.
//!
//! The list is ordered for painter's-algorithm compositing: later commands
//! cover earlier ones. A backend (see [`crate::raster`]) consumes it in order.

use heapless::{String, Vec};

use crate::colors::Paint;
use crate::geometry::{Path, RectF};

/// Maximum commands in one render pass.
pub const MAX_COMMANDS: usize = 8;

/// Maximum characters in one text run ("100" plus headroom).
pub const TEXT_LEN: usize = 4;

/// A text string placed with its horizontal center at `x` and its
/// alphabetic baseline at `y`.
#[derive(Clone, PartialEq, Debug)]
pub struct TextRun {
    pub text: String<TEXT_LEN>,
    pub x: f32,
    pub y: f32,
    /// Requested font size in pixels.
    pub size: f32,
}

impl TextRun {
    /// Text run from a string slice, truncated to [`TEXT_LEN`] characters.
    pub fn new(
        text: &str,
        x: f32,
        y: f32,
        size: f32,
    ) -> Self {
        let mut s: String<TEXT_LEN> = String::new();
        for c in text.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self { text: s, x, y, size }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum DrawCommand {
    /// Fill an even-odd path.
    FillPolygon { path: Path, paint: Paint },
    /// Stroke an arc of the ellipse inscribed in `rect`. Angles are degrees,
    /// 0 at +x, increasing clockwise on screen (270 is the top).
    StrokeArc {
        rect: RectF,
        start_deg: f32,
        sweep_deg: f32,
        paint: Paint,
        stroke_width: f32,
    },
    DrawText { text: TextRun, paint: Paint },
}

/// One render pass worth of commands.
pub type DrawCommandList = Vec<DrawCommand, MAX_COMMANDS>;

/// Append a command, dropping it (with a log line) if the list is full.
pub(crate) fn push_command(
    list: &mut DrawCommandList,
    command: DrawCommand,
) {
    if list.push(command).is_err() {
        log::warn!("draw command list full, dropping command");
    }
}
