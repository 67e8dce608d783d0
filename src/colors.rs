//! Color constants and alpha compositing for the battery meter.
//!
//! Colors are `Rgb565`, the native format of the panels this meter targets.
//! Rgb565 has no alpha channel, so translucent paints carry their alpha next
//! to the color in [`Paint`] and the backend composites them with [`blend`].
//!
//! ## Rgb565 Color Format
//!
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::IntoStorage;

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black (0, 0, 0). Bolt glyph base color and default backdrop.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Frame, charge fill and normal level color.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Meter Colors
// =============================================================================

/// Low battery red-orange (#FF3300 -> 31, 12, 0).
pub const LOW_LEVEL: Rgb565 = Rgb565::new(31, 12, 0);

/// Fully opaque alpha.
pub const OPAQUE: u8 = 0xFF;

/// Alpha of the meter frame/background shape (#66 over white).
pub const FRAME_ALPHA: u8 = 0x66;

/// Alpha of the opaque bolt glyph (#B2 over black).
pub const BOLT_ALPHA: u8 = 0xB2;

/// A color plus the alpha it is painted with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Paint {
    pub color: Rgb565,
    pub alpha: u8,
}

impl Paint {
    pub const fn opaque(color: Rgb565) -> Self { Self { color, alpha: OPAQUE } }

    pub const fn with_alpha(
        color: Rgb565,
        alpha: u8,
    ) -> Self {
        Self { color, alpha }
    }

    /// Same color, different alpha.
    #[inline]
    pub const fn alpha(
        self,
        alpha: u8,
    ) -> Self {
        Self { color: self.color, alpha }
    }
}

// =============================================================================
// Compositing
// =============================================================================

/// Composite `src` over `dst` with the given alpha.
///
/// Interpolates each 5-6-5 component with 8-bit fixed-point weights. Alpha 0
/// leaves `dst` untouched and alpha 255 returns `src` exactly.
pub fn blend(
    dst: Rgb565,
    src: Rgb565,
    alpha: u8,
) -> Rgb565 {
    match alpha {
        0 => return dst,
        OPAQUE => return src,
        _ => {}
    }

    let dst_raw = dst.into_storage();
    let src_raw = src.into_storage();

    let dst_r = i32::from((dst_raw >> 11) & 0x1F);
    let dst_g = i32::from((dst_raw >> 5) & 0x3F);
    let dst_b = i32::from(dst_raw & 0x1F);

    let src_r = i32::from((src_raw >> 11) & 0x1F);
    let src_g = i32::from((src_raw >> 5) & 0x3F);
    let src_b = i32::from(src_raw & 0x1F);

    // Map 0..=255 onto 0..=256 so the fixed-point weight reaches unity
    let a = i32::from(alpha) + i32::from(alpha >> 7);

    let mix = |d: i32, s: i32| -> i32 { d + (((s - d) * a) >> 8) };

    let r = mix(dst_r, src_r).clamp(0, 31);
    let g = mix(dst_g, src_g).clamp(0, 63);
    let b = mix(dst_b, src_b).clamp(0, 31);

    Rgb565::new(r as u8, g as u8, b as u8)
}
