//! Font selection and text metrics for meter labels.
//!
//! Geometry asks for text by pixel size; the backend can only draw the
//! bitmap sizes ProFont ships. [`font_for_size`] maps one onto the other so
//! the layout math and the rasteriser agree on the same font.
//!
//! # Metrics
//!
//! - `ascent`: distance from the top of the glyph cell to the baseline.
//! - `digit_bounds_height`: height of the ink box of "99". ProFont digits
//!   span the full ascent band, so this is the baseline offset as well.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{
    PROFONT_7_POINT,
    PROFONT_9_POINT,
    PROFONT_10_POINT,
    PROFONT_12_POINT,
    PROFONT_14_POINT,
    PROFONT_18_POINT,
    PROFONT_24_POINT,
};

/// Horizontally centred, alphabetic baseline. Matches how [`TextRun`](crate::commands::TextRun)
/// positions are defined.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Alphabetic)
    .build();

/// Available fonts, largest first.
const FONTS: [&MonoFont<'static>; 7] = [
    &PROFONT_24_POINT,
    &PROFONT_18_POINT,
    &PROFONT_14_POINT,
    &PROFONT_12_POINT,
    &PROFONT_10_POINT,
    &PROFONT_9_POINT,
    &PROFONT_7_POINT,
];

/// Largest font whose cell height fits in `size` pixels; the smallest font
/// when nothing fits.
pub fn font_for_size(size: f32) -> &'static MonoFont<'static> {
    FONTS
        .iter()
        .copied()
        .find(|font| font.character_size.height as f32 <= size)
        .unwrap_or(&PROFONT_7_POINT)
}

/// Distance from cell top to baseline for text drawn at `size`.
#[inline]
pub fn ascent(size: f32) -> f32 { font_for_size(size).baseline as f32 }

/// Ink height of the two-digit stand-in string used for vertical centring.
#[inline]
pub fn digit_bounds_height(size: f32) -> f32 { ascent(size) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_for_size_fits() {
        for size in [8.0f32, 12.0, 16.0, 20.0, 30.0, 45.0, 100.0] {
            let font = font_for_size(size);
            if font.character_size != PROFONT_7_POINT.character_size {
                assert!(
                    font.character_size.height as f32 <= size,
                    "font for {size}px is too tall"
                );
            }
        }
    }

    #[test]
    fn test_font_for_size_monotonic() {
        let mut prev = 0;
        for size in 1..80 {
            let height = font_for_size(size as f32).character_size.height;
            assert!(height >= prev, "font height should not shrink as size grows");
            prev = height;
        }
    }

    #[test]
    fn test_tiny_size_falls_back_to_smallest() {
        assert_eq!(font_for_size(1.0).character_size, PROFONT_7_POINT.character_size);
    }

    #[test]
    fn test_largest_font_for_big_sizes() {
        assert_eq!(font_for_size(500.0).character_size, PROFONT_24_POINT.character_size);
    }

    #[test]
    fn test_ascent_positive() {
        assert!(ascent(20.0) > 0.0);
        assert_eq!(digit_bounds_height(20.0), ascent(20.0));
    }
}
