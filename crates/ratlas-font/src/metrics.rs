//! Glyph metrics extraction
//!
//! Converts a provider's 26.6 bounds and advance into the padded bitmap
//! size and spacing values stored per atlas item.

use crate::fixed::{Fixed26Dot6, FixedPoint};
use crate::provider::RasterProvider;

/// Placement and spacing data for one padded glyph bitmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Character these metrics describe
    pub character: char,
    /// Horizontal advance
    pub advance: f32,
    /// Pen origin to left edge of the padded bitmap
    pub bearing_x: f32,
    /// Baseline to bottom edge of the padded bitmap (y down)
    pub descent: f32,
    /// Padded bitmap width in pixels
    pub width: u32,
    /// Padded bitmap height in pixels
    pub height: u32,
    /// Pen origin inside the padded bitmap, used when drawing the glyph
    pub origin: FixedPoint,
}

/// Measure `c` with `padding` pixels of empty border on every side.
///
/// Returns `None` when the font has no glyph for `c`.
pub fn extract(provider: &dyn RasterProvider, c: char, padding: u32) -> Option<GlyphMetrics> {
    let bounds = provider.glyph_bounds(c)?;
    let advance = provider.advance(c)?;

    let pad = i32::try_from(padding).unwrap_or(i32::MAX);
    let min_x = bounds.min.x.floor();
    let min_y = bounds.min.y.floor();
    let max_x = bounds.max.x.ceil().max(min_x);
    let max_y = bounds.max.y.ceil().max(min_y);

    // Sub-pixel offset of the ink top edge from its whole-pixel floor
    let top_fraction = bounds.min.y.to_f32() - min_y as f32;

    Some(GlyphMetrics {
        character: c,
        advance: advance.to_f32(),
        bearing_x: bounds.min.x.to_f32() - padding as f32,
        descent: max_y as f32 + top_fraction + padding as f32,
        width: padded(max_x - min_x, padding),
        height: padded(max_y - min_y, padding),
        origin: FixedPoint::new(
            Fixed26Dot6::from_i32(pad.saturating_sub(min_x)),
            Fixed26Dot6::from_i32(pad.saturating_sub(min_y)),
        ),
    })
}

/// Ink extent plus padding on both sides, saturating
fn padded(extent: i32, padding: u32) -> u32 {
    (extent.max(0) as u32).saturating_add(padding.saturating_mul(2))
}
