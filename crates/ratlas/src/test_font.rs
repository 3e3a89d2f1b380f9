//! Deterministic raster provider for unit tests

use ratlas_font::{Fixed26Dot6, FixedPoint, FixedRect, GlyphBitmap, LineMetrics, RasterProvider};

/// Every printable character is a solid block sitting on the baseline.
/// Control characters have no glyph; ' ' has no ink.
pub(crate) struct BlockFont {
    /// Multiplies every dimension
    pub(crate) scale: f32,
}

impl BlockFont {
    pub(crate) fn new() -> Self {
        Self { scale: 1.0 }
    }

    pub(crate) fn scaled(scale: f32) -> Self {
        Self { scale }
    }

    fn px(&self, value: f32) -> Fixed26Dot6 {
        Fixed26Dot6::from_f32(value * self.scale)
    }

    fn ink_size(c: char) -> (f32, f32) {
        let code = c as u32;
        ((4 + code % 5) as f32, (6 + code % 4) as f32)
    }
}

impl RasterProvider for BlockFont {
    fn glyph_bounds(&self, c: char) -> Option<FixedRect> {
        if c.is_control() {
            return None;
        }
        if c == ' ' {
            return Some(FixedRect::default());
        }
        let (w, h) = Self::ink_size(c);
        Some(FixedRect::new(
            FixedPoint::new(self.px(1.0), self.px(-h)),
            FixedPoint::new(self.px(1.0 + w), Fixed26Dot6::ZERO),
        ))
    }

    fn advance(&self, c: char) -> Option<Fixed26Dot6> {
        if c.is_control() {
            return None;
        }
        if c == ' ' {
            return Some(self.px(4.0));
        }
        Some(self.px(Self::ink_size(c).0 + 2.0))
    }

    fn kern(&self, left: char, right: char) -> Fixed26Dot6 {
        match (left, right) {
            ('A', 'V') | ('V', 'A') => self.px(-1.5),
            _ => Fixed26Dot6::ZERO,
        }
    }

    fn line_metrics(&self) -> LineMetrics {
        LineMetrics {
            height: self.px(12.0),
            ascent: self.px(9.0),
            descent: self.px(3.0),
        }
    }

    fn rasterize(&self, c: char, width: u32, height: u32, origin: FixedPoint) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::blank(width, height);
        let Some(bounds) = self.glyph_bounds(c) else {
            return bitmap;
        };
        let x0 = (origin.x + bounds.min.x).floor().max(0) as u32;
        let y0 = (origin.y + bounds.min.y).floor().max(0) as u32;
        let x1 = ((origin.x + bounds.max.x).ceil().max(0) as u32).min(width);
        let y1 = ((origin.y + bounds.max.y).ceil().max(0) as u32).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                bitmap.data[(y * width + x) as usize] = 255;
            }
        }
        bitmap
    }
}
