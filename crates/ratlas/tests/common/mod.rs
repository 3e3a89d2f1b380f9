//! Synthetic font shared by the integration tests

use ratlas::font::{Fixed26Dot6, FixedPoint, FixedRect, GlyphBitmap, LineMetrics, RasterProvider};

/// Solid boxes whose size is derived from the code point.
/// Digits hang below the baseline; control characters are missing.
pub struct BoxFont;

impl BoxFont {
    fn ink(c: char) -> (i32, i32, i32) {
        let code = c as u32 as i32;
        let width = 3 + code % 7;
        let height = 5 + code % 6;
        let below = if c.is_ascii_digit() { 2 } else { 0 };
        (width, height, below)
    }
}

impl RasterProvider for BoxFont {
    fn glyph_bounds(&self, c: char) -> Option<FixedRect> {
        if c.is_control() {
            return None;
        }
        if c.is_whitespace() {
            return Some(FixedRect::default());
        }
        let (width, height, below) = Self::ink(c);
        Some(FixedRect::new(
            FixedPoint::new(Fixed26Dot6::from_bits(40), Fixed26Dot6::from_i32(below - height)),
            FixedPoint::new(Fixed26Dot6::from_i32(width), Fixed26Dot6::from_i32(below)),
        ))
    }

    fn advance(&self, c: char) -> Option<Fixed26Dot6> {
        if c.is_control() {
            return None;
        }
        Some(Fixed26Dot6::from_i32(Self::ink(c).0 + 1))
    }

    fn kern(&self, left: char, right: char) -> Fixed26Dot6 {
        if left == 'T' && right == 'o' {
            Fixed26Dot6::from_f32(-2.0)
        } else {
            Fixed26Dot6::ZERO
        }
    }

    fn line_metrics(&self) -> LineMetrics {
        LineMetrics {
            height: Fixed26Dot6::from_i32(16),
            ascent: Fixed26Dot6::from_i32(12),
            descent: Fixed26Dot6::from_i32(4),
        }
    }

    fn rasterize(&self, c: char, width: u32, height: u32, origin: FixedPoint) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::blank(width, height);
        let Some(bounds) = self.glyph_bounds(c) else {
            return bitmap;
        };
        let clamp = |v: i32, max: u32| v.clamp(0, max as i32) as u32;
        let x0 = clamp((origin.x + bounds.min.x).floor(), width);
        let x1 = clamp((origin.x + bounds.max.x).ceil(), width);
        let y0 = clamp((origin.y + bounds.min.y).floor(), height);
        let y1 = clamp((origin.y + bounds.max.y).ceil(), height);
        for y in y0..y1 {
            for x in x0..x1 {
                bitmap.data[(y * width + x) as usize] = 200;
            }
        }
        bitmap
    }
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("ratlas-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
