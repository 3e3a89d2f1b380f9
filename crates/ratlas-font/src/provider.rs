//! Rasterization provider interface
//!
//! Everything the atlas needs from a font engine, expressed in 26.6 pixel
//! units at a fixed size. The atlas never talks to a font file directly.

use crate::fixed::{Fixed26Dot6, FixedPoint, FixedRect};

/// Font-wide vertical metrics at the provider's size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetrics {
    /// Recommended distance between two baselines
    pub height: Fixed26Dot6,
    /// Distance from the top of a line to its baseline (positive)
    pub ascent: Fixed26Dot6,
    /// Distance from the baseline to the bottom of a line (positive)
    pub descent: Fixed26Dot6,
}

/// A single-channel coverage bitmap (1 byte per pixel, row-major)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// Create a bitmap with no coverage
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Coverage at (x, y), zero outside the bitmap or past the end of `data`
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.data.get(index).copied().unwrap_or(0)
    }
}


/// A sized font face able to report glyph metrics and draw glyphs.
///
/// Implementations are bound to one size; the atlas rebinds a new provider
/// when its size changes.
pub trait RasterProvider: Send + Sync {
    /// Ink bounds of `c` relative to the pen origin (y down).
    ///
    /// `None` means the font has no glyph for `c`. A glyph without an outline
    /// (such as a space) reports empty bounds.
    fn glyph_bounds(&self, c: char) -> Option<FixedRect>;

    /// Horizontal advance of `c`, `None` if the font has no glyph for it
    fn advance(&self, c: char) -> Option<Fixed26Dot6>;

    /// Kerning adjustment between two adjacent characters
    fn kern(&self, left: char, right: char) -> Fixed26Dot6;

    /// Line metrics for the whole face
    fn line_metrics(&self) -> LineMetrics;

    /// Draw `c` into a `width` x `height` coverage bitmap with the pen
    /// origin at `origin`.
    fn rasterize(&self, c: char, width: u32, height: u32, origin: FixedPoint) -> GlyphBitmap;
}
