//! TrueType/OpenType raster provider
//!
//! Parses glyph metrics with ttf-parser and draws outlines with tiny-skia.

use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::fixed::{Fixed26Dot6, FixedPoint, FixedRect};
use crate::provider::{GlyphBitmap, LineMetrics, RasterProvider};
use crate::{FontError, Result};

/// Points per inch; a point is one pixel at this resolution
pub const POINTS_PER_INCH: f64 = 72.0;

/// Raster provider backed by an owned font file
pub struct TtfProvider {
    /// Raw font file bytes
    data: Vec<u8>,
    /// Face index within a collection
    face_index: u32,
    /// Pixels per font design unit
    scale: f32,
    /// Cached face metrics at this size
    line_metrics: LineMetrics,
}

impl TtfProvider {
    /// Parse `data` and bind it at `point_size` points and `resolution` DPI
    pub fn new(data: Vec<u8>, face_index: u32, point_size: f64, resolution: f64) -> Result<Self> {
        if !(point_size > 0.0) || !(resolution > 0.0) {
            return Err(FontError::InvalidSize { point_size, resolution });
        }
        Self::with_pixels_per_em(data, face_index, point_size * resolution / POINTS_PER_INCH)
    }

    /// Parse `data` and bind it so one em spans `pixels_per_em` pixels
    pub fn with_pixels_per_em(data: Vec<u8>, face_index: u32, pixels_per_em: f64) -> Result<Self> {
        if !(pixels_per_em.is_finite() && pixels_per_em > 0.0) {
            return Err(FontError::InvalidPixelSize(pixels_per_em));
        }

        let face = Face::parse(&data, face_index)
            .map_err(|e| FontError::Parse(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(FontError::Parse("units per em is zero".into()));
        }

        let scale = (pixels_per_em / units_per_em as f64) as f32;

        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;
        let line_gap = face.line_gap() as f32;
        let line_metrics = LineMetrics {
            height: Fixed26Dot6::from_f32((ascender - descender + line_gap) * scale),
            ascent: Fixed26Dot6::from_f32(ascender * scale),
            descent: Fixed26Dot6::from_f32(-descender * scale),
        };

        tracing::debug!(
            "Parsed font face {} ({} glyphs, {} units/em) at {:.2}px/em",
            face_index,
            face.number_of_glyphs(),
            units_per_em,
            pixels_per_em,
        );

        Ok(Self {
            data,
            face_index,
            scale,
            line_metrics,
        })
    }

    /// Pixels per font design unit
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Check if font has glyph for character
    pub fn has_char(&self, c: char) -> bool {
        self.face().is_some_and(|face| face.glyph_index(c).is_some())
    }

    // Validated in `new`, so parsing only fails if the bytes were corrupted since.
    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.face_index).ok()
    }

    fn units(&self, value: f32) -> Fixed26Dot6 {
        Fixed26Dot6::from_f32(value * self.scale)
    }
}

impl RasterProvider for TtfProvider {
    fn glyph_bounds(&self, c: char) -> Option<FixedRect> {
        let face = self.face()?;
        let glyph = face.glyph_index(c)?;

        // No outline (e.g. space): empty box at the origin
        let Some(bbox) = face.glyph_bounding_box(glyph) else {
            return Some(FixedRect::default());
        };

        // Font space is y-up, pixel space is y-down
        Some(FixedRect::new(
            FixedPoint::new(self.units(bbox.x_min as f32), self.units(-(bbox.y_max as f32))),
            FixedPoint::new(self.units(bbox.x_max as f32), self.units(-(bbox.y_min as f32))),
        ))
    }

    fn advance(&self, c: char) -> Option<Fixed26Dot6> {
        let face = self.face()?;
        let glyph = face.glyph_index(c)?;
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
        Some(self.units(advance as f32))
    }

    fn kern(&self, left: char, right: char) -> Fixed26Dot6 {
        let Some(face) = self.face() else {
            return Fixed26Dot6::ZERO;
        };
        let (Some(l), Some(r)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return Fixed26Dot6::ZERO;
        };
        let Some(kern) = face.tables().kern else {
            return Fixed26Dot6::ZERO;
        };

        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(l, r))
            .map(|units| self.units(units as f32))
            .unwrap_or(Fixed26Dot6::ZERO)
    }

    fn line_metrics(&self) -> LineMetrics {
        self.line_metrics
    }

    fn rasterize(&self, c: char, width: u32, height: u32, origin: FixedPoint) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::blank(width, height);

        let Some(face) = self.face() else {
            return bitmap;
        };
        let Some(glyph) = face.glyph_index(c) else {
            return bitmap;
        };
        if let Some(alpha) = self.fill_outline(&face, glyph, width, height, origin) {
            bitmap.data = alpha;
        }
        bitmap
    }
}

impl TtfProvider {
    /// Fill a glyph outline into an alpha buffer; `None` for empty outlines
    fn fill_outline(
        &self,
        face: &Face<'_>,
        glyph: GlyphId,
        width: u32,
        height: u32,
        origin: FixedPoint,
    ) -> Option<Vec<u8>> {
        let mut builder = PathBuilder::new(self.scale, origin.x.to_f32(), origin.y.to_f32());
        face.outline_glyph(glyph, &mut builder)?;
        let path = builder.finish()?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height)?;

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::WHITE);
        paint.anti_alias = true;

        pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );

        // Extract alpha channel as coverage
        Some(pixmap.pixels().iter().map(|p| p.alpha()).collect())
    }
}

/// Path builder that converts ttf-parser outlines to tiny-skia paths
struct PathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    origin_x: f32,
    origin_y: f32,
}

impl PathBuilder {
    fn new(scale: f32, origin_x: f32, origin_y: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            origin_x,
            origin_y,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale  // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
