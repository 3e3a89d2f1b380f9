//! Atlas Configuration

use crate::{AtlasError, Result};

/// Largest accepted glyph padding, in pixels
pub const MAX_PADDING: u32 = 1 << 16;

/// Parameters for building an atlas
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasConfig {
    /// Font size in points
    pub font_point_size: f64,

    /// Rasterization resolution (DPI)
    pub resolution: f64,

    /// Sheet width in pixels
    pub sheet_width: u32,

    /// Sheet height in pixels
    pub sheet_height: u32,

    /// Empty border around every glyph bitmap, in pixels
    pub padding: u32,

    /// Face index within a font collection
    pub face_index: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            font_point_size: 72.0,
            resolution: 72.0,
            sheet_width: 512,
            sheet_height: 512,
            padding: 4,
            face_index: 0,
        }
    }
}

impl AtlasConfig {
    /// Set font size in points
    pub fn with_font_point_size(mut self, size: f64) -> Self {
        self.font_point_size = size;
        self
    }

    /// Set rasterization resolution
    pub fn with_resolution(mut self, dpi: f64) -> Self {
        self.resolution = dpi;
        self
    }

    /// Set sheet dimensions
    pub fn with_sheet_size(mut self, width: u32, height: u32) -> Self {
        self.sheet_width = width;
        self.sheet_height = height;
        self
    }

    /// Set glyph padding
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set face index
    pub fn with_face_index(mut self, index: u32) -> Self {
        self.face_index = index;
        self
    }

    /// Reject parameters no atlas can be built with
    pub fn validate(&self) -> Result<()> {
        if !(self.font_point_size.is_finite() && self.font_point_size > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "font point size must be positive, got {}",
                self.font_point_size
            )));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if self.sheet_width == 0 || self.sheet_height == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "sheet size must be non-zero, got {}x{}",
                self.sheet_width, self.sheet_height
            )));
        }
        if self.padding > MAX_PADDING {
            return Err(AtlasError::InvalidConfig(format!(
                "padding must be at most {}, got {}",
                MAX_PADDING, self.padding
            )));
        }
        Ok(())
    }
}
