//! ratlas Font - Glyph Metrics and Rasterization
//!
//! This crate provides the font side of the ratlas glyph atlas:
//! - 26.6 fixed-point sub-pixel arithmetic
//! - The `RasterProvider` interface the atlas builds against
//! - A TrueType/OpenType provider (ttf-parser + tiny-skia)
//! - Padded glyph metrics extraction

pub mod fixed;
pub mod metrics;
pub mod provider;
pub mod ttf;

pub use fixed::{Fixed26Dot6, FixedPoint, FixedRect};
pub use metrics::{extract, GlyphMetrics};
pub use provider::{GlyphBitmap, LineMetrics, RasterProvider};
pub use ttf::{TtfProvider, POINTS_PER_INCH};

/// Font error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Failed to parse font: {0}")]
    Parse(String),

    #[error("Invalid font size: {point_size}pt at {resolution} DPI")]
    InvalidSize { point_size: f64, resolution: f64 },

    #[error("Invalid pixel size: {0}px/em")]
    InvalidPixelSize(f64),
}

pub type Result<T> = std::result::Result<T, FontError>;
