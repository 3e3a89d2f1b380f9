//! Image sheets
//!
//! Fixed-size 8-bit grayscale surfaces that packed glyphs are drawn into,
//! stored and reloaded as PNG files via the image crate.

use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use ratlas_font::GlyphBitmap;

use crate::{AtlasError, Result};

/// One atlas page
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSheet {
    image: GrayImage,
}

impl ImageSheet {
    /// Create a black sheet
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Wrap an already decoded image
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Sheet width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Sheet height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Coverage at (x, y), `None` outside the sheet
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.image.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// Raw pixels, row-major, one byte per pixel (for texture upload)
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Underlying image
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Copy `bitmap` into the sheet with its top-left corner at (x, y).
    ///
    /// Pixels falling outside the sheet are clipped.
    pub fn blit(&mut self, x: u32, y: u32, bitmap: &GlyphBitmap) {
        for py in 0..bitmap.height {
            let dst_y = y + py;
            if dst_y >= self.height() {
                break;
            }
            for px in 0..bitmap.width {
                let dst_x = x + px;
                if dst_x >= self.width() {
                    break;
                }
                self.image.put_pixel(dst_x, dst_y, Luma([bitmap.get(px, py)]));
            }
        }
    }

    /// Encode as PNG at `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| AtlasError::image(path, e))?;
        tracing::info!("Wrote sheet {} ({}x{})", path.display(), self.width(), self.height());
        Ok(())
    }

    /// Decode any supported image at `path` as an 8-bit grayscale sheet
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(source) => AtlasError::io(path, source),
            other => AtlasError::image(path, other),
        })?;
        let sheet = Self::from_image(image.to_luma8());
        tracing::info!("Loaded sheet {} ({}x{})", path.display(), sheet.width(), sheet.height());
        Ok(sheet)
    }
}
