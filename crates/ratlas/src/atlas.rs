//! Glyph atlas state
//!
//! Per-character metrics and sheet placement, the sheets themselves, and an
//! optional live font used for kerning and line metrics.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use ratlas_font::{GlyphMetrics, RasterProvider, TtfProvider, POINTS_PER_INCH};

use crate::allocator::SheetAllocator;
use crate::codec::{self, AtlasHeader};
use crate::config::AtlasConfig;
use crate::packer::Position;
use crate::sheet::ImageSheet;
use crate::{AtlasError, Result};

/// Top-left corner of a glyph in its sheet, in pixels.
///
/// Only known for atlases built in this process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
}

/// Everything needed to draw one character from the atlas
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphItem {
    /// Character this item draws
    pub character: char,
    /// Pen advance to the next character
    pub advance: f32,
    /// Pen origin to left edge of the padded bitmap
    pub bearing_x: f32,
    /// Baseline down to bottom edge of the padded bitmap
    pub descent: f32,
    /// Padded bitmap width in pixels
    pub width: f32,
    /// Padded bitmap height in pixels
    pub height: f32,
    /// Left edge as a fraction of sheet width
    pub uv_x: f32,
    /// Top edge as a fraction of sheet height
    pub uv_y: f32,
    /// Width as a fraction of sheet width
    pub uv_width: f32,
    /// Height as a fraction of sheet height
    pub uv_height: f32,
    /// Index into the atlas sheets
    pub sheet_index: usize,
    /// Pixel position in the sheet (build only, never serialized)
    pub placement: Option<Placement>,
}

impl GlyphItem {
    pub(crate) fn placed(
        metrics: &GlyphMetrics,
        sheet_index: usize,
        position: Position,
        sheet_width: u32,
        sheet_height: u32,
    ) -> Self {
        let sw = sheet_width as f32;
        let sh = sheet_height as f32;
        Self {
            character: metrics.character,
            advance: metrics.advance,
            bearing_x: metrics.bearing_x,
            descent: metrics.descent,
            width: metrics.width as f32,
            height: metrics.height as f32,
            uv_x: position.x as f32 / sw,
            uv_y: position.y as f32 / sh,
            uv_width: metrics.width as f32 / sw,
            uv_height: metrics.height as f32 / sh,
            sheet_index,
            placement: Some(Placement {
                x: position.x as f32,
                y: position.y as f32,
            }),
        }
    }

    fn scale(&mut self, factor: f32) {
        self.advance *= factor;
        self.bearing_x *= factor;
        self.descent *= factor;
        self.width *= factor;
        self.height *= factor;
        if let Some(placement) = &mut self.placement {
            placement.x *= factor;
            placement.y *= factor;
        }
    }
}

/// Allowed difference, in sheet pixels, between an attached sheet and the
/// size its items' UV fractions imply
const SHEET_TOLERANCE: f32 = 1.0;

/// A built or reloaded glyph atlas
pub struct Atlas {
    font_point_size: f64,
    resolution: f64,
    /// Pixels per point at build time; rescaling changes the point size only
    pixels_per_point: f64,
    padding: f32,
    face_index: u32,
    items: HashMap<char, GlyphItem>,
    sheets: Vec<ImageSheet>,
    font: Option<Box<dyn RasterProvider>>,
}

impl fmt::Debug for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atlas")
            .field("font_point_size", &self.font_point_size)
            .field("resolution", &self.resolution)
            .field("pixels_per_point", &self.pixels_per_point)
            .field("padding", &self.padding)
            .field("items", &self.items.len())
            .field("sheets", &self.sheets.len())
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl Atlas {
    /// Build an atlas from TrueType/OpenType font bytes
    pub fn build(
        font_bytes: &[u8],
        config: &AtlasConfig,
        chars: impl IntoIterator<Item = char>,
    ) -> Result<Self> {
        config.validate()?;
        let provider = TtfProvider::new(
            font_bytes.to_vec(),
            config.face_index,
            config.font_point_size,
            config.resolution,
        )?;
        Self::build_with_provider(Box::new(provider), config, chars)
    }

    /// Build an atlas from any raster provider sized for `config`
    pub fn build_with_provider(
        provider: Box<dyn RasterProvider>,
        config: &AtlasConfig,
        chars: impl IntoIterator<Item = char>,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        let mut glyphs = Vec::new();
        for c in chars {
            if !seen.insert(c) {
                continue;
            }
            match ratlas_font::extract(&*provider, c, config.padding) {
                Some(metrics) => glyphs.push(metrics),
                None => tracing::debug!("No glyph for {:?}, skipping", c),
            }
        }

        let allocator = SheetAllocator::new(config.sheet_width, config.sheet_height);
        let allocation = allocator.allocate(&*provider, &glyphs)?;

        tracing::info!(
            "Built atlas: {} glyphs on {} sheet(s) of {}x{} at {}pt",
            allocation.items.len(),
            allocation.sheets.len(),
            config.sheet_width,
            config.sheet_height,
            config.font_point_size,
        );

        Ok(Self {
            font_point_size: config.font_point_size,
            resolution: config.resolution,
            pixels_per_point: config.resolution / POINTS_PER_INCH,
            padding: config.padding as f32,
            face_index: config.face_index,
            items: allocation
                .items
                .into_iter()
                .map(|item| (item.character, item))
                .collect(),
            sheets: allocation.sheets,
            font: Some(provider),
        })
    }

    /// Reload an atlas file and its sheet images. No font is attached.
    pub fn load<P: AsRef<Path>>(
        atlas_path: impl AsRef<Path>,
        sheet_paths: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        let path = atlas_path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| AtlasError::io(path, e))?;
        let mut atlas = Self::from_bytes(&bytes)?;
        tracing::info!("Loaded atlas {} ({} glyphs)", path.display(), atlas.items.len());

        atlas.load_sheets(sheet_paths)?;
        Ok(atlas)
    }

    /// Decode atlas metadata; sheets and font start out empty
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record = codec::decode(bytes)?;
        let header = record.header;
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(header.font_point_size)
            || !positive(header.resolution)
            || !positive(header.pixels_per_point)
            || !(header.padding >= 0.0)
        {
            return Err(codec::CodecError::InvalidFormat.into());
        }

        Ok(Self {
            font_point_size: header.font_point_size,
            resolution: header.resolution,
            pixels_per_point: header.pixels_per_point,
            padding: header.padding,
            face_index: header.face_index,
            items: record.items,
            sheets: Vec::new(),
            font: None,
        })
    }

    /// Encode atlas metadata (no sheets, no font)
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = AtlasHeader {
            font_point_size: self.font_point_size,
            resolution: self.resolution,
            pixels_per_point: self.pixels_per_point,
            padding: self.padding,
            face_index: self.face_index,
        };
        codec::encode(&header, &self.items)
    }

    /// Write atlas metadata to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();
        std::fs::write(path, &bytes).map_err(|e| AtlasError::io(path, e))?;
        tracing::info!("Wrote atlas {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Write every sheet as `{prefix}-{index}.png`, returning the paths
    pub fn save_sheets(&self, prefix: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let prefix = prefix.as_ref();
        let mut paths = Vec::with_capacity(self.sheets.len());
        for (index, sheet) in self.sheets.iter().enumerate() {
            let path = sheet_path(prefix, index);
            sheet.save(&path)?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Append sheets decoded from image files, in order.
    ///
    /// Either every file loads and matches the items (see `add_sheets`) or
    /// the atlas is left unchanged.
    pub fn load_sheets<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> Result<()> {
        let sheets = paths
            .into_iter()
            .map(|p| ImageSheet::load(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.add_sheets(sheets)
    }

    /// Append sheets, in order.
    ///
    /// Once any sheet is attached, every item's sheet must be present and
    /// sized so that its UV fractions cover exactly its pixel size. On error
    /// the atlas is left unchanged.
    pub fn add_sheets(&mut self, sheets: Vec<ImageSheet>) -> Result<()> {
        let before = self.sheets.len();
        self.sheets.extend(sheets);
        if let Err(e) = check_sheets(self.items.values(), &self.sheets) {
            self.sheets.truncate(before);
            return Err(e);
        }
        Ok(())
    }

    /// Detach and return every sheet, e.g. to resize them before `rescale`
    pub fn take_sheets(&mut self) -> Vec<ImageSheet> {
        std::mem::take(&mut self.sheets)
    }

    /// Parse `font_bytes` and bind it at the current point size.
    ///
    /// The pixel size follows the point size at the build-time resolution,
    /// so after `rescale(f)` every font metric is `f` times its old value.
    pub fn reattach_font(&mut self, font_bytes: &[u8]) -> Result<()> {
        let provider = TtfProvider::with_pixels_per_em(
            font_bytes.to_vec(),
            self.face_index,
            self.pixels_per_em(),
        )?;
        self.font = Some(Box::new(provider));
        tracing::info!("Reattached font at {}pt", self.font_point_size);
        Ok(())
    }

    /// Attach an already sized raster provider
    pub fn attach_provider(&mut self, provider: Box<dyn RasterProvider>) {
        self.font = Some(provider);
    }

    /// Whether kerning and line metrics are available
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn font(&self) -> Result<&dyn RasterProvider> {
        self.font.as_deref().ok_or(AtlasError::NoFont)
    }

    /// Kerning between two adjacent characters
    pub fn kerning(&self, left: char, right: char) -> Result<f32> {
        Ok(self.font()?.kern(left, right).to_f32())
    }

    /// Recommended distance between two baselines
    pub fn line_height(&self) -> Result<f32> {
        Ok(self.font()?.line_metrics().height.to_f32())
    }

    /// Distance from the top of a line to its baseline
    pub fn ascent(&self) -> Result<f32> {
        Ok(self.font()?.line_metrics().ascent.to_f32())
    }

    /// Distance from the baseline to the bottom of a line
    pub fn descent(&self) -> Result<f32> {
        Ok(self.font()?.line_metrics().descent.to_f32())
    }

    /// Scale every pixel- and point-derived number by `factor`.
    ///
    /// For use after the sheet images were resized by the same factor
    /// outside the atlas. UV fractions and sheet pixels are left alone, and
    /// any attached font keeps its old size until reattached.
    ///
    /// Attached sheets must already have the new size; otherwise this fails
    /// with `SheetMismatch` and nothing changes. Detach them with
    /// `take_sheets` and add the resized ones back afterwards.
    pub fn rescale(&mut self, factor: f64) -> Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "rescale factor must be positive, got {}",
                factor
            )));
        }

        let mut items = self.items.clone();
        for item in items.values_mut() {
            item.scale(factor as f32);
        }
        check_sheets(items.values(), &self.sheets)?;

        self.items = items;
        self.font_point_size *= factor;
        self.resolution *= factor;
        self.padding *= factor as f32;

        tracing::info!("Scaled atlas numbers by {}", factor);
        Ok(())
    }

    /// Item for `c`, `None` if the character is not renderable
    pub fn get(&self, c: char) -> Option<&GlyphItem> {
        self.items.get(&c)
    }

    /// All items, in no particular order
    pub fn items(&self) -> impl Iterator<Item = &GlyphItem> {
        self.items.values()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All sheets in index order
    pub fn sheets(&self) -> &[ImageSheet] {
        &self.sheets
    }

    /// Sheet by index
    pub fn sheet(&self, index: usize) -> Option<&ImageSheet> {
        self.sheets.get(index)
    }

    /// Font size in points
    pub fn font_point_size(&self) -> f64 {
        self.font_point_size
    }

    /// Rasterization resolution (DPI)
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Pixels per point the glyphs were rasterized at
    pub fn pixels_per_point(&self) -> f64 {
        self.pixels_per_point
    }

    /// Pixel size a reattached font is bound at
    pub fn pixels_per_em(&self) -> f64 {
        self.font_point_size * self.pixels_per_point
    }

    /// Face index within a font collection
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// Glyph padding in pixels
    pub fn padding(&self) -> f32 {
        self.padding
    }
}

/// Fail unless every item's sheet is attached and as large as its UV
/// fractions imply. No sheets at all is accepted.
fn check_sheets<'a>(items: impl IntoIterator<Item = &'a GlyphItem>, sheets: &[ImageSheet]) -> Result<()> {
    if sheets.is_empty() {
        return Ok(());
    }

    for item in items {
        let Some(sheet) = sheets.get(item.sheet_index) else {
            return Err(AtlasError::MissingSheet {
                character: item.character,
                sheet_index: item.sheet_index,
                sheets: sheets.len(),
            });
        };
        if !spans(item.width, item.uv_width, sheet.width())
            || !spans(item.height, item.uv_height, sheet.height())
        {
            return Err(AtlasError::SheetMismatch {
                character: item.character,
                sheet_index: item.sheet_index,
                width: sheet.width(),
                height: sheet.height(),
            });
        }
    }
    Ok(())
}

/// Whether `pixels` over a `uv` fraction agrees with a sheet side of `sheet_pixels`
fn spans(pixels: f32, uv: f32, sheet_pixels: u32) -> bool {
    if uv <= 0.0 {
        return true;
    }
    (pixels / uv - sheet_pixels as f32).abs() <= SHEET_TOLERANCE
}

/// File name for sheet `index` under `prefix`
pub fn sheet_path(prefix: &Path, index: usize) -> PathBuf {
    PathBuf::from(format!("{}-{}.png", prefix.display(), index))
}
