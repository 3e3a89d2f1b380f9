//! Sheet allocation and glyph compositing
//!
//! Packs pending glyphs into a fresh sheet, draws every glyph that found a
//! spot, and opens another sheet for the leftovers until nothing is pending.

use ratlas_font::{GlyphMetrics, RasterProvider};

use crate::atlas::GlyphItem;
use crate::packer::{self, Position};
use crate::sheet::ImageSheet;
use crate::{AtlasError, Result};

/// Result of placing every glyph
#[derive(Debug)]
pub struct Allocation {
    /// One item per input glyph, in input order
    pub items: Vec<GlyphItem>,
    /// Sheets in index order
    pub sheets: Vec<ImageSheet>,
}

/// Distributes glyphs over as many fixed-size sheets as needed
#[derive(Debug, Clone, Copy)]
pub struct SheetAllocator {
    sheet_width: u32,
    sheet_height: u32,
}

impl SheetAllocator {
    pub fn new(sheet_width: u32, sheet_height: u32) -> Self {
        Self { sheet_width, sheet_height }
    }

    /// Fail on the first glyph that no empty sheet could hold
    pub fn validate(&self, glyphs: &[GlyphMetrics]) -> Result<()> {
        match glyphs
            .iter()
            .find(|m| m.width > self.sheet_width || m.height > self.sheet_height)
        {
            Some(m) => Err(self.unplaceable(m)),
            None => Ok(()),
        }
    }

    /// Place, rasterize and composite every glyph
    pub fn allocate(&self, provider: &dyn RasterProvider, glyphs: &[GlyphMetrics]) -> Result<Allocation> {
        self.validate(glyphs)?;

        let mut slots: Vec<Option<(usize, Position)>> = vec![None; glyphs.len()];
        let mut sheets = Vec::new();

        loop {
            let pending: Vec<usize> = (0..glyphs.len()).filter(|&i| slots[i].is_none()).collect();
            let Some(&first) = pending.first() else {
                break;
            };

            let sheet_index = sheets.len();
            let mut sheet = ImageSheet::new(self.sheet_width, self.sheet_height);

            // pack() orders tallest first
            let rects: Vec<(u32, u32)> = pending
                .iter()
                .map(|&i| (glyphs[i].width, glyphs[i].height))
                .collect();
            let placements = packer::pack(self.sheet_width, self.sheet_height, &rects);

            let mut placed = 0usize;
            for (&i, placement) in pending.iter().zip(placements) {
                let Some(position) = placement else {
                    continue;
                };
                let metrics = &glyphs[i];
                let bitmap = provider.rasterize(metrics.character, metrics.width, metrics.height, metrics.origin);
                sheet.blit(position.x, position.y, &bitmap);
                slots[i] = Some((sheet_index, position));
                placed += 1;
            }

            if placed == 0 {
                return Err(self.unplaceable(&glyphs[first]));
            }

            tracing::debug!(
                "Sheet {}: placed {} of {} pending glyphs",
                sheet_index,
                placed,
                pending.len()
            );
            sheets.push(sheet);
        }

        let items = glyphs
            .iter()
            .zip(slots)
            .filter_map(|(metrics, slot)| {
                slot.map(|(sheet_index, position)| {
                    GlyphItem::placed(metrics, sheet_index, position, self.sheet_width, self.sheet_height)
                })
            })
            .collect();

        Ok(Allocation { items, sheets })
    }

    fn unplaceable(&self, metrics: &GlyphMetrics) -> AtlasError {
        AtlasError::UnplaceableGlyph {
            character: metrics.character,
            width: metrics.width,
            height: metrics.height,
            sheet_width: self.sheet_width,
            sheet_height: self.sheet_height,
        }
    }
}
