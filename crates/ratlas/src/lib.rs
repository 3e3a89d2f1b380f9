//! ratlas - Glyph Atlas Builder
//!
//! Rasterizes a set of characters once, packs the bitmaps into fixed-size
//! sheets and keeps per-glyph metrics as texture-space fractions:
//! - Guillotine rectangle packing over a node arena
//! - Multi-sheet allocation and glyph compositing
//! - Compact binary atlas files plus PNG sheets
//! - Kerning and line metrics through an attached font
//! - In-place rescaling after sheets were resized externally
//!
//! # Example
//! ```rust,ignore
//! use ratlas::{Atlas, AtlasConfig};
//!
//! let config = AtlasConfig::default().with_font_point_size(48.0);
//! let atlas = Atlas::build(&font_bytes, &config, ('!'..='~').chain([' ']))?;
//! atlas.save("font.ratlas")?;
//! let sheets = atlas.save_sheets("font")?;
//!
//! let mut reloaded = Atlas::load("font.ratlas", &sheets)?;
//! reloaded.reattach_font(&font_bytes)?;
//! ```

pub mod allocator;
pub mod atlas;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod packer;
pub mod sheet;

#[cfg(test)]
mod test_font;

pub use allocator::{Allocation, SheetAllocator};
pub use atlas::{sheet_path, Atlas, GlyphItem, Placement};
pub use codec::CodecError;
pub use config::AtlasConfig;
pub use error::AtlasError;
pub use layout::{layout_text, LayoutOptions, PositionedGlyph};
pub use packer::{pack, NodeId, Packer, PackingNode, Position};
pub use sheet::ImageSheet;

// Re-export the font crate for provider implementations
pub use ratlas_font as font;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type Result<T> = std::result::Result<T, AtlasError>;
