//! Atlas error types

use std::path::PathBuf;

use crate::codec::CodecError;

/// Errors surfaced by atlas build, reload and queries
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error(transparent)]
    FontParse(#[from] ratlas_font::FontError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid atlas data: {0}")]
    Serialization(#[from] CodecError),

    #[error(
        "Glyph {character:?} ({width}x{height}) does not fit in a {sheet_width}x{sheet_height} sheet"
    )]
    UnplaceableGlyph {
        character: char,
        width: u32,
        height: u32,
        sheet_width: u32,
        sheet_height: u32,
    },

    #[error("Glyph {character:?} is on sheet {sheet_index} but only {sheets} sheet(s) are attached")]
    MissingSheet {
        character: char,
        sheet_index: usize,
        sheets: usize,
    },

    #[error(
        "Sheet {sheet_index} is {width}x{height}, which does not match the size of glyph {character:?}"
    )]
    SheetMismatch {
        character: char,
        sheet_index: usize,
        width: u32,
        height: u32,
    },

    #[error("No font attached to atlas")]
    NoFont,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AtlasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image { path: path.into(), source }
    }
}
