//! Single-run text layout over an atlas
//!
//! Walks a string with the pen, applying advances, kerning and line height,
//! and returns one textured rectangle per drawable character. No shaping:
//! one character is one glyph.

use crate::atlas::Atlas;
use crate::Result;

/// Layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Left edge of every line
    pub origin_x: f32,
    /// Top of the first line (y grows downward)
    pub origin_y: f32,
    /// Multiplies every atlas distance
    pub scale: f32,
    /// Wrap words that would cross `origin_x + max_width`
    pub max_width: Option<f32>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            scale: 1.0,
            max_width: None,
        }
    }
}

/// A glyph rectangle ready to be turned into a quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub character: char,
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub sheet_index: usize,
    pub uv_x: f32,
    pub uv_y: f32,
    pub uv_width: f32,
    pub uv_height: f32,
}

/// Lay out `text` with the atlas's metrics. Needs an attached font.
///
/// `'\n'` starts a new line; characters without an atlas item take no space.
pub fn layout_text(atlas: &Atlas, text: &str, options: &LayoutOptions) -> Result<Vec<PositionedGlyph>> {
    let scale = options.scale;
    let line_height = atlas.line_height()? * scale;
    let chars: Vec<char> = text.chars().collect();

    let mut glyphs = Vec::with_capacity(chars.len());
    let mut pen_x = options.origin_x;
    let mut baseline = options.origin_y + atlas.ascent()? * scale;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(max_width) = options.max_width {
            let word_start = c != ' ' && i > 0 && chars[i - 1] == ' ';
            if word_start && pen_x + word_width(atlas, &chars[i..], scale)? > options.origin_x + max_width {
                pen_x = options.origin_x;
                baseline += line_height;
            }
        }

        if c == '\n' {
            pen_x = options.origin_x;
            baseline += line_height;
            continue;
        }

        let Some(item) = atlas.get(c) else {
            continue;
        };

        let bottom = baseline + item.descent * scale;
        let height = item.height * scale;
        glyphs.push(PositionedGlyph {
            character: c,
            x: pen_x + item.bearing_x * scale,
            y: bottom - height,
            width: item.width * scale,
            height,
            sheet_index: item.sheet_index,
            uv_x: item.uv_x,
            uv_y: item.uv_y,
            uv_width: item.uv_width,
            uv_height: item.uv_height,
        });

        pen_x += item.advance * scale;
        if let Some(&next) = chars.get(i + 1) {
            pen_x += atlas.kerning(c, next)? * scale;
        }
    }

    Ok(glyphs)
}

/// Pen distance covered by the word at the start of `chars`
fn word_width(atlas: &Atlas, chars: &[char], scale: f32) -> Result<f32> {
    let word_len = chars
        .iter()
        .position(|&c| c == ' ' || c == '\n')
        .unwrap_or(chars.len());
    let word = &chars[..word_len];

    let mut width = 0.0;
    for (j, &c) in word.iter().enumerate() {
        if let Some(item) = atlas.get(c) {
            width += item.advance * scale;
        }
        if let Some(&next) = word.get(j + 1) {
            width += atlas.kerning(c, next)? * scale;
        }
    }
    Ok(width)
}
