//! Atlas Serialization
//!
//! Compact binary format for atlas metadata. Sheets are stored separately
//! as images; the live font and packing nodes are never written.
//!
//! Layout:
//! ```text
//! "RATL" | version: u16 | payload_len: varint | payload
//! payload = point_size: f64 | resolution: f64 | pixels_per_point: f64
//!           padding: f32 | face_index: varint | count: varint | item*
//! item    = codepoint: varint | advance bearing_x descent width height
//!           uv_x uv_y uv_width uv_height: f32 | sheet_index: varint
//! ```
//! All fixed-width values are little-endian. Items are written in code point
//! order so equal atlases encode to equal bytes.

use std::collections::HashMap;

use crate::atlas::GlyphItem;

/// File signature
pub const MAGIC: [u8; 4] = *b"RATL";

/// Current format version
pub const VERSION: u16 = 2;

/// Serialization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Buffer too short")]
    BufferTooShort,

    #[error("Invalid format")]
    InvalidFormat,

    #[error("Not an atlas file")]
    BadMagic,

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u16),

    #[error("Invalid code point: {0:#x}")]
    InvalidCodepoint(u32),

    #[error("Duplicate glyph: {0:?}")]
    DuplicateGlyph(char),

    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
}

/// Scalar fields written ahead of the items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasHeader {
    pub font_point_size: f64,
    pub resolution: f64,
    /// Pixels per point the font was rasterized at
    pub pixels_per_point: f64,
    pub padding: f32,
    pub face_index: u32,
}

/// Header and items decoded from an atlas file
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasRecord {
    pub header: AtlasHeader,
    pub items: HashMap<char, GlyphItem>,
}

/// Write variable-length integer (LEB128)
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Read variable-length integer (LEB128)
pub fn read_varint(buf: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if shift >= 64 {
            return Err(CodecError::InvalidFormat);
        }

        result |= ((byte & 0x7F) as u64) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(CodecError::BufferTooShort)
}

/// Write u16 little-endian
pub fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write f32 little-endian
pub fn write_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write f64 little-endian
pub fn write_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write length-prefixed bytes
pub fn write_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    write_varint(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

/// Sequential reader over a byte slice
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + N)
            .ok_or(CodecError::BufferTooShort)?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    fn f64(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_le_bytes(self.take()?))
    }

    fn varint(&mut self) -> Result<u64, CodecError> {
        let (value, consumed) = read_varint(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    fn bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = usize::try_from(self.varint()?).map_err(|_| CodecError::InvalidFormat)?;
        let end = self.pos.checked_add(len).ok_or(CodecError::InvalidFormat)?;
        let bytes = self.buf.get(self.pos..end).ok_or(CodecError::BufferTooShort)?;
        self.pos = end;
        Ok(bytes)
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

/// Encode atlas metadata
pub fn encode(header: &AtlasHeader, items: &HashMap<char, GlyphItem>) -> Vec<u8> {
    let mut payload = Vec::with_capacity(40 + items.len() * 48);
    write_f64(&mut payload, header.font_point_size);
    write_f64(&mut payload, header.resolution);
    write_f64(&mut payload, header.pixels_per_point);
    write_f32(&mut payload, header.padding);
    write_varint(&mut payload, header.face_index as u64);

    let mut sorted: Vec<&GlyphItem> = items.values().collect();
    sorted.sort_by_key(|item| item.character);

    write_varint(&mut payload, sorted.len() as u64);
    for item in sorted {
        write_varint(&mut payload, item.character as u64);
        for value in [
            item.advance,
            item.bearing_x,
            item.descent,
            item.width,
            item.height,
            item.uv_x,
            item.uv_y,
            item.uv_width,
            item.uv_height,
        ] {
            write_f32(&mut payload, value);
        }
        write_varint(&mut payload, item.sheet_index as u64);
    }

    let mut buf = Vec::with_capacity(payload.len() + 12);
    buf.extend_from_slice(&MAGIC);
    write_u16(&mut buf, VERSION);
    write_bytes(&mut buf, &payload);
    buf
}

/// Decode atlas metadata, rejecting anything malformed
pub fn decode(buf: &[u8]) -> Result<AtlasRecord, CodecError> {
    let mut reader = Reader::new(buf);
    if reader.take::<4>().map_err(|_| CodecError::BadMagic)? != MAGIC {
        return Err(CodecError::BadMagic);
    }
    let version = reader.u16()?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let payload = reader.bytes()?;
    reader.finish()?;

    let mut reader = Reader::new(payload);
    let header = AtlasHeader {
        font_point_size: reader.f64()?,
        resolution: reader.f64()?,
        pixels_per_point: reader.f64()?,
        padding: reader.f32()?,
        face_index: u32::try_from(reader.varint()?).map_err(|_| CodecError::InvalidFormat)?,
    };

    let count = usize::try_from(reader.varint()?).map_err(|_| CodecError::InvalidFormat)?;
    // Each item takes at least 38 bytes; don't trust the count for allocation
    let mut items = HashMap::with_capacity(count.min(reader.remaining() / 38));
    for _ in 0..count {
        let item = read_item(&mut reader)?;
        let character = item.character;
        if items.insert(character, item).is_some() {
            return Err(CodecError::DuplicateGlyph(character));
        }
    }
    reader.finish()?;

    Ok(AtlasRecord { header, items })
}

fn read_item(reader: &mut Reader<'_>) -> Result<GlyphItem, CodecError> {
    let code = reader.varint()?;
    let code = u32::try_from(code).map_err(|_| CodecError::InvalidFormat)?;
    let character = char::from_u32(code).ok_or(CodecError::InvalidCodepoint(code))?;

    let advance = reader.f32()?;
    let bearing_x = reader.f32()?;
    let descent = reader.f32()?;
    let width = reader.f32()?;
    let height = reader.f32()?;
    let uv_x = reader.f32()?;
    let uv_y = reader.f32()?;
    let uv_width = reader.f32()?;
    let uv_height = reader.f32()?;
    let sheet_index = usize::try_from(reader.varint()?).map_err(|_| CodecError::InvalidFormat)?;

    Ok(GlyphItem {
        character,
        advance,
        bearing_x,
        descent,
        width,
        height,
        uv_x,
        uv_y,
        uv_width,
        uv_height,
        sheet_index,
        placement: None,
    })
}
