//! 26.6 Fixed-Point Arithmetic
//!
//! Sub-pixel positions and distances as reported by the rasterizer.
//! 26 bits of integer part and 6 fractional bits (1/64 pixel).

use std::ops::{Add, Sub, Neg};
use std::cmp::Ordering;

/// 26.6 fixed-point number (32-bit total)
///
/// - 26 bits for integer part
/// - 6 bits for fractional part: precision of 1/64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Fixed26Dot6(i32);

impl Fixed26Dot6 {
    pub const FRAC_BITS: u32 = 6;
    pub const SCALE: i32 = 1 << Self::FRAC_BITS;

    pub const ZERO: Fixed26Dot6 = Fixed26Dot6(0);
    pub const ONE: Fixed26Dot6 = Fixed26Dot6(Self::SCALE);

    /// Create from raw bits
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Get raw bits
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Create from a whole number of pixels
    #[inline]
    pub const fn from_i32(value: i32) -> Self {
        Self(value << Self::FRAC_BITS)
    }

    /// Create from f32, rounding to the nearest 1/64
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self((value * Self::SCALE as f32).round() as i32)
    }

    /// Convert to f32
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::SCALE as f32
    }

    /// Greatest whole pixel less than or equal to this value
    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Least whole pixel greater than or equal to this value
    #[inline]
    pub const fn ceil(self) -> i32 {
        (self.0 + Self::SCALE - 1) >> Self::FRAC_BITS
    }
}

impl Add for Fixed26Dot6 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed26Dot6 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed26Dot6 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl PartialOrd for Fixed26Dot6 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fixed26Dot6 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl From<i32> for Fixed26Dot6 {
    #[inline]
    fn from(value: i32) -> Self {
        Self::from_i32(value)
    }
}

/// A point in 26.6 pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPoint {
    pub x: Fixed26Dot6,
    pub y: Fixed26Dot6,
}

impl FixedPoint {
    pub const fn new(x: Fixed26Dot6, y: Fixed26Dot6) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in 26.6 pixel space.
///
/// Glyph bounds are relative to the pen origin on the baseline, so ink above
/// the baseline has a negative `min.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedRect {
    pub min: FixedPoint,
    pub max: FixedPoint,
}

impl FixedRect {
    pub const fn new(min: FixedPoint, max: FixedPoint) -> Self {
        Self { min, max }
    }

    /// True when the rectangle encloses no ink
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }
}
