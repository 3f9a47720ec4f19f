//! 24-bit RGB colors and the conversions between their textual, integer and
//! floating-point forms.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::{PaletteError, Result};

/// A point in raw RGB channel space, one `f64` per channel in `0.0..=255.0`.
pub type Point = [f64; 3];

/// An opaque 24-bit color.
///
/// Field order matters: the derived `Ord` compares red, then green, then blue,
/// which is the same order as comparing canonical `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a color from unbounded integer channels, clamping each to `0..=255`.
    pub fn from_channels(red: u32, green: u32, blue: u32) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    /// Parse `rrggbb` or `#rrggbb` (any case).
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidHex {
                input: input.to_string(),
            });
        }

        // All six bytes are ASCII hex digits, so slicing and radix parsing cannot fail.
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| PaletteError::InvalidHex {
                input: input.to_string(),
            })
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Canonical form: `#` followed by 6 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    pub fn to_point(&self) -> Point {
        [self.red as f64, self.green as f64, self.blue as f64]
    }

    /// Round every channel to the nearest integer and clamp it to `0..=255`.
    pub fn from_point(point: &Point) -> Self {
        Self::new(
            round_channel(point[0]),
            round_channel(point[1]),
            round_channel(point[2]),
        )
    }
}

#[inline]
fn clamp_channel(value: u32) -> u8 {
    value.min(u8::MAX as u32) as u8
}

/// NaN maps to 0 (saturating float-to-int cast).
#[inline]
fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.red, c.green, c.blue)
    }
}
