//! Packed 24-bit RGB color and the channel distance metric.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A packed `0xRRGGBB` color. The high byte is always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

/// Pure white, `0xFFFFFF`.
pub const WHITE: Color = Color(0xFF_FFFF);
/// Pure black, `0x000000`.
pub const BLACK: Color = Color(0x00_0000);
/// Chroma-key reference green, `0x00FF00`.
pub const GREEN: Color = Color(0x00_FF00);
/// Highlight color for diff visualization, `0xFF00FF`.
pub const MAGENTA: Color = Color(0xFF_00FF);

impl Color {
    /// Wraps a packed value, discarding anything above 24 bits.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed & 0xFF_FFFF)
    }

    /// Builds a color from its three channels.
    #[inline]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// The `0xRRGGBB` value.
    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    /// Red channel.
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the channels as `[r, g, b]`.
    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }
}

/// Chebyshev distance between two colors: the largest per-channel
/// absolute difference, in `[0, 255]`.
#[inline]
pub fn difference(a: Color, b: Color) -> u32 {
    let dr = a.red().abs_diff(b.red());
    let dg = a.green().abs_diff(b.green());
    let db = a.blue().abs_diff(b.blue());
    dr.max(dg).max(db) as u32
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:06X})", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

/// Failure to parse a `#RRGGBB` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?} (expected #RRGGBB)")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if hex.len() != 6 {
            return Err(ParseColorError(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Color::from_packed)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_decomposition() {
        let c = Color::from_packed(0x12_3456);
        assert_eq!(c.red(), 0x12);
        assert_eq!(c.green(), 0x34);
        assert_eq!(c.blue(), 0x56);
        assert_eq!(Color::from_rgb(0x12, 0x34, 0x56), c);
    }

    #[test]
    fn test_high_byte_masked() {
        let c = Color::from_packed(0xFF12_3456);
        assert_eq!(c.packed(), 0x12_3456);
    }

    #[test]
    fn test_difference_is_chebyshev() {
        let a = Color::from_rgb(10, 200, 30);
        let b = Color::from_rgb(20, 100, 35);
        // channel diffs: 10, 100, 5
        assert_eq!(difference(a, b), 100);
        assert_eq!(difference(b, a), 100);
        assert_eq!(difference(a, a), 0);
        assert_eq!(difference(BLACK, WHITE), 255);
        assert_eq!(difference(GREEN, MAGENTA), 255);
    }

    #[test]
    fn test_parse_and_display() {
        let c: Color = "#00FF00".parse().unwrap();
        assert_eq!(c, GREEN);
        assert_eq!("0xff00ff".parse::<Color>().unwrap(), MAGENTA);
        assert_eq!(WHITE.to_string(), "#FFFFFF");
        assert!("#FFF".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
    }
}
