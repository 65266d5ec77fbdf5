//! # Color
//!
//! 8-bit RGB value type with `#RRGGBB` hex parsing and formatting.
//!
//! Palettes and feature catalogs are data, so [`Rgb`] serializes to and
//! from its hex string form (`"#ff4500"`), which is also how colors are
//! written on the command line and in config/catalog JSON files.
//!
//! ## Usage Example
//!
//! ```
//! use punkify::color::Rgb;
//!
//! let orange: Rgb = "#FF4500".parse().unwrap();
//! assert_eq!(orange, Rgb::new(255, 69, 0));
//! assert_eq!(orange.to_string(), "#ff4500");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for hex color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color in RGB space.
    ///
    /// Monotonic in the true Euclidean distance, so nearest-color
    /// comparisons never need the square root. Maximum value is
    /// `3 * 255u32.pow(2)`, well within `u32`.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// This color as a fully opaque RGBA pixel.
    #[inline]
    pub fn pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parse `#RRGGBB` or `#RGB` (each digit doubled), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let hex = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;

        if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(c));
        }

        let nibble = |c: u8| -> u8 {
            match c {
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                _ => c - b'A' + 10,
            }
        };

        let h = hex.as_bytes();
        match h.len() {
            3 => Ok(Self::new(
                nibble(h[0]) * 0x11,
                nibble(h[1]) * 0x11,
                nibble(h[2]) * 0x11,
            )),
            6 => Ok(Self::new(
                nibble(h[0]) * 16 + nibble(h[1]),
                nibble(h[2]) * 16 + nibble(h[3]),
                nibble(h[4]) * 16 + nibble(h[5]),
            )),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
