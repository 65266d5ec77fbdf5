//! # Palette & Quantizer
//!
//! An ordered, immutable set of reference colors plus nearest-color
//! lookup. Quantization maps an arbitrary RGB sample to the palette entry
//! with the smallest Euclidean distance in RGB space; ties go to the
//! entry declared first, which makes the mapping a pure function of the
//! sample and the palette ordering.
//!
//! ## Built-in Palettes
//!
//! | Name | Entries | Notes |
//! |------|---------|-------|
//! | `punk` | 12 | Pure black first, includes dark olive `#4a412a` |
//! | `punk-soft` | 11 | Near-black `#1a1a1a` first, no olive |
//!
//! ## Usage Example
//!
//! ```
//! use punkify::{color::Rgb, palette::Palette};
//!
//! let palette = Palette::punk();
//! let q = palette.nearest(Rgb::new(250, 250, 250));
//! assert_eq!(q, Rgb::new(255, 255, 255));
//! ```

use crate::color::Rgb;
use crate::error::PunkifyError;
use serde::{Deserialize, Serialize};

/// Reference colors for the `punk` profile.
const PUNK: [Rgb; 12] = [
    Rgb::new(0x00, 0x00, 0x00), // black
    Rgb::new(0x2d, 0x1e, 0x2f), // dark purple
    Rgb::new(0x66, 0x33, 0x99), // purple
    Rgb::new(0x8b, 0x45, 0x13), // brown
    Rgb::new(0xda, 0xa5, 0x20), // golden
    Rgb::new(0xf0, 0xe6, 0x8c), // khaki
    Rgb::new(0xff, 0x69, 0xb4), // pink
    Rgb::new(0xff, 0x45, 0x00), // red orange
    Rgb::new(0x32, 0xcd, 0x32), // green
    Rgb::new(0x1e, 0x90, 0xff), // blue
    Rgb::new(0xff, 0xff, 0xff), // white
    Rgb::new(0x4a, 0x41, 0x2a), // dark olive
];

/// Reference colors for the `punk-mini` profile. Softer shadows: the
/// darkest entry is `#1a1a1a` rather than pure black.
const PUNK_SOFT: [Rgb; 11] = [
    Rgb::new(0x1a, 0x1a, 0x1a),
    Rgb::new(0x2d, 0x1e, 0x2f),
    Rgb::new(0x66, 0x33, 0x99),
    Rgb::new(0x8b, 0x45, 0x13),
    Rgb::new(0xda, 0xa5, 0x20),
    Rgb::new(0xf0, 0xe6, 0x8c),
    Rgb::new(0xff, 0x69, 0xb4),
    Rgb::new(0xff, 0x45, 0x00),
    Rgb::new(0x32, 0xcd, 0x32),
    Rgb::new(0x1e, 0x90, 0xff),
    Rgb::new(0xff, 0xff, 0xff),
];

/// An ordered, non-empty list of allowed output colors.
///
/// The ordering matters: [`Palette::nearest`] breaks distance ties in
/// favor of the earlier entry. Serializes as a JSON array of hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette from an ordered color list.
    ///
    /// Fails with `InvalidConfiguration` on an empty list so that
    /// [`Palette::nearest`] stays infallible.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, PunkifyError> {
        if colors.is_empty() {
            return Err(PunkifyError::InvalidConfiguration(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// The 12-color punk palette.
    pub fn punk() -> Self {
        Self {
            colors: PUNK.to_vec(),
        }
    }

    /// The 11-color soft punk palette.
    pub fn punk_soft() -> Self {
        Self {
            colors: PUNK_SOFT.to_vec(),
        }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        false // non-empty by construction
    }

    /// Whether `color` equals some entry bit-for-bit.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Quantize `sample` to the nearest palette entry.
    ///
    /// Distance is squared Euclidean over the RGB channels (alpha never
    /// participates). The scan uses strict `<`, so the first-declared
    /// entry wins any tie. Total over the 24-bit RGB domain.
    pub fn nearest(&self, sample: Rgb) -> Rgb {
        let mut best = self.colors[0];
        let mut best_dist = sample.distance_sq(best);

        for &candidate in &self.colors[1..] {
            let dist = sample.distance_sq(candidate);
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = PunkifyError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}
