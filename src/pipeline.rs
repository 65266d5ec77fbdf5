//! # Pipeline Orchestrator
//!
//! One call from source image bytes to finished avatar:
//!
//! ```text
//! decode → crop/resample → block render → feature overlay → PNG encode
//! ```
//!
//! The orchestrator owns every intermediate buffer for the duration of
//! the call; nothing is shared, so any number of [`generate`] calls may
//! run in parallel with no coordination. On any failure the caller gets
//! a typed error and no partial output.
//!
//! ## Profiles
//!
//! The built-in profiles collapse the historical avatar variants into
//! configuration data:
//!
//! | Profile | Grid | Canvas | Palette | Catalog |
//! |---------|------|--------|---------|---------|
//! | `punk` | 50 | 400 | punk (12) | [`feature::punk_catalog`] |
//! | `punk-mini` | 32 | 384 | punk-soft (11) | [`feature::punk_catalog_32`] |
//!
//! ## Usage Example
//!
//! ```
//! use punkify::{PipelineConfig, generate};
//!
//! let mut src = Vec::new();
//! image::RgbaImage::from_pixel(64, 64, image::Rgba([200, 120, 40, 255]))
//!     .write_to(&mut std::io::Cursor::new(&mut src), image::ImageFormat::Png)
//!     .unwrap();
//!
//! let config = PipelineConfig {
//!     seed: Some(42),
//!     ..PipelineConfig::punk()
//! };
//! let avatar = generate(&src, &config).unwrap();
//! assert!(!avatar.png_data.is_empty());
//! assert_eq!(avatar.seed, 42);
//! ```

use image::ImageFormat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::color::Rgb;
use crate::error::PunkifyError;
use crate::feature::{self, FeatureKind, FeatureSpec};
use crate::palette::Palette;
use crate::render;
use crate::sample::{self, CropPolicy};

/// Names of the built-in profiles, in the order `parse` accepts them.
pub const PROFILES: &[&str] = &["punk", "punk-mini"];

/// Everything one `generate` call needs besides the source bytes.
///
/// Serializes to a single JSON object so a config file can drive the
/// whole pipeline; all fields have defaults (the `punk` profile), so
/// partial files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Side length of the sampling grid, in blocks.
    pub grid_size: u32,
    /// Side length of the output canvas, in pixels. Must be an exact
    /// multiple of `grid_size`.
    pub canvas_side: u32,
    /// Fill color visible wherever the source was transparent.
    pub background: Rgb,
    /// Samples with alpha at or below this are left as background.
    pub alpha_threshold: u8,
    /// How to square up the source image.
    pub crop: CropPolicy,
    /// Overlay RNG seed. `None` draws one from entropy per call.
    pub seed: Option<u64>,
    /// Allowed output colors.
    pub palette: Palette,
    /// Overlay features; empty disables overlays entirely.
    pub catalog: Vec<FeatureSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::punk()
    }
}

impl PipelineConfig {
    /// The classic 50-block, 400px profile.
    pub fn punk() -> Self {
        Self {
            grid_size: 50,
            canvas_side: 400,
            background: Rgb::new(0x1a, 0x1a, 0x1a),
            alpha_threshold: 128,
            crop: CropPolicy::CenterSquare,
            seed: None,
            palette: Palette::punk(),
            catalog: feature::punk_catalog(),
        }
    }

    /// The chunkier 32-block profile with the soft palette.
    pub fn punk_mini() -> Self {
        Self {
            grid_size: 32,
            canvas_side: 384,
            background: Rgb::new(0x1a, 0x1a, 0x1a),
            alpha_threshold: 128,
            crop: CropPolicy::CenterSquare,
            seed: None,
            palette: Palette::punk_soft(),
            catalog: feature::punk_catalog_32(),
        }
    }

    /// Look up a built-in profile by name (CLI `--profile`).
    pub fn parse(name: &str) -> Result<Self, String> {
        match name {
            "punk" => Ok(Self::punk()),
            "punk-mini" => Ok(Self::punk_mini()),
            other => Err(format!(
                "Unknown profile '{}'. Available: {}",
                other,
                PROFILES.join(", ")
            )),
        }
    }

    /// Pixel side length of one block.
    ///
    /// Fails with `InvalidConfiguration` if the canvas side is not an
    /// exact multiple of the grid size.
    pub fn block_size(&self) -> Result<u32, PunkifyError> {
        if self.grid_size == 0 {
            return Err(PunkifyError::InvalidConfiguration(
                "grid_size must be at least 1".to_string(),
            ));
        }
        if self.canvas_side % self.grid_size != 0 {
            return Err(PunkifyError::InvalidConfiguration(format!(
                "canvas side {} is not a multiple of grid size {}",
                self.canvas_side, self.grid_size
            )));
        }
        Ok(self.canvas_side / self.grid_size)
    }

    /// Check the whole configuration up front, before any pixel work.
    pub fn validate(&self) -> Result<(), PunkifyError> {
        self.block_size()?;
        feature::validate_catalog(&self.catalog, self.grid_size)
    }
}

/// A finished avatar: the encoded image plus the metadata needed to
/// audit and reproduce it.
#[derive(Debug, Clone)]
pub struct Avatar {
    /// PNG-encoded canvas.
    pub png_data: Vec<u8>,
    /// Feature kinds the overlay engine actually painted.
    pub applied: Vec<FeatureKind>,
    /// The seed that drove the overlay RNG. Equals `config.seed` when
    /// one was given, otherwise the entropy-drawn value — re-running
    /// with this seed reproduces the avatar exactly.
    pub seed: u64,
}

/// Convert `source_bytes` into a pixel-art avatar.
///
/// ## Errors
///
/// - `Decode` if the bytes are not a decodable image
/// - `InvalidImage` if the decoded image has zero area
/// - `InvalidConfiguration` for grid/canvas mismatches or a bad catalog
/// - `Encode` if PNG encoding fails
pub fn generate(source_bytes: &[u8], config: &PipelineConfig) -> Result<Avatar, PunkifyError> {
    config.validate()?;
    let block_size = config.block_size()?;

    let source = image::load_from_memory(source_bytes).map_err(PunkifyError::Decode)?;
    let grid = sample::crop_and_resample(&source, config.grid_size, config.crop)?;
    let mut canvas = render::render_blocks(
        &grid,
        &config.palette,
        config.canvas_side,
        config.background,
        config.alpha_threshold,
    )?;

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    let applied = feature::apply_features(
        &mut canvas,
        config.grid_size,
        block_size,
        &config.catalog,
        &mut rng,
    )?;

    let mut png_data = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
        .map_err(PunkifyError::Encode)?;

    Ok(Avatar {
        png_data,
        applied,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse() {
        assert_eq!(PipelineConfig::parse("punk").unwrap().grid_size, 50);
        assert_eq!(PipelineConfig::parse("punk-mini").unwrap().grid_size, 32);
        assert!(PipelineConfig::parse("vaporwave").is_err());
    }

    #[test]
    fn test_profiles_are_internally_consistent() {
        for name in PROFILES {
            let config = PipelineConfig::parse(name).unwrap();
            config.validate().unwrap();
            assert!(config.block_size().unwrap() > 0);
        }
    }

    #[test]
    fn test_block_size_requires_divisibility() {
        let config = PipelineConfig {
            canvas_side: 401,
            ..PipelineConfig::punk()
        };
        assert!(matches!(
            config.block_size(),
            Err(PunkifyError::InvalidConfiguration(_))
        ));

        let zero_grid = PipelineConfig {
            grid_size: 0,
            ..PipelineConfig::punk()
        };
        assert!(zero_grid.block_size().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = PipelineConfig {
            seed: Some(99),
            ..PipelineConfig::punk_mini()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid_size, 32);
        assert_eq!(back.seed, Some(99));
        assert_eq!(back.palette, config.palette);
        assert_eq!(back.catalog, config.catalog);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.grid_size, 50);
        assert_eq!(config.background, Rgb::new(0x1a, 0x1a, 0x1a));
    }

    #[test]
    fn test_garbage_bytes_fail_decode() {
        let err = generate(b"definitely not an image", &PipelineConfig::punk()).unwrap_err();
        assert!(matches!(err, PunkifyError::Decode(_)));
    }
}
