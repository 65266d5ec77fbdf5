//! # Downsampler/Cropper
//!
//! Reduces an arbitrary-size source image to the small G×G grid of RGBA
//! samples that drives block rendering. Two cropping policies:
//!
//! - **CenterSquare**: crop the largest centered square, then resample.
//!   The default for raw photos.
//! - **Stretch**: resample the full frame to G×G, ignoring aspect ratio.
//!   For callers that already cropped the region of interest (e.g. an
//!   external face detector).
//!
//! Resampling uses `FilterType::Triangle`, a deterministic area filter
//! that averages each block's source region. Alpha is carried through
//! (sources without an alpha channel decode as fully opaque).

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use serde::{Deserialize, Serialize};

use crate::error::PunkifyError;

/// How to obtain a square region from the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropPolicy {
    /// Largest centered square (`side = min(width, height)`).
    #[default]
    CenterSquare,
    /// Use the whole frame, stretching non-square aspect ratios.
    Stretch,
}

/// Crop per `policy` and resample to a `grid_size` × `grid_size` RGBA grid.
///
/// ## Errors
///
/// - `InvalidImage` if the source has zero width or height
/// - `InvalidConfiguration` if `grid_size` is zero
pub fn crop_and_resample(
    source: &DynamicImage,
    grid_size: u32,
    policy: CropPolicy,
) -> Result<RgbaImage, PunkifyError> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(PunkifyError::InvalidImage { width, height });
    }
    if grid_size == 0 {
        return Err(PunkifyError::InvalidConfiguration(
            "grid_size must be at least 1".to_string(),
        ));
    }

    let square = match policy {
        CropPolicy::CenterSquare => {
            let side = width.min(height);
            let sx = (width - side) / 2;
            let sy = (height - side) / 2;
            source.crop_imm(sx, sy, side, side)
        }
        CropPolicy::Stretch => source.clone(),
    };

    Ok(square
        .resize_exact(grid_size, grid_size, FilterType::Triangle)
        .to_rgba8())
}
