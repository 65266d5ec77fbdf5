//! # Error Types
//!
//! This module defines error types used throughout the punkify library.

use thiserror::Error;

/// Main error type for punkify operations
#[derive(Debug, Error)]
pub enum PunkifyError {
    /// Source bytes could not be decoded as an image
    #[error("Failed to decode source image: {0}")]
    Decode(image::ImageError),

    /// Source image has no pixels
    #[error("Invalid source image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// Bad pipeline configuration (grid/canvas mismatch, out-of-range
    /// feature rectangle, empty palette, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Output canvas could not be encoded
    #[error("Failed to encode avatar: {0}")]
    Encode(image::ImageError),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
