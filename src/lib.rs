//! # Punkify - Pixel-Art Avatar Generator
//!
//! Punkify turns an arbitrary photo into a fixed-size pixel-art avatar:
//! the source is squared up and downsampled to a coarse grid, every grid
//! cell is quantized to a constrained color palette, each cell becomes a
//! solid block on the output canvas, and seeded randomness optionally
//! composites cosmetic features (hair, eyewear, beard, an accessory) on
//! top.
//!
//! Given the same source bytes, configuration, and seed, the output PNG
//! is byte-identical across runs — every random decision flows from one
//! injected, seedable generator.
//!
//! ## Quick Start
//!
//! ```
//! use punkify::{PipelineConfig, generate};
//!
//! // Any decodable raster format works as input; a tiny PNG here.
//! let mut source = Vec::new();
//! image::RgbaImage::from_pixel(32, 32, image::Rgba([240, 200, 160, 255]))
//!     .write_to(&mut std::io::Cursor::new(&mut source), image::ImageFormat::Png)
//!     .unwrap();
//!
//! let config = PipelineConfig {
//!     seed: Some(1337),
//!     ..PipelineConfig::punk()
//! };
//!
//! let avatar = generate(&source, &config)?;
//! println!("applied features: {:?}", avatar.applied);
//! assert!(!avatar.png_data.is_empty());
//! # Ok::<(), punkify::PunkifyError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`color`] | RGB value type with hex parsing |
//! | [`palette`] | Fixed color palettes and nearest-color quantization |
//! | [`sample`] | Square cropping and grid downsampling |
//! | [`render`] | Solid-block canvas rendering |
//! | [`feature`] | Seeded cosmetic overlay engine |
//! | [`pipeline`] | End-to-end orchestration and configuration |
//! | [`error`] | Error types |
//!
//! ## Determinism
//!
//! The core performs no I/O and holds no global state. Each [`generate`]
//! call owns its buffers end-to-end, so calls may run fully in parallel;
//! within a call, per-cell quantization is parallelized while overlay
//! painting consumes its RNG stream strictly in order.

pub mod color;
pub mod error;
pub mod feature;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod sample;

// Re-exports for convenience
pub use error::PunkifyError;
pub use pipeline::{Avatar, PipelineConfig, generate};
