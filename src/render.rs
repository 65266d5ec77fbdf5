//! # Pixel-Art Block Renderer
//!
//! This module turns a small G×G grid of RGBA samples into a full-size
//! canvas of solid color blocks, quantized to a fixed palette.
//!
//! ## How It Works
//!
//! The canvas is divided into G×G blocks of `block_size = C / G` pixels
//! (C must be an exact multiple of G). For each grid cell:
//!
//! 1. If the sample's alpha is at or below the threshold, the cell is
//!    skipped and the background fill stays visible — transparent input
//!    regions punch through to the background.
//! 2. Otherwise the sample's RGB is quantized to the nearest palette
//!    entry and the whole block is painted that one color.
//!
//! ```text
//! grid (G×G samples)          canvas (C×C pixels)
//! ┌───┬───┬───┐               ┌───────┬───────┬───────┐
//! │ r │ g │ · │   block_size  │ ███ R │ ███ G │ bg    │
//! ├───┼───┼───┤   ─────────►  ├───────┼───────┼───────┤
//! │ · │ w │ b │               │ bg    │ ███ W │ ███ B │
//! └───┴───┴───┘               └───────┴───────┴───────┘
//! ```
//!
//! Blocks are always flat fills: no anti-aliasing, no blending, no
//! partial blocks. Every output pixel belongs to exactly one block, and
//! every painted block's color is bit-for-bit a palette entry.
//!
//! ## Parallelism
//!
//! Cells are independent (blocks never overlap), so quantization runs on
//! the rayon pool. The painted result is identical to a sequential pass.
//!
//! ## Usage Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use punkify::{color::Rgb, palette::Palette, render};
//!
//! let grid = RgbaImage::from_pixel(4, 4, Rgba([250, 250, 250, 255]));
//! let palette = Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
//! let canvas = render::render_blocks(&grid, &palette, 8, Rgb::new(0, 0, 0), 128).unwrap();
//! assert!(canvas.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
//! ```

use image::RgbaImage;
use rayon::prelude::*;

use crate::color::Rgb;
use crate::error::PunkifyError;
use crate::palette::Palette;

/// Paint one solid `block_size` × `block_size` block at block coordinate
/// (`bx`, `by`).
pub(crate) fn fill_block(canvas: &mut RgbaImage, bx: u32, by: u32, block_size: u32, color: Rgb) {
    let pixel = color.pixel();
    let (px, py) = (bx * block_size, by * block_size);
    for y in py..py + block_size {
        for x in px..px + block_size {
            canvas.put_pixel(x, y, pixel);
        }
    }
}

/// Render `grid` onto a fresh `canvas_side` × `canvas_side` canvas.
///
/// Cells with alpha above `alpha_threshold` become solid blocks of their
/// nearest palette color; all other cells show `background`.
///
/// ## Errors
///
/// `InvalidConfiguration` if the grid is empty or non-square, or if
/// `canvas_side` is not an exact multiple of the grid side.
pub fn render_blocks(
    grid: &RgbaImage,
    palette: &Palette,
    canvas_side: u32,
    background: Rgb,
    alpha_threshold: u8,
) -> Result<RgbaImage, PunkifyError> {
    let (gw, gh) = grid.dimensions();
    if gw == 0 || gw != gh {
        return Err(PunkifyError::InvalidConfiguration(format!(
            "grid must be square and non-empty, got {}x{}",
            gw, gh
        )));
    }
    let grid_size = gw;
    if canvas_side % grid_size != 0 {
        return Err(PunkifyError::InvalidConfiguration(format!(
            "canvas side {} is not a multiple of grid size {}",
            canvas_side, grid_size
        )));
    }
    let block_size = canvas_side / grid_size;

    // Quantize all cells first; None marks a transparent cell.
    let cells: Vec<Option<Rgb>> = (0..grid_size * grid_size)
        .into_par_iter()
        .map(|i| {
            let (x, y) = (i % grid_size, i / grid_size);
            let sample = grid.get_pixel(x, y);
            if sample[3] > alpha_threshold {
                Some(palette.nearest(Rgb::new(sample[0], sample[1], sample[2])))
            } else {
                None
            }
        })
        .collect();

    let mut canvas = RgbaImage::from_pixel(canvas_side, canvas_side, background.pixel());
    for (i, cell) in cells.iter().enumerate() {
        if let Some(color) = cell {
            let i = i as u32;
            fill_block(&mut canvas, i % grid_size, i / grid_size, block_size, *color);
        }
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn bw_palette() -> Palette {
        Palette::new(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap()
    }

    #[test]
    fn test_divisibility_enforced() {
        let grid = RgbaImage::new(4, 4);
        let err = render_blocks(&grid, &bw_palette(), 10, Rgb::new(0, 0, 0), 128).unwrap_err();
        assert!(matches!(err, PunkifyError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_non_square_grid_rejected() {
        let grid = RgbaImage::new(4, 5);
        assert!(render_blocks(&grid, &bw_palette(), 8, Rgb::new(0, 0, 0), 128).is_err());
        let empty = RgbaImage::new(0, 0);
        assert!(render_blocks(&empty, &bw_palette(), 8, Rgb::new(0, 0, 0), 128).is_err());
    }

    #[test]
    fn test_white_grid_renders_solid_white() {
        // Spec scenario: G=4, C=8, black/white palette, black background,
        // all samples pure white opaque.
        let grid = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let canvas = render_blocks(&grid, &bw_palette(), 8, Rgb::new(0, 0, 0), 128).unwrap();
        assert_eq!(canvas.dimensions(), (8, 8));
        assert!(canvas.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_transparent_cell_shows_background() {
        // Same scenario with cell (0,0) fully transparent: its 2x2 block
        // stays background black.
        let mut grid = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        grid.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        let canvas = render_blocks(&grid, &bw_palette(), 8, Rgb::new(0, 0, 0), 128).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                let expected = if x < 2 && y < 2 {
                    Rgba([0, 0, 0, 255])
                } else {
                    Rgba([255, 255, 255, 255])
                };
                assert_eq!(*canvas.get_pixel(x, y), expected, "at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_alpha_threshold_boundary() {
        // alpha == threshold is transparent; threshold + 1 is painted.
        let mut grid = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        grid.put_pixel(0, 0, Rgba([255, 255, 255, 128]));
        grid.put_pixel(1, 0, Rgba([255, 255, 255, 129]));
        let canvas = render_blocks(&grid, &bw_palette(), 2, Rgb::new(0, 0, 0), 128).unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_blocks_are_uniform_palette_colors() {
        let palette = Palette::punk();
        let grid = RgbaImage::from_fn(8, 8, |x, y| {
            Rgba([(x * 31) as u8, (y * 31) as u8, ((x + y) * 15) as u8, 255])
        });
        let canvas = render_blocks(&grid, &palette, 64, Rgb::new(0x1a, 0x1a, 0x1a), 128).unwrap();

        for by in 0..8u32 {
            for bx in 0..8u32 {
                let first = *canvas.get_pixel(bx * 8, by * 8);
                for y in 0..8 {
                    for x in 0..8 {
                        assert_eq!(*canvas.get_pixel(bx * 8 + x, by * 8 + y), first);
                    }
                }
                let rgb = Rgb::new(first[0], first[1], first[2]);
                assert!(palette.contains(rgb), "block ({}, {}) not in palette", bx, by);
            }
        }
    }

    #[test]
    fn test_fill_block_stays_inside_its_block() {
        let mut canvas = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        fill_block(&mut canvas, 1, 1, 2, Rgb::new(255, 0, 0));
        let painted: Vec<_> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == Rgba([255, 0, 0, 255]))
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(painted, vec![(2, 2), (3, 2), (2, 3), (3, 3)]);
    }
}
