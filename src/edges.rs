//! Sobel edge detection for outlining.
//!
//! The raster is reduced to [luminosity](crate::grayscale) values, and the 3×3 Sobel kernels
//! are convolved with each interior pixel's neighborhood:
//!
//! ```text
//!       -1  0  1          1  2  1
//! Gx =  -2  0  2    Gy =  0  0  0
//!       -1  0  1         -1 -2 -1
//! ```
//!
//! The gradient magnitude `sqrt(Gx² + Gy²)` (truncated) of pixels on the outermost rows
//! and columns is always `0`. Pixels with a magnitude above the threshold become black outlines,
//! all other pixels keep their original color.

use crate::{grayscale, Raster, BLACK};
#[cfg(feature = "threads")]
use rayon::prelude::*;

type Kernel3 = [[i32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// Computes the truncated gradient magnitude at `(x, y)`.
///
/// Returns `0` for pixels on the outermost rows and columns.
#[inline]
fn magnitude(gray: &[u8], width: usize, height: usize, x: usize, y: usize) -> u32 {
    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        return 0;
    }

    let mut sum_x = 0;
    let mut sum_y = 0;
    for (ky, (kx_row, ky_row)) in SOBEL_KERNEL_X.iter().zip(&SOBEL_KERNEL_Y).enumerate() {
        let start = (y + ky - 1) * width + x - 1;
        let row = &gray[start..(start + 3)];
        for ((&value, kx), ky) in row.iter().zip(kx_row).zip(ky_row) {
            let value = i32::from(value);
            sum_x += value * kx;
            sum_y += value * ky;
        }
    }

    let squared = sum_x * sum_x + sum_y * sum_y;
    // at most sqrt(2) * 4 * 255
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        f64::from(squared).sqrt() as u32
    }
}

fn magnitudes_of(gray: &[u8], width: u32, height: u32) -> Vec<u32> {
    let (width, height) = (width as usize, height as usize);
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| magnitude(gray, width, height, x, y))
        .collect()
}

/// Returns the row-major Sobel gradient magnitude of each pixel in `raster`.
#[must_use]
pub fn gradient_magnitudes(raster: &Raster) -> Vec<u32> {
    let (width, height) = raster.dimensions();
    magnitudes_of(&grayscale::to_grayscale(raster), width, height)
}

/// Paints each pixel whose gradient magnitude is above `threshold` black,
/// copying every other pixel from `raster`.
#[must_use]
pub fn detect(raster: &Raster, threshold: u32) -> Raster {
    let pixels = gradient_magnitudes(raster)
        .into_iter()
        .zip(raster.pixels())
        .map(|(magnitude, &pixel)| if magnitude > threshold { BLACK } else { pixel })
        .collect();

    raster.with_pixels(pixels)
}

/// Returns the row-major Sobel gradient magnitude of each pixel in `raster`, in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn gradient_magnitudes_par(raster: &Raster) -> Vec<u32> {
    let gray = grayscale::to_grayscale_par(raster);
    let (width, height) = raster.dimensions();
    let (width, height) = (width as usize, height as usize);

    let mut magnitudes = vec![0; gray.len()];
    magnitudes
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = magnitude(&gray, width, height, x, y);
            }
        });

    magnitudes
}

/// Outlines `raster` in parallel.
///
/// The output is identical to [`detect`] for the same arguments.
#[cfg(feature = "threads")]
#[must_use]
pub fn detect_par(raster: &Raster, threshold: u32) -> Raster {
    let pixels = gradient_magnitudes_par(raster)
        .into_par_iter()
        .zip(raster.pixels())
        .map(|(magnitude, &pixel)| if magnitude > threshold { BLACK } else { pixel })
        .collect();

    raster.with_pixels(pixels)
}
