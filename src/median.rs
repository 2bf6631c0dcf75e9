//! Sliding window median filtering for noise suppression.
//!
//! Each pixel whose [`Window`] fits entirely inside the raster is replaced by
//! the per-channel median of the pixels in its window.
//! The red, green, and blue medians are computed independently,
//! so the output color need not appear anywhere in the window.
//!
//! The pixels closer to the edge than the window radius form the border band,
//! which is filled according to [`Border`].

use crate::{select, Error, Raster, Window, BLACK};
use log::debug;
use palette::{cast::AsArrays, Srgb};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// How to fill the pixels whose window does not fit inside the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Border {
    /// Copy the input pixel.
    #[default]
    Copy,
    /// Paint the pixel opaque black.
    ///
    /// This reproduces the output of older versions of the filter bit for bit,
    /// where the border band was never written to.
    Black,
}

/// Reusable per channel buffers for the pixels of one window.
struct Channels {
    window: Window,
    values: [Vec<u8>; 3],
}

impl Channels {
    fn new(window: Window) -> Self {
        let len = window.len();
        Self {
            window,
            values: [vec![0; len], vec![0; len], vec![0; len]],
        }
    }

    /// Returns the per-channel median of the window centered on `(x, y)`.
    ///
    /// The window must fit inside the raster at this position.
    fn median(&mut self, raster: &Raster, x: u32, y: u32, rng: &mut impl Rng) -> Srgb<u8> {
        let (rx, ry) = self.window.radius();
        let width = self.window.width() as usize;
        let pixels = raster.pixels();

        for wy in 0..self.window.height() {
            let start = raster.index(x - rx, y + wy - ry);
            let row = pixels[start..(start + width)].as_arrays();
            let offset = wy as usize * width;
            for (wx, &[r, g, b]) in row.iter().enumerate() {
                self.values[0][offset + wx] = r;
                self.values[1][offset + wx] = g;
                self.values[2][offset + wx] = b;
            }
        }

        let middle = self.window.len() / 2;
        let [red, green, blue] = &mut self.values;
        Srgb::new(
            select::select(red, middle, rng),
            select::select(green, middle, rng),
            select::select(blue, middle, rng),
        )
    }
}

/// The initial output pixels: the values of the border band.
fn border_pixels(raster: &Raster, border: Border) -> Vec<Srgb<u8>> {
    match border {
        Border::Copy => raster.pixels().to_vec(),
        Border::Black => vec![BLACK; raster.pixels().len()],
    }
}

fn log_filtered(raster: &Raster, window: Window) {
    let (rx, ry) = window.radius();
    debug!(
        "median filtered {}x{} interior pixels with a {}x{} window",
        raster.width() - 2 * rx,
        raster.height() - 2 * ry,
        window.width(),
        window.height()
    );
}

/// Applies a median filter with the given `window` to `raster`.
///
/// `seed` seeds the pivot selection of the underlying quickselect.
/// It has no effect on the output, only on the running time.
///
/// # Errors
/// Returns [`InvalidArgument::WindowTooLarge`](crate::InvalidArgument::WindowTooLarge)
/// if the window is wider or taller than the raster.
///
/// # Examples
/// ```
/// # use cartoonette::{median::{self, Border}, Raster, Window, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// let gray = Srgb::new(128, 128, 128);
/// let speck = Raster::from_fn(5, 5, |x, y| {
///     if (x, y) == (2, 2) { Srgb::new(255, 0, 0) } else { gray }
/// })?;
///
/// let smoothed = median::filter(&speck, Window::square(3)?, Border::Copy, 0)?;
/// assert!(smoothed.pixels().iter().all(|&c| c == gray));
/// # Ok(())
/// # }
/// ```
pub fn filter(raster: &Raster, window: Window, border: Border, seed: u64) -> Result<Raster, Error> {
    window.check_fits(raster)?;

    let (rx, ry) = window.radius();
    let (width, height) = raster.dimensions();
    let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
    let mut channels = Channels::new(window);
    let mut output = border_pixels(raster, border);

    for y in ry..(height - ry) {
        for x in rx..(width - rx) {
            output[raster.index(x, y)] = channels.median(raster, x, y, rng);
        }
    }

    log_filtered(raster, window);

    Ok(raster.with_pixels(output))
}

/// Applies a median filter to `raster` in parallel, one row at a time.
///
/// The output is identical to [`filter`] for the same arguments.
///
/// # Errors
/// See [`filter`].
#[cfg(feature = "threads")]
pub fn filter_par(
    raster: &Raster,
    window: Window,
    border: Border,
    seed: u64,
) -> Result<Raster, Error> {
    window.check_fits(raster)?;

    let (rx, ry) = window.radius();
    let (width, height) = raster.dimensions();
    let mut output = border_pixels(raster, border);
    let rows = (ry as usize)..((height - ry) as usize);

    output
        .par_chunks_exact_mut(width as usize)
        .enumerate()
        .filter(|(y, _)| rows.contains(y))
        .for_each_init(
            || Channels::new(window),
            |channels, (y, row)| {
                let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed ^ y as u64);
                // y < height <= u32::MAX
                #[allow(clippy::cast_possible_truncation)]
                let y = y as u32;
                for x in rx..(width - rx) {
                    row[x as usize] = channels.median(raster, x, y, rng);
                }
            },
        );

    log_filtered(raster, window);

    Ok(raster.with_pixels(output))
}
