//! Contains the [`cartoonize`] entry point and the [`CartoonPipeline`] builder
//! for the high level API.

mod cartoon_pipeline;

pub use cartoon_pipeline::CartoonPipeline;

use crate::{ClusterCount, Error, Raster, Window};

/// The number of clusters the cartoon pipeline posterizes images into.
pub const CLUSTER_COUNT: ClusterCount = ClusterCount::new_unchecked(32);

/// The maximum number of k-means reassignment passes in the cartoon pipeline.
pub const MAX_ITERATIONS: u32 = 10;

/// The median filter window of the cartoon pipeline.
pub const WINDOW: Window = Window::new_unchecked(9, 9);

/// The gradient magnitude above which the cartoon pipeline draws an outline.
pub const THRESHOLD: u32 = 100;

/// The default seed for the random number generators of the cartoon pipeline.
pub const SEED: u64 = 0;

/// Turns `raster` into a cartoon.
///
/// This posterizes the raster into 32 colors through k-means (at most 10 passes),
/// smooths the result with a 9×9 median filter, and finally outlines every pixel with a
/// Sobel gradient magnitude above 100 in black.
/// That is, it is shorthand for `CartoonPipeline::new(raster).cartoonized()`.
///
/// # Errors
/// Returns an error if the raster is smaller than the 9×9 median window.
///
/// # Examples
/// ```
/// # use cartoonette::{cartoonize, Raster, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// let raster = Raster::from_fn(32, 32, |x, y| Srgb::new(x as u8 * 8, y as u8 * 8, 128))?;
/// let cartoon = cartoonize(&raster)?;
/// assert_eq!(cartoon.dimensions(), raster.dimensions());
/// # Ok(())
/// # }
/// ```
pub fn cartoonize(raster: &Raster) -> Result<Raster, Error> {
    CartoonPipeline::new(raster).cartoonized()
}

/// Turns `raster` into a cartoon, running each stage in parallel.
///
/// The output is identical to [`cartoonize`].
///
/// # Errors
/// See [`cartoonize`].
#[cfg(feature = "threads")]
pub fn cartoonize_par(raster: &Raster) -> Result<Raster, Error> {
    CartoonPipeline::new(raster).cartoonized_par()
}
