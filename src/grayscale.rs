//! Luminosity based grayscale conversion.

use crate::Raster;
use palette::Srgb;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The weight of each of the red, green, and blue channels.
const WEIGHTS: [f64; 3] = [0.21, 0.71, 0.07];

/// Returns the luminosity of a color: `floor(0.21 * R + 0.71 * G + 0.07 * B)`.
///
/// The weights sum to `0.99`, so pure white maps to `252` rather than `255`.
#[must_use]
#[inline]
pub fn luminosity(color: Srgb<u8>) -> u8 {
    let (red, green, blue) = color.into_components();
    let value = WEIGHTS[0] * f64::from(red)
        + WEIGHTS[1] * f64::from(green)
        + WEIGHTS[2] * f64::from(blue);

    // always in 0.0..=252.45
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value as u8
    }
}

/// Converts a raster to a row-major list of luminosity values.
#[must_use]
pub fn to_grayscale(raster: &Raster) -> Vec<u8> {
    raster.pixels().iter().copied().map(luminosity).collect()
}

/// Converts a raster to a row-major list of luminosity values in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn to_grayscale_par(raster: &Raster) -> Vec<u8> {
    raster.pixels().par_iter().copied().map(luminosity).collect()
}
