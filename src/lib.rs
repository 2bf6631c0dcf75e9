//! A library for turning images into cartoons.
//!
//! `cartoonette` posterizes an image with k-means clustering, smooths the flat color regions
//! with a median filter, and finally draws black outlines wherever the Sobel gradient
//! of the smoothed image is strong.
//!
//! # Features
//! To reduce dependencies and compile times, `cartoonette` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of each stage via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//! - `cli`: builds the `cartoonette` command line binary.
//!
//! # High-Level API
//! [`cartoonize`] runs the whole pipeline with the usual parameters.
//! To change the parameters of any stage, see [`CartoonPipeline`].
//! ```no_run
//! # use cartoonette::{CartoonPipeline, ClusterCount, Raster, Window};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//! let raster = Raster::try_from(&img)?;
//!
//! let cartoon = CartoonPipeline::new(&raster)
//!     .clusters(ClusterCount::try_from(16u8)?) // fewer, flatter colors
//!     .window(Window::square(5)?) // less smoothing
//!     .cartoonized_rgbimage_par()?;
//!
//! cartoon.save("cartoon.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Stages
//! Each stage of the pipeline is also exposed on its own:
//! - [`kmeans`]: posterization through Lloyd's k-means.
//! - [`median`]: per-channel median filtering.
//! - [`edges`]: Sobel edge detection and outlining.
//! - [`grayscale`]: the luminosity conversion used by edge detection.
//! - [`select`]: randomized quickselect used by median filtering.
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod types;

pub mod edges;
pub mod grayscale;
pub mod kmeans;
pub mod median;
pub mod select;

pub use api::*;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of k-means clusters is `256`.
pub const MAX_CLUSTERS: u16 = u8::MAX as u16 + 1;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use palette::Srgb;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    /// A raster of random pixels.
    #[allow(clippy::unwrap_used)]
    pub fn test_raster(width: u32, height: u32, seed: u64) -> Raster {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
        Raster::from_fn(width, height, |_, _| {
            let [r, g, b] = rng.gen::<[u8; 3]>();
            Srgb::new(r, g, b)
        })
        .unwrap()
    }

    /// A raster where every pixel is `color`.
    #[allow(clippy::unwrap_used)]
    pub fn uniform_raster(width: u32, height: u32, color: Srgb<u8>) -> Raster {
        Raster::filled(width, height, color).unwrap()
    }
}
