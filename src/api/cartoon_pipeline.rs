//! Contains the [`CartoonPipeline`] builder struct for the high level API.

use super::{CLUSTER_COUNT, MAX_ITERATIONS, SEED, THRESHOLD, WINDOW};
use crate::{
    edges,
    kmeans,
    median::{self, Border},
    ClusterCount, Error, Raster, Window,
};
#[cfg(feature = "image")]
use image::RgbImage;
use log::debug;

/// A builder struct to specify the parameters of each stage of the cartoon pipeline.
///
/// The defaults are the parameters used by [`cartoonize`](crate::cartoonize).
///
/// # Examples
/// ```
/// # use cartoonette::{CartoonPipeline, ClusterCount, Raster, Window, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// # let raster = Raster::filled(16, 16, Srgb::new(0, 0, 0))?;
/// let cartoon = CartoonPipeline::new(&raster)
///     .clusters(ClusterCount::try_from(8u8)?)
///     .max_iterations(20)
///     .window(Window::square(5)?)
///     .threshold(150)
///     .seed(42)
///     .cartoonized()?;
/// # Ok(())
/// # }
/// ```
///
/// With the `image` feature, an [`RgbImage`] can be converted and processed directly:
/// ```no_run
/// # use cartoonette::{CartoonPipeline, Raster};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let raster = Raster::try_from(&img)?;
/// let cartoon = CartoonPipeline::new(&raster).cartoonized_rgbimage()?;
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct CartoonPipeline<'a> {
    /// The input image.
    raster: &'a Raster,
    /// The number of k-means clusters.
    clusters: ClusterCount,
    /// The maximum number of k-means reassignment passes.
    max_iterations: u32,
    /// The median filter window.
    window: Window,
    /// How the median filter fills its border band.
    border: Border,
    /// The edge detection threshold.
    threshold: u32,
    /// The seed value for the random number generators.
    seed: u64,
}

impl<'a> CartoonPipeline<'a> {
    /// Creates a new [`CartoonPipeline`] with default options.
    pub const fn new(raster: &'a Raster) -> Self {
        Self {
            raster,
            clusters: CLUSTER_COUNT,
            max_iterations: MAX_ITERATIONS,
            window: WINDOW,
            border: Border::Copy,
            threshold: THRESHOLD,
            seed: SEED,
        }
    }

    /// Sets the number of colors to posterize the image into.
    ///
    /// The default is `32`.
    pub fn clusters(&mut self, clusters: ClusterCount) -> &mut Self {
        self.clusters = clusters;
        self
    }

    /// Sets the maximum number of k-means reassignment passes.
    ///
    /// The default is `10`.
    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the median filter window.
    ///
    /// The default is a 9×9 window.
    pub fn window(&mut self, window: Window) -> &mut Self {
        self.window = window;
        self
    }

    /// Sets how the median filter fills the pixels its window does not fit around.
    ///
    /// The default is [`Border::Copy`].
    pub fn border(&mut self, border: Border) -> &mut Self {
        self.border = border;
        self
    }

    /// Sets the gradient magnitude above which pixels are outlined.
    ///
    /// The default is `100`.
    pub fn threshold(&mut self, threshold: u32) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Sets the seed value for the random number generators.
    ///
    /// The default seed is `0`.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }
}

impl<'a> CartoonPipeline<'a> {
    /// Runs the pipeline and returns the cartoon.
    ///
    /// # Errors
    /// Returns an error if the median window is wider or taller than the raster.
    /// This is checked before any other work is done.
    pub fn cartoonized(&self) -> Result<Raster, Error> {
        let Self {
            raster,
            clusters,
            max_iterations,
            window,
            border,
            threshold,
            seed,
        } = *self;

        window.check_fits(raster)?;

        let posterized = kmeans::segment(raster, clusters, max_iterations, seed);
        debug!("posterized into at most {clusters} colors");

        let smoothed = median::filter(&posterized, window, border, seed)?;
        Ok(edges::detect(&smoothed, threshold))
    }
}

#[cfg(feature = "threads")]
impl<'a> CartoonPipeline<'a> {
    /// Runs the pipeline in parallel and returns the cartoon.
    ///
    /// The output is identical to [`CartoonPipeline::cartoonized`].
    ///
    /// # Errors
    /// See [`CartoonPipeline::cartoonized`].
    pub fn cartoonized_par(&self) -> Result<Raster, Error> {
        let Self {
            raster,
            clusters,
            max_iterations,
            window,
            border,
            threshold,
            seed,
        } = *self;

        window.check_fits(raster)?;

        let posterized = kmeans::segment_par(raster, clusters, max_iterations, seed);
        debug!("posterized into at most {clusters} colors");

        let smoothed = median::filter_par(&posterized, window, border, seed)?;
        Ok(edges::detect_par(&smoothed, threshold))
    }
}

#[cfg(feature = "image")]
impl<'a> CartoonPipeline<'a> {
    /// Runs the pipeline and returns the cartoon as an [`RgbImage`].
    ///
    /// # Errors
    /// See [`CartoonPipeline::cartoonized`].
    pub fn cartoonized_rgbimage(&self) -> Result<RgbImage, Error> {
        self.cartoonized().map(RgbImage::from)
    }
}

#[cfg(all(feature = "threads", feature = "image"))]
impl<'a> CartoonPipeline<'a> {
    /// Runs the pipeline in parallel and returns the cartoon as an [`RgbImage`].
    ///
    /// # Errors
    /// See [`CartoonPipeline::cartoonized`].
    pub fn cartoonized_rgbimage_par(&self) -> Result<RgbImage, Error> {
        self.cartoonized_par().map(RgbImage::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{cartoonize, tests::*, InvalidArgument, BLACK};
    use palette::Srgb;

    const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

    #[test]
    fn white_3x3_end_to_end() {
        let raster = uniform_raster(3, 3, WHITE);

        let mut pipeline = CartoonPipeline::new(&raster);
        pipeline
            .clusters(ClusterCount::try_from(1u8).unwrap())
            .max_iterations(1)
            .window(Window::square(3).unwrap())
            .threshold(1);

        let posterized = kmeans::segment(&raster, pipeline.clusters, 1, pipeline.seed);
        assert_eq!(posterized, raster);

        let smoothed = median::filter(&posterized, pipeline.window, Border::Copy, 0).unwrap();
        assert_eq!(smoothed, raster);

        let black_border = median::filter(&posterized, pipeline.window, Border::Black, 0).unwrap();
        let mut expected = vec![BLACK; 9];
        expected[4] = WHITE;
        assert_eq!(black_border.pixels(), expected.as_slice());

        assert_eq!(pipeline.cartoonized().unwrap(), raster);
    }

    #[test]
    fn stages_compose() {
        let raster = test_raster(40, 30, 17);
        let mut pipeline = CartoonPipeline::new(&raster);
        pipeline.seed(5);

        let expected = edges::detect(
            &median::filter(
                &kmeans::segment(&raster, CLUSTER_COUNT, MAX_ITERATIONS, 5),
                WINDOW,
                Border::Copy,
                5,
            )
            .unwrap(),
            THRESHOLD,
        );

        assert_eq!(pipeline.cartoonized().unwrap(), expected);
    }

    #[test]
    fn default_pipeline_is_cartoonize() {
        let raster = test_raster(24, 20, 1);
        assert_eq!(
            cartoonize(&raster).unwrap(),
            CartoonPipeline::new(&raster).cartoonized().unwrap()
        );
    }

    #[test]
    fn output_is_outlines_or_centroids() {
        let raster = test_raster(32, 32, 9);
        let output = cartoonize(&raster).unwrap();
        let segmentation = kmeans::indexed(&raster, CLUSTER_COUNT, MAX_ITERATIONS, SEED);

        // medians are taken per channel, so only check the dimensions and the outline color
        assert_eq!(output.dimensions(), raster.dimensions());
        let outlined = edges::gradient_magnitudes(
            &median::filter(
                &segmentation.to_raster(32, 32).unwrap(),
                WINDOW,
                Border::Copy,
                SEED,
            )
            .unwrap(),
        );
        for (&magnitude, &pixel) in outlined.iter().zip(output.pixels()) {
            if magnitude > THRESHOLD {
                assert_eq!(pixel, BLACK);
            }
        }
    }

    #[test]
    fn too_small_for_the_window() {
        let raster = test_raster(8, 20, 0);
        let expected = Err(Error::InvalidArgument(InvalidArgument::WindowTooLarge {
            window: (9, 9),
            raster: (8, 20),
        }));
        assert_eq!(cartoonize(&raster), expected);

        #[cfg(feature = "threads")]
        {
            assert_eq!(crate::cartoonize_par(&raster), expected);
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let raster = test_raster(50, 37, 2);
        for seed in [0, 1, 99] {
            let mut pipeline = CartoonPipeline::new(&raster);
            pipeline.seed(seed);
            assert_eq!(pipeline.cartoonized().unwrap(), pipeline.cartoonized_par().unwrap());
        }
    }

    #[test]
    #[cfg(feature = "image")]
    fn rgbimage_output() {
        let raster = test_raster(16, 12, 4);
        let image = CartoonPipeline::new(&raster).cartoonized_rgbimage().unwrap();
        assert_eq!(image.dimensions(), (16, 12));
        assert_eq!(Raster::try_from(&image).unwrap(), cartoonize(&raster).unwrap());
    }
}
