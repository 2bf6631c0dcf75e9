//! Color quantization (posterization) through k-means clustering.
//!
//! This is Lloyd's algorithm over the RGB values of every pixel in a [`Raster`]:
//! 1. The centroids are seeded with uniformly random colors.
//! 2. Each pixel is assigned to its nearest centroid by Euclidean distance.
//!    Ties go to the lowest centroid index.
//! 3. Each centroid becomes the (truncated) mean color of its assigned pixels.
//!    Centroids without any pixels keep their previous color.
//! 4. Steps 2 and 3 are repeated until no pixel changes cluster,
//!    or until the maximum number of iterations is reached.
//!
//! Every reassignment pass reads from the same centroid snapshot and writes into a separate
//! assignment buffer, so the order in which pixels are visited does not affect the result.
//! This is also what allows the parallel versions to produce the exact same output
//! as the single-threaded ones for a given seed.

use crate::{ClusterCount, Raster};
use log::{debug, trace};
use palette::{
    cast::{self, AsArrays},
    Srgb,
};
use rand::{prelude::Distribution, SeedableRng};
use rand_distr::Uniform;
use rand_xoshiro::Xoroshiro128PlusPlus;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The output of k-means clustering over the pixels of a [`Raster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// The final centroid of each cluster.
    ///
    /// The centroids are not guaranteed to be unique.
    pub centroids: Vec<Srgb<u8>>,
    /// The number of pixels assigned to each cluster.
    ///
    /// Each count is not guaranteed to be non-zero.
    pub counts: Vec<u32>,
    /// The cluster of each pixel, as an index into `centroids`.
    pub indices: Vec<u8>,
    /// The number of reassignment passes that were run after the initial assignment.
    pub iterations: u32,
}

impl Segmentation {
    /// Paints each pixel of a `width` by `height` raster with the centroid of its cluster.
    ///
    /// Returns `None` if `indices.len()` is not `width * height`
    /// or if an index is out of bounds for `centroids`.
    #[must_use]
    pub fn to_raster(&self, width: u32, height: u32) -> Option<Raster> {
        let pixels = self
            .indices
            .iter()
            .map(|&i| self.centroids.get(usize::from(i)).copied())
            .collect::<Option<_>>()?;

        Raster::new(width, height, pixels).ok()
    }

    /// Paints the pixels of a raster with the same dimensions as `source`.
    fn paint(&self, source: &Raster) -> Raster {
        let centroids = self.centroids.as_slice();
        source.with_pixels(self.indices.iter().map(|&i| centroids[usize::from(i)]).collect())
    }

    #[cfg(feature = "threads")]
    fn paint_par(&self, source: &Raster) -> Raster {
        let centroids = self.centroids.as_slice();
        source.with_pixels(
            self.indices
                .par_iter()
                .map(|&i| centroids[usize::from(i)])
                .collect(),
        )
    }
}

#[inline]
fn squared_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.into_iter()
        .zip(b)
        .map(|(a, b)| u32::from(a.abs_diff(b)).pow(2))
        .sum()
}

/// Returns the index of the centroid closest to `color`.
///
/// Squared distances order the same way as Euclidean distances.
/// The first centroid with the minimum distance wins.
#[inline]
fn nearest(centroids: &[[u8; 3]], color: [u8; 3]) -> u8 {
    let mut min_index = 0;
    let mut min_distance = u32::MAX;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(centroid, color);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }

    // there are at most MAX_CLUSTERS = 256 centroids
    #[allow(clippy::cast_possible_truncation)]
    {
        min_index as u8
    }
}

/// Per cluster channel sums and member counts.
type Sums = (Vec<[u64; 3]>, Vec<u32>);

fn empty_sums(k: usize) -> Sums {
    (vec![[0; 3]; k], vec![0; k])
}

fn add_sample((sums, counts): &mut Sums, color: [u8; 3], i: u8) {
    let i = usize::from(i);
    for (sum, c) in sums[i].iter_mut().zip(color) {
        *sum += u64::from(c);
    }
    counts[i] += 1;
}

#[cfg(feature = "threads")]
fn merge_sums(mut a: Sums, b: Sums) -> Sums {
    for (a, b) in a.0.iter_mut().zip(b.0) {
        for (a, b) in a.iter_mut().zip(b) {
            *a += b;
        }
    }
    for (a, b) in a.1.iter_mut().zip(b.1) {
        *a += b;
    }
    a
}

struct State<'a> {
    colors: &'a [[u8; 3]],
    centroids: Vec<[u8; 3]>,
    counts: Vec<u32>,
    indices: Vec<u8>,
}

impl<'a> State<'a> {
    fn new(colors: &'a [[u8; 3]], k: ClusterCount, seed: u64) -> Self {
        let k = usize::from(k.into_inner());
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
        let channel = Uniform::new_inclusive(0u8, u8::MAX);

        let centroids = (0..k)
            .map(|_| [channel.sample(rng), channel.sample(rng), channel.sample(rng)])
            .collect();

        Self {
            colors,
            centroids,
            counts: vec![0; k],
            indices: Vec::new(),
        }
    }

    fn assign(&self) -> Vec<u8> {
        let centroids = self.centroids.as_slice();
        self.colors
            .iter()
            .map(|&color| nearest(centroids, color))
            .collect()
    }

    fn update_centroids(&mut self, (sums, counts): Sums) {
        for ((centroid, sum), &count) in self.centroids.iter_mut().zip(sums).zip(&counts) {
            if count > 0 {
                let count = u64::from(count);
                // the mean of u8 values fits in a u8
                #[allow(clippy::cast_possible_truncation)]
                {
                    *centroid = sum.map(|s| (s / count) as u8);
                }
            }
        }
        self.counts = counts;
    }

    fn sums(&self) -> Sums {
        let mut sums = empty_sums(self.centroids.len());
        for (&color, &i) in self.colors.iter().zip(&self.indices) {
            add_sample(&mut sums, color, i);
        }
        sums
    }

    /// Replaces the current assignments, returning how many pixels changed cluster.
    fn swap_indices(&mut self, next: Vec<u8>) -> usize {
        let changed = self
            .indices
            .iter()
            .zip(&next)
            .filter(|(old, new)| old != new)
            .count();

        self.indices = next;
        changed
    }

    fn kmeans(&mut self, max_iterations: u32) -> u32 {
        self.indices = self.assign();
        self.update_centroids(self.sums());

        let mut iterations = 0;
        while iterations < max_iterations {
            iterations += 1;
            let next = self.assign();
            let changed = self.swap_indices(next);
            trace!("k-means pass {iterations}: {changed} pixels changed cluster");
            if changed == 0 {
                break;
            }
            self.update_centroids(self.sums());
        }

        iterations
    }

    fn into_segmentation(self, iterations: u32) -> Segmentation {
        let Self { centroids, counts, indices, .. } = self;
        Segmentation {
            centroids: centroids.into_iter().map(cast::from_array).collect(),
            counts,
            indices,
            iterations,
        }
    }
}

#[cfg(feature = "threads")]
impl<'a> State<'a> {
    fn assign_par(&self) -> Vec<u8> {
        let centroids = self.centroids.as_slice();
        self.colors
            .par_iter()
            .map(|&color| nearest(centroids, color))
            .collect()
    }

    fn sums_par(&self) -> Sums {
        let k = self.centroids.len();
        self.colors
            .par_iter()
            .zip(&self.indices)
            .fold(
                || empty_sums(k),
                |mut sums, (&color, &i)| {
                    add_sample(&mut sums, color, i);
                    sums
                },
            )
            .reduce(|| empty_sums(k), merge_sums)
    }

    fn swap_indices_par(&mut self, next: Vec<u8>) -> usize {
        let changed = self
            .indices
            .par_iter()
            .zip(&next)
            .filter(|(old, new)| old != new)
            .count();

        self.indices = next;
        changed
    }

    fn kmeans_par(&mut self, max_iterations: u32) -> u32 {
        self.indices = self.assign_par();
        self.update_centroids(self.sums_par());

        let mut iterations = 0;
        while iterations < max_iterations {
            iterations += 1;
            let next = self.assign_par();
            let changed = self.swap_indices_par(next);
            trace!("k-means pass {iterations}: {changed} pixels changed cluster");
            if changed == 0 {
                break;
            }
            self.update_centroids(self.sums_par());
        }

        iterations
    }
}

/// Clusters the pixels of `raster` into `k` clusters,
/// running at most `max_iterations` reassignment passes after the initial assignment.
///
/// The initial centroids are drawn from a random number generator seeded with `seed`,
/// so the same inputs always give the same output.
#[must_use]
pub fn indexed(raster: &Raster, k: ClusterCount, max_iterations: u32, seed: u64) -> Segmentation {
    let mut state = State::new(raster.pixels().as_arrays(), k, seed);
    let iterations = state.kmeans(max_iterations);
    debug!(
        "k-means with k = {k} finished after {iterations} of at most {max_iterations} passes"
    );
    state.into_segmentation(iterations)
}

/// Posterizes `raster` into at most `k` colors.
///
/// Each output pixel is the final centroid of the cluster its input pixel was assigned to.
/// See [`indexed`] for more details.
///
/// # Examples
/// ```
/// # use cartoonette::{kmeans, Raster, ClusterCount, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// let raster = Raster::from_fn(8, 8, |x, _| {
///     if x < 4 { Srgb::new(250, 10, 10) } else { Srgb::new(10, 10, 250) }
/// })?;
///
/// // a single cluster collapses the image to its mean color
/// let posterized = kmeans::segment(&raster, ClusterCount::try_from(1u8)?, 10, 0);
/// assert!(posterized.pixels().iter().all(|&c| c == Srgb::new(130, 10, 130)));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn segment(raster: &Raster, k: ClusterCount, max_iterations: u32, seed: u64) -> Raster {
    indexed(raster, k, max_iterations, seed).paint(raster)
}

/// Clusters the pixels of `raster` in parallel.
///
/// The output is identical to [`indexed`] for the same arguments.
#[cfg(feature = "threads")]
#[must_use]
pub fn indexed_par(
    raster: &Raster,
    k: ClusterCount,
    max_iterations: u32,
    seed: u64,
) -> Segmentation {
    let mut state = State::new(raster.pixels().as_arrays(), k, seed);
    let iterations = state.kmeans_par(max_iterations);
    debug!(
        "k-means with k = {k} finished after {iterations} of at most {max_iterations} passes"
    );
    state.into_segmentation(iterations)
}

/// Posterizes `raster` in parallel.
///
/// The output is identical to [`segment`] for the same arguments.
#[cfg(feature = "threads")]
#[must_use]
pub fn segment_par(raster: &Raster, k: ClusterCount, max_iterations: u32, seed: u64) -> Raster {
    indexed_par(raster, k, max_iterations, seed).paint_par(raster)
}
