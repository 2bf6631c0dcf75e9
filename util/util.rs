#![allow(dead_code)]

use std::sync::OnceLock;

use cartoonette::Raster;
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Dimensions of the generated benchmark rasters.
pub const SIZES: [(u32, u32); 3] = [(320, 240), (640, 480), (1280, 720)];

/// A raster made of a few smooth gradients with some noise on top,
/// loosely resembling a photograph.
pub fn synthetic_raster(width: u32, height: u32, seed: u64) -> Raster {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let (w, h) = (f64::from(width), f64::from(height));

    Raster::from_fn(width, height, |x, y| {
        let (fx, fy) = (f64::from(x) / w, f64::from(y) / h);
        let base = if (fx - 0.5).powi(2) + (fy - 0.5).powi(2) < 0.1 {
            [220.0 * fx, 80.0 + 100.0 * fy, 60.0]
        } else {
            [40.0 + 60.0 * fy, 120.0 * fx, 200.0 - 100.0 * fx]
        };

        let [r, g, b] = base.map(|c| (c + rng.gen_range(-12.0..12.0)).clamp(0.0, 255.0) as u8);
        Srgb::new(r, g, b)
    })
    .expect("non-empty raster")
}

pub fn load_synthetic_rasters() -> Vec<(String, Raster)> {
    SIZES
        .iter()
        .enumerate()
        .map(|(i, &(width, height))| {
            (format!("{width}x{height}"), synthetic_raster(width, height, i as u64))
        })
        .collect()
}

static SYNTHETIC_RASTERS: OnceLock<Vec<(String, Raster)>> = OnceLock::new();

pub fn synthetic_rasters() -> &'static [(String, Raster)] {
    SYNTHETIC_RASTERS.get_or_init(load_synthetic_rasters)
}
