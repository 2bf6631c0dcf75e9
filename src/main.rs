#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{error::Error, path::PathBuf};

use cartoonette::{median::Border, CartoonPipeline, ClusterCount, Raster, Window};
use clap::Parser;
use log::info;

/// Turns an image into a cartoon.
#[derive(Parser)]
#[command(version, about)]
pub struct Options {
    /// The number of colors to posterize the image into.
    #[arg(
        short,
        long,
        default_value_t = cartoonette::CLUSTER_COUNT,
        value_parser = parse_cluster_count
    )]
    k: ClusterCount,

    /// The maximum number of k-means passes.
    #[arg(short, long, default_value_t = cartoonette::MAX_ITERATIONS)]
    iterations: u32,

    /// The side length of the square median filter window. Must be odd.
    #[arg(short, long, default_value_t = cartoonette::WINDOW.width(), value_parser = parse_window)]
    window: u32,

    /// The gradient magnitude above which pixels are outlined.
    #[arg(long, default_value_t = cartoonette::THRESHOLD)]
    threshold: u32,

    #[arg(long, default_value_t = cartoonette::SEED)]
    seed: u64,

    /// Paint the pixels around the edge of the median filter black instead of keeping them.
    #[arg(long)]
    black_border: bool,

    /// 0 uses all cores, 1 runs single threaded.
    #[arg(short, long, default_value_t = 0)]
    threads: u8,

    #[arg(long)]
    verbose: bool,

    input: PathBuf,

    output: PathBuf,
}

fn parse_cluster_count(s: &str) -> Result<ClusterCount, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn parse_window(s: &str) -> Result<u32, String> {
    let size: u32 = s.parse().map_err(|e| format!("{e}"))?;
    Window::square(size).map(|_| size).map_err(|e| format!("{e}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let Options {
        k,
        iterations,
        window,
        threshold,
        seed,
        black_border,
        threads,
        verbose,
        input,
        output,
    } = Options::parse();

    env_logger::builder()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                info!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let image = log!("read image", image::open(input)?.into_rgb8());
    let raster = Raster::try_from(&image)?;

    let mut pipeline = CartoonPipeline::new(&raster);
    pipeline
        .clusters(k)
        .max_iterations(iterations)
        .window(Window::square(window)?)
        .border(if black_border { Border::Black } else { Border::Copy })
        .threshold(threshold)
        .seed(seed);

    let cartoon = log!(
        "cartoonize",
        match threads {
            0 => pipeline.cartoonized_rgbimage_par()?,
            1 => pipeline.cartoonized_rgbimage()?,
            t => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(t.into())
                    .build()?;

                pool.install(|| pipeline.cartoonized_rgbimage_par())?
            }
        }
    );

    log!("write image", cartoon.save(output)?);

    Ok(())
}
