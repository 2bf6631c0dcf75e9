//! Contains various types needed across the crate.

use crate::{MAX_CLUSTERS, MAX_PIXELS};
use palette::Srgb;
use std::{
    error,
    fmt::{self, Debug, Display},
};
#[cfg(feature = "image")]
use {
    image::RgbImage,
    palette::cast::{ComponentsAs, IntoComponents},
};

/// Opaque black, the color of outlines.
pub(crate) const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);

/// An error type for when the length of an input
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> error::Error for AboveMaxLen<T> {}

/// The ways an argument to one of the pipeline stages can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The raster has a width or height of zero.
    EmptyRaster,
    /// The number of pixels does not equal `width * height`.
    DimensionMismatch {
        /// `width * height`
        expected: u64,
        /// The number of pixels that were provided.
        actual: u64,
    },
    /// A cluster count of zero was requested.
    ZeroClusters,
    /// A median window has a width or height of zero.
    EmptyWindow,
    /// A median window has an even width or height, so it has no center pixel.
    EvenWindow {
        /// The width of the window.
        width: u32,
        /// The height of the window.
        height: u32,
    },
    /// A median window is wider or taller than the raster it is applied to.
    WindowTooLarge {
        /// The `(width, height)` of the window.
        window: (u32, u32),
        /// The `(width, height)` of the raster.
        raster: (u32, u32),
    },
}

impl Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EmptyRaster => write!(f, "the raster has no pixels"),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "expected {expected} pixels for the given dimensions, but got {actual}"
            ),
            Self::ZeroClusters => write!(f, "at least one cluster is required"),
            Self::EmptyWindow => write!(f, "the window has a width or height of zero"),
            Self::EvenWindow { width, height } => {
                write!(f, "the window dimensions must be odd, but got {width}x{height}")
            }
            Self::WindowTooLarge { window, raster } => write!(
                f,
                "a {}x{} window does not fit inside a {}x{} raster",
                window.0, window.1, raster.0, raster.1
            ),
        }
    }
}

impl error::Error for InvalidArgument {}

/// The error type returned by the fallible functions in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input is larger than what is supported.
    AboveMaxLen(AboveMaxLen<u32>),
    /// An argument is outside of its valid domain.
    InvalidArgument(InvalidArgument),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AboveMaxLen(err) => Display::fmt(err, f),
            Self::InvalidArgument(err) => Display::fmt(err, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::AboveMaxLen(err) => Some(err),
            Self::InvalidArgument(err) => Some(err),
        }
    }
}

impl From<AboveMaxLen<u32>> for Error {
    fn from(err: AboveMaxLen<u32>) -> Self {
        Self::AboveMaxLen(err)
    }
}

impl From<InvalidArgument> for Error {
    fn from(err: InvalidArgument) -> Self {
        Self::InvalidArgument(err)
    }
}

/// A rectangular grid of 8-bit RGB pixels stored in row-major order.
///
/// A [`Raster`] always has a non-zero width and height
/// and at most [`MAX_PIXELS`] pixels.
///
/// # Examples
/// ```
/// # use cartoonette::{Raster, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// let raster = Raster::filled(4, 3, Srgb::new(255, 0, 0))?;
/// assert_eq!(raster.dimensions(), (4, 3));
///
/// let gradient = Raster::from_fn(16, 16, |x, y| Srgb::new(x as u8 * 16, y as u8 * 16, 0))?;
/// assert_eq!(gradient.get(1, 2), Some(Srgb::new(16, 32, 0)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// The number of pixels in each row.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels, row after row.
    pixels: Vec<Srgb<u8>>,
}

/// Ensures that a raster of the given dimensions is not empty and not too large,
/// returning its number of pixels.
fn checked_len(width: u32, height: u32) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(InvalidArgument::EmptyRaster.into());
    }

    let len = u64::from(width) * u64::from(height);
    if len > u64::from(MAX_PIXELS) {
        Err(AboveMaxLen(MAX_PIXELS).into())
    } else {
        #[allow(clippy::cast_possible_truncation)]
        Ok(len as usize)
    }
}

impl Raster {
    /// Creates a new [`Raster`] from a row-major list of pixels.
    ///
    /// # Errors
    /// Returns an error if `width` or `height` is zero, if `pixels.len()` is not `width * height`,
    /// or if there are more than [`MAX_PIXELS`] pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<Srgb<u8>>) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        if pixels.len() == len {
            Ok(Self {
                width,
                height,
                pixels,
            })
        } else {
            Err(InvalidArgument::DimensionMismatch {
                expected: len as u64,
                actual: pixels.len() as u64,
            }
            .into())
        }
    }

    /// Creates a new [`Raster`] where every pixel is `color`.
    ///
    /// # Errors
    /// See [`Raster::new`].
    pub fn filled(width: u32, height: u32, color: Srgb<u8>) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
        })
    }

    /// Creates a new [`Raster`] by calling `pixel(x, y)` for each coordinate in row-major order.
    ///
    /// # Errors
    /// See [`Raster::new`].
    pub fn from_fn(
        width: u32,
        height: u32,
        mut pixel: impl FnMut(u32, u32) -> Srgb<u8>,
    ) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            pixels.extend((0..width).map(|x| pixel(x, y)));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a [`Raster`] with the same dimensions as `self` but with new pixels.
    ///
    /// The caller must ensure that `pixels.len()` matches.
    pub(crate) fn with_pixels(&self, pixels: Vec<Srgb<u8>>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// The width of the raster in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the raster in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The `(width, height)` of the raster.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of pixels as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_pixels(&self) -> u32 {
        self.pixels.len() as u32
    }

    /// The pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgb<u8>] {
        &self.pixels
    }

    /// Consumes the raster, returning its row-major pixels.
    #[must_use]
    pub fn into_pixels(self) -> Vec<Srgb<u8>> {
        self.pixels
    }

    /// Returns the pixel at column `x` of row `y`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Returns an iterator over the rows of the raster.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Srgb<u8>]> + '_ {
        self.pixels.chunks_exact(self.width as usize)
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(feature = "image")]
impl TryFrom<&RgbImage> for Raster {
    type Error = Error;

    fn try_from(image: &RgbImage) -> Result<Self, Self::Error> {
        let len = checked_len(image.width(), image.height())?;
        let buf: &[Srgb<u8>] = image.as_raw()[..(len * 3)].components_as();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            pixels: buf.to_vec(),
        })
    }
}

#[cfg(feature = "image")]
impl From<Raster> for RgbImage {
    fn from(raster: Raster) -> Self {
        let (width, height) = raster.dimensions();
        let pixels = raster.into_pixels();

        #[allow(clippy::expect_used)]
        {
            // a raster always holds exactly width * height pixels,
            // so the buffer is large enough by construction
            RgbImage::from_vec(width, height, pixels.into_components())
                .expect("large enough buffer")
        }
    }
}

/// The number of clusters to posterize an image into.
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// in the range `1..=MAX_CLUSTERS`, so that every cluster index fits in a `u8`.
///
/// # Examples
/// ```
/// # use cartoonette::{ClusterCount, Error};
/// # fn main() -> Result<(), Error> {
/// let k = ClusterCount::try_from(32u16)?;
/// let k: ClusterCount = 16u8.try_into()?;
/// assert!(ClusterCount::try_from(0u16).is_err());
/// assert_eq!(ClusterCount::from_clamped(1024), ClusterCount::MAX);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterCount(u16);

impl ClusterCount {
    /// The maximum supported number of clusters (given by [`MAX_CLUSTERS`]).
    pub const MAX: Self = Self(MAX_CLUSTERS);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Creates a [`ClusterCount`] directly from the given `u16` without validating it.
    pub(crate) const fn new_unchecked(value: u16) -> Self {
        Self(value)
    }

    /// Creates a [`ClusterCount`] by clamping the given `u16` to the range `1..=MAX_CLUSTERS`.
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value == 0 {
            Self(1)
        } else if value <= MAX_CLUSTERS {
            Self(value)
        } else {
            Self(MAX_CLUSTERS)
        }
    }
}

impl From<ClusterCount> for u16 {
    fn from(val: ClusterCount) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u16> for ClusterCount {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(InvalidArgument::ZeroClusters.into())
        } else if value <= MAX_CLUSTERS {
            Ok(Self(value))
        } else {
            Err(AboveMaxLen(u32::from(MAX_CLUSTERS)).into())
        }
    }
}

impl TryFrom<u8> for ClusterCount {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        u16::from(value).try_into()
    }
}

impl Display for ClusterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// The dimensions of the neighborhood used by the [median filter](crate::median).
///
/// Both the width and the height are odd, so that every window has a center pixel.
///
/// # Examples
/// ```
/// # use cartoonette::Window;
/// let window = Window::square(9).unwrap();
/// assert_eq!(window.radius(), (4, 4));
/// assert!(Window::new(4, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// The number of columns in the window.
    width: u32,
    /// The number of rows in the window.
    height: u32,
}

impl Window {
    /// Creates a new [`Window`].
    ///
    /// # Errors
    /// Returns an error if either dimension is zero or even.
    pub const fn new(width: u32, height: u32) -> Result<Self, InvalidArgument> {
        if width == 0 || height == 0 {
            Err(InvalidArgument::EmptyWindow)
        } else if width % 2 == 0 || height % 2 == 0 {
            Err(InvalidArgument::EvenWindow { width, height })
        } else {
            Ok(Self { width, height })
        }
    }

    /// Creates a new `size` by `size` [`Window`].
    ///
    /// # Errors
    /// Returns an error if `size` is zero or even.
    pub const fn square(size: u32) -> Result<Self, InvalidArgument> {
        Self::new(size, size)
    }

    /// Creates a [`Window`] without validating its dimensions.
    pub(crate) const fn new_unchecked(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The width of the window.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// The height of the window.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// The number of columns and rows on each side of the center pixel.
    #[must_use]
    pub const fn radius(self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// The number of pixels covered by the window.
    #[must_use]
    pub const fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Always `false`, since a window covers at least its center pixel.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Ensures that the window fits inside `raster`.
    ///
    /// # Errors
    /// Returns [`InvalidArgument::WindowTooLarge`] if the window
    /// is wider or taller than the raster.
    pub fn check_fits(self, raster: &Raster) -> Result<(), InvalidArgument> {
        if self.width <= raster.width() && self.height <= raster.height() {
            Ok(())
        } else {
            Err(InvalidArgument::WindowTooLarge {
                window: (self.width, self.height),
                raster: raster.dimensions(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_raster_is_rejected() {
        let expected = Err(Error::InvalidArgument(InvalidArgument::EmptyRaster));
        assert_eq!(Raster::new(0, 3, Vec::new()), expected);
        assert_eq!(Raster::filled(3, 0, BLACK), expected);
        assert_eq!(Raster::from_fn(0, 0, |_, _| BLACK), expected);
    }

    #[test]
    fn mismatched_pixels_are_rejected() {
        let actual = Raster::new(2, 2, vec![BLACK; 3]);
        let expected = Err(Error::InvalidArgument(InvalidArgument::DimensionMismatch {
            expected: 4,
            actual: 3,
        }));
        assert_eq!(actual, expected);
    }

    #[test]
    fn oversized_raster_is_rejected() {
        let actual = Raster::from_fn(u32::MAX, 2, |_, _| BLACK);
        assert_eq!(actual, Err(Error::AboveMaxLen(AboveMaxLen(MAX_PIXELS))));
    }

    #[test]
    fn from_fn_is_row_major() {
        #[allow(clippy::cast_possible_truncation)]
        let raster = Raster::from_fn(3, 2, |x, y| Srgb::new(x as u8, y as u8, 0)).unwrap();
        let expected = [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]
            .map(|(x, y)| Srgb::new(x, y, 0))
            .to_vec();

        assert_eq!(raster.pixels(), expected.as_slice());
        assert_eq!(raster.get(2, 1), Some(Srgb::new(2, 1, 0)));
        assert_eq!(raster.get(3, 0), None);
        assert_eq!(raster.get(0, 2), None);
        assert_eq!(raster.rows().len(), 2);
        assert_eq!(raster.into_pixels(), expected);
    }

    #[test]
    fn cluster_count_bounds() {
        assert_eq!(
            ClusterCount::try_from(0u16),
            Err(Error::InvalidArgument(InvalidArgument::ZeroClusters))
        );
        assert_eq!(ClusterCount::try_from(1u8).unwrap().into_inner(), 1);
        assert_eq!(ClusterCount::try_from(MAX_CLUSTERS).unwrap(), ClusterCount::MAX);
        assert_eq!(
            ClusterCount::try_from(MAX_CLUSTERS + 1),
            Err(Error::AboveMaxLen(AboveMaxLen(u32::from(MAX_CLUSTERS))))
        );
        assert_eq!(ClusterCount::from_clamped(0).into_inner(), 1);
        assert_eq!(ClusterCount::from_clamped(u16::MAX), ClusterCount::MAX);
    }

    #[test]
    fn window_validation() {
        assert_eq!(Window::new(0, 3), Err(InvalidArgument::EmptyWindow));
        assert_eq!(
            Window::new(3, 4),
            Err(InvalidArgument::EvenWindow {
                width: 3,
                height: 4
            })
        );

        let window = Window::new(5, 3).unwrap();
        assert_eq!(window.radius(), (2, 1));
        assert_eq!(window.len(), 15);

        let raster = Raster::filled(4, 4, BLACK).unwrap();
        assert_eq!(
            window.check_fits(&raster),
            Err(InvalidArgument::WindowTooLarge {
                window: (5, 3),
                raster: (4, 4)
            })
        );
        assert_eq!(Window::square(3).unwrap().check_fits(&raster), Ok(()));
    }

    #[test]
    #[cfg(feature = "image")]
    fn rgbimage_round_trip() {
        #[allow(clippy::cast_possible_truncation)]
        let image = RgbImage::from_fn(5, 4, |x, y| image::Rgb([x as u8, y as u8, 7]));

        let raster = Raster::try_from(&image).unwrap();
        assert_eq!(raster.dimensions(), (5, 4));
        assert_eq!(raster.get(4, 3), Some(Srgb::new(4, 3, 7)));
        assert_eq!(RgbImage::from(raster), image);

        let empty = RgbImage::new(0, 0);
        assert_eq!(
            Raster::try_from(&empty),
            Err(Error::InvalidArgument(InvalidArgument::EmptyRaster))
        );
    }
}
