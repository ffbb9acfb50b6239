//! Typed 2-D image buffers.

use std::fmt;

use super::math::UVec2;
use super::pixel::{Pixel, Rgba16, Rgba8};
use super::{Error, Result};

/// Row-major 2-D image of a single pixel type.
#[derive(Clone, PartialEq)]
pub struct Image<T: Pixel> {
    width: u32,
    height: u32,
    pixels: Vec<T>,
}

/// Depth or smoothed depth in meters.
pub type DepthImage = Image<f32>;
/// Per-pixel depth confidence (0 = low, 2 = high).
pub type ConfidenceImage = Image<u8>;
/// Decoded video color.
pub type ColorImage = Image<Rgba8>;
/// One environment cubemap face.
pub type FaceImage = Image<Rgba16>;

impl<T: Pixel> Image<T> {
    /// Create an image filled with the default pixel value.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![T::default(); width as usize * height as usize],
        }
    }

    /// Create an image from existing pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(Error::record(format!(
                "{}x{} image needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Total pixel count.
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True if the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Set the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.pixels[i] = value;
        }
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    /// Mutable access to all pixels, row-major.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    /// Raw bytes in native byte order, for upload to a presentation layer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }

    /// Make this image `width` x `height`, reallocating only if the size changes.
    ///
    /// Contents are unspecified after a size change.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels.clear();
            self.pixels.resize(width as usize * height as usize, T::default());
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl<T: Pixel> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image<{}>({}x{})", T::FORMAT, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_indexing() {
        let mut img = DepthImage::new(3, 2);
        img.set(2, 1, 5.0);
        assert_eq!(img.get(2, 1), Some(5.0));
        assert_eq!(img.pixels()[5], 5.0);
        assert_eq!(img.get(3, 0), None);
        assert_eq!(&img.pixels()[3..], &[0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_from_pixels_checks_len() {
        assert!(ConfidenceImage::from_pixels(2, 2, vec![0; 3]).is_err());
        assert!(ConfidenceImage::from_pixels(2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_ensure_size_keeps_allocation() {
        let mut img = ColorImage::new(4, 4);
        let ptr = img.pixels().as_ptr();
        img.ensure_size(4, 4);
        assert_eq!(img.pixels().as_ptr(), ptr);

        img.ensure_size(2, 8);
        assert_eq!(img.size(), UVec2::new(2, 8));
        assert_eq!(img.len(), 16);
    }

    #[test]
    fn test_as_bytes() {
        let img = ColorImage::from_pixels(1, 1, vec![[1, 2, 3, 4]]).unwrap();
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4]);
    }
}
