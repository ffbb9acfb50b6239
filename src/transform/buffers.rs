//! Reusable destination buffers for reoriented images.

use crate::core::Orientation;
use crate::util::{Image, Pixel, UVec2};

/// One landscape-shaped and one portrait-shaped destination for a modality.
///
/// Both are sized once from the native resolution, so switching orientation
/// between frames never reallocates.
#[derive(Clone, Debug)]
pub struct OrientedBuffer<T: Pixel> {
    landscape: Image<T>,
    portrait: Image<T>,
}

impl<T: Pixel> OrientedBuffer<T> {
    /// Pre-size both destinations for a native `size` source.
    pub fn with_native_size(size: UVec2) -> Self {
        Self {
            landscape: Image::new(size.x, size.y),
            portrait: Image::new(size.y, size.x),
        }
    }

    /// Destination used for `orientation`.
    pub fn slot_mut(&mut self, orientation: Orientation) -> &mut Image<T> {
        if orientation.is_portrait() {
            &mut self.portrait
        } else {
            &mut self.landscape
        }
    }

    /// Destination used for `orientation`, read-only.
    pub fn slot(&self, orientation: Orientation) -> &Image<T> {
        if orientation.is_portrait() {
            &self.portrait
        } else {
            &self.landscape
        }
    }
}

impl<T: Pixel> Default for OrientedBuffer<T> {
    fn default() -> Self {
        Self::with_native_size(UVec2::ZERO)
    }
}
