//! Per-orientation pixel maps and the dispatch grid that drives them.

use crate::core::Orientation;
use crate::util::{div_up, UVec2};

/// Default work-group size of the orientation kernels.
pub const DEFAULT_GROUP_SIZE: UVec2 = UVec2::new(8, 8);

/// Pixel remap from a native `W x H` buffer into a non-native orientation.
///
/// The maps keep the reoriented principal point consistent with
/// [`Orientation::remap_intrinsics`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// 180 degree rotation: `(x, y) -> (W-1-x, H-1-y)`.
    LandscapeLeft,
    /// Transpose: `(x, y) -> (y, x)` into `H x W`.
    Portrait,
    /// Anti-transpose: `(x, y) -> (H-1-y, W-1-x)` into `H x W`.
    PortraitUpsideDown,
}

impl Kernel {
    /// Kernel for `orientation`; `None` for the native orientation and Unknown.
    pub const fn for_orientation(orientation: Orientation) -> Option<Self> {
        match orientation {
            Orientation::LandscapeLeft => Some(Self::LandscapeLeft),
            Orientation::Portrait => Some(Self::Portrait),
            Orientation::PortraitUpsideDown => Some(Self::PortraitUpsideDown),
            Orientation::LandscapeRight | Orientation::Unknown => None,
        }
    }

    #[inline]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::Portrait | Self::PortraitUpsideDown)
    }

    /// Destination size for a source of `size`.
    #[inline]
    pub fn output_size(self, size: UVec2) -> UVec2 {
        if self.swaps_axes() {
            UVec2::new(size.y, size.x)
        } else {
            size
        }
    }

    /// Destination pixel written by source pixel `(x, y)` of a `size` source.
    #[inline]
    pub fn map(self, x: u32, y: u32, size: UVec2) -> (u32, u32) {
        let (w, h) = (size.x, size.y);
        match self {
            Self::LandscapeLeft => (w - 1 - x, h - 1 - y),
            Self::Portrait => (y, x),
            Self::PortraitUpsideDown => (h - 1 - y, w - 1 - x),
        }
    }

    /// Source pixel read by destination pixel `(dx, dy)`; inverse of [`map`](Self::map).
    #[inline]
    pub fn source(self, dx: u32, dy: u32, size: UVec2) -> (u32, u32) {
        let (w, h) = (size.x, size.y);
        match self {
            Self::LandscapeLeft => (w - 1 - dx, h - 1 - dy),
            Self::Portrait => (dy, dx),
            Self::PortraitUpsideDown => (w - 1 - dy, h - 1 - dx),
        }
    }
}

/// Work-group grid covering a source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch {
    /// Source image size; invocations outside it do nothing.
    pub size: UVec2,
    pub group_size: UVec2,
    /// `(ceil(W / gx), ceil(H / gy))`.
    pub groups: UVec2,
}

impl Dispatch {
    /// Grid for a `size` source with `group_size` work groups.
    ///
    /// A zero group dimension is treated as 1.
    pub fn new(size: UVec2, group_size: UVec2) -> Self {
        let group_size = group_size.max(UVec2::ONE);
        Self {
            size,
            group_size,
            groups: UVec2::new(div_up(size.x, group_size.x), div_up(size.y, group_size.y)),
        }
    }

    /// Total invocations, including those that fall outside the image.
    #[inline]
    pub fn invocations(&self) -> u64 {
        let total = self.groups * self.group_size;
        total.x as u64 * total.y as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: UVec2 = UVec2::new(5, 3);

    #[test]
    fn test_for_orientation() {
        assert_eq!(Kernel::for_orientation(Orientation::LandscapeRight), None);
        assert_eq!(Kernel::for_orientation(Orientation::Unknown), None);
        assert_eq!(Kernel::for_orientation(Orientation::Portrait), Some(Kernel::Portrait));
    }

    #[test]
    fn test_source_inverts_map() {
        for kernel in [Kernel::LandscapeLeft, Kernel::Portrait, Kernel::PortraitUpsideDown] {
            let out = kernel.output_size(SIZE);
            for y in 0..SIZE.y {
                for x in 0..SIZE.x {
                    let (dx, dy) = kernel.map(x, y, SIZE);
                    assert!(dx < out.x && dy < out.y, "{:?} maps out of bounds", kernel);
                    assert_eq!(kernel.source(dx, dy, SIZE), (x, y), "{:?}", kernel);
                }
            }
        }
    }

    #[test]
    fn test_dispatch_grid() {
        let d = Dispatch::new(UVec2::new(17, 8), DEFAULT_GROUP_SIZE);
        assert_eq!(d.groups, UVec2::new(3, 1));
        assert_eq!(d.invocations(), 24 * 8);

        let d = Dispatch::new(UVec2::new(4, 4), UVec2::ZERO);
        assert_eq!(d.group_size, UVec2::ONE);
        assert_eq!(d.groups, UVec2::new(4, 4));
    }
}
