//! Screen orientation of a captured frame.
//!
//! All raw buffers are recorded in the sensor's native orientation
//! ([`Orientation::LandscapeRight`]). The orientation declared by a camera
//! sample says how those buffers and the camera intrinsics must be remapped
//! to match what the device displayed.

use crate::util::{Error, Intrinsics, Result, UVec2};

/// Device orientation while a frame was captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Unknown = 0,
    Portrait = 1,
    PortraitUpsideDown = 2,
    LandscapeRight = 3,
    LandscapeLeft = 4,
}

impl Orientation {
    /// All orientations in wire order.
    pub const ALL: [Self; 5] = [
        Self::Unknown,
        Self::Portrait,
        Self::PortraitUpsideDown,
        Self::LandscapeRight,
        Self::LandscapeLeft,
    ];

    /// Convert from the integer stored in `camera.json`.
    pub const fn from_i64(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::Unknown),
            1 => Some(Self::Portrait),
            2 => Some(Self::PortraitUpsideDown),
            3 => Some(Self::LandscapeRight),
            4 => Some(Self::LandscapeLeft),
            _ => None,
        }
    }

    /// Like [`from_i64`](Self::from_i64) but reports out-of-range values.
    pub fn try_from_i64(v: i64) -> Result<Self> {
        Self::from_i64(v).ok_or_else(|| Error::record(format!("unknown orientation {}", v)))
    }

    /// Returns the name of this orientation as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Portrait => "Portrait",
            Self::PortraitUpsideDown => "PortraitUpsideDown",
            Self::LandscapeRight => "LandscapeRight",
            Self::LandscapeLeft => "LandscapeLeft",
        }
    }

    #[inline]
    pub const fn is_portrait(self) -> bool {
        matches!(self, Self::Portrait | Self::PortraitUpsideDown)
    }

    /// True if buffers in this orientation are the native buffers.
    #[inline]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::LandscapeRight)
    }

    /// Size of a native `size` buffer after reorientation, `None` for Unknown.
    pub fn oriented_size(self, size: UVec2) -> Option<UVec2> {
        match self {
            Self::Unknown => None,
            Self::LandscapeRight | Self::LandscapeLeft => Some(size),
            Self::Portrait | Self::PortraitUpsideDown => Some(UVec2::new(size.y, size.x)),
        }
    }

    /// Remap native color intrinsics into this orientation.
    ///
    /// `color_size` is the native color resolution `(W, H)`.
    pub fn remap_intrinsics(self, k: Intrinsics, color_size: UVec2) -> Intrinsics {
        let (w, h) = (color_size.x as f32, color_size.y as f32);
        match self {
            Self::Unknown | Self::LandscapeRight => k,
            Self::LandscapeLeft => Intrinsics::new(k.fx, k.fy, w - k.cx, h - k.cy),
            Self::Portrait => k.transposed(),
            Self::PortraitUpsideDown => Intrinsics::new(k.fy, k.fx, h - k.cy, w - k.cx),
        }
    }

    /// Rescale already remapped color intrinsics to the depth resolution.
    ///
    /// The width ratio applies along whichever axis is aligned with the native
    /// width in this orientation.
    pub fn depth_intrinsics(self, k: Intrinsics, color_size: UVec2, depth_size: UVec2) -> Intrinsics {
        let sx = depth_size.x as f32 / color_size.x as f32;
        let sy = depth_size.y as f32 / color_size.y as f32;
        if self.is_portrait() {
            k.scaled(sy, sx)
        } else {
            k.scaled(sx, sy)
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
