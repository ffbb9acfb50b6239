//! Math type re-exports and capture-specific math utilities.
//!
//! This module re-exports types from `glam` and provides the camera
//! intrinsics type plus the column-major array conversions used by the
//! JSON side channels.

// Re-export glam types
pub use glam::{
    // Single precision vectors
    Vec2, Vec3, Vec4,
    // Integer vectors
    IVec2, UVec2,
    // Single precision matrices
    Mat3, Mat4,
    // Quaternions
    Quat,
};

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::{Error, Result};

/// Index type shared by every modality of a capture.
pub type FrameIndex = u32;

/// Pinhole intrinsics: focal lengths and principal point in pixels.
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Intrinsics {
    /// Create intrinsics from focal lengths and principal point.
    #[inline]
    pub const fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Extract `(m00, m11, m02, m12)` from a homogeneous 3x3 intrinsics matrix.
    #[inline]
    pub fn from_matrix(m: &Mat4) -> Self {
        Self {
            fx: m.x_axis.x,
            fy: m.y_axis.y,
            cx: m.z_axis.x,
            cy: m.z_axis.y,
        }
    }

    /// Pack as `(fx, fy, cx, cy)`.
    #[inline]
    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.fx, self.fy, self.cx, self.cy)
    }

    /// Swap the x and y roles (focal lengths and principal point).
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::new(self.fy, self.fx, self.cy, self.cx)
    }

    /// Scale x terms by `sx` and y terms by `sy`.
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(self.fx * sx, self.fy * sy, self.cx * sx, self.cy * sy)
    }
}

impl fmt::Debug for Intrinsics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Intrinsics(f=({}, {}), c=({}, {}))",
            self.fx, self.fy, self.cx, self.cy
        )
    }
}

/// Build a homogeneous transform from a column-major array.
///
/// 16 values fill a 4x4 matrix; 9 values fill the upper 3x3 block with
/// zero translation. Any other length is rejected.
pub fn mat4_from_column_major(values: &[f32]) -> Result<Mat4> {
    match values.len() {
        16 => Ok(Mat4::from_cols_slice(values)),
        9 => Ok(Mat4::from_mat3(Mat3::from_cols_slice(values))),
        n => Err(Error::record(format!(
            "matrix needs 9 or 16 elements, got {}",
            n
        ))),
    }
}

/// Build a `Vec4` from the first three of 3 or 4 values; `w` is always zero.
pub fn vec4_from_slice(values: &[f32]) -> Result<Vec4> {
    match *values {
        [x, y, z] | [x, y, z, _] => Ok(Vec4::new(x, y, z, 0.0)),
        _ => Err(Error::record(format!(
            "vector needs 3 or 4 elements, got {}",
            values.len()
        ))),
    }
}

/// Build a `Vec3` from at least 3 values.
pub fn vec3_from_slice(values: &[f32]) -> Result<Vec3> {
    match *values {
        [x, y, z, ..] => Ok(Vec3::new(x, y, z)),
        _ => Err(Error::record(format!(
            "vector needs 3 elements, got {}",
            values.len()
        ))),
    }
}

/// Build an image size from a `[width, height]` pair.
pub fn size_from_slice(values: &[i32]) -> Result<UVec2> {
    match *values {
        [w, h] if w >= 0 && h >= 0 => Ok(UVec2::new(w as u32, h as u32)),
        _ => Err(Error::record(format!("invalid size {:?}", values))),
    }
}

/// Ceiling division, used for dispatch grid sizes.
#[inline]
pub const fn div_up(total: u32, group: u32) -> u32 {
    total.div_ceil(group)
}

/// Translation column of a homogeneous transform.
#[inline]
pub fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}
