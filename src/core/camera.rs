//! Per-frame camera pose, intrinsics and light estimation samples.

use crate::util::{translation, Intrinsics, Mat4, UVec2, Vec3};

use super::Orientation;

/// Camera state recorded for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSample {
    /// Camera-to-world pose.
    pub transform: Mat4,
    /// World-to-view matrix for the declared orientation.
    pub view_matrix: Mat4,
    /// Projection matrix for the declared orientation.
    pub projection_matrix: Mat4,
    /// Color intrinsics, remapped into `orientation`.
    pub color_intrinsics: Intrinsics,
    /// Depth intrinsics, rescaled from the color intrinsics.
    pub depth_intrinsics: Intrinsics,
    /// Orientation the frame was captured in.
    pub orientation: Orientation,
}

impl CameraSample {
    /// Build a sample from native 3x3 intrinsics, remapping them for `orientation`.
    pub fn new(
        transform: Mat4,
        view_matrix: Mat4,
        projection_matrix: Mat4,
        native_intrinsics: Intrinsics,
        orientation: Orientation,
        color_size: UVec2,
        depth_size: UVec2,
    ) -> Self {
        let color_intrinsics = orientation.remap_intrinsics(native_intrinsics, color_size);
        let depth_intrinsics = orientation.depth_intrinsics(color_intrinsics, color_size, depth_size);
        Self {
            transform,
            view_matrix,
            projection_matrix,
            color_intrinsics,
            depth_intrinsics,
            orientation,
        }
    }

    /// Camera position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        translation(&self.transform)
    }
}

/// Ambient lighting estimate for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightEstimation {
    /// Ambient intensity in lumens (1000 is neutral).
    pub ambient_intensity: f32,
    /// Ambient color temperature in Kelvin.
    pub ambient_color_temperature: f32,
}
