//! Raw buffer format constants and capture directory layout.

/// Size of the raw header in bytes: `(width: i32, height: i32)`, little-endian.
pub const HEADER_SIZE: usize = 8;

/// Offset of the width field in the header.
pub const WIDTH_OFFSET: usize = 0;

/// Offset of the height field in the header.
pub const HEIGHT_OFFSET: usize = 4;

/// Number of faces in an environment cubemap.
pub const CUBEMAP_FACES: usize = 6;

/// Gamma applied to cubemap texels on load: `linear = raw^(1 / CUBEMAP_GAMMA)`.
pub const CUBEMAP_GAMMA: f32 = 2.2;

// Session-level files
pub const PROJECT_FILE: &str = "project.json";
pub const CAMERA_FILE: &str = "camera.json";
pub const ANCHOR_FILE: &str = "anchor.json";
pub const PLANE_ANCHOR_FILE: &str = "plane_anchor.json";
pub const ENV_PROBE_FILE: &str = "env_probe.json";
pub const LIGHT_ESTIMATION_FILE: &str = "lightestimation.json";
pub const COLOR_VIDEO_FILE: &str = "color.mov";

// Per-frame files, under `<frame>/`
pub const DEPTH_FILE: &str = "depth.raw";
pub const SMOOTH_DEPTH_FILE: &str = "smooth_depth.raw";
pub const CONFIDENCE_FILE: &str = "depth_conf.raw";

/// File name of cubemap face `face`, under `<frame>/<probe-id>/`.
#[inline]
pub fn cubemap_face_file(face: usize) -> String {
    format!("envcubemap_{}.raw", face)
}
