//! Capture data model.
//!
//! - [`Project`] - session metadata
//! - [`CameraSample`] / [`LightEstimation`] - single-valued per-frame samples
//! - [`DepthSet`] - per-frame depth, smoothed depth and confidence
//! - [`AnchorRecord`] - world, plane and probe anchor lifecycle records
//! - [`Frame`] - transient synchronized snapshot emitted during playback

mod anchor;
mod camera;
mod frame;
mod orientation;
mod project;

pub use anchor::*;
pub use camera::*;
pub use frame::*;
pub use orientation::*;
pub use project::*;
