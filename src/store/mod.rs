//! Frame-indexed stores and the session that owns them.
//!
//! - [`FrameStore`] - single-valued streams (camera, depth, light estimation)
//! - [`FrameListStore`] - list-valued streams (anchors, planes, probes)
//! - [`Session`] - project plus every store, loaded from a capture directory

mod frames;
mod session;

pub use frames::*;
pub use session::*;
