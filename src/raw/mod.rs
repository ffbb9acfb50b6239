//! Binary per-frame buffers.
//!
//! Depth, smoothed depth, confidence and cubemap faces share one layout:
//!
//! ```text
//! +------------------+
//! | Width            |  4 bytes (i32 LE)
//! +------------------+
//! | Height           |  4 bytes (i32 LE)
//! +------------------+
//! | Pixels           |  width * height * element size
//! +------------------+
//! ```
//!
//! Element sizes: `f32` for depth, `u8` for confidence, `4 x f16` for
//! cubemap faces.

mod cubemap;
mod format;
mod reader;

pub use cubemap::*;
pub use format::*;
pub use reader::*;
