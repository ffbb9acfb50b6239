//! # artrack
//!
//! Replay of recorded augmented-reality capture sessions.
//!
//! A capture is a directory holding a color video plus side channels sampled
//! at their own rates: camera pose and intrinsics, depth, smoothed depth,
//! depth confidence, world and plane anchors, environment probe cubemaps and
//! light estimates. Every record carries the frame index it belongs to. For
//! each decoded video frame this crate rebuilds the matching cross-stream
//! snapshot, reorients image buffers from the sensor's native landscape
//! orientation into the orientation the device was held in, and emits anchor
//! lifecycle events in a fixed order.
//!
//! ## Modules
//!
//! - [`util`] - Images, pixel formats, math, errors
//! - [`raw`] - Binary depth/confidence/cubemap buffers
//! - [`core`] - Capture data model
//! - [`json`] - JSON side-channel parsers
//! - [`store`] - Frame-indexed stores and [`Session`](store::Session)
//! - [`transform`] - Orientation kernels and backends
//! - [`playback`] - The playback driver, decoder contract and anchor registry
//!
//! ## Example
//!
//! ```ignore
//! use artrack::prelude::*;
//!
//! let config = PlaybackConfig::load();
//! let session = Session::load("capture/".as_ref(), &config.load_options())?;
//! let decoder = StillDecoder::new(session.project.color_size, session.project.number_of_frames, [0; 4]);
//! let mut driver = PlaybackDriver::new(session, decoder, config)?;
//!
//! driver.on_frame(|frame| println!("frame {} {}", frame.index, frame.orientation));
//! driver.run()?;
//! ```

pub mod util;
pub mod raw;
pub mod core;
pub mod json;
pub mod store;
pub mod transform;
pub mod playback;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, FrameIndex, Image, Intrinsics, Result};
    pub use crate::core::*;
    pub use crate::store::{LoadOptions, Session};
    pub use crate::transform::{Backend, CpuBackend, ParallelBackend, Pipeline, TransformBackend};
    pub use crate::playback::{
        AnchorEvent, AnchorRegistry, InvalidFramePolicy, LifecycleOutcome, PlaybackConfig,
        PlaybackDriver, PlaybackState, StepOutcome, StillDecoder, StopHandle, VideoDecoder,
    };
}
