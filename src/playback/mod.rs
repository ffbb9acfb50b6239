//! Step-driven playback of a loaded session.
//!
//! ```text
//! Loading --new()--> AwaitingDecoderReady --start()--> Stepping --last frame--> Finished
//!                                                          |  ^
//!                                                          +--+ step()
//! ```
//!
//! Each `step()` requests exactly one frame from the [`VideoDecoder`], joins
//! the session stores at the decoded index, reorients every image into the
//! camera's orientation, emits the [`Frame`](crate::core::Frame) and then one
//! [`AnchorEvent`] per world anchor, probe and plane at that index.

mod config;
mod decoder;
mod driver;
mod events;
pub mod registry;

pub use config::*;
pub use decoder::*;
pub use driver::*;
pub use events::*;
pub use registry::{AnchorRegistry, LifecycleOutcome, SharedRegistry, TrackedAnchor};
