//! Playback events and subscriber lists.
//!
//! Subscribers are invoked synchronously, in registration order, from inside
//! [`PlaybackDriver::step`](super::PlaybackDriver::step).

use crate::core::{AnchorRecord, Frame};
use crate::util::FrameIndex;

/// One anchor lifecycle record dispatched at a frame.
#[derive(Clone, Copy, Debug)]
pub struct AnchorEvent<'a> {
    pub frame: FrameIndex,
    pub record: &'a AnchorRecord,
}

/// Called with every emitted frame.
pub type FrameCallback = Box<dyn FnMut(&Frame<'_>)>;
/// Called with every anchor event.
pub type AnchorCallback = Box<dyn FnMut(&AnchorEvent<'_>)>;
/// Called once with the last frame index when playback finishes.
pub type FinishCallback = Box<dyn FnMut(FrameIndex)>;

/// Ordered subscriber lists, one per event kind.
#[derive(Default)]
pub struct Subscribers {
    frame: Vec<FrameCallback>,
    anchor: Vec<AnchorCallback>,
    finish: Vec<FinishCallback>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_frame(&mut self, f: impl FnMut(&Frame<'_>) + 'static) {
        self.frame.push(Box::new(f));
    }

    pub fn on_anchor(&mut self, f: impl FnMut(&AnchorEvent<'_>) + 'static) {
        self.anchor.push(Box::new(f));
    }

    pub fn on_finished(&mut self, f: impl FnMut(FrameIndex) + 'static) {
        self.finish.push(Box::new(f));
    }

    pub(crate) fn emit_frame(&mut self, frame: &Frame<'_>) {
        for cb in &mut self.frame {
            cb(frame);
        }
    }

    pub(crate) fn emit_anchor(&mut self, event: &AnchorEvent<'_>) {
        for cb in &mut self.anchor {
            cb(event);
        }
    }

    pub(crate) fn emit_finished(&mut self, last: FrameIndex) {
        for cb in &mut self.finish {
            cb(last);
        }
    }

    /// `(frame, anchor, finish)` subscriber counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.frame.len(), self.anchor.len(), self.finish.len())
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("frame", &self.frame.len())
            .field("anchor", &self.anchor.len())
            .field("finish", &self.finish.len())
            .finish()
    }
}
