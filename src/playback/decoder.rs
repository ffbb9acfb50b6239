//! Video decoder contract.
//!
//! The driver never decodes video itself. It waits once for the decoder to
//! become ready, then asks for exactly one frame per step; the decoder writes
//! color into the driver's buffer and reports which frame index it produced.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::util::{ColorImage, FrameIndex, Result, Rgba8, UVec2};

/// Single-step video source.
pub trait VideoDecoder {
    /// Block until the decoder can produce frames.
    fn wait_ready(&mut self) -> Result<()>;

    /// Total number of frames the stream holds.
    fn frame_count(&self) -> u32;

    /// Decode the next frame into `color`.
    ///
    /// Returns the decoded frame index, or `None` at end of stream.
    fn step_into(&mut self, color: &mut ColorImage) -> Result<Option<FrameIndex>>;
}

impl<D: VideoDecoder + ?Sized> VideoDecoder for Box<D> {
    fn wait_ready(&mut self) -> Result<()> {
        (**self).wait_ready()
    }

    fn frame_count(&self) -> u32 {
        (**self).frame_count()
    }

    fn step_into(&mut self, color: &mut ColorImage) -> Result<Option<FrameIndex>> {
        (**self).step_into(color)
    }
}

/// One-shot readiness flag shared between a decoder and whoever prepares it.
#[derive(Clone, Debug, Default)]
pub struct ReadySignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark ready and wake every waiter.
    pub fn set(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock() = true;
        cvar.notify_all();
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block until [`set`](Self::set) has been called.
    pub fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut ready = lock.lock();
        while !*ready {
            cvar.wait(&mut ready);
        }
    }
}

/// Decoder producing a constant color for frames `0..frame_count`.
///
/// Stands in for a real video source in dry runs and tests.
#[derive(Debug)]
pub struct StillDecoder {
    size: UVec2,
    color: Rgba8,
    frame_count: u32,
    next: FrameIndex,
    ready: ReadySignal,
}

impl StillDecoder {
    /// Decoder that is ready immediately.
    pub fn new(size: UVec2, frame_count: u32, color: Rgba8) -> Self {
        let ready = ReadySignal::new();
        ready.set();
        Self {
            size,
            color,
            frame_count,
            next: 0,
            ready,
        }
    }

    /// Decoder that becomes ready when the returned signal is set.
    pub fn deferred(size: UVec2, frame_count: u32, color: Rgba8) -> (Self, ReadySignal) {
        let ready = ReadySignal::new();
        let decoder = Self {
            size,
            color,
            frame_count,
            next: 0,
            ready: ready.clone(),
        };
        (decoder, ready)
    }

    /// Start decoding at `frame` instead of 0.
    pub fn starting_at(mut self, frame: FrameIndex) -> Self {
        self.next = frame;
        self
    }
}

impl VideoDecoder for StillDecoder {
    fn wait_ready(&mut self) -> Result<()> {
        self.ready.wait();
        Ok(())
    }

    fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn step_into(&mut self, color: &mut ColorImage) -> Result<Option<FrameIndex>> {
        if self.next >= self.frame_count {
            return Ok(None);
        }
        color.ensure_size(self.size.x, self.size.y);
        color.fill(self.color);
        let frame = self.next;
        self.next += 1;
        Ok(Some(frame))
    }
}
