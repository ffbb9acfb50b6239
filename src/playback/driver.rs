//! The playback driver state machine.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use super::{
    AnchorEvent, InvalidFramePolicy, PlaybackConfig, SharedRegistry, Subscribers, VideoDecoder,
};
use crate::core::{Frame, Orientation};
use crate::store::Session;
use crate::transform::{OrientedBuffer, Pipeline, TransformBackend};
use crate::util::{ColorImage, Error, FrameIndex, Result, Rgba8};

/// Driver lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Stores are being populated; no driver exists yet.
    Loading,
    /// Decoder attached, waiting for its readiness signal.
    AwaitingDecoderReady,
    /// One decode request per `step()`.
    Stepping,
    /// Terminal.
    Finished,
}

impl PlaybackState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::AwaitingDecoderReady => "AwaitingDecoderReady",
            Self::Stepping => "Stepping",
            Self::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one [`PlaybackDriver::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Frame delivered to frame subscribers (possibly incomplete under `Emit`).
    Emitted(FrameIndex),
    /// Invalid frame suppressed under `Skip`; its anchors were still dispatched.
    Skipped(FrameIndex),
    /// Playback is over; the decoder was not touched.
    Finished,
}

/// Cloneable handle that ends playback after the step in progress.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub frames_emitted: u32,
    pub frames_skipped: u32,
    pub anchor_events: u32,
    /// Last frame index the decoder produced.
    pub last_decoded: Option<FrameIndex>,
}

/// Steps a video decoder and joins every store at each decoded index.
pub struct PlaybackDriver<D: VideoDecoder> {
    session: Session,
    decoder: D,
    config: PlaybackConfig,
    pipeline: Pipeline,
    state: PlaybackState,
    subscribers: Subscribers,
    stop: StopHandle,
    last_frame: FrameIndex,
    stats: PlaybackStats,
    color: ColorImage,
    color_out: OrientedBuffer<Rgba8>,
    depth_out: OrientedBuffer<f32>,
    smooth_depth_out: OrientedBuffer<f32>,
    confidence_out: OrientedBuffer<u8>,
}

impl<D: VideoDecoder> PlaybackDriver<D> {
    /// Attach `decoder` to a loaded session.
    ///
    /// Fails if the decoder reports no frames or the config is inconsistent.
    pub fn new(session: Session, decoder: D, config: PlaybackConfig) -> Result<Self> {
        config.validate()?;
        let frame_count = decoder.frame_count();
        let Some(last_frame) = frame_count.checked_sub(1) else {
            return Err(Error::decoder("decoder reports zero frames"));
        };
        if frame_count != session.project.number_of_frames {
            warn!(
                "Decoder has {} frames, project declares {}",
                frame_count, session.project.number_of_frames
            );
        }

        let pipeline = config.pipeline();
        debug!(
            "Transform backend {} with {}x{} work groups",
            pipeline.backend().name(),
            pipeline.group_size().x,
            pipeline.group_size().y
        );

        let color_size = session.project.color_size;
        let depth_size = session.project.depth_size;
        Ok(Self {
            decoder,
            config,
            pipeline,
            state: PlaybackState::AwaitingDecoderReady,
            subscribers: Subscribers::new(),
            stop: StopHandle::default(),
            last_frame,
            stats: PlaybackStats::default(),
            color: ColorImage::new(color_size.x, color_size.y),
            color_out: OrientedBuffer::with_native_size(color_size),
            depth_out: OrientedBuffer::with_native_size(depth_size),
            smooth_depth_out: OrientedBuffer::with_native_size(depth_size),
            confidence_out: OrientedBuffer::with_native_size(depth_size),
            session,
        })
    }

    /// Load the session in `root` and attach `decoder`.
    pub fn load(root: impl AsRef<Path>, decoder: D, config: PlaybackConfig) -> Result<Self> {
        debug!("Playback state: {}", PlaybackState::Loading);
        let session = Session::load(root.as_ref(), &config.load_options())?;
        Self::new(session, decoder, config)
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    /// Index of the last frame; reaching it finishes playback.
    #[inline]
    pub fn last_frame(&self) -> FrameIndex {
        self.last_frame
    }

    pub fn on_frame(&mut self, f: impl FnMut(&Frame<'_>) + 'static) {
        self.subscribers.on_frame(f);
    }

    pub fn on_anchor(&mut self, f: impl FnMut(&AnchorEvent<'_>) + 'static) {
        self.subscribers.on_anchor(f);
    }

    pub fn on_finished(&mut self, f: impl FnMut(FrameIndex) + 'static) {
        self.subscribers.on_finished(f);
    }

    /// Feed every anchor event into `registry`.
    pub fn attach_registry(&mut self, registry: SharedRegistry) {
        self.subscribers.on_anchor(move |event| {
            registry.lock().apply(event);
        });
    }

    /// Handle that can stop playback from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request a stop; the next `step()` finishes without decoding.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Wait for the decoder and enable stepping.
    pub fn start(&mut self) -> Result<()> {
        if self.state != PlaybackState::AwaitingDecoderReady {
            return Err(Error::InvalidState {
                expected: PlaybackState::AwaitingDecoderReady.name(),
                actual: self.state.name(),
            });
        }
        self.decoder.wait_ready()?;
        self.state = PlaybackState::Stepping;
        info!(
            "Playback started: {} ({} frames)",
            self.session.project.name,
            self.last_frame + 1
        );
        Ok(())
    }

    /// Decode one frame, then emit it and its anchor events.
    pub fn step(&mut self) -> Result<StepOutcome> {
        match self.state {
            PlaybackState::Finished => return Ok(StepOutcome::Finished),
            PlaybackState::Stepping => {}
            other => {
                return Err(Error::InvalidState {
                    expected: PlaybackState::Stepping.name(),
                    actual: other.name(),
                })
            }
        }

        if self.stop.is_stopped() {
            info!("Playback stopped");
            self.finish(false);
            return Ok(StepOutcome::Finished);
        }

        let decoded = match self.decoder.step_into(&mut self.color) {
            Ok(d) => d,
            Err(e) => {
                self.state = PlaybackState::Finished;
                return Err(e);
            }
        };
        let Some(index) = decoded else {
            warn!(
                "Decoder ended before frame {} (last decoded {:?})",
                self.last_frame, self.stats.last_decoded
            );
            self.finish(true);
            return Ok(StepOutcome::Finished);
        };
        self.stats.last_decoded = Some(index);

        let outcome = self.process(index)?;
        if index >= self.last_frame {
            self.finish(true);
        }
        Ok(outcome)
    }

    /// `start()` if needed, then step until finished.
    pub fn run(&mut self) -> Result<PlaybackStats> {
        if self.state == PlaybackState::AwaitingDecoderReady {
            self.start()?;
        }
        while self.step()? != StepOutcome::Finished {}
        Ok(self.stats)
    }

    fn process(&mut self, index: FrameIndex) -> Result<StepOutcome> {
        let session = &self.session;
        let pipeline = &self.pipeline;

        let camera = session.cameras.get(index);
        let depth_set = session.depth.get(index);
        let orientation = camera.map_or(Orientation::Unknown, |c| c.orientation);

        let mut frame = Frame::empty(index, &session.project);
        frame.camera = camera;
        frame.orientation = orientation;
        frame.light_estimation = session.lights.get(index);

        if camera.is_some() {
            frame.color = pipeline.reorient(&self.color, orientation, &mut self.color_out);
            if let Some(set) = depth_set {
                if let Some(img) = &set.depth {
                    frame.depth = pipeline.reorient(img, orientation, &mut self.depth_out);
                }
                if let Some(img) = &set.smooth_depth {
                    frame.smooth_depth = pipeline.reorient(img, orientation, &mut self.smooth_depth_out);
                }
                if let Some(img) = &set.confidence {
                    frame.confidence = pipeline.reorient(img, orientation, &mut self.confidence_out);
                }
            }
        } else {
            frame.color = Some(&self.color);
        }

        debug!(
            "Frame {} ({}): camera={} depth={} light={}",
            index,
            orientation,
            frame.camera.is_some(),
            frame.depth.is_some(),
            frame.light_estimation.is_some()
        );

        let emit = if frame.is_valid() {
            true
        } else {
            let missing = frame.missing();
            match self.config.invalid_frame_policy {
                InvalidFramePolicy::Halt => {
                    self.state = PlaybackState::Finished;
                    return Err(Error::InvalidFrame { frame: index, missing });
                }
                InvalidFramePolicy::Skip => {
                    warn!("Skipping frame {}: missing {}", index, missing.join(", "));
                    false
                }
                InvalidFramePolicy::Emit => {
                    debug!("Emitting incomplete frame {}: missing {}", index, missing.join(", "));
                    true
                }
            }
        };

        if emit {
            self.subscribers.emit_frame(&frame);
            self.stats.frames_emitted += 1;
        } else {
            self.stats.frames_skipped += 1;
        }

        let records = session
            .anchors
            .get(index)
            .iter()
            .chain(session.probes.get(index))
            .chain(session.planes.get(index));
        for record in records {
            trace!("Anchor event {} {} at frame {}", record.status, record.identifier, index);
            self.subscribers.emit_anchor(&AnchorEvent { frame: index, record });
            self.stats.anchor_events += 1;
        }

        Ok(if emit {
            StepOutcome::Emitted(index)
        } else {
            StepOutcome::Skipped(index)
        })
    }

    fn finish(&mut self, notify: bool) {
        self.state = PlaybackState::Finished;
        info!(
            "Playback finished: {} emitted, {} skipped, {} anchor events",
            self.stats.frames_emitted, self.stats.frames_skipped, self.stats.anchor_events
        );
        if notify && self.config.notify_finish {
            if let Some(last) = self.stats.last_decoded {
                self.subscribers.emit_finished(last);
            }
        }
    }
}

impl<D: VideoDecoder> std::fmt::Debug for PlaybackDriver<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackDriver")
            .field("project", &self.session.project.name)
            .field("state", &self.state)
            .field("last_frame", &self.last_frame)
            .field("stats", &self.stats)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
