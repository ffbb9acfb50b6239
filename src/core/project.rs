//! Session-wide capture metadata.

use time::OffsetDateTime;

use crate::util::{Error, FrameIndex, Result, UVec2};

/// Metadata describing one capture session.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    /// Session name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation time in seconds since the Unix epoch.
    pub creation_date: f64,
    /// Number of recorded frames.
    pub number_of_frames: u32,
    /// Native color resolution.
    pub color_size: UVec2,
    /// Native depth resolution.
    pub depth_size: UVec2,
    /// Device viewport size.
    pub viewport_size: UVec2,
    /// Capture device model.
    pub model_name: String,
}

impl Project {
    /// Creation time as a UTC timestamp, if representable.
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        if !self.creation_date.is_finite() {
            return None;
        }
        let nanos = (self.creation_date * 1e9) as i128;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }

    /// Index of the last recorded frame.
    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.number_of_frames.checked_sub(1)
    }

    /// Reject metadata that would make intrinsics or buffer sizes meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.color_size.min_element() == 0 {
            return Err(Error::InvalidSession(format!(
                "color size {}x{} is empty",
                self.color_size.x, self.color_size.y
            )));
        }
        if self.depth_size.min_element() == 0 {
            return Err(Error::InvalidSession(format!(
                "depth size {}x{} is empty",
                self.depth_size.x, self.depth_size.y
            )));
        }
        Ok(())
    }
}
