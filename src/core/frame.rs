//! Per-frame aggregates: the stored depth set and the transient playback frame.

use crate::util::{ColorImage, ConfidenceImage, DepthImage, Error, FrameIndex, Result};

use super::{CameraSample, LightEstimation, Orientation, Project};

/// Depth images recorded for one frame, each independently optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthSet {
    pub depth: Option<DepthImage>,
    pub smooth_depth: Option<DepthImage>,
    pub confidence: Option<ConfidenceImage>,
}

impl DepthSet {
    /// True if none of the three images was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depth.is_none() && self.smooth_depth.is_none() && self.confidence.is_none()
    }
}

/// Synchronized snapshot of every modality at one decoded frame.
///
/// Images are already reoriented and borrow the driver's reusable buffers,
/// so a `Frame` cannot outlive the step that produced it.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub index: FrameIndex,
    pub project: &'a Project,
    pub camera: Option<&'a CameraSample>,
    /// Camera orientation, or `Unknown` without a camera sample.
    pub orientation: Orientation,
    pub color: Option<&'a ColorImage>,
    pub depth: Option<&'a DepthImage>,
    pub smooth_depth: Option<&'a DepthImage>,
    pub confidence: Option<&'a ConfidenceImage>,
    pub light_estimation: Option<&'a LightEstimation>,
}

impl<'a> Frame<'a> {
    /// Frame with only the project set.
    pub fn empty(index: FrameIndex, project: &'a Project) -> Self {
        Self {
            index,
            project,
            camera: None,
            orientation: Orientation::Unknown,
            color: None,
            depth: None,
            smooth_depth: None,
            confidence: None,
            light_estimation: None,
        }
    }

    /// Required modalities that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.color.is_none() {
            missing.push("color");
        }
        if self.depth.is_none() {
            missing.push("depth");
        }
        if self.camera.is_none() {
            missing.push("camera");
        }
        missing
    }

    /// True if color, depth and camera are all present.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.color.is_some() && self.depth.is_some() && self.camera.is_some()
    }

    /// Check required modalities.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidFrame {
                frame: self.index,
                missing: self.missing(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::UVec2;

    fn project() -> Project {
        Project {
            name: "t".into(),
            description: String::new(),
            creation_date: 0.0,
            number_of_frames: 1,
            color_size: UVec2::new(4, 2),
            depth_size: UVec2::new(4, 2),
            viewport_size: UVec2::new(4, 2),
            model_name: String::new(),
        }
    }

    #[test]
    fn test_empty_frame_is_invalid() {
        let p = project();
        let f = Frame::empty(3, &p);
        assert_eq!(f.missing(), vec!["color", "depth", "camera"]);
        match f.validate() {
            Err(Error::InvalidFrame { frame, missing }) => {
                assert_eq!(frame, 3);
                assert_eq!(missing.len(), 3);
            }
            other => panic!("expected InvalidFrame, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_set_empty() {
        assert!(DepthSet::default().is_empty());
        let set = DepthSet {
            confidence: Some(ConfidenceImage::new(1, 1)),
            ..Default::default()
        };
        assert!(!set.is_empty());
    }
}
