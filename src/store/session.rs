//! A loaded capture session: project metadata plus every per-frame store.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use super::{FrameListStore, FrameStore};
use crate::core::{AnchorRecord, CameraSample, DepthSet, LightEstimation, Project};
use crate::json::anchor::{load_anchors, load_planes, load_probes, ANCHOR_STREAM, PLANE_STREAM, PROBE_STREAM};
use crate::json::camera::{load_cameras, CAMERA_STREAM};
use crate::json::light::{load_light_estimations, LIGHT_STREAM};
use crate::json::project::load_project;
use crate::raw::{read_confidence, read_depth, CONFIDENCE_FILE, DEPTH_FILE, SMOOTH_DEPTH_FILE};
use crate::util::{FrameIndex, Result};

pub const DEPTH_STREAM: &str = "depth";

/// Options controlling what [`Session::load`] decodes.
#[derive(Clone, Copy, Debug)]
pub struct LoadOptions {
    /// Decode environment probe cubemaps.
    pub load_cubemaps: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { load_cubemaps: true }
    }
}

/// All recorded streams of one capture, read-only after load.
#[derive(Clone, Debug)]
pub struct Session {
    pub project: Project,
    pub cameras: FrameStore<CameraSample>,
    pub depth: FrameStore<DepthSet>,
    pub lights: FrameStore<LightEstimation>,
    pub anchors: FrameListStore<AnchorRecord>,
    pub planes: FrameListStore<AnchorRecord>,
    pub probes: FrameListStore<AnchorRecord>,
}

impl Session {
    /// Session with `project` and empty stores.
    pub fn new(project: Project) -> Self {
        Self {
            project,
            cameras: FrameStore::new(CAMERA_STREAM),
            depth: FrameStore::new(DEPTH_STREAM),
            lights: FrameStore::new(LIGHT_STREAM),
            anchors: FrameListStore::new(ANCHOR_STREAM),
            planes: FrameListStore::new(PLANE_STREAM),
            probes: FrameListStore::new(PROBE_STREAM),
        }
    }

    /// Load every stream of the capture in `root`.
    ///
    /// Any parse failure, duplicate single-valued record or malformed binary
    /// aborts the load.
    #[tracing::instrument(skip_all, fields(root = %root.display()))]
    pub fn load(root: &Path, options: &LoadOptions) -> Result<Self> {
        let project = load_project(root)?;
        let cameras = load_cameras(root, &project)?;
        let depth = load_depth_sets(root, project.number_of_frames)?;
        let anchors = load_anchors(root)?;
        let planes = load_planes(root)?;
        let probes = load_probes(root, options.load_cubemaps)?;
        let lights = load_light_estimations(root)?;

        let session = Self {
            project,
            cameras,
            depth,
            lights,
            anchors,
            planes,
            probes,
        };
        info!(
            "Session loaded: {} frames, {} cameras, {} depth sets, {} anchors, {} planes, {} probes, {} light estimates",
            session.project.number_of_frames,
            session.cameras.len(),
            session.depth.len(),
            session.anchors.len(),
            session.planes.len(),
            session.probes.len(),
            session.lights.len()
        );
        Ok(session)
    }

    /// Load with default options.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::load(root.as_ref(), &LoadOptions::default())
    }
}

/// Read depth, smoothed depth and confidence for one frame directory.
pub fn load_depth_set(frame_dir: &Path) -> Result<DepthSet> {
    Ok(DepthSet {
        depth: read_depth(frame_dir.join(DEPTH_FILE))?,
        smooth_depth: read_depth(frame_dir.join(SMOOTH_DEPTH_FILE))?,
        confidence: read_confidence(frame_dir.join(CONFIDENCE_FILE))?,
    })
}

/// Load depth sets for frames `0..num_frames`; frames with no files get no entry.
pub fn load_depth_sets(root: &Path, num_frames: u32) -> Result<FrameStore<DepthSet>> {
    let sets = (0..num_frames)
        .into_par_iter()
        .map(|frame| load_depth_set(&root.join(frame.to_string())).map(|set| (frame, set)))
        .collect::<Result<Vec<(FrameIndex, DepthSet)>>>()?;

    let mut store = FrameStore::new(DEPTH_STREAM);
    for (frame, set) in sets {
        if !set.is_empty() {
            store.insert(frame, set)?;
        }
    }
    debug!("Loaded {} of {} depth sets", store.len(), num_frames);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::write_raw;
    use crate::util::{ConfidenceImage, DepthImage};
    use std::fs;

    #[test]
    fn test_depth_sets_skip_empty_frames() {
        let dir = tempfile::tempdir().unwrap();
        let f0 = dir.path().join("0");
        let f2 = dir.path().join("2");
        fs::create_dir_all(&f0).unwrap();
        fs::create_dir_all(&f2).unwrap();
        write_raw(f0.join(DEPTH_FILE), &DepthImage::new(4, 2)).unwrap();
        write_raw(f2.join(CONFIDENCE_FILE), &ConfidenceImage::new(4, 2)).unwrap();

        let store = load_depth_sets(dir.path(), 3).unwrap();
        assert_eq!(store.indices().collect::<Vec<_>>(), vec![0, 2]);
        let set0 = store.get(0).unwrap();
        assert!(set0.depth.is_some());
        assert!(set0.smooth_depth.is_none());
        let set2 = store.get(2).unwrap();
        assert!(set2.depth.is_none());
        assert!(set2.confidence.is_some());
    }

    #[test]
    fn test_depth_truncated_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let f0 = dir.path().join("0");
        fs::create_dir_all(&f0).unwrap();
        fs::write(f0.join(DEPTH_FILE), [4u8, 0, 0, 0, 2, 0, 0, 0, 1, 2]).unwrap();
        assert!(load_depth_sets(dir.path(), 1).is_err());
    }
}
