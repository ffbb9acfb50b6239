//! `camera.json` parser.

use std::path::Path;

use serde::Deserialize;

use super::{from_str, read_session_file};
use crate::core::{CameraSample, Orientation, Project};
use crate::raw::CAMERA_FILE;
use crate::store::FrameStore;
use crate::util::{mat4_from_column_major, FrameIndex, Intrinsics, Result};

/// Stream name used in errors and logs.
pub const CAMERA_STREAM: &str = "camera";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CameraJson {
    orientation: i64,
    view_matrix: Vec<f32>,
    projection_matrix: Vec<f32>,
    transform: Vec<f32>,
    intrinsics: Vec<f32>,
    frame: FrameIndex,
}

impl CameraJson {
    fn into_sample(self, project: &Project) -> Result<CameraSample> {
        let orientation = Orientation::try_from_i64(self.orientation)?;
        let intrinsics = Intrinsics::from_matrix(&mat4_from_column_major(&self.intrinsics)?);
        Ok(CameraSample::new(
            mat4_from_column_major(&self.transform)?,
            mat4_from_column_major(&self.view_matrix)?,
            mat4_from_column_major(&self.projection_matrix)?,
            intrinsics,
            orientation,
            project.color_size,
            project.depth_size,
        ))
    }
}

/// Parse camera samples, remapping intrinsics with the project's image sizes.
pub fn parse_cameras(text: &str, path: &Path, project: &Project) -> Result<FrameStore<CameraSample>> {
    let records: Vec<CameraJson> = from_str(text, path)?;
    let mut store = FrameStore::new(CAMERA_STREAM);
    for record in records {
        let frame = record.frame;
        store.insert(frame, record.into_sample(project)?)?;
    }
    Ok(store)
}

/// Load `camera.json` from a capture directory.
pub fn load_cameras(root: &Path, project: &Project) -> Result<FrameStore<CameraSample>> {
    let path = root.join(CAMERA_FILE);
    parse_cameras(&read_session_file(&path)?, &path, project)
}
