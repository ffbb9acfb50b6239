//! `project.json` parser.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::{from_str, lenient_f64, lenient_u32, read_session_file};
use crate::core::Project;
use crate::raw::PROJECT_FILE;
use crate::util::{size_from_slice, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectJson {
    #[serde(alias = "Name", default)]
    name: String,
    #[serde(alias = "Description", default)]
    description: String,
    #[serde(alias = "CreationDate", deserialize_with = "lenient_f64")]
    creation_date: f64,
    #[serde(alias = "NumberOfFrames", deserialize_with = "lenient_u32")]
    number_of_frames: u32,
    #[serde(alias = "ColorSize")]
    color_size: Vec<i32>,
    #[serde(alias = "DepthSize")]
    depth_size: Vec<i32>,
    #[serde(alias = "ViewportSize")]
    viewport_size: Vec<i32>,
    #[serde(alias = "ModelName", default)]
    model_name: String,
}

/// Parse project metadata from JSON text.
pub fn parse_project(text: &str, path: &Path) -> Result<Project> {
    let raw: ProjectJson = from_str(text, path)?;
    let project = Project {
        name: raw.name,
        description: raw.description,
        creation_date: raw.creation_date,
        number_of_frames: raw.number_of_frames,
        color_size: size_from_slice(&raw.color_size)?,
        depth_size: size_from_slice(&raw.depth_size)?,
        viewport_size: size_from_slice(&raw.viewport_size)?,
        model_name: raw.model_name,
    };
    project.validate()?;
    Ok(project)
}

/// Load `project.json` from a capture directory.
pub fn load_project(root: &Path) -> Result<Project> {
    let path = root.join(PROJECT_FILE);
    let project = parse_project(&read_session_file(&path)?, &path)?;
    info!(
        "Loaded project {:?} with {} frames ({})",
        project.name, project.number_of_frames, project.model_name
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{Error, UVec2};

    const SAMPLE: &str = r#"{
        "name": "living room",
        "description": "walkaround",
        "creationDate": "694224000.25",
        "numberOfFrames": "120",
        "colorSize": [1920, 1440],
        "depthSize": [256, 192],
        "viewportSize": [390, 844],
        "modelName": "iPhone13,4"
    }"#;

    #[test]
    fn test_parse_project() {
        let p = parse_project(SAMPLE, Path::new(PROJECT_FILE)).unwrap();
        assert_eq!(p.name, "living room");
        assert_eq!(p.number_of_frames, 120);
        assert_eq!(p.creation_date, 694224000.25);
        assert_eq!(p.color_size, UVec2::new(1920, 1440));
        assert_eq!(p.depth_size, UVec2::new(256, 192));
        assert_eq!(p.viewport_size, UVec2::new(390, 844));
        assert_eq!(p.model_name, "iPhone13,4");
    }

    #[test]
    fn test_parse_pascal_case() {
        let text = r#"{"Name": "x", "CreationDate": 1, "NumberOfFrames": 2,
            "ColorSize": [4, 2], "DepthSize": [4, 2], "ViewportSize": [2, 4]}"#;
        let p = parse_project(text, Path::new(PROJECT_FILE)).unwrap();
        assert_eq!(p.name, "x");
        assert_eq!(p.number_of_frames, 2);
    }

    #[test]
    fn test_bad_size() {
        let text = SAMPLE.replace("[256, 192]", "[256]");
        assert!(matches!(
            parse_project(&text, Path::new(PROJECT_FILE)),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_project("{", Path::new(PROJECT_FILE)),
            Err(Error::Json { .. })
        ));
    }
}
