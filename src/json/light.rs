//! `lightestimation.json` parser.

use std::path::Path;

use serde::Deserialize;

use super::{from_str, read_session_file};
use crate::core::LightEstimation;
use crate::raw::LIGHT_ESTIMATION_FILE;
use crate::store::FrameStore;
use crate::util::{FrameIndex, Result};

pub const LIGHT_STREAM: &str = "light estimation";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LightJson {
    ambient_intensity: f32,
    ambient_color_temperature: f32,
    frame: FrameIndex,
}

/// Parse light estimates; one per frame.
pub fn parse_light_estimations(text: &str, path: &Path) -> Result<FrameStore<LightEstimation>> {
    let records: Vec<LightJson> = from_str(text, path)?;
    let mut store = FrameStore::new(LIGHT_STREAM);
    for r in records {
        store.insert(
            r.frame,
            LightEstimation {
                ambient_intensity: r.ambient_intensity,
                ambient_color_temperature: r.ambient_color_temperature,
            },
        )?;
    }
    Ok(store)
}

/// Load `lightestimation.json` from a capture directory.
pub fn load_light_estimations(root: &Path) -> Result<FrameStore<LightEstimation>> {
    let path = root.join(LIGHT_ESTIMATION_FILE);
    parse_light_estimations(&read_session_file(&path)?, &path)
}
