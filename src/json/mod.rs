//! JSON side-channel parsers.
//!
//! Each capture session stores its non-image streams as whole-session JSON
//! files. Every record carries its own `frame` field; records are keyed by
//! that field, never by array position.
//!
//! - [`project`] - `project.json`, session metadata
//! - [`camera`] - `camera.json`, one camera sample per frame
//! - [`anchor`] - `anchor.json`, `plane_anchor.json`, `env_probe.json`
//! - [`light`] - `lightestimation.json`, one light estimate per frame

pub mod anchor;
pub mod camera;
pub mod light;
pub mod project;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::util::{Error, Result};

/// Read a required session file to a string.
pub(crate) fn read_session_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

/// Decode `text` as `T`, attributing failures to `path`.
pub(crate) fn from_str<T: DeserializeOwned>(text: &str, path: &Path) -> Result<T> {
    serde_json::from_str(text).map_err(|e| Error::json(path, e))
}

/// A number that older captures wrote as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Accept `12.5` or `"12.5"`.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Accept `12` or `"12"`.
pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        NumberOrString::Number(n) => Err(serde::de::Error::custom(format!("expected a frame count, got {}", n))),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
