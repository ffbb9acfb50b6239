//! Playback configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::LoadOptions;
use crate::transform::{Backend, Pipeline};
use crate::util::{Error, Result, UVec2};

/// What the driver does with a frame missing color, depth or camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidFramePolicy {
    /// Fail the step with `Error::InvalidFrame` and finish playback.
    #[default]
    Halt,
    /// Warn, skip the frame emission, still dispatch anchors.
    Skip,
    /// Deliver the incomplete frame to subscribers.
    Emit,
}

/// Playback settings, read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub invalid_frame_policy: InvalidFramePolicy,
    /// Orientation kernel work-group size `[x, y]`.
    pub work_group_size: [u32; 2],
    /// Use the rayon transform backend.
    pub parallel_transform: bool,
    /// Call finish subscribers when the last frame is reached.
    pub notify_finish: bool,
    /// Decode environment probe cubemaps at load.
    pub load_cubemaps: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            invalid_frame_policy: InvalidFramePolicy::Halt,
            work_group_size: [8, 8],
            parallel_transform: false,
            notify_finish: true,
            load_cubemaps: true,
        }
    }
}

impl PlaybackConfig {
    /// Per-user config file: `<config dir>/artrack/playback.json`.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("artrack");
            p.push("playback.json");
            p
        })
    }

    /// Read the per-user config, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read a config file; missing keys take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!("Loaded playback config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.work_group_size.contains(&0) {
            return Err(Error::Config(format!(
                "work_group_size must be non-zero, got {:?}",
                self.work_group_size
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn group_size(&self) -> UVec2 {
        UVec2::from_array(self.work_group_size)
    }

    /// Transform pipeline for these settings.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(Backend::select(self.parallel_transform), self.group_size())
    }

    /// Session load options for these settings.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            load_cubemaps: self.load_cubemaps,
        }
    }
}
