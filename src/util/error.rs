//! Error types for capture loading and playback.

use std::path::PathBuf;
use thiserror::Error;

use super::FrameIndex;

/// Main error type for artrack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Required session file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Raw file is shorter than its 8-byte header
    #[error("Truncated raw header in {path}: {len} bytes")]
    TruncatedHeader { path: PathBuf, len: usize },

    /// Raw header declares a negative dimension
    #[error("Invalid raw header in {path}: {width}x{height}")]
    InvalidHeader { path: PathBuf, width: i32, height: i32 },

    /// Raw payload is shorter than the header promises
    #[error("Truncated payload in {path}: expected {expected} bytes, got {actual}")]
    TruncatedPayload {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Cubemap has its first face but is missing a later one
    #[error("Cubemap face {face} missing: {path}")]
    MissingCubemapFace { path: PathBuf, face: usize },

    /// Cubemap faces are not square or differ in size
    #[error("Invalid cubemap: {0}")]
    InvalidCubemap(String),

    /// JSON side-channel file could not be decoded
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two records of a single-valued stream share a frame index
    #[error("Duplicate {stream} record for frame {frame}")]
    DuplicateFrame { stream: &'static str, frame: FrameIndex },

    /// Lifecycle status string is not Add/Update/Remove
    #[error("Unknown anchor status: {0:?}")]
    UnknownStatus(String),

    /// Record field has the wrong shape or an out-of-range value
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Session is unusable for playback
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Aggregate frame is missing required modalities
    #[error("Invalid frame {frame}: missing {}", missing.join(", "))]
    InvalidFrame {
        frame: FrameIndex,
        missing: Vec<&'static str>,
    },

    /// Driver operation called in the wrong state
    #[error("Invalid playback state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// External video decoder failure
    #[error("Decoder error: {0}")]
    Decoder(String),

    /// Configuration could not be read or is inconsistent
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid record error.
    pub fn record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create a decoder error.
    pub fn decoder(msg: impl Into<String>) -> Self {
        Self::Decoder(msg.into())
    }

    /// Wrap a JSON error with the file it came from.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised while loading a session (as opposed to playback).
    pub fn is_load_error(&self) -> bool {
        !matches!(
            self,
            Self::InvalidFrame { .. } | Self::InvalidState { .. } | Self::Decoder(_)
        )
    }
}

/// Result type alias for artrack operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::DuplicateFrame { stream: "camera", frame: 7 };
        assert!(e.to_string().contains("camera"));
        assert!(e.to_string().contains('7'));

        let e = Error::InvalidFrame { frame: 1, missing: vec!["depth", "camera"] };
        assert_eq!(e.to_string(), "Invalid frame 1: missing depth, camera");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_playback_errors_are_not_load_errors() {
        assert!(!Error::decoder("eof").is_load_error());
        assert!(!Error::InvalidFrame { frame: 0, missing: vec![] }.is_load_error());
    }
}
