//! Synthetic capture directories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use half::f16;
use serde_json::{json, Value};
use tempfile::TempDir;

use artrack::raw::{cubemap_face_file, write_raw, CONFIDENCE_FILE, DEPTH_FILE, SMOOTH_DEPTH_FILE};
use artrack::util::{ConfidenceImage, DepthImage, FaceImage};

pub const COLOR: (u32, u32) = (8, 4);
pub const DEPTH: (u32, u32) = (4, 2);

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

fn translation(x: f32, y: f32, z: f32) -> Vec<f32> {
    let mut m = IDENTITY.to_vec();
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

/// Writes a capture directory stream by stream.
pub struct CaptureBuilder {
    dir: TempDir,
    frames: u32,
    cameras: Vec<Value>,
    anchors: Vec<Value>,
    planes: Vec<Value>,
    probes: Vec<Value>,
    lights: Vec<Value>,
}

impl CaptureBuilder {
    pub fn new(frames: u32) -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            frames,
            cameras: Vec::new(),
            anchors: Vec::new(),
            planes: Vec::new(),
            probes: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn frame_dir(&self, frame: u32) -> std::path::PathBuf {
        let dir = self.dir.path().join(frame.to_string());
        fs::create_dir_all(&dir).expect("frame dir");
        dir
    }

    pub fn camera(mut self, frame: u32, orientation: i64) -> Self {
        self.cameras.push(json!({
            "orientation": orientation,
            "viewMatrix": IDENTITY,
            "projectionMatrix": IDENTITY,
            "transform": translation(0.0, 1.5, 0.0),
            "intrinsics": [10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 4.0, 2.0, 1.0],
            "frame": frame,
        }));
        self
    }

    /// Depth image whose values encode their native `(x, y)`.
    pub fn depth(self, frame: u32) -> Self {
        let (w, h) = DEPTH;
        let pixels = (0..h).flat_map(|y| (0..w).map(move |x| (y * 10 + x) as f32)).collect();
        let img = DepthImage::from_pixels(w, h, pixels).expect("depth image");
        write_raw(self.frame_dir(frame).join(DEPTH_FILE), &img).expect("write depth");
        self
    }

    pub fn smooth_depth(self, frame: u32) -> Self {
        let img = DepthImage::new(DEPTH.0, DEPTH.1);
        write_raw(self.frame_dir(frame).join(SMOOTH_DEPTH_FILE), &img).expect("write smooth depth");
        self
    }

    pub fn confidence(self, frame: u32) -> Self {
        let img = ConfidenceImage::new(DEPTH.0, DEPTH.1);
        write_raw(self.frame_dir(frame).join(CONFIDENCE_FILE), &img).expect("write confidence");
        self
    }

    /// Raw bytes for a frame's depth file, for malformed-input tests.
    pub fn depth_bytes(self, frame: u32, bytes: &[u8]) -> Self {
        fs::write(self.frame_dir(frame).join(DEPTH_FILE), bytes).expect("write depth bytes");
        self
    }

    pub fn anchor(mut self, frame: u32, id: &str, status: &str) -> Self {
        self.anchors.push(json!({
            "name": id,
            "identifier": id,
            "transform": translation(frame as f32, 0.0, 0.0),
            "status": status,
            "frame": frame,
        }));
        self
    }

    pub fn plane(mut self, frame: u32, id: &str, status: &str) -> Self {
        self.planes.push(json!({
            "name": id,
            "identifier": id,
            "transform": IDENTITY,
            "status": status,
            "classification": "floor",
            "alignment": 0,
            "center": [0.0, 0.0, 0.0],
            "extent": [1.0, 0.0, 1.0],
            "frame": frame,
        }));
        self
    }

    /// Probe record plus, if `faces > 0`, that many 2x2 cubemap faces.
    pub fn probe(mut self, frame: u32, id: &str, status: &str, faces: usize) -> Self {
        self.probes.push(json!({
            "name": id,
            "identifier": id,
            "transform": IDENTITY,
            "extent": [1.0, 1.0, 1.0],
            "status": status,
            "frame": frame,
        }));
        if faces > 0 {
            let dir = self.frame_dir(frame).join(id);
            fs::create_dir_all(&dir).expect("probe dir");
            let face = FaceImage::from_pixels(2, 2, vec![[f16::from_f32(0.5); 4]; 4]).expect("face");
            for i in 0..faces {
                write_raw(dir.join(cubemap_face_file(i)), &face).expect("write face");
            }
        }
        self
    }

    pub fn light(mut self, frame: u32) -> Self {
        self.lights.push(json!({
            "ambientIntensity": 1000.0,
            "ambientColorTemperature": 6500.0,
            "frame": frame,
        }));
        self
    }

    /// Write the JSON side channels and return the directory.
    pub fn build(self) -> TempDir {
        let root = self.dir.path();
        let project = json!({
            "name": "synthetic",
            "description": "integration test capture",
            "creationDate": "700000000.5",
            "numberOfFrames": self.frames.to_string(),
            "colorSize": [COLOR.0, COLOR.1],
            "depthSize": [DEPTH.0, DEPTH.1],
            "viewportSize": [COLOR.1, COLOR.0],
            "modelName": "TestDevice1,1",
        });
        write_json(root, "project.json", &project);
        write_json(root, "camera.json", &Value::Array(self.cameras));
        write_json(root, "anchor.json", &Value::Array(self.anchors));
        write_json(root, "plane_anchor.json", &Value::Array(self.planes));
        write_json(root, "env_probe.json", &Value::Array(self.probes));
        write_json(root, "lightestimation.json", &Value::Array(self.lights));
        self.dir
    }
}

fn write_json(root: &Path, name: &str, value: &Value) {
    let text = serde_json::to_string_pretty(value).expect("serialize");
    fs::write(root.join(name), text).expect("write json");
}
