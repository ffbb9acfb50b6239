//! Integration tests for loading capture directories.

mod common;

use std::fs;

use artrack::core::{AnchorStatus, AnchorType, Orientation};
use artrack::store::{LoadOptions, Session};
use artrack::util::{Error, UVec2};
use common::{CaptureBuilder, COLOR, DEPTH};

#[test]
fn test_load_full_session() {
    let dir = CaptureBuilder::new(3)
        .camera(0, 3)
        .camera(1, 1)
        .camera(2, 4)
        .depth(0)
        .smooth_depth(0)
        .confidence(0)
        .depth(2)
        .anchor(0, "X", "Add")
        .plane(1, "P", "Add")
        .probe(1, "probe", "Add", 6)
        .light(0)
        .light(2)
        .build();

    let session = Session::open(dir.path()).expect("load");
    let p = &session.project;
    assert_eq!(p.name, "synthetic");
    assert_eq!(p.number_of_frames, 3);
    assert_eq!(p.color_size, UVec2::new(COLOR.0, COLOR.1));
    assert_eq!(p.depth_size, UVec2::new(DEPTH.0, DEPTH.1));
    assert_eq!(p.last_frame(), Some(2));
    assert!(p.created_at().is_some());

    assert_eq!(session.cameras.len(), 3);
    assert_eq!(session.cameras.get(1).unwrap().orientation, Orientation::Portrait);
    assert_eq!(session.depth.indices().collect::<Vec<_>>(), vec![0, 2]);
    let set0 = session.depth.get(0).unwrap();
    assert!(set0.depth.is_some() && set0.smooth_depth.is_some() && set0.confidence.is_some());
    assert!(session.depth.get(2).unwrap().smooth_depth.is_none());
    assert_eq!(session.lights.len(), 2);

    assert_eq!(session.anchors.get(0)[0].status, AnchorStatus::Add);
    assert_eq!(session.planes.get(1)[0].anchor_type(), AnchorType::Plane);
    let probe = session.probes.get(1)[0].as_probe().unwrap();
    let cube = probe.texture.as_ref().expect("cubemap loaded");
    assert_eq!(cube.size(), 2);
    assert_eq!(cube.mip_count(), 2);
    // 0.5^(1/2.2)
    let v = cube.face(0, 0).unwrap().get(0, 0).unwrap()[0].to_f32();
    assert!((v - 0.7297).abs() < 1e-3, "gamma-decoded value {}", v);
}

#[test]
fn test_skip_cubemaps() {
    let dir = CaptureBuilder::new(1).camera(0, 3).probe(0, "probe", "Add", 6).build();
    let session = Session::load(dir.path(), &LoadOptions { load_cubemaps: false }).unwrap();
    assert!(session.probes.get(0)[0].as_probe().unwrap().texture.is_none());
}

#[test]
fn test_duplicate_camera_fails_load() {
    let dir = CaptureBuilder::new(2).camera(0, 3).camera(1, 3).camera(1, 1).build();
    match Session::open(dir.path()) {
        Err(Error::DuplicateFrame { stream, frame }) => {
            assert_eq!(stream, "camera");
            assert_eq!(frame, 1);
        }
        other => panic!("expected DuplicateFrame, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_side_channel() {
    let dir = CaptureBuilder::new(1).camera(0, 3).build();
    fs::remove_file(dir.path().join("lightestimation.json")).unwrap();
    assert!(matches!(Session::open(dir.path()), Err(Error::FileNotFound(_))));
}

#[test]
fn test_unknown_status_fails_load() {
    let dir = CaptureBuilder::new(1).camera(0, 3).anchor(0, "X", "Delete").build();
    assert!(matches!(Session::open(dir.path()), Err(Error::UnknownStatus(_))));
}

#[test]
fn test_truncated_depth_fails_load() {
    // header says 4x2 f32 = 32 bytes, only 4 follow
    let dir = CaptureBuilder::new(1)
        .camera(0, 3)
        .depth_bytes(0, &[4, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0])
        .build();
    match Session::open(dir.path()) {
        Err(Error::TruncatedPayload { expected, actual, .. }) => {
            assert_eq!((expected, actual), (32, 4));
        }
        other => panic!("expected TruncatedPayload, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_partial_cubemap_fails_load() {
    let dir = CaptureBuilder::new(1).camera(0, 3).probe(0, "probe", "Add", 4).build();
    assert!(matches!(
        Session::open(dir.path()),
        Err(Error::MissingCubemapFace { face: 4, .. })
    ));
}
