//! Anchor side channels: `anchor.json`, `plane_anchor.json`, `env_probe.json`.
//!
//! All three are list-valued: a frame may carry any number of records, kept
//! in file order. Probe cubemaps are decoded from the frame directories while
//! loading.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use super::{from_str, read_session_file};
use crate::core::{AnchorKind, AnchorRecord, AnchorStatus, PlaneGeometry, ProbeData};
use crate::raw::{load_probe_cubemap, ANCHOR_FILE, ENV_PROBE_FILE, PLANE_ANCHOR_FILE};
use crate::store::FrameListStore;
use crate::util::{mat4_from_column_major, vec3_from_slice, vec4_from_slice, FrameIndex, Result};

pub const ANCHOR_STREAM: &str = "anchor";
pub const PLANE_STREAM: &str = "plane anchor";
pub const PROBE_STREAM: &str = "environment probe";

#[derive(Debug, Deserialize)]
struct AnchorJson {
    #[serde(default)]
    name: String,
    identifier: String,
    transform: Vec<f32>,
    status: String,
    frame: FrameIndex,
}

#[derive(Debug, Deserialize)]
struct PlaneJson {
    #[serde(default)]
    name: String,
    identifier: String,
    transform: Vec<f32>,
    status: String,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    alignment: i32,
    center: Vec<f32>,
    extent: Vec<f32>,
    frame: FrameIndex,
}

#[derive(Debug, Deserialize)]
struct ProbeJson {
    #[serde(default)]
    name: String,
    identifier: String,
    transform: Vec<f32>,
    extent: Vec<f32>,
    status: String,
    frame: FrameIndex,
}

fn record(name: String, identifier: String, transform: &[f32], status: &str, kind: AnchorKind) -> Result<AnchorRecord> {
    Ok(AnchorRecord {
        identifier,
        name,
        transform: mat4_from_column_major(transform)?,
        status: status.parse::<AnchorStatus>()?,
        kind,
    })
}

/// Parse world-position anchors.
pub fn parse_anchors(text: &str, path: &Path) -> Result<FrameListStore<AnchorRecord>> {
    let records: Vec<AnchorJson> = from_str(text, path)?;
    let mut store = FrameListStore::new(ANCHOR_STREAM);
    for r in records {
        let anchor = record(r.name, r.identifier, &r.transform, &r.status, AnchorKind::WorldPosition)?;
        store.push(r.frame, anchor);
    }
    Ok(store)
}

/// Parse plane anchors; center and extent keep x, y, z with `w = 0`.
pub fn parse_planes(text: &str, path: &Path) -> Result<FrameListStore<AnchorRecord>> {
    let records: Vec<PlaneJson> = from_str(text, path)?;
    let mut store = FrameListStore::new(PLANE_STREAM);
    for r in records {
        let geometry = PlaneGeometry {
            classification: r.classification,
            alignment: r.alignment,
            center: vec4_from_slice(&r.center)?,
            extent: vec4_from_slice(&r.extent)?,
        };
        let plane = record(r.name, r.identifier, &r.transform, &r.status, AnchorKind::Plane(geometry))?;
        store.push(r.frame, plane);
    }
    Ok(store)
}

/// Parse environment probes without touching their cubemaps.
pub fn parse_probes(text: &str, path: &Path) -> Result<FrameListStore<AnchorRecord>> {
    let mut store = FrameListStore::new(PROBE_STREAM);
    for (frame, probe) in parse_probe_records(text, path)? {
        store.push(frame, probe);
    }
    Ok(store)
}

fn parse_probe_records(text: &str, path: &Path) -> Result<Vec<(FrameIndex, AnchorRecord)>> {
    let records: Vec<ProbeJson> = from_str(text, path)?;
    records
        .into_iter()
        .map(|r| {
            let data = ProbeData {
                extent: vec3_from_slice(&r.extent)?,
                texture: None,
            };
            let probe = record(r.name, r.identifier, &r.transform, &r.status, AnchorKind::Probe(data))?;
            Ok((r.frame, probe))
        })
        .collect()
}

/// Load `anchor.json` from a capture directory.
pub fn load_anchors(root: &Path) -> Result<FrameListStore<AnchorRecord>> {
    let path = root.join(ANCHOR_FILE);
    parse_anchors(&read_session_file(&path)?, &path)
}

/// Load `plane_anchor.json` from a capture directory.
pub fn load_planes(root: &Path) -> Result<FrameListStore<AnchorRecord>> {
    let path = root.join(PLANE_ANCHOR_FILE);
    parse_planes(&read_session_file(&path)?, &path)
}

/// Load `env_probe.json` and, if `with_cubemaps`, each probe's cubemap.
///
/// Cubemaps decode in parallel; records are stored in file order.
pub fn load_probes(root: &Path, with_cubemaps: bool) -> Result<FrameListStore<AnchorRecord>> {
    let path = root.join(ENV_PROBE_FILE);
    let mut records = parse_probe_records(&read_session_file(&path)?, &path)?;

    if with_cubemaps {
        let textures = records
            .par_iter()
            .map(|(frame, probe)| load_probe_cubemap(&root.join(frame.to_string()), &probe.identifier))
            .collect::<Result<Vec<_>>>()?;

        let mut loaded = 0usize;
        for ((_, probe), texture) in records.iter_mut().zip(textures) {
            if let (AnchorKind::Probe(data), Some(cube)) = (&mut probe.kind, texture) {
                data.texture = Some(Arc::new(cube));
                loaded += 1;
            }
        }
        debug!("Loaded {} of {} probe cubemaps", loaded, records.len());
    }

    let mut store = FrameListStore::new(PROBE_STREAM);
    for (frame, probe) in records {
        store.push(frame, probe);
    }
    Ok(store)
}
