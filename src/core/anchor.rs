//! Anchor records: persistent, identifier-keyed scene entities.
//!
//! World anchors, plane anchors and environment probes share identifier,
//! name, pose and lifecycle status; the variant-specific payload lives in
//! [`AnchorKind`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::raw::Cubemap;
use crate::util::{translation, Error, Mat4, Vec3, Vec4};

/// Lifecycle status carried by an anchor record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AnchorStatus {
    Add = 0,
    Remove = 1,
    Update = 2,
}

impl AnchorStatus {
    /// Returns the wire name of this status.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Update => "Update",
        }
    }
}

impl FromStr for AnchorStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Add" => Ok(Self::Add),
            "Remove" => Ok(Self::Remove),
            "Update" => Ok(Self::Update),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for AnchorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of [`AnchorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorType {
    WorldPosition,
    Plane,
    Probe,
}

impl AnchorType {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WorldPosition => "world",
            Self::Plane => "plane",
            Self::Probe => "probe",
        }
    }
}

/// Detected plane geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneGeometry {
    /// Semantic class ("floor", "wall", "table", ...).
    pub classification: String,
    /// Alignment code (0 = horizontal, 1 = vertical).
    pub alignment: i32,
    /// Center relative to the anchor transform.
    pub center: Vec4,
    /// Extent relative to the anchor transform.
    pub extent: Vec4,
}

/// Environment probe payload.
#[derive(Clone, Debug, Default)]
pub struct ProbeData {
    /// Box extent the probe covers.
    pub extent: Vec3,
    /// Environment texture captured at this frame, if any.
    pub texture: Option<Arc<Cubemap>>,
}

impl PartialEq for ProbeData {
    fn eq(&self, other: &Self) -> bool {
        let same_texture = match (&self.texture, &other.texture) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        };
        self.extent == other.extent && same_texture
    }
}

/// Variant-specific anchor payload.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorKind {
    WorldPosition,
    Plane(PlaneGeometry),
    Probe(ProbeData),
}

impl AnchorKind {
    #[inline]
    pub fn anchor_type(&self) -> AnchorType {
        match self {
            Self::WorldPosition => AnchorType::WorldPosition,
            Self::Plane(_) => AnchorType::Plane,
            Self::Probe(_) => AnchorType::Probe,
        }
    }
}

/// One anchor lifecycle record at one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorRecord {
    /// Stable identifier shared by every record of the same entity.
    pub identifier: String,
    /// Display name.
    pub name: String,
    /// Anchor-to-world pose.
    pub transform: Mat4,
    /// What happened to the entity at this frame.
    pub status: AnchorStatus,
    /// Variant payload.
    pub kind: AnchorKind,
}

impl AnchorRecord {
    /// Create a world-position anchor record.
    pub fn world(identifier: impl Into<String>, status: AnchorStatus, transform: Mat4) -> Self {
        Self {
            identifier: identifier.into(),
            name: String::new(),
            transform,
            status,
            kind: AnchorKind::WorldPosition,
        }
    }

    #[inline]
    pub fn anchor_type(&self) -> AnchorType {
        self.kind.anchor_type()
    }

    /// Plane payload, if this is a plane anchor.
    pub fn as_plane(&self) -> Option<&PlaneGeometry> {
        match &self.kind {
            AnchorKind::Plane(p) => Some(p),
            _ => None,
        }
    }

    /// Probe payload, if this is an environment probe.
    pub fn as_probe(&self) -> Option<&ProbeData> {
        match &self.kind {
            AnchorKind::Probe(p) => Some(p),
            _ => None,
        }
    }

    /// Anchor position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        translation(&self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Add".parse::<AnchorStatus>().unwrap(), AnchorStatus::Add);
        assert_eq!("Update".parse::<AnchorStatus>().unwrap(), AnchorStatus::Update);
        assert_eq!("Remove".parse::<AnchorStatus>().unwrap(), AnchorStatus::Remove);
        assert!(matches!(
            "add".parse::<AnchorStatus>(),
            Err(Error::UnknownStatus(s)) if s == "add"
        ));
    }

    #[test]
    fn test_kind_accessors() {
        let plane = AnchorRecord {
            kind: AnchorKind::Plane(PlaneGeometry {
                classification: "floor".into(),
                alignment: 0,
                center: Vec4::ZERO,
                extent: Vec4::ONE,
            }),
            ..AnchorRecord::world("p", AnchorStatus::Add, Mat4::IDENTITY)
        };
        assert_eq!(plane.anchor_type(), AnchorType::Plane);
        assert!(plane.as_plane().is_some());
        assert!(plane.as_probe().is_none());
    }
}
