//! Reference anchor lifecycle collaborator.
//!
//! Applies `Add` / `Update` / `Remove` events to an identifier-keyed map:
//!
//! - `Add(id)` drops whatever is tracked under `id` and starts fresh.
//! - `Update(id)` mutates in place, or acts as `Add` if `id` is unknown.
//! - `Remove(id)` drops `id` if tracked; otherwise nothing happens.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::AnchorEvent;
use crate::core::{AnchorRecord, AnchorStatus, AnchorType};
use crate::util::{FrameIndex, Mat4, Vec3};

/// What applying one event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleOutcome {
    /// `Add` for an unknown id.
    Created,
    /// `Add` for a tracked id; previous state discarded.
    Replaced,
    /// `Update` for a tracked id.
    Updated,
    /// `Update` for an unknown id, handled as `Add`.
    Promoted,
    /// `Remove` for a tracked id.
    Removed,
    /// `Remove` for an unknown id, or a filtered-out anchor type.
    Ignored,
}

/// State kept per live entity.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedAnchor {
    /// Latest record, with the registry's height offset applied.
    pub record: AnchorRecord,
    /// Frame the current incarnation was created at.
    pub created_at: FrameIndex,
    /// Frame of the latest event.
    pub updated_at: FrameIndex,
    /// Updates applied since creation.
    pub revision: u32,
}

/// Live anchors keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct AnchorRegistry {
    anchors: HashMap<String, TrackedAnchor>,
    filter: Option<AnchorType>,
    height_offset: f32,
}

/// Registry shared between the driver's subscriber and its readers.
pub type SharedRegistry = Arc<Mutex<AnchorRegistry>>;

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that only tracks anchors of `anchor_type`.
    pub fn for_type(anchor_type: AnchorType) -> Self {
        Self {
            filter: Some(anchor_type),
            ..Self::default()
        }
    }

    /// Raise every tracked pose by `offset` along the anchor's own Y axis.
    pub fn with_height_offset(mut self, offset: f32) -> Self {
        self.height_offset = offset;
        self
    }

    /// Wrap in a [`SharedRegistry`].
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    /// Apply one lifecycle event.
    pub fn apply(&mut self, event: &AnchorEvent<'_>) -> LifecycleOutcome {
        let record = event.record;
        if self.filter.is_some_and(|t| t != record.anchor_type()) {
            return LifecycleOutcome::Ignored;
        }

        let outcome = match record.status {
            AnchorStatus::Add => {
                let replaced = self.anchors.remove(&record.identifier).is_some();
                self.create(event);
                if replaced {
                    LifecycleOutcome::Replaced
                } else {
                    LifecycleOutcome::Created
                }
            }
            AnchorStatus::Update => {
                let placed = self.place(record);
                match self.anchors.get_mut(&record.identifier) {
                    Some(tracked) => {
                        tracked.record = placed;
                        tracked.updated_at = event.frame;
                        tracked.revision += 1;
                        LifecycleOutcome::Updated
                    }
                    None => {
                        self.create(event);
                        LifecycleOutcome::Promoted
                    }
                }
            }
            AnchorStatus::Remove => match self.anchors.remove(&record.identifier) {
                Some(_) => LifecycleOutcome::Removed,
                None => LifecycleOutcome::Ignored,
            },
        };
        trace!(
            "{} {} {:?} at frame {}: {:?}",
            record.anchor_type().name(),
            record.identifier,
            record.status,
            event.frame,
            outcome
        );
        outcome
    }

    fn create(&mut self, event: &AnchorEvent<'_>) {
        let mut record = self.place(event.record);
        record.status = AnchorStatus::Add;
        self.anchors.insert(
            record.identifier.clone(),
            TrackedAnchor {
                record,
                created_at: event.frame,
                updated_at: event.frame,
                revision: 0,
            },
        );
    }

    fn place(&self, record: &AnchorRecord) -> AnchorRecord {
        let mut placed = record.clone();
        if self.height_offset != 0.0 {
            placed.transform *= Mat4::from_translation(Vec3::Y * self.height_offset);
        }
        placed
    }

    pub fn get(&self, identifier: &str) -> Option<&TrackedAnchor> {
        self.anchors.get(identifier)
    }

    #[inline]
    pub fn contains(&self, identifier: &str) -> bool {
        self.anchors.contains_key(identifier)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Live identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.anchors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedAnchor> {
        self.anchors.values()
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}
