//! Frame-indexed stores.
//!
//! Stores are filled once while a session loads and only read afterwards.

use std::collections::BTreeMap;

use crate::util::{Error, FrameIndex, Result};

/// At most one record per frame; a second insert at the same frame fails.
#[derive(Clone, Debug)]
pub struct FrameStore<T> {
    stream: &'static str,
    frames: BTreeMap<FrameIndex, T>,
}

impl<T> FrameStore<T> {
    /// Create an empty store; `stream` names it in errors and logs.
    pub fn new(stream: &'static str) -> Self {
        Self {
            stream,
            frames: BTreeMap::new(),
        }
    }

    /// Name of the stream this store holds.
    #[inline]
    pub fn stream(&self) -> &'static str {
        self.stream
    }

    /// Insert the record for `frame`, rejecting duplicates.
    pub fn insert(&mut self, frame: FrameIndex, value: T) -> Result<()> {
        use std::collections::btree_map::Entry;
        match self.frames.entry(frame) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(_) => Err(Error::DuplicateFrame {
                stream: self.stream,
                frame,
            }),
        }
    }

    /// Record at `frame`, if any.
    #[inline]
    pub fn get(&self, frame: FrameIndex) -> Option<&T> {
        self.frames.get(&frame)
    }

    #[inline]
    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.frames.contains_key(&frame)
    }

    /// Number of frames with a record.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.frames.keys().copied()
    }

    /// `(frame, record)` pairs in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &T)> {
        self.frames.iter().map(|(k, v)| (*k, v))
    }
}

/// Any number of records per frame, kept in insertion order.
#[derive(Clone, Debug)]
pub struct FrameListStore<T> {
    stream: &'static str,
    frames: BTreeMap<FrameIndex, Vec<T>>,
    count: usize,
}

impl<T> FrameListStore<T> {
    /// Create an empty store; `stream` names it in logs.
    pub fn new(stream: &'static str) -> Self {
        Self {
            stream,
            frames: BTreeMap::new(),
            count: 0,
        }
    }

    #[inline]
    pub fn stream(&self) -> &'static str {
        self.stream
    }

    /// Append a record to `frame`.
    pub fn push(&mut self, frame: FrameIndex, value: T) {
        self.frames.entry(frame).or_default().push(value);
        self.count += 1;
    }

    /// Records at `frame` in insertion order; empty if none.
    #[inline]
    pub fn get(&self, frame: FrameIndex) -> &[T] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of frames with at least one record.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Total number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `(frame, records)` pairs in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &[T])> {
        self.frames.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
