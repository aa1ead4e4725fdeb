//! Tracker state.
//!
//! The registry owns every tracker by name. Runtime layers read it freely but
//! mutate it exclusively through [`crate::engine::TrackerEngine`].

mod timeline;
mod tracker;

pub use timeline::{EffortSegment, Observation, ObservationKey, ObservationTimeline};
pub use tracker::{StatRun, Tracker, TrackerSpec};

use std::collections::BTreeMap;

/// Every tracker a document has registered, plus the command nonce.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerRegistry {
    trackers: BTreeMap<String, Tracker>,
    /// Number of commands applied so far.
    pub nonce: u64,
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Tracker> {
        self.trackers.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tracker> {
        self.trackers.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trackers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.trackers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tracker> {
        self.trackers.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tracker> {
        self.trackers.values_mut()
    }

    pub(crate) fn insert(&mut self, tracker: Tracker) {
        self.trackers.insert(tracker.spec.name.clone(), tracker);
    }
}
