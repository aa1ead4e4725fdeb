//! Observation timeline and effort segments.

use crate::stats::{Stat, StatLine};

/// A contiguous level range sharing one effort schedule.
///
/// `effort` holds the effort (or award) values accrued when the segment
/// opens; observations recorded while the segment is current are evaluated
/// against them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffortSegment {
    pub start_level: u32,
    pub effort: StatLine<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub friendship: u32,
}

impl EffortSegment {
    pub fn new(start_level: u32, effort: StatLine<u32>) -> Self {
        Self {
            start_level,
            effort,
            friendship: 0,
        }
    }

    #[must_use]
    pub fn with_friendship(mut self, friendship: u32) -> Self {
        self.friendship = friendship;
        self
    }
}

/// Position of an observation: evolution stage, effort segment, level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationKey {
    pub evolution: usize,
    pub segment: usize,
    pub level: u32,
}

/// Stats recorded at one level. Unobserved stats stay `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub key: ObservationKey,
    pub stats: StatLine<Option<u32>>,
}

/// Observations ordered by (evolution, segment, level).
///
/// At most one observation exists per key; recording at an existing key
/// overlays the new values onto the old ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationTimeline {
    entries: Vec<Observation>,
}

impl ObservationTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.entries.iter()
    }

    pub fn get(&self, key: &ObservationKey) -> Option<&Observation> {
        self.entries
            .binary_search_by(|entry| entry.key.cmp(key))
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Records `stats` at `key`, merging with any observation already there.
    pub fn record(&mut self, key: ObservationKey, stats: StatLine<Option<u32>>) {
        match self.entries.binary_search_by(|entry| entry.key.cmp(&key)) {
            Ok(index) => {
                let entry = &mut self.entries[index];
                entry.stats = entry.stats.merged(&stats);
            }
            Err(index) => self.entries.insert(index, Observation { key, stats }),
        }
    }

    /// Removes the observation at `key`, returning it if present.
    pub fn remove(&mut self, key: &ObservationKey) -> Option<Observation> {
        let index = self
            .entries
            .binary_search_by(|entry| entry.key.cmp(key))
            .ok()?;
        Some(self.entries.remove(index))
    }

    /// Every (observation, value) pair that carries `stat`, in timeline order.
    pub fn values_of(&self, stat: Stat) -> impl Iterator<Item = (&Observation, u32)> {
        self.entries
            .iter()
            .filter_map(move |entry| (*entry.stats.get(stat)).map(|value| (entry, value)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(evolution: usize, segment: usize, level: u32) -> ObservationKey {
        ObservationKey {
            evolution,
            segment,
            level,
        }
    }

    #[test]
    fn record_keeps_entries_sorted_and_merges() {
        let mut timeline = ObservationTimeline::new();
        timeline.record(key(0, 0, 12), "30/?/?/?/?/?".parse().unwrap());
        timeline.record(key(0, 0, 8), "24/?/?/?/?/?".parse().unwrap());
        timeline.record(key(0, 0, 12), "?/15/?/?/?/?".parse().unwrap());

        let levels: Vec<u32> = timeline.iter().map(|entry| entry.key.level).collect();
        assert_eq!(levels, vec![8, 12]);

        let merged = timeline.get(&key(0, 0, 12)).unwrap();
        assert_eq!(merged.stats.hp, Some(30));
        assert_eq!(merged.stats.attack, Some(15));
    }

    #[test]
    fn values_of_skips_unobserved_levels() {
        let mut timeline = ObservationTimeline::new();
        timeline.record(key(0, 0, 5), "20/?/?/?/?/?".parse().unwrap());
        timeline.record(key(0, 0, 6), "?/11/?/?/?/?".parse().unwrap());
        timeline.record(key(1, 0, 16), "40/25/?/?/?/?".parse().unwrap());

        let hp: Vec<u32> = timeline.values_of(Stat::Hp).map(|(_, value)| value).collect();
        assert_eq!(hp, vec![20, 40]);

        assert!(timeline.remove(&key(0, 0, 6)).is_some());
        assert!(timeline.remove(&key(0, 0, 6)).is_none());
        assert_eq!(timeline.len(), 2);
    }
}
