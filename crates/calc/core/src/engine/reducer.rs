use crate::state::{
    EffortSegment, Observation, ObservationKey, Tracker, TrackerRegistry,
};
use crate::stats::{Stat, StatLine};

/// Wraps mutable access to [`TrackerRegistry`] with structured sub-reducers.
pub struct RegistryReducer<'a> {
    state: &'a mut TrackerRegistry,
}

impl<'a> RegistryReducer<'a> {
    pub fn new(state: &'a mut TrackerRegistry) -> Self {
        Self { state }
    }

    /// Inserts a tracker unless one with the same name exists.
    pub fn register(&mut self, tracker: Tracker) -> bool {
        if self.state.contains(tracker.name()) {
            return false;
        }
        self.state.insert(tracker);
        true
    }

    pub fn tracker(&mut self, name: &str) -> Option<TrackerReducer<'_>> {
        self.state
            .get_mut(name)
            .map(|tracker| TrackerReducer { tracker })
    }

    /// Resets every tracker to its declaration. Returns how many were reset.
    pub fn reset_all(&mut self) -> usize {
        let mut count = 0;
        for tracker in self.state.iter_mut() {
            TrackerReducer { tracker }.reset();
            count += 1;
        }
        count
    }
}

pub struct TrackerReducer<'a> {
    tracker: &'a mut Tracker,
}

impl<'a> TrackerReducer<'a> {
    pub fn record(&mut self, level: u32, stats: StatLine<Option<u32>>) -> ObservationKey {
        let key = self.tracker.key_at(level);
        self.tracker.timeline.record(key, stats);
        key
    }

    pub fn remove_observation(&mut self, level: u32) -> Option<Observation> {
        let key = self.tracker.key_at(level);
        self.tracker.timeline.remove(&key)
    }

    pub fn pin(&mut self, boosted: Option<Stat>, reduced: Option<Stat>) {
        self.tracker.manual.boosted = boosted;
        self.tracker.manual.reduced = reduced;
    }

    /// Returns the previous stage.
    pub fn set_evolution(&mut self, evolution: usize) -> usize {
        core::mem::replace(&mut self.tracker.evolution, evolution)
    }

    /// Opens `segment`, or overwrites the current one when both start at the
    /// same level.
    pub fn open_segment(&mut self, segment: EffortSegment) {
        match self.tracker.effort_segments.last_mut() {
            Some(current) if current.start_level == segment.start_level => *current = segment,
            _ => self.tracker.effort_segments.push(segment),
        }
    }

    pub fn reset(&mut self) {
        *self.tracker = Tracker::new(self.tracker.spec.clone());
    }
}
