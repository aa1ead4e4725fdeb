//! The long-lived tracker aggregate.

use std::collections::{BTreeMap, BTreeSet};

use crate::inference::{
    InferenceInput, InferredState, IvRange, NaturePins, StatContext, possible_stat_values,
};
use crate::stats::{Generation, ModifierHypothesis, Nature, Stat, StatLine};

use super::timeline::{EffortSegment, ObservationKey, ObservationTimeline};

/// Everything a document declares about a tracked subject.
///
/// The spec is immutable once registered; resets rebuild the tracker from it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerSpec {
    pub name: String,
    pub generation: Generation,
    /// Base stats indexed by evolution stage.
    pub base_stats: Vec<StatLine<u32>>,
    pub starting_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub caught_level: Option<u32>,
    /// Guaranteed hereditary values.
    #[cfg_attr(feature = "serde", serde(default))]
    pub static_ivs: StatLine<Option<u32>>,
    /// Nature forced by the document.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nature: Option<Nature>,
}

impl TrackerSpec {
    pub fn new(name: impl Into<String>, generation: Generation, base_stats: StatLine<u32>) -> Self {
        Self {
            name: name.into(),
            generation,
            base_stats: vec![base_stats],
            starting_level: 1,
            caught_level: None,
            static_ivs: StatLine::splat(None),
            nature: None,
        }
    }

    #[must_use]
    pub fn with_evolution(mut self, base_stats: StatLine<u32>) -> Self {
        self.base_stats.push(base_stats);
        self
    }

    #[must_use]
    pub fn with_starting_level(mut self, level: u32) -> Self {
        self.starting_level = level;
        self
    }

    #[must_use]
    pub fn with_caught_level(mut self, level: u32) -> Self {
        self.caught_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_static_iv(mut self, stat: Stat, iv: u32) -> Self {
        *self.static_ivs.get_mut(stat) = Some(iv);
        self
    }

    #[must_use]
    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = Some(nature);
        self
    }
}

/// A tracked subject: its declaration plus everything recorded since.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tracker {
    pub spec: TrackerSpec,
    /// Current evolution stage, an index into `spec.base_stats`.
    pub evolution: usize,
    /// Effort schedule; never empty, the last segment is current.
    pub effort_segments: Vec<EffortSegment>,
    pub timeline: ObservationTimeline,
    /// Manually pinned boosted/reduced stats.
    pub manual: NaturePins,
}

impl Tracker {
    pub fn new(spec: TrackerSpec) -> Self {
        let opening = EffortSegment::new(spec.starting_level, StatLine::splat(0));
        Self {
            spec,
            evolution: 0,
            effort_segments: vec![opening],
            timeline: ObservationTimeline::new(),
            manual: NaturePins::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn generation(&self) -> Generation {
        self.spec.generation
    }

    pub fn current_segment_index(&self) -> usize {
        self.effort_segments.len().saturating_sub(1)
    }

    pub fn current_segment(&self) -> Option<&EffortSegment> {
        self.effort_segments.last()
    }

    pub fn current_base_stats(&self) -> Option<&StatLine<u32>> {
        self.spec.base_stats.get(self.evolution)
    }

    /// Key for an observation at `level` under the current stage and segment.
    pub fn key_at(&self, level: u32) -> ObservationKey {
        ObservationKey {
            evolution: self.evolution,
            segment: self.current_segment_index(),
            level,
        }
    }

    /// Manual pins merged with the document's forced nature.
    pub fn pins(&self) -> NaturePins {
        NaturePins {
            nature: self.spec.nature,
            ..self.manual
        }
    }

    pub fn inference_input(&self) -> InferenceInput<'_> {
        InferenceInput {
            timeline: &self.timeline,
            base_stats: &self.spec.base_stats,
            effort: &self.effort_segments,
            generation: self.spec.generation,
            static_ivs: &self.spec.static_ivs,
        }
    }

    /// Runs inference and nature resolution over everything recorded.
    pub fn infer(&self) -> InferredState {
        InferredState::resolve(&self.inference_input(), &self.pins())
    }

    /// Stat context at `level` for the current stage and latest segment.
    pub fn stat_context(&self, level: u32) -> StatContext {
        let segment = self.current_segment();
        StatContext {
            generation: self.spec.generation,
            level,
            base: self.current_base_stats().copied().unwrap_or_default(),
            effort: segment.map(|s| s.effort).unwrap_or_default(),
            friendship: segment.map_or(0, |s| s.friendship),
        }
    }

    /// Possible values of `stat` at `level`.
    pub fn possible_stat_values(
        &self,
        inferred: &InferredState,
        stat: Stat,
        level: u32,
    ) -> BTreeSet<u32> {
        possible_stat_values(inferred, &self.stat_context(level), stat)
    }

    /// Groups each plausible domain of `stat` into runs of hereditary values
    /// that share one stat value at `level`.
    pub fn stat_runs(
        &self,
        inferred: &InferredState,
        stat: Stat,
        level: u32,
    ) -> BTreeMap<ModifierHypothesis, Vec<StatRun>> {
        let context = self.stat_context(level);
        inferred
            .domains(stat)
            .map(|(hypothesis, range)| {
                let mut runs: Vec<StatRun> = Vec::new();
                for iv in range.values() {
                    let value = context.value(stat, iv, hypothesis);
                    match runs.last_mut() {
                        Some(run) if run.value == value => run.ivs.extend_to(iv),
                        _ => runs.push(StatRun {
                            ivs: IvRange::single(iv),
                            value,
                        }),
                    }
                }
                (hypothesis, runs)
            })
            .collect()
    }
}

/// Contiguous hereditary values producing one stat value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatRun {
    pub ivs: IvRange,
    pub value: u32,
}
