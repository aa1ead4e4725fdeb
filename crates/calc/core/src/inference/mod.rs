//! IV Range Inference Engine and Nature Resolution.
//!
//! ```text
//! ObservationTimeline ──► infer_ranges ──► StatLine<IvRangeSet> (provisional)
//!                                               │
//!                        NaturePins ──► resolve_nature ──► NatureResolution
//!                                               │
//!                                      apply_resolution ──► InferredState
//! ```
//!
//! Everything here is a pure function of its inputs. Empty domains are
//! ordinary values, not errors.

mod engine;
mod nature;
mod range;

pub use engine::{InferenceInput, infer_ranges, infer_stat};
pub use nature::{
    ConfirmedNature, NaturePins, NatureResolution, apply_resolution, resolve_nature,
};
pub use range::{IvRange, IvRangeSet};

use std::collections::BTreeSet;

use crate::stats::{
    Generation, ModifierHypothesis, Stat, StatLine, StatParams, calculate_stat,
};

/// Fully resolved inference result for one tracker.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferredState {
    /// Per-stat domains with nature-filtered combined intervals.
    pub ranges: StatLine<IvRangeSet>,
    pub nature: NatureResolution,
}

impl InferredState {
    /// Runs inference and nature resolution end to end.
    pub fn resolve(input: &InferenceInput<'_>, pins: &NaturePins) -> Self {
        let provisional = infer_ranges(input);
        let nature = resolve_nature(&provisional, pins, input.generation);
        let ranges = apply_resolution(&provisional, &nature);
        Self { ranges, nature }
    }

    /// Plausible (hypothesis, domain) pairs for `stat`, skipping empty domains.
    pub fn domains(&self, stat: Stat) -> impl Iterator<Item = (ModifierHypothesis, IvRange)> + '_ {
        let set = *self.ranges.get(stat);
        self.nature
            .hypotheses_for(stat)
            .into_iter()
            .map(move |hypothesis| (hypothesis, set.get(hypothesis)))
            .filter(|(_, range)| !range.is_empty())
    }

    /// Domain of `hypothesis` for `stat` if that hypothesis is still
    /// plausible, otherwise impossible.
    pub fn filtered_domain(&self, stat: Stat, hypothesis: ModifierHypothesis) -> IvRange {
        if self.nature.hypotheses_for(stat).contains(&hypothesis) {
            self.ranges.get(stat).get(hypothesis)
        } else {
            IvRange::IMPOSSIBLE
        }
    }
}

/// Stat parameters shared by every value computed at one level.
#[derive(Clone, Copy, Debug)]
pub struct StatContext {
    pub generation: Generation,
    pub level: u32,
    pub base: StatLine<u32>,
    pub effort: StatLine<u32>,
    pub friendship: u32,
}

impl StatContext {
    /// The stat value a given hereditary value produces under `hypothesis`.
    pub fn value(&self, stat: Stat, iv: u32, hypothesis: ModifierHypothesis) -> u32 {
        let params = StatParams::new(self.level, *self.base.get(stat), iv, *self.effort.get(stat))
            .with_friendship(self.friendship);
        calculate_stat(stat, &params, hypothesis, self.generation)
    }
}

/// Every stat value reachable at the context's level from the plausible
/// nature-filtered domains.
pub fn possible_stat_values(
    inferred: &InferredState,
    context: &StatContext,
    stat: Stat,
) -> BTreeSet<u32> {
    inferred
        .domains(stat)
        .flat_map(|(hypothesis, range)| {
            range
                .values()
                .map(move |iv| context.value(stat, iv, hypothesis))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EffortSegment, ObservationKey, ObservationTimeline};

    #[test]
    fn possible_values_cover_open_domain() {
        let timeline = ObservationTimeline::new();
        let base_stats = vec![StatLine::splat(50)];
        let effort = vec![EffortSegment::default()];
        let static_ivs = StatLine::splat(None);
        let input = InferenceInput {
            timeline: &timeline,
            base_stats: &base_stats,
            effort: &effort,
            generation: Generation::Gen3,
            static_ivs: &static_ivs,
        };
        let inferred = InferredState::resolve(&input, &NaturePins::default());
        let context = StatContext {
            generation: Generation::Gen3,
            level: 10,
            base: base_stats[0],
            effort: StatLine::splat(0),
            friendship: 0,
        };

        // Neutral level-10 range is 15..=18; reduced dips to 13, boosted reaches 19.
        let values = possible_stat_values(&inferred, &context, Stat::Attack);
        assert_eq!(values.first(), Some(&13));
        assert_eq!(values.last(), Some(&19));

        let hp = possible_stat_values(&inferred, &context, Stat::Hp);
        assert_eq!(hp.first(), Some(&30));
        assert_eq!(hp.last(), Some(&33));
    }

    #[test]
    fn filtered_domain_drops_implausible_hypotheses() {
        let mut timeline = ObservationTimeline::new();
        let base_stats = vec![StatLine::splat(100)];
        let effort = vec![EffortSegment::default()];
        let static_ivs = StatLine::splat(None);
        // 132 at level 50 from base 100 needs a boosting nature.
        timeline.record(
            ObservationKey {
                evolution: 0,
                segment: 0,
                level: 50,
            },
            StatLine {
                attack: Some(132),
                ..StatLine::splat(None)
            },
        );
        let input = InferenceInput {
            timeline: &timeline,
            base_stats: &base_stats,
            effort: &effort,
            generation: Generation::Gen4,
            static_ivs: &static_ivs,
        };
        let inferred = InferredState::resolve(&input, &NaturePins::default());
        assert_eq!(inferred.nature.confirmed.boosted, Some(Stat::Attack));
        assert!(inferred
            .filtered_domain(Stat::Attack, ModifierHypothesis::Neutral)
            .is_empty());
        assert!(inferred
            .filtered_domain(Stat::Attack, ModifierHypothesis::Boosted)
            .contains(31));
        assert_eq!(inferred.domains(Stat::Attack).count(), 1);
    }
}
