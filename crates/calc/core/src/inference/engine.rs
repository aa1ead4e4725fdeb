//! Constraint propagation from observations to hereditary-value domains.

use crate::state::{EffortSegment, ObservationTimeline};
use crate::stats::{
    Generation, ModifierHypothesis, Stat, StatLine, StatParams, calculate_stat,
};

use super::range::{IvRange, IvRangeSet};

/// Everything inference reads from a tracker.
#[derive(Clone, Copy, Debug)]
pub struct InferenceInput<'a> {
    pub timeline: &'a ObservationTimeline,
    /// Base stats indexed by evolution stage.
    pub base_stats: &'a [StatLine<u32>],
    /// Effort schedule indexed by segment.
    pub effort: &'a [EffortSegment],
    pub generation: Generation,
    /// Fixed hereditary values that replace the open domain.
    pub static_ivs: &'a StatLine<Option<u32>>,
}

/// Infers the domain of every stat under each modifier hypothesis.
///
/// The combined interval of each result is the provisional union of the
/// three hypotheses; nature resolution narrows it afterwards.
pub fn infer_ranges(input: &InferenceInput<'_>) -> StatLine<IvRangeSet> {
    StatLine::from_fn(|stat| infer_stat(input, stat))
}

/// Infers one stat's domains.
pub fn infer_stat(input: &InferenceInput<'_>, stat: Stat) -> IvRangeSet {
    if stat.is_hp() || !input.generation.has_natures() {
        let shared = infer_domain(input, stat, ModifierHypothesis::Neutral);
        return IvRangeSet::provisional(shared, shared, shared);
    }
    IvRangeSet::provisional(
        infer_domain(input, stat, ModifierHypothesis::Reduced),
        infer_domain(input, stat, ModifierHypothesis::Neutral),
        infer_domain(input, stat, ModifierHypothesis::Boosted),
    )
}

fn infer_domain(input: &InferenceInput<'_>, stat: Stat, hypothesis: ModifierHypothesis) -> IvRange {
    let mut domain = match input.static_ivs.get(stat) {
        Some(fixed) => IvRange::single(*fixed),
        None => IvRange::FULL,
    };

    for (observation, observed) in input.timeline.values_of(stat) {
        if domain.is_empty() {
            break;
        }
        // Observations pointing at a missing stage cannot constrain anything.
        let Some(base) = input.base_stats.get(observation.key.evolution) else {
            continue;
        };
        let segment = input.effort.get(observation.key.segment);
        let params = StatParams::new(
            observation.key.level,
            *base.get(stat),
            0,
            segment.map_or(0, |s| *s.effort.get(stat)),
        )
        .with_friendship(segment.map_or(0, |s| s.friendship));

        domain = matching_subrange(domain, observed, |iv| {
            calculate_stat(stat, &params.with_iv(iv), hypothesis, input.generation)
        });
    }

    domain
}

/// Narrows `domain` to the values whose computed stat equals `observed`.
///
/// Stat output is non-decreasing in the hereditary value, so the matches form
/// one contiguous run and the first and last match bound it.
fn matching_subrange(domain: IvRange, observed: u32, compute: impl Fn(u32) -> u32) -> IvRange {
    let mut matches = domain.values().filter(|iv| compute(*iv) == observed);
    let Some(first) = matches.next() else {
        return IvRange::IMPOSSIBLE;
    };
    let last = matches.last().unwrap_or(first);
    IvRange::new(first as i32, last as i32)
}
