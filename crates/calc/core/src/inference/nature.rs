//! Nature resolution across all six inferred domains.
//!
//! A nature is consistent with the evidence when, for every non-HP stat, the
//! domain under the hypothesis that nature implies is non-empty. The confirmed
//! boosted (reduced) stat is the one every consistent nature agrees on.

use arrayvec::ArrayVec;

use crate::stats::{Generation, ModifierHypothesis, Nature, Stat, StatLine};

use super::range::IvRangeSet;

/// Operator-supplied nature hints.
///
/// `boosted`/`reduced` come from manual pins; `nature` is a forced nature
/// declared by the document. A forced nature wins over pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaturePins {
    pub boosted: Option<Stat>,
    pub reduced: Option<Stat>,
    pub nature: Option<Nature>,
}

impl NaturePins {
    pub fn is_empty(&self) -> bool {
        self.boosted.is_none() && self.reduced.is_none() && self.nature.is_none()
    }

    /// Natures allowed by the hints, before looking at any evidence.
    pub fn candidates(&self) -> Vec<Nature> {
        if let Some(nature) = self.nature {
            return vec![nature];
        }
        let neutral_pin = matches!((self.boosted, self.reduced), (Some(b), Some(r)) if b == r);
        Nature::ALL
            .into_iter()
            .filter(|nature| {
                if neutral_pin {
                    return nature.is_neutral();
                }
                let boosted_ok = self
                    .boosted
                    .is_none_or(|stat| !nature.is_neutral() && nature.boosted() == stat);
                let reduced_ok = self
                    .reduced
                    .is_none_or(|stat| !nature.is_neutral() && nature.reduced() == stat);
                boosted_ok && reduced_ok
            })
            .collect()
    }
}

/// The (boosted, reduced) pair, each `None` while undetermined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmedNature {
    pub boosted: Option<Stat>,
    pub reduced: Option<Stat>,
}

impl ConfirmedNature {
    pub const UNKNOWN: ConfirmedNature = ConfirmedNature {
        boosted: None,
        reduced: None,
    };

    /// The nature named by a fully determined pair.
    pub fn nature(&self) -> Option<Nature> {
        Nature::from_pair(self.boosted?, self.reduced?)
    }
}

/// Outcome of nature resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NatureResolution {
    pub confirmed: ConfirmedNature,
    /// Natures allowed by the hints.
    pub candidates: Vec<Nature>,
    /// Candidates that also agree with every observed domain.
    pub consistent: Vec<Nature>,
    /// The result came from hints rather than evidence alone.
    pub pinned: bool,
    /// No candidate agrees with the evidence.
    pub contradiction: bool,
}

impl NatureResolution {
    /// Resolution for rulesets without natures.
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// Natures still in play: the consistent ones, or every candidate once
    /// the evidence contradicts them all.
    pub fn plausible(&self) -> &[Nature] {
        if self.contradiction {
            &self.candidates
        } else {
            &self.consistent
        }
    }

    /// Hypotheses still plausible for `stat`, in `ModifierHypothesis::ALL` order.
    pub fn hypotheses_for(&self, stat: Stat) -> ArrayVec<ModifierHypothesis, 3> {
        let plausible = self.plausible();
        if plausible.is_empty() || stat.is_hp() {
            return [ModifierHypothesis::Neutral].into_iter().collect();
        }
        ModifierHypothesis::ALL
            .into_iter()
            .filter(|hypothesis| {
                plausible
                    .iter()
                    .any(|nature| nature.hypothesis_for(stat) == *hypothesis)
            })
            .collect()
    }
}

/// Resolves the nature from all six range sets and the operator's hints.
pub fn resolve_nature(
    ranges: &StatLine<IvRangeSet>,
    pins: &NaturePins,
    generation: Generation,
) -> NatureResolution {
    if !generation.has_natures() {
        return NatureResolution::unsupported();
    }

    let candidates = pins.candidates();
    let consistent: Vec<Nature> = candidates
        .iter()
        .copied()
        .filter(|nature| is_consistent(*nature, ranges))
        .collect();
    let contradiction = consistent.is_empty();
    let plausible = if contradiction { &candidates } else { &consistent };

    let confirmed = if let Some(nature) = pins.nature {
        ConfirmedNature {
            boosted: Some(nature.boosted()),
            reduced: Some(nature.reduced()),
        }
    } else {
        ConfirmedNature {
            boosted: pins
                .boosted
                .or_else(|| shared_stat(plausible, Nature::boosted)),
            reduced: pins
                .reduced
                .or_else(|| shared_stat(plausible, Nature::reduced)),
        }
    };

    NatureResolution {
        confirmed,
        pinned: !pins.is_empty(),
        contradiction,
        candidates,
        consistent,
    }
}

/// Recomputes every combined interval from the plausible hypotheses.
pub fn apply_resolution(
    ranges: &StatLine<IvRangeSet>,
    resolution: &NatureResolution,
) -> StatLine<IvRangeSet> {
    ranges.map(|stat, set| set.with_plausible(&resolution.hypotheses_for(stat)))
}

fn is_consistent(nature: Nature, ranges: &StatLine<IvRangeSet>) -> bool {
    Stat::NATURE_STATS
        .into_iter()
        .all(|stat| !ranges.get(stat).get(nature.hypothesis_for(stat)).is_empty())
}

/// The stat `select` yields for every plausible nature, if they all agree.
///
/// A single plausible nature always determines its pair; otherwise a neutral
/// nature among several leaves both sides undetermined.
fn shared_stat(plausible: &[Nature], select: fn(Nature) -> Stat) -> Option<Stat> {
    let (first, rest) = plausible.split_first()?;
    if rest.is_empty() {
        return Some(select(*first));
    }
    if plausible.iter().any(|nature| nature.is_neutral()) {
        return None;
    }
    let stat = select(*first);
    rest.iter().all(|nature| select(*nature) == stat).then_some(stat)
}
