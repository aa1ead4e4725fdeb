//! Damage result rows.

use crate::inference::{IvRange, IvRangeSet};
use crate::stats::ModifierHypothesis;

use super::damage::{DamageRolls, roll_bounds, roll_label};

/// One contiguous hereditary-value run that yields one stat value, with the
/// damage rolls that stat value produces.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeResult {
    pub ivs: IvRange,
    pub stat: u32,
    pub rolls: DamageRolls,
    pub min: u32,
    pub max: u32,
    /// `min-max`, or the single value when both agree.
    pub label: String,
}

impl RangeResult {
    pub fn new(ivs: IvRange, stat: u32, rolls: DamageRolls) -> Self {
        let (min, max) = roll_bounds(&rolls);
        Self {
            ivs,
            stat,
            rolls,
            min,
            max,
            label: roll_label(&rolls),
        }
    }

    /// Number of rolls at or above `threshold`.
    pub fn successes(&self, threshold: u32) -> u8 {
        count_at_least(&self.rolls, threshold)
    }
}

/// One or more result rows that share a damage label, with the hereditary
/// values that produced them under each hypothesis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactRange {
    pub label: String,
    pub rolls: DamageRolls,
    pub min: u32,
    pub max: u32,
    /// Per-hypothesis hereditary sub-intervals; `combined` is their hull.
    pub ivs: IvRangeSet,
}

impl CompactRange {
    pub(crate) fn seed(result: &RangeResult) -> Self {
        Self {
            label: result.label.clone(),
            rolls: result.rolls,
            min: result.min,
            max: result.max,
            ivs: IvRangeSet::EMPTY,
        }
    }

    /// Hypotheses that contributed at least one hereditary value.
    pub fn hypotheses(&self) -> impl Iterator<Item = ModifierHypothesis> + '_ {
        ModifierHypothesis::ALL
            .into_iter()
            .filter(|hypothesis| !self.ivs.get(*hypothesis).is_empty())
    }

    pub fn successes(&self, threshold: u32) -> u8 {
        count_at_least(&self.rolls, threshold)
    }
}

/// Compact ranges that share a lethality count.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneShotResult {
    /// Rolls (out of 16) at or above the threshold.
    pub success_count: u8,
    /// Union of every child's per-hypothesis intervals.
    pub ivs: IvRangeSet,
    pub children: Vec<CompactRange>,
}

fn count_at_least(rolls: &DamageRolls, threshold: u32) -> u8 {
    rolls.iter().filter(|roll| **roll >= threshold).count() as u8
}
