//! Hereditary-value intervals.

use core::fmt;
use core::ops::RangeInclusive;

use arrayvec::ArrayVec;

use crate::config::CalcConfig;
use crate::stats::ModifierHypothesis;

/// An inclusive interval of hereditary values.
///
/// An impossible interval is `[-1, -1]`; it renders as `x`. Intervals only
/// ever shrink as observations are added, and an impossible interval stays
/// impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvRange {
    pub min: i32,
    pub max: i32,
}

impl IvRange {
    pub const IMPOSSIBLE: IvRange = IvRange { min: -1, max: -1 };
    pub const FULL: IvRange = IvRange {
        min: 0,
        max: CalcConfig::MAX_IV as i32,
    };

    /// Creates `[min, max]`, collapsing to impossible when the bounds are
    /// inverted or fall outside the domain.
    pub fn new(min: i32, max: i32) -> Self {
        let min = min.max(0);
        let max = max.min(CalcConfig::MAX_IV as i32);
        if min > max {
            Self::IMPOSSIBLE
        } else {
            Self { min, max }
        }
    }

    pub fn single(value: u32) -> Self {
        Self::new(value as i32, value as i32)
    }

    pub const fn is_empty(&self) -> bool {
        self.min < 0 || self.max < self.min
    }

    /// Number of values in the interval.
    pub const fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            (self.max - self.min + 1) as u32
        }
    }

    pub const fn contains(&self, value: u32) -> bool {
        !self.is_empty() && value as i32 >= self.min && value as i32 <= self.max
    }

    pub fn intersect(&self, other: &IvRange) -> IvRange {
        if self.is_empty() || other.is_empty() {
            return Self::IMPOSSIBLE;
        }
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Smallest interval covering both; impossible sides are ignored.
    pub fn hull(&self, other: &IvRange) -> IvRange {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Self::IMPOSSIBLE,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => Self {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
            },
        }
    }

    pub fn overlaps(&self, other: &IvRange) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Grows the interval to include `value`, starting it if it was impossible.
    pub fn extend_to(&mut self, value: u32) {
        if self.is_empty() {
            *self = Self::single(value);
        } else {
            self.min = self.min.min(value as i32);
            self.max = self.max.max(value as i32);
        }
    }

    pub fn values(&self) -> RangeInclusive<u32> {
        let (start, end) = if self.is_empty() {
            (1, 0)
        } else {
            (self.min as u32, self.max as u32)
        };
        start..=end
    }
}

impl Default for IvRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for IvRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "x")
        } else if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

// ============================================================================
// IvRangeSet
// ============================================================================

/// Per-stat inference result: one interval per modifier hypothesis plus the
/// combined interval of whichever hypotheses remain plausible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvRangeSet {
    pub reduced: IvRange,
    pub neutral: IvRange,
    pub boosted: IvRange,
    pub combined: IvRange,
}

impl IvRangeSet {
    /// Every hypothesis fully open.
    pub const FULL: IvRangeSet = IvRangeSet {
        reduced: IvRange::FULL,
        neutral: IvRange::FULL,
        boosted: IvRange::FULL,
        combined: IvRange::FULL,
    };

    /// Every hypothesis impossible.
    pub const EMPTY: IvRangeSet = IvRangeSet {
        reduced: IvRange::IMPOSSIBLE,
        neutral: IvRange::IMPOSSIBLE,
        boosted: IvRange::IMPOSSIBLE,
        combined: IvRange::IMPOSSIBLE,
    };

    /// Builds a set whose combined interval is the provisional union.
    pub fn provisional(reduced: IvRange, neutral: IvRange, boosted: IvRange) -> Self {
        Self {
            reduced,
            neutral,
            boosted,
            combined: reduced.hull(&neutral).hull(&boosted),
        }
    }

    pub fn get(&self, hypothesis: ModifierHypothesis) -> IvRange {
        match hypothesis {
            ModifierHypothesis::Reduced => self.reduced,
            ModifierHypothesis::Neutral => self.neutral,
            ModifierHypothesis::Boosted => self.boosted,
        }
    }

    pub fn get_mut(&mut self, hypothesis: ModifierHypothesis) -> &mut IvRange {
        match hypothesis {
            ModifierHypothesis::Reduced => &mut self.reduced,
            ModifierHypothesis::Neutral => &mut self.neutral,
            ModifierHypothesis::Boosted => &mut self.boosted,
        }
    }

    /// Hypotheses whose interval is non-empty.
    pub fn possible(&self) -> ArrayVec<ModifierHypothesis, 3> {
        ModifierHypothesis::ALL
            .into_iter()
            .filter(|h| !self.get(*h).is_empty())
            .collect()
    }

    /// Hypothesis-wise hull of two sets; `combined` is recomputed.
    #[must_use]
    pub fn union(&self, other: &IvRangeSet) -> Self {
        Self::provisional(
            self.reduced.hull(&other.reduced),
            self.neutral.hull(&other.neutral),
            self.boosted.hull(&other.boosted),
        )
    }

    /// Recomputes `combined` from the given plausible hypotheses.
    #[must_use]
    pub fn with_plausible(mut self, plausible: &[ModifierHypothesis]) -> Self {
        self.combined = plausible
            .iter()
            .fold(IvRange::IMPOSSIBLE, |acc, h| acc.hull(&self.get(*h)));
        self
    }
}

impl Default for IvRangeSet {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for IvRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} ({})",
            self.reduced, self.neutral, self.boosted, self.combined
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impossible_range_is_sticky() {
        let empty = IvRange::IMPOSSIBLE;
        assert!(empty.is_empty());
        assert_eq!(empty.width(), 0);
        assert_eq!(empty.intersect(&IvRange::FULL), IvRange::IMPOSSIBLE);
        assert_eq!(empty.to_string(), "x");
        assert_eq!(empty.values().count(), 0);
    }

    #[test]
    fn new_clamps_and_collapses() {
        assert_eq!(IvRange::new(-5, 40), IvRange::FULL);
        assert_eq!(IvRange::new(10, 3), IvRange::IMPOSSIBLE);
        assert_eq!(IvRange::new(4, 4).to_string(), "4");
        assert_eq!(IvRange::new(4, 9).to_string(), "4-9");
    }

    #[test]
    fn hull_ignores_impossible_sides() {
        let a = IvRange::new(3, 5);
        let b = IvRange::new(10, 12);
        assert_eq!(a.hull(&b), IvRange::new(3, 12));
        assert_eq!(a.hull(&IvRange::IMPOSSIBLE), a);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&IvRange::new(5, 31)));
    }

    #[test]
    fn extend_to_starts_and_grows() {
        let mut range = IvRange::IMPOSSIBLE;
        range.extend_to(7);
        assert_eq!(range, IvRange::single(7));
        range.extend_to(9);
        assert_eq!(range, IvRange::new(7, 9));
    }

    #[test]
    fn combined_follows_plausible_hypotheses() {
        let set = IvRangeSet::provisional(
            IvRange::IMPOSSIBLE,
            IvRange::new(0, 4),
            IvRange::new(20, 25),
        );
        assert_eq!(set.combined, IvRange::new(0, 25));
        assert_eq!(
            set.possible().as_slice(),
            &[ModifierHypothesis::Neutral, ModifierHypothesis::Boosted]
        );
        let narrowed = set.with_plausible(&[ModifierHypothesis::Boosted]);
        assert_eq!(narrowed.combined, IvRange::new(20, 25));
        let none = set.with_plausible(&[ModifierHypothesis::Reduced]);
        assert!(none.combined.is_empty());
    }
}
