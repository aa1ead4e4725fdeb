//! Multi-roll combination.
//!
//! Several independent hits each land one of their 16 rolls; a combination
//! succeeds when the summed damage reaches the threshold. Every hit may also
//! crit independently, substituting its critical roll set.

use crate::config::CalcConfig;
use crate::error::FormulaError;
use crate::stats::Generation;

use super::damage::DamageRolls;

/// Critical-hit probability for `generation`, unless `config` overrides it.
pub fn crit_chance(generation: Generation, config: &CalcConfig) -> f64 {
    config.crit_chance_override.unwrap_or_else(|| {
        let (numerator, denominator) = generation.crit_chance();
        f64::from(numerator) / f64::from(denominator)
    })
}

/// The rolls of one hit, with optional critical-hit rolls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollSet {
    pub normal: DamageRolls,
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical: Option<DamageRolls>,
}

impl RollSet {
    pub fn new(normal: DamageRolls) -> Self {
        Self {
            normal,
            critical: None,
        }
    }

    #[must_use]
    pub fn with_critical(mut self, critical: DamageRolls) -> Self {
        self.critical = Some(critical);
        self
    }
}

/// Aggregate over every critical-hit sub-combination with the same number
/// of crits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CritBucket {
    pub crits: u32,
    /// Number of sub-combinations (which hits crit) with this many crits.
    pub combinations: u64,
    /// Successful roll tuples summed over those sub-combinations.
    pub successes: u128,
    /// Roll tuples summed over those sub-combinations.
    pub outcomes: u128,
    /// Probability that exactly this many hits crit.
    pub probability: f64,
}

/// Result of combining several roll sets against one threshold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiRollResult {
    pub threshold: u32,
    pub hits: usize,
    /// Indexed by crit count.
    pub by_crits: Vec<CritBucket>,
    /// Probability, weighted over crit sub-combinations, that the summed
    /// damage reaches the threshold.
    pub kill_chance: f64,
}

impl MultiRollResult {
    /// Successes and outcomes of the no-crit combination.
    pub fn without_crits(&self) -> Option<&CritBucket> {
        self.by_crits.first()
    }
}

/// Counts roll tuples whose sum reaches `threshold`, for every crit
/// sub-combination.
///
/// Sets without critical rolls never crit. Each sub-combination is counted
/// exactly through a sum distribution saturated at `threshold`, after the
/// threshold is clamped to the largest reachable sum. At most
/// [`CalcConfig::MAX_HITS`] sets are accepted.
pub fn combine_rolls(
    sets: &[RollSet],
    threshold: u32,
    crit_chance: f64,
) -> Result<MultiRollResult, FormulaError> {
    if sets.len() > CalcConfig::MAX_HITS {
        return Err(FormulaError::TooManyHits {
            hits: sets.len(),
            max: CalcConfig::MAX_HITS,
        });
    }
    let reachable: u64 = sets
        .iter()
        .map(|set| {
            let normal = max_roll(&set.normal);
            set.critical.as_ref().map_or(normal, |critical| normal.max(max_roll(critical)))
        })
        .sum();
    if u64::from(threshold) <= reachable && threshold > CalcConfig::MAX_ROLL_THRESHOLD {
        return Err(FormulaError::ThresholdTooLarge {
            threshold,
            max: CalcConfig::MAX_ROLL_THRESHOLD,
        });
    }

    let crit_chance = crit_chance.clamp(0.0, 1.0);
    let critable: Vec<usize> = sets
        .iter()
        .enumerate()
        .filter(|(_, set)| set.critical.is_some())
        .map(|(index, _)| index)
        .collect();

    let mut by_crits: Vec<CritBucket> = (0..=critable.len())
        .map(|crits| CritBucket {
            crits: crits as u32,
            combinations: 0,
            successes: 0,
            outcomes: 0,
            probability: 0.0,
        })
        .collect();
    let mut kill_chance = 0.0;

    for mask in 0u32..(1u32 << critable.len()) {
        let chosen: Vec<&DamageRolls> = sets
            .iter()
            .enumerate()
            .map(|(index, set)| {
                let crit_bit = critable.iter().position(|c| *c == index);
                match (crit_bit, &set.critical) {
                    (Some(bit), Some(critical)) if mask & (1 << bit) != 0 => critical,
                    _ => &set.normal,
                }
            })
            .collect();

        let crits = mask.count_ones();
        let weight = crit_chance.powi(crits as i32)
            * (1.0 - crit_chance).powi((critable.len() as u32 - crits) as i32);
        let successes = count_successes(&chosen, threshold);
        let outcomes = tuple_count(sets.len());

        let bucket = &mut by_crits[crits as usize];
        bucket.combinations += 1;
        bucket.successes += successes;
        bucket.outcomes += outcomes;
        bucket.probability += weight;
        kill_chance += weight * (successes as f64 / outcomes as f64);
    }

    Ok(MultiRollResult {
        threshold,
        hits: sets.len(),
        by_crits,
        kill_chance,
    })
}

fn max_roll(rolls: &DamageRolls) -> u64 {
    rolls.iter().copied().max().map_or(0, u64::from)
}

fn tuple_count(hits: usize) -> u128 {
    (CalcConfig::ROLL_COUNT as u128).saturating_pow(hits as u32)
}

/// Number of roll tuples (one roll per set) whose sum reaches `threshold`.
fn count_successes(sets: &[&DamageRolls], threshold: u32) -> u128 {
    if threshold == 0 {
        return tuple_count(sets.len());
    }
    let reachable: u64 = sets.iter().map(|rolls| max_roll(rolls)).sum();
    if u64::from(threshold) > reachable {
        return 0;
    }
    let cap = threshold as usize;
    // distribution[s] = tuples with sum s; the last slot holds every sum >= threshold.
    let mut distribution = vec![0u128; cap + 1];
    distribution[0] = 1;

    for rolls in sets {
        let mut next = vec![0u128; cap + 1];
        for (sum, count) in distribution.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            for roll in rolls.iter() {
                let target = sum.saturating_add(*roll as usize).min(cap);
                next[target] = next[target].saturating_add(*count);
            }
        }
        distribution = next;
    }
    distribution[cap]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: u32) -> DamageRolls {
        [value; 16]
    }

    fn ramp(start: u32) -> DamageRolls {
        core::array::from_fn(|index| start + index as u32)
    }

    #[test]
    fn single_set_counts_rolls_at_threshold() {
        let result = combine_rolls(&[RollSet::new(ramp(10))], 20, 0.0).unwrap();
        let bucket = result.without_crits().unwrap();
        // 20..=25 reach the threshold.
        assert_eq!(bucket.successes, 6);
        assert_eq!(bucket.outcomes, 16);
        assert!((result.kill_chance - 6.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn two_sets_enumerate_the_cross_product() {
        let sets = [RollSet::new(ramp(0)), RollSet::new(ramp(0))];
        let result = combine_rolls(&sets, 30, 0.0).unwrap();
        let bucket = result.without_crits().unwrap();
        // Only (15, 15) reaches 30.
        assert_eq!(bucket.successes, 1);
        assert_eq!(bucket.outcomes, 256);
    }

    #[test]
    fn crits_split_into_weighted_sub_combinations() {
        let sets = [
            RollSet::new(flat(10)).with_critical(flat(20)),
            RollSet::new(flat(10)).with_critical(flat(20)),
        ];
        let result = combine_rolls(&sets, 35, 0.25).unwrap();
        assert_eq!(result.by_crits.len(), 3);
        assert_eq!(result.by_crits[0].successes, 0);
        assert_eq!(result.by_crits[1].successes, 0);
        assert_eq!(result.by_crits[1].combinations, 2);
        assert_eq!(result.by_crits[2].successes, 256);
        // Only the double crit kills.
        assert!((result.kill_chance - 0.0625).abs() < 1e-12);
        let total: f64 = result.by_crits.iter().map(|bucket| bucket.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sets_without_crit_rolls_never_crit() {
        let sets = [RollSet::new(flat(10)), RollSet::new(flat(10)).with_critical(flat(30))];
        let result = combine_rolls(&sets, 40, 0.5).unwrap();
        assert_eq!(result.by_crits.len(), 2);
        assert!((result.kill_chance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn crit_chance_follows_generation_unless_overridden() {
        let config = CalcConfig::default();
        assert_eq!(crit_chance(Generation::Gen4, &config), 1.0 / 16.0);
        assert_eq!(crit_chance(Generation::LetsGo, &config), 1.0 / 24.0);
        let fixed = CalcConfig {
            crit_chance_override: Some(0.5),
            ..CalcConfig::default()
        };
        assert_eq!(crit_chance(Generation::Gen9, &fixed), 0.5);
    }

    #[test]
    fn zero_threshold_always_succeeds() {
        let result = combine_rolls(&[RollSet::new(flat(0))], 0, 0.0).unwrap();
        assert_eq!(result.kill_chance, 1.0);
    }

    #[test]
    fn hit_count_is_bounded() {
        let sets = vec![RollSet::new(flat(10)).with_critical(flat(15)); 64];
        assert_eq!(
            combine_rolls(&sets, 100, 1.0 / 24.0),
            Err(FormulaError::TooManyHits { hits: 64, max: 8 })
        );
        let most = vec![RollSet::new(flat(10)).with_critical(flat(15)); CalcConfig::MAX_HITS];
        let result = combine_rolls(&most, 80, 1.0 / 24.0).unwrap();
        assert_eq!(result.by_crits.len(), CalcConfig::MAX_HITS + 1);
        assert!((result.kill_chance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unreachable_thresholds_short_circuit() {
        let result = combine_rolls(&[RollSet::new(ramp(10))], u32::MAX, 0.0).unwrap();
        assert_eq!(result.without_crits().unwrap().successes, 0);
        assert_eq!(result.kill_chance, 0.0);

        let huge = RollSet::new(flat(u32::MAX));
        assert!(matches!(
            combine_rolls(&[huge], u32::MAX, 0.0),
            Err(FormulaError::ThresholdTooLarge { .. })
        ));
    }
}
