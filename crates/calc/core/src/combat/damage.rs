//! Sixteen-roll damage calculation.

use crate::config::CalcConfig;
use crate::error::FormulaError;
use crate::stats::Generation;

use super::modifiers::ModifierStages;

/// One damage value per random factor, lowest factor first.
pub type DamageRolls = [u32; CalcConfig::ROLL_COUNT];

/// Generations 1 and 2 cap the base term before the `+ 2`.
const EARLY_BASE_CAP: u64 = 997;

/// Random factors in percent: 85, 86, ..., 100.
pub const fn random_factors() -> [u32; CalcConfig::ROLL_COUNT] {
    let mut factors = [0; CalcConfig::ROLL_COUNT];
    let mut index = 0;
    while index < CalcConfig::ROLL_COUNT {
        factors[index] = CalcConfig::RANDOM_FLOOR + index as u32;
        index += 1;
    }
    factors
}

/// Calculate the sixteen damage rolls of one attack.
///
/// # Formula
///
/// ```text
/// level_term = floor(2 * level / 5) + 2
/// power      = fold(base_power, power, floor(acc * m))
/// base       = floor(floor(level_term * power * attack / defense) / 50) + 2
/// roll[r]    = fold(post_random, floor(fold(pre_random, base, trunc(acc * m)) * r / 100), trunc(acc * m))
/// ```
///
/// Generations 1 and 2 cap `base` at 997 + 2.
/// Truncation happens after every single multiplication. Which modifier goes
/// into which stage is generation-specific; see [`super::DamageScenario`].
///
/// # Errors
///
/// [`FormulaError::ZeroDefense`] when `defense` is 0 and
/// [`FormulaError::InvalidModifier`] for negative or non-finite modifiers.
pub fn damage_rolls(
    level: u32,
    power: u32,
    attack: u32,
    defense: u32,
    stages: &ModifierStages,
    generation: Generation,
) -> Result<DamageRolls, FormulaError> {
    if defense == 0 {
        return Err(FormulaError::ZeroDefense);
    }
    stages.validate()?;

    let level_term = 2 * u64::from(level) / 5 + 2;
    let power = stages
        .base_power
        .iter()
        .fold(f64::from(power), |acc, m| (acc * m).floor());
    let scaled = ((level_term as f64 * power).floor() as u64).saturating_mul(u64::from(attack))
        / u64::from(defense);
    let mut base = scaled / 50;
    if generation.number() <= 2 {
        base = base.min(EARLY_BASE_CAP);
    }
    base += 2;

    let pre = fold_truncating(base, &stages.pre_random);
    let factors = random_factors();
    let mut rolls = [0; CalcConfig::ROLL_COUNT];
    for (roll, factor) in rolls.iter_mut().zip(factors) {
        let randomized = pre.saturating_mul(u64::from(factor)) / 100;
        *roll = saturate(fold_truncating(randomized, &stages.post_random));
    }
    Ok(rolls)
}

fn fold_truncating(start: u64, modifiers: &[f64]) -> u64 {
    modifiers
        .iter()
        .fold(start, |acc, m| (acc as f64 * m).trunc() as u64)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// `min-max` label of a roll set, or the single value when all rolls agree.
pub fn roll_label(rolls: &DamageRolls) -> String {
    let (min, max) = roll_bounds(rolls);
    if min == max {
        min.to_string()
    } else {
        format!("{min}-{max}")
    }
}

/// Lowest and highest roll.
pub fn roll_bounds(rolls: &DamageRolls) -> (u32, u32) {
    let min = rolls.iter().copied().min().unwrap_or(0);
    let max = rolls.iter().copied().max().unwrap_or(0);
    (min, max)
}
