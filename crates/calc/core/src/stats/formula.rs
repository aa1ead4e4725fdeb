//! Stat formulas per generation.
//!
//! Every intermediate result is floored before it is used, matching the
//! integer-only arithmetic of the games. Modifiers are applied as integer
//! percentages (`x * 110 / 100`), which floors exactly where a float
//! multiplication could land a hair below an integer.
//!
//! ```text
//! gen 1-2   other = floor(((base + iv) * 2 + floor(isqrt(ev) / 4)) * level / 100) + 5
//!           hp    = floor(((base + iv) * 2 + floor(isqrt(ev) / 4)) * level / 100) + level + 10
//! gen 3+    other = floor((floor((2 * base + iv + floor(ev / 4)) * level / 100) + 5) * nature)
//!           hp    = floor((2 * base + iv + floor(ev / 4)) * level / 100) + level + 10
//! lgpe      other = floor(floor((floor((2 * base + iv) * level / 100) + 5) * nature) * friendship) + av
//!           hp    = floor((2 * base + iv) * level / 100) + level + 10 + av
//! ```

use super::generation::Generation;
use super::nature::ModifierHypothesis;
use super::stat::Stat;

/// Inputs to a single stat computation.
///
/// `effort` is the effort value in numbered generations and the award value
/// in the regional variant. `friendship` only matters for the variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatParams {
    pub level: u32,
    pub base: u32,
    pub iv: u32,
    pub effort: u32,
    pub friendship: u32,
}

impl StatParams {
    pub const fn new(level: u32, base: u32, iv: u32, effort: u32) -> Self {
        Self {
            level,
            base,
            iv,
            effort,
            friendship: 0,
        }
    }

    #[must_use]
    pub const fn with_iv(mut self, iv: u32) -> Self {
        self.iv = iv;
        self
    }

    #[must_use]
    pub const fn with_friendship(mut self, friendship: u32) -> Self {
        self.friendship = friendship;
        self
    }
}

/// Computes a stat value.
///
/// HP ignores `modifier` in every generation, and generations without natures
/// ignore it for every stat. Arithmetic runs in `u128` and the result
/// saturates at `u32::MAX`.
pub fn calculate_stat(
    stat: Stat,
    params: &StatParams,
    modifier: ModifierHypothesis,
    generation: Generation,
) -> u32 {
    let value = if generation.is_lets_go() {
        lets_go_stat(stat, params, modifier)
    } else {
        numbered_stat(stat, params, modifier, generation)
    };
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Friendship bonus as an integer percentage: `100 + floor(10 * friendship / 255)`.
pub const fn friendship_percent(friendship: u32) -> u32 {
    let friendship = if friendship > 255 { 255 } else { friendship };
    100 + 10 * friendship / 255
}

fn numbered_stat(
    stat: Stat,
    params: &StatParams,
    modifier: ModifierHypothesis,
    generation: Generation,
) -> u128 {
    let (level, base, iv) = widen(params);
    let core = if generation.uses_effort_sqrt() {
        let effort_term = u128::from(params.effort.isqrt() / 4);
        ((base + iv) * 2 + effort_term) * level / 100
    } else {
        let effort_term = u128::from(params.effort / 4);
        (2 * base + iv + effort_term) * level / 100
    };

    if stat.is_hp() {
        return core + level + 10;
    }

    let unmodified = core + 5;
    if generation.has_natures() {
        apply_percent(unmodified, modifier.percent())
    } else {
        unmodified
    }
}

fn lets_go_stat(stat: Stat, params: &StatParams, modifier: ModifierHypothesis) -> u128 {
    let (level, base, iv) = widen(params);
    let award = u128::from(params.effort);
    let core = (2 * base + iv) * level / 100;
    if stat.is_hp() {
        return core + level + 10 + award;
    }
    let natured = apply_percent(core + 5, modifier.percent());
    apply_percent(natured, friendship_percent(params.friendship)) + award
}

#[inline]
fn widen(params: &StatParams) -> (u128, u128, u128) {
    (
        u128::from(params.level),
        u128::from(params.base),
        u128::from(params.iv),
    )
}

#[inline]
const fn apply_percent(value: u128, percent: u32) -> u128 {
    value * percent as u128 / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen4_boosted_reference_value() {
        let params = StatParams::new(50, 100, 31, 0);
        let value = calculate_stat(
            Stat::Attack,
            &params,
            ModifierHypothesis::Boosted,
            Generation::Gen4,
        );
        assert_eq!(value, 132);
    }

    #[test]
    fn hp_ignores_modifier() {
        let params = StatParams::new(50, 100, 31, 0);
        let reduced = calculate_stat(Stat::Hp, &params, ModifierHypothesis::Reduced, Generation::Gen5);
        let boosted = calculate_stat(Stat::Hp, &params, ModifierHypothesis::Boosted, Generation::Gen5);
        assert_eq!(reduced, boosted);
        // floor(231 * 50 / 100) + 50 + 10
        assert_eq!(reduced, 175);
    }

    #[test]
    fn early_generations_use_sqrt_effort_and_no_nature() {
        let params = StatParams::new(50, 100, 15, 65535);
        // isqrt(65535) = 255, / 4 = 63; ((115 * 2) + 63) * 50 / 100 = 146; + 5
        let value = calculate_stat(
            Stat::Speed,
            &params,
            ModifierHypothesis::Boosted,
            Generation::Gen2,
        );
        assert_eq!(value, 151);
        let hp = calculate_stat(Stat::Hp, &params, ModifierHypothesis::Neutral, Generation::Gen1);
        assert_eq!(hp, 146 + 60);
    }

    #[test]
    fn modern_effort_is_quartered() {
        let params = StatParams::new(100, 80, 0, 252);
        // (160 + 0 + 63) * 100 / 100 = 223; + 5 = 228
        let value = calculate_stat(
            Stat::Defense,
            &params,
            ModifierHypothesis::Neutral,
            Generation::Gen8,
        );
        assert_eq!(value, 228);
        let reduced = calculate_stat(
            Stat::Defense,
            &params,
            ModifierHypothesis::Reduced,
            Generation::Gen8,
        );
        assert_eq!(reduced, 205);
    }

    #[test]
    fn lets_go_applies_friendship_then_award_values() {
        let params = StatParams::new(50, 100, 31, 200).with_friendship(255);
        // core 115, +5 = 120, x1.1 = 132, x1.10 = 145, + 200
        let value = calculate_stat(
            Stat::Attack,
            &params,
            ModifierHypothesis::Boosted,
            Generation::LetsGo,
        );
        assert_eq!(value, 345);

        let hp = calculate_stat(Stat::Hp, &params, ModifierHypothesis::Neutral, Generation::LetsGo);
        assert_eq!(hp, 115 + 60 + 200);
    }

    #[test]
    fn friendship_percent_is_floored() {
        assert_eq!(friendship_percent(0), 100);
        assert_eq!(friendship_percent(25), 100);
        assert_eq!(friendship_percent(26), 101);
        assert_eq!(friendship_percent(255), 110);
        assert_eq!(friendship_percent(999), 110);
    }

    #[test]
    fn oversized_inputs_saturate() {
        let params = StatParams::new(100, 30_000_000, 31, 0);
        let hp = calculate_stat(Stat::Hp, &params, ModifierHypothesis::Neutral, Generation::Gen5);
        assert_eq!(hp, 60_000_031 + 110);

        let huge = StatParams::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX);
        let value = calculate_stat(
            Stat::Attack,
            &huge,
            ModifierHypothesis::Boosted,
            Generation::Gen9,
        );
        assert_eq!(value, u32::MAX);
    }
}
