//! Modifier hypotheses and the nature table.

use super::stat::Stat;

/// The multiplicative adjustment a nature may apply to one stat.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierHypothesis {
    /// ×0.9
    Reduced,
    /// ×1.0
    Neutral,
    /// ×1.1
    Boosted,
}

impl ModifierHypothesis {
    pub const ALL: [ModifierHypothesis; 3] = [
        ModifierHypothesis::Reduced,
        ModifierHypothesis::Neutral,
        ModifierHypothesis::Boosted,
    ];

    /// Multiplier as an integer percentage.
    pub const fn percent(self) -> u32 {
        match self {
            Self::Reduced => 90,
            Self::Neutral => 100,
            Self::Boosted => 110,
        }
    }

    pub const fn multiplier(self) -> f64 {
        self.percent() as f64 / 100.0
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-character marker used in compact tables.
    pub const fn sign(self) -> char {
        match self {
            Self::Reduced => '-',
            Self::Neutral => '=',
            Self::Boosted => '+',
        }
    }
}

/// One of the 25 natures.
///
/// Each nature boosts one non-HP stat and reduces one; the five natures that
/// boost and reduce the same stat are neutral.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    /// Natures in table order: row = boosted stat, column = reduced stat,
    /// both in `Stat::NATURE_STATS` order with speed in third position.
    pub const ALL: [Nature; 25] = [
        Nature::Hardy,
        Nature::Lonely,
        Nature::Brave,
        Nature::Adamant,
        Nature::Naughty,
        Nature::Bold,
        Nature::Docile,
        Nature::Relaxed,
        Nature::Impish,
        Nature::Lax,
        Nature::Timid,
        Nature::Hasty,
        Nature::Serious,
        Nature::Jolly,
        Nature::Naive,
        Nature::Modest,
        Nature::Mild,
        Nature::Quiet,
        Nature::Bashful,
        Nature::Rash,
        Nature::Calm,
        Nature::Gentle,
        Nature::Sassy,
        Nature::Careful,
        Nature::Quirky,
    ];

    /// Row/column order of the in-game nature table.
    const TABLE_ORDER: [Stat; 5] = [
        Stat::Attack,
        Stat::Defense,
        Stat::Speed,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
    ];

    pub fn boosted(self) -> Stat {
        Self::TABLE_ORDER[self as usize / 5]
    }

    pub fn reduced(self) -> Stat {
        Self::TABLE_ORDER[self as usize % 5]
    }

    pub fn is_neutral(self) -> bool {
        self.boosted() == self.reduced()
    }

    /// Looks up the nature for a (boosted, reduced) pair. HP never participates.
    pub fn from_pair(boosted: Stat, reduced: Stat) -> Option<Nature> {
        let row = Self::TABLE_ORDER.iter().position(|s| *s == boosted)?;
        let col = Self::TABLE_ORDER.iter().position(|s| *s == reduced)?;
        Some(Self::ALL[row * 5 + col])
    }

    /// The modifier this nature applies to `stat`.
    pub fn hypothesis_for(self, stat: Stat) -> ModifierHypothesis {
        if stat.is_hp() || self.is_neutral() {
            ModifierHypothesis::Neutral
        } else if stat == self.boosted() {
            ModifierHypothesis::Boosted
        } else if stat == self.reduced() {
            ModifierHypothesis::Reduced
        } else {
            ModifierHypothesis::Neutral
        }
    }
}
