//! Stat vocabulary and the six-field stat line.

use core::fmt;
use core::str::FromStr;

/// The six battle stats.
///
/// Parsing accepts the canonical camelCase names plus the short aliases used
/// in route documents (`atk`, `spa`, `spe`, ...), case-insensitively.
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
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(ascii_case_insensitive)]
pub enum Stat {
    #[strum(to_string = "hp")]
    Hp,
    #[strum(to_string = "attack", serialize = "atk")]
    Attack,
    #[strum(to_string = "defense", serialize = "def")]
    Defense,
    #[strum(
        to_string = "specialAttack",
        serialize = "spa",
        serialize = "spatk",
        serialize = "special_attack"
    )]
    SpecialAttack,
    #[strum(
        to_string = "specialDefense",
        serialize = "spd",
        serialize = "spdef",
        serialize = "special_defense"
    )]
    SpecialDefense,
    #[strum(to_string = "speed", serialize = "spe")]
    Speed,
}

impl Stat {
    /// All stats in canonical order.
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    /// Stats a nature can boost or reduce (everything except HP).
    pub const NATURE_STATS: [Stat; 5] = [
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    /// Every spelling accepted by the parser, used for diagnostics.
    pub const NAMES: [&'static str; 15] = [
        "hp",
        "attack",
        "atk",
        "defense",
        "def",
        "specialAttack",
        "spa",
        "spatk",
        "specialDefense",
        "spd",
        "spdef",
        "speed",
        "spe",
        "special_attack",
        "special_defense",
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_hp(self) -> bool {
        matches!(self, Stat::Hp)
    }

    /// Short label used in compact tables.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Atk",
            Stat::Defense => "Def",
            Stat::SpecialAttack => "SpA",
            Stat::SpecialDefense => "SpD",
            Stat::Speed => "Spe",
        }
    }
}

// ============================================================================
// StatLine
// ============================================================================

/// One value per battle stat.
///
/// The same shape carries base stats (`StatLine<u32>`), partial observations
/// (`StatLine<Option<u32>>`) and per-stat inference results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatLine<T> {
    pub hp: T,
    pub attack: T,
    pub defense: T,
    pub special_attack: T,
    pub special_defense: T,
    pub speed: T,
}

impl<T> StatLine<T> {
    pub fn new(hp: T, attack: T, defense: T, special_attack: T, special_defense: T, speed: T) -> Self {
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// Builds a line by evaluating `f` once per stat in canonical order.
    pub fn from_fn(mut f: impl FnMut(Stat) -> T) -> Self {
        Self {
            hp: f(Stat::Hp),
            attack: f(Stat::Attack),
            defense: f(Stat::Defense),
            special_attack: f(Stat::SpecialAttack),
            special_defense: f(Stat::SpecialDefense),
            speed: f(Stat::Speed),
        }
    }

    pub fn get(&self, stat: Stat) -> &T {
        match stat {
            Stat::Hp => &self.hp,
            Stat::Attack => &self.attack,
            Stat::Defense => &self.defense,
            Stat::SpecialAttack => &self.special_attack,
            Stat::SpecialDefense => &self.special_defense,
            Stat::Speed => &self.speed,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut T {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Attack => &mut self.attack,
            Stat::Defense => &mut self.defense,
            Stat::SpecialAttack => &mut self.special_attack,
            Stat::SpecialDefense => &mut self.special_defense,
            Stat::Speed => &mut self.speed,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Stat, &T) -> U) -> StatLine<U> {
        StatLine::from_fn(|stat| f(stat, self.get(stat)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, &T)> {
        Stat::ALL.into_iter().map(move |stat| (stat, self.get(stat)))
    }
}

impl<T: Copy> StatLine<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value)
    }
}

impl StatLine<Option<u32>> {
    /// Returns true if no stat carries a value.
    pub fn is_blank(&self) -> bool {
        self.iter().all(|(_, value)| value.is_none())
    }

    /// Overlays `other` onto `self`, keeping existing values where `other` is blank.
    pub fn merged(&self, other: &Self) -> Self {
        self.map(|stat, value| other.get(stat).or(*value))
    }
}

impl From<StatLine<u32>> for StatLine<Option<u32>> {
    fn from(line: StatLine<u32>) -> Self {
        line.map(|_, value| Some(*value))
    }
}

/// Error produced while parsing a slash-separated stat line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatLineParseError {
    #[error("expected 6 slash-separated values, found {0}")]
    WrongArity(usize),

    #[error("invalid value '{value}' for {stat}")]
    InvalidValue { stat: Stat, value: String },
}

fn split_line(s: &str) -> Result<[&str; 6], StatLineParseError> {
    let parts: Vec<&str> = s.split('/').map(str::trim).collect();
    <[&str; 6]>::try_from(parts).map_err(|parts| StatLineParseError::WrongArity(parts.len()))
}

impl FromStr for StatLine<u32> {
    type Err = StatLineParseError;

    /// Parses `45/49/49/65/65/45` in canonical stat order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_line(s)?;
        let mut line = StatLine::splat(0);
        for (stat, raw) in Stat::ALL.into_iter().zip(parts) {
            *line.get_mut(stat) = raw.parse().map_err(|_| StatLineParseError::InvalidValue {
                stat,
                value: raw.to_string(),
            })?;
        }
        Ok(line)
    }
}

impl FromStr for StatLine<Option<u32>> {
    type Err = StatLineParseError;

    /// Like the `u32` form, but `?`, `-`, `x` or an empty slot leaves the stat unset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_line(s)?;
        let mut line = StatLine::splat(None);
        for (stat, raw) in Stat::ALL.into_iter().zip(parts) {
            if matches!(raw, "" | "?" | "-" | "x") {
                continue;
            }
            *line.get_mut(stat) = Some(raw.parse().map_err(|_| {
                StatLineParseError::InvalidValue {
                    stat,
                    value: raw.to_string(),
                }
            })?);
        }
        Ok(line)
    }
}

impl fmt::Display for StatLine<u32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed
        )
    }
}
