//! Ruleset generations.

use core::str::FromStr;

use crate::config::CalcConfig;
use crate::error::FormulaError;

/// A ruleset version.
///
/// Numbered generations are ordered 1 through 9. `LetsGo` is the regional
/// variant that replaces effort values with award values and adds a
/// friendship multiplier; for damage and nature purposes it behaves like
/// generation 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Generation {
    #[strum(to_string = "1")]
    Gen1,
    #[strum(to_string = "2")]
    Gen2,
    #[strum(to_string = "3")]
    Gen3,
    #[strum(to_string = "4")]
    Gen4,
    #[strum(to_string = "5")]
    Gen5,
    #[strum(to_string = "6")]
    Gen6,
    #[strum(to_string = "7")]
    Gen7,
    #[strum(to_string = "8")]
    Gen8,
    #[strum(to_string = "9")]
    Gen9,
    #[strum(to_string = "lgpe")]
    LetsGo,
}

impl Generation {
    /// Creates a numbered generation, rejecting anything outside 1..=9.
    pub fn from_number(number: u8) -> Result<Self, FormulaError> {
        Ok(match number {
            1 => Self::Gen1,
            2 => Self::Gen2,
            3 => Self::Gen3,
            4 => Self::Gen4,
            5 => Self::Gen5,
            6 => Self::Gen6,
            7 => Self::Gen7,
            8 => Self::Gen8,
            9 => Self::Gen9,
            other => return Err(FormulaError::UnsupportedGeneration(other.to_string())),
        })
    }

    /// Ordinal used for generation comparisons.
    pub const fn number(self) -> u8 {
        match self {
            Self::Gen1 => 1,
            Self::Gen2 => 2,
            Self::Gen3 => 3,
            Self::Gen4 => 4,
            Self::Gen5 => 5,
            Self::Gen6 => 6,
            Self::Gen7 | Self::LetsGo => 7,
            Self::Gen8 => 8,
            Self::Gen9 => 9,
        }
    }

    pub const fn is_lets_go(self) -> bool {
        matches!(self, Self::LetsGo)
    }

    /// Natures (and therefore modifier hypotheses) exist from generation 3 on.
    pub const fn has_natures(self) -> bool {
        self.number() >= 3
    }

    /// Early generations feed effort through a square-root term.
    pub const fn uses_effort_sqrt(self) -> bool {
        self.number() <= 2
    }

    /// Largest per-stat effort input the stat formula accepts.
    pub const fn max_effort(self) -> u32 {
        if self.is_lets_go() {
            CalcConfig::MAX_AWARD_VALUE
        } else if self.uses_effort_sqrt() {
            CalcConfig::MAX_STAT_EXPERIENCE
        } else {
            CalcConfig::MAX_EFFORT_VALUE
        }
    }

    /// Default critical-hit probability as (numerator, denominator).
    pub const fn crit_chance(self) -> (u32, u32) {
        if self.number() >= 7 { (1, 24) } else { (1, 16) }
    }
}

impl FromStr for Generation {
    type Err = FormulaError;

    /// Accepts `4`, `gen4`, `lgpe` or `letsgo` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "lgpe" | "letsgo" | "lets_go" => Ok(Self::LetsGo),
            other => {
                let digits = other.strip_prefix("gen").unwrap_or(other);
                digits
                    .parse::<u8>()
                    .map_err(|_| FormulaError::UnsupportedGeneration(s.to_string()))
                    .and_then(Self::from_number)
            }
        }
    }
}

impl TryFrom<String> for Generation {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Generation> for String {
    fn from(generation: Generation) -> Self {
        generation.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_and_variant_generations() {
        assert_eq!("4".parse::<Generation>().unwrap(), Generation::Gen4);
        assert_eq!("Gen9".parse::<Generation>().unwrap(), Generation::Gen9);
        assert_eq!("LGPE".parse::<Generation>().unwrap(), Generation::LetsGo);
        assert_eq!(
            "10".parse::<Generation>(),
            Err(FormulaError::UnsupportedGeneration("10".to_string()))
        );
        assert!("zero".parse::<Generation>().is_err());
    }

    #[test]
    fn capabilities_follow_generation_number() {
        assert!(!Generation::Gen2.has_natures());
        assert!(Generation::Gen3.has_natures());
        assert!(Generation::LetsGo.has_natures());
        assert!(Generation::Gen1.uses_effort_sqrt());
        assert_eq!(Generation::LetsGo.number(), 7);
        assert_eq!(Generation::Gen6.crit_chance(), (1, 16));
        assert_eq!(Generation::Gen8.crit_chance(), (1, 24));
    }
}
