use core::fmt;
use std::collections::BTreeSet;

use crate::config::CalcConfig;
use crate::inference::IvRange;
use crate::lang::error::EvalError;
use crate::stats::ModifierHypothesis;

/// One value pattern.
///
/// As a plain term it is matched against possible stat values; inside a
/// triple it is matched against one hypothesis' hereditary-value domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangePattern {
    /// `a-b`
    Bounded { from: u32, to: u32 },
    /// `n+`
    AtLeast(u32),
    /// `n-`
    AtMost(u32),
    /// `n`
    Exact(u32),
    /// `*`: places no constraint and never matches by itself.
    Wildcard,
    /// `?`: the domain has at least one value.
    Present,
    /// `x`: the domain is empty.
    Impossible,
}

impl RangePattern {
    pub const fn tag(&self) -> &'static str {
        match self {
            RangePattern::Bounded { .. } | RangePattern::Exact(_) => "boundedRange",
            RangePattern::AtLeast(_) | RangePattern::AtMost(_) => "unboundedRange",
            RangePattern::Wildcard | RangePattern::Present | RangePattern::Impossible => "ivRange",
        }
    }

    /// Complement within the hereditary domain.
    ///
    /// Only the patterns that cover the whole domain have a complement:
    /// `*` stays unconstrained, `0+` and `31-` become `x`.
    pub fn invert(&self) -> Result<RangePattern, EvalError> {
        self.invert_within(CalcConfig::MAX_IV)
    }

    /// Complement within `0..=ceiling`, e.g. `u32::MAX` for stat values.
    pub fn invert_within(&self, ceiling: u32) -> Result<RangePattern, EvalError> {
        match *self {
            RangePattern::Wildcard => Ok(RangePattern::Wildcard),
            RangePattern::AtLeast(0) => Ok(RangePattern::Impossible),
            RangePattern::AtMost(max) if max >= ceiling => Ok(RangePattern::Impossible),
            RangePattern::Bounded { .. } => Err(EvalError::BoundedInversion),
            other => Err(EvalError::UnsupportedInversion {
                pattern: other.to_string(),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), EvalError> {
        match *self {
            RangePattern::Bounded { from, to } if to < from => {
                Err(EvalError::MalformedRange { from, to })
            }
            _ => Ok(()),
        }
    }

    /// Whether any value in `domain` satisfies the pattern.
    pub fn matches_domain(&self, domain: IvRange) -> bool {
        let span = |from: u32, to: u32| IvRange::new(saturate(from), saturate(to));
        match *self {
            RangePattern::Wildcard => false,
            RangePattern::Present => !domain.is_empty(),
            RangePattern::Impossible => domain.is_empty(),
            RangePattern::Bounded { from, to } => domain.overlaps(&span(from, to)),
            RangePattern::AtLeast(min) => domain.overlaps(&span(min, CalcConfig::MAX_IV)),
            RangePattern::AtMost(max) => domain.overlaps(&span(0, max)),
            RangePattern::Exact(value) => domain.contains(value),
        }
    }

    /// Whether any of `values` satisfies the pattern.
    pub fn matches_values(&self, values: &BTreeSet<u32>) -> bool {
        match *self {
            RangePattern::Wildcard => false,
            RangePattern::Present => !values.is_empty(),
            RangePattern::Impossible => values.is_empty(),
            RangePattern::Bounded { from, to } => {
                from <= to && values.range(from..=to).next().is_some()
            }
            RangePattern::AtLeast(min) => values.range(min..).next().is_some(),
            RangePattern::AtMost(max) => values.range(..=max).next().is_some(),
            RangePattern::Exact(value) => values.contains(&value),
        }
    }
}

fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl fmt::Display for RangePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangePattern::Bounded { from, to } => write!(f, "{from}-{to}"),
            RangePattern::AtLeast(min) => write!(f, "{min}+"),
            RangePattern::AtMost(max) => write!(f, "{max}-"),
            RangePattern::Exact(value) => write!(f, "{value}"),
            RangePattern::Wildcard => f.write_str("*"),
            RangePattern::Present => f.write_str("?"),
            RangePattern::Impossible => f.write_str("x"),
        }
    }
}

/// `reduced/neutral/boosted` hereditary-value patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvPattern {
    pub reduced: RangePattern,
    pub neutral: RangePattern,
    pub boosted: RangePattern,
}

impl IvPattern {
    pub fn get(&self, hypothesis: ModifierHypothesis) -> RangePattern {
        match hypothesis {
            ModifierHypothesis::Reduced => self.reduced,
            ModifierHypothesis::Neutral => self.neutral,
            ModifierHypothesis::Boosted => self.boosted,
        }
    }

    pub fn try_map(
        &self,
        mut f: impl FnMut(&RangePattern) -> Result<RangePattern, EvalError>,
    ) -> Result<IvPattern, EvalError> {
        Ok(IvPattern {
            reduced: f(&self.reduced)?,
            neutral: f(&self.neutral)?,
            boosted: f(&self.boosted)?,
        })
    }
}

impl fmt::Display for IvPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.reduced, self.neutral, self.boosted)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionValue {
    /// Matched against possible stat values at the context level.
    Range(RangePattern),
    /// Matched against the nature-filtered hereditary domains.
    Triple(IvPattern),
}

impl ConditionValue {
    pub const fn tag(&self) -> &'static str {
        match self {
            ConditionValue::Range(pattern) => pattern.tag(),
            ConditionValue::Triple(_) => "ivRange",
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Range(pattern) => write!(f, "{pattern}"),
            ConditionValue::Triple(triple) => write!(f, "{triple}"),
        }
    }
}

/// `stat = [~]value`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatCondition {
    /// Kept as written; unknown names fail at evaluation with a suggestion.
    pub stat_name: String,
    pub inverted: bool,
    pub value: ConditionValue,
}

impl fmt::Display for StatCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tilde = if self.inverted { "~" } else { "" };
        write!(f, "{} = {tilde}{}", self.stat_name, self.value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOperator {
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "||")]
    Or,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Stat(StatCondition),
    Logical {
        operator: LogicalOperator,
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub const fn tag(&self) -> &'static str {
        match self {
            Condition::Stat(_) => "statExpression",
            Condition::Logical { .. } => "logicalExpression",
        }
    }

    pub fn logical(operator: LogicalOperator, left: Condition, right: Condition) -> Self {
        Condition::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Fully parenthesised source form.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Stat(term) => write!(f, "{term}"),
            Condition::Logical {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
        }
    }
}
