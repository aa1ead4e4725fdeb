use crate::config::CalcConfig;
use crate::lang::context::EvalContext;
use crate::lang::error::EvalError;
use crate::lang::suggest::suggest;
use crate::stats::{ModifierHypothesis, Stat};

use super::ast::{Condition, ConditionValue, LogicalOperator, RangePattern, StatCondition};

impl Condition {
    /// Evaluates against the context's source tracker.
    ///
    /// `&&` and `||` short-circuit left to right.
    pub fn evaluate(&self, context: &EvalContext<'_>) -> Result<bool, EvalError> {
        match self {
            Condition::Stat(term) => term.evaluate(context),
            Condition::Logical {
                operator,
                left,
                right,
            } => {
                let left = left.evaluate(context)?;
                match (operator, left) {
                    (LogicalOperator::And, false) => Ok(false),
                    (LogicalOperator::Or, true) => Ok(true),
                    _ => right.evaluate(context),
                }
            }
        }
    }
}

impl StatCondition {
    pub fn evaluate(&self, context: &EvalContext<'_>) -> Result<bool, EvalError> {
        let stat: Stat = self.stat_name.parse().map_err(|_| EvalError::UnknownStat {
            name: self.stat_name.clone(),
            suggestion: suggest(&self.stat_name, Stat::NAMES, context.config.suggestion_distance),
        })?;

        let prepare = |pattern: &RangePattern, ceiling: u32| -> Result<RangePattern, EvalError> {
            pattern.validate()?;
            if self.inverted {
                pattern.invert_within(ceiling)
            } else {
                Ok(*pattern)
            }
        };

        match &self.value {
            // Stat values are unbounded above, unlike hereditary values.
            ConditionValue::Range(pattern) => {
                let pattern = prepare(pattern, u32::MAX)?;
                let level = context.require_level(&self.stat_name)?;
                let tracker = context.tracker(&self.stat_name)?;
                let values = tracker.possible_stat_values(&tracker.infer(), stat, level);
                Ok(pattern.matches_values(&values))
            }
            ConditionValue::Triple(triple) => {
                let triple = triple.try_map(|pattern| prepare(pattern, CalcConfig::MAX_IV))?;
                let tracker = context.tracker(&self.stat_name)?;
                let inferred = tracker.infer();
                Ok(ModifierHypothesis::ALL.into_iter().any(|hypothesis| {
                    triple
                        .get(hypothesis)
                        .matches_domain(inferred.filtered_domain(stat, hypothesis))
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TrackerCommand, apply_command};
    use crate::lang::condition::parse_condition;
    use crate::state::{TrackerRegistry, TrackerSpec};
    use crate::stats::{Generation, Nature, StatLine};

    fn registry() -> TrackerRegistry {
        let spec = TrackerSpec::new("Rival", Generation::Gen4, "45/49/49/65/65/45".parse().unwrap())
            .with_starting_level(5)
            .with_nature(Nature::Adamant)
            .with_static_iv(Stat::Speed, 31);
        let state = apply_command(&TrackerRegistry::new(), &TrackerCommand::register(spec)).unwrap();
        let mut observed = StatLine::splat(None);
        observed.hp = Some(20);
        apply_command(&state, &TrackerCommand::record("Rival", 5, observed)).unwrap()
    }

    fn check(source: &str, level: Option<u32>) -> Result<bool, EvalError> {
        let registry = registry();
        let config = CalcConfig::default();
        let mut context = EvalContext::new(&registry, &config).with_source("Rival");
        if let Some(level) = level {
            context = context.with_level(level);
        }
        parse_condition(source).unwrap().evaluate(&context)
    }

    #[test]
    fn numeric_terms_match_possible_values_at_level() {
        assert_eq!(check("hp = 20", Some(5)), Ok(true));
        assert_eq!(check("hp = 21+", Some(5)), Ok(false));
        assert_eq!(check("hp = 15-25", Some(5)), Ok(true));
        assert_eq!(
            check("hp = 20", None),
            Err(EvalError::MissingLevel { stat: "hp".into() })
        );
    }

    #[test]
    fn triples_match_nature_filtered_domains() {
        // HP only has the neutral hypothesis: iv 10..=29 from the observation.
        assert_eq!(check("hp = */25-31/*", None), Ok(true));
        assert_eq!(check("hp = */30-31/*", None), Ok(false));
        assert_eq!(check("hp = 0-31/*/*", None), Ok(false));
        assert_eq!(check("hp = x/*/*", None), Ok(true));
        // Adamant boosts attack, so only its boosted domain remains.
        assert_eq!(check("attack = */?/*", None), Ok(false));
        assert_eq!(check("attack = */*/?", None), Ok(true));
        assert_eq!(check("speed = */31/*", None), Ok(true));
        assert_eq!(check("speed = */30-/*", None), Ok(false));
    }

    #[test]
    fn logical_operators_combine_terms() {
        assert_eq!(check("hp = 20 && attack = */*/?", Some(5)), Ok(true));
        assert_eq!(check("hp = 19 && attack = */*/?", Some(5)), Ok(false));
        assert_eq!(check("hp = 19 || attack = */*/?", Some(5)), Ok(true));
    }

    #[test]
    fn inverting_a_bounded_range_is_an_error() {
        assert_eq!(check("hp = ~31-31", Some(5)), Err(EvalError::BoundedInversion));
        assert_eq!(check("hp = ~*/0+/*", None), Ok(false));
        assert_eq!(check("attack = ~*/0+/*", None), Ok(true));
    }

    #[test]
    fn numeric_inversion_uses_the_stat_value_domain() {
        // 31- covers every hereditary value but not every stat value.
        assert!(matches!(
            check("hp = ~31-", Some(5)),
            Err(EvalError::UnsupportedInversion { .. })
        ));
        assert_eq!(check("hp = ~0+", Some(5)), Ok(false));
        assert_eq!(check("hp = ~*", Some(5)), Ok(false));
        assert_eq!(check("hp = ~*/31-/*", None), Ok(false));
    }

    #[test]
    fn malformed_ranges_fail_before_matching() {
        assert_eq!(
            check("hp = 9-3", Some(5)),
            Err(EvalError::MalformedRange { from: 9, to: 3 })
        );
    }

    #[test]
    fn unknown_stats_get_suggestions() {
        assert_eq!(
            check("speeed = 1", Some(5)),
            Err(EvalError::UnknownStat {
                name: "speeed".into(),
                suggestion: Some("speed".into()),
            })
        );
    }
}
