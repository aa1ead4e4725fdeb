//! Calc evaluation: every expression yields the set of outcomes consistent
//! with the tracker's current uncertainty.

use crate::lang::context::EvalContext;
use crate::lang::error::EvalError;
use crate::lang::suggest::suggest;
use crate::stats::Stat;

use super::ast::{CalcExpr, StatRef};

/// Sorted, deduplicated outcomes of one expression.
pub type Outcomes = Vec<f64>;

impl CalcExpr {
    /// Evaluates to every possible outcome.
    ///
    /// Binary operations combine the full cross product of their operands,
    /// so nested multi-valued stat references multiply. Callers that print
    /// outcomes should cap them with `CalcConfig::max_outcomes`.
    pub fn evaluate(&self, context: &EvalContext<'_>) -> Result<Outcomes, EvalError> {
        let outcomes = match self {
            CalcExpr::Number(value) => vec![*value],
            CalcExpr::Variable(name) => vec![lookup(context, name)?],
            CalcExpr::Stat(reference) => stat_outcomes(context, *reference)?,
            CalcExpr::Function { function, argument } => argument
                .evaluate(context)?
                .into_iter()
                .map(|x| function.apply(x))
                .collect(),
            CalcExpr::Negate(inner) => inner.evaluate(context)?.into_iter().map(|x| -x).collect(),
            CalcExpr::Operation {
                operator,
                left,
                right,
            } => {
                let left = left.evaluate(context)?;
                let right = right.evaluate(context)?;
                let mut combined = Vec::with_capacity(left.len() * right.len());
                for l in &left {
                    for r in &right {
                        combined.push(operator.apply(*l, *r));
                    }
                }
                combined
            }
        };
        Ok(normalize(outcomes))
    }
}

fn normalize(mut outcomes: Outcomes) -> Outcomes {
    outcomes.sort_by(f64::total_cmp);
    outcomes.dedup_by(|a, b| a.total_cmp(b).is_eq());
    outcomes
}

fn lookup(context: &EvalContext<'_>, name: &str) -> Result<f64, EvalError> {
    match context.variables.get(name) {
        Some(variable) => variable.as_number().ok_or_else(|| EvalError::NonNumericVariable {
            name: name.to_string(),
        }),
        None => {
            let known = context
                .variables
                .keys()
                .map(String::as_str)
                .chain(Stat::NAMES)
                .chain([StatRef::STARTING_LEVEL, StatRef::CAUGHT_LEVEL]);
            Err(EvalError::UnknownVariable {
                name: name.to_string(),
                suggestion: suggest(name, known, context.config.suggestion_distance),
            })
        }
    }
}

fn stat_outcomes(context: &EvalContext<'_>, reference: StatRef) -> Result<Outcomes, EvalError> {
    let label = reference.to_string();
    let tracker = context.tracker(&label)?;
    match reference {
        StatRef::StartingLevel => Ok(vec![f64::from(tracker.spec.starting_level)]),
        StatRef::CaughtLevel => {
            let level = match tracker.spec.caught_level {
                Some(level) => level,
                None => context.require_level(&label)?,
            };
            Ok(vec![f64::from(level)])
        }
        StatRef::Stat(stat) => {
            let level = context.require_level(&label)?;
            let inferred = tracker.infer();
            Ok(tracker
                .possible_stat_values(&inferred, stat, level)
                .into_iter()
                .map(f64::from)
                .collect())
        }
    }
}
