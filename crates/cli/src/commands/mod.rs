//! Command implementations for routecalc
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod calc;
mod check;
mod damage;
mod replay;
mod rolls;

pub use calc::Calc;
pub use check::Check;
pub use damage::Damage;
pub use replay::Replay;
pub use rolls::Rolls;

use calc_core::inference::IvRangeSet;
use calc_core::lang::ParseError;
use calc_core::{CalcError, ModifierHypothesis};
use console::style;

/// Turns a parse error into a report that points at the offending text.
pub(crate) fn parse_failure(source: &str, error: &ParseError) -> anyhow::Error {
    let marker_width = source
        .get(error.span.start..error.span.end)
        .map_or(1, |text| text.chars().count().max(1));
    let indent = " ".repeat(error.column.saturating_sub(1));
    anyhow::anyhow!(
        "{} [{}]\n  {source}\n  {indent}{}",
        error,
        error.error_code(),
        "^".repeat(marker_width)
    )
}

/// `neg 0-9  neu 10-31  pos x`, skipping nothing so columns line up.
pub(crate) fn hypothesis_columns(ranges: &IvRangeSet) -> String {
    ModifierHypothesis::ALL
        .into_iter()
        .map(|hypothesis| {
            let range = ranges.get(hypothesis);
            let text = format!("{:>6}", range.to_string());
            let text = if range.is_empty() {
                style(text).dim().to_string()
            } else {
                text
            };
            format!("{} {text}", short_name(hypothesis))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn short_name(hypothesis: ModifierHypothesis) -> &'static str {
    match hypothesis {
        ModifierHypothesis::Reduced => "neg",
        ModifierHypothesis::Neutral => "neu",
        ModifierHypothesis::Boosted => "pos",
    }
}

/// Parses `name=value` pairs for `--var`.
pub(crate) fn parse_variable(raw: &str) -> Result<(String, calc_core::Variable), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let value = value.trim();
    let variable = if let Ok(number) = value.parse::<f64>() {
        calc_core::Variable::Number(number)
    } else if let Ok(flag) = value.parse::<bool>() {
        calc_core::Variable::Bool(flag)
    } else {
        calc_core::Variable::Text(value.to_string())
    };
    Ok((name.to_string(), variable))
}
