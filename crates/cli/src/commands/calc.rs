//! Evaluate a calc expression against a replayed scenario.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_core::{Variable, parse_calc};
use clap::Parser;
use console::style;

use crate::session::{ContentArgs, Session};

use super::{parse_failure, parse_variable};

/// Evaluate a calc expression against a scenario
#[derive(Parser)]
pub struct Calc {
    /// Expression, e.g. `floor(attack * 1.5) - rivalDefense`
    #[arg(value_name = "EXPR")]
    expression: String,

    /// Scenario file (RON)
    #[arg(short, long, value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Tracker that bare stat names read from
    #[arg(short, long, value_name = "NAME")]
    tracker: Option<String>,

    /// Level at which stat names are evaluated
    #[arg(short, long)]
    level: Option<u32>,

    /// Extra document variables, overriding the scenario's
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    vars: Vec<(String, Variable)>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Calc {
    pub fn execute(self, content: &ContentArgs) -> Result<()> {
        let expression =
            parse_calc(&self.expression).map_err(|e| parse_failure(&self.expression, &e))?;
        let session = Session::load(content, &self.scenario)?;
        if let Some(name) = &self.tracker {
            session.tracker(name)?;
        }

        let mut variables = session.variables.clone();
        variables.extend(self.vars);

        let context = session.context(&variables, self.tracker.as_deref(), self.level);
        let outcomes = expression
            .evaluate(&context)
            .with_context(|| format!("evaluating {expression}"))?;

        let limit = session.config.max_outcomes;
        if outcomes.len() > limit {
            anyhow::bail!(
                "{} outcomes exceed max_outcomes ({limit}); narrow the expression or raise the limit",
                outcomes.len()
            );
        }
        tracing::debug!(%expression, outcomes = outcomes.len(), "evaluated");

        if self.json {
            println!("{}", serde_json::to_string(&outcomes)?);
        } else if outcomes.is_empty() {
            println!("{}", style("no possible values").red());
        } else {
            let values: Vec<String> = outcomes.iter().map(f64::to_string).collect();
            println!("{}", values.join(", "));
        }
        Ok(())
    }
}
