//! Evaluate a stat condition against a replayed scenario.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_core::parse_condition;
use clap::Parser;
use console::style;

use crate::session::{ContentArgs, Session};

use super::parse_failure;

/// Evaluate a stat condition against a scenario
#[derive(Parser)]
pub struct Check {
    /// Condition, e.g. `atk = */*/20+ && spe = 31`
    #[arg(value_name = "CONDITION")]
    condition: String,

    /// Scenario file (RON)
    #[arg(short, long, value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Tracker the condition reads
    #[arg(short, long, value_name = "NAME")]
    tracker: String,

    /// Level for numeric terms (stat values rather than IV triples)
    #[arg(short, long)]
    level: Option<u32>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Check {
    pub fn execute(self, content: &ContentArgs) -> Result<()> {
        let condition =
            parse_condition(&self.condition).map_err(|e| parse_failure(&self.condition, &e))?;
        let session = Session::load(content, &self.scenario)?;
        session.tracker(&self.tracker)?;

        let context = session.context(&session.variables, Some(&self.tracker), self.level);
        let holds = condition
            .evaluate(&context)
            .with_context(|| format!("evaluating {condition}"))?;

        if self.json {
            println!("{}", serde_json::json!({ "condition": condition.to_string(), "holds": holds }));
        } else if holds {
            println!("{}", style("true").green().bold());
        } else {
            println!("{}", style("false").red().bold());
        }
        Ok(())
    }
}
