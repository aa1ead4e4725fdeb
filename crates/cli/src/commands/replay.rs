//! Replay a scenario and print what every tracker has narrowed to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_core::inference::NatureResolution;
use calc_core::{InferredState, Stat, Tracker};
use clap::Parser;
use console::style;
use serde::Serialize;

use crate::session::{ContentArgs, Session};

use super::hypothesis_columns;

/// Replay a scenario and print the inferred ranges of every tracker
#[derive(Parser)]
pub struct Replay {
    /// Scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TrackerReport<'a> {
    name: &'a str,
    generation: String,
    evolution: usize,
    observations: usize,
    inferred: InferredState,
}

impl Replay {
    pub fn execute(self, content: &ContentArgs) -> Result<()> {
        let session = Session::load(content, &self.scenario)?;

        if self.json {
            let reports: Vec<TrackerReport<'_>> = session
                .registry
                .iter()
                .map(|tracker| TrackerReport {
                    name: tracker.name(),
                    generation: tracker.generation().to_string(),
                    evolution: tracker.evolution,
                    observations: tracker.timeline.len(),
                    inferred: tracker.infer(),
                })
                .collect();
            let json =
                serde_json::to_string_pretty(&reports).context("Failed to serialize replay")?;
            println!("{json}");
            return Ok(());
        }

        for tracker in session.registry.iter() {
            print_tracker(tracker);
        }
        if session.rejected > 0 {
            println!(
                "{}",
                style(format!(
                    "{} command(s) rejected; run with RUST_LOG=warn for details",
                    session.rejected
                ))
                .yellow()
            );
        }
        Ok(())
    }
}

fn print_tracker(tracker: &Tracker) {
    let inferred = tracker.infer();
    println!(
        "{} {}",
        style(tracker.name()).bold().cyan(),
        style(format!(
            "(gen {}, stage {}, {} observation(s))",
            tracker.generation(),
            tracker.evolution,
            tracker.timeline.len()
        ))
        .dim()
    );
    println!("  {} {}", style("Nature:").bold().yellow(), nature_line(&inferred.nature));

    for stat in Stat::ALL {
        let ranges = inferred.ranges.get(stat);
        println!(
            "  {:<15} {}  {} {:>6}",
            stat.to_string(),
            hypothesis_columns(ranges),
            style("all").bold(),
            ranges.combined.to_string()
        );
    }
    println!();
}

fn nature_line(resolution: &NatureResolution) -> String {
    if resolution.candidates.is_empty() && resolution.consistent.is_empty() {
        return style("not applicable").dim().to_string();
    }

    let confirmed = &resolution.confirmed;
    let mut line = match (confirmed.nature(), confirmed.boosted, confirmed.reduced) {
        (Some(nature), _, _) => nature.to_string(),
        (None, boosted, reduced) => format!(
            "+{} -{}",
            boosted.map_or("?".to_string(), |stat| stat.to_string()),
            reduced.map_or("?".to_string(), |stat| stat.to_string())
        ),
    };
    line.push_str(&format!(
        " ({} of {} consistent)",
        resolution.consistent.len(),
        resolution.candidates.len()
    ));
    if resolution.pinned {
        line.push_str(", pinned");
    }
    if resolution.contradiction {
        line.push_str(&format!(", {}", style("contradiction").red().bold()));
    }
    line
}
