//! Print the damage table for one tracked stat.

use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_core::combat::Weather;
use calc_core::{DamageQuery, DamageReport, DamageScenario, Stat};
use clap::Parser;
use console::style;

use crate::session::{ContentArgs, Session};

use super::hypothesis_columns;

/// Print the damage table for one tracked stat
#[derive(Parser)]
pub struct Damage {
    /// Scenario file (RON)
    #[arg(short, long, value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Tracker whose stat varies
    #[arg(short, long, value_name = "NAME")]
    tracker: String,

    /// Tracker level
    #[arg(short, long)]
    level: u32,

    /// Varying stat; attack when attacking, defense when defending
    #[arg(long)]
    stat: Option<Stat>,

    /// Move base power
    #[arg(long)]
    power: u32,

    /// The opponent's relevant stat
    #[arg(long)]
    opponent_stat: u32,

    /// The tracker takes the hit; the attacker's level defaults to --level
    #[arg(long)]
    defending: bool,

    /// Attacker level when --defending
    #[arg(long, requires = "defending")]
    opponent_level: Option<u32>,

    #[arg(long)]
    crit: bool,

    #[arg(long)]
    stab: bool,

    /// Type effectiveness multiplier
    #[arg(long, default_value_t = 1.0)]
    effectiveness: f64,

    /// Move hits several targets
    #[arg(long)]
    spread: bool,

    /// Reflect or Light Screen is up
    #[arg(long)]
    screen: bool,

    /// Burned physical attacker
    #[arg(long)]
    burn: bool,

    /// neutral, boosting or weakening
    #[arg(long, default_value = "neutral")]
    weather: Weather,

    /// HP to beat; adds lethality buckets
    #[arg(long)]
    threshold: Option<u32>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Damage {
    fn query(&self) -> DamageQuery {
        let default_stat = if self.defending {
            Stat::Defense
        } else {
            Stat::Attack
        };
        let scenario = DamageScenario {
            critical: self.crit,
            stab: self.stab,
            effectiveness: self.effectiveness,
            spread: self.spread,
            screen: self.screen,
            weather: self.weather,
            burn: self.burn,
            ..DamageScenario::default()
        };

        let mut query = DamageQuery::new(
            self.stat.unwrap_or(default_stat),
            self.level,
            self.power,
            self.opponent_stat,
        )
        .with_scenario(scenario);
        if self.defending {
            query = query.defending(self.opponent_level.unwrap_or(self.level));
        }
        if let Some(threshold) = self.threshold {
            query = query.with_threshold(threshold);
        }
        query
    }

    pub fn execute(self, content: &ContentArgs) -> Result<()> {
        let session = Session::load(content, &self.scenario)?;
        let tracker = session.tracker(&self.tracker)?;
        let query = self.query();
        let report = query
            .run(tracker)
            .with_context(|| format!("damage table for {}", self.tracker))?;
        tracing::debug!(rows = report.compact.len(), "built damage table");

        if self.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize damage")?;
            println!("{json}");
            return Ok(());
        }

        println!(
            "{} {} {}",
            style(&self.tracker).bold().cyan(),
            style(format!("{} at level {}", query.stat, self.level)).bold(),
            style(format!("({}, power {}, opponent {})", query.role, self.power, self.opponent_stat))
                .dim()
        );
        print_report(&report, self.threshold);
        Ok(())
    }
}

fn print_report(report: &DamageReport, threshold: Option<u32>) {
    if report.compact.is_empty() {
        println!("  {}", style("no plausible values").red());
        return;
    }

    println!("{}", style("Damage:").bold().yellow());
    for range in &report.compact {
        println!("  {:>9}  {}", range.label, hypothesis_columns(&range.ivs));
    }

    if let Some(threshold) = threshold {
        println!();
        println!("{} {}", style("Lethality vs").bold().yellow(), threshold);
        for (successes, bucket) in report.lethality.iter().rev() {
            let label = format!("{successes:>2}/16");
            let label = match *successes {
                16 => style(label).green().bold(),
                0 => style(label).red(),
                _ => style(label).yellow(),
            };
            println!("  {label}  {}", hypothesis_columns(&bucket.ivs));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::combat::Role;

    #[test]
    fn defending_defaults_stat_and_attacker_level() {
        let damage = Damage::parse_from([
            "damage", "-s", "x.ron", "-t", "Starter", "-l", "12", "--power", "40",
            "--opponent-stat", "20", "--defending", "--weather", "boosting",
        ]);
        let query = damage.query();
        assert_eq!(query.stat, Stat::Defense);
        assert_eq!(query.role, Role::Defender);
        assert_eq!(query.opponent_level, Some(12));
        assert_eq!(query.scenario.weather, Weather::Boosting);
        assert_eq!(query.threshold, None);
    }

    #[test]
    fn attacking_uses_explicit_stat() {
        let damage = Damage::parse_from([
            "damage", "-s", "x.ron", "-t", "Starter", "-l", "12", "--power", "40",
            "--opponent-stat", "20", "--stat", "spa", "--threshold", "30", "--stab",
        ]);
        let query = damage.query();
        assert_eq!(query.stat, Stat::SpecialAttack);
        assert_eq!(query.role, Role::Attacker);
        assert!(query.scenario.stab);
        assert_eq!(query.threshold, Some(30));
    }
}
