//! Combine the rolls of consecutive hits against a kill threshold.

use anyhow::{Context, Result};
use calc_core::combat::crit_chance;
use calc_core::{DamageRolls, Generation, MultiRollResult, RollSet, combine_rolls};
use clap::Parser;
use console::style;

use crate::session::ContentArgs;

/// Combine the rolls of consecutive hits against a kill threshold
#[derive(Parser)]
pub struct Rolls {
    /// HP the summed damage has to reach
    #[arg(short, long)]
    threshold: u32,

    /// One set per hit: 16 comma-separated rolls, then optionally `;` and the
    /// 16 critical-hit rolls
    #[arg(value_name = "SET", required = true, value_parser = parse_roll_set)]
    sets: Vec<RollSet>,

    /// Ruleset for the default critical-hit chance
    #[arg(short, long, default_value = "9")]
    generation: Generation,

    /// Fixed critical-hit chance, overriding config and generation
    #[arg(long)]
    crit_chance: Option<f64>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Rolls {
    pub fn execute(self, content: &ContentArgs) -> Result<()> {
        let mut config = content.load_config()?;
        if let Some(chance) = self.crit_chance {
            if !(0.0..=1.0).contains(&chance) {
                anyhow::bail!("--crit-chance must lie in [0, 1], got {chance}");
            }
            config.crit_chance_override = Some(chance);
        }
        let chance = crit_chance(self.generation, &config);
        tracing::debug!(hits = self.sets.len(), chance, "combining rolls");

        let result = combine_rolls(&self.sets, self.threshold, chance)
            .with_context(|| format!("combining {} roll set(s)", self.sets.len()))?;
        if self.json {
            let json =
                serde_json::to_string_pretty(&result).context("Failed to serialize rolls")?;
            println!("{json}");
        } else {
            print_result(&result, chance);
        }
        Ok(())
    }
}

fn print_result(result: &MultiRollResult, chance: f64) {
    println!(
        "{} {} hit(s) vs {} {}",
        style("Rolls:").bold().yellow(),
        result.hits,
        result.threshold,
        style(format!("(crit chance {:.4})", chance)).dim()
    );
    for bucket in &result.by_crits {
        println!(
            "  {} crit(s): {}/{} tuples over {} combination(s), p = {:.4}",
            bucket.crits, bucket.successes, bucket.outcomes, bucket.combinations, bucket.probability
        );
    }
    println!(
        "{} {}",
        style("Kill chance:").bold().yellow(),
        style(format!("{:.2}%", result.kill_chance * 100.0)).bold()
    );
}

fn parse_roll_set(raw: &str) -> Result<RollSet, String> {
    let (normal, critical) = match raw.split_once(';') {
        Some((normal, critical)) => (normal, Some(critical)),
        None => (raw, None),
    };
    let set = RollSet::new(parse_rolls(normal)?);
    match critical {
        Some(critical) => Ok(set.with_critical(parse_rolls(critical)?)),
        None => Ok(set),
    }
}

fn parse_rolls(raw: &str) -> Result<DamageRolls, String> {
    let rolls = raw
        .split(',')
        .map(|roll| {
            roll.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid roll '{}': {e}", roll.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let count = rolls.len();
    DamageRolls::try_from(rolls).map_err(|_| format!("expected 16 rolls, got {count}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIXTEEN: &str = "10,10,10,11,11,11,12,12,12,13,13,13,14,14,14,14";

    #[test]
    fn roll_sets_parse_with_optional_crits() {
        let plain = parse_roll_set(SIXTEEN).unwrap();
        assert_eq!(plain.normal[15], 14);
        assert_eq!(plain.critical, None);

        let doubled = format!("{SIXTEEN};{}", "20,".repeat(15) + "21");
        let with_crit = parse_roll_set(&doubled).unwrap();
        assert_eq!(with_crit.critical.map(|rolls| rolls[15]), Some(21));
    }

    #[test]
    fn wrong_roll_counts_are_rejected() {
        assert_eq!(
            parse_roll_set("1,2,3").unwrap_err(),
            "expected 16 rolls, got 3"
        );
        assert!(parse_roll_set("1,2,x").unwrap_err().starts_with("invalid roll 'x'"));
    }

    #[test]
    fn arguments_collect_every_set() {
        let rolls = Rolls::parse_from(["rolls", "-t", "24", SIXTEEN, SIXTEEN, "-g", "4"]);
        assert_eq!(rolls.sets.len(), 2);
        assert_eq!(rolls.generation, Generation::Gen4);
        let result = combine_rolls(&rolls.sets, rolls.threshold, 0.0).unwrap();
        assert!(result.kill_chance > 0.0 && result.kill_chance < 1.0);
    }
}
