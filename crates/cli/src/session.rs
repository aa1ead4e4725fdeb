//! Content loading and scenario replay shared by the subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calc_content::{ConfigLoader, ScenarioLoader, SpeciesLoader, SpeciesTable};
use calc_core::lang::suggest;
use calc_core::{
    CalcConfig, CalcError, EvalContext, Tracker, TrackerCommand, TrackerEngine, TrackerRegistry,
    Variables,
};

/// Content files every subcommand may read.
#[derive(clap::Args, Debug, Clone)]
pub struct ContentArgs {
    /// Calculator configuration (TOML); defaults apply when unset
    #[arg(long, global = true, env = "ROUTECALC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Species table (RON); the bundled table is used when unset
    #[arg(long, global = true, env = "ROUTECALC_SPECIES", value_name = "FILE")]
    pub species: Option<PathBuf>,
}

impl ContentArgs {
    pub fn load_config(&self) -> Result<CalcConfig> {
        match &self.config {
            Some(path) => ConfigLoader::load(path),
            None => Ok(CalcConfig::default()),
        }
    }

    pub fn load_species(&self) -> Result<SpeciesTable> {
        match &self.species {
            Some(path) => SpeciesLoader::load(path),
            None => SpeciesLoader::bundled(),
        }
    }
}

/// A replayed scenario.
pub struct Session {
    pub config: CalcConfig,
    pub registry: TrackerRegistry,
    pub variables: Variables,
    /// Commands the reducer rejected during replay.
    pub rejected: usize,
}

impl Session {
    pub fn load(content: &ContentArgs, scenario_path: &Path) -> Result<Self> {
        let config = content.load_config()?;
        let species = content.load_species()?;
        let scenario = ScenarioLoader::load(scenario_path)?;
        let commands = scenario
            .commands(&species)
            .with_context(|| format!("in scenario {}", scenario_path.display()))?;

        tracing::info!(
            scenario = scenario.name.as_deref().unwrap_or("unnamed"),
            commands = commands.len(),
            "replaying scenario"
        );
        let (registry, rejected) = replay(&commands);

        Ok(Self {
            config,
            registry,
            variables: scenario.variables,
            rejected,
        })
    }

    /// Looks up a tracker, suggesting a close name when it is missing.
    pub fn tracker(&self, name: &str) -> Result<&Tracker> {
        if let Some(tracker) = self.registry.get(name) {
            return Ok(tracker);
        }
        match suggest(name, self.registry.names(), self.config.suggestion_distance) {
            Some(close) => anyhow::bail!("unknown tracker '{name}', did you mean '{close}'?"),
            None => anyhow::bail!("unknown tracker '{name}'"),
        }
    }

    pub fn context<'a>(
        &'a self,
        variables: &'a Variables,
        source: Option<&'a str>,
        level: Option<u32>,
    ) -> EvalContext<'a> {
        let mut context = EvalContext::new(&self.registry, &self.config).with_variables(variables);
        if let Some(source) = source {
            context = context.with_source(source);
        }
        if let Some(level) = level {
            context = context.with_level(level);
        }
        context
    }
}

/// Runs every command through the reducer. Rejected commands are logged and
/// skipped; the rest of the scenario still applies.
pub fn replay(commands: &[TrackerCommand]) -> (TrackerRegistry, usize) {
    let mut registry = TrackerRegistry::new();
    let mut rejected = 0;
    let mut engine = TrackerEngine::new(&mut registry);

    for command in commands {
        match engine.execute(command) {
            Ok(outcome) => tracing::debug!(
                command = command.as_ref(),
                tracker = outcome.tracker.as_deref().unwrap_or("-"),
                changes = ?outcome.changes,
                nonce = outcome.nonce,
                "applied"
            ),
            Err(error) => {
                rejected += 1;
                tracing::warn!(
                    command = command.as_ref(),
                    code = error.error_code(),
                    severity = ?error.severity(),
                    "rejected: {error}"
                );
            }
        }
    }

    (registry, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{Generation, StatLine, TrackerSpec};

    fn commands() -> Vec<TrackerCommand> {
        let spec = TrackerSpec::new("Starter", Generation::Gen4, StatLine::splat(50));
        vec![
            TrackerCommand::register(spec),
            TrackerCommand::evolve("Starter", 3),
            TrackerCommand::record("Starter", 5, "20/?/?/?/?/?".parse().unwrap()),
            TrackerCommand::record("Nobody", 5, StatLine::splat(None)),
        ]
    }

    #[test]
    fn replay_skips_rejected_commands() {
        let (registry, rejected) = replay(&commands());
        assert_eq!(rejected, 2);
        assert_eq!(registry.get("Starter").unwrap().timeline.len(), 1);
    }

    #[test]
    fn unknown_trackers_get_suggestions() {
        let (registry, rejected) = replay(&commands());
        let session = Session {
            config: CalcConfig::default(),
            registry,
            variables: Variables::new(),
            rejected,
        };
        assert!(session.tracker("Starter").is_ok());
        let error = session.tracker("Stater").unwrap_err();
        assert_eq!(error.to_string(), "unknown tracker 'Stater', did you mean 'Starter'?");
    }

    #[test]
    fn loads_scenario_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scenario.ron");
        std::fs::write(
            &path,
            r#"(
                trackers: [{"name": "Wild", "generation": "3", "species": "pidgey"}],
                steps: [Record(tracker: "Wild", level: 3, stats: "?/?/?/?/?/9")],
            )"#,
        )
        .unwrap();

        let content = ContentArgs {
            config: None,
            species: None,
        };
        let session = Session::load(&content, &path).unwrap();
        assert_eq!(session.rejected, 0);
        assert_eq!(session.registry.len(), 1);
    }
}
