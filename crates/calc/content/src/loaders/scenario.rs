//! Scenario loader.
//!
//! A scenario is a replayable slice of a route document: tracker
//! declarations in directive-attribute form, the steps recorded against
//! them, and the document variables expressions may read.
//!
//! ```ron
//! (
//!     name: Some("Opening"),
//!     trackers: [
//!         {"name": "Starter", "generation": "4", "species": "Bulbasaur", "caughtLevel": "5"},
//!     ],
//!     steps: [
//!         Record(tracker: "Starter", level: 5, stats: "20/11/?/?/?/?"),
//!         Nature(tracker: "Starter", boosted: Some(attack), reduced: None),
//!     ],
//!     variables: {"rivalDefense": 12.0},
//! )
//! ```

use std::path::Path;

use anyhow::Context;
use calc_core::{
    DirectiveAttributes, EffortSegment, Stat, StatLine, TrackerCommand, TrackerSpec, Variables,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::species::SpeciesTable;

/// One recorded step, in the compact form scenario files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Stats seen at a level, as a stat line with `?` for unseen stats.
    Record {
        tracker: String,
        level: u32,
        stats: String,
    },
    Clear {
        tracker: String,
        level: u32,
    },
    Nature {
        tracker: String,
        #[serde(default)]
        boosted: Option<Stat>,
        #[serde(default)]
        reduced: Option<Stat>,
    },
    Evolve {
        tracker: String,
        stage: usize,
    },
    /// Opens an effort segment; `effort` is a full stat line.
    Effort {
        tracker: String,
        start_level: u32,
        effort: String,
        #[serde(default)]
        friendship: u32,
    },
    Reset {
        tracker: String,
    },
    ResetAll,
}

impl ScenarioStep {
    pub fn to_command(&self) -> LoadResult<TrackerCommand> {
        Ok(match self {
            Self::Record {
                tracker,
                level,
                stats,
            } => {
                let stats: StatLine<Option<u32>> = stats
                    .parse()
                    .with_context(|| format!("invalid stats '{stats}' for {tracker}"))?;
                TrackerCommand::record(tracker.as_str(), *level, stats)
            }
            Self::Clear { tracker, level } => TrackerCommand::clear(tracker.as_str(), *level),
            Self::Nature {
                tracker,
                boosted,
                reduced,
            } => TrackerCommand::pin_nature(tracker.as_str(), *boosted, *reduced),
            Self::Evolve { tracker, stage } => TrackerCommand::evolve(tracker.as_str(), *stage),
            Self::Effort {
                tracker,
                start_level,
                effort,
                friendship,
            } => {
                let effort: StatLine<u32> = effort
                    .parse()
                    .with_context(|| format!("invalid effort '{effort}' for {tracker}"))?;
                TrackerCommand::effort(
                    tracker.as_str(),
                    EffortSegment::new(*start_level, effort).with_friendship(*friendship),
                )
            }
            Self::Reset { tracker } => TrackerCommand::reset(tracker.as_str()),
            Self::ResetAll => TrackerCommand::ResetAll(calc_core::engine::ResetAll),
        })
    }
}

/// A parsed scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: Option<String>,
    pub trackers: Vec<DirectiveAttributes>,
    pub steps: Vec<ScenarioStep>,
    pub variables: Variables,
}

impl Scenario {
    /// Expands declarations and steps into reducer commands, in file order:
    /// every registration first, then every step.
    ///
    /// Declarations may name a `species` instead of spelling out
    /// `baseStats`; those are completed from `species`.
    pub fn commands(&self, species: &SpeciesTable) -> LoadResult<Vec<TrackerCommand>> {
        let mut commands = Vec::with_capacity(self.trackers.len() + self.steps.len());
        for (index, declaration) in self.trackers.iter().enumerate() {
            let mut attributes = declaration.clone();
            if !species.complete(&mut attributes) {
                anyhow::bail!(
                    "tracker #{index}: unknown species '{}'",
                    attributes.raw("species").unwrap_or_default()
                );
            }
            let spec = TrackerSpec::from_attributes(&attributes)
                .with_context(|| format!("tracker #{index}"))?;
            commands.push(TrackerCommand::register(spec));
        }
        for (index, step) in self.steps.iter().enumerate() {
            commands.push(step.to_command().with_context(|| format!("step #{index}"))?);
        }
        Ok(commands)
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        let scenario = Self::parse(&content)
            .with_context(|| format!("in scenario {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            trackers = scenario.trackers.len(),
            steps = scenario.steps.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}
