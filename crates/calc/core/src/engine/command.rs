//! Tracker commands and their transitions.

use crate::config::CalcConfig;
use crate::state::{EffortSegment, Tracker, TrackerRegistry, TrackerSpec};
use crate::stats::{Generation, Stat, StatLine};

use super::errors::CommandError;
use super::reducer::RegistryReducer;
use super::transition::{TrackerFields, TrackerTransition};

/// A discrete mutation requested by the observation layer.
#[derive(Clone, Debug, PartialEq, Eq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TrackerCommand {
    Register(RegisterTracker),
    RecordStats(RecordStats),
    ClearObservation(ClearObservation),
    SetManualNature(SetManualNature),
    SetEvolution(SetEvolution),
    SetEffort(SetEffort),
    Reset(ResetTracker),
    ResetAll(ResetAll),
}

impl TrackerCommand {
    pub fn register(spec: TrackerSpec) -> Self {
        Self::Register(RegisterTracker { spec })
    }

    pub fn record(tracker: impl Into<String>, level: u32, stats: StatLine<Option<u32>>) -> Self {
        Self::RecordStats(RecordStats {
            tracker: tracker.into(),
            level,
            stats,
        })
    }

    pub fn clear(tracker: impl Into<String>, level: u32) -> Self {
        Self::ClearObservation(ClearObservation {
            tracker: tracker.into(),
            level,
        })
    }

    pub fn pin_nature(
        tracker: impl Into<String>,
        boosted: Option<Stat>,
        reduced: Option<Stat>,
    ) -> Self {
        Self::SetManualNature(SetManualNature {
            tracker: tracker.into(),
            boosted,
            reduced,
        })
    }

    pub fn evolve(tracker: impl Into<String>, evolution: usize) -> Self {
        Self::SetEvolution(SetEvolution {
            tracker: tracker.into(),
            evolution,
        })
    }

    pub fn effort(tracker: impl Into<String>, segment: EffortSegment) -> Self {
        Self::SetEffort(SetEffort {
            tracker: tracker.into(),
            segment,
        })
    }

    pub fn reset(tracker: impl Into<String>) -> Self {
        Self::Reset(ResetTracker {
            tracker: tracker.into(),
        })
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Register(command) => command.target(),
            Self::RecordStats(command) => command.target(),
            Self::ClearObservation(command) => command.target(),
            Self::SetManualNature(command) => command.target(),
            Self::SetEvolution(command) => command.target(),
            Self::SetEffort(command) => command.target(),
            Self::Reset(command) => command.target(),
            Self::ResetAll(command) => command.target(),
        }
    }
}

// ============================================================================
// Shared validation
// ============================================================================

fn tracker<'a>(state: &'a TrackerRegistry, name: &str) -> Result<&'a Tracker, CommandError> {
    state.get(name).ok_or_else(|| CommandError::UnknownTracker {
        name: name.to_string(),
    })
}

fn check_level(level: u32) -> Result<(), CommandError> {
    if (CalcConfig::MIN_LEVEL..=CalcConfig::MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(CommandError::LevelOutOfRange { level })
    }
}

fn check_effort(generation: Generation, effort: &StatLine<u32>) -> Result<(), CommandError> {
    let max = generation.max_effort();
    match effort.iter().find(|(_, value)| **value > max) {
        Some((stat, &value)) => Err(CommandError::EffortOutOfRange {
            stat,
            value,
            max,
            generation,
        }),
        None => Ok(()),
    }
}

/// Structural invariants every tracker upholds between commands.
pub fn check_invariants(tracker: &Tracker) -> Result<(), CommandError> {
    let violated = |detail: &'static str| CommandError::InvariantViolated {
        name: tracker.name().to_string(),
        detail,
    };
    let stages = tracker.spec.base_stats.len();

    if tracker.evolution >= stages {
        return Err(violated("current evolution stage has no base stats"));
    }
    if tracker.effort_segments.is_empty() {
        return Err(violated("effort schedule is empty"));
    }
    if tracker
        .effort_segments
        .windows(2)
        .any(|pair| pair[0].start_level > pair[1].start_level)
    {
        return Err(violated("effort segments are out of order"));
    }
    for observation in tracker.timeline.iter() {
        let key = observation.key;
        if key.evolution >= stages {
            return Err(violated("observation references a missing evolution stage"));
        }
        if key.segment >= tracker.effort_segments.len() {
            return Err(violated("observation references a missing effort segment"));
        }
        if check_level(key.level).is_err() {
            return Err(violated("observation level is outside 1..=100"));
        }
    }
    Ok(())
}

fn post_check(state: &TrackerRegistry, name: &str) -> Result<(), CommandError> {
    check_invariants(tracker(state, name)?)
}

// ============================================================================
// Register
// ============================================================================

/// Creates a tracker the first time a document references it.
///
/// Registering an existing name is a no-op: the first declaration wins until
/// the tracker is reset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterTracker {
    pub spec: TrackerSpec,
}

impl TrackerTransition for RegisterTracker {
    fn target(&self) -> Option<&str> {
        Some(&self.spec.name)
    }

    fn pre_validate(&self, _state: &TrackerRegistry) -> Result<(), CommandError> {
        let spec = &self.spec;
        if spec.name.trim().is_empty() {
            return Err(CommandError::EmptyName);
        }
        if spec.base_stats.is_empty() {
            return Err(CommandError::NoBaseStats {
                name: spec.name.clone(),
            });
        }
        for (stage, line) in spec.base_stats.iter().enumerate() {
            if let Some((stat, &value)) =
                line.iter().find(|(_, value)| **value > CalcConfig::MAX_BASE_STAT)
            {
                return Err(CommandError::BaseStatOutOfRange { stage, stat, value });
            }
        }
        check_level(spec.starting_level)?;
        if let Some(level) = spec.caught_level {
            check_level(level)?;
        }
        for (stat, value) in spec.static_ivs.iter() {
            if let Some(value) = *value
                && value > CalcConfig::MAX_IV
            {
                return Err(CommandError::StaticIvOutOfRange { stat, value });
            }
        }
        if spec.nature.is_some() && !spec.generation.has_natures() {
            return Err(CommandError::NatureUnavailable {
                generation: spec.generation,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        if reducer.register(Tracker::new(self.spec.clone())) {
            Ok(TrackerFields::REGISTERED)
        } else {
            Ok(TrackerFields::empty())
        }
    }

    fn post_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        post_check(state, &self.spec.name)
    }
}

// ============================================================================
// Observations
// ============================================================================

/// Records observed stats at a level under the current stage and segment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordStats {
    pub tracker: String,
    pub level: u32,
    pub stats: StatLine<Option<u32>>,
}

impl TrackerTransition for RecordStats {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        tracker(state, &self.tracker)?;
        check_level(self.level)?;
        if self.stats.is_blank() {
            return Err(CommandError::BlankObservation { level: self.level });
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let mut tracker = reducer
            .tracker(&self.tracker)
            .ok_or_else(|| CommandError::UnknownTracker {
                name: self.tracker.clone(),
            })?;
        tracker.record(self.level, self.stats);
        Ok(TrackerFields::OBSERVATIONS)
    }

    fn post_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        post_check(state, &self.tracker)
    }
}

/// Removes the observation at a level under the current stage and segment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClearObservation {
    pub tracker: String,
    pub level: u32,
}

impl TrackerTransition for ClearObservation {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        let tracker = tracker(state, &self.tracker)?;
        if tracker.timeline.get(&tracker.key_at(self.level)).is_none() {
            return Err(CommandError::NoObservation { level: self.level });
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let removed = reducer
            .tracker(&self.tracker)
            .and_then(|mut tracker| tracker.remove_observation(self.level));
        match removed {
            Some(_) => Ok(TrackerFields::OBSERVATIONS),
            None => Err(CommandError::NoObservation { level: self.level }),
        }
    }
}

// ============================================================================
// Nature pins, evolution, effort
// ============================================================================

/// Pins (or clears) the boosted and reduced stats by hand.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetManualNature {
    pub tracker: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boosted: Option<Stat>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reduced: Option<Stat>,
}

impl TrackerTransition for SetManualNature {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        let tracker = tracker(state, &self.tracker)?;
        let generation = tracker.generation();
        if !generation.has_natures() && (self.boosted.is_some() || self.reduced.is_some()) {
            return Err(CommandError::NatureUnavailable { generation });
        }
        for stat in [self.boosted, self.reduced].into_iter().flatten() {
            if stat.is_hp() {
                return Err(CommandError::StatNotAffectedByNature { stat });
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let mut tracker = reducer
            .tracker(&self.tracker)
            .ok_or_else(|| CommandError::UnknownTracker {
                name: self.tracker.clone(),
            })?;
        tracker.pin(self.boosted, self.reduced);
        Ok(TrackerFields::MANUAL_NATURE)
    }
}

/// Switches the current evolution stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEvolution {
    pub tracker: String,
    pub evolution: usize,
}

impl TrackerTransition for SetEvolution {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        let tracker = tracker(state, &self.tracker)?;
        let stages = tracker.spec.base_stats.len();
        if self.evolution >= stages {
            return Err(CommandError::EvolutionOutOfRange {
                evolution: self.evolution,
                stages,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let mut tracker = reducer
            .tracker(&self.tracker)
            .ok_or_else(|| CommandError::UnknownTracker {
                name: self.tracker.clone(),
            })?;
        let previous = tracker.set_evolution(self.evolution);
        if previous == self.evolution {
            Ok(TrackerFields::empty())
        } else {
            Ok(TrackerFields::EVOLUTION)
        }
    }

    fn post_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        post_check(state, &self.tracker)
    }
}

/// Opens a new effort segment starting at `segment.start_level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetEffort {
    pub tracker: String,
    pub segment: EffortSegment,
}

impl TrackerTransition for SetEffort {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        let tracker = tracker(state, &self.tracker)?;
        let level = self.segment.start_level;
        check_level(level)?;
        check_effort(tracker.generation(), &self.segment.effort)?;
        if let Some(current) = tracker.current_segment()
            && level < current.start_level
        {
            return Err(CommandError::EffortSegmentOutOfOrder {
                level,
                current: current.start_level,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let mut tracker = reducer
            .tracker(&self.tracker)
            .ok_or_else(|| CommandError::UnknownTracker {
                name: self.tracker.clone(),
            })?;
        tracker.open_segment(self.segment.clone());
        Ok(TrackerFields::EFFORT)
    }

    fn post_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        post_check(state, &self.tracker)
    }
}

// ============================================================================
// Resets
// ============================================================================

/// Returns one tracker to its declared defaults without removing it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetTracker {
    pub tracker: String,
}

impl TrackerTransition for ResetTracker {
    fn target(&self) -> Option<&str> {
        Some(&self.tracker)
    }

    fn pre_validate(&self, state: &TrackerRegistry) -> Result<(), CommandError> {
        tracker(state, &self.tracker).map(|_| ())
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        let mut tracker = reducer
            .tracker(&self.tracker)
            .ok_or_else(|| CommandError::UnknownTracker {
                name: self.tracker.clone(),
            })?;
        tracker.reset();
        Ok(TrackerFields::RESET)
    }
}

/// Resets every tracker, as on a whole-document reload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResetAll;

impl TrackerTransition for ResetAll {
    fn target(&self) -> Option<&str> {
        None
    }

    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError> {
        let mut reducer = RegistryReducer::new(state);
        if reducer.reset_all() == 0 {
            Ok(TrackerFields::empty())
        } else {
            Ok(TrackerFields::RESET)
        }
    }
}
