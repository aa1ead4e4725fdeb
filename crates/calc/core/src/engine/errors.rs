//! Error types for the tracker command pipeline.

use crate::error::{CalcError, ErrorSeverity};
use crate::stats::{Generation, Stat};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Reasons a tracker command is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("tracker '{name}' is not registered")]
    UnknownTracker { name: String },

    #[error("tracker name must not be empty")]
    EmptyName,

    #[error("tracker '{name}' declares no base stats")]
    NoBaseStats { name: String },

    #[error("level {level} is outside 1..=100")]
    LevelOutOfRange { level: u32 },

    #[error("observation at level {level} records no stats")]
    BlankObservation { level: u32 },

    #[error("no observation recorded at level {level} for the current stage")]
    NoObservation { level: u32 },

    #[error("hereditary value {value} for {stat} exceeds 31")]
    StaticIvOutOfRange { stat: Stat, value: u32 },

    #[error("base {stat} {value} at evolution stage {stage} exceeds 255")]
    BaseStatOutOfRange { stage: usize, stat: Stat, value: u32 },

    #[error("effort {value} for {stat} exceeds the generation {generation} cap of {max}")]
    EffortOutOfRange {
        stat: Stat,
        value: u32,
        max: u32,
        generation: Generation,
    },

    #[error("{stat} cannot be boosted or reduced by a nature")]
    StatNotAffectedByNature { stat: Stat },

    #[error("generation {generation} has no natures")]
    NatureUnavailable { generation: Generation },

    #[error("evolution stage {evolution} does not exist ({stages} declared)")]
    EvolutionOutOfRange { evolution: usize, stages: usize },

    #[error("effort segment at level {level} starts before the current one at {current}")]
    EffortSegmentOutOfOrder { level: u32, current: u32 },

    #[error("tracker '{name}' violates invariant: {detail}")]
    InvariantViolated { name: String, detail: &'static str },
}

impl CalcError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvariantViolated { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTracker { .. } => "COMMAND_UNKNOWN_TRACKER",
            Self::EmptyName => "COMMAND_EMPTY_NAME",
            Self::NoBaseStats { .. } => "COMMAND_NO_BASE_STATS",
            Self::LevelOutOfRange { .. } => "COMMAND_LEVEL_OUT_OF_RANGE",
            Self::BlankObservation { .. } => "COMMAND_BLANK_OBSERVATION",
            Self::NoObservation { .. } => "COMMAND_NO_OBSERVATION",
            Self::StaticIvOutOfRange { .. } => "COMMAND_STATIC_IV_OUT_OF_RANGE",
            Self::BaseStatOutOfRange { .. } => "COMMAND_BASE_STAT_OUT_OF_RANGE",
            Self::EffortOutOfRange { .. } => "COMMAND_EFFORT_OUT_OF_RANGE",
            Self::StatNotAffectedByNature { .. } => "COMMAND_STAT_NOT_AFFECTED_BY_NATURE",
            Self::NatureUnavailable { .. } => "COMMAND_NATURE_UNAVAILABLE",
            Self::EvolutionOutOfRange { .. } => "COMMAND_EVOLUTION_OUT_OF_RANGE",
            Self::EffortSegmentOutOfOrder { .. } => "COMMAND_EFFORT_SEGMENT_OUT_OF_ORDER",
            Self::InvariantViolated { .. } => "COMMAND_INVARIANT_VIOLATED",
        }
    }
}

/// Errors surfaced while executing a command through the tracker engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(deserialize = "'de: 'static")))]
pub enum ExecuteError {
    #[error("register failed: {0}")]
    Register(TransitionPhaseError<CommandError>),

    #[error("record stats failed: {0}")]
    RecordStats(TransitionPhaseError<CommandError>),

    #[error("clear observation failed: {0}")]
    ClearObservation(TransitionPhaseError<CommandError>),

    #[error("set manual nature failed: {0}")]
    SetManualNature(TransitionPhaseError<CommandError>),

    #[error("set evolution failed: {0}")]
    SetEvolution(TransitionPhaseError<CommandError>),

    #[error("set effort failed: {0}")]
    SetEffort(TransitionPhaseError<CommandError>),

    #[error("reset failed: {0}")]
    Reset(TransitionPhaseError<CommandError>),

    #[error("reset all failed: {0}")]
    ResetAll(TransitionPhaseError<CommandError>),
}

impl ExecuteError {
    /// The phase error regardless of which command produced it.
    pub fn phase_error(&self) -> &TransitionPhaseError<CommandError> {
        match self {
            Self::Register(inner)
            | Self::RecordStats(inner)
            | Self::ClearObservation(inner)
            | Self::SetManualNature(inner)
            | Self::SetEvolution(inner)
            | Self::SetEffort(inner)
            | Self::Reset(inner)
            | Self::ResetAll(inner) => inner,
        }
    }

    pub fn command_error(&self) -> &CommandError {
        &self.phase_error().error
    }
}

impl CalcError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.command_error().severity()
    }

    fn error_code(&self) -> &'static str {
        self.command_error().error_code()
    }
}
