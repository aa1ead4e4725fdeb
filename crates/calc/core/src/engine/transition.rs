//! Command transition trait and dispatch.

use bitflags::bitflags;

use crate::state::TrackerRegistry;

use super::command::TrackerCommand;
use super::errors::{CommandError, ExecuteError, TransitionPhase, TransitionPhaseError};

bitflags! {
    /// Tracks which parts of a tracker changed during a command.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TrackerFields: u8 {
        const REGISTERED    = 1 << 0;
        const OBSERVATIONS  = 1 << 1;
        const MANUAL_NATURE = 1 << 2;
        const EVOLUTION     = 1 << 3;
        const EFFORT        = 1 << 4;
        const RESET         = 1 << 5;
    }
}

/// Defines how a concrete command mutates the tracker registry.
///
/// The validation hooks read the registry before and after the mutation and
/// must stay side-effect free. `apply` may assume `pre_validate` succeeded.
pub trait TrackerTransition {
    /// Name of the tracker this command targets, if it targets one.
    fn target(&self) -> Option<&str>;

    /// Validates preconditions using the registry **before** mutation.
    fn pre_validate(&self, _state: &TrackerRegistry) -> Result<(), CommandError> {
        Ok(())
    }

    /// Applies the command and reports what changed.
    fn apply(&self, state: &mut TrackerRegistry) -> Result<TrackerFields, CommandError>;

    /// Validates postconditions using the registry **after** mutation.
    fn post_validate(&self, _state: &TrackerRegistry) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Runs one transition through pre_validate, apply and post_validate.
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut TrackerRegistry,
) -> Result<TrackerFields, TransitionPhaseError<CommandError>>
where
    T: TrackerTransition,
{
    transition
        .pre_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let changes = transition
        .apply(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(changes)
}

pub(super) fn execute_transition(
    command: &TrackerCommand,
    state: &mut TrackerRegistry,
) -> Result<TrackerFields, ExecuteError> {
    match command {
        TrackerCommand::Register(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::Register)
        }
        TrackerCommand::RecordStats(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::RecordStats)
        }
        TrackerCommand::ClearObservation(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::ClearObservation)
        }
        TrackerCommand::SetManualNature(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::SetManualNature)
        }
        TrackerCommand::SetEvolution(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::SetEvolution)
        }
        TrackerCommand::SetEffort(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::SetEffort)
        }
        TrackerCommand::Reset(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::Reset)
        }
        TrackerCommand::ResetAll(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::ResetAll)
        }
    }
}
