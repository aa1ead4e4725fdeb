//! Tracker command pipeline.
//!
//! The [`TrackerEngine`] is the authoritative reducer for [`TrackerRegistry`].
//! Every mutation the observation layer requests flows through the same
//! three-phase pipeline: pre_validate → apply → post_validate.

mod command;
mod errors;
mod reducer;
mod transition;

pub use command::{
    ClearObservation, RecordStats, RegisterTracker, ResetAll, ResetTracker, SetEffort,
    SetEvolution, SetManualNature, TrackerCommand, check_invariants,
};
pub use errors::{CommandError, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use reducer::{RegistryReducer, TrackerReducer};
pub use transition::{TrackerFields, TrackerTransition};

use crate::state::TrackerRegistry;

/// What a successfully executed command changed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandOutcome {
    /// Tracker the command targeted, if any.
    pub tracker: Option<String>,
    pub changes: TrackerFields,
    /// Registry nonce after the command.
    pub nonce: u64,
}

/// Applies commands to a registry it borrows mutably.
pub struct TrackerEngine<'a> {
    state: &'a mut TrackerRegistry,
}

impl<'a> TrackerEngine<'a> {
    pub fn new(state: &'a mut TrackerRegistry) -> Self {
        Self { state }
    }

    /// Executes a command through its transition pipeline.
    ///
    /// The command runs against a copy of the registry, which replaces the
    /// borrowed one only once every phase has passed. Rejected commands
    /// leave the registry and its nonce untouched.
    pub fn execute(&mut self, command: &TrackerCommand) -> Result<CommandOutcome, ExecuteError> {
        let mut next = self.state.clone();
        let changes = transition::execute_transition(command, &mut next)?;

        next.nonce += 1;
        *self.state = next;

        Ok(CommandOutcome {
            tracker: command.target().map(str::to_owned),
            changes,
            nonce: self.state.nonce,
        })
    }
}

/// Pure form of [`TrackerEngine::execute`]: returns the next registry and
/// leaves `state` untouched.
pub fn apply_command(
    state: &TrackerRegistry,
    command: &TrackerCommand,
) -> Result<TrackerRegistry, ExecuteError> {
    let mut next = state.clone();
    transition::execute_transition(command, &mut next)?;
    next.nonce += 1;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalcError, ErrorSeverity};
    use crate::state::{EffortSegment, TrackerSpec};
    use crate::stats::{Generation, Nature, Stat, StatLine};

    fn spec(name: &str) -> TrackerSpec {
        TrackerSpec::new(name, Generation::Gen4, "45/49/49/65/65/45".parse().unwrap())
            .with_evolution("60/62/63/80/80/60".parse().unwrap())
            .with_starting_level(5)
    }

    fn registered() -> TrackerRegistry {
        let mut registry = TrackerRegistry::new();
        TrackerEngine::new(&mut registry)
            .execute(&TrackerCommand::register(spec("Starter")))
            .unwrap();
        registry
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = registered();
        let outcome = TrackerEngine::new(&mut registry)
            .execute(&TrackerCommand::register(spec("Starter").with_starting_level(9)))
            .unwrap();
        assert!(outcome.changes.is_empty());
        assert_eq!(outcome.nonce, 2);
        assert_eq!(registry.get("Starter").unwrap().spec.starting_level, 5);
    }

    #[test]
    fn record_targets_current_stage_and_segment() {
        let mut registry = registered();
        let mut engine = TrackerEngine::new(&mut registry);
        engine
            .execute(&TrackerCommand::record("Starter", 8, "26/?/?/?/?/?".parse().unwrap()))
            .unwrap();
        engine.execute(&TrackerCommand::evolve("Starter", 1)).unwrap();
        engine
            .execute(&TrackerCommand::effort(
                "Starter",
                EffortSegment::new(16, StatLine::splat(20)),
            ))
            .unwrap();
        let outcome = engine
            .execute(&TrackerCommand::record("Starter", 18, "50/?/?/?/?/?".parse().unwrap()))
            .unwrap();
        assert_eq!(outcome.changes, TrackerFields::OBSERVATIONS);

        let tracker = registry.get("Starter").unwrap();
        let keys: Vec<_> = tracker
            .timeline
            .iter()
            .map(|entry| (entry.key.evolution, entry.key.segment, entry.key.level))
            .collect();
        assert_eq!(keys, vec![(0, 0, 8), (1, 1, 18)]);
    }

    #[test]
    fn rejected_command_reports_phase_and_leaves_state() {
        let registry = registered();
        let error = apply_command(&registry, &TrackerCommand::evolve("Starter", 4)).unwrap_err();
        assert_eq!(error.phase_error().phase, TransitionPhase::PreValidate);
        assert_eq!(
            error.command_error(),
            &CommandError::EvolutionOutOfRange {
                evolution: 4,
                stages: 2
            }
        );
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(registry.nonce, 1);
    }

    #[test]
    fn unknown_tracker_and_blank_observation_are_rejected() {
        let registry = registered();
        let unknown = apply_command(
            &registry,
            &TrackerCommand::record("Rival", 5, "20/?/?/?/?/?".parse().unwrap()),
        )
        .unwrap_err();
        assert_eq!(unknown.error_code(), "COMMAND_UNKNOWN_TRACKER");

        let blank = apply_command(
            &registry,
            &TrackerCommand::record("Starter", 5, StatLine::splat(None)),
        )
        .unwrap_err();
        assert!(matches!(
            blank.command_error(),
            CommandError::BlankObservation { level: 5 }
        ));
    }

    #[test]
    fn hp_cannot_be_pinned() {
        let registry = registered();
        let error = apply_command(
            &registry,
            &TrackerCommand::pin_nature("Starter", Some(Stat::Hp), None),
        )
        .unwrap_err();
        assert!(matches!(
            error,
            ExecuteError::SetManualNature(TransitionPhaseError {
                error: CommandError::StatNotAffectedByNature { stat: Stat::Hp },
                ..
            })
        ));
    }

    #[test]
    fn effort_segments_must_not_go_backwards() {
        let registry = registered();
        let error = apply_command(
            &registry,
            &TrackerCommand::effort("Starter", EffortSegment::new(3, StatLine::splat(0))),
        )
        .unwrap_err();
        assert!(matches!(
            error.command_error(),
            CommandError::EffortSegmentOutOfOrder { level: 3, current: 5 }
        ));
    }

    #[test]
    fn reset_restores_declaration_but_keeps_tracker() {
        let mut registry = registered();
        let mut engine = TrackerEngine::new(&mut registry);
        engine
            .execute(&TrackerCommand::record("Starter", 8, "26/?/?/?/?/?".parse().unwrap()))
            .unwrap();
        engine
            .execute(&TrackerCommand::pin_nature(
                "Starter",
                Some(Stat::Speed),
                Some(Stat::Attack),
            ))
            .unwrap();
        engine.execute(&TrackerCommand::evolve("Starter", 1)).unwrap();

        let outcome = engine.execute(&TrackerCommand::reset("Starter")).unwrap();
        assert_eq!(outcome.changes, TrackerFields::RESET);

        let tracker = registry.get("Starter").unwrap();
        assert!(tracker.timeline.is_empty());
        assert_eq!(tracker.evolution, 0);
        assert_eq!(tracker.manual.boosted, None);
        assert_eq!(registry.nonce, 5);
    }

    #[test]
    fn reset_all_resets_every_tracker() {
        let mut registry = registered();
        let mut engine = TrackerEngine::new(&mut registry);
        engine
            .execute(&TrackerCommand::register(spec("Rival").with_nature(Nature::Jolly)))
            .unwrap();
        engine
            .execute(&TrackerCommand::record("Rival", 6, "24/?/?/?/?/?".parse().unwrap()))
            .unwrap();
        engine
            .execute(&TrackerCommand::ResetAll(ResetAll))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.iter().all(|tracker| tracker.timeline.is_empty()));
        assert_eq!(registry.get("Rival").unwrap().spec.nature, Some(Nature::Jolly));
    }

    #[test]
    fn register_rejects_bad_declarations() {
        let registry = TrackerRegistry::new();
        let early = TrackerSpec::new("Old", Generation::Gen2, StatLine::splat(50))
            .with_nature(Nature::Bold);
        let error = apply_command(&registry, &TrackerCommand::register(early)).unwrap_err();
        assert_eq!(error.error_code(), "COMMAND_NATURE_UNAVAILABLE");

        let static_iv = spec("Gift").with_static_iv(Stat::Speed, 40);
        let error = apply_command(&registry, &TrackerCommand::register(static_iv)).unwrap_err();
        assert_eq!(error.error_code(), "COMMAND_STATIC_IV_OUT_OF_RANGE");
    }

    #[test]
    fn clear_observation_removes_entry() {
        let mut registry = registered();
        let mut engine = TrackerEngine::new(&mut registry);
        engine
            .execute(&TrackerCommand::record("Starter", 8, "26/?/?/?/?/?".parse().unwrap()))
            .unwrap();
        engine.execute(&TrackerCommand::clear("Starter", 8)).unwrap();
        assert!(engine.execute(&TrackerCommand::clear("Starter", 8)).is_err());
        assert!(registry.get("Starter").unwrap().timeline.is_empty());
    }

    #[test]
    fn register_rejects_oversized_base_stats() {
        let mut registry = TrackerRegistry::new();
        let giant = TrackerSpec::new(
            "Giant",
            Generation::Gen5,
            "30000000/49/49/65/65/45".parse().unwrap(),
        );
        let error = TrackerEngine::new(&mut registry)
            .execute(&TrackerCommand::register(giant))
            .unwrap_err();
        assert_eq!(
            error.command_error(),
            &CommandError::BaseStatOutOfRange {
                stage: 0,
                stat: Stat::Hp,
                value: 30_000_000
            }
        );
        assert!(registry.is_empty());
        assert_eq!(registry.nonce, 0);

        let evolved = spec("Late").with_evolution("256/1/1/1/1/1".parse().unwrap());
        let error = apply_command(&registry, &TrackerCommand::register(evolved)).unwrap_err();
        assert!(matches!(
            error.command_error(),
            CommandError::BaseStatOutOfRange { stage: 2, .. }
        ));
    }

    #[test]
    fn effort_is_capped_per_generation() {
        let registry = registered();
        let error = apply_command(
            &registry,
            &TrackerCommand::effort("Starter", EffortSegment::new(10, StatLine::splat(300))),
        )
        .unwrap_err();
        assert_eq!(
            error.command_error(),
            &CommandError::EffortOutOfRange {
                stat: Stat::Hp,
                value: 300,
                max: 255,
                generation: Generation::Gen4
            }
        );
        assert_eq!(error.error_code(), "COMMAND_EFFORT_OUT_OF_RANGE");

        let mut early = TrackerRegistry::new();
        let mut engine = TrackerEngine::new(&mut early);
        engine
            .execute(&TrackerCommand::register(TrackerSpec::new(
                "Old",
                Generation::Gen2,
                StatLine::splat(50),
            )))
            .unwrap();
        engine
            .execute(&TrackerCommand::effort("Old", EffortSegment::new(10, StatLine::splat(65_535))))
            .unwrap();
    }

    #[test]
    fn failed_post_validation_leaves_registry_untouched() {
        let mut registry = registered();
        let starter = registry.get_mut("Starter").unwrap();
        starter.spec.base_stats.truncate(1);
        starter.evolution = 1;
        let snapshot = registry.clone();

        let error = TrackerEngine::new(&mut registry)
            .execute(&TrackerCommand::record("Starter", 9, "27/?/?/?/?/?".parse().unwrap()))
            .unwrap_err();
        assert_eq!(error.phase_error().phase, TransitionPhase::PostValidate);
        assert_eq!(registry, snapshot);
    }
}
