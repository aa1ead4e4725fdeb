//! Hidden-stat inference and damage calculation for route documents.
//!
//! `calc-core` turns partial stat observations into hereditary-value ranges
//! and a nature verdict, evaluates damage tables against those ranges, and
//! runs the small calc and condition languages documents embed. Everything
//! is a pure function of its inputs; tracker state changes only through
//! [`engine::TrackerEngine`] or [`engine::apply_command`].
pub mod attributes;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod inference;
pub mod lang;
pub mod state;
pub mod stats;
pub use attributes::{AttributeError, DirectiveAttributes};
pub use combat::{
    CompactRange, DamageQuery, DamageReport, DamageRolls, DamageScenario, ModifierStages,
    MultiRollResult, OneShotResult, RangeResult, RollSet, bucket_by_lethality, combine_hypotheses,
    combine_rolls, damage_rolls,
};
pub use config::CalcConfig;
pub use engine::{
    CommandError, CommandOutcome, ExecuteError, TrackerCommand, TrackerEngine, TrackerFields,
    TransitionPhase, TransitionPhaseError, apply_command,
};
pub use error::{CalcError, ErrorSeverity, FormulaError};
pub use inference::{
    ConfirmedNature, InferredState, IvRange, IvRangeSet, NaturePins, NatureResolution,
    infer_ranges, resolve_nature,
};
pub use lang::{
    CalcExpr, Condition, EvalContext, EvalError, ParseError, Variable, Variables, parse_calc,
    parse_condition,
};
pub use state::{
    EffortSegment, Observation, ObservationKey, ObservationTimeline, Tracker, TrackerRegistry,
    TrackerSpec,
};
pub use stats::{Generation, ModifierHypothesis, Nature, Stat, StatLine, calculate_stat};
