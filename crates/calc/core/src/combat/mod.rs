//! Damage Range Calculator, result compaction and multi-roll combination.
//!
//! ```text
//! DamageScenario ──stages(gen)──► ModifierStages ──► damage_rolls ──► [u32; 16]
//!                                                          │
//! DamageQuery (tracker stat runs) ──► RangeResult per run ─┘
//!        │
//!        └──► combine_hypotheses ──► CompactRange ──► bucket_by_lethality
//! ```

mod compact;
mod damage;
mod modifiers;
mod multi;
mod query;
mod result;

pub use compact::{bucket_by_lethality, combine_hypotheses};
pub use damage::{DamageRolls, damage_rolls, random_factors, roll_bounds, roll_label};
pub use modifiers::{
    DamageScenario, ModifierStages, Weather, critical_multiplier, spread_multiplier,
};
pub use multi::{CritBucket, MultiRollResult, RollSet, combine_rolls, crit_chance};
pub use query::{DamageQuery, DamageReport, Role};
pub use result::{CompactRange, OneShotResult, RangeResult};
