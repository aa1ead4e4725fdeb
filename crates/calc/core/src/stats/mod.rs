//! Stat Formula Library.
//!
//! Pure functions mapping (level, base stat, hereditary value, effort value,
//! modifier) to a stat value, per ruleset generation, plus the shared stat
//! vocabulary the rest of the crate is built on.
//!
//! ```text
//! [ Stat / StatLine ]   vocabulary
//!      ↓
//! [ Generation ]        which formula shape applies
//!      ↓
//! [ ModifierHypothesis / Nature ]
//!      ↓
//! [ calculate_stat ]    floor-then-use integer arithmetic
//! ```

pub mod formula;
pub mod generation;
pub mod nature;
pub mod stat;

pub use formula::{StatParams, calculate_stat, friendship_percent};
pub use generation::Generation;
pub use nature::{ModifierHypothesis, Nature};
pub use stat::{Stat, StatLine, StatLineParseError};
