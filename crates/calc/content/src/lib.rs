//! Data-driven content definitions and loaders.
//!
//! This crate houses the static data route documents lean on and provides
//! loaders for RON/TOML data files:
//! - Species tables (base stats per evolution stage, via RON)
//! - Calculator configuration (tunables, via TOML)
//! - Scenarios (tracker declarations plus recorded steps, via RON)
//!
//! Content feeds the tracker reducer as commands and never appears in
//! tracker state directly.

pub mod species;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use species::{SpeciesEntry, SpeciesTable};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, LoadResult, Scenario, ScenarioLoader, ScenarioStep, SpeciesLoader,
};
