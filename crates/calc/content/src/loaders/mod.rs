//! Content loaders for reading calculator data from files.
//!
//! This module converts RON/TOML files into core types: species tables,
//! [`calc_core::CalcConfig`], and scenarios that expand into
//! [`calc_core::TrackerCommand`]s.

pub mod config;
pub mod scenario;
pub mod species;

pub use config::ConfigLoader;
pub use scenario::{Scenario, ScenarioLoader, ScenarioStep};
pub use species::SpeciesLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
