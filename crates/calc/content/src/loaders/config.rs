//! Calculator configuration loader.

use std::path::Path;

use calc_core::CalcConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for calculator configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// [`CalcConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CalcConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded calculator config");
        Ok(config)
    }

    pub fn parse(content: &str) -> LoadResult<CalcConfig> {
        let config: CalcConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if let Some(chance) = config.crit_chance_override
            && !(0.0..=1.0).contains(&chance)
        {
            anyhow::bail!("crit_chance_override must lie in [0, 1], got {chance}");
        }
        Ok(config)
    }
}
