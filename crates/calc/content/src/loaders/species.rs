//! Species table loader.

use std::path::Path;

use calc_core::StatLine;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::species::{SpeciesEntry, SpeciesTable};

/// Species table structure for RON files.
///
/// ```ron
/// (
///     species: [
///         (name: "Bulbasaur", stages: ["45/49/49/65/65/45", "60/62/63/80/80/60"]),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpeciesFileRon {
    species: Vec<SpeciesRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpeciesRon {
    name: String,
    stages: Vec<String>,
}

const BUNDLED: &str = include_str!("../../data/species.ron");

/// Loader for species tables from RON files.
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// The table shipped in this crate's `data/` directory.
    pub fn bundled() -> LoadResult<SpeciesTable> {
        Self::parse(BUNDLED)
    }

    /// Load a species table from a RON file.
    ///
    /// Entries with no stages or a malformed stage line are skipped with a
    /// warning; the rest of the table still loads.
    pub fn load(path: &Path) -> LoadResult<SpeciesTable> {
        let content = read_file(path)?;
        let table = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), species = table.len(), "loaded species table");
        Ok(table)
    }

    pub fn parse(content: &str) -> LoadResult<SpeciesTable> {
        let file: SpeciesFileRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse species RON: {}", e))?;

        let mut table = SpeciesTable::new();
        for species in file.species {
            let stages: Result<Vec<StatLine<u32>>, _> =
                species.stages.iter().map(|line| line.parse()).collect();
            match stages {
                Ok(stages) if !stages.is_empty() => {
                    let name = species.name;
                    if table.insert(SpeciesEntry { name: name.clone(), stages }).is_some() {
                        tracing::warn!(species = %name, "duplicate species entry replaced");
                    }
                }
                Ok(_) => tracing::warn!(species = %species.name, "species has no stages, skipped"),
                Err(error) => {
                    tracing::warn!(species = %species.name, %error, "malformed base stats, skipped")
                }
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TABLE: &str = r#"(
        species: [
            (name: "Bulbasaur", stages: ["45/49/49/65/65/45", "60/62/63/80/80/60"]),
            (name: "Broken", stages: ["45/49/49"]),
            (name: "Empty", stages: []),
            (name: "Pidgey", stages: ["40/45/40/35/35/56"]),
        ],
    )"#;

    #[test]
    fn malformed_entries_are_skipped() {
        let table = SpeciesLoader::parse(TABLE).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("bulbasaur").unwrap().stages.len(), 2);
        assert!(table.get("Broken").is_none());
        assert!(table.get("Empty").is_none());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        let table = SpeciesLoader::load(file.path()).unwrap();
        assert_eq!(table.get("pidgey").unwrap().stages[0].speed, 56);
    }

    #[test]
    fn bundled_table_parses() {
        let table = SpeciesLoader::bundled().unwrap();
        assert!(table.get("bulbasaur").is_some());
    }

    #[test]
    fn invalid_ron_is_an_error() {
        assert!(SpeciesLoader::parse("(species: [").is_err());
    }
}
