//! Species base-stat tables.

use std::collections::BTreeMap;

use calc_core::{DirectiveAttributes, StatLine};

/// Base stats of one species, one line per evolution stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesEntry {
    pub name: String,
    pub stages: Vec<StatLine<u32>>,
}

impl SpeciesEntry {
    /// Stages in the `a/b/c/d/e/f | ...` directive form.
    pub fn base_stats_attribute(&self) -> String {
        self.stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Species looked up by case-insensitive name.
#[derive(Clone, Debug, Default)]
pub struct SpeciesTable {
    entries: BTreeMap<String, SpeciesEntry>,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing any species with the same name.
    pub fn insert(&mut self, entry: SpeciesEntry) -> Option<SpeciesEntry> {
        self.entries.insert(entry.name.to_ascii_lowercase(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesEntry> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|entry| entry.name.as_str())
    }

    /// Fills `baseStats` from the `species` attribute when the directive
    /// leaves it out. Returns false when the named species is unknown.
    pub fn complete(&self, attributes: &mut DirectiveAttributes) -> bool {
        if attributes.raw("baseStats").is_some() {
            return true;
        }
        let Some(species) = attributes.raw("species") else {
            return true;
        };
        let Some(entry) = self.get(species) else {
            return false;
        };
        attributes.insert("baseStats", entry.base_stats_attribute());
        true
    }
}

impl FromIterator<SpeciesEntry> for SpeciesTable {
    fn from_iter<I: IntoIterator<Item = SpeciesEntry>>(iter: I) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}
