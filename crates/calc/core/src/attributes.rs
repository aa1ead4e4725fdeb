//! Typed access to directive attributes.
//!
//! Route documents hand the core plain `key -> string` pairs; nothing arrives
//! pre-typed. Getters here parse on demand and name the offending key and
//! raw value when they fail.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{CalcError, ErrorSeverity};
use crate::state::TrackerSpec;
use crate::stats::{Generation, Nature, Stat, StatLine};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeError {
    #[error("missing attribute '{key}'")]
    Missing { key: String },

    #[error("invalid value '{value}' for attribute '{key}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl CalcError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "ATTRIBUTE_MISSING",
            Self::Invalid { .. } => "ATTRIBUTE_INVALID",
        }
    }
}

/// The attributes of one directive node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DirectiveAttributes {
    values: BTreeMap<String, String>,
}

impl DirectiveAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value; blank values count as absent.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn required(&self, key: &str) -> Result<&str, AttributeError> {
        self.raw(key).ok_or_else(|| AttributeError::Missing {
            key: key.to_string(),
        })
    }

    /// Parses an optional attribute with `FromStr`.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, AttributeError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.raw(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|error| AttributeError::Invalid {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: error.to_string(),
                })
            })
            .transpose()
    }

    pub fn parse_required<T>(&self, key: &str) -> Result<T, AttributeError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse(key)?.ok_or_else(|| AttributeError::Missing {
            key: key.to_string(),
        })
    }

    pub fn integer(&self, key: &str) -> Result<Option<u32>, AttributeError> {
        self.parse(key)
    }

    /// Accepts `true/false`, `yes/no` and `1/0`.
    pub fn boolean(&self, key: &str) -> Result<Option<bool>, AttributeError> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(AttributeError::Invalid {
                key: key.to_string(),
                value: raw.to_string(),
                reason: "expected true/false, yes/no or 1/0".to_string(),
            }),
        }
    }

    pub fn generation(&self, key: &str) -> Result<Option<Generation>, AttributeError> {
        self.parse(key)
    }

    pub fn stat(&self, key: &str) -> Result<Option<Stat>, AttributeError> {
        self.parse(key)
    }

    pub fn nature(&self, key: &str) -> Result<Option<Nature>, AttributeError> {
        self.parse(key)
    }

    /// `|`-separated stat lines, e.g. one per evolution stage.
    pub fn stat_lines(&self, key: &str) -> Result<Vec<StatLine<u32>>, AttributeError> {
        let Some(raw) = self.raw(key) else {
            return Ok(Vec::new());
        };
        raw.split('|')
            .map(|line| {
                line.trim()
                    .parse::<StatLine<u32>>()
                    .map_err(|error| AttributeError::Invalid {
                        key: key.to_string(),
                        value: raw.to_string(),
                        reason: error.to_string(),
                    })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DirectiveAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl TrackerSpec {
    /// Builds a tracker declaration from a directive.
    ///
    /// | key | form | default |
    /// |---|---|---|
    /// | `name` | text | required |
    /// | `generation` | `1`-`9`, `lgpe` | required |
    /// | `baseStats` | `a/b/c/d/e/f` stages joined by `\|` | required |
    /// | `caughtLevel` | integer | none |
    /// | `startingLevel` | integer | `caughtLevel`, else 1 |
    /// | `staticIvs` | stat line with `?` for unknown | none |
    /// | `nature` | nature name | none |
    pub fn from_attributes(attributes: &DirectiveAttributes) -> Result<Self, AttributeError> {
        let name = attributes.required("name")?;
        let generation = attributes.parse_required::<Generation>("generation")?;
        let mut stages = attributes.stat_lines("baseStats")?.into_iter();
        let first = stages.next().ok_or_else(|| AttributeError::Missing {
            key: "baseStats".to_string(),
        })?;

        let mut spec = TrackerSpec::new(name, generation, first);
        for stage in stages {
            spec = spec.with_evolution(stage);
        }

        let caught_level = attributes.integer("caughtLevel")?;
        spec.caught_level = caught_level;
        spec.starting_level = attributes
            .integer("startingLevel")?
            .or(caught_level)
            .unwrap_or(1);
        if let Some(static_ivs) = attributes.parse::<StatLine<Option<u32>>>("staticIvs")? {
            spec.static_ivs = static_ivs;
        }
        spec.nature = attributes.nature("nature")?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive() -> DirectiveAttributes {
        DirectiveAttributes::from_iter([
            ("name", "Starter"),
            ("generation", "4"),
            ("baseStats", "45/49/49/65/65/45 | 60/62/63/80/80/60"),
            ("caughtLevel", "5"),
            ("staticIvs", "?/?/?/?/?/31"),
            ("nature", "adamant"),
        ])
    }

    #[test]
    fn tracker_spec_from_directive() {
        let spec = TrackerSpec::from_attributes(&directive()).unwrap();
        assert_eq!(spec.name, "Starter");
        assert_eq!(spec.generation, Generation::Gen4);
        assert_eq!(spec.base_stats.len(), 2);
        assert_eq!(spec.base_stats[1].hp, 60);
        assert_eq!(spec.caught_level, Some(5));
        assert_eq!(spec.starting_level, 5);
        assert_eq!(spec.static_ivs.speed, Some(31));
        assert_eq!(spec.static_ivs.hp, None);
        assert_eq!(spec.nature, Some(Nature::Adamant));
    }

    #[test]
    fn starting_level_defaults_to_one_without_caught_level() {
        let attributes = DirectiveAttributes::new()
            .with("name", "Wild")
            .with("generation", "lgpe")
            .with("baseStats", "40/45/40/35/35/56");
        let spec = TrackerSpec::from_attributes(&attributes).unwrap();
        assert_eq!(spec.generation, Generation::LetsGo);
        assert_eq!(spec.starting_level, 1);
    }

    #[test]
    fn missing_and_invalid_attributes_name_the_key() {
        let missing = DirectiveAttributes::new().with("name", "Wild").with("generation", "3");
        assert_eq!(
            TrackerSpec::from_attributes(&missing),
            Err(AttributeError::Missing { key: "baseStats".into() })
        );

        let invalid = directive().with("generation", "11");
        let error = TrackerSpec::from_attributes(&invalid).unwrap_err();
        assert!(matches!(error, AttributeError::Invalid { ref key, .. } if key == "generation"));
        assert_eq!(error.error_code(), "ATTRIBUTE_INVALID");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let attributes = DirectiveAttributes::new().with("crit", "  ");
        assert_eq!(attributes.boolean("crit"), Ok(None));
        assert!(matches!(attributes.required("crit"), Err(AttributeError::Missing { .. })));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        let attributes = DirectiveAttributes::new()
            .with("a", "Yes")
            .with("b", "0")
            .with("c", "maybe");
        assert_eq!(attributes.boolean("a"), Ok(Some(true)));
        assert_eq!(attributes.boolean("b"), Ok(Some(false)));
        assert!(attributes.boolean("c").is_err());
    }
}
