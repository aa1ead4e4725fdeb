//! Evaluation context shared by both grammars.

use std::collections::BTreeMap;

use crate::config::CalcConfig;
use crate::state::{Tracker, TrackerRegistry};

use super::error::EvalError;

/// A named document variable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Variable {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Variable {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Variable::Number(value) => Some(*value),
            Variable::Bool(_) | Variable::Text(_) => None,
        }
    }
}

pub type Variables = BTreeMap<String, Variable>;

static NO_VARIABLES: Variables = BTreeMap::new();

/// What an expression is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    pub registry: &'a TrackerRegistry,
    /// Tracker that bare stat references read from.
    pub source: Option<&'a str>,
    pub level: Option<u32>,
    pub variables: &'a Variables,
    pub config: &'a CalcConfig,
}

impl<'a> EvalContext<'a> {
    pub fn new(registry: &'a TrackerRegistry, config: &'a CalcConfig) -> Self {
        Self {
            registry,
            source: None,
            level: None,
            variables: &NO_VARIABLES,
            config,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_variables(mut self, variables: &'a Variables) -> Self {
        self.variables = variables;
        self
    }

    /// The source tracker, for a reference to `stat`.
    pub(crate) fn tracker(&self, stat: &str) -> Result<&'a Tracker, EvalError> {
        let name = self.source.ok_or_else(|| EvalError::MissingSource {
            stat: stat.to_string(),
        })?;
        self.registry
            .get(name)
            .ok_or_else(|| EvalError::UnresolvedTracker {
                name: name.to_string(),
            })
    }

    pub(crate) fn require_level(&self, stat: &str) -> Result<u32, EvalError> {
        self.level.ok_or_else(|| EvalError::MissingLevel {
            stat: stat.to_string(),
        })
    }
}
