//! Parse and evaluation errors for both grammars.

use crate::error::{CalcError, ErrorSeverity};

/// Byte range into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line and column of `start` in `source`.
    pub fn line_column(&self, source: &str) -> (usize, usize) {
        let before = source.get(..self.start).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;
        (line, column)
    }
}

/// Malformed grammar input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}{}", expectation(.expected, .found))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseError {
    pub message: String,
    /// Token descriptions that would have been accepted.
    pub expected: Vec<String>,
    /// Description of the token actually found.
    pub found: String,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(
        source: &str,
        span: Span,
        message: impl Into<String>,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        let (line, column) = span.line_column(source);
        Self {
            message: message.into(),
            expected,
            found: found.into(),
            span,
            line,
            column,
        }
    }
}

fn expectation(expected: &[String], found: &str) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(" (expected {}, found {found})", expected.join(" or "))
    }
}

impl CalcError for ParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "LANG_PARSE"
    }
}

/// Failure while evaluating a parsed expression or condition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalError {
    #[error("unknown variable '{name}'{}", did_you_mean(.suggestion))]
    UnknownVariable {
        name: String,
        suggestion: Option<String>,
    },

    #[error("variable '{name}' is not numeric")]
    NonNumericVariable { name: String },

    #[error("no tracker named '{name}'")]
    UnresolvedTracker { name: String },

    #[error("no tracker to read '{stat}' from")]
    MissingSource { stat: String },

    #[error("'{stat}' needs a level")]
    MissingLevel { stat: String },

    #[error("unknown stat '{name}'{}", did_you_mean(.suggestion))]
    UnknownStat {
        name: String,
        suggestion: Option<String>,
    },

    #[error("malformed range {from}-{to}")]
    MalformedRange { from: u32, to: u32 },

    #[error("cannot invert a bounded range")]
    BoundedInversion,

    #[error("cannot invert '{pattern}'")]
    UnsupportedInversion { pattern: String },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!(", did you mean '{name}'?"))
        .unwrap_or_default()
}

impl CalcError for EvalError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => "EVAL_UNKNOWN_VARIABLE",
            Self::NonNumericVariable { .. } => "EVAL_NON_NUMERIC_VARIABLE",
            Self::UnresolvedTracker { .. } => "EVAL_UNRESOLVED_TRACKER",
            Self::MissingSource { .. } => "EVAL_MISSING_SOURCE",
            Self::MissingLevel { .. } => "EVAL_MISSING_LEVEL",
            Self::UnknownStat { .. } => "EVAL_UNKNOWN_STAT",
            Self::MalformedRange { .. } => "EVAL_MALFORMED_RANGE",
            Self::BoundedInversion => "EVAL_BOUNDED_INVERSION",
            Self::UnsupportedInversion { .. } => "EVAL_UNSUPPORTED_INVERSION",
        }
    }
}
