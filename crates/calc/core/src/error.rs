//! Common error infrastructure for calc-core.
//!
//! This module provides the shared severity classification and the
//! [`CalcError`] trait implemented by every error type in the crate.
//! Domain-specific errors (`ParseError`, `EvalError`, `CommandError`, ...)
//! live next to the code that raises them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each concern has its own error enum with specific variants
//! - **Pure Signals**: Errors are returned, never logged, by the core
//! - **Severity Classification**: Errors are categorized for recovery strategies
//!
//! Empty inference domains are *not* errors; they are represented as
//! impossible ranges and flow through the normal result types.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Bad user input the caller can render as a diagnostic
/// - **Validation**: A command or attribute rejected without state change
/// - **Internal**: Unexpected state inconsistency (a bug)
/// - **Fatal**: Misconfiguration that must not be silently defaulted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Malformed expression source or a failed evaluation.
    Recoverable,

    /// Invalid command or attribute, rejected without side effects.
    Validation,

    /// Invariant violated after a state transition.
    Internal,

    /// Unsupported generation, operator or function name.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all calc-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait CalcError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, for tests and diagnostics.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Misconfiguration reaching the formula library, damage calculator or
/// expression evaluator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    #[error("unsupported generation '{0}'")]
    UnsupportedGeneration(String),

    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    #[error("unsupported function '{0}'")]
    UnsupportedFunction(String),

    #[error("defense stat must be positive")]
    ZeroDefense,

    #[error("damage modifier must be finite and non-negative, got {0}")]
    InvalidModifier(String),

    #[error("{hits} roll sets exceed the limit of {max}")]
    TooManyHits { hits: usize, max: usize },

    #[error("threshold {threshold} needs a sum table larger than {max}")]
    ThresholdTooLarge { threshold: u32, max: u32 },
}

impl CalcError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TooManyHits { .. } | Self::ThresholdTooLarge { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedGeneration(_) => "FORMULA_UNSUPPORTED_GENERATION",
            Self::UnsupportedOperator(_) => "FORMULA_UNSUPPORTED_OPERATOR",
            Self::UnsupportedFunction(_) => "FORMULA_UNSUPPORTED_FUNCTION",
            Self::ZeroDefense => "FORMULA_ZERO_DEFENSE",
            Self::InvalidModifier(_) => "FORMULA_INVALID_MODIFIER",
            Self::TooManyHits { .. } => "FORMULA_TOO_MANY_HITS",
            Self::ThresholdTooLarge { .. } => "FORMULA_THRESHOLD_TOO_LARGE",
        }
    }
}
