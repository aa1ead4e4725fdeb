//! The calc and condition languages route documents embed.
//!
//! Both grammars compile source text to an immutable tree, report
//! [`ParseError`]s with a span, and evaluate against an [`EvalContext`]
//! returning [`EvalError`]s without partial results.

pub mod calc;
pub mod condition;
mod context;
mod error;
mod lexer;
mod suggest;

pub use calc::{CalcExpr, Outcomes, parse_calc};
pub use condition::{Condition, parse_condition};
pub use context::{EvalContext, Variable, Variables};
pub use error::{EvalError, ParseError, Span};
pub use suggest::{levenshtein, suggest};
