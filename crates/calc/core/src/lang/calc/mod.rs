//! Arithmetic over literals, variables and multi-valued stat references.

mod ast;
mod eval;
mod parser;

pub use ast::{BinaryOperator, CalcExpr, Function, StatRef};
pub use eval::Outcomes;
pub use parser::parse_calc;
