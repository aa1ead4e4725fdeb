//! Boolean conditions over stat values and hereditary-value domains.

mod ast;
mod eval;
mod parser;

pub use ast::{
    Condition, ConditionValue, IvPattern, LogicalOperator, RangePattern, StatCondition,
};
pub use parser::parse_condition;
