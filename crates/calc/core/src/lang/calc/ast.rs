use core::fmt;
use core::str::FromStr;

use crate::error::FormulaError;
use crate::stats::Stat;

/// Unary math functions callable from calc expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumIter, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Function {
    Floor,
    Ceil,
    Round,
    Sqrt,
    Log,
    Log2,
    Log10,
    Trunc,
    Sign,
    Abs,
}

impl Function {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            // Halves round toward positive infinity.
            Function::Round => (x + 0.5).floor(),
            Function::Sqrt => x.sqrt(),
            Function::Log => x.ln(),
            Function::Log2 => x.log2(),
            Function::Log10 => x.log10(),
            Function::Trunc => x.trunc(),
            Function::Sign => {
                if x == 0.0 || x.is_nan() {
                    x
                } else {
                    x.signum()
                }
            }
            Function::Abs => x.abs(),
        }
    }
}

impl FromStr for Function {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "round" => Function::Round,
            "sqrt" => Function::Sqrt,
            "log" => Function::Log,
            "log2" => Function::Log2,
            "log10" => Function::Log10,
            "trunc" => Function::Trunc,
            "sign" => Function::Sign,
            "abs" => Function::Abs,
            other => return Err(FormulaError::UnsupportedFunction(other.to_string())),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl BinaryOperator {
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Remainder => left % right,
            BinaryOperator::Power => left.powf(right),
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Power => "**",
        }
    }
}

impl FromStr for BinaryOperator {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "+" => BinaryOperator::Add,
            "-" | "\u{2013}" => BinaryOperator::Subtract,
            "*" => BinaryOperator::Multiply,
            "/" => BinaryOperator::Divide,
            "%" => BinaryOperator::Remainder,
            "**" => BinaryOperator::Power,
            other => return Err(FormulaError::UnsupportedOperator(other.to_string())),
        })
    }
}

/// A multi-valued reference into the source tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatRef {
    /// Possible values of a stat at the context level.
    Stat(Stat),
    StartingLevel,
    CaughtLevel,
}

impl StatRef {
    pub const STARTING_LEVEL: &'static str = "startingLevel";
    pub const CAUGHT_LEVEL: &'static str = "caughtLevel";

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::STARTING_LEVEL => Some(StatRef::StartingLevel),
            Self::CAUGHT_LEVEL => Some(StatRef::CaughtLevel),
            other => other.parse().ok().map(StatRef::Stat),
        }
    }
}

impl fmt::Display for StatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatRef::Stat(stat) => write!(f, "{stat}"),
            StatRef::StartingLevel => f.write_str(Self::STARTING_LEVEL),
            StatRef::CaughtLevel => f.write_str(Self::CAUGHT_LEVEL),
        }
    }
}

/// Calc expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcExpr {
    Number(f64),
    Variable(String),
    Stat(StatRef),
    Function {
        function: Function,
        argument: Box<CalcExpr>,
    },
    Operation {
        operator: BinaryOperator,
        left: Box<CalcExpr>,
        right: Box<CalcExpr>,
    },
    Negate(Box<CalcExpr>),
}

impl CalcExpr {
    /// Node kind name.
    pub const fn tag(&self) -> &'static str {
        match self {
            CalcExpr::Number(_) => "number",
            CalcExpr::Variable(_) => "variable",
            CalcExpr::Stat(_) => "statExpression",
            CalcExpr::Function { .. } => "function",
            CalcExpr::Operation { .. } | CalcExpr::Negate(_) => "operation",
        }
    }

    pub fn operation(operator: BinaryOperator, left: CalcExpr, right: CalcExpr) -> Self {
        CalcExpr::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(function: Function, argument: CalcExpr) -> Self {
        CalcExpr::Function {
            function,
            argument: Box::new(argument),
        }
    }

    /// True if evaluation needs a tracker.
    pub fn references_stats(&self) -> bool {
        match self {
            CalcExpr::Stat(_) => true,
            CalcExpr::Number(_) | CalcExpr::Variable(_) => false,
            CalcExpr::Function { argument, .. } => argument.references_stats(),
            CalcExpr::Negate(inner) => inner.references_stats(),
            CalcExpr::Operation { left, right, .. } => {
                left.references_stats() || right.references_stats()
            }
        }
    }
}

/// Fully parenthesised source form.
impl fmt::Display for CalcExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcExpr::Number(value) => write!(f, "{value}"),
            CalcExpr::Variable(name) => f.write_str(name),
            CalcExpr::Stat(reference) => write!(f, "{reference}"),
            CalcExpr::Function { function, argument } => write!(f, "{function}({argument})"),
            CalcExpr::Operation {
                operator,
                left,
                right,
            } => write!(f, "({left} {} {right})", operator.symbol()),
            CalcExpr::Negate(inner) => write!(f, "(-{inner})"),
        }
    }
}
