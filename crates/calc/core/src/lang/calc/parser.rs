//! Recursive-descent parser for calc expressions.
//!
//! ```text
//! expr           := additive
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/' | '%') unary)*
//! unary          := '-' unary | '+' unary | power
//! power          := primary ('**' unary)?
//! primary        := NUMBER | IDENT '(' expr ')' | IDENT | '(' expr ')'
//! ```
//!
//! Parentheses, unary signs and each chained operator open a nesting level;
//! input nested past `CalcConfig::MAX_NESTING` is a parse error.

use crate::lang::error::ParseError;
use crate::lang::lexer::{TokenKind, TokenStream};

use super::ast::{BinaryOperator, CalcExpr, Function, StatRef};

/// Parses a calc expression.
pub fn parse_calc(source: &str) -> Result<CalcExpr, ParseError> {
    let mut stream = TokenStream::new(source)?;
    let expr = parse_additive(&mut stream)?;
    stream.finish()?;
    Ok(expr)
}

fn parse_additive(stream: &mut TokenStream<'_>) -> Result<CalcExpr, ParseError> {
    let mut expr = parse_multiplicative(stream)?;
    let mut levels = 0;
    loop {
        let operator = match stream.peek_kind() {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Subtract,
            _ => break,
        };
        stream.enter()?;
        levels += 1;
        stream.next();
        let right = parse_multiplicative(stream)?;
        expr = CalcExpr::operation(operator, expr, right);
    }
    stream.leave(levels);
    Ok(expr)
}

fn parse_multiplicative(stream: &mut TokenStream<'_>) -> Result<CalcExpr, ParseError> {
    let mut expr = parse_unary(stream)?;
    let mut levels = 0;
    loop {
        let operator = match stream.peek_kind() {
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Remainder,
            _ => break,
        };
        stream.enter()?;
        levels += 1;
        stream.next();
        let right = parse_unary(stream)?;
        expr = CalcExpr::operation(operator, expr, right);
    }
    stream.leave(levels);
    Ok(expr)
}

fn parse_unary(stream: &mut TokenStream<'_>) -> Result<CalcExpr, ParseError> {
    if stream.consume(&TokenKind::Minus) {
        stream.enter()?;
        let inner = parse_unary(stream)?;
        stream.leave(1);
        return Ok(CalcExpr::Negate(Box::new(inner)));
    }
    if stream.consume(&TokenKind::Plus) {
        stream.enter()?;
        let inner = parse_unary(stream)?;
        stream.leave(1);
        return Ok(inner);
    }
    parse_power(stream)
}

fn parse_power(stream: &mut TokenStream<'_>) -> Result<CalcExpr, ParseError> {
    let base = parse_primary(stream)?;
    if stream.consume(&TokenKind::StarStar) {
        stream.enter()?;
        let exponent = parse_unary(stream)?;
        stream.leave(1);
        return Ok(CalcExpr::operation(BinaryOperator::Power, base, exponent));
    }
    Ok(base)
}

fn parse_primary(stream: &mut TokenStream<'_>) -> Result<CalcExpr, ParseError> {
    let token = stream.peek().clone();
    match token.kind {
        TokenKind::Number(value) => {
            stream.next();
            Ok(CalcExpr::Number(value))
        }
        TokenKind::LParen => {
            stream.next();
            stream.enter()?;
            let inner = parse_additive(stream)?;
            stream.leave(1);
            stream.expect(&TokenKind::RParen)?;
            Ok(inner)
        }
        TokenKind::Ident(name) => {
            stream.next();
            if *stream.peek_kind() == TokenKind::LParen {
                let function: Function = name
                    .parse()
                    .map_err(|error| stream.error_at(token.span, format!("{error}")))?;
                stream.next();
                stream.enter()?;
                let argument = parse_additive(stream)?;
                stream.leave(1);
                stream.expect(&TokenKind::RParen)?;
                return Ok(CalcExpr::call(function, argument));
            }
            Ok(match StatRef::from_name(&name) {
                Some(reference) => CalcExpr::Stat(reference),
                None => CalcExpr::Variable(name),
            })
        }
        _ => Err(stream.unexpected(&["number", "name", "'('", "'-'"])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stat;

    fn roundtrip(source: &str) -> String {
        parse_calc(source).unwrap().to_string()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(roundtrip("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(roundtrip("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(roundtrip("8 / 4 % 3"), "((8 / 4) % 3)");
    }

    #[test]
    fn power_is_right_associative_and_tighter_than_negation() {
        assert_eq!(roundtrip("2 ** 3 ** 2"), "(2 ** (3 ** 2))");
        assert_eq!(roundtrip("-2 ** 2"), "(-(2 ** 2))");
        assert_eq!(roundtrip("2 ** -1"), "(2 ** (-1))");
    }

    #[test]
    fn identifiers_resolve_to_stats_functions_or_variables() {
        let expr = parse_calc("floor(speed / 2) + startingLevel + bonus").unwrap();
        let CalcExpr::Operation { left, right, .. } = &expr else {
            panic!("expected operation, got {}", expr.tag());
        };
        assert_eq!(right.as_ref(), &CalcExpr::Variable("bonus".into()));
        let CalcExpr::Operation { left, right, .. } = left.as_ref() else {
            panic!("expected operation");
        };
        assert_eq!(right.as_ref(), &CalcExpr::Stat(StatRef::StartingLevel));
        assert_eq!(left.tag(), "function");
        assert!(expr.references_stats());
        assert_eq!(
            parse_calc("spe").unwrap(),
            CalcExpr::Stat(StatRef::Stat(Stat::Speed))
        );
    }

    #[test]
    fn unknown_functions_are_parse_errors() {
        let error = parse_calc("1 + cbrt(8)").unwrap_err();
        assert_eq!(error.message, "unsupported function 'cbrt'");
        assert_eq!(error.column, 5);
    }

    #[test]
    fn dangling_operator_reports_expectation() {
        let error = parse_calc("1 +").unwrap_err();
        assert_eq!(error.found, "end of input");
        assert!(error.expected.contains(&"number".to_string()));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let error = parse_calc("1 2").unwrap_err();
        assert_eq!(error.expected, vec!["end of input".to_string()]);
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let error = parse_calc(&deep).unwrap_err();
        assert_eq!(error.message, "expression nested too deeply");

        let long_sum = vec!["1"; 100_000].join(" + ");
        assert!(parse_calc(&long_sum).is_err());

        let negations = format!("{}1", "-".repeat(100_000));
        assert!(parse_calc(&negations).is_err());

        let fits = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse_calc(&fits).unwrap(), CalcExpr::Number(1.0));
    }

    #[test]
    fn printed_form_reparses_to_same_tree() {
        for source in ["-(hp + 3) * 2", "round(log2(64)) % 5", "a / -b ** 2"] {
            let expr = parse_calc(source).unwrap();
            assert_eq!(parse_calc(&expr.to_string()).unwrap(), expr);
        }
    }
}
