//! Recursive-descent parser for stat conditions.
//!
//! ```text
//! condition := conjunct ('||' condition)?
//! conjunct  := term ('&&' conjunct)?
//! term      := '(' condition ')' | IDENT '=' '~'? value
//! value     := pattern ('/' pattern '/' pattern)?
//! pattern   := INT '-' INT | INT '-' | INT '+' | INT | '*' | '?' | 'x'
//! ```
//!
//! Both logical operators chain to the right; `&&` binds tighter only
//! because conjunctions are parsed inside disjunctions. Parentheses and
//! chained operators count toward `CalcConfig::MAX_NESTING`.

use crate::lang::error::{ParseError, Span};
use crate::lang::lexer::{TokenKind, TokenStream};

use super::ast::{
    Condition, ConditionValue, IvPattern, LogicalOperator, RangePattern, StatCondition,
};

const PATTERN_START: [&str; 4] = ["number", "'*'", "'?'", "'x'"];

/// Parses a condition.
pub fn parse_condition(source: &str) -> Result<Condition, ParseError> {
    let mut stream = TokenStream::new(source)?;
    let condition = parse_disjunction(&mut stream)?;
    stream.finish()?;
    Ok(condition)
}

fn parse_disjunction(stream: &mut TokenStream<'_>) -> Result<Condition, ParseError> {
    let left = parse_conjunction(stream)?;
    if stream.consume(&TokenKind::OrOr) {
        stream.enter()?;
        let right = parse_disjunction(stream)?;
        stream.leave(1);
        return Ok(Condition::logical(LogicalOperator::Or, left, right));
    }
    Ok(left)
}

fn parse_conjunction(stream: &mut TokenStream<'_>) -> Result<Condition, ParseError> {
    let left = parse_term(stream)?;
    if stream.consume(&TokenKind::AndAnd) {
        stream.enter()?;
        let right = parse_conjunction(stream)?;
        stream.leave(1);
        return Ok(Condition::logical(LogicalOperator::And, left, right));
    }
    Ok(left)
}

fn parse_term(stream: &mut TokenStream<'_>) -> Result<Condition, ParseError> {
    if stream.consume(&TokenKind::LParen) {
        stream.enter()?;
        let inner = parse_disjunction(stream)?;
        stream.leave(1);
        stream.expect(&TokenKind::RParen)?;
        return Ok(inner);
    }

    let TokenKind::Ident(stat_name) = stream.peek_kind().clone() else {
        return Err(stream.unexpected(&["stat name", "'('"]));
    };
    stream.next();
    stream.expect(&TokenKind::Equals)?;
    let inverted = stream.consume(&TokenKind::Tilde);

    let first = parse_pattern(stream)?;
    let value = if stream.consume(&TokenKind::Slash) {
        let neutral = parse_pattern(stream)?;
        stream.expect(&TokenKind::Slash)?;
        let boosted = parse_pattern(stream)?;
        ConditionValue::Triple(IvPattern {
            reduced: first,
            neutral,
            boosted,
        })
    } else {
        ConditionValue::Range(first)
    };

    Ok(Condition::Stat(StatCondition {
        stat_name,
        inverted,
        value,
    }))
}

fn parse_pattern(stream: &mut TokenStream<'_>) -> Result<RangePattern, ParseError> {
    let token = stream.peek().clone();
    match token.kind {
        TokenKind::Star => {
            stream.next();
            Ok(RangePattern::Wildcard)
        }
        TokenKind::Question => {
            stream.next();
            Ok(RangePattern::Present)
        }
        TokenKind::Ident(name) if name.eq_ignore_ascii_case("x") => {
            stream.next();
            Ok(RangePattern::Impossible)
        }
        TokenKind::Number(value) => {
            stream.next();
            let from = whole(stream, value, token.span)?;
            if stream.consume(&TokenKind::Plus) {
                return Ok(RangePattern::AtLeast(from));
            }
            if stream.consume(&TokenKind::Minus) {
                let bound = stream.peek().clone();
                if let TokenKind::Number(to) = bound.kind {
                    stream.next();
                    let to = whole(stream, to, bound.span)?;
                    return Ok(RangePattern::Bounded { from, to });
                }
                return Ok(RangePattern::AtMost(from));
            }
            Ok(RangePattern::Exact(from))
        }
        _ => Err(stream.unexpected(&PATTERN_START)),
    }
}

fn whole(stream: &TokenStream<'_>, value: f64, span: Span) -> Result<u32, ParseError> {
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(stream.error_at(span, format!("expected a whole number, found {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(source: &str) -> String {
        parse_condition(source).unwrap().to_string()
    }

    #[test]
    fn single_terms() {
        assert_eq!(roundtrip("hp = 31-31"), "hp = 31-31");
        assert_eq!(roundtrip("hp = 31\u{2013}31"), "hp = 31-31");
        assert_eq!(roundtrip("speed=~0+"), "speed = ~0+");
        assert_eq!(roundtrip("atk = 20-"), "atk = 20-");
        assert_eq!(roundtrip("def = 0-5 / x / ?"), "def = 0-5/x/?");
    }

    #[test]
    fn and_binds_inside_or_and_both_chain_right() {
        assert_eq!(
            roundtrip("hp = 1 || atk = 2 && def = 3"),
            "(hp = 1 || (atk = 2 && def = 3))"
        );
        assert_eq!(
            roundtrip("hp = 1 && atk = 2 && def = 3"),
            "(hp = 1 && (atk = 2 && def = 3))"
        );
        assert_eq!(
            roundtrip("(hp = 1 || atk = 2) && def = 3"),
            "((hp = 1 || atk = 2) && def = 3)"
        );
    }

    #[test]
    fn node_tags() {
        let condition = parse_condition("hp = 5+ && spe = */*/31").unwrap();
        assert_eq!(condition.tag(), "logicalExpression");
        let Condition::Logical { left, right, .. } = condition else {
            panic!("expected logical expression");
        };
        let (Condition::Stat(left), Condition::Stat(right)) = (*left, *right) else {
            panic!("expected stat expressions");
        };
        assert_eq!(left.value.tag(), "unboundedRange");
        assert_eq!(right.value.tag(), "ivRange");
    }

    #[test]
    fn incomplete_triples_are_rejected() {
        let error = parse_condition("hp = 1/2").unwrap_err();
        assert_eq!(error.expected, vec!["'/'".to_string()]);
        assert_eq!(error.found, "end of input");
    }

    #[test]
    fn fractions_are_rejected() {
        let error = parse_condition("hp = 1.5").unwrap_err();
        assert_eq!(error.message, "expected a whole number, found 1.5");
        assert_eq!(error.column, 6);
    }

    #[test]
    fn missing_pattern_lists_alternatives() {
        let error = parse_condition("hp = &&").unwrap_err();
        assert_eq!(error.expected.len(), PATTERN_START.len());
        assert_eq!(error.found, "'&&'");
    }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let deep = format!("{}hp = 1{}", "(".repeat(200_000), ")".repeat(200_000));
        let error = parse_condition(&deep).unwrap_err();
        assert_eq!(error.message, "expression nested too deeply");

        let long_chain = vec!["hp = 1"; 100_000].join(" && ");
        let error = parse_condition(&long_chain).unwrap_err();
        assert_eq!(error.message, "expression nested too deeply");

        let fits = vec!["hp = 1"; 50].join(" || ");
        assert!(parse_condition(&fits).is_ok());
    }
}
