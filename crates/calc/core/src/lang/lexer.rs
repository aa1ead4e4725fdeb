//! Tokenizer and token cursor shared by both grammars.

use core::fmt;

use crate::config::CalcConfig;

use super::error::{ParseError, Span};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    /// `-`, also written as an en dash.
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    LParen,
    RParen,
    Equals,
    Tilde,
    Question,
    AndAnd,
    OrOr,
    Eof,
}

impl TokenKind {
    /// Short description used in `expected`/`found` diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(value) => format!("number {value}"),
            TokenKind::Ident(name) => format!("'{name}'"),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{other}'"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(value) => return write!(f, "{value}"),
            TokenKind::Ident(name) => return f.write_str(name),
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Equals => "=",
            TokenKind::Tilde => "~",
            TokenKind::Question => "?",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Eof => "",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Splits `source` into tokens, ending with [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        let kind = match ch {
            '0'..='9' | '.' => {
                let mut end = start + ch.len_utf8();
                while let Some((index, next)) = chars.peek().copied()
                    && (next.is_ascii_digit() || next == '.')
                {
                    end = index + next.len_utf8();
                    chars.next();
                }
                let text = &source[start..end];
                let value = text.parse::<f64>().map_err(|_| {
                    ParseError::new(
                        source,
                        Span::new(start, end),
                        format!("malformed number '{text}'"),
                        vec!["number".to_string()],
                        format!("'{text}'"),
                    )
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    span: Span::new(start, end),
                });
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + ch.len_utf8();
                while let Some((index, next)) = chars.peek().copied()
                    && (next.is_alphanumeric() || next == '_')
                {
                    end = index + next.len_utf8();
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(source[start..end].to_string()),
                    span: Span::new(start, end),
                });
                continue;
            }
            '+' => TokenKind::Plus,
            '-' | '\u{2013}' => TokenKind::Minus,
            '*' => {
                if chars.next_if(|(_, next)| *next == '*').is_some() {
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => TokenKind::Equals,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            '&' | '|' => {
                if chars.next_if(|(_, next)| *next == ch).is_none() {
                    let doubled = format!("'{ch}{ch}'");
                    return Err(ParseError::new(
                        source,
                        Span::new(start, start + 1),
                        format!("unexpected '{ch}'"),
                        vec![doubled],
                        format!("'{ch}'"),
                    ));
                }
                if ch == '&' { TokenKind::AndAnd } else { TokenKind::OrOr }
            }
            other => {
                return Err(ParseError::new(
                    source,
                    Span::new(start, start + other.len_utf8()),
                    format!("unexpected character '{other}'"),
                    Vec::new(),
                    format!("'{other}'"),
                ));
            }
        };

        let end = chars.peek().map_or(source.len(), |(index, _)| *index);
        tokens.push(Token {
            kind,
            span: Span::new(start, end),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(source.len(), source.len()),
    });
    Ok(tokens)
}

/// Cursor over a token list with diagnostics bound to the source text.
pub struct TokenStream<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            depth: 0,
        })
    }

    pub fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consumes the next token if it has the same kind as `expected`.
    pub fn consume(&mut self, expected: &TokenKind) -> bool {
        if core::mem::discriminant(self.peek_kind()) == core::mem::discriminant(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        if core::mem::discriminant(self.peek_kind()) == core::mem::discriminant(expected) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&[&format!("'{expected}'")]))
        }
    }

    /// Opens one nesting level, failing past [`CalcConfig::MAX_NESTING`].
    pub fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= CalcConfig::MAX_NESTING {
            let span = self.peek().span;
            return Err(self.error_at(span, "expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Closes `levels` nesting levels opened with [`Self::enter`].
    pub fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Fails unless every token has been consumed.
    pub fn finish(&self) -> Result<(), ParseError> {
        if *self.peek_kind() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected(&["end of input"]))
        }
    }

    /// Error at the next token listing what would have been accepted.
    pub fn unexpected(&self, expected: &[&str]) -> ParseError {
        let token = self.peek();
        let found = token.kind.describe();
        ParseError::new(
            self.source,
            token.span,
            format!("unexpected {found}"),
            expected.iter().map(|e| e.to_string()).collect(),
            found,
        )
    }

    /// Error at an arbitrary span.
    pub fn error_at(&self, span: Span, message: impl Into<String>) -> ParseError {
        let found = self.source.get(span.start..span.end).unwrap_or_default();
        ParseError::new(self.source, span, message, Vec::new(), format!("'{found}'"))
    }
}
