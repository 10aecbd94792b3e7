//! Lexer implementation.

use crate::token::{Position, Source, Token};
use logos::Logos;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[doc(hidden)]
    #[token("(*", skip_comment)]
    Comment,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("not")]
    Not,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*([eE][\+\-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][\+\-]?[0-9]+")]
    Float,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("+.")]
    PlusDot,

    #[token("-.")]
    MinusDot,

    #[token("*.")]
    StarDot,

    #[token("/.")]
    SlashDot,

    #[token("=")]
    Equal,

    #[token("<>")]
    LessGreater,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEqual,

    #[token(">=")]
    GreaterEqual,

    #[token("<-")]
    LessMinus,

    #[token("if")]
    If,

    #[token("then")]
    Then,

    #[token("else")]
    Else,

    #[token("let")]
    Let,

    #[token("in")]
    In,

    #[token("rec")]
    Rec,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    #[token("Array.create")]
    #[token("Array.make")]
    ArrayCreate,

    #[regex(r"[a-zA-Z_][0-9a-zA-Z_]*")]
    Ident,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Comment => "comment",
            Self::LParen => "`('",
            Self::RParen => "`)'",
            Self::True => "`true'",
            Self::False => "`false'",
            Self::Not => "`not'",
            Self::Int => "integer literal",
            Self::Float => "float literal",
            Self::Plus => "`+'",
            Self::Minus => "`-'",
            Self::PlusDot => "`+.'",
            Self::MinusDot => "`-.'",
            Self::StarDot => "`*.'",
            Self::SlashDot => "`/.'",
            Self::Equal => "`='",
            Self::LessGreater => "`<>'",
            Self::Less => "`<'",
            Self::Greater => "`>'",
            Self::LessEqual => "`<='",
            Self::GreaterEqual => "`>='",
            Self::LessMinus => "`<-'",
            Self::If => "`if'",
            Self::Then => "`then'",
            Self::Else => "`else'",
            Self::Let => "`let'",
            Self::In => "`in'",
            Self::Rec => "`rec'",
            Self::Comma => "`,'",
            Self::Dot => "`.'",
            Self::Semicolon => "`;'",
            Self::ArrayCreate => "`Array.create'",
            Self::Ident => "identifier",
        };
        f.write_str(s)
    }
}

// Comments nest, which a regular expression cannot express.
fn skip_comment(lexer: &mut logos::Lexer<'_, TokenKind>) -> bool {
    let rest = lexer.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i + 1 < rest.len() {
        match (rest[i], rest[i + 1]) {
            (b'(', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b')') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lexer.bump(i);
                    return true;
                }
            }
            _ => i += 1,
        }
    }
    lexer.bump(rest.len());
    false
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("{pos}: unexpected character `{text}'")]
    UnexpectedChar { text: String, pos: Position },

    #[error("{pos}: unterminated comment")]
    UnterminatedComment { pos: Position },
}

/// The token supplier over a [`Source`].
///
/// Comments and whitespace are dropped and every token carries its start
/// and end positions.
pub struct Lexer<'a> {
    source: &'a Source,
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source.code()),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let res = self.inner.next()?;
            let span = self.inner.span();
            let text = self.inner.slice();
            let start = self.source.position(span.start);
            let kind = match res {
                Ok(TokenKind::Comment) => continue,
                Ok(kind) => kind,
                Err(()) if text.starts_with("(*") => {
                    return Some(Err(LexError::UnterminatedComment { pos: start }));
                }
                Err(()) => {
                    return Some(Err(LexError::UnexpectedChar {
                        text: text.to_owned(),
                        pos: start,
                    }));
                }
            };
            let token = Token {
                kind,
                text,
                start,
                end: self.source.position(span.end),
            };
            tracing::trace!("token {:?} {:?} at {}", token.kind, token.text, token.start);
            return Some(Ok(token));
        }
    }
}

/// Split the whole source into tokens.
pub fn tokenize(source: &Source) -> Result<Vec<Token<'_>>, LexError> {
    let span = tracing::trace_span!("tokenize", file = source.name());
    let _entered = span.enter();
    Lexer::new(source).collect()
}
