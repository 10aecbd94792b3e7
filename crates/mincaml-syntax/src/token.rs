//! Source text, positions and tokens.

use crate::lexer::TokenKind;
use std::{
    fmt, fs,
    io::{self, Read as _},
    iter,
    path::{Path, PathBuf},
};

/// A location in the source text.
///
/// `line` and `column` are 1-based and the column counts characters, not
/// bytes. Positions taken from the same [`Source`] are ordered by `offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The pair of positions a syntax element covers. `end` points just past the
/// last character.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A lexical unit.
///
/// Tokens are owned by the lexer output and borrowed by the syntax tree.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: Position,
    pub end: Position,
}

impl Token<'_> {
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

/// A handle of the source text being compiled.
#[derive(Debug)]
pub struct Source {
    name: String,
    code: String,
    line_starts: Vec<usize>,
}

impl Source {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        let line_starts = iter::once(0)
            .chain(code.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            code,
            line_starts,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|error| SourceError::IO {
            path: path.to_owned(),
            error,
        })?;
        Ok(Self::new(path.display().to_string(), code))
    }

    pub fn from_stdin() -> Result<Self, SourceError> {
        let mut code = String::new();
        io::stdin()
            .read_to_string(&mut code)
            .map_err(SourceError::Stdin)?;
        Ok(Self::new("<stdin>", code))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Return the position of the specified byte offset.
    ///
    /// Offsets past the end of the code are clamped to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.code.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line];
        let column = match self.code.get(line_start..offset) {
            Some(prefix) => prefix.chars().count(),
            None => offset - line_start,
        };
        Position::new(offset, line + 1, column + 1)
    }

    /// Return the position just past the last character.
    pub fn end_position(&self) -> Position {
        self.position(self.code.len())
    }

    /// Return the text between the two positions, or an empty string if the
    /// range is out of bounds.
    pub fn snippet(&self, start: Position, end: Position) -> &str {
        self.code.get(start.offset..end.offset).unwrap_or("")
    }

    /// Return the text of the 1-based line, without the line terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.code.len());
        let text = &self.code[start..end];
        Some(text.trim_end_matches(['\n', '\r']))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}", path.display())]
    IO {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to read from stdin")]
    Stdin(#[source] io::Error),
}
