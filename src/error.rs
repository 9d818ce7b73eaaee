//! Error definitions for the parsing process.
//!
//! There is deliberately no `LexError`: per the lexer's contract, tokenizing never
//! fails — unrecognized input surfaces as a [`crate::token::Category::Malformed`]
//! token, which the parser then rejects as an ordinary grammar mismatch. Runtime
//! errors do not exist at the language level either (missing variables read as zero,
//! division by zero yields zero, …), so [`ParseError`] is the only error type this
//! crate defines.

use crate::token::Position;
use std::error::Error;
use std::fmt;

/// The kind of grammar mismatch that stopped the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorType {
    /// The token stream ended before a production was satisfied.
    UnexpectedEof,
    /// A specific token or symbol was expected but something else (or nothing) was found.
    /// Wrapped values are what was expected and what was found instead.
    Expected(String, String),
    /// A token classified as [`Malformed`][crate::token::Category::Malformed] was
    /// encountered where a well-formed token was required.
    MalformedToken(String),
}

impl fmt::Display for ParseErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::Expected(want, got) => write!(f, "expected {want}, found {got}"),
            Self::MalformedToken(text) => write!(f, "malformed token: '{text}'"),
        }
    }
}

/// A parse failure, carrying the position at which the failing production was
/// attempted. The token stream's position after a failure is otherwise unspecified —
/// the parser does not attempt recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub ParseErrorType, pub Position);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.1)
    }
}

impl Error for ParseError {}
