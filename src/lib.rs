//! # Jerboa — a small imperative scripting language
//!
//! This crate is the core of Jerboa: a lexer, a predictive recursive-descent parser,
//! and a tree-walking interpreter. It does not include a command-line driver — that's
//! a thin wrapper an embedder writes, wiring [`Interpreter::on_input`] /
//! [`Interpreter::on_output`] to standard input/output and printing a final dump of
//! the [`State`].
//!
//! ```
//! use jerboa::{parse, Interpreter, State};
//!
//! let outcome = parse(r#"write("Hello, world!", cr)"#);
//! assert!(outcome.ok && outcome.done);
//!
//! let mut state = State::new();
//! let mut output = String::new();
//! Interpreter::new()
//!     .on_output(|s| output.push_str(s))
//!     .run(&outcome.ast.unwrap(), &mut state);
//!
//! assert_eq!(output, "Hello, world!\n");
//! ```
//!
//! Data flows strictly forward: source text → [`lex`] → token stream → [`parse`] → AST
//! → [`Interpreter::run`] → effects on [`State`] and I/O. See `SPEC_FULL.md` in this
//! repository for the full language specification this crate implements.

pub mod ast;
pub mod error;
pub mod interp;
pub mod parse;
pub mod state;
pub mod token;
pub mod value;

pub use ast::{Block, Program};
pub use error::{ParseError, ParseErrorType};
pub use interp::Interpreter;
pub use parse::{parse, ParseOutcome};
pub use state::State;
pub use token::{lex, Category, Lexer, Position, Token};

/// An identifier or lexeme text. [`SmartString`](https://crates.io/crates/smartstring)
/// is used because most Jerboa identifiers and literal texts are short enough to live
/// entirely inline, avoiding a heap allocation per token.
pub(crate) type Identifier = smartstring::SmartString<smartstring::LazyCompact>;

#[cfg(test)]
mod integration {
    use super::*;

    #[test]
    fn doc_example_round_trip() {
        let outcome = parse(r#"write("Hello, world!", cr)"#);
        assert!(outcome.ok && outcome.done);

        let mut state = State::new();
        let mut output = String::new();
        Interpreter::new()
            .on_output(|s| output.push_str(s))
            .run(&outcome.ast.unwrap(), &mut state);

        assert_eq!(output, "Hello, world!\n");
    }
}
