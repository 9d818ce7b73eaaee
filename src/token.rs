//! Main module defining the lexer: character classifiers, the token stream, and the
//! maximal-munch override for signed numeric literals.

use crate::Identifier;
use std::fmt;
use std::iter::FusedIterator;
use std::str::Chars;

/// A location (line number + character position) in the source text.
///
/// Both fields are 1-based. [`Position::NONE`] is used for tokens synthesized outside
/// any real source (there are none in this crate today, but the teacher's own
/// [`Position`] carries the same escape hatch).
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, Default)]
pub struct Position {
    line: u32,
    col: u32,
}

impl Position {
    /// A [`Position`] representing no position.
    pub const NONE: Self = Self { line: 0, col: 0 };
    /// The first position in any source.
    pub const START: Self = Self { line: 1, col: 1 };

    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    #[must_use]
    pub const fn col(self) -> u32 {
        self.col
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NONE {
            f.write_str("none")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

/// The lexical class of a [`Token`].
///
/// Keyword is not further parameterized: the keyword's spelling lives in the token's
/// `text` field, same as every other category.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum Category {
    Keyword,
    Identifier,
    NumericLiteral,
    StringLiteral,
    Operator,
    Punctuation,
    Malformed,
}

/// The fixed keyword list. `readnum` and `cr` are keywords even though they behave like
/// a call and a bare output marker respectively — the grammar treats them as reserved
/// words, not identifiers, so they belong here.
const KEYWORDS: &[&str] = &[
    "cr", "def", "else", "elseif", "end", "false", "if", "readnum", "return", "true", "while",
    "write",
];

#[must_use]
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// One lexeme: its verbatim text (quotes included, for strings) and its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: Identifier,
    pub category: Category,
    pub position: Position,
}

impl Token {
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.category == Category::Keyword && self.text == kw
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_jerboa_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// What the maximal-munch override in `PLUS`/`MINUS` needs to remember about the
/// previously emitted token: only enough to answer "was that a value?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrevLexeme {
    None,
    ValueLike,
    Other,
}

/// A single-pass, non-restartable iterator over the tokens of one source string.
///
/// Construct with [`lex`]. The lexer never fails: unrecognized bytes surface as
/// [`Category::Malformed`] tokens rather than stopping the stream.
pub struct Lexer<'a> {
    chars: Chars<'a>,
    pos: Position,
    prev: PrevLexeme,
}

/// Produce a lazy, single-pass sequence of tokens from `source`.
///
/// Whitespace and `#`-to-end-of-line comments are skipped between lexemes and never
/// appear as tokens themselves.
#[must_use]
pub fn lex(source: &str) -> Lexer<'_> {
    Lexer {
        chars: source.chars(),
        pos: Position::START,
        prev: PrevLexeme::None,
    }
}

impl<'a> Lexer<'a> {
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.pos.advance(ch);
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.chars.clone();
        it.next();
        it.next()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if is_jerboa_whitespace(ch) => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn emit(&mut self, text: String, category: Category, start: Position) -> Token {
        self.prev = match category {
            Category::Identifier => PrevLexeme::ValueLike,
            Category::NumericLiteral => PrevLexeme::ValueLike,
            Category::Keyword if text == "true" || text == "false" => PrevLexeme::ValueLike,
            Category::Operator if text == "]" => PrevLexeme::ValueLike,
            Category::Punctuation if text == ")" => PrevLexeme::ValueLike,
            _ => PrevLexeme::Other,
        };
        Token {
            text: text.into(),
            category,
            position: start,
        }
    }

    /// `LETTER` state: accumulate identifier characters, then classify.
    fn lex_letter(&mut self, start: Position, first: char) -> Token {
        let mut text = String::new();
        text.push(first);
        while let Some(ch) = self.peek() {
            if !is_ident_continue(ch) {
                break;
            }
            text.push(ch);
            self.bump();
        }
        let category = if is_keyword(&text) {
            Category::Keyword
        } else {
            Category::Identifier
        };
        self.emit(text, category, start)
    }

    /// `DIGIT`/`EXPONENT` states: accumulate a decimal integer with an optional
    /// `E`/`e` exponent (itself with an optional `+`).
    fn lex_digit(&mut self, start: Position, first: char) -> Token {
        let mut text = String::new();
        text.push(first);
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.bump();
        }
        if let Some(e @ ('E' | 'e')) = self.peek() {
            let after_e = self.peek2();
            match after_e {
                Some(d) if d.is_ascii_digit() => {
                    text.push(e);
                    self.bump();
                    self.lex_exponent_digits(&mut text);
                }
                Some('+') => {
                    let mut look = self.chars.clone();
                    look.next(); // E
                    look.next(); // +
                    if look.next().is_some_and(|c| c.is_ascii_digit()) {
                        text.push(e);
                        self.bump();
                        text.push('+');
                        self.bump();
                        self.lex_exponent_digits(&mut text);
                    }
                }
                _ => {}
            }
        }
        self.emit(text, Category::NumericLiteral, start)
    }

    fn lex_exponent_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.bump();
        }
    }

    /// `PLUS`/`MINUS` states, with the maximal-munch override: normally a digit right
    /// after `+`/`-` would fold into a signed literal, but not when the previous token
    /// was value-like — there, `+`/`-` must be a binary operator.
    fn lex_sign(&mut self, start: Position, sign: char) -> Token {
        if self.prev != PrevLexeme::ValueLike {
            if let Some(d) = self.peek() {
                if d.is_ascii_digit() {
                    self.bump();
                    let mut tok = self.lex_digit(start, d);
                    tok.text = format!("{sign}{}", tok.text).into();
                    return tok;
                }
            }
        }
        self.emit(sign.to_string(), Category::Operator, start)
    }

    /// `STRING` state: accumulate until the matching quote, or bail out as `Malformed`
    /// on an embedded newline or end-of-input.
    fn lex_string(&mut self, start: Position, quote: char) -> Token {
        let mut text = String::new();
        text.push(quote);
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    text.push(ch);
                    self.bump();
                    return self.emit(text, Category::StringLiteral, start);
                }
                Some('\n') => {
                    text.push('\n');
                    self.bump();
                    return self.emit(text, Category::Malformed, start);
                }
                Some(ch) => {
                    text.push(ch);
                    self.bump();
                }
                None => return self.emit(text, Category::Malformed, start),
            }
        }
    }

    /// `AMP`/`PIPE` states: `&&`/`||` as Operator, or the lone character as Punctuation.
    fn lex_doubled(&mut self, start: Position, ch: char) -> Token {
        if self.peek() == Some(ch) {
            self.bump();
            self.emit(format!("{ch}{ch}"), Category::Operator, start)
        } else {
            self.emit(ch.to_string(), Category::Punctuation, start)
        }
    }

    /// `COMPARISON` state: after `! = < >`, fold a following `=` into a two-character
    /// operator; otherwise the single character stands alone.
    ///
    /// A lone `=` not followed by `=` is Punctuation (assignment), per §4.2; the other
    /// three (`!`, `<`, `>`) stand alone as Operator.
    fn lex_comparison(&mut self, start: Position, ch: char) -> Token {
        if self.peek() == Some('=') {
            self.bump();
            self.emit(format!("{ch}="), Category::Operator, start)
        } else if ch == '=' {
            self.emit(ch.to_string(), Category::Punctuation, start)
        } else {
            self.emit(ch.to_string(), Category::Operator, start)
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let ch = self.bump()?;

        Some(match ch {
            c if is_ident_start(c) => self.lex_letter(start, c),
            c if c.is_ascii_digit() => self.lex_digit(start, c),
            '+' | '-' => self.lex_sign(start, ch),
            '"' | '\'' => self.lex_string(start, ch),
            '&' | '|' => self.lex_doubled(start, ch),
            '!' | '=' | '<' | '>' => self.lex_comparison(start, ch),
            '(' | ')' | ',' => self.emit(ch.to_string(), Category::Punctuation, start),
            '[' | ']' | '*' | '/' | '%' => self.emit(ch.to_string(), Category::Operator, start),
            c => self.emit(c.to_string(), Category::Malformed, start),
        })
    }
}

impl<'a> FusedIterator for Lexer<'a> {}
