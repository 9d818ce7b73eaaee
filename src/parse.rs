//! The predictive recursive-descent parser: one function per grammar production,
//! enforcing operator precedence and left-associativity by construction.

use crate::ast::{BinOp, Block, Expr, LValue, Program, Stmt, UnOp, WriteArg};
use crate::error::{ParseError, ParseErrorType};
use crate::token::{self, Category, Position, Token};
use crate::value::text_to_int;
use std::iter::Peekable;

type TokenStream<'a> = Peekable<token::Lexer<'a>>;

/// The result of [`parse`]: whether the grammar matched (`ok`), whether the token
/// stream was fully consumed afterward (`done`), and the resulting tree (`ast`, valid
/// only when `ok` is `true`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub ok: bool,
    pub done: bool,
    pub ast: Option<Program>,
}

/// Parse `source` as a complete Jerboa program.
///
/// A caller considers the parse fully successful only when both `ok` and `done` hold:
/// `ok` alone means a `stmt_list` matched from position zero, but leftover tokens (an
/// unconsumed `end`, say) remain in the stream.
#[must_use]
pub fn parse(source: &str) -> ParseOutcome {
    let mut parser = Parser {
        input: token::lex(source).peekable(),
    };
    match parser.parse_stmt_list() {
        Ok(block) => {
            let done = parser.input.peek().is_none();
            ParseOutcome {
                ok: true,
                done,
                ast: Some(Program(block)),
            }
        }
        Err(_) => ParseOutcome {
            ok: false,
            done: false,
            ast: None,
        },
    }
}

struct Parser<'a> {
    input: TokenStream<'a>,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<&Token> {
        self.input.peek()
    }

    fn next(&mut self) -> Option<Token> {
        self.input.next()
    }

    fn here(&mut self) -> Position {
        self.peek().map_or(Position::NONE, |t| t.position)
    }

    fn err(&mut self, want: &str) -> ParseError {
        let pos = self.here();
        let got = match self.peek() {
            Some(t) if t.category == Category::Malformed => {
                return ParseError(ParseErrorType::MalformedToken(t.text.to_string()), pos);
            }
            Some(t) => format!("'{}'", t.text),
            None => "end of input".to_string(),
        };
        ParseError(ParseErrorType::Expected(want.to_string(), got), pos)
    }

    fn eat_punct(&mut self, text: &str) -> Result<Position, ParseError> {
        match self.peek() {
            Some(t) if t.category == Category::Punctuation && t.text == text => {
                Ok(self.next().unwrap().position)
            }
            _ => Err(self.err(&format!("'{text}'"))),
        }
    }

    fn eat_operator(&mut self, text: &str) -> Result<Position, ParseError> {
        match self.peek() {
            Some(t) if t.category == Category::Operator && t.text == text => {
                Ok(self.next().unwrap().position)
            }
            _ => Err(self.err(&format!("'{text}'"))),
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> Result<Position, ParseError> {
        match self.peek() {
            Some(t) if t.is_keyword(kw) => Ok(self.next().unwrap().position),
            _ => Err(self.err(&format!("'{kw}'"))),
        }
    }

    fn at_keyword(&mut self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    fn at_operator(&mut self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.category == Category::Operator && t.text == text)
    }

    fn at_punct(&mut self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.category == Category::Punctuation && t.text == text)
    }

    fn eat_identifier(&mut self) -> Result<(crate::Identifier, Position), ParseError> {
        match self.peek() {
            Some(t) if t.category == Category::Identifier => {
                let t = self.next().unwrap();
                Ok((t.text, t.position))
            }
            _ => Err(self.err("an identifier")),
        }
    }

    /// `stmt_list ::= { statement }`
    ///
    /// Stops — successfully — as soon as the current token can't start a `statement`:
    /// anything other than `write`/`def`/`if`/`while`/`return` or an identifier,
    /// including `end`, `else`, `elseif`, or end-of-stream.
    fn parse_stmt_list(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Block::new();
        while self.starts_statement() {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn starts_statement(&mut self) -> bool {
        match self.peek() {
            Some(t) if t.category == Category::Identifier => true,
            Some(t) if t.category == Category::Keyword => {
                matches!(
                    t.text.as_str(),
                    "write" | "def" | "if" | "while" | "return"
                )
            }
            _ => false,
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.at_keyword("write") {
            self.parse_write()
        } else if self.at_keyword("def") {
            self.parse_func_def()
        } else if self.at_keyword("if") {
            self.parse_if()
        } else if self.at_keyword("while") {
            self.parse_while()
        } else if self.at_keyword("return") {
            self.parse_return()
        } else {
            self.parse_id_statement()
        }
    }

    /// `"write" "(" write_arg { "," write_arg } ")"`
    fn parse_write(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.eat_keyword("write")?;
        self.eat_punct("(")?;
        let mut args = crate::ast::NodeVec::new();
        args.push(self.parse_write_arg()?);
        while self.at_punct(",") {
            self.next();
            args.push(self.parse_write_arg()?);
        }
        self.eat_punct(")")?;
        Ok(Stmt::Write(args, pos))
    }

    /// `write_arg ::= "cr" | STRLIT | expr`
    fn parse_write_arg(&mut self) -> Result<WriteArg, ParseError> {
        if self.at_keyword("cr") {
            self.next();
            return Ok(WriteArg::Cr);
        }
        if let Some(t) = self.peek() {
            if t.category == Category::StringLiteral {
                let t = self.next().unwrap();
                return Ok(WriteArg::StrLit(t.text));
            }
        }
        Ok(WriteArg::Expr(self.parse_expr()?))
    }

    /// `"def" ID "(" ")" stmt_list "end"`
    fn parse_func_def(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.eat_keyword("def")?;
        let (name, _) = self.eat_identifier()?;
        self.eat_punct("(")?;
        self.eat_punct(")")?;
        let body = self.parse_stmt_list()?;
        self.eat_keyword("end")?;
        Ok(Stmt::FuncDef(name, body, pos))
    }

    /// `"if" expr stmt_list { "elseif" expr stmt_list } [ "else" stmt_list ] "end"`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.eat_keyword("if")?;
        let mut branches = crate::ast::NodeVec::new();
        let cond = self.parse_expr()?;
        let body = self.parse_stmt_list()?;
        branches.push((cond, body));

        while self.at_keyword("elseif") {
            self.next();
            let cond = self.parse_expr()?;
            let body = self.parse_stmt_list()?;
            branches.push((cond, body));
        }

        let else_body = if self.at_keyword("else") {
            self.next();
            Some(self.parse_stmt_list()?)
        } else {
            None
        };

        self.eat_keyword("end")?;
        Ok(Stmt::If {
            branches,
            else_body,
            position: pos,
        })
    }

    /// `"while" expr stmt_list "end"`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.eat_keyword("while")?;
        let cond = self.parse_expr()?;
        let body = self.parse_stmt_list()?;
        self.eat_keyword("end")?;
        Ok(Stmt::While(cond, body, pos))
    }

    /// `"return" expr`
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let pos = self.eat_keyword("return")?;
        let expr = self.parse_expr()?;
        Ok(Stmt::Return(expr, pos))
    }

    /// `ID ( "(" ")" | [ "[" expr "]" ] "=" expr )`
    fn parse_id_statement(&mut self) -> Result<Stmt, ParseError> {
        let (name, pos) = self.eat_identifier()?;

        if self.at_punct("(") {
            self.next();
            self.eat_punct(")")?;
            return Ok(Stmt::FuncCall(name, pos));
        }

        let lvalue = if self.at_operator("[") {
            self.next();
            let index = self.parse_expr()?;
            self.eat_operator("]")?;
            LValue::Array(name, Box::new(index))
        } else {
            LValue::Simple(name)
        };

        self.eat_punct("=")?;
        let rvalue = self.parse_expr()?;
        Ok(Stmt::Assign(lvalue, rvalue, pos))
    }

    /// `expr ::= comp_expr { ("&&" | "||") comp_expr }`
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comp_expr()?;
        loop {
            let op = if self.at_operator("&&") {
                BinOp::And
            } else if self.at_operator("||") {
                BinOp::Or
            } else {
                break;
            };
            let pos = self.next().unwrap().position;
            let rhs = self.parse_comp_expr()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs), pos);
        }
        Ok(lhs)
    }

    /// `comp_expr ::= "!" comp_expr | arith_expr { cmp_op arith_expr }`
    fn parse_comp_expr(&mut self) -> Result<Expr, ParseError> {
        if self.at_operator("!") {
            let pos = self.next().unwrap().position;
            let operand = self.parse_comp_expr()?;
            return Ok(Expr::UnOp(UnOp::Not, Box::new(operand), pos));
        }

        let mut lhs = self.parse_arith_expr()?;
        loop {
            let op = if self.at_operator("==") {
                BinOp::Eq
            } else if self.at_operator("!=") {
                BinOp::Ne
            } else if self.at_operator("<=") {
                BinOp::Le
            } else if self.at_operator("<") {
                BinOp::Lt
            } else if self.at_operator(">=") {
                BinOp::Ge
            } else if self.at_operator(">") {
                BinOp::Gt
            } else {
                break;
            };
            let pos = self.next().unwrap().position;
            let rhs = self.parse_arith_expr()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs), pos);
        }
        Ok(lhs)
    }

    /// `arith_expr ::= term { ("+" | "-") term }`
    fn parse_arith_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = if self.at_operator("+") {
                BinOp::Add
            } else if self.at_operator("-") {
                BinOp::Sub
            } else {
                break;
            };
            let pos = self.next().unwrap().position;
            let rhs = self.parse_term()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs), pos);
        }
        Ok(lhs)
    }

    /// `term ::= factor { ("*" | "/" | "%") factor }`
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = if self.at_operator("*") {
                BinOp::Mul
            } else if self.at_operator("/") {
                BinOp::Div
            } else if self.at_operator("%") {
                BinOp::Mod
            } else {
                break;
            };
            let pos = self.next().unwrap().position;
            let rhs = self.parse_factor()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs), pos);
        }
        Ok(lhs)
    }

    /// ```text
    /// factor ::= "(" expr ")"
    ///          | ("+" | "-") factor
    ///          | NUMLIT
    ///          | ("true" | "false")
    ///          | "readnum" "(" ")"
    ///          | ID [ "(" ")" | "[" expr "]" ]
    /// ```
    ///
    /// A factor reduced to a single sub-production yields that sub-production's AST
    /// directly — parentheses never appear as nodes in the tree.
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        if self.at_punct("(") {
            self.next();
            let inner = self.parse_expr()?;
            self.eat_punct(")")?;
            return Ok(inner);
        }

        if self.at_operator("+") {
            let pos = self.next().unwrap().position;
            let operand = self.parse_factor()?;
            return Ok(Expr::UnOp(UnOp::Plus, Box::new(operand), pos));
        }
        if self.at_operator("-") {
            let pos = self.next().unwrap().position;
            let operand = self.parse_factor()?;
            return Ok(Expr::UnOp(UnOp::Minus, Box::new(operand), pos));
        }

        if let Some(t) = self.peek() {
            if t.category == Category::NumericLiteral {
                let t = self.next().unwrap();
                return Ok(Expr::NumLit(text_to_int(&t.text), t.position));
            }
        }

        if self.at_keyword("true") {
            let pos = self.next().unwrap().position;
            return Ok(Expr::BoolLit(true, pos));
        }
        if self.at_keyword("false") {
            let pos = self.next().unwrap().position;
            return Ok(Expr::BoolLit(false, pos));
        }

        if self.at_keyword("readnum") {
            let pos = self.next().unwrap().position;
            self.eat_punct("(")?;
            self.eat_punct(")")?;
            return Ok(Expr::ReadNum(pos));
        }

        if self.peek().is_some_and(|t| t.category == Category::Identifier) {
            let (name, pos) = self.eat_identifier()?;
            if self.at_punct("(") {
                self.next();
                self.eat_punct(")")?;
                return Ok(Expr::FuncCall(name, pos));
            }
            if self.at_operator("[") {
                self.next();
                let index = self.parse_expr()?;
                self.eat_operator("]")?;
                return Ok(Expr::ArrayVar(name, Box::new(index), pos));
            }
            return Ok(Expr::Var(name, pos));
        }

        Err(self.err("an expression"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Expr, Stmt};

    #[test]
    fn hello_world() {
        let out = parse(r#"write("Hello, world!", cr)"#);
        assert!(out.ok && out.done);
        let Program(stmts) = out.ast.unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Write(_, _)));
    }

    #[test]
    fn left_associativity_three_operand_chain() {
        let out = parse("a = 1 + 2 - 3");
        assert!(out.ok && out.done);
        let Program(stmts) = out.ast.unwrap();
        match &stmts[0] {
            Stmt::Assign(_, Expr::BinOp(BinOp::Sub, lhs, _, _), _) => {
                assert!(matches!(**lhs, Expr::BinOp(BinOp::Add, _, _, _)));
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parens_do_not_appear_in_ast() {
        let out = parse("a = (1 + 2)");
        assert!(out.ok && out.done);
        let Program(stmts) = out.ast.unwrap();
        match &stmts[0] {
            Stmt::Assign(_, Expr::BinOp(BinOp::Add, _, _, _), _) => {}
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn unary_chain_nests_right() {
        // `!` lives in comp_expr, not factor, so it cannot feed `-`'s operand directly.
        assert!(!parse("a = - ! true").ok);

        let out = parse("a = - - 1");
        assert!(out.ok && out.done);
        let Program(stmts) = out.ast.unwrap();
        match &stmts[0] {
            Stmt::Assign(_, Expr::UnOp(crate::ast::UnOp::Minus, inner, _), _) => {
                assert!(matches!(**inner, Expr::UnOp(crate::ast::UnOp::Minus, _, _)));
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn if_elseif_else_flattens() {
        let out = parse("if a write(cr) elseif b write(cr) else write(cr) end");
        assert!(out.ok && out.done);
        let Program(stmts) = out.ast.unwrap();
        match &stmts[0] {
            Stmt::If {
                branches,
                else_body,
                ..
            } => {
                assert_eq!(branches.len(), 2);
                assert!(else_body.is_some());
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn trailing_unconsumed_token_sets_done_false() {
        let out = parse("write(cr) end");
        assert!(out.ok);
        assert!(!out.done);
    }

    #[test]
    fn malformed_input_fails() {
        let out = parse("a = @");
        assert!(!out.ok);
    }

    #[test]
    fn array_assignment_and_index() {
        let out = parse("x[1] = 5");
        assert!(out.ok && out.done);
        let out = parse("write(x[1])");
        assert!(out.ok && out.done);
    }
}
