//! The tree-walking interpreter: [`Interpreter::run`] executes a [`Program`] against a
//! [`State`], invoking the caller's I/O callbacks as it goes.
//!
//! The interpreter never fails. Unhandled AST shapes would be a compiler error, not a
//! runtime one, because `Stmt`/`Expr` are closed enums and every match below is
//! exhaustive — there is no `_ => unreachable!()` catch-all anywhere in this file.

use crate::ast::{BinOp, Block, Expr, LValue, Program, Stmt, UnOp, WriteArg};
use crate::state::State;
use crate::value::{bool_to_int, int_to_bool};

/// Non-local exit used to unwind a `return` out of the statement list currently
/// executing, without unwinding an enclosing `while`/`if` that belongs to a
/// *different* function's frame — see the design note in `SPEC_FULL.md` §9.
enum Flow {
    Normal,
    Return(i64),
}

/// Tree-walking evaluator for Jerboa programs.
///
/// Holds the two I/O callbacks the language needs: one line of input per `readnum`,
/// one chunk of output per `write` argument. Construct with [`Interpreter::new`] and
/// wire callbacks with [`Interpreter::on_input`] / [`Interpreter::on_output`], mirroring
/// the builder shape of the teacher's `Engine::on_print`/`Engine::on_debug`.
pub struct Interpreter<'cb> {
    input_line: Box<dyn FnMut() -> String + 'cb>,
    output_text: Box<dyn FnMut(&str) + 'cb>,
}

impl<'cb> Default for Interpreter<'cb> {
    fn default() -> Self {
        Self {
            input_line: Box::new(String::new),
            output_text: Box::new(|_: &str| {}),
        }
    }
}

impl<'cb> Interpreter<'cb> {
    /// An interpreter whose `readnum` always returns an empty line and whose `write`
    /// discards its output, until callbacks are attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the callback invoked once per `readnum` evaluation.
    #[must_use]
    pub fn on_input(mut self, callback: impl FnMut() -> String + 'cb) -> Self {
        self.input_line = Box::new(callback);
        self
    }

    /// Supply the callback invoked once per logical output chunk (a string literal, a
    /// `cr`, or a written value) — never with an appended newline of its own.
    #[must_use]
    pub fn on_output(mut self, callback: impl FnMut(&str) + 'cb) -> Self {
        self.output_text = Box::new(callback);
        self
    }

    /// Execute `program` against `state`, mutating it in place.
    ///
    /// At the top level a `return` simply ends the program; its value is surfaced back
    /// to the caller exactly as a function-body `return`'s is to `call_function` — `0`
    /// if the program never ran one.
    pub fn run(&mut self, program: &Program, state: &mut State) -> i64 {
        match self.exec_block(&program.0, state) {
            Flow::Normal => 0,
            Flow::Return(value) => value,
        }
    }

    /// Execute a statement list, stopping early on a `return`. Returns the `Flow` so
    /// the caller (a function-call frame, or this same method recursing into a nested
    /// `if`/`while` body) knows whether to keep going.
    fn exec_block(&mut self, block: &Block, state: &mut State) -> Flow {
        for stmt in block {
            match self.exec_stmt(stmt, state) {
                Flow::Normal => {}
                ret @ Flow::Return(_) => return ret,
            }
        }
        Flow::Normal
    }

    fn exec_stmt(&mut self, stmt: &Stmt, state: &mut State) -> Flow {
        match stmt {
            Stmt::Write(args, _) => {
                for arg in args {
                    match arg {
                        WriteArg::Cr => (self.output_text)("\n"),
                        WriteArg::StrLit(text) => {
                            let inner = strip_quotes(text);
                            (self.output_text)(inner);
                        }
                        WriteArg::Expr(expr) => {
                            let value = self.eval(expr, state);
                            (self.output_text)(&value.to_string());
                        }
                    }
                }
                Flow::Normal
            }
            Stmt::FuncDef(name, body, _) => {
                state.define_function(name.clone(), body.clone());
                Flow::Normal
            }
            Stmt::FuncCall(name, _) => {
                self.call_function(name, state);
                Flow::Normal
            }
            Stmt::If {
                branches,
                else_body,
                ..
            } => {
                for (cond, body) in branches {
                    if int_to_bool(self.eval(cond, state)) {
                        return self.exec_block(body, state);
                    }
                }
                if let Some(body) = else_body {
                    return self.exec_block(body, state);
                }
                Flow::Normal
            }
            Stmt::While(cond, body, _) => {
                while int_to_bool(self.eval(cond, state)) {
                    match self.exec_block(body, state) {
                        Flow::Normal => {}
                        ret @ Flow::Return(_) => return ret,
                    }
                }
                Flow::Normal
            }
            Stmt::Return(expr, _) => {
                let value = self.eval(expr, state);
                Flow::Return(value)
            }
            Stmt::Assign(lvalue, rvalue, _) => {
                let value = self.eval(rvalue, state);
                match lvalue {
                    LValue::Simple(name) => state.set_var(name.clone(), value),
                    LValue::Array(name, index_expr) => {
                        let index = self.eval(index_expr, state);
                        state.set_array(name.clone(), index, value);
                    }
                }
                Flow::Normal
            }
        }
    }

    /// Execute a function body (no parameters, no private scope: all variable
    /// references resolve against the same global `state`). Returns the value of its
    /// last-executed `return`, or `0` if it never returned one.
    fn call_function(&mut self, name: &str, state: &mut State) -> i64 {
        let Some(body) = state.function(name).cloned() else {
            // Undefined function: a no-op, per §4.3.2.
            return 0;
        };
        match self.exec_block(&body, state) {
            Flow::Normal => 0,
            Flow::Return(value) => value,
        }
    }

    fn eval(&mut self, expr: &Expr, state: &mut State) -> i64 {
        match expr {
            Expr::BinOp(op, lhs, rhs, _) => self.eval_binop(*op, lhs, rhs, state),
            Expr::UnOp(op, operand, _) => {
                let value = self.eval(operand, state);
                match op {
                    UnOp::Plus => value,
                    UnOp::Minus => value.wrapping_neg(),
                    UnOp::Not => bool_to_int(!int_to_bool(value)),
                }
            }
            Expr::NumLit(n, _) => *n,
            Expr::BoolLit(b, _) => bool_to_int(*b),
            Expr::ReadNum(_) => {
                let line = (self.input_line)();
                crate::value::text_to_int(&line)
            }
            Expr::Var(name, _) => state.get_var(name),
            Expr::ArrayVar(name, index_expr, _) => {
                let index = self.eval(index_expr, state);
                state.get_array(name, index)
            }
            Expr::FuncCall(name, _) => self.call_function(name, state),
        }
    }

    /// `&&` and `||` short-circuit (the conventional reading; see `SPEC_FULL.md` §9),
    /// so the right operand is evaluated only when it can still affect the result.
    fn eval_binop(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, state: &mut State) -> i64 {
        match op {
            BinOp::And => {
                let l = self.eval(lhs, state);
                if !int_to_bool(l) {
                    return bool_to_int(false);
                }
                bool_to_int(int_to_bool(self.eval(rhs, state)))
            }
            BinOp::Or => {
                let l = self.eval(lhs, state);
                if int_to_bool(l) {
                    return bool_to_int(true);
                }
                bool_to_int(int_to_bool(self.eval(rhs, state)))
            }
            _ => {
                let l = self.eval(lhs, state);
                let r = self.eval(rhs, state);
                match op {
                    BinOp::Add => l.wrapping_add(r),
                    BinOp::Sub => l.wrapping_sub(r),
                    BinOp::Mul => l.wrapping_mul(r),
                    BinOp::Div => l.checked_div(r).unwrap_or(0),
                    BinOp::Mod => l.checked_rem(r).unwrap_or(0),
                    BinOp::Eq => bool_to_int(l == r),
                    BinOp::Ne => bool_to_int(l != r),
                    BinOp::Lt => bool_to_int(l < r),
                    BinOp::Le => bool_to_int(l <= r),
                    BinOp::Gt => bool_to_int(l > r),
                    BinOp::Ge => bool_to_int(l >= r),
                    BinOp::And | BinOp::Or => unreachable!("handled above"),
                }
            }
        }
    }
}

/// Strip exactly one quote character from each end of a `STRLIT_OUT` token's text.
fn strip_quotes(text: &str) -> &str {
    let bytes = text.len();
    if bytes >= 2 {
        &text[1..bytes - 1]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn run(src: &str) -> (String, State) {
        let out = parse(src);
        assert!(out.ok && out.done, "parse failed for: {src}");
        let program = out.ast.unwrap();
        let mut state = State::new();
        let mut sink = String::new();
        {
            let mut interp = Interpreter::new().on_output(|s| sink.push_str(s));
            interp.run(&program, &mut state);
        }
        (sink, state)
    }

    fn run_with_input(src: &str, mut lines: std::vec::IntoIter<&'static str>) -> (String, State) {
        let out = parse(src);
        assert!(out.ok && out.done, "parse failed for: {src}");
        let program = out.ast.unwrap();
        let mut state = State::new();
        let mut sink = String::new();
        {
            let mut interp = Interpreter::new()
                .on_output(|s| sink.push_str(s))
                .on_input(move || lines.next().unwrap_or("").to_string());
            interp.run(&program, &mut state);
        }
        (sink, state)
    }

    #[test]
    fn hello_world() {
        let (out, _) = run(r#"write("Hello, world!", cr)"#);
        assert_eq!(out, "Hello, world!\n");
    }

    #[test]
    fn arithmetic_and_assignment() {
        let (out, state) = run("a = 3 + 4 * 2  write(a, cr)");
        assert_eq!(out, "11\n");
        assert_eq!(state.get_var("a"), 11);
    }

    #[test]
    fn signed_literal_maximal_munch_override() {
        let (out, _) = run("a = 2  b = a -1  write(b, cr)");
        assert_eq!(out, "1\n");
    }

    #[test]
    fn array_default_zero_and_update() {
        let (out, _) = run(r#"x[1] = 5  write(x[1], " ", x[2], cr)"#);
        assert_eq!(out, "5 0\n");
    }

    #[test]
    fn boolean_coercion_and_control_flow() {
        let (out, _) = run("i = 0  while i < 3  write(i)  i = i + 1  end  write(cr)");
        assert_eq!(out, "012\n");
    }

    #[test]
    fn function_definition_and_call() {
        let (out, state) = run("def f() n = n + 1 end  n = 0  f() f() f()  write(n, cr)");
        assert_eq!(out, "3\n");
        assert_eq!(state.get_var("n"), 3);
    }

    #[test]
    fn function_call_in_expression_position_uses_return_value() {
        let (out, _) = run("def f() return 41 end  write(f() + 1, cr)");
        assert_eq!(out, "42\n");
    }

    #[test]
    fn function_without_return_yields_zero_in_expression_position() {
        let (out, _) = run("def f() n = 1 end  write(f(), cr)");
        assert_eq!(out, "0\n");
    }

    #[test]
    fn undefined_function_call_is_a_no_op() {
        let (out, _) = run("g()  write(\"ok\", cr)");
        assert_eq!(out, "ok\n");
    }

    #[test]
    fn division_and_modulus_by_zero_yield_zero() {
        let (out, _) = run("write(1 / 0, cr) write(1 % 0, cr)");
        assert_eq!(out, "0\n0\n");
    }

    #[test]
    fn short_circuit_and_skips_readnum_side_effect() {
        let (out, _) = run_with_input(
            "write(false && readnum() > 0, cr)",
            vec!["5"].into_iter(),
        );
        assert_eq!(out, "0\n");
    }

    #[test]
    fn short_circuit_or_skips_readnum_side_effect() {
        let (out, _) = run_with_input("write(true || readnum() > 0, cr)", vec!["5"].into_iter());
        assert_eq!(out, "1\n");
    }

    #[test]
    fn readnum_coerces_input_line() {
        let (out, _) = run_with_input("write(readnum() + 1, cr)", vec!["41"].into_iter());
        assert_eq!(out, "42\n");
    }

    #[test]
    fn return_unwinds_only_its_own_function_frame() {
        let (out, state) = run(
            "def f() i = 0 while i < 10 if i == 2 return 0 end i = i + 1 end n = 99 end \
             f() write(n, cr)",
        );
        assert_eq!(out, "99\n");
        assert_eq!(state.get_var("n"), 99);
    }

    #[test]
    fn top_level_return_ends_the_program() {
        let (out, _) = run("write(\"a\", cr) return 0 write(\"b\", cr)");
        assert_eq!(out, "a\n");
    }

    #[test]
    fn run_surfaces_the_top_level_return_value() {
        let out = parse("return 42");
        assert!(out.ok && out.done);
        let mut state = State::new();
        let value = Interpreter::new().run(&out.ast.unwrap(), &mut state);
        assert_eq!(value, 42);
    }

    #[test]
    fn run_returns_zero_when_the_program_never_returns() {
        let out = parse("a = 1");
        assert!(out.ok && out.done);
        let mut state = State::new();
        let value = Interpreter::new().run(&out.ast.unwrap(), &mut state);
        assert_eq!(value, 0);
    }

    #[test]
    fn writing_unassigned_simple_var_emits_zero() {
        let (out, _) = run("write(x, cr)");
        assert_eq!(out, "0\n");
    }
}
