//! Interpreter totality and control-flow properties (§8), run through the full
//! `parse` → `Interpreter::run` pipeline.

use jerboa::{parse, Interpreter, State};

fn run(src: &str) -> (String, State) {
    let outcome = parse(src);
    assert!(outcome.ok && outcome.done, "failed to parse: {src}");
    let program = outcome.ast.unwrap();
    let mut state = State::new();
    let mut output = String::new();
    Interpreter::new()
        .on_output(|s| output.push_str(s))
        .run(&program, &mut state);
    (output, state)
}

#[test]
fn totality_terminating_loop_completes() {
    let (out, _) = run("i = 0 while i < 1000 i = i + 1 end write(i, cr)");
    assert_eq!(out, "1000\n");
}

#[test]
fn if_elseif_else_chain_picks_first_matching_branch() {
    let (out, _) = run(
        "x = 2
         if x == 1 write(\"one\", cr)
         elseif x == 2 write(\"two\", cr)
         elseif x == 2 write(\"unreachable\", cr)
         else write(\"other\", cr)
         end",
    );
    assert_eq!(out, "two\n");
}

#[test]
fn nested_function_calls_share_the_global_frame() {
    let (out, _) = run(
        "def inc() n = n + 1 end
         def twice() inc() inc() end
         n = 0
         twice()
         write(n, cr)",
    );
    assert_eq!(out, "2\n");
}

#[test]
fn comparisons_and_logic_produce_zero_or_one() {
    let (out, _) = run("write(3 < 5, \" \", 3 > 5, \" \", 3 == 3, \" \", true && false, cr)");
    assert_eq!(out, "1 0 1 0\n");
}

#[test]
fn rerunning_on_a_fresh_state_has_no_cross_run_coupling() {
    let src = "a = 1 a = a + 1";
    let outcome = parse(src);
    assert!(outcome.ok && outcome.done);
    let program = outcome.ast.unwrap();

    let mut state_one = State::new();
    Interpreter::new().run(&program, &mut state_one);

    let mut state_two = State::new();
    state_two.set_var("a", 100);
    Interpreter::new().run(&program, &mut state_two);

    assert_eq!(state_one.get_var("a"), 2);
    assert_eq!(state_two.get_var("a"), 2);
}

#[test]
fn fixed_point_on_repeated_runs_of_a_pure_assignment_program() {
    let outcome = parse("a = 1 + 1");
    let program = outcome.ast.unwrap();
    let mut state = State::new();
    Interpreter::new().run(&program, &mut state);
    Interpreter::new().run(&program, &mut state);
    assert_eq!(state.get_var("a"), 2);
}
