mod common;

use common::{run_symbolic, run_symbolic_with, the_stdout};

#[test]
fn return_is_caught_by_the_call() {
    let report = run_symbolic("function f { return 0 }\nf\necho $?");
    assert_eq!(report.failure.len(), 0);
    assert_eq!(the_stdout(&report.success), "0");
}

#[test]
fn return_failure_escalates_at_the_call_site() {
    // The call completes with a false result, which is strict here.
    let report = run_symbolic("function f { return 1 }\nf\necho after");
    assert_eq!(report.success.len(), 0);
    assert_eq!(the_stdout(&report.failure), "");
}

#[test]
fn return_failure_is_a_value_under_condition() {
    let report = run_symbolic("function f { return 1 }\nif f { echo t } else { echo e }");
    assert_eq!(the_stdout(&report.success), "e");
}

#[test]
fn call_arguments_are_positional() {
    let src = "function greet { echo hello $1 $2 }\ngreet you there";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "hello you there");
}

#[test]
fn argument_zero_is_the_function_name() {
    let report = run_symbolic("function who { echo $0 }\nwho");
    assert_eq!(the_stdout(&report.success), "who");
}

#[test]
fn caller_positionals_are_restored() {
    let src = "function f { shift }\nf a b\necho $1";
    let report = run_symbolic_with(src, 100, &["outer"]);
    assert_eq!(the_stdout(&report.success), "outer");
}

#[test]
fn variable_assignments_escape_the_function() {
    let src = "function set_x { x := \"from f\" }\nset_x\necho $x";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "from f");
}

#[test]
fn undefined_function_name_is_a_plain_utility() {
    // Without a definition the parser leaves the call as a utility call,
    // which fails softly.
    let report = run_symbolic("if not_defined { echo t } else { echo e }");
    assert_eq!(the_stdout(&report.success), "e");
}

#[test]
fn exit_in_a_function_terminates_the_program() {
    let src = "function f { exit 1 }\nf\necho after";
    let report = run_symbolic(src);
    assert_eq!(report.success.len(), 0);
    assert_eq!(the_stdout(&report.failure), "");
}

#[test]
fn later_definition_overrides_earlier() {
    let src = "function f { echo first }\nfunction f { echo second }\nf";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "second");
}

#[test]
fn shift_drops_positionals() {
    let report = run_symbolic_with("shift\necho $1", 100, &["a", "b"]);
    assert_eq!(the_stdout(&report.success), "b");
}

#[test]
fn shift_two() {
    let report = run_symbolic_with("shift 2\necho $1", 100, &["a", "b", "c"]);
    assert_eq!(the_stdout(&report.success), "c");
}

#[test]
fn shift_past_the_end_fails() {
    let report = run_symbolic_with("shift 3\necho after", 100, &["a"]);
    assert_eq!(report.success.len(), 0);
    assert_eq!(report.failure.len(), 1);
}

#[test]
fn recursion_hits_the_loop_free_depth() {
    // Recursion through the function environment terminates because every
    // call re-reads the same body and eventually exits.
    let src = "function f { if test -z $x { x := \"stop\"\nf } else { return 0 } }\nf\necho done";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "done");
}
