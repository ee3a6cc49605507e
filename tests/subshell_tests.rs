mod common;

use common::{run_symbolic, the_stdout};

#[test]
fn variable_changes_stay_inside() {
    let src = "x := \"outer\"\n( x := \"inner\" )\necho $x";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "outer");
}

#[test]
fn positional_changes_stay_inside() {
    let src = "function f { ( shift ); echo $1 }\nf a b";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "a");
}

#[test]
fn stdout_escapes_the_subshell() {
    let report = run_symbolic("( echo from inside )\necho from outside");
    assert_eq!(the_stdout(&report.success), "from inside\nfrom outside");
}

#[test]
fn exit_inside_is_absorbed() {
    let report = run_symbolic("if ( exit 1 ) { echo t } else { echo e }");
    assert_eq!(the_stdout(&report.success), "e");
}

#[test]
fn exit_result_escalates_when_strict() {
    let report = run_symbolic("( exit 1 )\necho after");
    assert_eq!(report.success.len(), 0);
    assert_eq!(the_stdout(&report.failure), "");
}

#[test]
fn return_inside_is_absorbed_like_exit() {
    let report = run_symbolic("if ( return 1 ) { echo t } else { echo e }");
    assert_eq!(report.engine_failure.len(), 0);
    assert_eq!(the_stdout(&report.success), "e");
}

#[test]
fn quiet_discards_output() {
    let report = run_symbolic("quiet echo noisy\necho quiet done");
    assert_eq!(the_stdout(&report.success), "quiet done");
}

#[test]
fn quiet_keeps_the_result() {
    let report = run_symbolic("if quiet false { echo t } else { echo e }");
    assert_eq!(the_stdout(&report.success), "e");
}

#[test]
fn quiet_restores_output_on_exit_paths() {
    // The subshell completes with a false result, which exits here; the
    // exit state still gets its stdout restored.
    let report = run_symbolic("echo kept\nquiet ( echo dropped\nfalse )");
    assert_eq!(report.success.len(), 0);
    assert_eq!(the_stdout(&report.failure), "kept");
}

#[test]
fn substitution_runs_in_an_isolated_context() {
    let src = "x := \"outer\"\ny := $(x := \"inner\"; echo $x)\necho $x $y";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "outer inner");
}
