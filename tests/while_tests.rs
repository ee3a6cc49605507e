mod common;

use common::{assert_disjoint, run_symbolic, run_symbolic_with, the_stdout};

#[test]
fn loop_bound_marks_live_states_as_engine_failure() {
    let report = run_symbolic_with("while true { : }", 3, &[]);
    assert_eq!(report.success.len(), 0);
    assert_eq!(report.failure.len(), 0);
    assert_eq!(report.engine_failure.len(), 1);
}

#[test]
fn bounded_loop_terminates_naturally() {
    // One pass: the loop variable flips the condition.
    let src = "while test -z $x { x := \"done\" }\necho $x";
    let report = run_symbolic(src);
    assert_eq!(report.engine_failure.len(), 0);
    assert_eq!(the_stdout(&report.success), "done");
}

#[test]
fn natural_exit_keeps_the_last_body_result() {
    // The body ends on `! true` (false) without exiting; the loop's value
    // is that last result.
    let src = "while test -z $x { x := \"v\"; ! true }\necho $?";
    let report = run_symbolic(src);
    assert_eq!(the_stdout(&report.success), "1");
}

#[test]
fn unentered_loop_succeeds() {
    let report = run_symbolic("while false { echo never }\necho $?");
    assert_eq!(the_stdout(&report.success), "0");
}

#[test]
fn exit_in_body_leaves_the_loop() {
    let report = run_symbolic("while true { echo once\nexit 0 }");
    assert_eq!(report.engine_failure.len(), 0);
    assert_eq!(the_stdout(&report.success), "once");
}

#[test]
fn exit_in_condition_leaves_the_loop() {
    let report = run_symbolic("while exit 1 { echo never }");
    assert_eq!(report.failure.len(), 1);
    assert_eq!(the_stdout(&report.failure), "");
}

#[test]
fn bound_hit_reports_every_live_branch() {
    // The probe splits the state; the `yes` branch loops forever, the `no`
    // branch leaves immediately.
    let src = "while test -e /flag { : }\necho left";
    let report = run_symbolic_with(src, 4, &[]);
    assert_eq!(report.success.len(), 1);
    assert_eq!(the_stdout(&report.success), "left");
    assert_eq!(report.engine_failure.len(), 1);
    assert_disjoint(&report);
}
