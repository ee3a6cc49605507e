mod common;

use common::{run_concrete, run_concrete_with};
use symsh::driver::ConcreteOutcome;
use symsh::state::State;

fn completed(outcome: ConcreteOutcome) -> (State, bool) {
    match outcome {
        ConcreteOutcome::Completed { state, result } => (state, result),
        ConcreteOutcome::EngineFailure { reason } => panic!("engine failure: {}", reason),
    }
}

#[test]
fn echo_writes_lines() {
    let (state, result) = completed(run_concrete("echo a\necho b"));
    assert!(result);
    assert_eq!(state.stdout.to_text(), "a\nb");
}

#[test]
fn exit_reports_its_status() {
    let (_, result) = completed(run_concrete("exit 1"));
    assert!(!result);
    let (_, result) = completed(run_concrete("exit 0"));
    assert!(result);
}

#[test]
fn strict_false_stops_execution() {
    let (state, result) = completed(run_concrete("false\necho x"));
    assert!(!result);
    assert_eq!(state.stdout.to_text(), "");
}

#[test]
fn while_runs_unbounded_without_a_limit() {
    let src = "while test -z $x { x := \"v\" }\necho $x";
    let (state, result) = completed(run_concrete_with(src, None, &[]));
    assert!(result);
    assert_eq!(state.stdout.to_text(), "v");
}

#[test]
fn loop_limit_is_an_engine_failure() {
    match run_concrete_with("while true { : }", Some(3), &[]) {
        ConcreteOutcome::EngineFailure { reason } => assert!(reason.contains("loop limit")),
        other => panic!("expected engine failure, got {:?}", other),
    }
}

#[test]
fn branching_utilities_cannot_run_concretely() {
    match run_concrete("test -e /x") {
        ConcreteOutcome::EngineFailure { reason } => {
            assert!(reason.contains("nondeterministic"))
        }
        other => panic!("expected engine failure, got {:?}", other),
    }
}

#[test]
fn functions_and_pipes_compose() {
    let src = "function f { echo $1 }\nf hi | cat";
    let (state, result) = completed(run_concrete(src));
    assert!(result);
    assert_eq!(state.stdout.to_text(), "hi");
}

#[test]
fn subshell_isolation_holds_concretely() {
    let src = "x := \"outer\"\n( x := \"inner\" )\necho $x";
    let (state, _) = completed(run_concrete(src));
    assert_eq!(state.stdout.to_text(), "outer");
}

#[test]
fn positional_arguments_flow_in() {
    let (state, _) = completed(run_concrete_with("echo $1 $2", Some(100), &["a", "b"]));
    assert_eq!(state.stdout.to_text(), "a b");
}
