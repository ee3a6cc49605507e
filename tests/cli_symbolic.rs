use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn script(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".msh")
        .tempfile()
        .expect("failed to create temp script");
    write!(file, "{}", content).expect("failed to write temp script");
    file
}

fn symsh() -> Command {
    Command::cargo_bin("symsh").expect("binary not built")
}

#[test]
fn reports_the_three_populations() {
    let f = script("echo hi");
    symsh()
        .arg("--run-symbolic")
        .arg(f.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("success: 1 state(s)")
                .and(predicate::str::contains("failure: 0 state(s)"))
                .and(predicate::str::contains("engine failure: 0 state(s)")),
        );
}

#[test]
fn prints_a_representative_state() {
    let f = script("echo hello");
    symsh()
        .arg("--run-symbolic")
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("| hello").and(predicate::str::contains("clause: true")));
}

#[test]
fn branching_shows_both_populations() {
    let f = script("if test -e /p { exit 0 } else { exit 1 }");
    symsh()
        .arg("--run-symbolic")
        .arg(f.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("success: 1 state(s)")
                .and(predicate::str::contains("failure: 1 state(s)"))
                .and(predicate::str::contains("present(")),
        );
}

#[test]
fn loop_bound_hits_exit_three() {
    let f = script("while true { : }");
    symsh()
        .arg("--run-symbolic")
        .arg("--loop-limit=2")
        .arg(f.path())
        .assert()
        .code(3)
        .stdout(predicate::str::contains("engine failure: 1 state(s)"));
}

#[test]
fn symbolic_program_failure_still_exits_zero() {
    // Program failure is an analysis result, not an interpreter failure.
    let f = script("exit 1");
    symsh()
        .arg("--run-symbolic")
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("failure: 1 state(s)"));
}
