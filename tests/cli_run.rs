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
fn run_success_exits_zero() {
    let f = script("echo hi");
    symsh().arg("--run").arg(f.path()).assert().success();
}

#[test]
fn run_failure_exits_one() {
    let f = script("exit 1");
    symsh().arg("--run").arg(f.path()).assert().code(1);
}

#[test]
fn run_is_the_default_mode() {
    let f = script("true");
    symsh().arg(f.path()).assert().success();
}

#[test]
fn missing_file_is_an_io_error() {
    symsh()
        .arg("--run")
        .arg("does/not/exist.msh")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn parse_error_exits_two_with_location() {
    let f = script("if { }");
    symsh()
        .arg("--run")
        .arg(f.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains(":1:"));
}

#[test]
fn engine_failure_exits_three() {
    let f = script("while true { : }");
    symsh()
        .arg("--run")
        .arg("--loop-limit")
        .arg("4")
        .arg(f.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("loop limit"));
}

#[test]
fn unknown_flag_shows_usage() {
    let f = script("true");
    symsh()
        .arg("--frobnicate")
        .arg(f.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: symsh"));
}

#[test]
fn conflicting_modes_are_rejected() {
    let f = script("true");
    symsh()
        .arg("--run")
        .arg("--run-symbolic")
        .arg(f.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("multiple action flags"));
}

#[test]
fn invalid_loop_limit_is_rejected() {
    let f = script("true");
    symsh()
        .arg("--loop-limit")
        .arg("many")
        .arg(f.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid loop limit"));
}

#[test]
fn program_arguments_follow_a_double_dash() {
    let f = script("test $1 = expected");
    symsh()
        .arg("--run")
        .arg(f.path())
        .arg("--")
        .arg("expected")
        .assert()
        .success();
}

#[test]
fn version_flag_prints_and_exits() {
    symsh()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains("symsh"));
}

#[test]
fn emit_ast_prints_the_program() {
    let f = script("echo hi");
    symsh()
        .arg("--emit-ast")
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CallUtility"));
}
