#![allow(dead_code)]

use symsh::ast::Program;
use symsh::driver::{self, ConcreteOutcome, SymReport};
use symsh::parser;
use symsh::state::{FileSystem, State, StateSet};
use symsh::utility::Builtins;

pub fn parse(src: &str) -> Program {
    parser::parse_program(src, "test.msh")
        .unwrap_or_else(|d| panic!("parse failed:\n{}", d.format()))
}

pub fn run_symbolic(src: &str) -> SymReport {
    run_symbolic_with(src, 100, &[])
}

pub fn run_symbolic_with(src: &str, loop_limit: usize, args: &[&str]) -> SymReport {
    let program = parse(src);
    let builtins = Builtins::new();
    let initial = State::new(FileSystem::new(builtins.vars().fresh()));
    driver::run_symbolic(
        &program,
        loop_limit,
        &builtins,
        initial,
        args.iter().map(|s| s.to_string()).collect(),
        "test.msh",
    )
}

pub fn run_concrete(src: &str) -> ConcreteOutcome {
    run_concrete_with(src, Some(100), &[])
}

pub fn run_concrete_with(src: &str, loop_limit: Option<usize>, args: &[&str]) -> ConcreteOutcome {
    let program = parse(src);
    let builtins = Builtins::new();
    let initial = State::new(FileSystem::new(builtins.vars().fresh()));
    driver::run_concrete(
        &program,
        loop_limit,
        &builtins,
        initial,
        args.iter().map(|s| s.to_string()).collect(),
        "test.msh",
    )
}

/// Serialised stdouts of a population, sorted for stable assertions.
pub fn stdouts(states: &StateSet) -> Vec<String> {
    let mut texts: Vec<String> = states.iter().map(|s| s.state.stdout.to_text()).collect();
    texts.sort();
    texts
}

/// The stdout of a population expected to hold exactly one state.
pub fn the_stdout(states: &StateSet) -> String {
    assert_eq!(states.len(), 1, "expected exactly one state");
    states.iter().next().unwrap().state.stdout.to_text()
}

/// Assert the three report populations are pairwise disjoint.
pub fn assert_disjoint(report: &SymReport) {
    for st in &report.success {
        assert!(!report.failure.contains(st));
        assert!(!report.engine_failure.contains(st));
    }
    for st in &report.failure {
        assert!(!report.engine_failure.contains(st));
    }
}
