use crate::ast::Program;
use crate::concrete::{Interp, Interrupt};
use crate::context::Context;
use crate::parser;
use crate::state::{FileSystem, State, StateSet, SymState};
use crate::symbolic::{Config, Evaluator, Input};
use crate::utility::{Builtins, UtilityInterpreter};
use log::debug;
use std::path::Path;

pub const DEFAULT_LOOP_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    RunSymbolic,
    EmitAst,
}

#[derive(Debug)]
pub struct RunOptions {
    pub mode: Mode,
    pub loop_limit: usize,
    /// Positional arguments handed to the program.
    pub args: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Run,
            loop_limit: DEFAULT_LOOP_LIMIT,
            args: Vec::new(),
        }
    }
}

pub struct DriverError {
    pub code: i32,
    pub msg: String,
}

impl DriverError {
    fn io(msg: String) -> Self {
        Self { code: 1, msg }
    }

    fn parse(msg: String) -> Self {
        Self { code: 2, msg }
    }
}

/// Final populations of a symbolic run. Exit states (and a stray toplevel
/// Return) merge with normal completions and partition by result; no state
/// is dropped.
#[derive(Debug)]
pub struct SymReport {
    pub success: StateSet,
    pub failure: StateSet,
    pub engine_failure: StateSet,
}

pub fn load_program(path: &Path) -> Result<Program, DriverError> {
    if !path.exists() {
        return Err(DriverError::io(format!("file not found: {}", path.display())));
    }
    let src = std::fs::read_to_string(path)
        .map_err(|e| DriverError::io(format!("unable to read {}: {}", path.display(), e)))?;
    parser::parse_program(&src, &path.display().to_string())
        .map_err(|d| DriverError::parse(d.format()))
}

fn install(program: &Program, mut ctx: Context) -> Context {
    // Left fold: later definitions override earlier ones.
    for (name, body) in &program.functions {
        ctx.func_env = ctx.func_env.with(name, body.clone());
    }
    ctx
}

pub fn run_symbolic(
    program: &Program,
    loop_limit: usize,
    utils: &dyn UtilityInterpreter,
    initial: State,
    args: Vec<String>,
    argument0: &str,
) -> SymReport {
    debug!(
        "symbolic run: {} function(s), loop limit {}",
        program.functions.len(),
        loop_limit
    );
    let mut ctx = install(program, Context::new());
    ctx.args = args;
    let cnf = Config {
        loop_limit: Some(loop_limit),
    };
    let inp = Input::toplevel(argument0);
    let evaluator = Evaluator::new(&cnf, utils);
    let out = evaluator.eval(&inp, SymState { state: initial, ctx }, &program.body);

    let mut success = StateSet::new();
    let mut failure = StateSet::new();
    for st in out.normal.into_iter().chain(out.exit).chain(out.ret) {
        if st.ctx.result {
            success.insert(st);
        } else {
            failure.insert(st);
        }
    }
    SymReport {
        success,
        failure,
        engine_failure: out.failure,
    }
}

#[derive(Debug)]
pub enum ConcreteOutcome {
    Completed { state: State, result: bool },
    EngineFailure { reason: String },
}

pub fn run_concrete(
    program: &Program,
    loop_limit: Option<usize>,
    utils: &dyn UtilityInterpreter,
    initial: State,
    args: Vec<String>,
    argument0: &str,
) -> ConcreteOutcome {
    let mut ctx = install(program, Context::new());
    ctx.args = args;
    let cnf = Config { loop_limit };
    let interp = Interp::new(&cnf, utils);
    match interp.exec(&Input::toplevel(argument0), initial, ctx, &program.body) {
        Ok((state, ctx)) => ConcreteOutcome::Completed {
            result: ctx.result,
            state,
        },
        Err(Interrupt::Exit { state, ctx }) | Err(Interrupt::Return { state, ctx }) => {
            ConcreteOutcome::Completed {
                result: ctx.result,
                state,
            }
        }
        Err(Interrupt::Failure { reason }) => ConcreteOutcome::EngineFailure { reason },
    }
}

/// Whole-file symbolic run with the default builtin table.
pub fn run_file_symbolic(path: &Path, options: &RunOptions) -> Result<SymReport, DriverError> {
    let program = load_program(path)?;
    let builtins = Builtins::new();
    let initial = State::new(FileSystem::new(builtins.vars().fresh()));
    Ok(run_symbolic(
        &program,
        options.loop_limit,
        &builtins,
        initial,
        options.args.clone(),
        &path.display().to_string(),
    ))
}

/// Whole-file concrete run with the default builtin table.
pub fn run_file_concrete(path: &Path, options: &RunOptions) -> Result<ConcreteOutcome, DriverError> {
    let program = load_program(path)?;
    let builtins = Builtins::new();
    let initial = State::new(FileSystem::new(builtins.vars().fresh()));
    Ok(run_concrete(
        &program,
        Some(options.loop_limit),
        &builtins,
        initial,
        options.args.clone(),
        &path.display().to_string(),
    ))
}
