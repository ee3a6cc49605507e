use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use std::process;
use symsh::driver::{self, ConcreteOutcome, Mode, RunOptions, SymReport};
use symsh::state::StateSet;

struct Config {
    filename: String,
    options: RunOptions,
    verbose: bool,
}

struct CliError {
    code: i32,
    msg: String,
    show_usage: bool,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: 1,
            msg: msg.into(),
            show_usage: true,
        }
    }
}

fn usage_text() -> &'static str {
    "Usage: symsh [flags] <script.msh> [-- program-args...]\n\
     Flags:\n\
     \x20 --run               Execute the script concretely (default)\n\
     \x20 --run-symbolic      Analyse the script symbolically\n\
     \x20 --loop-limit <n>    While-loop iteration bound for the analysis (default: 100)\n\
     \x20 --emit-ast          Print the parsed program (debug)\n\
     \x20 --verbose           Enable debug logging\n\
     \x20 -h, --help          Print help information\n\
     \x20 -V, --version       Print version information and exit"
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match parse_args(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.msg);
            if e.show_usage {
                eprintln!("{}", usage_text());
            }
            process::exit(e.code);
        }
    };

    if config.verbose {
        let _ = TermLogger::init(
            LevelFilter::Debug,
            LogConfig::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    }

    process::exit(run(config));
}

fn parse_args(args: Vec<String>) -> Result<Config, CliError> {
    if args.len() < 2 {
        return Err(CliError::usage("error: missing input file"));
    }

    let mut filename: Option<String> = None;
    let mut options = RunOptions::default();
    let mut verbose = false;

    let mut run = false;
    let mut run_symbolic = false;
    let mut emit_ast = false;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-h" || arg == "--help" {
            println!("{}", usage_text());
            process::exit(0);
        } else if arg == "-V" || arg == "--version" {
            println!("symsh {}", env!("CARGO_PKG_VERSION"));
            process::exit(0);
        } else if arg == "--run" {
            run = true;
            i += 1;
        } else if arg == "--run-symbolic" {
            run_symbolic = true;
            i += 1;
        } else if arg == "--emit-ast" {
            emit_ast = true;
            i += 1;
        } else if arg == "--verbose" {
            verbose = true;
            i += 1;
        } else if arg == "--loop-limit" {
            if i + 1 < args.len() {
                options.loop_limit = parse_limit(&args[i + 1])?;
                i += 2;
            } else {
                return Err(CliError::usage("error: --loop-limit requires an argument"));
            }
        } else if let Some(val) = arg.strip_prefix("--loop-limit=") {
            if val.is_empty() {
                return Err(CliError::usage("error: --loop-limit requires an argument"));
            }
            options.loop_limit = parse_limit(val)?;
            i += 1;
        } else if arg == "--" {
            options.args = args[i + 1..].to_vec();
            i = args.len();
        } else if arg.starts_with('-') {
            return Err(CliError::usage(format!("error: unexpected argument: {}", arg)));
        } else {
            if filename.is_some() {
                return Err(CliError::usage(format!(
                    "error: unexpected argument: {} (script already specified)",
                    arg
                )));
            }
            filename = Some(arg.clone());
            i += 1;
        }
    }

    if (run as u8 + run_symbolic as u8 + emit_ast as u8) > 1 {
        return Err(CliError::usage(
            "error: multiple action flags specified (choose only one of: --run, --run-symbolic, --emit-ast)",
        ));
    }

    if run_symbolic {
        options.mode = Mode::RunSymbolic;
    } else if emit_ast {
        options.mode = Mode::EmitAst;
    } else {
        options.mode = Mode::Run;
    }

    let filename = match filename {
        Some(f) => f,
        None => return Err(CliError::usage("error: missing input file")),
    };

    Ok(Config {
        filename,
        options,
        verbose,
    })
}

fn parse_limit(s: &str) -> Result<usize, CliError> {
    s.parse()
        .map_err(|_| CliError::usage(format!("error: invalid loop limit: {}", s)))
}

fn run(config: Config) -> i32 {
    let path = std::path::Path::new(&config.filename);

    match config.options.mode {
        Mode::EmitAst => match driver::load_program(path) {
            Ok(program) => {
                println!("{:#?}", program);
                0
            }
            Err(e) => {
                eprintln!("{}", e.msg);
                e.code
            }
        },
        Mode::Run => match driver::run_file_concrete(path, &config.options) {
            Ok(ConcreteOutcome::Completed { result, .. }) => {
                if result {
                    0
                } else {
                    1
                }
            }
            Ok(ConcreteOutcome::EngineFailure { reason }) => {
                eprintln!("engine failure: {}", reason);
                3
            }
            Err(e) => {
                eprintln!("{}", e.msg);
                e.code
            }
        },
        Mode::RunSymbolic => match driver::run_file_symbolic(path, &config.options) {
            Ok(report) => {
                print_report(&report);
                if report.engine_failure.is_empty() {
                    0
                } else {
                    3
                }
            }
            Err(e) => {
                eprintln!("{}", e.msg);
                e.code
            }
        },
    }
}

fn print_class(title: &str, states: &StateSet) {
    println!("{}: {} state(s)", title, states.len());
    if let Some(first) = states.iter().next() {
        println!("{}", first.state);
    }
}

fn print_report(report: &SymReport) {
    print_class("success", &report.success);
    print_class("failure", &report.failure);
    print_class("engine failure", &report.engine_failure);
}
