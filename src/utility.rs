//! Utility (command) interpretation.
//!
//! The evaluators treat utilities as a black box behind
//! [`UtilityInterpreter`]; this module also ships the default builtin table.
//! Every builtin observes the append-only stdout contract: starting from an
//! arbitrary stdout it produces exactly what it would produce from an empty
//! one, concatenated after the existing content.

use crate::buffer::Stdin;
use crate::constraint::{Atom, FsPath, Variable, VarSource};
use crate::state::State;
use log::debug;
use std::collections::HashSet;
use std::sync::LazyLock;

pub trait UtilityInterpreter {
    /// Interpret one utility call. The returned pairs are the reachable
    /// result states with their boolean results; an unknown name is a
    /// failing call, never an engine failure.
    fn interp_utility(&self, state: State, name: &str, args: &[String]) -> Vec<(State, bool)>;
}

/// Names the default table handles.
pub const BUILTIN_NAMES: &[&str] = &[
    "true", ":", "false", "echo", "cat", "test", "[", "mkdir", "touch",
];

static ALL_BUILTINS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| BUILTIN_NAMES.iter().copied().collect());

pub fn is_builtin(name: &str) -> bool {
    ALL_BUILTINS.contains(name)
}

/// Default builtin table. Owns the run's fresh-variable source; filesystem
/// builtins mint new roots from it.
#[derive(Debug, Default)]
pub struct Builtins {
    vars: VarSource,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vars(&self) -> &VarSource {
        &self.vars
    }

    fn echo(&self, mut state: State, args: &[String]) -> Vec<(State, bool)> {
        state.stdout.output(&args.join(" "));
        state.stdout.newline();
        vec![(state, true)]
    }

    fn cat(&self, mut state: State, args: &[String]) -> Vec<(State, bool)> {
        if !args.is_empty() {
            // Only the stdin-copying form is modelled.
            return vec![(state, false)];
        }
        for line in state.stdin.lines().to_vec() {
            state.stdout.output(&line);
            state.stdout.newline();
        }
        state.stdin = Stdin::default();
        vec![(state, true)]
    }

    fn test(&self, state: State, name: &str, args: &[String]) -> Vec<(State, bool)> {
        let mut args = args.to_vec();
        if name == "[" {
            if args.last().map(|s| s.as_str()) == Some("]") {
                args.pop();
            } else {
                return vec![(state, false)];
            }
        }
        match args.as_slice() {
            [] => vec![(state, false)],
            [s] => {
                let b = !s.is_empty();
                vec![(state, b)]
            }
            [op, s] if op == "-z" => {
                let b = s.is_empty();
                vec![(state, b)]
            }
            [op, s] if op == "-n" => {
                let b = !s.is_empty();
                vec![(state, b)]
            }
            [op, p] if op == "-e" || op == "-d" || op == "-f" => self.probe(state, op, p),
            [a, op, b] if op == "=" => {
                let eq = a == b;
                vec![(state, eq)]
            }
            [a, op, b] if op == "!=" => {
                let ne = a != b;
                vec![(state, ne)]
            }
            _ => vec![(state, false)],
        }
    }

    /// Symbolic filesystem probe: branch on the unknown, keeping only
    /// branches whose extended clause stays satisfiable.
    fn probe(&self, state: State, flag: &str, path_text: &str) -> Vec<(State, bool)> {
        let path = FsPath::resolve(path_text, &state.fs.cwd);
        let v = state.fs.root;
        let (yes, no): (Vec<Atom>, Atom) = match flag {
            "-e" => (
                vec![Atom::Present(v, path.clone())],
                Atom::Absent(v, path.clone()),
            ),
            "-d" => (
                vec![Atom::Present(v, path.clone()), Atom::Dir(v, path.clone())],
                Atom::NotDir(v, path.clone()),
            ),
            _ => (
                vec![Atom::Present(v, path.clone()), Atom::File(v, path.clone())],
                Atom::NotFile(v, path.clone()),
            ),
        };

        let mut out = Vec::new();
        let mut clause = Some(state.fs.clause.clone());
        for atom in yes {
            clause = clause.and_then(|c| c.and(atom));
        }
        if let Some(clause) = clause {
            let mut st = state.clone();
            st.fs.clause = clause;
            out.push((st, true));
        }
        if let Some(clause) = state.fs.clause.and(no) {
            let mut st = state;
            st.fs.clause = clause;
            out.push((st, false));
        }
        out
    }

    /// Shared shape of `mkdir` and `touch`: succeeds when the path can be
    /// absent, minting a fresh root that carries the created entry; fails on
    /// the branch where the path already exists.
    fn create(
        &self,
        state: State,
        path_text: &str,
        kind_atom: fn(Variable, FsPath) -> Atom,
    ) -> Vec<(State, bool)> {
        let path = FsPath::resolve(path_text, &state.fs.cwd);
        let v = state.fs.root;
        let mut out = Vec::new();

        if let Some(pre) = state.fs.clause.and(Atom::Absent(v, path.clone())) {
            let v2 = self.vars.fresh();
            let clause = pre
                .and(Atom::Present(v2, path.clone()))
                .and_then(|c| c.and(kind_atom(v2, path.clone())));
            if let Some(clause) = clause {
                let mut st = state.clone();
                st.fs.root = v2;
                st.fs.clause = clause;
                out.push((st, true));
            }
        }
        if let Some(clause) = state.fs.clause.and(Atom::Present(v, path.clone())) {
            let mut st = state;
            st.fs.clause = clause;
            out.push((st, false));
        }
        out
    }
}

impl UtilityInterpreter for Builtins {
    fn interp_utility(&self, state: State, name: &str, args: &[String]) -> Vec<(State, bool)> {
        debug!("utility {} {:?}", name, args);
        match name {
            "true" | ":" => vec![(state, true)],
            "false" => vec![(state, false)],
            "echo" => self.echo(state, args),
            "cat" => self.cat(state, args),
            "test" | "[" => self.test(state, name, args),
            "mkdir" | "touch" => match args {
                [path] => {
                    let kind = if name == "mkdir" { Atom::Dir } else { Atom::File };
                    self.create(state, path, kind)
                }
                _ => vec![(state, false)],
            },
            _ => {
                debug!("unknown utility {}", name);
                vec![(state, false)]
            }
        }
    }
}
