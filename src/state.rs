use crate::buffer::{Stdin, Stdout};
use crate::constraint::{Clause, FsPath, Variable};
use crate::context::Context;
use std::collections::BTreeSet;
use std::fmt;

/// Symbolic filesystem handle: a root variable constrained by a satisfiable
/// clause, plus the working directory. `root0` remembers the root the run
/// started from, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileSystem {
    pub root: Variable,
    pub clause: Clause,
    pub cwd: FsPath,
    pub root0: Option<Variable>,
}

impl FileSystem {
    pub fn new(root: Variable) -> Self {
        FileSystem {
            root,
            clause: Clause::empty(),
            cwd: FsPath::root(),
            root0: Some(root),
        }
    }
}

/// Filesystem plus both I/O buffers; everything an instruction can observe
/// besides its context.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    pub fs: FileSystem,
    pub stdin: Stdin,
    pub stdout: Stdout,
}

impl State {
    pub fn new(fs: FileSystem) -> Self {
        State {
            fs,
            stdin: Stdin::default(),
            stdout: Stdout::default(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  cwd: {}", self.fs.cwd)?;
        match self.fs.root0 {
            Some(root0) if root0 != self.fs.root => {
                writeln!(f, "  root: {} (from {})", self.fs.root, root0)?
            }
            _ => writeln!(f, "  root: {}", self.fs.root)?,
        }
        writeln!(f, "  clause: {}", self.fs.clause)?;
        let text = self.stdout.to_text();
        if text.is_empty() {
            write!(f, "  stdout: (empty)")?;
        } else {
            write!(f, "  stdout:")?;
            for line in text.lines() {
                write!(f, "\n    | {}", line)?;
            }
        }
        Ok(())
    }
}

/// One reachable point of the analysis: state plus context. Set membership
/// is structural equality over the whole pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymState {
    pub state: State,
    pub ctx: Context,
}

pub type StateSet = BTreeSet<SymState>;

/// Four-way partition of resulting states by terminating behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Execution continues at the caller.
    pub normal: StateSet,
    /// The program terminates.
    pub exit: StateSet,
    /// The enclosing function body terminates.
    pub ret: StateSet,
    /// The engine cannot continue analysing this branch.
    pub failure: StateSet,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn union(&mut self, other: Outcome) {
        self.normal.extend(other.normal);
        self.exit.extend(other.exit);
        self.ret.extend(other.ret);
        self.failure.extend(other.failure);
    }

    /// Every state this outcome accounts for, across all four buckets.
    pub fn len(&self) -> usize {
        self.normal.len() + self.exit.len() + self.ret.len() + self.failure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
