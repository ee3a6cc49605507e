//! Minimal satisfiable-conjunction backend for symbolic filesystems.
//!
//! The interpreter threads these values opaquely; only utilities extend
//! clauses. Every constructor keeps the satisfiability invariant: an
//! extension that would contradict the clause is refused, so a stored clause
//! is satisfiable by construction.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;

/// A filesystem-root variable. Utilities that change the filesystem mint a
/// fresh root and relate it to the old one through atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(u32);

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Fresh-variable mint. Single-threaded reentrancy via `Cell`; one source
/// per interpreter run.
#[derive(Debug, Default)]
pub struct VarSource {
    next: Cell<u32>,
}

impl VarSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&self) -> Variable {
        let n = self.next.get();
        self.next.set(n + 1);
        Variable(n)
    }
}

/// One path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature(String);

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Feature(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute path: a sequence of features from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FsPath(Vec<Feature>);

impl FsPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Resolve a textual path against `cwd`: absolute paths restart at the
    /// root, `.` is dropped, `..` pops.
    pub fn resolve(text: &str, cwd: &FsPath) -> FsPath {
        let mut features = if text.starts_with('/') {
            Vec::new()
        } else {
            cwd.0.clone()
        };
        for part in text.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    features.pop();
                }
                name => features.push(Feature::new(name)),
            }
        }
        FsPath(features)
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for feature in &self.0 {
            write!(f, "/{}", feature.as_str())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Present(Variable, FsPath),
    Absent(Variable, FsPath),
    Dir(Variable, FsPath),
    NotDir(Variable, FsPath),
    File(Variable, FsPath),
    NotFile(Variable, FsPath),
}

impl Atom {
    fn key(&self) -> (Variable, &FsPath) {
        match self {
            Atom::Present(v, p)
            | Atom::Absent(v, p)
            | Atom::Dir(v, p)
            | Atom::NotDir(v, p)
            | Atom::File(v, p)
            | Atom::NotFile(v, p) => (*v, p),
        }
    }

    fn conflicts(&self, other: &Atom) -> bool {
        use Atom::*;
        if self.key() != other.key() {
            return false;
        }
        matches!(
            (self, other),
            (Present(..), Absent(..))
                | (Absent(..), Present(..))
                | (Dir(..), NotDir(..))
                | (NotDir(..), Dir(..))
                | (File(..), NotFile(..))
                | (NotFile(..), File(..))
                | (Dir(..), File(..))
                | (File(..), Dir(..))
                | (Dir(..), Absent(..))
                | (Absent(..), Dir(..))
                | (File(..), Absent(..))
                | (Absent(..), File(..))
        )
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Present(v, p) => write!(f, "present({}, {})", v, p),
            Atom::Absent(v, p) => write!(f, "absent({}, {})", v, p),
            Atom::Dir(v, p) => write!(f, "dir({}, {})", v, p),
            Atom::NotDir(v, p) => write!(f, "notdir({}, {})", v, p),
            Atom::File(v, p) => write!(f, "file({}, {})", v, p),
            Atom::NotFile(v, p) => write!(f, "notfile({}, {})", v, p),
        }
    }
}

/// Conjunction of atoms, satisfiable by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clause(BTreeSet<Atom>);

impl Clause {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.0.iter()
    }

    pub fn sat(&self) -> bool {
        // Quadratic over a handful of atoms per (root, path) pair.
        for a in &self.0 {
            for b in &self.0 {
                if a.conflicts(b) {
                    return false;
                }
            }
        }
        true
    }

    /// Conjoin one atom, refusing extensions that lose satisfiability.
    pub fn and(&self, atom: Atom) -> Option<Clause> {
        if self.0.iter().any(|a| a.conflicts(&atom)) {
            return None;
        }
        let mut atoms = self.0.clone();
        atoms.insert(atom);
        Some(Clause(atoms))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "true");
        }
        let mut first = true;
        for atom in &self.0 {
            if !first {
                write!(f, " & ")?;
            }
            first = false;
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}
