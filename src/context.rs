use crate::ast::Instruction;
use crate::env::Env;
use crate::parser::STATUS_VAR;

/// Per-scope evaluation context. Value-semantic: branches clone it, and a
/// subshell's copy is simply dropped on the way out.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Context {
    pub var_env: Env<String>,
    pub func_env: Env<Instruction>,
    /// Positional arguments `$1..`.
    pub args: Vec<String>,
    /// Result of the previous instruction (`$?` as a boolean).
    pub result: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            var_env: Env::new(),
            func_env: Env::new(),
            args: Vec::new(),
            result: true,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// `$?` rendered the way utilities print it.
    pub fn status_string(&self) -> String {
        if self.result { "0".to_string() } else { "1".to_string() }
    }

    /// Variable lookup with the Language defaults: unset variables read as
    /// empty, and the unassignable `?` reads as the rendered result.
    pub fn lookup_var(&self, id: &str) -> String {
        if id == STATUS_VAR {
            self.var_env.lookup(id, self.status_string())
        } else {
            self.var_env.lookup(id, String::new())
        }
    }
}
