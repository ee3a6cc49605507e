//! The symbolic evaluation relation.
//!
//! Instructions evaluate over single symbolic states into four-way
//! [`Outcome`]s; branching multiplies states and joins union them, so a
//! whole run is a tree of set unions. The set-lifted entry point
//! [`Evaluator::eval_set`] folds a state set through one instruction.

use crate::ast::{Instruction, ListExpr, RetCode, SplitMode, StringExpr};
use crate::buffer::{Stdin, Stdout};
use crate::context::Context;
use crate::state::{Outcome, State, StateSet, SymState};
use crate::utility::UtilityInterpreter;
use log::debug;
use std::collections::BTreeSet;

/// Engine configuration. The symbolic core reads `loop_limit` as a hard
/// bound; `None` behaves as a zero bound, so drivers must supply one.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub loop_limit: Option<usize>,
}

/// Per-call evaluation input: the condition flag and `$0`.
#[derive(Debug, Clone)]
pub struct Input {
    /// Inside a condition, a false result does not terminate the program.
    pub under_condition: bool,
    pub argument0: String,
}

impl Input {
    pub fn toplevel(argument0: impl Into<String>) -> Self {
        Input {
            under_condition: false,
            argument0: argument0.into(),
        }
    }

    /// The same input with the condition flag raised.
    pub(crate) fn in_condition(&self) -> Input {
        Input {
            under_condition: true,
            argument0: self.argument0.clone(),
        }
    }
}

/// Boolean value of an `exit`/`return` code given the previous result.
pub(crate) fn code_value(code: RetCode, previous: bool) -> bool {
    match code {
        RetCode::Previous => previous,
        RetCode::Success => true,
        RetCode::Failure => false,
    }
}

/// POSIX field splitting: split on runs of space, tab and newline.
pub(crate) fn split_fields(s: &str) -> Vec<String> {
    s.split([' ', '\t', '\n'])
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct Evaluator<'a> {
    cnf: &'a Config,
    utils: &'a dyn UtilityInterpreter,
}

impl<'a> Evaluator<'a> {
    pub fn new(cnf: &'a Config, utils: &'a dyn UtilityInterpreter) -> Self {
        Evaluator { cnf, utils }
    }

    /// Evaluate one instruction on a whole state set; order of iteration is
    /// immaterial because the result is a union.
    pub fn eval_set(&self, inp: &Input, states: &StateSet, ins: &Instruction) -> Outcome {
        let mut out = Outcome::new();
        for sym in states {
            out.union(self.eval(inp, sym.clone(), ins));
        }
        out
    }

    /// File a completed state: under strict evaluation a false result
    /// terminates the program instead of continuing.
    fn settle(&self, inp: &Input, out: &mut Outcome, sym: SymState) {
        if !inp.under_condition && !sym.ctx.result {
            out.exit.insert(sym);
        } else {
            out.normal.insert(sym);
        }
    }

    pub fn eval(&self, inp: &Input, sym: SymState, ins: &Instruction) -> Outcome {
        let mut out = Outcome::new();
        match ins {
            Instruction::Exit(code) => {
                let mut sym = sym;
                sym.ctx.result = code_value(*code, sym.ctx.result);
                out.exit.insert(sym);
            }

            Instruction::Return(code) => {
                let mut sym = sym;
                sym.ctx.result = code_value(*code, sym.ctx.result);
                out.ret.insert(sym);
            }

            Instruction::Shift(n) => {
                let n = n.unwrap_or(1);
                let mut sym = sym;
                if sym.ctx.args.len() >= n {
                    sym.ctx.args.drain(..n);
                    sym.ctx.result = true;
                } else {
                    sym.ctx.result = false;
                }
                self.settle(inp, &mut out, sym);
            }

            Instruction::Assign(id, expr) => {
                for (state, res) in self.eval_str(true, inp, &sym.ctx, sym.state.clone(), expr) {
                    match res {
                        Some((b, text)) => {
                            let mut ctx = sym.ctx.clone();
                            ctx.var_env = ctx.var_env.with(id, text);
                            ctx.result = b;
                            self.settle(inp, &mut out, SymState { state, ctx });
                        }
                        None => {
                            out.failure.insert(SymState {
                                state,
                                ctx: sym.ctx.clone(),
                            });
                        }
                    }
                }
            }

            Instruction::Seq(first, second) => {
                let o1 = self.eval(inp, sym, first);
                out.exit = o1.exit;
                out.ret = o1.ret;
                out.failure = o1.failure;
                let o2 = self.eval_set(inp, &o1.normal, second);
                out.union(o2);
            }

            Instruction::Subshell(body) => {
                let caller_ctx = sym.ctx.clone();
                let o = self.eval(inp, sym, body);
                // Exit and Return end the subshell, not the caller; only the
                // result and the state escape.
                for st in chain3(o.normal, o.exit, o.ret) {
                    let mut ctx = caller_ctx.clone();
                    ctx.result = st.ctx.result;
                    self.settle(inp, &mut out, SymState { state: st.state, ctx });
                }
                out.failure = o.failure;
            }

            Instruction::Not(inner) => {
                let o = self.eval(&inp.in_condition(), sym, inner);
                for mut st in o.normal {
                    st.ctx.result = !st.ctx.result;
                    out.normal.insert(st);
                }
                for mut st in o.ret {
                    st.ctx.result = !st.ctx.result;
                    out.ret.insert(st);
                }
                out.exit = o.exit;
                out.failure = o.failure;
            }

            Instruction::NoOutput(inner) => {
                let saved = sym.state.stdout.clone();
                let o = self.eval(inp, sym, inner);
                for mut st in o.normal {
                    st.state.stdout = saved.clone();
                    out.normal.insert(st);
                }
                for mut st in o.exit {
                    st.state.stdout = saved.clone();
                    out.exit.insert(st);
                }
                for mut st in o.ret {
                    st.state.stdout = saved.clone();
                    out.ret.insert(st);
                }
                out.failure = o.failure;
            }

            Instruction::If(cond, then_branch, else_branch) => {
                let o = self.eval(&inp.in_condition(), sym, cond);
                out.exit = o.exit;
                out.ret = o.ret;
                out.failure = o.failure;
                for st in o.normal {
                    let branch = if st.ctx.result { then_branch } else { else_branch };
                    out.union(self.eval(inp, st, branch));
                }
            }

            Instruction::Pipe(lhs, rhs) => {
                let caller_ctx = sym.ctx.clone();
                let caller_stdin = sym.state.stdin.clone();
                let caller_stdout = sym.state.stdout.clone();

                let mut left = sym;
                left.state.stdout = Stdout::default();
                let o1 = self.eval(inp, left, lhs);
                out.failure.extend(o1.failure);

                // The left side ends its half of the pipe however it ends;
                // only its output and its state feed the right side.
                for st in chain3(o1.normal, o1.exit, o1.ret) {
                    let mut mid = st.state;
                    mid.stdin = Stdin::from_stdout(&mid.stdout);
                    mid.stdout = caller_stdout.clone();
                    let o2 = self.eval(
                        inp,
                        SymState {
                            state: mid,
                            ctx: caller_ctx.clone(),
                        },
                        rhs,
                    );
                    out.failure.extend(o2.failure);
                    for (bucket, states) in [
                        (Bucket::Normal, o2.normal),
                        (Bucket::Exit, o2.exit),
                        (Bucket::Ret, o2.ret),
                    ] {
                        for mut st2 in states {
                            st2.state.stdin = caller_stdin.clone();
                            let mut ctx = caller_ctx.clone();
                            ctx.result = st2.ctx.result;
                            st2.ctx = ctx;
                            match bucket {
                                Bucket::Normal => out.normal.insert(st2),
                                Bucket::Exit => out.exit.insert(st2),
                                Bucket::Ret => out.ret.insert(st2),
                            };
                        }
                    }
                }
            }

            Instruction::CallUtility(name, args) => {
                for (state, res) in self.eval_list(inp, &sym.ctx, sym.state.clone(), args) {
                    match res {
                        None => {
                            out.failure.insert(SymState {
                                state,
                                ctx: sym.ctx.clone(),
                            });
                        }
                        Some(argv) => {
                            for (state, b) in self.utils.interp_utility(state, name, &argv) {
                                let mut ctx = sym.ctx.clone();
                                ctx.result = b;
                                self.settle(inp, &mut out, SymState { state, ctx });
                            }
                        }
                    }
                }
            }

            Instruction::CallFunction(name, args) => {
                for (state, res) in self.eval_list(inp, &sym.ctx, sym.state.clone(), args) {
                    match res {
                        None => {
                            out.failure.insert(SymState {
                                state,
                                ctx: sym.ctx.clone(),
                            });
                        }
                        Some(argv) => match sym.ctx.func_env.get(name) {
                            None => {
                                let mut ctx = sym.ctx.clone();
                                ctx.result = false;
                                self.settle(inp, &mut out, SymState { state, ctx });
                            }
                            Some(body) => {
                                let body = body.clone();
                                let callee_inp = Input {
                                    under_condition: inp.under_condition,
                                    argument0: name.clone(),
                                };
                                let mut callee_ctx = sym.ctx.clone();
                                callee_ctx.args = argv;
                                let o = self.eval(
                                    &callee_inp,
                                    SymState { state, ctx: callee_ctx },
                                    &body,
                                );
                                out.exit.extend(o.exit);
                                out.failure.extend(o.failure);
                                // Return ends the body; the caller sees a
                                // normal completion with the callee's
                                // result, and gets its own positionals back.
                                for st in o.normal.into_iter().chain(o.ret) {
                                    let mut ctx = st.ctx;
                                    ctx.args = sym.ctx.args.clone();
                                    self.settle(inp, &mut out, SymState { state: st.state, ctx });
                                }
                            }
                        },
                    }
                }
            }

            Instruction::Foreach(var, items, body) => {
                for (state, res) in self.eval_list(inp, &sym.ctx, sym.state.clone(), items) {
                    match res {
                        None => {
                            out.failure.insert(SymState {
                                state,
                                ctx: sym.ctx.clone(),
                            });
                        }
                        Some(words) => {
                            let start = SymState {
                                state,
                                ctx: sym.ctx.clone(),
                            };
                            let mut frontier: BTreeSet<(SymState, bool)> =
                                BTreeSet::from([(start, true)]);
                            for word in &words {
                                let mut next = BTreeSet::new();
                                for (mut st, _) in frontier {
                                    st.ctx.var_env = st.ctx.var_env.with(var, word.clone());
                                    let o = self.eval(inp, st, body);
                                    out.exit.extend(o.exit);
                                    out.ret.extend(o.ret);
                                    out.failure.extend(o.failure);
                                    for n in o.normal {
                                        let b = n.ctx.result;
                                        next.insert((n, b));
                                    }
                                }
                                frontier = next;
                            }
                            for (mut st, b) in frontier {
                                st.ctx.result = b;
                                out.normal.insert(st);
                            }
                        }
                    }
                }
            }

            Instruction::While(cond, body) => {
                let limit = self.cnf.loop_limit.unwrap_or(0);
                let mut frontier: BTreeSet<(SymState, bool)> = BTreeSet::from([(sym, true)]);
                let mut iterations = 0usize;
                while !frontier.is_empty() {
                    if iterations == limit {
                        debug!(
                            "loop limit {} reached with {} live states",
                            limit,
                            frontier.len()
                        );
                        for (st, _) in frontier {
                            out.failure.insert(st);
                        }
                        break;
                    }
                    let mut next = BTreeSet::new();
                    for (st, last_result) in frontier {
                        let oc = self.eval(&inp.in_condition(), st, cond);
                        out.exit.extend(oc.exit);
                        out.ret.extend(oc.ret);
                        out.failure.extend(oc.failure);
                        for cst in oc.normal {
                            if cst.ctx.result {
                                let ob = self.eval(inp, cst, body);
                                out.exit.extend(ob.exit);
                                out.ret.extend(ob.ret);
                                out.failure.extend(ob.failure);
                                for bst in ob.normal {
                                    let b = bst.ctx.result;
                                    next.insert((bst, b));
                                }
                            } else {
                                let mut done = cst;
                                done.ctx.result = last_result;
                                out.normal.insert(done);
                            }
                        }
                    }
                    frontier = next;
                    iterations += 1;
                }
            }
        }
        out
    }

    /// Evaluate a string expression into `(state, Some (result, text))`
    /// branches, or `(state, None)` where a substitution failed. `b` is the
    /// result carried so far; the rightmost substitution wins.
    fn eval_str(
        &self,
        b: bool,
        inp: &Input,
        ctx: &Context,
        state: State,
        expr: &StringExpr,
    ) -> Vec<(State, Option<(bool, String)>)> {
        match expr {
            StringExpr::Literal(s) => vec![(state, Some((b, s.clone())))],

            StringExpr::Var(id) => {
                let value = ctx.lookup_var(id);
                vec![(state, Some((b, value)))]
            }

            StringExpr::Arg(n) => {
                let value = if *n == 0 {
                    inp.argument0.clone()
                } else {
                    ctx.args.get(*n - 1).cloned().unwrap_or_default()
                };
                vec![(state, Some((b, value)))]
            }

            StringExpr::Subshell(body) => {
                let caller_stdout = state.stdout.clone();
                let mut sub = state;
                sub.stdout = Stdout::default();
                // Substitutions run in condition mode: a false result is the
                // expression's value, not a program exit.
                let sub_inp = Input {
                    under_condition: true,
                    argument0: inp.argument0.clone(),
                };
                let o = self.eval(
                    &sub_inp,
                    SymState {
                        state: sub,
                        ctx: ctx.clone(),
                    },
                    body,
                );
                let mut results = Vec::new();
                for st in chain3(o.normal, o.exit, o.ret) {
                    let text = st.state.stdout.to_text();
                    let mut state = st.state;
                    state.stdout = caller_stdout.clone();
                    results.push((state, Some((st.ctx.result, text))));
                }
                for st in o.failure {
                    let mut state = st.state;
                    state.stdout = caller_stdout.clone();
                    results.push((state, None));
                }
                results
            }

            StringExpr::Concat(lhs, rhs) => {
                let mut results = Vec::new();
                for (state, left) in self.eval_str(b, inp, ctx, state, lhs) {
                    match left {
                        None => results.push((state, None)),
                        Some((b1, s1)) => {
                            for (state, right) in self.eval_str(b1, inp, ctx, state, rhs) {
                                match right {
                                    None => results.push((state, None)),
                                    Some((b2, s2)) => {
                                        results.push((state, Some((b2, format!("{}{}", s1, s2)))));
                                    }
                                }
                            }
                        }
                    }
                }
                results
            }
        }
    }

    /// Evaluate a word list into argument vectors, applying field splitting
    /// per word. A failed substitution poisons its whole branch.
    fn eval_list(
        &self,
        inp: &Input,
        ctx: &Context,
        state: State,
        items: &ListExpr,
    ) -> Vec<(State, Option<Vec<String>>)> {
        let mut acc: Vec<(State, Option<Vec<String>>)> = vec![(state, Some(Vec::new()))];
        for (expr, split) in items {
            let mut next = Vec::new();
            for (state, res) in acc {
                match res {
                    None => next.push((state, None)),
                    Some(words) => {
                        for (state, r) in self.eval_str(true, inp, ctx, state, expr) {
                            match r {
                                None => next.push((state, None)),
                                Some((_, text)) => {
                                    let mut words = words.clone();
                                    match split {
                                        SplitMode::Split => words.extend(split_fields(&text)),
                                        SplitMode::DontSplit => words.push(text),
                                    }
                                    next.push((state, Some(words)));
                                }
                            }
                        }
                    }
                }
            }
            acc = next;
        }
        acc
    }
}

enum Bucket {
    Normal,
    Exit,
    Ret,
}

fn chain3(a: StateSet, b: StateSet, c: StateSet) -> impl Iterator<Item = SymState> {
    a.into_iter().chain(b).chain(c)
}
