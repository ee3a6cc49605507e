//! The concrete interpreter: the same evaluation rules as the symbolic
//! core, collapsed to a single threaded state. The outcome buckets become
//! `Result` control flow; an instruction either completes normally or
//! raises one of the interrupt values below.

use crate::ast::{Instruction, ListExpr, SplitMode, StringExpr};
use crate::buffer::Stdout;
use crate::context::Context;
use crate::state::State;
use crate::symbolic::{code_value, split_fields, Config, Input};
use crate::utility::UtilityInterpreter;

/// Value-level analogues of the non-normal outcome buckets.
#[derive(Debug)]
pub enum Interrupt {
    Exit { state: State, ctx: Context },
    Return { state: State, ctx: Context },
    Failure { reason: String },
}

pub type ExecResult<T> = Result<T, Interrupt>;

pub struct Interp<'a> {
    cnf: &'a Config,
    utils: &'a dyn UtilityInterpreter,
}

impl<'a> Interp<'a> {
    pub fn new(cnf: &'a Config, utils: &'a dyn UtilityInterpreter) -> Self {
        Interp { cnf, utils }
    }

    /// File a completed state: under strict evaluation a false result
    /// terminates the program.
    fn settle(&self, inp: &Input, state: State, ctx: Context) -> ExecResult<(State, Context)> {
        if !inp.under_condition && !ctx.result {
            Err(Interrupt::Exit { state, ctx })
        } else {
            Ok((state, ctx))
        }
    }

    pub fn exec(
        &self,
        inp: &Input,
        state: State,
        ctx: Context,
        ins: &Instruction,
    ) -> ExecResult<(State, Context)> {
        match ins {
            Instruction::Exit(code) => {
                let mut ctx = ctx;
                ctx.result = code_value(*code, ctx.result);
                Err(Interrupt::Exit { state, ctx })
            }

            Instruction::Return(code) => {
                let mut ctx = ctx;
                ctx.result = code_value(*code, ctx.result);
                Err(Interrupt::Return { state, ctx })
            }

            Instruction::Shift(n) => {
                let n = n.unwrap_or(1);
                let mut ctx = ctx;
                if ctx.args.len() >= n {
                    ctx.args.drain(..n);
                    ctx.result = true;
                } else {
                    ctx.result = false;
                }
                self.settle(inp, state, ctx)
            }

            Instruction::Assign(id, expr) => {
                let (state, (b, text)) = self.exec_str(true, inp, &ctx, state, expr)?;
                let mut ctx = ctx;
                ctx.var_env = ctx.var_env.with(id, text);
                ctx.result = b;
                self.settle(inp, state, ctx)
            }

            Instruction::Seq(first, second) => {
                let (state, ctx) = self.exec(inp, state, ctx, first)?;
                self.exec(inp, state, ctx, second)
            }

            Instruction::Subshell(body) => {
                let caller_ctx = ctx.clone();
                let (state, result) = match self.exec(inp, state, ctx, body) {
                    Ok((state, ctx)) => (state, ctx.result),
                    Err(Interrupt::Exit { state, ctx })
                    | Err(Interrupt::Return { state, ctx }) => (state, ctx.result),
                    Err(failure) => return Err(failure),
                };
                let mut ctx = caller_ctx;
                ctx.result = result;
                self.settle(inp, state, ctx)
            }

            Instruction::Not(inner) => {
                match self.exec(&inp.in_condition(), state, ctx, inner) {
                    Ok((state, mut ctx)) => {
                        ctx.result = !ctx.result;
                        Ok((state, ctx))
                    }
                    Err(Interrupt::Return { state, mut ctx }) => {
                        ctx.result = !ctx.result;
                        Err(Interrupt::Return { state, ctx })
                    }
                    err => err,
                }
            }

            Instruction::NoOutput(inner) => {
                let saved = state.stdout.clone();
                match self.exec(inp, state, ctx, inner) {
                    Ok((mut state, ctx)) => {
                        state.stdout = saved;
                        Ok((state, ctx))
                    }
                    Err(Interrupt::Exit { mut state, ctx }) => {
                        state.stdout = saved;
                        Err(Interrupt::Exit { state, ctx })
                    }
                    Err(Interrupt::Return { mut state, ctx }) => {
                        state.stdout = saved;
                        Err(Interrupt::Return { state, ctx })
                    }
                    err => err,
                }
            }

            Instruction::If(cond, then_branch, else_branch) => {
                let (state, ctx) = self.exec(&inp.in_condition(), state, ctx, cond)?;
                let branch = if ctx.result { then_branch } else { else_branch };
                self.exec(inp, state, ctx, branch)
            }

            Instruction::Pipe(lhs, rhs) => {
                let caller_ctx = ctx.clone();
                let caller_stdin = state.stdin.clone();
                let caller_stdout = state.stdout.clone();

                let mut left = state;
                left.stdout = Stdout::default();
                let mut mid = match self.exec(inp, left, ctx, lhs) {
                    Ok((state, _)) => state,
                    Err(Interrupt::Exit { state, .. }) | Err(Interrupt::Return { state, .. }) => {
                        state
                    }
                    Err(failure) => return Err(failure),
                };
                mid.stdin = crate::buffer::Stdin::from_stdout(&mid.stdout);
                mid.stdout = caller_stdout;

                match self.exec(inp, mid, caller_ctx.clone(), rhs) {
                    Ok((mut state, rhs_ctx)) => {
                        state.stdin = caller_stdin;
                        let mut ctx = caller_ctx;
                        ctx.result = rhs_ctx.result;
                        Ok((state, ctx))
                    }
                    Err(Interrupt::Exit { mut state, ctx: rhs_ctx }) => {
                        state.stdin = caller_stdin;
                        let mut ctx = caller_ctx;
                        ctx.result = rhs_ctx.result;
                        Err(Interrupt::Exit { state, ctx })
                    }
                    Err(Interrupt::Return { mut state, ctx: rhs_ctx }) => {
                        state.stdin = caller_stdin;
                        let mut ctx = caller_ctx;
                        ctx.result = rhs_ctx.result;
                        Err(Interrupt::Return { state, ctx })
                    }
                    err => err,
                }
            }

            Instruction::CallUtility(name, args) => {
                let (state, argv) = self.exec_list(inp, &ctx, state, args)?;
                let mut results = self.utils.interp_utility(state, name, &argv);
                match results.len() {
                    1 => {
                        let (state, b) = results.pop().unwrap();
                        let mut ctx = ctx;
                        ctx.result = b;
                        self.settle(inp, state, ctx)
                    }
                    0 => Err(Interrupt::Failure {
                        reason: format!("utility {} produced no state", name),
                    }),
                    n => Err(Interrupt::Failure {
                        reason: format!("utility {} is nondeterministic here ({} states)", name, n),
                    }),
                }
            }

            Instruction::CallFunction(name, args) => {
                let (state, argv) = self.exec_list(inp, &ctx, state, args)?;
                match ctx.func_env.get(name) {
                    None => {
                        let mut ctx = ctx;
                        ctx.result = false;
                        self.settle(inp, state, ctx)
                    }
                    Some(body) => {
                        let body = body.clone();
                        let callee_inp = Input {
                            under_condition: inp.under_condition,
                            argument0: name.clone(),
                        };
                        let mut callee_ctx = ctx.clone();
                        callee_ctx.args = argv;
                        let (state, mut out_ctx) =
                            match self.exec(&callee_inp, state, callee_ctx, &body) {
                                Ok(done) => done,
                                Err(Interrupt::Return { state, ctx }) => (state, ctx),
                                err => return err,
                            };
                        out_ctx.args = ctx.args;
                        self.settle(inp, state, out_ctx)
                    }
                }
            }

            Instruction::Foreach(var, items, body) => {
                let (state, words) = self.exec_list(inp, &ctx, state, items)?;
                let mut state = state;
                let mut ctx = ctx;
                let mut result = true;
                for word in words {
                    ctx.var_env = ctx.var_env.with(var, word);
                    let (s, c) = self.exec(inp, state, ctx, body)?;
                    result = c.result;
                    state = s;
                    ctx = c;
                }
                ctx.result = result;
                Ok((state, ctx))
            }

            Instruction::While(cond, body) => {
                let mut state = state;
                let mut ctx = ctx;
                let mut last_result = true;
                let mut iterations = 0usize;
                loop {
                    if let Some(limit) = self.cnf.loop_limit {
                        if iterations == limit {
                            return Err(Interrupt::Failure {
                                reason: format!("loop limit {} reached", limit),
                            });
                        }
                    }
                    let (s, c) = self.exec(&inp.in_condition(), state, ctx, cond)?;
                    if !c.result {
                        let mut ctx = c;
                        ctx.result = last_result;
                        return Ok((s, ctx));
                    }
                    let (s, c) = self.exec(inp, s, c, body)?;
                    last_result = c.result;
                    state = s;
                    ctx = c;
                    iterations += 1;
                }
            }
        }
    }

    fn exec_str(
        &self,
        b: bool,
        inp: &Input,
        ctx: &Context,
        state: State,
        expr: &StringExpr,
    ) -> ExecResult<(State, (bool, String))> {
        match expr {
            StringExpr::Literal(s) => Ok((state, (b, s.clone()))),

            StringExpr::Var(id) => {
                let value = ctx.lookup_var(id);
                Ok((state, (b, value)))
            }

            StringExpr::Arg(n) => {
                let value = if *n == 0 {
                    inp.argument0.clone()
                } else {
                    ctx.args.get(*n - 1).cloned().unwrap_or_default()
                };
                Ok((state, (b, value)))
            }

            StringExpr::Subshell(body) => {
                let caller_stdout = state.stdout.clone();
                let mut sub = state;
                sub.stdout = Stdout::default();
                let sub_inp = Input {
                    under_condition: true,
                    argument0: inp.argument0.clone(),
                };
                let (state, result) = match self.exec(&sub_inp, sub, ctx.clone(), body) {
                    Ok((state, ctx)) => (state, ctx.result),
                    Err(Interrupt::Exit { state, ctx })
                    | Err(Interrupt::Return { state, ctx }) => (state, ctx.result),
                    Err(failure) => return Err(failure),
                };
                let text = state.stdout.to_text();
                let mut state = state;
                state.stdout = caller_stdout;
                Ok((state, (result, text)))
            }

            StringExpr::Concat(lhs, rhs) => {
                let (state, (b1, s1)) = self.exec_str(b, inp, ctx, state, lhs)?;
                let (state, (b2, s2)) = self.exec_str(b1, inp, ctx, state, rhs)?;
                Ok((state, (b2, format!("{}{}", s1, s2))))
            }
        }
    }

    fn exec_list(
        &self,
        inp: &Input,
        ctx: &Context,
        state: State,
        items: &ListExpr,
    ) -> ExecResult<(State, Vec<String>)> {
        let mut state = state;
        let mut words = Vec::new();
        for (expr, split) in items {
            let (s, (_, text)) = self.exec_str(true, inp, ctx, state, expr)?;
            state = s;
            match split {
                SplitMode::Split => words.extend(split_fields(&text)),
                SplitMode::DontSplit => words.push(text),
            }
        }
        Ok((state, words))
    }
}
