mod common;
mod inst;
mod word;

pub use word::STATUS_VAR;

use crate::ast::{Instruction, ListExpr, Program, StringExpr};
use crate::lexer::{self, TokenKind};
use crate::span::{Diagnostic, SourceMap};
use common::Parser;
use std::collections::HashSet;

/// Lex and parse a whole source file.
pub fn parse_program(src: &str, file: &str) -> Result<Program, Diagnostic> {
    let sm = SourceMap::new(src.to_string());
    let tokens = lexer::lex(&sm, file)?;
    let mut p = Parser::new(&tokens, &sm, file);

    let mut functions: Vec<(String, Instruction)> = Vec::new();
    let mut items = Vec::new();

    loop {
        p.consume_separators();
        let tok = match p.peek() {
            None => break,
            Some(t) => t,
        };
        if tok.kind == TokenKind::Bare("function".to_string()) {
            p.advance();
            let name = match p.peek() {
                Some(t) => match &t.kind {
                    TokenKind::Bare(name) if inst::is_ident(name) => {
                        let name = name.clone();
                        p.advance();
                        name
                    }
                    _ => return p.error("expected a function name", t.span),
                },
                None => return p.error("expected a function name", p.current_span()),
            };
            let body = inst::parse_block(&mut p)?;
            functions.push((name, body));
        } else {
            items.push(inst::parse_pipeline(&mut p)?);
        }
    }

    let names: HashSet<String> = functions.iter().map(|(n, _)| n.clone()).collect();
    let functions = functions
        .into_iter()
        .map(|(n, i)| (n, resolve_inst(i, &names)))
        .collect();
    let body = resolve_inst(Instruction::seq_of(items), &names);

    Ok(Program { functions, body })
}

/// Rewrite utility calls that name a defined function into function calls.
/// Runs after the whole program is parsed so definition order does not
/// matter.
fn resolve_inst(ins: Instruction, names: &HashSet<String>) -> Instruction {
    use Instruction::*;
    match ins {
        CallUtility(name, args) => {
            let args = resolve_list(args, names);
            if names.contains(&name) {
                CallFunction(name, args)
            } else {
                CallUtility(name, args)
            }
        }
        CallFunction(name, args) => CallFunction(name, resolve_list(args, names)),
        Assign(id, e) => Assign(id, resolve_str(e, names)),
        Seq(a, b) => Seq(
            Box::new(resolve_inst(*a, names)),
            Box::new(resolve_inst(*b, names)),
        ),
        Subshell(i) => Subshell(Box::new(resolve_inst(*i, names))),
        Not(i) => Not(Box::new(resolve_inst(*i, names))),
        NoOutput(i) => NoOutput(Box::new(resolve_inst(*i, names))),
        If(c, t, e) => If(
            Box::new(resolve_inst(*c, names)),
            Box::new(resolve_inst(*t, names)),
            Box::new(resolve_inst(*e, names)),
        ),
        Pipe(a, b) => Pipe(
            Box::new(resolve_inst(*a, names)),
            Box::new(resolve_inst(*b, names)),
        ),
        Foreach(id, items, body) => Foreach(
            id,
            resolve_list(items, names),
            Box::new(resolve_inst(*body, names)),
        ),
        While(c, b) => While(
            Box::new(resolve_inst(*c, names)),
            Box::new(resolve_inst(*b, names)),
        ),
        ins @ (Exit(_) | Return(_) | Shift(_)) => ins,
    }
}

fn resolve_str(e: StringExpr, names: &HashSet<String>) -> StringExpr {
    match e {
        StringExpr::Subshell(i) => StringExpr::Subshell(Box::new(resolve_inst(*i, names))),
        StringExpr::Concat(a, b) => StringExpr::Concat(
            Box::new(resolve_str(*a, names)),
            Box::new(resolve_str(*b, names)),
        ),
        e @ (StringExpr::Literal(_) | StringExpr::Var(_) | StringExpr::Arg(_)) => e,
    }
}

fn resolve_list(le: ListExpr, names: &HashSet<String>) -> ListExpr {
    le.into_iter()
        .map(|(e, sp)| (resolve_str(e, names), sp))
        .collect()
}
