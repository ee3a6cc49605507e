use crate::ast::{Instruction, RetCode, StringExpr};
use crate::lexer::TokenKind;
use crate::parser::common::{ParseResult, Parser};
use crate::parser::word::{self, starts_word};

pub(crate) fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse instructions up to `until` (or EOF), folding them into a sequence.
/// An empty body yields the no-op instruction.
pub(crate) fn parse_block_items(
    p: &mut Parser,
    until: Option<&TokenKind>,
) -> ParseResult<Instruction> {
    let mut items = Vec::new();
    loop {
        p.consume_separators();
        match p.peek() {
            None => break,
            Some(t) => {
                if let Some(u) = until {
                    if &t.kind == u {
                        break;
                    }
                }
                items.push(parse_pipeline(p)?);
            }
        }
    }
    Ok(Instruction::seq_of(items))
}

/// `{ ... }`
pub(crate) fn parse_block(p: &mut Parser) -> ParseResult<Instruction> {
    p.consume_separators();
    p.expect(TokenKind::LBrace)?;
    let body = parse_block_items(p, Some(&TokenKind::RBrace))?;
    p.expect(TokenKind::RBrace)?;
    Ok(body)
}

pub(crate) fn parse_pipeline(p: &mut Parser) -> ParseResult<Instruction> {
    let mut lhs = parse_instruction(p)?;
    while p.match_kind(TokenKind::Pipe) {
        // A pipe may be followed by a line break.
        p.consume_separators();
        let rhs = parse_instruction(p)?;
        lhs = Instruction::Pipe(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_instruction(p: &mut Parser) -> ParseResult<Instruction> {
    let tok = match p.peek() {
        Some(t) => t,
        None => return p.error("expected an instruction, got EOF", p.current_span()),
    };

    match &tok.kind {
        TokenKind::LParen => {
            p.advance();
            let body = parse_block_items(p, Some(&TokenKind::RParen))?;
            p.expect(TokenKind::RParen)?;
            Ok(Instruction::Subshell(Box::new(body)))
        }
        TokenKind::Bare(w) => match w.as_str() {
            "!" => {
                p.advance();
                let inner = parse_pipeline(p)?;
                Ok(Instruction::Not(Box::new(inner)))
            }
            "if" => {
                p.advance();
                parse_if(p)
            }
            "while" => {
                p.advance();
                let cond = parse_pipeline(p)?;
                let body = parse_block(p)?;
                Ok(Instruction::While(Box::new(cond), Box::new(body)))
            }
            "for" => {
                p.advance();
                parse_for(p)
            }
            "quiet" => {
                p.advance();
                let inner = parse_instruction(p)?;
                Ok(Instruction::NoOutput(Box::new(inner)))
            }
            "exit" => {
                p.advance();
                Ok(Instruction::Exit(parse_ret_code(p)?))
            }
            "return" => {
                p.advance();
                Ok(Instruction::Return(parse_ret_code(p)?))
            }
            "shift" => {
                p.advance();
                parse_shift(p)
            }
            "function" => p.error(
                "function definitions are only allowed at top level",
                tok.span,
            ),
            _ => parse_call_or_assign(p),
        },
        _ => p.error("expected an instruction", tok.span),
    }
}

fn parse_if(p: &mut Parser) -> ParseResult<Instruction> {
    let cond = parse_pipeline(p)?;
    let then_branch = parse_block(p)?;
    p.consume_separators();
    let else_branch = match p.peek_kind() {
        Some(TokenKind::Bare(w)) if w == "else" => {
            p.advance();
            parse_block(p)?
        }
        _ => Instruction::noop(),
    };
    Ok(Instruction::If(
        Box::new(cond),
        Box::new(then_branch),
        Box::new(else_branch),
    ))
}

fn parse_for(p: &mut Parser) -> ParseResult<Instruction> {
    let var = match p.peek() {
        Some(t) => match &t.kind {
            TokenKind::Bare(name) if is_ident(name) => {
                let name = name.clone();
                p.advance();
                name
            }
            _ => return p.error("expected a variable name after `for`", t.span),
        },
        None => return p.error("expected a variable name after `for`", p.current_span()),
    };
    match p.peek() {
        Some(t) if t.kind == TokenKind::Bare("in".to_string()) => {
            p.advance();
        }
        _ => return p.error("expected `in`", p.current_span()),
    }
    let items = word::parse_words(p)?;
    let body = parse_block(p)?;
    Ok(Instruction::Foreach(var, items, Box::new(body)))
}

fn parse_ret_code(p: &mut Parser) -> ParseResult<RetCode> {
    match p.peek() {
        Some(t) => match &t.kind {
            TokenKind::StatusRef => {
                p.advance();
                Ok(RetCode::Previous)
            }
            TokenKind::Bare(w) if w.chars().all(|c| c.is_ascii_digit()) => {
                let zero = w.chars().all(|c| c == '0');
                p.advance();
                Ok(if zero { RetCode::Success } else { RetCode::Failure })
            }
            kind if starts_word(kind) => p.error("expected a numeric status or `$?`", t.span),
            _ => Ok(RetCode::Previous),
        },
        None => Ok(RetCode::Previous),
    }
}

fn parse_shift(p: &mut Parser) -> ParseResult<Instruction> {
    match p.peek() {
        Some(t) => match &t.kind {
            TokenKind::Bare(w) if w.chars().all(|c| c.is_ascii_digit()) => {
                let n: usize = match w.parse() {
                    Ok(n) => n,
                    Err(_) => return p.error("shift count out of range", t.span),
                };
                if n == 0 {
                    return p.error("shift count must be at least 1", t.span);
                }
                p.advance();
                Ok(Instruction::Shift(Some(n)))
            }
            kind if starts_word(kind) => p.error("expected a numeric shift count", t.span),
            _ => Ok(Instruction::Shift(None)),
        },
        None => Ok(Instruction::Shift(None)),
    }
}

fn parse_call_or_assign(p: &mut Parser) -> ParseResult<Instruction> {
    let head_span = p.current_span();

    // `name := word` needs one token of lookahead past the name.
    if let (Some(TokenKind::Bare(name)), Some(next)) =
        (p.peek_kind(), p.tokens.get(p.pos + 1))
    {
        if next.kind == TokenKind::Assign {
            if !is_ident(name) {
                return p.error("invalid assignment target", head_span);
            }
            let name = name.clone();
            p.advance();
            p.advance();
            let value = match p.peek() {
                Some(t) if starts_word(&t.kind) => word::parse_word(p)?.0,
                _ => StringExpr::Literal(String::new()),
            };
            return Ok(Instruction::Assign(name, value));
        }
    }

    let (head, _) = word::parse_word(p)?;
    let name = match head {
        StringExpr::Literal(s) => s,
        _ => return p.error("command name must be a literal word", head_span),
    };
    let args = word::parse_words(p)?;
    // Calls parse as utility calls; the resolver pass turns the ones that
    // name a defined function into function calls.
    Ok(Instruction::CallUtility(name, args))
}
