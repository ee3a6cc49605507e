use crate::ast::{ListExpr, SplitMode, StringExpr};
use crate::lexer::{QuotedPart, TokenKind};
use crate::parser::common::{ParseResult, Parser};
use crate::parser::inst;

/// The status pseudo-variable. It cannot be written from a program (`?` is
/// not a valid identifier), so reading it always falls through to the
/// environment's per-lookup default, which the interpreters render from the
/// context result.
pub const STATUS_VAR: &str = "?";

/// True if the token can begin (or continue) a word.
pub(crate) fn starts_word(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Bare(_)
            | TokenKind::Quoted(_)
            | TokenKind::VarRef(_)
            | TokenKind::ArgRef(_)
            | TokenKind::StatusRef
            | TokenKind::DollarLParen
    )
}

fn concat(lhs: Option<StringExpr>, rhs: StringExpr) -> StringExpr {
    match lhs {
        None => rhs,
        Some(l) => StringExpr::Concat(Box::new(l), Box::new(rhs)),
    }
}

fn quoted_expr(parts: &[QuotedPart]) -> StringExpr {
    let mut expr = None;
    for part in parts {
        let seg = match part {
            QuotedPart::Text(s) => StringExpr::Literal(s.clone()),
            QuotedPart::Var(v) => StringExpr::Var(v.clone()),
            QuotedPart::Arg(n) => StringExpr::Arg(*n),
            QuotedPart::Status => StringExpr::Var(STATUS_VAR.to_string()),
        };
        expr = Some(concat(expr, seg));
    }
    expr.unwrap_or(StringExpr::Literal(String::new()))
}

/// Parse one word: a maximal run of adjacent word segments. Adjacency is
/// decided by spans, so `a$x"b"` is one word while `a $x` is two.
pub(crate) fn parse_word(p: &mut Parser) -> ParseResult<(StringExpr, SplitMode)> {
    let mut expr: Option<StringExpr> = None;
    let mut all_quoted = true;
    let mut end = None;

    loop {
        let tok = match p.peek() {
            Some(t) if starts_word(&t.kind) => t,
            _ => break,
        };
        if let Some(end) = end {
            if tok.span.start != end {
                break;
            }
        }

        let seg = match &tok.kind {
            TokenKind::Bare(s) => {
                all_quoted = false;
                let s = s.clone();
                p.advance();
                StringExpr::Literal(s)
            }
            TokenKind::Quoted(parts) => {
                let e = quoted_expr(parts);
                p.advance();
                e
            }
            TokenKind::VarRef(v) => {
                all_quoted = false;
                let v = v.clone();
                p.advance();
                StringExpr::Var(v)
            }
            TokenKind::ArgRef(n) => {
                all_quoted = false;
                let n = *n;
                p.advance();
                StringExpr::Arg(n)
            }
            TokenKind::StatusRef => {
                all_quoted = false;
                p.advance();
                StringExpr::Var(STATUS_VAR.to_string())
            }
            TokenKind::DollarLParen => {
                all_quoted = false;
                p.advance();
                let body = inst::parse_block_items(p, Some(&TokenKind::RParen))?;
                p.expect(TokenKind::RParen)?;
                StringExpr::Subshell(Box::new(body))
            }
            _ => unreachable!("starts_word filtered the kind"),
        };
        end = Some(p.previous_span().end);
        expr = Some(concat(expr, seg));
    }

    match expr {
        Some(e) => {
            let split = if all_quoted { SplitMode::DontSplit } else { SplitMode::Split };
            Ok((e, split))
        }
        None => p.error("expected a word", p.current_span()),
    }
}

/// Parse zero or more words up to the next non-word token.
pub(crate) fn parse_words(p: &mut Parser) -> ParseResult<ListExpr> {
    let mut words = Vec::new();
    while let Some(t) = p.peek() {
        if !starts_word(&t.kind) {
            break;
        }
        words.push(parse_word(p)?);
    }
    Ok(words)
}
