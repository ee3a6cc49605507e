use crate::lexer::{Token, TokenKind};
use crate::span::{Diagnostic, SourceMap, Span};

pub(crate) struct Parser<'a> {
    pub tokens: &'a [Token],
    pub pos: usize,
    pub sm: &'a SourceMap,
    pub file: &'a str,
}

pub type ParseResult<T> = Result<T, Diagnostic>;

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], sm: &'a SourceMap, file: &'a str) -> Self {
        Parser {
            tokens,
            pos: 0,
            sm,
            file,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub fn error<T>(&self, msg: &str, span: Span) -> ParseResult<T> {
        Err(Diagnostic {
            msg: msg.to_string(),
            span,
            sm: Some(self.sm.clone()),
            file: Some(self.file.to_string()),
        })
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::new(0, 0)
        }
    }

    pub fn current_span(&self) -> Span {
        if let Some(t) = self.peek() {
            t.span
        } else if self.tokens.is_empty() {
            Span::new(0, 0)
        } else {
            let last = self.tokens.last().unwrap().span;
            Span::new(last.end, last.end + 1)
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if let Some(t) = self.peek() {
            if t.kind == kind {
                self.advance();
                Ok(())
            } else {
                self.error(&format!("expected {:?}, got {:?}", kind, t.kind), t.span)
            }
        } else {
            self.error(&format!("expected {:?}, got EOF", kind), self.current_span())
        }
    }

    pub fn match_kind(&mut self, kind: TokenKind) -> bool {
        if let Some(t) = self.peek() {
            if t.kind == kind {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consume any run of `;` / newline separators.
    pub fn consume_separators(&mut self) {
        while self.match_kind(TokenKind::Semi) {}
    }
}
