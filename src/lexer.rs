use crate::span::{Diagnostic, SourceMap, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum QuotedPart {
    Text(String),
    Var(String),
    Arg(usize),
    /// `$?` inside a quoted word.
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unquoted run of word characters.
    Bare(String),
    /// Double-quoted word; expansion happens at evaluation time.
    Quoted(Vec<QuotedPart>),
    VarRef(String),
    ArgRef(usize),
    /// `$?` outside quotes.
    StatusRef,
    /// `$(` opening a command substitution.
    DollarLParen,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Pipe,
    /// `;` or newline.
    Semi,
    /// `:=`
    Assign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

// `!` is deliberately a word character: like the shell, negation is a
// reserved word recognised by the parser in command position, so `!=` stays
// inside words.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ';' | '|' | '(' | ')' | '{' | '}' | '"' | '#' | '$')
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    pos: usize,
    sm: &'a SourceMap,
    file: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(sm: &'a SourceMap, file: &'a str) -> Self {
        Lexer {
            chars: sm.src().chars().peekable(),
            pos: 0,
            sm,
            file,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.pos += ch.len_utf8();
        }
        c
    }

    fn error<T>(&self, msg: &str, start: usize) -> Result<T, Diagnostic> {
        Err(Diagnostic {
            msg: msg.to_string(),
            span: Span::new(start, self.pos.max(start + 1)),
            sm: Some(self.sm.clone()),
            file: Some(self.file.to_string()),
        })
    }

    /// Lex the `$`-form that starts at `start` (the `$` is already consumed).
    /// Shared between quoted and unquoted contexts; command substitution is
    /// only legal unquoted, so the caller handles `(` itself.
    fn dollar_form(&mut self, start: usize) -> Result<DollarForm, Diagnostic> {
        match self.peek() {
            Some('?') => {
                self.next();
                Ok(DollarForm::Status)
            }
            Some(&c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&c) = self.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    digits.push(c);
                    self.next();
                }
                match digits.parse::<usize>() {
                    Ok(n) => Ok(DollarForm::Arg(n)),
                    Err(_) => self.error("positional argument index out of range", start),
                }
            }
            Some(&c) if is_ident_start(c) => {
                let mut ident = String::new();
                while let Some(&c) = self.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    ident.push(c);
                    self.next();
                }
                Ok(DollarForm::Var(ident))
            }
            _ => self.error("expected variable name, argument index, `?` or `(` after `$`", start),
        }
    }

    fn quoted(&mut self, start: usize) -> Result<Vec<QuotedPart>, Diagnostic> {
        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return self.error("unterminated string", start),
                Some('"') => {
                    self.next();
                    break;
                }
                Some('\\') => {
                    self.next();
                    match self.next() {
                        Some(c) => text.push(c),
                        None => return self.error("unterminated string", start),
                    }
                }
                Some('$') => {
                    let dollar_start = self.pos;
                    self.next();
                    if self.peek() == Some(&'(') {
                        return self.error(
                            "command substitution is not allowed inside a quoted word",
                            dollar_start,
                        );
                    }
                    if !text.is_empty() {
                        parts.push(QuotedPart::Text(std::mem::take(&mut text)));
                    }
                    match self.dollar_form(dollar_start)? {
                        DollarForm::Status => parts.push(QuotedPart::Status),
                        DollarForm::Arg(n) => parts.push(QuotedPart::Arg(n)),
                        DollarForm::Var(v) => parts.push(QuotedPart::Var(v)),
                    }
                }
                Some(_) => {
                    text.push(self.next().unwrap());
                }
            }
        }
        if !text.is_empty() {
            parts.push(QuotedPart::Text(text));
        }
        Ok(parts)
    }
}

enum DollarForm {
    Var(String),
    Arg(usize),
    Status,
}

pub fn lex(sm: &SourceMap, file: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut lexer = Lexer::new(sm, file);

    while let Some(&c) = lexer.peek() {
        let start = lexer.pos;
        match c {
            ' ' | '\t' | '\r' => {
                lexer.next();
            }
            '\n' => {
                lexer.next();
                tokens.push(Token { kind: TokenKind::Semi, span: Span::new(start, lexer.pos) });
            }
            '#' => {
                while let Some(&c) = lexer.peek() {
                    if c == '\n' {
                        break;
                    }
                    lexer.next();
                }
            }
            ';' => { lexer.next(); tokens.push(Token { kind: TokenKind::Semi, span: Span::new(start, lexer.pos) }); }
            '|' => { lexer.next(); tokens.push(Token { kind: TokenKind::Pipe, span: Span::new(start, lexer.pos) }); }
            '(' => { lexer.next(); tokens.push(Token { kind: TokenKind::LParen, span: Span::new(start, lexer.pos) }); }
            ')' => { lexer.next(); tokens.push(Token { kind: TokenKind::RParen, span: Span::new(start, lexer.pos) }); }
            '{' => { lexer.next(); tokens.push(Token { kind: TokenKind::LBrace, span: Span::new(start, lexer.pos) }); }
            '}' => { lexer.next(); tokens.push(Token { kind: TokenKind::RBrace, span: Span::new(start, lexer.pos) }); }
            '"' => {
                lexer.next();
                let parts = lexer.quoted(start)?;
                tokens.push(Token { kind: TokenKind::Quoted(parts), span: Span::new(start, lexer.pos) });
            }
            '$' => {
                lexer.next();
                if lexer.peek() == Some(&'(') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::DollarLParen, span: Span::new(start, lexer.pos) });
                } else {
                    let kind = match lexer.dollar_form(start)? {
                        DollarForm::Status => TokenKind::StatusRef,
                        DollarForm::Arg(n) => TokenKind::ArgRef(n),
                        DollarForm::Var(v) => TokenKind::VarRef(v),
                    };
                    tokens.push(Token { kind, span: Span::new(start, lexer.pos) });
                }
            }
            ':' => {
                lexer.next();
                if lexer.peek() == Some(&'=') {
                    lexer.next();
                    tokens.push(Token { kind: TokenKind::Assign, span: Span::new(start, lexer.pos) });
                } else {
                    // Bare word starting with `:` (the colon utility).
                    let mut word = String::from(":");
                    while let Some(&c) = lexer.peek() {
                        if !is_word_char(c) {
                            break;
                        }
                        word.push(c);
                        lexer.next();
                    }
                    tokens.push(Token { kind: TokenKind::Bare(word), span: Span::new(start, lexer.pos) });
                }
            }
            _ if is_word_char(c) => {
                let mut word = String::new();
                while let Some(&c) = lexer.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    lexer.next();
                }
                tokens.push(Token { kind: TokenKind::Bare(word), span: Span::new(start, lexer.pos) });
            }
            _ => {
                lexer.next();
                return lexer.error(&format!("unexpected character `{}`", c), start);
            }
        }
    }

    Ok(tokens)
}
