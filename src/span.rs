use std::cmp::{max, min};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn merge(self, other: Span) -> Self {
        Span {
            start: min(self.start, other.start),
            end: max(self.end, other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub msg: String,
    pub span: Span,
    pub sm: Option<SourceMap>,
    pub file: Option<String>,
}

impl Diagnostic {
    pub fn format(&self) -> String {
        match (&self.sm, &self.file) {
            (Some(sm), Some(file)) => sm.format_diagnostic(file, &self.msg, self.span),
            _ => format!("error: {}", self.msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap {
    src: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(src: String) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in src.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        SourceMap { src, line_starts }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let line_idx = self
            .line_starts
            .binary_search(&pos)
            .unwrap_or_else(|x| x - 1);

        let line_start = self.line_starts[line_idx];
        let col = if pos >= line_start {
            self.src[line_start..min(pos, self.src.len())].chars().count() + 1
        } else {
            1
        };
        (line_idx + 1, col)
    }

    pub fn line_snippet(&self, line: usize) -> &str {
        if line < 1 || line > self.line_starts.len() {
            return "";
        }
        let start = self.line_starts[line - 1];
        let end = if line == self.line_starts.len() {
            self.src.len()
        } else {
            self.line_starts[line] - 1
        };
        if start > end {
            return "";
        }
        &self.src[start..end]
    }

    pub fn format_diagnostic(&self, file: &str, msg: &str, span: Span) -> String {
        let (line, col) = self.line_col(span.start);
        let snippet = self.line_snippet(line);

        let mut arrow = " ".repeat(col.saturating_sub(1));
        let line_start = self.line_starts[line - 1];
        let start_clamp = max(line_start, span.start);
        let end_clamp = min(self.src.len(), span.end);
        let len = if end_clamp > start_clamp {
            max(1, self.src[start_clamp..end_clamp].chars().count())
        } else {
            1
        };
        arrow.push('^');
        for _ in 1..len {
            arrow.push('~');
        }

        format!("{}:{}:{}: {}\n{}\n{}", file, line, col, msg, snippet, arrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_positions() {
        let sm = SourceMap::new("ab\ncd\n".to_string());
        assert_eq!(sm.line_col(0), (1, 1));
        assert_eq!(sm.line_col(1), (1, 2));
        assert_eq!(sm.line_col(3), (2, 1));
        assert_eq!(sm.line_col(4), (2, 2));
    }

    #[test]
    fn diagnostic_points_at_span() {
        let sm = SourceMap::new("echo $x\n".to_string());
        let out = sm.format_diagnostic("t.msh", "bad word", Span::new(5, 7));
        assert!(out.starts_with("t.msh:1:6: bad word"));
        assert!(out.contains("     ^~"));
    }
}
