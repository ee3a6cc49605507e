//! Concrete-style I/O buffers threaded through every state.
//!
//! Stdout keeps the line under construction separate from the completed
//! history (newest first); serialisation strips trailing empty lines the way
//! POSIX command substitution strips trailing newlines.

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stdin {
    lines: Vec<String>,
}

impl Stdin {
    pub fn from_lines(lines: Vec<String>) -> Self {
        Stdin { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Pop the next line, oldest first.
    pub fn read_line(&self) -> Option<(String, Stdin)> {
        let mut lines = self.lines.clone();
        if lines.is_empty() {
            None
        } else {
            let line = lines.remove(0);
            Some((line, Stdin { lines }))
        }
    }

    /// Rewire a stdout into a stdin: the chronological line sequence of the
    /// buffer, current line last.
    pub fn from_stdout(out: &Stdout) -> Self {
        let mut lines: Vec<String> = out.history.iter().rev().cloned().collect();
        lines.push(out.current.clone());
        Stdin { lines }
    }

    pub fn concat(first: &Stdin, second: &Stdin) -> Stdin {
        let mut lines = first.lines.clone();
        lines.extend(second.lines.iter().cloned());
        Stdin { lines }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stdout {
    /// Line under construction.
    current: String,
    /// Completed lines, newest first.
    history: Vec<String>,
}

impl Stdout {
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.history.is_empty()
    }

    /// Append text to the current line.
    pub fn output(&mut self, s: &str) {
        self.current.push_str(s);
    }

    /// Close the current line.
    pub fn newline(&mut self) {
        self.history.insert(0, std::mem::take(&mut self.current));
    }

    /// Serialise chronologically, dropping trailing empty lines.
    pub fn to_text(&self) -> String {
        let mut lines: Vec<&str> = self.history.iter().rev().map(|s| s.as_str()).collect();
        lines.push(&self.current);
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Append `second` after `first`; the first completed line of `second`
    /// closes the current line of `first`.
    pub fn concat(first: &Stdout, second: &Stdout) -> Stdout {
        let mut out = first.clone();
        for line in second.history.iter().rev() {
            out.output(line);
            out.newline();
        }
        out.output(&second.current);
        out
    }
}
