//! Line-oriented text buffer with an indentation level.

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct CodeBuffer {
    code: String,
    indent: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation. Empty lines carry no
    /// trailing whitespace.
    pub fn push_line(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.code.push_str(INDENT);
            }
            self.code.push_str(line);
        }
        self.code.push('\n');
    }

    pub fn push_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push_line(line);
        }
    }

    pub fn blank_line(&mut self) {
        self.code.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn with_indent(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent();
        body(self);
        self.dedent();
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn finish(self) -> String {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_indentation() {
        let mut buf = CodeBuffer::new();
        buf.push_line("if x:");
        buf.with_indent(|buf| {
            buf.push_line("y = 1");
            buf.blank_line();
            buf.push_line("");
        });
        buf.dedent();
        buf.push_line("z");
        assert_eq!(buf.finish(), "if x:\n    y = 1\n\n\nz\n");
    }
}
