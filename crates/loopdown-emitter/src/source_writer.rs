//! Indentation-aware output buffer used by the printer.

#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    indent_level: u32,
    indent_width: u32,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(indent_width: u32) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width,
            at_line_start: true,
        }
    }

    pub fn with_capacity(indent_width: u32, capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            ..Self::new(indent_width)
        }
    }

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start {
            let width = (self.indent_level * self.indent_width) as usize;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
    }

    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_indent_if_needed();
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.write_indent_if_needed();
        self.output.push(ch);
    }

    pub fn write_space(&mut self) {
        self.write_char(' ');
    }

    /// End the current line. Consecutive calls do not produce blank lines.
    pub fn write_line(&mut self) {
        if !self.at_line_start {
            self.output.push('\n');
            self.at_line_start = true;
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn is_at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        self.at_line_start = true;
        std::mem::take(&mut self.output)
    }
}
