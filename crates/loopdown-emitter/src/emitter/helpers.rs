use super::Printer;
use loopdown_parser::parser::NodeIndex;

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    pub(crate) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(crate) fn write_char(&mut self, ch: char) {
        self.writer.write_char(ch);
    }

    pub(crate) fn write_space(&mut self) {
        self.writer.write_space();
    }

    pub(crate) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(crate) fn write_semicolon(&mut self) {
        self.writer.write_char(';');
    }

    pub(crate) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(crate) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    /// Emit `items` separated by `, `.
    pub(crate) fn emit_comma_list(&mut self, items: &[NodeIndex], mut emit: impl FnMut(&mut Self, NodeIndex)) {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            emit(self, item);
        }
    }
}

/// Double-quoted JavaScript string literal for `value`.
pub(crate) fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::escape_string;

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "\"plain\"");
        assert_eq!(escape_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(escape_string("\u{1}"), "\"\\x01\"");
    }
}
