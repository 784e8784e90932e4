//! Line/column positions for byte offsets.

use serde::Serialize;

/// A zero-based line/character position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Start offsets of every line in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build the line map with a single `memchr` pass over the text.
    pub fn build(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i as u32 + 1));
        Self { line_starts }
    }

    /// Convert a byte offset into a line/character position.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
