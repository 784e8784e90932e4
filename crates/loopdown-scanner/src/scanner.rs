//! Scanner state machine.
//!
//! Produces one token per `scan()` call. The parser drives it and uses
//! `save_state`/`restore_state` for arrow-function look-ahead.

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use loopdown_common::diagnostic_codes;
use std::sync::Arc;

/// A lexical error found while scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
    pub code: u32,
}

/// Everything needed to rewind the scanner to a previous token.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    diagnostics_len: usize,
}

pub struct ScannerState {
    text: Arc<str>,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    preceding_line_break: bool,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Identifier name, cooked string value or raw numeric text.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn get_scanner_diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&mut self, pos: usize, length: usize, message: &'static str, code: u32) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message,
            code,
        });
    }

    /// Skip whitespace and comments, recording whether a line break was seen.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_line_break(ch) {
                self.preceding_line_break = true;
                self.bump();
            } else if is_white_space_single_line(ch) {
                self.bump();
            } else if ch == '/' && self.peek_char_at(1) == Some('/') {
                while let Some(c) = self.peek_char() {
                    if is_line_break(c) {
                        break;
                    }
                    self.bump();
                }
            } else if ch == '/' && self.peek_char_at(1) == Some('*') {
                let start = self.pos;
                self.pos += 2;
                let mut closed = false;
                while let Some(c) = self.bump() {
                    if is_line_break(c) {
                        self.preceding_line_break = true;
                    } else if c == '*' && self.peek_char() == Some('/') {
                        self.bump();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    self.error(start, self.pos - start, "'*/' expected.", diagnostic_codes::TOKEN_EXPECTED);
                }
            } else {
                break;
            }
        }
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value.clear();

        let Some(ch) = self.peek_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(),
            '.' if self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => self.scan_punctuation(ch),
        };
        self.token
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        while self.peek_char().is_some_and(is_identifier_part) {
            self.bump();
        }
        let text = &self.text[self.token_start..self.pos];
        self.token_value.push_str(text);
        text_to_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        if self.peek_char() == Some('0')
            && matches!(self.peek_char_at(1), Some('x' | 'X'))
        {
            self.pos += 2;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
        } else {
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            if self.peek_char() == Some('.') {
                self.bump();
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                let save = self.pos;
                self.bump();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.bump();
                }
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                } else {
                    self.pos = save;
                }
            }
        }
        let text = &self.text[self.token_start..self.pos];
        self.token_value.push_str(text);
        SyntaxKind::NumericLiteral
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.bump();
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                self.error(
                    self.token_start,
                    self.pos - self.token_start,
                    "Unterminated string literal.",
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                );
                break;
            };
            if ch == quote {
                self.bump();
                break;
            }
            if is_line_break(ch) {
                self.error(
                    self.token_start,
                    self.pos - self.token_start,
                    "Unterminated string literal.",
                    diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                );
                break;
            }
            self.bump();
            if ch == '\\' {
                self.scan_escape(&mut value);
            } else {
                value.push(ch);
            }
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self, value: &mut String) {
        let Some(ch) = self.bump() else {
            return;
        };
        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' => value.push('\0'),
            'u' => {
                let start = self.pos;
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 4 {
                    match self.peek_char().and_then(|c| c.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            self.bump();
                            digits += 1;
                        }
                        None => break,
                    }
                }
                match char::from_u32(code).filter(|_| digits == 4) {
                    Some(c) => value.push(c),
                    None => {
                        self.error(start, self.pos - start, "Hexadecimal digit expected.", diagnostic_codes::INVALID_CHARACTER);
                    }
                }
            }
            // Line continuation
            c if is_line_break(c) => {}
            c => value.push(c),
        }
    }

    fn scan_punctuation(&mut self, ch: char) -> SyntaxKind {
        use SyntaxKind::*;
        self.bump();
        let next = self.peek_char();
        let (kind, extra) = match (ch, next) {
            ('{', _) => (OpenBraceToken, 0),
            ('}', _) => (CloseBraceToken, 0),
            ('(', _) => (OpenParenToken, 0),
            (')', _) => (CloseParenToken, 0),
            ('[', _) => (OpenBracketToken, 0),
            (']', _) => (CloseBracketToken, 0),
            ('.', _) => (DotToken, 0),
            (';', _) => (SemicolonToken, 0),
            (',', _) => (CommaToken, 0),
            (':', _) => (ColonToken, 0),
            ('~', _) => (TildeToken, 0),
            ('^', _) => (CaretToken, 0),
            ('?', Some('?')) => (QuestionQuestionToken, 1),
            ('?', _) => (QuestionToken, 0),
            ('=', Some('>')) => (EqualsGreaterThanToken, 1),
            ('=', Some('=')) => {
                if self.peek_char_at(1) == Some('=') {
                    (EqualsEqualsEqualsToken, 2)
                } else {
                    (EqualsEqualsToken, 1)
                }
            }
            ('=', _) => (EqualsToken, 0),
            ('!', Some('=')) => {
                if self.peek_char_at(1) == Some('=') {
                    (ExclamationEqualsEqualsToken, 2)
                } else {
                    (ExclamationEqualsToken, 1)
                }
            }
            ('!', _) => (ExclamationToken, 0),
            ('+', Some('+')) => (PlusPlusToken, 1),
            ('+', Some('=')) => (PlusEqualsToken, 1),
            ('+', _) => (PlusToken, 0),
            ('-', Some('-')) => (MinusMinusToken, 1),
            ('-', Some('=')) => (MinusEqualsToken, 1),
            ('-', _) => (MinusToken, 0),
            ('*', Some('*')) => (AsteriskAsteriskToken, 1),
            ('*', Some('=')) => (AsteriskEqualsToken, 1),
            ('*', _) => (AsteriskToken, 0),
            ('/', Some('=')) => (SlashEqualsToken, 1),
            ('/', _) => (SlashToken, 0),
            ('%', Some('=')) => (PercentEqualsToken, 1),
            ('%', _) => (PercentToken, 0),
            ('<', Some('<')) => (LessThanLessThanToken, 1),
            ('<', Some('=')) => (LessThanEqualsToken, 1),
            ('<', _) => (LessThanToken, 0),
            ('>', Some('>')) => {
                if self.peek_char_at(1) == Some('>') {
                    (GreaterThanGreaterThanGreaterThanToken, 2)
                } else {
                    (GreaterThanGreaterThanToken, 1)
                }
            }
            ('>', Some('=')) => (GreaterThanEqualsToken, 1),
            ('>', _) => (GreaterThanToken, 0),
            ('&', Some('&')) => (AmpersandAmpersandToken, 1),
            ('&', _) => (AmpersandToken, 0),
            ('|', Some('|')) => (BarBarToken, 1),
            ('|', _) => (BarToken, 0),
            _ => {
                self.error(
                    self.token_start,
                    ch.len_utf8(),
                    "Invalid character.",
                    diagnostic_codes::INVALID_CHARACTER,
                );
                (Unknown, 0)
            }
        };
        for _ in 0..extra {
            self.bump();
        }
        kind
    }
}
