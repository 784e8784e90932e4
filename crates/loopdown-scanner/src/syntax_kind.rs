//! Token kinds produced by the scanner.
//!
//! Node kinds that have no token counterpart live in the parser's
//! `syntax_kind_ext` module and start above [`SyntaxKind::LAST_TOKEN`].

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,

    // Literals and names
    NumericLiteral,
    StringLiteral,
    Identifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    SemicolonToken,
    CommaToken,
    QuestionToken,
    ColonToken,
    EqualsGreaterThanToken,

    // Relational and equality
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,

    // Arithmetic
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,

    // Bitwise and logical
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionQuestionToken,

    // Assignment
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,

    // Keywords
    BreakKeyword,
    ConstKeyword,
    ContinueKeyword,
    DoKeyword,
    ElseKeyword,
    FalseKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    InKeyword,
    InstanceOfKeyword,
    LetKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::WhileKeyword;
    pub const LAST_TOKEN: SyntaxKind = SyntaxKind::WhileKeyword;

    pub fn is_keyword(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_KEYWORD
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqualsToken
                | SyntaxKind::PlusEqualsToken
                | SyntaxKind::MinusEqualsToken
                | SyntaxKind::AsteriskEqualsToken
                | SyntaxKind::SlashEqualsToken
                | SyntaxKind::PercentEqualsToken
        )
    }

    /// Short-circuiting binary operators whose right operand may never run.
    pub fn is_logical_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::AmpersandAmpersandToken
                | SyntaxKind::BarBarToken
                | SyntaxKind::QuestionQuestionToken
        )
    }

    /// Convert a raw `u16` kind back into a token kind.
    pub fn try_from_u16(value: u16) -> Option<SyntaxKind> {
        TOKEN_TABLE.get(value as usize).copied()
    }
}

static TOKEN_TABLE: Lazy<Vec<SyntaxKind>> = Lazy::new(|| {
    use SyntaxKind::*;
    vec![
        Unknown,
        EndOfFileToken,
        NumericLiteral,
        StringLiteral,
        Identifier,
        OpenBraceToken,
        CloseBraceToken,
        OpenParenToken,
        CloseParenToken,
        OpenBracketToken,
        CloseBracketToken,
        DotToken,
        SemicolonToken,
        CommaToken,
        QuestionToken,
        ColonToken,
        EqualsGreaterThanToken,
        LessThanToken,
        GreaterThanToken,
        LessThanEqualsToken,
        GreaterThanEqualsToken,
        EqualsEqualsToken,
        ExclamationEqualsToken,
        EqualsEqualsEqualsToken,
        ExclamationEqualsEqualsToken,
        PlusToken,
        MinusToken,
        AsteriskToken,
        AsteriskAsteriskToken,
        SlashToken,
        PercentToken,
        PlusPlusToken,
        MinusMinusToken,
        LessThanLessThanToken,
        GreaterThanGreaterThanToken,
        GreaterThanGreaterThanGreaterThanToken,
        AmpersandToken,
        BarToken,
        CaretToken,
        ExclamationToken,
        TildeToken,
        AmpersandAmpersandToken,
        BarBarToken,
        QuestionQuestionToken,
        EqualsToken,
        PlusEqualsToken,
        MinusEqualsToken,
        AsteriskEqualsToken,
        SlashEqualsToken,
        PercentEqualsToken,
        BreakKeyword,
        ConstKeyword,
        ContinueKeyword,
        DoKeyword,
        ElseKeyword,
        FalseKeyword,
        ForKeyword,
        FunctionKeyword,
        IfKeyword,
        InKeyword,
        InstanceOfKeyword,
        LetKeyword,
        NewKeyword,
        NullKeyword,
        ReturnKeyword,
        ThisKeyword,
        ThrowKeyword,
        TrueKeyword,
        TypeOfKeyword,
        VarKeyword,
        VoidKeyword,
        WhileKeyword,
    ]
});

static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    use SyntaxKind::*;
    [
        ("break", BreakKeyword),
        ("const", ConstKeyword),
        ("continue", ContinueKeyword),
        ("do", DoKeyword),
        ("else", ElseKeyword),
        ("false", FalseKeyword),
        ("for", ForKeyword),
        ("function", FunctionKeyword),
        ("if", IfKeyword),
        ("in", InKeyword),
        ("instanceof", InstanceOfKeyword),
        ("let", LetKeyword),
        ("new", NewKeyword),
        ("null", NullKeyword),
        ("return", ReturnKeyword),
        ("this", ThisKeyword),
        ("throw", ThrowKeyword),
        ("true", TrueKeyword),
        ("typeof", TypeOfKeyword),
        ("var", VarKeyword),
        ("void", VoidKeyword),
        ("while", WhileKeyword),
    ]
    .into_iter()
    .collect()
});

/// Look up the keyword kind for an identifier-shaped word.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(text).copied()
}

/// Source text of a punctuation or keyword token.
pub fn token_to_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        OpenBraceToken => "{",
        CloseBraceToken => "}",
        OpenParenToken => "(",
        CloseParenToken => ")",
        OpenBracketToken => "[",
        CloseBracketToken => "]",
        DotToken => ".",
        SemicolonToken => ";",
        CommaToken => ",",
        QuestionToken => "?",
        ColonToken => ":",
        EqualsGreaterThanToken => "=>",
        LessThanToken => "<",
        GreaterThanToken => ">",
        LessThanEqualsToken => "<=",
        GreaterThanEqualsToken => ">=",
        EqualsEqualsToken => "==",
        ExclamationEqualsToken => "!=",
        EqualsEqualsEqualsToken => "===",
        ExclamationEqualsEqualsToken => "!==",
        PlusToken => "+",
        MinusToken => "-",
        AsteriskToken => "*",
        AsteriskAsteriskToken => "**",
        SlashToken => "/",
        PercentToken => "%",
        PlusPlusToken => "++",
        MinusMinusToken => "--",
        LessThanLessThanToken => "<<",
        GreaterThanGreaterThanToken => ">>",
        GreaterThanGreaterThanGreaterThanToken => ">>>",
        AmpersandToken => "&",
        BarToken => "|",
        CaretToken => "^",
        ExclamationToken => "!",
        TildeToken => "~",
        AmpersandAmpersandToken => "&&",
        BarBarToken => "||",
        QuestionQuestionToken => "??",
        EqualsToken => "=",
        PlusEqualsToken => "+=",
        MinusEqualsToken => "-=",
        AsteriskEqualsToken => "*=",
        SlashEqualsToken => "/=",
        PercentEqualsToken => "%=",
        BreakKeyword => "break",
        ConstKeyword => "const",
        ContinueKeyword => "continue",
        DoKeyword => "do",
        ElseKeyword => "else",
        FalseKeyword => "false",
        ForKeyword => "for",
        FunctionKeyword => "function",
        IfKeyword => "if",
        InKeyword => "in",
        InstanceOfKeyword => "instanceof",
        LetKeyword => "let",
        NewKeyword => "new",
        NullKeyword => "null",
        ReturnKeyword => "return",
        ThisKeyword => "this",
        ThrowKeyword => "throw",
        TrueKeyword => "true",
        TypeOfKeyword => "typeof",
        VarKeyword => "var",
        VoidKeyword => "void",
        WhileKeyword => "while",
        Unknown | EndOfFileToken | NumericLiteral | StringLiteral | Identifier => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table_is_dense() {
        for (i, kind) in TOKEN_TABLE.iter().enumerate() {
            assert_eq!(*kind as usize, i, "{kind:?} out of place");
        }
        assert_eq!(TOKEN_TABLE.len(), SyntaxKind::LAST_TOKEN as usize + 1);
    }

    #[test]
    fn test_keyword_round_trip() {
        for (&text, &kind) in KEYWORDS.iter() {
            assert!(kind.is_keyword());
            assert_eq!(token_to_text(kind), text);
        }
        assert_eq!(text_to_keyword("forEach"), None);
    }
}
