//! Node kinds that have no token counterpart.
//!
//! Token-shaped nodes (identifiers, literals, `this`, `true`, ...) reuse their
//! scanner [`SyntaxKind`](loopdown_scanner::SyntaxKind) value. Everything
//! else is numbered from 200 so the two ranges never overlap.

pub const SOURCE_FILE: u16 = 200;

// Statements
pub const BLOCK: u16 = 201;
pub const VARIABLE_STATEMENT: u16 = 202;
pub const VARIABLE_DECLARATION_LIST: u16 = 203;
pub const VARIABLE_DECLARATION: u16 = 204;
pub const FUNCTION_DECLARATION: u16 = 205;
pub const EXPRESSION_STATEMENT: u16 = 206;
pub const RETURN_STATEMENT: u16 = 207;
pub const THROW_STATEMENT: u16 = 208;
pub const IF_STATEMENT: u16 = 209;
pub const FOR_STATEMENT: u16 = 210;
pub const WHILE_STATEMENT: u16 = 211;
pub const DO_STATEMENT: u16 = 212;
pub const BREAK_STATEMENT: u16 = 213;
pub const CONTINUE_STATEMENT: u16 = 214;
pub const EMPTY_STATEMENT: u16 = 215;

// Functions
pub const FUNCTION_EXPRESSION: u16 = 230;
pub const ARROW_FUNCTION: u16 = 231;
pub const PARAMETER: u16 = 232;

// Expressions
pub const ARRAY_LITERAL_EXPRESSION: u16 = 250;
pub const OBJECT_LITERAL_EXPRESSION: u16 = 251;
pub const PROPERTY_ASSIGNMENT: u16 = 252;
pub const PROPERTY_ACCESS_EXPRESSION: u16 = 253;
pub const ELEMENT_ACCESS_EXPRESSION: u16 = 254;
pub const CALL_EXPRESSION: u16 = 255;
pub const NEW_EXPRESSION: u16 = 256;
pub const PARENTHESIZED_EXPRESSION: u16 = 257;
pub const PREFIX_UNARY_EXPRESSION: u16 = 258;
pub const POSTFIX_UNARY_EXPRESSION: u16 = 259;
pub const BINARY_EXPRESSION: u16 = 260;
pub const CONDITIONAL_EXPRESSION: u16 = 261;

/// Whether `kind` is a statement kind.
pub fn is_statement(kind: u16) -> bool {
    (BLOCK..=EMPTY_STATEMENT).contains(&kind)
        && kind != VARIABLE_DECLARATION_LIST
        && kind != VARIABLE_DECLARATION
}

/// Debug name for a node kind.
pub fn kind_name(kind: u16) -> &'static str {
    match kind {
        SOURCE_FILE => "SourceFile",
        BLOCK => "Block",
        VARIABLE_STATEMENT => "VariableStatement",
        VARIABLE_DECLARATION_LIST => "VariableDeclarationList",
        VARIABLE_DECLARATION => "VariableDeclaration",
        FUNCTION_DECLARATION => "FunctionDeclaration",
        EXPRESSION_STATEMENT => "ExpressionStatement",
        RETURN_STATEMENT => "ReturnStatement",
        THROW_STATEMENT => "ThrowStatement",
        IF_STATEMENT => "IfStatement",
        FOR_STATEMENT => "ForStatement",
        WHILE_STATEMENT => "WhileStatement",
        DO_STATEMENT => "DoStatement",
        BREAK_STATEMENT => "BreakStatement",
        CONTINUE_STATEMENT => "ContinueStatement",
        EMPTY_STATEMENT => "EmptyStatement",
        FUNCTION_EXPRESSION => "FunctionExpression",
        ARROW_FUNCTION => "ArrowFunction",
        PARAMETER => "Parameter",
        ARRAY_LITERAL_EXPRESSION => "ArrayLiteralExpression",
        OBJECT_LITERAL_EXPRESSION => "ObjectLiteralExpression",
        PROPERTY_ASSIGNMENT => "PropertyAssignment",
        PROPERTY_ACCESS_EXPRESSION => "PropertyAccessExpression",
        ELEMENT_ACCESS_EXPRESSION => "ElementAccessExpression",
        CALL_EXPRESSION => "CallExpression",
        NEW_EXPRESSION => "NewExpression",
        PARENTHESIZED_EXPRESSION => "ParenthesizedExpression",
        PREFIX_UNARY_EXPRESSION => "PrefixUnaryExpression",
        POSTFIX_UNARY_EXPRESSION => "PostfixUnaryExpression",
        BINARY_EXPRESSION => "BinaryExpression",
        CONDITIONAL_EXPRESSION => "ConditionalExpression",
        _ => "Token",
    }
}
