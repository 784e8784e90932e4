//! Thin node architecture for the AST.
//!
//! Each node is a 16-byte header ([`Node`]) holding its kind, flags, source
//! range and an index into a typed data pool. The pool is chosen by `kind`;
//! token-shaped nodes (`this`, `true`, `break`, ...) carry no data.
//!
//! Parent links live in a parallel `extended_info` vector and are filled in
//! bottom-up by the `add_*` constructors in `node_arena.rs`.

use super::base::{NodeIndex, NodeList};
use std::sync::Arc;

pub use super::node_access::NodeAccess;

/// A thin node header.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// Scanner `SyntaxKind` value or a `syntax_kind_ext` constant.
    pub kind: u16,
    /// Packed [`NodeFlags`](super::NodeFlags).
    pub flags: u16,
    pub pos: u32,
    pub end: u32,
    /// Index into the kind's data pool (`u32::MAX` = no data).
    pub data_index: u32,
}

impl Node {
    pub const NO_DATA: u32 = u32::MAX;

    #[inline]
    pub fn new(kind: u16, pos: u32, end: u32) -> Node {
        Node::with_data(kind, pos, end, Self::NO_DATA)
    }

    #[inline]
    pub fn with_data(kind: u16, pos: u32, end: u32, data_index: u32) -> Node {
        Node {
            kind,
            flags: 0,
            pos,
            end,
            data_index,
        }
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data_index != Self::NO_DATA
    }
}

/// Per-node information that is not needed on hot paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

// =============================================================================
// Typed Data Pools
// =============================================================================

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String and numeric literals.
#[derive(Clone, Debug)]
pub struct LiteralData {
    /// Cooked string value, or the numeric literal's source text.
    pub text: String,
    /// Source text including quotes.
    pub raw_text: String,
    /// Numeric value for numeric literals.
    pub value: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: u16,
    pub right: NodeIndex,
}

/// Prefix and postfix unary expressions.
#[derive(Clone, Debug)]
pub struct UnaryExprData {
    pub operator: u16,
    pub operand: NodeIndex,
}

/// Call and `new` expressions. `new Foo` without parentheses has no
/// argument list.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: Option<NodeList>,
}

/// Property (`a.b`) and element (`a[b]`) access.
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// Array and object literal elements.
#[derive(Clone, Debug)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParenthesizedData {
    pub expression: NodeIndex,
}

/// Function declarations, function expressions and arrow functions.
///
/// For an arrow function with an expression body, `body` is the expression
/// and the node carries `NodeFlags::EXPRESSION_BODY`.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: NodeList,
}

/// Variable statements (one declaration list) and declaration lists.
#[derive(Clone, Debug)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

/// `return` and `throw`.
#[derive(Clone, Debug)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `for`, `while` and `do-while`. Loops without a clause leave it `NONE`.
#[derive(Clone, Debug)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFileData {
    pub file_name: String,
    pub text: Arc<str>,
    pub statements: NodeList,
}

/// Arena holding every node of one parsed file.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,

    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,

    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub call_exprs: Vec<CallExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub parenthesized: Vec<ParenthesizedData>,

    pub functions: Vec<FunctionData>,
    pub parameters: Vec<ParameterData>,

    pub blocks: Vec<BlockData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub expr_statements: Vec<ExprStatementData>,
    pub return_data: Vec<ReturnData>,
    pub if_statements: Vec<IfStatementData>,
    pub loops: Vec<LoopData>,
    pub source_files: Vec<SourceFileData>,
}
