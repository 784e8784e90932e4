//! Lowered IR (Intermediate Representation) for transforms
//!
//! Transforms build IR trees instead of strings; the printer walks them and
//! emits JavaScript. Original subtrees are carried over with
//! [`IRNode::ASTRef`], which the printer emits from the AST (applying any
//! directives recorded for that subtree).

use loopdown_parser::parser::NodeIndex;

#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal: `42`
    NumericLiteral(String),

    /// String literal, printed with double quotes.
    StringLiteral(String),

    BooleanLiteral(bool),

    /// `void 0`
    Undefined,

    Identifier(String),

    // =========================================================================
    // Expressions
    // =========================================================================
    BinaryExpr {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// `!x`, `-x`, `++x`
    PrefixUnaryExpr {
        operator: String,
        operand: Box<Self>,
    },

    /// `x++`, `x--`
    PostfixUnaryExpr {
        operand: Box<Self>,
        operator: String,
    },

    CallExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    NewExpr {
        callee: Box<Self>,
        arguments: Vec<Self>,
    },

    PropertyAccess {
        object: Box<Self>,
        property: String,
    },

    ElementAccess {
        object: Box<Self>,
        index: Box<Self>,
    },

    ArrayLiteral(Vec<Self>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// `var name = initializer;`
    VarDecl {
        name: String,
        initializer: Option<Box<Self>>,
    },

    ExpressionStatement(Box<Self>),

    IfStatement {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    Block(Vec<Self>),

    ForStatement {
        initializer: Option<Box<Self>>,
        condition: Option<Box<Self>>,
        incrementor: Option<Box<Self>>,
        body: Box<Self>,
    },

    ThrowStatement(Box<Self>),

    BreakStatement,

    // =========================================================================
    // Special
    // =========================================================================
    /// Reference to an original AST node (passthrough).
    ASTRef(NodeIndex),
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IRNode {
    pub fn id(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    pub fn number(n: impl Into<String>) -> Self {
        Self::NumericLiteral(n.into())
    }

    pub const fn bool(value: bool) -> Self {
        Self::BooleanLiteral(value)
    }

    /// `void 0`
    pub const fn void_0() -> Self {
        Self::Undefined
    }

    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::CallExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    pub fn new_expr(callee: Self, args: Vec<Self>) -> Self {
        Self::NewExpr {
            callee: Box::new(callee),
            arguments: args,
        }
    }

    pub fn prop(object: Self, property: impl Into<String>) -> Self {
        Self::PropertyAccess {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn elem(object: Self, index: Self) -> Self {
        Self::ElementAccess {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    pub fn assign(target: Self, value: Self) -> Self {
        Self::binary(target, "=", value)
    }

    /// `!operand`
    pub fn not(operand: Self) -> Self {
        Self::PrefixUnaryExpr {
            operator: "!".to_string(),
            operand: Box::new(operand),
        }
    }

    /// `operand++`
    pub fn post_increment(operand: Self) -> Self {
        Self::PostfixUnaryExpr {
            operand: Box::new(operand),
            operator: "++".to_string(),
        }
    }

    pub const fn empty_array() -> Self {
        Self::ArrayLiteral(Vec::new())
    }

    pub fn var_decl(name: impl Into<String>, init: Option<Self>) -> Self {
        Self::VarDecl {
            name: name.into(),
            initializer: init.map(Box::new),
        }
    }

    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    pub const fn block(stmts: Vec<Self>) -> Self {
        Self::Block(stmts)
    }

    /// `if (condition) { then }`
    pub fn if_then(condition: Self, then_stmts: Vec<Self>) -> Self {
        Self::IfStatement {
            condition: Box::new(condition),
            then_branch: Box::new(Self::Block(then_stmts)),
            else_branch: None,
        }
    }

    pub fn throw(expr: Self) -> Self {
        Self::ThrowStatement(Box::new(expr))
    }

    /// Whether this node is a statement (as opposed to an expression).
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::VarDecl { .. }
                | Self::ExpressionStatement(_)
                | Self::IfStatement { .. }
                | Self::Block(_)
                | Self::ForStatement { .. }
                | Self::ThrowStatement(_)
                | Self::BreakStatement
        )
    }
}
