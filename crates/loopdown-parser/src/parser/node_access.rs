//! Typed accessors over [`NodeArena`] and the [`NodeAccess`] trait.
//!
//! Every `get_*` accessor checks the node kind and returns `None` when the
//! node belongs to another pool.

use super::base::NodeIndex;
use super::node::*;
use super::syntax_kind_ext::*;
use loopdown_scanner::SyntaxKind;

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    /// Parent of `index`, or `NONE` for the source file and unknown nodes.
    #[inline]
    pub fn parent_of(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    #[inline]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        if node.has_data() && node.kind == SyntaxKind::Identifier as u16 {
            self.identifiers.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        if node.has_data()
            && (node.kind == SyntaxKind::StringLiteral as u16
                || node.kind == SyntaxKind::NumericLiteral as u16)
        {
            self.literals.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_binary_expr(&self, node: &Node) -> Option<&BinaryExprData> {
        if node.has_data() && node.kind == BINARY_EXPRESSION {
            self.binary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Prefix or postfix unary expression data.
    #[inline]
    pub fn get_unary_expr(&self, node: &Node) -> Option<&UnaryExprData> {
        if node.has_data()
            && (node.kind == PREFIX_UNARY_EXPRESSION || node.kind == POSTFIX_UNARY_EXPRESSION)
        {
            self.unary_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Call or `new` expression data.
    #[inline]
    pub fn get_call_expr(&self, node: &Node) -> Option<&CallExprData> {
        if node.has_data() && (node.kind == CALL_EXPRESSION || node.kind == NEW_EXPRESSION) {
            self.call_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Property access or element access data.
    #[inline]
    pub fn get_access_expr(&self, node: &Node) -> Option<&AccessExprData> {
        if node.has_data()
            && (node.kind == PROPERTY_ACCESS_EXPRESSION || node.kind == ELEMENT_ACCESS_EXPRESSION)
        {
            self.access_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_conditional_expr(&self, node: &Node) -> Option<&ConditionalExprData> {
        if node.has_data() && node.kind == CONDITIONAL_EXPRESSION {
            self.conditional_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Array or object literal data.
    #[inline]
    pub fn get_literal_expr(&self, node: &Node) -> Option<&LiteralExprData> {
        if node.has_data()
            && (node.kind == ARRAY_LITERAL_EXPRESSION || node.kind == OBJECT_LITERAL_EXPRESSION)
        {
            self.literal_exprs.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_property_assignment(&self, node: &Node) -> Option<&PropertyAssignmentData> {
        if node.has_data() && node.kind == PROPERTY_ASSIGNMENT {
            self.property_assignments.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_parenthesized(&self, node: &Node) -> Option<&ParenthesizedData> {
        if node.has_data() && node.kind == PARENTHESIZED_EXPRESSION {
            self.parenthesized.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Function declaration, function expression or arrow function data.
    #[inline]
    pub fn get_function(&self, node: &Node) -> Option<&FunctionData> {
        if node.has_data()
            && matches!(
                node.kind,
                FUNCTION_DECLARATION | FUNCTION_EXPRESSION | ARROW_FUNCTION
            )
        {
            self.functions.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_parameter(&self, node: &Node) -> Option<&ParameterData> {
        if node.has_data() && node.kind == PARAMETER {
            self.parameters.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_block(&self, node: &Node) -> Option<&BlockData> {
        if node.has_data() && node.kind == BLOCK {
            self.blocks.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// Variable statement or declaration list data.
    #[inline]
    pub fn get_variable(&self, node: &Node) -> Option<&VariableData> {
        if node.has_data()
            && (node.kind == VARIABLE_STATEMENT || node.kind == VARIABLE_DECLARATION_LIST)
        {
            self.variables.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_variable_declaration(&self, node: &Node) -> Option<&VariableDeclarationData> {
        if node.has_data() && node.kind == VARIABLE_DECLARATION {
            self.variable_declarations.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_expression_statement(&self, node: &Node) -> Option<&ExprStatementData> {
        if node.has_data() && node.kind == EXPRESSION_STATEMENT {
            self.expr_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// `return` or `throw` statement data.
    #[inline]
    pub fn get_return_statement(&self, node: &Node) -> Option<&ReturnData> {
        if node.has_data() && (node.kind == RETURN_STATEMENT || node.kind == THROW_STATEMENT) {
            self.return_data.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_if_statement(&self, node: &Node) -> Option<&IfStatementData> {
        if node.has_data() && node.kind == IF_STATEMENT {
            self.if_statements.get(node.data_index as usize)
        } else {
            None
        }
    }

    /// `for`, `while` or `do-while` data.
    #[inline]
    pub fn get_loop(&self, node: &Node) -> Option<&LoopData> {
        if node.has_data()
            && matches!(node.kind, FOR_STATEMENT | WHILE_STATEMENT | DO_STATEMENT)
        {
            self.loops.get(node.data_index as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get_source_file(&self, node: &Node) -> Option<&SourceFileData> {
        if node.has_data() && node.kind == SOURCE_FILE {
            self.source_files.get(node.data_index as usize)
        } else {
            None
        }
    }
}

/// Read-only, kind-agnostic view of an AST.
pub trait NodeAccess {
    /// Syntax kind of a node.
    fn kind(&self, index: NodeIndex) -> Option<u16>;

    /// Source range of a node.
    fn pos_end(&self, index: NodeIndex) -> Option<(u32, u32)>;

    fn exists(&self, index: NodeIndex) -> bool {
        index.is_some() && self.kind(index).is_some()
    }

    /// Identifier text (if this is an identifier node).
    fn get_identifier_text(&self, index: NodeIndex) -> Option<&str>;

    /// Cooked literal text (if this is a string or numeric literal).
    fn get_literal_text(&self, index: NodeIndex) -> Option<&str>;

    /// Children of a node in source order.
    fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex>;
}

impl NodeAccess for NodeArena {
    fn kind(&self, index: NodeIndex) -> Option<u16> {
        self.get(index).map(|n| n.kind)
    }

    fn pos_end(&self, index: NodeIndex) -> Option<(u32, u32)> {
        self.get(index).map(|n| (n.pos, n.end))
    }

    fn get_identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node).map(|d| d.escaped_text.as_str())
    }

    fn get_literal_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_literal(node).map(|d| d.text.as_str())
    }

    fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        let mut push = |child: NodeIndex| {
            if child.is_some() {
                children.push(child);
            }
        };

        match node.kind {
            SOURCE_FILE => {
                if let Some(data) = self.get_source_file(node) {
                    data.statements.iter().for_each(&mut push);
                }
            }
            BLOCK => {
                if let Some(data) = self.get_block(node) {
                    data.statements.iter().for_each(&mut push);
                }
            }
            VARIABLE_STATEMENT | VARIABLE_DECLARATION_LIST => {
                if let Some(data) = self.get_variable(node) {
                    data.declarations.iter().for_each(&mut push);
                }
            }
            VARIABLE_DECLARATION => {
                if let Some(data) = self.get_variable_declaration(node) {
                    push(data.name);
                    push(data.initializer);
                }
            }
            FUNCTION_DECLARATION | FUNCTION_EXPRESSION | ARROW_FUNCTION => {
                if let Some(data) = self.get_function(node) {
                    push(data.name);
                    data.parameters.iter().for_each(&mut push);
                    push(data.body);
                }
            }
            PARAMETER => {
                if let Some(data) = self.get_parameter(node) {
                    push(data.name);
                    push(data.initializer);
                }
            }
            EXPRESSION_STATEMENT => {
                if let Some(data) = self.get_expression_statement(node) {
                    push(data.expression);
                }
            }
            RETURN_STATEMENT | THROW_STATEMENT => {
                if let Some(data) = self.get_return_statement(node) {
                    push(data.expression);
                }
            }
            IF_STATEMENT => {
                if let Some(data) = self.get_if_statement(node) {
                    push(data.expression);
                    push(data.then_statement);
                    push(data.else_statement);
                }
            }
            FOR_STATEMENT | WHILE_STATEMENT => {
                if let Some(data) = self.get_loop(node) {
                    push(data.initializer);
                    push(data.condition);
                    push(data.incrementor);
                    push(data.statement);
                }
            }
            DO_STATEMENT => {
                if let Some(data) = self.get_loop(node) {
                    push(data.statement);
                    push(data.condition);
                }
            }
            ARRAY_LITERAL_EXPRESSION | OBJECT_LITERAL_EXPRESSION => {
                if let Some(data) = self.get_literal_expr(node) {
                    data.elements.iter().for_each(&mut push);
                }
            }
            PROPERTY_ASSIGNMENT => {
                if let Some(data) = self.get_property_assignment(node) {
                    push(data.name);
                    push(data.initializer);
                }
            }
            PROPERTY_ACCESS_EXPRESSION | ELEMENT_ACCESS_EXPRESSION => {
                if let Some(data) = self.get_access_expr(node) {
                    push(data.expression);
                    push(data.name_or_argument);
                }
            }
            CALL_EXPRESSION | NEW_EXPRESSION => {
                if let Some(data) = self.get_call_expr(node) {
                    push(data.expression);
                    if let Some(arguments) = &data.arguments {
                        arguments.iter().for_each(&mut push);
                    }
                }
            }
            PARENTHESIZED_EXPRESSION => {
                if let Some(data) = self.get_parenthesized(node) {
                    push(data.expression);
                }
            }
            PREFIX_UNARY_EXPRESSION | POSTFIX_UNARY_EXPRESSION => {
                if let Some(data) = self.get_unary_expr(node) {
                    push(data.operand);
                }
            }
            BINARY_EXPRESSION => {
                if let Some(data) = self.get_binary_expr(node) {
                    push(data.left);
                    push(data.right);
                }
            }
            CONDITIONAL_EXPRESSION => {
                if let Some(data) = self.get_conditional_expr(node) {
                    push(data.condition);
                    push(data.when_true);
                    push(data.when_false);
                }
            }
            _ => {}
        }

        children
    }
}
