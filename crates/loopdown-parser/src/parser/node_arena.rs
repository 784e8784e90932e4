//! Node creation for [`NodeArena`].
//!
//! Nodes are built bottom-up: children exist before their parent, so each
//! `add_*` constructor links the children it receives to the new node.

use super::base::{NodeIndex, NodeList};
use super::flags::NodeFlags;
use super::node::*;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with capacity sized for `text_len` bytes of source.
    pub fn with_capacity_for_source(text_len: usize) -> NodeArena {
        let estimated = text_len / 6 + 16;
        let mut arena = NodeArena::default();
        arena.nodes.reserve(estimated);
        arena.extended_info.reserve(estimated);
        arena.identifiers.reserve(estimated / 3);
        arena
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    fn push_node(&mut self, kind: u16, pos: u32, end: u32, data_index: u32) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node::with_data(kind, pos, end, data_index));
        self.extended_info.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some()
            && let Some(info) = self.extended_info.get_mut(child.0 as usize)
        {
            info.parent = parent;
        }
    }

    #[inline]
    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    /// Set the flags of an existing node.
    pub fn set_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags = flags.bits();
        }
    }

    /// Add `flags` to an existing node.
    pub fn add_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags |= flags.bits();
        }
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Add a token node (no additional data).
    pub fn add_token(&mut self, kind: u16, pos: u32, end: u32) -> NodeIndex {
        self.push_node(kind, pos, end, Node::NO_DATA)
    }

    pub fn add_identifier(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: IdentifierData,
    ) -> NodeIndex {
        let data_index = self.identifiers.len() as u32;
        self.identifiers.push(data);
        self.push_node(kind, pos, end, data_index)
    }

    pub fn add_literal(&mut self, kind: u16, pos: u32, end: u32, data: LiteralData) -> NodeIndex {
        let data_index = self.literals.len() as u32;
        self.literals.push(data);
        self.push_node(kind, pos, end, data_index)
    }

    pub fn add_binary_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: BinaryExprData,
    ) -> NodeIndex {
        let (left, right) = (data.left, data.right);
        let data_index = self.binary_exprs.len() as u32;
        self.binary_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(left, parent);
        self.set_parent(right, parent);
        parent
    }

    pub fn add_unary_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: UnaryExprData,
    ) -> NodeIndex {
        let operand = data.operand;
        let data_index = self.unary_exprs.len() as u32;
        self.unary_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(operand, parent);
        parent
    }

    pub fn add_call_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: CallExprData,
    ) -> NodeIndex {
        let expression = data.expression;
        let arguments = data.arguments.clone();
        let data_index = self.call_exprs.len() as u32;
        self.call_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(expression, parent);
        if let Some(arguments) = &arguments {
            self.set_parent_list(arguments, parent);
        }
        parent
    }

    pub fn add_access_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: AccessExprData,
    ) -> NodeIndex {
        let (expression, name) = (data.expression, data.name_or_argument);
        let data_index = self.access_exprs.len() as u32;
        self.access_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(expression, parent);
        self.set_parent(name, parent);
        parent
    }

    pub fn add_conditional_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ConditionalExprData,
    ) -> NodeIndex {
        let children = [data.condition, data.when_true, data.when_false];
        let data_index = self.conditional_exprs.len() as u32;
        self.conditional_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    /// Add an array or object literal.
    pub fn add_literal_expr(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: LiteralExprData,
    ) -> NodeIndex {
        let elements = data.elements.clone();
        let data_index = self.literal_exprs.len() as u32;
        self.literal_exprs.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent_list(&elements, parent);
        parent
    }

    pub fn add_property_assignment(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: PropertyAssignmentData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.property_assignments.len() as u32;
        self.property_assignments.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_parenthesized(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ParenthesizedData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.parenthesized.len() as u32;
        self.parenthesized.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(expression, parent);
        parent
    }

    /// Add a function declaration, function expression or arrow function.
    pub fn add_function(&mut self, kind: u16, pos: u32, end: u32, data: FunctionData) -> NodeIndex {
        let (name, body) = (data.name, data.body);
        let parameters = data.parameters.clone();
        let data_index = self.functions.len() as u32;
        self.functions.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(name, parent);
        self.set_parent_list(&parameters, parent);
        self.set_parent(body, parent);
        parent
    }

    pub fn add_parameter(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ParameterData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.parameters.len() as u32;
        self.parameters.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_block(&mut self, kind: u16, pos: u32, end: u32, data: BlockData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.blocks.len() as u32;
        self.blocks.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent_list(&statements, parent);
        parent
    }

    /// Add a variable statement or declaration list.
    pub fn add_variable(&mut self, kind: u16, pos: u32, end: u32, data: VariableData) -> NodeIndex {
        let declarations = data.declarations.clone();
        let data_index = self.variables.len() as u32;
        self.variables.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent_list(&declarations, parent);
        parent
    }

    pub fn add_variable_declaration(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: VariableDeclarationData,
    ) -> NodeIndex {
        let (name, initializer) = (data.name, data.initializer);
        let data_index = self.variable_declarations.len() as u32;
        self.variable_declarations.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(name, parent);
        self.set_parent(initializer, parent);
        parent
    }

    pub fn add_expr_statement(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: ExprStatementData,
    ) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.expr_statements.len() as u32;
        self.expr_statements.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(expression, parent);
        parent
    }

    /// Add a `return` or `throw` statement.
    pub fn add_return(&mut self, kind: u16, pos: u32, end: u32, data: ReturnData) -> NodeIndex {
        let expression = data.expression;
        let data_index = self.return_data.len() as u32;
        self.return_data.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        self.set_parent(expression, parent);
        parent
    }

    pub fn add_if_statement(
        &mut self,
        kind: u16,
        pos: u32,
        end: u32,
        data: IfStatementData,
    ) -> NodeIndex {
        let children = [data.expression, data.then_statement, data.else_statement];
        let data_index = self.if_statements.len() as u32;
        self.if_statements.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    /// Add a `for`, `while` or `do-while` statement.
    pub fn add_loop(&mut self, kind: u16, pos: u32, end: u32, data: LoopData) -> NodeIndex {
        let children = [
            data.initializer,
            data.condition,
            data.incrementor,
            data.statement,
        ];
        let data_index = self.loops.len() as u32;
        self.loops.push(data);
        let parent = self.push_node(kind, pos, end, data_index);
        for child in children {
            self.set_parent(child, parent);
        }
        parent
    }

    pub fn add_source_file(&mut self, pos: u32, end: u32, data: SourceFileData) -> NodeIndex {
        let statements = data.statements.clone();
        let data_index = self.source_files.len() as u32;
        self.source_files.push(data);
        let parent = self.push_node(super::syntax_kind_ext::SOURCE_FILE, pos, end, data_index);
        self.set_parent_list(&statements, parent);
        parent
    }
}
