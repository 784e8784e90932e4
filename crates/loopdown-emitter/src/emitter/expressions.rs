//! Expression emission.

use super::Printer;
use crate::transform_context::TransformDirective;
use crate::transforms::ir::IRNode;
use loopdown_parser::parser::node::Node;
use loopdown_parser::parser::syntax_kind_ext::*;
use loopdown_parser::parser::{NodeFlags, NodeIndex};
use loopdown_scanner::{SyntaxKind, token_to_text};

impl<'a> Printer<'a> {
    /// Emit an expression, applying any substitution attached to it.
    pub(crate) fn emit_expression(&mut self, idx: NodeIndex) {
        if let Some(TransformDirective::SubstituteExpression { value }) = self.directive(idx) {
            let parenthesize =
                !matches!(value, IRNode::Identifier(_)) && self.is_tight_operand(idx);
            if parenthesize {
                self.write_char('(');
            }
            self.emit_ir(value);
            if parenthesize {
                self.write_char(')');
            }
            return;
        }
        self.emit_expression_node(idx);
    }

    /// Whether `idx` sits where only a member-level expression may appear
    /// (object of an access, callee, left of `**`).
    fn is_tight_operand(&self, idx: NodeIndex) -> bool {
        let arena = self.arena;
        let parent = arena.parent_of(idx);
        let Some(parent_node) = arena.get(parent) else {
            return false;
        };
        if let Some(access) = arena.get_access_expr(parent_node) {
            return access.expression == idx;
        }
        if let Some(call) = arena.get_call_expr(parent_node) {
            return call.expression == idx;
        }
        if parent_node.kind == POSTFIX_UNARY_EXPRESSION {
            return true;
        }
        arena.get_binary_expr(parent_node).is_some_and(|binary| {
            binary.left == idx && binary.operator_token == SyntaxKind::AsteriskAsteriskToken as u16
        })
    }

    fn emit_expression_node(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        match node.kind {
            k if k == SyntaxKind::Identifier as u16 => {
                if let Some(ident) = arena.get_identifier(node) {
                    self.write(&ident.escaped_text);
                }
            }
            k if k == SyntaxKind::NumericLiteral as u16 || k == SyntaxKind::StringLiteral as u16 => {
                if let Some(literal) = arena.get_literal(node) {
                    self.write(&literal.raw_text);
                }
            }
            k if k == SyntaxKind::ThisKeyword as u16
                || k == SyntaxKind::TrueKeyword as u16
                || k == SyntaxKind::FalseKeyword as u16
                || k == SyntaxKind::NullKeyword as u16 =>
            {
                if let Some(kind) = SyntaxKind::try_from_u16(k) {
                    self.write(token_to_text(kind));
                }
            }
            ARRAY_LITERAL_EXPRESSION => {
                if let Some(literal) = arena.get_literal_expr(node) {
                    self.write_char('[');
                    self.emit_comma_list(&literal.elements.nodes, |p, e| p.emit_expression(e));
                    self.write_char(']');
                }
            }
            OBJECT_LITERAL_EXPRESSION => self.emit_object_literal(node),
            PROPERTY_ASSIGNMENT => {
                if let Some(property) = arena.get_property_assignment(node) {
                    self.emit_expression(property.name);
                    if property.initializer.is_some() {
                        self.write(": ");
                        self.emit_expression(property.initializer);
                    }
                }
            }
            PROPERTY_ACCESS_EXPRESSION => {
                if let Some(access) = arena.get_access_expr(node) {
                    self.emit_expression(access.expression);
                    self.write_char('.');
                    self.emit_expression(access.name_or_argument);
                }
            }
            ELEMENT_ACCESS_EXPRESSION => {
                if let Some(access) = arena.get_access_expr(node) {
                    self.emit_expression(access.expression);
                    self.write_char('[');
                    self.emit_expression(access.name_or_argument);
                    self.write_char(']');
                }
            }
            CALL_EXPRESSION => {
                if let Some(call) = arena.get_call_expr(node) {
                    self.emit_expression(call.expression);
                    self.emit_arguments(call.arguments.as_ref().map(|a| a.nodes.as_slice()));
                }
            }
            NEW_EXPRESSION => {
                if let Some(call) = arena.get_call_expr(node) {
                    self.write("new ");
                    self.emit_expression(call.expression);
                    if let Some(arguments) = &call.arguments {
                        self.emit_arguments(Some(&arguments.nodes));
                    }
                }
            }
            PARENTHESIZED_EXPRESSION => {
                if let Some(paren) = arena.get_parenthesized(node) {
                    self.write_char('(');
                    self.emit_expression(paren.expression);
                    self.write_char(')');
                }
            }
            PREFIX_UNARY_EXPRESSION => self.emit_prefix_unary(node),
            POSTFIX_UNARY_EXPRESSION => {
                if let Some(unary) = arena.get_unary_expr(node) {
                    self.emit_expression(unary.operand);
                    if let Some(op) = SyntaxKind::try_from_u16(unary.operator) {
                        self.write(token_to_text(op));
                    }
                }
            }
            BINARY_EXPRESSION => {
                if let Some(binary) = arena.get_binary_expr(node) {
                    self.emit_expression(binary.left);
                    let op = SyntaxKind::try_from_u16(binary.operator_token)
                        .unwrap_or(SyntaxKind::Unknown);
                    if op == SyntaxKind::CommaToken {
                        self.write(", ");
                    } else {
                        self.write_space();
                        self.write(token_to_text(op));
                        self.write_space();
                    }
                    self.emit_expression(binary.right);
                }
            }
            CONDITIONAL_EXPRESSION => {
                if let Some(cond) = arena.get_conditional_expr(node) {
                    self.emit_expression(cond.condition);
                    self.write(" ? ");
                    self.emit_expression(cond.when_true);
                    self.write(" : ");
                    self.emit_expression(cond.when_false);
                }
            }
            FUNCTION_EXPRESSION => self.emit_function(node),
            ARROW_FUNCTION => self.emit_arrow_function(node),
            _ => {}
        }
    }

    fn emit_arguments(&mut self, arguments: Option<&[NodeIndex]>) {
        self.write_char('(');
        if let Some(arguments) = arguments {
            self.emit_comma_list(arguments, |p, a| p.emit_expression(a));
        }
        self.write_char(')');
    }

    fn emit_object_literal(&mut self, node: &Node) {
        let Some(literal) = self.arena.get_literal_expr(node) else {
            return;
        };
        if literal.elements.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.emit_comma_list(&literal.elements.nodes, |p, e| p.emit_expression(e));
        self.write(" }");
    }

    fn emit_prefix_unary(&mut self, node: &Node) {
        let arena = self.arena;
        let Some(unary) = arena.get_unary_expr(node) else {
            return;
        };
        let Some(op) = SyntaxKind::try_from_u16(unary.operator) else {
            return;
        };
        self.write(token_to_text(op));
        if op.is_keyword() {
            self.write_space();
        } else if matches!(op, SyntaxKind::PlusToken | SyntaxKind::MinusToken)
            && let Some(operand) = arena.get(unary.operand)
            && operand.kind == PREFIX_UNARY_EXPRESSION
            && arena.get_unary_expr(operand).is_some_and(|inner| {
                // `- -x` and `+ ++x` must not fuse into `--x` / `+++x`.
                let first = token_to_text(op).as_bytes()[0];
                SyntaxKind::try_from_u16(inner.operator)
                    .is_some_and(|k| token_to_text(k).as_bytes().first() == Some(&first))
            })
        {
            self.write_space();
        }
        self.emit_expression(unary.operand);
    }

    fn emit_arrow_function(&mut self, node: &Node) {
        let arena = self.arena;
        let Some(func) = arena.get_function(node) else {
            return;
        };
        self.emit_parameters(&func.parameters.nodes);
        self.write(" => ");
        let Some(body) = arena.get(func.body) else {
            return;
        };
        if NodeFlags::from_bits_truncate(node.flags).contains(NodeFlags::EXPRESSION_BODY) {
            self.emit_expression(func.body);
        } else {
            self.emit_block(body);
        }
    }
}
