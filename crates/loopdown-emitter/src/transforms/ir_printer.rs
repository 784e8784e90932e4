//! IR emission on the shared [`Printer`].
//!
//! Generated statements and original subtrees print through one printer, so
//! an [`IRNode::ASTRef`] inside generated code still honours the directives
//! recorded for that subtree.

use crate::emitter::{Printer, escape_string};
use crate::transforms::ir::IRNode;
use loopdown_parser::parser::syntax_kind_ext::is_statement;

impl<'a> Printer<'a> {
    /// Emit an IR node (statement or expression).
    pub fn emit_ir(&mut self, node: &IRNode) {
        if node.is_statement() {
            self.emit_ir_statement(node);
        } else {
            self.emit_ir_expression(node);
        }
    }

    pub(crate) fn emit_ir_statement(&mut self, node: &IRNode) {
        match node {
            IRNode::VarDecl { name, initializer } => {
                self.write("var ");
                self.write(name);
                if let Some(init) = initializer {
                    self.write(" = ");
                    self.emit_ir_expression(init);
                }
                self.write_semicolon();
            }
            IRNode::ExpressionStatement(expr) => {
                self.emit_ir_expression(expr);
                self.write_semicolon();
            }
            IRNode::IfStatement {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.emit_ir_expression(condition);
                self.write(") ");
                self.emit_ir_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.emit_ir_block(else_branch);
                }
            }
            IRNode::Block(_) => self.emit_ir_block(node),
            IRNode::ForStatement {
                initializer,
                condition,
                incrementor,
                body,
            } => {
                self.write("for (");
                if let Some(init) = initializer {
                    self.emit_ir(init);
                }
                self.write_semicolon();
                if let Some(condition) = condition {
                    self.write_space();
                    self.emit_ir_expression(condition);
                }
                self.write_semicolon();
                if let Some(incrementor) = incrementor {
                    self.write_space();
                    self.emit_ir_expression(incrementor);
                }
                self.write(") ");
                self.emit_ir_block(body);
            }
            IRNode::ThrowStatement(expr) => {
                self.write("throw ");
                self.emit_ir_expression(expr);
                self.write_semicolon();
            }
            IRNode::BreakStatement => self.write("break;"),
            IRNode::ASTRef(idx) => {
                let is_stmt = self
                    .arena
                    .get(*idx)
                    .is_some_and(|n| is_statement(n.kind));
                if is_stmt {
                    self.emit_statement(*idx);
                } else {
                    self.emit_expression(*idx);
                    self.write_semicolon();
                }
            }
            expr => {
                self.emit_ir_expression(expr);
                self.write_semicolon();
            }
        }
        self.write_line();
    }

    /// Emit `node` as a braced block; non-block statements are wrapped.
    fn emit_ir_block(&mut self, node: &IRNode) {
        let statements = match node {
            IRNode::Block(statements) => statements.as_slice(),
            other => std::slice::from_ref(other),
        };
        if statements.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for statement in statements {
            self.emit_ir_statement(statement);
        }
        self.decrease_indent();
        self.write("}");
    }

    fn emit_ir_expression(&mut self, node: &IRNode) {
        match node {
            IRNode::NumericLiteral(text) => self.write(text),
            IRNode::StringLiteral(text) => self.write(&escape_string(text)),
            IRNode::BooleanLiteral(value) => self.write(if *value { "true" } else { "false" }),
            IRNode::Undefined => self.write("void 0"),
            IRNode::Identifier(name) => self.write(name),
            IRNode::BinaryExpr {
                left,
                operator,
                right,
            } => {
                self.emit_ir_expression(left);
                self.write_space();
                self.write(operator);
                self.write_space();
                self.emit_ir_expression(right);
            }
            IRNode::PrefixUnaryExpr { operator, operand } => {
                self.write(operator);
                self.emit_ir_expression(operand);
            }
            IRNode::PostfixUnaryExpr { operand, operator } => {
                self.emit_ir_expression(operand);
                self.write(operator);
            }
            IRNode::CallExpr { callee, arguments } => {
                self.emit_ir_expression(callee);
                self.emit_ir_arguments(arguments);
            }
            IRNode::NewExpr { callee, arguments } => {
                self.write("new ");
                self.emit_ir_expression(callee);
                self.emit_ir_arguments(arguments);
            }
            IRNode::PropertyAccess { object, property } => {
                self.emit_ir_expression(object);
                self.write_char('.');
                self.write(property);
            }
            IRNode::ElementAccess { object, index } => {
                self.emit_ir_expression(object);
                self.write_char('[');
                self.emit_ir_expression(index);
                self.write_char(']');
            }
            IRNode::ArrayLiteral(elements) => {
                self.write_char('[');
                self.emit_ir_arguments_inner(elements);
                self.write_char(']');
            }
            IRNode::ASTRef(idx) => self.emit_expression(*idx),
            statement => self.emit_ir_statement(statement),
        }
    }

    fn emit_ir_arguments(&mut self, arguments: &[IRNode]) {
        self.write_char('(');
        self.emit_ir_arguments_inner(arguments);
        self.write_char(')');
    }

    fn emit_ir_arguments_inner(&mut self, items: &[IRNode]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_ir_expression(item);
        }
    }
}

#[cfg(test)]
#[path = "tests/ir_printer.rs"]
mod tests;
