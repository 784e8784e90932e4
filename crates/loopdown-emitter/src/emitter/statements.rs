//! Statement emission.

use super::Printer;
use crate::transform_context::TransformDirective;
use loopdown_parser::parser::NodeIndex;
use loopdown_parser::parser::node::Node;
use loopdown_parser::parser::syntax_kind_ext::*;

impl<'a> Printer<'a> {
    /// Emit a statement, applying any splice directive attached to it.
    pub(crate) fn emit_statement(&mut self, idx: NodeIndex) {
        if let Some(TransformDirective::SpliceStatements {
            before,
            replacement,
        }) = self.directive(idx)
        {
            for statement in before {
                self.emit_ir_statement(statement);
            }
            match replacement {
                Some(statements) => {
                    for statement in statements {
                        self.emit_ir_statement(statement);
                    }
                }
                None => self.emit_statement_node(idx),
            }
            return;
        }
        self.emit_statement_node(idx);
    }

    fn emit_statement_node(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        match node.kind {
            BLOCK => self.emit_block(node),
            VARIABLE_STATEMENT => {
                if let Some(statement) = arena.get_variable(node) {
                    for &list in &statement.declarations.nodes {
                        self.emit_variable_declaration_list(list);
                    }
                }
                self.write_semicolon();
            }
            FUNCTION_DECLARATION => self.emit_function(node),
            EXPRESSION_STATEMENT => {
                if let Some(statement) = arena.get_expression_statement(node) {
                    self.emit_expression(statement.expression);
                }
                self.write_semicolon();
            }
            RETURN_STATEMENT | THROW_STATEMENT => {
                self.write(if node.kind == RETURN_STATEMENT {
                    "return"
                } else {
                    "throw"
                });
                if let Some(statement) = arena.get_return_statement(node)
                    && statement.expression.is_some()
                {
                    self.write_space();
                    self.emit_expression(statement.expression);
                }
                self.write_semicolon();
            }
            IF_STATEMENT => self.emit_if_statement(node),
            FOR_STATEMENT => self.emit_for_statement(node),
            WHILE_STATEMENT => {
                if let Some(loop_data) = arena.get_loop(node) {
                    self.write("while (");
                    self.emit_expression(loop_data.condition);
                    self.write(")");
                    self.emit_embedded_statement(loop_data.statement);
                }
            }
            DO_STATEMENT => {
                if let Some(loop_data) = arena.get_loop(node) {
                    self.write("do");
                    if self.emit_embedded_statement(loop_data.statement) {
                        self.write_space();
                    }
                    self.write("while (");
                    self.emit_expression(loop_data.condition);
                    self.write(");");
                }
            }
            BREAK_STATEMENT => self.write("break;"),
            CONTINUE_STATEMENT => self.write("continue;"),
            EMPTY_STATEMENT => self.write_semicolon(),
            _ => {}
        }
        self.write_line();
    }

    /// `{ ... }` without a trailing newline.
    pub(crate) fn emit_block(&mut self, node: &Node) {
        let Some(block) = self.arena.get_block(node) else {
            return;
        };
        if block.statements.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for statement in block.statements.iter() {
            self.emit_statement(statement);
        }
        self.decrease_indent();
        self.write("}");
    }

    /// Emit the statement in a single-statement slot (`if` branch, loop
    /// body). Returns true when the output ends with a closing brace on the
    /// current line.
    ///
    /// A statement carrying a splice directive expands to several statements
    /// and is wrapped in a block.
    pub(crate) fn emit_embedded_statement(&mut self, idx: NodeIndex) -> bool {
        let Some(node) = self.arena.get(idx) else {
            self.write_semicolon();
            return false;
        };
        if node.kind == BLOCK && self.directive(idx).is_none() {
            self.write_space();
            self.emit_block(node);
            return true;
        }
        if matches!(
            self.directive(idx),
            Some(TransformDirective::SpliceStatements { .. })
        ) {
            self.write(" {");
            self.write_line();
            self.increase_indent();
            self.emit_statement(idx);
            self.decrease_indent();
            self.write("}");
            return true;
        }
        self.write_line();
        self.increase_indent();
        self.emit_statement(idx);
        self.decrease_indent();
        false
    }

    fn emit_if_statement(&mut self, node: &Node) {
        let arena = self.arena;
        let Some(if_data) = arena.get_if_statement(node) else {
            return;
        };
        self.write("if (");
        self.emit_expression(if_data.expression);
        self.write(")");
        let braced = self.emit_embedded_statement(if_data.then_statement);

        if if_data.else_statement.is_none() {
            return;
        }
        if braced {
            self.write(" else");
        } else {
            self.write("else");
        }
        let else_idx = if_data.else_statement;
        if let Some(else_node) = arena.get(else_idx)
            && else_node.kind == IF_STATEMENT
            && self.directive(else_idx).is_none()
        {
            self.write_space();
            self.emit_if_statement(else_node);
        } else {
            self.emit_embedded_statement(else_idx);
        }
    }

    fn emit_for_statement(&mut self, node: &Node) {
        let arena = self.arena;
        let Some(loop_data) = arena.get_loop(node) else {
            return;
        };
        self.write("for (");
        if let Some(init) = arena.get(loop_data.initializer) {
            if init.kind == VARIABLE_DECLARATION_LIST {
                self.emit_variable_declaration_list(loop_data.initializer);
            } else {
                self.emit_expression(loop_data.initializer);
            }
        }
        self.write_semicolon();
        if loop_data.condition.is_some() {
            self.write_space();
            self.emit_expression(loop_data.condition);
        }
        self.write_semicolon();
        if loop_data.incrementor.is_some() {
            self.write_space();
            self.emit_expression(loop_data.incrementor);
        }
        self.write(")");
        self.emit_embedded_statement(loop_data.statement);
    }

    fn emit_variable_declaration_list(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        let flags = loopdown_parser::parser::NodeFlags::from_bits_truncate(node.flags);
        self.write(if flags.contains(loopdown_parser::parser::NodeFlags::CONST) {
            "const "
        } else if flags.contains(loopdown_parser::parser::NodeFlags::LET) {
            "let "
        } else {
            "var "
        });
        let Some(list) = arena.get_variable(node) else {
            return;
        };
        self.emit_comma_list(&list.declarations.nodes, |p, decl| {
            let Some(decl_node) = p.arena.get(decl) else {
                return;
            };
            if let Some(data) = p.arena.get_variable_declaration(decl_node) {
                p.emit_expression(data.name);
                if data.initializer.is_some() {
                    p.write(" = ");
                    p.emit_expression(data.initializer);
                }
            }
        });
    }

    /// Function declaration or expression.
    pub(crate) fn emit_function(&mut self, node: &Node) {
        let arena = self.arena;
        let Some(func) = arena.get_function(node) else {
            return;
        };
        self.write("function ");
        if func.name.is_some() {
            self.emit_expression(func.name);
        }
        self.emit_parameters(&func.parameters.nodes);
        self.write_space();
        if let Some(body) = arena.get(func.body) {
            self.emit_block(body);
        }
    }

    pub(crate) fn emit_parameters(&mut self, parameters: &[NodeIndex]) {
        self.write_char('(');
        self.emit_comma_list(parameters, |p, param| {
            let Some(param_node) = p.arena.get(param) else {
                return;
            };
            if let Some(data) = p.arena.get_parameter(param_node) {
                p.emit_expression(data.name);
                if data.initializer.is_some() {
                    p.write(" = ");
                    p.emit_expression(data.initializer);
                }
            }
        });
        self.write_char(')');
    }
}
