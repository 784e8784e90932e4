//! Statement execution and `var`/function hoisting.

use loopdown_parser::parser::syntax_kind_ext::*;
use loopdown_parser::parser::{NodeFlags, NodeIndex};

use super::{Completion, EvalResult, InterpreterError, Interpreter};

impl<'a> Interpreter<'a> {
    /// Hoist declarations in `statements`, then run them in order.
    pub(crate) fn exec_statement_list(&mut self, statements: &[NodeIndex]) -> EvalResult<Completion> {
        self.hoist_declarations(statements)?;
        for &statement in statements {
            match self.exec_statement(statement)? {
                Completion::Normal => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal)
    }

    /// Bind `var` names to `undefined` in the function scope and function
    /// declarations to closures in the current scope.
    fn hoist_declarations(&mut self, statements: &[NodeIndex]) -> EvalResult<()> {
        let function_scope = self.env.function_scope();
        let mut var_names = Vec::new();
        for &statement in statements {
            self.collect_var_names(statement, &mut var_names);
        }
        for name in &var_names {
            function_scope.declare_var(name);
        }

        for &statement in statements {
            let Some(node) = self.arena.get(statement) else {
                continue;
            };
            if node.kind != FUNCTION_DECLARATION {
                continue;
            }
            let Some(function) = self.arena.get_function(node) else {
                continue;
            };
            let name = self.identifier_name(function.name)?;
            let closure = self.make_closure(statement);
            self.env.declare(&name, closure, true);
        }
        Ok(())
    }

    /// `var` names declared by `idx` and nested statements, not entering
    /// functions.
    fn collect_var_names(&self, idx: NodeIndex, names: &mut Vec<String>) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };
        match node.kind {
            VARIABLE_STATEMENT => {
                if let Some(statement) = arena.get_variable(node) {
                    for list in statement.declarations.iter() {
                        self.collect_var_names(list, names);
                    }
                }
            }
            VARIABLE_DECLARATION_LIST => {
                let flags = NodeFlags::from_bits_truncate(node.flags);
                if flags.intersects(NodeFlags::LET | NodeFlags::CONST) {
                    return;
                }
                let Some(list) = arena.get_variable(node) else {
                    return;
                };
                for declaration in list.declarations.iter() {
                    if let Some(name) = arena
                        .get(declaration)
                        .and_then(|n| arena.get_variable_declaration(n))
                        .and_then(|d| arena.get(d.name))
                        .and_then(|n| arena.get_identifier(n))
                    {
                        names.push(name.escaped_text.clone());
                    }
                }
            }
            BLOCK => {
                if let Some(block) = arena.get_block(node) {
                    for statement in block.statements.iter() {
                        self.collect_var_names(statement, names);
                    }
                }
            }
            IF_STATEMENT => {
                if let Some(if_data) = arena.get_if_statement(node) {
                    self.collect_var_names(if_data.then_statement, names);
                    self.collect_var_names(if_data.else_statement, names);
                }
            }
            FOR_STATEMENT | WHILE_STATEMENT | DO_STATEMENT => {
                if let Some(loop_data) = arena.get_loop(node) {
                    self.collect_var_names(loop_data.initializer, names);
                    self.collect_var_names(loop_data.statement, names);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn exec_statement(&mut self, idx: NodeIndex) -> EvalResult<Completion> {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return Ok(Completion::Normal);
        };

        match node.kind {
            BLOCK => {
                let statements = arena
                    .get_block(node)
                    .map(|block| block.statements.nodes.clone())
                    .unwrap_or_default();
                let scope = self.env.child(false);
                self.with_env(scope, |interp| interp.exec_statement_list(&statements))
            }
            VARIABLE_STATEMENT => {
                if let Some(statement) = arena.get_variable(node) {
                    for list in statement.declarations.iter() {
                        self.exec_declaration_list(list)?;
                    }
                }
                Ok(Completion::Normal)
            }
            FUNCTION_DECLARATION | EMPTY_STATEMENT => Ok(Completion::Normal),
            EXPRESSION_STATEMENT => {
                if let Some(statement) = arena.get_expression_statement(node) {
                    self.eval(statement.expression)?;
                }
                Ok(Completion::Normal)
            }
            RETURN_STATEMENT => {
                let value = match arena.get_return_statement(node) {
                    Some(data) if data.expression.is_some() => self.eval(data.expression)?,
                    _ => super::Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            THROW_STATEMENT => {
                let value = match arena.get_return_statement(node) {
                    Some(data) => self.eval(data.expression)?,
                    None => super::Value::Undefined,
                };
                Err(super::Exception::Thrown(value))
            }
            IF_STATEMENT => {
                let Some(if_data) = arena.get_if_statement(node) else {
                    return Ok(Completion::Normal);
                };
                if self.eval(if_data.expression)?.is_truthy() {
                    self.exec_statement(if_data.then_statement)
                } else if if_data.else_statement.is_some() {
                    self.exec_statement(if_data.else_statement)
                } else {
                    Ok(Completion::Normal)
                }
            }
            FOR_STATEMENT => {
                let scope = self.env.child(false);
                self.with_env(scope, |interp| interp.exec_for(idx))
            }
            WHILE_STATEMENT | DO_STATEMENT => self.exec_while(idx, node.kind == DO_STATEMENT),
            BREAK_STATEMENT => Ok(Completion::Break),
            CONTINUE_STATEMENT => Ok(Completion::Continue),
            _ => Err(InterpreterError::Unsupported("statement kind").into()),
        }
    }

    fn exec_declaration_list(&mut self, list: NodeIndex) -> EvalResult<()> {
        let arena = self.arena;
        let Some(node) = arena.get(list) else {
            return Ok(());
        };
        let flags = NodeFlags::from_bits_truncate(node.flags);
        let block_scoped = flags.intersects(NodeFlags::LET | NodeFlags::CONST);
        let mutable = !flags.contains(NodeFlags::CONST);
        let Some(data) = arena.get_variable(node) else {
            return Ok(());
        };

        for declaration in data.declarations.iter() {
            let Some(decl) = arena
                .get(declaration)
                .and_then(|n| arena.get_variable_declaration(n))
            else {
                continue;
            };
            let name = self.identifier_name(decl.name)?;
            if block_scoped {
                let value = if decl.initializer.is_some() {
                    self.eval(decl.initializer)?
                } else {
                    super::Value::Undefined
                };
                self.env.declare(&name, value, mutable);
            } else if decl.initializer.is_some() {
                let value = self.eval(decl.initializer)?;
                if !self.env.assign(&name, value.clone()).unwrap_or(true) {
                    self.env.function_scope().declare(&name, value, true);
                }
            }
        }
        Ok(())
    }

    /// Run a loop body; `Some` carries a completion that ends the loop.
    fn exec_loop_body(&mut self, body: NodeIndex) -> EvalResult<Option<Completion>> {
        self.count_iteration()?;
        Ok(match self.exec_statement(body)? {
            Completion::Normal | Completion::Continue => None,
            Completion::Break => Some(Completion::Normal),
            Completion::Return(value) => Some(Completion::Return(value)),
        })
    }

    fn exec_for(&mut self, idx: NodeIndex) -> EvalResult<Completion> {
        let arena = self.arena;
        let Some(loop_data) = arena.get(idx).and_then(|n| arena.get_loop(n)) else {
            return Ok(Completion::Normal);
        };
        if let Some(init) = arena.get(loop_data.initializer) {
            if init.kind == VARIABLE_DECLARATION_LIST {
                self.exec_declaration_list(loop_data.initializer)?;
            } else {
                self.eval(loop_data.initializer)?;
            }
        }
        loop {
            if loop_data.condition.is_some() && !self.eval(loop_data.condition)?.is_truthy() {
                return Ok(Completion::Normal);
            }
            if let Some(done) = self.exec_loop_body(loop_data.statement)? {
                return Ok(done);
            }
            if loop_data.incrementor.is_some() {
                self.eval(loop_data.incrementor)?;
            }
        }
    }

    fn exec_while(&mut self, idx: NodeIndex, test_after: bool) -> EvalResult<Completion> {
        let arena = self.arena;
        let Some(loop_data) = arena.get(idx).and_then(|n| arena.get_loop(n)) else {
            return Ok(Completion::Normal);
        };
        let mut first = true;
        loop {
            let skip_test = test_after && first;
            first = false;
            if !skip_test && !self.eval(loop_data.condition)?.is_truthy() {
                return Ok(Completion::Normal);
            }
            if let Some(done) = self.exec_loop_body(loop_data.statement)? {
                return Ok(done);
            }
        }
    }
}
