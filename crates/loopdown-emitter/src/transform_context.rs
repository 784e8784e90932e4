//! Transform Context - projection layer between lowering and printing.
//!
//! The AST is read-only, so the lowering pass cannot rewrite nodes in
//! place. It records directives instead, keyed by the node they apply to,
//! and the [`Printer`](crate::Printer) consults them while emitting.

use crate::transforms::ir::IRNode;
use loopdown_parser::parser::NodeIndex;
use rustc_hash::FxHashMap;

/// How the printer should emit a node differently from its source form.
#[derive(Debug, Clone)]
pub enum TransformDirective {
    /// A statement receiving generated statements.
    ///
    /// `before` is emitted ahead of the statement. When `replacement` is set
    /// it is emitted instead of the statement itself.
    SpliceStatements {
        before: Vec<IRNode>,
        replacement: Option<Vec<IRNode>>,
    },

    /// An expression replaced by another value.
    SubstituteExpression { value: IRNode },
}

#[derive(Debug, Default)]
pub struct TransformContext {
    directives: FxHashMap<NodeIndex, TransformDirective>,
}

impl TransformContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeIndex, directive: TransformDirective) {
        self.directives.insert(node, directive);
    }

    pub fn get(&self, node: NodeIndex) -> Option<&TransformDirective> {
        self.directives.get(&node)
    }

    pub fn has_transform(&self, node: NodeIndex) -> bool {
        self.directives.contains_key(&node)
    }

    /// Append `statements` to those emitted before `statement`.
    pub fn splice_before(&mut self, statement: NodeIndex, statements: Vec<IRNode>) {
        match self.directives.get_mut(&statement) {
            Some(TransformDirective::SpliceStatements { before, .. }) => before.extend(statements),
            _ => self.insert(
                statement,
                TransformDirective::SpliceStatements {
                    before: statements,
                    replacement: None,
                },
            ),
        }
    }

    /// Emit `statements` in place of `statement`, keeping earlier splices.
    pub fn replace_statement(&mut self, statement: NodeIndex, statements: Vec<IRNode>) {
        match self.directives.get_mut(&statement) {
            Some(TransformDirective::SpliceStatements { replacement, .. }) => {
                *replacement = Some(statements);
            }
            _ => self.insert(
                statement,
                TransformDirective::SpliceStatements {
                    before: Vec::new(),
                    replacement: Some(statements),
                },
            ),
        }
    }

    pub fn substitute(&mut self, expression: NodeIndex, value: IRNode) {
        self.insert(expression, TransformDirective::SubstituteExpression { value });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeIndex, &TransformDirective)> {
        self.directives.iter()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splices_accumulate_in_order() {
        let mut ctx = TransformContext::new();
        let stmt = NodeIndex(3);
        ctx.splice_before(stmt, vec![IRNode::id("a")]);
        ctx.splice_before(stmt, vec![IRNode::id("b")]);
        ctx.replace_statement(stmt, vec![IRNode::id("c")]);

        let Some(TransformDirective::SpliceStatements {
            before,
            replacement,
        }) = ctx.get(stmt)
        else {
            panic!("expected splice directive");
        };
        let names: Vec<_> = before
            .iter()
            .map(|n| match n {
                IRNode::Identifier(name) => name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(replacement.as_ref().map(Vec::len), Some(1));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_substitute() {
        let mut ctx = TransformContext::new();
        ctx.substitute(NodeIndex(7), IRNode::void_0());
        assert!(ctx.has_transform(NodeIndex(7)));
        assert!(matches!(
            ctx.get(NodeIndex(7)),
            Some(TransformDirective::SubstituteExpression { .. })
        ));
    }
}
