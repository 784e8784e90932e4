//! Shared AST queries used by the lowering pass.

use crate::parser::syntax_kind_ext::{
    ARROW_FUNCTION, BLOCK, DO_STATEMENT, FOR_STATEMENT, FUNCTION_DECLARATION,
    FUNCTION_EXPRESSION, IF_STATEMENT, PARENTHESIZED_EXPRESSION, SOURCE_FILE, WHILE_STATEMENT,
    is_statement,
};
use crate::parser::{NodeAccess, NodeArena, NodeIndex};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Whether `kind` introduces a function scope.
#[inline]
pub fn is_function_like(kind: u16) -> bool {
    matches!(
        kind,
        FUNCTION_DECLARATION | FUNCTION_EXPRESSION | ARROW_FUNCTION
    )
}

/// Whether `kind` is a statement that holds a single child statement
/// (`if` branches and loop bodies).
#[inline]
pub fn has_embedded_statement(kind: u16) -> bool {
    matches!(
        kind,
        IF_STATEMENT | FOR_STATEMENT | WHILE_STATEMENT | DO_STATEMENT
    )
}

/// Whether `kind` holds a statement list.
#[inline]
pub fn is_statement_container(kind: u16) -> bool {
    kind == SOURCE_FILE || kind == BLOCK
}

/// Every identifier text occurring in the subtree rooted at `root`,
/// including property names.
pub fn collect_identifier_names(arena: &NodeArena, root: NodeIndex) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    let mut stack: SmallVec<[NodeIndex; 32]> = SmallVec::new();
    stack.push(root);
    while let Some(index) = stack.pop() {
        if let Some(text) = arena.get_identifier_text(index) {
            if !text.is_empty() {
                names.insert(text.to_string());
            }
            continue;
        }
        stack.extend(arena.get_children(index));
    }
    names
}

/// Strip any number of enclosing parentheses.
pub fn skip_parentheses(arena: &NodeArena, mut index: NodeIndex) -> NodeIndex {
    while let Some(node) = arena.get(index)
        && node.kind == PARENTHESIZED_EXPRESSION
        && let Some(paren) = arena.get_parenthesized(node)
    {
        index = paren.expression;
    }
    index
}

/// Nearest ancestor-or-self of `index` that is a statement, or `NONE`.
pub fn enclosing_statement(arena: &NodeArena, index: NodeIndex) -> NodeIndex {
    let mut current = index;
    while let Some(node) = arena.get(current) {
        if is_statement(node.kind) {
            return current;
        }
        current = arena.parent_of(current);
    }
    NodeIndex::NONE
}

/// Nearest enclosing function of `index` (exclusive), or `NONE` at top level.
pub fn enclosing_function(arena: &NodeArena, index: NodeIndex) -> NodeIndex {
    let mut current = arena.parent_of(index);
    while let Some(node) = arena.get(current) {
        if is_function_like(node.kind) {
            return current;
        }
        current = arena.parent_of(current);
    }
    NodeIndex::NONE
}

#[cfg(test)]
#[path = "../../tests/transform_utils_tests.rs"]
mod tests;
