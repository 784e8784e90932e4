//! Recognition of lowerable array method calls.
//!
//! A call is lowered when its callee is `receiver.name` or
//! `receiver["name"]` naming an enabled [`HofKind`], it has one or two
//! arguments, and it sits where hoisting its evaluation to the enclosing
//! statement cannot change whether or how often it runs.

use loopdown_parser::parser::syntax_kind_ext::{
    ARROW_FUNCTION, CALL_EXPRESSION, CONDITIONAL_EXPRESSION, DO_STATEMENT,
    ELEMENT_ACCESS_EXPRESSION, FOR_STATEMENT, FUNCTION_DECLARATION, FUNCTION_EXPRESSION,
    PARAMETER, PROPERTY_ACCESS_EXPRESSION, VARIABLE_DECLARATION, WHILE_STATEMENT, is_statement,
};
use loopdown_parser::parser::{NodeArena, NodeIndex};
use loopdown_scanner::SyntaxKind;

use crate::options::{LoweringOptions, ThisArgPolicy};
use crate::transforms::hof_loops_ir::HofKind;

/// A call accepted for lowering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HofCallSite {
    pub call: NodeIndex,
    pub kind: HofKind,
    pub receiver: NodeIndex,
    pub callback: NodeIndex,
    /// `thisArg`, or `reduce`'s initial value.
    pub extra: Option<NodeIndex>,
}

/// Expression positions that are evaluated conditionally or repeatedly
/// relative to their enclosing statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsafePosition {
    /// Any operand of `?:`.
    Conditional,
    /// Right operand of `&&`, `||` or `??`.
    LogicalRight,
    /// A loop condition, re-evaluated every iteration.
    LoopTest,
    /// A `for` incrementor.
    LoopUpdate,
    /// An arrow expression body or parameter default.
    FunctionBoundary,
    /// A declarator after the first in its list; hoisting would run the
    /// loop before the earlier bindings are initialised.
    LaterDeclarator,
}

/// Why a call was left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotACall,
    /// Callee is not a property or element access.
    NotAMemberCall,
    /// Element access whose key is not a string literal.
    ComputedKey,
    UnknownMethod,
    Arity(usize),
    Disabled(HofKind),
    ThisArgRejected(HofKind),
    Unsafe(UnsafePosition),
}

pub struct CallSiteClassifier<'a> {
    arena: &'a NodeArena,
    options: &'a LoweringOptions,
}

impl<'a> CallSiteClassifier<'a> {
    pub fn new(arena: &'a NodeArena, options: &'a LoweringOptions) -> Self {
        CallSiteClassifier { arena, options }
    }

    /// The operation `call` invokes, if it is a lowerable shape with an
    /// enabled method. Position is not considered.
    pub fn classify(&self, call: NodeIndex) -> Option<HofKind> {
        self.match_call(call).ok().map(|site| site.kind)
    }

    /// Whether a call already classified as `kind` may be hoisted.
    pub fn is_safe_to_rewrite(&self, call: NodeIndex, kind: HofKind) -> bool {
        self.check_position(call, kind).is_ok()
    }

    /// Classify `call` and check its position.
    pub fn call_site(&self, call: NodeIndex) -> Result<HofCallSite, Rejection> {
        let site = self.match_call(call)?;
        self.check_position(call, site.kind)?;
        Ok(site)
    }

    fn match_call(&self, call: NodeIndex) -> Result<HofCallSite, Rejection> {
        let arena = self.arena;
        let Some(node) = arena.get(call).filter(|n| n.kind == CALL_EXPRESSION) else {
            return Err(Rejection::NotACall);
        };
        let data = arena.get_call_expr(node).ok_or(Rejection::NotACall)?;
        let (receiver, name) = self.member_callee(data.expression)?;
        let kind = HofKind::from_method_name(name).ok_or(Rejection::UnknownMethod)?;
        if !self.options.is_enabled(kind) {
            return Err(Rejection::Disabled(kind));
        }

        let arguments = data.arguments.as_ref().map_or(&[][..], |list| &list.nodes[..]);
        let (callback, extra) = match *arguments {
            [callback] => (callback, None),
            [callback, extra] => (callback, Some(extra)),
            _ => return Err(Rejection::Arity(arguments.len())),
        };
        if extra.is_some()
            && kind.accepts_this_arg()
            && self.options.this_arg == ThisArgPolicy::Reject
        {
            return Err(Rejection::ThisArgRejected(kind));
        }

        Ok(HofCallSite {
            call,
            kind,
            receiver,
            callback,
            extra,
        })
    }

    /// Split `receiver.name` / `receiver["name"]` into its parts.
    fn member_callee(&self, callee: NodeIndex) -> Result<(NodeIndex, &'a str), Rejection> {
        let arena = self.arena;
        let node = arena.get(callee).ok_or(Rejection::NotAMemberCall)?;
        let access = arena.get_access_expr(node).ok_or(Rejection::NotAMemberCall)?;
        let key = arena
            .get(access.name_or_argument)
            .ok_or(Rejection::NotAMemberCall)?;

        let name = match node.kind {
            PROPERTY_ACCESS_EXPRESSION => arena
                .get_identifier(key)
                .map(|ident| ident.escaped_text.as_str())
                .ok_or(Rejection::NotAMemberCall)?,
            ELEMENT_ACCESS_EXPRESSION if key.kind == SyntaxKind::StringLiteral as u16 => arena
                .get_literal(key)
                .map(|lit| lit.text.as_str())
                .ok_or(Rejection::ComputedKey)?,
            ELEMENT_ACCESS_EXPRESSION => return Err(Rejection::ComputedKey),
            _ => return Err(Rejection::NotAMemberCall),
        };
        Ok((access.expression, name))
    }

    fn check_position(&self, call: NodeIndex, kind: HofKind) -> Result<(), Rejection> {
        match self.unsafe_position(call) {
            Some(position) => {
                tracing::trace!(?kind, ?position, "call in unsafe position");
                Err(Rejection::Unsafe(position))
            }
            None => Ok(()),
        }
    }

    /// Walk from `expr` up to its enclosing statement looking for a
    /// position that would not evaluate `expr` exactly once per execution
    /// of that statement.
    pub fn unsafe_position(&self, expr: NodeIndex) -> Option<UnsafePosition> {
        let arena = self.arena;
        let mut child = expr;
        let mut parent = arena.parent_of(child);
        while let Some(node) = arena.get(parent) {
            match node.kind {
                CONDITIONAL_EXPRESSION => return Some(UnsafePosition::Conditional),
                ARROW_FUNCTION | FUNCTION_EXPRESSION | FUNCTION_DECLARATION | PARAMETER => {
                    return Some(UnsafePosition::FunctionBoundary);
                }
                FOR_STATEMENT | WHILE_STATEMENT | DO_STATEMENT => {
                    let header = arena.get_loop(node)?;
                    if header.condition == child {
                        return Some(UnsafePosition::LoopTest);
                    }
                    if header.incrementor == child {
                        return Some(UnsafePosition::LoopUpdate);
                    }
                    return None;
                }
                VARIABLE_DECLARATION if self.has_earlier_declarator(parent) => {
                    return Some(UnsafePosition::LaterDeclarator);
                }
                kind if is_statement(kind) => return None,
                _ => {
                    if let Some(binary) = arena.get_binary_expr(node)
                        && binary.right == child
                        && SyntaxKind::try_from_u16(binary.operator_token)
                            .is_some_and(SyntaxKind::is_logical_operator)
                    {
                        return Some(UnsafePosition::LogicalRight);
                    }
                }
            }
            child = parent;
            parent = arena.parent_of(parent);
        }
        None
    }

    fn has_earlier_declarator(&self, declaration: NodeIndex) -> bool {
        let arena = self.arena;
        arena
            .get(arena.parent_of(declaration))
            .and_then(|list| arena.get_variable(list))
            .and_then(|list| list.declarations.nodes.first().copied())
            .is_some_and(|first| first != declaration)
    }
}

#[cfg(test)]
#[path = "tests/hof_call_site.rs"]
mod tests;
