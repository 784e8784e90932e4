//! Lowering Pass - Phase 1 of the Transform/Print Architecture
//!
//! Walks the AST read-only and records a [`TransformDirective`] for every
//! array method call it lowers. The [`Printer`](crate::Printer) applies the
//! directives in phase 2.
//!
//! # Rewriting a call
//!
//! ```javascript
//! var doubled = xs.map(double);
//! ```
//!
//! The generated loop is spliced before the enclosing statement and the
//! call is replaced by the loop's result binding:
//!
//! ```javascript
//! var _a = xs;
//! var _i = 0;
//! var _f = double;
//! var _r = [];
//! for (; _i < _a.length; _i++) { ... }
//! var doubled = _r;
//! ```
//!
//! When the call is the whole expression of an expression statement, the
//! statement is replaced outright instead, since its value is discarded.
//!
//! # Order
//!
//! Children are visited before their parent, so in `xs.map(f).filter(g)`
//! the `map` loop is recorded first and the `filter` loop reads its result.
//! Loops for calls sharing a statement are spliced in the order the calls
//! complete evaluation.
//!
//! A lowerable call inside the callback or second argument of another
//! lowered call is not hoisted past the outer receiver. Its loop goes into
//! the outer call's generated statements, right before the `var` capturing
//! that argument:
//!
//! ```javascript
//! var ys = getXs().map(wrap(zs.map(g)));
//! ```
//!
//! ```javascript
//! var _a2 = getXs();
//! var _i2 = 0;
//! var _a = zs;
//! ...
//! var _f2 = wrap(_r);
//! ```

use loopdown_common::limits::MAX_AST_DEPTH;
use loopdown_parser::parser::syntax_kind_ext::{CALL_EXPRESSION, EXPRESSION_STATEMENT};
use std::cmp::Reverse;
use loopdown_parser::parser::{NodeAccess, NodeArena, NodeIndex};
use loopdown_parser::syntax::transform_utils::{
    collect_identifier_names, enclosing_statement, is_function_like, skip_parentheses,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::LoweringError;
use crate::options::LoweringOptions;
use crate::transform_context::TransformContext;
use crate::transforms::hof_call_site::{CallSiteClassifier, HofCallSite};
use crate::transforms::hof_loops_ir::{HofKind, LoweredCall};
use crate::transforms::ir::IRNode;
use crate::transforms::name_allocator::NameAllocator;

/// How a lowered call's enclosing statement was changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RewriteMode {
    /// The statement was the call; it was replaced by the loop.
    ReplaceStatement,
    /// The loop was inserted before the statement and the call replaced
    /// by its value.
    HoistBefore,
}

/// One lowered call, for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRecord {
    pub kind: HofKind,
    /// Source range of the original call.
    pub pos: u32,
    pub end: u32,
    pub mode: RewriteMode,
}

#[derive(Debug, Default)]
pub struct LoweringResult {
    pub transforms: TransformContext,
    /// In the order the calls were lowered.
    pub rewrites: Vec<RewriteRecord>,
}

/// Lowering pass - Phase 1 of emission
pub struct LoweringPass<'a> {
    arena: &'a NodeArena,
    classifier: CallSiteClassifier<'a>,
    transforms: TransformContext,
    rewrites: Vec<RewriteRecord>,
    names: NameAllocator,
    /// Loops collected while visiting an argument of a lowered call. `None`
    /// marks a function body, whose calls hoist to their own statements.
    captures: Vec<Option<Vec<IRNode>>>,
    /// Current recursion depth for stack overflow protection
    visit_depth: u32,
    depth_exceeded: bool,
}

impl<'a> LoweringPass<'a> {
    pub fn new(arena: &'a NodeArena, options: &'a LoweringOptions) -> Self {
        LoweringPass {
            arena,
            classifier: CallSiteClassifier::new(arena, options),
            transforms: TransformContext::new(),
            rewrites: Vec::new(),
            names: NameAllocator::new(Default::default()),
            captures: Vec::new(),
            visit_depth: 0,
            depth_exceeded: false,
        }
    }

    /// Run the pass over the tree rooted at `root` (normally a source file).
    pub fn run(mut self, root: NodeIndex) -> Result<LoweringResult, LoweringError> {
        self.names = NameAllocator::new(collect_identifier_names(self.arena, root));
        self.visit(root)?;
        debug!(rewrites = self.rewrites.len(), "lowering pass complete");
        Ok(LoweringResult {
            transforms: self.transforms,
            rewrites: self.rewrites,
        })
    }

    fn visit(&mut self, idx: NodeIndex) -> Result<(), LoweringError> {
        if self.visit_depth >= MAX_AST_DEPTH {
            if !self.depth_exceeded {
                warn!(depth = self.visit_depth, "AST too deep; inner calls left as written");
                self.depth_exceeded = true;
            }
            return Ok(());
        }
        let Some(node) = self.arena.get(idx) else {
            return Ok(());
        };
        let kind = node.kind;

        self.visit_depth += 1;
        let function_scope = is_function_like(kind);
        if function_scope {
            self.names.enter_scope();
            self.captures.push(None);
        }

        let result = if kind == CALL_EXPRESSION {
            self.visit_call(idx)
        } else {
            self.visit_children(idx)
        };

        if function_scope {
            self.captures.pop();
            self.names.exit_scope();
        }
        self.visit_depth -= 1;
        result
    }

    fn visit_children(&mut self, idx: NodeIndex) -> Result<(), LoweringError> {
        for child in self.arena.get_children(idx) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit_call(&mut self, call: NodeIndex) -> Result<(), LoweringError> {
        let site = match self.classifier.call_site(call) {
            Ok(site) => site,
            Err(rejection) => {
                trace!(call = call.0, ?rejection, "call left as written");
                return self.visit_children(call);
            }
        };
        let callee = self
            .arena
            .get(call)
            .and_then(|node| self.arena.get_call_expr(node))
            .map_or(NodeIndex::NONE, |data| data.expression);
        self.visit(callee)?;
        let nested = self.visit_arguments(&site)?;
        self.lower_call(&site, nested)
    }

    /// Visit the callback and second argument of `site`, collecting the
    /// loops of calls inside each one.
    fn visit_arguments(
        &mut self,
        site: &HofCallSite,
    ) -> Result<Vec<(NodeIndex, Vec<IRNode>)>, LoweringError> {
        let mut nested = Vec::new();
        for argument in std::iter::once(site.callback).chain(site.extra) {
            self.captures.push(Some(Vec::new()));
            let visited = self.visit(argument);
            let statements = self.captures.pop().flatten().unwrap_or_default();
            visited?;
            if !statements.is_empty() {
                nested.push((argument, statements));
            }
        }
        Ok(nested)
    }

    /// Put each argument's loops right before the statement capturing it.
    fn place_nested(
        &self,
        site: &HofCallSite,
        lowered: &mut LoweredCall,
        nested: Vec<(NodeIndex, Vec<IRNode>)>,
    ) -> Result<(), LoweringError> {
        let mut placed = Vec::with_capacity(nested.len());
        for (argument, statements) in nested {
            let position = lowered.capture_position(argument).ok_or_else(|| {
                LoweringError::MalformedCallSite {
                    pos: self.arena.pos_end(site.call).unwrap_or_default().0,
                    reason: "argument has no capture",
                }
            })?;
            placed.push((position, statements));
        }
        // Later positions first so earlier ones stay valid.
        placed.sort_by_key(|(position, _)| Reverse(*position));
        for (position, statements) in placed {
            lowered.statements.splice(position..position, statements);
        }
        Ok(())
    }

    fn lower_call(
        &mut self,
        site: &HofCallSite,
        nested: Vec<(NodeIndex, Vec<IRNode>)>,
    ) -> Result<(), LoweringError> {
        let (pos, end) = self.arena.pos_end(site.call).unwrap_or_default();
        if site.receiver.is_none() || site.callback.is_none() {
            return Err(LoweringError::MalformedCallSite {
                pos,
                reason: "missing receiver or callback",
            });
        }
        let statement = enclosing_statement(self.arena, site.call);
        if statement.is_none() {
            return Err(LoweringError::MissingEnclosingStatement { pos });
        }

        let mut lowered = site.kind.lower(site, &mut self.names)?;
        self.place_nested(site, &mut lowered, nested)?;
        let LoweredCall { statements, value } = lowered;

        let mode = if let Some(Some(pending)) = self.captures.last_mut() {
            pending.extend(statements);
            self.transforms.substitute(site.call, value);
            RewriteMode::HoistBefore
        } else if self.is_whole_expression_statement(statement, site.call) {
            self.transforms.replace_statement(statement, statements);
            RewriteMode::ReplaceStatement
        } else {
            self.transforms.splice_before(statement, statements);
            self.transforms.substitute(site.call, value);
            RewriteMode::HoistBefore
        };

        debug!(kind = %site.kind, pos, end, ?mode, "lowered call");
        self.rewrites.push(RewriteRecord {
            kind: site.kind,
            pos,
            end,
            mode,
        });
        Ok(())
    }

    /// Whether `statement` is `call;` (ignoring parentheses).
    fn is_whole_expression_statement(&self, statement: NodeIndex, call: NodeIndex) -> bool {
        self.arena
            .get(statement)
            .filter(|node| node.kind == EXPRESSION_STATEMENT)
            .and_then(|node| self.arena.get_expression_statement(node))
            .is_some_and(|data| skip_parentheses(self.arena, data.expression) == call)
    }
}
