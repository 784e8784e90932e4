//! Loop bodies for the six lowered array operations.
//!
//! Every operation fills the same [`LoopSkeleton`]; they differ only in
//! what runs before the loop, around the callback, and what value replaces
//! the original call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoweringError;
use crate::transforms::hof_call_site::HofCallSite;
use crate::transforms::ir::IRNode;
use crate::transforms::loop_skeleton::{LoopBindings, LoopSkeleton};
use crate::transforms::name_allocator::NameAllocator;
use loopdown_parser::parser::NodeIndex;

const REDUCE_EMPTY_MESSAGE: &str = "Reduce of empty array with no initial value";

/// An array method the lowering pass knows how to rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HofKind {
    ForEach,
    Map,
    Filter,
    Every,
    Some,
    Reduce,
}

impl HofKind {
    pub const ALL: [HofKind; 6] = [
        HofKind::ForEach,
        HofKind::Map,
        HofKind::Filter,
        HofKind::Every,
        HofKind::Some,
        HofKind::Reduce,
    ];

    pub fn from_method_name(name: &str) -> Option<Self> {
        match name {
            "forEach" => Some(Self::ForEach),
            "map" => Some(Self::Map),
            "filter" => Some(Self::Filter),
            "every" => Some(Self::Every),
            "some" => Some(Self::Some),
            "reduce" => Some(Self::Reduce),
            _ => None,
        }
    }

    pub const fn method_name(self) -> &'static str {
        match self {
            Self::ForEach => "forEach",
            Self::Map => "map",
            Self::Filter => "filter",
            Self::Every => "every",
            Self::Some => "some",
            Self::Reduce => "reduce",
        }
    }

    /// Whether a second argument is a `thisArg` (as opposed to `reduce`'s
    /// initial value).
    pub const fn accepts_this_arg(self) -> bool {
        !matches!(self, Self::Reduce)
    }

    /// Operations that bind the element and the callback result per iteration.
    pub const fn is_collecting(self) -> bool {
        !matches!(self, Self::ForEach)
    }

    /// Build the statements and replacement value for `site`.
    ///
    /// Names are drawn from `names` in a fixed order (array, index,
    /// callback, this, element, result, accumulator) so output is stable.
    pub fn lower(
        self,
        site: &HofCallSite,
        names: &mut NameAllocator,
    ) -> Result<LoweredCall, LoweringError> {
        let this_init = site
            .extra
            .filter(|_| self.accepts_this_arg())
            .map(IRNode::ASTRef);

        let bindings = LoopBindings {
            array: names.fresh_name("a"),
            index: names.fresh_name("i"),
            callback: names.fresh_name("f"),
            this_binding: this_init.as_ref().map(|_| names.fresh_name("t")),
        };
        let mut skeleton = LoopSkeleton::new(
            self,
            bindings,
            IRNode::ASTRef(site.receiver),
            IRNode::ASTRef(site.callback),
            this_init,
        );

        let value = match self {
            Self::ForEach => {
                let args = vec![skeleton.current_element(), skeleton.index(), skeleton.array()];
                skeleton.callback = Some(IRNode::expr_stmt(skeleton.invoke(args)));
                IRNode::void_0()
            }
            Self::Map | Self::Filter | Self::Every | Self::Some => {
                let slots = bind_element(&mut skeleton, names);
                let result = names.fresh_name("r");
                let args = vec![IRNode::id(&slots.element), skeleton.index(), skeleton.array()];
                skeleton.callback = Some(slots.assign_result(skeleton.invoke(args)));
                self.fill_predicate(&mut skeleton, &slots, &result);
                IRNode::id(result)
            }
            Self::Reduce => {
                let slots = bind_element(&mut skeleton, names);
                let acc = names.fresh_name("acc");
                fill_reduce_prelude(&mut skeleton, &acc, site.extra);
                let args = vec![
                    IRNode::id(&acc),
                    IRNode::id(&slots.element),
                    skeleton.index(),
                    skeleton.array(),
                ];
                skeleton.callback = Some(slots.assign_result(skeleton.invoke(args)));
                let store = IRNode::expr_stmt(IRNode::assign(IRNode::id(&acc), slots.result()));
                skeleton.post_callback.push(store);
                IRNode::id(acc)
            }
        };

        Ok(LoweredCall {
            statements: skeleton.build()?,
            value,
        })
    }

    fn fill_predicate(self, skeleton: &mut LoopSkeleton, slots: &ElementSlots, result: &str) {
        let result_id = || IRNode::id(result);
        let push = |value: IRNode| {
            IRNode::expr_stmt(IRNode::call(IRNode::prop(result_id(), "push"), vec![value]))
        };
        let short_circuit = |value: bool| {
            vec![
                IRNode::expr_stmt(IRNode::assign(result_id(), IRNode::bool(value))),
                IRNode::BreakStatement,
            ]
        };

        let (initial, post) = match self {
            Self::Map => (IRNode::empty_array(), push(slots.result())),
            Self::Filter => (
                IRNode::empty_array(),
                IRNode::if_then(slots.result(), vec![push(IRNode::id(&slots.element))]),
            ),
            Self::Every => (
                IRNode::bool(true),
                IRNode::if_then(IRNode::not(slots.result()), short_circuit(false)),
            ),
            Self::Some => (
                IRNode::bool(false),
                IRNode::if_then(slots.result(), short_circuit(true)),
            ),
            Self::ForEach | Self::Reduce => return,
        };
        skeleton.pre_loop.push(IRNode::var_decl(result, Some(initial)));
        skeleton.post_callback.push(post);
    }
}

impl fmt::Display for HofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for HofKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_method_name(s).ok_or_else(|| {
            format!("unknown operation `{s}` (expected forEach|map|filter|every|some|reduce)")
        })
    }
}

/// Generated code for one lowered call.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredCall {
    /// Statements to run before the enclosing statement.
    pub statements: Vec<IRNode>,
    /// Expression standing in for the original call.
    pub value: IRNode,
}

impl LoweredCall {
    /// Index of the `var` statement that evaluates `argument`.
    pub fn capture_position(&self, argument: NodeIndex) -> Option<usize> {
        self.statements.iter().position(|statement| {
            matches!(
                statement,
                IRNode::VarDecl { initializer: Some(init), .. }
                    if **init == IRNode::ASTRef(argument)
            )
        })
    }
}

/// Per-iteration element and callback-result bindings.
struct ElementSlots {
    element: String,
    result: String,
}

impl ElementSlots {
    fn result(&self) -> IRNode {
        IRNode::id(&self.result)
    }

    /// `Z = call;`
    fn assign_result(&self, call: IRNode) -> IRNode {
        IRNode::expr_stmt(IRNode::assign(self.result(), call))
    }
}

/// `var E = A[I]; var Z;`
fn bind_element(skeleton: &mut LoopSkeleton, names: &mut NameAllocator) -> ElementSlots {
    let slots = ElementSlots {
        element: names.fresh_name("e"),
        result: names.fresh_name("z"),
    };
    let element = IRNode::var_decl(&slots.element, Some(skeleton.current_element()));
    skeleton.pre_callback.push(element);
    skeleton.pre_callback.push(IRNode::var_decl(&slots.result, None));
    slots
}

fn fill_reduce_prelude(
    skeleton: &mut LoopSkeleton,
    acc: &str,
    initial_value: Option<NodeIndex>,
) {
    if let Some(initial_value) = initial_value {
        skeleton
            .pre_loop
            .push(IRNode::var_decl(acc, Some(IRNode::ASTRef(initial_value))));
        return;
    }

    let length = IRNode::prop(skeleton.array(), "length");
    let type_error = IRNode::new_expr(
        IRNode::id("TypeError"),
        vec![IRNode::string(REDUCE_EMPTY_MESSAGE)],
    );
    let guard = IRNode::if_then(
        IRNode::binary(length, "===", IRNode::number("0")),
        vec![IRNode::throw(type_error)],
    );
    let first = IRNode::var_decl(acc, Some(IRNode::elem(skeleton.array(), IRNode::number("0"))));
    let skip_first = IRNode::expr_stmt(IRNode::assign(skeleton.index(), IRNode::number("1")));
    skeleton.pre_loop.extend([guard, first, skip_first]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn site(kind: HofKind, extra: Option<NodeIndex>) -> HofCallSite {
        HofCallSite {
            call: NodeIndex(0),
            kind,
            receiver: NodeIndex(1),
            callback: NodeIndex(2),
            extra,
        }
    }

    fn lower(kind: HofKind, extra: Option<NodeIndex>) -> LoweredCall {
        let mut names = NameAllocator::new(FxHashSet::default());
        kind.lower(&site(kind, extra), &mut names).unwrap()
    }

    #[test]
    fn test_method_names_round_trip() {
        for kind in HofKind::ALL {
            assert_eq!(HofKind::from_method_name(kind.method_name()), Some(kind));
            assert_eq!(kind.to_string().parse::<HofKind>(), Ok(kind));
        }
        assert_eq!(HofKind::from_method_name("flatMap"), None);
        assert!("find".parse::<HofKind>().is_err());
    }

    #[test]
    fn test_for_each_value_is_undefined() {
        let lowered = lower(HofKind::ForEach, None);
        assert_eq!(lowered.value, IRNode::void_0());
        assert_eq!(lowered.statements.len(), 4);
    }

    #[test]
    fn test_map_value_is_result_array() {
        let lowered = lower(HofKind::Map, None);
        assert_eq!(lowered.value, IRNode::id("_r"));
        assert_eq!(
            lowered.statements[3],
            IRNode::var_decl("_r", Some(IRNode::empty_array()))
        );
    }

    #[test]
    fn test_this_arg_binds_t() {
        let lowered = lower(HofKind::Some, Some(NodeIndex(3)));
        assert_eq!(
            lowered.statements[3],
            IRNode::var_decl("_t", Some(IRNode::ASTRef(NodeIndex(3))))
        );
    }

    #[test]
    fn test_reduce_initial_value_is_not_this() {
        let lowered = lower(HofKind::Reduce, Some(NodeIndex(3)));
        assert_eq!(lowered.value, IRNode::id("_acc"));
        assert_eq!(
            lowered.statements[3],
            IRNode::var_decl("_acc", Some(IRNode::ASTRef(NodeIndex(3))))
        );
    }

    #[test]
    fn test_reduce_without_initial_value_guards_empty() {
        let lowered = lower(HofKind::Reduce, None);
        let IRNode::IfStatement { then_branch, .. } = &lowered.statements[3] else {
            panic!("expected empty-array guard, got {:?}", lowered.statements[3]);
        };
        assert_eq!(
            **then_branch,
            IRNode::block(vec![IRNode::throw(IRNode::new_expr(
                IRNode::id("TypeError"),
                vec![IRNode::string(REDUCE_EMPTY_MESSAGE)]
            ))])
        );
        assert_eq!(
            lowered.statements[5],
            IRNode::expr_stmt(IRNode::assign(IRNode::id("_i"), IRNode::number("1")))
        );
    }
}
