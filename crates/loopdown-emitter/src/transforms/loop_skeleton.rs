//! The fixed loop shape every lowered call fills.
//!
//! ```text
//! var A = receiver;
//! var I = 0;
//! var F = callback;
//! [var T = thisArg;]
//! ...pre_loop
//! for (; I < A.length; I++) {
//!     ...pre_callback
//!     callback
//!     ...post_callback
//! }
//! ...post_loop
//! ```
//!
//! The length is re-read on every iteration.

use crate::error::LoweringError;
use crate::transforms::hof_loops_ir::HofKind;
use crate::transforms::ir::IRNode;

/// Names bound by the skeleton itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopBindings {
    pub array: String,
    pub index: String,
    pub callback: String,
    pub this_binding: Option<String>,
}

#[derive(Debug)]
pub struct LoopSkeleton {
    kind: HofKind,
    bindings: LoopBindings,
    array_init: IRNode,
    callback_init: IRNode,
    this_init: Option<IRNode>,
    pub pre_loop: Vec<IRNode>,
    pub pre_callback: Vec<IRNode>,
    /// The statement invoking the callback. Required.
    pub callback: Option<IRNode>,
    pub post_callback: Vec<IRNode>,
    pub post_loop: Vec<IRNode>,
}

impl LoopSkeleton {
    /// `this_init` must be present exactly when `bindings.this_binding` is.
    pub fn new(
        kind: HofKind,
        bindings: LoopBindings,
        array_init: IRNode,
        callback_init: IRNode,
        this_init: Option<IRNode>,
    ) -> Self {
        LoopSkeleton {
            kind,
            bindings,
            array_init,
            callback_init,
            this_init,
            pre_loop: Vec::new(),
            pre_callback: Vec::new(),
            callback: None,
            post_callback: Vec::new(),
            post_loop: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &LoopBindings {
        &self.bindings
    }

    pub fn array(&self) -> IRNode {
        IRNode::id(&self.bindings.array)
    }

    pub fn index(&self) -> IRNode {
        IRNode::id(&self.bindings.index)
    }

    /// `A[I]`
    pub fn current_element(&self) -> IRNode {
        IRNode::elem(self.array(), self.index())
    }

    /// Invoke the captured callback: `F(args)` or `F.call(T, args)`.
    pub fn invoke(&self, args: Vec<IRNode>) -> IRNode {
        let callback = IRNode::id(&self.bindings.callback);
        match &self.bindings.this_binding {
            Some(this_binding) => {
                let mut call_args = Vec::with_capacity(args.len() + 1);
                call_args.push(IRNode::id(this_binding));
                call_args.extend(args);
                IRNode::call(IRNode::prop(callback, "call"), call_args)
            }
            None => IRNode::call(callback, args),
        }
    }

    /// Assemble the statements in slot order.
    pub fn build(self) -> Result<Vec<IRNode>, LoweringError> {
        let callback = self
            .callback
            .ok_or(LoweringError::MissingCallbackSlot {
                kind: self.kind.method_name(),
            })?;
        let LoopBindings {
            array,
            index,
            callback: callback_name,
            this_binding,
        } = self.bindings;

        let mut statements = Vec::with_capacity(
            5 + self.pre_loop.len() + self.post_loop.len(),
        );
        statements.push(IRNode::var_decl(&array, Some(self.array_init)));
        statements.push(IRNode::var_decl(&index, Some(IRNode::number("0"))));
        statements.push(IRNode::var_decl(&callback_name, Some(self.callback_init)));
        if let (Some(this_binding), Some(this_init)) = (this_binding, self.this_init) {
            statements.push(IRNode::var_decl(this_binding, Some(this_init)));
        }
        statements.extend(self.pre_loop);

        let mut body = self.pre_callback;
        body.push(callback);
        body.extend(self.post_callback);
        statements.push(IRNode::ForStatement {
            initializer: None,
            condition: Some(Box::new(IRNode::binary(
                IRNode::id(&index),
                "<",
                IRNode::prop(IRNode::id(&array), "length"),
            ))),
            incrementor: Some(Box::new(IRNode::post_increment(IRNode::id(&index)))),
            body: Box::new(IRNode::block(body)),
        });

        statements.extend(self.post_loop);
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(this_binding: Option<&str>) -> LoopBindings {
        LoopBindings {
            array: "_a".into(),
            index: "_i".into(),
            callback: "_f".into(),
            this_binding: this_binding.map(Into::into),
        }
    }

    #[test]
    fn test_missing_callback_is_an_error() {
        let skeleton = LoopSkeleton::new(
            HofKind::Map,
            bindings(None),
            IRNode::id("xs"),
            IRNode::id("g"),
            None,
        );
        assert_eq!(
            skeleton.build(),
            Err(LoweringError::MissingCallbackSlot { kind: "map" })
        );
    }

    #[test]
    fn test_slot_order() {
        let mut skeleton = LoopSkeleton::new(
            HofKind::ForEach,
            bindings(Some("_t")),
            IRNode::id("xs"),
            IRNode::id("g"),
            Some(IRNode::id("ctx")),
        );
        skeleton.pre_loop.push(IRNode::expr_stmt(IRNode::id("pre")));
        skeleton.post_loop.push(IRNode::expr_stmt(IRNode::id("post")));
        skeleton.callback = Some(IRNode::expr_stmt(skeleton.invoke(vec![])));
        let statements = skeleton.build().unwrap();

        assert_eq!(statements.len(), 7);
        assert_eq!(statements[0], IRNode::var_decl("_a", Some(IRNode::id("xs"))));
        assert_eq!(statements[1], IRNode::var_decl("_i", Some(IRNode::number("0"))));
        assert_eq!(statements[2], IRNode::var_decl("_f", Some(IRNode::id("g"))));
        assert_eq!(statements[3], IRNode::var_decl("_t", Some(IRNode::id("ctx"))));
        assert_eq!(statements[4], IRNode::expr_stmt(IRNode::id("pre")));
        assert!(matches!(statements[5], IRNode::ForStatement { .. }));
        assert_eq!(statements[6], IRNode::expr_stmt(IRNode::id("post")));
    }

    #[test]
    fn test_invoke_threads_this() {
        let skeleton = LoopSkeleton::new(
            HofKind::Some,
            bindings(Some("_t")),
            IRNode::id("xs"),
            IRNode::id("g"),
            Some(IRNode::id("ctx")),
        );
        assert_eq!(
            skeleton.invoke(vec![IRNode::id("_e")]),
            IRNode::call(
                IRNode::prop(IRNode::id("_f"), "call"),
                vec![IRNode::id("_t"), IRNode::id("_e")]
            )
        );
    }
}
