//! Node flags packed into [`Node::flags`](super::node::Node).

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const NONE = 0;
        /// `let` declaration list.
        const LET = 1 << 0;
        /// `const` declaration list.
        const CONST = 1 << 1;
        /// Node (or one of its descendants) failed to parse.
        const THIS_NODE_HAS_ERROR = 1 << 2;
        /// Arrow function whose body is an expression, not a block.
        const EXPRESSION_BODY = 1 << 3;
        /// Property access/call reached through an optional chain.
        const OPTIONAL_CHAIN = 1 << 4;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}
