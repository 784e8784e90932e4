//! Syntax utilities over the arena AST.

pub mod transform_utils;
