use super::*;
use crate::parser::parse_source;
use crate::parser::syntax_kind_ext::{CALL_EXPRESSION, EXPRESSION_STATEMENT, RETURN_STATEMENT};

fn find_first(arena: &NodeArena, kind: u16) -> NodeIndex {
    (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind(i) == Some(kind))
        .unwrap_or(NodeIndex::NONE)
}

#[test]
fn test_collect_identifier_names_includes_property_names() {
    let (arena, root, diags) = parse_source("t.js", "var _a = xs.map(function (x) { return x.y; });");
    assert!(diags.is_empty(), "{diags:?}");
    let names = collect_identifier_names(&arena, root);
    for expected in ["_a", "xs", "map", "x", "y"] {
        assert!(names.contains(expected), "missing {expected}");
    }
    assert_eq!(names.len(), 5);
}

#[test]
fn test_enclosing_statement_and_function() {
    let (arena, _, diags) = parse_source("t.js", "function f() { return g(1); }");
    assert!(diags.is_empty());
    let call = find_first(&arena, CALL_EXPRESSION);
    let statement = enclosing_statement(&arena, call);
    assert_eq!(arena.kind(statement), Some(RETURN_STATEMENT));
    let function = enclosing_function(&arena, call);
    assert!(is_function_like(arena.kind(function).unwrap()));
}

#[test]
fn test_top_level_call_has_no_enclosing_function() {
    let (arena, _, _) = parse_source("t.js", "g(1);");
    let call = find_first(&arena, CALL_EXPRESSION);
    assert!(enclosing_function(&arena, call).is_none());
    assert_eq!(
        arena.kind(enclosing_statement(&arena, call)),
        Some(EXPRESSION_STATEMENT)
    );
}

#[test]
fn test_skip_parentheses() {
    let (arena, _, _) = parse_source("t.js", "(((g(1))));");
    let call = find_first(&arena, CALL_EXPRESSION);
    let statement = enclosing_statement(&arena, call);
    let expression = arena
        .get_expression_statement(arena.get(statement).unwrap())
        .unwrap()
        .expression;
    assert_eq!(skip_parentheses(&arena, expression), call);
}
