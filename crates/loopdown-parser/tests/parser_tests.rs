//! Parser integration tests.

use loopdown_parser::parser::syntax_kind_ext::*;
use loopdown_parser::parser::{NodeAccess, NodeArena, NodeFlags, NodeIndex, parse_source};
use loopdown_scanner::SyntaxKind;

fn parse_ok(source: &str) -> (NodeArena, NodeIndex) {
    let (arena, root, diagnostics) = parse_source("test.js", source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    (arena, root)
}

fn statements(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let node = arena.get(root).unwrap();
    arena.get_source_file(node).unwrap().statements.nodes.clone()
}

fn expression_of(arena: &NodeArena, statement: NodeIndex) -> NodeIndex {
    let node = arena.get(statement).unwrap();
    arena.get_expression_statement(node).unwrap().expression
}

#[test]
fn test_member_call_with_arrow_callback() {
    let (arena, root) = parse_ok("[1, 2, 3].map(x => x * 2);");
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 1);

    let call = expression_of(&arena, stmts[0]);
    let call_node = arena.get(call).unwrap();
    assert_eq!(call_node.kind, CALL_EXPRESSION);
    let data = arena.get_call_expr(call_node).unwrap();
    let args = data.arguments.as_ref().unwrap();
    assert_eq!(args.len(), 1);

    let callee = arena.get(data.expression).unwrap();
    assert_eq!(callee.kind, PROPERTY_ACCESS_EXPRESSION);
    let access = arena.get_access_expr(callee).unwrap();
    assert_eq!(arena.get_identifier_text(access.name_or_argument), Some("map"));
    assert_eq!(arena.kind(access.expression), Some(ARRAY_LITERAL_EXPRESSION));

    let arrow = arena.get(args.nodes[0]).unwrap();
    assert_eq!(arrow.kind, ARROW_FUNCTION);
    assert!(NodeFlags::from_bits_truncate(arrow.flags).contains(NodeFlags::EXPRESSION_BODY));
}

#[test]
fn test_parent_links() {
    let (arena, root) = parse_ok("var total = xs.reduce(function (a, b) { return a + b; }, 0);");
    let stmt = statements(&arena, root)[0];
    assert_eq!(arena.parent_of(stmt), root);
    for child in arena.get_children(stmt) {
        assert_eq!(arena.parent_of(child), stmt);
    }
    let call = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind(i) == Some(CALL_EXPRESSION))
        .unwrap();
    for child in arena.get_children(call) {
        assert_eq!(arena.parent_of(child), call);
    }
}

#[test]
fn test_precedence_and_associativity() {
    let (arena, root) = parse_ok("a = b || c && d;");
    let assign = expression_of(&arena, statements(&arena, root)[0]);
    let data = arena.get_binary_expr(arena.get(assign).unwrap()).unwrap();
    assert_eq!(data.operator_token, SyntaxKind::EqualsToken as u16);
    let or = arena.get_binary_expr(arena.get(data.right).unwrap()).unwrap();
    assert_eq!(or.operator_token, SyntaxKind::BarBarToken as u16);
    let and = arena.get_binary_expr(arena.get(or.right).unwrap()).unwrap();
    assert_eq!(and.operator_token, SyntaxKind::AmpersandAmpersandToken as u16);

    let (arena, root) = parse_ok("2 ** 3 ** 2;");
    let pow = expression_of(&arena, statements(&arena, root)[0]);
    let data = arena.get_binary_expr(arena.get(pow).unwrap()).unwrap();
    assert_eq!(arena.kind(data.left), Some(SyntaxKind::NumericLiteral as u16));
    assert_eq!(arena.kind(data.right), Some(BINARY_EXPRESSION));
}

#[test]
fn test_conditional_and_computed_member() {
    let (arena, root) = parse_ok("var r = ok ? xs['filter'](f) : [];");
    let call = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind(i) == Some(CALL_EXPRESSION))
        .unwrap();
    let parent = arena.parent_of(call);
    assert_eq!(arena.kind(parent), Some(CONDITIONAL_EXPRESSION));
    let data = arena.get_call_expr(arena.get(call).unwrap()).unwrap();
    let access = arena.get_access_expr(arena.get(data.expression).unwrap()).unwrap();
    assert_eq!(arena.get_literal_text(access.name_or_argument), Some("filter"));
    assert_eq!(statements(&arena, root).len(), 1);
}

#[test]
fn test_statements() {
    let source = r#"
        let i = 0
        const s = "x"
        function f(a, b = 2) { return a + b }
        for (var j = 0; j < 3; j++) { if (j) continue; else break; }
        while (i < 3) i++;
        do { i--; } while (i > 0);
        ;
        throw new TypeError("boom");
    "#;
    let (arena, root) = parse_ok(source);
    let kinds: Vec<u16> = statements(&arena, root)
        .into_iter()
        .map(|s| arena.kind(s).unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            VARIABLE_STATEMENT,
            VARIABLE_STATEMENT,
            FUNCTION_DECLARATION,
            FOR_STATEMENT,
            WHILE_STATEMENT,
            DO_STATEMENT,
            EMPTY_STATEMENT,
            THROW_STATEMENT,
        ]
    );
}

#[test]
fn test_let_and_const_flags() {
    let (arena, root) = parse_ok("let a = 1; const b = 2; var c;");
    let flags: Vec<NodeFlags> = statements(&arena, root)
        .into_iter()
        .map(|s| {
            let stmt = arena.get_variable(arena.get(s).unwrap()).unwrap();
            NodeFlags::from_bits_truncate(arena.get(stmt.declarations.nodes[0]).unwrap().flags)
        })
        .collect();
    assert_eq!(flags, vec![NodeFlags::LET, NodeFlags::CONST, NodeFlags::NONE]);
}

#[test]
fn test_object_literal_and_new() {
    let (arena, root) = parse_ok("var o = { a: 1, 'b': [2], c }; var e = new Error;");
    let stmts = statements(&arena, root);
    assert_eq!(stmts.len(), 2);
    let new_expr = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind(i) == Some(NEW_EXPRESSION))
        .unwrap();
    assert!(arena.get_call_expr(arena.get(new_expr).unwrap()).unwrap().arguments.is_none());
}

#[test]
fn test_parenthesized_arrow_with_block_body() {
    let (arena, _) = parse_ok("xs.forEach((x, i) => { log(x, i); });");
    let arrow = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&i| arena.kind(i) == Some(ARROW_FUNCTION))
        .unwrap();
    let node = arena.get(arrow).unwrap();
    let data = arena.get_function(node).unwrap();
    assert_eq!(data.parameters.len(), 2);
    assert_eq!(arena.kind(data.body), Some(BLOCK));
    assert!(!NodeFlags::from_bits_truncate(node.flags).contains(NodeFlags::EXPRESSION_BODY));
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
    let (arena, root) = parse_ok("(a + b) * c;");
    let expr = expression_of(&arena, statements(&arena, root)[0]);
    let data = arena.get_binary_expr(arena.get(expr).unwrap()).unwrap();
    assert_eq!(arena.kind(data.left), Some(PARENTHESIZED_EXPRESSION));
}

#[test]
fn test_syntax_errors_are_reported() {
    let (_, _, diagnostics) = parse_source("bad.js", "var = ;");
    assert!(!diagnostics.is_empty());

    let (_, _, diagnostics) = parse_source("bad.js", "f(1;");
    assert!(diagnostics.iter().any(|d| d.message == "')' expected."));

    let (_, _, diagnostics) = parse_source("bad.js", "1 = 2;");
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_unsupported_syntax() {
    let (_, _, diagnostics) = parse_source("bad.js", "for (var k in o) {}");
    assert!(!diagnostics.is_empty());
    let (_, _, diagnostics) = parse_source("bad.js", "var a = [1,,2];");
    assert!(!diagnostics.is_empty());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("{}1{};", "(".repeat(700), ")".repeat(700));
            let (_, _, diagnostics) = parse_source("deep.js", source);
            diagnostics
        })
        .unwrap();
    let diagnostics = handle.join().unwrap();
    assert!(
        diagnostics
            .iter()
            .any(|d| d.message == "Maximum nesting depth exceeded.")
    );
}

#[test]
fn test_long_operator_chain_is_limited() {
    let source = format!("var r = 1{};", " + 1".repeat(200_000));
    let (_, _, diagnostics) = parse_source("chain.js", source);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, 1201);
    assert_eq!(diagnostics[0].message, "Maximum nesting depth exceeded.");
}

#[test]
fn test_long_member_and_comma_chains_are_limited() {
    for source in [
        format!("x{};", ".y".repeat(5_000)),
        format!("f{};", "()".repeat(5_000)),
        format!("a{};", ", a".repeat(5_000)),
    ] {
        let (_, _, diagnostics) = parse_source("chain.js", source);
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert_eq!(diagnostics[0].code, 1201);
    }
}

#[test]
fn test_operator_chain_under_limit_parses() {
    parse_ok(&format!("var r = 1{};", " + 1".repeat(300)));
    parse_ok(&format!("x{};", ".map(f)".repeat(100)));
}

#[test]
fn test_garbage_input_terminates() {
    let (_, _, diagnostics) = parse_source("junk.js", ") ] } : ? =>");
    assert!(!diagnostics.is_empty());
}
