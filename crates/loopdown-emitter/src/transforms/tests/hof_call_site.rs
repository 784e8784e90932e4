use super::*;
use loopdown_parser::parser::parse_source;

/// The call expression whose source text is exactly `text`.
fn call_node(arena: &NodeArena, source: &str, text: &str) -> NodeIndex {
    arena
        .nodes
        .iter()
        .enumerate()
        .find(|(_, node)| {
            node.kind == CALL_EXPRESSION && &source[node.pos as usize..node.end as usize] == text
        })
        .map(|(i, _)| NodeIndex(i as u32))
        .unwrap_or_else(|| panic!("no call `{text}` in `{source}`"))
}

fn call_site(source: &str, text: &str, options: &LoweringOptions) -> Result<HofCallSite, Rejection> {
    let (arena, _, diagnostics) = parse_source("test.js", source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let call = call_node(&arena, source, text);
    CallSiteClassifier::new(&arena, options).call_site(call)
}

fn accepted(source: &str, text: &str) -> HofKind {
    call_site(source, text, &LoweringOptions::default())
        .unwrap_or_else(|rejection| panic!("`{text}` rejected: {rejection:?}"))
        .kind
}

fn rejected(source: &str, text: &str) -> Rejection {
    call_site(source, text, &LoweringOptions::default()).unwrap_err()
}

#[test]
fn test_classifies_all_six_methods() {
    assert_eq!(accepted("xs.forEach(f);", "xs.forEach(f)"), HofKind::ForEach);
    assert_eq!(accepted("var m = xs.map(f);", "xs.map(f)"), HofKind::Map);
    assert_eq!(accepted("var m = xs.filter(f);", "xs.filter(f)"), HofKind::Filter);
    assert_eq!(accepted("var m = xs.every(f);", "xs.every(f)"), HofKind::Every);
    assert_eq!(accepted("var m = xs.some(f);", "xs.some(f)"), HofKind::Some);
    assert_eq!(accepted("var m = xs.reduce(f, 0);", "xs.reduce(f, 0)"), HofKind::Reduce);
}

#[test]
fn test_string_keyed_element_access() {
    assert_eq!(accepted("xs['map'](f);", "xs['map'](f)"), HofKind::Map);
    assert_eq!(accepted("xs[\"some\"](f);", "xs[\"some\"](f)"), HofKind::Some);
    assert_eq!(rejected("xs[name](f);", "xs[name](f)"), Rejection::ComputedKey);
    assert_eq!(rejected("xs[0](f);", "xs[0](f)"), Rejection::ComputedKey);
}

#[test]
fn test_rejects_other_callees() {
    assert_eq!(rejected("map(f);", "map(f)"), Rejection::NotAMemberCall);
    assert_eq!(rejected("xs.find(f);", "xs.find(f)"), Rejection::UnknownMethod);
    assert_eq!(rejected("xs.flatMap(f);", "xs.flatMap(f)"), Rejection::UnknownMethod);
}

#[test]
fn test_arity() {
    assert_eq!(rejected("xs.map();", "xs.map()"), Rejection::Arity(0));
    assert_eq!(rejected("xs.map(f, t, u);", "xs.map(f, t, u)"), Rejection::Arity(3));
    let site = call_site("xs.map(f, ctx);", "xs.map(f, ctx)", &LoweringOptions::default()).unwrap();
    assert!(site.extra.is_some());
}

#[test]
fn test_disabled_kind() {
    let options = LoweringOptions {
        operations: vec![HofKind::Map],
        ..LoweringOptions::default()
    };
    assert_eq!(
        call_site("xs.filter(f);", "xs.filter(f)", &options),
        Err(Rejection::Disabled(HofKind::Filter))
    );
    assert!(call_site("xs.map(f);", "xs.map(f)", &options).is_ok());
}

#[test]
fn test_this_arg_reject_policy() {
    let options = LoweringOptions {
        this_arg: ThisArgPolicy::Reject,
        ..LoweringOptions::default()
    };
    assert_eq!(
        call_site("xs.map(f, ctx);", "xs.map(f, ctx)", &options),
        Err(Rejection::ThisArgRejected(HofKind::Map))
    );
    // reduce's second argument is an initial value, not a thisArg.
    assert!(call_site("xs.reduce(f, 0);", "xs.reduce(f, 0)", &options).is_ok());
    assert!(call_site("xs.map(f);", "xs.map(f)", &options).is_ok());
}

#[test]
fn test_conditional_positions_are_unsafe() {
    let conditional = Rejection::Unsafe(UnsafePosition::Conditional);
    assert_eq!(rejected("var v = c ? xs.map(f) : ys;", "xs.map(f)"), conditional);
    assert_eq!(rejected("var v = c ? ys : xs.map(f);", "xs.map(f)"), conditional);
    assert_eq!(rejected("var v = xs.some(f) ? 1 : 2;", "xs.some(f)"), conditional);
}

#[test]
fn test_logical_right_operand_is_unsafe() {
    let logical = Rejection::Unsafe(UnsafePosition::LogicalRight);
    assert_eq!(rejected("var v = ok && xs.every(f);", "xs.every(f)"), logical);
    assert_eq!(rejected("var v = ok || xs.some(f);", "xs.some(f)"), logical);
    assert_eq!(rejected("var v = ok ?? xs.map(f);", "xs.map(f)"), logical);
    assert_eq!(rejected("var v = ok && (xs.map(f)).length;", "xs.map(f)"), logical);
    assert_eq!(accepted("var v = xs.every(f) && ok;", "xs.every(f)"), HofKind::Every);
    assert_eq!(accepted("var v = n + xs.map(f).length;", "xs.map(f)"), HofKind::Map);
}

#[test]
fn test_loop_headers() {
    assert_eq!(
        rejected("while (xs.some(f)) { g(); }", "xs.some(f)"),
        Rejection::Unsafe(UnsafePosition::LoopTest)
    );
    assert_eq!(
        rejected("do { g(); } while (xs.some(f));", "xs.some(f)"),
        Rejection::Unsafe(UnsafePosition::LoopTest)
    );
    assert_eq!(
        rejected("for (var i = 0; i < xs.filter(f).length; i++) {}", "xs.filter(f)"),
        Rejection::Unsafe(UnsafePosition::LoopTest)
    );
    assert_eq!(
        rejected("for (var i = 0; i < 3; xs.forEach(f)) {}", "xs.forEach(f)"),
        Rejection::Unsafe(UnsafePosition::LoopUpdate)
    );
    assert_eq!(
        accepted("for (var ys = xs.map(f); ys.length; ) {}", "xs.map(f)"),
        HofKind::Map
    );
    assert_eq!(accepted("while (ok) xs.forEach(f);", "xs.forEach(f)"), HofKind::ForEach);
}

#[test]
fn test_function_boundaries() {
    let boundary = Rejection::Unsafe(UnsafePosition::FunctionBoundary);
    assert_eq!(rejected("var g = (ys) => ys.map(f);", "ys.map(f)"), boundary);
    assert_eq!(rejected("function g(ys = xs.map(f)) {}", "xs.map(f)"), boundary);
    assert_eq!(
        accepted("var g = (ys) => { return ys.map(f); };", "ys.map(f)"),
        HofKind::Map
    );
}

#[test]
fn test_later_declarators_are_unsafe() {
    let later = Rejection::Unsafe(UnsafePosition::LaterDeclarator);
    assert_eq!(rejected("const a = [1], b = a.map(f);", "a.map(f)"), later);
    assert_eq!(rejected("var a = [1], b = a.some(f);", "a.some(f)"), later);
    assert_eq!(
        rejected("for (let a = [1], b = a.filter(f); ok; ) {}", "a.filter(f)"),
        later
    );
    assert_eq!(accepted("const b = xs.map(f), a = 1;", "xs.map(f)"), HofKind::Map);
}

#[test]
fn test_if_condition_is_safe() {
    assert_eq!(accepted("if (xs.some(f)) { g(); }", "xs.some(f)"), HofKind::Some);
    assert_eq!(
        accepted("var v = [xs.every(f), 1];", "xs.every(f)"),
        HofKind::Every
    );
}

#[test]
fn test_classify_ignores_position() {
    let source = "var v = c ? xs.map(f) : ys;";
    let (arena, _, _) = parse_source("test.js", source);
    let call = call_node(&arena, source, "xs.map(f)");
    let options = LoweringOptions::default();
    let classifier = CallSiteClassifier::new(&arena, &options);
    assert_eq!(classifier.classify(call), Some(HofKind::Map));
    assert!(!classifier.is_safe_to_rewrite(call, HofKind::Map));
}
