//! End-to-end lowering: source in, JavaScript out.

use loopdown_emitter::lowering_pass::RewriteMode;
use loopdown_emitter::{
    HofKind, LowerSourceError, LoweredFile, LoweringOptions, ThisArgPolicy, lower_source,
};

fn lower_with(source: &str, options: &LoweringOptions) -> LoweredFile {
    lower_source("test.js", source, options)
        .unwrap_or_else(|err| panic!("lowering failed: {err}"))
}

fn lower(source: &str) -> String {
    lower_with(source, &LoweringOptions::default()).output
}

#[test]
fn test_for_each_statement_is_replaced() {
    let output = lower("xs.forEach(log);");
    assert_eq!(
        output,
        "var _a = xs;\n\
         var _i = 0;\n\
         var _f = log;\n\
         for (; _i < _a.length; _i++) {\n    \
             _f(_a[_i], _i, _a);\n\
         }\n"
    );
}

#[test]
fn test_map_in_initializer() {
    let output = lower("var ys = xs.map(double);");
    assert_eq!(
        output,
        "var _a = xs;\n\
         var _i = 0;\n\
         var _f = double;\n\
         var _r = [];\n\
         for (; _i < _a.length; _i++) {\n    \
             var _e = _a[_i];\n    \
             var _z;\n    \
             _z = _f(_e, _i, _a);\n    \
             _r.push(_z);\n\
         }\n\
         var ys = _r;\n"
    );
}

#[test]
fn test_filter_pushes_element() {
    let output = lower("var odd = xs.filter(isOdd);");
    assert!(
        output.contains(
            "    _z = _f(_e, _i, _a);\n    \
             if (_z) {\n        \
                 _r.push(_e);\n    \
             }\n"
        ),
        "{output}"
    );
    assert!(output.ends_with("var odd = _r;\n"), "{output}");
}

#[test]
fn test_every_breaks_on_first_failure() {
    let output = lower("var ok = xs.every(isValid);");
    assert!(output.contains("var _r = true;\n"), "{output}");
    assert!(
        output.contains(
            "    if (!_z) {\n        \
                 _r = false;\n        \
                 break;\n    \
             }\n"
        ),
        "{output}"
    );
}

#[test]
fn test_some_breaks_on_first_match() {
    let output = lower("var any = xs.some(isValid);");
    assert!(output.contains("var _r = false;\n"), "{output}");
    assert!(
        output.contains(
            "    if (_z) {\n        \
                 _r = true;\n        \
                 break;\n    \
             }\n"
        ),
        "{output}"
    );
}

#[test]
fn test_reduce_without_initial_value() {
    let output = lower("var total = xs.reduce(add);");
    assert_eq!(
        output,
        "var _a = xs;\n\
         var _i = 0;\n\
         var _f = add;\n\
         if (_a.length === 0) {\n    \
             throw new TypeError(\"Reduce of empty array with no initial value\");\n\
         }\n\
         var _acc = _a[0];\n\
         _i = 1;\n\
         for (; _i < _a.length; _i++) {\n    \
             var _e = _a[_i];\n    \
             var _z;\n    \
             _z = _f(_acc, _e, _i, _a);\n    \
             _acc = _z;\n\
         }\n\
         var total = _acc;\n"
    );
}

#[test]
fn test_reduce_with_initial_value() {
    let output = lower("var total = xs.reduce(add, 10);");
    assert!(output.contains("var _f = add;\nvar _acc = 10;\nfor ("), "{output}");
    assert!(!output.contains("TypeError"), "{output}");
}

#[test]
fn test_this_arg_is_threaded() {
    let output = lower("var ys = xs.map(this.scale, this);");
    assert!(output.contains("var _f = this.scale;\nvar _t = this;\n"), "{output}");
    assert!(output.contains("_z = _f.call(_t, _e, _i, _a);\n"), "{output}");
}

#[test]
fn test_this_arg_reject_policy_leaves_call() {
    let options = LoweringOptions {
        this_arg: ThisArgPolicy::Reject,
        ..LoweringOptions::default()
    };
    let lowered = lower_with("var ys = xs.map(scale, ctx);\n", &options);
    assert_eq!(lowered.output, "var ys = xs.map(scale, ctx);\n");
    assert!(lowered.rewrites.is_empty());
}

#[test]
fn test_returned_call_value() {
    let output = lower("function f(xs) {\n    return xs.some(isBad);\n}\n");
    assert!(output.starts_with("function f(xs) {\n    var _a = xs;\n"), "{output}");
    assert!(output.ends_with("    return _r;\n}\n"), "{output}");
}

#[test]
fn test_chained_calls_run_in_order() {
    let lowered = lower_with(
        "var n = xs.map(f).filter(g).length;",
        &LoweringOptions::default(),
    );
    let output = &lowered.output;
    assert!(output.contains("var _a = xs;\n"), "{output}");
    assert!(output.contains("var _a2 = _r;\n"), "{output}");
    assert!(output.ends_with("var n = _r2.length;\n"), "{output}");
    let kinds: Vec<_> = lowered.rewrites.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![HofKind::Map, HofKind::Filter]);
    assert!(lowered.rewrites.iter().all(|r| r.mode == RewriteMode::HoistBefore));
}

#[test]
fn test_chain_ending_in_for_each() {
    let lowered = lower_with("xs.filter(ok).forEach(log);", &LoweringOptions::default());
    let output = &lowered.output;
    assert!(output.contains("var _a2 = _r;\n"), "{output}");
    assert!(!output.contains("forEach"), "{output}");
    assert_eq!(lowered.rewrites[1].mode, RewriteMode::ReplaceStatement);
}

#[test]
fn test_nested_callback_lowered_inside_function() {
    let output = lower(
        "rows.forEach(function (row) {\n    row.forEach(print);\n});\n",
    );
    assert_eq!(
        output,
        "var _a = rows;\n\
         var _i = 0;\n\
         var _f = function (row) {\n    \
             var _a = row;\n    \
             var _i = 0;\n    \
             var _f = print;\n    \
             for (; _i < _a.length; _i++) {\n        \
                 _f(_a[_i], _i, _a);\n    \
             }\n\
         };\n\
         for (; _i < _a.length; _i++) {\n    \
             _f(_a[_i], _i, _a);\n\
         }\n"
    );
}

#[test]
fn test_single_statement_slot_is_braced() {
    let output = lower("if (ready) xs.forEach(run);\nelse log(1);\n");
    assert!(output.starts_with("if (ready) {\n    var _a = xs;\n"), "{output}");
    assert!(output.contains("    }\n} else\n    log(1);\n"), "{output}");
}

#[test]
fn test_unsafe_positions_are_left_alone() {
    let source = "var a = c ? xs.map(f) : ys;\n\
                  var b = ok && xs.every(f);\n\
                  var g = (zs) => zs.map(f);\n\
                  while (xs.some(f)) {\n    step();\n}\n";
    let lowered = lower_with(source, &LoweringOptions::default());
    assert_eq!(lowered.output, source);
    assert!(lowered.rewrites.is_empty());
}

#[test]
fn test_if_condition_is_hoisted() {
    let output = lower("if (xs.some(isBad)) {\n    fail();\n}\n");
    assert!(output.ends_with("if (_r) {\n    fail();\n}\n"), "{output}");
}

#[test]
fn test_temporaries_avoid_user_names() {
    let output = lower("var _a = 1, _r = 2;\nvar ys = xs.map(f);\n");
    assert!(output.contains("var _a2 = xs;\n"), "{output}");
    assert!(output.contains("var _r2 = [];\n"), "{output}");
    assert!(output.ends_with("var ys = _r2;\n"), "{output}");
}

#[test]
fn test_sibling_calls_get_distinct_names() {
    let output = lower("var a = xs.map(f);\nvar b = ys.map(g);\n");
    assert!(output.contains("var _a = xs;\n"), "{output}");
    assert!(output.contains("var _a2 = ys;\n"), "{output}");
    assert!(output.ends_with("var b = _r2;\n"), "{output}");
}

#[test]
fn test_for_each_value_in_expression() {
    let output = lower("var v = xs.forEach(f);");
    assert!(output.ends_with("var v = void 0;\n"), "{output}");
}

#[test]
fn test_for_each_value_as_member_object() {
    let output = lower("var v = xs.forEach(f).x;");
    assert!(output.ends_with("var v = (void 0).x;\n"), "{output}");
}

#[test]
fn test_disabled_operations_are_untouched() {
    let options = LoweringOptions {
        operations: vec![HofKind::Filter],
        ..LoweringOptions::default()
    };
    let lowered = lower_with("var ys = xs.map(f).filter(g);\n", &options);
    assert!(lowered.output.contains("var _a = xs.map(f);\n"), "{}", lowered.output);
    assert_eq!(lowered.rewrites.len(), 1);
    assert_eq!(lowered.rewrites[0].kind, HofKind::Filter);
}

#[test]
fn test_element_access_method() {
    let output = lower("var ys = xs[\"map\"](f);");
    assert!(output.ends_with("var ys = _r;\n"), "{output}");
}

#[test]
fn test_lowering_is_idempotent() {
    let once = lower("var ys = xs.map(f);\nxs.forEach(g);\n");
    let twice = lower(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_rewrite_records_source_ranges() {
    let source = "var ys = xs.map(f);";
    let lowered = lower_with(source, &LoweringOptions::default());
    let record = &lowered.rewrites[0];
    assert_eq!(&source[record.pos as usize..record.end as usize], "xs.map(f)");
    let json = serde_json::to_string(record).unwrap();
    assert!(json.contains("\"kind\":\"map\""), "{json}");
    assert!(json.contains("\"mode\":\"hoistBefore\""), "{json}");
}

#[test]
fn test_syntax_errors_are_reported() {
    let err = lower_source("bad.js", "var = ;", &LoweringOptions::default()).unwrap_err();
    match err {
        LowerSourceError::Syntax { file, diagnostics } => {
            assert_eq!(file, "bad.js");
            assert!(!diagnostics.is_empty());
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

fn position(output: &str, needle: &str) -> usize {
    output
        .find(needle)
        .unwrap_or_else(|| panic!("missing {needle:?} in:\n{output}"))
}

#[test]
fn test_call_in_callback_argument_runs_after_receiver() {
    let lowered = lower_with(
        "var ys = getXs().map(wrap(zs.map(g)));",
        &LoweringOptions::default(),
    );
    let output = &lowered.output;
    let receiver = position(output, "var _a2 = getXs();\n");
    let inner = position(output, "var _a = zs;\n");
    let callback = position(output, "var _f2 = wrap(_r);\n");
    assert!(receiver < inner && inner < callback, "{output}");
    assert!(output.ends_with("var ys = _r2;\n"), "{output}");
    assert_eq!(lowered.rewrites.len(), 2);
}

#[test]
fn test_call_in_this_arg_runs_after_callback() {
    let output = lower("xs.forEach(f, ctx(ys.filter(g)));");
    let callback = position(output.as_str(), "var _f2 = f;\n");
    let inner = position(output.as_str(), "var _a = ys;\n");
    let this_arg = position(output.as_str(), "var _t = ctx(_r);\n");
    assert!(callback < inner && inner < this_arg, "{output}");
}

#[test]
fn test_call_in_initial_value_runs_after_callback() {
    let output = lower("var total = xs.reduce(add, ys.reduce(add));");
    let receiver = position(output.as_str(), "var _a2 = xs;\n");
    let callback = position(output.as_str(), "var _f2 = add;\n");
    let inner = position(output.as_str(), "var _a = ys;\n");
    let initial = position(output.as_str(), "var _acc2 = _acc;\n");
    assert!(receiver < callback && callback < inner && inner < initial, "{output}");
    assert!(output.ends_with("var total = _acc2;\n"), "{output}");
}

#[test]
fn test_later_declarator_is_left_alone() {
    let source = "const a = [1], b = a.map(f);\n";
    let lowered = lower_with(source, &LoweringOptions::default());
    assert_eq!(lowered.output, source);
    assert!(lowered.rewrites.is_empty());
}

#[test]
fn test_overlong_operator_chain_is_a_syntax_error() {
    let source = format!("var r = xs.map(f).length{};", " + 1".repeat(5_000));
    let err = lower_source("chain.js", &source, &LoweringOptions::default()).unwrap_err();
    let LowerSourceError::Syntax { diagnostics, .. } = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "Maximum nesting depth exceeded.");
}

#[test]
fn test_operator_chain_under_limit_is_printed() {
    let tail = " + 1".repeat(200);
    let output = lower(&format!("var r = xs.map(f).length{tail};"));
    assert!(output.ends_with(&format!("var r = _r.length{tail};\n")), "{output}");
}
