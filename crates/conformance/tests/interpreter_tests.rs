//! Interpreter behaviour the equivalence checks rely on.

use loopdown_conformance::{InterpreterError, ProgramCompletion, RunOutcome, run_source};

fn run(source: &str) -> RunOutcome {
    run_source(source).unwrap_or_else(|err| panic!("interpreter failed: {err}\n{source}"))
}

fn completion(source: &str) -> ProgramCompletion {
    run(source).completion
}

fn normal(text: &str) -> ProgramCompletion {
    ProgramCompletion::Normal(text.to_string())
}

fn threw(text: &str) -> ProgramCompletion {
    ProgramCompletion::Threw(text.to_string())
}

#[test]
fn test_result_binding_is_the_completion() {
    assert_eq!(completion("var result = 1 + 2;"), normal("3"));
    assert_eq!(completion("var other = 1;"), normal("undefined"));
    assert_eq!(completion("var result = 'text';"), normal("text"));
    assert_eq!(completion("var result = ['a', 1, true, null];"), normal("[\"a\", 1, true, null]"));
    assert_eq!(completion("var result = { a: 1, b: [2] };"), normal("{ a: 1, b: [2] }"));
}

#[test]
fn test_log_lines() {
    let outcome = run("log('x', 1, [1, 2]); log(); log(void 0, null, {});");
    assert_eq!(outcome.log, vec!["x 1 [1, 2]", "", "undefined null {}"]);
}

#[test]
fn test_closures_capture_bindings() {
    let source = r#"
        function counter() {
            var n = 0;
            return function () { n++; return n; };
        }
        var next = counter();
        next();
        next();
        var result = next();
    "#;
    assert_eq!(completion(source), normal("3"));
}

#[test]
fn test_var_and_function_hoisting() {
    let source = r#"
        log(typeof hoisted, before);
        var before = 1;
        function hoisted() { return 2; }
        var result = hoisted() + before;
    "#;
    let outcome = run(source);
    assert_eq!(outcome.log, vec!["function undefined"]);
    assert_eq!(outcome.completion, normal("3"));
}

#[test]
fn test_block_scoped_let_and_const() {
    let source = r#"
        let x = 1;
        {
            let x = 2;
            log(x);
        }
        const y = 3;
        var result = x + y;
    "#;
    let outcome = run(source);
    assert_eq!(outcome.log, vec!["2"]);
    assert_eq!(outcome.completion, normal("4"));
    assert_eq!(
        completion("const k = 1; k = 2;"),
        threw("TypeError: Assignment to constant variable.")
    );
}

#[test]
fn test_this_binding_and_call() {
    let source = r#"
        var obj = { n: 5, get: function () { return this.n; } };
        function read(extra) { return this.n + extra; }
        var result = [obj.get(), read.call(obj, 1)];
    "#;
    assert_eq!(completion(source), normal("[5, 6]"));
}

#[test]
fn test_arrow_functions_capture_this() {
    let source = r#"
        function Box(v) {
            this.v = v;
            this.read = () => this.v;
        }
        var b = new Box(4);
        var read = b.read;
        var result = read();
    "#;
    assert_eq!(completion(source), normal("4"));
}

#[test]
fn test_loops_and_break_continue() {
    let source = r#"
        var out = [];
        for (var i = 0; i < 6; i++) {
            if (i === 1) continue;
            if (i === 4) break;
            out.push(i);
        }
        var j = 0;
        do { j++; } while (j < 3);
        while (true) { j++; if (j > 5) break; }
        var result = [out, j];
    "#;
    assert_eq!(completion(source), normal("[[0, 2, 3], 6]"));
}

#[test]
fn test_short_circuit_operators() {
    let source = r#"
        function side(v) { log('side', v); return v; }
        var a = false && side(1);
        var b = true || side(2);
        var c = null ?? side(3);
        var d = 0 ?? side(4);
        var result = [a, b, c, d, true ? 'y' : side(5)];
    "#;
    let outcome = run(source);
    assert_eq!(outcome.log, vec!["side 3"]);
    assert_eq!(outcome.completion, normal("[false, true, 3, 0, \"y\"]"));
}

#[test]
fn test_typeof_and_equality() {
    let source = r#"
        var result = [
            typeof missing, typeof 1, typeof 's', typeof null, typeof [], typeof log,
            1 == '1', 1 === '1', null == undefined, null === undefined, NaN === NaN
        ];
    "#;
    assert_eq!(
        completion(source),
        normal(
            "[\"undefined\", \"number\", \"string\", \"object\", \"object\", \"function\", \
             true, false, true, false, false]"
        )
    );
}

#[test]
fn test_native_higher_order_functions() {
    let source = r#"
        var xs = [1, 2, 3, 4];
        var seen = [];
        xs.forEach(function (x, i, arr) { seen.push(x * 10 + i); log(arr === xs); });
        var result = [
            seen,
            xs.map(function (x) { return x * x; }),
            xs.filter(function (x) { return x % 2 === 0; }),
            xs.every(function (x) { return x > 0; }),
            xs.some(function (x) { return x > 3; }),
            xs.reduce(function (acc, x) { return acc + x; }),
            xs.reduce(function (acc, x) { return acc + x; }, 100)
        ];
    "#;
    let outcome = run(source);
    assert_eq!(outcome.log, vec!["true"; 4]);
    assert_eq!(
        outcome.completion,
        normal("[[10, 21, 32, 43], [1, 4, 9, 16], [2, 4], true, true, 10, 110]")
    );
}

#[test]
fn test_native_some_and_every_stop_early() {
    let source = r#"
        var calls = 0;
        var s = [1, 2, 3].some(function (x) { calls++; return x === 2; });
        var e = [1, 2, 3].every(function (x) { calls++; return x < 1; });
        var result = [s, e, calls];
    "#;
    assert_eq!(completion(source), normal("[true, false, 3]"));
}

#[test]
fn test_native_this_arg() {
    let source = r#"
        var ctx = { k: 3 };
        var result = [1, 2].map(function (x) { return x * this.k; }, ctx);
    "#;
    assert_eq!(completion(source), normal("[3, 6]"));
}

#[test]
fn test_native_reduce_of_empty_array_throws() {
    assert_eq!(
        completion("var result = [].reduce(function (a, b) { return a + b; });"),
        threw("TypeError: Reduce of empty array with no initial value")
    );
    assert_eq!(
        completion("var result = [].reduce(function (a, b) { return a + b; }, 'init');"),
        normal("init")
    );
}

#[test]
fn test_thrown_errors() {
    assert_eq!(completion("throw new RangeError('bad');"), threw("RangeError: bad"));
    assert_eq!(completion("throw 'plain';"), threw("plain"));
    assert_eq!(
        completion("var o; o.x;"),
        threw("TypeError: Cannot read properties of undefined (reading 'x')")
    );
    assert_eq!(
        completion("var f = 1; f();"),
        threw("TypeError: 1 is not a function")
    );
}

#[test]
fn test_unbounded_recursion_is_a_range_error() {
    assert_eq!(
        completion("function f() { return f(); } var result = f();"),
        threw("RangeError: Maximum call stack size exceeded")
    );
}

#[test]
fn test_interpreter_failures() {
    assert!(matches!(
        run_source("var = ;"),
        Err(InterpreterError::Syntax { .. })
    ));
    assert!(matches!(
        run_source("while (true) {}"),
        Err(InterpreterError::LoopLimit { .. })
    ));
}
