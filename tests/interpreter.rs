use lantana::{
    diagnostics::{DiagnosticKind, LantanaError},
    parser,
    runtime::Interpreter,
    value::{Value, ValueKind},
};

fn eval(source: &str) -> Value {
    let mut interpreter = Interpreter::new();
    interpreter
        .eval_source(source)
        .expect("evaluation should succeed")
}

fn eval_error(source: &str) -> LantanaError {
    let mut interpreter = Interpreter::new();
    match interpreter.eval_source(source) {
        Ok(value) => panic!("expected error, received value {value}"),
        Err(err) => err,
    }
}

fn error_kind(source: &str) -> DiagnosticKind {
    eval_error(source)
        .kind()
        .expect("error should carry a diagnostic kind")
}

fn expect_number(value: &Value) -> f64 {
    match value.0.as_ref() {
        ValueKind::Number(n) => *n,
        _ => panic!("expected Number, found {}", value.type_name()),
    }
}

fn expect_string(value: &Value) -> &str {
    match value.0.as_ref() {
        ValueKind::Str(s) => s,
        _ => panic!("expected String, found {}", value.type_name()),
    }
}

fn expect_bool(value: &Value) -> bool {
    match value.0.as_ref() {
        ValueKind::Bool(b) => *b,
        _ => panic!("expected Bool, found {}", value.type_name()),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(expect_number(&eval("2 + 3 * 4;")), 14.0);
    assert_eq!(expect_number(&eval("(2 + 3) * 4;")), 20.0);
}

#[test]
fn binary_levels_are_left_associative() {
    assert_eq!(expect_number(&eval("10 - 3 - 2;")), 5.0);
    assert_eq!(expect_number(&eval("24 / 4 / 3;")), 2.0);
}

#[test]
fn string_concatenation_requires_two_strings() {
    assert_eq!(expect_string(&eval("\"foo\" + \"bar\";")), "foobar");
    assert_eq!(error_kind("1 + \"a\";"), DiagnosticKind::Type);
    assert_eq!(error_kind("\"a\" + 1;"), DiagnosticKind::Type);
    assert_eq!(error_kind("true + true;"), DiagnosticKind::Type);
}

#[test]
fn arithmetic_rejects_non_numbers() {
    assert_eq!(error_kind("\"a\" - \"b\";"), DiagnosticKind::Type);
    assert_eq!(error_kind("nil * 2;"), DiagnosticKind::Type);
}

#[test]
fn division_by_zero_is_an_error_not_infinity() {
    assert_eq!(error_kind("10 / 0;"), DiagnosticKind::DivisionByZero);
}

#[test]
fn unary_operators() {
    assert_eq!(expect_number(&eval("-5;")), -5.0);
    assert_eq!(expect_number(&eval("--5;")), 5.0);
    assert!(expect_bool(&eval("!nil;")));
    assert!(expect_bool(&eval("!false;")));
    assert!(!expect_bool(&eval("!0;")));
    assert_eq!(error_kind("-\"a\";"), DiagnosticKind::Type);
}

#[test]
fn only_nil_and_false_are_falsy() {
    assert_eq!(expect_string(&eval("if 0 { \"then\"; } else { \"else\"; }")), "then");
    assert_eq!(
        expect_string(&eval("if \"\" { \"then\"; } else { \"else\"; }")),
        "then"
    );
    assert_eq!(
        expect_string(&eval("if nil { \"then\"; } else { \"else\"; }")),
        "else"
    );
    assert_eq!(
        expect_string(&eval("if false { \"then\"; } else { \"else\"; }")),
        "else"
    );
}

#[test]
fn condition_may_be_parenthesized() {
    assert_eq!(expect_string(&eval("if (0) { \"then\"; } else { \"else\"; }")), "then");
}

#[test]
fn if_without_else_yields_nil_when_condition_fails() {
    let value = eval("if nil { 1; }");
    assert!(matches!(value.0.as_ref(), ValueKind::Nil));
}

#[test]
fn nil_equality_rules() {
    assert!(expect_bool(&eval("nil == nil;")));
    assert!(!expect_bool(&eval("nil == 0;")));
    assert!(expect_bool(&eval("nil != \"\";")));
    assert!(expect_bool(&eval("1 == 1;")));
    assert!(!expect_bool(&eval("1 == \"1\";")));
    assert!(expect_bool(&eval("\"a\" == \"a\";")));
}

#[test]
fn ordering_is_numeric_only() {
    assert!(expect_bool(&eval("2 < 3;")));
    assert!(expect_bool(&eval("3 >= 3;")));
    assert_eq!(error_kind("\"a\" < \"b\";"), DiagnosticKind::Type);
}

#[test]
fn variables_are_implicitly_declared() {
    assert_eq!(expect_number(&eval("x = 40; x + 2;")), 42.0);
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    assert_eq!(error_kind("missing;"), DiagnosticKind::UndefinedVariable);
}

#[test]
fn assignment_targets_must_be_variables() {
    assert_eq!(error_kind("1 = 2;"), DiagnosticKind::InvalidAssignmentTarget);
    assert_eq!(
        error_kind("len(\"a\") = 2;"),
        DiagnosticKind::InvalidAssignmentTarget
    );
}

#[test]
fn block_assignment_shadows_instead_of_mutating() {
    // Assignment binds in the current environment, so the inner `x` is a
    // new block-local binding.
    assert_eq!(expect_number(&eval("x = 1; { x = 2; } x;")), 1.0);
}

#[test]
fn block_locals_do_not_leak() {
    assert_eq!(
        error_kind("{ y = 1; } y;"),
        DiagnosticKind::UndefinedVariable
    );
}

#[test]
fn function_call_yields_last_expression_value() {
    let value = eval(
        r#"
        function double(n) {
            n * 2;
        }
        double(21);
        "#,
    );
    assert_eq!(expect_number(&value), 42.0);
}

#[test]
fn function_with_empty_body_yields_nil() {
    let value = eval("function noop() { } noop();");
    assert!(matches!(value.0.as_ref(), ValueKind::Nil));
}

#[test]
fn closures_capture_the_environment_not_the_value() {
    let value = eval(
        r#"
        x = 1;
        function read_x() {
            x;
        }
        x = 2;
        read_x();
        "#,
    );
    assert_eq!(expect_number(&value), 2.0);
}

#[test]
fn parameters_shadow_enclosing_bindings() {
    let value = eval(
        r#"
        n = 100;
        function id(n) {
            n;
        }
        id(7) + n;
        "#,
    );
    assert_eq!(expect_number(&value), 107.0);
}

#[test]
fn recursive_function_evaluates() {
    let value = eval(
        r#"
        function fib(n) {
            if n <= 1 {
                n;
            } else {
                fib(n - 1) + fib(n - 2);
            }
        }
        fib(6);
        "#,
    );
    assert_eq!(expect_number(&value), 8.0);
}

#[test]
fn arity_mismatch_is_reported_with_counts() {
    let err = eval_error("function f(a, b) { a; } f(1);");
    assert_eq!(err.kind(), Some(DiagnosticKind::Arity));
    let message = format!("{err}");
    assert!(
        message.contains("expected 2 arguments but received 1"),
        "{message}"
    );
}

#[test]
fn duplicate_parameters_are_rejected_at_parse_time() {
    assert_eq!(
        error_kind("function f(a, a) { a; }"),
        DiagnosticKind::Syntax
    );
}

#[test]
fn only_functions_are_callable() {
    assert_eq!(error_kind("x = 1; x(2);"), DiagnosticKind::Type);
}

#[test]
fn native_functions_validate_their_own_arity() {
    assert_eq!(error_kind("len();"), DiagnosticKind::Arity);
}

#[test]
fn prelude_helpers() {
    assert_eq!(expect_number(&eval("len(\"hello\");")), 5.0);
    assert_eq!(expect_number(&eval("number(\"3.5\");")), 3.5);
    assert_eq!(expect_string(&eval("string(42);")), "42");
    assert_eq!(error_kind("number(\"abc\");"), DiagnosticKind::Type);
    assert!(expect_number(&eval("clock();")) > 0.0);
}

#[test]
fn import_binds_a_module_handle() {
    assert_eq!(expect_number(&eval("import \"math\"; math.abs(-5);")), 5.0);
    assert_eq!(
        expect_number(&eval("import \"math\"; math.pow(2, 8);")),
        256.0
    );
    assert_eq!(
        expect_string(&eval("import \"strings\"; strings.upper(\"abc\");")),
        "ABC"
    );
}

#[test]
fn unresolvable_import_fails() {
    assert_eq!(
        error_kind("import \"no_such_module\";"),
        DiagnosticKind::Import
    );
}

#[test]
fn unknown_module_export_fails() {
    assert_eq!(
        error_kind("import \"math\"; math.nope;"),
        DiagnosticKind::Import
    );
}

#[test]
fn field_access_requires_a_module() {
    assert_eq!(error_kind("x = 1; x.y;"), DiagnosticKind::Type);
}

#[test]
fn syntax_errors_carry_line_numbers() {
    let err = eval_error("x = 1;\n1 +;");
    match err {
        LantanaError::Diagnostic(diag) => {
            assert_eq!(diag.kind, DiagnosticKind::Syntax);
            assert_eq!(diag.line, Some(2));
        }
        other => panic!("expected diagnostic, found {other}"),
    }
}

#[test]
fn unclosed_grouping_is_a_syntax_error() {
    assert_eq!(error_kind("(1 + 2;"), DiagnosticKind::Syntax);
}

#[test]
fn runtime_error_aborts_remaining_statements() {
    let mut interpreter = Interpreter::new();
    assert!(interpreter.eval_source("a = 1; missing; a = 99;").is_err());
    // The statement after the failure never ran.
    assert_eq!(expect_number(&interpreter.eval_source("a;").unwrap()), 1.0);
}

#[test]
fn interpreter_state_persists_across_calls() {
    let mut interpreter = Interpreter::new();
    interpreter.eval_source("counter = 10;").unwrap();
    let value = interpreter.eval_source("counter + 1;").unwrap();
    assert_eq!(expect_number(&value), 11.0);
}

#[test]
fn hosts_can_register_natives_and_globals() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("answer", Value::number(42.0));
    interpreter.define_native("halve", 1, |args| {
        match args[0].as_number() {
            Some(n) => Ok(Value::number(n / 2.0)),
            None => Ok(Value::nil()),
        }
    });
    let value = interpreter.eval_source("halve(answer);").unwrap();
    assert_eq!(expect_number(&value), 21.0);
}

#[test]
fn parsing_is_idempotent() {
    let source = "function f(a) { if a { a + 1; } } f(3);";
    let first = parser::parse_program(source).expect("parse should succeed");
    let second = parser::parse_program(source).expect("parse should succeed");
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
}
