//! Property-based fuzz testing for the pybble scanner, parser, and evaluator
//!
//! These tests use proptest to generate arbitrary inputs and verify:
//! 1. The scanner and parser never panic, on any input
//! 2. Tokenizing and parsing are pure: repeated calls on the same text agree
//! 3. Evaluation is deterministic and never panics
//! 4. Arithmetic matches direct IEEE computation
//! 5. The primitive ordering is total
//! 6. Indexing respects bounds for every index, positive or negative
//! 7. Resource limits hold under deep nesting, in the parser and evaluator

use proptest::prelude::*;
use pybble::{
    evaluate_expr, parse_expr, tokenize, Context, ErrorClass, Evaluator, Value,
    DEFAULT_MAX_DEPTH,
};

// ============================================================================
// STRATEGY GENERATORS
// ============================================================================

/// Arbitrary ASCII soup, printable or not
fn arbitrary_source() -> impl Strategy<Value = String> {
    prop::string::string_regex("[\\x00-\\x7F]{0,400}").unwrap()
}

/// Streams of valid tokens in random order
///
/// Most combinations fail to parse; the ones that parse exercise the
/// evaluator with shapes no hand-written test would think of. `*` is left
/// out of the pool: chained sequence repetition compounds allocation.
fn token_soup() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        prop::sample::select(vec![
            "(", ")", "[", "]", "{", "}", ":", ",", ".", "+", "-", "/", "//", "%", "**",
            "<<", ">>", "&", "|", "^", "~", "==", "!=", "<>", "<", "<=", ">", ">=", "=",
            "and", "or", "not", "in", "not in", "is", "is not", "if", "else",
            "True", "False", "None",
        ])
        .prop_map(str::to_string),
        (0i32..100).prop_map(|n| n.to_string()),
        prop::sample::select(vec!["x", "y", "data", "flag"]).prop_map(str::to_string),
        prop::sample::select(vec!["'s'", "''", "'ab'"]).prop_map(str::to_string),
    ];
    prop::collection::vec(token, 0..40).prop_map(|tokens| tokens.join(" "))
}

/// Well-formed arithmetic over parenthesized integer leaves
fn arithmetic_expression() -> impl Strategy<Value = String> {
    let leaf = (-1000i32..1000).prop_map(|n| format!("({})", n));
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            inner.clone(),
            prop::sample::select(vec!["+", "-", "*", "/", "//", "%"]),
            inner,
        )
            .prop_map(|(a, op, b)| format!("({} {} {})", a, op, b))
    })
}

/// Well-formed literals: scalars nested into lists, tuples, and dicts
fn value_expression() -> impl Strategy<Value = String> {
    let scalar = prop_oneof![
        (-1000i32..1000).prop_map(|n| n.to_string()),
        prop::string::string_regex("[a-z]{0,8}")
            .unwrap()
            .prop_map(|s| format!("'{}'", s)),
        Just("True".to_string()),
        Just("False".to_string()),
        Just("None".to_string()),
    ];
    scalar.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|xs| format!("[{}]", xs.join(", "))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|xs| {
                if xs.is_empty() {
                    "()".to_string()
                } else {
                    format!("({},)", xs.join(", "))
                }
            }),
            prop::collection::vec(
                (prop::string::string_regex("[a-z]{1,4}").unwrap(), inner.clone()),
                0..4
            )
            .prop_map(|pairs| {
                let body: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("'{}': {}", k, v))
                    .collect();
                format!("{{{}}}", body.join(", "))
            }),
        ]
    })
}

/// Literals that always order against each other: numbers, strings,
/// booleans, and None
fn primitive_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1000i32..1000).prop_map(|n| format!("({})", n)),
        prop::string::string_regex("[a-z]{0,6}")
            .unwrap()
            .prop_map(|s| format!("'{}'", s)),
        Just("True".to_string()),
        Just("False".to_string()),
        Just("None".to_string()),
    ]
}

// ============================================================================
// PARSER FUZZ TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn fuzz_scanner_never_panics(input in arbitrary_source()) {
        let _ = tokenize(&input);
    }

    #[test]
    fn fuzz_parser_never_panics(input in arbitrary_source()) {
        let _ = parse_expr(&input);
    }

    #[test]
    fn fuzz_parser_handles_token_soup(source in token_soup()) {
        let _ = parse_expr(&source);
    }

    #[test]
    fn fuzz_unicode_never_panics(input in "\\PC{0,200}") {
        let _ = parse_expr(&input);
    }

    #[test]
    fn fuzz_tokenize_twice_is_identical(source in token_soup()) {
        prop_assert_eq!(tokenize(&source).ok(), tokenize(&source).ok());
        prop_assert_eq!(parse_expr(&source).ok(), parse_expr(&source).ok());
    }

    #[test]
    fn fuzz_parse_twice_is_identical(source in value_expression()) {
        let first = parse_expr(&source).unwrap();
        let second = parse_expr(&source).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// EVALUATOR FUZZ TESTS
// ============================================================================

proptest! {
    #[test]
    fn fuzz_evaluation_is_deterministic(source in value_expression()) {
        let expr = parse_expr(&source).unwrap();

        let mut ctx1 = Context::new();
        let mut ctx2 = Context::new();
        let first = Evaluator::new().evaluate(&expr, &mut ctx1).unwrap();
        let second = Evaluator::new().evaluate(&expr, &mut ctx2).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert!(first.to_json().is_ok());
    }

    #[test]
    fn fuzz_arithmetic_matches_ieee(
        a in -1000i32..1000,
        b in -1000i32..1000,
        op in prop::sample::select(vec!["+", "-", "*", "/", "//", "%"]),
    ) {
        let x = a as f64;
        let y = b as f64;
        let expected = match op {
            "+" => x + y,
            "-" => x - y,
            "*" => x * y,
            "/" => x / y,
            "//" => (x / y).floor(),
            _ => x - y * (x / y).floor(),
        };

        let mut ctx = Context::new();
        let result = evaluate_expr(&format!("({}) {} ({})", a, op, b), &mut ctx).unwrap();
        match result {
            Value::Number(n) => {
                prop_assert!(
                    n == expected || (n.is_nan() && expected.is_nan()),
                    "({}) {} ({}) gave {}, expected {}",
                    a, op, b, n, expected
                );
            }
            other => prop_assert!(false, "expected a number, got {:?}", other),
        }
    }

    #[test]
    fn fuzz_primitive_order_is_total(a in primitive_literal(), b in primitive_literal()) {
        let mut ctx = Context::new();
        let lt = evaluate_expr(&format!("{} < {}", a, b), &mut ctx).unwrap();
        let eq = evaluate_expr(&format!("{} == {}", a, b), &mut ctx).unwrap();
        let gt = evaluate_expr(&format!("{} > {}", a, b), &mut ctx).unwrap();

        let hits = [lt, eq, gt].iter().filter(|v| v.is_truthy()).count();
        prop_assert_eq!(hits, 1, "{} vs {} ordered {} ways", a, b, hits);
    }

    #[test]
    fn fuzz_chain_matches_pairwise_and(
        a in -100i32..100,
        b in -100i32..100,
        c in -100i32..100,
    ) {
        let mut ctx = Context::new();
        let chained =
            evaluate_expr(&format!("({}) < ({}) < ({})", a, b, c), &mut ctx).unwrap();
        let pairwise = evaluate_expr(
            &format!("(({}) < ({})) and (({}) < ({}))", a, b, b, c),
            &mut ctx,
        )
        .unwrap();
        prop_assert_eq!(chained, pairwise);
    }

    #[test]
    fn fuzz_list_index_bounds(
        items in prop::collection::vec(-50i32..50, 1..8),
        idx in -12i64..12,
    ) {
        let body: Vec<String> = items.iter().map(|n| n.to_string()).collect();
        let source = format!("[{}][({})]", body.join(", "), idx);
        let mut ctx = Context::new();
        let result = evaluate_expr(&source, &mut ctx);

        let n = items.len() as i64;
        let resolved = if idx < 0 { idx + n } else { idx };
        if (0..n).contains(&resolved) {
            prop_assert_eq!(
                result.unwrap(),
                Value::Number(items[resolved as usize] as f64)
            );
        } else {
            prop_assert_eq!(result.unwrap_err().class(), ErrorClass::Key);
        }
    }

    #[test]
    fn fuzz_unicode_string_content(raw in "\\PC{0,30}") {
        let s = raw.replace(['\'', '"'], "");
        let mut ctx = Context::new();

        let value = evaluate_expr(&format!("'{}'", s), &mut ctx).unwrap();
        prop_assert_eq!(value, Value::Str(s.clone()));

        let upper = evaluate_expr(&format!("'{}'.upper()", s), &mut ctx).unwrap();
        prop_assert_eq!(upper, Value::Str(s.to_uppercase()));
    }

    #[test]
    fn fuzz_arithmetic_never_errors(source in arithmetic_expression()) {
        let mut ctx = Context::new();
        let result = evaluate_expr(&source, &mut ctx).unwrap();
        prop_assert!(matches!(result, Value::Number(_)));
    }
}

// ============================================================================
// COMBINED PIPELINE FUZZ TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn fuzz_pipeline_never_panics(source in token_soup()) {
        let mut ctx = Context::new();
        let _ = evaluate_expr(&source, &mut ctx);
    }

    #[test]
    fn fuzz_reused_context_never_panics(
        sources in prop::collection::vec(token_soup(), 1..6),
    ) {
        let mut ctx = Context::new();
        let mut evaluator = Evaluator::new();
        for source in &sources {
            if let Ok(expr) = parse_expr(source) {
                let _ = evaluator.evaluate(&expr, &mut ctx);
            }
        }
    }

    #[test]
    fn fuzz_nested_parens_stay_flat(depth in 1usize..200) {
        let source = format!("{}7{}", "(".repeat(depth), ")".repeat(depth));
        let mut ctx = Context::new();
        prop_assert_eq!(evaluate_expr(&source, &mut ctx).unwrap(), Value::Number(7.0));
    }

    #[test]
    fn fuzz_nesting_depth_is_bounded(depth in 1usize..600) {
        let source = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        let mut ctx = Context::new();
        let result = evaluate_expr(&source, &mut ctx);
        if depth < DEFAULT_MAX_DEPTH {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().class(), ErrorClass::Resource);
        }
    }
}

// ============================================================================
// REGRESSION TESTS
// ============================================================================
// Deterministic cases that earlier fuzzing runs or review flagged as risky.

#[test]
fn test_empty_input_is_an_error() {
    let mut ctx = Context::new();
    assert!(evaluate_expr("", &mut ctx).is_err());
    assert!(evaluate_expr("   \n\t  ", &mut ctx).is_err());
}

#[test]
fn test_null_bytes_are_rejected() {
    assert!(tokenize("\0").is_err());
    assert!(tokenize("1 + \0").is_err());
}

#[test]
fn test_huge_number_literal_overflows_to_infinity() {
    let mut ctx = Context::new();
    let result = evaluate_expr(&"9".repeat(400), &mut ctx).unwrap();
    assert_eq!(result, Value::Number(f64::INFINITY));
}

#[test]
fn test_very_long_string_literal() {
    let mut ctx = Context::new();
    let source = format!("'{}'", "a".repeat(100_000));
    let result = evaluate_expr(&source, &mut ctx).unwrap();
    assert_eq!(result.as_str().unwrap().len(), 100_000);
}

#[test]
fn test_deep_unary_chain_hits_recursion_limit() {
    // 1000 stacked negations nest past the limit in the parser itself
    let source = format!("{}1", "-".repeat(1000));
    let err = parse_expr(&source).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Resource);

    let mut ctx = Context::new();
    let source = format!("{}1", "-".repeat(100));
    assert_eq!(evaluate_expr(&source, &mut ctx).unwrap(), Value::Number(1.0));
}

#[test]
fn test_deep_paren_nesting_returns_an_error() {
    // grouping parens leave no AST node behind, but parsing them still
    // recurses; past the limit this must come back as an error, not abort
    // the process with a native stack overflow
    let source = format!("{}7{}", "(".repeat(300_000), ")".repeat(300_000));
    let err = parse_expr(&source).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Resource);
}

#[test]
fn test_trailing_tokens_are_rejected() {
    assert!(parse_expr("1 2").is_err());
    assert!(parse_expr("1 + 2 3").is_err());
    assert!(parse_expr("'a' 'b'").is_err());
}

#[test]
fn test_unbalanced_brackets() {
    assert!(parse_expr("(((").is_err());
    assert!(parse_expr("[1, 2").is_err());
    assert!(parse_expr("{'a': 1").is_err());
    assert!(parse_expr("1)").is_err());
    assert!(parse_expr("[1)]").is_err());
}

#[test]
fn test_lone_operators() {
    assert!(parse_expr("+").is_err());
    assert!(parse_expr("**").is_err());
    assert!(parse_expr("and").is_err());
    assert!(parse_expr(",").is_err());
}
