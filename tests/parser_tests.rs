// tests/parser_tests.rs

use callq::ast::{Literal, Node, Operator};
use callq::lexer::tokenize;
use callq::parser::{ParseError, ParseOutput, Parser, parse_tokens};
use callq::stream::TokenStream;
use rust_decimal::Decimal;

fn parse(input: &str) -> ParseOutput {
    let lexed = tokenize(input);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    parse_tokens(&lexed.tokens, lexed.end)
}

fn parse_ok(input: &str) -> Node {
    let out = parse(input);
    assert!(out.errors.is_empty(), "parse errors for {input}: {:?}", out.errors);
    out.ast.expect("ast")
}

fn offsets(errors: &[ParseError]) -> Vec<usize> {
    errors.iter().map(|e| e.position().offset).collect()
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison_call() {
    match parse_ok("eq(age, 30)") {
        Node::Call { op, args, position } => {
            assert_eq!(op, Operator::Eq);
            assert_eq!(position.offset, 0);
            assert!(matches!(&args[0], Node::Field { name, .. } if name == "age"));
            assert!(matches!(
                &args[1],
                Node::Literal { value: Literal::Number(n), .. } if *n == Decimal::from(30)
            ));
        }
        other => panic!("Expected call, got {other:?}"),
    }
}

#[test]
fn test_literal_arguments() {
    let node = parse_ok("in(x, 'a', \"b\", 1.5, true, null)");
    let Node::Call { args, .. } = node else {
        panic!("Expected call");
    };
    let literals: Vec<&Literal> = args
        .iter()
        .filter_map(|a| match a {
            Node::Literal { value, .. } => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(
        literals,
        vec![
            &Literal::String("a".into()),
            &Literal::String("b".into()),
            &Literal::Number(Decimal::new(15, 1)),
            &Literal::Boolean(true),
            &Literal::Null,
        ]
    );
}

#[test]
fn test_nested_calls_preserve_order() {
    let node = parse_ok("and(eq(a, 1), or(isNull(b), not(eq(c, 'x'))))");
    let Node::Call { op: Operator::And, args, .. } = node else {
        panic!("Expected and");
    };
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0], Node::Call { op: Operator::Eq, .. }));
    match &args[1] {
        Node::Call { op: Operator::Or, args, .. } => {
            assert!(matches!(&args[0], Node::Call { op: Operator::IsNull, .. }));
            assert!(matches!(&args[1], Node::Call { op: Operator::Not, .. }));
        }
        other => panic!("Expected or, got {other:?}"),
    }
}

#[test]
fn test_empty_argument_list_is_syntactically_fine() {
    // arity is the binder's business
    let node = parse_ok("and()");
    assert!(matches!(node, Node::Call { op: Operator::And, ref args, .. } if args.is_empty()));
}

#[test]
fn test_literal_in_predicate_position_parses() {
    let node = parse_ok("not(1)");
    assert!(matches!(node, Node::Call { op: Operator::Not, ref args, .. } if matches!(args[0], Node::Literal { .. })));
}

// ============================================================================
// Syntax errors
// ============================================================================

#[test]
fn test_empty_input() {
    let out = parse("");
    assert!(out.ast.is_none());
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::UnexpectedEnd { expected: "an operator call", .. }]
    ));
}

#[test]
fn test_top_level_must_be_a_call() {
    for input in ["42", "'eq(a, 1)'", "age", "(eq(a, 1))", ")"] {
        let out = parse(input);
        assert!(out.ast.is_none(), "Failed for input: {}", input);
        assert!(
            matches!(
                out.errors.first(),
                Some(ParseError::UnexpectedToken { expected: "an operator call", .. })
            ),
            "Failed for input: {}: {:?}",
            input,
            out.errors
        );
    }
}

#[test]
fn test_unknown_operator() {
    let out = parse("equals(a, 1)");
    assert!(out.ast.is_none());
    assert_eq!(
        out.errors,
        vec![ParseError::UnknownOperator {
            name: "equals".into(),
            position: callq::Position::START,
        }]
    );
}

#[test]
fn test_unknown_operator_nested_keeps_siblings() {
    let out = parse("and(between(a, 1, 2), eq(b, 1))");
    let ast = out.ast.expect("outer call survives");
    let Node::Call { args, .. } = ast else {
        panic!("Expected call");
    };
    assert!(args[0].is_invalid());
    assert!(matches!(args[1], Node::Call { op: Operator::Eq, .. }));
    assert_eq!(offsets(&out.errors), vec![4]);
}

#[test]
fn test_trailing_input() {
    let out = parse("eq(a, 1) eq(b, 2)");
    assert!(out.ast.is_some());
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::TrailingInput { position, .. }] if position.offset == 9
    ));
}

#[test]
fn test_extra_closing_paren_is_trailing_input() {
    let out = parse("eq(a, 1))");
    assert!(matches!(out.errors.as_slice(), [ParseError::TrailingInput { found, .. }] if found == "')'"));
}

#[test]
fn test_missing_closing_paren() {
    let out = parse("eq(a, 1");
    assert_eq!(
        out.errors,
        vec![ParseError::UnexpectedEnd {
            expected: "')'",
            position: callq::Position {
                offset: 7,
                line: 1,
                column: 8
            },
        }]
    );
    // still a tree to bind
    assert!(out.ast.is_some());
}

#[test]
fn test_missing_closing_paren_reported_per_open_call() {
    let out = parse("and(eq(a, 1");
    assert_eq!(out.errors.len(), 2);
    assert!(out.errors.iter().all(|e| matches!(e, ParseError::UnexpectedEnd { .. })));
}

#[test]
fn test_missing_open_paren() {
    let out = parse("and(eq, eq(b, 1))");
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::UnexpectedToken { expected: "'('", found, .. }] if found == "','"
    ));
}

#[test]
fn test_trailing_comma() {
    let out = parse("eq(a, 1,)");
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::MissingArgument { position }] if position.offset == 8
    ));
}

#[test]
fn test_leading_comma() {
    let out = parse("eq(, 1)");
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::MissingArgument { position }] if position.offset == 3
    ));
}

#[test]
fn test_missing_separator_recovers_at_close() {
    let out = parse("eq(a 1 2)");
    assert_eq!(out.errors.len(), 1);
    assert!(matches!(
        &out.errors[0],
        ParseError::UnexpectedToken { expected: "',' or ')'", found, .. } if found == "number 1"
    ));
}

#[test]
fn test_sibling_errors_all_reported() {
    // three independent problems in one argument list
    let out = parse("or(eq(a 1), ne(b, ), gt(c, 3) lt(d, 4))");
    assert_eq!(offsets(&out.errors), vec![8, 18, 30]);
}

#[test]
fn test_recovery_skips_nested_groups() {
    let out = parse("and(eq(a, 1) not(eq(b, 2)), eq(c, 3))");
    assert_eq!(out.errors.len(), 1);
    let Some(Node::Call { args, .. }) = out.ast else {
        panic!("Expected call");
    };
    assert_eq!(args.len(), 2);
    assert!(matches!(args[1], Node::Call { op: Operator::Eq, .. }));
}

#[test]
fn test_parenthesized_argument_is_rejected() {
    let out = parse("not((eq(a, 1)))");
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::UnexpectedToken { expected: "an argument", .. }]
    ));
}

// ============================================================================
// Depth guard
// ============================================================================

fn nested_nots(depth: usize) -> String {
    format!("{}eq(a, 1){}", "not(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_nesting_within_limit() {
    let lexed = tokenize(&nested_nots(20));
    let out = Parser::new(TokenStream::new(&lexed.tokens, lexed.end))
        .with_max_depth(21)
        .parse();
    assert!(out.errors.is_empty());
}

#[test]
fn test_nesting_beyond_limit() {
    let lexed = tokenize(&nested_nots(20));
    let out = Parser::new(TokenStream::new(&lexed.tokens, lexed.end))
        .with_max_depth(5)
        .parse();
    assert_eq!(
        out.errors,
        vec![ParseError::NestingTooDeep {
            limit: 5,
            position: callq::Position {
                offset: 20,
                line: 1,
                column: 21
            },
        }]
    );
}

#[test]
fn test_adversarial_nesting_does_not_overflow() {
    let out = parse(&nested_nots(10_000));
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::NestingTooDeep { limit: 128, .. }]
    ));
}

#[test]
fn test_max_depth_is_clamped() {
    let lexed = tokenize(&nested_nots(5_000));
    let out = Parser::new(TokenStream::new(&lexed.tokens, lexed.end))
        .with_max_depth(usize::MAX)
        .parse();
    assert!(matches!(
        out.errors.as_slice(),
        [ParseError::NestingTooDeep { limit, .. }] if *limit == callq::options::MAX_DEPTH_CEILING
    ));
}

#[test]
fn test_adversarial_unbalanced_nesting() {
    let out = parse(&"not(".repeat(10_000));
    assert!(out.errors.iter().any(|e| matches!(e, ParseError::NestingTooDeep { .. })));
}
