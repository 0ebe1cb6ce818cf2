//! Parser tests.

use crate::ast::{ExprKind, Program, StmtKind};
use crate::lexer::Scanner;
use crate::parser::Parser;

fn parse(source: &str) -> Program {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    Parser::new(tokens).parse().expect("parser error")
}

fn parse_err(source: &str) -> crate::error::ParserError {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    Parser::new(tokens).parse().expect_err("expected parser error")
}

fn first_expr(program: &Program) -> &ExprKind {
    match &program.statements[0].kind {
        StmtKind::Expression(e) => &e.kind,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn parses_operators_as_sends() {
    let program = parse("1 + 2 * 3");
    let ExprKind::Send {
        name,
        args,
        receiver,
        ..
    } = first_expr(&program)
    else {
        panic!("expected send");
    };
    assert_eq!(name, "+");
    assert!(matches!(
        receiver.as_deref().map(|e| &e.kind),
        Some(ExprKind::IntegerLiteral(1))
    ));
    // Factor binds tighter: the single argument is `2 * 3`.
    assert_eq!(args.len(), 1);
    assert!(matches!(&args[0].kind, ExprKind::Send { name, .. } if name == "*"));
}

#[test]
fn parses_index_and_index_assignment() {
    let program = parse("h[\"a\"]\nh[\"a\"] = 1");
    assert!(
        matches!(first_expr(&program), ExprKind::Send { name, args, .. } if name == "[]" && args.len() == 1)
    );
    match &program.statements[1].kind {
        StmtKind::Expression(e) => {
            assert!(
                matches!(&e.kind, ExprKind::Send { name, args, .. } if name == "[]=" && args.len() == 2)
            );
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parses_attribute_assignment_as_setter_send() {
    let program = parse("f.bar = 10");
    assert!(
        matches!(first_expr(&program), ExprKind::Send { name, args, .. } if name == "bar=" && args.len() == 1)
    );
}

#[test]
fn parses_class_with_superclass_path() {
    let program = parse("class Bar < Foo::Baz\nend");
    match &program.statements[0].kind {
        StmtKind::ClassDef {
            name,
            superclass,
            is_module,
            ..
        } => {
            assert_eq!(name, "Bar");
            assert!(!is_module);
            assert!(matches!(
                superclass.as_ref().map(|e| &e.kind),
                Some(ExprKind::ScopeResolution { .. })
            ));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parses_def_self_and_params() {
    let program = parse("def self.build(a, b)\n  a\nend");
    match &program.statements[0].kind {
        StmtKind::MethodDef {
            name,
            self_method,
            params,
            body,
        } => {
            assert_eq!(name, "build");
            assert!(*self_method);
            assert_eq!(params, &["a".to_string(), "b".to_string()]);
            assert_eq!(body.len(), 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parses_command_call_arguments() {
    let program = parse("attr_accessor :foo, :bar");
    let ExprKind::Send {
        receiver,
        name,
        args,
        ..
    } = first_expr(&program)
    else {
        panic!("expected send");
    };
    assert!(receiver.is_none());
    assert_eq!(name, "attr_accessor");
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0].kind, ExprKind::StringLiteral(s) if s == "foo"));
}

#[test]
fn bare_identifier_stays_an_identifier() {
    let program = parse("fifty = 50\nfifty");
    match &program.statements[1].kind {
        StmtKind::Expression(e) => {
            assert!(matches!(&e.kind, ExprKind::Identifier(name) if name == "fifty"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parses_brace_block_after_call() {
    let program = parse("Foo.baz { |h| h + fifty }");
    let ExprKind::Send { name, block, .. } = first_expr(&program) else {
        panic!("expected send");
    };
    assert_eq!(name, "baz");
    let block = block.as_ref().expect("expected block");
    assert_eq!(block.params, vec!["h".to_string()]);
    assert_eq!(block.body.len(), 1);
}

#[test]
fn parses_do_block_with_params() {
    let program = parse("h.each_key do |k|\n  puts(k)\nend");
    let ExprKind::Send { block, .. } = first_expr(&program) else {
        panic!("expected send");
    };
    assert_eq!(block.as_ref().expect("block").params, vec!["k".to_string()]);
}

#[test]
fn brace_in_operand_position_is_a_hash() {
    let program = parse("puts({ c: 1, b: 2 })");
    let ExprKind::Send { args, .. } = first_expr(&program) else {
        panic!("expected send");
    };
    let ExprKind::HashLiteral(entries) = &args[0].kind else {
        panic!("expected hash literal");
    };
    assert_eq!(entries[0].0, "c");
    assert_eq!(entries[1].0, "b");
}

#[test]
fn parses_range_in_parens() {
    let program = parse("(2..10)");
    assert!(matches!(
        first_expr(&program),
        ExprKind::RangeLiteral { .. }
    ));
}

#[test]
fn desugars_or_assign() {
    let program = parse("a = 1\na ||= 2");
    match &program.statements[1].kind {
        StmtKind::Expression(e) => match &e.kind {
            ExprKind::Assign { value, .. } => {
                assert!(matches!(value.kind, ExprKind::Or { .. }));
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn parses_if_elsif_else_chain() {
    let program = parse("if a\n 1\nelsif b\n 2\nelse\n 3\nend");
    let ExprKind::If { else_body, .. } = first_expr(&program) else {
        panic!("expected if");
    };
    // The elsif arm nests as the else branch.
    assert_eq!(else_body.len(), 1);
    match &else_body[0].kind {
        StmtKind::Expression(e) => assert!(matches!(e.kind, ExprKind::If { .. })),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn rejects_invalid_assignment_target() {
    let err = parse_err("1 = 2");
    assert!(matches!(
        err,
        crate::error::ParserError::InvalidAssignmentTarget(_)
    ));
}

#[test]
fn rejects_missing_end() {
    let err = parse_err("class Foo\n");
    assert!(matches!(err, crate::error::ParserError::UnexpectedEof(_)));
}

#[test]
fn statements_require_separators() {
    let err = parse_err("a = 1 b = 2");
    assert!(matches!(
        err,
        crate::error::ParserError::UnexpectedToken { .. }
    ));
}
