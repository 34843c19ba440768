//! Constant folding through the public runtime: fold on and fold off
//! must be indistinguishable to a script

mod common;

use common::assert_eq;
use kestrel_runtime::ast::{Expr, Literal, Stmt};
use kestrel_runtime::{Diagnostic, Kestrel, Value};
use rstest::rstest;
use std::cell::RefCell;
use std::rc::Rc;

fn run(source: &str, folding: bool) -> (Result<Value, Vec<Diagnostic>>, String) {
    let runtime = Kestrel::new();
    runtime.set_folding(folding);
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    runtime.set_output(buffer.clone());
    let result = runtime.eval(source);
    let output = String::from_utf8_lossy(&buffer.borrow()).into_owned();
    (result, output)
}

fn parse_statements(source: &str, folding: bool) -> Vec<Stmt> {
    let runtime = Kestrel::new();
    runtime.set_folding(folding);
    runtime.parse_program(source, "fold.kst").unwrap().statements
}

#[rstest]
#[case::nested_arithmetic("(2 + 3) * 4 - 1")]
#[case::string_concatenation("\"foo\" + \"bar\" + \"!\"")]
#[case::mixed_concatenation("\"n = \" + (40 + 2)")]
#[case::comparison_chain("print 1 < 2; print 3 <= 3; print 4 > 5; print 2 >= 3;")]
#[case::equality("print 1 == 1.0; print \"a\" != \"b\"; print null == 0;")]
#[case::unary("print -(2 + 3); print !\"\"; print !0; print !!7;")]
#[case::float_formatting("print 0.1 + 0.2; print 4 / 2; print 7 % 4;")]
#[case::logical_operands("print 1 and 2; print null or \"fallback\"; print 0 or false;")]
#[case::branch_on_folded_condition("if (2 < 1) { print \"no\"; } else { print \"yes\"; }")]
#[case::folded_loop_bound("var i = 0; while (i < 2 + 1) { print i; i = i + 1; }")]
#[case::constant_in_closure("var n = 6 * 7; fn get() { return n; } print get();")]
#[case::list_of_constants("print [1 + 1, \"a\" + \"b\", !null];")]
fn test_fold_on_and_off_agree(#[case] source: &str) {
    let (folded, folded_output) = run(source, true);
    let (unfolded, unfolded_output) = run(source, false);

    match (&folded, &unfolded) {
        (Ok(a), Ok(b)) => assert_eq!(a.to_string(), b.to_string(), "for source: {source}"),
        (Err(a), Err(b)) => {
            assert_eq!(a[0].code, b[0].code, "for source: {source}");
            assert_eq!(a[0].message, b[0].message, "for source: {source}");
        }
        _ => panic!("fold changed outcome kind for source: {source}"),
    }
    assert_eq!(folded_output, unfolded_output, "for source: {source}");
}

#[rstest]
#[case::division_by_zero("1 / 0;")]
#[case::modulo_by_zero("5 % 0;")]
#[case::mixed_arithmetic("1 - \"x\";")]
#[case::bool_addition("true + 1;")]
#[case::string_ordering("\"a\" < \"b\";")]
#[case::negated_string("-\"text\";")]
fn test_fold_preserves_runtime_errors(#[case] source: &str) {
    let (folded, _) = run(source, true);
    let (unfolded, _) = run(source, false);

    let folded = folded.unwrap_err();
    let unfolded = unfolded.unwrap_err();
    assert_eq!(folded[0].code, unfolded[0].code, "for source: {source}");
    assert_eq!(folded[0].message, unfolded[0].message, "for source: {source}");
}

#[test]
fn test_constant_expression_parses_to_a_literal() {
    let statements = parse_statements("print (2 + 3) * 4;", true);
    let Stmt::Print(print) = &statements[0] else {
        panic!("expected a print statement");
    };
    assert!(matches!(
        print.expr,
        Expr::Literal(Literal::Number(n), _) if n == 20.0
    ));
}

#[test]
fn test_disabled_folding_keeps_the_tree() {
    let statements = parse_statements("print (2 + 3) * 4;", false);
    let Stmt::Print(print) = &statements[0] else {
        panic!("expected a print statement");
    };
    assert!(matches!(print.expr, Expr::Binary(_)));
}

#[test]
fn test_variables_block_folding() {
    let statements = parse_statements("var x = 2; x * 3;", true);
    let Stmt::Expr(expr_stmt) = &statements[1] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(expr_stmt.expr, Expr::Binary(_)));
}

#[test]
fn test_error_producing_constants_stay_unfolded() {
    let statements = parse_statements("1 / 0;", true);
    let Stmt::Expr(expr_stmt) = &statements[0] else {
        panic!("expected an expression statement");
    };
    assert!(matches!(expr_stmt.expr, Expr::Binary(_)));
}

#[test]
fn test_folding_reaches_method_bodies() {
    let statements = parse_statements("class A { fn m() { return 6 * 7; } }", true);
    let Stmt::ClassDecl(class) = &statements[0] else {
        panic!("expected a class declaration");
    };
    let Stmt::Return(return_stmt) = &class.methods[0].body.statements[0] else {
        panic!("expected a return statement");
    };
    assert!(matches!(
        return_stmt.value,
        Some(Expr::Literal(Literal::Number(n), _)) if n == 42.0
    ));
}

#[test]
fn test_folding_toggle_applies_per_eval() {
    let runtime = Kestrel::new();

    runtime.set_folding(false);
    assert_eq!(runtime.eval("2 + 3").unwrap().to_string(), "5");

    runtime.set_folding(true);
    assert_eq!(runtime.eval("2 + 3").unwrap().to_string(), "5");
}
