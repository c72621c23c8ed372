//! Unit tests for the type checker.
//!
//! Covers the literal typing table, the operator rules, call checking,
//! scoping and assignability, duplicate declarations, the all-paths-return
//! rule and determinism of the produced annotations.

use std::rc::Rc;

use super::type_checker::type_check;
use super::typed_ast::{TypedProgram, TypedStmtKind};
use crate::ast::types::Type;
use crate::errors::errors::Error;
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;

fn check_source(source: &str) -> Result<TypedProgram, Error> {
    let tokens = tokenize(source.to_string(), Some("test.py".to_string())).unwrap();
    let program = parse(tokens, Rc::new("test.py".to_string())).unwrap();
    type_check(&program)
}

fn expr_type(typed: &TypedProgram, index: usize) -> Type {
    match &typed.stmts[index].kind {
        TypedStmtKind::Expr { expr } => expr.ty,
        _ => panic!("expected an expression statement"),
    }
}

#[test]
fn test_literal_types() {
    let typed = check_source("5\nTrue\nNone").unwrap();

    assert_eq!(expr_type(&typed, 0), Type::Int);
    assert_eq!(expr_type(&typed, 1), Type::Bool);
    assert_eq!(expr_type(&typed, 2), Type::None);
}

#[test]
fn test_arithmetic_operators_yield_int() {
    let typed = check_source("1 + 2\n3 - 4\n5 * 6\n7 // 8\n9 % 10").unwrap();

    for index in 0..5 {
        assert_eq!(expr_type(&typed, index), Type::Int);
    }
}

#[test]
fn test_arithmetic_operators_require_ints() {
    let result = check_source("1 + True");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_relational_operators_yield_bool() {
    let typed = check_source("1 < 2\n3 >= 4").unwrap();

    assert_eq!(expr_type(&typed, 0), Type::Bool);
    assert_eq!(expr_type(&typed, 1), Type::Bool);
}

#[test]
fn test_relational_operators_require_ints() {
    let result = check_source("True < False");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_equality_requires_same_type() {
    assert_eq!(check_source("1 == 2").unwrap().stmts.len(), 1);
    assert_eq!(check_source("True != False").unwrap().stmts.len(), 1);

    let result = check_source("1 == True");
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_equality_rejects_none_operands() {
    let result = check_source("None == None");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_is_requires_none_operands() {
    let typed = check_source("None is None").unwrap();
    assert_eq!(expr_type(&typed, 0), Type::Bool);

    let result = check_source("1 is 1");
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_unary_operators() {
    let typed = check_source("-5\nnot True").unwrap();

    assert_eq!(expr_type(&typed, 0), Type::Int);
    assert_eq!(expr_type(&typed, 1), Type::Bool);

    assert!(check_source("-True").is_err());
    assert!(check_source("not 1").is_err());
}

#[test]
fn test_var_def_initializer_must_match_annotation() {
    assert!(check_source("x: int = 5").is_ok());

    let result = check_source("x: int = True");
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_assignment_type_mismatch() {
    let result = check_source("x: int = 5\nx = True");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_assignment_to_undeclared_variable() {
    let result = check_source("x = 5");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ReferenceError");
}

#[test]
fn test_reference_to_undeclared_variable() {
    let result = check_source("x + 1");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ReferenceError");
}

#[test]
fn test_global_readable_but_not_assignable_in_function() {
    let readable = "x: int = 5\ndef f() -> int:\n    return x + 1";
    assert!(check_source(readable).is_ok());

    let assignable = "x: int = 5\ndef f():\n    x = 1";
    let result = check_source(assignable);
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ReferenceError");
}

#[test]
fn test_local_shadows_global_for_reads() {
    let source = "x: int = 5\ndef f() -> bool:\n    x: bool = True\n    return x";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_duplicate_global_declaration() {
    let result = check_source("x: int = 5\nx: int = 6");

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().get_error_name(),
        "DuplicateDeclarationError"
    );
}

#[test]
fn test_duplicate_local_declaration() {
    let source = "def f(x: int) -> int:\n    x: int = 1\n    return x";
    let result = check_source(source);

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().get_error_name(),
        "DuplicateDeclarationError"
    );
}

#[test]
fn test_function_may_not_shadow_builtin() {
    let result = check_source("def print(x: int) -> int:\n    return x");

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().get_error_name(),
        "DuplicateDeclarationError"
    );
}

#[test]
fn test_function_and_variable_share_namespace() {
    let result = check_source("f: int = 1\ndef f() -> int:\n    return 2");

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().get_error_name(),
        "DuplicateDeclarationError"
    );
}

#[test]
fn test_call_unknown_function() {
    let result = check_source("g(1)");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ReferenceError");
}

#[test]
fn test_call_arity_mismatch() {
    let result = check_source("max(1)");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ArityError");
}

#[test]
fn test_call_argument_type_mismatch() {
    let result = check_source("abs(True)");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_print_accepts_any_argument_type() {
    assert!(check_source("print(1)").is_ok());
    assert!(check_source("print(True)").is_ok());
    assert!(check_source("print(None)").is_ok());
}

#[test]
fn test_builtin_return_types() {
    let typed = check_source("abs(-3)\nmax(1, 2)\nprint(1)").unwrap();

    assert_eq!(expr_type(&typed, 0), Type::Int);
    assert_eq!(expr_type(&typed, 1), Type::Int);
    assert_eq!(expr_type(&typed, 2), Type::None);
}

#[test]
fn test_mutually_referencing_functions() {
    let source = "def even(n: int) -> bool:\n    if n == 0:\n        return True\n    else:\n        return odd(n - 1)\ndef odd(n: int) -> bool:\n    if n == 0:\n        return False\n    else:\n        return even(n - 1)";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_return_outside_function() {
    let result = check_source("return 5");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ControlFlowError");
}

#[test]
fn test_return_type_must_match_declaration() {
    let result = check_source("def f() -> int:\n    return True");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_if_without_else_never_guarantees_return() {
    let source = "def f(x: int) -> int:\n    if x > 0:\n        return 1";
    let result = check_source(source);

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ControlFlowError");
}

#[test]
fn test_if_else_with_returns_on_both_paths() {
    let source = "def f(x: int) -> int:\n    if x > 0:\n        return 1\n    else:\n        return 0";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_elif_chain_requires_terminal_else_to_return() {
    let missing = "def f(x: int) -> int:\n    if x > 0:\n        return 1\n    elif x < 0:\n        return 2";
    let result = check_source(missing);
    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ControlFlowError");

    let complete = "def f(x: int) -> int:\n    if x > 0:\n        return 1\n    elif x < 0:\n        return 2\n    else:\n        return 0";
    assert!(check_source(complete).is_ok());
}

#[test]
fn test_while_never_guarantees_return() {
    let source = "def f(x: int) -> int:\n    while x > 0:\n        return 1";
    let result = check_source(source);

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ControlFlowError");
}

#[test]
fn test_none_function_needs_no_return() {
    assert!(check_source("def f():\n    pass").is_ok());
    assert!(check_source("def f():\n    return").is_ok());
}

#[test]
fn test_condition_must_be_bool() {
    let result = check_source("if 1:\n    pass");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_statement_flow_types() {
    let source = "x: int = 0\nx = 1\npass\nwhile False:\n    pass";
    let typed = check_source(source).unwrap();

    for stmt in typed.stmts.iter() {
        assert_eq!(stmt.flow, Type::None);
    }
}

#[test]
fn test_checking_is_deterministic() {
    let source = "x: int = 5\ndef f(a: int) -> int:\n    return a + x\nf(2)";
    let tokens = tokenize(source.to_string(), Some("test.py".to_string())).unwrap();
    let program = parse(tokens, Rc::new("test.py".to_string())).unwrap();

    let first = type_check(&program).unwrap();
    let second = type_check(&program).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_function_body_flow_matches_declaration() {
    let typed = check_source("def f() -> int:\n    return 3").unwrap();

    assert_eq!(typed.func_defs[0].body.flow, Type::Int);
    assert_eq!(typed.func_defs[0].return_type, Type::Int);
}
