//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.py".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.py".to_string()));
    let error = Error::new(
        ErrorImpl::NotAVariable {
            name: "x".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(*error.get_position().1, "test.py".to_string());
}

#[test]
fn test_semantic_errors_grouped_by_kind() {
    let pos = Position::null;

    let reference = Error::new(
        ErrorImpl::NotAVariable {
            name: "x".to_string(),
        },
        pos(),
    );
    assert_eq!(reference.get_error_name(), "ReferenceError");

    let assign = Error::new(
        ErrorImpl::AssignToUndeclared {
            name: "x".to_string(),
        },
        pos(),
    );
    assert_eq!(assign.get_error_name(), "ReferenceError");

    let duplicate = Error::new(
        ErrorImpl::DuplicateDeclaration {
            name: "f".to_string(),
        },
        pos(),
    );
    assert_eq!(duplicate.get_error_name(), "DuplicateDeclarationError");

    let type_error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "bool".to_string(),
        },
        pos(),
    );
    assert_eq!(type_error.get_error_name(), "TypeError");

    let arity = Error::new(
        ErrorImpl::ArityMismatch {
            expected: 2,
            received: 1,
        },
        pos(),
    );
    assert_eq!(arity.get_error_name(), "ArityError");

    let control_flow = Error::new(
        ErrorImpl::MissingReturn {
            function: "f".to_string(),
        },
        pos(),
    );
    assert_eq!(control_flow.get_error_name(), "ControlFlowError");

    let top_level_return = Error::new(ErrorImpl::ReturnOutsideFunction, pos());
    assert_eq!(top_level_return.get_error_name(), "ControlFlowError");
}

#[test]
fn test_error_tip_messages() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            received: "bool".to_string(),
        },
        Position::null(),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert_eq!(tip, "Expected type `int`; got type `bool`");
        }
        ErrorTip::None => panic!("TypeMismatch should carry a suggestion"),
    }
}

#[test]
fn test_binary_operand_tip_names_operator_and_types() {
    let error = Error::new(
        ErrorImpl::BinaryOperandTypes {
            op: "+".to_string(),
            left: "bool".to_string(),
            right: "int".to_string(),
        },
        Position::null(),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert!(tip.contains('+'));
            assert!(tip.contains("bool"));
            assert!(tip.contains("int"));
        }
        ErrorTip::None => panic!("BinaryOperandTypes should carry a suggestion"),
    }
}

#[test]
fn test_unrecognised_token_has_no_tip() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::null(),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}
