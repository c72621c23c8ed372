use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// The error kind reported to the user. Semantic errors are grouped
    /// under the five analysis kinds; front-end errors keep their own names.
    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InconsistentDedent => "IndentationError",
            ErrorImpl::UnknownTypeAnnotation { .. } => "UnknownTypeAnnotation",
            ErrorImpl::NotAVariable { .. } => "ReferenceError",
            ErrorImpl::NotAFunction { .. } => "ReferenceError",
            ErrorImpl::AssignToUndeclared { .. } => "ReferenceError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclarationError",
            ErrorImpl::TypeMismatch { .. } => "TypeError",
            ErrorImpl::BinaryOperandTypes { .. } => "TypeError",
            ErrorImpl::UnaryOperandType { .. } => "TypeError",
            ErrorImpl::ConditionType { .. } => "TypeError",
            ErrorImpl::ArgumentTypeMismatch { .. } => "TypeError",
            ErrorImpl::ArityMismatch { .. } => "ArityError",
            ErrorImpl::MissingReturn { .. } => "ControlFlowError",
            ErrorImpl::ReturnOutsideFunction => "ControlFlowError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the 32-bit integer limit?",
                token
            )),
            ErrorImpl::InconsistentDedent => ErrorTip::Suggestion(String::from(
                "Dedent does not match any outer indentation level",
            )),
            ErrorImpl::UnknownTypeAnnotation { annotation } => ErrorTip::Suggestion(format!(
                "Unknown type annotation `{}`, expected `int` or `bool`",
                annotation
            )),
            ErrorImpl::NotAVariable { name } => {
                ErrorTip::Suggestion(format!("Not a variable: `{}`", name))
            }
            ErrorImpl::NotAFunction { name } => {
                ErrorTip::Suggestion(format!("Not a function: `{}`", name))
            }
            ErrorImpl::AssignToUndeclared { name } => ErrorTip::Suggestion(format!(
                "Cannot assign to variable that is not explicitly declared in this scope: `{}`",
                name
            )),
            ErrorImpl::DuplicateDeclaration { name } => ErrorTip::Suggestion(format!(
                "Duplicate declaration of `{}` in the same scope",
                name
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`; got type `{}`",
                expected, received
            )),
            ErrorImpl::BinaryOperandTypes { op, left, right } => ErrorTip::Suggestion(format!(
                "Cannot perform operation `{}` on types `{}` and `{}`",
                op, left, right
            )),
            ErrorImpl::UnaryOperandType { op, operand } => ErrorTip::Suggestion(format!(
                "Cannot perform operation `{}` on type `{}`",
                op, operand
            )),
            ErrorImpl::ConditionType { received } => ErrorTip::Suggestion(format!(
                "Condition expression cannot be of type `{}`",
                received
            )),
            ErrorImpl::ArgumentTypeMismatch {
                index,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}`; got type `{}` in parameter {}",
                expected, received, index
            )),
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments; got {}",
                expected, received
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "All paths in function `{}` must have a return statement",
                function
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::Suggestion(String::from(
                "Return statement cannot appear at the top level",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("dedent does not match any outer indentation level")]
    InconsistentDedent,
    #[error("unknown type annotation: {annotation:?}")]
    UnknownTypeAnnotation { annotation: String },
    #[error("not a variable: {name:?}")]
    NotAVariable { name: String },
    #[error("not a function: {name:?}")]
    NotAFunction { name: String },
    #[error("cannot assign to {name:?}, not declared in this scope")]
    AssignToUndeclared { name: String },
    #[error("duplicate declaration of {name:?} in the same scope")]
    DuplicateDeclaration { name: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatch { expected: String, received: String },
    #[error("cannot apply {op:?} to operand types {left:?} and {right:?}")]
    BinaryOperandTypes {
        op: String,
        left: String,
        right: String,
    },
    #[error("cannot apply {op:?} to operand type {operand:?}")]
    UnaryOperandType { op: String, operand: String },
    #[error("condition cannot be of type {received:?}")]
    ConditionType { received: String },
    #[error("argument {index:?} types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: String,
        received: String,
    },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("not all paths in {function:?} return a value")]
    MissingReturn { function: String },
    #[error("return statement outside of a function body")]
    ReturnOutsideFunction,
}
