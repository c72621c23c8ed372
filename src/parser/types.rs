use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses a type annotation. Declaration sites only admit `int` and `bool`;
/// `none` exists solely as the implicit return type of an unannotated
/// function.
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let position = parser.get_position();
    let token = parser.expect_error(
        TokenKind::Identifier,
        Some(Error::new(
            ErrorImpl::UnknownTypeAnnotation {
                annotation: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    )?;

    match token.value.as_str() {
        "int" => Ok(Type::Int),
        "bool" => Ok(Type::Bool),
        _ => Err(Error::new(
            ErrorImpl::UnknownTypeAnnotation {
                annotation: token.value.clone(),
            },
            position,
        )),
    }
}
