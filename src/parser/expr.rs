use crate::{
    ast::{
        ast::Literal,
        expressions::{BinOp, Expr, UnaOp},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    if !parser.get_nud_lookup().contains_key(&token_kind) {
        return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position()));
    }

    let mut left = parser.get_nud_lookup().get(&token_kind).unwrap()(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while *parser.get_bp_lookup().get(&parser.current_token_kind()).unwrap_or(&BindingPower::Default) > bp {
        let token_kind = parser.current_token_kind();
        if !parser.get_led_lookup().contains_key(&token_kind) {
            return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position()));
        }

        left = parser.get_led_lookup().get(&token_kind).unwrap()(parser, left, *parser.get_bp_lookup().get(&parser.current_token_kind()).unwrap())?;
    }

    Ok(left)
}

/// Parses a literal token into its Literal value. Shared with the var-def
/// parser, which only admits literal initializers.
pub fn parse_literal(parser: &mut Parser) -> Result<Literal, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let result = parser.current_token().value.parse();

            if result.is_err() {
                Err(Error::new(ErrorImpl::NumberParseError { token: parser.current_token().value.clone() }, parser.get_position()))
            } else {
                parser.advance();
                Ok(Literal::Number(result.unwrap()))
            }
        }
        TokenKind::True => {
            parser.advance();
            Ok(Literal::Boolean(true))
        }
        TokenKind::False => {
            parser.advance();
            Ok(Literal::Boolean(false))
        }
        TokenKind::None => {
            parser.advance();
            Ok(Literal::None)
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a literal"),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::None => {
            let span = parser.current_token().span.clone();
            let value = parse_literal(parser)?;
            Ok(Expr::Literal { value, span })
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(Expr::Identifier {
                name: token.value.clone(),
                span: token.span.clone(),
            })
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Dash => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::SlashSlash => BinOp::FloorDiv,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::Equals => BinOp::Eq,
        TokenKind::NotEquals => BinOp::NotEq,
        TokenKind::LessEquals => BinOp::LessEq,
        TokenKind::GreaterEquals => BinOp::GreaterEq,
        TokenKind::Less => BinOp::Less,
        TokenKind::Greater => BinOp::Greater,
        TokenKind::Is => BinOp::Is,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value.clone(),
                },
                operator_token.span.start.clone(),
            ))
        }
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary {
        span: Span {
            start: left.span().start.clone(),
            end: right.span().end.clone(),
        },
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    // `-` binds tighter than multiplication; `not` spans a whole comparison.
    let (op, operand_bp) = match operator_token.kind {
        TokenKind::Dash => (UnaOp::Negate, BindingPower::Unary),
        TokenKind::Not => (UnaOp::Not, BindingPower::Default),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value.clone(),
                },
                operator_token.span.start.clone(),
            ))
        }
    };

    let operand = parse_expr(parser, operand_bp)?;

    Ok(Expr::Unary {
        span: Span {
            start: operator_token.span.start.clone(),
            end: operand.span().end.clone(),
        },
        op,
        operand: Box::new(operand),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let inner = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end.clone();

    Ok(Expr::Grouping {
        inner: Box::new(inner),
        span: Span { start, end },
    })
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    // Calls are by name only; there are no function-valued expressions.
    let name = match &left {
        Expr::Identifier { name, .. } => name.clone(),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("only named functions can be called"),
                },
                left.span().start.clone(),
            ))
        }
    };

    parser.advance();

    let mut args = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();

            // A trailing comma directly before `)` is malformed.
            if parser.current_token_kind() == TokenKind::CloseParen {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ));
            }
        }
    }

    let end = parser.expect(TokenKind::CloseParen)?.span.end.clone();

    Ok(Expr::Call {
        span: Span {
            start: left.span().start.clone(),
            end,
        },
        name,
        args,
    })
}
