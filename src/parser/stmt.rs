use crate::{
    ast::statements::{ElseBranch, FuncBody, FuncDef, IfStmt, Stmt, TypedParam, VarDef},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{parse_expr, parse_literal},
    lookups::BindingPower,
    parser::Parser,
    types::parse_type,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.get_stmt_lookup().contains_key(&parser.current_token_kind()) {
        return parser.get_stmt_lookup().get(&parser.current_token_kind()).unwrap()(parser);
    }

    // Declarations are only legal before the first statement of their block.
    if parser.current_token_kind() == TokenKind::Def {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("function definitions must appear before the first statement"),
            },
            parser.get_position(),
        ));
    }
    if parser.current_token_kind() == TokenKind::Identifier
        && parser.next_token_kind() == TokenKind::Colon
    {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("variable definitions must appear before the first statement"),
            },
            parser.get_position(),
        ));
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.next_token_kind() == TokenKind::Assignment
    {
        return parse_assign_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Newline)?;

    Ok(Stmt::Expr { expr })
}

pub fn parse_assign_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let name_token = parser.advance().clone();

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    let end = value.span().end.clone();
    parser.expect(TokenKind::Newline)?;

    Ok(Stmt::Assign {
        name: name_token.value,
        value,
        span: Span {
            start: name_token.span.start,
            end,
        },
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if_chain(parser)?))
}

/// Parses one `if`/`elif` arm and whatever follows it. The caller guarantees
/// the current token is `if` or `elif`.
fn parse_if_chain(parser: &mut Parser) -> Result<IfStmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let body = parse_block(parser)?;

    let else_branch = match parser.current_token_kind() {
        TokenKind::Elif => Some(ElseBranch::Elif(Box::new(parse_if_chain(parser)?))),
        TokenKind::Else => {
            parser.advance();
            parser.expect(TokenKind::Colon)?;
            Some(ElseBranch::Else(parse_block(parser)?))
        }
        _ => None,
    };

    Ok(IfStmt {
        condition,
        body,
        else_branch,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While {
        condition,
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

pub fn parse_pass_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    parser.expect(TokenKind::Newline)?;

    Ok(Stmt::Pass { span: token.span })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let value;
    if parser.current_token_kind() != TokenKind::Newline {
        value = Some(parse_expr(parser, BindingPower::Default)?);
    } else {
        value = None;
    }

    parser.expect(TokenKind::Newline)?;

    Ok(Stmt::Return {
        value,
        span: start_token.span,
    })
}

/// Parses an indentation-delimited block: the Newline/Indent pair, one or
/// more statements, and the closing Dedent.
fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::Newline)?;
    parser.expect(TokenKind::Indent)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::Dedent {
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::Dedent)?;

    Ok(statements)
}

/// Parses `name: type = literal`. The initializer is restricted to a literal
/// token; arbitrary expressions are rejected here, not in the type checker.
pub fn parse_var_def(parser: &mut Parser) -> Result<VarDef, Error> {
    let name_token = parser.advance().clone();

    parser.expect(TokenKind::Colon)?;
    let declared_type = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_literal(parser)?;
    let end = parser.get_position();
    parser.expect(TokenKind::Newline)?;

    Ok(VarDef {
        name: name_token.value,
        declared_type,
        value,
        span: Span {
            start: name_token.span.start,
            end,
        },
    })
}

pub fn parse_func_def(parser: &mut Parser) -> Result<FuncDef, Error> {
    let start = parser.advance().span.start.clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier in function definition"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let param_name = parser.expect(TokenKind::Identifier)?.value;
        let annotation = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: format!("missed type annotation for parameter {}", param_name),
            },
            parser.get_position(),
        );
        parser.expect_error(TokenKind::Colon, Some(annotation))?;
        let declared_type = parse_type(parser)?;
        params.push(TypedParam {
            name: param_name,
            declared_type,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();

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

    parser.expect(TokenKind::CloseParen)?;

    // No arrow means the function returns `none`.
    let return_type;
    if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        return_type = parse_type(parser)?;
    } else {
        return_type = crate::ast::types::Type::None;
    }

    parser.expect(TokenKind::Colon)?;
    parser.expect(TokenKind::Newline)?;
    parser.expect(TokenKind::Indent)?;

    // Local var-defs come first, then the body statements.
    let mut var_defs = Vec::new();
    while parser.current_token_kind() == TokenKind::Identifier
        && parser.next_token_kind() == TokenKind::Colon
    {
        var_defs.push(parse_var_def(parser)?);
    }

    // A body may consist of declarations alone; its result type is `none`.
    let mut stmts = Vec::new();
    while parser.current_token_kind() != TokenKind::Dedent {
        stmts.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::Dedent)?;

    Ok(FuncDef {
        name,
        params,
        return_type,
        body: FuncBody { var_defs, stmts },
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}
