//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! A program is two sections: a declaration section (global variable
//! definitions and function definitions) followed by top-level statements.
//! A declaration after the first plain statement is a parse error, matching
//! the source-language grammar.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    lookups::{create_token_lookups, BPLookup, BindingPower, LEDLookup, NUDLookup, StmtLookup},
    stmt::{parse_func_def, parse_stmt, parse_var_def},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements and expressions. It tracks the current position in
/// the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: i32,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.tokens.get(self.pos as usize).unwrap()
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens.get(self.pos as usize).unwrap().kind
    }

    /// Returns the kind of the token after the current one. The token stream
    /// always ends in EOF, so lookahead past the end clamps to EOF.
    pub fn next_token_kind(&self) -> TokenKind {
        match self.tokens.get((self.pos + 1) as usize) {
            Some(token) => token.kind,
            None => TokenKind::EOF,
        }
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        self.pos += 1;
        self.tokens.get((self.pos - 1) as usize).unwrap()
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        let kind = token.kind;
        if kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    crate::errors::errors::ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.pos + 1 < self.tokens.len() as i32 && self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: super::lookups::LEDHandler,
    ) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token. Tokens that
    /// are also infix operators keep their infix binding power.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: super::lookups::NUDHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: super::lookups::StmtHandler) {
        self.binding_power_lookup
            .insert(kind, BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn get_file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}

/// Parses a stream of tokens into an untyped program AST.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, parses the declaration section and then
/// all statements until EOF.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let mut var_defs = vec![];
    let mut func_defs = vec![];

    // Declaration section: var-defs and func-defs, in any interleaving.
    while parser.has_tokens() {
        match parser.current_token_kind() {
            TokenKind::Def => func_defs.push(parse_func_def(&mut parser)?),
            TokenKind::Identifier if parser.next_token_kind() == TokenKind::Colon => {
                var_defs.push(parse_var_def(&mut parser)?)
            }
            _ => break,
        }
    }

    let mut stmts = vec![];
    while parser.has_tokens() {
        stmts.push(parse_stmt(&mut parser)?);
    }

    Ok(Program {
        var_defs,
        func_defs,
        stmts,
    })
}
