//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Indentation tracking (Newline/Indent/Dedent tokens)
//! - Token position tracking for error reporting
//! - Comments and blank-line handling

pub mod lexer;
pub mod tokens;
