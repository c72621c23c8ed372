use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

#[derive(Clone)]
pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pos: i32,
    file: Rc<String>,
    // Indentation levels currently open, outermost first. Always starts at 0.
    indent_stack: Vec<usize>,
    error: Option<Error>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                // The newline pattern owns the indentation that follows it, so
                // the plain whitespace skip below never sees a line start.
                RegexPattern { regex: Regex::new("\r?\n[ \t]*").unwrap(), handler: newline_handler},
                RegexPattern { regex: Regex::new("[ \t\r]+").unwrap(), handler: skip_handler},
                RegexPattern { regex: Regex::new("#[^\n]*").unwrap(), handler: skip_handler},
                RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler},
                RegexPattern { regex: Regex::new("[0-9]+").unwrap(), handler: number_handler},
                RegexPattern { regex: Regex::new("->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")},
                RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")},
                RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")},
                RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")},
                RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<")},
                RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")},
                RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")},
                RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")},
                RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")},
                RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")},
                RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")},
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")},
                RegexPattern { regex: Regex::new("\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")},
                RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")},
                RegexPattern { regex: Regex::new("\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*")},
                RegexPattern { regex: Regex::new("//").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashSlash, "//")},
                RegexPattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")}
            ],
            source,
            file: file_name,
            indent_stack: vec![0],
            error: None,
        }
    }

    pub fn advance_n(&mut self, n: i32) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.source.as_bytes()[self.pos as usize] as char
    }

    pub fn remainder(&self) -> Vec<char> {
        (self.source.as_bytes()[(self.pos as usize)..])
            .iter()
            .map(|x| *x as char)
            .collect::<Vec<char>>()
    }

    pub fn at_eof(&self) -> bool {
        self.pos as usize >= self.source.len()
    }

    // True when the last pushed token belongs to a logical line, i.e. the
    // next newline actually terminates a statement.
    fn line_has_content(&self) -> bool {
        self.tokens
            .last()
            .map(|token| {
                !matches!(
                    token.kind,
                    TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
                )
            })
            .unwrap_or(false)
    }

    fn layout_span(&self) -> Span {
        Span {
            start: Position(self.pos as u32, Rc::clone(&self.file)),
            end: Position(self.pos as u32, Rc::clone(&self.file)),
        }
    }
}

fn number_handler(lexer: &mut Lexer, regex: Regex) {
    let remaining = &lexer.remainder().iter().collect::<String>();
    let matched = regex.find(remaining).unwrap().as_str().to_string();

    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), Span { start: Position(lexer.pos as u32, Rc::clone(&lexer.file)), end: Position((lexer.pos + matched.len() as i32) as u32, Rc::clone(&lexer.file)) }));
    lexer.advance_n(matched.len() as i32);
}

fn skip_handler(lexer: &mut Lexer, regex: Regex) {
    let remaining = &lexer.remainder().iter().collect::<String>();
    let matched = regex.find(remaining).unwrap().end();
    lexer.advance_n(matched as i32);
}

fn symbol_handler(lexer: &mut Lexer, regex: Regex) {
    let binding = lexer.remainder().iter().collect::<String>();
    let value = regex.find(&binding).unwrap();

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, String::from(value.as_str()), Span { start: Position(lexer.pos as u32, Rc::clone(&lexer.file)), end: Position((lexer.pos + value.len() as i32) as u32, Rc::clone(&lexer.file)) }));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, String::from(value.as_str()), Span { start: Position(lexer.pos as u32, Rc::clone(&lexer.file)), end: Position((lexer.pos + value.len() as i32) as u32, Rc::clone(&lexer.file)) }));
    }

    lexer.advance_n(value.len() as i32);
}

// Consumes the line break plus the indentation of the following line, then
// emits Newline/Indent/Dedent tokens against the indent stack. Blank and
// comment-only lines carry no layout information and emit nothing.
fn newline_handler(lexer: &mut Lexer, regex: Regex) {
    let remaining = &lexer.remainder().iter().collect::<String>();
    let matched = regex.find(remaining).unwrap();
    let text = matched.as_str();
    let width = text.len() - text.trim_end_matches(|c| c == ' ' || c == '\t').len();
    lexer.advance_n(matched.end() as i32);

    if !lexer.at_eof() {
        let next = lexer.at();
        if next == '\n' || next == '\r' || next == '#' {
            return;
        }
    } else {
        return;
    }

    if lexer.line_has_content() {
        lexer.push(MK_TOKEN!(
            TokenKind::Newline,
            String::from("\n"),
            lexer.layout_span()
        ));
    }

    let current = *lexer.indent_stack.last().unwrap();
    if width > current {
        lexer.indent_stack.push(width);
        lexer.push(MK_TOKEN!(
            TokenKind::Indent,
            String::new(),
            lexer.layout_span()
        ));
    } else if width < current {
        while *lexer.indent_stack.last().unwrap() > width {
            lexer.indent_stack.pop();
            lexer.push(MK_TOKEN!(
                TokenKind::Dedent,
                String::new(),
                lexer.layout_span()
            ));
        }
        if *lexer.indent_stack.last().unwrap() != width {
            lexer.error = Some(Error::new(
                ErrorImpl::InconsistentDedent,
                Position(lexer.pos as u32, Rc::clone(&lexer.file)),
            ));
        }
    }
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in lex.clone().patterns.iter() {
            let string = &lex.remainder().iter().collect::<String>();
            let match_here = pattern.regex.find(string);

            if match_here.is_some() && match_here.unwrap().start() == 0 {
                (pattern.handler)(&mut lex, pattern.regex.clone());
                matched = true;
                break;
            }
        }

        if let Some(error) = lex.error.take() {
            return Err(error);
        }

        if !matched {
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token: lex.at().to_string() }, Position(lex.pos as u32, Rc::clone(&lex.file))));
        }
    }

    // Close the final logical line and any indentation still open.
    if lex.line_has_content() {
        lex.push(MK_TOKEN!(
            TokenKind::Newline,
            String::from("\n"),
            lex.layout_span()
        ));
    }
    while *lex.indent_stack.last().unwrap() > 0 {
        lex.indent_stack.pop();
        lex.push(MK_TOKEN!(
            TokenKind::Dedent,
            String::new(),
            lex.layout_span()
        ));
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span { start: Position(lex.pos as u32, Rc::clone(&lex.file)), end: Position(lex.pos as u32, Rc::clone(&lex.file)) }));
    Ok(lex.tokens)
}
