use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use logos::Logos;
use std::collections::VecDeque;
use std::io::{self, BufRead, Cursor};
use tracing::trace;

custom_error! {
    pub LexError

    BadToken{line: usize, text: String} = "bad token at line {line}: {text}",
    Io{source: io::Error} = "failed to read source: {source}",
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum Lexeme {
    #[regex("[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Number(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    String(String),

    #[regex("[A-Za-z_][A-Za-z0-9_]*", slice)]
    Identifier(String),

    #[token("==", slice)]
    #[token("<=", slice)]
    #[token(">=", slice)]
    #[token("&&", slice)]
    #[token("||", slice)]
    #[regex(r"[!#$%&'()*+,\-./:;<=>?@\[\\\]^`{|}~]", slice)]
    Punct(String),
}

fn slice(lex: &mut logos::Lexer<Lexeme>) -> String {
    lex.slice().to_owned()
}

fn unescape(literal: &str) -> String {
    let body = &literal[1..literal.len() - 1];
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => text.push('"'),
            Some('\\') => text.push('\\'),
            Some('n') => text.push('\n'),
            Some(other) => {
                text.push('\\');
                text.push(other);
            }
            None => text.push('\\'),
        }
    }
    text
}

/// Scans a single source line. The trailing end-of-line marker is not
/// included; `Lexer` appends it.
pub fn tokenize(line: &str, line_number: usize) -> Result<Vec<Token>, LexError> {
    let mut lex = Lexeme::lexer(line);
    let mut tokens = vec![];

    while let Some(lexeme) = lex.next() {
        let kind = match lexeme {
            Ok(Lexeme::Number(n)) => TokenKind::Number(n),
            Ok(Lexeme::String(s)) => TokenKind::String(s),
            Ok(Lexeme::Identifier(s)) | Ok(Lexeme::Punct(s)) => TokenKind::Identifier(s),
            Err(_) => {
                return Err(LexError::BadToken {
                    line: line_number,
                    text: line[lex.span().start..].trim_end().to_owned(),
                })
            }
        };
        tokens.push(Token::new(kind, line_number));
    }

    Ok(tokens)
}

/// Line-oriented token stream with arbitrary lookahead.
///
/// Lines are pulled from the reader only when `read` or `peek` needs more
/// tokens than are buffered, so a REPL can feed it interactively.
pub struct Lexer {
    reader: Box<dyn BufRead>,
    queue: VecDeque<Token>,
    has_more: bool,
    line_number: usize,
}

impl Lexer {
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            queue: VecDeque::new(),
            has_more: true,
            line_number: 0,
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(Cursor::new(source.to_owned()))
    }

    pub fn read(&mut self) -> Result<Token, LexError> {
        if self.fill_queue(0)? {
            if let Some(token) = self.queue.pop_front() {
                return Ok(token);
            }
        }
        Ok(Token::eof(self.line_number))
    }

    pub fn peek(&mut self, n: usize) -> Result<Token, LexError> {
        if self.fill_queue(n)? {
            Ok(self.queue[n].clone())
        } else {
            Ok(Token::eof(self.line_number))
        }
    }

    fn fill_queue(&mut self, n: usize) -> Result<bool, LexError> {
        while n >= self.queue.len() {
            if !self.has_more {
                return Ok(false);
            }
            self.read_line()?;
        }
        Ok(true)
    }

    fn read_line(&mut self) -> Result<(), LexError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.has_more = false;
            return Ok(());
        }
        self.line_number += 1;

        let tokens = tokenize(&line, self.line_number)?;
        trace!(line = self.line_number, tokens = tokens.len(), "lexed line");
        self.queue.extend(tokens);
        self.queue.push_back(Token::eol(self.line_number));
        Ok(())
    }
}
