//! Tokenizer for the C subset used by generated glyph tables.
//!
//! The lexer is deliberately coarse: it only needs to tell strings, comments
//! and braces apart reliably so the parser can pair braces without being
//! fooled by a `}` inside a comment or a string. Every token records its byte
//! span and the line/column where it starts.
//!
//! Preprocessor lines are a single trivia token, so free text in an `#error`
//! or `#pragma message` line never reaches the string and char rules.

use std::ops::Range;

use super::{ParseError, Position};

/// Token categories produced by [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    /// `#` preprocessor line, including backslash continuations
    Directive,
    /// Double-quoted string literal, quotes included
    Str,
    /// Single-quoted character literal, quotes included
    Char,
    Number,
    Ident,
    Punct(char),
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub position: Position,
}

impl Token {
    /// The token's text in `src`.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.span.clone()]
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Directive
        )
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn is_ident(&self, src: &str, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == name
    }
}

/// Streaming tokenizer over a source string.
pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn directive(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            if c == '\\' {
                if self.rest().starts_with("\r\n") {
                    self.bump();
                }
                if self.rest().starts_with('\n') {
                    self.bump();
                }
            }
        }
    }

    fn quoted(&mut self, quote: char, start: Position) -> Result<(), ParseError> {
        let what = if quote == '"' {
            "string literal"
        } else {
            "character literal"
        };
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(ParseError::new(start, format!("unterminated {}", what)));
                }
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(ParseError::new(start, format!("unterminated {}", what)));
                    }
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn block_comment(&mut self, start: Position) -> Result<(), ParseError> {
        self.bump();
        self.bump();
        loop {
            if self.rest().starts_with("*/") {
                self.bump();
                self.bump();
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(ParseError::new(start, "unterminated block comment"));
            }
        }
    }

    fn next_token(&mut self) -> Option<Result<Token, ParseError>> {
        let c = self.peek()?;
        let start = self.offset;
        let position = self.here();

        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            TokenKind::Whitespace
        } else if self.rest().starts_with("//") {
            self.eat_while(|c| c != '\n');
            TokenKind::LineComment
        } else if self.rest().starts_with("/*") {
            if let Err(e) = self.block_comment(position) {
                return Some(Err(e));
            }
            TokenKind::BlockComment
        } else if c == '#' {
            self.directive();
            TokenKind::Directive
        } else if c == '"' || c == '\'' {
            if let Err(e) = self.quoted(c, position) {
                return Some(Err(e));
            }
            if c == '"' {
                TokenKind::Str
            } else {
                TokenKind::Char
            }
        } else if c.is_ascii_digit() {
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
            TokenKind::Number
        } else if c.is_alphabetic() || c == '_' {
            self.eat_while(|c| c.is_alphanumeric() || c == '_');
            TokenKind::Ident
        } else {
            self.bump();
            TokenKind::Punct(c)
        };

        Some(Ok(Token {
            kind,
            span: start..self.offset,
            position,
        }))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a whole source string.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(src).collect()
}
