//! Table extraction.
//!
//! Locates the `const <Type> <Name>[] = {` declaration, then walks the body
//! as a list of brace groups. Each group is either a glyph entry
//!
//! ```text
//! { "<key>" , { <payload> } , /* "<key>", <index> */ <decoration> }
//! ```
//!
//! or, in last position only, a sentinel such as `{0}` or `{"", {0}}`.
//!
//! Tokens are pulled from the lexer only up to the closing brace of the
//! body, so the footer is never tokenized.

use tracing::debug;

use super::lexer::{Lexer, Token, TokenKind};
use super::{Entry, LineEnding, ParseError, Position, TableDocument};
use crate::error::CompactError;

/// Parse the first table declaration found in `src`.
pub fn parse(src: &str) -> Result<TableDocument, CompactError> {
    parse_named(src, None)
}

/// Parse the table declaration named `name`, or the first one when `name` is `None`.
///
/// Fails with [`CompactError::Parse`] on malformed text and with
/// [`CompactError::MalformedTable`] when the body holds no entries.
pub fn parse_named(src: &str, name: Option<&str>) -> Result<TableDocument, CompactError> {
    let (parser, table_name, open) = Parser::scan(src, name)?;
    let body = parser.parse_body(open)?;

    if body.entries.is_empty() {
        return Err(CompactError::MalformedTable { table: table_name });
    }

    debug!(
        table = %table_name,
        entries = body.entries.len(),
        sentinel = body.sentinel.is_some(),
        "parsed glyph table"
    );

    let header = &src[..parser.tokens[open].span.end];
    Ok(TableDocument {
        name: table_name,
        line_ending: LineEnding::detect(header, src),
        header: header.to_string(),
        entries: body.entries,
        sentinel: body.sentinel,
        footer: src[body.footer_start..].to_string(),
    })
}

struct Body {
    entries: Vec<Entry>,
    sentinel: Option<String>,
    footer_start: usize,
}

enum Group {
    Entry(Entry),
    Sentinel(String),
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Parser<'a> {
    fn text(&self, idx: usize) -> &'a str {
        self.tokens[idx].text(self.src)
    }

    fn position(&self, idx: usize) -> Position {
        self.tokens[idx].position
    }

    /// Index of the first non-trivia token at or after `idx`, before `end`.
    fn significant(&self, idx: usize, end: usize) -> Option<usize> {
        (idx..end).find(|&i| !self.tokens[i].is_trivia())
    }

    fn end_position(&self) -> Position {
        self.tokens
            .last()
            .map(|t| t.position)
            .unwrap_or_default()
    }

    fn describe(&self, idx: usize) -> String {
        format!("`{}`", self.text(idx))
    }

    /// Lex `src` up to the closing brace of the wanted table body.
    ///
    /// Returns the parser together with the table name and the token index of
    /// the body's opening brace.
    fn scan(src: &'a str, wanted: Option<&str>) -> Result<(Self, String, usize), ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut sig: Vec<usize> = Vec::new();
        let mut declaration: Option<(String, usize)> = None;
        let mut depth = 0usize;

        for token in Lexer::new(src) {
            let token = token?;
            let idx = tokens.len();
            let trivia = token.is_trivia();
            tokens.push(token);
            if trivia {
                continue;
            }
            sig.push(idx);

            if declaration.is_some() {
                if tokens[idx].is_punct('{') {
                    depth += 1;
                } else if tokens[idx].is_punct('}') {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            } else if let Some(name) = declaration_name(src, &tokens, &sig) {
                if wanted.map_or(true, |w| w == name) {
                    declaration = Some((name.to_string(), idx));
                    depth = 1;
                }
            }
        }

        match declaration {
            Some((name, open)) => Ok((Self { src, tokens }, name, open)),
            None => {
                let message = match wanted {
                    Some(name) => {
                        format!("no table declaration `const <type> {}[] = {{` found", name)
                    }
                    None => "no table declaration `const <type> <name>[] = {` found".to_string(),
                };
                Err(ParseError::new(Position::new(1, 1), message))
            }
        }
    }

    /// Index of the `}` matching the `{` at `open`.
    fn matching_brace(&self, open: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
        }
        Err(ParseError::new(self.position(open), "unbalanced `{`: no matching `}`"))
    }

    fn parse_body(&self, open: usize) -> Result<Body, ParseError> {
        let end = self.tokens.len();
        let mut entries = Vec::new();
        let mut sentinel: Option<String> = None;
        let mut cursor = open + 1;

        loop {
            let idx = self.significant(cursor, end).ok_or_else(|| {
                ParseError::new(
                    self.position(open),
                    "table body is not closed: missing `};`",
                )
            })?;
            let token = &self.tokens[idx];

            if token.is_punct('}') {
                return Ok(Body {
                    entries,
                    sentinel,
                    footer_start: token.span.start,
                });
            }
            if !token.is_punct('{') {
                return Err(ParseError::new(
                    token.position,
                    format!("expected `{{` to start a table entry, found {}", self.describe(idx)),
                ));
            }
            if sentinel.is_some() {
                return Err(ParseError::new(
                    token.position,
                    "table entry found after the terminating sentinel",
                ));
            }

            let close = self.matching_brace(idx)?;
            match self.parse_group(idx, close)? {
                Group::Entry(entry) => entries.push(entry),
                Group::Sentinel(text) => sentinel = Some(text),
            }

            cursor = close + 1;
            match self.significant(cursor, end) {
                Some(next) if self.tokens[next].is_punct(',') => cursor = next + 1,
                Some(next) if self.tokens[next].is_punct('}') => cursor = next,
                Some(next) => {
                    return Err(ParseError::new(
                        self.position(next),
                        format!("expected `,` after table entry, found {}", self.describe(next)),
                    ));
                }
                None => {
                    return Err(ParseError::new(
                        self.end_position(),
                        "table body is not closed: missing `};`",
                    ));
                }
            }
        }
    }

    fn parse_group(&self, open: usize, close: usize) -> Result<Group, ParseError> {
        let raw_start = self.tokens[open].span.start;
        let raw_text = &self.src[raw_start..self.tokens[close].span.end];

        let first = match self.significant(open + 1, close) {
            Some(i) if self.tokens[i].kind == TokenKind::Str && self.text(i).len() > 2 => i,
            _ => return Ok(Group::Sentinel(raw_text.to_string())),
        };
        let key_literal = self.text(first);
        let key = &key_literal[1..key_literal.len() - 1];

        let comma = self
            .significant(first + 1, close)
            .filter(|&i| self.tokens[i].is_punct(','))
            .ok_or_else(|| {
                ParseError::new(self.position(first), format!("expected `,` after key \"{}\"", key))
            })?;

        let payload_open = self
            .significant(comma + 1, close)
            .filter(|&i| self.tokens[i].is_punct('{'))
            .ok_or_else(|| {
                ParseError::new(
                    self.position(first),
                    format!("expected `{{` to start the payload of \"{}\"", key),
                )
            })?;
        let payload_close = self.matching_brace(payload_open)?;
        let payload =
            &self.src[self.tokens[payload_open].span.end..self.tokens[payload_close].span.start];

        let annotation = self.find_annotation(payload_close + 1, close, key)?;
        let (label, old_index, digits) = self.parse_annotation(annotation)?;

        Ok(Group::Entry(Entry::new(
            key.to_string(),
            payload.to_string(),
            old_index,
            label,
            self.position(open),
            raw_text.to_string(),
            digits.start - raw_start..digits.end - raw_start,
        )))
    }

    /// The first block comment after the payload, allowing only a `,` before it.
    fn find_annotation(&self, from: usize, close: usize, key: &str) -> Result<usize, ParseError> {
        for i in from..close {
            let token = &self.tokens[i];
            match token.kind {
                TokenKind::BlockComment => return Ok(i),
                TokenKind::Whitespace | TokenKind::LineComment | TokenKind::Punct(',') => {}
                _ => {
                    return Err(ParseError::new(
                        token.position,
                        format!(
                            "expected index annotation /*\"{}\",<index>*/ after payload, found {}",
                            key,
                            self.describe(i)
                        ),
                    ));
                }
            }
        }
        Err(ParseError::new(
            self.position(close),
            format!("missing index annotation /*\"{}\",<index>*/", key),
        ))
    }

    /// Split `/* ... "<label>" , <digits> ... */` into label, index and the
    /// absolute byte range of the digits.
    fn parse_annotation(
        &self,
        idx: usize,
    ) -> Result<(String, usize, std::ops::Range<usize>), ParseError> {
        let span = self.tokens[idx].span.clone();
        let inner_start = span.start + 2;
        let inner = &self.src[inner_start..span.end - 2];
        let malformed = |what: &str| {
            ParseError::new(
                self.position(idx),
                format!("malformed index annotation {}: {}", self.describe(idx), what),
            )
        };

        let open_quote = inner.find('"').ok_or_else(|| malformed("no quoted key"))?;
        let mut close_quote = None;
        let mut escaped = false;
        for (i, c) in inner[open_quote + 1..].char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    close_quote = Some(open_quote + 1 + i);
                    break;
                }
                _ => {}
            }
        }
        let close_quote = close_quote.ok_or_else(|| malformed("unterminated key"))?;
        let label = &inner[open_quote + 1..close_quote];

        let mut cursor = close_quote + 1;
        cursor += leading_whitespace(&inner[cursor..]);
        if !inner[cursor..].starts_with(',') {
            return Err(malformed("expected `,` after key"));
        }
        cursor += 1;
        cursor += leading_whitespace(&inner[cursor..]);

        let digits_len = inner[cursor..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len == 0 {
            return Err(malformed("no index number"));
        }
        let index = inner[cursor..cursor + digits_len]
            .parse::<usize>()
            .map_err(|_| malformed("index out of range"))?;

        let start = inner_start + cursor;
        Ok((label.to_string(), index, start..start + digits_len))
    }
}

/// Name of the table when the significant tokens `sig` end with
/// `const <Type...> <Name> [ <N>? ] = {`.
fn declaration_name<'a>(src: &'a str, tokens: &[Token], sig: &[usize]) -> Option<&'a str> {
    let mut rest = sig.iter().rev().map(|&i| &tokens[i]);
    if !rest.next()?.is_punct('{') || !rest.next()?.is_punct('=') || !rest.next()?.is_punct(']') {
        return None;
    }
    let mut token = rest.next()?;
    if token.kind == TokenKind::Number {
        token = rest.next()?;
    }
    if !token.is_punct('[') {
        return None;
    }

    let idents: Vec<&Token> = rest.take_while(|t| t.kind == TokenKind::Ident).collect();
    // `idents` runs backwards from the name: name, type..., then `const`
    let has_const = idents.iter().skip(2).any(|t| t.is_ident(src, "const"));
    if has_const {
        Some(idents[0].text(src))
    } else {
        None
    }
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
