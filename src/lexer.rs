use std::fmt;

use crate::error::DataEvalError;

/// Source position, 1-based, computed on the normalized (`\n`-only) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// One of `{ } [ ] ( ) , : -`.
    Punct(char),
    /// Numeric literal, kept as raw text until the parser decides int/float.
    Number { text: String, is_float: bool },
    /// String literal with escapes already resolved.
    Str(String),
    /// Bare identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    Ident(String),
    /// An operator character the literal grammar never accepts (`+`, `*`,
    /// `=`, ...). Tokenized so the parser can reject it as an unsafe
    /// construct rather than a plain syntax error.
    Op(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

/// Turn normalized source text into a flat token sequence ending in `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DataEvalError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn here(&self) -> Pos {
        Pos::new(self.line, self.column)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.input.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n')) {
            self.bump();
        }
    }

    fn number(&mut self, start: usize, pos: Pos) -> Result<Token, DataEvalError> {
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => {
                    self.bump();
                }
                b'.' if !is_float => {
                    is_float = true;
                    self.bump();
                }
                b'e' | b'E' if matches!(self.peek2(), Some(b'0'..=b'9' | b'+' | b'-')) => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some(b'+' | b'-')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        // The scanned range is ASCII, so the slice is valid UTF-8.
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DataEvalError::syntax("invalid number literal", pos))?
            .to_string();
        Ok(Token {
            kind: TokenKind::Number { text, is_float },
            pos,
        })
    }

    fn identifier(&mut self, start: usize, pos: Pos) -> Result<Token, DataEvalError> {
        while let Some(c) = self.peek() {
            match c {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    self.bump();
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DataEvalError::syntax("invalid identifier", pos))?
            .to_string();
        Ok(Token {
            kind: TokenKind::Ident(text),
            pos,
        })
    }

    fn string(&mut self, quote: u8, pos: Pos) -> Result<Token, DataEvalError> {
        // Consume until the matching quote; preserve UTF-8 bytes as-is.
        let mut buf: Vec<u8> = Vec::new();
        while let Some(c) = self.bump() {
            if c == quote {
                let text = String::from_utf8(buf)
                    .map_err(|_| DataEvalError::syntax("invalid UTF-8 in string", pos))?;
                return Ok(Token {
                    kind: TokenKind::Str(text),
                    pos,
                });
            }
            if c == b'\\' {
                match self.bump() {
                    Some(b'\\') => buf.push(b'\\'),
                    Some(b'\'') => buf.push(b'\''),
                    Some(b'"') => buf.push(b'"'),
                    Some(b'n') => buf.push(b'\n'),
                    Some(b't') => buf.push(b'\t'),
                    Some(b'r') => buf.push(b'\r'),
                    Some(b'0') => buf.push(b'\0'),
                    Some(x) => buf.push(x),
                    None => {
                        return Err(DataEvalError::syntax("unterminated escape in string", pos))
                    }
                }
            } else {
                buf.push(c);
            }
        }
        Err(DataEvalError::syntax("unterminated string literal", pos))
    }

    fn next_token(&mut self) -> Result<Token, DataEvalError> {
        self.skip_ws();
        let pos = self.here();
        let start = self.pos;
        let ch = match self.bump() {
            Some(c) => c,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    pos,
                })
            }
        };

        match ch {
            b'0'..=b'9' => self.number(start, pos),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start, pos),
            b'"' | b'\'' => self.string(ch, pos),
            b'{' | b'}' | b'[' | b']' | b'(' | b')' | b',' | b':' | b'-' => Ok(Token {
                kind: TokenKind::Punct(ch as char),
                pos,
            }),
            b'+' | b'*' | b'/' | b'%' | b'<' | b'>' | b'=' | b'!' | b'&' | b'|' | b'^' | b'~'
            | b'@' => Ok(Token {
                kind: TokenKind::Op(ch as char),
                pos,
            }),
            _ => Err(DataEvalError::syntax(
                format!("unexpected character '{}'", ch as char),
                pos,
            )),
        }
    }
}
