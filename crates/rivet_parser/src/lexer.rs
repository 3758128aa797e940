//! Line-oriented lexer.
//!
//! Each line is scanned independently (block comments excepted). A line whose
//! trimmed text starts with `//` becomes a single [`TokenKind::Comment`] token.
//! Everything else is split at whitespace and at class boundaries, so `q<=d;`
//! yields `q`, `<=`, `d`, `;` rather than one unclassifiable word. Characters
//! that belong to no class are dropped.

use crate::token::{lookup_keyword, Token, TokenKind};

/// Operators, longest first so that matching is maximal-munch.
const OPERATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "=", "&", "|", "^", "~", "+",
    "-", "*", "/", "!", "<", ">", "%", "?",
];

const PUNCTUATION: &[u8] = b"()[]{};,:@#.";

/// Lexes source text into tokens with exact 1-based line and column positions.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut in_block_comment = false;
    for (index, line) in source.lines().enumerate() {
        let mut lexer = Lexer {
            source: line,
            bytes: line.as_bytes(),
            pos: 0,
            line: index as u32 + 1,
            tokens: &mut tokens,
        };
        in_block_comment = lexer.lex_line(in_block_comment);
    }
    tokens
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    tokens: &'a mut Vec<Token>,
}

impl Lexer<'_> {
    /// Lexes the whole line. Returns whether a block comment is still open at its end.
    fn lex_line(&mut self, mut in_block_comment: bool) -> bool {
        let source = self.source;
        if !in_block_comment {
            let trimmed = source.trim_start();
            if trimmed.starts_with("//") {
                let start = source.len() - trimmed.len();
                self.pos = start;
                self.push_text(TokenKind::Comment, start, trimmed.trim_end());
                return false;
            }
        }

        while self.pos < self.bytes.len() {
            if in_block_comment {
                in_block_comment = self.lex_block_comment(self.pos);
                continue;
            }

            let start = self.pos;
            let b = self.peek();

            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'/' && self.peek_at(1) == b'/' {
                self.pos = self.bytes.len();
                self.push(TokenKind::Comment, start);
            } else if b == b'/' && self.peek_at(1) == b'*' {
                self.pos += 2;
                in_block_comment = self.lex_block_comment(start);
            } else if is_ident_start(b) || (b == b'$' && is_ident_start(self.peek_at(1))) {
                self.lex_identifier_or_keyword(start);
            } else if b.is_ascii_digit() {
                self.lex_number(start);
            } else if b == b'\'' && is_base_char(self.peek_at(1)) {
                self.lex_based_digits();
                self.push(TokenKind::Number, start);
            } else if b == b'"' {
                self.lex_string(start);
            } else if !self.lex_operator(start) {
                // Unclassifiable character: skip the whole UTF-8 sequence.
                let width = source[start..].chars().next().map_or(1, char::len_utf8);
                self.pos += width;
            }
        }
        in_block_comment
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn column_of(&self, start: usize) -> u32 {
        self.source[..start].chars().count() as u32 + 1
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let source = self.source;
        self.push_text(kind, start, &source[start..self.pos]);
    }

    fn push_text(&mut self, kind: TokenKind, start: usize, text: &str) {
        let column = self.column_of(start);
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            column,
        });
    }

    /// Consumes block comment text from `self.pos`; the token starts at `start`.
    fn lex_block_comment(&mut self, start: usize) -> bool {
        let source = self.source;
        match source[self.pos..].find("*/") {
            Some(offset) => {
                self.pos += offset + 2;
                self.push(TokenKind::Comment, start);
                false
            }
            None => {
                self.pos = self.bytes.len();
                if !source[start..].trim().is_empty() {
                    self.push(TokenKind::Comment, start);
                }
                true
            }
        }
    }

    fn lex_identifier_or_keyword(&mut self, start: usize) {
        self.pos += 1;
        while is_ident_char(self.peek()) {
            self.pos += 1;
        }
        let source = self.source;
        let kind = match lookup_keyword(&source[start..self.pos]) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Identifier,
        };
        self.push(kind, start);
    }

    fn lex_number(&mut self, start: usize) {
        while self.peek().is_ascii_digit() || self.peek() == b'_' {
            self.pos += 1;
        }
        if self.peek() == b'\'' && is_base_char(self.peek_at(1)) {
            self.lex_based_digits();
        }
        self.push(TokenKind::Number, start);
    }

    /// Consumes `'[s]<base><digits>` starting at the tick.
    fn lex_based_digits(&mut self) {
        self.pos += 1;
        if matches!(self.peek(), b's' | b'S') {
            self.pos += 1;
        }
        let base = self.peek().to_ascii_lowercase();
        if !matches!(base, b'b' | b'o' | b'd' | b'h') {
            return;
        }
        self.pos += 1;
        loop {
            let ch = self.peek().to_ascii_lowercase();
            let valid = match base {
                b'b' => matches!(ch, b'0' | b'1'),
                b'o' => matches!(ch, b'0'..=b'7'),
                b'd' => ch.is_ascii_digit(),
                _ => ch.is_ascii_hexdigit(),
            };
            if valid || matches!(ch, b'x' | b'z' | b'?' | b'_') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, start: usize) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.peek() {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        self.push(TokenKind::String, start);
    }

    fn lex_operator(&mut self, start: usize) -> bool {
        let source = self.source;
        let rest = &source[start..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.pos += op.len();
            self.push(TokenKind::Operator, start);
            return true;
        }
        if PUNCTUATION.contains(&self.peek()) {
            self.pos += 1;
            self.push(TokenKind::Operator, start);
            return true;
        }
        false
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_base_char(b: u8) -> bool {
    matches!(
        b,
        b'b' | b'B' | b'o' | b'O' | b'd' | b'D' | b'h' | b'H' | b's' | b'S'
    )
}
