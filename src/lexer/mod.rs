use std::fmt;

use crate::lexer::cursor::Cursor;
use crate::symbol::{Opcode, Span, SrcOffset};

pub mod cursor;

/// A single token of assembly source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Mnemonic, resolved against the opcode table. Unknown names resolve to
    /// `Opcode::Igl` rather than failing.
    Op(Opcode),
    /// `$N` register reference. Any `u8` lexes; indices past the register
    /// file only fault at execution time.
    Reg(u8),
    /// `#N` immediate literal.
    Lit(i32),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Op(op) => write!(f, "{op}"),
            TokenKind::Reg(r) => write!(f, "${r}"),
            TokenKind::Lit(v) => write!(f, "#{v}"),
        }
    }
}

/// Scanner faults. Each is recoverable by the caller; one bad line must not
/// take down a session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LexError {
    /// Character outside the assembly alphabet.
    UnknownChar { ch: char, span: Span },
    /// Register reference does not fit in a byte.
    RegisterRange { span: Span },
    /// Immediate literal does not fit a signed 32-bit value.
    NumberRange { span: Span },
}

impl std::error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnknownChar { ch, .. } => write!(f, "unknown character {ch:?}"),
            LexError::RegisterRange { .. } => write!(f, "register reference out of range"),
            LexError::NumberRange { .. } => write!(f, "number literal out of range"),
        }
    }
}

/// Scanner over assembly source.
///
/// Produces the tokens of one instruction at a time: [`Lexer::next_token`]
/// returns `Ok(None)` both at a line break (flushing the current instruction)
/// and at end of input, so callers pull tokens until `None` and then start
/// the next instruction.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(src),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Lex the next token, left to right with no backtracking.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_horz_whitespace();

        let start = self.cursor.pos();
        let first_char = match self.cursor.bump() {
            Some(c) => c,
            None => return Ok(None),
        };

        match first_char {
            '$' if self.cursor.first().is_ascii_digit() => {
                let digits = self.take_digits();
                let span = self.span_from(start);
                match digits.parse::<u8>() {
                    Ok(reg) => Ok(Some(Token::new(TokenKind::Reg(reg), span))),
                    Err(_) => Err(LexError::RegisterRange { span }),
                }
            }
            '#' if self.cursor.first().is_ascii_digit() => {
                let digits = self.take_digits();
                let span = self.span_from(start);
                match digits.parse::<i32>() {
                    Ok(value) => Ok(Some(Token::new(TokenKind::Lit(value), span))),
                    Err(_) => Err(LexError::NumberRange { span }),
                }
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::from(c);
                while self.cursor.first().is_ascii_alphabetic() {
                    name.push(self.cursor.bump().unwrap());
                }
                let span = self.span_from(start);
                let opcode = Opcode::from_mnemonic(&name);
                Ok(Some(Token::new(TokenKind::Op(opcode), span)))
            }
            '\n' | '\r' => {
                // A run of line breaks and trailing blanks flushes the line.
                self.cursor
                    .take_while(|c| matches!(c, '\n' | '\r' | ' ' | '\t'));
                Ok(None)
            }
            c => Err(LexError::UnknownChar {
                ch: c,
                span: self.span_from(start),
            }),
        }
    }

    fn skip_horz_whitespace(&mut self) {
        self.cursor.take_while(|c| c == ' ' || c == '\t');
    }

    fn take_digits(&mut self) -> String {
        let mut digits = String::new();
        while self.cursor.first().is_ascii_digit() {
            digits.push(self.cursor.bump().unwrap());
        }
        digits
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(SrcOffset(start), self.cursor.pos() - start)
    }
}
