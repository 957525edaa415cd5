// Referenced from `rustc_lexer` and adapted to suit the project.
// See https://doc.rust-lang.org/beta/nightly-rustc/src/rustc_lexer/cursor.rs.html

use std::str::Chars;

/// Sentinel returned by [`Cursor::first`] at end of input.
pub const EOF_CHAR: char = '\0';

/// Peekable iterator over a char sequence.
pub struct Cursor<'a> {
    len: usize,
    /// Iterator over chars in a &str
    chars: Chars<'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Cursor<'a> {
        Cursor {
            len: input.len(),
            chars: input.chars(),
        }
    }

    /// Returns the next character without consuming it.
    pub fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    /// Input is fully consumed.
    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Byte offset of the cursor within the original input.
    pub fn pos(&self) -> usize {
        self.len - self.chars.as_str().len()
    }

    /// Consume and return one character.
    pub fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consume characters while the predicate holds.
    pub fn take_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while pred(self.first()) && !self.is_eof() {
            self.bump();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn peek_and_bump() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.first(), 'a');
        assert_eq!(c.bump(), Some('a'));
        assert_eq!(c.bump(), Some('b'));
        assert_eq!(c.bump(), None);
        assert_eq!(c.first(), EOF_CHAR);
        assert!(c.is_eof());
    }

    #[test]
    fn position_tracks_bytes() {
        let mut c = Cursor::new("load $1");
        assert_eq!(c.pos(), 0);
        c.take_while(|ch| ch.is_ascii_alphabetic());
        assert_eq!(c.pos(), 4);
        assert_eq!(c.first(), ' ');
    }

    #[test]
    fn take_while_stops_at_eof() {
        let mut c = Cursor::new("123");
        c.take_while(|ch| ch.is_ascii_digit());
        assert!(c.is_eof());
        assert_eq!(c.pos(), 3);
    }
}
