/// A cursor for inline scanning with byte position tracking.
///
/// Delimiters are ASCII, so byte-level peeks are safe; [`Cursor::bump_char`]
/// steps over whole UTF-8 sequences so the position always sits on a char
/// boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// The byte right before the cursor.
    pub fn prev(&self) -> Option<u8> {
        self.i
            .checked_sub(1)
            .and_then(|j| self.s.as_bytes().get(j).copied())
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.s.as_bytes()[self.i.min(self.s.len())..].starts_with(pat.as_bytes())
    }

    /// Advances by `n` bytes. Callers only skip ASCII delimiters.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances over one character.
    pub fn bump_char(&mut self) {
        let step = self.s[self.i..].chars().next().map_or(1, char::len_utf8);
        self.i += step;
    }

    /// Moves to the next occurrence of `b`, returning `false` (and leaving
    /// the cursor at end of input) when there is none.
    pub fn skip_to(&mut self, b: u8) -> bool {
        match self.s.as_bytes()[self.i..].iter().position(|c| *c == b) {
            Some(j) => {
                self.i += j;
                true
            }
            None => {
                self.i = self.s.len();
                false
            }
        }
    }

    /// Like [`Cursor::skip_to`] for a multi-byte delimiter.
    pub fn skip_to_str(&mut self, pat: &str) -> bool {
        match self.s[self.i..].find(pat) {
            Some(j) => {
                self.i += j;
                true
            }
            None => {
                self.i = self.s.len();
                false
            }
        }
    }
}
