//! Character cursor for the line parser.

use std::iter::Peekable;
use std::str::Chars;

/// Cursor over the characters of one input line with single-character lookahead.
pub struct Cursor<'src> {
    chars: Peekable<Chars<'src>>,
}

impl<'src> Cursor<'src> {
    pub fn new(line: &'src str) -> Self {
        Self {
            chars: line.chars().peekable(),
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn advance(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Consume the next character if it satisfies `predicate`.
    pub fn advance_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        self.chars.next_if(|c| predicate(*c))
    }

    pub fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Skip whitespace, returning whether any was consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.advance_if(char::is_whitespace).is_some() {
            skipped = true;
        }
        skipped
    }

    /// Parse a run of ASCII digits as a non-negative integer.
    ///
    /// Returns `None` when no digit is present or the value overflows `i64`.
    pub fn unsigned(&mut self) -> Option<i64> {
        let mut value: Option<i64> = None;
        let mut overflowed = false;

        while let Some(digit) = self.advance_if(|c| c.is_ascii_digit()) {
            let digit = i64::from(digit as u8 - b'0');
            match value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
            {
                Some(next) => value = Some(next),
                None => overflowed = true,
            }
        }

        if overflowed {
            None
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_reading_digits_the_value_is_decoded() {
        let mut cursor = Cursor::new("042 7");

        assert_eq!(cursor.unsigned(), Some(42));
        assert!(cursor.skip_whitespace());
        assert_eq!(cursor.unsigned(), Some(7));
        assert!(cursor.at_end());
    }

    #[test]
    fn when_there_are_no_digits_nothing_is_consumed() {
        let mut cursor = Cursor::new("-1");

        assert_eq!(cursor.unsigned(), None);
        assert_eq!(cursor.peek(), Some('-'));
    }

    #[test]
    fn when_the_number_overflows_none_is_returned() {
        let mut cursor = Cursor::new("99999999999999999999");

        assert_eq!(cursor.unsigned(), None);
        assert!(cursor.at_end());
    }
}
