//! Source locations inside function bodies.
//!
//! Diagnostics produced while compiling a body point back into the body text
//! with a [`Span`]. Line and column are 1-indexed; the byte offset lets callers
//! slice the offending text out of the body.

use std::fmt;

/// A region of body source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character.
    pub offset: u32,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a span covering `len` bytes starting at `offset`.
    #[inline]
    pub fn new(offset: u32, line: u32, col: u32, len: u32) -> Self {
        Self {
            offset,
            line,
            col,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(offset: u32, line: u32, col: u32) -> Self {
        Self::new(offset, line, col, 0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Byte offset one past the last character.
    #[inline]
    pub fn end(&self) -> u32 {
        self.offset + self.len
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Line and column are taken from whichever span starts first.
    pub fn merge(self, other: Span) -> Span {
        let first = if self.offset <= other.offset {
            self
        } else {
            other
        };
        let end = self.end().max(other.end());
        Span {
            offset: first.offset,
            line: first.line,
            col: first.col,
            len: end - first.offset,
        }
    }

    /// The text this span covers, if it lies inside `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset as usize..self.end() as usize)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(4, 1, 5, 10);
        assert_eq!(span.len(), 10);
        assert_eq!(span.end(), 14);
        assert!(!span.is_empty());
        assert!(Span::point(4, 1, 5).is_empty());
    }

    #[test]
    fn span_display() {
        let span = Span::new(40, 3, 15, 5);
        assert_eq!(format!("{}", span), "3:15");
    }

    #[test]
    fn span_merge_is_order_independent() {
        let a = Span::new(4, 1, 5, 3);
        let b = Span::new(9, 1, 10, 3);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).offset, 4);
        assert_eq!(a.merge(b).len, 8);
    }

    #[test]
    fn span_merge_overlapping() {
        let a = Span::new(4, 1, 5, 5);
        let b = Span::new(7, 1, 8, 4);
        assert_eq!(a.merge(b).len, 7);
    }

    #[test]
    fn span_slice() {
        let source = "a + bcd";
        let span = Span::new(4, 1, 5, 3);
        assert_eq!(span.slice(source), Some("bcd"));
        assert_eq!(Span::new(6, 1, 7, 5).slice(source), None);
    }
}
