//! Source positions measured in UTF-16 code units.
//!
//! The scanner works over UTF-8 or UTF-16 buffers, but every position it
//! reports is a character offset: the number of UTF-16 code units from the
//! start of the source. Encoded-unit offsets only appear where a caller asks
//! for them explicitly (`iecp_*` queries).

use std::fmt;

/// A position in source text, measured in UTF-16 code units.
pub type CharOffset = u32;

/// A span in source text, defined by a start offset and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    /// The character offset where this span starts.
    pub start: CharOffset,
    /// The length of this span in UTF-16 code units.
    pub length: CharOffset,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: CharOffset, length: CharOffset) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    #[inline]
    pub fn from_bounds(start: CharOffset, end: CharOffset) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    /// The end offset of this span (exclusive).
    #[inline]
    pub fn end(&self) -> CharOffset {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Convert a `usize` offset into a [`CharOffset`], saturating on overflow.
#[inline]
pub fn char_offset(value: usize) -> CharOffset {
    CharOffset::try_from(value).unwrap_or(CharOffset::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        let span = TextSpan::from_bounds(3, 7);
        assert_eq!(span, TextSpan::new(3, 4));
        assert_eq!(span.end(), 7);
        assert!(!span.is_empty());
        assert!(TextSpan::from_bounds(5, 5).is_empty());
    }

    #[test]
    fn test_span_formatting() {
        let span = TextSpan::new(2, 3);
        assert_eq!(format!("{:?}", span), "2..5");
        assert_eq!(span.to_string(), "[2, 5)");
    }

    #[test]
    fn test_char_offset_saturates() {
        assert_eq!(char_offset(12), 12);
        assert_eq!(char_offset(usize::MAX), CharOffset::MAX);
    }
}
