//! Source encodings the scanner is instantiated over.
//!
//! The scanner is generic over an [`EncodingPolicy`]. `Utf16Policy` reads one
//! `u16` per code unit; `Utf8Policy` reads bytes and decodes multi-byte
//! sequences, which is what makes "multi-unit" bookkeeping necessary: every
//! character that spans more encoded units than UTF-16 units widens the gap
//! between encoded offsets (`iecp`) and character offsets (`ich`).

use crate::char_codes::is_line_terminator;
use crate::hash_tbl::{HashTbl, IdentPtr, InternError};
use jsscan_core::utf16::{code_point_to_surrogate_pair, utf16_len};
use std::fmt;

/// Decoding rules for one source encoding.
pub trait EncodingPolicy: 'static {
    /// One encoded unit of the buffer.
    type Unit: Copy + Eq + fmt::Debug + 'static;

    /// Whether a single character may span several units.
    const MULTI_UNIT: bool;

    /// Human readable encoding name for logs.
    const NAME: &'static str;

    /// Widen a unit to a code point value. Non-ASCII UTF-8 bytes come back
    /// as-is and must go through [`decode`](Self::decode).
    fn unit(unit: Self::Unit) -> u32;

    /// Decode the character starting at `pos`, returning its value and the
    /// number of units consumed. `pos` must be in bounds.
    ///
    /// UTF-16 never combines surrogates here; the scanner pairs them. With
    /// `allow_cesu`, UTF-8 accepts three-byte encoded surrogates and returns
    /// the lone surrogate value.
    fn decode(src: &[Self::Unit], pos: usize, allow_cesu: bool) -> (u32, usize);

    /// Encoded offset of the `char_offset`-th UTF-16 unit, counting from the
    /// start of `src`. Saturates at `src.len()`.
    fn unit_offset(src: &[Self::Unit], char_offset: usize, allow_cesu: bool) -> usize {
        let mut pos = 0;
        let mut chars = 0;
        while pos < src.len() && chars < char_offset {
            let (cp, width) = Self::decode(src, pos, allow_cesu);
            pos += width;
            chars += utf16_len(cp);
        }
        pos
    }

    /// Find the end of a line comment body starting at `pos`: the position
    /// of the next line terminator, or `src.len()`. The second value is the
    /// multi-unit count of the skipped text.
    fn line_comment_end(src: &[Self::Unit], pos: usize, allow_cesu: bool) -> (usize, usize) {
        let mut pos = pos;
        let mut multi_units = 0;
        while pos < src.len() {
            let (cp, width) = Self::decode(src, pos, allow_cesu);
            if is_line_terminator(cp) {
                break;
            }
            pos += width;
            multi_units += width - utf16_len(cp);
        }
        (pos, multi_units)
    }

    /// Intern a run of units containing no escapes.
    fn intern<'a>(table: &mut HashTbl<'a>, units: &[Self::Unit]) -> Result<IdentPtr<'a>, InternError>;
}

/// UTF-16 code units, one per character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16Policy;

impl EncodingPolicy for Utf16Policy {
    type Unit = u16;
    const MULTI_UNIT: bool = false;
    const NAME: &'static str = "utf-16";

    #[inline]
    fn unit(unit: u16) -> u32 {
        u32::from(unit)
    }

    #[inline]
    fn decode(src: &[u16], pos: usize, _allow_cesu: bool) -> (u32, usize) {
        (u32::from(src[pos]), 1)
    }

    #[inline]
    fn unit_offset(src: &[u16], char_offset: usize, _allow_cesu: bool) -> usize {
        char_offset.min(src.len())
    }

    fn intern<'a>(table: &mut HashTbl<'a>, units: &[u16]) -> Result<IdentPtr<'a>, InternError> {
        table.intern(units)
    }
}

/// UTF-8 bytes (optionally CESU-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf8Policy;

const REPLACEMENT: (u32, usize) = (0xFFFD, 1);

#[inline]
fn continuation(src: &[u8], pos: usize) -> Option<u32> {
    match src.get(pos) {
        Some(&b) if b & 0xC0 == 0x80 => Some(u32::from(b & 0x3F)),
        _ => None,
    }
}

impl EncodingPolicy for Utf8Policy {
    type Unit = u8;
    const MULTI_UNIT: bool = true;
    const NAME: &'static str = "utf-8";

    #[inline]
    fn unit(unit: u8) -> u32 {
        u32::from(unit)
    }

    fn decode(src: &[u8], pos: usize, allow_cesu: bool) -> (u32, usize) {
        let lead = src[pos];
        match lead {
            0x00..=0x7F => (u32::from(lead), 1),
            0xC2..=0xDF => match continuation(src, pos + 1) {
                Some(c1) => ((u32::from(lead & 0x1F) << 6) | c1, 2),
                None => REPLACEMENT,
            },
            0xE0..=0xEF => {
                let (Some(c1), Some(c2)) = (continuation(src, pos + 1), continuation(src, pos + 2))
                else {
                    return REPLACEMENT;
                };
                let cp = (u32::from(lead & 0x0F) << 12) | (c1 << 6) | c2;
                if cp < 0x800 || ((0xD800..=0xDFFF).contains(&cp) && !allow_cesu) {
                    REPLACEMENT
                } else {
                    (cp, 3)
                }
            }
            0xF0..=0xF4 => {
                let (Some(c1), Some(c2), Some(c3)) = (
                    continuation(src, pos + 1),
                    continuation(src, pos + 2),
                    continuation(src, pos + 3),
                ) else {
                    return REPLACEMENT;
                };
                let cp = (u32::from(lead & 0x07) << 18) | (c1 << 12) | (c2 << 6) | c3;
                if !(0x10000..=0x10FFFF).contains(&cp) {
                    REPLACEMENT
                } else {
                    (cp, 4)
                }
            }
            _ => REPLACEMENT,
        }
    }

    fn line_comment_end(src: &[u8], pos: usize, allow_cesu: bool) -> (usize, usize) {
        // LF, CR, or the lead byte shared by U+2028 and U+2029.
        let mut end = pos;
        loop {
            let Some(offset) = memchr::memchr3(b'\n', b'\r', 0xE2, &src[end..]) else {
                end = src.len();
                break;
            };
            end += offset;
            if src[end] != 0xE2 || matches!(src.get(end + 1..end + 3), Some([0x80, 0xA8 | 0xA9])) {
                break;
            }
            end += 1;
        }
        if src[pos..end].is_ascii() {
            return (end, 0);
        }
        let mut at = pos;
        let mut multi_units = 0;
        while at < end {
            let (cp, width) = Self::decode(&src[..end], at, allow_cesu);
            at += width;
            multi_units += width - utf16_len(cp);
        }
        (end, multi_units)
    }

    fn intern<'a>(table: &mut HashTbl<'a>, units: &[u8]) -> Result<IdentPtr<'a>, InternError> {
        table.intern(units)
    }
}

/// Iterator over the UTF-16 units of a UTF-8 (or CESU-8) byte string.
#[derive(Debug, Clone)]
pub struct Utf8Units<'s> {
    bytes: &'s [u8],
    pos: usize,
    pending_low: Option<u16>,
}

impl<'s> Utf8Units<'s> {
    pub fn new(bytes: &'s [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            pending_low: None,
        }
    }
}

impl Iterator for Utf8Units<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if let Some(low) = self.pending_low.take() {
            return Some(low);
        }
        if self.pos >= self.bytes.len() {
            return None;
        }
        let (cp, width) = Utf8Policy::decode(self.bytes, self.pos, true);
        self.pos += width;
        if cp > 0xFFFF {
            let (high, low) = code_point_to_surrogate_pair(cp);
            self.pending_low = Some(low);
            Some(high)
        } else {
            Some(cp as u16)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_decode_widths() {
        let src = "a\u{e9}\u{20ac}\u{1F600}".as_bytes();
        assert_eq!(Utf8Policy::decode(src, 0, false), (0x61, 1));
        assert_eq!(Utf8Policy::decode(src, 1, false), (0xE9, 2));
        assert_eq!(Utf8Policy::decode(src, 3, false), (0x20AC, 3));
        assert_eq!(Utf8Policy::decode(src, 6, false), (0x1F600, 4));
    }

    #[test]
    fn test_utf8_decode_invalid() {
        assert_eq!(Utf8Policy::decode(&[0xFF], 0, false), (0xFFFD, 1));
        assert_eq!(Utf8Policy::decode(&[0xC3], 0, false), (0xFFFD, 1));
        // Overlong encoding of '/'
        assert_eq!(Utf8Policy::decode(&[0xE0, 0x80, 0xAF], 0, false), (0xFFFD, 1));
    }

    #[test]
    fn test_cesu_surrogates() {
        // U+D83D encoded as three bytes
        let high = [0xED, 0xA0, 0xBD];
        assert_eq!(Utf8Policy::decode(&high, 0, false), (0xFFFD, 1));
        assert_eq!(Utf8Policy::decode(&high, 0, true), (0xD83D, 3));
    }

    #[test]
    fn test_unit_offset() {
        let src = "\u{e9}x\u{1F600}y".as_bytes();
        assert_eq!(Utf8Policy::unit_offset(src, 0, false), 0);
        assert_eq!(Utf8Policy::unit_offset(src, 1, false), 2);
        assert_eq!(Utf8Policy::unit_offset(src, 2, false), 3);
        assert_eq!(Utf8Policy::unit_offset(src, 4, false), 7);
        assert_eq!(Utf8Policy::unit_offset(src, 99, false), src.len());

        let wide: Vec<u16> = "abc".encode_utf16().collect();
        assert_eq!(Utf16Policy::unit_offset(&wide, 2, false), 2);
    }

    #[test]
    fn test_line_comment_end() {
        let src = "ab\u{e9}\u{2026}\u{2028}x".as_bytes();
        assert_eq!(Utf8Policy::line_comment_end(src, 0, false), (7, 3));
        assert_eq!(Utf8Policy::line_comment_end(b"abc\r\n", 1, false), (3, 0));
        assert_eq!(Utf8Policy::line_comment_end(b"abc", 0, false), (3, 0));

        let wide: Vec<u16> = "ab\u{2029}".encode_utf16().collect();
        assert_eq!(Utf16Policy::line_comment_end(&wide, 0, false), (2, 0));
    }

    #[test]
    fn test_utf8_units_split_astral() {
        let units: Vec<u16> = Utf8Units::new("a\u{1F600}".as_bytes()).collect();
        let expected: Vec<u16> = "a\u{1F600}".encode_utf16().collect();
        assert_eq!(units, expected);
    }
}
