//! Unicode character classification for the scanner.
//!
//! ASCII goes through two static tables. Everything above 0x7F is answered by
//! the [`ClassifierStrategy`] chosen when the classifier is built: the legacy
//! (ES5) rules, which only know about the Basic Multilingual Plane, or the ES6
//! rules, which classify full code points with the Unicode XID tables.

use crate::char_codes::*;
use jsscan_core::utf16::{is_high_surrogate, is_low_surrogate, surrogate_pair_to_code_point};

/// Coarse character type used by the scanner's dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CharType {
    Unknown = 0,
    /// Not representable under the active rules (legacy mode, outside the BMP).
    Error,
    Whitespace,
    Newline,
    Letter,
    Digit,
    Dollar,
    Underscore,

    // Punctuators
    Exclamation,
    DoubleQuote,
    Hash,
    Percent,
    Ampersand,
    SingleQuote,
    OpenParen,
    CloseParen,
    Asterisk,
    Plus,
    Comma,
    Minus,
    Dot,
    Slash,
    Colon,
    Semicolon,
    LessThan,
    Equals,
    GreaterThan,
    Question,
    At,
    OpenBracket,
    Backslash,
    CloseBracket,
    Caret,
    Backtick,
    OpenBrace,
    Bar,
    CloseBrace,
    Tilde,
}

bitflags::bitflags! {
    /// Character property flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharFlags: u8 {
        const NONE      = 0;
        const SPACE     = 1 << 0;
        const LINE_FEED = 1 << 1;
        const LETTER    = 1 << 2;
        const HEX       = 1 << 3;
        const DECIMAL   = 1 << 4;
        const ID_LEAD   = 1 << 5;
        const ID_CHAR   = 1 << 6;

        const LETTER_GROUP  = Self::LETTER.bits() | Self::ID_LEAD.bits() | Self::ID_CHAR.bits();
        const DECIMAL_GROUP = Self::DECIMAL.bits() | Self::ID_CHAR.bits();
        const LINE_GROUP    = Self::SPACE.bits() | Self::LINE_FEED.bits();
    }
}

/// Which rules classify code points above the ASCII range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierStrategy {
    /// ES5 rules: per code unit, supplementary code points are errors.
    Legacy,
    /// ES6 rules: full code points, surrogate pairs combine.
    Es6Surrogate,
}

const CHAR_TYPES: [CharType; 128] = {
    let mut table = [CharType::Unknown; 128];
    let mut i = 0;
    while i < 128 {
        let c = i as u8;
        table[i] = match c {
            b'\t' | 0x0B | 0x0C | b' ' => CharType::Whitespace,
            b'\n' | b'\r' => CharType::Newline,
            b'a'..=b'z' | b'A'..=b'Z' => CharType::Letter,
            b'0'..=b'9' => CharType::Digit,
            b'$' => CharType::Dollar,
            b'_' => CharType::Underscore,
            b'!' => CharType::Exclamation,
            b'"' => CharType::DoubleQuote,
            b'#' => CharType::Hash,
            b'%' => CharType::Percent,
            b'&' => CharType::Ampersand,
            b'\'' => CharType::SingleQuote,
            b'(' => CharType::OpenParen,
            b')' => CharType::CloseParen,
            b'*' => CharType::Asterisk,
            b'+' => CharType::Plus,
            b',' => CharType::Comma,
            b'-' => CharType::Minus,
            b'.' => CharType::Dot,
            b'/' => CharType::Slash,
            b':' => CharType::Colon,
            b';' => CharType::Semicolon,
            b'<' => CharType::LessThan,
            b'=' => CharType::Equals,
            b'>' => CharType::GreaterThan,
            b'?' => CharType::Question,
            b'@' => CharType::At,
            b'[' => CharType::OpenBracket,
            b'\\' => CharType::Backslash,
            b']' => CharType::CloseBracket,
            b'^' => CharType::Caret,
            b'`' => CharType::Backtick,
            b'{' => CharType::OpenBrace,
            b'|' => CharType::Bar,
            b'}' => CharType::CloseBrace,
            b'~' => CharType::Tilde,
            _ => CharType::Unknown,
        };
        i += 1;
    }
    table
};

const CHAR_FLAGS: [CharFlags; 128] = {
    let mut table = [CharFlags::NONE; 128];
    let mut i = 0;
    while i < 128 {
        let c = i as u8;
        let mut bits = 0u8;
        if matches!(c, b'\t' | 0x0B | 0x0C | b' ') {
            bits |= CharFlags::SPACE.bits();
        }
        if matches!(c, b'\n' | b'\r') {
            bits |= CharFlags::LINE_GROUP.bits();
        }
        if matches!(c, b'a'..=b'z' | b'A'..=b'Z' | b'$' | b'_') {
            bits |= CharFlags::LETTER_GROUP.bits();
        }
        if matches!(c, b'0'..=b'9') {
            bits |= CharFlags::DECIMAL_GROUP.bits();
        }
        if matches!(c, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') {
            bits |= CharFlags::HEX.bits();
        }
        table[i] = CharFlags::from_bits_retain(bits);
        i += 1;
    }
    table
};

/// Unicode space separators (Zs) above the ASCII range.
const SPACE_SEPARATORS: &[u32] = &[
    0x00A0, 0x1680, 0x2000, 0x2001, 0x2002, 0x2003, 0x2004, 0x2005, 0x2006, 0x2007, 0x2008,
    0x2009, 0x200A, 0x202F, 0x205F, 0x3000,
];

#[inline]
fn is_space_separator(cp: u32) -> bool {
    cp == BYTE_ORDER_MARK || SPACE_SEPARATORS.contains(&cp)
}

/// ID_Start characters that XID_Start leaves out because their NFKC forms
/// are not identifiers (UAX #31, section 5.1). Every one is also ID_Continue.
const ID_NOT_XID: &[(u32, u32)] = &[
    (0x037A, 0x037A),
    (0x0E33, 0x0E33),
    (0x0EB3, 0x0EB3),
    (0x309B, 0x309C),
    (0xFC5E, 0xFC63),
    (0xFDFA, 0xFDFB),
    (0xFE70, 0xFE70),
    (0xFE72, 0xFE72),
    (0xFE74, 0xFE74),
    (0xFE76, 0xFE76),
    (0xFE78, 0xFE78),
    (0xFE7A, 0xFE7A),
    (0xFE7C, 0xFE7C),
    (0xFE7E, 0xFE7E),
    (0xFF9E, 0xFF9F),
];

#[inline]
fn is_id_not_xid(cp: u32) -> bool {
    (0x037A..=0xFF9F).contains(&cp) && ID_NOT_XID.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

#[cfg(feature = "unicode")]
fn id_start(cp: u32) -> bool {
    use unicode_xid::UnicodeXID;
    is_id_not_xid(cp) || char::from_u32(cp).is_some_and(UnicodeXID::is_xid_start)
}

#[cfg(feature = "unicode")]
fn id_continue(cp: u32) -> bool {
    use unicode_xid::UnicodeXID;
    is_id_not_xid(cp) || char::from_u32(cp).is_some_and(UnicodeXID::is_xid_continue)
}

#[cfg(not(feature = "unicode"))]
fn id_start(cp: u32) -> bool {
    is_id_not_xid(cp)
}

#[cfg(not(feature = "unicode"))]
fn id_continue(cp: u32) -> bool {
    is_id_not_xid(cp)
}

/// Classifies code points as whitespace, identifier parts and so on.
///
/// Immutable once built; share one per script context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharClassifier {
    strategy: ClassifierStrategy,
}

impl CharClassifier {
    /// Build a classifier for ES6 (`true`) or legacy (`false`) identifier rules.
    ///
    /// # Panics
    ///
    /// Panics when ES6 rules are requested but the crate was built without the
    /// `unicode` feature, since the tables those rules need are absent.
    pub fn new(es6_unicode: bool) -> Self {
        let strategy = if es6_unicode {
            assert!(
                cfg!(feature = "unicode"),
                "ES6 identifier rules require the `unicode` feature"
            );
            ClassifierStrategy::Es6Surrogate
        } else {
            ClassifierStrategy::Legacy
        };
        Self { strategy }
    }

    #[inline]
    pub fn strategy(&self) -> ClassifierStrategy {
        self.strategy
    }

    /// Whether surrogate pairs are combined into supplementary code points.
    #[inline]
    pub fn es6_unicode(&self) -> bool {
        self.strategy == ClassifierStrategy::Es6Surrogate
    }

    /// Whitespace in the `StrWhiteSpaceChar` sense: line terminators count.
    #[inline]
    pub fn is_whitespace(&self, cp: u32) -> bool {
        self.get_char_flags(cp).contains(CharFlags::SPACE)
    }

    #[inline]
    pub fn is_id_start(&self, cp: u32) -> bool {
        self.get_char_flags(cp).contains(CharFlags::ID_LEAD)
    }

    #[inline]
    pub fn is_id_continue(&self, cp: u32) -> bool {
        self.get_char_flags(cp).contains(CharFlags::ID_CHAR)
    }

    pub fn get_char_type(&self, cp: u32) -> CharType {
        if cp <= MAX_ASCII_CHARACTER {
            return CHAR_TYPES[cp as usize];
        }
        match self.strategy {
            ClassifierStrategy::Legacy => legacy_char_type(cp),
            ClassifierStrategy::Es6Surrogate => es6_char_type(cp),
        }
    }

    pub fn get_char_flags(&self, cp: u32) -> CharFlags {
        if cp <= MAX_ASCII_CHARACTER {
            return CHAR_FLAGS[cp as usize];
        }
        match self.strategy {
            ClassifierStrategy::Legacy => legacy_char_flags(cp),
            ClassifierStrategy::Es6Surrogate => es6_char_flags(cp),
        }
    }

    /// Bidirectional formatting controls.
    pub fn is_bidi_control(&self, cp: u32) -> bool {
        matches!(
            cp,
            0x202A..=0x202E | 0x2066..=0x2069 | 0x200E | 0x200F | 0x061C
        )
    }

    /// Number of leading units of `text` that are whitespace.
    pub fn skip_whitespace(&self, text: &[u16]) -> usize {
        self.skip_while(text, 0, |cp| self.is_whitespace(cp))
    }

    /// Number of leading units of `text` that form an identifier, or 0 when
    /// `text` does not start with an identifier start character.
    pub fn skip_identifier(&self, text: &[u16]) -> usize {
        match self.code_point_at(text, 0) {
            Some((cp, width)) if self.is_id_start(cp) => {
                self.skip_while(text, width, |cp| self.is_id_continue(cp))
            }
            _ => 0,
        }
    }

    fn skip_while(&self, text: &[u16], mut pos: usize, pred: impl Fn(u32) -> bool) -> usize {
        while let Some((cp, width)) = self.code_point_at(text, pos) {
            if !pred(cp) {
                break;
            }
            pos += width;
        }
        pos
    }

    /// The code point at `pos` and how many units it spans.
    fn code_point_at(&self, text: &[u16], pos: usize) -> Option<(u32, usize)> {
        let unit = u32::from(*text.get(pos)?);
        if self.es6_unicode() && is_high_surrogate(unit) {
            if let Some(&low) = text.get(pos + 1) {
                if is_low_surrogate(u32::from(low)) {
                    return Some((surrogate_pair_to_code_point(unit, u32::from(low)), 2));
                }
            }
        }
        Some((unit, 1))
    }
}

fn legacy_char_type(cp: u32) -> CharType {
    if cp > 0xFFFF {
        return CharType::Error;
    }
    if cp == LINE_SEPARATOR || cp == PARAGRAPH_SEPARATOR {
        return CharType::Newline;
    }
    if is_space_separator(cp) {
        return CharType::Whitespace;
    }
    match char::from_u32(cp) {
        Some(c) if c.is_alphabetic() => CharType::Letter,
        _ => CharType::Unknown,
    }
}

fn legacy_char_flags(cp: u32) -> CharFlags {
    if cp == ZERO_WIDTH_NON_JOINER || cp == ZERO_WIDTH_JOINER {
        return CharFlags::ID_CHAR;
    }
    if cp > 0xFFFF {
        return CharFlags::NONE;
    }
    if cp == LINE_SEPARATOR || cp == PARAGRAPH_SEPARATOR {
        return CharFlags::LINE_GROUP;
    }
    if is_space_separator(cp) {
        return CharFlags::SPACE;
    }
    let Some(c) = char::from_u32(cp) else {
        return CharFlags::NONE;
    };
    if c.is_alphabetic() {
        CharFlags::LETTER_GROUP
    } else if c.is_numeric() {
        CharFlags::DECIMAL_GROUP
    } else if id_continue(cp) {
        CharFlags::ID_CHAR
    } else {
        CharFlags::NONE
    }
}

fn es6_char_type(cp: u32) -> CharType {
    if cp == LINE_SEPARATOR || cp == PARAGRAPH_SEPARATOR {
        return CharType::Newline;
    }
    if is_space_separator(cp) {
        return CharType::Whitespace;
    }
    if id_start(cp) {
        return CharType::Letter;
    }
    if id_continue(cp) && char::from_u32(cp).is_some_and(char::is_numeric) {
        return CharType::Digit;
    }
    // Combining marks and connector punctuation are only identifier parts.
    CharType::Unknown
}

fn es6_char_flags(cp: u32) -> CharFlags {
    if cp == LINE_SEPARATOR || cp == PARAGRAPH_SEPARATOR {
        return CharFlags::LINE_GROUP;
    }
    if is_space_separator(cp) {
        return CharFlags::SPACE;
    }
    if cp == ZERO_WIDTH_NON_JOINER || cp == ZERO_WIDTH_JOINER {
        return CharFlags::ID_CHAR;
    }
    if id_start(cp) {
        return CharFlags::LETTER_GROUP;
    }
    if id_continue(cp) {
        if char::from_u32(cp).is_some_and(char::is_numeric) {
            return CharFlags::DECIMAL_GROUP;
        }
        return CharFlags::ID_CHAR;
    }
    CharFlags::NONE
}
