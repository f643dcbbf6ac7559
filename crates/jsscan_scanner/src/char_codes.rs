//! Character code constants used by the scanner.
//!
//! Values are code points (`u32`) so they compare directly against decoded
//! source units of either width.

pub const NULL_CHARACTER: u32 = 0x00;
pub const MAX_ASCII_CHARACTER: u32 = 0x7F;
pub const TAB: u32 = 0x09;
pub const LINE_FEED: u32 = 0x0A;
pub const VERTICAL_TAB: u32 = 0x0B;
pub const FORM_FEED: u32 = 0x0C;
pub const CARRIAGE_RETURN: u32 = 0x0D;
pub const BACKSPACE: u32 = 0x08;
pub const SPACE: u32 = 0x20;
pub const NON_BREAKING_SPACE: u32 = 0xA0;
pub const ZERO_WIDTH_NON_JOINER: u32 = 0x200C;
pub const ZERO_WIDTH_JOINER: u32 = 0x200D;
pub const LINE_SEPARATOR: u32 = 0x2028;
pub const PARAGRAPH_SEPARATOR: u32 = 0x2029;
pub const BYTE_ORDER_MARK: u32 = 0xFEFF;
/// Byte-swapped BOM as seen through the wrong endianness.
pub const REVERSED_BYTE_ORDER_MARK: u32 = 0xFFEE;

pub const EXCLAMATION: u32 = b'!' as u32;
pub const DOUBLE_QUOTE: u32 = b'"' as u32;
pub const HASH: u32 = b'#' as u32;
pub const DOLLAR_SIGN: u32 = b'$' as u32;
pub const PERCENT: u32 = b'%' as u32;
pub const AMPERSAND: u32 = b'&' as u32;
pub const SINGLE_QUOTE: u32 = b'\'' as u32;
pub const OPEN_PAREN: u32 = b'(' as u32;
pub const CLOSE_PAREN: u32 = b')' as u32;
pub const ASTERISK: u32 = b'*' as u32;
pub const PLUS: u32 = b'+' as u32;
pub const COMMA: u32 = b',' as u32;
pub const MINUS: u32 = b'-' as u32;
pub const DOT: u32 = b'.' as u32;
pub const SLASH: u32 = b'/' as u32;
pub const _0: u32 = b'0' as u32;
pub const _3: u32 = b'3' as u32;
pub const _4: u32 = b'4' as u32;
pub const _7: u32 = b'7' as u32;
pub const _9: u32 = b'9' as u32;
pub const COLON: u32 = b':' as u32;
pub const SEMICOLON: u32 = b';' as u32;
pub const LESS_THAN: u32 = b'<' as u32;
pub const EQUALS: u32 = b'=' as u32;
pub const GREATER_THAN: u32 = b'>' as u32;
pub const QUESTION: u32 = b'?' as u32;
pub const OPEN_BRACKET: u32 = b'[' as u32;
pub const BACKSLASH: u32 = b'\\' as u32;
pub const CLOSE_BRACKET: u32 = b']' as u32;
pub const CARET: u32 = b'^' as u32;
pub const UNDERSCORE: u32 = b'_' as u32;
pub const BACKTICK: u32 = b'`' as u32;
pub const OPEN_BRACE: u32 = b'{' as u32;
pub const BAR: u32 = b'|' as u32;
pub const CLOSE_BRACE: u32 = b'}' as u32;
pub const TILDE: u32 = b'~' as u32;

pub const B_LOWER: u32 = b'b' as u32;
pub const E_LOWER: u32 = b'e' as u32;
pub const E_UPPER: u32 = b'E' as u32;
pub const F_LOWER: u32 = b'f' as u32;
pub const N_LOWER: u32 = b'n' as u32;
pub const O_LOWER: u32 = b'o' as u32;
pub const R_LOWER: u32 = b'r' as u32;
pub const T_LOWER: u32 = b't' as u32;
pub const U_LOWER: u32 = b'u' as u32;
pub const V_LOWER: u32 = b'v' as u32;
pub const X_LOWER: u32 = b'x' as u32;

/// Check if a code point terminates a line.
#[inline]
pub fn is_line_terminator(ch: u32) -> bool {
    matches!(
        ch,
        LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR
    )
}

/// Check if a code point is an ASCII decimal digit.
#[inline]
pub fn is_decimal_digit(ch: u32) -> bool {
    (_0..=_9).contains(&ch)
}

/// Check if a code point is an octal digit (0-7).
#[inline]
pub fn is_octal_digit(ch: u32) -> bool {
    (_0..=_7).contains(&ch)
}

/// Value of an ASCII hex digit, or None.
#[inline]
pub fn hex_value(ch: u32) -> Option<u32> {
    match ch {
        0x30..=0x39 => Some(ch - 0x30),
        0x41..=0x46 => Some(ch - 0x41 + 10),
        0x61..=0x66 => Some(ch - 0x61 + 10),
        _ => None,
    }
}

/// Value of a digit in the given radix (2, 8, 10 or 16), or None.
#[inline]
pub fn digit_value(ch: u32, radix: u32) -> Option<u32> {
    hex_value(ch).filter(|&v| v < radix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_values() {
        assert_eq!(hex_value('f' as u32), Some(15));
        assert_eq!(hex_value('G' as u32), None);
        assert_eq!(digit_value('7' as u32, 8), Some(7));
        assert_eq!(digit_value('8' as u32, 8), None);
        assert_eq!(digit_value('1' as u32, 2), Some(1));
        assert_eq!(digit_value('2' as u32, 2), None);
        assert!(is_line_terminator(PARAGRAPH_SEPARATOR));
        assert!(!is_line_terminator(SPACE));
    }
}
