//! UTF-16 surrogate helpers.

/// The largest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// U+FFFD, substituted for undecodable input.
pub const REPLACEMENT_CHAR: u16 = 0xFFFD;

/// Whether `unit` is a high (leading) surrogate, `0xD800..=0xDBFF`.
#[inline]
pub fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Whether `unit` is a low (trailing) surrogate, `0xDC00..=0xDFFF`.
#[inline]
pub fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combine a surrogate pair into a supplementary code point.
#[inline]
pub fn surrogate_pair_to_code_point(high: u32, low: u32) -> u32 {
    debug_assert!(is_high_surrogate(high) && is_low_surrogate(low));
    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
}

/// Split a supplementary code point into its high and low surrogates.
#[inline]
pub fn code_point_to_surrogate_pair(cp: u32) -> (u16, u16) {
    debug_assert!(cp >= 0x10000 && cp <= MAX_CODE_POINT);
    let v = cp - 0x10000;
    ((0xD800 + (v >> 10)) as u16, (0xDC00 + (v & 0x3FF)) as u16)
}

/// Number of UTF-16 code units needed to encode `cp`.
#[inline]
pub fn utf16_len(cp: u32) -> usize {
    if cp > 0xFFFF {
        2
    } else {
        1
    }
}

/// Append `cp` to `buf`, splitting supplementary code points into pairs.
#[inline]
pub fn push_code_point(buf: &mut Vec<u16>, cp: u32) {
    if cp > 0xFFFF {
        let (high, low) = code_point_to_surrogate_pair(cp);
        buf.push(high);
        buf.push(low);
    } else {
        buf.push(cp as u16);
    }
}

/// Decode UTF-16 into a `String`, replacing unpaired surrogates.
pub fn to_string_lossy(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
