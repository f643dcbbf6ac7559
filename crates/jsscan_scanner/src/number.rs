//! Numeric literal values.
//!
//! The scanner collects the digits of a literal (separators already removed)
//! into an ASCII buffer and hands them here for conversion.

/// Value of a non-decimal integer literal in `radix` (2, 8 or 16), rounded
/// once to the nearest double.
///
/// The top 64 significant bits are kept exactly. Bits shifted out below
/// them only matter as a sticky bit, which the final `u64` to `f64`
/// conversion folds into its round-to-nearest-even.
pub fn parse_radix(digits: &[u8], radix: u32) -> f64 {
    let bits = radix.trailing_zeros();
    let mut mantissa: u64 = 0;
    let mut dropped: i32 = 0;
    let mut sticky = false;
    for &digit in digits {
        let combined = (u128::from(mantissa) << bits) | u128::from(ascii_digit_value(digit));
        let shift = bits.saturating_sub(mantissa.leading_zeros());
        if shift > 0 {
            sticky |= combined & ((1u128 << shift) - 1) != 0;
            dropped = dropped.saturating_add(shift as i32);
        }
        mantissa = (combined >> shift) as u64;
    }
    let value = (mantissa | u64::from(sticky)) as f64;
    if dropped == 0 {
        value
    } else {
        value * 2f64.powi(dropped)
    }
}

/// Value of a decimal literal such as `12`, `1.5`, `.5e-3` or `3.`.
pub fn parse_decimal(text: &str) -> f64 {
    // A trailing '.' is valid JavaScript but not valid for `str::parse`.
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    let normalized;
    let text = if let Some(stripped) = trimmed.strip_prefix('.') {
        normalized = format!("0.{stripped}");
        normalized.as_str()
    } else {
        trimmed
    };
    text.parse::<f64>().unwrap_or(f64::NAN)
}

#[inline]
fn ascii_digit_value(digit: u8) -> u32 {
    char::from(digit).to_digit(16).unwrap_or(0)
}

/// Whether `value` is an integer that fits in an `i32` (and is not -0).
pub fn as_i32(value: f64) -> Option<i32> {
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    if value == 0.0 && value.is_sign_negative() {
        return None;
    }
    Some(value as i32)
}

/// The ECMAScript `Number::toString(10)` spelling of `value`.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // Shortest round-tripping digits, e.g. "1.2345e3".
    let formatted = format!("{:e}", value.abs());
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{e_sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{e_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}
