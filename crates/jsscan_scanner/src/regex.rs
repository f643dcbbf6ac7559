//! Regular expression literal boundary.
//!
//! The scanner finds where a regex literal ends, checks its flags and runs a
//! structural validation of the body; compiling the pattern is delegated to a
//! [`RegexCompiler`]. [`PatternStore`] is a compiler that only records
//! patterns, used by the tokenizer and tests.

use crate::error::{ScanError, ScanErrorKind};
use crate::standard_chars::StandardChars;
use jsscan_core::text::TextSpan;
use jsscan_core::utf16;
use std::fmt;
use thiserror::Error;

/// Opaque handle to a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegexHandle(u32);

impl RegexHandle {
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

bitflags::bitflags! {
    /// Flags following a regex literal's closing slash.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexFlags: u8 {
        const NONE          = 0;
        const GLOBAL        = 1 << 0;
        const IGNORE_CASE   = 1 << 1;
        const MULTILINE     = 1 << 2;
        const UNICODE       = 1 << 3;
        const STICKY        = 1 << 4;
        const DOT_ALL       = 1 << 5;
    }
}

impl RegexFlags {
    pub fn from_char(c: u32) -> Option<Self> {
        let flag = match char::from_u32(c)? {
            'g' => RegexFlags::GLOBAL,
            'i' => RegexFlags::IGNORE_CASE,
            'm' => RegexFlags::MULTILINE,
            'u' => RegexFlags::UNICODE,
            'y' => RegexFlags::STICKY,
            's' => RegexFlags::DOT_ALL,
            _ => return None,
        };
        Some(flag)
    }

    /// Parse a flag spelling. `y` and `s` are only accepted when enabled;
    /// unknown and repeated flags are syntax errors.
    pub fn parse(
        units: &[u16],
        allow_sticky: bool,
        allow_dot_all: bool,
    ) -> Result<RegexFlags, ScanErrorKind> {
        let mut flags = RegexFlags::NONE;
        for &unit in units {
            let flag = RegexFlags::from_char(u32::from(unit)).ok_or(ScanErrorKind::RegexSyntax)?;
            if (flag == RegexFlags::STICKY && !allow_sticky)
                || (flag == RegexFlags::DOT_ALL && !allow_dot_all)
                || flags.contains(flag)
            {
                return Err(ScanErrorKind::RegexSyntax);
            }
            flags |= flag;
        }
        Ok(flags)
    }
}

impl fmt::Display for RegexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (RegexFlags::GLOBAL, 'g'),
            (RegexFlags::IGNORE_CASE, 'i'),
            (RegexFlags::MULTILINE, 'm'),
            (RegexFlags::DOT_ALL, 's'),
            (RegexFlags::UNICODE, 'u'),
            (RegexFlags::STICKY, 'y'),
        ] {
            if self.contains(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// A scanned regex literal handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSource {
    /// Body between the slashes, as UTF-16.
    pub pattern: Vec<u16>,
    pub flags: RegexFlags,
    /// The whole literal, slashes and flags included.
    pub span: TextSpan,
}

impl RegexSource {
    pub fn pattern_string(&self) -> String {
        utf16::to_string_lossy(&self.pattern)
    }
}

impl fmt::Display for RegexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern_string(), self.flags)
    }
}

/// Failure reported by a [`RegexCompiler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexCompileError {
    #[error("invalid pattern: {0}")]
    Pattern(ScanErrorKind),
    #[error("pattern limit reached")]
    TooManyPatterns,
}

impl RegexCompileError {
    /// The scan error this failure is reported as.
    pub fn kind(&self) -> ScanErrorKind {
        match self {
            RegexCompileError::Pattern(kind) => *kind,
            RegexCompileError::TooManyPatterns => ScanErrorKind::OutOfMemory,
        }
    }
}

/// Compiles regex literals found by the scanner.
pub trait RegexCompiler {
    fn compile(&mut self, source: &RegexSource) -> Result<RegexHandle, RegexCompileError>;
}

/// A compiler that keeps every pattern it is given.
#[derive(Debug, Default)]
pub struct PatternStore {
    patterns: Vec<RegexSource>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: RegexHandle) -> Option<&RegexSource> {
        self.patterns.get(handle.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegexSource> {
        self.patterns.iter()
    }
}

impl RegexCompiler for PatternStore {
    fn compile(&mut self, source: &RegexSource) -> Result<RegexHandle, RegexCompileError> {
        let index =
            u32::try_from(self.patterns.len()).map_err(|_| RegexCompileError::TooManyPatterns)?;
        self.patterns.push(source.clone());
        Ok(RegexHandle::new(index))
    }
}

/// Result of a regex rescan that found a `/` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanOutcome {
    /// The token is now a regex literal.
    Regex,
    /// The text is not a valid literal; the scanner was left where it was.
    NotRegex(ScanError),
}

impl RescanOutcome {
    #[inline]
    pub fn is_regex(&self) -> bool {
        matches!(self, RescanOutcome::Regex)
    }
}

const fn unit(c: u8) -> u16 {
    c as u16
}

fn is_ascii_hex(c: u16) -> bool {
    u8::try_from(c).is_ok_and(|c| c.is_ascii_hexdigit())
}

fn is_ascii_letter(c: u16) -> bool {
    u8::try_from(c).is_ok_and(|c| c.is_ascii_alphabetic())
}

/// Structural check of a pattern body: balanced groups and classes,
/// quantifiers that follow something, and in unicode mode strict escapes.
pub fn validate_pattern(pattern: &[u16], flags: RegexFlags) -> Result<(), ScanErrorKind> {
    PatternValidator {
        pattern,
        unicode: flags.contains(RegexFlags::UNICODE),
        chars: StandardChars::new(),
    }
    .run()
}

struct PatternValidator<'p> {
    pattern: &'p [u16],
    unicode: bool,
    chars: StandardChars<u16>,
}

impl PatternValidator<'_> {
    #[inline]
    fn at(&self, i: usize) -> Option<u16> {
        self.pattern.get(i).copied()
    }

    fn run(&self) -> Result<(), ScanErrorKind> {
        let mut depth = 0usize;
        let mut can_repeat = false;
        let mut i = 0;
        while let Some(c) = self.at(i) {
            match c {
                c if c == unit(b'\\') => {
                    let assertion =
                        matches!(self.at(i + 1), Some(n) if n == unit(b'b') || n == unit(b'B'));
                    i = self.escape(i, false)?;
                    can_repeat = !assertion;
                }
                c if c == unit(b'(') => {
                    i = self.group_start(i)?;
                    depth += 1;
                    can_repeat = false;
                }
                c if c == unit(b')') => {
                    if depth == 0 {
                        return Err(ScanErrorKind::RegexSyntax);
                    }
                    depth -= 1;
                    i += 1;
                    can_repeat = true;
                }
                c if c == unit(b'[') => {
                    i = self.class(i)?;
                    can_repeat = true;
                }
                c if c == unit(b'*') || c == unit(b'+') || c == unit(b'?') => {
                    if !can_repeat {
                        return Err(ScanErrorKind::RegexBadQuantifier);
                    }
                    i = self.skip_lazy(i + 1);
                    can_repeat = false;
                }
                c if c == unit(b'{') => match self.braced_quantifier(i)? {
                    Some(end) => {
                        if !can_repeat {
                            return Err(ScanErrorKind::RegexBadQuantifier);
                        }
                        i = self.skip_lazy(end);
                        can_repeat = false;
                    }
                    None if self.unicode => return Err(ScanErrorKind::RegexSyntax),
                    None => {
                        i += 1;
                        can_repeat = true;
                    }
                },
                c if (c == unit(b'}') || c == unit(b']')) && self.unicode => {
                    return Err(ScanErrorKind::RegexSyntax);
                }
                c if c == unit(b'|') || c == unit(b'^') || c == unit(b'$') => {
                    i += 1;
                    can_repeat = false;
                }
                _ => {
                    i += 1;
                    can_repeat = true;
                }
            }
        }
        if depth > 0 {
            return Err(ScanErrorKind::RegexNoParen);
        }
        Ok(())
    }

    fn skip_lazy(&self, i: usize) -> usize {
        if self.at(i) == Some(unit(b'?')) {
            i + 1
        } else {
            i
        }
    }

    /// `(`, `(?:`, `(?=`, `(?!`, `(?<=`, `(?<!` or `(?<name>`.
    fn group_start(&self, i: usize) -> Result<usize, ScanErrorKind> {
        if self.at(i + 1) != Some(unit(b'?')) {
            return Ok(i + 1);
        }
        match self.at(i + 2) {
            Some(c) if c == unit(b':') || c == unit(b'=') || c == unit(b'!') => Ok(i + 3),
            Some(c) if c == unit(b'<') => match self.at(i + 3) {
                Some(c) if c == unit(b'=') || c == unit(b'!') => Ok(i + 4),
                _ => self.group_name(i + 3),
            },
            _ => Err(ScanErrorKind::RegexSyntax),
        }
    }

    /// A group name after `<`, returning the index past `>`.
    fn group_name(&self, start: usize) -> Result<usize, ScanErrorKind> {
        let mut i = start;
        while let Some(c) = self.at(i) {
            if c == unit(b'>') {
                return if i == start {
                    Err(ScanErrorKind::RegexSyntax)
                } else {
                    Ok(i + 1)
                };
            }
            let ok = self.chars.is_word(c) || c == unit(b'$') || c > 0x7F;
            if !ok {
                break;
            }
            i += 1;
        }
        Err(ScanErrorKind::RegexSyntax)
    }

    /// `{n}`, `{n,}` or `{n,m}` starting at `i`; Some(index past `}`) when
    /// it is a quantifier.
    fn braced_quantifier(&self, i: usize) -> Result<Option<usize>, ScanErrorKind> {
        let (min, mut j) = self.decimal(i + 1);
        let Some(min) = min else {
            return Ok(None);
        };
        let mut max = Some(min);
        if self.at(j) == Some(unit(b',')) {
            let (upper, next) = self.decimal(j + 1);
            max = upper;
            j = next;
        }
        if self.at(j) != Some(unit(b'}')) {
            return Ok(None);
        }
        if max.is_some_and(|max| max < min) {
            return Err(ScanErrorKind::RegexSyntax);
        }
        Ok(Some(j + 1))
    }

    fn decimal(&self, mut i: usize) -> (Option<u64>, usize) {
        let mut value: Option<u64> = None;
        while let Some(c) = self.at(i).filter(|&c| self.chars.is_digit(c)) {
            let digit = u64::from(c - unit(b'0'));
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            i += 1;
        }
        (value, i)
    }

    /// A character class starting at `[`, returning the index past `]`.
    fn class(&self, start: usize) -> Result<usize, ScanErrorKind> {
        let mut i = start + 1;
        if self.at(i) == Some(unit(b'^')) {
            i += 1;
        }
        loop {
            match self.at(i) {
                None => return Err(ScanErrorKind::RegexNoBracket),
                Some(c) if c == unit(b']') => return Ok(i + 1),
                Some(c) if c == unit(b'\\') => i = self.escape(i, true)?,
                Some(_) => i += 1,
            }
        }
    }

    fn hex_run(&self, i: usize, count: usize) -> bool {
        (i..i + count).all(|j| self.at(j).is_some_and(is_ascii_hex))
    }

    /// An escape starting at `\`, returning the index past it.
    fn escape(&self, i: usize, in_class: bool) -> Result<usize, ScanErrorKind> {
        let Some(c) = self.at(i + 1) else {
            return Err(ScanErrorKind::RegexSyntax);
        };
        if !self.unicode {
            return Ok(i + 2);
        }
        let Some(letter) = char::from_u32(u32::from(c)) else {
            return Err(ScanErrorKind::RegexInvalidEscape);
        };
        match letter {
            'u' => {
                if self.at(i + 2) == Some(unit(b'{')) {
                    let mut j = i + 3;
                    let mut value: u32 = 0;
                    while let Some(d) = self.at(j).and_then(|d| char::from_u32(u32::from(d))?.to_digit(16))
                    {
                        value = value.saturating_mul(16).saturating_add(d);
                        j += 1;
                    }
                    if j == i + 3 || value > utf16::MAX_CODE_POINT {
                        return Err(ScanErrorKind::RegexInvalidEscape);
                    }
                    if self.at(j) != Some(unit(b'}')) {
                        return Err(ScanErrorKind::RegexNoCurlyBracket);
                    }
                    Ok(j + 1)
                } else if self.hex_run(i + 2, 4) {
                    Ok(i + 6)
                } else {
                    Err(ScanErrorKind::RegexInvalidEscape)
                }
            }
            'x' if self.hex_run(i + 2, 2) => Ok(i + 4),
            'c' if self.at(i + 2).is_some_and(is_ascii_letter) => Ok(i + 3),
            'p' | 'P' => {
                if self.at(i + 2) != Some(unit(b'{')) {
                    return Err(ScanErrorKind::RegexInvalidEscape);
                }
                let close = (i + 3..self.pattern.len()).find(|&j| self.pattern[j] == unit(b'}'));
                close.map(|j| j + 1).ok_or(ScanErrorKind::RegexNoCurlyBracket)
            }
            'k' if !in_class => self.group_name_reference(i + 2),
            '0' if !self.at(i + 2).is_some_and(|d| self.chars.is_digit(d)) => Ok(i + 2),
            '1'..='9' if !in_class => {
                let (_, end) = self.decimal(i + 1);
                Ok(end)
            }
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' => Ok(i + 2),
            'B' if !in_class => Ok(i + 2),
            '-' if in_class => Ok(i + 2),
            '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/' => {
                Ok(i + 2)
            }
            _ => Err(ScanErrorKind::RegexInvalidEscape),
        }
    }

    fn group_name_reference(&self, i: usize) -> Result<usize, ScanErrorKind> {
        if self.at(i) != Some(unit(b'<')) {
            return Err(ScanErrorKind::RegexInvalidEscape);
        }
        self.group_name(i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(pattern: &str, flags: RegexFlags) -> Result<(), ScanErrorKind> {
        let units: Vec<u16> = pattern.encode_utf16().collect();
        validate_pattern(&units, flags)
    }

    #[test]
    fn test_flag_parsing() {
        let units: Vec<u16> = "gimsuy".encode_utf16().collect();
        let flags = RegexFlags::parse(&units, true, true).unwrap();
        assert_eq!(flags.to_string(), "gimsuy");
        assert_eq!(RegexFlags::parse(&units, false, true), Err(ScanErrorKind::RegexSyntax));
        let twice: Vec<u16> = "gg".encode_utf16().collect();
        assert_eq!(RegexFlags::parse(&twice, true, true), Err(ScanErrorKind::RegexSyntax));
        let unknown: Vec<u16> = "q".encode_utf16().collect();
        assert_eq!(RegexFlags::parse(&unknown, true, true), Err(ScanErrorKind::RegexSyntax));
    }

    #[test]
    fn test_valid_patterns() {
        for pattern in ["a+b*", "(?:x|y){2,3}?", "[a-z\\]]+", "^\\d{3}$", "(?<year>\\d+)\\k<year>", "a{", "(?=a)b"] {
            assert_eq!(check(pattern, RegexFlags::NONE), Ok(()), "{pattern}");
        }
        assert_eq!(check("\\u{1F600}\\p{L}", RegexFlags::UNICODE), Ok(()));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(check("(a", RegexFlags::NONE), Err(ScanErrorKind::RegexNoParen));
        assert_eq!(check("a)", RegexFlags::NONE), Err(ScanErrorKind::RegexSyntax));
        assert_eq!(check("[abc", RegexFlags::NONE), Err(ScanErrorKind::RegexNoBracket));
        assert_eq!(check("*a", RegexFlags::NONE), Err(ScanErrorKind::RegexBadQuantifier));
        assert_eq!(check("a|+", RegexFlags::NONE), Err(ScanErrorKind::RegexBadQuantifier));
        assert_eq!(check("a{3,1}", RegexFlags::NONE), Err(ScanErrorKind::RegexSyntax));
        assert_eq!(check("(?*)", RegexFlags::NONE), Err(ScanErrorKind::RegexSyntax));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(check("\\u{41", RegexFlags::UNICODE), Err(ScanErrorKind::RegexNoCurlyBracket));
        assert_eq!(check("\\q", RegexFlags::UNICODE), Err(ScanErrorKind::RegexInvalidEscape));
        assert_eq!(check("\\q", RegexFlags::NONE), Ok(()));
        assert_eq!(check("a{", RegexFlags::UNICODE), Err(ScanErrorKind::RegexSyntax));
        assert_eq!(check("[\\-]", RegexFlags::UNICODE), Ok(()));
    }

    #[test]
    fn test_pattern_store() {
        let mut store = PatternStore::new();
        let source = RegexSource {
            pattern: "ab".encode_utf16().collect(),
            flags: RegexFlags::GLOBAL,
            span: TextSpan::new(0, 5),
        };
        let handle = store.compile(&source).unwrap();
        assert_eq!(handle.index(), 0);
        assert_eq!(store.get(handle).unwrap().to_string(), "/ab/g");
        assert_eq!(store.len(), 1);
    }
}
