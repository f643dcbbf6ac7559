//! Scanner failures.

use crate::hash_tbl::InternError;
use jsscan_core::text::{CharOffset, TextSpan};
use jsscan_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use thiserror::Error;

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ScanErrorKind {
    #[error("invalid character")]
    IllegalChar,
    #[error("invalid number")]
    BadNumber,
    #[error("identifier directly after numeric literal")]
    IdAfterLiteral,
    #[error("unterminated string constant")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("expected hexadecimal digit")]
    BadHexDigit,
    #[error("invalid code point in escape sequence")]
    InvalidCodePoint,
    #[error("expected '}}' to close escape sequence")]
    MissingCurlyBrace,
    #[error("octal escape sequence in template literal")]
    OctalInTemplate,
    #[error("expected '/'")]
    NoSlash,
    #[error("syntax error in regular expression")]
    RegexSyntax,
    #[error("unexpected quantifier in regular expression")]
    RegexBadQuantifier,
    #[error("expected ']' in regular expression")]
    RegexNoBracket,
    #[error("expected ')' in regular expression")]
    RegexNoParen,
    #[error("expected '}}' in regular expression")]
    RegexNoCurlyBracket,
    #[error("invalid escape in unicode regular expression")]
    RegexInvalidEscape,
    #[error("out of memory")]
    OutOfMemory,
}

impl ScanErrorKind {
    /// The diagnostic message reported for this kind.
    pub fn message(self) -> &'static DiagnosticMessage {
        match self {
            ScanErrorKind::IllegalChar => &messages::INVALID_CHARACTER,
            ScanErrorKind::BadNumber => &messages::INVALID_NUMBER,
            ScanErrorKind::IdAfterLiteral => &messages::IDENTIFIER_AFTER_NUMERIC_LITERAL,
            ScanErrorKind::UnterminatedString => &messages::UNTERMINATED_STRING_CONSTANT,
            ScanErrorKind::UnterminatedComment => &messages::UNTERMINATED_COMMENT,
            ScanErrorKind::BadHexDigit => &messages::EXPECTED_HEXADECIMAL_DIGIT,
            ScanErrorKind::InvalidCodePoint => &messages::INVALID_CODEPOINT_IN_ESCAPE,
            ScanErrorKind::MissingCurlyBrace => &messages::EXPECTED_CLOSING_BRACE_IN_ESCAPE,
            ScanErrorKind::OctalInTemplate => &messages::OCTAL_ESCAPE_IN_TEMPLATE,
            ScanErrorKind::NoSlash => &messages::EXPECTED_SLASH,
            ScanErrorKind::RegexSyntax => &messages::REGEXP_SYNTAX,
            ScanErrorKind::RegexBadQuantifier => &messages::REGEXP_BAD_QUANTIFIER,
            ScanErrorKind::RegexNoBracket => &messages::REGEXP_NO_BRACKET,
            ScanErrorKind::RegexNoParen => &messages::REGEXP_NO_PAREN,
            ScanErrorKind::RegexNoCurlyBracket => &messages::REGEXP_NO_CURLY_BRACKET,
            ScanErrorKind::RegexInvalidEscape => &messages::REGEXP_INVALID_ESCAPE,
            ScanErrorKind::OutOfMemory => &messages::OUT_OF_MEMORY,
        }
    }

    /// Stable diagnostic code.
    #[inline]
    pub fn code(self) -> u32 {
        self.message().code
    }
}

/// A lexical error with the character range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at {ich_min}..{ich_lim} (line {line})")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    /// Start of the offending text, in character offsets.
    pub ich_min: CharOffset,
    /// End of the offending text, in character offsets.
    pub ich_lim: CharOffset,
    /// Zero-based line of `ich_min`.
    pub line: u32,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, ich_min: CharOffset, ich_lim: CharOffset, line: u32) -> Self {
        Self {
            kind,
            ich_min,
            ich_lim: ich_lim.max(ich_min),
            line,
        }
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.ich_min, self.ich_lim)
    }

    /// Convert into a located diagnostic for `file`.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        Diagnostic::with_location(file.to_string(), self.span(), self.kind.message(), &[])
            .with_line(self.line)
    }

    /// Interning failures surface as out-of-memory at the given range.
    pub(crate) fn from_intern(
        err: InternError,
        ich_min: CharOffset,
        ich_lim: CharOffset,
        line: u32,
    ) -> Self {
        match err {
            InternError::TooLong | InternError::OutOfMemory => {
                Self::new(ScanErrorKind::OutOfMemory, ich_min, ich_lim, line)
            }
        }
    }
}
