//! Token values and scanner restore points.

use crate::hash_tbl::IdentPtr;
use crate::regex::RegexHandle;
use crate::scanner::ScanState;
use jsscan_syntax::TokenKind;

/// The value carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TokenPayload<'a> {
    #[default]
    None,
    /// An interned identifier or escaped keyword.
    Ident(IdentPtr<'a>),
    /// An identifier not yet interned: encoded unit offsets into the buffer.
    DeferredIdent { start: usize, end: usize },
    Int(i32),
    /// `maybe_int` is set when the literal had no fraction or exponent but
    /// did not fit an `i32`.
    Float { value: f64, maybe_int: bool },
    /// The literal's digits without separators or the `n` suffix.
    BigInt(IdentPtr<'a>),
    /// `None` when the rescan only validated the literal.
    Regex(Option<RegexHandle>),
    /// String or template value; `None` while string pids are suppressed.
    Str(Option<IdentPtr<'a>>),
}

/// A scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub payload: TokenPayload<'a>,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn new(kind: TokenKind, payload: TokenPayload<'a>) -> Self {
        Self { kind, payload }
    }

    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind.is_identifier()
    }

    #[inline]
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    #[inline]
    pub fn is_reserved_word(&self) -> bool {
        self.kind.is_reserved_word()
    }

    /// A future reserved word only counts as one in strict code.
    #[inline]
    pub fn is_future_reserved_word(&self, strict: bool) -> bool {
        strict && self.kind.is_future_reserved_word()
    }

    #[inline]
    pub fn is_operator(&self) -> bool {
        self.kind.is_operator()
    }

    /// The interned identifier, string value or BigInt spelling, if present.
    pub fn ident(&self) -> Option<IdentPtr<'a>> {
        match self.payload {
            TokenPayload::Ident(ident) | TokenPayload::BigInt(ident) => Some(ident),
            TokenPayload::Str(ident) => ident,
            _ => None,
        }
    }
}

/// A position the scanner can be rewound to with `seek_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestorePoint {
    pub(crate) ich_min_tok: usize,
    pub(crate) tok_multi_units: usize,
    pub(crate) ich_min_line: usize,
    pub(crate) line_multi_units: usize,
    pub(crate) line: u32,
    pub(crate) had_eol: bool,
    pub(crate) scan_state: ScanState,
    pub(crate) template_depth: u32,
}

impl RestorePoint {
    /// Character offset of the token the point was captured at.
    #[inline]
    pub fn ich_min(&self) -> usize {
        self.ich_min_tok
    }

    /// Zero-based line of that token.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_reserved_needs_strict() {
        let token = Token::new(TokenKind::InterfaceKeyword, TokenPayload::None);
        assert!(!token.is_future_reserved_word(false));
        assert!(token.is_future_reserved_word(true));
        assert!(token.is_keyword());
        assert!(!token.is_reserved_word());
    }

    #[test]
    fn test_operator_helpers() {
        let token = Token::new(TokenKind::PlusEqualsToken, TokenPayload::None);
        assert!(token.is_operator());
        assert!(!token.is_identifier());
        assert_eq!(token.ident(), None);
        assert_eq!(Token::default().kind, TokenKind::Unknown);
    }
}
