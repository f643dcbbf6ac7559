//! A token iterator over a [`Scanner`].
//!
//! The scanner leaves two decisions to its caller: whether a `/` starts a
//! regex literal, and whether a `}` closes a template substitution.
//! `TokenStream` makes both the way a tokenizer without a parser can: a
//! brace stack for templates, and the previous token for regex literals.

use crate::encoding::EncodingPolicy;
use crate::error::{ScanError, ScanErrorKind};
use crate::number::number_to_string;
use crate::regex::RescanOutcome;
use crate::scanner::{ScanState, Scanner};
use crate::token::TokenPayload;
use jsscan_core::text::{char_offset, TextSpan};
use jsscan_core::utf16;
use jsscan_syntax::TokenKind;

/// A token with its position and printable value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedToken {
    pub kind: TokenKind,
    pub span: TextSpan,
    /// Zero-based line the token starts on.
    pub line: u32,
    pub had_newline_before: bool,
    /// Identifier name, cooked string value, number or regex source.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Block,
    Substitution,
}

/// Iterator over the tokens of a scanner's text.
///
/// Yields `Err` once on the first scan error and then stops.
pub struct TokenStream<'s, 'a, P: EncodingPolicy> {
    scanner: Scanner<'s, 'a, P>,
    braces: Vec<Brace>,
    last_kind: Option<TokenKind>,
    finished: bool,
}

impl<'s, 'a, P: EncodingPolicy> TokenStream<'s, 'a, P> {
    /// Wrap a scanner whose text has already been set.
    pub fn new(scanner: Scanner<'s, 'a, P>) -> Self {
        Self {
            scanner,
            braces: Vec::new(),
            last_kind: None,
            finished: false,
        }
    }

    pub fn scanner(&self) -> &Scanner<'s, 'a, P> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut Scanner<'s, 'a, P> {
        &mut self.scanner
    }

    pub fn into_scanner(self) -> Scanner<'s, 'a, P> {
        self.scanner
    }

    fn advance(&mut self) -> Result<Option<ScannedToken>, ScanError> {
        let mut kind = self.scanner.scan()?;
        let had_newline_before = self.scanner.had_new_line();

        match kind {
            TokenKind::EndOfFileToken if self.braces.contains(&Brace::Substitution) => {
                let at = char_offset(self.scanner.ich_min_tok());
                return Err(ScanError::new(ScanErrorKind::UnterminatedString, at, at, self.scanner.line_min_tok()));
            }
            TokenKind::EndOfFileToken => return Ok(None),
            TokenKind::OpenBraceToken => self.braces.push(Brace::Block),
            TokenKind::TemplateHead => self.braces.push(Brace::Substitution),
            TokenKind::CloseBraceToken => {
                if self.braces.pop() == Some(Brace::Substitution) {
                    self.scanner.set_scan_state(ScanState::StringTemplateMiddleOrEnd);
                    kind = self.scanner.scan()?;
                    if kind == TokenKind::TemplateMiddle {
                        self.braces.push(Brace::Substitution);
                    }
                }
            }
            TokenKind::SlashToken | TokenKind::SlashEqualsToken if regex_allowed_after(self.last_kind) => {
                match self.scanner.rescan_regexp_tokenizer()? {
                    RescanOutcome::Regex => kind = TokenKind::RegularExpressionLiteral,
                    RescanOutcome::NotRegex(err) => return Err(err),
                }
            }
            _ => {}
        }

        let value = self.token_value()?;
        self.last_kind = Some(kind);
        Ok(Some(ScannedToken {
            kind,
            span: self.scanner.token_span(),
            line: self.scanner.line_min_tok(),
            had_newline_before,
            value,
        }))
    }

    fn token_value(&mut self) -> Result<Option<String>, ScanError> {
        let value = match self.scanner.token().payload {
            TokenPayload::None => None,
            TokenPayload::Ident(_) | TokenPayload::DeferredIdent { .. } => {
                self.scanner.token_ident()?.map(|ident| ident.to_string_lossy())
            }
            TokenPayload::Int(value) => Some(value.to_string()),
            TokenPayload::Float { value, .. } => Some(number_to_string(value)),
            TokenPayload::BigInt(digits) => Some(digits.to_string_lossy()),
            TokenPayload::Regex(_) => Some(self.scanner.token_text()),
            TokenPayload::Str(Some(ident)) => Some(ident.to_string_lossy()),
            TokenPayload::Str(None) => Some(utf16::to_string_lossy(self.scanner.cooked_units())),
        };
        Ok(value)
    }
}

impl<P: EncodingPolicy> Iterator for TokenStream<'_, '_, P> {
    type Item = Result<ScannedToken, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Whether a `/` after `previous` starts a regex literal rather than a
/// division. Operands and closing brackets end an expression.
fn regex_allowed_after(previous: Option<TokenKind>) -> bool {
    let Some(kind) = previous else {
        return true;
    };
    match kind {
        TokenKind::TemplateHead | TokenKind::TemplateMiddle => true,
        TokenKind::Identifier
        | TokenKind::EscapedKeyword
        | TokenKind::CloseParenToken
        | TokenKind::CloseBracketToken
        | TokenKind::CloseBraceToken
        | TokenKind::PlusPlusToken
        | TokenKind::MinusMinusToken
        | TokenKind::ThisKeyword
        | TokenKind::SuperKeyword
        | TokenKind::TrueKeyword
        | TokenKind::FalseKeyword
        | TokenKind::NullKeyword => false,
        _ => !kind.is_literal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_classifier::CharClassifier;
    use crate::config::ScannerConfig;
    use crate::encoding::Utf8Policy;
    use crate::hash_tbl::HashTbl;
    use jsscan_core::IdentArena;
    use jsscan_syntax::ScriptFlags;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Result<(TokenKind, Option<String>), ScanErrorKind>> {
        let arena = IdentArena::new();
        let mut table = HashTbl::with_default_buckets(&arena);
        let classifier = CharClassifier::new(true);
        let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
        scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
        TokenStream::new(scanner)
            .map(|token| token.map(|t| (t.kind, t.value)).map_err(|err| err.kind))
            .collect()
    }

    fn ok(kind: TokenKind, value: Option<&str>) -> Result<(TokenKind, Option<String>), ScanErrorKind> {
        Ok((kind, value.map(str::to_string)))
    }

    #[test]
    fn test_nested_template_braces() {
        assert_eq!(
            tokens("`a${ {b} }c${d}e`"),
            vec![
                ok(TokenKind::TemplateHead, Some("a")),
                ok(TokenKind::OpenBraceToken, None),
                ok(TokenKind::Identifier, Some("b")),
                ok(TokenKind::CloseBraceToken, None),
                ok(TokenKind::TemplateMiddle, Some("c")),
                ok(TokenKind::Identifier, Some("d")),
                ok(TokenKind::TemplateTail, Some("e")),
            ]
        );
    }

    #[test]
    fn test_regex_versus_division() {
        assert_eq!(
            tokens("x = /a+/g; y = x / 2 /= 1"),
            vec![
                ok(TokenKind::Identifier, Some("x")),
                ok(TokenKind::EqualsToken, None),
                ok(TokenKind::RegularExpressionLiteral, Some("/a+/g")),
                ok(TokenKind::SemicolonToken, None),
                ok(TokenKind::Identifier, Some("y")),
                ok(TokenKind::EqualsToken, None),
                ok(TokenKind::Identifier, Some("x")),
                ok(TokenKind::SlashToken, None),
                ok(TokenKind::IntegerLiteral, Some("2")),
                ok(TokenKind::SlashEqualsToken, None),
                ok(TokenKind::IntegerLiteral, Some("1")),
            ]
        );
    }

    #[test]
    fn test_regex_inside_substitution() {
        let kinds: Vec<_> = tokens("`${/}/}`").into_iter().map(|t| t.map(|(kind, _)| kind)).collect();
        assert_eq!(
            kinds,
            vec![
                Ok(TokenKind::TemplateHead),
                Ok(TokenKind::RegularExpressionLiteral),
                Ok(TokenKind::TemplateTail),
            ]
        );
    }

    #[test]
    fn test_literal_values() {
        assert_eq!(
            tokens("'a\\u0041' 1.50 0x10 12n"),
            vec![
                ok(TokenKind::StringLiteral, Some("aA")),
                ok(TokenKind::FloatLiteral, Some("1.5")),
                ok(TokenKind::IntegerLiteral, Some("16")),
                ok(TokenKind::BigIntLiteral, Some("12")),
            ]
        );
    }

    #[test]
    fn test_error_ends_stream() {
        assert_eq!(
            tokens("a 'b\nc"),
            vec![ok(TokenKind::Identifier, Some("a")), Err(ScanErrorKind::UnterminatedString)]
        );
    }

    #[test]
    fn test_unterminated_template_is_reported() {
        let head = || ok(TokenKind::TemplateHead, Some("a"));
        let x = || ok(TokenKind::Identifier, Some("x"));
        assert_eq!(tokens("`a${x}"), vec![head(), x(), Err(ScanErrorKind::UnterminatedString)]);
        assert_eq!(tokens("`a${x}b"), vec![head(), x(), Err(ScanErrorKind::UnterminatedString)]);
        assert_eq!(tokens("`a${x"), vec![head(), x(), Err(ScanErrorKind::UnterminatedString)]);
        assert_eq!(tokens("`a${ {x} "), vec![
            head(),
            ok(TokenKind::OpenBraceToken, None),
            x(),
            ok(TokenKind::CloseBraceToken, None),
            Err(ScanErrorKind::UnterminatedString),
        ]);
    }

    #[test]
    fn test_unterminated_regex_is_reported() {
        assert_eq!(tokens("= /abc"), vec![ok(TokenKind::EqualsToken, None), Err(ScanErrorKind::RegexSyntax)]);
    }

    #[test]
    fn test_spans_and_lines() {
        let arena = IdentArena::new();
        let mut table = HashTbl::with_default_buckets(&arena);
        let classifier = CharClassifier::new(true);
        let source = "a\n  `x\ny${z}w`";
        let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
        scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
        let tokens: Vec<ScannedToken> = TokenStream::new(scanner).map(Result::unwrap).collect();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].kind, TokenKind::TemplateHead);
        assert_eq!(tokens[1].span, TextSpan::new(4, 6));
        assert_eq!(tokens[1].line, 1);
        assert!(tokens[1].had_newline_before);
        assert_eq!(tokens[1].value.as_deref(), Some("x\ny"));
        assert_eq!(tokens[3].kind, TokenKind::TemplateTail);
        assert_eq!(tokens[3].span, TextSpan::new(11, 3));
        assert_eq!(tokens[3].line, 2);
        assert!(!tokens[3].had_newline_before);
    }
}
