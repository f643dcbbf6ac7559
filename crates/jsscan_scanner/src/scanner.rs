//! The JavaScript scanner.
//!
//! `Scanner<P>` turns a borrowed UTF-8 or UTF-16 buffer into tokens one at a
//! time. Positions are tracked twice: in encoded units (`iecp`, indexes into
//! the buffer) and in character offsets (`ich`, UTF-16 units). The running
//! difference between the two is the multi-unit count; it only moves for
//! encodings where one character spans several units.

use crate::char_classifier::{CharClassifier, CharType};
use crate::char_codes::*;
use crate::config::ScannerConfig;
use crate::encoding::EncodingPolicy;
use crate::error::{ScanError, ScanErrorKind};
use crate::hash_tbl::{HashTbl, IdentPtr, InternError};
use crate::number;
use crate::regex::{self, RegexCompiler, RegexFlags, RegexHandle, RegexSource, RescanOutcome};
use crate::token::{RestorePoint, Token, TokenPayload};
use jsscan_core::text::{char_offset, TextSpan};
use jsscan_core::utf16::{self, MAX_CODE_POINT};
use jsscan_syntax::{LiteralFlags, ScanFlags, ScriptFlags, TokenKind};
use tracing::{debug, trace};

/// What the next call to `scan` expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Normal,
    /// The cursor sits just after the `}` closing a template substitution;
    /// the next token is a `TemplateMiddle` or `TemplateTail`.
    StringTemplateMiddleOrEnd,
}

/// How much work a regex rescan does once the literal is delimited.
enum RescanMode<'c> {
    Compile(&'c mut dyn RegexCompiler),
    Validate,
    Boundaries,
}

/// Encoded position together with the multi-unit count at that position.
type Cursor = (usize, usize);

/// Parse `u` + four hex digits, or `u{...}` when `es6` is set, at the start
/// of `units`. Returns the code point and the number of units consumed.
fn parse_identifier_escape<P: EncodingPolicy>(units: &[P::Unit], es6: bool) -> Option<(u32, usize)> {
    let at = |i: usize| units.get(i).map(|&unit| P::unit(unit));
    if at(0)? != U_LOWER {
        return None;
    }
    if es6 && at(1) == Some(OPEN_BRACE) {
        let mut value = 0u32;
        let mut i = 2;
        while let Some(digit) = at(i).and_then(hex_value) {
            value = value * 16 + digit;
            if value > MAX_CODE_POINT {
                return None;
            }
            i += 1;
        }
        if i == 2 || at(i) != Some(CLOSE_BRACE) {
            return None;
        }
        return Some((value, i + 1));
    }
    let mut value = 0u32;
    for i in 1..5 {
        value = value * 16 + at(i).and_then(hex_value)?;
    }
    Some((value, 5))
}

fn is_use_strict(units: &[u16]) -> bool {
    units.iter().copied().eq("use strict".encode_utf16())
}

/// The JavaScript scanner, generic over the source encoding.
pub struct Scanner<'s, 'a, P: EncodingPolicy> {
    hash_tbl: &'s mut HashTbl<'a>,
    classifier: &'s CharClassifier,
    config: ScannerConfig,

    src: &'s [P::Unit],
    /// Read position, in encoded units.
    pos: usize,
    /// End of the scannable text, in encoded units.
    limit: usize,
    allow_cesu: bool,
    multi_units: usize,

    tok_start: usize,
    tok_multi_units: usize,
    /// Scan state and template depth in effect when the token started.
    tok_state: (ScanState, u32),
    tok_line: u32,

    line: u32,
    line_start: usize,
    line_multi_units: usize,
    start_line: u32,
    start_line_pos: usize,

    had_eol: bool,
    module_code: bool,
    strict: bool,
    yield_region: bool,
    await_region: bool,

    template_depth: u32,
    scan_state: ScanState,
    deferred_flags: ScanFlags,
    literal_flags: LiteralFlags,

    cooked: Vec<u16>,
    raw: Vec<u16>,
    digits: String,

    token: Token<'a>,
    previous_token: Token<'a>,
    /// `(ich, iecp)` end of the previous token.
    previous_lim: (usize, usize),
    error_range: Option<(usize, usize)>,
}

impl<'s, 'a, P: EncodingPolicy> Scanner<'s, 'a, P> {
    pub fn new(hash_tbl: &'s mut HashTbl<'a>, classifier: &'s CharClassifier, config: ScannerConfig) -> Self {
        Self {
            hash_tbl,
            classifier,
            config,
            src: &[],
            pos: 0,
            limit: 0,
            allow_cesu: false,
            multi_units: 0,
            tok_start: 0,
            tok_multi_units: 0,
            tok_state: (ScanState::Normal, 0),
            tok_line: 0,
            line: 0,
            line_start: 0,
            line_multi_units: 0,
            start_line: 0,
            start_line_pos: 0,
            had_eol: false,
            module_code: false,
            strict: false,
            yield_region: false,
            await_region: false,
            template_depth: 0,
            scan_state: ScanState::Normal,
            deferred_flags: ScanFlags::NONE,
            literal_flags: LiteralFlags::NONE,
            cooked: Vec::new(),
            raw: Vec::new(),
            digits: String::new(),
            token: Token::default(),
            previous_token: Token::default(),
            previous_lim: (0, 0),
            error_range: None,
        }
    }

    /// Point the scanner at `length` units of `buffer` starting at `offset`.
    ///
    /// `char_offset` is the character offset that `offset` corresponds to.
    /// A byte order mark is skipped only at the very start of the buffer.
    /// With `is_utf8 == false`, UTF-8 input may contain CESU-8 surrogates.
    #[allow(clippy::too_many_arguments)]
    pub fn set_text(
        &mut self,
        buffer: &'s [P::Unit],
        offset: usize,
        length: usize,
        char_offset: usize,
        is_utf8: bool,
        script_flags: ScriptFlags,
        start_line: u32,
    ) {
        let offset = offset.min(buffer.len());
        self.src = buffer;
        self.limit = offset.saturating_add(length).min(buffer.len());
        self.pos = offset;
        self.allow_cesu = !is_utf8;
        self.multi_units = offset.saturating_sub(char_offset);

        self.line = start_line;
        self.start_line = start_line;
        self.line_start = self.pos;
        self.line_multi_units = self.multi_units;

        if offset == 0 && self.pos < self.limit {
            let saved = self.cursor();
            let ch = self.read_full();
            if ch != BYTE_ORDER_MARK && ch != REVERSED_BYTE_ORDER_MARK {
                self.reset_cursor(saved);
            }
        }
        self.start_line_pos = self.pos;
        self.start_token();

        self.module_code = script_flags.contains(ScriptFlags::MODULE);
        self.strict = self.module_code || script_flags.contains(ScriptFlags::STRICT_MODE);
        self.had_eol = false;
        self.deferred_flags = ScanFlags::NONE;
        self.literal_flags = LiteralFlags::NONE;
        self.scan_state = ScanState::Normal;
        self.template_depth = 0;
        self.tok_state = (ScanState::Normal, 0);
        self.token = Token::default();
        self.previous_token = Token::default();
        self.previous_lim = (self.ich_lim_tok(), self.pos);
        self.error_range = None;

        debug!(
            encoding = P::NAME,
            offset,
            length = self.limit - offset,
            start_line,
            module = self.module_code,
            "set scanner text"
        );
    }

    // ========================================================================
    // Scanning entry points
    // ========================================================================

    /// Scan the next token, recognizing keywords.
    pub fn scan(&mut self) -> Result<TokenKind, ScanError> {
        self.scan_core(true)
    }

    /// Scan the next token; reserved words come back as identifiers.
    pub fn scan_no_keywords(&mut self) -> Result<TokenKind, ScanError> {
        self.scan_core(false)
    }

    /// Scan used for lookahead, which never needs keyword kinds.
    pub fn scan_ahead(&mut self) -> Result<TokenKind, ScanError> {
        self.scan_core(false)
    }

    /// Scan with the deferred parse flags cleared, so string values are
    /// always interned.
    pub fn scan_forcing_pid(&mut self) -> Result<TokenKind, ScanError> {
        let saved = std::mem::replace(&mut self.deferred_flags, ScanFlags::NONE);
        let result = self.scan_core(true);
        self.deferred_flags = saved;
        result
    }

    fn scan_core(&mut self, identify_kwds: bool) -> Result<TokenKind, ScanError> {
        self.previous_token = self.token;
        self.previous_lim = (self.ich_lim_tok(), self.pos);
        self.token = Token::default();

        let kind = match self.scan_token(identify_kwds) {
            Ok(kind) => kind,
            Err(err) => {
                trace!(kind = ?err.kind, start = err.ich_min, end = err.ich_lim, "scan error");
                return Err(err);
            }
        };
        self.token.kind = kind;
        trace!(kind = ?kind, start = self.ich_min_tok(), end = self.ich_lim_tok(), "scanned token");
        Ok(kind)
    }

    fn scan_token(&mut self, identify_kwds: bool) -> Result<TokenKind, ScanError> {
        self.tok_state = (self.scan_state, self.template_depth);
        if self.scan_state == ScanState::StringTemplateMiddleOrEnd {
            // The token keeps the start of the `}` that preceded it. At the
            // limit this reports an unterminated template.
            self.had_eol = false;
            self.scan_state = ScanState::Normal;
            return self.scan_template_part(TokenKind::TemplateTail, TokenKind::TemplateMiddle);
        }
        if self.pos >= self.limit {
            self.start_token();
            return Ok(TokenKind::EndOfFileToken);
        }
        self.had_eol = false;

        self.skip_trivia()?;
        self.start_token();

        let Some(ch) = self.char_at(0) else {
            return Ok(TokenKind::EndOfFileToken);
        };
        let kind = match ch {
            OPEN_PAREN => { self.pos += 1; TokenKind::OpenParenToken }
            CLOSE_PAREN => { self.pos += 1; TokenKind::CloseParenToken }
            OPEN_BRACE => { self.pos += 1; TokenKind::OpenBraceToken }
            CLOSE_BRACE => { self.pos += 1; TokenKind::CloseBraceToken }
            OPEN_BRACKET => { self.pos += 1; TokenKind::OpenBracketToken }
            CLOSE_BRACKET => { self.pos += 1; TokenKind::CloseBracketToken }
            SEMICOLON => { self.pos += 1; TokenKind::SemicolonToken }
            COMMA => { self.pos += 1; TokenKind::CommaToken }
            TILDE => { self.pos += 1; TokenKind::TildeToken }
            COLON => { self.pos += 1; TokenKind::ColonToken }

            DOT => return self.scan_dot(),
            _0..=_9 => return self.scan_number(),
            QUESTION => self.scan_question(),
            LESS_THAN => self.scan_less_than(),
            GREATER_THAN => self.scan_greater_than(),
            EQUALS => self.scan_equals(),
            EXCLAMATION => self.scan_exclamation(),
            PLUS => self.scan_plus(),
            MINUS => self.scan_minus(),
            ASTERISK => self.scan_asterisk(),
            SLASH => self.scan_slash(),
            PERCENT => self.scan_percent(),
            AMPERSAND => self.scan_ampersand(),
            BAR => self.scan_bar(),
            CARET => self.scan_caret(),

            SINGLE_QUOTE | DOUBLE_QUOTE => return self.scan_string_literal(ch),
            BACKTICK => {
                self.pos += 1;
                return self.scan_template_part(TokenKind::TemplateNoSubstitution, TokenKind::TemplateHead);
            }

            BACKSLASH => return self.scan_identifier(identify_kwds),
            _ if ch > MAX_ASCII_CHARACTER => {
                let cp = self.read_code_point();
                if !self.classifier.is_id_start(cp) {
                    return Err(self.error(ScanErrorKind::IllegalChar));
                }
                let start = self.tok_start;
                return self.scan_identifier_rest(identify_kwds, start, false, P::MULTI_UNIT);
            }
            _ if self.classifier.is_id_start(ch) => return self.scan_identifier(identify_kwds),

            _ => {
                // NUL before the end of input, `@`, `#` and control characters.
                self.pos += 1;
                return Err(self.error(ScanErrorKind::IllegalChar));
            }
        };
        Ok(kind)
    }

    /// Skip whitespace, line terminators and comments.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        while let Some(ch) = self.char_at(0) {
            self.start_token();
            match ch {
                TAB | VERTICAL_TAB | FORM_FEED | SPACE => self.pos += 1,
                LINE_FEED | CARRIAGE_RETURN => {
                    self.pos += 1;
                    self.finish_newline(ch);
                }
                SLASH if self.char_at(1) == Some(SLASH) => {
                    self.pos += 2;
                    self.skip_line_comment();
                }
                SLASH if self.char_at(1) == Some(ASTERISK) => self.skip_block_comment()?,
                LESS_THAN if !self.module_code && self.next_units_are(b"<!--") => {
                    self.pos += 4;
                    self.skip_line_comment();
                }
                MINUS if !self.module_code && self.had_eol && self.next_units_are(b"-->") => {
                    self.pos += 3;
                    self.skip_line_comment();
                }
                HASH if self.config.hashbang && self.pos == 0 && self.char_at(1) == Some(EXCLAMATION) => {
                    self.pos += 2;
                    self.skip_line_comment();
                }
                _ if ch > MAX_ASCII_CHARACTER => {
                    let Some(cp) = self.code_point_at(self.pos) else {
                        break;
                    };
                    match self.classifier.get_char_type(cp) {
                        CharType::Whitespace => {
                            self.read_code_point();
                        }
                        CharType::Newline => {
                            self.read_code_point();
                            self.finish_newline(cp);
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip to the line terminator ending a single-line comment.
    fn skip_line_comment(&mut self) {
        let (end, multi_units) = P::line_comment_end(&self.src[..self.limit], self.pos, self.allow_cesu);
        self.pos = end;
        self.multi_units += multi_units;
    }

    fn skip_block_comment(&mut self) -> Result<(), ScanError> {
        self.pos += 2;
        while self.pos < self.limit {
            let ch = self.read_full();
            match ch {
                ASTERISK if self.char_at(0) == Some(SLASH) => {
                    self.pos += 1;
                    return Ok(());
                }
                LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {
                    self.finish_newline(ch);
                }
                _ => {}
            }
        }
        Err(self.error(ScanErrorKind::UnterminatedComment))
    }

    // ========================================================================
    // Punctuation
    // ========================================================================

    fn scan_dot(&mut self) -> Result<TokenKind, ScanError> {
        if self.char_at(1).is_some_and(is_decimal_digit) {
            return self.scan_number();
        }
        if self.config.spread && self.char_at(1) == Some(DOT) && self.char_at(2) == Some(DOT) {
            self.pos += 3;
            return Ok(TokenKind::DotDotDotToken);
        }
        self.pos += 1;
        Ok(TokenKind::DotToken)
    }

    fn scan_question(&mut self) -> TokenKind {
        if self.config.nullish_coalescing && self.char_at(1) == Some(QUESTION) {
            self.pos += 2;
            TokenKind::QuestionQuestionToken
        } else if self.config.optional_chaining
            && self.char_at(1) == Some(DOT)
            && !self.char_at(2).is_some_and(is_decimal_digit)
        {
            self.pos += 2;
            TokenKind::QuestionDotToken
        } else {
            self.pos += 1;
            TokenKind::QuestionToken
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.char_at(1) == Some(LESS_THAN) {
            if self.char_at(2) == Some(EQUALS) {
                self.pos += 3;
                TokenKind::LessThanLessThanEqualsToken
            } else {
                self.pos += 2;
                TokenKind::LessThanLessThanToken
            }
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::LessThanEqualsToken
        } else {
            self.pos += 1;
            TokenKind::LessThanToken
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.char_at(1) == Some(GREATER_THAN) {
            if self.char_at(2) == Some(GREATER_THAN) {
                if self.char_at(3) == Some(EQUALS) {
                    self.pos += 4;
                    TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken
                } else {
                    self.pos += 3;
                    TokenKind::GreaterThanGreaterThanGreaterThanToken
                }
            } else if self.char_at(2) == Some(EQUALS) {
                self.pos += 3;
                TokenKind::GreaterThanGreaterThanEqualsToken
            } else {
                self.pos += 2;
                TokenKind::GreaterThanGreaterThanToken
            }
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::GreaterThanEqualsToken
        } else {
            self.pos += 1;
            TokenKind::GreaterThanToken
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        if self.char_at(1) == Some(EQUALS) {
            if self.char_at(2) == Some(EQUALS) {
                self.pos += 3;
                TokenKind::EqualsEqualsEqualsToken
            } else {
                self.pos += 2;
                TokenKind::EqualsEqualsToken
            }
        } else if self.char_at(1) == Some(GREATER_THAN) {
            self.pos += 2;
            TokenKind::EqualsGreaterThanToken
        } else {
            self.pos += 1;
            TokenKind::EqualsToken
        }
    }

    fn scan_exclamation(&mut self) -> TokenKind {
        if self.char_at(1) == Some(EQUALS) {
            if self.char_at(2) == Some(EQUALS) {
                self.pos += 3;
                TokenKind::ExclamationEqualsEqualsToken
            } else {
                self.pos += 2;
                TokenKind::ExclamationEqualsToken
            }
        } else {
            self.pos += 1;
            TokenKind::ExclamationToken
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        if self.char_at(1) == Some(PLUS) {
            self.pos += 2;
            TokenKind::PlusPlusToken
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::PlusEqualsToken
        } else {
            self.pos += 1;
            TokenKind::PlusToken
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        if self.char_at(1) == Some(MINUS) {
            self.pos += 2;
            TokenKind::MinusMinusToken
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::MinusEqualsToken
        } else {
            self.pos += 1;
            TokenKind::MinusToken
        }
    }

    fn scan_asterisk(&mut self) -> TokenKind {
        if self.config.exponentiation && self.char_at(1) == Some(ASTERISK) {
            if self.char_at(2) == Some(EQUALS) {
                self.pos += 3;
                TokenKind::AsteriskAsteriskEqualsToken
            } else {
                self.pos += 2;
                TokenKind::AsteriskAsteriskToken
            }
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::AsteriskEqualsToken
        } else {
            self.pos += 1;
            TokenKind::AsteriskToken
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        // Comments were consumed as trivia; this is division until a rescan.
        if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::SlashEqualsToken
        } else {
            self.pos += 1;
            TokenKind::SlashToken
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::PercentEqualsToken
        } else {
            self.pos += 1;
            TokenKind::PercentToken
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        if self.char_at(1) == Some(AMPERSAND) {
            self.pos += 2;
            TokenKind::AmpersandAmpersandToken
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::AmpersandEqualsToken
        } else {
            self.pos += 1;
            TokenKind::AmpersandToken
        }
    }

    fn scan_bar(&mut self) -> TokenKind {
        if self.char_at(1) == Some(BAR) {
            self.pos += 2;
            TokenKind::BarBarToken
        } else if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::BarEqualsToken
        } else {
            self.pos += 1;
            TokenKind::BarToken
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        if self.char_at(1) == Some(EQUALS) {
            self.pos += 2;
            TokenKind::CaretEqualsToken
        } else {
            self.pos += 1;
            TokenKind::CaretToken
        }
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier(&mut self, identify_kwds: bool) -> Result<TokenKind, ScanError> {
        let start = self.tok_start;
        let (cp, has_escape, has_multi) = self.read_identifier_char();
        if !self.classifier.is_id_start(cp) {
            return Err(self.error(ScanErrorKind::IllegalChar));
        }
        self.scan_identifier_rest(identify_kwds, start, has_escape, has_multi)
    }

    fn scan_identifier_rest(
        &mut self,
        identify_kwds: bool,
        start: usize,
        mut has_escape: bool,
        mut has_multi: bool,
    ) -> Result<TokenKind, ScanError> {
        loop {
            while let Some(ch) = self.char_at(0) {
                if ch > MAX_ASCII_CHARACTER || !self.classifier.is_id_continue(ch) {
                    break;
                }
                self.pos += 1;
            }
            if self.pos >= self.limit {
                break;
            }
            let saved = self.cursor();
            let (cp, escape, multi) = self.read_identifier_char();
            if !self.classifier.is_id_continue(cp) {
                self.reset_cursor(saved);
                break;
            }
            has_escape |= escape;
            has_multi |= multi;
        }

        self.literal_flags.set(LiteralFlags::IDENTIFIER_ESCAPE, has_escape);
        let end = self.pos;

        if !has_escape && !has_multi {
            if identify_kwds {
                if let Some(kind) = self.keyword_in(start, end) {
                    return Ok(kind);
                }
            }
            self.token.payload = TokenPayload::DeferredIdent { start, end };
            return Ok(TokenKind::Identifier);
        }

        let ident = self.intern_source(start, end)?;
        self.token.payload = TokenPayload::Ident(ident);
        if identify_kwds && has_escape {
            let kind = ident.token_kind(self.strict);
            if kind != TokenKind::Identifier && self.keyword_applies(kind) {
                return Ok(TokenKind::EscapedKeyword);
            }
        }
        Ok(TokenKind::Identifier)
    }

    /// Read one identifier character, expanding a `\u` escape. Returns the
    /// code point, whether it was escaped and whether it spanned several
    /// units. An invalid escape yields the backslash itself.
    fn read_identifier_char(&mut self) -> (u32, bool, bool) {
        let unit = P::unit(self.src[self.pos]);
        if unit == BACKSLASH {
            let rest = &self.src[self.pos + 1..self.limit];
            if let Some((cp, width)) = parse_identifier_escape::<P>(rest, self.config.es6_unicode) {
                self.pos += 1 + width;
                return (cp, true, false);
            }
            self.pos += 1;
            return (BACKSLASH, false, false);
        }
        let multi = P::MULTI_UNIT && unit > MAX_ASCII_CHARACTER;
        (self.read_code_point(), false, multi)
    }

    /// The keyword an escape-free ASCII identifier spells, if it applies here.
    fn keyword_in(&self, start: usize, end: usize) -> Option<TokenKind> {
        let len = end - start;
        if !(2..=10).contains(&len) {
            return None;
        }
        let mut buf = [0u8; 10];
        for (dst, &unit) in buf.iter_mut().zip(&self.src[start..end]) {
            *dst = u8::try_from(P::unit(unit)).ok().filter(u8::is_ascii_lowercase)?;
        }
        let text = std::str::from_utf8(&buf[..len]).ok()?;
        let (kind, flags) = TokenKind::from_keyword(text)?;
        (flags.applies(self.strict) && self.keyword_applies(kind)).then_some(kind)
    }

    fn keyword_applies(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::YieldKeyword => self.yield_is_keyword(),
            TokenKind::AwaitKeyword => self.await_is_keyword(),
            _ => true,
        }
    }

    /// Decode `start..end` into UTF-16, expanding identifier escapes.
    fn unescape_into(&self, start: usize, end: usize, out: &mut Vec<u16>) {
        let src = &self.src[..end];
        let mut pos = start;
        while pos < end {
            if P::unit(src[pos]) == BACKSLASH {
                if let Some((cp, width)) = parse_identifier_escape::<P>(&src[pos + 1..], self.config.es6_unicode) {
                    utf16::push_code_point(out, cp);
                    pos += 1 + width;
                    continue;
                }
            }
            let (cp, width) = P::decode(src, pos, self.allow_cesu);
            utf16::push_code_point(out, cp);
            pos += width;
        }
    }

    fn intern_source(&mut self, start: usize, end: usize) -> Result<IdentPtr<'a>, ScanError> {
        let mut buf = std::mem::take(&mut self.cooked);
        buf.clear();
        self.unescape_into(start, end, &mut buf);
        let result = self.hash_tbl.intern(buf.as_slice());
        self.cooked = buf;
        result.map_err(|err| self.intern_error(err))
    }

    /// Intern the identifier spelled by encoded units `iecp_min..iecp_lim`,
    /// expanding escapes.
    pub fn pid_at(&mut self, iecp_min: usize, iecp_lim: usize) -> Result<IdentPtr<'a>, ScanError> {
        let lim = iecp_lim.min(self.limit);
        let min = iecp_min.min(lim);
        self.intern_source(min, lim)
    }

    /// The identifier for the current token, interning a deferred spelling
    /// or a keyword on demand.
    pub fn token_ident(&mut self) -> Result<Option<IdentPtr<'a>>, ScanError> {
        match self.token.payload {
            TokenPayload::DeferredIdent { start, end } => {
                let src = self.src;
                let ident = P::intern(self.hash_tbl, &src[start..end]).map_err(|err| self.intern_error(err))?;
                self.token.payload = TokenPayload::Ident(ident);
                Ok(Some(ident))
            }
            TokenPayload::None if self.token.kind.is_keyword() => {
                let ident = self
                    .hash_tbl
                    .intern_keyword(self.token.kind)
                    .map_err(|err| self.intern_error(err))?;
                Ok(Some(ident))
            }
            _ => Ok(self.token.ident()),
        }
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn scan_number(&mut self) -> Result<TokenKind, ScanError> {
        self.literal_flags.remove(LiteralFlags::OCTAL_OR_LEADING_ZERO);
        self.digits.clear();

        if self.char_at(0) == Some(_0) {
            let radix = match self.char_at(1).map(|c| c | 0x20) {
                Some(X_LOWER) => Some(16),
                Some(O_LOWER) => Some(8),
                Some(B_LOWER) => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.scan_radix_number(radix);
            }
            if !matches!(self.char_at(1), Some(DOT | E_LOWER | E_UPPER | N_LOWER)) {
                if let Some(kind) = self.scan_legacy_octal()? {
                    return Ok(kind);
                }
            }
        }
        self.scan_decimal_number()
    }

    /// Digits of `radix` with optional separators, appended to `digits`.
    fn scan_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while let Some(c) = self.char_at(0) {
            if let Some(digit) = char::from_u32(c).filter(|d| d.is_digit(radix)) {
                self.digits.push(digit);
                count += 1;
                self.pos += 1;
            } else if c == UNDERSCORE
                && self.config.numeric_separators
                && count > 0
                && self.char_at(1).is_some_and(|next| digit_value(next, radix).is_some())
            {
                self.pos += 1;
            } else {
                break;
            }
        }
        count
    }

    fn scan_radix_number(&mut self, radix: u32) -> Result<TokenKind, ScanError> {
        let start = self.pos;
        self.pos += 2;
        if self.scan_digits(radix) == 0 {
            // `0x` without digits is the literal `0`; the specifier is left
            // for the next token.
            self.pos = start + 1;
            self.check_after_number(start + 2)?;
            return Ok(self.finish_number(0.0, true));
        }
        let value = number::parse_radix(self.digits.as_bytes(), radix);
        self.check_after_number(self.pos)?;
        Ok(self.finish_number(value, true))
    }

    /// A literal like `017`. None when an `8` or `9` makes it decimal.
    fn scan_legacy_octal(&mut self) -> Result<Option<TokenKind>, ScanError> {
        let start = self.pos;
        let mut end = start;
        while let Some(c) = self.unit_at(end).filter(|&c| is_octal_digit(c)) {
            self.digits.push(char::from(c as u8));
            end += 1;
        }
        // Octal digits were consumed; any digit left is an 8 or 9.
        if self.unit_at(end).is_some_and(is_decimal_digit) {
            self.digits.clear();
            return Ok(None);
        }
        let value = number::parse_radix(self.digits.as_bytes(), 8);
        if value != 0.0 || end - start > 1 {
            self.literal_flags.insert(LiteralFlags::OCTAL_OR_LEADING_ZERO);
        }
        self.pos = end;
        self.check_after_number(end)?;
        Ok(Some(self.finish_number(value, true)))
    }

    fn scan_decimal_number(&mut self) -> Result<TokenKind, ScanError> {
        let mut is_int = true;
        let int_digits = self.scan_digits(10);

        if self.config.bigint && int_digits > 0 && self.char_at(0) == Some(N_LOWER) {
            self.pos += 1;
            self.check_after_number(self.pos)?;
            let ident = self
                .hash_tbl
                .intern(self.digits.as_str())
                .map_err(|err| self.intern_error(err))?;
            self.token.payload = TokenPayload::BigInt(ident);
            return Ok(TokenKind::BigIntLiteral);
        }

        if self.char_at(0) == Some(DOT) {
            self.pos += 1;
            self.digits.push('.');
            self.scan_digits(10);
            is_int = false;
        }

        if matches!(self.char_at(0), Some(E_LOWER | E_UPPER)) {
            let sign = self.char_at(1).filter(|&c| c == PLUS || c == MINUS);
            let first = if sign.is_some() { 2 } else { 1 };
            if self.char_at(first).is_some_and(is_decimal_digit) {
                self.digits.push('e');
                if sign == Some(MINUS) {
                    self.digits.push('-');
                }
                self.pos += first;
                self.scan_digits(10);
                is_int = false;
            }
        }

        let value = number::parse_decimal(&self.digits);
        self.check_after_number(self.pos)?;
        Ok(self.finish_number(value, is_int))
    }

    /// The character after a numeric literal may not start an identifier
    /// or be a digit.
    fn check_after_number(&self, at: usize) -> Result<(), ScanError> {
        let Some(cp) = self.code_point_at(at) else {
            return Ok(());
        };
        let escaped_id = cp == BACKSLASH
            && parse_identifier_escape::<P>(&self.src[at + 1..self.limit], self.config.es6_unicode).is_some();
        if self.classifier.is_id_start(cp) || escaped_id {
            return Err(self.error(ScanErrorKind::IdAfterLiteral));
        }
        if is_decimal_digit(cp) {
            return Err(self.error(ScanErrorKind::BadNumber));
        }
        Ok(())
    }

    fn finish_number(&mut self, value: f64, is_int: bool) -> TokenKind {
        if is_int {
            if let Some(value) = number::as_i32(value) {
                self.token.payload = TokenPayload::Int(value);
                return TokenKind::IntegerLiteral;
            }
        }
        self.token.payload = TokenPayload::Float { value, maybe_int: is_int };
        TokenKind::FloatLiteral
    }

    // ========================================================================
    // Strings and templates
    // ========================================================================

    fn scan_string_literal(&mut self, quote: u32) -> Result<TokenKind, ScanError> {
        self.pos += 1;
        self.scan_string_body(quote, false)?;
        self.literal_flags.set(LiteralFlags::DOUBLE_QUOTE, quote == DOUBLE_QUOTE);
        self.token.payload = TokenPayload::Str(self.intern_cooked()?);
        Ok(TokenKind::StringLiteral)
    }

    /// Scan a template chunk after its opening `` ` `` or `}`.
    fn scan_template_part(&mut self, closed: TokenKind, open: TokenKind) -> Result<TokenKind, ScanError> {
        self.scan_string_body(BACKTICK, true)?;
        self.literal_flags.remove(LiteralFlags::DOUBLE_QUOTE);
        let kind = if self.char_at(0) == Some(BACKTICK) {
            self.pos += 1;
            closed
        } else {
            self.pos += 2;
            open
        };
        match kind {
            TokenKind::TemplateHead => self.template_depth += 1,
            TokenKind::TemplateTail => self.template_depth = self.template_depth.saturating_sub(1),
            _ => {}
        }
        self.token.payload = TokenPayload::Str(self.intern_cooked()?);
        Ok(kind)
    }

    /// Scan string contents into the cooked buffer (and the raw buffer in
    /// template mode). A string stops after its closing quote; a template
    /// chunk stops before `` ` `` or `${`.
    fn scan_string_body(&mut self, delim: u32, template: bool) -> Result<(), ScanError> {
        self.literal_flags.remove(LiteralFlags::ESCAPE | LiteralFlags::OCTAL_OR_LEADING_ZERO);
        self.cooked.clear();
        self.raw.clear();

        loop {
            if self.pos >= self.limit {
                return Err(self.error(ScanErrorKind::UnterminatedString));
            }
            let ch = self.read_full();
            match ch {
                BACKSLASH => self.scan_escape(template)?,
                CARRIAGE_RETURN | LINE_FEED => {
                    if !template {
                        self.pos -= 1;
                        return Err(self.error(ScanErrorKind::UnterminatedString));
                    }
                    // CR and CRLF are LF in both cooked and raw values.
                    if ch == CARRIAGE_RETURN && self.char_at(0) == Some(LINE_FEED) {
                        self.pos += 1;
                    }
                    self.cooked.push(LINE_FEED as u16);
                    self.raw.push(LINE_FEED as u16);
                    self.new_line();
                }
                BACKTICK if template => {
                    self.pos -= 1;
                    return Ok(());
                }
                DOLLAR_SIGN if template && self.char_at(0) == Some(OPEN_BRACE) => {
                    self.pos -= 1;
                    return Ok(());
                }
                _ if ch == delim => return Ok(()),
                _ => {
                    utf16::push_code_point(&mut self.cooked, ch);
                    if template {
                        utf16::push_code_point(&mut self.raw, ch);
                    }
                }
            }
        }
    }

    /// Scan an escape sequence; the cursor is just past the backslash.
    fn scan_escape(&mut self, template: bool) -> Result<(), ScanError> {
        self.literal_flags.insert(LiteralFlags::ESCAPE);
        if template {
            self.raw.push(BACKSLASH as u16);
        }
        if self.pos >= self.limit {
            return Err(self.error(ScanErrorKind::UnterminatedString));
        }
        let escape_start = self.pos;
        let ch = self.read_full();
        let value = match ch {
            B_LOWER => BACKSPACE,
            T_LOWER => TAB,
            V_LOWER => VERTICAL_TAB,
            N_LOWER => LINE_FEED,
            F_LOWER => FORM_FEED,
            R_LOWER => CARRIAGE_RETURN,
            X_LOWER => self.scan_hex_escape(2)?,
            U_LOWER => self.scan_unicode_escape()?,
            _0..=_3 => {
                let mut value = ch - _0;
                if template {
                    if value != 0 || self.char_at(0).is_some_and(is_octal_digit) {
                        return Err(self.error(ScanErrorKind::OctalInTemplate));
                    }
                } else {
                    match self.char_at(0) {
                        Some(next) if is_octal_digit(next) => {
                            self.literal_flags.insert(LiteralFlags::OCTAL_OR_LEADING_ZERO);
                            value = value * 8 + (next - _0);
                            self.pos += 1;
                            if let Some(third) = self.char_at(0).filter(|&c| is_octal_digit(c)) {
                                value = value * 8 + (third - _0);
                                self.pos += 1;
                            }
                        }
                        next => {
                            if value != 0 || next.is_some_and(is_decimal_digit) {
                                self.literal_flags.insert(LiteralFlags::OCTAL_OR_LEADING_ZERO);
                            }
                        }
                    }
                }
                value
            }
            _4..=_7 => {
                if template {
                    return Err(self.error(ScanErrorKind::OctalInTemplate));
                }
                self.literal_flags.insert(LiteralFlags::OCTAL_OR_LEADING_ZERO);
                let mut value = ch - _0;
                if let Some(next) = self.char_at(0).filter(|&c| is_octal_digit(c)) {
                    value = value * 8 + (next - _0);
                    self.pos += 1;
                }
                value
            }
            LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {
                // Line continuation: nothing cooked, `\` + LF raw.
                if ch == CARRIAGE_RETURN && self.char_at(0) == Some(LINE_FEED) {
                    self.pos += 1;
                }
                if template {
                    let raw = if ch == CARRIAGE_RETURN { LINE_FEED } else { ch };
                    self.raw.push(raw as u16);
                }
                self.new_line();
                return Ok(());
            }
            NULL_CHARACTER => {
                self.cooked.push(0);
                if template {
                    self.raw.push(_0 as u16);
                }
                return Ok(());
            }
            _ => ch,
        };
        utf16::push_code_point(&mut self.cooked, value);
        if template {
            self.push_raw_source(escape_start, self.pos);
        }
        Ok(())
    }

    fn scan_hex_escape(&mut self, count: usize) -> Result<u32, ScanError> {
        let mut value = 0;
        for _ in 0..count {
            let Some(digit) = self.char_at(0).and_then(hex_value) else {
                return Err(self.error(ScanErrorKind::BadHexDigit));
            };
            value = value * 16 + digit;
            self.pos += 1;
        }
        Ok(value)
    }

    fn scan_unicode_escape(&mut self) -> Result<u32, ScanError> {
        if !(self.config.es6_unicode && self.char_at(0) == Some(OPEN_BRACE)) {
            return self.scan_hex_escape(4);
        }
        self.pos += 1;
        let mut value = self.scan_hex_escape(1)?;
        while let Some(digit) = self.char_at(0).and_then(hex_value) {
            value = value * 16 + digit;
            self.pos += 1;
            if value > MAX_CODE_POINT {
                return Err(self.error(ScanErrorKind::InvalidCodePoint));
            }
        }
        if self.char_at(0) != Some(CLOSE_BRACE) {
            return Err(self.error(ScanErrorKind::MissingCurlyBrace));
        }
        self.pos += 1;
        Ok(value)
    }

    fn push_raw_source(&mut self, from: usize, to: usize) {
        let src = &self.src[..to];
        let mut pos = from;
        while pos < to {
            let (cp, width) = P::decode(src, pos, self.allow_cesu);
            utf16::push_code_point(&mut self.raw, cp);
            pos += width;
        }
    }

    fn intern_cooked(&mut self) -> Result<Option<IdentPtr<'a>>, ScanError> {
        if self.deferred_flags.contains(ScanFlags::SUPPRESS_STR_PID) && !is_use_strict(&self.cooked) {
            return Ok(None);
        }
        self.hash_tbl
            .intern(self.cooked.as_slice())
            .map(Some)
            .map_err(|err| self.intern_error(err))
    }

    /// Intern the raw value of the last template chunk.
    pub fn raw_template_ident(&mut self) -> Result<IdentPtr<'a>, ScanError> {
        self.hash_tbl
            .intern(self.raw.as_slice())
            .map_err(|err| self.intern_error(err))
    }

    /// Cooked value of the last string or template chunk.
    pub fn cooked_units(&self) -> &[u16] {
        &self.cooked
    }

    /// Raw value of the last template chunk.
    pub fn raw_units(&self) -> &[u16] {
        &self.raw
    }

    // ========================================================================
    // Regular expression rescans
    // ========================================================================

    /// Rescan the current `/` or `/=` token as a regex literal and compile it.
    pub fn rescan_regexp(&mut self, compiler: &mut dyn RegexCompiler) -> Result<RescanOutcome, ScanError> {
        self.rescan_regexp_with(RescanMode::Compile(compiler))
    }

    /// Rescan and validate a regex literal without compiling it.
    pub fn rescan_regexp_no_ast(&mut self) -> Result<RescanOutcome, ScanError> {
        self.rescan_regexp_with(RescanMode::Validate)
    }

    /// Rescan for tokenizers: only the literal's extent and flags are checked.
    pub fn rescan_regexp_tokenizer(&mut self) -> Result<RescanOutcome, ScanError> {
        self.rescan_regexp_with(RescanMode::Boundaries)
    }

    /// Like [`rescan_regexp`](Self::rescan_regexp), with a missing slash
    /// reported as `NotRegex` too.
    pub fn try_rescan_regexp(&mut self, compiler: &mut dyn RegexCompiler) -> RescanOutcome {
        match self.rescan_regexp(compiler) {
            Ok(outcome) => outcome,
            Err(err) => RescanOutcome::NotRegex(err),
        }
    }

    fn rescan_regexp_with(&mut self, mode: RescanMode<'_>) -> Result<RescanOutcome, ScanError> {
        if self.unit_at(self.tok_start) != Some(SLASH) {
            return Err(self.error(ScanErrorKind::NoSlash));
        }
        let saved = self.cursor();
        self.pos = self.tok_start + 1;
        self.multi_units = self.tok_multi_units;

        match self.scan_regex_literal(mode) {
            Ok(handle) => {
                self.token = Token::new(TokenKind::RegularExpressionLiteral, TokenPayload::Regex(handle));
                debug!(
                    start = self.ich_min_tok(),
                    end = self.ich_lim_tok(),
                    compiled = handle.is_some(),
                    "rescanned regex literal"
                );
                Ok(RescanOutcome::Regex)
            }
            Err(err) => {
                self.reset_cursor(saved);
                debug!(kind = ?err.kind, start = err.ich_min, "slash is not a regex literal");
                Ok(RescanOutcome::NotRegex(err))
            }
        }
    }

    fn scan_regex_literal(&mut self, mode: RescanMode<'_>) -> Result<Option<RegexHandle>, ScanError> {
        let mut pattern = Vec::new();
        let mut in_class = false;
        loop {
            if self.pos >= self.limit {
                return Err(self.error(ScanErrorKind::RegexSyntax));
            }
            let ch = self.read_full();
            match ch {
                _ if is_line_terminator(ch) => return Err(self.error(ScanErrorKind::RegexSyntax)),
                SLASH if !in_class => break,
                BACKSLASH => {
                    pattern.push(BACKSLASH as u16);
                    if self.pos >= self.limit {
                        return Err(self.error(ScanErrorKind::RegexSyntax));
                    }
                    let escaped = self.read_full();
                    if is_line_terminator(escaped) {
                        return Err(self.error(ScanErrorKind::RegexSyntax));
                    }
                    utf16::push_code_point(&mut pattern, escaped);
                    continue;
                }
                OPEN_BRACKET => in_class = true,
                CLOSE_BRACKET => in_class = false,
                _ => {}
            }
            utf16::push_code_point(&mut pattern, ch);
        }

        let mut flag_units = Vec::new();
        while let Some(cp) = self.code_point_at(self.pos) {
            if cp == BACKSLASH {
                return Err(self.error(ScanErrorKind::RegexSyntax));
            }
            if !self.classifier.is_id_continue(cp) {
                break;
            }
            self.read_code_point();
            utf16::push_code_point(&mut flag_units, cp);
        }
        let flags = RegexFlags::parse(&flag_units, self.config.regex_sticky, self.config.regex_dot_all)
            .map_err(|kind| self.error(kind))?;

        match mode {
            RescanMode::Boundaries => Ok(None),
            RescanMode::Validate => {
                regex::validate_pattern(&pattern, flags).map_err(|kind| self.error(kind))?;
                Ok(None)
            }
            RescanMode::Compile(compiler) => {
                regex::validate_pattern(&pattern, flags).map_err(|kind| self.error(kind))?;
                let source = RegexSource {
                    pattern,
                    flags,
                    span: self.token_span(),
                };
                let handle = compiler.compile(&source).map_err(|err| self.error(err.kind()))?;
                Ok(Some(handle))
            }
        }
    }

    // ========================================================================
    // Capture and seek
    // ========================================================================

    /// Remember the current token so it can be scanned again with `seek_to`.
    pub fn capture(&self) -> RestorePoint {
        RestorePoint {
            ich_min_tok: self.ich_min_tok(),
            tok_multi_units: self.tok_multi_units,
            ich_min_line: self.ich_min_line(),
            line_multi_units: self.line_multi_units,
            line: self.line,
            had_eol: self.had_eol,
            scan_state: self.tok_state.0,
            template_depth: self.tok_state.1,
        }
    }

    /// Rewind to `point` and scan the token there again.
    pub fn seek_to(&mut self, point: &RestorePoint) -> Result<TokenKind, ScanError> {
        self.reposition(point);
        let result = self.scan();
        self.finish_seek(point);
        result
    }

    /// [`seek_to`](Self::seek_to) with the deferred parse flags cleared.
    pub fn seek_to_forcing_pid(&mut self, point: &RestorePoint) -> Result<TokenKind, ScanError> {
        self.reposition(point);
        let result = self.scan_forcing_pid();
        self.finish_seek(point);
        result
    }

    fn reposition(&mut self, point: &RestorePoint) {
        debug!(ich = point.ich_min_tok, line = point.line, "seek");
        self.pos = point.ich_min_tok + point.tok_multi_units;
        self.multi_units = point.tok_multi_units;
        self.line_start = point.ich_min_line + point.line_multi_units;
        self.line_multi_units = point.line_multi_units;
        self.line = point.line;
        self.scan_state = point.scan_state;
        self.template_depth = point.template_depth;
        self.start_token();
        if point.scan_state == ScanState::StringTemplateMiddleOrEnd {
            // The point sits on the `}` that closed the substitution.
            self.pos += 1;
        }
    }

    fn finish_seek(&mut self, point: &RestorePoint) {
        self.line = point.line;
        self.line_start = point.ich_min_line + point.line_multi_units;
        self.line_multi_units = point.line_multi_units;
        self.had_eol = point.had_eol;
    }

    /// Move the cursor to character offset `char_offset` of the buffer.
    pub fn set_current_character(&mut self, char_offset: usize, line: u32) {
        let pos = P::unit_offset(&self.src[..self.limit], char_offset, self.allow_cesu);
        self.pos = pos;
        self.multi_units = pos.saturating_sub(char_offset);
        self.line = line;
        self.scan_state = ScanState::Normal;
        self.start_token();
    }

    /// Text of line `line_number`, for error messages. Only lines from the
    /// start line up to the current line are available.
    pub fn sys_alloc_error_line(&self, line_number: u32) -> Option<String> {
        if line_number < self.start_line || line_number > self.line {
            return None;
        }
        let src = &self.src[..self.limit];
        let mut pos = self.start_line_pos;
        for _ in self.start_line..line_number {
            loop {
                if pos >= src.len() {
                    return None;
                }
                let (cp, width) = P::decode(src, pos, self.allow_cesu);
                pos += width;
                if cp == CARRIAGE_RETURN && src.get(pos).map(|&unit| P::unit(unit)) == Some(LINE_FEED) {
                    pos += 1;
                }
                if is_line_terminator(cp) {
                    break;
                }
            }
        }
        let mut units = Vec::new();
        while pos < src.len() {
            let (cp, width) = P::decode(src, pos, self.allow_cesu);
            if cp == NULL_CHARACTER || is_line_terminator(cp) {
                break;
            }
            utf16::push_code_point(&mut units, cp);
            pos += width;
        }
        Some(utf16::to_string_lossy(&units))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn token(&self) -> Token<'a> {
        self.token
    }

    #[inline]
    pub fn previous_token(&self) -> Token<'a> {
        self.previous_token
    }

    #[inline]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    #[inline]
    pub fn classifier(&self) -> &CharClassifier {
        self.classifier
    }

    pub fn hash_tbl(&self) -> &HashTbl<'a> {
        &*self.hash_tbl
    }

    pub fn hash_tbl_mut(&mut self) -> &mut HashTbl<'a> {
        &mut *self.hash_tbl
    }

    #[inline]
    pub fn ich_min_tok(&self) -> usize {
        self.tok_start - self.tok_multi_units
    }

    #[inline]
    pub fn ich_lim_tok(&self) -> usize {
        self.pos - self.multi_units
    }

    #[inline]
    pub fn iecp_min_tok(&self) -> usize {
        self.tok_start
    }

    #[inline]
    pub fn iecp_lim_tok(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn ich_lim_tok_previous(&self) -> usize {
        self.previous_lim.0
    }

    #[inline]
    pub fn iecp_lim_tok_previous(&self) -> usize {
        self.previous_lim.1
    }

    /// Character offset of the start of the current line.
    #[inline]
    pub fn ich_min_line(&self) -> usize {
        self.line_start - self.line_multi_units
    }

    /// Zero-based current line.
    #[inline]
    pub fn line_cur(&self) -> u32 {
        self.line
    }

    /// Zero-based line the current token starts on.
    #[inline]
    pub fn line_min_tok(&self) -> u32 {
        self.tok_line
    }

    /// Whether a line terminator preceded the current token.
    #[inline]
    pub fn had_new_line(&self) -> bool {
        self.had_eol
    }

    /// The current token's character range.
    pub fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(char_offset(self.ich_min_tok()), char_offset(self.ich_lim_tok()))
    }

    /// Source text of the current token.
    pub fn token_text(&self) -> String {
        let mut units = Vec::with_capacity(self.pos - self.tok_start);
        let src = &self.src[..self.pos];
        let mut pos = self.tok_start;
        while pos < self.pos {
            let (cp, width) = P::decode(src, pos, self.allow_cesu);
            utf16::push_code_point(&mut units, cp);
            pos += width;
        }
        utf16::to_string_lossy(&units)
    }

    pub fn set_error_position(&mut self, ich_min: usize, ich_lim: usize) {
        self.error_range = Some((ich_min, ich_lim.max(ich_min)));
    }

    pub fn clear_error_position(&mut self) {
        self.error_range = None;
    }

    /// Start of the recorded error range, or of the current token.
    pub fn ich_min_error(&self) -> usize {
        self.error_range.map_or_else(|| self.ich_min_tok(), |(min, _)| min)
    }

    /// End of the recorded error range, or of the current token.
    pub fn ich_lim_error(&self) -> usize {
        self.error_range.map_or_else(|| self.ich_lim_tok(), |(_, lim)| lim)
    }

    pub fn is_double_quote_on_last_str(&self) -> bool {
        self.literal_flags.contains(LiteralFlags::DOUBLE_QUOTE)
    }

    pub fn is_escape_on_last_str(&self) -> bool {
        self.literal_flags.contains(LiteralFlags::ESCAPE)
    }

    pub fn is_oct_or_leading_zero_on_last_number(&self) -> bool {
        self.literal_flags.contains(LiteralFlags::OCTAL_OR_LEADING_ZERO)
    }

    pub fn last_identifier_has_escape(&self) -> bool {
        self.literal_flags.contains(LiteralFlags::IDENTIFIER_ESCAPE)
    }

    pub fn set_deferred_parse_flags(&mut self, flags: ScanFlags) {
        self.deferred_flags = flags;
    }

    pub fn deferred_parse_flags(&self) -> ScanFlags {
        self.deferred_flags
    }

    /// Enter or leave a generator body. Returns the previous setting.
    pub fn set_yield_is_keyword_region(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.yield_region, value)
    }

    /// Enter or leave an async function body. Returns the previous setting.
    pub fn set_await_is_keyword_region(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.await_region, value)
    }

    pub fn yield_is_keyword(&self) -> bool {
        self.yield_region || self.strict
    }

    pub fn await_is_keyword(&self) -> bool {
        self.await_region || self.module_code
    }

    pub fn set_strict_mode(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn is_strict_mode(&self) -> bool {
        self.strict
    }

    pub fn is_module_code(&self) -> bool {
        self.module_code
    }

    /// Set by the caller after the `}` that closes a template substitution.
    pub fn set_scan_state(&mut self, state: ScanState) {
        self.scan_state = state;
    }

    pub fn scan_state(&self) -> ScanState {
        self.scan_state
    }

    /// Number of template substitutions currently open.
    pub fn template_depth(&self) -> u32 {
        self.template_depth
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    #[inline]
    fn start_token(&mut self) {
        self.tok_start = self.pos;
        self.tok_multi_units = self.multi_units;
        self.tok_line = self.line;
    }

    #[inline]
    fn cursor(&self) -> Cursor {
        (self.pos, self.multi_units)
    }

    #[inline]
    fn reset_cursor(&mut self, (pos, multi_units): Cursor) {
        self.pos = pos;
        self.multi_units = multi_units;
    }

    /// The unit at absolute position `index`, widened.
    #[inline]
    fn unit_at(&self, index: usize) -> Option<u32> {
        if index < self.limit {
            Some(P::unit(self.src[index]))
        } else {
            None
        }
    }

    /// The unit `offset` positions after the cursor, widened.
    #[inline]
    fn char_at(&self, offset: usize) -> Option<u32> {
        self.unit_at(self.pos + offset)
    }

    fn next_units_are(&self, text: &[u8]) -> bool {
        text.iter()
            .enumerate()
            .all(|(i, &b)| self.char_at(i) == Some(u32::from(b)))
    }

    /// Read one character, updating the multi-unit count. The cursor must be
    /// in bounds.
    fn read_full(&mut self) -> u32 {
        let unit = P::unit(self.src[self.pos]);
        if !P::MULTI_UNIT || unit <= MAX_ASCII_CHARACTER {
            self.pos += 1;
            return unit;
        }
        let (cp, width) = P::decode(&self.src[..self.limit], self.pos, self.allow_cesu);
        self.pos += width;
        self.multi_units += width - utf16::utf16_len(cp);
        cp
    }

    /// Read one code point, pairing surrogates in ES6 mode.
    fn read_code_point(&mut self) -> u32 {
        let ch = self.read_full();
        if self.config.es6_unicode && utf16::is_high_surrogate(ch) && self.pos < self.limit {
            let saved = self.cursor();
            let low = self.read_full();
            if utf16::is_low_surrogate(low) {
                return utf16::surrogate_pair_to_code_point(ch, low);
            }
            self.reset_cursor(saved);
        }
        ch
    }

    /// The code point at `pos` without moving the cursor.
    fn code_point_at(&self, pos: usize) -> Option<u32> {
        if pos >= self.limit {
            return None;
        }
        let src = &self.src[..self.limit];
        let (cp, width) = P::decode(src, pos, self.allow_cesu);
        if self.config.es6_unicode && utf16::is_high_surrogate(cp) && pos + width < self.limit {
            let (low, _) = P::decode(src, pos + width, self.allow_cesu);
            if utf16::is_low_surrogate(low) {
                return Some(utf16::surrogate_pair_to_code_point(cp, low));
            }
        }
        Some(cp)
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
        self.line_multi_units = self.multi_units;
    }

    /// Bookkeeping after reading the line terminator `ch`.
    fn finish_newline(&mut self, ch: u32) {
        if ch == CARRIAGE_RETURN && self.char_at(0) == Some(LINE_FEED) {
            self.pos += 1;
        }
        self.new_line();
        self.had_eol = true;
    }

    fn error(&self, kind: ScanErrorKind) -> ScanError {
        ScanError::new(
            kind,
            char_offset(self.ich_min_tok()),
            char_offset(self.ich_lim_tok()),
            self.tok_line,
        )
    }

    fn intern_error(&self, err: InternError) -> ScanError {
        ScanError::from_intern(
            err,
            char_offset(self.ich_min_tok()),
            char_offset(self.ich_lim_tok()),
            self.tok_line,
        )
    }
}
