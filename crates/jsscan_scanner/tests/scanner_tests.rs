//! Scanner integration tests.
//!
//! Tokenizes JavaScript snippets end to end through `TokenStream`.

use jsscan_core::{IdentArena, TextSpan};
use jsscan_scanner::{
    CharClassifier, HashTbl, PatternStore, RescanOutcome, ScanErrorKind, ScannedToken, Scanner,
    ScannerConfig, ScannerOptions, TokenPayload, TokenStream, Utf16Policy, Utf8Policy,
};
use jsscan_syntax::{ScanFlags, ScriptFlags, TokenKind};
use pretty_assertions::assert_eq;

/// Helper: scan all tokens from source with the given config and flags.
fn scan_with(source: &str, config: ScannerConfig, flags: ScriptFlags) -> Result<Vec<ScannedToken>, ScanErrorKind> {
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(config.es6_unicode);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, config);
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, flags, 0);
    TokenStream::new(scanner).collect::<Result<_, _>>().map_err(|err| err.kind)
}

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(TokenKind, String)> {
    scan_with(source, ScannerConfig::default(), ScriptFlags::NONE)
        .unwrap()
        .into_iter()
        .map(|token| (token.kind, token.value.unwrap_or_default()))
        .collect()
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

/// Helper: token kinds straight from `Scanner::scan`, with no regex rescans.
fn scan_raw_kinds(source: &str) -> Vec<TokenKind> {
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
    let mut kinds = Vec::new();
    loop {
        let kind = scanner.scan().unwrap();
        if kind == TokenKind::EndOfFileToken {
            break;
        }
        kinds.push(kind);
    }
    kinds
}

/// Helper: the first error scanning `source`.
fn scan_error(source: &str) -> ScanErrorKind {
    scan_with(source, ScannerConfig::default(), ScriptFlags::NONE).unwrap_err()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t  \u{feff}\u{3000}").is_empty());
    assert!(scan_all("// only a comment").is_empty());
    assert!(scan_all("/* only */ /* comments */").is_empty());
}

#[test]
fn test_function_declaration() {
    let kinds = scan_kinds("function add(a, b) { return a + b; }");
    assert_eq!(
        kinds,
        vec![
            TokenKind::FunctionKeyword,
            TokenKind::Identifier,
            TokenKind::OpenParenToken,
            TokenKind::Identifier,
            TokenKind::CommaToken,
            TokenKind::Identifier,
            TokenKind::CloseParenToken,
            TokenKind::OpenBraceToken,
            TokenKind::ReturnKeyword,
            TokenKind::Identifier,
            TokenKind::PlusToken,
            TokenKind::Identifier,
            TokenKind::SemicolonToken,
            TokenKind::CloseBraceToken,
        ]
    );
}

#[test]
fn test_arrow_and_optional_chaining() {
    let kinds = scan_kinds("const f = (x) => x?.y ?? z?.[0];");
    assert_eq!(
        kinds,
        vec![
            TokenKind::ConstKeyword,
            TokenKind::Identifier,
            TokenKind::EqualsToken,
            TokenKind::OpenParenToken,
            TokenKind::Identifier,
            TokenKind::CloseParenToken,
            TokenKind::EqualsGreaterThanToken,
            TokenKind::Identifier,
            TokenKind::QuestionDotToken,
            TokenKind::Identifier,
            TokenKind::QuestionQuestionToken,
            TokenKind::Identifier,
            TokenKind::QuestionDotToken,
            TokenKind::OpenBracketToken,
            TokenKind::IntegerLiteral,
            TokenKind::CloseBracketToken,
            TokenKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_all_assignment_operators() {
    let kinds = scan_raw_kinds("= += -= *= **= /= %= <<= >>= >>>= &= |= ^=");
    assert_eq!(kinds.len(), 13);
    assert!(kinds.iter().all(|kind| kind.is_assignment_operator()));
}

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("42 3.14 .5 5. 0xFF 0B1010 0O777 1e-7 1_000_000 9007199254740993");
    assert_eq!(
        tokens,
        vec![
            (TokenKind::IntegerLiteral, "42".to_string()),
            (TokenKind::FloatLiteral, "3.14".to_string()),
            (TokenKind::FloatLiteral, "0.5".to_string()),
            (TokenKind::FloatLiteral, "5".to_string()),
            (TokenKind::IntegerLiteral, "255".to_string()),
            (TokenKind::IntegerLiteral, "10".to_string()),
            (TokenKind::IntegerLiteral, "511".to_string()),
            (TokenKind::FloatLiteral, "1e-7".to_string()),
            (TokenKind::IntegerLiteral, "1000000".to_string()),
            (TokenKind::FloatLiteral, "9007199254740992".to_string()),
        ]
    );
}

#[test]
fn test_number_followed_by_member_access() {
    assert_eq!(
        scan_kinds("1..toString()"),
        vec![
            TokenKind::FloatLiteral,
            TokenKind::DotToken,
            TokenKind::Identifier,
            TokenKind::OpenParenToken,
            TokenKind::CloseParenToken,
        ]
    );
}

#[test]
fn test_bigint_literals() {
    assert_eq!(
        scan_all("10n 0n 1_0n"),
        vec![
            (TokenKind::BigIntLiteral, "10".to_string()),
            (TokenKind::BigIntLiteral, "0".to_string()),
            (TokenKind::BigIntLiteral, "10".to_string()),
        ]
    );
    assert_eq!(scan_error("1.5n"), ScanErrorKind::IdAfterLiteral);
    assert_eq!(scan_error("0x1n"), ScanErrorKind::IdAfterLiteral);
}

#[test]
fn test_number_errors() {
    assert_eq!(scan_error("3in x"), ScanErrorKind::IdAfterLiteral);
    assert_eq!(scan_error("1\\u0061"), ScanErrorKind::IdAfterLiteral);
    assert_eq!(scan_error("0o8"), ScanErrorKind::BadNumber);
    assert_eq!(scan_error("1__0"), ScanErrorKind::IdAfterLiteral);
}

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#""hello" 'it\'s' "\u{48}\x49" "a\
b""#);
    assert_eq!(
        tokens,
        vec![
            (TokenKind::StringLiteral, "hello".to_string()),
            (TokenKind::StringLiteral, "it's".to_string()),
            (TokenKind::StringLiteral, "HI".to_string()),
            (TokenKind::StringLiteral, "ab".to_string()),
        ]
    );
}

#[test]
fn test_line_separators_inside_strings() {
    let tokens = scan_with("'a\u{2028}b'\nc", ScannerConfig::default(), ScriptFlags::NONE).unwrap();
    assert_eq!(tokens[0].value.as_deref(), Some("a\u{2028}b"));
    assert_eq!(tokens[1].line, 1);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(scan_error("'abc"), ScanErrorKind::UnterminatedString);
    assert_eq!(scan_error("\"abc\ndef\""), ScanErrorKind::UnterminatedString);
    assert_eq!(scan_error("'abc\\"), ScanErrorKind::UnterminatedString);
}

#[test]
fn test_template_literals() {
    assert_eq!(
        scan_all("`plain` `a${b}c${d}e`"),
        vec![
            (TokenKind::TemplateNoSubstitution, "plain".to_string()),
            (TokenKind::TemplateHead, "a".to_string()),
            (TokenKind::Identifier, "b".to_string()),
            (TokenKind::TemplateMiddle, "c".to_string()),
            (TokenKind::Identifier, "d".to_string()),
            (TokenKind::TemplateTail, "e".to_string()),
        ]
    );
}

#[test]
fn test_nested_templates() {
    assert_eq!(
        scan_kinds("`x${`y${z}`}w`"),
        vec![
            TokenKind::TemplateHead,
            TokenKind::TemplateHead,
            TokenKind::Identifier,
            TokenKind::TemplateTail,
            TokenKind::TemplateTail,
        ]
    );
}

#[test]
fn test_template_with_object_literal() {
    assert_eq!(
        scan_kinds("`${ {a: 1}.a }`"),
        vec![
            TokenKind::TemplateHead,
            TokenKind::OpenBraceToken,
            TokenKind::Identifier,
            TokenKind::ColonToken,
            TokenKind::IntegerLiteral,
            TokenKind::CloseBraceToken,
            TokenKind::DotToken,
            TokenKind::Identifier,
            TokenKind::TemplateTail,
        ]
    );
}

#[test]
fn test_template_errors() {
    assert_eq!(scan_error("`abc"), ScanErrorKind::UnterminatedString);
    assert_eq!(scan_error("`\\07`"), ScanErrorKind::OctalInTemplate);
    assert_eq!(scan_error("`\\5`"), ScanErrorKind::OctalInTemplate);
}

#[test]
fn test_regex_literals() {
    assert_eq!(
        scan_all("let re = /[a-z]+\\/x/gu; re.test(s) / 2"),
        vec![
            (TokenKind::Identifier, "let".to_string()),
            (TokenKind::Identifier, "re".to_string()),
            (TokenKind::EqualsToken, String::new()),
            (TokenKind::RegularExpressionLiteral, "/[a-z]+\\/x/gu".to_string()),
            (TokenKind::SemicolonToken, String::new()),
            (TokenKind::Identifier, "re".to_string()),
            (TokenKind::DotToken, String::new()),
            (TokenKind::Identifier, "test".to_string()),
            (TokenKind::OpenParenToken, String::new()),
            (TokenKind::Identifier, "s".to_string()),
            (TokenKind::CloseParenToken, String::new()),
            (TokenKind::SlashToken, String::new()),
            (TokenKind::IntegerLiteral, "2".to_string()),
        ]
    );
}

#[test]
fn test_regex_flag_errors() {
    assert_eq!(scan_error("x = /a/gig"), ScanErrorKind::RegexSyntax);
    assert_eq!(scan_error("x = /a/q"), ScanErrorKind::RegexSyntax);
    assert_eq!(scan_error("x = /a\n/"), ScanErrorKind::RegexSyntax);

    let es5 = scan_with("x = /a/s", ScannerConfig::es5(), ScriptFlags::NONE);
    assert_eq!(es5.unwrap_err(), ScanErrorKind::RegexSyntax);
}

#[test]
fn test_keywords_in_strict_mode() {
    let sloppy = scan_with("let yield", ScannerConfig::default(), ScriptFlags::NONE).unwrap();
    assert_eq!(sloppy[0].kind, TokenKind::Identifier);
    assert_eq!(sloppy[1].kind, TokenKind::Identifier);

    let strict = scan_with("let yield", ScannerConfig::default(), ScriptFlags::STRICT_MODE).unwrap();
    assert_eq!(strict[0].kind, TokenKind::LetKeyword);
    assert_eq!(strict[1].kind, TokenKind::YieldKeyword);
}

#[test]
fn test_unicode_identifiers() {
    assert_eq!(
        scan_all("\u{3b1}\u{3b2} _$x \\u{10400}y"),
        vec![
            (TokenKind::Identifier, "\u{3b1}\u{3b2}".to_string()),
            (TokenKind::Identifier, "_$x".to_string()),
            (TokenKind::Identifier, "\u{10400}y".to_string()),
        ]
    );
}

#[test]
fn test_zero_width_joiner_continues_identifier() {
    assert_eq!(scan_all("a\u{200d}b").len(), 1);
    assert_eq!(scan_error("\u{200d}a"), ScanErrorKind::IllegalChar);
}

#[test]
fn test_comments_set_newline_flag() {
    let tokens = scan_with("a /* x\n */ b // y\nc /* z */ d", ScannerConfig::default(), ScriptFlags::NONE).unwrap();
    let flags: Vec<bool> = tokens.iter().map(|t| t.had_newline_before).collect();
    assert_eq!(flags, vec![false, true, true, false]);
    let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![0, 1, 2, 2]);
}

#[test]
fn test_crlf_counts_one_line() {
    let tokens = scan_with("a\r\nb\rc\n\rd", ScannerConfig::default(), ScriptFlags::NONE).unwrap();
    let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
    assert_eq!(lines, vec![0, 1, 2, 4]);
}

#[test]
fn test_spans_are_character_offsets() {
    let tokens = scan_with("\u{e9}t\u{e9} = '\u{1F600}'", ScannerConfig::default(), ScriptFlags::NONE).unwrap();
    let spans: Vec<TextSpan> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(spans, vec![TextSpan::new(0, 3), TextSpan::new(4, 1), TextSpan::new(6, 4)]);
}

#[test]
fn test_utf8_and_utf16_agree() {
    let source = "const \u{1d49c} = `\u{e9}${1 + 2}\u{2028}` /* \u{1F600} */ + 'x\u{20ac}';\nfoo(/\u{e9}+/u);";

    let arena = IdentArena::new();
    let classifier = CharClassifier::new(true);

    let mut narrow_table = HashTbl::with_default_buckets(&arena);
    let mut narrow = Scanner::<Utf8Policy>::new(&mut narrow_table, &classifier, ScannerConfig::default());
    narrow.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
    let from_utf8: Vec<ScannedToken> = TokenStream::new(narrow).map(Result::unwrap).collect();

    let wide_source: Vec<u16> = source.encode_utf16().collect();
    let mut wide_table = HashTbl::with_default_buckets(&arena);
    let mut wide = Scanner::<Utf16Policy>::new(&mut wide_table, &classifier, ScannerConfig::default());
    wide.set_text(&wide_source, 0, wide_source.len(), 0, false, ScriptFlags::NONE, 0);
    let from_utf16: Vec<ScannedToken> = TokenStream::new(wide).map(Result::unwrap).collect();

    assert_eq!(from_utf8, from_utf16);
    assert_eq!(from_utf8.last().map(|t| t.span.end()), Some(wide_source.len() as u32));
}

#[test]
fn test_scanning_a_slice_of_the_buffer() {
    let source = "xx\u{e9}; a + b";
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    // Start after the `é`: byte 4, character 3, on line 7.
    scanner.set_text(source.as_bytes(), 4, 5, 3, true, ScriptFlags::NONE, 7);

    assert_eq!(scanner.scan(), Ok(TokenKind::SemicolonToken));
    assert_eq!(scanner.ich_min_tok(), 3);
    assert_eq!(scanner.line_cur(), 7);
    assert_eq!(scanner.scan(), Ok(TokenKind::Identifier));
    assert_eq!(scanner.scan(), Ok(TokenKind::PlusToken));
    // `b` lies past the scanned length.
    assert_eq!(scanner.scan(), Ok(TokenKind::EndOfFileToken));
    assert_eq!(scanner.sys_alloc_error_line(7).as_deref(), Some("; a +"));
    assert_eq!(scanner.sys_alloc_error_line(6), None);
}

#[test]
fn test_identifiers_intern_to_one_entry() {
    let source = "foo bar foo \\u0066oo";
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);

    let mut idents = Vec::new();
    while scanner.scan().unwrap() != TokenKind::EndOfFileToken {
        idents.push(scanner.token_ident().unwrap().unwrap());
    }
    assert!(std::ptr::eq(idents[0], idents[2]));
    assert!(std::ptr::eq(idents[0], idents[3]));
    assert!(!std::ptr::eq(idents[0], idents[1]));
    assert_eq!(scanner.hash_tbl().len(), 2);
}

#[test]
fn test_deferred_string_pids() {
    let source = "'use strict'; 'other'";
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
    scanner.set_deferred_parse_flags(ScanFlags::SUPPRESS_STR_PID);

    assert_eq!(scanner.scan(), Ok(TokenKind::StringLiteral));
    assert!(scanner.token().ident().is_some());
    let point = scanner.capture();
    assert_eq!(scanner.scan(), Ok(TokenKind::SemicolonToken));
    assert_eq!(scanner.scan(), Ok(TokenKind::StringLiteral));
    assert_eq!(scanner.token().payload, TokenPayload::Str(None));
    let other = scanner.capture();

    assert_eq!(scanner.seek_to_forcing_pid(&other), Ok(TokenKind::StringLiteral));
    assert_eq!(scanner.token().ident().map(|i| i.to_string_lossy()), Some("other".to_string()));
    assert_eq!(scanner.deferred_parse_flags(), ScanFlags::SUPPRESS_STR_PID);
    assert_eq!(scanner.seek_to(&point), Ok(TokenKind::StringLiteral));
}

#[test]
fn test_compiled_regex_handles() {
    let source = "/a/g; /b/i";
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);
    let mut store = PatternStore::new();

    scanner.scan().unwrap();
    assert_eq!(scanner.rescan_regexp(&mut store), Ok(RescanOutcome::Regex));
    scanner.scan().unwrap();
    scanner.scan().unwrap();
    assert!(scanner.try_rescan_regexp(&mut store).is_regex());

    let sources: Vec<String> = store.iter().map(|s| s.to_string()).collect();
    assert_eq!(sources, vec!["/a/g".to_string(), "/b/i".to_string()]);
    assert_eq!(store.iter().nth(1).map(|s| s.span), Some(TextSpan::new(6, 4)));
}

#[test]
fn test_options_drive_scanning() {
    let options = ScannerOptions::from_json(r#"{ "exponentiation": false, "module": true }"#).unwrap();
    let tokens = scan_with("await 2 ** 3", options.resolve(), options.script_flags()).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::AwaitKeyword,
            TokenKind::IntegerLiteral,
            TokenKind::AsteriskToken,
            TokenKind::AsteriskToken,
            TokenKind::IntegerLiteral,
        ]
    );
}

#[test]
fn test_error_to_diagnostic() {
    let source = "let s = 'open";
    let arena = IdentArena::new();
    let mut table = HashTbl::with_default_buckets(&arena);
    let classifier = CharClassifier::new(true);
    let mut scanner = Scanner::<Utf8Policy>::new(&mut table, &classifier, ScannerConfig::default());
    scanner.set_text(source.as_bytes(), 0, source.len(), 0, true, ScriptFlags::NONE, 0);

    let err = TokenStream::new(scanner).find_map(Result::err).unwrap();
    assert_eq!(err.span(), TextSpan::new(8, 5));
    let diagnostic = err.to_diagnostic("input.js");
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.code, ScanErrorKind::UnterminatedString.code());
}
