//! jsscan_scanner: Lexer for JavaScript source text.
//!
//! Produces tokens one at a time from either UTF-8 or UTF-16 buffers with:
//! - Identifier interning into a [`HashTbl`] keyed by UTF-16 spelling
//! - Unicode identifiers under ES5 or ES6 classification rules
//! - String, template, numeric and BigInt literals
//! - Capture / seek for backtracking re-scans
//! - Regular expression literal rescans through a [`RegexCompiler`]

pub mod char_classifier;
pub mod char_codes;
pub mod config;
pub mod encoding;
pub mod error;
pub mod hash_tbl;
pub mod number;
pub mod regex;
pub mod scanner;
pub mod standard_chars;
pub mod token;
pub mod tokens;

pub use char_classifier::{CharClassifier, CharFlags, CharType, ClassifierStrategy};
pub use config::{ConfigError, ScannerConfig, ScannerOptions};
pub use encoding::{EncodingPolicy, Utf16Policy, Utf8Policy};
pub use error::{ScanError, ScanErrorKind};
pub use hash_tbl::{AssignmentState, HashTbl, Ident, IdentPtr, InternError, Latin1, Spelling};
pub use regex::{
    PatternStore, RegexCompileError, RegexCompiler, RegexFlags, RegexHandle, RegexSource,
    RescanOutcome,
};
pub use scanner::{ScanState, Scanner};
pub use standard_chars::{CharSet, CharUnit, StandardChars};
pub use token::{RestorePoint, Token, TokenPayload};
pub use tokens::{ScannedToken, TokenStream};
