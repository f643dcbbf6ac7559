//! Scanner configuration.
//!
//! [`ScannerConfig`] is what the scanner reads; [`ScannerOptions`] is the
//! partially specified form loaded from JSON (`jsscan.json`) or built from
//! command line flags, resolved against the defaults.

use jsscan_syntax::ScriptFlags;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Language features the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScannerConfig {
    /// ES6 identifier rules, `\u{...}` escapes and surrogate pairs.
    pub es6_unicode: bool,
    /// `1_000` style numeric separators.
    pub numeric_separators: bool,
    /// `123n` BigInt literals.
    pub bigint: bool,
    /// The `y` regex flag.
    pub regex_sticky: bool,
    /// The `s` regex flag.
    pub regex_dot_all: bool,
    /// `#!` comments at the start of the source.
    pub hashbang: bool,
    /// `??`
    pub nullish_coalescing: bool,
    /// `?.`
    pub optional_chaining: bool,
    /// `**` and `**=`
    pub exponentiation: bool,
    /// `...`
    pub spread: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            es6_unicode: true,
            numeric_separators: true,
            bigint: true,
            regex_sticky: true,
            regex_dot_all: true,
            hashbang: true,
            nullish_coalescing: true,
            optional_chaining: true,
            exponentiation: true,
            spread: true,
        }
    }
}

impl ScannerConfig {
    /// ES5-level scanning: every post-ES5 feature off.
    pub fn es5() -> Self {
        Self {
            es6_unicode: false,
            numeric_separators: false,
            bigint: false,
            regex_sticky: false,
            regex_dot_all: false,
            hashbang: false,
            nullish_coalescing: false,
            optional_chaining: false,
            exponentiation: false,
            spread: false,
        }
    }
}

/// Errors loading scanner options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scanner options as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScannerOptions {
    // -- Language features --
    pub es6_unicode: Option<bool>,
    pub numeric_separators: Option<bool>,
    pub bigint: Option<bool>,
    pub regex_sticky: Option<bool>,
    pub regex_dot_all: Option<bool>,
    pub hashbang: Option<bool>,
    pub nullish_coalescing: Option<bool>,
    pub optional_chaining: Option<bool>,
    pub exponentiation: Option<bool>,
    pub spread: Option<bool>,

    // -- Script kind --
    pub module: Option<bool>,
    pub strict: Option<bool>,
}

impl ScannerOptions {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Overlay `other` onto these options; set fields in `other` win.
    pub fn merge(self, other: ScannerOptions) -> Self {
        Self {
            es6_unicode: other.es6_unicode.or(self.es6_unicode),
            numeric_separators: other.numeric_separators.or(self.numeric_separators),
            bigint: other.bigint.or(self.bigint),
            regex_sticky: other.regex_sticky.or(self.regex_sticky),
            regex_dot_all: other.regex_dot_all.or(self.regex_dot_all),
            hashbang: other.hashbang.or(self.hashbang),
            nullish_coalescing: other.nullish_coalescing.or(self.nullish_coalescing),
            optional_chaining: other.optional_chaining.or(self.optional_chaining),
            exponentiation: other.exponentiation.or(self.exponentiation),
            spread: other.spread.or(self.spread),
            module: other.module.or(self.module),
            strict: other.strict.or(self.strict),
        }
    }

    /// Fill unset fields from [`ScannerConfig::default`].
    pub fn resolve(&self) -> ScannerConfig {
        let defaults = ScannerConfig::default();
        ScannerConfig {
            es6_unicode: self.es6_unicode.unwrap_or(defaults.es6_unicode),
            numeric_separators: self.numeric_separators.unwrap_or(defaults.numeric_separators),
            bigint: self.bigint.unwrap_or(defaults.bigint),
            regex_sticky: self.regex_sticky.unwrap_or(defaults.regex_sticky),
            regex_dot_all: self.regex_dot_all.unwrap_or(defaults.regex_dot_all),
            hashbang: self.hashbang.unwrap_or(defaults.hashbang),
            nullish_coalescing: self.nullish_coalescing.unwrap_or(defaults.nullish_coalescing),
            optional_chaining: self.optional_chaining.unwrap_or(defaults.optional_chaining),
            exponentiation: self.exponentiation.unwrap_or(defaults.exponentiation),
            spread: self.spread.unwrap_or(defaults.spread),
        }
    }

    pub fn script_flags(&self) -> ScriptFlags {
        let mut flags = ScriptFlags::GLOBAL_CODE;
        if self.module == Some(true) {
            // Module code is always strict.
            flags |= ScriptFlags::MODULE | ScriptFlags::STRICT_MODE;
        }
        if self.strict == Some(true) {
            flags |= ScriptFlags::STRICT_MODE;
        }
        flags
    }
}
