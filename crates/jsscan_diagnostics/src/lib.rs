//! jsscan_diagnostics: Diagnostic messages for the scanner.
//!
//! Every lexical and regex-literal failure has a message with a stable
//! numeric code. A [`Diagnostic`] is a message resolved against a file and
//! a character span.

use jsscan_core::text::TextSpan;
use std::fmt;

pub mod messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A message template. `{0}`, `{1}`... are filled by [`format_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A resolved message with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    /// Character span (UTF-16 offsets).
    pub span: Option<TextSpan>,
    /// Zero-based line the span starts on.
    pub line: Option<u32>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            line: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn with_location(file: String, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// `file(line,offset): category JScode: text`, with 1-based lines.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            match (self.line, self.span) {
                (Some(line), Some(span)) => write!(f, "({},{})", line + 1, span.start)?,
                (None, Some(span)) => write!(f, "({})", span.start)?,
                _ => {}
            }
            write!(f, ": ")?;
        }
        write!(f, "{} JS{}: {}", self.category, self.code, self.message_text)
    }
}

pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_substitutes_arguments() {
        assert_eq!(
            format_message(messages::LEGACY_OCTAL_LITERAL.message, &["017"]),
            "Legacy octal literal '017' is not allowed in strict mode"
        );
    }

    #[test]
    fn test_display_with_location() {
        let diag = Diagnostic::with_location(
            "a.js".to_string(),
            TextSpan::new(4, 1),
            &messages::INVALID_CHARACTER,
            &[],
        )
        .with_line(2);
        assert_eq!(diag.to_string(), "a.js(3,4): error JS1014: Invalid character");
        assert!(diag.is_error());
    }

    #[test]
    fn test_display_without_location() {
        let diag = Diagnostic::new(&messages::LEGACY_OCTAL_LITERAL, &["07"]);
        assert!(!diag.is_error());
        assert_eq!(
            diag.to_string(),
            "warning JS1129: Legacy octal literal '07' is not allowed in strict mode"
        );
    }
}
