//! Message table for lexical and regular-expression errors.

use super::*;

macro_rules! diag {
    ($code:expr, Error, $msg:expr) => {
        DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
    };
    ($code:expr, Warning, $msg:expr) => {
        DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
    };
}

// ============================================================================
// Scanner errors (1000-1199)
// ============================================================================
pub const OUT_OF_MEMORY: DiagnosticMessage = diag!(1001, Error, "Out of memory");
pub const EXPECTED_SLASH: DiagnosticMessage = diag!(1012, Error, "Expected '/'");
pub const INVALID_NUMBER: DiagnosticMessage = diag!(1013, Error, "Invalid number");
pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1014, Error, "Invalid character");
pub const UNTERMINATED_STRING_CONSTANT: DiagnosticMessage = diag!(1015, Error, "Unterminated string constant");
pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1016, Error, "Unterminated comment");
pub const EXPECTED_HEXADECIMAL_DIGIT: DiagnosticMessage = diag!(1023, Error, "Expected hexadecimal digit");
pub const IDENTIFIER_AFTER_NUMERIC_LITERAL: DiagnosticMessage = diag!(1124, Error, "Unexpected identifier after numeric literal");
pub const INVALID_CODEPOINT_IN_ESCAPE: DiagnosticMessage = diag!(1125, Error, "Invalid codepoint value in the escape sequence");
pub const EXPECTED_CLOSING_BRACE_IN_ESCAPE: DiagnosticMessage = diag!(1126, Error, "Expected '}' to close the escape sequence");
pub const OCTAL_ESCAPE_IN_TEMPLATE: DiagnosticMessage = diag!(1127, Error, "Octal escape sequences are not allowed in template literals");

// Not raised by the scanner itself. Parsers report these from
// `EscapedKeyword` tokens and `is_oct_or_leading_zero_on_last_number`.
pub const KEYWORD_CONTAINS_ESCAPE: DiagnosticMessage = diag!(1128, Error, "Keywords cannot contain escape characters");
pub const LEGACY_OCTAL_LITERAL: DiagnosticMessage = diag!(1129, Warning, "Legacy octal literal '{0}' is not allowed in strict mode");

// ============================================================================
// Regular expression literal errors (5000-5699)
// ============================================================================
pub const REGEXP_SYNTAX: DiagnosticMessage = diag!(5017, Error, "Syntax error in regular expression");
pub const REGEXP_BAD_QUANTIFIER: DiagnosticMessage = diag!(5018, Error, "Unexpected quantifier");
pub const REGEXP_NO_BRACKET: DiagnosticMessage = diag!(5019, Error, "Expected ']' in regular expression");
pub const REGEXP_NO_PAREN: DiagnosticMessage = diag!(5020, Error, "Expected ')' in regular expression");
pub const REGEXP_NO_CURLY_BRACKET: DiagnosticMessage = diag!(5607, Error, "Expected '}' in regular expression");
pub const REGEXP_INVALID_ESCAPE: DiagnosticMessage = diag!(5674, Error, "Invalid regular expression: invalid escape in unicode pattern");
