//! jsscan_syntax: Token kinds and flag types for the JavaScript lexer.
//!
//! Defines the `TokenKind` enum, the reserved word table, operator
//! precedence, and the bitflags shared between the scanner and its callers.

pub mod flags;
pub mod token_kind;

// Re-export key types
pub use flags::*;
pub use token_kind::{OperatorPrecedence, TokenKind};
