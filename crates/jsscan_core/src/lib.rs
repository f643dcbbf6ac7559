//! jsscan_core: Core utilities shared by the jsscan lexer crates.
//!
//! Provides the identifier arena, character-offset spans, and UTF-16
//! surrogate helpers used throughout the scanner.

pub mod arena;
pub mod text;
pub mod utf16;

// Re-export commonly used types
pub use arena::{ArenaExhausted, IdentArena};
pub use text::{CharOffset, TextSpan};
