//! Flag types shared by the scanner, the identifier table and their callers.

bitflags::bitflags! {
    /// Flags describing the script being scanned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScriptFlags: u32 {
        const NONE          = 0;
        const MODULE        = 1 << 0;
        const STRICT_MODE   = 1 << 1;
        const GLOBAL_CODE   = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Deferred parse flags that change what the scanner records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScanFlags: u8 {
        const NONE              = 0;
        /// String literal values are not interned (speculative scans).
        const SUPPRESS_STR_PID  = 1 << 0;
    }
}

bitflags::bitflags! {
    /// When a reserved word applies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeywordFlags: u8 {
        const NONE                      = 0;
        const RESERVED                  = 1 << 0;
        const FUTURE_RESERVED_STRICT    = 1 << 1;
    }
}

impl KeywordFlags {
    /// Whether a word carrying these flags is a keyword under the given mode.
    #[inline]
    pub fn applies(self, strict: bool) -> bool {
        self.contains(KeywordFlags::RESERVED)
            || (strict && self.contains(KeywordFlags::FUTURE_RESERVED_STRICT))
    }
}

bitflags::bitflags! {
    /// Flags stored on an interned identifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct IdentFlags: u16 {
        const NONE                      = 0;
        const RESERVED                  = 1 << 0;
        const FUTURE_RESERVED           = 1 << 1;
        const KEYWORD_RESOLVED          = 1 << 2;
        const EVAL                      = 1 << 3;
        const LET_OR_CONST              = 1 << 4;
        const MODULE_EXPORT             = 1 << 5;
        const USED_IN_ELEMENT_ACCESS    = 1 << 6;

        const KEYWORD = Self::RESERVED.bits() | Self::FUTURE_RESERVED.bits();
    }
}

bitflags::bitflags! {
    /// Facts about the most recent string, number or identifier literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LiteralFlags: u8 {
        const NONE                      = 0;
        const DOUBLE_QUOTE              = 1 << 0;
        const ESCAPE                    = 1 << 1;
        const OCTAL_OR_LEADING_ZERO     = 1 << 2;
        const IDENTIFIER_ESCAPE         = 1 << 3;

        const STRING_FLAGS = Self::DOUBLE_QUOTE.bits() | Self::ESCAPE.bits();
    }
}
