//! TokenKind enum - every token the JavaScript scanner produces.

use crate::flags::KeywordFlags;

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u16)]
pub enum TokenKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    #[default]
    Unknown = 0,
    EndOfFileToken = 1,

    // Names
    Identifier = 2,
    /// A reserved word spelled with a unicode escape.
    EscapedKeyword = 3,

    // Literals
    StringLiteral = 4,
    TemplateNoSubstitution = 5,
    TemplateHead = 6,
    TemplateMiddle = 7,
    TemplateTail = 8,
    IntegerLiteral = 9,
    FloatLiteral = 10,
    BigIntLiteral = 11,
    RegularExpressionLiteral = 12,

    // Punctuation
    OpenBraceToken = 13,
    CloseBraceToken = 14,
    OpenParenToken = 15,
    CloseParenToken = 16,
    OpenBracketToken = 17,
    CloseBracketToken = 18,
    DotToken = 19,
    DotDotDotToken = 20,
    SemicolonToken = 21,
    ColonToken = 22,
    QuestionDotToken = 23,
    EqualsGreaterThanToken = 24,
    TildeToken = 25,
    ExclamationToken = 26,
    PlusPlusToken = 27,
    MinusMinusToken = 28,

    // Binary operators
    CommaToken = 29,
    QuestionToken = 30,
    QuestionQuestionToken = 31,
    BarBarToken = 32,
    AmpersandAmpersandToken = 33,
    BarToken = 34,
    CaretToken = 35,
    AmpersandToken = 36,
    EqualsEqualsToken = 37,
    ExclamationEqualsToken = 38,
    EqualsEqualsEqualsToken = 39,
    ExclamationEqualsEqualsToken = 40,
    LessThanToken = 41,
    GreaterThanToken = 42,
    LessThanEqualsToken = 43,
    GreaterThanEqualsToken = 44,
    LessThanLessThanToken = 45,
    GreaterThanGreaterThanToken = 46,
    GreaterThanGreaterThanGreaterThanToken = 47,
    PlusToken = 48,
    MinusToken = 49,
    AsteriskToken = 50,
    SlashToken = 51,
    PercentToken = 52,
    AsteriskAsteriskToken = 53,

    // Assignment operators
    EqualsToken = 54,
    PlusEqualsToken = 55,
    MinusEqualsToken = 56,
    AsteriskEqualsToken = 57,
    AsteriskAsteriskEqualsToken = 58,
    SlashEqualsToken = 59,
    PercentEqualsToken = 60,
    LessThanLessThanEqualsToken = 61,
    GreaterThanGreaterThanEqualsToken = 62,
    GreaterThanGreaterThanGreaterThanEqualsToken = 63,
    AmpersandEqualsToken = 64,
    BarEqualsToken = 65,
    CaretEqualsToken = 66,

    // ========================================================================
    // Reserved words
    // ========================================================================
    BreakKeyword = 67,
    CaseKeyword = 68,
    CatchKeyword = 69,
    ClassKeyword = 70,
    ConstKeyword = 71,
    ContinueKeyword = 72,
    DebuggerKeyword = 73,
    DefaultKeyword = 74,
    DeleteKeyword = 75,
    DoKeyword = 76,
    ElseKeyword = 77,
    EnumKeyword = 78,
    ExportKeyword = 79,
    ExtendsKeyword = 80,
    FalseKeyword = 81,
    FinallyKeyword = 82,
    ForKeyword = 83,
    FunctionKeyword = 84,
    IfKeyword = 85,
    ImportKeyword = 86,
    InKeyword = 87,
    InstanceOfKeyword = 88,
    NewKeyword = 89,
    NullKeyword = 90,
    ReturnKeyword = 91,
    SuperKeyword = 92,
    SwitchKeyword = 93,
    ThisKeyword = 94,
    ThrowKeyword = 95,
    TrueKeyword = 96,
    TryKeyword = 97,
    TypeOfKeyword = 98,
    VarKeyword = 99,
    VoidKeyword = 100,
    WhileKeyword = 101,
    WithKeyword = 102,
    // Reserved, but demoted to identifiers outside their grammar regions
    AwaitKeyword = 103,
    YieldKeyword = 104,

    // Future reserved words (strict mode only)
    ImplementsKeyword = 105,
    InterfaceKeyword = 106,
    LetKeyword = 107,
    PackageKeyword = 108,
    PrivateKeyword = 109,
    ProtectedKeyword = 110,
    PublicKeyword = 111,
    StaticKeyword = 112,
}

// Marker constants for TokenKind ranges.
impl TokenKind {
    pub const FIRST_LITERAL_TOKEN: TokenKind = TokenKind::StringLiteral;
    pub const LAST_LITERAL_TOKEN: TokenKind = TokenKind::RegularExpressionLiteral;
    pub const FIRST_TEMPLATE_TOKEN: TokenKind = TokenKind::TemplateNoSubstitution;
    pub const LAST_TEMPLATE_TOKEN: TokenKind = TokenKind::TemplateTail;
    pub const FIRST_PUNCTUATION: TokenKind = TokenKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: TokenKind = TokenKind::CaretEqualsToken;
    pub const FIRST_BINARY_OPERATOR: TokenKind = TokenKind::CommaToken;
    pub const LAST_BINARY_OPERATOR: TokenKind = TokenKind::AsteriskAsteriskToken;
    pub const FIRST_ASSIGNMENT: TokenKind = TokenKind::EqualsToken;
    pub const LAST_ASSIGNMENT: TokenKind = TokenKind::CaretEqualsToken;
    pub const FIRST_KEYWORD: TokenKind = TokenKind::BreakKeyword;
    pub const LAST_KEYWORD: TokenKind = TokenKind::StaticKeyword;
    pub const FIRST_RESERVED_WORD: TokenKind = TokenKind::BreakKeyword;
    pub const LAST_RESERVED_WORD: TokenKind = TokenKind::YieldKeyword;
    pub const FIRST_FUTURE_RESERVED_WORD: TokenKind = TokenKind::ImplementsKeyword;
    pub const LAST_FUTURE_RESERVED_WORD: TokenKind = TokenKind::StaticKeyword;
}

/// Operator precedence levels, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Comma = 0,
    Assignment = 1,
    Conditional = 2,
    NullishCoalescing = 3,
    LogicalOr = 4,
    LogicalAnd = 5,
    BitwiseOr = 6,
    BitwiseXor = 7,
    BitwiseAnd = 8,
    Equality = 9,
    Relational = 10,
    Shift = 11,
    Additive = 12,
    Multiplicative = 13,
    Exponentiation = 14,
    Unary = 15,
    Update = 16,
    Invalid = 255,
}

impl TokenKind {
    #[inline]
    fn in_range(self, first: TokenKind, last: TokenKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    /// Whether this kind is a reserved or future reserved word.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Whether this kind is reserved in every mode.
    #[inline]
    pub fn is_reserved_word(self) -> bool {
        self.in_range(Self::FIRST_RESERVED_WORD, Self::LAST_RESERVED_WORD)
    }

    /// Whether this kind is reserved only in strict mode code.
    #[inline]
    pub fn is_future_reserved_word(self) -> bool {
        self.in_range(Self::FIRST_FUTURE_RESERVED_WORD, Self::LAST_FUTURE_RESERVED_WORD)
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.in_range(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        self.in_range(Self::FIRST_LITERAL_TOKEN, Self::LAST_LITERAL_TOKEN)
    }

    #[inline]
    pub fn is_template(self) -> bool {
        self.in_range(Self::FIRST_TEMPLATE_TOKEN, Self::LAST_TEMPLATE_TOKEN)
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.in_range(Self::FIRST_ASSIGNMENT, Self::LAST_ASSIGNMENT)
    }

    /// Whether this kind is an identifier, including escaped keywords.
    #[inline]
    pub fn is_identifier(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::EscapedKeyword)
    }

    /// Whether this kind is a numeric literal of any flavor.
    #[inline]
    pub fn is_numeric_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral | TokenKind::BigIntLiteral
        )
    }

    /// Whether this kind is a binary, unary or assignment operator.
    pub fn is_operator(self) -> bool {
        self.binary_precedence() != OperatorPrecedence::Invalid
            || self.unary_precedence() != OperatorPrecedence::Invalid
    }

    /// Look up a reserved word by its spelling.
    ///
    /// Returns the keyword kind together with the modes in which it applies.
    /// Contextual words such as `of`, `get` or `async` are not reserved and
    /// yield `None`.
    pub fn from_keyword(text: &str) -> Option<(TokenKind, KeywordFlags)> {
        const R: KeywordFlags = KeywordFlags::RESERVED;
        const S: KeywordFlags = KeywordFlags::FUTURE_RESERVED_STRICT;
        let entry = match text {
            "break" => (TokenKind::BreakKeyword, R),
            "case" => (TokenKind::CaseKeyword, R),
            "catch" => (TokenKind::CatchKeyword, R),
            "class" => (TokenKind::ClassKeyword, R),
            "const" => (TokenKind::ConstKeyword, R),
            "continue" => (TokenKind::ContinueKeyword, R),
            "debugger" => (TokenKind::DebuggerKeyword, R),
            "default" => (TokenKind::DefaultKeyword, R),
            "delete" => (TokenKind::DeleteKeyword, R),
            "do" => (TokenKind::DoKeyword, R),
            "else" => (TokenKind::ElseKeyword, R),
            "enum" => (TokenKind::EnumKeyword, R),
            "export" => (TokenKind::ExportKeyword, R),
            "extends" => (TokenKind::ExtendsKeyword, R),
            "false" => (TokenKind::FalseKeyword, R),
            "finally" => (TokenKind::FinallyKeyword, R),
            "for" => (TokenKind::ForKeyword, R),
            "function" => (TokenKind::FunctionKeyword, R),
            "if" => (TokenKind::IfKeyword, R),
            "import" => (TokenKind::ImportKeyword, R),
            "in" => (TokenKind::InKeyword, R),
            "instanceof" => (TokenKind::InstanceOfKeyword, R),
            "new" => (TokenKind::NewKeyword, R),
            "null" => (TokenKind::NullKeyword, R),
            "return" => (TokenKind::ReturnKeyword, R),
            "super" => (TokenKind::SuperKeyword, R),
            "switch" => (TokenKind::SwitchKeyword, R),
            "this" => (TokenKind::ThisKeyword, R),
            "throw" => (TokenKind::ThrowKeyword, R),
            "true" => (TokenKind::TrueKeyword, R),
            "try" => (TokenKind::TryKeyword, R),
            "typeof" => (TokenKind::TypeOfKeyword, R),
            "var" => (TokenKind::VarKeyword, R),
            "void" => (TokenKind::VoidKeyword, R),
            "while" => (TokenKind::WhileKeyword, R),
            "with" => (TokenKind::WithKeyword, R),
            "await" => (TokenKind::AwaitKeyword, R),
            "yield" => (TokenKind::YieldKeyword, R),
            "implements" => (TokenKind::ImplementsKeyword, S),
            "interface" => (TokenKind::InterfaceKeyword, S),
            "let" => (TokenKind::LetKeyword, S),
            "package" => (TokenKind::PackageKeyword, S),
            "private" => (TokenKind::PrivateKeyword, S),
            "protected" => (TokenKind::ProtectedKeyword, S),
            "public" => (TokenKind::PublicKeyword, S),
            "static" => (TokenKind::StaticKeyword, S),
            _ => return None,
        };
        Some(entry)
    }

    /// The spelling of a keyword kind, or None.
    pub fn keyword_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::BreakKeyword => "break",
            TokenKind::CaseKeyword => "case",
            TokenKind::CatchKeyword => "catch",
            TokenKind::ClassKeyword => "class",
            TokenKind::ConstKeyword => "const",
            TokenKind::ContinueKeyword => "continue",
            TokenKind::DebuggerKeyword => "debugger",
            TokenKind::DefaultKeyword => "default",
            TokenKind::DeleteKeyword => "delete",
            TokenKind::DoKeyword => "do",
            TokenKind::ElseKeyword => "else",
            TokenKind::EnumKeyword => "enum",
            TokenKind::ExportKeyword => "export",
            TokenKind::ExtendsKeyword => "extends",
            TokenKind::FalseKeyword => "false",
            TokenKind::FinallyKeyword => "finally",
            TokenKind::ForKeyword => "for",
            TokenKind::FunctionKeyword => "function",
            TokenKind::IfKeyword => "if",
            TokenKind::ImportKeyword => "import",
            TokenKind::InKeyword => "in",
            TokenKind::InstanceOfKeyword => "instanceof",
            TokenKind::NewKeyword => "new",
            TokenKind::NullKeyword => "null",
            TokenKind::ReturnKeyword => "return",
            TokenKind::SuperKeyword => "super",
            TokenKind::SwitchKeyword => "switch",
            TokenKind::ThisKeyword => "this",
            TokenKind::ThrowKeyword => "throw",
            TokenKind::TrueKeyword => "true",
            TokenKind::TryKeyword => "try",
            TokenKind::TypeOfKeyword => "typeof",
            TokenKind::VarKeyword => "var",
            TokenKind::VoidKeyword => "void",
            TokenKind::WhileKeyword => "while",
            TokenKind::WithKeyword => "with",
            TokenKind::AwaitKeyword => "await",
            TokenKind::YieldKeyword => "yield",
            TokenKind::ImplementsKeyword => "implements",
            TokenKind::InterfaceKeyword => "interface",
            TokenKind::LetKeyword => "let",
            TokenKind::PackageKeyword => "package",
            TokenKind::PrivateKeyword => "private",
            TokenKind::ProtectedKeyword => "protected",
            TokenKind::PublicKeyword => "public",
            TokenKind::StaticKeyword => "static",
            _ => return None,
        };
        Some(text)
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::OpenBraceToken => "{",
            TokenKind::CloseBraceToken => "}",
            TokenKind::OpenParenToken => "(",
            TokenKind::CloseParenToken => ")",
            TokenKind::OpenBracketToken => "[",
            TokenKind::CloseBracketToken => "]",
            TokenKind::DotToken => ".",
            TokenKind::DotDotDotToken => "...",
            TokenKind::SemicolonToken => ";",
            TokenKind::ColonToken => ":",
            TokenKind::QuestionDotToken => "?.",
            TokenKind::EqualsGreaterThanToken => "=>",
            TokenKind::TildeToken => "~",
            TokenKind::ExclamationToken => "!",
            TokenKind::PlusPlusToken => "++",
            TokenKind::MinusMinusToken => "--",
            TokenKind::CommaToken => ",",
            TokenKind::QuestionToken => "?",
            TokenKind::QuestionQuestionToken => "??",
            TokenKind::BarBarToken => "||",
            TokenKind::AmpersandAmpersandToken => "&&",
            TokenKind::BarToken => "|",
            TokenKind::CaretToken => "^",
            TokenKind::AmpersandToken => "&",
            TokenKind::EqualsEqualsToken => "==",
            TokenKind::ExclamationEqualsToken => "!=",
            TokenKind::EqualsEqualsEqualsToken => "===",
            TokenKind::ExclamationEqualsEqualsToken => "!==",
            TokenKind::LessThanToken => "<",
            TokenKind::GreaterThanToken => ">",
            TokenKind::LessThanEqualsToken => "<=",
            TokenKind::GreaterThanEqualsToken => ">=",
            TokenKind::LessThanLessThanToken => "<<",
            TokenKind::GreaterThanGreaterThanToken => ">>",
            TokenKind::GreaterThanGreaterThanGreaterThanToken => ">>>",
            TokenKind::PlusToken => "+",
            TokenKind::MinusToken => "-",
            TokenKind::AsteriskToken => "*",
            TokenKind::SlashToken => "/",
            TokenKind::PercentToken => "%",
            TokenKind::AsteriskAsteriskToken => "**",
            TokenKind::EqualsToken => "=",
            TokenKind::PlusEqualsToken => "+=",
            TokenKind::MinusEqualsToken => "-=",
            TokenKind::AsteriskEqualsToken => "*=",
            TokenKind::AsteriskAsteriskEqualsToken => "**=",
            TokenKind::SlashEqualsToken => "/=",
            TokenKind::PercentEqualsToken => "%=",
            TokenKind::LessThanLessThanEqualsToken => "<<=",
            TokenKind::GreaterThanGreaterThanEqualsToken => ">>=",
            TokenKind::GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
            TokenKind::AmpersandEqualsToken => "&=",
            TokenKind::BarEqualsToken => "|=",
            TokenKind::CaretEqualsToken => "^=",
            _ => return None,
        };
        Some(text)
    }

    /// Precedence of this kind when used as a binary operator.
    pub fn binary_precedence(self) -> OperatorPrecedence {
        match self {
            TokenKind::CommaToken => OperatorPrecedence::Comma,
            k if k.is_assignment_operator() => OperatorPrecedence::Assignment,
            TokenKind::QuestionToken => OperatorPrecedence::Conditional,
            TokenKind::QuestionQuestionToken => OperatorPrecedence::NullishCoalescing,
            TokenKind::BarBarToken => OperatorPrecedence::LogicalOr,
            TokenKind::AmpersandAmpersandToken => OperatorPrecedence::LogicalAnd,
            TokenKind::BarToken => OperatorPrecedence::BitwiseOr,
            TokenKind::CaretToken => OperatorPrecedence::BitwiseXor,
            TokenKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
            TokenKind::EqualsEqualsToken
            | TokenKind::ExclamationEqualsToken
            | TokenKind::EqualsEqualsEqualsToken
            | TokenKind::ExclamationEqualsEqualsToken => OperatorPrecedence::Equality,
            TokenKind::LessThanToken
            | TokenKind::GreaterThanToken
            | TokenKind::LessThanEqualsToken
            | TokenKind::GreaterThanEqualsToken
            | TokenKind::InstanceOfKeyword
            | TokenKind::InKeyword => OperatorPrecedence::Relational,
            TokenKind::LessThanLessThanToken
            | TokenKind::GreaterThanGreaterThanToken
            | TokenKind::GreaterThanGreaterThanGreaterThanToken => OperatorPrecedence::Shift,
            TokenKind::PlusToken | TokenKind::MinusToken => OperatorPrecedence::Additive,
            TokenKind::AsteriskToken | TokenKind::SlashToken | TokenKind::PercentToken => {
                OperatorPrecedence::Multiplicative
            }
            TokenKind::AsteriskAsteriskToken => OperatorPrecedence::Exponentiation,
            _ => OperatorPrecedence::Invalid,
        }
    }

    /// Precedence of this kind when used as a prefix operator.
    pub fn unary_precedence(self) -> OperatorPrecedence {
        match self {
            TokenKind::PlusToken
            | TokenKind::MinusToken
            | TokenKind::TildeToken
            | TokenKind::ExclamationToken
            | TokenKind::DeleteKeyword
            | TokenKind::VoidKeyword
            | TokenKind::TypeOfKeyword => OperatorPrecedence::Unary,
            TokenKind::PlusPlusToken | TokenKind::MinusMinusToken => OperatorPrecedence::Update,
            _ => OperatorPrecedence::Invalid,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
