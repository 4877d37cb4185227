//! Lexical tokens.
//!
//! Keywords get their own variants; identifiers and string literals carry an
//! interned [`Name`]. Numbers carry the bit pattern of an `f64` so `TokenKind`
//! stays `Eq + Hash`.

use std::fmt;
use std::ops::Index;

use bitflags::bitflags;

use crate::{Name, Span};

/// Token kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, stored as `f64::to_bits`.
    Number(u64),
    /// String literal with escapes already processed.
    String(Name),
    /// Interpolated string: raw body between `f"` and `"`, holes unparsed.
    FString(Name),
    Ident(Name),

    // Keywords
    Let,
    Be,
    Set,
    To,
    Show,
    If,
    Then,
    Elif,
    Else,
    End,
    While,
    Do,
    For,
    In,
    Define,
    Pipeline,
    Return,
    Guard,
    And,
    Or,
    Not,
    Is,
    /// `is not`, fused from two keywords by the lexer.
    IsNot,
    True,
    False,
    Null,
    Try,
    Rescue,
    Ensure,
    Fn,
    Match,
    With,
    When,
    Begin,

    // Domain statements
    Listen,
    Trigger,
    Link,
    Process,
    Access,
    Sync,
    Evolve,
    Emit,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    /// Optional statement separator.
    Semicolon,
    Dot,
    DotDotDot,
    Arrow,
    Bar,
    PipeArrow,
    DoubleQuestion,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Eof,
}

impl TokenKind {
    /// Build a number token from its value.
    #[inline]
    pub fn number(value: f64) -> Self {
        TokenKind::Number(value.to_bits())
    }

    /// The numeric value of a `Number` token.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenKind::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Human-readable name used in "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::FString(_) => "f-string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Let => "`let`",
            TokenKind::Be => "`be`",
            TokenKind::Set => "`set`",
            TokenKind::To => "`to`",
            TokenKind::Show => "`show`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Elif => "`elif`",
            TokenKind::Else => "`else`",
            TokenKind::End => "`end`",
            TokenKind::While => "`while`",
            TokenKind::Do => "`do`",
            TokenKind::For => "`for`",
            TokenKind::In => "`in`",
            TokenKind::Define => "`define`",
            TokenKind::Pipeline => "`pipeline`",
            TokenKind::Return => "`return`",
            TokenKind::Guard => "`guard`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::Is => "`is`",
            TokenKind::IsNot => "`is not`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::Try => "`try`",
            TokenKind::Rescue => "`rescue`",
            TokenKind::Ensure => "`ensure`",
            TokenKind::Fn => "`fn`",
            TokenKind::Match => "`match`",
            TokenKind::With => "`with`",
            TokenKind::When => "`when`",
            TokenKind::Begin => "`begin`",
            TokenKind::Listen => "`listen`",
            TokenKind::Trigger => "`trigger`",
            TokenKind::Link => "`link`",
            TokenKind::Process => "`process`",
            TokenKind::Access => "`access`",
            TokenKind::Sync => "`sync`",
            TokenKind::Evolve => "`evolve`",
            TokenKind::Emit => "`emit`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDotDot => "`...`",
            TokenKind::Arrow => "`->`",
            TokenKind::Bar => "`|`",
            TokenKind::PipeArrow => "`|>`",
            TokenKind::DoubleQuestion => "`??`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Eof => "end of file",
        }
    }

    /// Source text of a keyword token, `None` for everything else.
    ///
    /// After `.` and as map keys, keywords are plain names (`stream.sync()`).
    pub fn keyword_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Let => "let",
            TokenKind::Be => "be",
            TokenKind::Set => "set",
            TokenKind::To => "to",
            TokenKind::Show => "show",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::End => "end",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::In => "in",
            TokenKind::Define => "define",
            TokenKind::Pipeline => "pipeline",
            TokenKind::Return => "return",
            TokenKind::Guard => "guard",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Is => "is",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Try => "try",
            TokenKind::Rescue => "rescue",
            TokenKind::Ensure => "ensure",
            TokenKind::Fn => "fn",
            TokenKind::Match => "match",
            TokenKind::With => "with",
            TokenKind::When => "when",
            TokenKind::Begin => "begin",
            TokenKind::Listen => "listen",
            TokenKind::Trigger => "trigger",
            TokenKind::Link => "link",
            TokenKind::Process => "process",
            TokenKind::Access => "access",
            TokenKind::Sync => "sync",
            TokenKind::Evolve => "evolve",
            TokenKind::Emit => "emit",
            _ => return None,
        };
        Some(text)
    }

    /// Keywords that open a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Set
                | TokenKind::Show
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Define
                | TokenKind::Pipeline
                | TokenKind::Return
                | TokenKind::Guard
                | TokenKind::Try
                | TokenKind::Begin
                | TokenKind::Listen
                | TokenKind::Trigger
                | TokenKind::Link
                | TokenKind::Process
                | TokenKind::Access
                | TokenKind::Sync
                | TokenKind::Evolve
                | TokenKind::Emit
        )
    }
}

bitflags! {
    /// Layout facts about the trivia preceding a token.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenFlags: u8 {
        /// Spaces or tabs preceded this token.
        const SPACE_BEFORE = 1 << 0;
        /// A newline preceded this token.
        const NEWLINE_BEFORE = 1 << 1;
        /// A `--` comment preceded this token.
        const COMMENT_BEFORE = 1 << 2;
    }
}

impl TokenFlags {
    #[inline]
    pub fn has_newline_before(self) -> bool {
        self.contains(TokenFlags::NEWLINE_BEFORE)
    }
}

/// A token with its source span and layout flags.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token {
            kind,
            span,
            flags: TokenFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Token stream produced by the lexer; always ends with `Eof`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Token> {
        self.tokens.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}
