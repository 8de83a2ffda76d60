//! Token definitions for Toboggan

use serde::Serialize;
use std::fmt;

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
    /// Raw source text. Only numbers, identifiers, keywords and invalid
    /// characters carry it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub value: Value,
}

impl Token {
    /// Token with no raw text or decoded value
    pub fn new(kind: SyntaxKind, span: Span) -> Self {
        Self { kind, span, text: None, value: Value::None }
    }

    /// Token carrying its raw text and decoded value
    pub fn with_text(kind: SyntaxKind, span: Span, text: String, value: Value) -> Self {
        Self { kind, span, text: Some(text), value }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(SyntaxKind::EndOfFile, Span::empty(offset))
    }

    /// What the tree printer shows for this token: the decoded value, the
    /// raw text, or the fixed spelling of punctuation, in that order.
    pub fn display_value(&self) -> Option<String> {
        self.value
            .display()
            .or_else(|| self.text.clone())
            .or_else(|| self.kind.spelling().map(str::to_string))
    }
}

/// Decoded payload of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    None,
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn display(&self) -> Option<String> {
        match self {
            Value::None => None,
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

/// Every kind of token and tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyntaxKind {
    // ============ Trivia / Sentinels ============
    EndOfFile,
    Whitespace,
    Invalid,

    // ============ Literals / Names ============
    Number,
    Identifier,
    TrueKeyword,
    FalseKeyword,

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// !
    Bang,
    /// =
    Equals,
    /// ==
    EqualsEquals,
    /// !=
    BangEquals,
    /// &&
    AmpersandAmpersand,
    /// ||
    PipePipe,
    /// (
    OpenParen,
    /// )
    CloseParen,

    // ============ Tree Nodes ============
    BinaryExpression,
    UnaryExpression,
    ParenthesizedExpression,
    LiteralExpression,
    NameExpression,
    AssignmentExpression,
}

impl SyntaxKind {
    /// Get keyword kind from string
    pub fn keyword_from_str(s: &str) -> Option<SyntaxKind> {
        match s {
            "true" => Some(SyntaxKind::TrueKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            _ => None,
        }
    }

    /// Fixed source spelling for operators and punctuation
    pub fn spelling(&self) -> Option<&'static str> {
        match self {
            SyntaxKind::Plus => Some("+"),
            SyntaxKind::Minus => Some("-"),
            SyntaxKind::Star => Some("*"),
            SyntaxKind::Slash => Some("/"),
            SyntaxKind::Bang => Some("!"),
            SyntaxKind::Equals => Some("="),
            SyntaxKind::EqualsEquals => Some("=="),
            SyntaxKind::BangEquals => Some("!="),
            SyntaxKind::AmpersandAmpersand => Some("&&"),
            SyntaxKind::PipePipe => Some("||"),
            SyntaxKind::OpenParen => Some("("),
            SyntaxKind::CloseParen => Some(")"),
            _ => None,
        }
    }

    /// Precedence as a prefix operator.
    /// Returns None if the kind cannot start a unary expression
    pub fn unary_precedence(&self) -> Option<u8> {
        match self {
            SyntaxKind::Plus | SyntaxKind::Minus => Some(6),
            _ => None,
        }
    }

    /// Precedence as an infix operator (higher binds tighter).
    /// Returns None if not a binary operator
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            // Multiplicative
            SyntaxKind::Star | SyntaxKind::Slash => Some(5),

            // Additive
            SyntaxKind::Plus | SyntaxKind::Minus => Some(4),

            // Equality
            SyntaxKind::EqualsEquals | SyntaxKind::BangEquals => Some(3),

            // Logical AND
            SyntaxKind::AmpersandAmpersand => Some(2),

            // Logical OR (lowest)
            SyntaxKind::PipePipe => Some(1),

            _ => None,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
