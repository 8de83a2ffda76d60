//! Error handling for Toboggan

use crate::frontend::token::SyntaxKind;
use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Parse error for a single line of input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A character (or undecodable digit run) the lexer could not classify
    /// survived into the token stream.
    #[error("Invalid token {text:?}")]
    InvalidToken { text: String, span: Span },

    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: SyntaxKind,
        got: SyntaxKind,
        span: Span,
    },

    /// Strict mode only: the expression ended before the input did.
    #[error("Unexpected trailing token {got}")]
    TrailingToken { got: SyntaxKind, span: Span },

    #[error("Expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize, span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidToken { span, .. } => *span,
            Self::UnexpectedToken { span, .. } => *span,
            Self::TrailingToken { span, .. } => *span,
            Self::NestingTooDeep { span, .. } => *span,
        }
    }
}
