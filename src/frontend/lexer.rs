//! Lexer for Toboggan
//!
//! Converts one line of source text into a stream of tokens. Classification
//! never fails: anything unrecognized comes back as a `SyntaxKind::Invalid`
//! token and is rejected later by the parser.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::frontend::token::{SyntaxKind, Token, Value};
use crate::utils::Span;

/// Unicode letter categories (L*). Combining marks are not letters.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// The lexer state
pub struct Lexer {
    source: String,
    /// Current byte position in source
    pos: usize,
    /// Start byte position of current token
    start: usize,
}

impl Lexer {
    /// Create a new lexer for the given source text
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            pos: 0,
            start: 0,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Advance past the current character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advance only if the current character is `expected`
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: SyntaxKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn current_text(&self) -> String {
        self.source[self.start..self.pos].to_string()
    }

    /// Read a digit run, plus any letters glued to it.
    ///
    /// `12ab` is an identifier, not a number followed by a name.
    fn read_number(&mut self) -> Token {
        self.eat_while(char::is_numeric);
        let digits_end = self.pos;
        self.eat_while(is_letter);

        let text = self.current_text();
        if self.pos > digits_end {
            return Token::with_text(SyntaxKind::Identifier, self.make_span(), text.clone(), Value::Text(text));
        }

        // Non-ASCII numerals and i64 overflow cannot be decoded
        match text.parse::<i64>() {
            Ok(value) => Token::with_text(SyntaxKind::Number, self.make_span(), text, Value::Int(value)),
            Err(_) => Token::with_text(SyntaxKind::Invalid, self.make_span(), text, Value::None),
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        self.eat_while(|c| is_letter(c) || c.is_numeric());

        let text = self.current_text();
        let kind = SyntaxKind::keyword_from_str(&text).unwrap_or(SyntaxKind::Identifier);
        let value = match kind {
            SyntaxKind::TrueKeyword => Value::Bool(true),
            SyntaxKind::FalseKeyword => Value::Bool(false),
            _ => Value::Text(text.clone()),
        };

        Token::with_text(kind, self.make_span(), text, value)
    }

    /// Get the next token. Returns `EndOfFile` forever once the input is
    /// exhausted.
    pub fn lex(&mut self) -> Token {
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Token::eof(self.pos);
        };

        let token = match c {
            ' ' => {
                self.eat_while(|c| c == ' ');
                let mut token = self.make_token(SyntaxKind::Whitespace);
                token.value = Value::Text(" ".to_string());
                token
            }
            '+' => self.make_token(SyntaxKind::Plus),
            '-' => self.make_token(SyntaxKind::Minus),
            '*' => self.make_token(SyntaxKind::Star),
            '/' => self.make_token(SyntaxKind::Slash),
            '(' => self.make_token(SyntaxKind::OpenParen),
            ')' => self.make_token(SyntaxKind::CloseParen),
            '!' => {
                if self.eat('=') {
                    self.make_token(SyntaxKind::BangEquals)
                } else {
                    self.make_token(SyntaxKind::Bang)
                }
            }
            '=' => {
                if self.eat('=') {
                    self.make_token(SyntaxKind::EqualsEquals)
                } else {
                    self.make_token(SyntaxKind::Equals)
                }
            }
            '&' if self.eat('&') => self.make_token(SyntaxKind::AmpersandAmpersand),
            '|' if self.eat('|') => self.make_token(SyntaxKind::PipePipe),
            c if c.is_numeric() => self.read_number(),
            c if is_letter(c) => self.read_identifier(),
            c => Token::with_text(SyntaxKind::Invalid, self.make_span(), c.to_string(), Value::None),
        };

        log::trace!("lexed {} at {}", token.kind, token.span);
        token
    }

    /// Tokenize the entire input, including the final `EndOfFile`
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.lex();
            let is_eof = token.kind == SyntaxKind::EndOfFile;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.lex();
        (token.kind != SyntaxKind::EndOfFile).then_some(token)
    }
}
