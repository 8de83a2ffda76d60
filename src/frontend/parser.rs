//! Parser for Toboggan
//!
//! Recursive descent parser with precedence climbing for operators.
//!
//! Grammar, loosest to tightest:
//!
//! ```text
//! expression := IDENT '=' expression
//!             | unary_op expression        (operand parsed at the unary precedence)
//!             | primary (binary_op expression)*
//! primary    := '(' expression ')' | 'true' | 'false' | IDENT | NUMBER
//! ```
//!
//! Trees are capped at `MAX_NESTING` levels. Printing, serializing and
//! dropping a tree recurse once per level, so the cap bounds them too.

use crate::frontend::ast::*;
use crate::frontend::lexer::Lexer;
use crate::frontend::token::{SyntaxKind, Token};
use crate::utils::{Error, Result, Span};

/// Deepest tree the parser will build, counting leaves as one level
pub const MAX_NESTING: usize = 128;

/// Knobs for a single parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Ignore tokens left over after the root expression instead of
    /// rejecting them.
    pub allow_trailing_tokens: bool,
}

/// The parser
pub struct Parser {
    /// Whitespace-free token stream, always terminated by `EndOfFile`
    tokens: Vec<Token>,
    pos: usize,
    options: ParseOptions,
    /// Open `parse_expression` calls
    depth: usize,
}

impl Parser {
    /// Tokenize `source` with default options
    #[allow(dead_code)]
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, ParseOptions::default())
    }

    /// Tokenize `source`, dropping whitespace. Fails on the first invalid
    /// token.
    pub fn with_options(source: &str, options: ParseOptions) -> Result<Self> {
        let mut tokens = Vec::new();
        for token in Lexer::new(source).tokenize() {
            match token.kind {
                SyntaxKind::Whitespace => continue,
                SyntaxKind::Invalid => {
                    return Err(Error::InvalidToken {
                        text: token.text.unwrap_or_default(),
                        span: token.span,
                    });
                }
                _ => tokens.push(token),
            }
        }
        log::debug!("parser primed with {} tokens", tokens.len());

        Ok(Self { tokens, pos: 0, options, depth: 0 })
    }

    // ==================== Helper Methods ====================

    /// Token at `pos + offset`, clamped to the trailing `EndOfFile`
    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: SyntaxKind) -> Result<Token> {
        if self.current_kind() == expected {
            Ok(self.advance())
        } else {
            Err(Error::UnexpectedToken {
                expected,
                got: self.current_kind(),
                span: self.current().span,
            })
        }
    }

    fn too_deep(&self, span: Span) -> Error {
        Error::NestingTooDeep { limit: MAX_NESTING, span }
    }

    /// Height of a node whose tallest child is `child_height` high
    fn nest(&self, child_height: usize, span: Span) -> Result<usize> {
        if child_height >= MAX_NESTING {
            return Err(self.too_deep(span));
        }
        Ok(child_height + 1)
    }

    // ==================== Parsing Methods ====================

    /// Parse the whole line into one expression tree
    pub fn parse(&mut self) -> Result<SyntaxNode> {
        let (root, height) = self.parse_expression(0)?;
        log::debug!("parsed {} levels deep", height);

        if !self.options.allow_trailing_tokens && self.current_kind() != SyntaxKind::EndOfFile {
            return Err(Error::TrailingToken {
                got: self.current_kind(),
                span: self.current().span,
            });
        }

        Ok(root)
    }

    /// Parse an expression whose operators all bind tighter than
    /// `min_precedence`. Returns the subtree and its height.
    fn parse_expression(&mut self, min_precedence: u8) -> Result<(SyntaxNode, usize)> {
        if self.depth == MAX_NESTING {
            return Err(self.too_deep(self.current().span));
        }

        self.depth += 1;
        let result = self.parse_operators(min_precedence);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, min_precedence: u8) -> Result<(SyntaxNode, usize)> {
        if self.current_kind() == SyntaxKind::Identifier && self.peek(1).kind == SyntaxKind::Equals {
            return self.parse_assignment();
        }

        let (mut left, mut height) = match self.current_kind().unary_precedence() {
            Some(precedence) if precedence >= min_precedence => {
                let operator = self.advance();
                let (operand, operand_height) = self.parse_expression(precedence)?;
                let height = self.nest(operand_height, operator.span)?;
                let node = SyntaxNode::Unary(UnaryExpression {
                    operator,
                    operand: Box::new(operand),
                });
                (node, height)
            }
            _ => self.parse_primary()?,
        };

        loop {
            let Some(precedence) = self.current_kind().binary_precedence() else {
                break;
            };

            // Equal precedence is left to the caller, which makes the
            // operators left-associative
            if precedence <= min_precedence {
                break;
            }

            let operator = self.advance();
            let (right, right_height) = self.parse_expression(precedence)?;
            height = self.nest(height.max(right_height), operator.span)?;
            left = SyntaxNode::Binary(BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok((left, height))
    }

    /// `name = expression`, right-associative and looser than any operator
    fn parse_assignment(&mut self) -> Result<(SyntaxNode, usize)> {
        let (target, target_height) = self.parse_primary()?;
        let equals = self.expect(SyntaxKind::Equals)?;
        let (value, value_height) = self.parse_expression(0)?;
        let height = self.nest(target_height.max(value_height), equals.span)?;

        let node = SyntaxNode::Assignment(AssignmentExpression {
            target: Box::new(target),
            equals,
            value: Box::new(value),
        });
        Ok((node, height))
    }

    fn parse_primary(&mut self) -> Result<(SyntaxNode, usize)> {
        match self.current_kind() {
            SyntaxKind::OpenParen => {
                let open = self.advance();
                let (expression, inner_height) = self.parse_expression(0)?;
                let close = self.expect(SyntaxKind::CloseParen)?;
                let height = self.nest(inner_height, open.span)?;
                let node = SyntaxNode::Parenthesized(ParenthesizedExpression {
                    open,
                    expression: Box::new(expression),
                    close,
                });
                Ok((node, height))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let token = self.advance();
                let node = SyntaxNode::Literal(LiteralExpression {
                    value: token.value.clone(),
                    token,
                });
                Ok((node, 1))
            }
            SyntaxKind::Identifier => Ok((SyntaxNode::Name(NameExpression { name: self.advance() }), 1)),
            _ => {
                let token = self.expect(SyntaxKind::Number)?;
                let node = SyntaxNode::Literal(LiteralExpression {
                    value: token.value.clone(),
                    token,
                });
                Ok((node, 1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::token::Value;

    fn parse(source: &str) -> Result<SyntaxNode> {
        Parser::new(source)?.parse()
    }

    fn parse_lenient(source: &str) -> Result<SyntaxNode> {
        Parser::with_options(source, ParseOptions { allow_trailing_tokens: true })?.parse()
    }

    /// Fully parenthesized rendering, for checking tree shape at a glance
    fn shape(node: &SyntaxNode) -> String {
        match node {
            SyntaxNode::Binary(e) => format!(
                "({} {} {})",
                shape(&e.left),
                e.operator.display_value().unwrap_or_default(),
                shape(&e.right)
            ),
            SyntaxNode::Unary(e) => {
                format!("({}{})", e.operator.display_value().unwrap_or_default(), shape(&e.operand))
            }
            SyntaxNode::Parenthesized(e) => format!("[{}]", shape(&e.expression)),
            SyntaxNode::Literal(e) => e.value.display().unwrap_or_default(),
            SyntaxNode::Name(e) => e.name.display_value().unwrap_or_default(),
            SyntaxNode::Assignment(e) => format!("{{{} = {}}}", shape(&e.target), shape(&e.value)),
        }
    }

    fn parse_shape(source: &str) -> String {
        shape(&parse(source).unwrap())
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let root = parse("1 + 2 * 3").unwrap();

        let SyntaxNode::Binary(binary) = &root else {
            panic!("Expected binary root, got {:?}", root.kind());
        };
        assert_eq!(binary.operator.kind, SyntaxKind::Plus);
        assert_eq!(binary.right.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(shape(&root), "(1 + (2 * 3))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_shape("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(parse_shape("8 / 4 / 2"), "((8 / 4) / 2)");
        assert_eq!(parse_shape("a || b || c"), "((a || b) || c)");
    }

    #[test]
    fn test_precedence_ladder() {
        assert_eq!(
            parse_shape("a || b && c == d + e * f"),
            "(a || (b && (c == (d + (e * f)))))"
        );
        assert_eq!(parse_shape("1 * 2 + 3 != 4"), "(((1 * 2) + 3) != 4)");
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        assert_eq!(parse_shape("-1 + 2"), "((-1) + 2)");
        assert_eq!(parse_shape("2 * -3"), "(2 * (-3))");
        assert_eq!(parse_shape("- -1"), "(-(-1))");
        assert_eq!(parse_shape("+x"), "(+x)");
    }

    #[test]
    fn test_parentheses_are_kept() {
        let root = parse("(1 + 2)").unwrap();

        let SyntaxNode::Parenthesized(paren) = &root else {
            panic!("Expected parenthesized root, got {:?}", root.kind());
        };
        assert_eq!(paren.open.kind, SyntaxKind::OpenParen);
        assert_eq!(paren.close.kind, SyntaxKind::CloseParen);
        assert_eq!(paren.expression.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(root.span(), Span::new(0, 7));

        assert_eq!(parse_shape("(1 + 2) * 3"), "([(1 + 2)] * 3)");
    }

    #[test]
    fn test_assignment_takes_whole_right_side() {
        let root = parse("x = 1 + 2").unwrap();

        let SyntaxNode::Assignment(assign) = &root else {
            panic!("Expected assignment root, got {:?}", root.kind());
        };
        assert_eq!(assign.target.kind(), SyntaxKind::NameExpression);
        assert_eq!(assign.equals.kind, SyntaxKind::Equals);
        assert_eq!(assign.value.kind(), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_shape("x = y = 3"), "{x = {y = 3}}");
        assert_eq!(parse_shape("a = b == c"), "{a = (b == c)}");
    }

    #[test]
    fn test_literals() {
        let root = parse("true").unwrap();
        let SyntaxNode::Literal(literal) = &root else {
            panic!("Expected literal, got {:?}", root.kind());
        };
        assert_eq!(literal.value, Value::Bool(true));
        assert_eq!(literal.token.kind, SyntaxKind::TrueKeyword);

        let root = parse("  42 ").unwrap();
        let SyntaxNode::Literal(literal) = &root else {
            panic!("Expected literal, got {:?}", root.kind());
        };
        assert_eq!(literal.value, Value::Int(42));
        assert_eq!(literal.token.span, Span::new(2, 4));

        assert_eq!(parse_shape("1abc == false"), "(1abc == false)");
    }

    #[test]
    fn test_unmatched_close_paren() {
        let err = parse(")").unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedToken {
                expected: SyntaxKind::Number,
                got: SyntaxKind::CloseParen,
                span: Span::new(0, 1),
            }
        );
    }

    #[test]
    fn test_missing_close_paren() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedToken {
                expected: SyntaxKind::CloseParen,
                got: SyntaxKind::EndOfFile,
                span: Span::empty(6),
            }
        );
    }

    #[test]
    fn test_assignment_without_value() {
        let err = parse("x =").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedToken { expected: SyntaxKind::Number, got: SyntaxKind::EndOfFile, .. }
        ));
    }

    #[test]
    fn test_bang_is_not_a_prefix_operator() {
        let err = parse("!true").unwrap_err();
        assert!(matches!(err, Error::UnexpectedToken { got: SyntaxKind::Bang, .. }));
    }

    #[test]
    fn test_invalid_token_rejected_up_front() {
        let err = Parser::new("1 & 2").err().unwrap();
        assert_eq!(err, Error::InvalidToken { text: "&".to_string(), span: Span::new(2, 3) });

        let err = Parser::new("x = 99999999999999999999").err().unwrap();
        assert!(matches!(err, Error::InvalidToken { ref text, .. } if text == "99999999999999999999"));
    }

    #[test]
    fn test_empty_input() {
        for source in ["", "    "] {
            let err = parse(source).unwrap_err();
            assert!(matches!(
                err,
                Error::UnexpectedToken { expected: SyntaxKind::Number, got: SyntaxKind::EndOfFile, .. }
            ));
        }
    }

    #[test]
    fn test_trailing_tokens_rejected_by_default() {
        let err = parse("1 + 2 )").unwrap_err();
        assert_eq!(
            err,
            Error::TrailingToken { got: SyntaxKind::CloseParen, span: Span::new(6, 7) }
        );

        let err = parse("1 2").unwrap_err();
        assert!(matches!(err, Error::TrailingToken { got: SyntaxKind::Number, .. }));
    }

    #[test]
    fn test_trailing_tokens_ignored_when_lenient() {
        let root = parse_lenient("1 + 2 )").unwrap();
        assert_eq!(shape(&root), "(1 + 2)");

        // Tokens the grammar cannot continue with end the expression early
        assert_eq!(shape(&parse_lenient("a b c").unwrap()), "a");
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let source = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let err = parse(&source).unwrap_err();

        assert_eq!(
            err,
            Error::NestingTooDeep { limit: MAX_NESTING, span: Span::new(MAX_NESTING, MAX_NESTING + 1) }
        );
    }

    #[test]
    fn test_deep_chains_are_rejected() {
        let sources = [
            format!("{}1", "-".repeat(100_000)),
            format!("1{}", "-1".repeat(100_000)),
            format!("{}1", "a = ".repeat(100_000)),
            format!("1{}", " * (1".repeat(100_000)),
        ];
        for source in &sources {
            let err = parse(source).unwrap_err();
            assert!(matches!(err, Error::NestingTooDeep { limit: MAX_NESTING, .. }), "{:?}", err);
        }
    }

    #[test]
    fn test_nesting_limit_boundary() {
        // Each pair of parentheses adds one level above the literal
        let depth = MAX_NESTING - 1;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&source).is_ok());

        let source = format!("({})", source);
        assert!(matches!(parse(&source), Err(Error::NestingTooDeep { .. })));

        // A left-leaning chain of n operators is n + 1 levels deep
        let source = format!("1{}", " - 1".repeat(MAX_NESTING - 1));
        assert!(parse(&source).is_ok());
        let err = parse(&format!("{} - 1", source)).unwrap_err();
        let operator = source.len() + 1;
        assert_eq!(
            err,
            Error::NestingTooDeep { limit: MAX_NESTING, span: Span::new(operator, operator + 1) }
        );
    }
}
