//! Syntax tree definitions for Toboggan
//!
//! The tree is lossless with respect to tokens: parentheses, operators and
//! the `=` of an assignment all stay in the tree as leaves.

use serde::Serialize;

use crate::frontend::token::{SyntaxKind, Token, Value};
use crate::utils::Span;

/// An expression node. Owns its children exclusively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyntaxNode {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Parenthesized(ParenthesizedExpression),
    Literal(LiteralExpression),
    Name(NameExpression),
    Assignment(AssignmentExpression),
}

/// `left operator right`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpression {
    pub left: Box<SyntaxNode>,
    pub operator: Token,
    pub right: Box<SyntaxNode>,
}

/// `operator operand`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpression {
    pub operator: Token,
    pub operand: Box<SyntaxNode>,
}

/// `( expression )`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenthesizedExpression {
    pub open: Token,
    pub expression: Box<SyntaxNode>,
    pub close: Token,
}

/// A number or boolean literal. `value` mirrors the token's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralExpression {
    pub token: Token,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameExpression {
    pub name: Token,
}

/// `target = value`, where `target` is always a `SyntaxNode::Name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentExpression {
    pub target: Box<SyntaxNode>,
    pub equals: Token,
    pub value: Box<SyntaxNode>,
}

/// A borrowed child of a node: either another node or a token leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxElement<'a> {
    Node(&'a SyntaxNode),
    Token(&'a Token),
}

impl SyntaxNode {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxNode::Binary(_) => SyntaxKind::BinaryExpression,
            SyntaxNode::Unary(_) => SyntaxKind::UnaryExpression,
            SyntaxNode::Parenthesized(_) => SyntaxKind::ParenthesizedExpression,
            SyntaxNode::Literal(_) => SyntaxKind::LiteralExpression,
            SyntaxNode::Name(_) => SyntaxKind::NameExpression,
            SyntaxNode::Assignment(_) => SyntaxKind::AssignmentExpression,
        }
    }

    /// Children in source order. Never empty.
    pub fn children(&self) -> Vec<SyntaxElement<'_>> {
        use SyntaxElement as E;

        match self {
            SyntaxNode::Binary(e) => vec![E::Node(&e.left), E::Token(&e.operator), E::Node(&e.right)],
            SyntaxNode::Unary(e) => vec![E::Token(&e.operator), E::Node(&e.operand)],
            SyntaxNode::Parenthesized(e) => vec![E::Token(&e.open), E::Node(&e.expression), E::Token(&e.close)],
            SyntaxNode::Literal(e) => vec![E::Token(&e.token)],
            SyntaxNode::Name(e) => vec![E::Token(&e.name)],
            SyntaxNode::Assignment(e) => vec![E::Node(&e.target), E::Token(&e.equals), E::Node(&e.value)],
        }
    }

    /// Composite nodes print their kind name instead of a value
    pub fn display_value(&self) -> Option<String> {
        None
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxNode::Binary(e) => e.left.span().merge(&e.right.span()),
            SyntaxNode::Unary(e) => e.operator.span.merge(&e.operand.span()),
            SyntaxNode::Parenthesized(e) => e.open.span.merge(&e.close.span),
            SyntaxNode::Literal(e) => e.token.span,
            SyntaxNode::Name(e) => e.name.span,
            SyntaxNode::Assignment(e) => e.target.span().merge(&e.value.span()),
        }
    }
}

impl<'a> SyntaxElement<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(node) => node.kind(),
            SyntaxElement::Token(token) => token.kind,
        }
    }

    /// Empty for tokens
    pub fn children(&self) -> Vec<SyntaxElement<'a>> {
        match *self {
            SyntaxElement::Node(node) => node.children(),
            SyntaxElement::Token(_) => Vec::new(),
        }
    }

    pub fn display_value(&self) -> Option<String> {
        match self {
            SyntaxElement::Node(node) => node.display_value(),
            SyntaxElement::Token(token) => token.display_value(),
        }
    }
}

impl<'a> From<&'a SyntaxNode> for SyntaxElement<'a> {
    fn from(node: &'a SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}
