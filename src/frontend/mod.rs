//! Frontend module - Lexer, Parser, Syntax Tree

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;

use crate::utils::Result;
use ast::SyntaxNode;
use parser::{ParseOptions, Parser};

/// Lex and parse one line of source into a syntax tree
pub fn parse_line(source: &str, options: ParseOptions) -> Result<SyntaxNode> {
    Parser::with_options(source, options)?.parse()
}
