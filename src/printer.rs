//! Tree Printer - render syntax trees for humans and tools
//!
//! The text form prints one element per line in pre-order, four spaces of
//! indentation per level. Each line shows the element's display value, or
//! its kind name when it has none.

use crate::frontend::ast::{SyntaxElement, SyntaxNode};
use crate::frontend::token::Token;

const INDENT: &str = "    ";

/// Pretty printer for syntax trees
pub struct TreePrinter {
    output: String,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self { output: String::new() }
    }

    /// Print a tree to string
    pub fn print_tree(&mut self, root: &SyntaxNode) -> String {
        self.output.clear();
        self.print_element(root.into(), 0);
        self.output.clone()
    }

    fn print_element(&mut self, element: SyntaxElement<'_>, depth: usize) {
        let label = element
            .display_value()
            .unwrap_or_else(|| element.kind().to_string());

        self.output.push_str(&INDENT.repeat(depth));
        self.output.push_str(&label);
        self.output.push('\n');

        for child in element.children() {
            self.print_element(child, depth + 1);
        }
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function
pub fn print_tree(root: &SyntaxNode) -> String {
    TreePrinter::new().print_tree(root)
}

/// Output a tree as compact JSON (one document per line)
pub fn tree_to_json(root: &SyntaxNode) -> serde_json::Result<String> {
    serde_json::to_string(root)
}

/// One line per token: kind, byte span, display value
pub fn print_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut output = String::new();
    for token in tokens {
        let value = token.display_value().unwrap_or_default();
        let line = format!("{:<20} {:<8} {}", token.kind.to_string(), token.span.to_string(), value);
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}
