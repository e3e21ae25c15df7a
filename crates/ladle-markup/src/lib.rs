//! Lenient HTML and XML parsing for the ladle document tree.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: a single-pass scanner that turns any string into a
//!   finite token stream and never fails
//!   - start and end tags with double-quoted, single-quoted, unquoted and
//!     bare attributes
//!   - comments, doctypes, CDATA sections and processing instructions
//!   - raw-text content of `script` and `style` (HTML)
//!
//! - **Tree builder**: an explicit open-element stack that recovers a tree
//!   from unbalanced markup
//!   - implicit closing per the dialect's rules (`<li>` closes `<li>`)
//!   - unmatched end tags ignored
//!   - whitespace-only text collapsed outside whitespace-preserving elements
//!   - everything still open closed at end of input
//!
//! # Not Implemented
//!
//! - The HTML5 tree-construction algorithm (insertion modes, foster
//!   parenting, adoption agency)
//! - Character reference decoding
//! - Encoding sniffing
//! - Incremental parsing of partial input

/// Tree construction from tokens.
pub mod parser;
/// Markup tokenizer.
pub mod tokenizer;

pub use ladle_dom::{Dialect, DomTree};
pub use parser::{ParseIssue, ParserOptions, TreeBuilder, format_tree, print_tree};
pub use tokenizer::{Attribute, Token, TokenKind, Tokenizer, tokenize};

/// Parse `markup` into a tree. Never fails: malformed markup is repaired.
///
/// # Example
/// ```
/// use ladle_dom::Strainer;
/// use ladle_markup::{Dialect, parse};
///
/// let tree = parse("<ul><li>A<li>B</ul>", Dialect::Html);
/// let ul = tree.find(tree.root(), &Strainer::tag("ul")).unwrap();
/// assert_eq!(tree.children(ul).len(), 2);
/// ```
#[must_use]
pub fn parse(markup: &str, dialect: Dialect) -> DomTree {
    parse_with_issues(markup, ParserOptions::new(dialect)).0
}

/// Parse `markup` and also return every recovery decision taken.
#[must_use]
pub fn parse_with_issues(markup: &str, options: ParserOptions) -> (DomTree, Vec<ParseIssue>) {
    let tokenizer = Tokenizer::new(markup, options.dialect);
    TreeBuilder::new(options).run_with_issues(tokenizer)
}
