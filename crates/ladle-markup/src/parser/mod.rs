//! Tree construction from a token stream.

/// Stack-driven tree builder with dialect-aware recovery.
pub mod builder;

pub use builder::{ParseIssue, ParserOptions, TreeBuilder, format_tree, print_tree};
