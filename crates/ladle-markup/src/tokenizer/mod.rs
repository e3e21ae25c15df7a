//! Markup tokenizer module.

/// Lenient scanner turning a markup string into tokens.
pub mod core;
/// Cursor helpers shared by the scanning routines.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{Tokenizer, TokenizerIssue, tokenize};
pub use token::{Attribute, Token, TokenKind};
