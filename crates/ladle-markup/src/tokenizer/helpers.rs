//! Cursor helpers for the tokenizer.
//!
//! This module contains the small input operations every scanning routine
//! is built from:
//! - lookahead ("the next few characters are")
//! - consuming single characters, fixed strings and character runs
//! - recording recovered malformations

use ladle_common::warning::warn_once;

use super::core::{Tokenizer, TokenizerIssue};

// =============================================================================
// Lookahead
// =============================================================================

impl<'a> Tokenizer<'a> {
    /// The unconsumed rest of the input.
    pub(super) fn remaining(&self) -> &'a str {
        &self.input[self.current_pos..]
    }

    /// True once the whole input has been consumed.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.current_pos >= self.input.len()
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.current_pos
    }

    /// Peek at the codepoint `offset` characters past the cursor without
    /// consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    /// Check if the next few characters match `target` exactly.
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.remaining().starts_with(target)
    }

    /// Check if the next few characters match `target` using ASCII
    /// case-insensitive comparison.
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.remaining()
            .get(..target.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(target))
    }
}

// =============================================================================
// Consuming input
// =============================================================================

impl<'a> Tokenizer<'a> {
    /// Consume the next input character.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.remaining().chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Consume `target`. Caller must have already verified the characters
    /// are present; `target` is always ASCII.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// Consume characters while `predicate` holds and return them.
    pub(super) fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !predicate(c))
            .map_or(rest.len(), |(index, _)| index);
        self.current_pos += end;
        &rest[..end]
    }

    /// Consume up to (not including) `delimiter`, or to the end of input.
    pub(super) fn consume_until_char(&mut self, delimiter: char) -> &'a str {
        self.consume_while(|c| c != delimiter)
    }

    /// Consume a tag name: letters, digits, `:`, `-`, `_` and `.`.
    pub(super) fn consume_name(&mut self) -> &'a str {
        self.consume_while(|c| c.is_alphanumeric() || matches!(c, ':' | '-' | '_' | '.'))
    }

    pub(super) fn skip_whitespace(&mut self) {
        let _ = self.consume_while(Self::is_whitespace_char);
    }

    /// ASCII whitespace: tab, line feed, form feed, carriage return, space.
    #[must_use]
    pub const fn is_whitespace_char(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl Tokenizer<'_> {
    /// Record a recovered malformation at the cursor and report it once
    /// through the shared warning sink. Scanning always continues.
    pub(super) fn log_issue(&mut self, message: String) {
        let position = self.current_pos;
        warn_once("Tokenizer", &format!("{message} (at byte {position})"));
        self.issues.push(TokenizerIssue { message, position });
    }
}
