use ladle_dom::Dialect;

use super::token::{Attribute, Token, TokenKind};

/// A recovered malformation noticed while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerIssue {
    /// What was wrong.
    pub message: String,
    /// Byte offset into the input where it was noticed.
    pub position: usize,
}

/// Lenient single-pass markup scanner.
///
/// The tokenizer never fails. Unterminated comments, doctypes, CDATA
/// sections and processing instructions run to the end of input, a tag with
/// no closing `>` ends at the end of input, and a `<` that cannot start
/// markup is plain text. Every token stream ends with one
/// [`Token::EndOfFile`], after which the iterator is exhausted.
///
/// In HTML the content of `script` and `style` is raw text: it is returned
/// as a single [`Token::Text`] up to the matching end tag.
pub struct Tokenizer<'a> {
    pub(super) input: &'a str,
    pub(super) current_pos: usize,
    pub(super) dialect: Dialect,
    /// Set after a raw-text start tag; holds the name whose end tag ends it.
    pub(super) raw_text_end: Option<String>,
    pub(super) issues: Vec<TokenizerIssue>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input` using `dialect`'s rules.
    #[must_use]
    pub const fn new(input: &'a str, dialect: Dialect) -> Self {
        Self {
            input,
            current_pos: 0,
            dialect,
            raw_text_end: None,
            issues: Vec::new(),
            finished: false,
        }
    }

    /// Drain every remaining token, `EndOfFile` included.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.collect()
    }

    /// Issues recorded since the last call.
    pub fn take_issues(&mut self) -> Vec<TokenizerIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Issues recorded so far and not yet taken.
    #[must_use]
    pub fn issues(&self) -> &[TokenizerIssue] {
        &self.issues
    }

    /// Scan from the cursor. `None` means input was consumed without
    /// producing a token (a nameless end tag); the caller tries again.
    fn step(&mut self) -> Option<Token> {
        if let Some(name) = self.raw_text_end.take()
            && let Some(text) = self.consume_raw_text(&name)
        {
            return Some(text);
        }

        if self.at_end() {
            return Some(Token::EndOfFile);
        }

        if self.peek_codepoint(0) != Some('<') {
            let text = self.consume_until_char('<');
            return Some(Token::text(text));
        }

        if self.next_few_characters_are("<!--") {
            self.consume_string("<!--");
            let data = self.consume_delimited("-->", TokenKind::Comment);
            return Some(Token::Comment { data });
        }
        if self.next_few_characters_are("<![CDATA[") {
            self.consume_string("<![CDATA[");
            let data = self.consume_delimited("]]>", TokenKind::CData);
            return Some(Token::CData { data });
        }
        if self.next_few_characters_are("<!") {
            self.consume_string("<!");
            if self.next_few_characters_are_case_insensitive("DOCTYPE") {
                self.consume_string("DOCTYPE");
                let data = self.consume_delimited(">", TokenKind::Doctype);
                return Some(Token::Doctype {
                    data: data.trim_start().to_string(),
                });
            }
            // Any other declaration is kept as a comment.
            let data = self.consume_delimited(">", TokenKind::Comment);
            return Some(Token::Comment { data });
        }
        if self.next_few_characters_are("<?") {
            self.consume_string("<?");
            let data = self.consume_delimited("?>", TokenKind::ProcessingInstruction);
            return Some(Token::ProcessingInstruction { data });
        }
        if self.next_few_characters_are("</") {
            self.consume_string("</");
            return self.consume_end_tag();
        }
        if self.peek_codepoint(1).is_some_and(char::is_alphabetic) {
            self.consume_string("<");
            return Some(self.consume_start_tag());
        }

        self.consume_string("<");
        Some(Token::text("<"))
    }

    /// Everything up to `delimiter`, which is consumed too. Without a
    /// delimiter the rest of the input is taken.
    fn consume_delimited(&mut self, delimiter: &str, kind: TokenKind) -> String {
        let rest = self.remaining();
        if let Some(end) = rest.find(delimiter) {
            self.current_pos += end + delimiter.len();
            rest[..end].to_string()
        } else {
            self.log_issue(format!("unterminated {kind} runs to end of input"));
            self.current_pos = self.input.len();
            rest.to_string()
        }
    }

    /// Cursor is just past `</`.
    fn consume_end_tag(&mut self) -> Option<Token> {
        let name = self.consume_name();
        let rest = self.remaining();
        if let Some(end) = rest.find('>') {
            if !rest[..end].trim().is_empty() {
                self.log_issue(format!("junk after end tag name `{name}` ignored"));
            }
            self.current_pos += end + 1;
        } else {
            self.log_issue(format!("end tag `{name}` missing `>`"));
            self.current_pos = self.input.len();
        }

        if name.is_empty() {
            self.log_issue("end tag without a name ignored".to_string());
            return None;
        }
        Some(Token::EndTag {
            name: self.normalize_tag_name(name),
        })
    }

    /// Cursor is just past `<` and at a letter.
    fn consume_start_tag(&mut self) -> Token {
        let raw_name = self.consume_name();
        let name = self.normalize_tag_name(raw_name);
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut explicit_self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek_codepoint(0) {
                None => {
                    self.log_issue(format!("tag `{name}` missing `>`"));
                    break;
                }
                Some('>') => {
                    self.consume_string(">");
                    break;
                }
                Some('/') => {
                    self.consume_string("/");
                    if self.peek_codepoint(0) == Some('>') {
                        self.consume_string(">");
                        explicit_self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let attribute = self.consume_attribute();
                    if attributes.iter().any(|attr| attr.name == attribute.name) {
                        self.log_issue(format!(
                            "duplicate attribute `{}` on `{name}` dropped",
                            attribute.name
                        ));
                    } else {
                        attributes.push(attribute);
                    }
                }
            }
        }

        let policy = self.dialect.policy();
        let self_closing =
            explicit_self_closing || (!self.dialect.is_xml() && policy.is_void(&name));
        if !self_closing && policy.is_raw_text(&name) {
            self.raw_text_end = Some(name.clone());
        }
        Token::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    /// Cursor is at the first character of an attribute name.
    fn consume_attribute(&mut self) -> Attribute {
        let mut name = String::new();
        if let Some(first) = self.consume() {
            name.push(first);
        }
        name.push_str(self.consume_while(|c| {
            !(Self::is_whitespace_char(c) || matches!(c, '=' | '>' | '/'))
        }));
        let name = name.to_ascii_lowercase();

        let checkpoint = self.current_pos;
        self.skip_whitespace();
        if self.peek_codepoint(0) != Some('=') {
            // Bare attribute: whatever follows belongs to the next one.
            self.current_pos = checkpoint;
            return Attribute::new(name, String::new());
        }
        self.consume_string("=");
        self.skip_whitespace();

        let value = match self.peek_codepoint(0) {
            Some(quote @ ('"' | '\'')) => {
                self.consume_string(if quote == '"' { "\"" } else { "'" });
                let value = self.consume_until_char(quote);
                if self.consume().is_none() {
                    self.log_issue(format!("unterminated value for attribute `{name}`"));
                }
                value
            }
            _ => self.consume_while(|c| !(Self::is_whitespace_char(c) || c == '>')),
        };
        Attribute::new(name, value.to_string())
    }

    /// Text of a raw-text element up to its end tag. Returns `None` when the
    /// end tag follows immediately, leaving the cursor on it.
    fn consume_raw_text(&mut self, name: &str) -> Option<Token> {
        let rest = self.remaining();
        let end = rest
            .match_indices("</")
            .map(|(index, _)| index)
            .find(|&index| Self::closes_raw_text(&rest[index + 2..], name));
        let end = end.unwrap_or_else(|| {
            self.log_issue(format!("unterminated `{name}` runs to end of input"));
            rest.len()
        });
        if end == 0 {
            return None;
        }
        self.current_pos += end;
        Some(Token::text(&rest[..end]))
    }

    fn closes_raw_text(after_slash: &str, name: &str) -> bool {
        after_slash
            .get(..name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            && after_slash[name.len()..]
                .chars()
                .next()
                .is_none_or(|c| Self::is_whitespace_char(c) || matches!(c, '>' | '/'))
    }

    fn normalize_tag_name(&self, name: &str) -> String {
        if self.dialect.is_xml() {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            if let Some(token) = self.step() {
                self.finished = token.is_eof();
                return Some(token);
            }
        }
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

/// Tokenize all of `input` at once.
#[must_use]
pub fn tokenize(input: &str, dialect: Dialect) -> Vec<Token> {
    Tokenizer::new(input, dialect).into_tokens()
}
