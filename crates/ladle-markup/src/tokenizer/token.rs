use core::fmt;

use strum_macros::Display;

/// An attribute on a start tag token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name.
    pub name: String,
    /// Raw value; empty when the attribute had no `=`.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// A unit of markup produced by the [`Tokenizer`](super::Tokenizer).
///
/// Every token stream ends with exactly one [`Token::EndOfFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attr=value ...>` or `<name ... />`.
    StartTag {
        /// Tag name (lower-cased in HTML).
        name: String,
        /// Attributes in source order, duplicates dropped.
        attributes: Vec<Attribute>,
        /// Explicit `/>`, or an HTML void element.
        self_closing: bool,
    },

    /// `</name>`.
    EndTag {
        /// Tag name (lower-cased in HTML).
        name: String,
    },

    /// Character data between tags, exactly as written.
    Text {
        /// The characters.
        data: String,
    },

    /// `<!--data-->`, or a bogus `<!data>` declaration.
    Comment {
        /// Everything between the delimiters.
        data: String,
    },

    /// `<!DOCTYPE data>`.
    Doctype {
        /// Everything after the keyword, leading whitespace removed.
        data: String,
    },

    /// `<![CDATA[data]]>`.
    CData {
        /// Everything between the delimiters.
        data: String,
    },

    /// `<?data?>`.
    ProcessingInstruction {
        /// Everything between the delimiters.
        data: String,
    },

    /// End of input.
    EndOfFile,
}

/// The variant of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    /// [`Token::StartTag`]
    StartTag,
    /// [`Token::EndTag`]
    EndTag,
    /// [`Token::Text`]
    Text,
    /// [`Token::Comment`]
    Comment,
    /// [`Token::Doctype`]
    Doctype,
    /// [`Token::CData`]
    #[strum(serialize = "cdata")]
    CData,
    /// [`Token::ProcessingInstruction`]
    ProcessingInstruction,
    /// [`Token::EndOfFile`]
    EndOfFile,
}

impl Token {
    /// Create a text token.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    /// Create a start tag token with no attributes.
    #[must_use]
    pub fn start_tag(name: impl Into<String>, self_closing: bool) -> Self {
        Self::StartTag {
            name: name.into(),
            attributes: Vec::new(),
            self_closing,
        }
    }

    /// Create an end tag token.
    #[must_use]
    pub fn end_tag(name: impl Into<String>) -> Self {
        Self::EndTag { name: name.into() }
    }

    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::StartTag { .. } => TokenKind::StartTag,
            Self::EndTag { .. } => TokenKind::EndTag,
            Self::Text { .. } => TokenKind::Text,
            Self::Comment { .. } => TokenKind::Comment,
            Self::Doctype { .. } => TokenKind::Doctype,
            Self::CData { .. } => TokenKind::CData,
            Self::ProcessingInstruction { .. } => TokenKind::ProcessingInstruction,
            Self::EndOfFile => TokenKind::EndOfFile,
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// Value of a start tag's attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Text { data } => {
                // Show whitespace explicitly
                write!(f, "Text({})", data.replace('\n', "\\n").replace('\t', "\\t"))
            }
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Doctype { data } => write!(f, "<!DOCTYPE {data}>"),
            Self::CData { data } => write!(f, "<![CDATA[{data}]]>"),
            Self::ProcessingInstruction { data } => write!(f, "<?{data}?>"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}
