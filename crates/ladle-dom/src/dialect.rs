//! Markup dialect rule tables.
//!
//! A [`Dialect`] selects one of two static [`DialectPolicy`] tables. The
//! tables are process-wide constants; nothing here is mutable.

use strum_macros::{Display, EnumString};

/// Which rule set governs tokenizing, tree building and serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dialect {
    /// Lenient HTML: void elements, implicit closing, whitespace-preserving
    /// elements and raw-text elements.
    #[default]
    Html,
    /// XML: every table is empty and any element may self-close with `/>`.
    Xml,
}

impl Dialect {
    /// The static rule tables for this dialect.
    #[must_use]
    pub const fn policy(self) -> &'static DialectPolicy {
        match self {
            Self::Html => &HTML_POLICY,
            Self::Xml => &XML_POLICY,
        }
    }

    /// Returns true for the XML dialect.
    #[must_use]
    pub const fn is_xml(self) -> bool {
        matches!(self, Self::Xml)
    }
}

/// Rule tables consulted by the tokenizer, the tree builder and the
/// serializer. All lookups are ASCII case-insensitive.
#[derive(Debug)]
pub struct DialectPolicy {
    void_elements: &'static [&'static str],
    whitespace_preserving: &'static [&'static str],
    raw_text_elements: &'static [&'static str],
    /// `(tag, attributes)`; the tag `*` applies to every element.
    list_attributes: &'static [(&'static str, &'static [&'static str])],
    /// `(opening tag, open tags it closes)`.
    implicit_close: &'static [(&'static str, &'static [&'static str])],
}

const CLOSES_P: &[&str] = &["p"];
const CLOSES_DEFINITION: &[&str] = &["dt", "dd"];
const CLOSES_CELL: &[&str] = &["td", "th"];
const CLOSES_ROW: &[&str] = &["tr", "td", "th"];
const CLOSES_SECTION: &[&str] = &["thead", "tbody", "tfoot", "tr", "td", "th"];
const CLOSES_RUBY: &[&str] = &["rp", "rt"];

/// HTML rules.
pub static HTML_POLICY: DialectPolicy = DialectPolicy {
    void_elements: &[
        "area", "base", "basefont", "bgsound", "br", "col", "command", "embed", "frame", "hr",
        "image", "img", "input", "isindex", "keygen", "link", "menuitem", "meta", "nextid",
        "param", "source", "spacer", "track", "wbr",
    ],
    whitespace_preserving: &["pre", "textarea", "listing", "script", "style"],
    raw_text_elements: &["script", "style"],
    list_attributes: &[
        ("*", &["class", "accesskey", "dropzone"]),
        ("a", &["rel", "rev"]),
        ("link", &["rel", "rev"]),
        ("td", &["headers"]),
        ("th", &["headers"]),
        ("form", &["accept-charset"]),
        ("object", &["archive"]),
        ("icon", &["sizes"]),
        ("iframe", &["sandbox"]),
        ("output", &["for"]),
    ],
    implicit_close: &[
        ("p", CLOSES_P),
        ("li", &["li"]),
        ("dt", CLOSES_DEFINITION),
        ("dd", CLOSES_DEFINITION),
        ("tr", CLOSES_ROW),
        ("td", CLOSES_CELL),
        ("th", CLOSES_CELL),
        ("thead", CLOSES_SECTION),
        ("tbody", CLOSES_SECTION),
        ("tfoot", CLOSES_SECTION),
        ("option", &["option"]),
        ("optgroup", &["option", "optgroup"]),
        ("rp", CLOSES_RUBY),
        ("rt", CLOSES_RUBY),
        ("address", CLOSES_P),
        ("article", CLOSES_P),
        ("aside", CLOSES_P),
        ("blockquote", CLOSES_P),
        ("div", CLOSES_P),
        ("dl", CLOSES_P),
        ("fieldset", CLOSES_P),
        ("footer", CLOSES_P),
        ("form", CLOSES_P),
        ("h1", CLOSES_P),
        ("h2", CLOSES_P),
        ("h3", CLOSES_P),
        ("h4", CLOSES_P),
        ("h5", CLOSES_P),
        ("h6", CLOSES_P),
        ("header", CLOSES_P),
        ("hr", CLOSES_P),
        ("menu", CLOSES_P),
        ("nav", CLOSES_P),
        ("ol", CLOSES_P),
        ("pre", CLOSES_P),
        ("section", CLOSES_P),
        ("table", CLOSES_P),
        ("ul", CLOSES_P),
    ],
};

/// XML rules: nothing is void, nothing closes implicitly.
pub static XML_POLICY: DialectPolicy = DialectPolicy {
    void_elements: &[],
    whitespace_preserving: &[],
    raw_text_elements: &[],
    list_attributes: &[],
    implicit_close: &[],
};

fn contains(table: &[&str], name: &str) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

impl DialectPolicy {
    /// Void elements never have children and need no end tag.
    #[must_use]
    pub fn is_void(&self, name: &str) -> bool {
        contains(self.void_elements, name)
    }

    /// Whitespace-only text inside these elements is kept verbatim, and the
    /// pretty printer never re-indents their contents.
    #[must_use]
    pub fn preserves_whitespace(&self, name: &str) -> bool {
        contains(self.whitespace_preserving, name)
    }

    /// Elements whose content is scanned as plain text up to the matching
    /// end tag.
    #[must_use]
    pub fn is_raw_text(&self, name: &str) -> bool {
        contains(self.raw_text_elements, name)
    }

    /// Attributes of `tag` whose value is a space-separated token list.
    #[must_use]
    pub fn list_attributes(&self, tag: &str) -> Vec<&'static str> {
        self.list_attributes
            .iter()
            .filter(|(owner, _)| *owner == "*" || owner.eq_ignore_ascii_case(tag))
            .flat_map(|(_, attrs)| attrs.iter().copied())
            .collect()
    }

    /// Check whether `attribute` on `tag` holds a token list.
    #[must_use]
    pub fn is_list_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.list_attributes
            .iter()
            .filter(|(owner, _)| *owner == "*" || owner.eq_ignore_ascii_case(tag))
            .any(|(_, attrs)| contains(attrs, attribute))
    }

    /// Names of open elements that opening `name` closes first.
    #[must_use]
    pub fn implicit_close(&self, name: &str) -> &'static [&'static str] {
        self.implicit_close
            .iter()
            .find(|(opener, _)| opener.eq_ignore_ascii_case(name))
            .map(|&(_, closes)| closes)
            .unwrap_or_default()
    }

    /// Check whether opening `opening` closes an open `open` element.
    #[must_use]
    pub fn closes_implicitly(&self, opening: &str, open: &str) -> bool {
        contains(self.implicit_close(opening), open)
    }
}
