//! Element classification tables.
//!
//! Read-only lookup tables the tree builder and serializer consult. All
//! lookups are ASCII case-insensitive.

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// `param` is obsolete but still written by older markup.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements treated as phrasing content when pretty printing. Whitespace
/// inserted around them would change how the document renders.
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "img",
    "input", "kbd", "label", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span",
    "strong", "sub", "sup", "time", "u", "var", "wbr", "select", "textarea", "button",
];

/// [§ 13.1.2.4 Optional tags](https://html.spec.whatwg.org/multipage/syntax.html#optional-tags)
///
/// Elements whose start tag implicitly closes an open element of the same
/// name sitting at the top of the stack (`<li>One<li>Two`).
pub const AUTO_CLOSE_ELEMENTS: &[&str] = &["li", "p", "td", "th", "tr", "option", "dt", "dd"];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#raw-text-elements)
///
/// "Raw text elements: script, style"
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose text is never whitespace-collapsed by the pretty printer.
pub const PRESERVE_WHITESPACE_ELEMENTS: &[&str] = &["pre", "textarea", "title"];

fn contains(table: &[&str], tag: &str) -> bool {
    table.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Whether `tag` never has children or a closing tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    contains(VOID_ELEMENTS, tag)
}

/// Whether `tag` is inline-level for pretty printing.
#[must_use]
pub fn is_inline_element(tag: &str) -> bool {
    contains(INLINE_ELEMENTS, tag)
}

/// Whether reopening `tag` closes a same-named element at the top of the stack.
#[must_use]
pub fn is_auto_close_element(tag: &str) -> bool {
    contains(AUTO_CLOSE_ELEMENTS, tag)
}

/// Whether `tag`'s content is kept verbatim by both parser and serializer.
#[must_use]
pub fn is_raw_text_element(tag: &str) -> bool {
    contains(RAW_TEXT_ELEMENTS, tag)
}

/// Whether text inside `tag` keeps its whitespace when pretty printing.
#[must_use]
pub fn preserves_whitespace(tag: &str) -> bool {
    contains(PRESERVE_WHITESPACE_ELEMENTS, tag)
}
