//! Attribute scanning for start tags.
//!
//! [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
//!
//! A single left-to-right pass over the text between the tag name and the
//! closing `>`. Unlike the WHATWG tokenizer states this scanner is lenient
//! about framework syntax: names may contain `@`, `:` and `.`
//! (`@click.prevent`, `:class`), and a backslash inside a quoted value
//! escapes the next character without being removed.

use indexmap::{IndexMap, IndexSet};

use crate::entities::decode_entities;

/// Attributes collected from one start tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedAttributes {
    /// Attribute values in first-seen order. Boolean attributes map to "".
    pub attributes: IndexMap<String, String>,
    /// Names that were written without `=value`.
    pub boolean_attributes: IndexSet<String>,
}

impl ScannedAttributes {
    /// Record a name/value pair. A repeated name keeps its first position and
    /// takes the last value.
    fn insert(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            let _ = self.attributes.insert(name.to_string(), value);
            let _ = self.boolean_attributes.shift_remove(name);
        } else {
            let _ = self.attributes.insert(name.to_string(), String::new());
            let _ = self.boolean_attributes.insert(name.to_string());
        }
    }
}

/// Characters allowed in an attribute name.
const fn is_attribute_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'@' | b'_' | b'.' | b':' | b'-')
}

/// Scan the attribute text of a start tag.
///
/// Malformed fragments (a stray `=` or `/`, unbalanced quotes) are skipped one
/// character at a time, so the scan always terminates.
#[must_use]
pub fn scan_attributes(raw: &str) -> ScannedAttributes {
    let bytes = raw.as_bytes();
    let mut scanned = ScannedAttributes::default();
    let mut pos = 0;

    while pos < bytes.len() {
        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && is_attribute_name_byte(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // Not a name: step over one whole character.
            pos += raw[pos..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        let name = &raw[name_start..pos];

        let after_name = skip_whitespace(bytes, pos);
        if bytes.get(after_name) != Some(&b'=') {
            scanned.insert(name, None);
            continue;
        }

        let value_start = skip_whitespace(bytes, after_name + 1);
        let (value, next) = scan_value(raw, value_start);
        scanned.insert(name, Some(decode_entities(value)));
        pos = next;
    }

    scanned
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Scan one attribute value starting at `start`.
///
/// Returns the raw (still entity-encoded) value and the position after it.
fn scan_value(raw: &str, start: usize) -> (&str, usize) {
    let bytes = raw.as_bytes();
    match bytes.get(start) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let mut pos = start + 1;
            while pos < bytes.len() && bytes[pos] != quote {
                // The escaped character is kept along with the backslash.
                pos += if bytes[pos] == b'\\' { 2 } else { 1 };
            }
            let end = pos.min(bytes.len());
            // Continuation bytes are never ASCII, so `end` is a char boundary.
            (&raw[start + 1..end], (end + 1).min(bytes.len()))
        }
        Some(_) => {
            let mut pos = start;
            while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                pos += 1;
            }
            (&raw[start..pos], pos)
        }
        None => ("", start),
    }
}
