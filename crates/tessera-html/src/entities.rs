//! Character reference decoding.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The full table defines 2,231 entities; we carry the common ones plus the
//! ASCII punctuation names that show up in templated markup. Numeric
//! references (`&#38;`, `&#x26;`) are always decoded.

use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character reference table.
/// Maps entity names (without the leading '&') to their replacement strings.
/// Every name ends in `;`: a reference without one is left as written.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Most common entities (required for basic HTML)
        ("amp;", "&"),
        ("lt;", "<"),
        ("gt;", ">"),
        ("quot;", "\""),
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        // ASCII punctuation
        ("Tab;", "\t"),
        ("NewLine;", "\n"),
        ("excl;", "!"),
        ("num;", "#"),
        ("dollar;", "$"),
        ("percnt;", "%"),
        ("lpar;", "("),
        ("rpar;", ")"),
        ("ast;", "*"),
        ("plus;", "+"),
        ("comma;", ","),
        ("period;", "."),
        ("sol;", "/"),
        ("colon;", ":"),
        ("semi;", ";"),
        ("equals;", "="),
        ("quest;", "?"),
        ("commat;", "@"),
        ("lsqb;", "["),
        ("bsol;", "\\"),
        ("rsqb;", "]"),
        ("Hat;", "^"),
        ("lowbar;", "_"),
        ("grave;", "`"),
        ("lcub;", "{"),
        ("verbar;", "|"),
        ("rcub;", "}"),
        // Common punctuation and symbols
        ("copy;", "\u{00A9}"),   // ©
        ("reg;", "\u{00AE}"),    // ®
        ("trade;", "\u{2122}"),  // ™
        ("mdash;", "\u{2014}"),  // —
        ("ndash;", "\u{2013}"),  // –
        ("hellip;", "\u{2026}"), // …
        ("bull;", "\u{2022}"),   // •
        ("middot;", "\u{00B7}"), // ·
        ("lsquo;", "\u{2018}"),  // '
        ("rsquo;", "\u{2019}"),  // '
        ("sbquo;", "\u{201A}"),  // ‚
        ("ldquo;", "\u{201C}"),  // "
        ("rdquo;", "\u{201D}"),  // "
        ("bdquo;", "\u{201E}"),  // „
        ("laquo;", "\u{00AB}"),  // «
        ("raquo;", "\u{00BB}"),  // »
        ("lsaquo;", "\u{2039}"), // ‹
        ("rsaquo;", "\u{203A}"), // ›
        ("sect;", "\u{00A7}"),   // §
        ("para;", "\u{00B6}"),   // ¶
        ("dagger;", "\u{2020}"), // †
        ("Dagger;", "\u{2021}"), // ‡
        ("permil;", "\u{2030}"), // ‰
        ("iexcl;", "\u{00A1}"),  // ¡
        ("iquest;", "\u{00BF}"), // ¿
        ("shy;", "\u{00AD}"),
        ("ensp;", "\u{2002}"),
        ("emsp;", "\u{2003}"),
        ("thinsp;", "\u{2009}"),
        ("zwnj;", "\u{200C}"),
        ("zwj;", "\u{200D}"),
        ("lrm;", "\u{200E}"),
        ("rlm;", "\u{200F}"),
        // Currency
        ("cent;", "\u{00A2}"),  // ¢
        ("pound;", "\u{00A3}"), // £
        ("euro;", "\u{20AC}"),  // €
        ("yen;", "\u{00A5}"),   // ¥
        // Math symbols
        ("times;", "\u{00D7}"),  // ×
        ("divide;", "\u{00F7}"), // ÷
        ("plusmn;", "\u{00B1}"), // ±
        ("minus;", "\u{2212}"),  // −
        ("ne;", "\u{2260}"),     // ≠
        ("le;", "\u{2264}"),     // ≤
        ("ge;", "\u{2265}"),     // ≥
        ("infin;", "\u{221E}"),  // ∞
        ("deg;", "\u{00B0}"),    // °
        ("micro;", "\u{00B5}"),  // µ
        ("sup2;", "\u{00B2}"),   // ²
        ("sup3;", "\u{00B3}"),   // ³
        ("frac12;", "\u{00BD}"), // ½
        ("frac14;", "\u{00BC}"), // ¼
        ("frac34;", "\u{00BE}"), // ¾
        // Arrows
        ("larr;", "\u{2190}"), // ←
        ("rarr;", "\u{2192}"), // →
        ("uarr;", "\u{2191}"), // ↑
        ("darr;", "\u{2193}"), // ↓
        // Card suits and marks
        ("hearts;", "\u{2665}"),
        ("spades;", "\u{2660}"),
        ("clubs;", "\u{2663}"),
        ("diams;", "\u{2666}"),
        ("check;", "\u{2713}"),
        // Greek letters (commonly used)
        ("alpha;", "\u{03B1}"),
        ("beta;", "\u{03B2}"),
        ("gamma;", "\u{03B3}"),
        ("delta;", "\u{03B4}"),
        ("pi;", "\u{03C0}"),
        ("sigma;", "\u{03C3}"),
        ("omega;", "\u{03C9}"),
        // Accented characters (common)
        ("Agrave;", "\u{00C0}"),
        ("Aacute;", "\u{00C1}"),
        ("Acirc;", "\u{00C2}"),
        ("Atilde;", "\u{00C3}"),
        ("Auml;", "\u{00C4}"),
        ("agrave;", "\u{00E0}"),
        ("aacute;", "\u{00E1}"),
        ("acirc;", "\u{00E2}"),
        ("atilde;", "\u{00E3}"),
        ("auml;", "\u{00E4}"),
        ("Egrave;", "\u{00C8}"),
        ("Eacute;", "\u{00C9}"),
        ("egrave;", "\u{00E8}"),
        ("eacute;", "\u{00E9}"),
        ("Igrave;", "\u{00CC}"),
        ("Iacute;", "\u{00CD}"),
        ("igrave;", "\u{00EC}"),
        ("iacute;", "\u{00ED}"),
        ("Ograve;", "\u{00D2}"),
        ("Oacute;", "\u{00D3}"),
        ("Ouml;", "\u{00D6}"),
        ("ograve;", "\u{00F2}"),
        ("oacute;", "\u{00F3}"),
        ("ouml;", "\u{00F6}"),
        ("Ugrave;", "\u{00D9}"),
        ("Uacute;", "\u{00DA}"),
        ("Uuml;", "\u{00DC}"),
        ("ugrave;", "\u{00F9}"),
        ("uacute;", "\u{00FA}"),
        ("uuml;", "\u{00FC}"),
        ("szlig;", "\u{00DF}"),
        ("ntilde;", "\u{00F1}"),
        ("Ntilde;", "\u{00D1}"),
        ("ccedil;", "\u{00E7}"),
        ("Ccedil;", "\u{00C7}"),
    ])
});

/// Longest entity name we try to match.
const MAX_ENTITY_NAME_LEN: usize = 32;

/// Look up a named character reference.
///
/// Returns the replacement string if found.
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Returns Some("&")
/// lookup_entity("amp")   // Returns None
/// lookup_entity("xyz;")  // Returns None
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Replace named and numeric character references in `text`.
///
/// Unknown or malformed references are left untouched, so decoding is safe
/// to run on text that merely contains a stray `&`.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        if let Some((replacement, consumed)) = decode_reference(after) {
            out.push_str(&replacement);
            rest = &after[consumed..];
        } else {
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Decode one reference starting just after the `&`. Named and numeric
/// references both need their terminating `;`.
///
/// Returns the replacement and the number of bytes consumed.
fn decode_reference(input: &str) -> Option<(String, usize)> {
    if let Some(numeric) = input.strip_prefix('#') {
        let (decoded, consumed) = decode_numeric(numeric)?;
        return Some((decoded.to_string(), consumed + 1));
    }

    let name_len = input
        .bytes()
        .take(MAX_ENTITY_NAME_LEN)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 || !input[name_len..].starts_with(';') {
        return None;
    }
    lookup_entity(&input[..=name_len]).map(|value| (value.to_string(), name_len + 1))
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// Decode the digits after `&#`, requiring the terminating `;`.
fn decode_numeric(input: &str) -> Option<(char, usize)> {
    let (digits_start, radix) = match input.as_bytes().first() {
        Some(b'x' | b'X') => (1, 16),
        _ => (0, 10),
    };
    let digits_len = input[digits_start..]
        .bytes()
        .take_while(|b| if radix == 16 { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
        .count();
    if digits_len == 0 || !input[digits_start + digits_len..].starts_with(';') {
        return None;
    }

    let digits = &input[digits_start..digits_start + digits_len];
    // "If the number is 0x00, [...] set the character reference code to 0xFFFD."
    let code = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
    let decoded = match code {
        0 => '\u{FFFD}',
        _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
    };
    Some((decoded, digits_start + digits_len + 1))
}
