//! Stylesheet parsing.
//!
//! A lenient rule splitter, not a [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//! conformant parser: it finds top-level rules and their declaration
//! blocks and keeps each rule's source text so that rules which are not
//! inlined can be written back unchanged. Nothing inside an at-rule is
//! interpreted.

use indexmap::IndexMap;
use serde::Serialize;
use strum_macros::Display;

/// Property name to value, in source order.
pub type Declarations = IndexMap<String, String>;

/// Whether a rule is an at-rule or a style rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// [§ 5.4.2](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
    /// `@media ... { ... }`, `@font-face { ... }`, `@import ...;`
    At,
    /// [§ 5.4.3](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    /// `selector { declarations }`
    Rule,
}

/// One top-level rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssRule {
    /// At-rule or style rule.
    pub kind: RuleKind,
    /// The trimmed selector text. `None` for at-rules.
    pub selector: Option<String>,
    /// Parsed declarations. Empty for at-rules.
    pub declarations: Declarations,
    /// The rule exactly as written, braces included.
    pub raw: String,
}

impl CssRule {
    /// Whether this is an at-rule.
    #[must_use]
    pub fn is_at_rule(&self) -> bool {
        self.kind == RuleKind::At
    }
}

/// Split `css` into top-level rules, in source order.
///
/// Whitespace and `/* */` comments between rules are skipped. Text that
/// forms neither kind of rule is skipped one character at a time, so the
/// parse always terminates.
///
/// # Example
/// ```ignore
/// let rules = parse_css("div { color: red; } @media print { p { color: #000; } }");
/// assert_eq!(rules[0].selector.as_deref(), Some("div"));
/// assert!(rules[1].is_at_rule());
/// ```
#[must_use]
pub fn parse_css(css: &str) -> Vec<CssRule> {
    let mut rules = Vec::new();
    let mut rest = css;

    loop {
        rest = skip_whitespace_and_comments(rest);
        if rest.is_empty() {
            break;
        }
        if let Some((rule, consumed)) = consume_at_rule(rest).or_else(|| consume_style_rule(rest)) {
            rules.push(rule);
            rest = &rest[consumed..];
            continue;
        }
        let skip = rest.chars().next().map_or(1, char::len_utf8);
        rest = &rest[skip..];
    }

    rules
}

/// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-a-list-of-declarations)
///
/// Split a declaration block on `;` outside quotes and parentheses, then
/// each part on its first `:`. Parts without a `:` are dropped. A repeated
/// property keeps its first position and takes the last value.
#[must_use]
pub fn parse_declarations(block: &str) -> Declarations {
    let mut declarations = Declarations::new();
    for part in split_top_level(block, ';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((name, value)) = part.split_once(':') {
            let _ = declarations.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
    declarations
}

fn skip_whitespace_and_comments(mut input: &str) -> &str {
    loop {
        input = input.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let Some(comment) = input.strip_prefix("/*") else {
            return input;
        };
        // An unterminated comment runs to the end of the sheet.
        input = comment.find("*/").map_or("", |end| &comment[end + 2..]);
    }
}

/// `@name ... { ... }` with nested braces, or `@name ...;` when a `;`
/// comes before any `{`. An unbalanced block runs to the end of the input.
fn consume_at_rule(input: &str) -> Option<(CssRule, usize)> {
    let after_at = input.strip_prefix('@')?;
    let name_len = after_at
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'-')
        .count();
    if name_len == 0 {
        return None;
    }

    let prelude_end = input.find(['{', ';'])?;
    let end = if input.as_bytes()[prelude_end] == b';' {
        prelude_end + 1
    } else {
        let mut depth = 0usize;
        let mut end = input.len();
        for (i, b) in input.bytes().enumerate().skip(prelude_end) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        end
    };

    let rule = CssRule {
        kind: RuleKind::At,
        selector: None,
        declarations: Declarations::new(),
        raw: input[..end].to_string(),
    };
    Some((rule, end))
}

/// `selector { declarations }`, where the block ends at the first `}`.
/// A stray `}` before the block is not part of any selector.
fn consume_style_rule(input: &str) -> Option<(CssRule, usize)> {
    if input.starts_with('@') {
        return None;
    }
    let open = input.find('{')?;
    if open == 0 || input[..open].contains('}') {
        return None;
    }
    let close = open + input[open..].find('}')?;
    let end = close + 1;

    let rule = CssRule {
        kind: RuleKind::Rule,
        selector: Some(input[..open].trim().to_string()),
        declarations: parse_declarations(&input[open + 1..close]),
        raw: input[..end].to_string(),
    };
    Some((rule, end))
}

/// Split on `separator` where it is outside quotes and parentheses, so
/// `url(data:image/png;base64,...)` and `content: "a;b"` stay whole.
fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, _) if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            (None, _) => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
