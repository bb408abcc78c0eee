//! Integration tests for stylesheet rule parsing.

use tessera_css::{
    CssRule, RuleKind, document_stylesheets, parse_css, parse_declarations, style_text,
};
use tessera_html::{ParseOptions, parse_document};

/// Helper to get the declarations of a rule as (name, value) pairs
fn declarations(rule: &CssRule) -> Vec<(&str, &str)> {
    rule.declarations
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

#[test]
fn test_parse_simple_rules() {
    let rules = parse_css("div { color: red; } .foo { font-weight: bold; } #bar { text-align: center; }");

    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0].selector.as_deref(), Some("div"));
    assert_eq!(declarations(&rules[0]), vec![("color", "red")]);
    assert_eq!(rules[1].selector.as_deref(), Some(".foo"));
    assert_eq!(declarations(&rules[1]), vec![("font-weight", "bold")]);
    assert_eq!(rules[2].selector.as_deref(), Some("#bar"));
    assert_eq!(declarations(&rules[2]), vec![("text-align", "center")]);
    assert_eq!(rules[0].raw, "div { color: red; }");
}

#[test]
fn test_parse_at_rules() {
    let rules = parse_css(
        "@media (max-width:600px) { body { background: #fff; } } @font-face { font-family: test; src: url(test.woff); }",
    );

    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].kind, RuleKind::At);
    assert_eq!(rules[0].raw, "@media (max-width:600px) { body { background: #fff; } }");
    assert_eq!(rules[0].selector, None);
    assert!(rules[0].declarations.is_empty());
    assert!(rules[1].is_at_rule());
    assert!(rules[1].raw.starts_with("@font-face"));
}

#[test]
fn test_statement_at_rule_ends_at_semicolon() {
    let rules = parse_css("@import url(\"a.css\"); p { margin: 0; }");

    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].raw, "@import url(\"a.css\");");
    assert_eq!(rules[1].selector.as_deref(), Some("p"));
}

#[test]
fn test_unbalanced_at_rule_runs_to_end() {
    let rules = parse_css("@media print { p { color: black; }");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].raw, "@media print { p { color: black; }");
}

#[test]
fn test_parse_compound_selector() {
    let rules = parse_css("div.foo#bar { color: green; }");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selector.as_deref(), Some("div.foo#bar"));
}

#[test]
fn test_parse_multiple_properties_in_order() {
    let rules = parse_css("div { color: red; font-weight: bold; background: #fff; }");
    assert_eq!(
        declarations(&rules[0]),
        vec![("color", "red"), ("font-weight", "bold"), ("background", "#fff")]
    );
}

#[test]
fn test_comments_are_skipped() {
    let rules = parse_css("/* header */ p { color: red; } /* a */ /* b */ a { color: blue; }");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1].selector.as_deref(), Some("a"));
}

#[test]
fn test_stray_text_is_skipped() {
    let rules = parse_css("} p { color: red; }");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selector.as_deref(), Some("p"));
}

#[test]
fn test_multiline_rule_keeps_raw_text() {
    let css = "h1,\nh2 {\n  margin: 0;\n}";
    let rules = parse_css(css);
    assert_eq!(rules[0].selector.as_deref(), Some("h1,\nh2"));
    assert_eq!(rules[0].raw, css);
}

#[test]
fn test_empty_input() {
    assert!(parse_css("").is_empty());
    assert!(parse_css("  \n /* only a comment */ ").is_empty());
}

#[test]
fn test_parse_declarations() {
    let declarations = parse_declarations(" color : red ;; bogus ; font-family: \"A;B\", serif; color: blue");
    let pairs: Vec<(&str, &str)> = declarations
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    assert_eq!(pairs, vec![("color", "blue"), ("font-family", "\"A;B\", serif")]);
}

#[test]
fn test_declaration_value_keeps_colons() {
    let declarations = parse_declarations("background: url(http://x/a.png)");
    assert_eq!(
        declarations.get("background").map(String::as_str),
        Some("url(http://x/a.png)")
    );
}

#[test]
fn test_rules_serialize_to_json() {
    let rules = parse_css("p { color: red; } @media print { p { color: black; } }");
    let json = serde_json::to_value(&rules).unwrap();

    assert_eq!(json[0]["kind"], "rule");
    assert_eq!(json[0]["selector"], "p");
    assert_eq!(json[0]["declarations"]["color"], "red");
    assert_eq!(json[1]["kind"], "at");
    assert!(json[1]["selector"].is_null());
}

#[test]
fn test_rule_kind_display() {
    assert_eq!(RuleKind::At.to_string(), "at");
    assert_eq!(RuleKind::Rule.to_string(), "rule");
}

#[test]
fn test_document_stylesheets() {
    let tree = parse_document(
        "<style>p { color: red; }</style><div><style>a { color: blue; }</style></div>",
        &ParseOptions::default(),
    );
    let sheets = document_stylesheets(&tree, tree.root());

    assert_eq!(sheets.len(), 2);
    assert_eq!(style_text(&tree, sheets[0].0), "p { color: red; }");
    assert_eq!(sheets[1].1[0].selector.as_deref(), Some("a"));
}
