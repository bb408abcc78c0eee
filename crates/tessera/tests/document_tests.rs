//! Integration tests for the `Document` facade.

use tessera::html::ParseIssueKind;
use tessera::{Document, DomTree, NodeKind, ParseOptions, parse_document};

fn parse(html: &str) -> Document {
    parse_document(html, &ParseOptions::default())
}

#[test]
fn test_round_trip_is_idempotent() {
    let html = r#"<div id="main"><p>Hello <b>World</b></p></div>"#;
    let doc = parse(html);
    assert_eq!(doc.to_html(true), html);
    assert_eq!(parse(&doc.to_html(true)).to_html(true), html);
}

#[test]
fn test_queries_start_at_document_root() {
    let doc = parse("<ul><li>One<li>Two<li>Three</ul><p class=\"x\">p</p>");

    assert_eq!(doc.query_selector_all("ul > li").len(), 3);
    assert_eq!(doc.get_elements_by_tag_name("LI").len(), 3);
    assert_eq!(doc.get_elements_by_tag_name("*").len(), 5);

    let p = doc.query_selector(".x").unwrap();
    assert_eq!(doc.tree().inner_text(p), "p");
    assert_eq!(doc.query_selector("table"), None);
}

#[test]
fn test_pretty_html() {
    let doc = parse("<div><p>a</p><p>b</p></div>");
    assert_eq!(
        doc.to_pretty_html(),
        "<div>\n    <p>a</p>\n    <p>b</p>\n</div>"
    );
    assert_eq!(doc.to_pretty_html(), doc.to_html(false));
}

#[test]
fn test_preamble_accessors() {
    let doc = parse(r#"<?xml version="1.0"?><!DOCTYPE html><html><body></body></html>"#);
    assert_eq!(doc.xml_declaration(), Some(r#"<?xml version="1.0"?>"#));
    assert_eq!(doc.doctype(), Some("<!DOCTYPE html>"));
    assert!(doc.tree().is_element_named(doc.root(), "html"));

    let fragment = parse("<p>x</p>");
    assert_eq!(fragment.doctype(), None);
    assert_eq!(fragment.xml_declaration(), None);
}

#[test]
fn test_text_and_comment_collections() {
    let doc = parse("<div>a<!-- one --><p>b<!-- two --></p></div>");

    let texts: Vec<&str> = doc
        .all_text_nodes()
        .iter()
        .filter_map(|id| doc.tree().as_text(id))
        .collect();
    assert_eq!(texts, vec!["a", "b"]);
    assert_eq!(doc.all_comment_nodes().len(), 2);
}

#[test]
fn test_remove_comments_through_tree_mut() {
    let mut doc = parse("<div><!-- drop me --><p>keep</p><!-- and me --></div>");
    for comment in doc.all_comment_nodes() {
        doc.tree_mut().remove_with_content(comment);
    }
    assert_eq!(doc.to_html(true), "<div><p>keep</p></div>");
}

#[test]
fn test_mutation_is_visible_to_serializer() {
    let mut doc = parse("<ul><li>a</li></ul>");
    let ul = doc.query_selector("ul").unwrap();

    let tree = doc.tree_mut();
    let li = tree.create_element("li");
    tree.set_inner_text(li, "b & c");
    tree.append_child(ul, li);
    tree.set_attribute(ul, "class", "list");

    assert_eq!(
        doc.to_html(true),
        r#"<ul class="list"><li>a</li><li>b &amp; c</li></ul>"#
    );
}

#[test]
fn test_parse_report_records_recovery() {
    let doc = parse("<div></span>text</div>");
    let report = doc.parse_report();

    assert!(!report.is_clean());
    assert_eq!(report.count(ParseIssueKind::UnmatchedClosingTag), 1);
    assert_eq!(doc.to_html(true), "<div>text</div>");

    assert!(parse("<p>fine</p>").parse_report().is_clean());
}

#[test]
fn test_unclosed_elements_do_not_hang() {
    let doc = parse("<div><span>foo");
    let span = doc.query_selector("div > span").unwrap();
    let text = doc.tree().first_child(span).unwrap();
    assert_eq!(doc.tree().kind(text), Some(NodeKind::Text));
    assert_eq!(doc.to_html(true), "<div><span>foo</span></div>");
}

#[test]
fn test_document_from_hand_built_tree() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element("p");
    let text = tree.create_text("hi");
    tree.append_child(p, text);
    tree.append_child(root, p);

    let doc = Document::from(tree);
    assert!(doc.parse_report().is_clean());
    assert_eq!(doc.to_html(true), "<p>hi</p>");
    assert_eq!(doc.into_tree().children(root).len(), 1);
}

#[test]
fn test_normalize_whitespace_option() {
    let options = ParseOptions::default().with_normalize_whitespace(true);
    let doc = parse_document("<p>a  \n  b</p>", &options);
    assert_eq!(doc.to_html(true), "<p>a b</p>");
}
