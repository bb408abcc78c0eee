//! Integration tests for the tree builder.

use tessera_dom::{DomTree, NodeId, NodeKind};
use tessera_html::{ParseIssueKind, ParseOptions, ToHtml, parse_document, parse_document_with_report};

/// Helper to parse with default options
fn parse(html: &str) -> DomTree {
    parse_document(html, &ParseOptions::default())
}

/// Helper to get the first element with the given tag name
fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.elements_by_tag_name(tree.root(), tag)
        .first()
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

/// Helper to get the element children of a node
fn element_children(tree: &DomTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|&c| tree.as_element(c).is_some())
        .collect()
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse("<ul><li>One<li>Two</ul>");
    let ul = find_element(&tree, "ul");
    let items = element_children(&tree, ul);

    assert_eq!(items.len(), 2);
    assert_eq!(tree.inner_text(items[0]), "One");
    assert_eq!(tree.inner_text(items[1]), "Two");
    assert_eq!(tree.to_minified_html(), "<ul><li>One</li><li>Two</li></ul>");
}

#[test]
fn test_paragraphs_close_each_other() {
    let tree = parse("<p>One<p>Two");
    assert_eq!(element_children(&tree, tree.root()).len(), 2);
}

#[test]
fn test_nested_list_items_are_not_closed() {
    let tree = parse("<li><ul><li>inner</li></ul></li>");
    let outer = find_element(&tree, "li");
    let inner = tree.elements_by_tag_name(outer, "li").item(1);
    assert!(inner.is_some_and(|id| tree.is_descendant_of(id, outer)));
}

#[test]
fn test_void_element_has_no_children() {
    let tree = parse("<p>a<br>b</p>");
    let p = find_element(&tree, "p");
    let br = find_element(&tree, "br");

    assert_eq!(tree.children(p).len(), 3);
    assert!(tree.children(br).is_empty());
    assert_eq!(tree.inner_text(p), "ab");
}

#[test]
fn test_self_closing_tag_is_not_opened() {
    let tree = parse("<div/><span>x</span>");
    assert_eq!(element_children(&tree, tree.root()).len(), 2);
    assert!(tree.children(find_element(&tree, "div")).is_empty());
}

#[test]
fn test_boolean_attribute() {
    let tree = parse(r#"<input type="checkbox" checked>"#);
    let input = find_element(&tree, "input");

    assert_eq!(tree.get_attribute(input, "checked"), Some(""));
    assert!(tree.as_element(input).is_some_and(|e| e.is_boolean_attribute("checked")));
    assert!(!tree.as_element(input).is_some_and(|e| e.is_boolean_attribute("type")));
}

#[test]
fn test_unclosed_elements_are_closed_at_end() {
    let tree = parse("<div><span>foo");
    let span = find_element(&tree, "span");

    assert_eq!(tree.parent(span), Some(find_element(&tree, "div")));
    assert_eq!(tree.to_minified_html(), "<div><span>foo</span></div>");
}

#[test]
fn test_namespaced_tag() {
    let tree = parse(r#"<svg:rect width="5"/>"#);
    let rect = find_element(&tree, "svg:rect");
    let data = tree.as_element(rect).expect("element");

    assert_eq!(data.tag_name, "rect");
    assert_eq!(data.namespace.as_deref(), Some("svg"));
    assert_eq!(data.qualified_name(), "svg:rect");
}

#[test]
fn test_namespaced_closing_tag() {
    let tree = parse("<svg:g><svg:path></svg:path></svg:g><p></p>");
    let g = find_element(&tree, "svg:g");
    let p = find_element(&tree, "p");
    assert_eq!(tree.parent(p), tree.parent(g));
}

#[test]
fn test_tag_names_are_lowercased() {
    let tree = parse("<DIV Class=\"x\">y</div>");
    let div = find_element(&tree, "div");

    assert!(tree.is_element_named(div, "div"));
    assert_eq!(tree.get_attribute(div, "Class"), Some("x"));
}

#[test]
fn test_preamble_and_html_promotion() {
    let tree = parse(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE html>\n<html><body></body></html>",
    );

    assert_ne!(tree.root(), NodeId::ROOT);
    assert!(tree.is_element_named(tree.root(), "html"));
    assert_eq!(tree.doctype(), Some("<!DOCTYPE html>"));
    assert_eq!(
        tree.xml_declaration(),
        Some("<?xml version=\"1.0\" encoding=\"utf-8\"?>")
    );
    assert_eq!(tree.document_element(), Some(tree.root()));
}

#[test]
fn test_html_with_siblings_is_not_promoted() {
    let tree = parse("<html></html><p></p>");
    assert_eq!(tree.root(), NodeId::ROOT);
    assert_eq!(tree.kind(tree.root()), Some(NodeKind::Document));
}

#[test]
fn test_comment() {
    let tree = parse("<div><!-- note --></div>");
    let div = find_element(&tree, "div");
    let comment = tree.first_child(div).expect("comment");

    assert_eq!(tree.kind(comment), Some(NodeKind::Comment));
    assert_eq!(tree.contents(comment), Some(" note "));
}

#[test]
fn test_cdata_is_not_parsed() {
    let tree = parse("<x><![CDATA[a < b <i>]]></x>");
    let x = find_element(&tree, "x");
    let cdata = tree.first_child(x).expect("cdata");

    assert_eq!(tree.kind(cdata), Some(NodeKind::Cdata));
    assert_eq!(tree.contents(cdata), Some("a < b <i>"));
    assert!(tree.elements_by_tag_name(x, "i").is_empty());
}

#[test]
fn test_script_body_is_raw_text() {
    let tree = parse("<script>if (a < b && c) { x('<p>'); }</script>");
    let script = find_element(&tree, "script");

    assert_eq!(tree.children(script).len(), 1);
    assert_eq!(
        tree.inner_text(script),
        "if (a < b && c) { x('<p>'); }"
    );
    assert!(tree.elements_by_tag_name(tree.root(), "p").is_empty());
}

#[test]
fn test_style_closing_tag_is_case_insensitive() {
    let tree = parse("<STYLE>a { color: red; }</Style><p></p>");
    let style = find_element(&tree, "style");

    assert_eq!(tree.inner_text(style), "a { color: red; }");
    assert_eq!(tree.parent(find_element(&tree, "p")), tree.parent(style));
}

#[test]
fn test_empty_script_has_no_children() {
    let tree = parse(r#"<script src="app.js"></script>"#);
    let script = find_element(&tree, "script");

    assert!(tree.children(script).is_empty());
    assert_eq!(tree.get_attribute(script, "src"), Some("app.js"));
}

#[test]
fn test_script_start_tag_with_quoted_gt() {
    let tree = parse(r#"<script data-x="a>b">x</script><p>after</p>"#);
    let script = find_element(&tree, "script");

    assert_eq!(tree.get_attribute(script, "data-x"), Some("a>b"));
    assert_eq!(tree.inner_text(script), "x");
    assert_eq!(
        tree.to_minified_html(),
        r#"<script data-x="a&gt;b">x</script><p>after</p>"#
    );
}

#[test]
fn test_framework_attributes() {
    let tree = parse(r#"<button @click.prevent="go()" :class="'active'" data-n=5 disabled>x</button>"#);
    let button = find_element(&tree, "button");

    assert_eq!(tree.get_attribute(button, "@click.prevent"), Some("go()"));
    assert_eq!(tree.get_attribute(button, ":class"), Some("'active'"));
    assert_eq!(tree.get_attribute(button, "data-n"), Some("5"));
    assert_eq!(tree.get_attribute(button, "disabled"), Some(""));
}

#[test]
fn test_quoted_gt_in_attribute() {
    let tree = parse(r#"<a title="1 > 0">x</a>"#);
    let a = find_element(&tree, "a");

    assert_eq!(tree.get_attribute(a, "title"), Some("1 > 0"));
    assert_eq!(tree.inner_text(a), "x");
}

#[test]
fn test_duplicate_attribute_keeps_position_and_last_value() {
    let tree = parse(r#"<a x="1" y="2" x="3"></a>"#);
    let a = find_element(&tree, "a");
    let names: Vec<&str> = tree
        .attributes(a)
        .expect("attributes")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(tree.get_attribute(a, "x"), Some("3"));
}

#[test]
fn test_entities_in_text_and_attributes() {
    let tree = parse(r#"<p title="a &amp; b">x &lt; y &#65;</p>"#);
    let p = find_element(&tree, "p");

    assert_eq!(tree.get_attribute(p, "title"), Some("a & b"));
    assert_eq!(tree.inner_text(p), "x < y A");
}

#[test]
fn test_whitespace_kept_by_default() {
    let tree = parse("<p>a \n\t b</p>");
    assert_eq!(tree.inner_text(find_element(&tree, "p")), "a \n\t b");
}

#[test]
fn test_normalize_whitespace() {
    let options = ParseOptions::new().with_normalize_whitespace(true);
    let tree = parse_document("<p>a \n\t b</p>", &options);
    assert_eq!(tree.inner_text(find_element(&tree, "p")), "a b");
}

#[test]
fn test_normalize_whitespace_keeps_non_breaking_space() {
    let options = ParseOptions::new().with_normalize_whitespace(true);
    let tree = parse_document("<p>a\u{00A0}\u{00A0}b  c</p>", &options);

    assert_eq!(tree.inner_text(find_element(&tree, "p")), "a\u{00A0}\u{00A0}b c");
    assert_eq!(tree.to_minified_html(), "<p>a&nbsp;&nbsp;b c</p>");
}

#[test]
fn test_preprocess_hook() {
    let options = ParseOptions::new().with_preprocess(|s| s.replace("{{name}}", "<b>World</b>"));
    let tree = parse_document("<p>Hello {{name}}</p>", &options);
    assert_eq!(tree.inner_text(find_element(&tree, "b")), "World");
}

#[test]
fn test_preprocess_to_empty_yields_empty_document() {
    let options = ParseOptions::new().with_preprocess(|_| String::new());
    let tree = parse_document("<p>dropped</p>", &options);
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn test_empty_input() {
    let tree = parse("   ");
    assert!(tree.children(tree.root()).is_empty());
    assert_eq!(tree.to_minified_html(), "");
}

#[test]
fn test_unmatched_closing_tag_is_ignored() {
    let (tree, report) =
        parse_document_with_report("<div></span>text</div>", &ParseOptions::default());

    assert_eq!(tree.inner_text(find_element(&tree, "div")), "text");
    assert_eq!(report.count(ParseIssueKind::UnmatchedClosingTag), 1);
    assert!(!report.is_clean());
}

#[test]
fn test_unterminated_tag_is_reported() {
    let (tree, report) = parse_document_with_report("<div>x</div><", &ParseOptions::default());

    assert_eq!(report.count(ParseIssueKind::UnterminatedTag), 1);
    assert_eq!(tree.inner_text(find_element(&tree, "div")), "x");
}

#[test]
fn test_well_formed_input_is_clean() {
    let (_, report) = parse_document_with_report(
        "<ul><li>One</li><li>Two</li></ul>",
        &ParseOptions::default(),
    );
    assert!(report.is_clean());
    assert!(report.issues().is_empty());
}

#[test]
fn test_issue_kind_display() {
    assert_eq!(
        ParseIssueKind::UnmatchedClosingTag.to_string(),
        "unmatched closing tag"
    );
}
