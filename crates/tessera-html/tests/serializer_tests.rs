//! Integration tests for minified and pretty serialization.

use tessera_dom::DomTree;
use tessera_html::{ParseOptions, ToHtml, dump_tree, parse_document, to_html};

fn parse(html: &str) -> DomTree {
    parse_document(html, &ParseOptions::default())
}

fn minified(html: &str) -> String {
    parse(html).to_minified_html()
}

fn pretty(html: &str) -> String {
    parse(html).to_pretty_html()
}

// ===== Minified =====

#[test]
fn test_minified_round_trip() {
    let html = r#"<div id="main"><p>Hello <b>World</b></p></div>"#;
    assert_eq!(minified(html), html);
}

#[test]
fn test_minified_keeps_whitespace_text() {
    let html = "<div>\n  <p>x</p>\n</div>";
    assert_eq!(minified(html), html);
}

#[test]
fn test_boolean_attribute_renders_bare() {
    assert_eq!(
        minified(r#"<input disabled value="">"#),
        r#"<input disabled value="">"#
    );
}

#[test]
fn test_text_escaping() {
    assert_eq!(
        minified("<p>Tom &amp; \"Jerry\" 'x' &lt;3</p>"),
        "<p>Tom &amp; &quot;Jerry&quot; &apos;x&apos; &lt;3</p>"
    );
}

#[test]
fn test_attribute_escaping_keeps_apostrophes() {
    assert_eq!(
        minified(r#"<a title="a&quot;b 'c' &amp; d"></a>"#),
        r#"<a title="a&quot;b 'c' &amp; d"></a>"#
    );
}

#[test]
fn test_non_breaking_space_is_escaped() {
    assert_eq!(minified("<p>a&nbsp;b</p>"), "<p>a&nbsp;b</p>");
}

#[test]
fn test_script_is_not_escaped() {
    let html = "<script>if (a < b && c) { go(\"x\"); }</script>";
    assert_eq!(minified(html), html);
}

#[test]
fn test_namespaced_element() {
    assert_eq!(
        minified(r#"<svg:g><svg:rect x="1"/></svg:g>"#),
        r#"<svg:g><svg:rect x="1"></svg:rect></svg:g>"#
    );
}

#[test]
fn test_void_element_ignores_children() {
    let mut tree = DomTree::new();
    let br = tree.create_element("br");
    let text = tree.create_text("ignored");
    tree.append_child(tree.root(), br);
    tree.append_child(br, text);

    assert_eq!(tree.to_minified_html(), "<br>");
}

#[test]
fn test_minified_deep_nesting() {
    let depth = 5_000;
    let tree = parse(&"<div>".repeat(depth));
    assert_eq!(
        tree.to_minified_html(),
        format!("{}{}", "<div>".repeat(depth), "</div>".repeat(depth))
    );
}

#[test]
fn test_svg_title_keeps_non_breaking_space() {
    assert_eq!(
        minified("<svg><title>  a\u{00A0} b\n</title></svg>"),
        "<svg><title>a&nbsp; b</title></svg>"
    );
}

#[test]
fn test_comment_and_cdata() {
    let html = "<div><!-- c --><![CDATA[x < y]]></div>";
    assert_eq!(minified(html), html);
}

#[test]
fn test_preamble_minified() {
    assert_eq!(
        minified("<!DOCTYPE html><html><body>x</body></html>"),
        "<!DOCTYPE html><html><body>x</body></html>"
    );
}

// ===== Pretty =====

#[test]
fn test_pretty_document_with_preamble() {
    let html = r#"<?xml version="1.0" encoding="utf-8"?><!DOCTYPE html><html><body><div><span>A</span></div></body></html>"#;
    let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE html>\n<html>\n    <body>\n        <div><span>A</span></div>\n    </body>\n</html>";
    assert_eq!(pretty(html), expected);
}

#[test]
fn test_pretty_block_children_are_indented() {
    assert_eq!(
        pretty("<div><p>Hi <b>there</b></p></div>"),
        "<div>\n    <p>Hi <b>there</b></p>\n</div>"
    );
}

#[test]
fn test_pretty_drops_insignificant_whitespace() {
    assert_eq!(
        pretty("<ul>\n\n  <li>One</li>\n      <li>Two</li>\n</ul>"),
        "<ul>\n    <li>One</li>\n    <li>Two</li>\n</ul>"
    );
}

#[test]
fn test_pretty_collapses_text_whitespace() {
    assert_eq!(
        pretty("<div><p>a\n      b</p></div>"),
        "<div>\n    <p>a b</p>\n</div>"
    );
}

#[test]
fn test_pretty_preserves_pre() {
    assert_eq!(
        pretty("<div><pre>a   b\n c</pre></div>"),
        "<div>\n    <pre>a   b\n c</pre>\n</div>"
    );
}

#[test]
fn test_pretty_script_is_verbatim() {
    assert_eq!(
        pretty("<div><script>if (a < b) {\n  go();\n}</script></div>"),
        "<div>\n    <script>if (a < b) {\n  go();\n}</script>\n</div>"
    );
}

#[test]
fn test_pretty_comment_and_cdata_are_indented() {
    assert_eq!(
        pretty("<div><!-- c --><![CDATA[x]]></div>"),
        "<div>\n    <!-- c -->\n    <![CDATA[x]]>\n</div>"
    );
}

#[test]
fn test_pretty_top_level_siblings() {
    assert_eq!(pretty("<p>a</p>\n\n<p>b</p>"), "<p>a</p>\n<p>b</p>");
}

#[test]
fn test_pretty_inline_parent_keeps_whitespace() {
    let html = "<button >\n    <div>\n        <svg viewbox=\"0 0 24 24\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" alt=\"\">\n            <title >\n %%ab066b3292d8ab61ef3b5c77169cdd19%%\n </title>\n            <path></path>\n            <path></path>\n        </svg>\n    </div>\n</button>";
    let expected = "<button>\n    <div>\n        <svg viewbox=\"0 0 24 24\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" alt=\"\">\n            <title>%%ab066b3292d8ab61ef3b5c77169cdd19%%</title>\n            <path></path>\n            <path></path>\n        </svg>\n    </div>\n</button>";
    assert_eq!(pretty(html), expected);
}

#[test]
fn test_pretty_subtree_at_indent_level() {
    let tree = parse("<div><section><p>x</p></section></div>");
    let section = tree
        .elements_by_tag_name(tree.root(), "section")
        .first()
        .expect("section");

    assert_eq!(
        to_html(&tree, section, false, 1),
        "    <section>\n        <p>x</p>\n    </section>"
    );
    assert_eq!(to_html(&tree, section, true, 1), "<section><p>x</p></section>");
}

#[test]
fn test_pretty_deep_nesting() {
    let depth = 1_000;
    let tree = parse(&"<div>".repeat(depth));

    let mut lines: Vec<String> = (0..depth - 1)
        .map(|level| format!("{}<div>", "    ".repeat(level)))
        .collect();
    lines.push(format!("{}<div></div>", "    ".repeat(depth - 1)));
    lines.extend((0..depth - 1).rev().map(|level| format!("{}</div>", "    ".repeat(level))));

    assert_eq!(tree.to_pretty_html(), lines.join("\n"));
}

// ===== Tree dump =====

#[test]
fn test_dump_tree() {
    let tree = parse("<p class=\"x\" hidden>a b<!--c--></p>");
    assert_eq!(
        dump_tree(&tree, tree.root()),
        "root\n  <p class=\"x\" hidden>\n    \"a\u{00B7}b\"\n    <!-- c -->\n"
    );
}

#[test]
fn test_dump_tree_deep_nesting() {
    let depth = 5_000;
    let tree = parse(&"<div>".repeat(depth));
    let dump = dump_tree(&tree, tree.root());
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines.len(), depth + 1);
    assert_eq!(lines[0], "root");
    assert_eq!(lines[depth], format!("{}<div>", "  ".repeat(depth)));
}
