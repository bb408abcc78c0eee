//! Style inlining.
//!
//! Moves the declarations of `<style>` rules onto the `style` attribute of
//! every element their selectors match, then serializes a copy of the
//! document whose `<style>` blocks keep only the rules that matched nothing.
//!
//! # Not Implemented
//!
//! - Specificity: declarations are applied in stylesheet order, last wins
//! - Rules inside at-rules (`@media`, `@supports`) are never inlined

use std::collections::HashSet;

use tessera_common::warning::warn_once;
use tessera_css::{
    CssRule, Declarations, SelectorList, document_stylesheets, parse_selector_list, style_elements,
};
use tessera_dom::{DomTree, NodeId};
use tessera_html::to_html;

/// Inlining entry point on [`DomTree`].
pub trait InlineStyles {
    /// Inline the stylesheets found at or below `root` and serialize the
    /// result. The `style` attributes are written to `self`; the `<style>`
    /// elements are pruned on a copy only.
    fn to_inlined_html(&mut self, root: NodeId, minify: bool) -> String;
}

impl InlineStyles for DomTree {
    fn to_inlined_html(&mut self, root: NodeId, minify: bool) -> String {
        to_inlined_html(self, root, minify)
    }
}

/// A style rule with its selector parsed once.
struct CompiledRule<'a> {
    /// The `<style>` element the rule came from.
    style: NodeId,
    selector: SelectorList,
    rule: &'a CssRule,
}

/// Inline every `<style>` rule at or below `root` into `style` attributes
/// and serialize the subtree at `root`.
///
/// # Example
/// ```ignore
/// let mut tree = parse_document("<style>p { color: red; }</style><p>x</p>", &ParseOptions::default());
/// let root = tree.root();
/// assert_eq!(to_inlined_html(&mut tree, root, true), r#"<p style="color: red;">x</p>"#);
/// ```
pub fn to_inlined_html(tree: &mut DomTree, root: NodeId, minify: bool) -> String {
    let sheets = document_stylesheets(tree, root);
    let rules = compile_rules(&sheets);
    let inlined = apply_rules(tree, root, &rules);

    let mut copy = DomTree::new();
    let copy_root = tree.deep_clone_into(root, &mut copy);
    copy.set_root(copy_root);
    prune_style_elements(&mut copy, copy_root, &sheets, &inlined);

    to_html(&copy, copy_root, minify, 0)
}

/// Parse the selector of every style rule. Rules whose selector does not
/// parse are reported and left in their stylesheet.
fn compile_rules(sheets: &[(NodeId, Vec<CssRule>)]) -> Vec<CompiledRule<'_>> {
    let mut compiled = Vec::new();
    for (style, rules) in sheets {
        for rule in rules {
            let Some(selector) = rule.selector.as_deref() else {
                continue;
            };
            match parse_selector_list(selector) {
                Ok(selector) => compiled.push(CompiledRule {
                    style: *style,
                    selector,
                    rule,
                }),
                Err(err) => warn_once("Inliner", &format!("rule not inlined: {err}")),
            }
        }
    }
    compiled
}

/// Write merged declarations into the `style` attribute of every matched
/// element, replacing any existing value. Returns the `(style element, raw
/// rule)` pairs that matched at least one element.
fn apply_rules<'a>(
    tree: &mut DomTree,
    root: NodeId,
    rules: &[CompiledRule<'a>],
) -> HashSet<(NodeId, &'a str)> {
    let (styled, inlined) = match_rules(tree, root, rules);
    for (node, declarations) in styled {
        tree.set_attribute(node, "style", style_attribute(&declarations));
    }
    inlined
}

/// Merge the declarations of every rule matching each element, in
/// document order.
fn match_rules<'a>(
    tree: &DomTree,
    root: NodeId,
    rules: &[CompiledRule<'a>],
) -> (Vec<(NodeId, Declarations)>, HashSet<(NodeId, &'a str)>) {
    let mut styled = Vec::new();
    let mut inlined = HashSet::new();

    for node in tree.inclusive_descendants(root) {
        if tree.as_element(node).is_none() {
            continue;
        }
        let mut merged = Declarations::new();
        for compiled in rules.iter().filter(|c| c.selector.matches(tree, node)) {
            // A repeated property keeps its first position and takes the later value.
            merged.extend(
                compiled
                    .rule
                    .declarations
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
            let _ = inlined.insert((compiled.style, compiled.rule.raw.as_str()));
        }
        if !merged.is_empty() {
            styled.push((node, merged));
        }
    }

    (styled, inlined)
}

/// `name: value;` pairs with nothing between them.
fn style_attribute(declarations: &Declarations) -> String {
    let mut style = String::new();
    for (name, value) in declarations {
        style.push_str(name);
        style.push_str(": ");
        style.push_str(value);
        style.push(';');
    }
    style
}

/// Rebuild each copied `<style>` from the rules that were not inlined out
/// of it. At-rules always stay. A `<style>` left with nothing is removed.
///
/// `copy` was cloned from the tree `sheets` was read from, so its style
/// elements line up with `sheets` in document order.
fn prune_style_elements<'a>(
    copy: &mut DomTree,
    copy_root: NodeId,
    sheets: &'a [(NodeId, Vec<CssRule>)],
    inlined: &HashSet<(NodeId, &'a str)>,
) {
    let copies = style_elements(copy, copy_root);
    for ((style, rules), style_copy) in sheets.iter().zip(copies.iter()) {
        let kept: Vec<&str> = rules
            .iter()
            .filter(|rule| rule.is_at_rule() || !inlined.contains(&(*style, rule.raw.as_str())))
            .map(|rule| rule.raw.as_str())
            .collect();

        if kept.is_empty() {
            copy.remove(style_copy);
        } else {
            copy.set_inner_text(style_copy, &kept.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_attribute_has_no_separator_between_pairs() {
        let mut declarations = Declarations::new();
        let _ = declarations.insert("color".to_string(), "red".to_string());
        let _ = declarations.insert("margin".to_string(), "0 auto".to_string());
        assert_eq!(style_attribute(&declarations), "color: red;margin: 0 auto;");
    }
}
