//! Tessera CLI
//!
//! Parse a markup file or string and print it back minified, pretty-printed
//! or with its `<style>` rules inlined, plus optional debugging dumps.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tessera::common::warning::set_enabled;
use tessera::css::document_stylesheets;
use tessera::html::dump_tree;
use tessera::{Document, ParseOptions, parse_document};

/// Tessera: tolerant HTML/XML formatter and CSS inliner
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Minify a file
    tessera ./index.html

    # Pretty-print where whitespace is insignificant
    tessera --pretty ./index.html

    # Inline <style> rules into style attributes
    tessera --inline ./email.html

    # Parse inline HTML and show the node tree
    tessera --tree --html '<ul><li>One<li>Two</ul>'
"#)]
struct Cli {
    /// Path to the markup file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this markup string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Indent the output where it is safe to do so
    #[arg(short, long)]
    pretty: bool,

    /// Move <style> rules onto the style attribute of matching elements
    #[arg(short, long)]
    inline: bool,

    /// Collapse whitespace runs in text while parsing
    #[arg(long)]
    normalize_whitespace: bool,

    /// Print the parsed node tree and any recovered parse problems
    #[arg(short, long)]
    tree: bool,

    /// Print the parsed <style> rules as JSON
    #[arg(long)]
    css_json: bool,

    /// Do not print parser and selector warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    set_enabled(!cli.quiet);

    let markup = load_markup(&cli)?;
    let options = ParseOptions::default().with_normalize_whitespace(cli.normalize_whitespace);
    let mut doc = parse_document(&markup, &options);

    let sections = cli.tree || cli.css_json;
    if cli.tree {
        print_document(&doc);
    }
    if cli.css_json {
        print_heading("Stylesheets");
        println!("{}", stylesheets_json(&doc)?);
        println!();
    }

    let output = if cli.inline {
        doc.to_inlined_html(!cli.pretty)
    } else {
        doc.to_html(!cli.pretty)
    };
    if sections {
        print_heading("Output");
    }
    println!("{output}");

    Ok(())
}

/// Read the markup from `--html` or the file argument.
fn load_markup(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
    } else {
        anyhow::bail!("no input: pass a file path or --html")
    }
}

fn print_heading(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}

/// Print the node tree and the parse report.
fn print_document(doc: &Document) {
    print_heading("DOM Tree");
    print!("{}", dump_tree(doc.tree(), doc.root()));
    println!();

    let issues = doc.parse_report().issues();
    if issues.is_empty() {
        return;
    }
    print_heading(&format!("Parse Issues ({})", issues.len()));
    for issue in issues {
        println!(
            "  {} at {}: {}",
            issue.kind.yellow(),
            issue.offset,
            issue.snippet.dimmed()
        );
    }
    println!();
}

/// One JSON object per `<style>` element, in document order.
fn stylesheets_json(doc: &Document) -> anyhow::Result<String> {
    let sheets: Vec<serde_json::Value> = document_stylesheets(doc.tree(), doc.root())
        .into_iter()
        .map(|(style, rules)| serde_json::json!({ "node": style.0, "rules": rules }))
        .collect();
    serde_json::to_string_pretty(&sheets).context("failed to serialize stylesheets")
}
