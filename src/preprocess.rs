// src/preprocess.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

// --- Regex Patterns (Lazy Static) ---
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

/// Tags whose subtrees never contribute narrative text.
const SKIP_TAGS: &[&str] = &["script", "style", "head", "title", "meta", "noscript"];

/// Normalizes a raw document into a single plain-text stream.
///
/// Markup input is parsed and stripped of tags; script/style/head content is
/// discarded, and `remove_tables` additionally drops every `<table>` subtree
/// before it can pollute section text or trigger false keyword matches.
/// Whitespace runs collapse to single spaces. Downstream boundary location
/// always operates on the output of this function, so offsets are
/// self-consistent within one pipeline run.
///
/// Markup so malformed that no text survives yields an empty string; the
/// caller then degrades to an all-empty result rather than failing.
pub fn preprocess(raw_text: &str, is_markup: bool, remove_tables: bool) -> String {
    let text = if is_markup {
        strip_markup(raw_text, remove_tables)
    } else {
        // Table removal needs markup boundaries; plain text passes through.
        raw_text.to_string()
    };
    collapse_whitespace(&text)
}

fn strip_markup(raw: &str, remove_tables: bool) -> String {
    // The parser is error-recovering: broken markup still produces a tree.
    let document = Html::parse_document(raw);
    let mut out = String::new();
    collect_text(document.root_element(), remove_tables, &mut out);
    out
}

/// Walks the node tree, appending text content and skipping excluded subtrees.
fn collect_text(element: ElementRef, remove_tables: bool, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&text.text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIP_TAGS.contains(&name) || (remove_tables && name == "table") {
                continue;
            }
            collect_text(child_el, remove_tables, out);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
