// src/extractors/footnotes.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FootnoteReference;

// Accepts "Note 12", "Notes 12", "Footnote 4a", "Note No. 3" and the like.
static FOOTNOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:foot)?notes?\s+(?:no\.?\s*)?(?P<id>\d{1,3}[A-Za-z]?)\b")
        .expect("Failed to compile FOOTNOTE_RE")
});

/// Extracts footnote cross-references from a text span, in document order.
/// No match returns an empty list.
pub fn extract_footnote_references(span: &str) -> Vec<FootnoteReference> {
    FOOTNOTE_RE
        .captures_iter(span)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str().trim().to_string();
            Some(FootnoteReference {
                raw_text: raw,
                note_id: caps["id"].to_uppercase(),
            })
        })
        .collect()
}
