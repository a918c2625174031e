// src/extractors/boundary.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::ItemSpec;

// --- Regex Patterns (Lazy Static) ---
/// Marker for the trailing signature block that closes a filing body.
static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bSIGNATURES?\b").expect("Failed to compile SIGNATURE_RE")
});

// --- Data Structures ---
/// The resolved true start of one section in the preprocessed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBoundary {
    pub section_id: String,
    pub start: usize,
}

/// All resolved boundaries, in schema (and therefore document) order, plus
/// the end position of the final section.
#[derive(Debug, Clone, Default)]
pub struct ResolvedBoundaries {
    pub sections: Vec<SectionBoundary>,
    /// Slice end for the last resolved section: the trailing signature block
    /// marker when one follows it, otherwise the end of the document.
    pub tail: usize,
}

/// Locates the true start offset of each schema section in the text.
///
/// A heading legitimately appears several times: in the table of contents,
/// at the real section start, and inside cross-references. Candidates are
/// resolved back-to-front under a shrinking limit: each section takes its
/// last occurrence strictly before the next resolved section's start
/// (before the end of the document while no later section has resolved).
/// The last plausible occurrence is the real section start; contents
/// entries always precede the body headings of every later section, so the
/// limit excludes them. Sections with no usable occurrence are simply
/// absent from the result and yield empty text downstream.
pub fn locate_boundaries(text: &str, items: &[&ItemSpec]) -> ResolvedBoundaries {
    let mut starts: Vec<Option<usize>> = vec![None; items.len()];
    let mut limit = text.len();

    for (idx, item) in items.iter().enumerate().rev() {
        // find_iter yields ascending positions; the last one below the
        // limit is the closest occurrence still before the next section.
        let candidate = item
            .heading
            .find_iter(text)
            .map(|m| m.start())
            .filter(|&pos| pos < limit)
            .last();

        match candidate {
            Some(pos) => {
                tracing::trace!("Section {} resolved at offset {}", item.section_id, pos);
                starts[idx] = Some(pos);
                limit = pos;
            }
            None => {
                tracing::debug!("No usable heading occurrence for section {}", item.section_id);
            }
        }
    }

    let sections: Vec<SectionBoundary> = items
        .iter()
        .zip(starts)
        .filter_map(|(item, start)| {
            start.map(|pos| SectionBoundary {
                section_id: item.section_id.to_string(),
                start: pos,
            })
        })
        .collect();

    let tail = trailing_signature(text, sections.last().map(|b| b.start)).unwrap_or(text.len());

    ResolvedBoundaries { sections, tail }
}

/// Position of the last signature marker, accepted only when it follows the
/// final resolved boundary (a contents-page "Signatures" line must never
/// truncate the last section).
fn trailing_signature(text: &str, last_start: Option<usize>) -> Option<usize> {
    let marker = SIGNATURE_RE.find_iter(text).last()?;
    match last_start {
        Some(start) if marker.start() > start => Some(marker.start()),
        _ => None,
    }
}
