// src/extractors/section.rs

// --- Imports ---
use std::collections::BTreeMap;

use crate::extractors::boundary::ResolvedBoundaries;
use crate::schema::{ItemSpec, PartSpec};

// --- Constants ---
/// Minimum length of a consecutive numeric-token run treated as table residue.
const TABLE_RUN_MIN_TOKENS: usize = 5;

// --- Data Structures ---
/// One located section, sliced out of the preprocessed text.
/// Offsets refer to the preprocessed text; `text` may be shorter than the
/// offset span when tabular residue was removed from the slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub section_id: String,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Slices section text between consecutive resolved boundaries.
///
/// Section *i* runs `[start_i, start_{i+1})`; the final section runs to the
/// signature marker or document end recorded in `boundaries.tail`. When
/// `remove_tables` is set, flattened-table residue is stripped from each
/// slice independently of any preprocessor-level table removal.
pub fn extract_sections(
    text: &str,
    boundaries: &ResolvedBoundaries,
    remove_tables: bool,
) -> Vec<ExtractedSection> {
    let mut sections = Vec::with_capacity(boundaries.sections.len());

    for (idx, boundary) in boundaries.sections.iter().enumerate() {
        let end = boundaries
            .sections
            .get(idx + 1)
            .map(|next| next.start)
            .unwrap_or(boundaries.tail);

        let slice = &text[boundary.start..end];
        let section_text = if remove_tables {
            strip_numeric_runs(slice)
        } else {
            slice.to_string()
        };

        tracing::debug!(
            "Extracted section {} ({} bytes, offsets {}..{})",
            boundary.section_id,
            section_text.len(),
            boundary.start,
            end
        );

        sections.push(ExtractedSection {
            section_id: boundary.section_id.clone(),
            text: section_text,
            start_offset: boundary.start,
            end_offset: end,
        });
    }

    sections
}

/// Builds the output maps: every requested section id keyed (empty string
/// when unresolved) and composite part aggregates as the ordered, unmodified
/// concatenation of their constituents.
pub fn assemble_maps(
    items: &[&ItemSpec],
    parts: &[PartSpec],
    sections: &[ExtractedSection],
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut section_map: BTreeMap<String, String> = items
        .iter()
        .map(|item| (item.section_id.to_string(), String::new()))
        .collect();
    for section in sections {
        section_map.insert(section.section_id.clone(), section.text.clone());
    }

    let mut part_map = BTreeMap::new();
    for part in parts {
        let mut combined = String::new();
        let mut any_requested = false;
        for id in part.item_ids {
            if let Some(text) = section_map.get(*id) {
                any_requested = true;
                combined.push_str(text);
            }
        }
        if any_requested {
            part_map.insert(part.part_id.to_string(), combined);
        }
    }

    (section_map, part_map)
}

// --- Table Residue ---
/// Drops maximal runs of consecutive numeric-like tokens. A flattened
/// financial table survives preprocessing as a long run of figures with no
/// narrative words in between; prose amounts ("charges of $125.3 million")
/// never reach the run threshold.
fn strip_numeric_runs(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if is_tabular_token(token) {
            run.push(token);
        } else {
            if run.len() < TABLE_RUN_MIN_TOKENS {
                kept.append(&mut run);
            } else {
                run.clear();
            }
            kept.push(token);
        }
    }
    if run.len() < TABLE_RUN_MIN_TOKENS {
        kept.append(&mut run);
    }

    kept.join(" ")
}

fn is_tabular_token(token: &str) -> bool {
    let trimmed = token
        .trim_matches(|c: char| matches!(c, '(' | ')' | '$' | '%' | ',' | '.' | '-' | '—' | '–'));
    if trimmed.is_empty() {
        // Pure punctuation or a lone currency/dash marker, as table cells flatten to.
        return !token.is_empty();
    }
    trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.'))
}
