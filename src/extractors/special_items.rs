// src/extractors/special_items.rs

// --- Imports ---
use std::collections::{BTreeMap, BTreeSet};

use regex::RegexBuilder;

use crate::extractors::amounts::extract_monetary_amounts;
use crate::extractors::footnotes::extract_footnote_references;
use crate::models::{AmountScale, ScanScope, SpecialItem, SpecialItemsConfig};

// --- Constants ---
/// Context captured on each side of a keyword occurrence, in bytes.
const CONTEXT_WINDOW: usize = 200;

/// Source label used when scanning the whole document as one unit.
const DOCUMENT_SOURCE: &str = "document";

/// Category name of the catch-all bucket, which carries a reduced base weight.
const CATCH_ALL_CATEGORY: &str = "other";

// Confidence weights. One keyword in a specific category scores exactly at
// the 0.3 default threshold plus the first keyword increment; the catch-all
// category needs an amount or footnote to survive.
const BASE_WEIGHT_SPECIFIC: f64 = 0.30;
const BASE_WEIGHT_CATCH_ALL: f64 = 0.15;
const KEYWORD_WEIGHT: f64 = 0.20;
const AMOUNT_WEIGHT: f64 = 0.25;
const FOOTNOTE_WEIGHT: f64 = 0.15;

// --- Data Structures ---
struct Candidate {
    category: String,
    start: usize,
    end: usize,
    keywords: BTreeSet<String>,
}

/// Scans extracted sections (or the whole document) for keyword-tagged
/// special item disclosures and scores each candidate.
///
/// Single-pass and stateless per document: nothing is carried between
/// calls. A disabled detector, an empty keyword map, or an invalid
/// configuration all yield an empty list rather than an error, so section
/// extraction is never aborted by detector settings.
pub fn detect_special_items(
    sections: &BTreeMap<String, String>,
    full_text: &str,
    config: &SpecialItemsConfig,
) -> Vec<SpecialItem> {
    if !config.enabled || config.keyword_categories.is_empty() {
        return Vec::new();
    }
    if let Err(reason) = validate_config(config) {
        tracing::warn!("Special item detection disabled for this document: {}", reason);
        return Vec::new();
    }

    let mut items = Vec::new();
    match &config.scan_scope {
        ScanScope::WholeDocument => {
            scan_unit(full_text, DOCUMENT_SOURCE, config, &mut items);
        }
        ScanScope::Sections(ids) => {
            for id in ids {
                if let Some(text) = sections.get(id) {
                    scan_unit(text, id, config, &mut items);
                } else {
                    tracing::debug!("Scan scope section '{}' not present in extraction", id);
                }
            }
        }
    }

    tracing::info!("Special item detection produced {} items", items.len());
    items
}

fn validate_config(config: &SpecialItemsConfig) -> Result<(), String> {
    if !config.confidence_threshold.is_finite()
        || !(0.0..=1.0).contains(&config.confidence_threshold)
    {
        return Err(format!(
            "confidence threshold {} outside [0, 1]",
            config.confidence_threshold
        ));
    }
    for (category, keywords) in &config.keyword_categories {
        if category.trim().is_empty() {
            return Err("empty category name in keyword map".to_string());
        }
        if keywords.is_empty() {
            return Err(format!("category '{}' has no keywords", category));
        }
        if keywords.iter().any(|keyword| keyword.trim().is_empty()) {
            return Err(format!("category '{}' contains a blank keyword", category));
        }
    }
    Ok(())
}

/// Scans one text unit: finds keyword occurrences per category, merges
/// overlapping windows, enriches with amounts/footnotes, scores, filters.
fn scan_unit(
    text: &str,
    source_section: &str,
    config: &SpecialItemsConfig,
    out: &mut Vec<SpecialItem>,
) {
    if text.is_empty() {
        return;
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for (category, keywords) in &config.keyword_categories {
        let mut occurrences: Vec<(usize, usize, &str)> = Vec::new();
        for keyword in keywords {
            let Some(pattern) = RegexBuilder::new(&regex::escape(keyword))
                .case_insensitive(true)
                .build()
                .ok()
            else {
                continue;
            };
            for found in pattern.find_iter(text) {
                let start = floor_char_boundary(text, found.start().saturating_sub(CONTEXT_WINDOW));
                let end = ceil_char_boundary(text, (found.end() + CONTEXT_WINDOW).min(text.len()));
                occurrences.push((start, end, keyword.as_str()));
            }
        }
        occurrences.sort_by_key(|&(start, end, _)| (start, end));

        // Overlapping windows of the same category describe one disclosure.
        let mut merged: Vec<Candidate> = Vec::new();
        for (start, end, keyword) in occurrences {
            if let Some(last) = merged.last_mut() {
                if start <= last.end {
                    last.end = last.end.max(end);
                    last.keywords.insert(keyword.to_string());
                    continue;
                }
            }
            merged.push(Candidate {
                category: category.clone(),
                start,
                end,
                keywords: BTreeSet::from([keyword.to_string()]),
            });
        }
        candidates.append(&mut merged);
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.category.cmp(&b.category)));

    for candidate in candidates {
        let context = &text[candidate.start..candidate.end];
        let amounts = extract_monetary_amounts(context);
        let footnotes = extract_footnote_references(context);
        let confidence = score(&candidate, !amounts.is_empty(), !footnotes.is_empty());

        if confidence < config.confidence_threshold {
            tracing::trace!(
                "Dropping {} candidate at offset {} (confidence {:.2})",
                candidate.category,
                candidate.start,
                confidence
            );
            continue;
        }

        let amount = amounts.into_iter().next();
        let footnote = footnotes.into_iter().next();
        out.push(SpecialItem {
            category: candidate.category,
            keywords_matched: candidate.keywords.into_iter().collect(),
            confidence,
            context: context.to_string(),
            source_section: source_section.to_string(),
            amount_raw: amount.as_ref().map(|a| a.raw_text.clone()),
            amount_value: amount.as_ref().map(|a| a.value),
            amount_scale: amount.map(|a| a.scale).unwrap_or(AmountScale::None),
            footnote_reference: footnote.map(|f| f.raw_text),
        });
    }
}

/// Bounded weighted sum: category base weight, distinct keyword count with
/// diminishing returns, and amount/footnote corroboration bonuses.
fn score(candidate: &Candidate, has_amount: bool, has_footnote: bool) -> f64 {
    let base = if candidate.category == CATCH_ALL_CATEGORY {
        BASE_WEIGHT_CATCH_ALL
    } else {
        BASE_WEIGHT_SPECIFIC
    };
    let distinct = candidate.keywords.len() as i32;
    let mut confidence = base + KEYWORD_WEIGHT * (1.0 - 0.5f64.powi(distinct));
    if has_amount {
        confidence += AMOUNT_WEIGHT;
    }
    if has_footnote {
        confidence += FOOTNOTE_WEIGHT;
    }
    confidence.clamp(0.0, 1.0)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
