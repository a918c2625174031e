// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ExtractError;

/// Filing form categories the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    /// Annual report (10-K).
    #[serde(rename = "10-K")]
    AnnualReport,
    /// Quarterly report (10-Q).
    #[serde(rename = "10-Q")]
    QuarterlyReport,
    /// Current-event report (8-K).
    #[serde(rename = "8-K")]
    CurrentReport,
}

impl FilingType {
    /// The form label used on the filing cover page.
    pub fn form_label(&self) -> &'static str {
        match self {
            FilingType::AnnualReport => "10-K",
            FilingType::QuarterlyReport => "10-Q",
            FilingType::CurrentReport => "8-K",
        }
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_label())
    }
}

impl FromStr for FilingType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "10-K" => Ok(FilingType::AnnualReport),
            "10-Q" => Ok(FilingType::QuarterlyReport),
            "8-K" => Ok(FilingType::CurrentReport),
            other => Err(ExtractError::UnknownFilingType(other.to_string())),
        }
    }
}

/// One raw disclosure document plus the metadata the caller already knows.
/// Immutable input to the pipeline; consumed once.
#[derive(Debug, Clone)]
pub struct FilingDocument {
    pub raw_text: String,
    pub is_markup: bool,
    pub filing_type: FilingType,
    pub filing_date: NaiveDate,
    /// Company identifier supplied by the caller (e.g. a CIK).
    pub identifier: String,
    pub filename: String,
}

/// Top-level extraction configuration. Passed by value into each call,
/// never mutated or shared as process-wide state.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Remove tabular content both before segmentation and per extracted slice.
    pub remove_tables: bool,
    /// Section ids to extract; `None` means all applicable for the schema.
    pub sections_requested: Option<Vec<String>>,
    /// Special item detection settings; `None` disables detection entirely.
    pub special_items: Option<SpecialItemsConfig>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            remove_tables: true,
            sections_requested: None,
            special_items: None,
        }
    }
}

/// Where the special item detector looks for keyword matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanScope {
    /// Scan only the listed section ids, in the listed order.
    Sections(Vec<String>),
    /// Scan the whole preprocessed document as a single unit.
    WholeDocument,
}

/// Configuration for the special item detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialItemsConfig {
    pub enabled: bool,
    pub scan_scope: ScanScope,
    /// Candidates scoring below this value are discarded.
    pub confidence_threshold: f64,
    /// Category name -> keyword phrases matched case-insensitively.
    pub keyword_categories: BTreeMap<String, Vec<String>>,
}

impl Default for SpecialItemsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_scope: ScanScope::WholeDocument,
            confidence_threshold: 0.3,
            keyword_categories: default_keyword_categories(),
        }
    }
}

/// The built-in category/keyword table for one-time financial events.
pub fn default_keyword_categories() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 6] = [
        (
            "restructuring",
            &["restructuring", "reorganization", "workforce reduction", "severance", "facility closure"],
        ),
        (
            "impairment",
            &["impairment", "write-down", "write-off", "write down", "write off", "goodwill impairment", "asset impairment"],
        ),
        (
            "litigation",
            &["litigation", "settlement", "legal proceeding", "legal settlement", "jury award", "arbitration"],
        ),
        (
            "discontinued_ops",
            &["discontinued operation", "disposal of business", "disposal group", "held for sale"],
        ),
        (
            "unusual",
            &[
                "unusual item",
                "nonrecurring",
                "non-recurring",
                "one-time",
                "special charge",
                "special item",
                "items impacting comparability",
                "non-gaap adjustment",
                "non-operating",
            ],
        ),
        (
            "other",
            &["other income", "other expense", "gain on sale", "loss on sale", "debt extinguishment", "pension settlement"],
        ),
    ];

    table
        .iter()
        .map(|(category, keywords)| {
            (
                category.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect()
}

/// Magnitude multiplier implied by a monetary amount's scale word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountScale {
    None,
    Thousand,
    Million,
    Billion,
}

impl AmountScale {
    pub fn multiplier(&self) -> f64 {
        match self {
            AmountScale::None => 1.0,
            AmountScale::Thousand => 1e3,
            AmountScale::Million => 1e6,
            AmountScale::Billion => 1e9,
        }
    }

    /// Maps a scale word (any case) to its variant; unknown words scale by 1.
    pub fn from_word(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "thousand" => AmountScale::Thousand,
            "million" => AmountScale::Million,
            "billion" => AmountScale::Billion,
            _ => AmountScale::None,
        }
    }
}

/// A normalized monetary value parsed out of narrative text.
/// `value` carries the full magnitude: the literal times the scale
/// multiplier, negated for parenthetical (accounting-negative) amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub raw_text: String,
    pub value: f64,
    pub scale: AmountScale,
}

/// A cross-reference from narrative text to a numbered explanatory note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteReference {
    pub raw_text: String,
    /// Note number with optional letter suffix, normalized to uppercase.
    pub note_id: String,
}

/// One detected one-time financial event. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialItem {
    #[serde(rename = "type")]
    pub category: String,
    /// Distinct keywords that contributed to this detection; never empty.
    pub keywords_matched: Vec<String>,
    /// Always within [0, 1].
    pub confidence: f64,
    /// The text window the detection was scored on.
    pub context: String,
    /// Section id the window came from, or "document" for whole-document scans.
    pub source_section: String,
    pub amount_raw: Option<String>,
    pub amount_value: Option<f64>,
    pub amount_scale: AmountScale,
    pub footnote_reference: Option<String>,
}

/// All extracted sections plus metadata for one document.
/// Every requested/applicable section id is present as a key in `sections`,
/// with an empty string when the section was not found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFiling {
    pub identifier: String,
    pub filename: String,
    pub filing_type: FilingType,
    pub filing_date: NaiveDate,
    pub sections: BTreeMap<String, String>,
    /// Composite part aggregates, present for schemas that declare parts.
    pub parts: BTreeMap<String, String>,
    pub special_items: Vec<SpecialItem>,
}
