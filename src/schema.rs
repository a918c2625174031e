// src/schema.rs

// --- Imports ---
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FilingType;

// --- Constants ---
/// The current-report (8-K) item numbering convention changed on this date.
/// Filings dated on or before it use the legacy single-number scheme.
static CURRENT_REPORT_RENUMBERING_CUTOFF: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2004, 8, 23).expect("valid cutoff date"));

// --- Item Tables ---
const ANNUAL_ITEMS: &[&str] = &[
    "1", "1A", "1B", "1C", "2", "3", "4", "5", "6", "7", "7A", "8", "9", "9A", "9B", "9C",
    "10", "11", "12", "13", "14", "15", "16",
];

/// 10-Q sections are scoped under two parts; section ids are
/// `part_N__ITEM` compounds carried consistently through the output maps.
const QUARTERLY_ITEMS: &[(&str, &str, &str)] = &[
    // (section_id, part_id, item designator on the heading)
    ("part_1__1", "part_1", "1"),
    ("part_1__2", "part_1", "2"),
    ("part_1__3", "part_1", "3"),
    ("part_1__4", "part_1", "4"),
    ("part_2__1", "part_2", "1"),
    ("part_2__1A", "part_2", "1A"),
    ("part_2__2", "part_2", "2"),
    ("part_2__3", "part_2", "3"),
    ("part_2__4", "part_2", "4"),
    ("part_2__5", "part_2", "5"),
    ("part_2__6", "part_2", "6"),
];

const QUARTERLY_PARTS: &[PartSpec] = &[
    PartSpec {
        part_id: "part_1",
        item_ids: &["part_1__1", "part_1__2", "part_1__3", "part_1__4"],
    },
    PartSpec {
        part_id: "part_2",
        item_ids: &[
            "part_2__1", "part_2__1A", "part_2__2", "part_2__3", "part_2__4", "part_2__5",
            "part_2__6",
        ],
    },
];

const CURRENT_REPORT_ITEMS: &[&str] = &[
    "1.01", "1.02", "1.03", "1.04", "1.05", "2.01", "2.02", "2.03", "2.04", "2.05", "2.06",
    "3.01", "3.02", "3.03", "4.01", "4.02", "5.01", "5.02", "5.03", "5.04", "5.05", "5.06",
    "5.07", "5.08", "6.01", "6.02", "6.03", "6.04", "6.05", "7.01", "8.01", "9.01",
];

const CURRENT_REPORT_LEGACY_ITEMS: &[&str] =
    &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];

// --- Data Structures ---
/// One section entry of a resolved schema.
#[derive(Debug)]
pub struct ItemSpec {
    pub section_id: &'static str,
    /// Owning part for quarterly schemas, `None` otherwise.
    pub part: Option<&'static str>,
    /// Compiled heading pattern for this section.
    pub heading: Regex,
}

/// A composite aggregate: the ordered constituents of one quarterly part.
#[derive(Debug, Clone, Copy)]
pub struct PartSpec {
    pub part_id: &'static str,
    pub item_ids: &'static [&'static str],
}

/// The applicable section set for a (filing type, date regime) combination.
/// Resolved deterministically; the static instances are shared read-only
/// across concurrent callers.
#[derive(Debug)]
pub struct ItemSchema {
    pub filing_type: FilingType,
    pub items: Vec<ItemSpec>,
    pub parts: &'static [PartSpec],
}

// --- Heading Patterns ---
/// Builds the case-insensitive heading regex for an item designator.
/// Tolerates flexible whitespace and punctuation between the word "item"
/// and the designator, and spacing around dotted 8-K designators. The
/// trailing `\b` keeps "Item 1" from matching "Item 1A" or "Item 10".
fn heading_pattern(designator: &str) -> String {
    let mut pattern = String::from(r"(?i)\bitem[\s\.\-:]*");
    for ch in designator.chars() {
        match ch {
            '.' => pattern.push_str(r"\s*\.\s*"),
            c => pattern.push(c),
        }
    }
    pattern.push_str(r"\b");
    pattern
}

fn compile_item(section_id: &'static str, part: Option<&'static str>, designator: &str) -> ItemSpec {
    let pattern = heading_pattern(designator);
    ItemSpec {
        section_id,
        part,
        heading: Regex::new(&pattern).expect("Failed to compile heading pattern"),
    }
}

// --- Static Schemas (Lazy) ---
static ANNUAL_SCHEMA: Lazy<ItemSchema> = Lazy::new(|| ItemSchema {
    filing_type: FilingType::AnnualReport,
    items: ANNUAL_ITEMS.iter().map(|&id| compile_item(id, None, id)).collect(),
    parts: &[],
});

static QUARTERLY_SCHEMA: Lazy<ItemSchema> = Lazy::new(|| ItemSchema {
    filing_type: FilingType::QuarterlyReport,
    items: QUARTERLY_ITEMS
        .iter()
        .map(|&(section_id, part, designator)| compile_item(section_id, Some(part), designator))
        .collect(),
    parts: QUARTERLY_PARTS,
});

static CURRENT_REPORT_SCHEMA: Lazy<ItemSchema> = Lazy::new(|| ItemSchema {
    filing_type: FilingType::CurrentReport,
    items: CURRENT_REPORT_ITEMS.iter().map(|&id| compile_item(id, None, id)).collect(),
    parts: &[],
});

static CURRENT_REPORT_LEGACY_SCHEMA: Lazy<ItemSchema> = Lazy::new(|| ItemSchema {
    filing_type: FilingType::CurrentReport,
    items: CURRENT_REPORT_LEGACY_ITEMS.iter().map(|&id| compile_item(id, None, id)).collect(),
    parts: &[],
});

/// Returns the ordered section schema applicable to a filing type and date.
///
/// Holds no document-specific state; the returned reference is safe to
/// cache and share. Unrecognized filing types cannot reach this function:
/// they are rejected when parsing the type string into [`FilingType`].
pub fn resolve_schema(filing_type: FilingType, filing_date: NaiveDate) -> &'static ItemSchema {
    match filing_type {
        FilingType::AnnualReport => &ANNUAL_SCHEMA,
        FilingType::QuarterlyReport => &QUARTERLY_SCHEMA,
        FilingType::CurrentReport => {
            if filing_date <= *CURRENT_REPORT_RENUMBERING_CUTOFF {
                tracing::debug!(
                    "Filing date {} is on or before the 8-K renumbering cutoff; using legacy items",
                    filing_date
                );
                &CURRENT_REPORT_LEGACY_SCHEMA
            } else {
                &CURRENT_REPORT_SCHEMA
            }
        }
    }
}
