// src/pipeline.rs

// --- Imports ---
use crate::extractors::boundary::locate_boundaries;
use crate::extractors::section::{assemble_maps, extract_sections};
use crate::extractors::special_items::detect_special_items;
use crate::models::{ExtractedFiling, ExtractionConfig, FilingDocument};
use crate::preprocess::preprocess;
use crate::schema::{resolve_schema, ItemSchema, ItemSpec};

/// Runs the full extraction pipeline for one document.
///
/// Preprocesses the raw text, resolves the applicable section schema,
/// locates boundaries, slices section text, builds composite part
/// aggregates and runs special item detection when configured. Pure and
/// deterministic: identical input, metadata and configuration produce
/// byte-identical output, so callers may re-process and cache freely.
///
/// Extraction failures degrade to empty section text; the function itself
/// never fails. Unrecognized filing-type strings are rejected earlier,
/// when callers parse them into [`crate::models::FilingType`].
pub fn extract_filing(document: &FilingDocument, config: &ExtractionConfig) -> ExtractedFiling {
    tracing::info!(
        "Extracting {} ({}, filed {})",
        document.filename,
        document.filing_type,
        document.filing_date
    );

    let text = preprocess(&document.raw_text, document.is_markup, config.remove_tables);
    if text.is_empty() {
        tracing::warn!(
            "No text recovered from {}; all sections will be empty",
            document.filename
        );
    }

    let schema = resolve_schema(document.filing_type, document.filing_date);
    let items = requested_items(schema, config);

    let boundaries = locate_boundaries(&text, &items);
    tracing::debug!(
        "Resolved {} of {} section boundaries",
        boundaries.sections.len(),
        items.len()
    );

    let sections = extract_sections(&text, &boundaries, config.remove_tables);
    let (section_map, part_map) = assemble_maps(&items, schema.parts, &sections);

    let special_items = match &config.special_items {
        Some(detector_config) => detect_special_items(&section_map, &text, detector_config),
        None => Vec::new(),
    };

    ExtractedFiling {
        identifier: document.identifier.clone(),
        filename: document.filename.clone(),
        filing_type: document.filing_type,
        filing_date: document.filing_date,
        sections: section_map,
        parts: part_map,
        special_items,
    }
}

/// Filters the schema down to the requested section ids, preserving schema
/// order. Ids the schema does not declare are warned about and skipped, so
/// output keys are always schema-valid.
fn requested_items<'a>(schema: &'a ItemSchema, config: &ExtractionConfig) -> Vec<&'a ItemSpec> {
    match &config.sections_requested {
        None => schema.items.iter().collect(),
        Some(requested) => {
            for id in requested {
                if !schema.items.iter().any(|item| item.section_id == id.as_str()) {
                    tracing::warn!(
                        "Requested section '{}' is not part of the {} schema",
                        id,
                        schema.filing_type
                    );
                }
            }
            schema
                .items
                .iter()
                .filter(|item| requested.iter().any(|id| id.as_str() == item.section_id))
                .collect()
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilingType, ScanScope, SpecialItemsConfig};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual_fixture() -> FilingDocument {
        let html = r#"
            <html><head><title>Form 10-K</title></head><body>
            <p>TABLE OF CONTENTS</p>
            <p>Item 1. Business</p>
            <p>Item 1A. Risk Factors</p>
            <p>Item 7. Management's Discussion and Analysis</p>
            <p>Item 7A. Quantitative and Qualitative Disclosures</p>
            <p>Item 8. Financial Statements</p>
            <p>PART I</p>
            <p>Item 1. Business</p>
            <p>We make widgets and sell them worldwide.</p>
            <p>Item 1A. Risk Factors</p>
            <p>Widget demand is cyclical.</p>
            <p>Item 7. Management's Discussion and Analysis</p>
            <p>The company recorded restructuring charges of $125.3 million. See Note 12.</p>
            <p>Item 7A. Quantitative and Qualitative Disclosures About Market Risk</p>
            <p>Interest rate exposure is limited.</p>
            <p>Item 8. Financial Statements and Supplementary Data</p>
            <p>The statements follow.</p>
            <p>SIGNATURES</p>
            <p>Pursuant to the requirements of the Securities Exchange Act.</p>
            </body></html>
        "#;
        FilingDocument {
            raw_text: html.to_string(),
            is_markup: true,
            filing_type: FilingType::AnnualReport,
            filing_date: date(2023, 12, 31),
            identifier: "0000123456".to_string(),
            filename: "widgets_10k.htm".to_string(),
        }
    }

    fn requested(ids: &[&str]) -> ExtractionConfig {
        ExtractionConfig {
            sections_requested: Some(ids.iter().map(|id| id.to_string()).collect()),
            ..ExtractionConfig::default()
        }
    }

    #[test]
    fn test_annual_extraction_end_to_end() {
        let document = annual_fixture();
        let config = requested(&["1", "1A", "7", "7A", "8"]);
        let extracted = extract_filing(&document, &config);

        // Every requested id is a key, all resolved here.
        assert_eq!(extracted.sections.len(), 5);
        assert!(extracted.sections["1"].contains("widgets"));
        assert!(extracted.sections["1A"].contains("cyclical"));
        assert!(extracted.sections["7"].contains("restructuring charges"));
        assert!(extracted.sections["8"].contains("The statements follow."));

        // The contents listing must not become a boundary: section 7 ends
        // exactly where the 7A body heading begins.
        assert!(!extracted.sections["7"].contains("Quantitative"));
        assert!(extracted.sections["7A"].starts_with("Item 7A."));

        // Signature block is excluded from the final section.
        assert!(!extracted.sections["8"].contains("SIGNATURES"));
        assert!(extracted.parts.is_empty());
    }

    #[test]
    fn test_unresolved_sections_are_present_but_empty() {
        let document = annual_fixture();
        // Item 3 never appears in the fixture.
        let config = requested(&["1", "3"]);
        let extracted = extract_filing(&document, &config);
        assert_eq!(extracted.sections.len(), 2);
        assert!(!extracted.sections["1"].is_empty());
        assert_eq!(extracted.sections["3"], "");
    }

    #[test]
    fn test_unknown_requested_ids_are_skipped() {
        let document = annual_fixture();
        let config = requested(&["7", "99Z"]);
        let extracted = extract_filing(&document, &config);
        assert_eq!(extracted.sections.len(), 1);
        assert!(extracted.sections.contains_key("7"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let document = annual_fixture();
        let mut config = requested(&["1", "1A", "7", "7A", "8"]);
        config.special_items = Some(SpecialItemsConfig::default());

        let first = extract_filing(&document, &config);
        let second = extract_filing(&document, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_special_items_flow_through_the_pipeline() {
        let document = annual_fixture();
        let mut config = requested(&["7", "8"]);
        config.special_items = Some(SpecialItemsConfig {
            scan_scope: ScanScope::Sections(vec!["7".to_string()]),
            ..SpecialItemsConfig::default()
        });

        let extracted = extract_filing(&document, &config);
        assert!(!extracted.special_items.is_empty());
        let item = &extracted.special_items[0];
        assert_eq!(item.category, "restructuring");
        assert_eq!(item.source_section, "7");
        assert!((item.amount_value.unwrap() - 125_300_000.0).abs() < 1.0);
        assert!(item.footnote_reference.as_deref().unwrap().contains("12"));
        assert!(item.confidence > 0.0 && item.confidence <= 1.0);
    }

    #[test]
    fn test_quarterly_parts_are_assembled() {
        let text = "Item 1. Financial Statements Condensed balance sheets follow. \
                    Item 2. Management's Discussion and Analysis Revenue grew. \
                    Item 3. Quantitative and Qualitative Disclosures None material. \
                    Item 4. Controls and Procedures Effective. \
                    Item 1. Legal Proceedings None pending. \
                    Item 1A. Risk Factors Unchanged. \
                    Item 2. Unregistered Sales None. \
                    Item 3. Defaults Upon Senior Securities None. \
                    Item 4. Mine Safety Disclosures Not applicable. \
                    Item 5. Other Information None. \
                    Item 6. Exhibits The exhibit index follows. \
                    SIGNATURES Duly authorized.";
        let document = FilingDocument {
            raw_text: text.to_string(),
            is_markup: false,
            filing_type: FilingType::QuarterlyReport,
            filing_date: date(2023, 6, 30),
            identifier: "0000123456".to_string(),
            filename: "widgets_10q.txt".to_string(),
        };
        let extracted = extract_filing(&document, &ExtractionConfig::default());

        assert_eq!(extracted.sections.len(), 11);
        assert!(extracted.sections["part_1__1"].contains("balance sheets"));
        assert!(extracted.sections["part_1__2"].contains("Revenue grew"));
        assert!(extracted.sections["part_2__1"].contains("Legal Proceedings"));
        assert!(extracted.sections["part_2__6"].contains("exhibit index"));

        // Part aggregates are the ordered concatenation of their constituents.
        let part_1_expected = format!(
            "{}{}{}{}",
            extracted.sections["part_1__1"],
            extracted.sections["part_1__2"],
            extracted.sections["part_1__3"],
            extracted.sections["part_1__4"]
        );
        assert_eq!(extracted.parts["part_1"], part_1_expected);
        assert!(extracted.parts["part_2"].contains("Exhibits"));
    }

    #[test]
    fn test_unparsable_markup_degrades_to_empty_sections() {
        let document = FilingDocument {
            raw_text: "<script>nothing but code</script>".to_string(),
            is_markup: true,
            filing_type: FilingType::AnnualReport,
            filing_date: date(2023, 12, 31),
            identifier: String::new(),
            filename: "broken.htm".to_string(),
        };
        let extracted = extract_filing(&document, &ExtractionConfig::default());
        assert_eq!(extracted.sections.len(), 23);
        assert!(extracted.sections.values().all(|text| text.is_empty()));
        assert!(extracted.special_items.is_empty());
    }

    #[test]
    fn test_current_report_uses_date_appropriate_schema() {
        let text = "Item 2.05 Costs Associated with Exit or Disposal Activities \
                    The registrant committed to a restructuring plan. \
                    Item 9.01 Financial Statements and Exhibits Exhibits listed. \
                    SIGNATURES";
        let base = FilingDocument {
            raw_text: text.to_string(),
            is_markup: false,
            filing_type: FilingType::CurrentReport,
            filing_date: date(2010, 5, 1),
            identifier: String::new(),
            filename: "event_8k.txt".to_string(),
        };

        let current = extract_filing(&base, &ExtractionConfig::default());
        assert!(current.sections.contains_key("2.05"));
        assert!(current.sections["2.05"].contains("restructuring plan"));

        let legacy_document = FilingDocument {
            filing_date: date(2004, 8, 23),
            ..base
        };
        let legacy = extract_filing(&legacy_document, &ExtractionConfig::default());
        // Legacy schema knows nothing of dotted items.
        assert!(!legacy.sections.contains_key("2.05"));
        assert!(legacy.sections.contains_key("12"));
    }
}
