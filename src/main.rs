// src/main.rs
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use filing_extractor::models::{
    ExtractionConfig, FilingDocument, FilingType, ScanScope, SpecialItemsConfig,
};
use filing_extractor::utils::{logging, AppError};
use filing_extractor::extract_filing;

/// Command Line Interface for the filing section extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the filing document (HTML or plain text)
    #[arg(short, long)]
    input: PathBuf,

    /// Filing form type: 10-K, 10-Q or 8-K
    #[arg(short = 't', long)]
    filing_type: String,

    /// Filing date in YYYY-MM-DD format
    #[arg(short = 'd', long)]
    filing_date: String,

    /// Company identifier recorded in the output (e.g. a CIK)
    #[arg(long, default_value = "")]
    identifier: String,

    /// Comma-separated section ids to extract (default: all applicable)
    #[arg(long)]
    items: Option<String>,

    /// Treat the input as plain text even if the extension suggests markup
    #[arg(long)]
    plain_text: bool,

    /// Keep tabular content instead of removing it
    #[arg(long)]
    keep_tables: bool,

    /// Detect special item disclosures using the built-in keyword categories
    #[arg(long)]
    detect_special_items: bool,

    /// Minimum confidence for reported special items
    #[arg(long, default_value_t = 0.3)]
    confidence_threshold: f64,

    /// Comma-separated section ids to scan for special items
    /// (default: the whole document)
    #[arg(long)]
    scan_items: Option<String>,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for {}", args.input.display());

    let filing_type: FilingType = args.filing_type.parse()?;
    let filing_date = NaiveDate::parse_from_str(&args.filing_date, "%Y-%m-%d").map_err(|e| {
        AppError::Config(format!("Invalid filing date '{}': {}", args.filing_date, e))
    })?;

    // 3. Read the document from disk
    let raw_text = fs::read_to_string(&args.input)?;
    let is_markup = !args.plain_text
        && matches!(
            args.input.extension().and_then(|ext| ext.to_str()),
            Some("htm") | Some("html") | Some("xhtml")
        );
    let filename = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let document = FilingDocument {
        raw_text,
        is_markup,
        filing_type,
        filing_date,
        identifier: args.identifier.clone(),
        filename,
    };

    // 4. Assemble the extraction configuration
    let special_items = if args.detect_special_items {
        let scan_scope = match args.scan_items.as_deref() {
            Some(list) => ScanScope::Sections(split_ids(list)),
            None => ScanScope::WholeDocument,
        };
        Some(SpecialItemsConfig {
            scan_scope,
            confidence_threshold: args.confidence_threshold,
            ..SpecialItemsConfig::default()
        })
    } else {
        None
    };

    let config = ExtractionConfig {
        remove_tables: !args.keep_tables,
        sections_requested: args.items.as_deref().map(split_ids),
        special_items,
    };

    // 5. Run the pipeline and emit the result
    let extracted = extract_filing(&document, &config);

    let resolved = extracted.sections.values().filter(|text| !text.is_empty()).count();
    tracing::info!(
        "Extraction finished: {} of {} sections resolved, {} special items",
        resolved,
        extracted.sections.len(),
        extracted.special_items.len()
    );

    let json = serde_json::to_string_pretty(&extracted)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!("Wrote extraction result to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}
