// src/lib.rs

//! Section and special-item extraction for regulatory disclosure filings.
//!
//! The crate takes one raw filing document (markup or plain text) plus its
//! metadata, normalizes it, resolves the section schema applicable to the
//! filing type and date, locates section boundaries, slices section text
//! and optionally scans the result for keyword-tagged special item
//! disclosures enriched with monetary amounts and footnote references.
//!
//! Everything here is pure, synchronous, in-memory computation. Document
//! acquisition, storage layout and result persistence are collaborator
//! concerns; they call [`pipeline::extract_filing`] as a library function.

pub mod extractors;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
pub mod utils;

pub use models::{
    AmountScale, ExtractedFiling, ExtractionConfig, FilingDocument, FilingType, FootnoteReference,
    MonetaryAmount, ScanScope, SpecialItem, SpecialItemsConfig,
};
pub use pipeline::extract_filing;
pub use utils::error::{AppError, ExtractError};
