// src/utils/error.rs
use thiserror::Error;

/// Errors the extraction core escalates to the caller.
///
/// Section-not-found and keyword-not-found are normal outcomes and never
/// surface here; a document whose markup yields no text degrades to an
/// all-empty result instead of failing. The only hard failure is a filing
/// type the schema resolver does not recognize.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unknown filing type: {0}")]
    UnknownFilingType(String),
}

/// Application-level errors for the CLI binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
