// src/extractors/mod.rs
pub mod amounts;
pub mod boundary;
pub mod footnotes;
pub mod section;
pub mod special_items;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use amounts::extract_monetary_amounts;
#[allow(unused_imports)]
pub use boundary::{locate_boundaries, ResolvedBoundaries, SectionBoundary};
#[allow(unused_imports)]
pub use footnotes::extract_footnote_references;
#[allow(unused_imports)]
pub use section::{extract_sections, ExtractedSection};
#[allow(unused_imports)]
pub use special_items::detect_special_items;
