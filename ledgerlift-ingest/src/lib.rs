//! ledgerlift-ingest: source documents and best-effort PDF pre-processing.

pub mod preprocess;
pub mod types;

pub use preprocess::{preprocess, scan_pages, PageScan};
pub use types::SourceDocument;
