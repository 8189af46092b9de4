//! ledgerlift-extract: statement extraction via Gemini and the all-or-nothing batch join

pub mod batch;
pub mod error;
pub mod extractor;
pub mod gemini;

pub use batch::{extract_all, process_batch};
pub use error::ExtractError;
pub use extractor::StatementExtractor;
pub use gemini::{parse_extraction, raw_result_from_value, GeminiConfig, GeminiExtractor};
