//! ledgerlift-core: transaction types and the pure normalization pipeline
//! (aggregate -> exclude -> sort -> project).

pub mod aggregate;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod summary;
pub mod time;
pub mod transaction;

pub use aggregate::{aggregate, Fallbacks, DEFAULT_BANK_NAME, DEFAULT_CURRENCY};
pub use error::PipelineError;
pub use export::{export_filename, ExportRow, ExportSheet, TotalRow, HEADERS, SHEET_NAME, TOTAL_LABEL};
pub use normalize::{normalize, sort_by_date};
pub use rules::ExclusionRuleSet;
pub use summary::Summary;
pub use time::{display_date, is_canonical_date};
pub use transaction::{ExtractionResult, RawExtractionResult, Transaction, TransactionType};
