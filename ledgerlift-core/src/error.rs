//! Batch-level failures. Any of these aborts the whole run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// One document produced no usable response; nothing from the batch is kept
    #[error("extraction failed for {source_name}: {message}")]
    Extraction {
        source_name: String,
        message: String,
    },

    /// Every document succeeded but none yielded a row
    #[error("no transactions found across any uploaded file")]
    EmptyAggregate,
}
