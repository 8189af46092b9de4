//! Caller-facing entry point: aggregate, reject empty batches, normalize.

use crate::aggregate::{aggregate, Fallbacks};
use crate::error::PipelineError;
use crate::normalize::normalize;
use crate::rules::ExclusionRuleSet;
use crate::transaction::{ExtractionResult, RawExtractionResult};

/// Run the core over per-document results (in upload order).
///
/// Only call this once every extraction has succeeded.
pub fn run(
    results: &[RawExtractionResult],
    rules: &ExclusionRuleSet,
    fallbacks: &Fallbacks,
) -> Result<ExtractionResult, PipelineError> {
    let combined = aggregate(results, fallbacks);
    if combined.transactions.is_empty() {
        return Err(PipelineError::EmptyAggregate);
    }
    Ok(normalize(combined, rules))
}
