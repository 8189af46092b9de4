//! Batch join: extract every document concurrently, then run the pipeline
//! only if all of them succeeded.

use futures_util::future::join_all;
use ledgerlift_core::{pipeline, ExclusionRuleSet, ExtractionResult, Fallbacks, PipelineError, RawExtractionResult};
use ledgerlift_ingest::SourceDocument;

use crate::extractor::StatementExtractor;

/// Issue all extraction calls at once and wait for every one to settle.
///
/// Any failure fails the batch with the first failing document in `docs`
/// order; no partial results are returned. Results come back in `docs` order
/// regardless of completion order.
pub async fn extract_all<E>(
    extractor: &E,
    docs: &[SourceDocument],
) -> Result<Vec<RawExtractionResult>, PipelineError>
where
    E: StatementExtractor + ?Sized,
{
    let calls = docs.iter().map(|doc| async move {
        extractor.extract(doc).await.map_err(|e| {
            tracing::error!(file = %doc.name, error = %e, "extraction failed; aborting batch");
            PipelineError::Extraction {
                source_name: doc.name.clone(),
                message: e.to_string(),
            }
        })
    });

    join_all(calls).await.into_iter().collect()
}

/// Extract, aggregate, filter and sort a batch of uploaded statements.
pub async fn process_batch<E>(
    extractor: &E,
    docs: &[SourceDocument],
    rules: &ExclusionRuleSet,
    fallbacks: &Fallbacks,
) -> Result<ExtractionResult, PipelineError>
where
    E: StatementExtractor + ?Sized,
{
    tracing::info!(files = docs.len(), "processing statement batch");
    let results = extract_all(extractor, docs).await?;
    pipeline::run(&results, rules, fallbacks)
}
