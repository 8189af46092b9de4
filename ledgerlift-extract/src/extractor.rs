//! Extraction seam: anything that turns one statement file into raw rows.

use async_trait::async_trait;
use ledgerlift_core::RawExtractionResult;
use ledgerlift_ingest::SourceDocument;

use crate::error::Result;

/// One call per uploaded document.
///
/// Implementations must fail (not return an empty success) when the model
/// gives back no usable text or no transaction list.
#[async_trait]
pub trait StatementExtractor: Send + Sync {
    async fn extract(&self, doc: &SourceDocument) -> Result<RawExtractionResult>;
}
