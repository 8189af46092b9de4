//! Per-document extraction failures

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Gemini API error: {status} {body}")]
    Api { status: u16, body: String },

    #[error("the model failed to return any text response")]
    EmptyResponse,

    #[error("no transactions found in the model response")]
    NoTransactions,

    #[error("could not parse model response: {0}")]
    Parse(String),

    #[error("preprocessing task failed: {0}")]
    Preprocess(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
