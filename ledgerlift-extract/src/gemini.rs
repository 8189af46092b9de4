//! Gemini document-understanding client.
//!
//! Sends the statement PDF inline with a structured-output schema and parses
//! the JSON reply into a `RawExtractionResult`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ledgerlift_core::RawExtractionResult;
use ledgerlift_ingest::{preprocess, SourceDocument};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

use crate::error::{ExtractError, Result};
use crate::extractor::StatementExtractor;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const EXTRACTION_PROMPT: &str = "TASK: Extract every single transaction row from this bank statement PDF.
Return the data as a JSON object with keys: bankName, currency, and transactions.
Each transaction row MUST have:
- date (YYYY-MM-DD)
- description
- amount (numerical positive value)
- type (\"INFLOW\" or \"OUTFLOW\")
- category (a simple spending category)";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Run PDF trimming before upload
    pub preprocess: bool,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            preprocess: true,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Reusable, connection-pooled extractor
pub struct GeminiExtractor {
    client: Client,
    config: GeminiConfig,
}

impl GeminiExtractor {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ExtractError::MissingApiKey);
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self { client, config })
    }

    async fn prepare(&self, doc: &SourceDocument) -> Result<SourceDocument> {
        if !self.config.preprocess {
            return Ok(doc.clone());
        }
        let owned = doc.clone();
        tokio::task::spawn_blocking(move || preprocess(&owned))
            .await
            .map_err(|e| ExtractError::Preprocess(e.to_string()))
    }
}

#[async_trait]
impl StatementExtractor for GeminiExtractor {
    async fn extract(&self, doc: &SourceDocument) -> Result<RawExtractionResult> {
        let prepared = self.prepare(doc).await?;
        let request = build_request(&prepared);

        info!(file = %doc.name, model = %self.config.model, bytes = prepared.bytes.len(), "Calling Gemini API");

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(file = %doc.name, "Gemini API request failed: {}", e);
                ExtractError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(file = %doc.name, "Gemini API error response: {}", body);
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GeminiResponse = response.json().await?;
        let text = reply.text().ok_or(ExtractError::EmptyResponse)?;
        let raw = parse_extraction(&text)?;

        info!(file = %doc.name, transactions = raw.transactions.len(), "Gemini extraction complete");
        Ok(raw)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate, if any
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

fn build_request(doc: &SourceDocument) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: Some(EXTRACTION_PROMPT.to_string()),
                    ..Part::default()
                },
                Part {
                    inline_data: Some(InlineData {
                        mime_type: doc.mime_type.clone(),
                        data: STANDARD.encode(&doc.bytes),
                    }),
                    ..Part::default()
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "bankName": { "type": "STRING" },
            "currency": { "type": "STRING" },
            "transactions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "amount": { "type": "NUMBER" },
                        "type": { "type": "STRING", "enum": ["INFLOW", "OUTFLOW"] },
                        "category": { "type": "STRING" }
                    },
                    "required": ["date", "description", "amount", "type"]
                }
            }
        },
        "required": ["transactions"]
    })
}

/// Parse the model's JSON text. A missing or non-array `transactions` is a
/// failure; an empty array is passed on (the batch decides about emptiness).
pub fn parse_extraction(text: &str) -> Result<RawExtractionResult> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if cleaned.is_empty() {
        return Err(ExtractError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ExtractError::Parse(format!("{} | raw={}", e, text)))?;

    raw_result_from_value(value)
}

/// Convert one decoded extraction object. Fails with `NoTransactions` unless
/// it carries a `transactions` array.
pub fn raw_result_from_value(value: Value) -> Result<RawExtractionResult> {
    match value.get("transactions") {
        Some(Value::Array(_)) => {}
        _ => return Err(ExtractError::NoTransactions),
    }

    serde_json::from_value(value).map_err(|e| ExtractError::Parse(e.to_string()))
}
