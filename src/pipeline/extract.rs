//! The extraction call: one structured-output request to the VLM service.
//!
//! This module converts a prepared card image into contact records via a
//! single `generateContent` call. All prompt and schema content lives in
//! [`crate::prompts`] so it can change without touching the transport or
//! error-mapping logic here.
//!
//! ## No retries
//!
//! The call is atomic from the caller's perspective: it either yields the
//! full record list or fails with one of the errors below. Retry/backoff
//! policy belongs to the caller — a scan is user-initiated and the UI's
//! "Try Again" is the retry loop.
//!
//! ## Failure order
//!
//! 1. [`ScanError::AuthError`] — no credential; raised at construction,
//!    before any network I/O
//! 2. [`ScanError::ProviderError`] — transport failure or non-success status
//! 3. [`ScanError::EmptyResponse`] — a well-formed envelope with no text
//! 4. [`ScanError::SchemaParse`] — text that is not a contact array

use crate::config::ScanConfig;
use crate::contact::ContactRecord;
use crate::error::ScanError;
use crate::pipeline::prepare::PreparedImage;
use crate::prompts::{response_schema, EXTRACTION_INSTRUCTION};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The seam between the pipeline and the extraction backend.
///
/// The production implementation is [`GeminiExtractor`]; tests inject a mock
/// via [`crate::config::ScanConfigBuilder::extractor`].
#[async_trait]
pub trait ContactExtractor: Send + Sync {
    /// Turn a prepared card image into an ordered list of contact records,
    /// one per detected card. Zero records is a valid outcome.
    async fn extract(&self, image: &PreparedImage) -> Result<Vec<ContactRecord>, ScanError>;
}

/// Extraction client for the Gemini `generateContent` API.
#[derive(Debug)]
pub struct GeminiExtractor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    thinking_budget: u32,
}

impl GeminiExtractor {
    /// Build a client from the scan configuration.
    ///
    /// Fails with [`ScanError::AuthError`] when no API key is configured —
    /// the credential check happens here, before any request is formed.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(ScanError::AuthError),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| ScanError::Internal(format!("HTTP client construction failed: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            thinking_budget: config.thinking_budget,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContactExtractor for GeminiExtractor {
    async fn extract(&self, image: &PreparedImage) -> Result<Vec<ContactRecord>, ScanError> {
        let request = GenerateContentRequest::for_image(image, self.thinking_budget);
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScanError::ProviderError {
                        detail: "request timed out".into(),
                    }
                } else {
                    ScanError::ProviderError {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ScanError::ProviderError {
            detail: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            warn!("Extraction call failed: HTTP {} ({} bytes)", status, body.len());
            return Err(ScanError::ProviderError {
                detail: format!("HTTP {}: {}", status, excerpt(&body)),
            });
        }

        if body.trim().is_empty() {
            return Err(ScanError::EmptyResponse);
        }

        let records = parse_response(&body)?;
        debug!(
            "Extracted {} record(s) in {:?}",
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }
}

/// Parse a successful `generateContent` body into contact records.
///
/// Kept separate from the transport so the response contract is unit-testable
/// without a live service.
pub fn parse_response(body: &str) -> Result<Vec<ContactRecord>, ScanError> {
    let envelope: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ScanError::SchemaParse {
            detail: format!("response envelope: {e}"),
        })?;

    let text: String = envelope
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ScanError::EmptyResponse);
    }

    serde_json::from_str(&text).map_err(|e| ScanError::SchemaParse {
        detail: e.to_string(),
    })
}

/// First 300 bytes of an error body, on a char boundary.
fn excerpt(body: &str) -> &str {
    let mut end = body.len().min(300);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn for_image(image: &'a PreparedImage, thinking_budget: u32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: image.mime_type,
                            data: &image.data,
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(EXTRACTION_INSTRUCTION),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                thinking_config: ThinkingConfig {
                    thinking_budget,
                },
            },
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
