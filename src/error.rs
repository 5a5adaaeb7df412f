//! Error types for the cardscan library.
//!
//! A scan either completes with a full record list or fails as a whole: the
//! pipeline is a single image through a single extraction call, so there is
//! no per-item partial failure to track. [`ScanError`] is therefore the one
//! error type, returned by every fallible operation in the crate.
//!
//! The variants follow the pipeline stages: decode failures from image
//! preparation, credential/transport/response failures from the extraction
//! call, and write failures from export. None of them are retried by the
//! library — the caller decides whether to re-initiate the scan.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the cardscan library.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Image preparation errors ──────────────────────────────────────────
    /// The source file could not be read or decoded as an image.
    #[error("Could not decode '{path}' as an image: {detail}\nSupported formats: JPEG, PNG.")]
    DecodeError { path: PathBuf, detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// No API key was configured. Raised before any network call is made.
    #[error(
        "No API key configured for the extraction service.\n\
         Set GEMINI_API_KEY or pass a key via ScanConfig::builder().api_key(...)."
    )]
    AuthError,

    /// The extraction service call itself failed (transport error or
    /// non-success HTTP status).
    #[error("Extraction service call failed: {detail}")]
    ProviderError { detail: String },

    /// The service responded but returned no candidate text.
    #[error("Extraction service returned no content")]
    EmptyResponse,

    /// The response body did not parse as the declared contact schema.
    #[error("Extraction response did not match the contact schema: {detail}")]
    SchemaParse { detail: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// Could not create or write an export file.
    #[error("Failed to write export file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// True for errors raised by the extraction stage, as opposed to image
    /// preparation or export.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            ScanError::AuthError
                | ScanError::ProviderError { .. }
                | ScanError::EmptyResponse
                | ScanError::SchemaParse { .. }
        )
    }
}
