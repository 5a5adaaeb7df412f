//! One-shot scan entry points.
//!
//! These wrap a throwaway [`ScanSession`] for callers that just want
//! records out of an image and don't need to observe the state machine.
//! Use the session directly when you need status, reset, or exports tied
//! to held results.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::output::ScanOutput;
use crate::session::ScanSession;
use std::path::Path;

/// Scan a business-card image file.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — path to an image file (JPEG or PNG)
/// * `config` — scan configuration
///
/// # Errors
/// Any [`ScanError`]: decode failures from preparation, credential /
/// transport / response failures from the extraction call.
pub async fn scan(
    input: impl AsRef<Path>,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    let mut session = ScanSession::new(config.clone());
    let stats = session.process_file(input).await?;
    Ok(ScanOutput {
        contacts: session.take_contacts(),
        stats,
    })
}

/// Scan image bytes already in memory (an upload body, a camera frame).
pub async fn scan_from_bytes(
    bytes: &[u8],
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    let mut session = ScanSession::new(config.clone());
    let stats = session.process_bytes(bytes.to_vec()).await?;
    Ok(ScanOutput {
        contacts: session.take_contacts(),
        stats,
    })
}

/// Synchronous wrapper around [`scan`].
///
/// Creates a temporary tokio runtime internally.
pub fn scan_sync(
    input: impl AsRef<Path>,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScanError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(scan(input, config))
}
