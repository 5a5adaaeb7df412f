//! Output types returned by a completed scan.

use crate::contact::ContactRecord;
use serde::{Deserialize, Serialize};

/// The result of a successful scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    /// Ordered record list, one entry per detected card. May be empty when
    /// the service found no cards in the image.
    pub contacts: Vec<ContactRecord>,
    /// Timing and sizing figures for the run.
    pub stats: ScanStats,
}

/// Timing and sizing figures for one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Source image dimensions before preparation.
    pub source_width: u32,
    pub source_height: u32,
    /// Prepared image dimensions actually sent to the service.
    pub prepared_width: u32,
    pub prepared_height: u32,
    /// JPEG payload size in bytes (before base64 expansion).
    pub payload_bytes: usize,
    /// Wall-clock duration of the preparation stage.
    pub compress_duration_ms: u64,
    /// Wall-clock duration of the extraction call.
    pub extract_duration_ms: u64,
    /// Total scan duration.
    pub total_duration_ms: u64,
    /// Number of records extracted.
    pub cards_found: usize,
}
