//! The scan status state machine.
//!
//! The status enum drives which view a host application shows and, more
//! importantly, enforces the single-active-scan rule: a new capture is only
//! accepted while no pipeline is in flight. The transition function is pure
//! (`&self` in, new state out), so the machine is testable without any
//! rendering layer or async runtime.
//!
//! ## Transitions
//!
//! ```text
//! Idle ──FileSelected──▶ Compressing ──ImagePrepared──▶ Analyzing
//!                            │                             │
//!                            │ Failed                      ├─ ExtractionFinished ──▶ Success
//!                            ▼                             │
//!                          Error ◀────── Failed ───────────┘
//!
//! Error ──FileSelected──▶ Compressing          (the "Try Again" path)
//! Error | Success ──Reset──▶ Idle              (the "Go Home" path)
//! ```
//!
//! Any event not listed for the current status leaves the state unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress value shown on entering the Compressing stage.
pub const COMPRESSING_PROGRESS: u8 = 20;
/// Progress value shown on entering the Analyzing stage.
pub const ANALYZING_PROGRESS: u8 = 50;

/// The single active status of a scan. Strictly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// No scan started, or a previous scan was reset.
    Idle,
    /// The source image is being decoded, downscaled, and re-encoded.
    Compressing,
    /// The extraction call is in flight.
    Analyzing,
    /// The extraction call returned a record list.
    Success,
    /// The pipeline aborted; a human-readable message is carried in the state.
    Error,
}

impl ScanStatus {
    /// True while a pipeline stage is running (Compressing or Analyzing).
    pub fn in_flight(self) -> bool {
        matches!(self, ScanStatus::Compressing | ScanStatus::Analyzing)
    }

    /// True for the two resting end states.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Success | ScanStatus::Error)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanStatus::Idle => "idle",
            ScanStatus::Compressing => "compressing",
            ScanStatus::Analyzing => "analyzing",
            ScanStatus::Success => "success",
            ScanStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Events that drive the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The user selected an image to scan.
    FileSelected,
    /// Image preparation finished; the extraction call is about to start.
    ImagePrepared,
    /// The extraction call returned the given number of records.
    ExtractionFinished(usize),
    /// A pipeline stage failed with a human-readable message.
    Failed(String),
    /// Return to Idle, discarding results.
    Reset,
}

/// The full observable scan state: status, user-facing message, and the
/// advisory progress percentage (0–100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    pub status: ScanStatus,
    pub message: String,
    pub progress: u8,
}

impl ScanState {
    /// The initial state.
    pub fn idle() -> Self {
        Self {
            status: ScanStatus::Idle,
            message: String::new(),
            progress: 0,
        }
    }

    /// Apply an event, returning the next state.
    ///
    /// Invalid (status, event) pairs return the current state unchanged; in
    /// particular `FileSelected` is ignored while a scan is in flight, which
    /// is what enforces the single-active-scan rule.
    pub fn apply(&self, event: &ScanEvent) -> ScanState {
        match (self.status, event) {
            (ScanStatus::Idle | ScanStatus::Error, ScanEvent::FileSelected) => ScanState {
                status: ScanStatus::Compressing,
                message: "Optimizing image for analysis...".into(),
                progress: COMPRESSING_PROGRESS,
            },
            (ScanStatus::Compressing, ScanEvent::ImagePrepared) => ScanState {
                status: ScanStatus::Analyzing,
                message: "Identifying contacts and extracting details...".into(),
                progress: ANALYZING_PROGRESS,
            },
            (ScanStatus::Analyzing, ScanEvent::ExtractionFinished(count)) => ScanState {
                status: ScanStatus::Success,
                message: format!(
                    "Found {count} business card{}.",
                    if *count == 1 { "" } else { "s" }
                ),
                progress: 100,
            },
            (status, ScanEvent::Failed(message)) if !status.is_terminal() => ScanState {
                status: ScanStatus::Error,
                message: message.clone(),
                progress: 0,
            },
            (ScanStatus::Success | ScanStatus::Error | ScanStatus::Idle, ScanEvent::Reset) => {
                ScanState::idle()
            }
            _ => self.clone(),
        }
    }

    /// Replace the advisory progress value, clamped to 0–100.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::idle()
    }
}
