//! Progress reporting: callback trait and the advisory ticker.
//!
//! Inject an [`Arc<dyn ScanProgressCallback>`] via
//! [`crate::config::ScanConfigBuilder::progress_callback`] to receive events
//! as the pipeline moves through its stages.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, or a terminal progress bar
//! without the library knowing how the host application communicates. The
//! trait is `Send + Sync` because the ticker fires from a spawned task.
//!
//! # The ticker is advisory
//!
//! The extraction call is a single unsplittable remote operation, so there is
//! no real intermediate progress to report while it runs. [`ProgressTicker`]
//! advances a percentage on a fixed interval purely for user feedback,
//! clamped below 100; only confirmed completion moves the state to 100. The
//! ticker is deliberately decoupled from the completion signal so tests can
//! assert on real completion without timing dependencies.

use crate::state::ScanStatus;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often the advisory ticker advances during the Analyzing stage.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);
/// How much the advisory percentage grows per tick.
pub const TICK_STEP: u8 = 5;
/// The ticker never advances past this; 100 is reserved for real completion.
pub const TICK_CEILING: u8 = 90;

/// Called by the pipeline as a scan progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `on_progress` may fire from a spawned task while
/// the extraction call is in flight.
pub trait ScanProgressCallback: Send + Sync {
    /// A new pipeline stage was entered.
    fn on_stage(&self, status: ScanStatus, message: &str) {
        let _ = (status, message);
    }

    /// The advisory percentage changed (0–100).
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// The scan finished with the given number of records.
    fn on_complete(&self, cards: usize) {
        let _ = cards;
    }

    /// The scan aborted with a human-readable message.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ScanProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type ProgressCallback = Arc<dyn ScanProgressCallback>;

/// A cancellable fixed-interval ticker for the Analyzing stage.
///
/// Starts at the stage's entry percentage and steps by [`TICK_STEP`] every
/// [`TICK_INTERVAL`], clamped at [`TICK_CEILING`]. Dropping the ticker (or
/// calling [`finish`](ProgressTicker::finish)) aborts the task; the spawned
/// task never outlives the extraction call it decorates.
pub struct ProgressTicker {
    value: Arc<AtomicU8>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Start a ticker with the default interval/step/ceiling.
    pub fn start(from: u8, callback: Option<ProgressCallback>) -> Self {
        Self::start_with(from, TICK_INTERVAL, TICK_STEP, TICK_CEILING, callback)
    }

    /// Start a ticker with explicit parameters (tests use short intervals).
    pub fn start_with(
        from: u8,
        interval: Duration,
        step: u8,
        ceiling: u8,
        callback: Option<ProgressCallback>,
    ) -> Self {
        let value = Arc::new(AtomicU8::new(from));
        let shared = Arc::clone(&value);

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            // The first tick of a tokio interval completes immediately;
            // consume it so the first increment lands after one full period.
            timer.tick().await;
            loop {
                timer.tick().await;
                let current = shared.load(Ordering::Relaxed);
                if current >= ceiling {
                    continue;
                }
                let next = current.saturating_add(step).min(ceiling);
                shared.store(next, Ordering::Relaxed);
                if let Some(ref cb) = callback {
                    cb.on_progress(next);
                }
            }
        });

        Self { value, handle }
    }

    /// The current advisory percentage.
    pub fn progress(&self) -> u8 {
        self.value.load(Ordering::Relaxed)
    }

    /// Stop the ticker. The percentage freezes at its last value; the caller
    /// reports 100 (or an error) through the state machine, not through here.
    pub fn finish(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
