//! A scan session: the state machine wired to the pipeline.
//!
//! [`ScanSession`] owns the [`ScanState`] and the in-memory record list and
//! drives both through a scan: Compressing while the image is prepared,
//! Analyzing while the extraction call is in flight (with the advisory
//! ticker running), then Success or Error. At most one scan runs at a time;
//! a second `process_*` call while one is in flight is rejected without
//! touching the running pipeline.
//!
//! Records live for the session and are discarded on [`reset`](ScanSession::reset)
//! or at the start of the next scan. Exports read whatever the session
//! currently holds.

use crate::config::ScanConfig;
use crate::contact::ContactRecord;
use crate::error::ScanError;
use crate::export::save;
use crate::output::ScanStats;
use crate::pipeline::extract::{ContactExtractor, GeminiExtractor};
use crate::pipeline::prepare;
use crate::progress::ProgressTicker;
use crate::state::{ScanEvent, ScanState, ScanStatus};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

enum ScanInput {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// A single-user scan session holding state and results in memory.
pub struct ScanSession {
    config: ScanConfig,
    state: ScanState,
    contacts: Vec<ContactRecord>,
}

impl ScanSession {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            state: ScanState::idle(),
            contacts: Vec::new(),
        }
    }

    /// The current observable state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Shorthand for `self.state().status`.
    pub fn status(&self) -> ScanStatus {
        self.state.status
    }

    /// The records extracted by the most recent successful scan.
    pub fn contacts(&self) -> &[ContactRecord] {
        &self.contacts
    }

    /// Move the record list out of the session, leaving it empty.
    pub fn take_contacts(&mut self) -> Vec<ContactRecord> {
        std::mem::take(&mut self.contacts)
    }

    /// Scan an image file.
    pub async fn process_file(&mut self, path: impl AsRef<Path>) -> Result<ScanStats, ScanError> {
        self.process(ScanInput::File(path.as_ref().to_path_buf()))
            .await
    }

    /// Scan in-memory image bytes.
    pub async fn process_bytes(&mut self, bytes: Vec<u8>) -> Result<ScanStats, ScanError> {
        self.process(ScanInput::Bytes(bytes)).await
    }

    /// Return to Idle, discarding any held records.
    pub fn reset(&mut self) {
        self.contacts.clear();
        self.dispatch(ScanEvent::Reset);
    }

    /// Save the tabular export under `dir`; returns the path written.
    pub async fn save_csv(&self, dir: &Path) -> Result<PathBuf, ScanError> {
        save::save_csv(&self.contacts, dir).await
    }

    /// Save the contact-card export under `dir`; returns the path written.
    pub async fn save_vcard(&self, dir: &Path) -> Result<PathBuf, ScanError> {
        save::save_vcard(&self.contacts, dir).await
    }

    /// Save one record (0-indexed) as a per-person vCard under `dir`.
    pub async fn save_single_vcard(
        &self,
        index: usize,
        dir: &Path,
    ) -> Result<PathBuf, ScanError> {
        let contact = self.contacts.get(index).ok_or_else(|| {
            ScanError::Internal(format!(
                "no contact at index {index} (session holds {})",
                self.contacts.len()
            ))
        })?;
        save::save_single_vcard(contact, dir).await
    }

    // ── Pipeline ─────────────────────────────────────────────────────────

    async fn process(&mut self, input: ScanInput) -> Result<ScanStats, ScanError> {
        if self.status().in_flight() {
            return Err(ScanError::Internal("a scan is already in progress".into()));
        }
        // A finished session restarts cleanly: Success resets before the new
        // scan, while Error re-enters directly (the "Try Again" path).
        if self.status() == ScanStatus::Success {
            self.dispatch(ScanEvent::Reset);
        }

        let total_start = Instant::now();
        self.contacts.clear();
        self.dispatch(ScanEvent::FileSelected);

        match self.run_pipeline(input, total_start).await {
            Ok((records, stats)) => {
                let count = records.len();
                self.contacts = records;
                self.dispatch(ScanEvent::ExtractionFinished(count));
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_complete(count);
                }
                info!("Scan complete: {} card(s) in {}ms", count, stats.total_duration_ms);
                Ok(stats)
            }
            Err(e) => {
                let message = e.to_string();
                self.dispatch(ScanEvent::Failed(message.clone()));
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_error(&message);
                }
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &mut self,
        input: ScanInput,
        total_start: Instant,
    ) -> Result<(Vec<ContactRecord>, ScanStats), ScanError> {
        // ── Stage 1: image preparation ───────────────────────────────────
        let compress_start = Instant::now();
        let prepared = match input {
            ScanInput::File(path) => prepare::prepare_file(&path).await?,
            ScanInput::Bytes(bytes) => prepare::prepare_bytes(bytes, "<memory>").await?,
        };
        let compress_duration_ms = compress_start.elapsed().as_millis() as u64;

        self.dispatch(ScanEvent::ImagePrepared);

        // ── Stage 2: extraction call ─────────────────────────────────────
        // The credential check lives in the extractor constructor, so a
        // missing key fails here — before any network I/O.
        let extractor = self.resolve_extractor()?;

        let ticker = ProgressTicker::start(
            self.state.progress,
            self.config.progress_callback.clone(),
        );
        let extract_start = Instant::now();
        let result = extractor.extract(&prepared).await;
        ticker.finish();
        let records = result?;
        let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

        let stats = ScanStats {
            source_width: prepared.source_width,
            source_height: prepared.source_height,
            prepared_width: prepared.width,
            prepared_height: prepared.height,
            payload_bytes: prepared.encoded_len,
            compress_duration_ms,
            extract_duration_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            cards_found: records.len(),
        };

        Ok((records, stats))
    }

    /// Resolve the extractor: a pre-built one from config wins, otherwise
    /// the built-in service client (which requires an API key).
    fn resolve_extractor(&self) -> Result<Arc<dyn ContactExtractor>, ScanError> {
        if let Some(ref extractor) = self.config.extractor {
            return Ok(Arc::clone(extractor));
        }
        Ok(Arc::new(GeminiExtractor::from_config(&self.config)?))
    }

    /// Apply an event and forward the resulting state to the callback.
    fn dispatch(&mut self, event: ScanEvent) {
        let next = self.state.apply(&event);
        if next != self.state {
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_stage(next.status, &next.message);
                cb.on_progress(next.progress);
            }
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::ContactExtractor;
    use crate::pipeline::prepare::PreparedImage;
    use crate::progress::{ProgressCallback, ScanProgressCallback};
    use async_trait::async_trait;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    struct FixedExtractor {
        records: Vec<ContactRecord>,
    }

    #[async_trait]
    impl ContactExtractor for FixedExtractor {
        async fn extract(&self, _image: &PreparedImage) -> Result<Vec<ContactRecord>, ScanError> {
            Ok(self.records.clone())
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl ContactExtractor for FailingExtractor {
        async fn extract(&self, _image: &PreparedImage) -> Result<Vec<ContactRecord>, ScanError> {
            Err(ScanError::ProviderError {
                detail: "HTTP 503: overloaded".into(),
            })
        }
    }

    struct StageRecorder {
        stages: Mutex<Vec<ScanStatus>>,
    }

    impl ScanProgressCallback for StageRecorder {
        fn on_stage(&self, status: ScanStatus, _message: &str) {
            self.stages.lock().unwrap().push(status);
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn jane() -> ContactRecord {
        ContactRecord {
            full_name: "Jane Doe".into(),
            company: "Acme".into(),
            ..Default::default()
        }
    }

    fn config_with(extractor: Arc<dyn ContactExtractor>, cb: Option<ProgressCallback>) -> ScanConfig {
        let mut builder = ScanConfig::builder().extractor(extractor);
        if let Some(cb) = cb {
            builder = builder.progress_callback(cb);
        }
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn successful_scan_visits_every_stage_in_order() {
        let recorder = Arc::new(StageRecorder {
            stages: Mutex::new(Vec::new()),
        });
        let config = config_with(
            Arc::new(FixedExtractor { records: vec![jane()] }),
            Some(Arc::clone(&recorder) as ProgressCallback),
        );

        let mut session = ScanSession::new(config);
        let stats = session.process_bytes(png(2000, 1000)).await.unwrap();

        assert_eq!(session.status(), ScanStatus::Success);
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(stats.cards_found, 1);
        assert_eq!((stats.prepared_width, stats.prepared_height), (1024, 512));
        assert_eq!((stats.source_width, stats.source_height), (2000, 1000));

        assert_eq!(
            recorder.stages.lock().unwrap().clone(),
            vec![ScanStatus::Compressing, ScanStatus::Analyzing, ScanStatus::Success],
            "no stage may be skipped"
        );
    }

    #[tokio::test]
    async fn extraction_failure_lands_in_error_state() {
        let config = config_with(Arc::new(FailingExtractor), None);
        let mut session = ScanSession::new(config);

        let err = session.process_bytes(png(100, 100)).await.unwrap_err();
        assert!(matches!(err, ScanError::ProviderError { .. }));
        assert_eq!(session.status(), ScanStatus::Error);
        assert!(session.state().message.contains("503"));
        assert!(session.contacts().is_empty());
    }

    #[tokio::test]
    async fn decode_failure_errors_before_analyzing() {
        let recorder = Arc::new(StageRecorder {
            stages: Mutex::new(Vec::new()),
        });
        let config = config_with(
            Arc::new(FixedExtractor { records: vec![] }),
            Some(Arc::clone(&recorder) as ProgressCallback),
        );
        let mut session = ScanSession::new(config);

        let err = session.process_bytes(b"not an image".to_vec()).await.unwrap_err();
        assert!(matches!(err, ScanError::DecodeError { .. }));
        assert_eq!(
            recorder.stages.lock().unwrap().clone(),
            vec![ScanStatus::Compressing, ScanStatus::Error],
            "the extraction stage must never be entered"
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_with_auth_error() {
        // No extractor override and no key: the pipeline must fail at the
        // credential check, not at the network.
        let config = ScanConfig::builder().build().unwrap();
        let mut session = ScanSession::new(config);

        let err = session.process_bytes(png(50, 50)).await.unwrap_err();
        assert!(matches!(err, ScanError::AuthError));
        assert_eq!(session.status(), ScanStatus::Error);
    }

    #[tokio::test]
    async fn reset_clears_records_and_returns_to_idle() {
        let config = config_with(Arc::new(FixedExtractor { records: vec![jane()] }), None);
        let mut session = ScanSession::new(config);
        session.process_bytes(png(64, 64)).await.unwrap();
        assert_eq!(session.status(), ScanStatus::Success);

        session.reset();
        assert_eq!(session.status(), ScanStatus::Idle);
        assert!(session.contacts().is_empty());
        assert_eq!(session.state().progress, 0);
    }

    #[tokio::test]
    async fn new_scan_after_error_succeeds() {
        // "Try Again": a scan straight from the Error state, no reset needed.
        let config = config_with(Arc::new(FailingExtractor), None);
        let mut session = ScanSession::new(config);
        session.process_bytes(png(64, 64)).await.unwrap_err();
        assert_eq!(session.status(), ScanStatus::Error);

        session.config.extractor = Some(Arc::new(FixedExtractor { records: vec![jane()] }));
        session.process_bytes(png(64, 64)).await.unwrap();
        assert_eq!(session.status(), ScanStatus::Success);
        assert_eq!(session.contacts().len(), 1);
    }

    #[tokio::test]
    async fn second_scan_from_success_replaces_results() {
        let config = config_with(Arc::new(FixedExtractor { records: vec![jane()] }), None);
        let mut session = ScanSession::new(config);
        session.process_bytes(png(64, 64)).await.unwrap();
        assert_eq!(session.status(), ScanStatus::Success);

        session.config.extractor = Some(Arc::new(FixedExtractor {
            records: vec![jane(), jane()],
        }));
        session.process_bytes(png(64, 64)).await.unwrap();
        assert_eq!(session.status(), ScanStatus::Success);
        assert_eq!(session.contacts().len(), 2, "old results must be replaced");
    }

    #[tokio::test]
    async fn zero_cards_is_a_successful_scan() {
        let config = config_with(Arc::new(FixedExtractor { records: vec![] }), None);
        let mut session = ScanSession::new(config);
        let stats = session.process_bytes(png(64, 64)).await.unwrap();
        assert_eq!(session.status(), ScanStatus::Success);
        assert_eq!(stats.cards_found, 0);
    }

    #[tokio::test]
    async fn single_vcard_index_out_of_range_is_an_error() {
        let config = config_with(Arc::new(FixedExtractor { records: vec![jane()] }), None);
        let mut session = ScanSession::new(config);
        session.process_bytes(png(64, 64)).await.unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let err = session.save_single_vcard(5, dir.path()).await.unwrap_err();
        assert!(matches!(err, ScanError::Internal(_)));
    }
}
