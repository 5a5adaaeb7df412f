//! # cardscan
//!
//! Scan business-card images into digital contacts using Vision Language
//! Models (VLMs).
//!
//! ## Why this crate?
//!
//! Classical OCR struggles with business cards — decorative fonts, logos,
//! mixed orientations, and several cards in one photo defeat line-based text
//! extraction. Instead this crate compresses the photo and hands it to a VLM
//! with a declared output schema, letting the model read the card as a human
//! would and return clean, structured contact records ready for CSV and
//! vCard export.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image
//!  │
//!  ├─ 1. Prepare  decode, downscale to 1024 px, JPEG re-encode, base64
//!  ├─ 2. Extract  one structured-output call to the VLM (schema-constrained)
//!  └─ 3. Export   in-memory records → CSV / vCard 3.0 files on demand
//! ```
//!
//! Control flows forward through a status state machine
//! (`Idle → Compressing → Analyzing → Success | Error`); a scan either
//! yields the full record list or fails with a typed [`ScanError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardscan::{scan, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!     let output = scan("cards.jpg", &config).await?;
//!     for contact in &output.contacts {
//!         println!("{} — {}", contact.full_name, contact.company);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Hold results and export them via [`ScanSession`]:
//!
//! ```rust,no_run
//! use cardscan::{ScanConfig, ScanSession};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::builder().api_key("AIza...").build()?;
//! let mut session = ScanSession::new(config);
//! session.process_file("cards.jpg").await?;
//! session.save_csv(std::path::Path::new(".")).await?;
//! session.save_vcard(std::path::Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardscan` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! cardscan = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod contact;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod scan;
pub mod session;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScanConfig, ScanConfigBuilder, DEFAULT_MODEL};
pub use contact::ContactRecord;
pub use error::ScanError;
pub use output::{ScanOutput, ScanStats};
pub use pipeline::extract::{ContactExtractor, GeminiExtractor};
pub use pipeline::prepare::{PreparedImage, JPEG_QUALITY, MAX_WIDTH};
pub use progress::{NoopProgressCallback, ProgressCallback, ScanProgressCallback};
pub use scan::{scan, scan_from_bytes, scan_sync};
pub use session::ScanSession;
pub use state::{ScanEvent, ScanState, ScanStatus};
