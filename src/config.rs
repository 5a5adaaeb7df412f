//! Configuration for a scan.
//!
//! All behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. The API key is an explicit configuration value:
//! the library never reads ambient process state, so tests and embedders
//! stay in full control of credentials. The CLI is the one place that maps
//! `GEMINI_API_KEY` into this struct.

use crate::error::ScanError;
use crate::pipeline::extract::ContactExtractor;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default extraction model. Pro-tier handles dense multi-card layouts
/// noticeably better than the flash tier.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default extraction service endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default internal-reasoning allowance for the extraction call. A small
/// budget lets the model reason about card layout without inflating latency.
pub const DEFAULT_THINKING_BUDGET: u32 = 1024;

/// Configuration for a business-card scan.
///
/// # Example
/// ```rust
/// use cardscan::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-3-pro-preview")
///     .api_timeout_secs(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// API key for the extraction service. `None` (or empty) makes the
    /// extraction stage fail with [`ScanError::AuthError`] before any
    /// network call is attempted.
    pub api_key: Option<String>,

    /// Extraction model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Service endpoint root. Default: [`DEFAULT_BASE_URL`]. Overridable so
    /// tests can point the extractor at a local mock server.
    pub base_url: String,

    /// Internal-reasoning token allowance for the extraction call.
    /// Default: [`DEFAULT_THINKING_BUDGET`].
    pub thinking_budget: u32,

    /// Per-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Pre-constructed extractor. Takes precedence over the built-in
    /// service client; the injection seam for tests and custom backends.
    pub extractor: Option<Arc<dyn ContactExtractor>>,

    /// Progress callback. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            api_timeout_secs: 60,
            extractor: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("thinking_budget", &self.thinking_budget)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn ContactExtractor>"))
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn thinking_budget(mut self, tokens: u32) -> Self {
        self.config.thinking_budget = tokens;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn ContactExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ScanError::InvalidConfig("model must not be empty".into()));
        }
        if c.base_url.trim().is_empty() {
            return Err(ScanError::InvalidConfig("base_url must not be empty".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(ScanError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::builder().build().unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.thinking_budget, DEFAULT_THINKING_BUDGET);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = ScanConfig::builder().model("  ").build().unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ScanConfig::builder().api_timeout_secs(0).build().unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ScanConfig::builder().api_key("secret-key").build().unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
