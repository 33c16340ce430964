//! Configuration types for document conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The config is resolved once at start-up
//! and shared read-only afterwards; the extraction provider in particular is
//! resolved eagerly (see [`crate::convert::resolve_provider`]) so a missing
//! API key is reported before any file is touched.

use crate::error::DocuError;
use crate::messages::Locale;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default vision provider when nothing else is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Default model for [`DEFAULT_PROVIDER`].
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 20 MiB: the inline-data ceiling of the hosted vision APIs.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Configuration for a document conversion.
///
/// # Example
/// ```rust
/// use docuconvert::{ConversionConfig, Locale};
///
/// let config = ConversionConfig::builder()
///     .model("gemini-2.5-flash")
///     .locale(Locale::Vietnamese)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// LLM model identifier. If None, [`DEFAULT_MODEL`] is used.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "anthropic").
    /// If None along with `provider`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the completion. Default: 0.1.
    ///
    /// Transcription wants the model faithful to the page, not creative.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// A whole multi-page PDF goes out in one request, so the budget is
    /// larger than a per-page one would be.
    pub max_tokens: usize,

    /// Custom instruction text. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Language of user-facing messages. Default: English.
    pub locale: Locale,

    /// Timeout for remote URL downloads in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Largest accepted payload in bytes, for every intake source. Default: 20 MiB.
    pub max_file_bytes: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 8192,
            system_prompt: None,
            locale: Locale::default(),
            download_timeout_secs: 120,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("locale", &self.locale)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_file_bytes", &self.max_file_bytes)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Model to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, DocuError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(DocuError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.max_file_bytes == 0 {
            return Err(DocuError::InvalidConfig(
                "max_file_bytes must be ≥ 1".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(DocuError::InvalidConfig(
                "download timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref p) = c.system_prompt {
            if p.trim().is_empty() {
                return Err(DocuError::InvalidConfig(
                    "system prompt must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.model_or_default(), DEFAULT_MODEL);
        assert_eq!(c.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(c.locale, Locale::English);
        assert!(c.provider.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ConversionConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = ConversionConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(ConversionConfig::builder().max_tokens(0).build().is_err());
        assert!(ConversionConfig::builder().max_file_bytes(0).build().is_err());
        assert!(ConversionConfig::builder()
            .download_timeout_secs(0)
            .build()
            .is_err());
    }

    #[test]
    fn blank_system_prompt_is_rejected() {
        let err = ConversionConfig::builder()
            .system_prompt("   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, DocuError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_prompt_text() {
        let c = ConversionConfig::builder()
            .system_prompt("very long secret prompt")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret"));
    }
}
