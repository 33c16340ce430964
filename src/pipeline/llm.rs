//! Conversion client: send one document to the vision model, get text back.
//!
//! [`ExtractionService`] is the seam between the controller and the network.
//! Production code uses [`VisionExtractor`], which wraps an
//! `edgequake_llm` provider; tests substitute their own implementation.
//!
//! The call is single-shot: no retry, no streaming, no partial result. Any
//! provider error is logged in full and surfaced as
//! [`DocuError::ExtractionFailed`], whose user-facing rendering is one
//! generic localised message.

use crate::config::ConversionConfig;
use crate::error::DocuError;
use crate::file::CanonicalFile;
use crate::messages::{self, Locale};
use crate::pipeline::postprocess;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Text extracted from one document, already sanitised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Anything that can turn a [`CanonicalFile`] into text.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Perform exactly one extraction request for `file`.
    async fn extract(&self, file: &CanonicalFile) -> Result<Extraction, DocuError>;
}

/// [`ExtractionService`] backed by a multimodal LLM provider.
pub struct VisionExtractor {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    options: CompletionOptions,
    locale: Locale,
}

impl VisionExtractor {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ConversionConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            options: build_options(config),
            locale: config.locale,
        }
    }
}

#[async_trait]
impl ExtractionService for VisionExtractor {
    /// ## Message Layout
    ///
    /// 1. **System message** — the conversion rules (or the configured override)
    /// 2. **User message** — the document as inline data (MIME + base64),
    ///    with empty text: the attachment carries all the content.
    async fn extract(&self, file: &CanonicalFile) -> Result<Extraction, DocuError> {
        let start = Instant::now();
        info!(
            "Sending '{}' ({}, {} bytes) for extraction",
            file.name(),
            file.mime_type(),
            file.size()
        );

        let messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user_with_images("", vec![inline_data(file)]),
        ];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| {
                error!("Extraction service error for '{}': {}", file.name(), e);
                DocuError::ExtractionFailed {
                    detail: e.to_string(),
                }
            })?;

        let duration = start.elapsed();
        debug!(
            "'{}': {} input tokens, {} output tokens, {:?}",
            file.name(),
            response.prompt_tokens,
            response.completion_tokens,
            duration
        );

        Ok(Extraction {
            text: finish_text(&response.content, self.locale),
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
            duration_ms: duration.as_millis() as u64,
        })
    }
}

/// Wrap the file as provider inline data.
///
/// Images ask for the high-detail tiling; PDFs are passed through as-is.
fn inline_data(file: &CanonicalFile) -> ImageData {
    let data = ImageData::new(file.data().to_string(), file.mime_type().as_str());
    if file.mime_type().is_image() {
        data.with_detail("high")
    } else {
        data
    }
}

/// Sanitise the raw response, substituting the fallback for empty output.
pub fn finish_text(raw: &str, locale: Locale) -> String {
    let cleaned = postprocess::sanitize_response(raw);
    if cleaned.is_empty() {
        messages::empty_extraction(locale).to_string()
    } else {
        cleaned
    }
}

/// Build `CompletionOptions` from the conversion config.
fn build_options(config: &ConversionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
