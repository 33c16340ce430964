//! One-call conversion entry points and provider wiring.
//!
//! [`build_controller`] is what an interactive front end uses: it resolves
//! the provider once at start-up and hands back an [`AppController`]. The
//! free functions below are for batch callers that want "source in, text
//! out" without managing state.

use crate::config::{ConversionConfig, DEFAULT_PROVIDER};
use crate::controller::AppController;
use crate::error::DocuError;
use crate::pipeline::input::{self, IntakeSource};
use crate::pipeline::llm::{Extraction, ExtractionService, VisionExtractor};
use crate::presenter::{FsDownloadSink, ResultPresenter};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Convert one document source to text.
///
/// # Arguments
/// * `source` — where the document comes from (path, dropped bytes, paste, URL)
/// * `config` — conversion configuration
///
/// # Errors
/// Intake errors (unsupported type, too large, download failures), a missing
/// provider, or [`DocuError::ExtractionFailed`]. An empty model answer is not
/// an error: the text is the localised fallback.
pub async fn convert(
    source: IntakeSource,
    config: &ConversionConfig,
) -> Result<Extraction, DocuError> {
    let total_start = Instant::now();

    // ── Step 1: Provider (fails fast before any download) ────────────────
    let provider = resolve_provider(config)?;

    // ── Step 2: Intake ───────────────────────────────────────────────────
    let file = input::intake(source, config).await?;

    // ── Step 3: Extract ──────────────────────────────────────────────────
    let extractor = VisionExtractor::new(provider, config);
    let extraction = extractor.extract(&file).await?;

    info!(
        "Converted '{}' in {:.1}s ({} chars)",
        file.name(),
        total_start.elapsed().as_secs_f64(),
        extraction.text.len()
    );
    Ok(extraction)
}

/// Convert a path or URL string and write the Markdown to `output_path`.
///
/// The write is atomic: a temporary file in the same directory is renamed
/// over the target.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<Extraction, DocuError> {
    let extraction = convert(input::resolve_source(input_str.as_ref()), config).await?;
    let path = output_path.as_ref();

    let mut presenter = ResultPresenter::new(config.locale);
    presenter.set_content(&extraction.text);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DocuError::InvalidConfig(format!("not a file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    presenter.export_markdown_as(&FsDownloadSink::new(dir), &file_name)?;
    Ok(extraction)
}

/// Convert in-memory bytes, e.g. from a database or an upload handler.
///
/// `name` supplies the extension used to determine the type; without a
/// recognised extension the content signature decides.
pub async fn convert_from_bytes(
    name: &str,
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<Extraction, DocuError> {
    let source = IntakeSource::Dropped {
        name: name.to_string(),
        mime: None,
        bytes: bytes.to_vec(),
    };
    convert(source, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: IntakeSource,
    config: &ConversionConfig,
) -> Result<Extraction, DocuError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocuError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(source, config))
}

/// Resolve the provider and build a controller around it.
///
/// Provider problems surface here, at start-up, rather than on the first
/// conversion.
pub fn build_controller(config: &ConversionConfig) -> Result<AppController, DocuError> {
    let provider = resolve_provider(config)?;
    debug!(
        "Provider resolved (requested: {:?}, model: {})",
        config.provider_name,
        config.model_or_default()
    );
    let service = Arc::new(VisionExtractor::new(provider, config));
    Ok(AppController::new(service, config.locale))
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is.
/// 2. **Named provider** (`config.provider_name`) with the configured model
///    or [`crate::config::DEFAULT_MODEL`]. The factory reads that
///    provider's API key from the environment.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`),
///    both non-empty.
/// 4. **`GEMINI_API_KEY`** present → Gemini with the configured model.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_provider(config: &ConversionConfig) -> Result<Arc<dyn LLMProvider>, DocuError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        return create_vision_provider(name, config.model_or_default());
    }

    // 3) Honour EDGEQUAKE_LLM_PROVIDER + EDGEQUAKE_MODEL when both set
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    // 4) The default service
    if std::env::var("GEMINI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_vision_provider(DEFAULT_PROVIDER, config.model_or_default());
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| DocuError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, or pass --provider with that provider's API key set.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, DocuError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        DocuError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_named_provider_is_not_configured() {
        let config = ConversionConfig::builder()
            .provider_name("no-such-provider")
            .build()
            .unwrap();
        match resolve_provider(&config) {
            Err(DocuError::ProviderNotConfigured { provider, .. }) => {
                assert_eq!(provider, "no-such-provider")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unknown provider resolved"),
        }
    }

    #[tokio::test]
    async fn provider_failure_precedes_intake() {
        let config = ConversionConfig::builder()
            .provider_name("no-such-provider")
            .build()
            .unwrap();
        let source = IntakeSource::Path("/definitely/missing.png".into());
        let err = convert(source, &config).await.unwrap_err();
        assert!(matches!(err, DocuError::ProviderNotConfigured { .. }));
    }
}
