//! Error types for the docuconvert library.
//!
//! Every failure is fatal for the current attempt: there is no retry and no
//! partial result, so a single enum covers intake, the extraction call, the
//! controller and the exporters.
//!
//! Two renderings exist for each error:
//!
//! * `Display` — developer diagnostics, English, may include the underlying
//!   cause. This is what lands in logs.
//! * [`DocuError::user_message`] — the localised text a user sees. Service
//!   failures collapse to one generic message here; the cause is never shown.

use crate::messages::{self, Locale};
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docuconvert library.
#[derive(Debug, Error)]
pub enum DocuError {
    // ── Intake errors ─────────────────────────────────────────────────────
    /// MIME type outside the supported allow-list.
    #[error("Unsupported file type '{mime}' for '{name}'\nSupported: application/pdf, image/png, image/jpeg, image/webp, image/heic")]
    UnsupportedFileType { name: String, mime: String },

    /// Payload exceeds the configured size cap.
    #[error("'{name}' is {size} bytes; the limit is {max} bytes\nRaise it with --max-file-size-mb.")]
    FileTooLarge { name: String, size: u64, max: u64 },

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The server answered, but not with a success status.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The resource downloaded fine but is not an image.
    #[error("'{url}' is not an image (content type: {content_type})")]
    NotAnImage { url: String, content_type: String },

    /// The request never produced a response (DNS, TLS, refused, blocked).
    #[error("Could not fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Paste requested but the clipboard holds no image.
    #[error("Clipboard does not contain image data")]
    ClipboardEmpty,

    /// Platform clipboard could not be read or written.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    // ── Service errors ────────────────────────────────────────────────────
    /// The configured provider could not be initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The extraction call failed. `detail` is for logs only.
    #[error("Extraction service error: {detail}")]
    ExtractionFailed { detail: String },

    // ── State errors ──────────────────────────────────────────────────────
    /// `convert` or `select_file` called while a conversion is in flight.
    #[error("A conversion is already in progress")]
    ConversionInProgress,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an exported file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocuError {
    /// Localised message suitable for an alert or an inline error banner.
    ///
    /// Remote-fetch failures carry the copy-then-paste remediation hint.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            DocuError::UnsupportedFileType { .. } => {
                messages::unsupported_file_type(locale).to_string()
            }
            DocuError::FileTooLarge { max, .. } => messages::file_too_large(locale, *max),
            DocuError::FileNotFound { .. } | DocuError::PermissionDenied { .. } => {
                messages::file_unreadable(locale).to_string()
            }
            DocuError::DownloadFailed { .. } => with_hint(messages::download_failed(locale), locale),
            DocuError::NotAnImage { .. } => with_hint(messages::not_an_image(locale), locale),
            DocuError::DownloadTimeout { .. } | DocuError::FetchFailed { .. } => {
                with_hint(messages::fetch_blocked(locale), locale)
            }
            DocuError::ClipboardEmpty => messages::clipboard_empty(locale).to_string(),
            DocuError::ProviderNotConfigured { .. } => {
                messages::provider_missing(locale).to_string()
            }
            DocuError::ExtractionFailed { .. } => messages::service_failed(locale).to_string(),
            DocuError::ConversionInProgress => {
                messages::conversion_in_progress(locale).to_string()
            }
            DocuError::OutputWriteFailed { .. } => {
                messages::output_write_failed(locale).to_string()
            }
            DocuError::Clipboard(_) => messages::clipboard_failed(locale).to_string(),
            DocuError::InvalidConfig(_) => messages::invalid_settings(locale).to_string(),
            DocuError::Internal(_) => messages::unknown_error(locale).to_string(),
        }
    }

    /// `true` for failures of the remote-URL intake path.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            DocuError::DownloadFailed { .. }
                | DocuError::DownloadTimeout { .. }
                | DocuError::NotAnImage { .. }
                | DocuError::FetchFailed { .. }
        )
    }
}

fn with_hint(message: &str, locale: Locale) -> String {
    format!("{message}\n\n{}", messages::paste_hint(locale))
}
