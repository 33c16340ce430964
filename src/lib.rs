//! # docuconvert
//!
//! Turn an image or PDF into editable text using a multimodal LLM.
//!
//! A document arrives from a file picker, a drag-and-drop, a pasted
//! screenshot or a remote URL. It is sent whole to a vision model with a
//! fixed instruction (plain rich text, pipe tables, `$`-delimited formulas),
//! the answer is cleaned of stray code fences, and the result can be copied
//! or exported as Markdown or as a Word-compatible `.doc`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source (path │ drop │ paste │ URL)
//!  │
//!  ├─ 1. Intake   type allow-list, size cap, base64 → CanonicalFile
//!  ├─ 2. Extract  one request to gemini-2.5-flash (or any edgequake-llm provider)
//!  ├─ 3. Clean    strip outer fences, trim; fallback text when empty
//!  └─ 4. Present  copy to clipboard, export .md / .doc
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docuconvert::{build_controller, intake, ConversionConfig, IntakeSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / EDGEQUAKE_LLM_PROVIDER / …
//!     let config = ConversionConfig::default();
//!     let controller = build_controller(&config)?;
//!
//!     let file = intake(IntakeSource::Path("invoice.png".into()), &config).await?;
//!     controller.select_file(Some(file))?;
//!     if let Some(extraction) = controller.convert().await? {
//!         println!("{}", extraction.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | Enables the `docuconvert` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `clipboard` | on      | [`SystemClipboard`] via `arboard` for `--paste` and `--copy` |
//!
//! Library-only, headless use:
//! ```toml
//! docuconvert = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod file;
pub mod messages;
pub mod pipeline;
pub mod presenter;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{Clipboard, ClipboardImage};
pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_MODEL, DEFAULT_PROVIDER};
pub use controller::{AppController, AppState, ProcessingStatus};
pub use convert::{
    build_controller, convert, convert_from_bytes, convert_sync, convert_to_file,
    resolve_provider,
};
pub use error::DocuError;
pub use file::{CanonicalFile, SupportedMime};
pub use messages::Locale;
pub use pipeline::input::{intake, resolve_source, IntakeSource};
pub use pipeline::llm::{Extraction, ExtractionService, VisionExtractor};
pub use pipeline::postprocess::clean_text;
pub use presenter::{DownloadSink, FsDownloadSink, ResultPresenter};
pub use progress::{NoopStatusCallback, SharedStatusCallback, StatusCallback};
