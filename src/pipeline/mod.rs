//! Pipeline stages for document-to-text conversion.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ postprocess
//! (path/drop/  (type, size,  (vision   (fences,
//!  paste/URL)   base64)       model)    cleanup)
//! ```
//!
//! 1. [`input`]  — normalise a picked file, dropped bytes, a clipboard paste
//!    or a remote URL into a [`crate::file::CanonicalFile`]
//! 2. [`encode`] — decide the MIME type, enforce the allow-list and the size
//!    cap, base64-wrap the payload
//! 3. [`llm`]    — one request to the multimodal model; the only stage that
//!    talks to the extraction service
//! 4. [`postprocess`] — deterministic cleanup of the model's answer

pub mod encode;
pub mod input;
pub mod llm;
pub mod postprocess;
