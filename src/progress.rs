//! Status-callback trait for controller lifecycle events.
//!
//! Inject an [`Arc<dyn StatusCallback>`] via
//! [`crate::controller::AppController::with_callback`] to observe file
//! selection and the Processing → Success / Error transitions. The CLI uses
//! it to drive its spinner; a GUI would repaint its panes.
//!
//! # Example
//!
//! ```rust
//! use docuconvert::StatusCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingCallback {
//!     finished: AtomicUsize,
//! }
//!
//! impl StatusCallback for CountingCallback {
//!     fn on_conversion_complete(&self, _file_name: &str, text_len: usize) {
//!         self.finished.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("done: {text_len} chars");
//!     }
//! }
//! ```

use std::sync::Arc;

/// Called by the controller as its state changes.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Callbacks run synchronously on the task driving the
/// controller and must not call back into it.
pub trait StatusCallback: Send + Sync {
    /// A new file replaced the previous one (or the selection was cleared).
    ///
    /// # Arguments
    /// * `file_name` — name of the new file, `None` when cleared
    /// * `size`      — decoded size in bytes (0 when cleared)
    fn on_file_selected(&self, file_name: Option<&str>, size: usize) {
        let _ = (file_name, size);
    }

    /// Status moved to Processing; the extraction request is about to go out.
    fn on_conversion_start(&self, file_name: &str) {
        let _ = file_name;
    }

    /// Status moved to Success.
    ///
    /// # Arguments
    /// * `text_len` — byte length of the extracted text
    fn on_conversion_complete(&self, file_name: &str, text_len: usize) {
        let _ = (file_name, text_len);
    }

    /// Status moved to Error.
    ///
    /// # Arguments
    /// * `message` — the localised message stored in the state
    fn on_conversion_error(&self, file_name: &str, message: &str) {
        let _ = (file_name, message);
    }
}

/// A no-op implementation for callers that don't need events.
///
/// This is the default when no callback is configured.
pub struct NoopStatusCallback;

impl StatusCallback for NoopStatusCallback {}

/// Convenience alias matching the type stored in the controller.
pub type SharedStatusCallback = Arc<dyn StatusCallback>;
