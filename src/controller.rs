//! Application state controller: the Idle → Processing → Success/Error
//! lifecycle around a single [`CanonicalFile`].
//!
//! ```text
//!   select_file ──▶ Idle ──convert──▶ Processing ──ok──▶ Success
//!        ▲                                │
//!        │                                └──err─▶ Error
//!        └──────── (from any state except Processing)
//! ```
//!
//! At most one conversion is in flight per controller. While Processing,
//! both [`AppController::select_file`] and [`AppController::convert`] are
//! refused with [`DocuError::ConversionInProgress`], the equivalent of
//! disabling the drop zone and the convert button. If the future returned by
//! `convert` is dropped before it resolves, the status falls back to Idle so
//! the controller never stays stuck in Processing.

use crate::error::DocuError;
use crate::file::CanonicalFile;
use crate::messages::Locale;
use crate::pipeline::llm::{ExtractionService, Extraction};
use crate::progress::{NoopStatusCallback, SharedStatusCallback};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Conversion lifecycle status. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub status: ProcessingStatus,
    /// The selected document; `None` until one is chosen or after removal.
    pub file: Option<CanonicalFile>,
    /// Extracted text of the last successful run; empty otherwise.
    pub result: String,
    /// Localised error message, present only in [`ProcessingStatus::Error`].
    pub error: Option<String>,
}

/// Owns the selected file and drives one extraction at a time.
pub struct AppController {
    service: Arc<dyn ExtractionService>,
    state: Mutex<AppState>,
    locale: Locale,
    callback: SharedStatusCallback,
}

impl AppController {
    pub fn new(service: Arc<dyn ExtractionService>, locale: Locale) -> Self {
        Self {
            service,
            state: Mutex::new(AppState::default()),
            locale,
            callback: Arc::new(NoopStatusCallback),
        }
    }

    /// Attach a lifecycle observer.
    pub fn with_callback(mut self, callback: SharedStatusCallback) -> Self {
        self.callback = callback;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.lock().status
    }

    /// Replace the selected file (or clear it with `None`).
    ///
    /// The previous file is discarded without history; status returns to
    /// Idle and any earlier result or error is cleared.
    pub fn select_file(&self, file: Option<CanonicalFile>) -> Result<(), DocuError> {
        let mut state = self.lock();
        if state.status == ProcessingStatus::Processing {
            return Err(DocuError::ConversionInProgress);
        }
        let (name, size) = file
            .as_ref()
            .map(|f| (Some(f.name().to_string()), f.size()))
            .unwrap_or((None, 0));
        state.file = file;
        state.status = ProcessingStatus::Idle;
        state.result.clear();
        state.error = None;
        drop(state);

        debug!("Selected file: {:?} ({} bytes)", name, size);
        self.callback.on_file_selected(name.as_deref(), size);
        Ok(())
    }

    /// Remove the selected file.
    pub fn clear_file(&self) -> Result<(), DocuError> {
        self.select_file(None)
    }

    /// Run the extraction for the selected file.
    ///
    /// # Returns
    /// * `Ok(None)` — no file selected; nothing happened, no request was made
    /// * `Ok(Some(extraction))` — status is now Success and `result` holds the text
    ///
    /// # Errors
    /// * [`DocuError::ConversionInProgress`] — another conversion is running
    /// * any service error — status is now Error with a localised message
    pub async fn convert(&self) -> Result<Option<Extraction>, DocuError> {
        let file = {
            let mut state = self.lock();
            let Some(file) = state.file.clone() else {
                debug!("Convert ignored: no file selected");
                return Ok(None);
            };
            if state.status == ProcessingStatus::Processing {
                return Err(DocuError::ConversionInProgress);
            }
            state.status = ProcessingStatus::Processing;
            state.result.clear();
            state.error = None;
            file
        };

        info!("Converting '{}'", file.name());
        self.callback.on_conversion_start(file.name());

        let mut in_flight = InFlight {
            state: &self.state,
            settled: false,
        };
        let outcome = self.service.extract(&file).await;
        in_flight.settled = true;

        let mut state = self.lock();
        match outcome {
            Ok(extraction) => {
                state.status = ProcessingStatus::Success;
                state.result = extraction.text.clone();
                drop(state);
                info!(
                    "Converted '{}': {} chars",
                    file.name(),
                    extraction.text.len()
                );
                self.callback
                    .on_conversion_complete(file.name(), extraction.text.len());
                Ok(Some(extraction))
            }
            Err(e) => {
                let message = e.user_message(self.locale);
                state.status = ProcessingStatus::Error;
                state.result.clear();
                state.error = Some(message.clone());
                drop(state);
                warn!("Conversion of '{}' failed: {}", file.name(), e);
                self.callback.on_conversion_error(file.name(), &message);
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<AppState>) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets Processing → Idle if a conversion future is dropped mid-flight.
struct InFlight<'a> {
    state: &'a Mutex<AppState>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock_state(self.state);
        if state.status == ProcessingStatus::Processing {
            warn!("Conversion abandoned before completion; status reset to Idle");
            state.status = ProcessingStatus::Idle;
        }
    }
}
