//! Gated upload flow.
//!
//! An upload is admitted only when a model is selected and no other
//! upload is outstanding. Admission hands out an [`UploadTicket`]; the
//! result of the network call is applied by presenting that ticket back
//! to [`UploadCoordinator::complete_upload`].

use std::sync::{Arc, Weak};
use std::time::Duration;

use thiserror::Error;

use crate::api::{ApiError, ClassificationPayload, ClassificationService, ImageUpload, ModelId};
use crate::session::refresh::HistoryRefreshSignal;
use crate::session::selector::ModelSelector;
use crate::session::status::StatusMessenger;

pub const MODEL_REQUIRED_MESSAGE: &str = "Please select a model before uploading";

#[derive(Debug, Error)]
pub enum UploadError {
    /// No model selected; nothing was sent.
    #[error("Please select a model before uploading")]
    ModelRequired,

    #[error("An upload is already in progress")]
    Busy,

    /// The service rejected the upload or could not be reached.
    #[error("Upload failed: {0}")]
    Failed(#[source] ApiError),

    /// The ticket does not belong to the outstanding upload.
    #[error("Upload result arrived for an upload that is no longer pending")]
    Stale,
}

impl UploadError {
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::ModelRequired)
    }
}

/// Proof that an upload was admitted.
///
/// Not cloneable: one admission, one completion. Dropping the ticket
/// without completing (e.g. the task carrying it was cancelled) frees the
/// coordinator for the next upload.
#[derive(Debug)]
pub struct UploadTicket {
    id: u64,
    model: ModelId,
    _live: Arc<()>,
}

impl UploadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn model(&self) -> ModelId {
        self.model
    }
}

struct InFlight {
    id: u64,
    live: Weak<()>,
}

pub struct UploadCoordinator {
    selector: ModelSelector,
    status: StatusMessenger,
    refresh: HistoryRefreshSignal,
    status_ttl: Duration,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl UploadCoordinator {
    pub fn new(status: StatusMessenger, status_ttl: Duration) -> Self {
        Self {
            selector: ModelSelector::new(),
            status,
            refresh: HistoryRefreshSignal::new(),
            status_ttl,
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn status(&self) -> &StatusMessenger {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusMessenger {
        &mut self.status
    }

    pub fn refresh_signal(&self) -> &HistoryRefreshSignal {
        &self.refresh
    }

    /// Show `text` on the status line for the configured TTL.
    pub fn show_status(&mut self, text: impl Into<String>) {
        self.status.show(text, self.status_ttl);
    }

    /// Select a model (or clear the selection with `None`).
    ///
    /// A non-empty selection is acknowledged on the status line.
    pub fn select_model(&mut self, choice: Option<ModelId>) {
        self.selector.select(choice);
        match choice {
            Some(model) => {
                tracing::debug!(model = %model, "Model selected");
                self.show_status(format!("Model selected: {}", model.display_name()));
            }
            None => tracing::debug!("Model selection cleared"),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|pending| pending.live.strong_count() > 0)
    }

    /// Admit an upload, or refuse it without side effects beyond the
    /// "model required" status message.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, UploadError> {
        if self.is_busy() {
            tracing::debug!("Upload refused: another upload is pending");
            return Err(UploadError::Busy);
        }

        let Some(model) = self.selector.current() else {
            tracing::warn!("Upload refused: no model selected");
            self.show_status(MODEL_REQUIRED_MESSAGE);
            return Err(UploadError::ModelRequired);
        };

        self.next_ticket += 1;
        let live = Arc::new(());
        self.in_flight = Some(InFlight {
            id: self.next_ticket,
            live: Arc::downgrade(&live),
        });

        tracing::info!(ticket = self.next_ticket, model = %model, "Upload admitted");
        Ok(UploadTicket {
            id: self.next_ticket,
            model,
            _live: live,
        })
    }

    /// Apply the outcome of the network call for `ticket`.
    ///
    /// On success the model selector is hidden for the rest of the session
    /// and the history refresh signal is bumped once. On failure the cause
    /// is shown on the status line and nothing else changes.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<ClassificationPayload, ApiError>,
    ) -> Result<ClassificationPayload, UploadError> {
        match &self.in_flight {
            Some(pending) if pending.id == ticket.id => {}
            _ => {
                tracing::warn!(ticket = ticket.id, "Ignoring result for stale upload");
                return Err(UploadError::Stale);
            }
        }
        self.in_flight = None;

        match result {
            Ok(payload) => {
                self.selector.hide();
                let refresh = self.refresh.bump();
                tracing::info!(
                    ticket = ticket.id,
                    image_id = payload.image_id,
                    class_name = %payload.class_name,
                    confidence = %payload.confidence,
                    refresh,
                    "Upload classified"
                );
                Ok(payload)
            }
            Err(err) => {
                tracing::warn!(
                    ticket = ticket.id,
                    error_type = err.error_type(),
                    error = %err,
                    "Upload failed"
                );
                self.show_status(format!("upload failed: {}", err));
                Err(UploadError::Failed(err))
            }
        }
    }

    /// Gate, upload once, and apply the result.
    pub async fn attempt_upload<S: ClassificationService>(
        &mut self,
        service: &S,
        image: &ImageUpload,
    ) -> Result<ClassificationPayload, UploadError> {
        let ticket = self.begin_upload()?;
        let result = service.classify(image, ticket.model()).await;
        self.complete_upload(ticket, result)
    }

    /// Note that history changed for a reason other than an upload.
    pub(crate) fn bump_refresh(&mut self) -> u64 {
        self.refresh.bump()
    }
}
