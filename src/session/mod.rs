//! Client-side orchestration for one authenticated session.
//!
//! A [`Session`] is the single owner of the session-wide state: the model
//! selector and status line (inside the [`UploadCoordinator`]), the
//! history refresh signal, and the panel flags. Front-ends hold one
//! `Session` and pass it where it is needed.

mod history;
mod panels;
mod refresh;
mod selector;
mod status;
mod upload;

use std::time::Duration;

pub use history::HistoryView;
pub use panels::PanelVisibility;
pub use refresh::{HistoryRefreshSignal, RefreshObserver};
pub use selector::ModelSelector;
pub use status::{ExpiryHook, ExpiryToken, StatusMessenger};
pub use upload::{UploadCoordinator, UploadError, UploadTicket, MODEL_REQUIRED_MESSAGE};

use crate::api::{ApiError, HistoryService};
use crate::config::UiConfig;

pub struct Session {
    uploads: UploadCoordinator,
    panels: PanelVisibility,
    pending_delete: Option<u64>,
}

impl Session {
    pub fn new(status: StatusMessenger, status_ttl: Duration) -> Self {
        Self {
            uploads: UploadCoordinator::new(status, status_ttl),
            panels: PanelVisibility::default(),
            pending_delete: None,
        }
    }

    /// Build a session from `[ui]` settings, optionally wiring status expiry
    /// notifications to `hook`.
    pub fn from_config(config: &UiConfig, hook: Option<ExpiryHook>) -> Self {
        let status = match hook {
            Some(hook) => StatusMessenger::with_expiry_hook(hook),
            None => StatusMessenger::new(),
        };
        Self::new(status, config.status_ttl())
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn uploads_mut(&mut self) -> &mut UploadCoordinator {
        &mut self.uploads
    }

    pub fn panels(&self) -> &PanelVisibility {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut PanelVisibility {
        &mut self.panels
    }

    /// A history view observing this session's refresh signal.
    pub fn history_view(&self) -> HistoryView {
        HistoryView::new(self.uploads.refresh_signal().observer())
    }

    /// Claim the single delete slot for `image_id`.
    ///
    /// Returns `false` while another delete is outstanding; nothing is sent then.
    pub fn begin_deletion(&mut self, image_id: u64) -> bool {
        if let Some(pending) = self.pending_delete {
            tracing::debug!(image_id, pending, "Delete refused: another delete is pending");
            return false;
        }
        self.pending_delete = Some(image_id);
        true
    }

    pub fn pending_deletion(&self) -> Option<u64> {
        self.pending_delete
    }

    /// Apply the outcome of a delete call.
    ///
    /// Success bumps the refresh signal so history views re-fetch; failure
    /// is shown on the status line.
    pub fn finish_deletion(
        &mut self,
        image_id: u64,
        result: Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        if self.pending_delete == Some(image_id) {
            self.pending_delete = None;
        }
        match result {
            Ok(()) => {
                let refresh = self.uploads.bump_refresh();
                tracing::info!(image_id, refresh, "History record deleted");
                self.uploads.show_status(format!("Deleted record {}", image_id));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(image_id, error = %err, "Delete failed");
                self.uploads.show_status(format!("delete failed: {}", err));
                Err(err)
            }
        }
    }

    pub async fn delete_record<S: HistoryService>(
        &mut self,
        service: &S,
        image_id: u64,
    ) -> Result<(), ApiError> {
        self.pending_delete = Some(image_id);
        let result = service.delete_record(image_id).await;
        self.finish_deletion(image_id, result)
    }
}
