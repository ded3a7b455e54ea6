//! History display collaborator.
//!
//! Keeps the last fetched records and decides when to re-fetch by
//! comparing the refresh signal with the value it last acted on.

use crate::api::{ApiError, HistoryRecord, HistoryService};
use crate::session::refresh::RefreshObserver;

pub struct HistoryView {
    records: Vec<HistoryRecord>,
    observer: RefreshObserver,
    loaded: bool,
    fetching: bool,
    selected: usize,
    last_error: Option<String>,
}

impl HistoryView {
    pub fn new(observer: RefreshObserver) -> Self {
        Self {
            records: Vec::new(),
            observer,
            loaded: false,
            fetching: false,
            selected: 0,
            last_error: None,
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Nothing fetched yet, or the signal moved since the last fetch.
    pub fn needs_refresh(&self) -> bool {
        !self.fetching && (!self.loaded || self.observer.has_changed())
    }

    /// Force a re-fetch on the next check.
    pub fn invalidate(&mut self) {
        self.loaded = false;
    }

    /// Mark the current signal value as handled and flag a fetch in flight.
    ///
    /// Marking happens before the fetch, so a bump that lands while the
    /// fetch is running is picked up by the next check.
    pub fn begin_refresh(&mut self) -> u64 {
        self.fetching = true;
        self.observer.mark_seen()
    }

    /// Apply a fetch result. A failed fetch keeps the previous records and
    /// is not retried until the signal moves or the view is invalidated.
    pub fn finish_refresh(
        &mut self,
        result: Result<Vec<HistoryRecord>, ApiError>,
    ) -> Result<usize, ApiError> {
        self.fetching = false;
        self.loaded = true;
        match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "History refreshed");
                self.records = records;
                self.last_error = None;
                self.clamp_selection();
                Ok(self.records.len())
            }
            Err(err) => {
                tracing::warn!(error = %err, "History fetch failed");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn refresh<S: HistoryService>(&mut self, service: &S) -> Result<usize, ApiError> {
        self.begin_refresh();
        let result = service.fetch_history().await;
        self.finish_refresh(result)
    }

    /// Fetch only if [`needs_refresh`](Self::needs_refresh). Returns whether a fetch happened.
    pub async fn refresh_if_changed<S: HistoryService>(
        &mut self,
        service: &S,
    ) -> Result<bool, ApiError> {
        if !self.needs_refresh() {
            return Ok(false);
        }
        self.refresh(service).await.map(|_| true)
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.selected)
    }

    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        self.records.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.records.is_empty() {
            self.selected = (self.selected + 1) % self.records.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.records.is_empty() {
            self.selected = if self.selected == 0 {
                self.records.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
    }
}
