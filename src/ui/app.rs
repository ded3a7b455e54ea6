use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{
    ApiError, ClassificationPayload, ClassificationService, HistoryService, ImageUpload, ModelId,
};
use crate::config::UiConfig;
use crate::session::{ExpiryHook, HistoryView, Session, UploadError, UploadTicket};
use crate::ui::events::AppEvent;
use crate::ui::mvi::Reducer;
use crate::ui::panels::{PanelIntent, PanelReducer};
use crate::ui::prompt::{PromptIntent, PromptReducer, PromptState};

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($target:expr, $reducer:ty, $intent:expr) => {{
        let target = $target;
        *target = <$reducer>::reduce(std::mem::take(target), $intent);
    }};
}

/// Terminal front-end state around one [`Session`].
///
/// Network calls run as tokio tasks; their results come back through the
/// event channel, so `App` must be driven from within a tokio runtime.
pub struct App<S> {
    should_quit: bool,
    session: Session,
    history: HistoryView,
    prompt: PromptState,
    last_result: Option<ClassificationPayload>,
    service: Arc<S>,
    events: Sender<AppEvent>,
}

impl<S> App<S> {
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn prompt(&self) -> &PromptState {
        &self.prompt
    }

    pub fn last_result(&self) -> Option<&ClassificationPayload> {
        self.last_result.as_ref()
    }
}

impl<S> App<S>
where
    S: ClassificationService + HistoryService + 'static,
{
    pub fn new(
        config: &UiConfig,
        service: Arc<S>,
        events: Sender<AppEvent>,
        default_model: Option<ModelId>,
    ) -> Self {
        let expiry_tx = events.clone();
        let hook: ExpiryHook = Arc::new(move |token| {
            let _ = expiry_tx.send(AppEvent::StatusExpired(token));
        });
        let mut session = Session::from_config(config, Some(hook));
        if default_model.is_some() {
            session.uploads_mut().select_model(default_model);
        }
        let history = session.history_view();

        Self {
            should_quit: false,
            session,
            history,
            prompt: PromptState::default(),
            last_result: None,
            service,
            events,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Paste(text) => {
                dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::InsertText(text));
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::Resize(..) => {}
            AppEvent::StatusExpired(token) => {
                self.session.uploads_mut().status_mut().expire(token);
            }
            AppEvent::UploadFinished { ticket, result } => self.on_upload_finished(ticket, result),
            AppEvent::HistoryLoaded(result) => {
                // Failures are kept on the view and shown in the sidebar.
                let _ = self.history.finish_refresh(result);
            }
            AppEvent::DeleteFinished { image_id, result } => {
                let _ = self.session.finish_deletion(image_id, result);
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.session.uploads_mut().status_mut().expire_due();
        if self.session.panels().shows_history() && self.history.needs_refresh() {
            self.spawn_history_fetch();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.request_quit();
            return;
        }

        if self.prompt.is_visible() {
            self.on_prompt_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.request_quit(),
            KeyCode::Char('1') => self.select_model(Some(ModelId::ResNet)),
            KeyCode::Char('2') => self.select_model(Some(ModelId::EfficientNet)),
            KeyCode::Char('3') => self.select_model(Some(ModelId::MobileNet)),
            KeyCode::Char('0') => self.select_model(None),
            KeyCode::Char('u') => dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::Open),
            KeyCode::Char('h') => self.dispatch_panels(PanelIntent::OpenHistory),
            KeyCode::Char('H') | KeyCode::Esc => self.dispatch_panels(PanelIntent::CloseHistory),
            KeyCode::Char('d') => self.dispatch_panels(PanelIntent::ToggleDelete),
            KeyCode::Char('r') => self.history.invalidate(),
            KeyCode::Char('j') | KeyCode::Down if self.session.panels().delete_open => {
                self.history.select_next()
            }
            KeyCode::Char('k') | KeyCode::Up if self.session.panels().delete_open => {
                self.history.select_prev()
            }
            KeyCode::Char('x') if self.session.panels().delete_open => self.delete_selected(),
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::Close),
            KeyCode::Enter => {
                let raw = self.prompt.buffer().unwrap_or_default().trim().to_string();
                dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::Close);
                if !raw.is_empty() {
                    self.submit_upload(PathBuf::from(raw));
                }
            }
            KeyCode::Backspace => {
                dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::Backspace)
            }
            KeyCode::Char(ch) => {
                dispatch_mvi!(&mut self.prompt, PromptReducer, PromptIntent::Input(ch))
            }
            _ => {}
        }
    }

    fn dispatch_panels(&mut self, intent: PanelIntent) {
        tracing::debug!(?intent, "Panel intent");
        dispatch_mvi!(self.session.panels_mut(), PanelReducer, intent);
    }

    fn select_model(&mut self, choice: Option<ModelId>) {
        // The selector is gone for good after the first successful upload.
        if self.session.uploads().selector().is_visible() {
            self.session.uploads_mut().select_model(choice);
        }
    }

    /// Gate first, then read the file, then hand the call to a task.
    fn submit_upload(&mut self, path: PathBuf) {
        let ticket = match self.session.uploads_mut().begin_upload() {
            Ok(ticket) => ticket,
            Err(UploadError::Busy) => {
                self.session
                    .uploads_mut()
                    .show_status("Still uploading the previous image");
                return;
            }
            // ModelRequired already put its message on the status line.
            Err(_) => return,
        };

        let image = match ImageUpload::from_path(&path) {
            Ok(image) => image,
            Err(err) => {
                // Dropping the ticket releases the busy flag.
                drop(ticket);
                self.session
                    .uploads_mut()
                    .show_status(format!("cannot upload: {}", err));
                return;
            }
        };

        let service = Arc::clone(&self.service);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = service.classify(&image, ticket.model()).await;
            let _ = tx.send(AppEvent::UploadFinished { ticket, result });
        });
    }

    fn on_upload_finished(
        &mut self,
        ticket: UploadTicket,
        result: Result<ClassificationPayload, ApiError>,
    ) {
        if let Ok(payload) = self.session.uploads_mut().complete_upload(ticket, result) {
            self.last_result = Some(payload);
        }
    }

    fn spawn_history_fetch(&mut self) {
        self.history.begin_refresh();
        let service = Arc::clone(&self.service);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = service.fetch_history().await;
            let _ = tx.send(AppEvent::HistoryLoaded(result));
        });
    }

    fn delete_selected(&mut self) {
        let Some(image_id) = self.history.selected_record().map(|r| r.image_id) else {
            return;
        };
        if !self.session.begin_deletion(image_id) {
            return;
        }
        let service = Arc::clone(&self.service);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = service.delete_record(image_id).await;
            let _ = tx.send(AppEvent::DeleteFinished { image_id, result });
        });
    }
}
