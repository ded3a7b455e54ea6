use crate::api::ApiClient;
use crate::config::Config;
use crate::ui::app::App;
use crate::ui::events::EventHandler;
use crate::ui::render::draw;
use crate::ui::terminal_guard::setup_terminal;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;

/// Run the terminal front-end until the user quits.
///
/// Must be called with a tokio runtime entered; network work is spawned onto it.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let client = Arc::new(ApiClient::new(&config.service)?);
    let tick_rate = config.ui.tick_rate();
    tracing::info!(base_url = %client.base_url(), "Starting terminal UI");

    let (mut terminal, guard) = setup_terminal()?;
    let events = EventHandler::new(tick_rate);
    let mut app = App::new(&config.ui, client, events.sender(), config.default_model());

    loop {
        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(event) => app.handle_event(event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(guard);
    tracing::info!("Terminal UI stopped");
    Ok(())
}
