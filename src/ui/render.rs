use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::{HistoryRecord, ModelId};
use crate::ui::app::App;
use crate::ui::layout::{centered_rect, layout_regions, split_sidebar};
use crate::ui::theme::{
    ACTIVE_HIGHLIGHT, GLOBAL_BORDER, HEADER_TEXT, MUTED_TEXT, OCEAN_BLUE, POPUP_BORDER,
    STATUS_ERROR, STATUS_OK,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const HINTS: &str = " 1-3: Model │ u: Upload │ h/H: History │ d: Delete │ r: Reload │ q: Quit";

pub fn draw<S>(frame: &mut Frame, app: &App<S>) {
    let (header, body, footer) = layout_regions(frame.area());
    let panels = *app.session().panels();

    frame.render_widget(header_widget(app), header);

    let (main, sidebar) = split_sidebar(body, panels.history_open);
    frame.render_widget(main_widget(app), main);
    if let Some(sidebar) = sidebar {
        render_history_sidebar(frame, app, sidebar);
    }
    if panels.delete_open {
        render_delete_panel(frame, app);
    }

    frame.render_widget(footer_widget(app, footer), footer);
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER))
}

fn header_widget<S>(app: &App<S>) -> Paragraph<'static> {
    let selector = app.session().uploads().selector();
    let text_style = Style::default().fg(HEADER_TEXT);
    let mut spans = vec![Span::styled(
        "  OceanID  │  ",
        text_style.add_modifier(Modifier::BOLD),
    )];

    if selector.is_visible() {
        for (index, model) in ModelId::ALL.iter().enumerate() {
            let style = if selector.current() == Some(*model) {
                Style::default().fg(OCEAN_BLUE).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED_TEXT)
            };
            spans.push(Span::styled(
                format!("[{}] {}  ", index + 1, model.display_name()),
                style,
            ));
        }
    } else if let Some(model) = selector.current() {
        spans.push(Span::styled(
            format!("Model: {}", model.display_name()),
            text_style,
        ));
    }

    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(Style::default().fg(GLOBAL_BORDER)),
    )
}

fn main_widget<S>(app: &App<S>) -> Paragraph<'static> {
    let mut lines = Vec::new();

    if let Some(buffer) = app.prompt().buffer() {
        lines.push(Line::from(vec![
            Span::styled("Image path: ", Style::default().fg(OCEAN_BLUE)),
            Span::styled(format!("{}▏", buffer), Style::default().fg(HEADER_TEXT)),
        ]));
        lines.push(Line::from(Span::styled(
            "Enter: upload │ Esc: cancel",
            Style::default().fg(MUTED_TEXT),
        )));
        lines.push(Line::default());
    }

    if app.session().uploads().is_busy() {
        lines.push(Line::from(Span::styled(
            "Uploading…",
            Style::default().fg(OCEAN_BLUE),
        )));
    }

    match app.last_result() {
        Some(result) => {
            lines.push(Line::from(vec![
                Span::styled(
                    result.class_name.clone(),
                    Style::default().fg(STATUS_OK).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}  ({})", result.confidence, result.model_used),
                    Style::default().fg(HEADER_TEXT),
                ),
            ]));
            if let Some(summary) = &result.summary {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    summary.clone(),
                    Style::default().fg(HEADER_TEXT),
                )));
            }
            if let Some(url) = &result.url {
                lines.push(Line::from(Span::styled(
                    url.clone(),
                    Style::default().fg(MUTED_TEXT),
                )));
            }
        }
        None if !app.prompt().is_visible() => {
            lines.push(Line::from(Span::styled(
                "Pick a model, then press u to classify an image.",
                Style::default().fg(MUTED_TEXT),
            )));
        }
        None => {}
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(bordered(" Classification "))
}

fn record_line(record: &HistoryRecord) -> Line<'static> {
    let confidence = record.confidence.clone().unwrap_or_default();
    let model = record.model_used.clone().unwrap_or_default();
    Line::from(vec![
        Span::styled(format!("#{:<4} ", record.image_id), Style::default().fg(MUTED_TEXT)),
        Span::styled(record.label().to_string(), Style::default().fg(HEADER_TEXT)),
        Span::styled(
            format!("  {} {}", confidence, model),
            Style::default().fg(MUTED_TEXT),
        ),
    ])
}

/// Shown instead of the list when there is nothing to list.
fn history_placeholder<S>(app: &App<S>) -> Option<Line<'static>> {
    let history = app.history();
    if !history.records().is_empty() {
        return None;
    }
    if let Some(err) = history.last_error() {
        return Some(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(STATUS_ERROR),
        )));
    }
    let text = if history.is_fetching() {
        "Loading…"
    } else {
        "No classifications yet"
    };
    Some(Line::from(Span::styled(text, Style::default().fg(MUTED_TEXT))))
}

/// A failed re-fetch keeps the previous records on screen; the error goes
/// under them.
fn with_fetch_error<'a, S>(block: Block<'a>, app: &App<S>) -> Block<'a> {
    match app.history().last_error() {
        Some(err) if !app.history().records().is_empty() => block.title_bottom(Line::from(
            Span::styled(format!(" {} ", err), Style::default().fg(STATUS_ERROR)),
        )),
        _ => block,
    }
}

fn history_items<S>(app: &App<S>) -> Vec<ListItem<'static>> {
    app.history()
        .records()
        .iter()
        .map(|record| ListItem::new(record_line(record)))
        .collect()
}

fn render_history_sidebar<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = bordered(" History ");
    if let Some(placeholder) = history_placeholder(app) {
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }
    let block = with_fetch_error(block, app);
    frame.render_widget(List::new(history_items(app)).block(block), area);
}

fn render_delete_panel<S>(frame: &mut Frame, app: &App<S>) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Delete (j/k: move │ x: delete │ d: close) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER));

    if let Some(placeholder) = history_placeholder(app) {
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let list = List::new(history_items(app))
        .block(with_fetch_error(block, app))
        .highlight_style(Style::default().bg(ACTIVE_HIGHLIGHT).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(app.history().selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}

fn footer_widget<S>(app: &App<S>, area: Rect) -> Paragraph<'static> {
    let status = app.session().uploads().status().current();
    let (text, style) = match status {
        Some(message) if message.contains("failed") || message.starts_with("Please") => {
            (format!(" {}", message), Style::default().fg(STATUS_ERROR))
        }
        Some(message) => (format!(" {}", message), Style::default().fg(STATUS_OK)),
        None => (
            HINTS.to_string(),
            Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM),
        ),
    };
    let version = format!("v{} ", VERSION);

    // Pad by char count, not bytes.
    let content_width = area.width.saturating_sub(2) as usize;
    let padding = content_width
        .saturating_sub(text.chars().count())
        .saturating_sub(version.chars().count());

    let line = Line::from(vec![
        Span::styled(text, style),
        Span::styled(" ".repeat(padding), style),
        Span::styled(version, Style::default().fg(MUTED_TEXT)),
    ]);

    Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(GLOBAL_BORDER)),
    )
}
