//! Shared UI components (status bar, help modal, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, counts and the last action's outcome.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Edit => "EDIT",
        InputMode::Modal => "HELP",
    };
    let page = match app.table.max_page() {
        0 => "-/0".to_string(),
        max => format!("{}/{max}", app.table.current_page()),
    };
    let mut msg = format!(
        "mode: {mode}  members:{}/{}  page:{page}  ?: help",
        app.table.visible_count(),
        app.table.len(),
    );
    if let Some(status) = &app.status {
        msg.push_str("  | ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal: active Normal-mode bindings plus the fixed
/// search/edit keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 28u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {:>18} │ ", label)),
            Span::styled(keys, italic),
        ])
    };

    let mut lines = vec![Line::from(Span::styled("Table:", bold))];
    for (label, action) in [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Toggle select", KeyAction::ToggleSelect),
        ("Edit row", KeyAction::EditRow),
        ("Delete row", KeyAction::DeleteRow),
        ("Delete selected", KeyAction::DeleteSelected),
        ("Previous page", KeyAction::PrevPage),
        ("Next page", KeyAction::NextPage),
        ("First page", KeyAction::FirstPage),
        ("Last page", KeyAction::LastPage),
        ("Search", KeyAction::StartSearch),
        ("Search column", KeyAction::CycleSearchField),
        ("Reload", KeyAction::Reload),
        ("Quit", KeyAction::Quit),
    ] {
        lines.push(row(label, app.keymap.keys_for(action).join(", ")));
    }
    lines.push(row("Go to page", "1-9".to_string()));

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search box / editor:", bold)));
    for (label, keys) in [
        ("Apply / Save", "Enter"),
        ("Leave / Cancel", "Esc"),
        ("Next column", "Tab"),
        ("Previous column", "Shift+Tab"),
    ] {
        lines.push(row(label, keys.to_string()));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
