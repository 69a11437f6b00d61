use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    break;
                }
            }
        }
    }

    tracing::debug!(uptime = ?app.started_at.elapsed(), "event loop finished");
    Ok(())
}

/// Route one key press according to the input mode. Returns `false` to quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Edit => handle_edit_key(app, key),
        InputMode::Modal => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
            ) {
                close_modal(app);
            }
        }
    }
    true
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> bool {
    if let Some(action) = app.keymap.resolve(&key) {
        return apply_action(app, action);
    }
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        let page = c as usize - '0' as usize;
        if app.table.go_to_page(page) {
            app.cursor = 0;
        } else {
            app.status = Some(format!("no page {page}"));
        }
    }
    true
}

/// Perform a Normal-mode action. Returns `false` to quit.
pub fn apply_action(app: &mut AppState, action: KeyAction) -> bool {
    match action {
        KeyAction::Quit => return false,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help);
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::CycleSearchField => {
            app.search_field = app.search_field.next();
            app.status = Some(format!("search column: {}", app.search_field.label()));
        }
        KeyAction::MoveUp => app.cursor = app.cursor.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.cursor + 1 < app.table.page_rows().len() {
                app.cursor += 1;
            }
        }
        KeyAction::PrevPage => {
            if app.table.prev_page() {
                app.cursor = 0;
            }
        }
        KeyAction::NextPage => {
            if app.table.next_page() {
                app.cursor = 0;
            }
        }
        KeyAction::FirstPage => {
            if app.table.first_page() {
                app.cursor = 0;
            }
        }
        KeyAction::LastPage => {
            if app.table.last_page() {
                app.cursor = 0;
            }
        }
        KeyAction::ToggleSelect => {
            if let Some(key) = app.cursor_key() {
                app.table.toggle_select_key(key);
            }
        }
        KeyAction::EditRow => {
            if let Some(key) = app.cursor_key() {
                if app.table.begin_edit_key(key) {
                    app.edit_field = crate::member::MemberField::Name;
                    app.input_mode = InputMode::Edit;
                }
            }
        }
        KeyAction::DeleteRow => {
            if let (Some(key), Some(id)) = (app.cursor_key(), app.cursor_id()) {
                if app.table.delete_key(key) {
                    app.status = Some(format!("deleted member {id}"));
                }
                app.clamp_cursor();
            }
        }
        KeyAction::DeleteSelected => {
            let n = app.table.delete_selected();
            app.status = Some(format!("deleted {n} {}", if n == 1 { "member" } else { "members" }));
            app.clamp_cursor();
        }
        KeyAction::Reload => {
            app.reload();
        }
    }
    true
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.table.search(&app.search_input, app.search_field);
            app.input_mode = InputMode::Normal;
            app.cursor = 0;
            app.status = Some(match app.table.active_search() {
                Some(s) => format!(
                    "{} matches for '{}' in {}",
                    app.table.visible_count(),
                    s.term,
                    s.field.label()
                ),
                None => "search cleared".to_string(),
            });
        }
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab => app.search_field = app.search_field.next(),
        KeyCode::BackTab => app.search_field = app.search_field.prev(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if app.table.save_edit() {
                app.status = Some("saved".to_string());
            }
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.table.cancel_edit();
            app.status = Some("edit cancelled".to_string());
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab => app.edit_field = app.edit_field.next(),
        KeyCode::BackTab => app.edit_field = app.edit_field.prev(),
        KeyCode::Backspace => {
            let field = app.edit_field;
            if let Some(draft) = app.table.draft_mut() {
                draft.field_mut(field).pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let field = app.edit_field;
            if let Some(draft) = app.table.draft_mut() {
                draft.field_mut(field).push(c);
            }
        }
        _ => {}
    }
    if !app.table.is_editing() {
        app.input_mode = InputMode::Normal;
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
