pub mod components;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    app.clamp_cursor();

    table::render_search_bar(f, root[0], app);
    table::render_members_table(f, root[1], app);
    table::render_selection_info(f, root[2], app);
    table::render_pagination(f, root[3], app);
    components::render_status_bar(f, root[4], app);

    if let Some(ModalState::Help) = app.modal {
        components::render_help_modal(f, f.area(), app);
    }
}
