use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode};
use crate::member::{Member, MemberField};

pub fn render_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.input_mode == InputMode::Search;
    let mut spans = vec![
        Span::styled(
            format!("[{} ▾] ", app.search_field.label()),
            Style::default().fg(app.theme.title),
        ),
        Span::styled(app.search_input.clone(), Style::default().fg(app.theme.text)),
    ];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(app.theme.highlight_fg)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled("Search...", Style::default().fg(app.theme.muted)));
    }
    if let Some(active) = app.table.active_search() {
        spans.push(Span::styled(
            format!("   filter: '{}' in {}", active.term, active.field.label()),
            Style::default().fg(app.theme.muted),
        ));
    }

    let border = if focused { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

/// Text for one editable cell: the draft value while the row is being edited.
fn cell_text(
    member: &Member,
    draft: Option<&Member>,
    field: MemberField,
    focus: MemberField,
) -> String {
    match draft {
        Some(d) if field == focus => format!("{}▏", d.field(field)),
        Some(d) => d.field(field).to_string(),
        None => member.field(field).to_string(),
    }
}

pub fn render_members_table(f: &mut Frame, area: Rect, app: &AppState) {
    let draft = app.table.editing().map(|d| &d.member);
    let rows = app.table.page_rows().into_iter().enumerate().map(|(i, r)| {
        let editing = r.editing.then_some(draft).flatten();
        let mut style = Style::default().fg(app.theme.text);
        if r.selected {
            style = style.bg(app.theme.selected_bg);
        }
        if i == app.cursor {
            style = style.fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD);
        }
        let edit = if editing.is_some() { "[Save] [Cancel]" } else { "edit" };
        Row::new(vec![
            Cell::from(if r.selected { "[x]" } else { "[ ]" }),
            Cell::from(r.member.id.to_string()),
            Cell::from(cell_text(r.member, editing, MemberField::Name, app.edit_field)),
            Cell::from(cell_text(r.member, editing, MemberField::Email, app.edit_field)),
            Cell::from(cell_text(r.member, editing, MemberField::Role, app.edit_field)),
            Cell::from(edit),
            Cell::from(Span::styled("del", Style::default().fg(app.theme.danger))),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Percentage(22),
        Constraint::Percentage(30),
        Constraint::Percentage(14),
        Constraint::Length(15),
        Constraint::Length(6),
    ];

    let header = Row::new(vec!["Select", "ID", "Name", "Email", "Role", "Edit", "Delete"]).style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let title = if app.table.active_search().is_some() {
        format!("User List ({} of {})", app.table.visible_count(), app.table.len())
    } else {
        "User List".to_string()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_selection_info(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(format!(" {}", app.table.selection_summary()))
        .style(Style::default().fg(app.theme.muted));
    f.render_widget(p, area);
}

pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let enabled = Style::default().fg(app.theme.text);
    let disabled = Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM);
    let current = app.table.current_page();

    let mut spans = vec![Span::styled(
        " < ",
        if app.table.has_prev() { enabled } else { disabled },
    )];
    for page in app.table.page_window() {
        let style = if page == current {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            enabled
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        " > ",
        if app.table.has_next() { enabled } else { disabled },
    ));

    let p = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
