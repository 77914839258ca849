use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row as TableRow, Table,
    TableState, Wrap,
};

use super::*;

use crate::dispatcher::ActionPhase;
use crate::time_utils::fmt_ts_ui;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    match app.screen {
        Screen::Login => draw_login(frame, app, chunks[1]),
        Screen::Browser => draw_browser(frame, app, chunks[1]),
    }
    draw_footer(frame, app, chunks[2]);

    if let Some(m) = &app.modal {
        modal::draw_modal(frame, m);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("Verso", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
    ];
    match app.console.as_ref() {
        Some(console) => {
            spans.push(Span::raw(console.api().base_url().to_string()));
            if app.screen == Screen::Browser {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    app.login.username.buf.clone(),
                    Style::default().fg(Color::Green),
                ));
                if let Some(bucket) = console.selected_bucket() {
                    spans.push(Span::raw("  bucket="));
                    spans.push(Span::styled(
                        bucket.to_string(),
                        Style::default().fg(Color::Cyan),
                    ));
                }
                spans.push(Span::raw(format!("  view={}", console.view_mode().label())));
                if console.phase() != ActionPhase::Idle {
                    spans.push(Span::styled(
                        format!("  {:?}", console.phase()),
                        Style::default().fg(Color::Yellow),
                    ));
                }
            }
        }
        None => spans.push(Span::raw("(no server configured)")),
    }

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_login(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let w = area.width.saturating_sub(4).clamp(20, 70);
    let h = 12u16.min(area.height);
    let box_area = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };
    let block = Block::default().borders(Borders::ALL).title("Sign in");
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let focused = app.login.focused();
    let fields = [
        (LoginField::Url, "Server URL", app.login.url.buf.clone()),
        (LoginField::Username, "Username", app.login.username.buf.clone()),
        (LoginField::Password, "Password", app.login.password.masked()),
    ];
    for (i, (field, title, text)) in fields.into_iter().enumerate() {
        let style = if field == focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(title),
            ),
            parts[i],
        );
    }

    if let Some(err) = app.login.error.as_deref() {
        frame.render_widget(
            Paragraph::new(err)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            parts[3],
        );
    }

    if app.modal.is_none() {
        let (idx, cursor) = match focused {
            LoginField::Url => (0, app.login.url.cursor),
            LoginField::Username => (1, app.login.username.cursor),
            LoginField::Password => (2, app.login.password.cursor),
        };
        let slot = parts[idx];
        frame.set_cursor_position((slot.x + 1 + cursor as u16, slot.y + 1));
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_browser(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    let selected = app.selected_bucket();
    let names = app.bucket_names();
    let items: Vec<ListItem> = names
        .iter()
        .map(|name| {
            let style = if Some(name.as_str()) == selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(name.clone(), style))
        })
        .collect();
    let mut list_state = ListState::default();
    if !names.is_empty() {
        list_state.select(Some(app.bucket_sel));
    }
    let list = List::new(items)
        .block(pane_block(
            format!("Buckets ({})", names.len()),
            app.focus == Focus::Buckets,
        ))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, panes[0], &mut list_state);

    let rows = app.rows();
    let title = match selected {
        Some(bucket) => format!("{} ({})", bucket, rows.len()),
        None => "Versions".to_string(),
    };
    let block = pane_block(title, app.focus == Focus::Objects);
    if selected.is_none() {
        frame.render_widget(
            Paragraph::new("Select a bucket and press Enter.")
                .style(Style::default().fg(Color::Gray))
                .block(block),
            panes[1],
        );
        return;
    }

    let header = TableRow::new(["Key", "Version", "Size", "Modified", ""])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body: Vec<TableRow> = rows
        .iter()
        .map(|r| {
            let mut flags = Vec::new();
            if r.is_latest {
                flags.push("latest");
            }
            if r.is_delete_marker {
                flags.push("deleted");
            }
            let style = if r.is_delete_marker {
                Style::default().fg(Color::Red)
            } else if !r.is_latest {
                Style::default().fg(Color::Gray)
            } else {
                Style::default()
            };
            TableRow::new([
                Cell::from(r.key.clone()),
                Cell::from(r.version_id.clone()),
                Cell::from(r.size_display.clone()),
                Cell::from(fmt_ts_ui(&r.last_modified)),
                Cell::from(flags.join(",")),
            ])
            .style(style)
        })
        .collect();
    let widths = [
        Constraint::Min(16),
        Constraint::Length(34),
        Constraint::Length(10),
        Constraint::Length(19),
        Constraint::Length(15),
    ];
    let mut table_state = TableState::default();
    if !rows.is_empty() {
        table_state.select(Some(app.row_sel));
    }
    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(table, panes[1], &mut table_state);
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let status = match &app.status {
        Some(s) if s.is_error => Line::from(Span::styled(
            s.text.as_str(),
            Style::default().fg(Color::Red),
        )),
        Some(s) => Line::from(s.text.as_str()),
        None => Line::from(""),
    };
    let hints = match (app.screen, app.modal.as_ref().map(|m| &m.kind)) {
        (_, Some(ModalKind::Confirm { .. })) => "Enter confirm  Esc cancel",
        (_, Some(ModalKind::TextInput { .. })) => "Enter submit  Esc cancel",
        (_, Some(ModalKind::Viewer)) => "Esc close  Up/Down scroll",
        (Screen::Login, None) => "Tab next field  Enter sign in  Esc quit",
        (Screen::Browser, None) => {
            "Enter open  v latest/all  u upload  d download  b rollback  x delete  p purge  n new bucket  r refresh  ? keys  q quit"
        }
    };
    frame.render_widget(
        Paragraph::new(vec![
            status,
            Line::from(Span::styled(hints, Style::default().fg(Color::Gray))),
        ]),
        area,
    );
}
