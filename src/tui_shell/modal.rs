use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crossterm::event::{KeyCode, KeyEvent};

use crate::confirm::Severity;

pub(super) fn draw_modal(frame: &mut ratatui::Frame, modal: &super::Modal) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 90);
    let h = area.height.saturating_sub(6).clamp(8, 16);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let box_area = ratatui::layout::Rect {
        x,
        y,
        width: w,
        height: h,
    };

    frame.render_widget(ratatui::widgets::Clear, box_area);

    let border = match &modal.kind {
        super::ModalKind::Confirm { pending, .. }
            if pending.confirmation().severity == Severity::Irreversible =>
        {
            Style::default().fg(Color::Red)
        }
        super::ModalKind::Confirm { .. } => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(modal.title.as_str());
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    let lines: Vec<Line> = modal.lines.iter().map(|s| Line::from(s.as_str())).collect();
    let scroll = modal.scroll.min(modal.lines.len().saturating_sub(1)) as u16;

    match &modal.kind {
        super::ModalKind::Viewer => {
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                inner,
            );
        }

        super::ModalKind::Confirm { .. } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(inner);
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                parts[0],
            );
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Enter", Style::default().fg(Color::Yellow)),
                    Span::raw(" proceed   "),
                    Span::styled("Esc", Style::default().fg(Color::Yellow)),
                    Span::raw(" cancel"),
                ])),
                parts[1],
            );
        }

        super::ModalKind::TextInput { prompt, .. } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(inner);

            frame.render_widget(
                Paragraph::new(Span::styled(
                    prompt.as_str(),
                    Style::default().fg(Color::Yellow),
                )),
                parts[0],
            );
            frame.render_widget(
                Paragraph::new(lines)
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: false }),
                parts[1],
            );
            frame.render_widget(
                Paragraph::new(modal.input.buf.as_str())
                    .block(Block::default().borders(Borders::ALL).title("Edit")),
                parts[2],
            );

            let x = modal.input.cursor as u16;
            let y = parts[2].y + 1;
            frame.set_cursor_position((parts[2].x + 1 + x, y));
        }
    }
}

pub(super) fn handle_modal_key(app: &mut super::App, key: KeyEvent) {
    enum ModalAction {
        None,
        Close,
        Resolve {
            confirmed: bool,
        },
        SubmitTextInput {
            action: super::TextInputAction,
            value: String,
        },
    }

    let action = {
        let Some(m) = app.modal.as_mut() else {
            return;
        };

        match &m.kind {
            super::ModalKind::Viewer => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up => {
                    m.scroll = m.scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down => {
                    if m.scroll < m.lines.len().saturating_sub(1) {
                        m.scroll += 1;
                    }
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    m.scroll = m.scroll.saturating_sub(10);
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    m.scroll = (m.scroll + 10).min(m.lines.len().saturating_sub(1));
                    ModalAction::None
                }
                _ => ModalAction::None,
            },

            super::ModalKind::Confirm { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => ModalAction::Resolve { confirmed: true },
                KeyCode::Esc | KeyCode::Char('n') => ModalAction::Resolve { confirmed: false },
                _ => ModalAction::None,
            },

            super::ModalKind::TextInput { action, .. } => match key.code {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => {
                    let raw = m.input.buf.trim().to_string();
                    if raw.is_empty() {
                        m.lines.retain(|l| !l.starts_with("error:"));
                        m.lines.push("error: value required".to_string());
                        ModalAction::None
                    } else {
                        ModalAction::SubmitTextInput {
                            action: action.clone(),
                            value: raw,
                        }
                    }
                }
                _ => {
                    m.input.handle_key(key);
                    ModalAction::None
                }
            },
        }
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::Resolve { confirmed } => {
            let Some(super::Modal {
                kind: super::ModalKind::Confirm { pending, done },
                ..
            }) = app.modal.take()
            else {
                return;
            };
            if confirmed {
                app.confirm_pending(pending, &done);
            } else {
                app.cancel_pending(pending);
            }
        }
        ModalAction::SubmitTextInput { action, value } => {
            app.modal = None;
            app.submit_text_input(action, value);
        }
    }
}
