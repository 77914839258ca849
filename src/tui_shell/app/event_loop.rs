use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

pub(in crate::tui_shell) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if app.modal.is_some() {
        modal::handle_modal_key(app, key);
        return;
    }

    match app.screen {
        Screen::Login => handle_login_key(app, key),
        Screen::Browser => handle_browser_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Down => {
            app.login.field = Some(app.login.focused().next());
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login.field = Some(app.login.focused().prev());
        }
        KeyCode::Enter => {
            if app.login.focused() == LoginField::Password {
                app.submit_login();
            } else {
                app.login.field = Some(app.login.focused().next());
            }
        }
        _ => {
            app.login.input_mut().handle_key(key);
        }
    }
}

fn handle_browser_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Buckets => Focus::Objects,
                Focus::Objects => Focus::Buckets,
            };
        }
        KeyCode::Left => app.focus = Focus::Buckets,
        KeyCode::Right => app.focus = Focus::Objects,
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-10),
        KeyCode::PageDown => app.move_selection(10),
        KeyCode::Enter => match app.focus {
            Focus::Buckets => app.open_selected_bucket(),
            Focus::Objects => app.show_row_details(),
        },
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Char('n') => app.start_create_bucket(),
        KeyCode::Char('u') => app.start_upload(),
        KeyCode::Char('d') => app.start_download(),
        KeyCode::Char('b') => app.start_rollback(),
        KeyCode::Char('x') => app.start_delete(false),
        KeyCode::Char('p') => app.start_delete(true),
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('?') => app.show_help(),
        _ => {}
    }
}
