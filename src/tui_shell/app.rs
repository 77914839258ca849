use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::{ApiClient, ApiError};
use crate::console::{Console, LoginError};
use crate::dispatcher::{ActionOutcome, Effect, Intent, PendingAction, Step};
use crate::model::ConsoleConfig;
use crate::session::SessionStore;
use crate::store::ConsoleHome;

use super::input::Input;
use super::modal;

mod actions;
mod event_loop;
mod render;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Screen {
    Login,
    Browser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Buckets,
    Objects,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LoginField {
    Url,
    Username,
    Password,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Url => LoginField::Username,
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Url,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::Url => LoginField::Password,
            LoginField::Username => LoginField::Url,
            LoginField::Password => LoginField::Username,
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct LoginForm {
    pub(super) url: Input,
    pub(super) username: Input,
    pub(super) password: Input,
    pub(super) field: Option<LoginField>,
    pub(super) error: Option<String>,
}

impl LoginForm {
    pub(super) fn focused(&self) -> LoginField {
        self.field.unwrap_or(LoginField::Url)
    }

    pub(super) fn input_mut(&mut self) -> &mut Input {
        match self.focused() {
            LoginField::Url => &mut self.url,
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct StatusLine {
    pub(super) text: String,
    pub(super) is_error: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum TextInputAction {
    CreateBucket,
    UploadFile,
    DownloadTo {
        key: String,
        version_id: Option<String>,
    },
}

#[derive(Debug)]
pub(super) enum ModalKind {
    Viewer,
    /// `done` is the status shown once the confirmed action completes.
    Confirm {
        pending: PendingAction,
        done: String,
    },
    TextInput {
        prompt: String,
        action: TextInputAction,
    },
}

#[derive(Debug)]
pub(super) struct Modal {
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: usize,
    pub(super) input: Input,
    pub(super) kind: ModalKind,
}

pub(super) struct App {
    pub(super) home: ConsoleHome,
    pub(super) persist_session: bool,
    pub(super) console: Option<Console>,
    pub(super) screen: Screen,
    pub(super) login: LoginForm,
    pub(super) focus: Focus,
    pub(super) bucket_sel: usize,
    pub(super) row_sel: usize,
    pub(super) modal: Option<Modal>,
    pub(super) status: Option<StatusLine>,
    pub(super) quit: bool,
}

impl App {
    pub(super) fn new(home: ConsoleHome, persist_session: bool) -> Self {
        Self {
            home,
            persist_session,
            console: None,
            screen: Screen::Login,
            login: LoginForm::default(),
            focus: Focus::Buckets,
            bucket_sel: 0,
            row_sel: 0,
            modal: None,
            status: None,
            quit: false,
        }
    }

    /// Loads config and any saved session; opens the browser when the saved
    /// token is still accepted, otherwise the login form.
    pub(super) fn load(home: ConsoleHome, persist_session: bool) -> Result<Self> {
        let mut app = Self::new(home, persist_session);
        let cfg = app.home.read_config()?;
        app.login.url = Input::with_value(cfg.base_url.as_deref().unwrap_or(""));
        app.login.username = Input::with_value(cfg.username.as_deref().unwrap_or(""));
        if cfg.base_url.is_some() && cfg.username.is_some() {
            app.login.field = Some(LoginField::Password);
        }

        if let Some(url) = cfg.base_url.as_deref() {
            match app.open_console(url) {
                Ok(console) if console.is_signed_in() => {
                    app.console = Some(console);
                    app.screen = Screen::Browser;
                    app.refresh();
                }
                Ok(console) => app.console = Some(console),
                Err(err) => app.login.error = Some(format!("{:#}", err)),
            }
        }
        Ok(app)
    }

    fn open_session(&self) -> Result<SessionStore> {
        if self.persist_session {
            SessionStore::open(&self.home.session_path())
        } else {
            Ok(SessionStore::in_memory())
        }
    }

    fn open_console(&self, url: &str) -> Result<Console> {
        let session = self.open_session()?;
        let api = ApiClient::new(url, session)?;
        Ok(Console::new(api))
    }

    pub(super) fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
        });
    }

    pub(super) fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: true,
        });
    }

    pub(super) fn open_modal(
        &mut self,
        title: impl Into<String>,
        lines: Vec<String>,
        kind: ModalKind,
    ) {
        self.modal = Some(Modal {
            title: title.into(),
            lines,
            scroll: 0,
            input: Input::default(),
            kind,
        });
    }

    pub(super) fn open_text_input(
        &mut self,
        title: impl Into<String>,
        prompt: impl Into<String>,
        initial: &str,
        action: TextInputAction,
    ) {
        self.modal = Some(Modal {
            title: title.into(),
            lines: Vec::new(),
            scroll: 0,
            input: Input::with_value(initial),
            kind: ModalKind::TextInput {
                prompt: prompt.into(),
                action,
            },
        });
    }

    pub(super) fn bucket_names(&self) -> Vec<String> {
        self.console
            .as_ref()
            .map(|c| {
                c.catalog()
                    .buckets()
                    .iter()
                    .map(|b| b.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn rows(&self) -> Vec<crate::projector::Row> {
        self.console.as_ref().map(Console::rows).unwrap_or_default()
    }

    pub(super) fn selected_row(&self) -> Option<crate::projector::Row> {
        self.rows().into_iter().nth(self.row_sel)
    }

    /// Keeps both cursors inside their lists after the data changed.
    pub(super) fn clamp_selection(&mut self) {
        let buckets = self.bucket_names().len();
        self.bucket_sel = self.bucket_sel.min(buckets.saturating_sub(1));
        let rows = self.rows().len();
        self.row_sel = self.row_sel.min(rows.saturating_sub(1));
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let len = match self.focus {
            Focus::Buckets => self.bucket_names().len(),
            Focus::Objects => self.rows().len(),
        };
        let sel = match self.focus {
            Focus::Buckets => &mut self.bucket_sel,
            Focus::Objects => &mut self.row_sel,
        };
        if len == 0 {
            *sel = 0;
            return;
        }
        let next = (*sel as isize + delta).clamp(0, len as isize - 1);
        *sel = next as usize;
    }

    pub(super) fn submit_login(&mut self) {
        let url = self.login.url.buf.trim().to_string();
        let username = self.login.username.buf.trim().to_string();
        let password = self.login.password.buf.clone();
        if url.is_empty() || username.is_empty() {
            self.login.error = Some("server url and username are required".to_string());
            return;
        }

        let needs_new_console = match self.console.as_ref() {
            Some(c) => c.api().base_url().as_str().trim_end_matches('/') != url.trim_end_matches('/'),
            None => true,
        };
        if needs_new_console {
            match self.open_console(&url) {
                Ok(console) => self.console = Some(console),
                Err(err) => {
                    self.login.error = Some(format!("{:#}", err));
                    return;
                }
            }
        }
        let Some(console) = self.console.as_mut() else {
            return;
        };

        match console.login(&username, &password) {
            Ok(()) => {
                self.login.password.clear();
                self.login.error = None;
                let cfg = ConsoleConfig {
                    base_url: Some(url),
                    username: Some(username.clone()),
                    ..self.home.read_config().unwrap_or_default()
                };
                if let Err(err) = self.home.write_config(&cfg) {
                    tracing::warn!("save config: {:#}", err);
                }
                self.screen = Screen::Browser;
                self.focus = Focus::Buckets;
                self.bucket_sel = 0;
                self.row_sel = 0;
                self.set_status(format!("signed in as {}", username));
                self.refresh();
            }
            Err(LoginError::Api(ApiError::LoginRejected)) => {
                self.login.password.clear();
                self.login.error = Some("invalid username or password".to_string());
            }
            Err(err) => {
                self.login.error = Some(format!("{:#}", anyhow::Error::new(err)));
            }
        }
    }

    pub(super) fn logout(&mut self) {
        if let Some(console) = self.console.as_mut() {
            if let Err(err) = console.logout() {
                tracing::warn!("logout: {:#}", err);
            }
        }
        self.screen = Screen::Login;
        self.login.field = Some(LoginField::Password);
        self.login.error = None;
        self.modal = None;
        self.status = None;
    }

    /// Returns to the login form after the server rejected the session.
    pub(super) fn session_ended(&mut self) {
        self.screen = Screen::Login;
        self.login.field = Some(LoginField::Password);
        self.login.password.clear();
        self.login.error = Some("session expired; sign in again".to_string());
        self.modal = None;
        self.bucket_sel = 0;
        self.row_sel = 0;
    }

    pub(super) fn refresh(&mut self) {
        self.run_intent(Intent::Refresh, "refreshed");
    }

    /// Starts `intent`; guarded ones open a confirmation dialog instead.
    pub(super) fn run_intent(&mut self, intent: Intent, done: &str) {
        let Some(console) = self.console.as_mut() else {
            return;
        };
        match console.begin(intent) {
            Step::Done(outcome) => self.apply_outcome(outcome, done),
            Step::NeedsConfirmation(pending) => {
                let confirmation = pending.confirmation().clone();
                self.open_modal(
                    confirmation.title.clone(),
                    confirmation.lines.clone(),
                    ModalKind::Confirm {
                        pending,
                        done: done.to_string(),
                    },
                );
            }
        }
    }

    pub(super) fn confirm_pending(&mut self, pending: PendingAction, done: &str) {
        let Some(console) = self.console.as_mut() else {
            return;
        };
        let outcome = console.confirm(pending);
        self.apply_outcome(outcome, done);
    }

    pub(super) fn cancel_pending(&mut self, pending: PendingAction) {
        let Some(console) = self.console.as_mut() else {
            return;
        };
        let outcome = console.cancel(pending);
        self.apply_outcome(outcome, "");
    }

    pub(super) fn apply_outcome(&mut self, outcome: ActionOutcome, done: &str) {
        match outcome {
            ActionOutcome::SessionEnded => self.session_ended(),
            other => match outcome_message(&other, done) {
                Some(StatusLine { text, is_error: true }) => self.set_error(text),
                Some(StatusLine { text, .. }) => self.set_status(text),
                None => {}
            },
        }
        self.clamp_selection();
    }
}

/// Status text for an outcome; `None` keeps the current status.
pub(super) fn outcome_message(outcome: &ActionOutcome, done: &str) -> Option<StatusLine> {
    let (text, is_error) = match outcome {
        ActionOutcome::Completed if done.is_empty() => return None,
        ActionOutcome::Completed => (done.to_string(), false),
        ActionOutcome::Cancelled => ("cancelled".to_string(), false),
        ActionOutcome::DownloadReady { url, .. } => (url.to_string(), false),
        ActionOutcome::SessionEnded => ("session expired; sign in again".to_string(), true),
        ActionOutcome::Failed {
            error,
            effect: Effect::Unknown,
        } => (
            format!("{} (may or may not have been applied; press r to refresh)", error),
            true,
        ),
        ActionOutcome::Failed { error, .. } => (error.to_string(), true),
        ActionOutcome::RefreshFailed { error } => (
            format!("done, but reloading failed: {} (press r to retry)", error),
            true,
        ),
    };
    Some(StatusLine { text, is_error })
}

pub(super) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!(
            "the interactive console needs a terminal; use a subcommand instead (see --help)"
        );
    }
    if let Some(path) = opts.log_file.as_deref() {
        crate::logging::init_file(path, "info")?;
    }

    let mut app = App::load(opts.home, opts.persist_session)?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

/// Default file name for a download: the last path segment of the key.
pub(super) fn default_download_path(key: &str) -> PathBuf {
    let name = key
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("download");
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
