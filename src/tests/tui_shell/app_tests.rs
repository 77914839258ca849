use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::confirm::FixedAnswer;
use crate::dispatcher::{ActionError, ActionPhase};

// Nothing listens on the discard port; requests fail at the transport level.
const UNREACHABLE: &str = "http://127.0.0.1:9/";

fn press(app: &mut App, code: KeyCode) {
    event_loop::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn new_app() -> (tempfile::TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let home = ConsoleHome::open(dir.path()).unwrap();
    (dir, App::new(home, false))
}

/// A browser-screen app whose console has `docs` selected.
fn browsing_docs() -> (tempfile::TempDir, App) {
    let (dir, mut app) = new_app();
    let api = ApiClient::new(UNREACHABLE, SessionStore::in_memory()).unwrap();
    let mut console = Console::new(api);
    console.dispatch(
        Intent::SelectBucket {
            name: "docs".to_string(),
        },
        &mut FixedAnswer(true),
    );
    assert_eq!(console.selected_bucket(), Some("docs"));
    app.console = Some(console);
    app.screen = Screen::Browser;
    (dir, app)
}

fn rollback() -> Intent {
    Intent::Rollback {
        key: "a.txt".to_string(),
        version_id: "v1".to_string(),
    }
}

#[test]
fn load_without_config_shows_login_form() {
    let dir = tempfile::tempdir().unwrap();
    let home = ConsoleHome::open(dir.path()).unwrap();
    let app = App::load(home, false).unwrap();
    assert_eq!(app.screen, Screen::Login);
    assert!(app.console.is_none());
    assert_eq!(app.login.focused(), LoginField::Url);
}

#[test]
fn load_prefills_login_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let home = ConsoleHome::open(dir.path()).unwrap();
    home.write_config(&ConsoleConfig {
        base_url: Some(UNREACHABLE.to_string()),
        username: Some("alice".to_string()),
        ..ConsoleConfig::default()
    })
    .unwrap();

    let app = App::load(home, false).unwrap();
    assert_eq!(app.screen, Screen::Login);
    assert_eq!(app.login.url.buf, UNREACHABLE);
    assert_eq!(app.login.username.buf, "alice");
    assert_eq!(app.login.focused(), LoginField::Password);
    assert!(app.console.is_some());
}

#[test]
fn login_form_cycles_fields_and_edits_the_focused_one() {
    let (_dir, mut app) = new_app();
    type_str(&mut app, "http://x");
    press(&mut app, KeyCode::Tab);
    type_str(&mut app, "bob");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.login.focused(), LoginField::Password);
    type_str(&mut app, "pw");
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::Backspace);

    assert_eq!(app.login.url.buf, "http://x");
    assert_eq!(app.login.username.buf, "bo");
    assert_eq!(app.login.password.buf, "pw");
    assert_eq!(app.login.password.masked(), "**");
}

#[test]
fn login_requires_url_and_username() {
    let (_dir, mut app) = new_app();
    app.login.field = Some(LoginField::Password);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.screen, Screen::Login);
    assert!(app.login.error.as_deref().unwrap().contains("required"));
}

#[test]
fn failed_login_stays_on_form_and_keeps_config_untouched() {
    let (dir, mut app) = new_app();
    app.login.url = Input::with_value(UNREACHABLE);
    app.login.username = Input::with_value("admin");
    app.login.password = Input::with_value("password");
    app.submit_login();

    assert_eq!(app.screen, Screen::Login);
    assert!(app.login.error.is_some());
    let cfg = ConsoleHome::open(dir.path()).unwrap().read_config().unwrap();
    assert_eq!(cfg.base_url, None);
}

#[test]
fn invalid_url_is_reported_on_the_form() {
    let (_dir, mut app) = new_app();
    app.login.url = Input::with_value("not a url");
    app.login.username = Input::with_value("admin");
    app.submit_login();
    assert!(app.console.is_none());
    assert!(app.login.error.is_some());
}

#[test]
fn guarded_intent_opens_confirmation_and_esc_cancels() {
    let (_dir, mut app) = browsing_docs();
    app.run_intent(rollback(), "rolled back");

    let modal = app.modal.as_ref().unwrap();
    assert!(matches!(modal.kind, ModalKind::Confirm { .. }));
    assert!(modal.lines.iter().any(|l| l.contains("cannot be undone")));
    assert_eq!(
        app.console.as_ref().unwrap().phase(),
        ActionPhase::ConfirmationPending
    );

    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
    assert_eq!(app.console.as_ref().unwrap().phase(), ActionPhase::Idle);
    assert_eq!(app.status.as_ref().unwrap().text, "cancelled");
}

#[test]
fn confirmed_action_reports_unknown_effect_on_transport_failure() {
    let (_dir, mut app) = browsing_docs();
    app.run_intent(rollback(), "rolled back");
    press(&mut app, KeyCode::Enter);

    assert!(app.modal.is_none());
    let status = app.status.as_ref().unwrap();
    assert!(status.is_error);
    assert!(status.text.contains("may or may not have been applied"));
    assert_eq!(app.screen, Screen::Browser);
}

#[test]
fn confirmation_carries_the_action_message() {
    let (_dir, mut app) = browsing_docs();
    app.run_intent(
        Intent::Delete {
            key: "a.txt".to_string(),
            version_id: Some("v1".to_string()),
        },
        "purged version v1 of a.txt",
    );
    match &app.modal.as_ref().unwrap().kind {
        ModalKind::Confirm { done, pending } => {
            assert_eq!(done, "purged version v1 of a.txt");
            assert!(pending.confirmation().title.contains("v1"));
        }
        other => panic!("unexpected modal {:?}", other),
    }

    // Cancelling does not report the action as done.
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.status.as_ref().unwrap().text, "cancelled");
}

#[test]
fn other_keys_leave_confirmation_open() {
    let (_dir, mut app) = browsing_docs();
    app.run_intent(rollback(), "rolled back");
    press(&mut app, KeyCode::Char('q'));
    assert!(app.modal.is_some());
    assert!(!app.quit);
}

#[test]
fn create_bucket_prompt_requires_a_value() {
    let (_dir, mut app) = browsing_docs();
    press(&mut app, KeyCode::Char('n'));
    assert!(matches!(
        app.modal.as_ref().unwrap().kind,
        ModalKind::TextInput {
            action: TextInputAction::CreateBucket,
            ..
        }
    ));

    press(&mut app, KeyCode::Enter);
    let modal = app.modal.as_ref().unwrap();
    assert_eq!(modal.lines, vec!["error: value required".to_string()]);

    press(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
}

#[test]
fn upload_of_missing_file_reports_error() {
    let (dir, mut app) = browsing_docs();
    let missing = dir.path().join("missing.bin");
    app.submit_text_input(TextInputAction::UploadFile, missing.display().to_string());
    let status = app.status.as_ref().unwrap();
    assert!(status.is_error);
    assert!(status.text.starts_with("read "));
}

#[test]
fn actions_on_empty_table_report_no_selection() {
    let (_dir, mut app) = browsing_docs();
    press(&mut app, KeyCode::Char('b'));
    assert!(app.modal.is_none());
    assert_eq!(app.status.as_ref().unwrap().text, "no version selected");
}

#[test]
fn upload_needs_an_open_bucket() {
    let (_dir, mut app) = new_app();
    app.screen = Screen::Browser;
    press(&mut app, KeyCode::Char('u'));
    assert!(app.modal.is_none());
    assert_eq!(app.status.as_ref().unwrap().text, "open a bucket first");
}

#[test]
fn selection_stays_in_bounds_on_empty_lists() {
    let (_dir, mut app) = browsing_docs();
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::PageDown);
    assert_eq!(app.bucket_sel, 0);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Objects);
    press(&mut app, KeyCode::Up);
    assert_eq!(app.row_sel, 0);
}

#[test]
fn view_toggle_updates_console_mode() {
    let (_dir, mut app) = browsing_docs();
    press(&mut app, KeyCode::Char('v'));
    assert_eq!(
        app.console.as_ref().unwrap().view_mode(),
        crate::projector::ViewMode::AllVersions
    );
    press(&mut app, KeyCode::Char('v'));
    assert_eq!(
        app.console.as_ref().unwrap().view_mode(),
        crate::projector::ViewMode::Latest
    );
}

#[test]
fn session_end_returns_to_login_with_message() {
    let (_dir, mut app) = browsing_docs();
    app.apply_outcome(ActionOutcome::SessionEnded, "done");
    assert_eq!(app.screen, Screen::Login);
    assert_eq!(app.login.focused(), LoginField::Password);
    assert!(app.login.error.as_deref().unwrap().contains("session expired"));
}

#[test]
fn quit_keys() {
    let (_dir, mut app) = browsing_docs();
    press(&mut app, KeyCode::Char('q'));
    assert!(app.quit);

    let (_dir, mut app) = new_app();
    event_loop::handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.quit);
}

#[test]
fn outcome_messages() {
    assert_eq!(outcome_message(&ActionOutcome::Completed, ""), None);
    assert_eq!(
        outcome_message(&ActionOutcome::Completed, "uploaded a.txt"),
        Some(StatusLine {
            text: "uploaded a.txt".to_string(),
            is_error: false,
        })
    );
    let failed = ActionOutcome::Failed {
        error: ActionError::NoBucketSelected,
        effect: Effect::Unchanged,
    };
    assert_eq!(
        outcome_message(&failed, "done"),
        Some(StatusLine {
            text: "no bucket selected".to_string(),
            is_error: true,
        })
    );
}

#[test]
fn download_path_defaults_to_last_key_segment() {
    assert_eq!(default_download_path("dir/sub/a.txt"), PathBuf::from("a.txt"));
    assert_eq!(default_download_path("dir/"), PathBuf::from("dir"));
    assert_eq!(default_download_path("plain"), PathBuf::from("plain"));
    assert_eq!(default_download_path(""), PathBuf::from("download"));
}
