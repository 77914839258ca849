use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn editing_moves_the_cursor_by_chars() {
    let mut input = Input::default();
    for c in "héllo".chars() {
        input.insert_char(c);
    }
    assert_eq!(input.buf, "héllo");
    assert_eq!(input.cursor, 5);

    input.move_left();
    input.move_left();
    input.backspace();
    assert_eq!(input.buf, "hélo");
    assert_eq!(input.cursor, 2);

    input.home();
    input.delete();
    assert_eq!(input.buf, "élo");
    input.insert_char('x');
    assert_eq!(input.buf, "xélo");
    assert_eq!(input.cursor, 1);
}

#[test]
fn edges_are_noops() {
    let mut input = Input::with_value("ab");
    assert_eq!(input.cursor, 2);
    input.delete();
    input.move_right();
    assert_eq!(input.buf, "ab");
    assert_eq!(input.cursor, 2);

    input.home();
    input.backspace();
    input.move_left();
    assert_eq!(input.buf, "ab");
    assert_eq!(input.cursor, 0);
}

#[test]
fn handle_key_ignores_control_chords() {
    let mut input = Input::default();
    assert!(input.handle_key(key(KeyCode::Char('a'))));
    assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!input.handle_key(key(KeyCode::Enter)));
    assert!(input.handle_key(key(KeyCode::Backspace)));
    assert_eq!(input.buf, "");
}

#[test]
fn masked_hides_every_char() {
    let input = Input::with_value("pässword");
    assert_eq!(input.masked(), "********");
}
