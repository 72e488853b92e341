use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Dialog, Mode, Popup};
use crate::browser::Policy;
use crate::session::{CreateDialog, ExtractDialog};

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // The error modal sits above everything else.
    if !app.errors.is_empty() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_error();
        }
        return;
    }

    match app.popup {
        Some(Popup::Browser(dialog)) => handle_browser_key(app, dialog, key),
        Some(Popup::EditPath) => handle_edit_key(app, key),
        Some(Popup::About) => app.close_popup(),
        None => handle_main_key(app, key),
    }
}

fn handle_main_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Tab | KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('?') => app.show_about(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        _ => match app.mode {
            Mode::Extract => match key.code {
                KeyCode::Char('o') => app.open_dialog(Dialog::Extract(ExtractDialog::Open)),
                KeyCode::Char('x') => app.open_dialog(Dialog::Extract(ExtractDialog::Extract)),
                KeyCode::Char('e') => app.open_dialog(Dialog::Extract(ExtractDialog::Export)),
                KeyCode::Char('c') => app.close_archive(),
                _ => {}
            },
            Mode::Create => match key.code {
                KeyCode::Char('a') => app.open_dialog(Dialog::Create(CreateDialog::Add)),
                KeyCode::Char('s') => app.open_dialog(Dialog::Create(CreateDialog::Save)),
                KeyCode::Enter | KeyCode::Char('r') => app.begin_edit(),
                KeyCode::Char('d') | KeyCode::Delete => app.remove_selected(),
                _ => {}
            },
        },
    }
}

fn handle_browser_key(app: &mut App, dialog: Dialog, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let save_one = matches!(app.browser(dialog).policy(), Policy::SaveOne { .. });

    match key.code {
        KeyCode::Esc => app.cancel_dialog(),
        KeyCode::F(10) => app.confirm_dialog(),
        KeyCode::Char('o') if ctrl => app.confirm_dialog(),
        KeyCode::Enter => app.activate_row(),
        KeyCode::Up if shift => app.browser_mut(dialog).extend_selection(-1),
        KeyCode::Down if shift => app.browser_mut(dialog).extend_selection(1),
        KeyCode::Up => app.browser_mut(dialog).move_cursor(-1),
        KeyCode::Down => app.browser_mut(dialog).move_cursor(1),
        KeyCode::PageUp => app.browser_mut(dialog).move_cursor(-10),
        KeyCode::PageDown => app.browser_mut(dialog).move_cursor(10),
        KeyCode::Left if !save_one => app.browser_action(|b| b.go_up()),
        KeyCode::Char('b') if ctrl && app.browser(dialog).can_go_back() => {
            app.browser_action(|b| b.go_back())
        }
        KeyCode::F(5) => app.browser_action(|b| b.refresh()),
        KeyCode::F(2) => app.browser_mut(dialog).toggle_hidden(),
        KeyCode::F(3) => app.browser_mut(dialog).toggle_ascending(),
        KeyCode::F(4) => app.browser_mut(dialog).toggle_filter(),
        KeyCode::Char('a') if ctrl => app.browser_mut(dialog).set_all(true),
        KeyCode::Char('d') if ctrl => app.browser_mut(dialog).set_all(false),
        KeyCode::Char(' ') if !save_one => {
            let browser = app.browser_mut(dialog);
            if let Some(row) = browser.cursor_row() {
                browser.click(row);
            }
        }
        KeyCode::Tab if save_one => {
            let browser = app.browser_mut(dialog);
            if let Some(row) = browser.cursor_row() {
                browser.click(row);
            }
        }
        _ if save_one => {
            if let Some(input) = app.browser_mut(dialog).filename_mut() {
                edit_text(input, key);
            }
        }
        _ => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            if let Some(input) = app.create.edit_input_mut() {
                edit_text(input, key);
            }
        }
    }
}

/// Line-editing keys shared by every text field.
fn edit_text(input: &mut crate::input::TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.insert(c);
        }
        KeyCode::Backspace => input.delete_before(),
        KeyCode::Delete => input.delete_at(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

/// Handle a mouse event: the wheel scrolls whatever list is in front.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let delta = match mouse.kind {
        MouseEventKind::ScrollUp => -1,
        MouseEventKind::ScrollDown => 1,
        _ => return,
    };
    match app.popup {
        Some(Popup::Browser(dialog)) => app.browser_mut(dialog).move_cursor(delta),
        Some(_) => {}
        None => {
            if delta < 0 {
                app.select_previous();
            } else {
                app.select_next();
            }
        }
    }
}
