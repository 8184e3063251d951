use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a key event, dispatching on the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Dialog(_) => handle_dialog_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Navigation
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        // Tree
        KeyCode::Right | KeyCode::Char('l') => app.expand_selected(),
        KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char('.') => app.toggle_hidden(),
        KeyCode::F(5) | KeyCode::Char('R') => app.refresh(),
        KeyCode::Char(' ') => app.toggle_multi_select(),
        KeyCode::Char('>') => app.enter_selected_root(),
        KeyCode::Char('<') => app.leave_root(),

        // Clipboard
        KeyCode::Char('x') => app.cut_selection(),
        KeyCode::Char('y') | KeyCode::Char('c') => app.copy_selection(),
        KeyCode::Char('p') => app.paste_clipboard(),

        // Mutation
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('a') => app.create_entry(false),
        KeyCode::Char('A') => app.create_entry(true),
        KeyCode::Char('r') | KeyCode::F(2) => app.begin_rename(),

        // OS integration
        KeyCode::Char('o') => app.open_selected_with_os(),
        KeyCode::Char('O') => app.reveal_selected_in_os(),

        _ => {}
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.confirm_dialog(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.dialog_input_char(c)
        }
        KeyCode::Backspace => app.dialog_delete_char(),
        KeyCode::Left => app.dialog_move_cursor_left(),
        KeyCode::Right => app.dialog_move_cursor_right(),
        KeyCode::Home => app.dialog_cursor_home(),
        KeyCode::End => app.dialog_cursor_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DialogKind;
    use crossterm::event::KeyEventKind;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn setup() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        File::create(dir.path().join("one.txt")).unwrap();
        let app = App::new(dir.path(), Vec::new(), false).unwrap();
        (dir, app)
    }

    #[test]
    fn q_quits() {
        let (_dir, mut app) = setup();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn j_and_k_move_selection() {
        let (_dir, mut app) = setup();
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn dialog_mode_consumes_text_keys() {
        let (_dir, mut app) = setup();
        app.open_dialog(DialogKind::Error {
            message: "oops".into(),
        });
        // 'q' types into the dialog instead of quitting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn enter_confirms_dialog() {
        let (dir, mut app) = setup();
        app.select_path(&dir.path().join("one.txt"));
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::DeleteConfirm { .. })
        ));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!dir.path().join("one.txt").exists());
    }

    #[test]
    fn rename_key_opens_dialog_prefilled() {
        let (dir, mut app) = setup();
        app.select_path(&dir.path().join("one.txt"));
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert_eq!(app.dialog_state.input, "one.txt");
    }
}
