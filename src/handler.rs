use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick(Instant::now());
            app.poll_conversion().await;
        }
    }
    Ok(())
}

/// Modifier + Enter submits from the input pane. Many terminals deliver
/// Ctrl+Enter as Ctrl+J, so that counts too.
fn is_submit_chord(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT),
        KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        // Actions
        KeyCode::Char('c') => app.spawn_submit(),
        KeyCode::Char('t') => app.toggle_direction(),
        KeyCode::Char('y') => app.copy(),
        KeyCode::Char('s') => app.download(),
        KeyCode::Char('e') => app.load_example(),
        KeyCode::Char('x') => app.clear_all(),

        // Output scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_output_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_output_up(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if is_submit_chord(&key) {
        app.spawn_submit();
        return;
    }
    if key.code == KeyCode::Esc {
        app.input_mode = InputMode::Normal;
        return;
    }

    let input = app.input_mut();
    match key.code {
        KeyCode::Enter => input.insert('\n'),
        KeyCode::Tab => {
            input.insert(' ');
            input.insert(' ');
        }
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_output_down();
            app.scroll_output_down();
            app.scroll_output_down();
        }
        MouseEventKind::ScrollUp => {
            app.scroll_output_up();
            app.scroll_output_up();
            app.scroll_output_up();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MSG_EMPTY_INPUT;
    use crate::direction::Direction;
    use crate::platform::{Clipboard, FileSaver};
    use crate::service::{ConversionError, ConversionRequest, ConversionService, ServiceReply};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct RejectingService;

    #[async_trait]
    impl ConversionService for RejectingService {
        async fn convert(&self, _request: &ConversionRequest) -> Result<ServiceReply, ConversionError> {
            Ok(ServiceReply::Rejected { error: Some("bad input".to_string()) })
        }
    }

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn write_text(&self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoSaver;

    impl FileSaver for NoSaver {
        fn save(&self, _bytes: &[u8], file_name: &str) -> anyhow::Result<PathBuf> {
            Ok(PathBuf::from(file_name))
        }
    }

    fn test_app() -> App {
        App::new(Arc::new(RejectingService), Box::new(NoClipboard), Box::new(NoSaver))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_submit_chords() {
        assert!(is_submit_chord(&KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL)));
        assert!(is_submit_chord(&KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));
        assert!(is_submit_chord(&KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)));
        assert!(!is_submit_chord(&key(KeyCode::Enter)));
        assert!(!is_submit_chord(&key(KeyCode::Char('j'))));
    }

    #[test]
    fn test_editing_inserts_text_and_newlines() {
        let mut app = test_app();
        type_text(&mut app, "{");
        handle_key(&mut app, key(KeyCode::Enter));
        type_text(&mut app, "}");
        assert_eq!(app.input().text(), "{\n}");
    }

    #[test]
    fn test_submit_chord_with_blank_input() {
        let mut app = test_app();
        type_text(&mut app, "   ");
        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL));
        assert_eq!(app.feedback().error(), Some(MSG_EMPTY_INPUT));
        assert!(!app.is_busy());
    }

    #[tokio::test]
    async fn test_submit_chord_settles_on_tick() {
        let mut app = test_app();
        type_text(&mut app, "{oops");
        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL));
        assert!(app.is_busy());

        while app.is_busy() {
            tokio::task::yield_now().await;
            handle_event(&mut app, AppEvent::Tick).await.unwrap();
        }

        assert_eq!(app.feedback().error(), Some("bad input"));
        assert_eq!(app.output(), "");
    }

    #[test]
    fn test_normal_mode_actions() {
        let mut app = test_app();
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_key(&mut app, key(KeyCode::Char('e')));
        assert!(!app.input().is_empty());

        handle_key(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.direction(), Direction::StructuredTextToJson);
        assert!(app.input().is_empty());

        handle_key(&mut app, key(KeyCode::Char('y')));
        assert_eq!(app.feedback().error(), Some("No data to copy"));

        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.input().is_empty());
    }
}
