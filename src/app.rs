//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: every event
//! goes through [`App::update`] and the screen is redrawn from state by
//! [`App::view`].

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::capture::CaptureSink;
use crate::config::Config;
use crate::error::AppError;
use crate::events::{is_quit, Event, KeyContext};
use crate::ui::{
    render_context_help, CaptureAction, CaptureView, HomeView, ModalHost, NotificationManager,
    TagSource,
};
use crate::vault::VaultError;

/// Preferred size of the capture modal.
const MODAL_WIDTH: u16 = 72;
const MODAL_HEIGHT: u16 = 22;

/// The current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Nothing open.
    #[default]
    Home,
    /// The capture modal is open.
    Capturing,
    /// Application is in the process of exiting.
    Exiting,
}

/// Where captures go.
pub type BoxedSink = Box<dyn CaptureSink<Error = VaultError>>;

/// Produces the candidate tags each time the modal opens.
pub type TagLookup = Box<dyn Fn() -> Vec<String>>;

/// The main application struct that holds all state.
pub struct App {
    state: AppState,
    should_quit: bool,
    home: HomeView,
    modal: ModalHost<CaptureView>,
    notifications: NotificationManager,
    sink: BoxedSink,
    tag_lookup: TagLookup,
    config: Config,
}

impl App {
    /// Create the app storing into `sink` and offering tags from `tag_lookup`.
    pub fn new(config: Config, sink: BoxedSink, tag_lookup: TagLookup) -> Self {
        debug!("Creating new application instance");
        let vault_name = config
            .vault
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.vault.root.display().to_string());

        Self {
            state: AppState::Home,
            should_quit: false,
            home: HomeView::new(vault_name),
            modal: ModalHost::new("Quick Capture", MODAL_WIDTH, MODAL_HEIGHT),
            notifications: NotificationManager::new(),
            sink,
            tag_lookup,
            config,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn home(&self) -> &HomeView {
        &self.home
    }

    /// The open capture form, if any.
    pub fn capture_view(&self) -> Option<&CaptureView> {
        self.modal.content()
    }

    /// Show a toast for `error`, plus a hint when there is one.
    pub fn handle_error(&mut self, error: &AppError) {
        warn!(error = %error, critical = error.is_critical(), "Error");
        self.notifications.error(error.user_message());
        if let Some(hint) = error.suggested_action() {
            self.notifications.info(hint);
        }
    }

    /// Open the capture modal with a fresh form.
    pub fn open_capture(&mut self) {
        let tags = (self.tag_lookup)();
        debug!(candidates = tags.len(), "Opening capture");
        let settings = &self.config.settings;
        let view = CaptureView::new(
            TagSource::fixed(tags),
            settings.default_action,
            Duration::from_millis(settings.blur_hide_delay_ms),
        );
        self.modal.open(view);
        self.state = AppState::Capturing;
    }

    /// Close the capture modal, dropping whatever was typed.
    pub fn close_capture(&mut self) {
        if self.modal.close().is_some() {
            debug!("Capture closed");
        }
        self.state = AppState::Home;
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.modal.close();
        self.should_quit = true;
        self.state = AppState::Exiting;
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        self.update_at(event, Instant::now());
    }

    /// Like [`App::update`] with an explicit clock.
    pub fn update_at(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key, now);
            }
            Event::Mouse(mouse) => self.handle_mouse_event(mouse, now),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::FocusLost => {
                if let Some(view) = self.modal.content_mut() {
                    view.window_blurred(now);
                }
            }
            Event::FocusGained => {
                if let Some(view) = self.modal.content_mut() {
                    view.window_focused();
                }
            }
            Event::Tick => self.handle_tick(now),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if is_quit(&key) {
            self.quit();
            return;
        }

        match self.state {
            AppState::Home => match (key.code, key.modifiers) {
                (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
                    self.open_capture()
                }
                (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => self.quit(),
                _ => {}
            },
            AppState::Capturing => {
                let action = self
                    .modal
                    .content_mut()
                    .and_then(|view| view.handle_key(key, now));
                if let Some(action) = action {
                    self.handle_capture_action(action);
                }
            }
            AppState::Exiting => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        if self.state != AppState::Capturing {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        let action = if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
            && self.modal.is_save_button(pos)
        {
            self.modal.content().map(CaptureView::submit)
        } else {
            self.modal
                .content_mut()
                .and_then(|view| view.handle_mouse(mouse, now))
        };
        if let Some(action) = action {
            self.handle_capture_action(action);
        }
    }

    fn handle_capture_action(&mut self, action: CaptureAction) {
        match action {
            CaptureAction::Save(capture) => match self.sink.store(&capture) {
                Ok(destination) => {
                    info!(destination = %destination, "Capture saved");
                    self.notifications.success(format!("Saved to {}", destination));
                    self.home.record(destination);
                    if let Some(view) = self.modal.content_mut() {
                        view.reset_after_save();
                    }
                }
                Err(e) => self.handle_error(&AppError::from(e)),
            },
            CaptureAction::Invalid(message) => {
                debug!(reason = %message, "Save rejected");
                self.notifications.warning(message);
            }
            CaptureAction::Close => self.close_capture(),
        }
    }

    fn handle_tick(&mut self, now: Instant) {
        self.notifications.tick(now);
        if let Some(view) = self.modal.content_mut() {
            view.tick(now);
        }
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        self.home.render(frame, chunks[0]);
        self.modal
            .render_with(frame, chunks[0], |view, frame, inner| view.render(frame, inner));

        let context = self
            .modal
            .content()
            .map_or(KeyContext::Home, CaptureView::key_context);
        render_context_help(frame, chunks[1], context);

        self.notifications.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::capture::{Action, Capture, Mood};
    use crate::ui::{CaptureField, NotificationKind};

    type Stored = Rc<RefCell<Vec<Capture>>>;

    struct FakeSink {
        stored: Stored,
        fail: bool,
    }

    impl CaptureSink for FakeSink {
        type Error = VaultError;

        fn store(&mut self, capture: &Capture) -> Result<String, VaultError> {
            if self.fail {
                return Err(VaultError::Write {
                    path: PathBuf::from("Inbox.md"),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            self.stored.borrow_mut().push(capture.clone());
            Ok("Inbox.md".to_string())
        }
    }

    fn app_with(fail: bool) -> (App, Stored) {
        let stored = Stored::default();
        let sink = FakeSink {
            stored: Rc::clone(&stored),
            fail,
        };
        let lookup: TagLookup = Box::new(|| vec!["Rust".to_string(), "Ideas".to_string()]);
        (App::new(Config::default(), Box::new(sink), lookup), stored)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn ctrl(app: &mut App, c: char) {
        app.update(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
    }

    /// Open the form, pick a mood and write `text` in the note.
    fn fill_form(app: &mut App, text: &str) {
        press(app, KeyCode::Char('n'));
        press(app, KeyCode::Char('1'));
        press(app, KeyCode::Tab);
        press(app, KeyCode::Tab);
        press(app, KeyCode::Tab);
        type_text(app, text);
    }

    fn last_kind(app: &App) -> Option<NotificationKind> {
        app.notifications().iter().last().map(|n| n.kind)
    }

    #[test]
    fn test_home_keys() {
        let (mut app, _) = app_with(false);
        assert_eq!(app.state(), AppState::Home);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state(), AppState::Capturing);
        assert!(app.capture_view().is_some());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state(), AppState::Home);
        assert!(app.capture_view().is_none());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
        assert_eq!(app.state(), AppState::Exiting);
    }

    #[test]
    fn test_ctrl_c_quits_from_capture() {
        let (mut app, _) = app_with(false);
        press(&mut app, KeyCode::Char('n'));
        ctrl(&mut app, 'c');
        assert!(app.should_quit());
        assert!(app.capture_view().is_none());
    }

    #[test]
    fn test_typing_q_in_note_does_not_quit() {
        let (mut app, _) = app_with(false);
        fill_form(&mut app, "quick");
        assert!(!app.should_quit());
        assert_eq!(app.capture_view().unwrap().note_text(), "quick");
    }

    #[test]
    fn test_save_stores_and_keeps_modal_open() {
        let (mut app, stored) = app_with(false);
        fill_form(&mut app, "an idea");
        ctrl(&mut app, 's');

        let stored = stored.borrow();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "an idea");
        assert_eq!(stored[0].mood, Mood::Sunny);
        assert_eq!(stored[0].action, Action::CreateNote);

        assert_eq!(last_kind(&app), Some(NotificationKind::Success));
        assert_eq!(app.home().recent().next(), Some("Inbox.md"));

        let view = app.capture_view().unwrap();
        assert_eq!(view.note_text(), "");
        assert_eq!(view.mood(), None);
        assert_eq!(view.focus(), CaptureField::Note);
    }

    #[test]
    fn test_failed_save_keeps_text() {
        let (mut app, stored) = app_with(true);
        fill_form(&mut app, "keep me");
        ctrl(&mut app, 's');

        assert!(stored.borrow().is_empty());
        assert!(app
            .notifications()
            .iter()
            .any(|n| n.kind == NotificationKind::Error && n.message.contains("still here")));
        assert_eq!(app.capture_view().unwrap().note_text(), "keep me");
        assert_eq!(app.capture_view().unwrap().mood(), Some(Mood::Sunny));
    }

    #[test]
    fn test_incomplete_form_warns() {
        let (mut app, stored) = app_with(false);
        press(&mut app, KeyCode::Char('n'));
        ctrl(&mut app, 's');
        assert!(stored.borrow().is_empty());
        assert_eq!(last_kind(&app), Some(NotificationKind::Warning));
        assert_eq!(app.state(), AppState::Capturing);
    }

    #[test]
    fn test_candidates_come_from_lookup() {
        let (mut app, _) = app_with(false);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ru");
        let tags = app.capture_view().unwrap().tag_input();
        assert_eq!(tags.suggestions(), ["Rust"]);
    }

    #[test]
    fn test_click_save_button() {
        let (mut app, stored) = app_with(false);
        fill_form(&mut app, "clicked");

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();

        // The 72x22 modal is centered in the 80x23 content area at (4, 0);
        // the Save label starts two columns in on the top border.
        app.update(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(stored.borrow().len(), 1);
    }

    #[test]
    fn test_tick_expires_notifications() {
        let (mut app, _) = app_with(false);
        press(&mut app, KeyCode::Char('n'));
        ctrl(&mut app, 's');
        assert!(!app.notifications().is_empty());

        app.update_at(Event::Tick, Instant::now() + Duration::from_secs(10));
        assert!(app.notifications().is_empty());
    }

    #[test]
    fn test_view_shows_context_help() {
        let (mut app, _) = app_with(false);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("new capture"));

        press(&mut app, KeyCode::Char('n'));
        terminal.draw(|frame| app.view(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Quick Capture"));
        assert!(text.contains("[ Save ]"));
        assert!(text.contains("choose"));
    }
}
