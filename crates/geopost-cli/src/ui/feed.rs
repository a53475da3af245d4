use ratatui::{
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use geopost_input::{BoundedTextInput, Cue, EditAction, InputBuffer};
use geopost_models::{newest_first, Clock, CoordinateSource, Message};
use std::time::{Duration, Instant};

use super::centered_rect;
use crate::app_state::{AppController, InputMode};
use crate::controller::{flatten_line_breaks, FeedController, SubmitOutcome};
use crate::tui::Action;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const FLASH_TTL: Duration = Duration::from_millis(400);

/// Map a key press in the compose modal to a buffer operation.
///
/// Keys without a printable character (function keys, Tab, Ctrl/Alt
/// chords other than Ctrl+A) map to nothing and are never inserted.
pub fn edit_action_for(key: KeyEvent) -> Option<EditAction> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let action = match key.code {
        KeyCode::Enter => EditAction::Submit,
        KeyCode::Backspace => EditAction::Backspace,
        KeyCode::Delete => EditAction::Delete,
        KeyCode::Left if shift => EditAction::SelectLeft,
        KeyCode::Right if shift => EditAction::SelectRight,
        KeyCode::Left => EditAction::MoveLeft,
        KeyCode::Right => EditAction::MoveRight,
        KeyCode::Home => EditAction::MoveHome,
        KeyCode::End => EditAction::MoveEnd,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => EditAction::SelectAll,
        KeyCode::Char(c) if !chord && !c.is_control() => EditAction::InsertChar(c),
        _ => return None,
    };
    Some(action)
}

/// Split the buffer into rows of at most `width` characters, with the
/// selection shown reversed.
fn compose_lines(buffer: &InputBuffer, width: usize) -> Vec<Line<'static>> {
    let chars: Vec<char> = buffer.text().chars().collect();
    if chars.is_empty() || width == 0 {
        return vec![Line::default()];
    }
    let selection = buffer.selection().unwrap_or(0..0);
    let selected_style = Style::default().add_modifier(Modifier::REVERSED);

    chars
        .chunks(width)
        .enumerate()
        .map(|(row, chunk)| {
            let offset = row * width;
            let mut spans = Vec::new();
            let mut run = String::new();
            let mut run_selected = false;
            for (i, c) in chunk.iter().enumerate() {
                let selected = selection.contains(&(offset + i));
                if selected != run_selected && !run.is_empty() {
                    spans.push(styled_run(std::mem::take(&mut run), run_selected, selected_style));
                }
                run_selected = selected;
                run.push(*c);
            }
            if !run.is_empty() {
                spans.push(styled_run(run, run_selected, selected_style));
            }
            Line::from(spans)
        })
        .collect()
}

fn styled_run(text: String, selected: bool, style: Style) -> Span<'static> {
    if selected {
        Span::styled(text, style)
    } else {
        Span::raw(text)
    }
}

/// The interactive feed: a newest-first list with a compose modal.
pub struct FeedApp<C, S> {
    controller: FeedController<C, S>,
    should_quit: bool,

    // Feed
    messages: Vec<Message>,
    list_state: ListState,

    // Compose modal
    input_mode: InputMode,
    buffer: InputBuffer,
    flash_until: Option<Instant>,
    bell_pending: bool,

    // Status line
    notification: Option<(String, Instant)>,
    error: Option<String>,
}

impl<C: Clock, S: CoordinateSource> FeedApp<C, S> {
    pub fn new(controller: FeedController<C, S>, policy: BoundedTextInput) -> Self {
        let mut app = Self {
            controller,
            should_quit: false,
            messages: Vec::new(),
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            buffer: InputBuffer::new(policy),
            flash_until: None,
            bell_pending: false,
            notification: None,
            error: None,
        };
        app.reload();
        app
    }

    /// Re-read the store. On failure the previous snapshot stays on screen
    /// and the error goes to the status line.
    fn reload(&mut self) {
        match self.controller.feed() {
            Ok(messages) => {
                tracing::debug!(count = messages.len(), "feed loaded");
                self.messages = messages;
                self.error = None;
                self.reset_selection();
            }
            Err(e) => {
                tracing::error!(error = %e, "could not load feed");
                self.error = Some(e.to_string());
            }
        }
    }

    fn reset_selection(&mut self) {
        let first = if self.messages.is_empty() { None } else { Some(0) };
        self.list_state.select(first);
    }

    fn show_notification(&mut self, msg: impl Into<String>) {
        self.notification = Some((msg.into(), Instant::now()));
    }

    fn raise(&mut self, cue: Option<Cue>) {
        if let Some(Cue::Bell) = cue {
            self.bell_pending = true;
            self.flash_until = Some(Instant::now() + FLASH_TTL);
        }
    }

    fn is_flashing(&self) -> bool {
        self.flash_until.is_some_and(|until| Instant::now() < until)
    }

    fn scroll(&mut self, down: bool) {
        if self.messages.is_empty() {
            return;
        }
        let last = self.messages.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) if down => (i + 1).min(last),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn open_compose(&mut self) {
        self.input_mode = InputMode::Editing;
        self.flash_until = None;
    }

    fn close_compose(&mut self) {
        self.input_mode = InputMode::Normal;
        self.buffer.clear();
    }

    fn submit_input(&mut self) {
        match self.controller.submit(&mut self.buffer) {
            Ok(SubmitOutcome::Posted(posted)) => {
                self.raise(posted.cue);
                self.messages = posted.feed;
                self.error = None;
                self.reset_selection();
                self.input_mode = InputMode::Normal;
                self.show_notification("Posted");
            }
            Ok(SubmitOutcome::Suppressed { cue }) => {
                self.raise(cue);
                self.show_notification("Nothing to post");
            }
            Err(e) => {
                tracing::error!(error = %e, "post failed");
                self.error = Some(e.to_string());
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n' | '+') => self.open_compose(),
            KeyCode::Char('r') => {
                self.reload();
                if self.error.is_none() {
                    self.show_notification("Reloaded");
                }
            }
            KeyCode::Down => self.scroll(true),
            KeyCode::Up => self.scroll(false),
            _ => {}
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.close_compose();
            return;
        }
        match edit_action_for(key) {
            Some(EditAction::Submit) => self.submit_input(),
            Some(action) => {
                let outcome = self.buffer.apply(action);
                self.raise(outcome.cue);
            }
            None => {}
        }
    }

    fn render_compose(&self, f: &mut Frame) {
        let area = centered_rect(60, 30, f.area());
        f.render_widget(Clear, area);

        let counter_style = if self.is_flashing() {
            Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD)
        } else if self.buffer.remaining() == 0 {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("New message (Enter to post, Esc to cancel)")
            .title_bottom(Line::from(Span::styled(self.buffer.counter_label(), counter_style)).right_aligned());
        let inner = block.inner(area);
        let width = usize::from(inner.width.max(1));

        let text = Paragraph::new(compose_lines(&self.buffer, width))
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        f.render_widget(text, area);

        let cursor = self.buffer.cursor();
        let (row, col) = (cursor / width, cursor % width);
        if let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) {
            if row < inner.height {
                f.set_cursor_position(Position::new(inner.x + col, inner.y + row));
            }
        }
    }
}

impl<C: Clock, S: CoordinateSource> AppController for FeedApp<C, S> {
    fn update(&mut self, action: Action) {
        match action {
            Action::Key(key) => match self.input_mode {
                InputMode::Normal => self.handle_normal_key(key),
                InputMode::Editing => self.handle_editing_key(key),
            },
            Action::Paste(text) if self.input_mode == InputMode::Editing => {
                let outcome = self.buffer.paste(&flatten_line_breaks(&text));
                self.raise(outcome.cue);
            }
            _ => {}
        }

        if let Some((_, time)) = self.notification {
            if time.elapsed() > NOTIFICATION_TTL {
                self.notification = None;
            }
        }
        if !self.is_flashing() {
            self.flash_until = None;
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        let header = Paragraph::new(Line::from(vec![
            Span::raw("Store: "),
            Span::styled(
                self.controller.store().path().display().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  ({} messages)", self.messages.len())),
        ]))
        .block(Block::default().borders(Borders::ALL).title("GeoPost"));
        f.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = newest_first(&self.messages)
            .map(|m| {
                ListItem::new(Line::from(vec![
                    Span::styled(m.timestamp.to_string(), Style::default().fg(Color::Cyan)),
                    Span::raw(" - "),
                    Span::raw(m.text.clone()),
                    Span::styled(format!("  ({}, {})", m.lat, m.lon), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Feed"))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let status = if let Some(err) = &self.error {
            Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(Color::Red)))
        } else if let Some((msg, _)) = &self.notification {
            Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Green)))
        } else {
            Line::from(Span::styled(
                "n new  r reload  ↑/↓ scroll  q quit",
                Style::default().fg(Color::DarkGray),
            ))
        };
        f.render_widget(Paragraph::new(status), chunks[2]);

        if self.input_mode == InputMode::Editing {
            self.render_compose(f);
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopost_models::{Coordinate, ManualClock, MessageFactory, ScriptedCoordinates};
    use geopost_store::MessageStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::fs;
    use tempfile::TempDir;

    type TestApp = FeedApp<ManualClock, ScriptedCoordinates>;

    fn app(dir: &TempDir, max: usize) -> TestApp {
        let factory = MessageFactory::new(
            ManualClock::new("2024-01-01 10:00:00".parse().unwrap()),
            ScriptedCoordinates::new(vec![Coordinate::new(15.5, 32.5)]),
        )
        .max_chars(max);
        let store = MessageStore::new(dir.path().join("messages.json"));
        FeedApp::new(FeedController::new(store, factory), BoundedTextInput::new(max).unwrap())
    }

    fn key(code: KeyCode) -> Action {
        Action::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut TestApp, text: &str) {
        for c in text.chars() {
            app.update(key(KeyCode::Char(c)));
        }
    }

    fn screen(app: &mut TestApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn printable_keys_insert() {
        let k = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(edit_action_for(k), Some(EditAction::InsertChar('A')));
        let k = KeyEvent::new(KeyCode::Char('é'), KeyModifiers::NONE);
        assert_eq!(edit_action_for(k), Some(EditAction::InsertChar('é')));
    }

    #[test]
    fn non_printable_keys_are_ignored() {
        for code in [KeyCode::Tab, KeyCode::F(5), KeyCode::Insert] {
            assert_eq!(edit_action_for(KeyEvent::new(code, KeyModifiers::NONE)), None);
        }
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(edit_action_for(ctrl_x), None);
    }

    #[test]
    fn selection_and_submit_keys() {
        let shift_left = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(edit_action_for(shift_left), Some(EditAction::SelectLeft));
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(edit_action_for(ctrl_a), Some(EditAction::SelectAll));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(edit_action_for(enter), Some(EditAction::Submit));
    }

    #[test]
    fn compose_and_post() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "Hello");
        app.update(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].text, "Hello");
        assert!(app.buffer.is_empty());
        assert!(!app.take_bell());
    }

    #[test]
    fn typing_past_budget_rings_and_keeps_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 3);
        app.update(key(KeyCode::Char('+')));
        type_text(&mut app, "abc");
        assert!(!app.take_bell());

        app.update(key(KeyCode::Char('d')));
        assert_eq!(app.buffer.text(), "abc");
        assert!(app.take_bell());
        assert!(!app.take_bell());
        assert!(app.is_flashing());
    }

    #[test]
    fn paste_is_flattened_and_cut_to_budget() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 5);
        app.update(key(KeyCode::Char('n')));
        app.update(Action::Paste("ab\ncdefg".to_string()));
        assert_eq!(app.buffer.text(), "ab cd");
    }

    #[test]
    fn paste_outside_compose_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(Action::Paste("hello".to_string()));
        assert!(app.buffer.is_empty());
    }

    #[test]
    fn whitespace_only_enter_keeps_modal_open() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        type_text(&mut app, "   ");
        app.update(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.messages.is_empty());
        assert!(!dir.path().join("messages.json").exists());
    }

    #[test]
    fn escape_cancels_compose_then_quits() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        type_text(&mut app, "draft");
        app.update(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.buffer.is_empty());
        assert!(!app.should_quit());

        app.update(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn resize_keeps_compose_state() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        type_text(&mut app, "Hi");
        app.update(Action::Resize);

        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.buffer.text(), "Hi");
        assert!(screen(&mut app).contains("48/50"));
    }

    #[test]
    fn q_in_compose_is_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        app.update(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.buffer.text(), "q");
    }

    #[test]
    fn corrupt_store_is_reported_not_hidden() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages.json"), "{ nope").unwrap();
        let mut app = app(&dir, 50);
        assert!(app.error.is_some());
        assert!(screen(&mut app).contains("Error:"));
    }

    #[test]
    fn feed_renders_newest_first() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        for text in ["Hello", "World"] {
            app.update(key(KeyCode::Char('n')));
            type_text(&mut app, text);
            app.update(key(KeyCode::Enter));
        }
        let screen = screen(&mut app);
        let world = screen.find("World").unwrap();
        let hello = screen.find("Hello").unwrap();
        assert!(world < hello);
        assert!(screen.contains("2024-01-01 10:00:00"));
    }

    #[test]
    fn compose_modal_shows_counter() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, 50);
        app.update(key(KeyCode::Char('n')));
        type_text(&mut app, "Hi");
        assert!(screen(&mut app).contains("48/50"));
    }

    #[test]
    fn compose_lines_wrap_and_mark_selection() {
        let mut buffer = InputBuffer::new(BoundedTextInput::new(50).unwrap());
        buffer.set_text("abcdef");
        buffer.select_left();
        buffer.select_left();

        let lines = compose_lines(&buffer, 4);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].content, "abcd");
        assert_eq!(lines[1].spans[0].content, "ef");
        assert!(lines[1].spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }
}
