//! Terminal setup and the input side of the event loop.

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::Duration;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Enter the alternate screen with bracketed paste, so a clipboard paste
/// arrives as one [`Action::Paste`] instead of a burst of key presses.
pub fn init() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;
    disable_raw_mode()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Tick,
    /// The terminal changed size. The next draw picks up the new area.
    Resize,
    Key(event::KeyEvent),
    Paste(String),
}

/// Wait up to `timeout` for the next terminal event. Times out as
/// [`Action::Tick`].
pub fn next_action(timeout: Duration) -> io::Result<Action> {
    if !event::poll(timeout)? {
        return Ok(Action::Tick);
    }
    Ok(action_for(event::read()?))
}

/// Translate a terminal event. Key releases and repeats, focus and mouse
/// events are folded into ticks.
pub fn action_for(event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Action::Key(key),
        Event::Paste(text) => Action::Paste(text),
        Event::Resize(..) => Action::Resize,
        _ => Action::Tick,
    }
}

/// Ring the terminal bell.
pub fn ring_bell() -> io::Result<()> {
    let mut out = io::stdout();
    out.write_all(b"\x07")?;
    out.flush()
}
