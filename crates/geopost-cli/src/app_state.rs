use crate::tui::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub trait AppController {
    fn update(&mut self, action: Action);
    fn render(&mut self, f: &mut ratatui::Frame);
    fn should_quit(&self) -> bool;

    /// Whether the terminal bell should ring after this update. Reading it
    /// clears the request.
    fn take_bell(&mut self) -> bool {
        false
    }
}
