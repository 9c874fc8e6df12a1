use crossterm::event::Event;
use ratatui::Frame;

use super::runner::Tui;

/// Trait for TUI applications driven by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts. Use this to configure
    /// the tick and render rates.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the event loop should stop.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key input, mouse, resize, ...).
    fn handle_event(&mut self, event: Event);

    /// Advances application state (called on each tick).
    fn update(&mut self);

    /// Renders the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);
}
