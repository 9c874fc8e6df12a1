use crossterm::event::Event as CrosstermEvent;

/// Events delivered to TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Application update timing (based on the tick interval).
    Tick,
    /// Screen render timing (based on the render interval).
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
}
