use std::time::{Duration, Instant};

use crossterm::{
    event::{Event, KeyCode, KeyEventKind},
    terminal,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use stackris_engine::{GameSession, Input, PieceSeed};

use crate::{
    tui::{App, Tui},
    ui::widgets::SessionDisplay,
};

/// Updates and renders per second.
const FPS: f64 = 60.0;

/// Terminals without key-release reporting cannot tell us when the soft
/// drop key is let go; a pause in its key repeat stands in for the
/// release.
const SOFT_DROP_REPEAT_WINDOW: Duration = Duration::from_millis(150);

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for a reproducible piece sequence (32 hex characters)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let mut app = PlayApp::new(arg.seed);
    Tui::new().run(&mut app)
}

#[derive(Debug)]
struct PlayApp {
    session: GameSession,
    last_update: Instant,
    soft_drop_pressed_at: Option<Instant>,
    release_events: bool,
    paused: bool,
    is_exiting: bool,
}

impl PlayApp {
    fn new(seed: Option<PieceSeed>) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(seed),
            None => GameSession::new(),
        };
        Self {
            session,
            last_update: Instant::now(),
            soft_drop_pressed_at: None,
            release_events: terminal::supports_keyboard_enhancement().unwrap_or(false),
            paused: false,
            is_exiting: false,
        }
    }

    fn press_soft_drop(&mut self) {
        self.soft_drop_pressed_at = Some(Instant::now());
        self.session.apply(Input::SoftDropOn);
    }

    fn release_soft_drop(&mut self) {
        self.soft_drop_pressed_at = None;
        self.session.apply(Input::SoftDropOff);
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.release_soft_drop();
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_render_rate(FPS);
        self.last_update = Instant::now();
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind == KeyEventKind::Release {
            if key.code == KeyCode::Down {
                self.release_soft_drop();
            }
            return;
        }
        match key.code {
            KeyCode::Left if !self.paused => self.session.apply(Input::MoveLeft),
            KeyCode::Right if !self.paused => self.session.apply(Input::MoveRight),
            KeyCode::Up if !self.paused => self.session.apply(Input::RotateCw),
            KeyCode::Down if !self.paused => self.press_soft_drop(),
            KeyCode::Char('p') => self.toggle_pause(),
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            _ => {}
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_update;
        self.last_update = now;
        if self.paused {
            return;
        }
        if !self.release_events
            && let Some(pressed_at) = self.soft_drop_pressed_at
            && now.duration_since(pressed_at) > SOFT_DROP_REPEAT_WINDOW
        {
            self.release_soft_drop();
        }
        self.session.tick(elapsed);
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session).paused(self.paused);
        let help_text = if self.paused {
            "Controls: P (Resume) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | P (Pause) | Q (Quit)"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
