use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Widget},
};
use stackris_engine::GameSession;

use super::{BoardDisplay, PieceDisplay, StatsDisplay};

/// Composed play view: the grid in the center, the score panel and the
/// next-piece preview in a sidebar.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    paused: bool,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            paused: false,
        }
    }

    pub fn paused(self, paused: bool) -> Self {
        Self { paused, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = if self.paused {
            Style::new().fg(Color::Yellow)
        } else {
            Style::new().fg(Color::White)
        };

        let game_board = BoardDisplay::new(self.session)
            .block(Block::bordered().border_style(border_style));
        let stats = StatsDisplay::new(self.session.progression()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .border_style(border_style),
        );
        let next_piece = PieceDisplay::new(self.session.next_piece()).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .border_style(border_style),
        );

        let [board_column, side_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(stats.width(), next_piece.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);
        let [stats_area, next_area] = Layout::vertical([
            Constraint::Length(stats.height()),
            Constraint::Length(next_piece.height()),
        ])
        .spacing(1)
        .areas(side_column);

        let board_width = game_board.width();
        game_board.render(board_area, buf);
        stats.render(stats_area, buf);
        next_piece.render(next_area, buf);

        if self.paused {
            let style = Style::new().fg(Color::Black).bg(Color::Yellow);
            let block = Block::new().style(style);
            let text = Text::styled("PAUSED", style).centered();
            let popup =
                board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(popup);
            Clear.render(popup, buf);
            block.render(popup, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
