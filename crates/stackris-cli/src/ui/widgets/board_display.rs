use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Widget},
};
use stackris_engine::{COLS, GameSession, ROWS};

use super::{CELL_WIDTH, palette};

/// The grid with the falling piece overlaid.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    session: &'a GameSession,
    block: Option<Block<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        COLS as u16 * CELL_WIDTH + 2
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS as u16 + 2
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = match &self.block {
            Some(block) => {
                block.render(area, buf);
                block.inner(area)
            }
            None => area,
        };

        for (y, row) in self.session.board().rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                paint_cell(inner, buf, x as u16, y as u16, palette::cell_color(*cell));
            }
        }

        let piece = self.session.active_piece();
        let color = palette::color_of(piece.color());
        for cell in piece.cells() {
            let (Ok(x), Ok(y)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
                continue;
            };
            paint_cell(inner, buf, x, y, color);
        }
    }
}

fn paint_cell(inner: Rect, buf: &mut Buffer, x: u16, y: u16, color: Color) {
    let cell_area = Rect {
        x: inner.x.saturating_add(x * CELL_WIDTH),
        y: inner.y.saturating_add(y),
        width: CELL_WIDTH,
        height: 1,
    }
    .intersection(inner);
    buf.set_style(cell_area, Style::new().bg(color));
}
