use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Widget},
};
use stackris_engine::Tetromino;

use super::{CELL_WIDTH, palette};

/// Preview of a piece outside the grid.
///
/// The look-ahead piece carries raw catalog coordinates, so the preview
/// draws each cell relative to the piece's own bounding box instead of a
/// grid position.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: &'a Tetromino,
    block: Option<Block<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(piece: &'a Tetromino) -> Self {
        Self { piece, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Wide enough for the 2-column catalog layout.
    pub fn width(&self) -> u16 {
        2 * CELL_WIDTH + 2
    }

    /// Tall enough for the 4-row catalog layout.
    pub fn height(&self) -> u16 {
        4 + 2
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
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

        let cells = self.piece.cells();
        let min_x = cells.iter().map(|c| c.x).min().unwrap_or(0);
        let min_y = cells.iter().map(|c| c.y).min().unwrap_or(0);
        let style = Style::new().bg(palette::color_of(self.piece.color()));

        for cell in cells {
            let (Ok(dx), Ok(dy)) = (
                u16::try_from(cell.x - min_x),
                u16::try_from(cell.y - min_y),
            ) else {
                continue;
            };
            let cell_area = Rect {
                x: inner.x.saturating_add(dx * CELL_WIDTH),
                y: inner.y.saturating_add(dy),
                width: CELL_WIDTH,
                height: 1,
            }
            .intersection(inner);
            buf.set_style(cell_area, style);
        }
    }
}
