use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Block, Paragraph, Widget},
};
use stackris_engine::Progression;

/// Sidebar numbers: score, level and lines left in the level.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    progression: &'a Progression,
    block: Option<Block<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(progression: &'a Progression) -> Self {
        Self {
            progression,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn width(&self) -> u16 {
        14
    }

    pub fn height(&self) -> u16 {
        6 + 2
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let text = Text::from(vec![
            Line::raw("Score"),
            Line::raw(self.progression.score().to_string()),
            Line::raw("Level"),
            Line::raw(self.progression.level().to_string()),
            Line::raw("Lines left"),
            Line::raw(self.progression.lines_remaining().to_string()),
        ]);
        let paragraph = match &self.block {
            Some(block) => Paragraph::new(text).block(block.clone()),
            None => Paragraph::new(text),
        };
        paragraph.render(area, buf);
    }
}
