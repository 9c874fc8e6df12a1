pub use self::{
    board_display::BoardDisplay, piece_display::PieceDisplay, session_display::SessionDisplay,
    stats_display::StatsDisplay,
};

mod board_display;
mod piece_display;
mod session_display;
mod stats_display;

/// Width of one grid cell in terminal columns; two make a near-square
/// block.
pub(crate) const CELL_WIDTH: u16 = 2;

/// Display colors for the grid, the palette the game has always shipped
/// with. Entry 0 of the palette is the empty-cell background.
pub(crate) mod palette {
    use ratatui::style::Color;
    use stackris_engine::{Cell, ColorId};

    /// Empty-cell color, palette entry 0.
    pub(crate) const EMPTY_CELL: Color = Color::Rgb(38, 57, 61);

    /// Palette entries `1..NUM_COLORS`, indexed by `ColorId - 1`.
    const PIECE_COLORS: [Color; 7] = [
        Color::Rgb(234, 213, 0),
        Color::Rgb(219, 132, 1),
        Color::Rgb(90, 176, 189),
        Color::Rgb(137, 64, 135),
        Color::Rgb(204, 11, 16),
        Color::Rgb(56, 153, 46),
        Color::Rgb(21, 100, 166),
    ];

    pub(crate) fn color_of(id: ColorId) -> Color {
        PIECE_COLORS[usize::from(id.index()) - 1]
    }

    pub(crate) fn cell_color(cell: Cell) -> Color {
        cell.color().map_or(EMPTY_CELL, color_of)
    }
}
