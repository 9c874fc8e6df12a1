use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Deserializer, Serialize};

use super::board::{Board, COLS};

/// Size of the color palette, including the reserved background entry 0.
pub const NUM_COLORS: u8 = 8;

/// The seven tetromino shapes, in catalog order.
///
/// The discriminant doubles as the catalog index. The shape decides the
/// rotation special-casing: `O` never rotates, and `Long`, `Z` and `S`
/// alternate between two orientations instead of cycling through four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Shape {
    Long = 0,
    O = 1,
    T = 2,
    L = 3,
    J = 4,
    Z = 5,
    S = 6,
}

impl Shape {
    /// Number of shapes in the catalog.
    pub const LEN: usize = 7;

    /// Whether this shape has only two true orientations.
    #[must_use]
    pub const fn two_orientations(self) -> bool {
        matches!(self, Shape::Long | Shape::Z | Shape::S)
    }
}

impl Distribution<Shape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        match rng.random_range(0..=6) {
            0 => Shape::Long,
            1 => Shape::O,
            2 => Shape::T,
            3 => Shape::L,
            4 => Shape::J,
            5 => Shape::Z,
            _ => Shape::S,
        }
    }
}

/// Identifier of a palette color, always in `1..NUM_COLORS`.
///
/// Entry 0 is the background color of empty cells and has no `ColorId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorId(u8);

impl ColorId {
    /// Wraps a palette index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is 0 or past the palette.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id >= 1 && id < NUM_COLORS);
        Self(id)
    }

    /// Palette index of this color, in `1..NUM_COLORS`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ColorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u8::deserialize(deserializer)?;
        if id == 0 || id >= NUM_COLORS {
            return Err(serde::de::Error::custom(format!(
                "color id must be in 1..{NUM_COLORS}, got {id}"
            )));
        }
        Ok(Self(id))
    }
}

impl Distribution<ColorId> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ColorId {
        ColorId(rng.random_range(1..NUM_COLORS))
    }
}

/// A grid coordinate, y increasing downward.
///
/// Signed so candidate positions may stick out past an edge while being
/// probed; [`Board::is_occupied`] treats those as occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

/// Catalog of the shapes as cell offsets within a 2×4 bounding box.
///
/// Encoding: `offset = x + 2 * y`, local x in {0, 1}, local y in {0..4}.
/// Entry [0] of each shape becomes the pivot cell.
const SHAPE_OFFSETS: [[i32; 4]; Shape::LEN] = [
    [5, 1, 3, 7], // Long
    [3, 0, 1, 2], // O
    [3, 1, 2, 5], // T
    [3, 0, 1, 5], // L
    [3, 1, 4, 5], // J
    [2, 3, 1, 4], // Z
    [2, 3, 0, 5], // S
];

/// A tetromino: four grid cells, a shape and a color.
///
/// `cells[0]` is the pivot; every rotation is an integer 90° transform of
/// the other three cells around it. There is no tracked orientation index:
/// the two-orientation shapes decide their rotation direction by comparing
/// the pivot's coordinates with the second cell's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    cells: [CellPos; 4],
    shape: Shape,
    color: ColorId,
}

impl Tetromino {
    /// Lays the shape out in its raw catalog orientation, straddling the
    /// horizontal center of the grid in the top four rows.
    ///
    /// The look-ahead piece stays in this layout; [`Self::activated`] turns
    /// it into the spawn silhouette when it enters play.
    #[must_use]
    pub fn spawn(shape: Shape, color: ColorId) -> Self {
        let center = COLS as i32 / 2 - 1;
        let cells = SHAPE_OFFSETS[shape as usize].map(|offset| CellPos {
            x: offset % 2 + center,
            y: offset / 2,
        });
        Self {
            cells,
            shape,
            color,
        }
    }

    /// The four occupied grid cells; `cells()[0]` is the pivot.
    #[must_use]
    pub fn cells(&self) -> &[CellPos; 4] {
        &self.cells
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    /// Turns a raw catalog layout into the natural spawn silhouette.
    ///
    /// T, L and J rotate left; every other shape rotates right (which the
    /// vertical catalog layout of `Long` redirects into a left rotation).
    /// Then the piece lifts by its category: `Long` two rows, `O` none,
    /// all others one row.
    #[must_use]
    pub fn activated(mut self) -> Self {
        match self.shape {
            Shape::T | Shape::L | Shape::J => self.rotate_left(),
            _ => self.rotate_right(),
        }
        let lift = match self.shape {
            Shape::Long => 2,
            Shape::O => 0,
            _ => 1,
        };
        for cell in &mut self.cells {
            cell.y -= lift;
        }
        self
    }

    /// Rotates the non-pivot cells 90° clockwise around the pivot.
    ///
    /// `O` never rotates. A two-orientation shape standing axis-aligned
    /// (pivot and second cell sharing an x) redirects to a left rotation,
    /// so it alternates between its two orientations instead of reaching a
    /// third one.
    pub fn rotate_right(&mut self) {
        if self.shape == Shape::O {
            return;
        }
        if self.shape.two_orientations() && self.cells[0].x == self.cells[1].x {
            self.rotate_left();
            return;
        }
        let pivot = self.cells[0];
        for cell in &mut self.cells[1..] {
            let CellPos { x, y } = *cell;
            cell.x = pivot.y - y + pivot.x;
            cell.y = x - pivot.x + pivot.y;
        }
    }

    /// Exact algebraic inverse of [`Self::rotate_right`]; the
    /// two-orientation redirect tests a shared y instead of a shared x.
    pub fn rotate_left(&mut self) {
        if self.shape == Shape::O {
            return;
        }
        if self.shape.two_orientations() && self.cells[0].y == self.cells[1].y {
            self.rotate_right();
            return;
        }
        let pivot = self.cells[0];
        for cell in &mut self.cells[1..] {
            let CellPos { x, y } = *cell;
            cell.x = y - pivot.y + pivot.x;
            cell.y = pivot.x - x + pivot.y;
        }
    }

    /// The fall-control rotation: rotate right, and on collision revert by
    /// rotating left (the algebraic inverse, redirects included) rather
    /// than restoring saved coordinates.
    pub fn try_rotation(&mut self, board: &Board) {
        self.rotate_right();
        if self.collides(board) {
            self.rotate_left();
        }
    }

    /// Returns a copy shifted by (dx, dy).
    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let mut moved = *self;
        for cell in &mut moved.cells {
            cell.x += dx;
            cell.y += dy;
        }
        moved
    }

    /// Returns whether any cell lies outside the grid or overlaps a locked
    /// cell.
    #[must_use]
    pub fn collides(&self, board: &Board) -> bool {
        self.cells
            .iter()
            .any(|cell| board.is_occupied(cell.x, cell.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SHAPES: [Shape; Shape::LEN] = [
        Shape::Long,
        Shape::O,
        Shape::T,
        Shape::L,
        Shape::J,
        Shape::Z,
        Shape::S,
    ];

    fn piece(shape: Shape) -> Tetromino {
        Tetromino::spawn(shape, ColorId::new(3))
    }

    fn sorted_cells(piece: &Tetromino) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.cells().iter().map(|c| (c.x, c.y)).collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_spawn_layout_straddles_center() {
        // O: offsets 3,0,1,2 within the 2×4 box, shifted to columns 4..6.
        let o = piece(Shape::O);
        assert_eq!(
            sorted_cells(&o),
            vec![(4, 0), (4, 1), (5, 0), (5, 1)],
        );

        // Long: a single column in the catalog layout.
        let long = piece(Shape::Long);
        assert_eq!(
            sorted_cells(&long),
            vec![(5, 0), (5, 1), (5, 2), (5, 3)],
        );
    }

    #[test]
    fn test_activated_long_rests_in_top_row() {
        let long = piece(Shape::Long).activated();
        assert_eq!(
            sorted_cells(&long),
            vec![(3, 0), (4, 0), (5, 0), (6, 0)],
        );
    }

    #[test]
    fn test_activated_pieces_fit_the_board() {
        let board = Board::new();
        for shape in ALL_SHAPES {
            let activated = piece(shape).activated();
            assert!(
                !activated.collides(&board),
                "{shape:?} spawns colliding: {:?}",
                activated.cells()
            );
            assert!(
                activated.cells().iter().all(|c| c.y <= 1),
                "{shape:?} spawns below the top rows: {:?}",
                activated.cells()
            );
        }
    }

    #[test]
    fn test_rotate_right_then_left_is_identity() {
        for shape in ALL_SHAPES {
            let original = piece(shape).activated().shifted(0, 5);
            let mut rotated = original;
            rotated.rotate_right();
            rotated.rotate_left();
            assert_eq!(rotated, original, "{shape:?}");
        }
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let original = piece(Shape::O).activated();
        let mut rotated = original;
        for _ in 0..5 {
            rotated.rotate_right();
            assert_eq!(rotated, original);
            rotated.rotate_left();
            assert_eq!(rotated, original);
        }
    }

    #[test]
    fn test_two_orientation_shapes_return_after_two_rotations() {
        let board = Board::new();
        for shape in [Shape::Long, Shape::Z, Shape::S] {
            // Away from the walls so neither rotation collides.
            let original = piece(shape).activated().shifted(0, 8);
            let mut rotated = original;
            rotated.try_rotation(&board);
            assert_ne!(rotated, original, "{shape:?} first rotation is a no-op");
            rotated.try_rotation(&board);
            assert_eq!(rotated, original, "{shape:?}");
        }
    }

    #[test]
    fn test_four_orientation_shapes_cycle() {
        for shape in [Shape::T, Shape::L, Shape::J] {
            let original = piece(shape).activated().shifted(0, 8);
            let mut rotated = original;
            for turn in 1..4 {
                rotated.rotate_right();
                assert_ne!(rotated, original, "{shape:?} repeats after {turn} turns");
            }
            rotated.rotate_right();
            assert_eq!(rotated, original, "{shape:?}");
        }
    }

    #[test]
    fn test_try_rotation_reverts_on_collision() {
        let board = Board::new();
        // A vertical Long hugging the left wall cannot swing horizontal:
        // the rotated cells would cross the wall.
        let mut long = piece(Shape::Long).activated().shifted(0, 8);
        long.try_rotation(&board); // now vertical
        let vertical = long.shifted(-(long.cells()[0].x), 0);
        assert_eq!(vertical.cells()[0].x, 0);

        let mut rotated = vertical;
        rotated.try_rotation(&board);
        assert_eq!(rotated, vertical);
    }

    #[test]
    fn test_shifted_moves_every_cell() {
        let original = piece(Shape::T);
        let moved = original.shifted(2, -1);
        for (before, after) in original.cells().iter().zip(moved.cells()) {
            assert_eq!(after.x, before.x + 2);
            assert_eq!(after.y, before.y - 1);
        }
        assert_eq!(moved.shifted(-2, 1), original);
    }

    #[test]
    fn test_collides_on_filled_cell_and_walls() {
        let mut board = Board::new();
        let long = piece(Shape::Long).activated().shifted(0, 10);
        assert!(!long.collides(&board));

        assert!(long.shifted(-4, 0).collides(&board), "left wall");
        assert!(long.shifted(4, 0).collides(&board), "right wall");
        assert!(long.shifted(0, 10).collides(&board), "floor");

        let cell = long.cells()[2];
        board.set_cell(cell.x as usize, cell.y as usize, ColorId::new(1));
        assert!(long.collides(&board));
    }

    #[test]
    fn test_shape_serialization_roundtrip() {
        for shape in ALL_SHAPES {
            let json = serde_json::to_string(&shape).unwrap();
            let back: Shape = serde_json::from_str(&json).unwrap();
            assert_eq!(back, shape);
        }
        assert_eq!(serde_json::to_string(&Shape::Long).unwrap(), "\"Long\"");
    }

    #[test]
    fn test_color_id_deserialization_validates_range() {
        let color: ColorId = serde_json::from_str("3").unwrap();
        assert_eq!(color, ColorId::new(3));

        assert!(serde_json::from_str::<ColorId>("0").is_err());
        assert!(serde_json::from_str::<ColorId>("8").is_err());
    }
}
