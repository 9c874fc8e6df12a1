use std::time::Duration;

use crate::{
    PieceCollisionError,
    core::{Board, Tetromino},
};

use super::{PieceGenerator, PieceSeed, Progression};

/// A discrete control input from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDropOn,
    SoftDropOff,
}

/// What a [`GameSession::tick`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickResult {
    /// Whether enough time had elapsed for a gravity step.
    pub stepped_gravity: bool,
    /// Set when the gravity step ended in a lock.
    pub lock: Option<LockOutcome>,
}

/// What happened when a piece locked into the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOutcome {
    /// Rows cleared by this lock event (0-4).
    pub lines_cleared: usize,
    /// Whether the lines-remaining counter crossed zero at least once.
    pub leveled_up: bool,
    /// Whether the follow-up spawn collided and reset the session.
    pub game_reset: bool,
}

/// The game core.
///
/// Owns the board, the active and look-ahead pieces, the generator and the
/// progression state, and mutates them in response to exactly two stimuli:
/// the gravity clock ([`tick`](Self::tick)) and discrete inputs
/// ([`apply`](Self::apply)). Every operation runs to completion, so the
/// state is consistent whenever control returns to the driver.
///
/// The session never performs I/O and never surfaces an error a driver
/// must handle: a rejected move reverts, and a blocked spawn resets the
/// whole session. Drivers poll the read-only queries after each call to
/// refresh their view.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Tetromino,
    next: Tetromino,
    generator: PieceGenerator,
    progression: Progression,
    since_gravity: Duration,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a session with a fresh random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_generator(PieceGenerator::new())
    }

    /// Like [`Self::new`], but with a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_generator(PieceGenerator::with_seed(seed))
    }

    fn from_generator(mut generator: PieceGenerator) -> Self {
        let active = spawn_piece(&mut generator).activated();
        let next = spawn_piece(&mut generator);
        Self {
            board: Board::new(),
            active,
            next,
            generator,
            progression: Progression::new(),
            since_gravity: Duration::ZERO,
        }
    }

    /// The locked-cell grid.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece.
    #[must_use]
    pub fn active_piece(&self) -> &Tetromino {
        &self.active
    }

    /// The look-ahead piece, still in its raw catalog layout. Renderers
    /// draw it relative to its own cells; the activation rotation and lift
    /// happen only when it enters play.
    #[must_use]
    pub fn next_piece(&self) -> &Tetromino {
        &self.next
    }

    /// Score, level, lines remaining and fall delay.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Applies a discrete input event. A result that would collide is
    /// reverted; no input is ever rejected outright.
    pub fn apply(&mut self, input: Input) {
        match input {
            Input::MoveLeft => _ = self.try_move_left(),
            Input::MoveRight => _ = self.try_move_right(),
            Input::RotateCw => self.try_rotation(),
            Input::SoftDropOn => self.set_soft_drop(true),
            Input::SoftDropOff => self.set_soft_drop(false),
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(-1)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_shift(1)
    }

    fn try_shift(&mut self, dx: i32) -> Result<(), PieceCollisionError> {
        let moved = self.active.shifted(dx, 0);
        if moved.collides(&self.board) {
            return Err(PieceCollisionError);
        }
        self.active = moved;
        Ok(())
    }

    /// Rotates the falling piece right, reverting through the inverse
    /// rotation on collision.
    pub fn try_rotation(&mut self) {
        self.active.try_rotation(&self.board);
    }

    /// Sets the soft-drop hold state; the fall delay updates immediately.
    pub fn set_soft_drop(&mut self, held: bool) {
        self.progression.set_soft_drop(held);
    }

    /// Advances the gravity clock by `elapsed` and performs at most one
    /// gravity step once the accumulated time reaches the current fall
    /// delay. The remainder is discarded on a step.
    pub fn tick(&mut self, elapsed: Duration) -> TickResult {
        self.since_gravity += elapsed;
        if self.since_gravity < self.progression.fall_delay() {
            return TickResult::default();
        }
        self.since_gravity = Duration::ZERO;
        TickResult {
            stepped_gravity: true,
            lock: self.step_gravity(),
        }
    }

    /// One gravity step: shift the piece down one row, awarding the held
    /// soft-drop bonus before the collision check. A blocked shift locks
    /// the piece at its resting position instead.
    fn step_gravity(&mut self) -> Option<LockOutcome> {
        let dropped = self.active.shifted(0, 1);
        self.progression.award_gravity_step();
        if !dropped.collides(&self.board) {
            self.active = dropped;
            return None;
        }
        Some(self.lock_active())
    }

    /// Locks the active piece into the board, compacts any filled rows it
    /// spans, accounts the progression and brings in the look-ahead piece.
    #[expect(clippy::cast_sign_loss)]
    fn lock_active(&mut self) -> LockOutcome {
        let color = self.active.color();
        let mut min_y = i32::MAX;
        let mut max_y = i32::MIN;
        for cell in self.active.cells() {
            min_y = min_y.min(cell.y);
            max_y = max_y.max(cell.y);
            self.board.set_cell(cell.x as usize, cell.y as usize, color);
        }

        // Scan only the spanned rows, bottom-up. A cleared row pulls the
        // rows above it down, so the same index is examined again.
        let mut lines_cleared = 0;
        let mut leveled_up = false;
        let mut row = max_y;
        while row >= min_y {
            if self.board.is_row_filled(row as usize) {
                self.board.clear_row(row as usize);
                lines_cleared += 1;
                leveled_up |= self.progression.line_cleared();
                continue;
            }
            row -= 1;
        }

        self.progression.piece_locked(lines_cleared);

        let game_reset = !self.spawn_next();
        LockOutcome {
            lines_cleared,
            leveled_up,
            game_reset,
        }
    }

    /// Activates the look-ahead piece and generates a new one. An
    /// activation that collides resets the whole session. Returns whether
    /// the spawn went through without a reset.
    fn spawn_next(&mut self) -> bool {
        self.active = self.next.activated();
        self.next = spawn_piece(&mut self.generator);
        if self.active.collides(&self.board) {
            self.reset();
            return false;
        }
        true
    }

    /// The game-over transition: board, score and level return to zero
    /// and two fresh pieces restore a fully playable state.
    fn reset(&mut self) {
        self.board.clear_all();
        self.progression.reset();
        self.active = spawn_piece(&mut self.generator).activated();
        self.next = spawn_piece(&mut self.generator);
        self.since_gravity = Duration::ZERO;
    }
}

fn spawn_piece(generator: &mut PieceGenerator) -> Tetromino {
    let (shape, color) = generator.next_piece();
    Tetromino::spawn(shape, color)
}

#[cfg(test)]
mod tests {
    use crate::core::{COLS, ColorId, ROWS, Shape};

    use super::*;

    fn seeded_session() -> GameSession {
        GameSession::with_seed("0123456789abcdeffedcba9876543210".parse().unwrap())
    }

    /// Replaces the falling piece, bypassing the generator.
    fn force_active(session: &mut GameSession, piece: Tetromino) {
        session.active = piece;
    }

    /// A horizontal Long resting on the floor at the left edge.
    fn long_on_floor() -> Tetromino {
        let piece = Tetromino::spawn(Shape::Long, ColorId::new(2)).activated();
        let left = piece.cells().iter().map(|c| c.x).min().unwrap();
        piece.shifted(-left, (ROWS - 1) as i32)
    }

    /// A vertical Long with its top four cells at the left edge, starting
    /// at `top_row`. Rotated board-free: the raw rotation may pass through
    /// off-board coordinates.
    fn vertical_long_at(color: u8, top_row: usize) -> Tetromino {
        let mut piece = Tetromino::spawn(Shape::Long, ColorId::new(color)).activated();
        piece.rotate_right();
        let left = piece.cells().iter().map(|c| c.x).min().unwrap();
        let top = piece.cells().iter().map(|c| c.y).min().unwrap();
        piece.shifted(-left, top_row as i32 - top)
    }

    fn fill_row_except(session: &mut GameSession, row: usize, gap: &[usize]) {
        for x in (0..COLS).filter(|x| !gap.contains(x)) {
            session.board.set_cell(x, row, ColorId::new(1));
        }
    }

    #[test]
    fn test_new_session_has_two_valid_pieces() {
        let session = seeded_session();
        assert!(!session.active_piece().collides(session.board()));
        assert_eq!(session.progression().score(), 0);
        assert_eq!(session.progression().level(), 0);
        // The look-ahead still has its raw catalog layout: top four rows,
        // straddling the center columns.
        for cell in session.next_piece().cells() {
            assert!((4..=5).contains(&cell.x));
            assert!((0..=3).contains(&cell.y));
        }
    }

    #[test]
    fn test_same_seed_same_session() {
        let a = seeded_session();
        let b = seeded_session();
        assert_eq!(a.active_piece(), b.active_piece());
        assert_eq!(a.next_piece(), b.next_piece());
    }

    #[test]
    fn test_tick_steps_only_after_fall_delay() {
        let mut session = seeded_session();
        let before = *session.active_piece();

        // Level 0 delay is 800ms; 799ms of ticks do nothing.
        let result = session.tick(Duration::from_millis(500));
        assert!(!result.stepped_gravity);
        let result = session.tick(Duration::from_millis(299));
        assert!(!result.stepped_gravity);
        assert_eq!(*session.active_piece(), before);

        // The next millisecond crosses the threshold.
        let result = session.tick(Duration::from_millis(1));
        assert!(result.stepped_gravity);
        assert_eq!(result.lock, None);
        assert_eq!(*session.active_piece(), before.shifted(0, 1));
    }

    #[test]
    fn test_move_left_then_right_restores_position() {
        let mut session = seeded_session();
        let before = *session.active_piece();
        session.apply(Input::MoveLeft);
        session.apply(Input::MoveRight);
        assert_eq!(*session.active_piece(), before);
    }

    #[test]
    fn test_rejected_move_leaves_piece_in_place() {
        let mut session = seeded_session();
        // Walk into the left wall; the first rejected move changes nothing.
        while session.try_move_left().is_ok() {}
        let at_wall = *session.active_piece();
        assert!(session.try_move_left().is_err());
        assert_eq!(*session.active_piece(), at_wall);
    }

    #[test]
    fn test_rotation_against_wall_reverts() {
        let mut session = seeded_session();
        // A vertical Long hugging the left wall cannot swing horizontal.
        let against_wall = vertical_long_at(3, 8);
        force_active(&mut session, against_wall);

        session.apply(Input::RotateCw);
        assert_eq!(*session.active_piece(), against_wall);
    }

    #[test]
    fn test_lock_on_floor_spawns_look_ahead() {
        let mut session = seeded_session();
        let expected_next = *session.next_piece();
        force_active(&mut session, long_on_floor());

        let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
        assert_eq!(outcome.lines_cleared, 0);
        assert!(!outcome.game_reset);

        // The resting cells were written with the piece's color.
        let bottom = (ROWS - 1) as i32;
        for x in 0..4 {
            assert_eq!(
                session.board().cell(x, bottom).unwrap().color(),
                Some(ColorId::new(2))
            );
        }

        // The look-ahead piece entered play, activated, and a fresh raw
        // look-ahead took its place.
        assert_eq!(*session.active_piece(), expected_next.activated());
        for cell in session.next_piece().cells() {
            assert!((0..=3).contains(&cell.y));
        }
    }

    #[test]
    fn test_single_line_clear_scores_and_counts() {
        let mut session = seeded_session();
        fill_row_except(&mut session, ROWS - 1, &[0, 1, 2, 3]);
        fill_row_except(&mut session, ROWS - 2, &[4]);
        force_active(&mut session, long_on_floor());

        let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
        assert_eq!(outcome.lines_cleared, 1);
        assert!(!outcome.leveled_up);

        assert_eq!(session.progression().score(), 40);
        assert_eq!(session.progression().lines_remaining(), 9);
        assert_eq!(session.progression().level(), 0);

        // The partial row above slid down into the cleared slot, keeping
        // its gap at x = 4.
        let bottom = (ROWS - 1) as i32;
        assert!(!session.board().is_occupied(4, bottom));
        assert!(session.board().is_occupied(5, bottom));
        assert!(!session.board().is_row_filled(ROWS - 2));
    }

    #[test]
    fn test_four_line_clear_awards_tetris_score() {
        let mut session = seeded_session();
        // Four bottom rows complete except the left column.
        for row in ROWS - 4..ROWS {
            fill_row_except(&mut session, row, &[0]);
        }
        force_active(&mut session, vertical_long_at(4, ROWS - 4));

        let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
        assert_eq!(outcome.lines_cleared, 4);
        assert!(!outcome.leveled_up);

        assert_eq!(session.progression().score(), 1200);
        assert_eq!(session.progression().lines_remaining(), 6);
        for row in ROWS - 4..ROWS {
            for x in 0..COLS {
                assert!(!session.board().is_occupied(x as i32, row as i32));
            }
        }
    }

    #[test]
    fn test_ten_singles_reach_level_one() {
        let mut session = seeded_session();
        for cleared in 1..=10 {
            fill_row_except(&mut session, ROWS - 1, &[0, 1, 2, 3]);
            force_active(&mut session, long_on_floor());
            let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
            assert_eq!(outcome.lines_cleared, 1);
            assert_eq!(outcome.leveled_up, cleared == 10);
            // Clear any leftover lock debris so the next round is clean.
            session.board.clear_all();
        }
        assert_eq!(session.progression().level(), 1);
        assert_eq!(session.progression().lines_remaining(), 20);
        // Nine singles at level 0, and the tenth with the multiplier of
        // the level it just reached.
        assert_eq!(session.progression().score(), 40 * 9 + 40 * 2);
    }

    #[test]
    fn test_blocked_spawn_resets_session() {
        let mut session = seeded_session();
        // Give the session something to score so the reset is visible.
        session.set_soft_drop(true);
        session.tick(Duration::from_millis(33));
        assert!(session.progression().score() > 0);
        session.set_soft_drop(false);

        // Stack the spawn rows so the next activation cannot fit.
        for row in 0..4 {
            fill_row_except(&mut session, row, &[]);
        }
        force_active(&mut session, long_on_floor());
        let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
        assert!(outcome.game_reset);

        assert_eq!(session.progression().score(), 0);
        assert_eq!(session.progression().level(), 0);
        assert_eq!(session.progression().lines_remaining(), 10);
        for y in 0..ROWS {
            for x in 0..COLS {
                assert!(!session.board().is_occupied(x as i32, y as i32));
            }
        }
        // Both pieces are fresh and playable.
        assert!(!session.active_piece().collides(session.board()));
        for cell in session.next_piece().cells() {
            assert!((0..=3).contains(&cell.y));
        }
    }

    #[test]
    fn test_soft_drop_speeds_up_and_scores_per_step() {
        let mut session = seeded_session();
        force_active(
            &mut session,
            Tetromino::spawn(Shape::Long, ColorId::new(2)).activated(),
        );
        session.apply(Input::SoftDropOn);
        assert_eq!(
            session.progression().fall_delay(),
            Duration::from_millis(33)
        );

        // Drive the piece from the top row to the floor. 19 falling steps
        // plus the locking step each award the 10-point bonus.
        let mut steps = 0;
        loop {
            let result = session.tick(Duration::from_millis(33));
            assert!(result.stepped_gravity);
            steps += 1;
            if let Some(outcome) = result.lock {
                assert_eq!(outcome.lines_cleared, 0);
                break;
            }
        }
        assert_eq!(steps, 20);
        assert_eq!(session.progression().score(), 200);

        session.apply(Input::SoftDropOff);
        assert_eq!(
            session.progression().fall_delay(),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn test_soft_drop_without_hold_scores_nothing() {
        let mut session = seeded_session();
        force_active(
            &mut session,
            Tetromino::spawn(Shape::Long, ColorId::new(2)).activated(),
        );
        loop {
            if session.tick(Duration::from_millis(800)).lock.is_some() {
                break;
            }
        }
        assert_eq!(session.progression().score(), 0);
    }

    #[test]
    fn test_multi_level_up_in_one_lock() {
        let mut session = seeded_session();
        // One line short of level 1: 9 singles.
        for _ in 0..9 {
            session.progression.line_cleared();
        }
        for row in ROWS - 4..ROWS {
            fill_row_except(&mut session, row, &[0]);
        }
        force_active(&mut session, vertical_long_at(4, ROWS - 4));

        let outcome = session.tick(Duration::from_millis(800)).lock.unwrap();
        assert_eq!(outcome.lines_cleared, 4);
        assert!(outcome.leveled_up);
        assert_eq!(session.progression().level(), 1);
        assert_eq!(session.progression().lines_remaining(), 17);
        // The multiplier uses the level after the level-up.
        assert_eq!(session.progression().score(), 1200 * 2);
    }
}
