use std::time::Duration;

/// Frame rate the fall-delay derivation is calibrated against.
pub const FRAME_RATE: u32 = 60;

/// Frames per grid cell at level 0.
const LEVEL_ZERO_FRAMES_PER_CELL: u32 = 48;

/// Frames per grid cell while soft drop is held, regardless of level.
const SOFT_DROP_FRAMES_PER_CELL: u32 = 2;

/// Points for the number of rows cleared by one lock event, before the
/// (level + 1) multiplier. Multi-line clears reward super-linearly.
const CLEAR_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per gravity step while soft drop is held.
const SOFT_DROP_STEP_SCORE: u32 = 10;

/// Score, level and fall-speed state machine.
///
/// The lines-remaining counter decrements once per cleared row; reaching
/// zero levels up and recomputes both the counter and the fall delay. The
/// fall delay is also recomputed on every soft-drop toggle, since holding
/// soft drop overrides the level-derived speed with a fixed fast one.
///
/// Score and level never decrease within a session; only the game-over
/// [`reset`](Self::reset) returns them to zero.
#[derive(Debug, Clone)]
pub struct Progression {
    score: u32,
    level: u32,
    lines_remaining: u32,
    fall_delay: Duration,
    soft_drop: bool,
    total_lines_cleared: u32,
    completed_pieces: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Creates the level-0 state.
    #[must_use]
    pub fn new() -> Self {
        let mut this = Self {
            score: 0,
            level: 0,
            lines_remaining: 0,
            fall_delay: Duration::ZERO,
            soft_drop: false,
            total_lines_cleared: 0,
            completed_pieces: 0,
        };
        this.lines_remaining = lines_for_level(0);
        this.recompute_fall_delay();
        this
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Rows still to clear before the next level-up.
    #[must_use]
    pub fn lines_remaining(&self) -> u32 {
        self.lines_remaining
    }

    /// Current time between automatic gravity steps.
    #[must_use]
    pub fn fall_delay(&self) -> Duration {
        self.fall_delay
    }

    #[must_use]
    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    /// Total rows cleared this session.
    #[must_use]
    pub fn total_lines_cleared(&self) -> u32 {
        self.total_lines_cleared
    }

    /// Total pieces locked this session.
    #[must_use]
    pub fn completed_pieces(&self) -> u32 {
        self.completed_pieces
    }

    /// Sets the soft-drop hold state and rederives the fall delay.
    pub fn set_soft_drop(&mut self, held: bool) {
        self.soft_drop = held;
        self.recompute_fall_delay();
    }

    /// Awards the per-step bonus for a gravity step while soft drop is
    /// held. Called on every gravity step, before the collision check, so
    /// the step that ends in a lock is awarded too.
    pub fn award_gravity_step(&mut self) {
        if self.soft_drop {
            self.score += SOFT_DROP_STEP_SCORE;
        }
    }

    /// Accounts a single cleared row: decrements the lines-remaining
    /// counter and levels up when it reaches zero. Returns whether a
    /// level-up happened.
    ///
    /// Called once per row, so a multi-line clear can level up more than
    /// once when the counter is small.
    pub fn line_cleared(&mut self) -> bool {
        self.total_lines_cleared += 1;
        self.lines_remaining -= 1;
        if self.lines_remaining > 0 {
            return false;
        }
        self.level += 1;
        self.lines_remaining = lines_for_level(self.level);
        self.recompute_fall_delay();
        true
    }

    /// Accounts a completed lock event and awards its score, keyed by how
    /// many rows it cleared (0-4) and multiplied by (level + 1).
    ///
    /// Uses the level as it stands after any level-ups from the same lock
    /// event's [`line_cleared`](Self::line_cleared) calls.
    pub fn piece_locked(&mut self, lines_cleared: usize) {
        self.completed_pieces += 1;
        self.score += CLEAR_SCORES[lines_cleared] * (self.level + 1);
    }

    /// The game-over transition: score and level return to zero and the
    /// counter and delay rederive from level 0. The soft-drop hold state
    /// is an input condition and survives the reset.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 0;
        self.total_lines_cleared = 0;
        self.completed_pieces = 0;
        self.lines_remaining = lines_for_level(0);
        self.recompute_fall_delay();
    }

    fn recompute_fall_delay(&mut self) {
        let frames = if self.soft_drop {
            SOFT_DROP_FRAMES_PER_CELL
        } else {
            frames_per_cell(self.level)
        };
        self.fall_delay = Duration::from_millis(u64::from(frames * 1000 / FRAME_RATE));
    }
}

/// Rows to clear before leaving `level`, piecewise by level band.
fn lines_for_level(level: u32) -> u32 {
    if level <= 9 {
        level * 10 + 10
    } else if level <= 15 {
        100
    } else if level <= 25 {
        level * 10 - 50
    } else {
        200
    }
}

/// Frames the piece rests per grid cell, piecewise by level band.
fn frames_per_cell(level: u32) -> u32 {
    if level <= 8 {
        LEVEL_ZERO_FRAMES_PER_CELL - 5 * level
    } else if level <= 18 {
        9 - (level + 2) / 3
    } else if level <= 28 {
        2
    } else {
        1
    }
}
