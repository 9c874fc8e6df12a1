//! Game logic and state management.
//!
//! - [`GameSession`] - The orchestrator: spawn, move, rotate, gravity
//!   tick, lock, clear, score, level-up, game-over reset
//! - [`PieceGenerator`] - Seeded uniform source of (shape, color) pairs
//! - [`Progression`] - Score, level and fall-speed state machine
//!
//! # Game Flow
//!
//! The external driver owns the clock and the input device; the session
//! owns everything else:
//!
//! 1. Create a [`GameSession`] (optionally from a [`PieceSeed`])
//! 2. Call [`GameSession::tick`] on a fixed cadence; the session decides
//!    when enough time has elapsed for a gravity step
//! 3. Forward discrete inputs through [`GameSession::apply`]
//! 4. Poll the read-only queries after each call to refresh the view
//!
//! A piece that can no longer fall locks into the board, filled rows are
//! compacted, and the look-ahead piece enters play. A look-ahead piece
//! that cannot enter play resets the whole session; there is no terminal
//! game-over state.

pub use self::{game_session::*, piece_generator::*, progression::*};

mod game_session;
mod piece_generator;
mod progression;
