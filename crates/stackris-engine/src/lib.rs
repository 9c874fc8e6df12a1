pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A move or rotation would overlap a filled cell or leave the grid.
///
/// This is an outcome report, not a failure: the session state is always
/// left at the last valid position, and drivers are free to ignore it.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested position")]
pub struct PieceCollisionError;
