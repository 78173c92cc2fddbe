use thiserror::Error;

use crate::cell::Pos;

/// Convenient result alias for search invocations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// A search that was rejected before any work was done.
///
/// Running out of cells to expand is not an error; see
/// [`Outcome::Exhausted`](crate::Outcome::Exhausted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no goal cell has been placed")]
    MissingGoal,

    #[error("start and goal are the same cell {0}")]
    SameEndpoints(Pos),

    #[error("cell {pos} is outside the {size}x{size} board")]
    OutOfBounds { pos: Pos, size: usize },
}
