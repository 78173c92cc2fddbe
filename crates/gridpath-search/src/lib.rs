//! Step-by-step A* search over an editable square grid.
//!
//! A [`Board`] holds `n × n` [`Cell`]s, each with a display [`CellState`].
//! [`Search`] runs A* (unit edge costs, [`manhattan`] heuristic) one visible
//! step at a time and writes its progress onto the board: frontier cells,
//! closed cells and finally the route. [`Session`] owns a board together
//! with its endpoints and implements the click editing rules.
//!
//! Scores and predecessors live in a [`SearchRecord`] that belongs to the
//! search, not to the board, so a board can be searched again after any
//! edit.
//!
//! ```
//! use std::ops::ControlFlow;
//! use gridpath_search::{Outcome, Pos, Session};
//!
//! let mut session = Session::new(8, 80);
//! session.primary(Pos::new(0, 0));
//! session.primary(Pos::new(7, 7));
//! let outcome = session.run(|_| ControlFlow::Continue(())).unwrap();
//! assert_eq!(outcome.path().map(|p| p.steps()), Some(14));
//! assert!(matches!(outcome, Outcome::Found(_)));
//! ```

mod board;
mod cell;
mod distance;
mod error;
mod path;
mod record;
mod search;
mod session;

#[cfg(test)]
mod testing;

pub use board::Board;
pub use cell::{Cell, CellState, Pos};
pub use distance::manhattan;
pub use error::{Result, SearchError};
pub use path::{Path, PathTracer, reconstruct};
pub use record::{SearchRecord, Status, UNREACHABLE};
pub use search::{Outcome, Search, Step, search};
pub use session::{Edit, Session};
