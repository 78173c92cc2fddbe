//! Board cells: [`Pos`] identity and [`CellState`] classification.

use std::fmt;

use gridpath_core::Point;

/// Row/column identity of a board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Canvas point for this cell when each cell is `cell_width` glyphs wide
    /// and one line tall.
    #[inline]
    pub fn to_point(self, cell_width: i32) -> Point {
        Point::new(self.col as i32 * cell_width, self.row as i32)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Display classification of a cell. Exactly one at a time.
///
/// `Barrier`, `Start` and `Goal` are user marks; `Frontier`, `Visited` and
/// `Path` are written by the search and only describe what the last run
/// did. The search itself never reads them back.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Unvisited,
    Frontier,
    Visited,
    Barrier,
    Start,
    Goal,
    Path,
}

impl CellState {
    /// Whether the state was produced by a search run.
    #[inline]
    pub const fn is_trail(self) -> bool {
        matches!(self, Self::Frontier | Self::Visited | Self::Path)
    }
}

/// A single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Pos,
    state: CellState,
}

impl Cell {
    pub(crate) const fn new(pos: Pos) -> Self {
        Self {
            pos,
            state: CellState::Unvisited,
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub fn is_unvisited(&self) -> bool {
        self.state == CellState::Unvisited
    }

    #[inline]
    pub fn is_frontier(&self) -> bool {
        self.state == CellState::Frontier
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.state == CellState::Visited
    }

    #[inline]
    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.state == CellState::Goal
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.state == CellState::Path
    }

    pub fn make_frontier(&mut self) {
        self.state = CellState::Frontier;
    }

    pub fn make_visited(&mut self) {
        self.state = CellState::Visited;
    }

    pub fn make_barrier(&mut self) {
        self.state = CellState::Barrier;
    }

    pub fn make_start(&mut self) {
        self.state = CellState::Start;
    }

    pub fn make_goal(&mut self) {
        self.state = CellState::Goal;
    }

    pub fn make_path(&mut self) {
        self.state = CellState::Path;
    }

    /// Back to `Unvisited`, whatever the current state.
    pub fn reset(&mut self) {
        self.state = CellState::Unvisited;
    }
}
