//! Path reconstruction: walking predecessors back from the goal.

use std::ops::ControlFlow;

use crate::board::Board;
use crate::cell::Pos;
use crate::record::SearchRecord;

/// A route from start to goal, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<Pos>,
}

impl Path {
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Number of moves (edges) along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Pos> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Pos> {
        self.cells.last().copied()
    }

    /// Cells strictly between start and goal.
    pub fn interior(&self) -> &[Pos] {
        match self.cells.len() {
            0..=2 => &[],
            n => &self.cells[1..n - 1],
        }
    }
}

/// Incremental predecessor walk. Each [`advance`](PathTracer::advance)
/// marks at most one cell, so a caller can redraw in between.
#[derive(Debug, Clone)]
pub struct PathTracer {
    cursor: usize,
    // goal first, then each marked cell, then the start once reached
    cells: Vec<Pos>,
    done: bool,
}

impl PathTracer {
    pub fn new(record: &SearchRecord, goal: Pos) -> Self {
        Self {
            cursor: record.idx(goal),
            cells: vec![goal],
            done: false,
        }
    }

    /// Follow one predecessor link. If it leads to an intermediate cell,
    /// mark it `Path` and return it; if it leads to the start (a cell with
    /// no predecessor of its own) stop without marking.
    pub fn advance(&mut self, record: &SearchRecord, board: &mut Board) -> Option<Pos> {
        if self.done {
            return None;
        }
        let Some(prev) = record.came_from_at(self.cursor) else {
            self.done = true;
            return None;
        };
        let pos = record.pos(prev);
        if record.came_from_at(prev).is_none() {
            self.cells.push(pos);
            self.done = true;
            return None;
        }
        board.cell_at_mut(pos).make_path();
        self.cells.push(pos);
        self.cursor = prev;
        Some(pos)
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The traced route in start-to-goal order.
    pub fn into_path(self) -> Path {
        let mut cells = self.cells;
        cells.reverse();
        Path { cells }
    }
}

/// Mark the route to `goal` on `board`, calling `on_step` after every marked
/// cell. Start and goal keep their own states.
///
/// Stops early with `Break` if `on_step` does.
pub fn reconstruct<F>(
    record: &SearchRecord,
    board: &mut Board,
    goal: Pos,
    mut on_step: F,
) -> ControlFlow<(), Path>
where
    F: FnMut(&Board) -> ControlFlow<()>,
{
    let mut tracer = PathTracer::new(record, goal);
    while tracer.advance(record, board).is_some() {
        on_step(board)?;
    }
    ControlFlow::Continue(tracer.into_path())
}
