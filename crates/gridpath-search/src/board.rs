//! The [`Board`]: a fixed `n × n` lattice of [`Cell`]s.

use crate::cell::{Cell, CellState, Pos};

/// A square grid of cells. Size never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    width: u32,
    cell_size: u32,
    cells: Vec<Cell>,
}

impl Board {
    /// Build an `n × n` board spanning `total_width` pixels. Each cell is
    /// `total_width / n` pixels wide.
    pub fn build(n: usize, total_width: u32) -> Self {
        let cell_size = if n == 0 { 0 } else { total_width / n as u32 };
        let cells = (0..n * n).map(|i| Cell::new(Pos::new(i / n, i % n))).collect();
        Self {
            size: n,
            width: total_width,
            cell_size,
            cells,
        }
    }

    /// A freshly built board of the same dimensions.
    pub fn reset(&self) -> Self {
        Self::build(self.size, self.width)
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total width in pixels, as given to [`Board::build`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    #[inline]
    pub(crate) fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "cell {pos} outside {n}x{n} board",
            n = self.size
        );
        pos.row * self.size + pos.col
    }

    /// The cell at `pos`.
    ///
    /// # Panics
    ///
    /// If `pos` is outside the board.
    pub fn cell_at(&self, pos: Pos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Mutable access to the cell at `pos`.
    ///
    /// # Panics
    ///
    /// If `pos` is outside the board.
    pub fn cell_at_mut(&mut self, pos: Pos) -> &mut Cell {
        let i = self.index(pos);
        &mut self.cells[i]
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.contains(pos).then(|| self.cell_at(pos))
    }

    /// Passable cells one step away from `pos`, in the order down, up,
    /// left, right.
    ///
    /// Always reflects the current barrier layout; nothing is cached.
    pub fn neighbors_of(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        let Pos { row, col } = pos;
        let n = self.size;
        [
            (row + 1 < n).then_some(Pos::new(row + 1, col)),
            row.checked_sub(1).map(|r| Pos::new(r, col)),
            col.checked_sub(1).map(|c| Pos::new(row, c)),
            (col + 1 < n).then_some(Pos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |&p| !self.cell_at(p).is_barrier())
    }

    /// The cell containing pixel `(x, y)`, clamped onto the board. `None`
    /// only for an empty board.
    pub fn locate(&self, x: i32, y: i32) -> Option<Pos> {
        if self.size == 0 {
            return None;
        }
        let step = self.cell_size.max(1) as i32;
        let last = self.size - 1;
        let clamp = |v: i32| ((v.max(0) / step) as usize).min(last);
        Some(Pos::new(clamp(y), clamp(x)))
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    /// Reset every frontier, visited and path cell, keeping user marks.
    pub fn clear_trail(&mut self) {
        for cell in &mut self.cells {
            if cell.state().is_trail() {
                cell.reset();
            }
        }
    }
}
