use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::Pos;

/// Sentinel score for cells no route has reached yet.
pub const UNREACHABLE: i32 = i32::MAX;

/// Membership of a cell in the open set, kept apart from its display state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    New,
    Open,
    Closed,
}

/// Heap entry, ordered for `BinaryHeap` (a max-heap) so that the lowest `f`
/// pops first and equal `f` pops in insertion order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OpenEntry {
    pub(crate) f: i32,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-run bookkeeping: scores, predecessors and the open set.
///
/// Built fresh for every search and dropped with it.
#[derive(Debug, Clone)]
pub struct SearchRecord {
    size: usize,
    g: Vec<i32>,
    f: Vec<i32>,
    came_from: Vec<Option<usize>>,
    status: Vec<Status>,
    open: BinaryHeap<OpenEntry>,
    next_seq: u64,
}

impl SearchRecord {
    pub(crate) fn new(size: usize) -> Self {
        let len = size * size;
        Self {
            size,
            g: vec![UNREACHABLE; len],
            f: vec![UNREACHABLE; len],
            came_from: vec![None; len],
            status: vec![Status::New; len],
            open: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    #[inline]
    pub(crate) fn idx(&self, pos: Pos) -> usize {
        pos.row * self.size + pos.col
    }

    #[inline]
    pub(crate) fn pos(&self, idx: usize) -> Pos {
        Pos::new(idx / self.size, idx % self.size)
    }

    /// Push `idx` with its current `f`, stamping the next insertion number.
    pub(crate) fn push_open(&mut self, idx: usize) {
        self.open.push(OpenEntry {
            f: self.f[idx],
            seq: self.next_seq,
            idx,
        });
        self.next_seq += 1;
        self.status[idx] = Status::Open;
    }

    /// Pop the best entry and take it out of the open set.
    pub(crate) fn pop_open(&mut self) -> Option<usize> {
        let entry = self.open.pop()?;
        self.status[entry.idx] = Status::Closed;
        Some(entry.idx)
    }

    #[inline]
    pub(crate) fn set_scores(&mut self, idx: usize, g: i32, f: i32) {
        self.g[idx] = g;
        self.f[idx] = f;
    }

    #[inline]
    pub(crate) fn set_came_from(&mut self, idx: usize, from: usize) {
        self.came_from[idx] = Some(from);
    }

    #[inline]
    pub(crate) fn g_at(&self, idx: usize) -> i32 {
        self.g[idx]
    }

    #[inline]
    pub(crate) fn came_from_at(&self, idx: usize) -> Option<usize> {
        self.came_from[idx]
    }

    #[inline]
    pub(crate) fn is_open(&self, idx: usize) -> bool {
        self.status[idx] == Status::Open
    }

    /// Cost of the cheapest known route from the start, or [`UNREACHABLE`].
    pub fn g_score(&self, pos: Pos) -> i32 {
        self.g[self.idx(pos)]
    }

    /// `g + heuristic` for `pos`, or [`UNREACHABLE`].
    pub fn f_score(&self, pos: Pos) -> i32 {
        self.f[self.idx(pos)]
    }

    /// Predecessor of `pos` on its best known route.
    pub fn came_from(&self, pos: Pos) -> Option<Pos> {
        self.came_from[self.idx(pos)].map(|i| self.pos(i))
    }

    pub fn status(&self, pos: Pos) -> Status {
        self.status[self.idx(pos)]
    }

    /// Number of entries currently in the open set.
    pub fn open_len(&self) -> usize {
        self.open.len()
    }
}
