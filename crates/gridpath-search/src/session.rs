//! Board editing and search runs behind one owner.

use std::ops::ControlFlow;

use log::debug;

use crate::board::Board;
use crate::cell::Pos;
use crate::error::{Result, SearchError};
use crate::search::{Outcome, Search, Step};

/// What a click did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Start,
    Goal,
    Barrier,
    Erased,
    Ignored,
}

/// A board plus its start and goal references.
///
/// A [`Search`] created by [`Session::begin`] borrows nothing from the
/// session; step it through [`Session::step`] so the marks land on this
/// board.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    start: Option<Pos>,
    goal: Option<Pos>,
}

impl Session {
    pub fn new(n: usize, total_width: u32) -> Self {
        Self {
            board: Board::build(n, total_width),
            start: None,
            goal: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<Pos> {
        self.goal
    }

    /// Both endpoints are placed.
    pub fn ready(&self) -> bool {
        self.start.is_some() && self.goal.is_some()
    }

    /// Primary click: the first click places the start, the next the goal,
    /// and later clicks place barriers. Clicks on an endpoint do nothing.
    pub fn primary(&mut self, pos: Pos) -> Edit {
        if !self.board.contains(pos) {
            return Edit::Ignored;
        }
        let is_start = self.start == Some(pos);
        let is_goal = self.goal == Some(pos);
        let edit = if self.start.is_none() && !is_goal {
            self.board.cell_at_mut(pos).make_start();
            self.start = Some(pos);
            Edit::Start
        } else if self.goal.is_none() && !is_start {
            self.board.cell_at_mut(pos).make_goal();
            self.goal = Some(pos);
            Edit::Goal
        } else if !is_start && !is_goal {
            self.board.cell_at_mut(pos).make_barrier();
            Edit::Barrier
        } else {
            Edit::Ignored
        };
        if edit != Edit::Ignored {
            debug!("{pos}: {edit:?}");
        }
        edit
    }

    /// Secondary click: reset the cell, forgetting it as an endpoint.
    pub fn secondary(&mut self, pos: Pos) -> Edit {
        if !self.board.contains(pos) {
            return Edit::Ignored;
        }
        self.board.cell_at_mut(pos).reset();
        if self.start == Some(pos) {
            self.start = None;
        } else if self.goal == Some(pos) {
            self.goal = None;
        }
        debug!("{pos}: erased");
        Edit::Erased
    }

    /// Fresh board of the same dimensions, no endpoints.
    pub fn clear(&mut self) {
        self.board = self.board.reset();
        self.start = None;
        self.goal = None;
        debug!("board cleared");
    }

    /// Wipe the previous run's marks and start a new search.
    pub fn begin(&mut self) -> Result<Search> {
        let start = self.start.ok_or(SearchError::MissingStart)?;
        let goal = self.goal.ok_or(SearchError::MissingGoal)?;
        self.board.clear_trail();
        Search::new(&self.board, start, goal)
    }

    #[inline]
    pub fn step(&mut self, search: &mut Search) -> Step {
        search.step(&mut self.board)
    }

    #[inline]
    pub fn abandon(&mut self, search: &mut Search) {
        search.abandon(&mut self.board);
    }

    /// Run a whole search, see [`crate::search`].
    pub fn run<F>(&mut self, on_step: F) -> Result<Outcome>
    where
        F: FnMut(&Board) -> ControlFlow<()>,
    {
        let mut search = self.begin()?;
        Ok(search.drive(&mut self.board, on_step))
    }
}
