//! A* over a [`Board`] with unit edge costs and the Manhattan heuristic.
//!
//! The engine is a stepper: every call to [`Search::step`] does one unit of
//! visible work (one expansion, or one path cell) and returns, so a caller
//! can redraw or give up between steps. [`search`] drives a stepper to the
//! end with a callback.

use std::ops::ControlFlow;

use log::{debug, trace};

use crate::board::Board;
use crate::cell::Pos;
use crate::distance::manhattan;
use crate::error::{Result, SearchError};
use crate::path::{Path, PathTracer};
use crate::record::SearchRecord;

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was reached; the route is marked on the board.
    Found(Path),
    /// Every reachable cell was expanded without meeting the goal.
    Exhausted,
    /// The caller stopped the search.
    Cancelled,
}

impl Outcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            _ => None,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// What one call to [`Search::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A cell was taken off the open set and its neighbours relaxed.
    Expanded(Pos),
    /// A path cell was marked during reconstruction.
    Marked(Pos),
    /// The search is over. Further calls return the same outcome.
    Finished(Outcome),
}

enum Phase {
    /// `last` is the cell expanded by the previous step; it is closed at the
    /// start of the next one, after the caller has seen it.
    Expanding { last: Option<Pos> },
    Tracing(PathTracer),
    Finished(Outcome),
}

/// One A* run from `start` to `goal`.
///
/// The search owns its [`SearchRecord`] but not the board: every step takes
/// the board by `&mut` and only changes cell display states.
pub struct Search {
    start: Pos,
    goal: Pos,
    record: SearchRecord,
    phase: Phase,
    expanded: usize,
    nbuf: Vec<Pos>,
}

impl Search {
    /// Prepare a run. Fails if either endpoint is off the board or they are
    /// the same cell.
    pub fn new(board: &Board, start: Pos, goal: Pos) -> Result<Self> {
        for pos in [start, goal] {
            if !board.contains(pos) {
                return Err(SearchError::OutOfBounds {
                    pos,
                    size: board.size(),
                });
            }
        }
        if start == goal {
            return Err(SearchError::SameEndpoints(start));
        }

        let mut record = SearchRecord::new(board.size());
        let si = record.idx(start);
        record.set_scores(si, 0, manhattan(start, goal));
        record.push_open(si);

        debug!(
            "search {start} -> {goal} on {n}x{n} board",
            n = board.size()
        );

        Ok(Self {
            start,
            goal,
            record,
            phase: Phase::Expanding { last: None },
            expanded: 0,
            nbuf: Vec::with_capacity(4),
        })
    }

    #[inline]
    pub fn start(&self) -> Pos {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Pos {
        self.goal
    }

    /// Scores and predecessors gathered so far.
    #[inline]
    pub fn record(&self) -> &SearchRecord {
        &self.record
    }

    /// Number of cells taken off the open set so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    pub fn g_score(&self, pos: Pos) -> i32 {
        self.record.g_score(pos)
    }

    pub fn f_score(&self, pos: Pos) -> i32 {
        self.record.f_score(pos)
    }

    pub fn came_from(&self, pos: Pos) -> Option<Pos> {
        self.record.came_from(pos)
    }

    /// The outcome, once finished.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Advance by one visible step.
    pub fn step(&mut self, board: &mut Board) -> Step {
        loop {
            let phase = std::mem::replace(&mut self.phase, Phase::Expanding { last: None });
            match phase {
                Phase::Expanding { last } => {
                    if let Some(prev) = last.filter(|&p| p != self.start) {
                        board.cell_at_mut(prev).make_visited();
                    }

                    let Some(ci) = self.record.pop_open() else {
                        debug!("search exhausted after {} expansions", self.expanded);
                        return self.finish(Outcome::Exhausted);
                    };
                    self.expanded += 1;
                    let current = self.record.pos(ci);

                    if current == self.goal {
                        debug!(
                            "goal {} reached after {} expansions, g = {}",
                            self.goal,
                            self.expanded,
                            self.record.g_at(ci)
                        );
                        self.phase = Phase::Tracing(PathTracer::new(&self.record, self.goal));
                        continue;
                    }

                    self.relax(board, ci, current);
                    self.phase = Phase::Expanding {
                        last: Some(current),
                    };
                    return Step::Expanded(current);
                }
                Phase::Tracing(mut tracer) => {
                    if let Some(pos) = tracer.advance(&self.record, board) {
                        self.phase = Phase::Tracing(tracer);
                        return Step::Marked(pos);
                    }
                    board.cell_at_mut(self.start).make_start();
                    board.cell_at_mut(self.goal).make_goal();
                    let path = tracer.into_path();
                    debug!("path of {} steps marked", path.steps());
                    return self.finish(Outcome::Found(path));
                }
                Phase::Finished(outcome) => {
                    self.phase = Phase::Finished(outcome.clone());
                    return Step::Finished(outcome);
                }
            }
        }
    }

    /// Relax every passable neighbour of `current`. Cells already in the
    /// open set get new scores but are not pushed again.
    fn relax(&mut self, board: &mut Board, ci: usize, current: Pos) {
        let tentative_g = self.record.g_at(ci) + 1;

        self.nbuf.clear();
        self.nbuf.extend(board.neighbors_of(current));

        for &np in &self.nbuf {
            let ni = self.record.idx(np);
            if tentative_g >= self.record.g_at(ni) {
                continue;
            }
            self.record.set_came_from(ni, ci);
            self.record
                .set_scores(ni, tentative_g, tentative_g + manhattan(np, self.goal));
            if !self.record.is_open(ni) {
                self.record.push_open(ni);
                board.cell_at_mut(np).make_frontier();
            }
        }
        trace!(
            "expanded {current}: g = {}, open = {}",
            tentative_g - 1,
            self.record.open_len()
        );
    }

    /// Stop a run that has not finished, putting the endpoint marks back.
    /// Finished runs are left alone.
    pub fn abandon(&mut self, board: &mut Board) {
        if self.outcome().is_some() {
            return;
        }
        board.cell_at_mut(self.start).make_start();
        board.cell_at_mut(self.goal).make_goal();
        debug!("search cancelled after {} expansions", self.expanded);
        self.phase = Phase::Finished(Outcome::Cancelled);
    }

    /// Step to the end, calling `on_step` after every expansion and every
    /// marked path cell. A `Break` from `on_step` abandons the run.
    pub fn drive<F>(&mut self, board: &mut Board, mut on_step: F) -> Outcome
    where
        F: FnMut(&Board) -> ControlFlow<()>,
    {
        loop {
            match self.step(board) {
                Step::Finished(outcome) => return outcome,
                Step::Expanded(_) | Step::Marked(_) => {
                    if on_step(board).is_break() {
                        self.abandon(board);
                        return Outcome::Cancelled;
                    }
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Step {
        self.phase = Phase::Finished(outcome.clone());
        Step::Finished(outcome)
    }
}

/// Find a shortest route from `start` to `goal`, marking the explored area
/// and the route on `board`.
///
/// `on_step` runs after each expansion round and after each marked path
/// cell; returning `ControlFlow::Break(())` stops the search with
/// [`Outcome::Cancelled`]. Pass `|_| ControlFlow::Continue(())` for headless
/// use.
pub fn search<F>(board: &mut Board, start: Pos, goal: Pos, on_step: F) -> Result<Outcome>
where
    F: FnMut(&Board) -> ControlFlow<()>,
{
    let mut run = Search::new(board, start, goal)?;
    Ok(run.drive(board, on_step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;
    use crate::record::UNREACHABLE;
    use crate::testing::{bfs_distance, finish, parse_board};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn headless(_: &Board) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn run(rows: &[&str]) -> (Board, Outcome) {
        let (mut board, start, goal) = parse_board(rows);
        let outcome = search(&mut board, start.unwrap(), goal.unwrap(), headless).unwrap();
        (board, outcome)
    }

    #[test]
    fn wall_with_gap_at_far_end() {
        // Column 2 blocked except (4, 2): down to row 4, across, back up.
        let (board, outcome) = run(&[
            "S.#.G", //
            "..#..", //
            "..#..", //
            "..#..", //
            ".....",
        ]);
        let path = outcome.path().expect("route exists");
        assert_eq!(path.steps(), 12);
        assert!(path.cells().contains(&Pos::new(4, 2)));
        assert_eq!(board.count(CellState::Path), 11);
        assert!(board.cell_at(Pos::new(0, 0)).is_start());
        assert!(board.cell_at(Pos::new(0, 4)).is_goal());
    }

    #[test]
    fn wall_with_gap_in_the_middle() {
        let (board, outcome) = run(&[
            "S.#.G", //
            "..#..", //
            ".....", //
            "..#..", //
            "..#..",
        ]);
        assert_eq!(outcome.path().map(Path::steps), Some(8));
        assert_eq!(board.count(CellState::Path), 7);
    }

    #[test]
    fn adjacent_endpoints() {
        let (board, outcome) = run(&["SG"]);
        assert_eq!(outcome.path().map(Path::steps), Some(1));
        assert_eq!(board.count(CellState::Path), 0);
    }

    #[test]
    fn walled_in_goal_is_exhausted() {
        let (board, outcome) = run(&[
            "S....", //
            "...#.", //
            "..#G#", //
            "...#.", //
            ".....",
        ]);
        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(board.count(CellState::Path), 0);
        assert!(board.cell_at(Pos::new(0, 0)).is_start());
        assert!(board.cell_at(Pos::new(2, 3)).is_goal());
    }

    #[test]
    fn walled_in_start_expands_only_itself() {
        let (mut board, start, goal) = parse_board(&[
            "S#..", //
            "#...", //
            "....", //
            "...G",
        ]);
        let mut s = Search::new(&board, start.unwrap(), goal.unwrap()).unwrap();
        assert_eq!(finish(&mut s, &mut board), Outcome::Exhausted);
        assert_eq!(s.expanded(), 1);
        assert_eq!(board.count(CellState::Visited), 0);
    }

    #[test]
    fn exhaustion_is_bounded_by_cell_count() {
        let (mut board, start, goal) = parse_board(&[
            "S.....", //
            "......", //
            "......", //
            "....##", //
            "....#.", //
            "....#G",
        ]);
        let mut s = Search::new(&board, start.unwrap(), goal.unwrap()).unwrap();
        let mut rounds = 0;
        let outcome = s.drive(&mut board, |_| {
            rounds += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(outcome, Outcome::Exhausted);
        assert!(rounds <= 36);
        // Every reachable cell except the start ends up visited.
        assert_eq!(board.count(CellState::Visited), 36 - 4 - 2 - 1);
        assert_eq!(board.count(CellState::Frontier), 0);
    }

    #[test]
    fn goal_scores_agree_with_path_length() {
        let (mut board, start, goal) = parse_board(&[
            "S..#....", //
            ".#.#.##.", //
            ".#...#..", //
            ".####.#.", //
            "......#G",
        ]);
        let (start, goal) = (start.unwrap(), goal.unwrap());
        let mut s = Search::new(&board, start, goal).unwrap();
        let outcome = finish(&mut s, &mut board);
        let steps = outcome.path().unwrap().steps() as i32;
        assert_eq!(s.g_score(goal), steps);
        assert_eq!(s.f_score(goal), steps);
        assert_eq!(s.came_from(start), None);
        assert_eq!(Some(steps as usize), bfs_distance(&board, start, goal));
    }

    #[test]
    fn first_step_opens_neighbors_and_keeps_start() {
        let (mut board, start, goal) = parse_board(&[
            "...", //
            ".S.", //
            "..G",
        ]);
        let (start, goal) = (start.unwrap(), goal.unwrap());
        let mut s = Search::new(&board, start, goal).unwrap();
        assert_eq!(s.step(&mut board), Step::Expanded(start));
        assert!(board.cell_at(start).is_start());
        assert_eq!(board.count(CellState::Frontier), 4);
        assert_eq!(s.record().open_len(), 4);
        assert_eq!(s.record().came_from(Pos::new(0, 1)), Some(start));
        assert_eq!(s.record().g_score(Pos::new(0, 0)), UNREACHABLE);

        // The expanded cell is closed at the start of the next step.
        let Step::Expanded(next) = s.step(&mut board) else {
            panic!("expected an expansion");
        };
        assert_eq!(next, Pos::new(2, 1));
        assert!(board.cell_at(start).is_start());
    }

    #[test]
    fn equal_corridors_prefer_the_first_discovered() {
        let rows = [
            "S....", //
            ".###.", //
            ".###.", //
            "....G", //
            ".....",
        ];
        let mut orders = Vec::new();
        let mut marks = Vec::new();
        for _ in 0..2 {
            let (mut board, start, goal) = parse_board(&rows);
            let mut s = Search::new(&board, start.unwrap(), goal.unwrap()).unwrap();
            let mut order = Vec::new();
            let outcome = loop {
                match s.step(&mut board) {
                    Step::Expanded(p) => order.push(p),
                    Step::Marked(_) => {}
                    Step::Finished(o) => break o,
                }
            };
            assert_eq!(outcome.path().map(Path::steps), Some(7));
            orders.push(order);
            marks.push(board);
        }
        assert_eq!(orders[0], orders[1]);
        assert_eq!(marks[0], marks[1]);

        // Down is explored before right, so the left/bottom corridor wins.
        let board = &marks[0];
        for p in [(1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3)] {
            assert!(board.cell_at(Pos::new(p.0, p.1)).is_path(), "{p:?}");
        }
        for c in 1..5 {
            assert!(!board.cell_at(Pos::new(0, c)).is_path());
        }
    }

    #[test]
    fn break_on_first_step_cancels() {
        let (mut board, start, goal) = parse_board(&[
            "S...", //
            "....", //
            "....", //
            "...G",
        ]);
        let (start, goal) = (start.unwrap(), goal.unwrap());
        let outcome = search(&mut board, start, goal, |_| ControlFlow::Break(())).unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(board.count(CellState::Path), 0);
        assert!(board.cell_at(start).is_start());
        assert!(board.cell_at(goal).is_goal());
    }

    #[test]
    fn cancelling_after_goal_is_discovered_restores_goal_mark() {
        let (mut board, start, goal) = parse_board(&["SG"]);
        let (start, goal) = (start.unwrap(), goal.unwrap());
        let mut s = Search::new(&board, start, goal).unwrap();
        s.step(&mut board);
        assert!(board.cell_at(goal).is_frontier());
        s.abandon(&mut board);
        assert!(board.cell_at(goal).is_goal());
        assert_eq!(s.outcome(), Some(&Outcome::Cancelled));
        assert_eq!(s.step(&mut board), Step::Finished(Outcome::Cancelled));
    }

    #[test]
    fn finished_search_keeps_returning_outcome() {
        let (mut board, start, goal) = parse_board(&["S.G"]);
        let mut s = Search::new(&board, start.unwrap(), goal.unwrap()).unwrap();
        let first = finish(&mut s, &mut board);
        assert!(first.is_found());
        assert_eq!(s.step(&mut board), Step::Finished(first.clone()));
        s.abandon(&mut board);
        assert_eq!(s.outcome(), Some(&first));
    }

    #[test]
    fn rejects_bad_endpoints() {
        let mut board = Board::build(3, 30);
        let p = Pos::new(1, 1);
        assert_eq!(
            search(&mut board, p, p, headless).unwrap_err(),
            SearchError::SameEndpoints(p)
        );
        assert_eq!(
            search(&mut board, p, Pos::new(0, 3), headless).unwrap_err(),
            SearchError::OutOfBounds {
                pos: Pos::new(0, 3),
                size: 3
            }
        );
        assert!(board.cells().all(|c| c.is_unvisited()));
    }

    #[test]
    fn matches_bfs_on_random_boards() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 12;
        for _ in 0..200 {
            let mut board = Board::build(n, 120);
            let mut open = Vec::new();
            for row in 0..n {
                for col in 0..n {
                    let pos = Pos::new(row, col);
                    if rng.random_bool(0.28) {
                        board.cell_at_mut(pos).make_barrier();
                    } else {
                        open.push(pos);
                    }
                }
            }
            if open.len() < 2 {
                continue;
            }
            let start = open[rng.random_range(0..open.len())];
            let goal = open[rng.random_range(0..open.len())];
            if start == goal {
                continue;
            }
            board.cell_at_mut(start).make_start();
            board.cell_at_mut(goal).make_goal();

            let expected = bfs_distance(&board, start, goal);
            let outcome = search(&mut board, start, goal, headless).unwrap();
            match (expected, outcome) {
                (Some(d), Outcome::Found(path)) => {
                    assert_eq!(path.steps(), d);
                    assert_eq!(board.count(CellState::Path), d - 1);
                    for pair in path.cells().windows(2) {
                        assert_eq!(manhattan(pair[0], pair[1]), 1);
                        assert!(!board.cell_at(pair[1]).is_barrier());
                    }
                }
                (None, Outcome::Exhausted) => {
                    assert_eq!(board.count(CellState::Path), 0);
                }
                (expected, outcome) => {
                    panic!("bfs says {expected:?}, search says {outcome:?}")
                }
            }
        }
    }
}
