//! Board fixtures shared by the unit tests.

use std::collections::VecDeque;

use crate::board::Board;
use crate::cell::Pos;
use crate::search::{Outcome, Search, Step};

/// Build a board from rows of text: `#` barrier, `S` start, `G` goal,
/// anything else open. The board is square with side equal to the longer of
/// the row count and the widest row; missing cells are open.
pub(crate) fn parse_board(rows: &[&str]) -> (Board, Option<Pos>, Option<Pos>) {
    let n = rows
        .iter()
        .map(|r| r.chars().count())
        .max()
        .unwrap_or(0)
        .max(rows.len());
    let mut board = Board::build(n, n as u32 * 10);
    let (mut start, mut goal) = (None, None);
    for (row, line) in rows.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let pos = Pos::new(row, col);
            match ch {
                '#' => board.cell_at_mut(pos).make_barrier(),
                'S' => {
                    board.cell_at_mut(pos).make_start();
                    start = Some(pos);
                }
                'G' => {
                    board.cell_at_mut(pos).make_goal();
                    goal = Some(pos);
                }
                _ => {}
            }
        }
    }
    (board, start, goal)
}

/// Step `search` until it finishes.
pub(crate) fn finish(search: &mut Search, board: &mut Board) -> Outcome {
    loop {
        if let Step::Finished(outcome) = search.step(board) {
            return outcome;
        }
    }
}

/// Shortest move count by plain breadth-first search, ignoring everything
/// but barriers.
pub(crate) fn bfs_distance(board: &Board, start: Pos, goal: Pos) -> Option<usize> {
    let n = board.size();
    let mut dist = vec![None; n * n];
    let mut queue = VecDeque::from([start]);
    dist[start.row * n + start.col] = Some(0usize);
    while let Some(p) = queue.pop_front() {
        let d = dist[p.row * n + p.col]?;
        if p == goal {
            return Some(d);
        }
        for q in board.neighbors_of(p) {
            let slot = &mut dist[q.row * n + q.col];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back(q);
            }
        }
    }
    None
}
