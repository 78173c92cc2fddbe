use crate::cell::Pos;

/// Manhattan (L1) distance between two cells. Admissible and consistent for
/// unit-cost 4-way movement.
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> i32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as i32
}
