use crate::board::{Board, Point};

/// Goal position per piece identity, indexed by the dense `PieceId` the
/// loader allocates. Opaque to the search: the estimate is only as good as
/// the pairing that produced this table.
pub type GoalMap = Vec<Point>;

#[inline(always)]
pub fn manhattan(a: Point, b: Point) -> i32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as i32
}

/// Identity-aware distance estimate: the sum over all pieces of the Manhattan
/// distance to the goal slot assigned to that piece's identity. Pieces of one
/// shape are tracked independently through their identities.
///
/// Expansions update this incrementally (`h - d(old) + d(new)`); the full sum
/// here is the reference the incremental form must agree with.
pub fn evaluate(board: &Board, goals: &GoalMap) -> i32 {
    board
        .pieces()
        .map(|piece| manhattan(piece.pos, goals[piece.id as usize]))
        .sum()
}
