use arrayvec::ArrayVec;
use rustc_hash::FxHashMap;
use std::fmt;

// Board symbols, as written in the puzzle text format.
pub const EMPTY: u8 = b'.';
const BLOCK_CELL: u8 = b'1';
const SINGLE_CELL: u8 = b'2';
const VERTICAL_TOP: u8 = b'^';
const VERTICAL_BOTTOM: u8 = b'v';
const HORIZONTAL_LEFT: u8 = b'<';
const HORIZONTAL_RIGHT: u8 = b'>';

// The grid is always 4 cells wide; only the height varies per instance.
pub const WIDTH: i16 = 4;

// Signed coordinates so boundary probes can go to -1 without wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    #[inline(always)]
    pub const fn new(x: i16, y: i16) -> Self {
        Point { x, y }
    }
}

/// Dense piece identity, allocated once at load time and stable across the
/// initial and goal layouts.
pub type PieceId = u16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
    /// The single 2x2 piece.
    Block,
    /// A 1x1 piece.
    Single,
    /// A 1x2 piece lying left-right.
    Horizontal,
    /// A 1x2 piece standing top-bottom.
    Vertical,
}

impl Shape {
    /// Cells covered by this shape with its top-left corner at `pos`.
    pub fn cells(self, pos: Point) -> ArrayVec<Point, 4> {
        let Point { x, y } = pos;
        let mut cells = ArrayVec::new();
        match self {
            Shape::Block => cells.extend([
                Point::new(x, y),
                Point::new(x + 1, y),
                Point::new(x, y + 1),
                Point::new(x + 1, y + 1),
            ]),
            Shape::Single => cells.extend([Point::new(x, y)]),
            Shape::Horizontal => cells.extend([Point::new(x, y), Point::new(x + 1, y)]),
            Shape::Vertical => cells.extend([Point::new(x, y), Point::new(x, y + 1)]),
        }
        cells
    }
}

/// One puzzle piece: identity and shape are fixed at load time, the position
/// changes only by replacement when a board is cloned with a move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub shape: Shape,
    pub pos: Point,
}

/// A full piece layout plus the symbol grid derived from it. The grid is
/// recomputed from the pieces on every construction and never edited in
/// place, so the two representations cannot drift apart.
#[derive(Clone, Debug)]
pub struct Board {
    height: i16,
    pieces: FxHashMap<Point, Piece>,
    grid: Vec<u8>,
}

impl Board {
    pub fn from_pieces(height: i16, pieces: impl IntoIterator<Item = Piece>) -> Self {
        let pieces: FxHashMap<Point, Piece> =
            pieces.into_iter().map(|piece| (piece.pos, piece)).collect();
        let grid = derive_grid(height, &pieces);
        Board {
            height,
            pieces,
            grid,
        }
    }

    /// Deep copy with exactly one piece re-seated: the piece whose top-left
    /// corner is `from` ends up at `to`, identity preserved, grid re-derived.
    pub fn clone_with_move(&self, from: Point, to: Point) -> Board {
        let mut pieces = self.pieces.clone();
        let mut piece = pieces
            .remove(&from)
            .expect("moved piece missing from board");
        piece.pos = to;
        pieces.insert(to, piece);
        let grid = derive_grid(self.height, &pieces);
        Board {
            height: self.height,
            pieces,
            grid,
        }
    }

    #[inline(always)]
    pub fn height(&self) -> i16 {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < WIDTH && p.y >= 0 && p.y < self.height
    }

    /// Symbol at `p`; the caller has already bounds-checked.
    #[inline(always)]
    pub fn at(&self, p: Point) -> u8 {
        self.grid[to_idx(p)]
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_at(&self, top_left: Point) -> Option<&Piece> {
        self.pieces.get(&top_left)
    }

    /// Rendered grid bytes, used to key the visited set.
    #[inline(always)]
    pub fn grid_key(&self) -> &[u8] {
        &self.grid
    }
}

// Two layouts are the same search state when they render to the same
// picture, even if different pieces of one shape occupy swapped slots.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.chunks(WIDTH as usize) {
            for &cell in row {
                write!(f, "{}", cell as char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[inline(always)]
fn to_idx(p: Point) -> usize {
    (p.y as usize) * (WIDTH as usize) + p.x as usize
}

fn derive_grid(height: i16, pieces: &FxHashMap<Point, Piece>) -> Vec<u8> {
    let mut grid = vec![EMPTY; (WIDTH as usize) * height as usize];
    for piece in pieces.values() {
        let Point { x, y } = piece.pos;
        match piece.shape {
            Shape::Block => {
                stamp(&mut grid, height, Point::new(x, y), BLOCK_CELL);
                stamp(&mut grid, height, Point::new(x + 1, y), BLOCK_CELL);
                stamp(&mut grid, height, Point::new(x, y + 1), BLOCK_CELL);
                stamp(&mut grid, height, Point::new(x + 1, y + 1), BLOCK_CELL);
            }
            Shape::Single => stamp(&mut grid, height, Point::new(x, y), SINGLE_CELL),
            Shape::Horizontal => {
                stamp(&mut grid, height, Point::new(x, y), HORIZONTAL_LEFT);
                stamp(&mut grid, height, Point::new(x + 1, y), HORIZONTAL_RIGHT);
            }
            Shape::Vertical => {
                stamp(&mut grid, height, Point::new(x, y), VERTICAL_TOP);
                stamp(&mut grid, height, Point::new(x, y + 1), VERTICAL_BOTTOM);
            }
        }
    }
    grid
}

fn stamp(grid: &mut [u8], height: i16, p: Point, symbol: u8) {
    assert!(
        p.x >= 0 && p.x < WIDTH && p.y >= 0 && p.y < height,
        "piece cell ({}, {}) out of bounds",
        p.x,
        p.y
    );
    let idx = to_idx(p);
    assert!(
        grid[idx] == EMPTY,
        "overlapping piece footprints at ({}, {})",
        p.x,
        p.y
    );
    grid[idx] = symbol;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: PieceId, shape: Shape, x: i16, y: i16) -> Piece {
        Piece {
            id,
            shape,
            pos: Point::new(x, y),
        }
    }

    #[test]
    fn grid_is_the_footprint_stamp_of_the_pieces() {
        let board = Board::from_pieces(
            3,
            [
                piece(0, Shape::Block, 0, 0),
                piece(1, Shape::Vertical, 2, 0),
                piece(2, Shape::Horizontal, 0, 2),
                piece(3, Shape::Single, 2, 2),
            ],
        );
        assert_eq!(board.grid_key(), b"11^.11v.<>2.");
        assert_eq!(board.to_string(), "11^.\n11v.\n<>2.\n");
    }

    #[test]
    fn shape_footprints() {
        let at = Point::new(1, 1);
        assert_eq!(Shape::Block.cells(at).len(), 4);
        assert_eq!(Shape::Single.cells(at).as_slice(), &[Point::new(1, 1)]);
        assert_eq!(
            Shape::Horizontal.cells(at).as_slice(),
            &[Point::new(1, 1), Point::new(2, 1)]
        );
        assert_eq!(
            Shape::Vertical.cells(at).as_slice(),
            &[Point::new(1, 1), Point::new(1, 2)]
        );
    }

    #[test]
    fn clone_with_move_reseats_exactly_one_piece() {
        let board = Board::from_pieces(
            3,
            [
                piece(0, Shape::Block, 0, 0),
                piece(1, Shape::Single, 2, 0),
                piece(2, Shape::Single, 2, 2),
            ],
        );
        let moved = board.clone_with_move(Point::new(2, 0), Point::new(3, 0));

        assert_eq!(moved.piece_count(), board.piece_count());
        let reseated = moved.piece_at(Point::new(3, 0)).unwrap();
        assert_eq!(reseated.id, 1);
        assert_eq!(reseated.shape, Shape::Single);
        assert!(moved.piece_at(Point::new(2, 0)).is_none());
        // Untouched pieces keep their slots and identities.
        assert_eq!(moved.piece_at(Point::new(0, 0)).unwrap().id, 0);
        assert_eq!(moved.piece_at(Point::new(2, 2)).unwrap().id, 2);
        // The source board is unchanged.
        assert!(board.piece_at(Point::new(2, 0)).is_some());
    }

    #[test]
    fn equality_ignores_piece_identity() {
        let a = Board::from_pieces(
            2,
            [piece(0, Shape::Single, 0, 0), piece(1, Shape::Single, 3, 1)],
        );
        let b = Board::from_pieces(
            2,
            [piece(1, Shape::Single, 0, 0), piece(0, Shape::Single, 3, 1)],
        );
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "overlapping piece footprints")]
    fn overlapping_footprints_are_a_fatal_defect() {
        Board::from_pieces(
            2,
            [
                piece(0, Shape::Horizontal, 0, 0),
                piece(1, Shape::Single, 1, 0),
            ],
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_footprint_is_a_fatal_defect() {
        Board::from_pieces(2, [piece(0, Shape::Horizontal, 3, 0)]);
    }
}
