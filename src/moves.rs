use arrayvec::ArrayVec;

use crate::board::{Board, Piece, Point, EMPTY};

// Unit slides: left, right, up, down.
pub const DIR_OFFSETS: [(i16, i16); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Destinations one orthogonal slide away for `piece` on `board`.
///
/// A slide is legal when every cell of the shifted footprint that the piece
/// does not already cover is inside the grid and empty. Unfolded per shape
/// that means the 2x2 block needs both cells of its leading edge, while a
/// 1x2 piece needs one cell when sliding along its axis and both destination
/// cells when sliding across it. Bounds are tested before occupancy.
pub fn legal_moves(board: &Board, piece: &Piece) -> ArrayVec<Point, 4> {
    let mut destinations = ArrayVec::new();
    let footprint = piece.shape.cells(piece.pos);

    for &(dx, dy) in &DIR_OFFSETS {
        let slid = piece
            .shape
            .cells(Point::new(piece.pos.x + dx, piece.pos.y + dy));
        let clear = slid.iter().all(|cell| {
            footprint.contains(cell) || (board.in_bounds(*cell) && board.at(*cell) == EMPTY)
        });
        if clear {
            destinations.push(Point::new(piece.pos.x + dx, piece.pos.y + dy));
        }
    }

    destinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Shape;

    fn board(height: i16, pieces: &[(Shape, i16, i16)]) -> Board {
        Board::from_pieces(
            height,
            pieces.iter().enumerate().map(|(id, &(shape, x, y))| Piece {
                id: id as u16,
                shape,
                pos: Point::new(x, y),
            }),
        )
    }

    fn moves_of(board: &Board, top_left: Point) -> Vec<Point> {
        let piece = board.piece_at(top_left).unwrap();
        legal_moves(board, piece).into_iter().collect()
    }

    #[test]
    fn single_slides_into_any_adjacent_empty_cell() {
        let board = board(3, &[(Shape::Single, 1, 1)]);
        let mut dests = moves_of(&board, Point::new(1, 1));
        dests.sort_by_key(|p| (p.y, p.x));
        assert_eq!(
            dests,
            vec![
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(1, 2),
            ]
        );
    }

    #[test]
    fn single_stops_at_the_border_and_at_occupied_cells() {
        // Corner single hemmed in by a neighbour on its right.
        let board = board(2, &[(Shape::Single, 0, 0), (Shape::Single, 1, 0)]);
        assert_eq!(moves_of(&board, Point::new(0, 0)), vec![Point::new(0, 1)]);
    }

    #[test]
    fn block_needs_both_leading_edge_cells() {
        // ".11."    block can go left or right only while both edge cells
        // ".11."    are empty; a single below one column blocks the descent.
        let board = board(3, &[(Shape::Block, 1, 0), (Shape::Single, 1, 2)]);
        let mut dests = moves_of(&board, Point::new(1, 0));
        dests.sort_by_key(|p| (p.y, p.x));
        assert_eq!(dests, vec![Point::new(0, 0), Point::new(2, 0)]);
    }

    #[test]
    fn horizontal_axis_and_cross_moves() {
        // "<>.."    along its row one leading cell is enough; moving down
        // "...."    needs both destination cells, which are empty here.
        let board = board(2, &[(Shape::Horizontal, 0, 0)]);
        let mut dests = moves_of(&board, Point::new(0, 0));
        dests.sort_by_key(|p| (p.y, p.x));
        assert_eq!(dests, vec![Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn horizontal_cross_move_blocked_by_one_cell() {
        // A single under the right half pins the horizontal in its row.
        let board = board(2, &[(Shape::Horizontal, 0, 0), (Shape::Single, 1, 1)]);
        assert_eq!(moves_of(&board, Point::new(0, 0)), vec![Point::new(1, 0)]);
    }

    #[test]
    fn vertical_mirrors_horizontal_with_axes_swapped() {
        // "^..."    up/down need one cell, sideways needs both; the right
        // "v..."    column is open so both sideways targets qualify.
        let board = board(3, &[(Shape::Vertical, 0, 0)]);
        let mut dests = moves_of(&board, Point::new(0, 0));
        dests.sort_by_key(|p| (p.y, p.x));
        assert_eq!(dests, vec![Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn generator_does_not_mutate_the_board() {
        let board = board(3, &[(Shape::Single, 1, 1)]);
        let before = board.grid_key().to_vec();
        let piece = *board.piece_at(Point::new(1, 1)).unwrap();
        let _ = legal_moves(&board, &piece);
        assert_eq!(board.grid_key(), &before[..]);
    }

    #[test]
    fn frozen_piece_has_no_moves() {
        // "11^2"    every piece is wedged against the border or a neighbour.
        // "11v2"
        let board = board(
            2,
            &[
                (Shape::Block, 0, 0),
                (Shape::Vertical, 2, 0),
                (Shape::Single, 3, 0),
                (Shape::Single, 3, 1),
            ],
        );
        for piece in board.pieces() {
            assert!(legal_moves(&board, piece).is_empty());
        }
    }
}
