use anyhow::{bail, ensure, Context, Result};
use smallvec::SmallVec;

use crate::board::{Board, Piece, PieceId, Point, Shape, WIDTH};
use crate::heuristic::{manhattan, GoalMap};

/// A loaded puzzle: both layouts plus the goal slot assigned to each piece
/// identity.
#[derive(Debug)]
pub struct Puzzle {
    pub initial: Board,
    pub goal: Board,
    pub goals: GoalMap,
}

/// Parse the puzzle text format: the initial layout, a blank line, then the
/// goal layout, both 4 cells wide and of equal height.
///
/// Identities are assigned here, once: goal pieces are walked in file order
/// and each takes the unmatched same-shape initial piece nearest to it
/// (earliest piece on ties). Malformed input is a fatal load error, never a
/// silently-ignored cell.
pub fn parse(text: &str) -> Result<Puzzle> {
    let blocks = layout_blocks(text);
    ensure!(
        blocks.len() == 2,
        "expected an initial and a goal layout separated by a blank line, found {} layout(s)",
        blocks.len()
    );
    ensure!(
        blocks[0].len() == blocks[1].len(),
        "initial layout has {} rows but goal layout has {}",
        blocks[0].len(),
        blocks[1].len()
    );

    let initial_shapes = parse_layout(&blocks[0]).context("initial layout")?;
    let goal_shapes = parse_layout(&blocks[1]).context("goal layout")?;
    ensure!(
        initial_shapes.iter().any(|&(shape, _)| shape == Shape::Block),
        "puzzle has no 2x2 block piece"
    );

    let initial_pieces: Vec<Piece> = initial_shapes
        .iter()
        .enumerate()
        .map(|(id, &(shape, pos))| Piece {
            id: id as PieceId,
            shape,
            pos,
        })
        .collect();

    // Greedy nearest-first pairing. With several pieces of one shape this can
    // cross assignments and make the heuristic overestimate; that behaviour
    // is part of the puzzle semantics and is kept as is.
    let mut matched = vec![false; initial_pieces.len()];
    let mut goal_pieces: Vec<Piece> = Vec::with_capacity(goal_shapes.len());
    for &(shape, pos) in &goal_shapes {
        let mut best: Option<usize> = None;
        let mut best_dist = i32::MAX;
        for (i, piece) in initial_pieces.iter().enumerate() {
            if matched[i] || piece.shape != shape {
                continue;
            }
            let dist = manhattan(piece.pos, pos);
            if dist < best_dist {
                best_dist = dist;
                best = Some(i);
            }
        }
        let Some(i) = best else {
            bail!("goal layout has more {:?} pieces than the initial layout", shape);
        };
        matched[i] = true;
        goal_pieces.push(Piece {
            id: initial_pieces[i].id,
            shape,
            pos,
        });
    }
    ensure!(
        matched.iter().all(|&m| m),
        "initial layout has pieces with no goal counterpart"
    );

    let mut goals: GoalMap = vec![Point::new(0, 0); initial_pieces.len()];
    for piece in &goal_pieces {
        goals[piece.id as usize] = piece.pos;
    }

    let height = blocks[0].len() as i16;
    Ok(Puzzle {
        initial: Board::from_pieces(height, initial_pieces),
        goal: Board::from_pieces(height, goal_pieces),
        goals,
    })
}

// Runs of non-blank lines, trailing whitespace stripped.
fn layout_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

// One layout block to (shape, top-left) pairs in file-reading order. The 2x2
// block piece is recorded at its first `1` cell; continuation halves (`v`,
// `>`) only verify that their opening half is where it must be.
fn parse_layout(lines: &[&str]) -> Result<Vec<(Shape, Point)>> {
    let height = lines.len() as i16;
    for (y, line) in lines.iter().enumerate() {
        ensure!(
            line.len() == WIDTH as usize && line.is_ascii(),
            "row {} is not exactly {} cells: {:?}",
            y + 1,
            WIDTH,
            line
        );
    }
    let cell = |x: i16, y: i16| -> u8 {
        if x < 0 || x >= WIDTH || y < 0 || y >= height {
            return 0;
        }
        lines[y as usize].as_bytes()[x as usize]
    };

    let mut pieces: Vec<(Shape, Point)> = Vec::new();
    let mut block_cells: SmallVec<[Point; 4]> = SmallVec::new();

    for (y, line) in lines.iter().enumerate() {
        for (x, symbol) in line.bytes().enumerate() {
            let (x, y) = (x as i16, y as i16);
            let pos = Point::new(x, y);
            match symbol {
                b'.' => {}
                b'2' => pieces.push((Shape::Single, pos)),
                b'1' => {
                    if block_cells.is_empty() {
                        pieces.push((Shape::Block, pos));
                    }
                    block_cells.push(pos);
                }
                b'^' => {
                    ensure!(
                        cell(x, y + 1) == b'v',
                        "vertical piece at ({}, {}) has no bottom half",
                        x,
                        y
                    );
                    pieces.push((Shape::Vertical, pos));
                }
                b'v' => ensure!(
                    cell(x, y - 1) == b'^',
                    "stray vertical bottom half at ({}, {})",
                    x,
                    y
                ),
                b'<' => {
                    ensure!(
                        cell(x + 1, y) == b'>',
                        "horizontal piece at ({}, {}) has no right half",
                        x,
                        y
                    );
                    pieces.push((Shape::Horizontal, pos));
                }
                b'>' => ensure!(
                    cell(x - 1, y) == b'<',
                    "stray horizontal right half at ({}, {})",
                    x,
                    y
                ),
                other => bail!("unknown symbol {:?} at ({}, {})", other as char, x, y),
            }
        }
    }

    if !block_cells.is_empty() {
        let expected = Shape::Block.cells(block_cells[0]);
        ensure!(
            block_cells.as_slice() == expected.as_slice(),
            "'1' cells do not form a single 2x2 block"
        );
    }

    Ok(pieces)
}
