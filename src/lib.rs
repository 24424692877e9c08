//! Sliding-block (Klotski) puzzle solver. The board model and per-piece
//! move generator feed two interchangeable search strategies over the
//! layout state space.

pub mod board;
pub mod heuristic;
pub mod level;
pub mod moves;
pub mod search;

use std::io::{self, Write};

pub use board::Board;
pub use level::{parse, Puzzle};
pub use search::{solve, SearchResult, Stats, Strategy};

/// Write the solution path to `sink`: each board's grid followed by a blank
/// line, root-to-goal order; or the literal `No solution` when there is no
/// path.
pub fn write_solution<W: Write>(sink: &mut W, path: Option<&[Board]>) -> io::Result<()> {
    match path {
        Some(boards) => {
            for board in boards {
                write!(sink, "{}", board)?;
                writeln!(sink)?;
            }
        }
        None => writeln!(sink, "No solution")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_each_board_followed_by_a_blank_line() {
        let text = "11^.\n11v.\n2...\n\n11^.\n11v.\n..2.\n";
        let puzzle = parse(text).unwrap();
        let result = solve(&puzzle.initial, &puzzle.goal, &puzzle.goals, Strategy::AStar);

        let mut out = Vec::new();
        write_solution(&mut out, result.path.as_deref()).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.starts_with("11^.\n11v.\n2...\n\n"));
        assert!(rendered.ends_with("11^.\n11v.\n..2.\n\n"));
        assert_eq!(rendered.matches("\n\n").count(), 3);
    }

    #[test]
    fn writes_the_no_solution_line() {
        let mut out = Vec::new();
        write_solution(&mut out, None).unwrap();
        assert_eq!(out, b"No solution\n");
    }
}
