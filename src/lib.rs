//! Grid-puzzle planning as SAT
//!
//! This library compiles Snowman and Sokoban puzzles, for a fixed plan
//! length, into CNF formulas in DIMACS format. A model of the formula is a
//! plan solving the puzzle in at most that many steps.

pub mod config;
pub mod encoding;
pub mod error;
pub mod grid;
pub mod puzzle;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use encoding::{EncodingPolicy, Translator};
pub use error::{Result, TranslateError};
pub use puzzle::{Puzzle, PuzzleKind};
pub use sat::DimacsFormula;

use anyhow::Context;
use std::io::BufRead;
use tracing::info;

/// Read a grid and translate it for a plan of `steps` steps
pub fn translate<R: BufRead>(
    reader: R,
    kind: PuzzleKind,
    policy: EncodingPolicy,
    steps: usize,
) -> Result<DimacsFormula> {
    let board = grid::read_board(reader, kind)?;
    let puzzle = Puzzle::from_board(kind, board)?;
    Ok(Translator::new(&puzzle, policy, steps)?.translate())
}

/// Load the puzzle named by `settings`, from standard input when no grid
/// file is configured
pub fn load_puzzle(settings: &Settings) -> anyhow::Result<Puzzle> {
    let kind = settings.puzzle.kind;
    let board = match settings.input.grid_file {
        Some(ref path) => grid::load_board_from_file(path, kind)?,
        None => grid::read_board(std::io::stdin().lock(), kind).context("Failed to read grid from stdin")?,
    };

    let puzzle = Puzzle::from_board(kind, board).context("Infeasible puzzle instance")?;
    info!(
        kind = %kind,
        locations = puzzle.topology().locations().len(),
        "Puzzle loaded"
    );
    Ok(puzzle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_from_reader() {
        let grid = "#####\n#@$.#\n#####\n".as_bytes();
        let formula = translate(grid, PuzzleKind::Sokoban, EncodingPolicy::sequential(), 1).unwrap();
        assert!(formula.variable_count() > 0);
        assert!(formula.to_dimacs_string().contains("p cnf"));
    }

    #[test]
    fn test_translate_rejects_infeasible_grid() {
        let grid = "#####\n#@$ #\n#####\n".as_bytes();
        assert!(matches!(
            translate(grid, PuzzleKind::Sokoban, EncodingPolicy::sequential(), 1),
            Err(TranslateError::BallHoleMismatch { balls: 1, holes: 0 })
        ));
    }
}
