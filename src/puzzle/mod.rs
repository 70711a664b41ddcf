//! Puzzle families: symbol tables, initial states and pre-flight checks

pub mod snowman;
pub mod sokoban;

pub use snowman::SnowmanInstance;
pub use sokoban::SokobanInstance;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::grid::{Board, Topology};

/// Supported puzzle families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    Snowman,
    Sokoban,
}

impl PuzzleKind {
    /// Every symbol a grid of this family may contain
    pub fn symbols(self) -> &'static str {
        match self {
            PuzzleKind::Snowman => "x#pq1234567'.",
            PuzzleKind::Sokoban => " #@$.*+",
        }
    }

    pub fn accepts(self, symbol: char) -> bool {
        self.symbols().contains(symbol)
    }

    /// Symbols no piece can enter
    pub fn is_blocked(self, symbol: char) -> bool {
        match self {
            PuzzleKind::Snowman => symbol == '#' || symbol == 'x',
            PuzzleKind::Sokoban => symbol == '#',
        }
    }

    /// Symbol used to pad short rows
    pub fn fill(self) -> char {
        match self {
            PuzzleKind::Snowman => 'x',
            PuzzleKind::Sokoban => '#',
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleKind::Snowman => write!(f, "snowman"),
            PuzzleKind::Sokoban => write!(f, "sokoban"),
        }
    }
}

impl FromStr for PuzzleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snowman" => Ok(PuzzleKind::Snowman),
            "sokoban" => Ok(PuzzleKind::Sokoban),
            other => Err(format!("unknown puzzle kind '{}' (expected snowman or sokoban)", other)),
        }
    }
}

/// A parsed and checked puzzle instance
#[derive(Debug, Clone)]
pub enum Puzzle {
    Snowman(SnowmanInstance),
    Sokoban(SokobanInstance),
}

impl Puzzle {
    /// Derive the topology and initial state of `board`, rejecting
    /// structurally infeasible instances
    pub fn from_board(kind: PuzzleKind, board: Board) -> Result<Self> {
        Ok(match kind {
            PuzzleKind::Snowman => Puzzle::Snowman(SnowmanInstance::from_board(board)?),
            PuzzleKind::Sokoban => Puzzle::Sokoban(SokobanInstance::from_board(board)?),
        })
    }

    pub fn kind(&self) -> PuzzleKind {
        match self {
            Puzzle::Snowman(_) => PuzzleKind::Snowman,
            Puzzle::Sokoban(_) => PuzzleKind::Sokoban,
        }
    }

    pub fn board(&self) -> &Board {
        match self {
            Puzzle::Snowman(instance) => &instance.board,
            Puzzle::Sokoban(instance) => &instance.board,
        }
    }

    pub fn topology(&self) -> &Topology {
        match self {
            Puzzle::Snowman(instance) => &instance.topology,
            Puzzle::Sokoban(instance) => &instance.topology,
        }
    }

    pub fn summary(&self) -> PuzzleSummary {
        let board = self.board();
        let (balls, goals) = match self {
            Puzzle::Snowman(instance) => (instance.balls, instance.snowmen),
            Puzzle::Sokoban(instance) => (instance.balls, instance.balls),
        };
        PuzzleSummary {
            kind: self.kind(),
            rows: board.rows,
            cols: board.cols,
            valid_locations: self.topology().locations().len(),
            balls,
            goals,
        }
    }
}

/// Size figures of an instance
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleSummary {
    pub kind: PuzzleKind,
    pub rows: usize,
    pub cols: usize,
    pub valid_locations: usize,
    pub balls: usize,
    /// Snowmen to build, or holes to fill
    pub goals: usize,
}

impl fmt::Display for PuzzleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle Summary:")?;
        writeln!(f, "  Kind: {}", self.kind)?;
        writeln!(f, "  Grid size: {}x{}", self.rows, self.cols)?;
        writeln!(f, "  Valid locations: {}", self.valid_locations)?;
        writeln!(f, "  Balls: {}", self.balls)?;
        match self.kind {
            PuzzleKind::Snowman => writeln!(f, "  Snowmen: {}", self.goals)?,
            PuzzleKind::Sokoban => writeln!(f, "  Holes: {}", self.goals)?,
        }
        Ok(())
    }
}
