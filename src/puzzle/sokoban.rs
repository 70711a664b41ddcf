//! Sokoban puzzle instances

use super::PuzzleKind;
use crate::error::{Result, TranslateError};
use crate::grid::{Board, Direction, Topology};
use crate::sat::{Atom, Fact, Kind, Lit};

/// A checked Sokoban instance
#[derive(Debug, Clone)]
pub struct SokobanInstance {
    pub board: Board,
    pub topology: Topology,
    /// Unit facts describing time step 0, cell by cell
    pub initial: Vec<Lit>,
    pub balls: usize,
    /// Non-goal cells in a corner, where a ball could never be moved again
    pub forbidden: Vec<usize>,
}

impl SokobanInstance {
    pub fn from_board(board: Board) -> Result<Self> {
        let kind = PuzzleKind::Sokoban;
        let topology = Topology::from_board(&board, |symbol| kind.is_blocked(symbol));

        let mut initial = Vec::new();
        let mut forbidden = Vec::new();
        let (mut actors, mut balls, mut holes) = (0, 0, 0);

        for (loc, symbol) in board.locations() {
            // (actor, ball, hole)
            let (actor, ball, hole) = match symbol {
                '#' => continue,
                '@' => (true, false, false),
                '$' => (false, true, false),
                '.' => (false, false, true),
                '*' => (false, true, true),
                '+' => (true, false, true),
                ' ' => (false, false, false),
                _ => {
                    let (row, col) = board.position(loc);
                    return Err(TranslateError::InvalidSymbol { symbol, row, col });
                }
            };

            actors += usize::from(actor);
            balls += usize::from(ball);
            holes += usize::from(hole);
            if !hole && is_corner(&topology, loc) {
                forbidden.push(loc);
            }

            for (fact, holds) in [(Fact::Actor, actor), (Fact::Ball, ball), (Fact::Hole, hole)] {
                let atom = Atom::at(Kind::Fact(fact), loc, 0);
                initial.push(if holds { atom.pos() } else { atom.neg() });
            }
        }

        if actors != 1 {
            return Err(TranslateError::ActorCount { found: actors });
        }
        if balls != holes {
            return Err(TranslateError::BallHoleMismatch { balls, holes });
        }
        if balls == 0 {
            return Err(TranslateError::NoBalls);
        }

        Ok(Self {
            board,
            topology,
            initial,
            balls,
            forbidden,
        })
    }
}

/// Walls on two orthogonal sides
fn is_corner(topology: &Topology, loc: usize) -> bool {
    let wall = |d| topology.wall_ahead(d, loc);
    let vertical = wall(Direction::North) || wall(Direction::South);
    let horizontal = wall(Direction::East) || wall(Direction::West);
    vertical && horizontal
}
