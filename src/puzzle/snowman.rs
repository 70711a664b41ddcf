//! Snowman puzzle instances
//!
//! Symbols: `#` wall, `x` outside the grid, `p` actor on snow, `q` actor on
//! grass, `'` grass, `.` snow, and the digits `1`..`7` for ball stacks read as
//! a bit mask (1 small, 2 medium, 4 large).

use super::PuzzleKind;
use crate::error::{Result, TranslateError};
use crate::grid::{Board, Topology};
use crate::sat::{Atom, Fact, Kind, Lit};

const SMALL: u32 = 1;
const MEDIUM: u32 = 2;
const LARGE: u32 = 4;

/// Content of a cell at time 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    actor: bool,
    snow: bool,
    balls: u32,
}

impl Cell {
    fn parse(symbol: char) -> Option<Self> {
        let cell = |actor, snow, balls| Some(Cell { actor, snow, balls });
        match symbol {
            'p' => cell(true, true, 0),
            'q' => cell(true, false, 0),
            '\'' => cell(false, false, 0),
            '.' => cell(false, true, 0),
            '1'..='7' => cell(false, false, symbol.to_digit(10)?),
            _ => None,
        }
    }

    fn has(&self, size: u32) -> bool {
        self.balls & size != 0
    }
}

/// A checked snowman instance
#[derive(Debug, Clone)]
pub struct SnowmanInstance {
    pub board: Board,
    pub topology: Topology,
    /// Unit facts describing time step 0, cell by cell
    pub initial: Vec<Lit>,
    pub balls: usize,
    pub small: usize,
    pub large: usize,
    pub snowmen: usize,
}

impl SnowmanInstance {
    pub fn from_board(board: Board) -> Result<Self> {
        let kind = PuzzleKind::Snowman;
        let topology = Topology::from_board(&board, |symbol| kind.is_blocked(symbol));

        let mut initial = Vec::new();
        let (mut actors, mut balls, mut small, mut large) = (0, 0, 0, 0);

        for (loc, symbol) in board.locations() {
            if kind.is_blocked(symbol) {
                continue;
            }
            let cell = Cell::parse(symbol).ok_or_else(|| {
                let (row, col) = board.position(loc);
                TranslateError::InvalidSymbol { symbol, row, col }
            })?;

            actors += usize::from(cell.actor);
            balls += cell.balls.count_ones() as usize;
            small += usize::from(cell.has(SMALL));
            large += usize::from(cell.has(LARGE));

            let fact = |fact, holds: bool| {
                let atom = Atom::at(Kind::Fact(fact), loc, 0);
                if holds {
                    atom.pos()
                } else {
                    atom.neg()
                }
            };
            initial.extend([
                fact(Fact::Actor, cell.actor),
                fact(Fact::Snow, cell.snow),
                fact(Fact::Small, cell.has(SMALL)),
                fact(Fact::Medium, cell.has(MEDIUM)),
                fact(Fact::Large, cell.has(LARGE)),
            ]);
        }

        if actors != 1 {
            return Err(TranslateError::ActorCount { found: actors });
        }
        if balls % 3 != 0 {
            return Err(TranslateError::BallsNotMultipleOfThree { balls });
        }
        let snowmen = balls / 3;
        if small < snowmen {
            return Err(TranslateError::TooFewSmallBalls { small, snowmen });
        }
        if large > snowmen {
            return Err(TranslateError::TooManyLargeBalls { large, snowmen });
        }

        Ok(Self {
            board,
            topology,
            initial,
            balls,
            small,
            large,
            snowmen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_board_from_string;

    fn instance(content: &str) -> Result<SnowmanInstance> {
        let board = parse_board_from_string(content, PuzzleKind::Snowman)?;
        SnowmanInstance::from_board(board)
    }

    #[test]
    fn test_counts() {
        let snowman = instance("######\n#q.16#\n######\n").unwrap();

        assert_eq!(snowman.balls, 3);
        assert_eq!(snowman.small, 1);
        assert_eq!(snowman.large, 1);
        assert_eq!(snowman.snowmen, 1);
        assert_eq!(snowman.topology.locations(), &[8, 9, 10, 11]);
        // Five facts per valid cell
        assert_eq!(snowman.initial.len(), 20);
    }

    #[test]
    fn test_initial_facts() {
        let snowman = instance("#####\n#p'7#\n#####\n").unwrap();
        let fact = |fact, loc| Atom::at(Kind::Fact(fact), loc, 0);

        assert_eq!(
            &snowman.initial[..5],
            &[
                fact(Fact::Actor, 7).pos(),
                fact(Fact::Snow, 7).pos(),
                fact(Fact::Small, 7).neg(),
                fact(Fact::Medium, 7).neg(),
                fact(Fact::Large, 7).neg(),
            ]
        );
        assert!(snowman.initial.contains(&fact(Fact::Snow, 8).neg()));
        assert!(snowman.initial.contains(&fact(Fact::Medium, 9).pos()));
        assert!(snowman.initial.contains(&fact(Fact::Large, 9).pos()));
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            instance("####\n#.1#\n####\n"),
            Err(TranslateError::ActorCount { found: 0 })
        ));
        assert!(matches!(
            instance("#####\n#qp.#\n#####\n"),
            Err(TranslateError::ActorCount { found: 2 })
        ));
        assert!(matches!(
            instance("#####\n#q12#\n#####\n"),
            Err(TranslateError::BallsNotMultipleOfThree { balls: 2 })
        ));
        assert!(matches!(
            instance("######\n#q224#\n######\n"),
            Err(TranslateError::TooFewSmallBalls { small: 0, snowmen: 1 })
        ));
        assert!(matches!(
            instance("######\n#q144#\n######\n"),
            Err(TranslateError::TooManyLargeBalls { large: 2, snowmen: 1 })
        ));
    }

    #[test]
    fn test_outside_cells_are_blocked() {
        let snowman = instance("xx###\n###q#\n#####\n").unwrap();
        assert_eq!(snowman.topology.locations(), &[9]);
        assert_eq!(snowman.snowmen, 0);
    }
}
