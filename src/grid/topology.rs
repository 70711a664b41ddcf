//! Grid adjacency: one-step and two-step neighbours and wall proximity

use serde::{Deserialize, Serialize};

use super::Board;

/// Compass directions, in the order every direction-indexed table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Single-letter name used in atom names
    pub fn symbol(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// This direction, its opposite, then the two perpendicular directions
    pub fn compass(self) -> [Direction; 4] {
        match self {
            Direction::North | Direction::South => {
                [self, self.opposite(), Direction::East, Direction::West]
            }
            Direction::East | Direction::West => {
                [self, self.opposite(), Direction::North, Direction::South]
            }
        }
    }
}

type Neighbours = [Option<usize>; 4];

/// Derived adjacency data of a board
///
/// All tables are indexed by location; index 0 is unused.
#[derive(Debug, Clone)]
pub struct Topology {
    rows: usize,
    cols: usize,
    next: Vec<Neighbours>,
    next2: Vec<Neighbours>,
    valid: Vec<bool>,
    locations: Vec<usize>,
    wall_ahead: Vec<[bool; 4]>,
    wall_two_ahead: Vec<[bool; 4]>,
    neighbours: Vec<Vec<usize>>,
}

impl Topology {
    /// Compute the topology of a `rows x cols` grid whose blocked cells are
    /// given by `blocked`. Cells outside the grid count as blocked.
    pub fn new(rows: usize, cols: usize, blocked: impl Fn(usize) -> bool) -> Self {
        let size = rows * cols;
        let next = Self::compute_next(rows, cols);
        let next2 = Self::compute_next2(&next);

        let valid: Vec<bool> = (0..=size).map(|loc| loc > 0 && !blocked(loc)).collect();
        let locations: Vec<usize> = (1..=size).filter(|&loc| valid[loc]).collect();

        let is_wall = |target: Option<usize>| target.map_or(true, |loc| !valid[loc]);

        let mut wall_ahead = vec![[false; 4]; size + 1];
        let mut wall_two_ahead = vec![[false; 4]; size + 1];
        let mut neighbours = vec![Vec::new(); size + 1];
        for &loc in &locations {
            for d in Direction::ALL {
                wall_ahead[loc][d.index()] = is_wall(next[loc][d.index()]);
                wall_two_ahead[loc][d.index()] = is_wall(next2[loc][d.index()]);
                if let Some(neighbour) = next[loc][d.index()].filter(|&n| valid[n]) {
                    neighbours[loc].push(neighbour);
                }
            }
        }

        Self {
            rows,
            cols,
            next,
            next2,
            valid,
            locations,
            wall_ahead,
            wall_two_ahead,
            neighbours,
        }
    }

    /// Topology of a board given the symbols a piece cannot enter
    pub fn from_board(board: &Board, is_blocked: impl Fn(char) -> bool) -> Self {
        Self::new(board.rows, board.cols, |loc| {
            board.symbol(loc).map_or(true, |symbol| is_blocked(symbol))
        })
    }

    fn compute_next(rows: usize, cols: usize) -> Vec<Neighbours> {
        let size = rows * cols;
        let mut next = vec![[None; 4]; size + 1];
        for loc in 1..=size {
            let (row, col) = ((loc - 1) / cols, (loc - 1) % cols);
            let entry = &mut next[loc];
            if row > 0 {
                entry[Direction::North.index()] = Some(loc - cols);
            }
            if row + 1 < rows {
                entry[Direction::South.index()] = Some(loc + cols);
            }
            if col + 1 < cols {
                entry[Direction::East.index()] = Some(loc + 1);
            }
            if col > 0 {
                entry[Direction::West.index()] = Some(loc - 1);
            }
        }
        next
    }

    fn compute_next2(next: &[Neighbours]) -> Vec<Neighbours> {
        next.iter()
            .map(|entry| {
                let mut twice = [None; 4];
                for d in Direction::ALL {
                    twice[d.index()] = entry[d.index()].and_then(|mid| next[mid][d.index()]);
                }
                twice
            })
            .collect()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Neighbour of `loc` in direction `d`, whether valid or not
    pub fn next(&self, d: Direction, loc: usize) -> Option<usize> {
        self.next.get(loc).and_then(|entry| entry[d.index()])
    }

    /// Cell two steps from `loc` in direction `d`
    pub fn next2(&self, d: Direction, loc: usize) -> Option<usize> {
        self.next2.get(loc).and_then(|entry| entry[d.index()])
    }

    /// Valid cell one step from `loc` in direction `d`
    pub fn valid_next(&self, d: Direction, loc: usize) -> Option<usize> {
        self.next(d, loc).filter(|&n| self.is_valid(n))
    }

    /// Valid cell two steps from `loc` in direction `d`
    pub fn valid_next2(&self, d: Direction, loc: usize) -> Option<usize> {
        self.next2(d, loc).filter(|&n| self.is_valid(n))
    }

    /// Valid cell from which a step in direction `d` lands on `loc`
    pub fn valid_prev(&self, d: Direction, loc: usize) -> Option<usize> {
        self.valid_next(d.opposite(), loc)
    }

    /// Valid cell from which two steps in direction `d` land on `loc`
    pub fn valid_prev2(&self, d: Direction, loc: usize) -> Option<usize> {
        self.valid_next2(d.opposite(), loc)
    }

    pub fn is_valid(&self, loc: usize) -> bool {
        self.valid.get(loc).copied().unwrap_or(false)
    }

    /// Valid locations in increasing order
    pub fn locations(&self) -> &[usize] {
        &self.locations
    }

    /// The next cell in direction `d` is a wall or outside the grid
    pub fn wall_ahead(&self, d: Direction, loc: usize) -> bool {
        self.wall_ahead.get(loc).map_or(true, |walls| walls[d.index()])
    }

    /// The cell two steps away in direction `d` is a wall or outside the grid
    pub fn wall_two_ahead(&self, d: Direction, loc: usize) -> bool {
        self.wall_two_ahead.get(loc).map_or(true, |walls| walls[d.index()])
    }

    /// Nothing blocks the two cells ahead in direction `d`
    pub fn is_interior(&self, d: Direction, loc: usize) -> bool {
        !self.wall_ahead(d, loc) && !self.wall_two_ahead(d, loc)
    }

    /// Valid neighbours in north, south, east, west order
    pub fn neighbours(&self, loc: usize) -> &[usize] {
        self.neighbours.get(loc).map(Vec::as_slice).unwrap_or(&[])
    }
}
