//! Character matrix of a puzzle

use std::fmt;

use crate::error::{Result, TranslateError};

/// Rectangular grid of puzzle symbols
///
/// Locations number the cells row-major starting from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<char>,
}

impl Board {
    /// Build a board from rows of symbols, padding short rows with `fill`
    pub fn from_rows(rows: Vec<Vec<char>>, fill: char) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(TranslateError::EmptyGrid);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(height * cols);
        for mut row in rows {
            row.resize(cols, fill);
            cells.extend(row);
        }

        Ok(Self { rows: height, cols, cells })
    }

    /// Location of the cell at `(row, col)`
    #[inline]
    pub fn location(&self, row: usize, col: usize) -> usize {
        row * self.cols + col + 1
    }

    /// `(row, col)` of a location
    #[inline]
    pub fn position(&self, loc: usize) -> (usize, usize) {
        ((loc - 1) / self.cols, (loc - 1) % self.cols)
    }

    /// Number of locations
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Symbol at a location
    pub fn symbol(&self, loc: usize) -> Option<char> {
        loc.checked_sub(1).and_then(|index| self.cells.get(index)).copied()
    }

    /// All `(location, symbol)` pairs, row-major
    pub fn locations(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.cells.iter().enumerate().map(|(index, &symbol)| (index + 1, symbol))
    }

    /// Number of cells holding `symbol`
    pub fn count(&self, symbol: char) -> usize {
        self.cells.iter().filter(|&&c| c == symbol).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Vec<char>> {
        lines.iter().map(|line| line.chars().collect()).collect()
    }

    #[test]
    fn test_board_from_rows() {
        let board = Board::from_rows(rows(&["###", "#q", "###"]), 'x').unwrap();

        assert_eq!(board.rows, 3);
        assert_eq!(board.cols, 3);
        assert_eq!(board.get(1, 2), Some('x'));
        assert_eq!(board.get(3, 0), None);
        assert_eq!(board.to_string(), "###\n#qx\n###\n");
    }

    #[test]
    fn test_location_numbering() {
        let board = Board::from_rows(rows(&["#####", "#@$.#", "#####"]), '#').unwrap();

        assert_eq!(board.location(0, 0), 1);
        assert_eq!(board.location(1, 1), 7);
        assert_eq!(board.position(9), (1, 3));
        assert_eq!(board.symbol(7), Some('@'));
        assert_eq!(board.symbol(8), Some('$'));
        assert_eq!(board.symbol(0), None);
        assert_eq!(board.symbol(16), None);
        assert_eq!(board.count('#'), 12);
    }

    #[test]
    fn test_empty_board() {
        assert!(matches!(Board::from_rows(vec![], '#'), Err(TranslateError::EmptyGrid)));
        assert!(matches!(
            Board::from_rows(vec![vec![]], '#'),
            Err(TranslateError::EmptyGrid)
        ));
    }
}
