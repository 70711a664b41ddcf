//! Reading puzzle grids from streams and files

use anyhow::Context;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::Board;
use crate::error::{Result, TranslateError};
use crate::puzzle::PuzzleKind;

/// Read a grid from `reader`.
///
/// The grid ends at the first empty line or at end of stream; leading empty
/// lines are skipped. Sokoban grids are closed with walls around their
/// enclosing boundary, snowman rows are padded with `x`.
pub fn read_board<R: BufRead>(reader: R, kind: PuzzleKind) -> Result<Board> {
    let mut rows: Vec<Vec<char>> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            if rows.is_empty() {
                continue;
            }
            break;
        }
        rows.push(line.chars().collect());
    }

    if rows.is_empty() {
        return Err(TranslateError::EmptyGrid);
    }
    if kind == PuzzleKind::Sokoban {
        rows = close_sokoban_rows(rows)?;
    }

    for (row, symbols) in rows.iter().enumerate() {
        if let Some(col) = symbols.iter().position(|&symbol| !kind.accepts(symbol)) {
            return Err(TranslateError::InvalidSymbol { symbol: symbols[col], row, col });
        }
    }

    Board::from_rows(rows, kind.fill())
}

/// Parse a grid from a string
pub fn parse_board_from_string(content: &str, kind: PuzzleKind) -> Result<Board> {
    read_board(content.as_bytes(), kind)
}

/// Load a grid from a text file
pub fn load_board_from_file<P: AsRef<Path>>(path: P, kind: PuzzleKind) -> anyhow::Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content, kind)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Turn every cell outside the wall boundary into wall.
///
/// The first and last rows become solid wall; in the other rows everything
/// before the first and after the last wall symbol is walled in, up to the
/// width of the widest row.
fn close_sokoban_rows(rows: Vec<Vec<char>>) -> Result<Vec<Vec<char>>> {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let last_row = rows.len() - 1;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            if index == 0 || index == last_row {
                return Ok(vec!['#'; cols]);
            }
            let first = row.iter().position(|&c| c == '#');
            let last = row.iter().rposition(|&c| c == '#');
            let (Some(first), Some(last)) = (first, last) else {
                return Err(TranslateError::UnenclosedRow { row: index });
            };

            let mut closed = vec!['#'; first];
            closed.extend_from_slice(&row[first..=last]);
            closed.resize(cols, '#');
            Ok(closed)
        })
        .collect()
}

/// Create example puzzle files, returning the paths written
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> anyhow::Result<Vec<PathBuf>> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let puzzles = [
        // One push finishes the snowman
        ("snowman_push.txt", "######\n#q.16#\n######\n"),
        (
            "snowman_field.txt",
            "#########\n#'''''''#\n#'.'2'.'#\n#'1'q'4'#\n#'.'.'.'#\n#########\n",
        ),
        ("sokoban_corridor.txt", "#####\n#@$.#\n#####\n"),
        (
            "sokoban_two_balls.txt",
            "  #####\n###   #\n#.@$  #\n### $.#\n  #   #\n  #####\n",
        ),
    ];

    let mut written = Vec::with_capacity(puzzles.len());
    for (name, content) in puzzles {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_stops_at_empty_line() {
        let board = parse_board_from_string("\n#####\n#q.1#\n#####\n\nignored\n", PuzzleKind::Snowman)
            .unwrap();
        assert_eq!(board.rows, 3);
        assert_eq!(board.cols, 5);
    }

    #[test]
    fn test_crlf_lines() {
        let board = parse_board_from_string("###\r\n#q#\r\n###\r\n", PuzzleKind::Snowman).unwrap();
        assert_eq!(board.cols, 3);
        assert_eq!(board.get(1, 1), Some('q'));
    }

    #[test]
    fn test_snowman_padding() {
        let board = parse_board_from_string("#####\n#q.#\n#####\n", PuzzleKind::Snowman).unwrap();
        assert_eq!(board.get(1, 4), Some('x'));
    }

    #[test]
    fn test_sokoban_closing() {
        let content = "  #####\n###   #\n#.@$  #\n### $.#\n  #   #\n  #####\n";
        let board = parse_board_from_string(content, PuzzleKind::Sokoban).unwrap();

        // Leading blanks of row 4 are walled in, the top row becomes solid
        let expected = "#######\n###   #\n#.@$  #\n### $.#\n###   #\n#######\n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_sokoban_short_rows_are_walled() {
        let board = parse_board_from_string("####\n#@$.#\n# #\n######\n", PuzzleKind::Sokoban).unwrap();
        assert_eq!(board.cols, 6);
        assert_eq!(board.to_string(), "######\n#@$.##\n# ####\n######\n");
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            parse_board_from_string("#####\n#q?1#\n#####\n", PuzzleKind::Snowman),
            Err(TranslateError::InvalidSymbol { symbol: '?', row: 1, col: 2 })
        ));
        assert!(matches!(
            parse_board_from_string("#####\n @$. \n#####\n", PuzzleKind::Sokoban),
            Err(TranslateError::UnenclosedRow { row: 1 })
        ));
        assert!(matches!(
            parse_board_from_string("", PuzzleKind::Sokoban),
            Err(TranslateError::EmptyGrid)
        ));
    }

    #[test]
    fn test_create_example_puzzles() {
        let temp_dir = tempdir().unwrap();
        let written = create_example_puzzles(temp_dir.path()).unwrap();
        assert_eq!(written.len(), 4);

        let board = load_board_from_file(temp_dir.path().join("sokoban_corridor.txt"), PuzzleKind::Sokoban)
            .unwrap();
        assert_eq!(board.rows, 3);
        assert_eq!(board.count('$'), 1);

        let field = load_board_from_file(temp_dir.path().join("snowman_field.txt"), PuzzleKind::Snowman)
            .unwrap();
        assert_eq!(field.count('q'), 1);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        assert!(load_board_from_file(temp_dir.path().join("absent.txt"), PuzzleKind::Snowman).is_err());
    }
}
