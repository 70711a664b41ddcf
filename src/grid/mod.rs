//! Grid representation, parsing and adjacency

pub mod board;
pub mod io;
pub mod topology;

pub use board::Board;
pub use io::{create_example_puzzles, load_board_from_file, parse_board_from_string, read_board};
pub use topology::{Direction, Topology};
