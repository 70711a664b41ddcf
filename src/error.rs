//! Error types of the translator

use thiserror::Error;

/// Fatal translation failures
///
/// Every variant aborts the run before any clause is written.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("The grid is empty")]
    EmptyGrid,

    #[error("Invalid symbol '{symbol}' at row {row}, column {col}")]
    InvalidSymbol { symbol: char, row: usize, col: usize },

    #[error("Row {row} is not enclosed by walls")]
    UnenclosedRow { row: usize },

    #[error("There must be one and only one character (found {found})")]
    ActorCount { found: usize },

    #[error("There must be at least one ball and one hole")]
    NoBalls,

    #[error("The number of balls ({balls}) and holes ({holes}) must match")]
    BallHoleMismatch { balls: usize, holes: usize },

    #[error("The number of balls ({balls}) must be a multiple of three")]
    BallsNotMultipleOfThree { balls: usize },

    #[error("Trivially unsatisfiable (too few small balls: {small} for {snowmen} snowmen)")]
    TooFewSmallBalls { small: usize, snowmen: usize },

    #[error("Trivially unsatisfiable (too many large balls: {large} for {snowmen} snowmen)")]
    TooManyLargeBalls { large: usize, snowmen: usize },

    #[error("Unsupported encoding policy: {0}")]
    UnsupportedPolicy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
