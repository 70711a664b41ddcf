//! Configuration management for the puzzle translator

pub mod settings;

pub use settings::{CliOverrides, EncodingConfig, InputConfig, OutputConfig, PuzzleConfig, Settings};
