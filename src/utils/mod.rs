//! Terminal output helpers

pub mod display;

pub use display::{AnalysisReport, Color, ColorOutput, ReportFormatter};
