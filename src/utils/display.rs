//! Display and output formatting utilities

use serde::Serialize;
use std::fmt::Write as _;

use crate::encoding::EncodingPolicy;
use crate::puzzle::{Puzzle, PuzzleSummary};
use crate::sat::EncodingStatistics;

/// Everything `analyze` reports about an instance
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: PuzzleSummary,
    pub steps: usize,
    pub policy: EncodingPolicy,
    pub statistics: EncodingStatistics,
}

/// Format boards and encoding figures for the terminal
pub struct ReportFormatter;

impl ReportFormatter {
    /// The board with row and column indices; cells outside the playing
    /// area are drawn solid
    pub fn format_board_with_coords(puzzle: &Puzzle) -> String {
        let board = puzzle.board();
        let topology = puzzle.topology();
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..board.cols {
            let _ = write!(output, "{:2}", col % 10);
        }
        output.push('\n');

        for row in 0..board.rows {
            let _ = write!(output, "{:2} ", row);
            for col in 0..board.cols {
                let loc = board.location(row, col);
                match board.get(row, col) {
                    Some(symbol) if topology.is_valid(loc) => {
                        output.push(' ');
                        output.push(symbol);
                    }
                    _ => output.push_str("██"),
                }
            }
            output.push('\n');
        }

        output
    }

    /// Clause counts per length as a bar chart scaled to `width` columns
    pub fn format_clause_histogram(statistics: &EncodingStatistics, width: usize) -> String {
        let largest = statistics.clause_lengths.values().copied().max().unwrap_or(0);
        let mut output = String::from("Clause lengths:\n");

        for (length, count) in &statistics.clause_lengths {
            let bar = if largest == 0 { 0 } else { (count * width).div_ceil(largest) };
            let _ = writeln!(output, "  {:>3} | {:<width$} {}", length, "#".repeat(bar), count, width = width);
        }

        output
    }

    pub fn format_report(report: &AnalysisReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", report.summary);
        let _ = writeln!(
            output,
            "Encoding: {} actions, reachability {}, invariants {}, helper clauses {}, N = {}",
            report.policy.action_model,
            on_off(report.policy.reachability),
            on_off(report.policy.invariants),
            on_off(report.policy.helper_clauses),
            report.steps
        );
        output.push('\n');
        let _ = writeln!(output, "{}", report.statistics);
        output.push_str(&Self::format_clause_histogram(&report.statistics, 40));
        output
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var_os("NO_COLOR").is_none() && std::env::var("TERM").unwrap_or_default() != "dumb"
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
