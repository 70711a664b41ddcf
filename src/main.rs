//! Command line front end of the puzzle translator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use puzzle2sat::{
    config::{CliOverrides, Settings},
    encoding::{Preset, Translator},
    grid::create_example_puzzles,
    load_puzzle,
    utils::{AnalysisReport, ColorOutput, ReportFormatter},
    PuzzleKind,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "puzzle2sat")]
#[command(about = "Translate Snowman and Sokoban puzzles into DIMACS CNF")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the CNF formula for a plan of STEPS steps
    Translate {
        /// Plan horizon N
        steps: usize,

        /// Puzzle family (overrides config)
        #[arg(short, long)]
        puzzle: Option<PuzzleKind>,

        /// Grid file; standard input when neither this nor the config names one
        #[arg(short, long)]
        grid: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Output file; standard output by default
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoding preset (overrides config)
        #[arg(long)]
        policy: Option<Preset>,

        /// Leave out the redundant clauses that only help the solver
        #[arg(long)]
        no_helpers: bool,

        /// Do not forbid balls in dead corners
        #[arg(long)]
        no_corners: bool,
    },

    /// Create a default configuration and example puzzles
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Show a puzzle and the size of its encoding
    Analyze {
        /// Puzzle family
        #[arg(short, long, default_value = "snowman")]
        puzzle: PuzzleKind,

        /// Grid file; standard input when absent
        #[arg(short, long)]
        grid: Option<PathBuf>,

        /// Plan horizon used for the encoding figures
        #[arg(short, long, default_value_t = 10)]
        steps: usize,

        /// Encoding preset
        #[arg(long, default_value = "sequential")]
        policy: Preset,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Translate {
            steps,
            puzzle,
            grid,
            config,
            output,
            policy,
            no_helpers,
            no_corners,
        } => {
            let overrides = CliOverrides {
                kind: puzzle,
                steps: Some(steps),
                preset: policy,
                no_helpers,
                no_corners,
                grid_file: grid,
                output,
            };
            translate_command(&config, &overrides)
        }
        Commands::Setup { directory, force } => setup_command(&directory, force),
        Commands::Analyze {
            puzzle,
            grid,
            steps,
            policy,
            json,
        } => analyze_command(puzzle, grid, steps, policy, json),
    }
}

/// Diagnostics go to stderr; stdout carries the formula
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn translate_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        info!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    // Apply CLI overrides
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;

    let puzzle = load_puzzle(&settings)?;
    let policy = settings.encoding.policy();

    let start_time = Instant::now();
    let formula = Translator::new(&puzzle, policy, settings.puzzle.steps)
        .context("Failed to set up the translation")?
        .translate();
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "Formula assembled");

    match settings.output.path {
        Some(ref path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            formula
                .write_dimacs(&mut out)
                .and_then(|_| out.flush())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Formula written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            formula
                .write_dimacs(&mut out)
                .and_then(|_| out.flush())
                .context("Failed to write the formula to stdout")?;
        }
    }

    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up puzzle2sat files..."));

    let puzzle_dir = directory.join("puzzles");
    std::fs::create_dir_all(&puzzle_dir)
        .with_context(|| format!("Failed to create directory {}", puzzle_dir.display()))?;

    // Create default configuration
    let config_path = directory.join("config.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.input.grid_file = Some(PathBuf::from("puzzles/snowman_push.txt"));
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        let skipped = format!("Skipped: {} (already exists)", config_path.display());
        println!("{}", ColorOutput::warning(&skipped));
    }

    // Create example puzzles
    let written = create_example_puzzles(&puzzle_dir).context("Failed to create example puzzles")?;
    for path in &written {
        println!("Created: {}", path.display());
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: puzzle2sat translate 2 -c {} > plan.cnf", config_path.display());

    Ok(())
}

fn analyze_command(kind: PuzzleKind, grid: Option<PathBuf>, steps: usize, preset: Preset, json: bool) -> Result<()> {
    let mut settings = Settings::default();
    settings.merge_with_cli(&CliOverrides {
        kind: Some(kind),
        steps: Some(steps),
        preset: Some(preset),
        grid_file: grid,
        ..CliOverrides::default()
    });
    settings.validate().context("Configuration validation failed")?;

    let puzzle = load_puzzle(&settings)?;
    let policy = settings.encoding.policy();
    let formula = Translator::new(&puzzle, policy, steps)?.translate();

    let report = AnalysisReport {
        summary: puzzle.summary(),
        steps,
        policy,
        statistics: formula.statistics(),
    };

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize the report")?;
        println!("{}", text);
        return Ok(());
    }

    if report.statistics.clause_count == 0 {
        warn!("The encoding is empty");
    }
    println!("{}", ColorOutput::info(&format!("{} grid:", kind)));
    println!("{}", ReportFormatter::format_board_with_coords(&puzzle));
    println!("{}", ReportFormatter::format_report(&report));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "puzzle2sat",
            "translate",
            "3",
            "--puzzle",
            "sokoban",
            "--policy",
            "parallel",
            "--no-helpers",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Translate {
                steps,
                puzzle,
                policy,
                no_helpers,
                no_corners,
                ..
            } => {
                assert_eq!(steps, 3);
                assert_eq!(puzzle, Some(PuzzleKind::Sokoban));
                assert_eq!(policy, Some(Preset::Parallel));
                assert!(no_helpers);
                assert!(!no_corners);
            }
            _ => panic!("expected the translate command"),
        }
    }

    #[test]
    fn test_steps_are_required() {
        assert!(Cli::try_parse_from(["puzzle2sat", "translate"]).is_err());
        assert!(Cli::try_parse_from(["puzzle2sat", "translate", "many"]).is_err());
        assert!(Cli::try_parse_from(["puzzle2sat", "translate", "-1"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path(), false).unwrap();

        assert!(temp_dir.path().join("config.yaml").exists());
        assert!(temp_dir.path().join("puzzles/sokoban_corridor.txt").exists());

        // The grid path is relative to the setup directory
        let config = std::fs::read_to_string(temp_dir.path().join("config.yaml")).unwrap();
        assert!(config.contains("grid_file: puzzles/snowman_push.txt"));

        // and loads from any working directory
        let settings = Settings::from_file(&temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(
            settings.input.grid_file,
            Some(temp_dir.path().join("puzzles").join("snowman_push.txt"))
        );
        assert!(load_puzzle(&settings).is_ok());

        // A second run keeps the existing configuration
        std::fs::write(temp_dir.path().join("config.yaml"), "edited").unwrap();
        setup_command(temp_dir.path(), false).unwrap();
        let config = std::fs::read_to_string(temp_dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, "edited");
    }

    #[test]
    fn test_translate_command_writes_file() {
        let temp_dir = tempdir().unwrap();
        let grid = temp_dir.path().join("corridor.txt");
        std::fs::write(&grid, "#####\n#@$.#\n#####\n").unwrap();
        let output = temp_dir.path().join("out.cnf");

        let overrides = CliOverrides {
            kind: Some(PuzzleKind::Sokoban),
            steps: Some(1),
            grid_file: Some(grid),
            output: Some(output.clone()),
            ..CliOverrides::default()
        };
        translate_command(&temp_dir.path().join("absent.yaml"), &overrides).unwrap();

        let text = std::fs::read_to_string(output).unwrap();
        assert!(text.starts_with("c 1 #c_7_0\n"));
        assert!(text.contains("\np cnf "));
    }
}
