//! Configuration settings for the puzzle translator

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::encoding::{ActionModel, EncodingPolicy, Preset};
use crate::puzzle::PuzzleKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub puzzle: PuzzleConfig,
    pub encoding: EncodingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub kind: PuzzleKind,
    /// Plan horizon N
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub action_model: ActionModel,
    pub reachability: bool,
    pub invariants: bool,
    pub helper_clauses: bool,
    pub forbidden_corners: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Grid file; standard input when absent
    pub grid_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// DIMACS destination; standard output when absent
    pub path: Option<PathBuf>,
}

impl EncodingConfig {
    pub fn policy(&self) -> EncodingPolicy {
        EncodingPolicy {
            action_model: self.action_model,
            reachability: self.reachability,
            invariants: self.invariants,
            helper_clauses: self.helper_clauses,
            forbidden_corners: self.forbidden_corners,
        }
    }
}

impl From<EncodingPolicy> for EncodingConfig {
    fn from(policy: EncodingPolicy) -> Self {
        Self {
            action_model: policy.action_model,
            reachability: policy.reachability,
            invariants: policy.invariants,
            helper_clauses: policy.helper_clauses,
            forbidden_corners: policy.forbidden_corners,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig {
                kind: PuzzleKind::Snowman,
                steps: 10,
            },
            encoding: EncodingPolicy::default().into(),
            input: InputConfig { grid_file: None },
            output: OutputConfig { path: None },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// A relative grid file is taken relative to the directory holding the
    /// configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            settings.input.grid_file = settings.input.grid_file.map(|grid_file| base.join(grid_file));
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let kind = self.puzzle.kind;
        self.encoding
            .policy()
            .validate(kind)
            .with_context(|| format!("Invalid encoding for {} puzzles", kind))?;

        if let Some(ref grid_file) = self.input.grid_file {
            if !grid_file.exists() {
                anyhow::bail!("Grid file does not exist: {}", grid_file.display());
            }
        }

        match kind {
            PuzzleKind::Sokoban if self.encoding.invariants => {
                debug!("Invariants have no Sokoban encoding and are ignored");
            }
            PuzzleKind::Snowman if self.encoding.forbidden_corners => {
                debug!("Forbidden corners only apply to Sokoban and are ignored");
            }
            _ => {}
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    ///
    /// A preset replaces the whole encoding section; the individual switches
    /// are applied after it.
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(kind) = cli_overrides.kind {
            self.puzzle.kind = kind;
        }
        if let Some(steps) = cli_overrides.steps {
            self.puzzle.steps = steps;
        }
        if let Some(preset) = cli_overrides.preset {
            self.encoding = preset.policy().into();
        }
        if cli_overrides.no_helpers {
            self.encoding.helper_clauses = false;
        }
        if cli_overrides.no_corners {
            self.encoding.forbidden_corners = false;
        }
        if let Some(ref grid_file) = cli_overrides.grid_file {
            self.input.grid_file = Some(grid_file.clone());
        }
        if let Some(ref output) = cli_overrides.output {
            self.output.path = Some(output.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub kind: Option<PuzzleKind>,
    pub steps: Option<usize>,
    pub preset: Option<Preset>,
    pub no_helpers: bool,
    pub no_corners: bool,
    pub grid_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
}
