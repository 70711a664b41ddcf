//! Encoding policy: which translation variant to produce

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TranslateError};
use crate::puzzle::PuzzleKind;

/// How actions are selected at each time step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionModel {
    /// Exactly one global direction per step
    Exclusive,
    /// Independent direction atoms per location, with actor jumps
    Parallel,
}

impl fmt::Display for ActionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionModel::Exclusive => write!(f, "exclusive"),
            ActionModel::Parallel => write!(f, "parallel"),
        }
    }
}

/// Parameters selecting one translation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingPolicy {
    pub action_model: ActionModel,
    /// Path witnesses between consecutive actor positions
    pub reachability: bool,
    /// Ball-count invariants over intermediate steps (snowman only)
    pub invariants: bool,
    /// Keep redundant clauses that only help the solver
    pub helper_clauses: bool,
    /// Keep balls out of dead corners (Sokoban only)
    pub forbidden_corners: bool,
}

impl EncodingPolicy {
    /// One global action per step, actor moves one cell at a time
    pub fn stepwise() -> Self {
        Self {
            action_model: ActionModel::Exclusive,
            reachability: false,
            invariants: false,
            helper_clauses: true,
            forbidden_corners: true,
        }
    }

    /// One ball action per step, actor walks along a path witness
    pub fn sequential() -> Self {
        Self {
            reachability: true,
            invariants: true,
            ..Self::stepwise()
        }
    }

    /// Several ball actions per step
    pub fn parallel() -> Self {
        Self {
            action_model: ActionModel::Parallel,
            ..Self::sequential()
        }
    }

    /// Reject combinations no translation exists for
    pub fn validate(&self, kind: PuzzleKind) -> Result<()> {
        if self.action_model == ActionModel::Parallel && !self.reachability {
            return Err(TranslateError::UnsupportedPolicy(
                "the parallel action model requires reachability".to_string(),
            ));
        }
        if kind == PuzzleKind::Sokoban && !self.reachability {
            return Err(TranslateError::UnsupportedPolicy(
                "Sokoban translations require reachability".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Named policy presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Stepwise,
    Sequential,
    Parallel,
}

impl Preset {
    pub fn policy(self) -> EncodingPolicy {
        match self {
            Preset::Stepwise => EncodingPolicy::stepwise(),
            Preset::Sequential => EncodingPolicy::sequential(),
            Preset::Parallel => EncodingPolicy::parallel(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Stepwise => write!(f, "stepwise"),
            Preset::Sequential => write!(f, "sequential"),
            Preset::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stepwise" => Ok(Preset::Stepwise),
            "sequential" => Ok(Preset::Sequential),
            "parallel" => Ok(Preset::Parallel),
            other => Err(format!(
                "unknown policy '{}' (expected stepwise, sequential or parallel)",
                other
            )),
        }
    }
}
