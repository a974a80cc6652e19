//! Engine configuration.
//!
//! Every option is fixed when a [`SimulationPlayer`](crate::engine::SimulationPlayer)
//! is built. The string-valued options parse through `FromStr`, so the CLI
//! rejects unknown values before any simulation runs.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFAULT_KOMI, DEFAULT_LIMIT, DEFAULT_SIM, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, UCB_EXPLORATION,
};
use crate::playout::PlayoutPolicy;

/// Configuration errors, reported before any simulation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("moveselect must be simple or ucb (got '{0}')")]
    UnknownMoveSelection(String),

    #[error("simrule must be random or rulebased (got '{0}')")]
    UnknownSimulationRule(String),

    #[error("number of simulations per move must be positive")]
    ZeroSimulations,

    #[error("board size {0} is outside {min}..={max}", min = MIN_SIZE, max = MAX_SIZE)]
    BoardSize(usize),

    #[error("{name} must be finite (got {value})")]
    NotFinite { name: &'static str, value: f64 },
}

/// How the move to play is chosen from the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveSelection {
    /// Equal playouts per candidate, most wins is played.
    #[default]
    Simple,
    /// UCB1 allocation of the same total budget, best mean is played.
    Ucb,
}

impl FromStr for MoveSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(MoveSelection::Simple),
            "ucb" | "bandit" => Ok(MoveSelection::Ucb),
            _ => Err(ConfigError::UnknownMoveSelection(s.to_string())),
        }
    }
}

impl fmt::Display for MoveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MoveSelection::Simple => "simple",
            MoveSelection::Ucb => "ucb",
        })
    }
}

/// Which move generator drives the playouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationRule {
    #[default]
    Random,
    RuleBased,
}

impl FromStr for SimulationRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(SimulationRule::Random),
            "rulebased" | "rule-based" => Ok(SimulationRule::RuleBased),
            _ => Err(ConfigError::UnknownSimulationRule(s.to_string())),
        }
    }
}

impl fmt::Display for SimulationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SimulationRule::Random => "random",
            SimulationRule::RuleBased => "rulebased",
        })
    }
}

/// Options for a simulation player.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Playouts per candidate move (simple mode); per-candidate budget share (UCB mode).
    pub sim: u32,
    pub move_selection: MoveSelection,
    pub simulation_rule: SimulationRule,
    /// Reject self-atari moves in rule-based playouts.
    pub check_selfatari: bool,
    /// Maximum plies per playout.
    pub limit: usize,
    pub komi: f64,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Board size for a fresh game.
    pub size: usize,
    /// Seed for the playout RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sim: DEFAULT_SIM,
            move_selection: MoveSelection::default(),
            simulation_rule: SimulationRule::default(),
            check_selfatari: false,
            limit: DEFAULT_LIMIT,
            komi: DEFAULT_KOMI,
            exploration: UCB_EXPLORATION,
            size: DEFAULT_SIZE,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim == 0 {
            return Err(ConfigError::ZeroSimulations);
        }
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::BoardSize(self.size));
        }
        if !self.komi.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "komi",
                value: self.komi,
            });
        }
        if !self.exploration.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "exploration",
                value: self.exploration,
            });
        }
        Ok(())
    }

    /// The playout policy these options select.
    pub fn playout_policy(&self) -> PlayoutPolicy {
        match self.simulation_rule {
            SimulationRule::Random => PlayoutPolicy::Random,
            SimulationRule::RuleBased => PlayoutPolicy::RuleBased {
                check_selfatari: self.check_selfatari,
            },
        }
    }
}
