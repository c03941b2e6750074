// crates/skillgraph-engine/src/config.rs
//
// Engine configuration. Usually embedded as the `[engine]` table of the CLI
// config file, but can also be parsed on its own.

use serde::{Deserialize, Serialize};

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::DEFAULT_STAKE_BALANCE;
use skillgraph_ledger::ProvisioningPolicy;
use skillgraph_reputation::{
    PropagationConfig, DEFAULT_DAMPING_FACTOR, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EDGE_VISITS,
};

/// Runtime configuration for the trust engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Starting stake balance for new users.
    #[serde(default = "default_stake_balance")]
    pub default_stake_balance: u64,

    /// Create unknown users on first stake. Meant for demos; turn off in
    /// production so typos in user ids fail loudly.
    #[serde(default = "default_auto_provision")]
    pub auto_provision: bool,

    /// Maximum walk length for reputation propagation.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-hop damping factor, in (0, 1].
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,

    /// Edge relaxation budget per propagation.
    #[serde(default = "default_max_edge_visits")]
    pub max_edge_visits: usize,
}

fn default_stake_balance() -> u64 {
    DEFAULT_STAKE_BALANCE
}

fn default_auto_provision() -> bool {
    true
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_damping_factor() -> f64 {
    DEFAULT_DAMPING_FACTOR
}

fn default_max_edge_visits() -> usize {
    DEFAULT_MAX_EDGE_VISITS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_stake_balance: default_stake_balance(),
            auto_provision: default_auto_provision(),
            max_depth: default_max_depth(),
            damping_factor: default_damping_factor(),
            max_edge_visits: default_max_edge_visits(),
        }
    }
}

impl EngineConfig {
    /// Parse a standalone engine config from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, SkillGraphError> {
        let config: EngineConfig = toml::from_str(contents)
            .map_err(|e| SkillGraphError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), SkillGraphError> {
        self.propagation_config().validate()?;
        if self.max_edge_visits == 0 {
            return Err(SkillGraphError::InvalidConfig(
                "max_edge_visits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn propagation_config(&self) -> PropagationConfig {
        PropagationConfig {
            max_depth: self.max_depth,
            damping_factor: self.damping_factor,
            max_edge_visits: self.max_edge_visits,
        }
    }

    pub fn provisioning_policy(&self) -> ProvisioningPolicy {
        ProvisioningPolicy::from_flag(self.auto_provision, self.default_stake_balance)
    }
}
