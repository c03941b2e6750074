// crates/skillgraph-core/src/error.rs

use thiserror::Error;

use crate::user::UserId;

/// Engine-wide error types for the SkillGraph trust engine.
///
/// Every variant is recoverable at the request boundary. A failed stake
/// never leaves a partial mutation behind, so callers may correct their
/// input and retry.
#[derive(Debug, Error)]
pub enum SkillGraphError {
    /// The verifier already vouched for this candidate on this skill.
    #[error("Duplicate edge: {source_id} already verified {target_id} for skill '{skill}'")]
    DuplicateEdge {
        source_id: UserId,
        target_id: UserId,
        skill: String,
    },

    /// The verifier's balance does not cover the requested stake.
    #[error("Insufficient stake: {user} has {balance}, requested {requested}")]
    InsufficientStake {
        user: UserId,
        balance: u64,
        requested: u64,
    },

    /// A referenced user does not exist and provisioning is disabled.
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// Propagation exceeded its configured edge-visit budget.
    #[error("Computation too large: exceeded budget of {budget} edge visits")]
    ComputationTooLarge { budget: usize },

    /// Edge weight outside (0, 1].
    #[error("Invalid edge weight: {0} (must be in (0, 1])")]
    InvalidWeight(f64),

    /// Malformed request input (empty skill tag, self-verification, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value out of range.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Storage layer error (RocksDB).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SkillGraphError {
    /// Whether the same request may succeed if retried unchanged.
    ///
    /// Only storage faults qualify; every other variant describes the
    /// request or the current graph state and needs corrected input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkillGraphError::Storage(_))
    }
}

impl From<serde_json::Error> for SkillGraphError {
    fn from(e: serde_json::Error) -> Self {
        SkillGraphError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stake_reports_balance() {
        let err = SkillGraphError::InsufficientStake {
            user: UserId::from("alice"),
            balance: 40,
            requested: 41,
        };
        let msg = err.to_string();
        assert!(msg.contains("alice"));
        assert!(msg.contains("40"));
        assert!(msg.contains("41"));
    }

    #[test]
    fn only_storage_errors_are_retryable() {
        assert!(SkillGraphError::Storage("io".into()).is_retryable());
        assert!(!SkillGraphError::UnknownUser(UserId::from("x")).is_retryable());
        assert!(!SkillGraphError::ComputationTooLarge { budget: 10 }.is_retryable());
    }

    #[test]
    fn serde_json_error_converts() {
        let bad: Result<u64, _> = serde_json::from_str("not json");
        let err: SkillGraphError = bad.unwrap_err().into();
        assert!(matches!(err, SkillGraphError::Serialization(_)));
    }
}
