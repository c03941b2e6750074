// crates/skillgraph-core/src/user.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starting stake balance handed to newly provisioned users.
pub const DEFAULT_STAKE_BALANCE: u64 = 100;

/// Opaque, unique identifier of a user in the trust graph.
///
/// Usually a UUID string, but the engine never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A participant in the trust graph.
///
/// The stake balance is owned by the ledger; the reputation score is a
/// cache written only by an explicit reputation refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Human-readable name shown in graph exports.
    pub display_name: String,
    /// Remaining stake available for verifications. Never negative.
    pub reputation_stake_balance: u64,
    /// Last computed global reputation (0.0 until a refresh reaches this user).
    pub global_reputation_score: f64,
    /// Whether this user was flagged as a trusted seed. Informational only:
    /// propagation always takes its seed set from the caller.
    pub is_seed: bool,
    /// When this user was first provisioned.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user with the given starting balance.
    pub fn new(id: UserId, display_name: impl Into<String>, balance: u64) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            reputation_stake_balance: balance,
            global_reputation_score: 0.0,
            is_seed: false,
            created_at: Utc::now(),
        }
    }
}
