// crates/skillgraph-core/src/edge.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SkillGraphError;
use crate::user::UserId;

/// Weight assigned to every edge created by a staked verification.
///
/// Stake-proportional weighting is not implemented; all verifications carry
/// full weight.
pub const VERIFICATION_EDGE_WEIGHT: f64 = 1.0;

/// Identifier of a trust edge (UUID v7, so ids sort by creation time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A directed, weighted, skill-tagged endorsement from `source_id` to `target_id`.
///
/// Edges are immutable once stored, and at most one edge exists per
/// `(source_id, target_id, skill_tag)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEdge {
    pub id: EdgeId,
    /// The vouching user.
    pub source_id: UserId,
    /// The vouched-for user.
    pub target_id: UserId,
    /// The skill being vouched for (e.g. "rust", "system-design").
    pub skill_tag: String,
    /// Edge weight in (0, 1].
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl TrustEdge {
    /// Create a new edge with a freshly generated id.
    pub fn new(
        source_id: UserId,
        target_id: UserId,
        skill_tag: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id: EdgeId::generate(),
            source_id,
            target_id,
            skill_tag: skill_tag.into(),
            weight,
            created_at: Utc::now(),
        }
    }

    /// The uniqueness key of this edge.
    pub fn triple(&self) -> (&UserId, &UserId, &str) {
        (&self.source_id, &self.target_id, &self.skill_tag)
    }

    /// Check the per-edge invariants: weight in (0, 1] and a non-blank skill.
    pub fn validate(&self) -> Result<(), SkillGraphError> {
        if !(self.weight > 0.0 && self.weight <= 1.0) {
            return Err(SkillGraphError::InvalidWeight(self.weight));
        }
        if self.skill_tag.trim().is_empty() {
            return Err(SkillGraphError::InvalidInput(
                "skill tag must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
