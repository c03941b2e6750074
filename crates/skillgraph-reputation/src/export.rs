// crates/skillgraph-reputation/src/export.rs
//
// Read-only trust graph export for visualization.
//
// Node kind is derived, not stored: a user with a positive stake balance is
// shown as a "verifier", anyone else as an "agent". A verifier who has
// staked their whole balance therefore shows up as an agent.

use serde::{Deserialize, Serialize};

use skillgraph_core::{TrustEdge, User};

/// Display classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Verifier,
    Agent,
}

impl NodeKind {
    /// Classify by remaining stake balance.
    pub fn classify(user: &User) -> Self {
        if user.reputation_stake_balance > 0 {
            NodeKind::Verifier
        } else {
            NodeKind::Agent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Display name.
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Skill tag.
    pub label: String,
}

/// `{nodes: [{id, label, type}], edges: [{source, target, label}]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustGraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TrustGraphView {
    /// Build the export from store listings. Node and edge order follow the
    /// input order.
    pub fn build(users: &[User], edges: &[TrustEdge]) -> Self {
        let nodes = users
            .iter()
            .map(|u| GraphNode {
                id: u.id.to_string(),
                label: u.display_name.clone(),
                kind: NodeKind::classify(u),
            })
            .collect();
        let edges = edges
            .iter()
            .map(|e| GraphEdge {
                source: e.source_id.to_string(),
                target: e.target_id.to_string(),
                label: e.skill_tag.clone(),
            })
            .collect();
        Self { nodes, edges }
    }
}
