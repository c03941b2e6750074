// crates/skillgraph-reputation/src/propagation.rs
//
// Global reputation: depth-bounded, dampened, weighted walk aggregation from
// a trusted seed set.
//
// Every walk of length k <= max_depth that starts at a seed contributes
//   1.0 * w_1 * d * w_2 * d * ... * w_k * d
// to the user it ends at, where w_i are edge weights and d is the damping
// factor. A user's score is the sum over all such walks (the zero-length
// walk included for seeds). Independent corroboration therefore adds up
// instead of collapsing to the strongest path.
//
// Walks are not enumerated one by one. The mass of all walks of length k
// ending at each user is carried in a per-depth frontier, which is exactly
// the same sum at O(max_depth * edges) cost. This is not a converged
// EigenTrust/PageRank: cycles only ever contribute up to the depth cap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::transaction::GraphSnapshot;
use skillgraph_core::UserId;

use crate::sybil::SybilGuard;

/// Default maximum walk length ("degrees of separation").
pub const DEFAULT_MAX_DEPTH: u32 = 6;

/// Default per-hop damping factor.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;

/// Default cap on edge relaxations per computation.
pub const DEFAULT_MAX_EDGE_VISITS: usize = 1_000_000;

/// Configuration for reputation propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Maximum walk length. Default: 6.
    pub max_depth: u32,
    /// Multiplier applied per traversed edge, in (0, 1]. Default: 0.85.
    pub damping_factor: f64,
    /// Maximum number of edge relaxations before the computation fails with
    /// `ComputationTooLarge`. Default: 1,000,000.
    pub max_edge_visits: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            max_edge_visits: DEFAULT_MAX_EDGE_VISITS,
        }
    }
}

impl PropagationConfig {
    /// Reject a damping factor outside (0, 1].
    pub fn validate(&self) -> Result<(), SkillGraphError> {
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(SkillGraphError::InvalidConfig(format!(
                "damping_factor {} must be in (0, 1]",
                self.damping_factor
            )));
        }
        Ok(())
    }
}

/// A single user's aggregate reputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub user_id: UserId,
    pub score: f64,
}

/// Result of a propagation run: scores by descending value, ties broken by
/// ascending user id.
///
/// Only users reached within the depth cap appear; everyone else has an
/// implicit score of 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReputationScores {
    pub entries: Vec<ScoreEntry>,
    /// Edge relaxations performed.
    pub edges_visited: usize,
    /// Deepest level that produced any mass.
    pub depth_reached: u32,
}

impl ReputationScores {
    /// Score for `id`, or 0.0 if it was never reached.
    pub fn score(&self, id: &UserId) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    pub fn get(&self, id: &UserId) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.user_id == id)
            .map(|e| e.score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    /// Flatten into `(id, score)` pairs, preserving order.
    pub fn to_pairs(&self) -> Vec<(UserId, f64)> {
        self.entries
            .iter()
            .map(|e| (e.user_id.clone(), e.score))
            .collect()
    }
}

/// Computes global reputation over a graph snapshot.
#[derive(Debug, Clone)]
pub struct ReputationPropagator {
    config: PropagationConfig,
    guard: SybilGuard,
}

impl ReputationPropagator {
    /// Create a propagator, validating the config.
    pub fn new(config: PropagationConfig) -> Result<Self, SkillGraphError> {
        config.validate()?;
        Ok(Self {
            config,
            guard: SybilGuard::new(),
        })
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Take a consistent snapshot from `store` and propagate over it.
    pub async fn compute(
        &self,
        store: &dyn GraphStore,
        seed_ids: &[UserId],
    ) -> Result<ReputationScores, SkillGraphError> {
        if seed_ids.is_empty() {
            return Ok(ReputationScores::default());
        }
        let snapshot = store.snapshot_seed_and_edges(seed_ids).await?;
        self.propagate(seed_ids, &snapshot)
    }

    /// Propagate reputation from `seed_ids` over `snapshot`.
    ///
    /// # Errors
    /// Returns `ComputationTooLarge` if more than `max_edge_visits` edges
    /// would be relaxed.
    pub fn propagate(
        &self,
        seed_ids: &[UserId],
        snapshot: &GraphSnapshot,
    ) -> Result<ReputationScores, SkillGraphError> {
        let seeds = self.guard.validate_seeds(seed_ids, snapshot);
        if seeds.is_empty() {
            return Ok(ReputationScores::default());
        }

        let budget = self.config.max_edge_visits;
        let damping = self.config.damping_factor;

        // BTreeMaps keep the floating-point summation order deterministic.
        let mut frontier: BTreeMap<UserId, f64> = seeds.into_iter().map(|id| (id, 1.0)).collect();
        let mut totals = frontier.clone();
        let mut edges_visited = 0usize;
        let mut depth_reached = 0u32;

        for depth in 1..=self.config.max_depth {
            let mut next: BTreeMap<UserId, f64> = BTreeMap::new();

            for (source, mass) in &frontier {
                for adj in snapshot.outgoing(source) {
                    edges_visited += 1;
                    if edges_visited > budget {
                        return Err(SkillGraphError::ComputationTooLarge { budget });
                    }
                    *next.entry(adj.target.clone()).or_insert(0.0) += mass * adj.weight * damping;
                }
            }

            if next.is_empty() {
                break;
            }
            for (user, mass) in &next {
                *totals.entry(user.clone()).or_insert(0.0) += mass;
            }
            frontier = next;
            depth_reached = depth;
        }

        let mut entries: Vec<ScoreEntry> = totals
            .into_iter()
            .map(|(user_id, score)| ScoreEntry { user_id, score })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        tracing::debug!(
            "Propagated reputation to {} users ({} edge visits, depth {})",
            entries.len(),
            edges_visited,
            depth_reached
        );

        Ok(ReputationScores {
            entries,
            edges_visited,
            depth_reached,
        })
    }
}

impl Default for ReputationPropagator {
    fn default() -> Self {
        Self {
            config: PropagationConfig::default(),
            guard: SybilGuard::new(),
        }
    }
}
