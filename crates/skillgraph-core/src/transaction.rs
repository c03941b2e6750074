// crates/skillgraph-core/src/transaction.rs
//
// The staking commit unit and the consistent read snapshot.
//
// A `StakeTransaction` is the explicit transactional context for the only
// mutation in the trust graph that touches balances: either every part of
// it is committed by the store, or none of it is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::edge::{EdgeId, TrustEdge};
use crate::user::{User, UserId};

/// A staked verification ready to be committed atomically.
#[derive(Debug, Clone)]
pub struct StakeTransaction {
    /// Users to insert as part of the same commit (auto-provisioned
    /// verifier and/or candidate). Ignored if the id already exists.
    pub provision: Vec<User>,
    /// The account being debited.
    pub verifier: UserId,
    /// Amount to debit from the verifier's balance.
    pub debit: u64,
    /// The edge to insert. Its `source_id` must equal `verifier`.
    pub edge: TrustEdge,
}

impl StakeTransaction {
    pub fn new(verifier: UserId, debit: u64, edge: TrustEdge) -> Self {
        Self {
            provision: Vec::new(),
            verifier,
            debit,
            edge,
        }
    }

    /// Add a user to be created inside this transaction.
    pub fn with_provisioned(mut self, user: User) -> Self {
        self.provision.push(user);
        self
    }
}

/// Outcome of a committed staked verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeReceipt {
    /// Verifier balance after the debit.
    pub new_balance: u64,
    /// Id of the newly created trust edge.
    pub edge_id: EdgeId,
}

/// One outgoing edge in the snapshot adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacent {
    pub target: UserId,
    pub weight: f64,
}

/// Read view of the graph taken at a single point in time.
///
/// Produced by `GraphStore::snapshot_seed_and_edges`. No stake committed
/// after the snapshot was taken is visible in it, and no half-committed
/// stake is ever visible.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    /// The requested seed users that exist, in request order.
    pub seeds: Vec<User>,
    /// Outgoing edges per source user, in edge creation order.
    pub adjacency: HashMap<UserId, Vec<Adjacent>>,
    /// Number of users in the graph when the snapshot was taken.
    pub user_count: usize,
}

impl GraphSnapshot {
    /// Outgoing edges of `user`, empty if it has none.
    pub fn outgoing(&self, user: &UserId) -> &[Adjacent] {
        self.adjacency.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of edges in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether `id` was among the seeds found by the store.
    pub fn has_seed(&self, id: &UserId) -> bool {
        self.seeds.iter().any(|u| &u.id == id)
    }
}
