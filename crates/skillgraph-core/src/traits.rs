// crates/skillgraph-core/src/traits.rs

use async_trait::async_trait;

use crate::edge::TrustEdge;
use crate::error::SkillGraphError;
use crate::transaction::{GraphSnapshot, StakeReceipt, StakeTransaction};
use crate::user::{User, UserId};

/// Trait for the trust graph's exclusive owner of users and edges.
///
/// Implemented by skillgraph-store (in-memory and RocksDB backends).
/// The ledger and the propagator only ever go through this interface.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Retrieve a user. Fails with `UnknownUser` if absent.
    async fn get_user(&self, id: &UserId) -> Result<User, SkillGraphError>;

    /// Insert a user with `default_balance` if absent; otherwise return the
    /// existing record unchanged.
    async fn upsert_user(
        &self,
        id: &UserId,
        display_name: &str,
        default_balance: u64,
    ) -> Result<User, SkillGraphError>;

    /// Look up the edge for a `(source, target, skill)` triple.
    async fn find_edge(
        &self,
        source: &UserId,
        target: &UserId,
        skill: &str,
    ) -> Result<Option<TrustEdge>, SkillGraphError>;

    /// Insert an edge without touching balances.
    ///
    /// Fails with `DuplicateEdge` if the triple already exists and with
    /// `UnknownUser` if either endpoint is missing.
    async fn create_edge(&self, edge: TrustEdge) -> Result<(), SkillGraphError>;

    /// Commit a staked verification: provision users, debit the verifier,
    /// insert the edge. All or nothing. Uniqueness and balance are checked
    /// again inside the commit.
    async fn apply_stake_transaction(
        &self,
        txn: StakeTransaction,
    ) -> Result<StakeReceipt, SkillGraphError>;

    /// Take a consistent read view of the seeds and all edges.
    async fn snapshot_seed_and_edges(
        &self,
        seed_ids: &[UserId],
    ) -> Result<GraphSnapshot, SkillGraphError>;

    /// All users, ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, SkillGraphError>;

    /// All edges, in creation order.
    async fn list_edges(&self) -> Result<Vec<TrustEdge>, SkillGraphError>;

    /// Overwrite the cached `global_reputation_score` of every user.
    /// Users absent from `scores` are reset to 0.0.
    async fn cache_scores(&self, scores: &[(UserId, f64)]) -> Result<(), SkillGraphError>;

    /// Set the informational `is_seed` flag on a user.
    async fn set_seed_flag(&self, id: &UserId, is_seed: bool) -> Result<(), SkillGraphError>;
}
