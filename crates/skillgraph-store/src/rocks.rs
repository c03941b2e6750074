// crates/skillgraph-store/src/rocks.rs
//
// RocksDB-backed persistent trust graph.
//
// Key format:
//   - `user:{id}`   -> JSON-serialized User
//   - `edge:{uuid}` -> JSON-serialized TrustEdge (v7 UUIDs, so keys sort in
//                      creation order)
//
// The full graph is loaded into a `GraphState` at open. Every mutation is
// validated against that state, written to RocksDB as one `WriteBatch`, and
// only then applied in memory, all under the same write lock. A failed
// batch write therefore leaves both RocksDB and the in-memory view
// untouched.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options, WriteBatch};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::transaction::{GraphSnapshot, StakeReceipt, StakeTransaction};
use skillgraph_core::{TrustEdge, User, UserId};

use crate::state::GraphState;

const USER_PREFIX: &str = "user:";
const EDGE_PREFIX: &str = "edge:";

/// RocksDB wrapper implementing the `GraphStore` trait.
pub struct RocksGraphStore {
    db: DBWithThreadMode<MultiThreaded>,
    state: RwLock<GraphState>,
}

impl std::fmt::Debug for RocksGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksGraphStore")
            .field("path", &self.db.path())
            .finish()
    }
}

impl RocksGraphStore {
    /// Open (or create) a graph database at the given filesystem path and
    /// load every persisted user and edge.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SkillGraphError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            SkillGraphError::Storage(format!(
                "Failed to open RocksDB at {}: {}",
                path.display(),
                e
            ))
        })?;

        let users: Vec<User> = scan_prefix(&db, USER_PREFIX)?;
        let edges: Vec<TrustEdge> = scan_prefix(&db, EDGE_PREFIX)?;
        tracing::info!(
            "Loaded trust graph from {}: {} users, {} edges",
            path.display(),
            users.len(),
            edges.len()
        );

        Ok(Self {
            db,
            state: RwLock::new(GraphState::from_records(users, edges)),
        })
    }

    /// Build the primary key for a user: `user:{id}`.
    fn user_key(id: &UserId) -> Vec<u8> {
        format!("{}{}", USER_PREFIX, id).into_bytes()
    }

    /// Build the primary key for an edge: `edge:{uuid}`.
    fn edge_key(edge: &TrustEdge) -> Vec<u8> {
        format!("{}{}", EDGE_PREFIX, edge.id).into_bytes()
    }

    fn stage_user(batch: &mut WriteBatch, user: &User) -> Result<(), SkillGraphError> {
        batch.put(Self::user_key(&user.id), serde_json::to_vec(user)?);
        Ok(())
    }

    fn stage_edge(batch: &mut WriteBatch, edge: &TrustEdge) -> Result<(), SkillGraphError> {
        batch.put(Self::edge_key(edge), serde_json::to_vec(edge)?);
        Ok(())
    }

    /// Write a batch atomically, mapping errors to SkillGraphError::Storage.
    fn commit(&self, batch: WriteBatch) -> Result<(), SkillGraphError> {
        self.db
            .write(batch)
            .map_err(|e| SkillGraphError::Storage(format!("RocksDB batch write failed: {}", e)))
    }
}

/// Deserialize every value under `prefix`.
fn scan_prefix<T: DeserializeOwned>(
    db: &DBWithThreadMode<MultiThreaded>,
    prefix: &str,
) -> Result<Vec<T>, SkillGraphError> {
    let prefix = prefix.as_bytes();
    let mut records = Vec::new();

    for item in db.prefix_iterator(prefix) {
        let (key, value) = item
            .map_err(|e| SkillGraphError::Storage(format!("RocksDB iteration error: {}", e)))?;

        // No prefix extractor is configured, so stop once keys leave the prefix.
        if !key.starts_with(prefix) {
            break;
        }
        records.push(serde_json::from_slice(&value)?);
    }

    Ok(records)
}

#[async_trait]
impl GraphStore for RocksGraphStore {
    async fn get_user(&self, id: &UserId) -> Result<User, SkillGraphError> {
        self.state.read().await.get_user(id)
    }

    async fn upsert_user(
        &self,
        id: &UserId,
        display_name: &str,
        default_balance: u64,
    ) -> Result<User, SkillGraphError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.user(id) {
            return Ok(existing.clone());
        }
        let user = User::new(id.clone(), display_name, default_balance);
        let mut batch = WriteBatch::default();
        Self::stage_user(&mut batch, &user)?;
        self.commit(batch)?;
        state.insert_user_if_absent(user.clone());
        Ok(user)
    }

    async fn find_edge(
        &self,
        source: &UserId,
        target: &UserId,
        skill: &str,
    ) -> Result<Option<TrustEdge>, SkillGraphError> {
        Ok(self.state.read().await.find_edge(source, target, skill).cloned())
    }

    async fn create_edge(&self, edge: TrustEdge) -> Result<(), SkillGraphError> {
        let mut state = self.state.write().await;
        state.check_edge(&edge)?;
        let mut batch = WriteBatch::default();
        Self::stage_edge(&mut batch, &edge)?;
        self.commit(batch)?;
        state.apply_edge(edge);
        Ok(())
    }

    async fn apply_stake_transaction(
        &self,
        txn: StakeTransaction,
    ) -> Result<StakeReceipt, SkillGraphError> {
        let mut state = self.state.write().await;
        let new_balance = state.check_stake(&txn)?;

        let mut batch = WriteBatch::default();
        for user in state.staged_users(&txn, new_balance) {
            Self::stage_user(&mut batch, &user)?;
        }
        Self::stage_edge(&mut batch, &txn.edge)?;
        self.commit(batch)?;

        Ok(state.apply_stake(txn, new_balance))
    }

    async fn snapshot_seed_and_edges(
        &self,
        seed_ids: &[UserId],
    ) -> Result<GraphSnapshot, SkillGraphError> {
        Ok(self.state.read().await.snapshot(seed_ids))
    }

    async fn list_users(&self) -> Result<Vec<User>, SkillGraphError> {
        Ok(self.state.read().await.users().cloned().collect())
    }

    async fn list_edges(&self) -> Result<Vec<TrustEdge>, SkillGraphError> {
        Ok(self.state.read().await.edges().to_vec())
    }

    async fn cache_scores(&self, scores: &[(UserId, f64)]) -> Result<(), SkillGraphError> {
        let mut state = self.state.write().await;
        let changed = state.rescored_users(scores);
        if changed.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::default();
        for user in &changed {
            Self::stage_user(&mut batch, user)?;
        }
        self.commit(batch)?;
        state.replace_users(changed);
        Ok(())
    }

    async fn set_seed_flag(&self, id: &UserId, is_seed: bool) -> Result<(), SkillGraphError> {
        let mut state = self.state.write().await;
        let mut user = state.get_user(id)?;
        user.is_seed = is_seed;
        let mut batch = WriteBatch::default();
        Self::stage_user(&mut batch, &user)?;
        self.commit(batch)?;
        state.replace_users(vec![user]);
        Ok(())
    }
}
