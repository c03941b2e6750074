// crates/skillgraph-store/src/memory.rs
//
// Volatile GraphStore backend. Used by tests and by callers that rebuild
// the graph from another source at startup.

use async_trait::async_trait;
use tokio::sync::RwLock;

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::transaction::{GraphSnapshot, StakeReceipt, StakeTransaction};
use skillgraph_core::{TrustEdge, User, UserId};

use crate::state::GraphState;

/// In-memory `GraphStore`. Every mutation runs under one write lock, every
/// read under one read lock.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    state: RwLock<GraphState>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
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
        state.insert_user_if_absent(User::new(id.clone(), display_name, default_balance));
        state.get_user(id)
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
        state.apply_edge(edge);
        Ok(())
    }

    async fn apply_stake_transaction(
        &self,
        txn: StakeTransaction,
    ) -> Result<StakeReceipt, SkillGraphError> {
        let mut state = self.state.write().await;
        let new_balance = state.check_stake(&txn)?;
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
        state.replace_users(changed);
        Ok(())
    }

    async fn set_seed_flag(&self, id: &UserId, is_seed: bool) -> Result<(), SkillGraphError> {
        let mut state = self.state.write().await;
        let mut user = state.get_user(id)?;
        user.is_seed = is_seed;
        state.replace_users(vec![user]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn get_unknown_user_fails() {
        let store = InMemoryGraphStore::new();
        let err = store.get_user(&UserId::from("nobody")).await.unwrap_err();
        assert!(matches!(err, SkillGraphError::UnknownUser(_)));
    }

    #[tokio::test]
    async fn upsert_keeps_existing_balance() {
        let store = InMemoryGraphStore::new();
        let id = UserId::from("alice");
        store.upsert_user(&id, "Alice", 100).await.unwrap();
        let again = store.upsert_user(&id, "Someone Else", 5).await.unwrap();
        assert_eq!(again.reputation_stake_balance, 100);
        assert_eq!(again.display_name, "Alice");
    }

    #[tokio::test]
    async fn create_edge_rejects_duplicate() {
        let store = InMemoryGraphStore::new();
        let (a, b) = (UserId::from("a"), UserId::from("b"));
        store.upsert_user(&a, "A", 100).await.unwrap();
        store.upsert_user(&b, "B", 100).await.unwrap();

        store
            .create_edge(TrustEdge::new(a.clone(), b.clone(), "rust", 1.0))
            .await
            .unwrap();
        let err = store
            .create_edge(TrustEdge::new(a.clone(), b.clone(), "rust", 0.5))
            .await
            .unwrap_err();
        assert!(matches!(err, SkillGraphError::DuplicateEdge { .. }));
        assert!(store.find_edge(&a, &b, "rust").await.unwrap().is_some());
        assert!(store.find_edge(&b, &a, "rust").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_stake_leaves_no_trace() {
        let store = InMemoryGraphStore::new();
        let (a, b) = (UserId::from("a"), UserId::from("b"));
        store.upsert_user(&a, "A", 10).await.unwrap();

        // Provisioned candidate, but the debit overdraws: nothing commits.
        let txn = StakeTransaction::new(
            a.clone(),
            11,
            TrustEdge::new(a.clone(), b.clone(), "rust", 1.0),
        )
        .with_provisioned(User::new(b.clone(), "B", 100));
        assert!(store.apply_stake_transaction(txn).await.is_err());

        assert_eq!(store.get_user(&a).await.unwrap().reputation_stake_balance, 10);
        assert!(store.get_user(&b).await.is_err());
        assert!(store.list_edges().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_direct_stakes_never_overdraw() {
        let store = Arc::new(InMemoryGraphStore::new());
        let verifier = UserId::from("v");
        store.upsert_user(&verifier, "V", 100).await.unwrap();
        for i in 0..10 {
            store
                .upsert_user(&UserId::from(format!("c{}", i)), "C", 100)
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            let verifier = verifier.clone();
            handles.push(tokio::spawn(async move {
                let edge = TrustEdge::new(
                    verifier.clone(),
                    UserId::from(format!("c{}", i)),
                    "rust",
                    1.0,
                );
                store
                    .apply_stake_transaction(StakeTransaction::new(verifier, 30, edge))
                    .await
            }));
        }

        let mut ok = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 3);
        assert_eq!(
            store.get_user(&verifier).await.unwrap().reputation_stake_balance,
            10
        );
    }

    #[tokio::test]
    async fn cache_scores_and_seed_flag() {
        let store = InMemoryGraphStore::new();
        let a = UserId::from("a");
        store.upsert_user(&a, "A", 100).await.unwrap();
        store.cache_scores(&[(a.clone(), 1.0)]).await.unwrap();
        store.set_seed_flag(&a, true).await.unwrap();

        let user = store.get_user(&a).await.unwrap();
        assert_eq!(user.global_reputation_score, 1.0);
        assert!(user.is_seed);
    }
}
