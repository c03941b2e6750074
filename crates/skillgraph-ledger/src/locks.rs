// crates/skillgraph-ledger/src/locks.rs
//
// Per-verifier lock table.
//
// Staking is check-then-act (duplicate check, balance check, debit). Holding
// the verifier's lock across all three makes stakes by the same verifier
// linearizable, in lock-acquisition order (tokio mutexes are FIFO). Stakes
// by different verifiers take different locks and run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use skillgraph_core::UserId;

/// Table size above which idle entries are pruned on the next acquire.
const PRUNE_THRESHOLD: usize = 1024;

/// Lazily populated map of verifier id -> async mutex.
#[derive(Debug, Default)]
pub struct VerifierLocks {
    table: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl VerifierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `verifier`'s account.
    pub async fn acquire(&self, verifier: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());
            if table.len() > PRUNE_THRESHOLD {
                // Only the table holds an idle entry.
                table.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            table.entry(verifier.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of verifiers currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_verifier_serializes() {
        let locks = Arc::new(VerifierLocks::new());
        let id = UserId::from("v");
        let guard = locks.acquire(&id).await;

        let locks2 = locks.clone();
        let id2 = id.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.acquire(&id2).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn different_verifiers_do_not_block() {
        let locks = VerifierLocks::new();
        let _a = locks.acquire(&UserId::from("a")).await;
        let _b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&UserId::from("b")),
        )
        .await
        .expect("lock for a different verifier should be free");
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn idle_entries_pruned_past_threshold() {
        let locks = VerifierLocks::new();
        for i in 0..=PRUNE_THRESHOLD {
            let _g = locks.acquire(&UserId::from(format!("v{}", i))).await;
        }
        assert_eq!(locks.len(), PRUNE_THRESHOLD + 1);
        let _g = locks.acquire(&UserId::from("fresh")).await;
        assert_eq!(locks.len(), 1);
    }
}
