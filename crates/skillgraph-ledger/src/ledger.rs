// crates/skillgraph-ledger/src/ledger.rs
//
// Staked verification: a verifier debits part of their own stake balance to
// vouch for a candidate's skill, creating a directed trust edge.
//
// A verification is a one-way commitment. There is no refund, slashing, or
// edge update path.

use std::sync::Arc;

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::transaction::{StakeReceipt, StakeTransaction};
use skillgraph_core::{TrustEdge, UserId, VERIFICATION_EDGE_WEIGHT};

use crate::locks::VerifierLocks;
use crate::provisioning::ProvisioningPolicy;

/// Validates and executes staked verifications against a `GraphStore`.
pub struct StakeLedger {
    store: Arc<dyn GraphStore>,
    policy: ProvisioningPolicy,
    locks: VerifierLocks,
}

impl std::fmt::Debug for StakeLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StakeLedger")
            .field("policy", &self.policy)
            .field("tracked_verifiers", &self.locks.len())
            .finish()
    }
}

impl StakeLedger {
    pub fn new(store: Arc<dyn GraphStore>, policy: ProvisioningPolicy) -> Self {
        Self {
            store,
            policy,
            locks: VerifierLocks::new(),
        }
    }

    pub fn policy(&self) -> ProvisioningPolicy {
        self.policy
    }

    /// Stake `stake_amount` from `verifier_id` to vouch for `candidate_id`
    /// on `skill`.
    ///
    /// Steps, all under the verifier's lock:
    /// 1. Reject if the `(verifier, candidate, skill)` edge already exists.
    /// 2. Resolve verifier and candidate through the provisioning policy.
    /// 3. Reject if the stake exceeds the verifier's balance.
    /// 4. Commit debit + edge (+ any provisioned users) as one transaction.
    ///
    /// # Errors
    /// `DuplicateEdge`, `UnknownUser` (provisioning disabled),
    /// `InsufficientStake` (carries the current balance), `InvalidInput`
    /// (blank skill, self-verification), or a storage error. On any error
    /// nothing has been written.
    pub async fn stake_verification(
        &self,
        verifier_id: &UserId,
        candidate_id: &UserId,
        skill: &str,
        stake_amount: u64,
    ) -> Result<StakeReceipt, SkillGraphError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(SkillGraphError::InvalidInput(
                "skill tag must not be empty".to_string(),
            ));
        }
        if verifier_id == candidate_id {
            return Err(SkillGraphError::InvalidInput(format!(
                "{} cannot verify themselves",
                verifier_id
            )));
        }

        let _guard = self.locks.acquire(verifier_id).await;

        if self
            .store
            .find_edge(verifier_id, candidate_id, skill)
            .await?
            .is_some()
        {
            tracing::warn!(
                "Rejected duplicate verification {} -> {} ({})",
                verifier_id,
                candidate_id,
                skill
            );
            return Err(SkillGraphError::DuplicateEdge {
                source_id: verifier_id.clone(),
                target_id: candidate_id.clone(),
                skill: skill.to_string(),
            });
        }

        let verifier = self.policy.resolve(self.store.as_ref(), verifier_id).await?;
        let candidate = self.policy.resolve(self.store.as_ref(), candidate_id).await?;

        let balance = verifier.user().reputation_stake_balance;
        if stake_amount > balance {
            tracing::warn!(
                "Rejected stake of {} by {}: balance {}",
                stake_amount,
                verifier_id,
                balance
            );
            return Err(SkillGraphError::InsufficientStake {
                user: verifier_id.clone(),
                balance,
                requested: stake_amount,
            });
        }

        let edge = TrustEdge::new(
            verifier_id.clone(),
            candidate_id.clone(),
            skill,
            VERIFICATION_EDGE_WEIGHT,
        );
        let mut txn = StakeTransaction::new(verifier_id.clone(), stake_amount, edge);
        for user in [verifier, candidate]
            .into_iter()
            .filter_map(|r| r.into_provisioned())
        {
            txn = txn.with_provisioned(user);
        }

        let receipt = self.store.apply_stake_transaction(txn).await?;
        tracing::info!(
            "{} staked {} on {} for '{}' (edge {}, balance now {})",
            verifier_id,
            stake_amount,
            candidate_id,
            skill,
            receipt.edge_id,
            receipt.new_balance
        );
        Ok(receipt)
    }
}
