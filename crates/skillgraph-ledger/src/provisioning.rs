// crates/skillgraph-ledger/src/provisioning.rs
//
// What the ledger does when a stake references a user it has never seen.
//
// Demo and bootstrap deployments auto-provision unknown users with a
// starting balance; production deployments disable this and fail with
// `UnknownUser` instead. The policy is a plain value so it can be switched
// without touching the staking transaction itself.

use serde::{Deserialize, Serialize};

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::{User, UserId, DEFAULT_STAKE_BALANCE};

/// Provisioning policy for unknown users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProvisioningPolicy {
    /// Unknown users are an error.
    Disabled,
    /// Unknown users are created with `default_balance`.
    AutoProvision { default_balance: u64 },
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        ProvisioningPolicy::AutoProvision {
            default_balance: DEFAULT_STAKE_BALANCE,
        }
    }
}

/// How a user reference was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Already in the store.
    Existing(User),
    /// Not in the store; must be inserted by the same transaction that uses it.
    Provisioned(User),
}

impl Resolved {
    pub fn user(&self) -> &User {
        match self {
            Resolved::Existing(u) | Resolved::Provisioned(u) => u,
        }
    }

    /// The user to provision, if any.
    pub fn into_provisioned(self) -> Option<User> {
        match self {
            Resolved::Existing(_) => None,
            Resolved::Provisioned(u) => Some(u),
        }
    }
}

impl ProvisioningPolicy {
    /// Build a policy from a flag and a starting balance.
    pub fn from_flag(auto_provision: bool, default_balance: u64) -> Self {
        if auto_provision {
            ProvisioningPolicy::AutoProvision { default_balance }
        } else {
            ProvisioningPolicy::Disabled
        }
    }

    /// Resolve `id` against the store without writing anything.
    ///
    /// A provisioned user is only returned, never stored: the caller commits
    /// it as part of its own transaction.
    ///
    /// # Errors
    /// Returns `UnknownUser` if the user is missing and provisioning is
    /// disabled; propagates storage errors.
    pub async fn resolve(
        &self,
        store: &dyn GraphStore,
        id: &UserId,
    ) -> Result<Resolved, SkillGraphError> {
        match store.get_user(id).await {
            Ok(user) => Ok(Resolved::Existing(user)),
            Err(SkillGraphError::UnknownUser(_)) => match self {
                ProvisioningPolicy::Disabled => Err(SkillGraphError::UnknownUser(id.clone())),
                ProvisioningPolicy::AutoProvision { default_balance } => {
                    tracing::debug!("Auto-provisioning {} with balance {}", id, default_balance);
                    Ok(Resolved::Provisioned(User::new(
                        id.clone(),
                        id.as_str(),
                        *default_balance,
                    )))
                }
            },
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgraph_store::InMemoryGraphStore;

    #[tokio::test]
    async fn existing_user_resolves_as_is() {
        let store = InMemoryGraphStore::new();
        let id = UserId::from("alice");
        store.upsert_user(&id, "Alice", 42).await.unwrap();

        for policy in [ProvisioningPolicy::Disabled, ProvisioningPolicy::default()] {
            let resolved = policy.resolve(&store, &id).await.unwrap();
            assert!(matches!(resolved, Resolved::Existing(ref u) if u.reputation_stake_balance == 42));
        }
    }

    #[tokio::test]
    async fn disabled_policy_rejects_unknown() {
        let store = InMemoryGraphStore::new();
        let err = ProvisioningPolicy::Disabled
            .resolve(&store, &UserId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkillGraphError::UnknownUser(_)));
    }

    #[tokio::test]
    async fn auto_provision_does_not_write() {
        let store = InMemoryGraphStore::new();
        let id = UserId::from("newcomer");
        let resolved = ProvisioningPolicy::AutoProvision { default_balance: 7 }
            .resolve(&store, &id)
            .await
            .unwrap();

        assert_eq!(resolved.user().reputation_stake_balance, 7);
        assert!(resolved.into_provisioned().is_some());
        assert!(store.get_user(&id).await.is_err());
    }

    #[test]
    fn from_flag_and_serde_shape() {
        assert_eq!(
            ProvisioningPolicy::from_flag(false, 100),
            ProvisioningPolicy::Disabled
        );
        let json = serde_json::to_value(ProvisioningPolicy::from_flag(true, 100)).unwrap();
        assert_eq!(json["mode"], "auto_provision");
        assert_eq!(json["default_balance"], 100);
    }
}
