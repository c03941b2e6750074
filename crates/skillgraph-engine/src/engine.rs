// crates/skillgraph-engine/src/engine.rs
//
// TrustEngine: the single entry point over a GraphStore.
//
// The engine holds no graph data of its own. Every operation goes through
// the store, so several engines (or an engine and a direct store caller)
// over one store always agree.

use std::sync::Arc;

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::traits::GraphStore;
use skillgraph_core::transaction::StakeReceipt;
use skillgraph_core::{SkillVector, User, UserId};
use skillgraph_ledger::StakeLedger;
use skillgraph_reputation::{ReputationPropagator, ReputationScores, TrustGraphView};

use crate::config::EngineConfig;

/// Facade over the staking ledger, reputation propagator, and graph export.
pub struct TrustEngine {
    store: Arc<dyn GraphStore>,
    config: EngineConfig,
    ledger: StakeLedger,
    propagator: ReputationPropagator,
}

impl std::fmt::Debug for TrustEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustEngine")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .finish()
    }
}

impl TrustEngine {
    /// Build an engine over `store`.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(store: Arc<dyn GraphStore>, config: EngineConfig) -> Result<Self, SkillGraphError> {
        config.validate()?;
        let propagator = ReputationPropagator::new(config.propagation_config())?;
        let ledger = StakeLedger::new(store.clone(), config.provisioning_policy());
        Ok(Self {
            store,
            config,
            ledger,
            propagator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// Global reputation from `seed_ids`. Read-only: the score cache is not
    /// touched.
    pub async fn compute_global_reputation(
        &self,
        seed_ids: &[UserId],
    ) -> Result<ReputationScores, SkillGraphError> {
        self.propagator.compute(self.store.as_ref(), seed_ids).await
    }

    /// See [`StakeLedger::stake_verification`].
    pub async fn stake_verification(
        &self,
        verifier_id: &UserId,
        candidate_id: &UserId,
        skill: &str,
        stake_amount: u64,
    ) -> Result<StakeReceipt, SkillGraphError> {
        self.ledger
            .stake_verification(verifier_id, candidate_id, skill, stake_amount)
            .await
    }

    /// Export every user and edge for visualization.
    pub async fn get_trust_graph(&self) -> Result<TrustGraphView, SkillGraphError> {
        let users = self.store.list_users().await?;
        let edges = self.store.list_edges().await?;
        Ok(TrustGraphView::build(&users, &edges))
    }

    /// Recompute reputation from `seed_ids` and write it to every user's
    /// cached `global_reputation_score`. Valid seeds get `is_seed` set.
    ///
    /// Users not reached are reset to 0.0, so the cache always reflects a
    /// single computation.
    pub async fn refresh_reputation_cache(
        &self,
        seed_ids: &[UserId],
    ) -> Result<ReputationScores, SkillGraphError> {
        let scores = self.compute_global_reputation(seed_ids).await?;
        self.store.cache_scores(&scores.to_pairs()).await?;

        for user in self.store.list_users().await? {
            let is_seed = seed_ids.contains(&user.id);
            if user.is_seed != is_seed {
                self.store.set_seed_flag(&user.id, is_seed).await?;
            }
        }

        tracing::info!("Refreshed reputation cache: {} scored user(s)", scores.len());
        Ok(scores)
    }

    /// Register a user with the configured default balance. Returns the
    /// existing record unchanged if the id is already taken.
    pub async fn register_user(
        &self,
        id: &UserId,
        display_name: &str,
    ) -> Result<User, SkillGraphError> {
        if id.as_str().trim().is_empty() {
            return Err(SkillGraphError::InvalidInput(
                "user id must not be empty".to_string(),
            ));
        }
        let user = self
            .store
            .upsert_user(id, display_name, self.config.default_stake_balance)
            .await?;
        tracing::debug!("Registered {} ({})", user.id, user.display_name);
        Ok(user)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User, SkillGraphError> {
        self.store.get_user(id).await
    }

    /// Skill vector of `id` built from the verifications it has received:
    /// each skill maps to the summed weight of incoming edges tagged with it.
    pub async fn verified_skills(&self, id: &UserId) -> Result<SkillVector, SkillGraphError> {
        self.store.get_user(id).await?;
        let mut skills = SkillVector::new();
        for edge in self.store.list_edges().await? {
            if &edge.target_id == id {
                let current = skills.get(&edge.skill_tag);
                skills.set(edge.skill_tag, current + edge.weight);
            }
        }
        Ok(skills)
    }

    /// Euclidean distance between two skill vectors.
    pub fn skill_distance(a: &SkillVector, b: &SkillVector) -> f64 {
        a.euclidean_distance(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillgraph_store::InMemoryGraphStore;

    fn engine(config: EngineConfig) -> TrustEngine {
        TrustEngine::new(Arc::new(InMemoryGraphStore::new()), config).unwrap()
    }

    #[tokio::test]
    async fn staking_changes_future_reputation() {
        let engine = engine(EngineConfig::default());
        let a = UserId::from("a");
        let b = UserId::from("b");
        engine.register_user(&a, "A").await.unwrap();
        engine.register_user(&b, "B").await.unwrap();

        let before = engine.compute_global_reputation(&[a.clone()]).await.unwrap();
        assert_eq!(before.score(&b), 0.0);

        engine.stake_verification(&a, &b, "rust", 10).await.unwrap();
        let after = engine.compute_global_reputation(&[a.clone()]).await.unwrap();
        assert!((after.score(&b) - 0.85).abs() < 1e-12);
    }

    #[tokio::test]
    async fn compute_does_not_touch_cache() {
        let engine = engine(EngineConfig::default());
        let a = UserId::from("a");
        engine.register_user(&a, "A").await.unwrap();

        engine.compute_global_reputation(&[a.clone()]).await.unwrap();
        let user = engine.get_user(&a).await.unwrap();
        assert_eq!(user.global_reputation_score, 0.0);
        assert!(!user.is_seed);
    }

    #[tokio::test]
    async fn refresh_writes_scores_and_seed_flags() {
        let engine = engine(EngineConfig::default());
        let a = UserId::from("a");
        let b = UserId::from("b");
        let c = UserId::from("c");
        engine.stake_verification(&a, &b, "rust", 5).await.unwrap();
        engine.register_user(&c, "C").await.unwrap();

        engine.refresh_reputation_cache(&[a.clone()]).await.unwrap();
        let ua = engine.get_user(&a).await.unwrap();
        let ub = engine.get_user(&b).await.unwrap();
        let uc = engine.get_user(&c).await.unwrap();
        assert!(ua.is_seed);
        assert_eq!(ua.global_reputation_score, 1.0);
        assert!((ub.global_reputation_score - 0.85).abs() < 1e-12);
        assert!(!ub.is_seed);
        assert_eq!(uc.global_reputation_score, 0.0);

        // Switching seeds clears the old seed's flag and score.
        engine.refresh_reputation_cache(&[c.clone()]).await.unwrap();
        let ua = engine.get_user(&a).await.unwrap();
        assert!(!ua.is_seed);
        assert_eq!(ua.global_reputation_score, 0.0);
        assert!(engine.get_user(&c).await.unwrap().is_seed);
    }

    #[tokio::test]
    async fn register_uses_configured_balance() {
        let engine = engine(EngineConfig {
            default_stake_balance: 250,
            ..EngineConfig::default()
        });
        let user = engine.register_user(&UserId::from("u"), "U").await.unwrap();
        assert_eq!(user.reputation_stake_balance, 250);
        assert!(engine.register_user(&UserId::from(" "), "blank").await.is_err());
    }

    #[tokio::test]
    async fn disabled_provisioning_requires_registration() {
        let engine = engine(EngineConfig {
            auto_provision: false,
            ..EngineConfig::default()
        });
        let v = UserId::from("v");
        let c = UserId::from("c");
        assert!(matches!(
            engine.stake_verification(&v, &c, "rust", 1).await,
            Err(SkillGraphError::UnknownUser(_))
        ));

        engine.register_user(&v, "V").await.unwrap();
        engine.register_user(&c, "C").await.unwrap();
        assert!(engine.stake_verification(&v, &c, "rust", 1).await.is_ok());
    }

    #[tokio::test]
    async fn trust_graph_reflects_stakes() {
        let engine = engine(EngineConfig {
            default_stake_balance: 10,
            ..EngineConfig::default()
        });
        let v = UserId::from("v");
        let c = UserId::from("c");
        engine.stake_verification(&v, &c, "rust", 10).await.unwrap();

        let view = engine.get_trust_graph().await.unwrap();
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.edges.len(), 1);
        // v spent everything, so it now shows as an agent.
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["nodes"][1]["id"], "v");
        assert_eq!(json["nodes"][1]["type"], "agent");
        assert_eq!(json["nodes"][0]["type"], "verifier");
        assert_eq!(json["edges"][0]["label"], "rust");
    }

    #[tokio::test]
    async fn verified_skills_sum_incoming_weights() {
        let engine = engine(EngineConfig::default());
        let c = UserId::from("c");
        for v in ["v1", "v2"] {
            engine
                .stake_verification(&UserId::from(v), &c, "rust", 1)
                .await
                .unwrap();
        }
        engine
            .stake_verification(&UserId::from("v1"), &c, "sql", 1)
            .await
            .unwrap();

        let skills = engine.verified_skills(&c).await.unwrap();
        assert_eq!(skills.get("rust"), 2.0);
        assert_eq!(skills.get("sql"), 1.0);
        assert!(engine.verified_skills(&UserId::from("nobody")).await.is_err());

        let target: SkillVector = [("rust", 2.0), ("sql", 1.0)].into_iter().collect();
        assert_eq!(TrustEngine::skill_distance(&skills, &target), 0.0);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let result = TrustEngine::new(
            Arc::new(InMemoryGraphStore::new()),
            EngineConfig {
                damping_factor: 0.0,
                ..EngineConfig::default()
            },
        );
        assert!(matches!(result, Err(SkillGraphError::InvalidConfig(_))));
    }
}
