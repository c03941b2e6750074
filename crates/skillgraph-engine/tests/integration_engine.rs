// crates/skillgraph-engine/tests/integration_engine.rs
//
// Integration tests for the TrustEngine over the persistent RocksDB store.
//
// Covers the full loop: staking builds the graph, propagation reads it,
// the score cache is written back, and everything survives a reopen.

use std::sync::Arc;

use uuid::Uuid;

use skillgraph_core::{SkillGraphError, UserId};
use skillgraph_engine::{EngineConfig, RocksGraphStore, TrustEngine};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory path using UUID to avoid conflicts.
fn temp_db_path(label: &str) -> String {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("skillgraph_it_{}_{}", label, Uuid::now_v7()));
    path.to_string_lossy().to_string()
}

fn open_engine(path: &str, config: EngineConfig) -> TrustEngine {
    let store = RocksGraphStore::open(path).expect("open rocksdb");
    TrustEngine::new(Arc::new(store), config).expect("valid config")
}

fn ids(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|n| UserId::from(*n)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_chain_scores_survive_restart() {
    let db_path = temp_db_path("chain");
    let [a, b, c]: [UserId; 3] = ids(&["a", "b", "c"]).try_into().unwrap();

    {
        let engine = open_engine(&db_path, EngineConfig::default());
        engine.stake_verification(&a, &b, "rust", 10).await.unwrap();
        engine.stake_verification(&b, &c, "rust", 10).await.unwrap();
        engine.refresh_reputation_cache(&[a.clone()]).await.unwrap();
    }

    let engine = open_engine(&db_path, EngineConfig::default());
    let scores = engine.compute_global_reputation(&[a.clone()]).await.unwrap();
    assert!((scores.score(&b) - 0.85).abs() < 1e-12);
    assert!((scores.score(&c) - 0.7225).abs() < 1e-12);

    let cached_c = engine.get_user(&c).await.unwrap();
    assert!((cached_c.global_reputation_score - 0.7225).abs() < 1e-12);
    assert!(engine.get_user(&a).await.unwrap().is_seed);
    assert_eq!(engine.get_user(&a).await.unwrap().reputation_stake_balance, 90);

    std::fs::remove_dir_all(&db_path).ok();
}

#[tokio::test]
async fn test_duplicate_rejected_after_restart() {
    let db_path = temp_db_path("dup");
    let (v, c) = (UserId::from("v"), UserId::from("c"));

    {
        let engine = open_engine(&db_path, EngineConfig::default());
        engine.stake_verification(&v, &c, "design", 15).await.unwrap();
    }

    let engine = open_engine(&db_path, EngineConfig::default());
    let err = engine
        .stake_verification(&v, &c, "design", 15)
        .await
        .unwrap_err();
    assert!(matches!(err, SkillGraphError::DuplicateEdge { .. }));
    assert_eq!(engine.get_user(&v).await.unwrap().reputation_stake_balance, 85);

    // Same pair, different skill, is a new edge.
    engine.stake_verification(&v, &c, "rust", 15).await.unwrap();
    assert_eq!(engine.get_trust_graph().await.unwrap().edges.len(), 2);

    std::fs::remove_dir_all(&db_path).ok();
}

#[tokio::test]
async fn test_sybil_ring_gets_nothing() {
    let db_path = temp_db_path("sybil");
    let engine = open_engine(&db_path, EngineConfig::default());
    let [seed, honest, s1, s2, s3]: [UserId; 5] =
        ids(&["seed", "honest", "s1", "s2", "s3"]).try_into().unwrap();

    engine.stake_verification(&seed, &honest, "rust", 10).await.unwrap();
    // A ring of accounts vouching for each other, never touched by a seed.
    engine.stake_verification(&s1, &s2, "rust", 50).await.unwrap();
    engine.stake_verification(&s2, &s3, "rust", 50).await.unwrap();
    engine.stake_verification(&s3, &s1, "rust", 50).await.unwrap();

    let scores = engine.compute_global_reputation(&[seed.clone()]).await.unwrap();
    assert!(scores.score(&honest) > 0.0);
    for s in [&s1, &s2, &s3] {
        assert!(scores.get(s).is_none(), "{} should be unreached", s);
    }

    std::fs::remove_dir_all(&db_path).ok();
}

#[tokio::test]
async fn test_unknown_seeds_ignored() {
    let db_path = temp_db_path("seeds");
    let engine = open_engine(&db_path, EngineConfig::default());
    let (a, b) = (UserId::from("a"), UserId::from("b"));
    engine.stake_verification(&a, &b, "rust", 1).await.unwrap();

    let scores = engine
        .compute_global_reputation(&[UserId::from("ghost"), a.clone(), a.clone()])
        .await
        .unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores.score(&a), 1.0);

    let none = engine.compute_global_reputation(&[]).await.unwrap();
    assert!(none.is_empty());

    std::fs::remove_dir_all(&db_path).ok();
}

#[tokio::test]
async fn test_edge_budget_enforced() {
    let db_path = temp_db_path("budget");
    let config = EngineConfig {
        max_edge_visits: 2,
        ..EngineConfig::default()
    };
    let engine = open_engine(&db_path, config);
    let hub = UserId::from("hub");
    for i in 0..3 {
        engine
            .stake_verification(&hub, &UserId::from(format!("t{}", i)), "rust", 1)
            .await
            .unwrap();
    }

    let err = engine.compute_global_reputation(&[hub]).await.unwrap_err();
    assert!(matches!(err, SkillGraphError::ComputationTooLarge { budget: 2 }));

    std::fs::remove_dir_all(&db_path).ok();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stakes_persist_consistent_balance() {
    let db_path = temp_db_path("concurrent");
    let engine = Arc::new(open_engine(&db_path, EngineConfig::default()));
    let v = UserId::from("v");
    engine.register_user(&v, "Verifier").await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = engine.clone();
            let v = v.clone();
            tokio::spawn(async move {
                engine
                    .stake_verification(&v, &UserId::from(format!("c{}", i)), "rust", 30)
                    .await
            })
        })
        .collect();

    let mut ok = 0;
    for h in handles {
        if h.await.unwrap().is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 3);
    drop(engine);

    let engine = open_engine(&db_path, EngineConfig::default());
    assert_eq!(engine.get_user(&v).await.unwrap().reputation_stake_balance, 10);
    assert_eq!(engine.get_trust_graph().await.unwrap().edges.len(), 3);

    std::fs::remove_dir_all(&db_path).ok();
}
