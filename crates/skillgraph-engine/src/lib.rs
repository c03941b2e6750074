// crates/skillgraph-engine/src/lib.rs
//
// skillgraph-engine: The `TrustEngine` facade for the SkillGraph trust
// engine.
//
// Wires a `GraphStore` backend to the staking ledger and the reputation
// propagator, and exposes the operations callers actually use: staked
// verification, global reputation, score cache refresh, and graph export.

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::TrustEngine;

// Backends, re-exported so binaries only need this crate.
pub use skillgraph_store::{InMemoryGraphStore, RocksGraphStore};
