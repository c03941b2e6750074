// crates/skillgraph-store/src/lib.rs
//
// skillgraph-store: Storage layer for the SkillGraph trust engine.
//
// Provides the `GraphState` arena (users indexed by id, edges indexed by
// uniqueness triple and by source) and two `GraphStore` backends over it:
// a volatile in-memory store and a RocksDB-backed persistent store.

pub mod memory;
pub mod rocks;
pub mod state;

// Re-export key types for ergonomic access from downstream crates.
pub use memory::InMemoryGraphStore;
pub use rocks::RocksGraphStore;
pub use state::GraphState;
