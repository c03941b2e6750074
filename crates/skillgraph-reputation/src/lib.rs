// crates/skillgraph-reputation/src/lib.rs
//
// skillgraph-reputation: Seed validation, global reputation propagation,
// and trust graph export for the SkillGraph trust engine.
//
// Reputation only originates from an explicit seed set and decays by a
// fixed damping factor per hop. Users that no seed reaches within the depth
// cap get no reputation at all, however many edges they exchange among
// themselves.

pub mod export;
pub mod propagation;
pub mod sybil;

pub use export::{GraphEdge, GraphNode, NodeKind, TrustGraphView};
pub use propagation::{
    PropagationConfig, ReputationPropagator, ReputationScores, ScoreEntry,
    DEFAULT_DAMPING_FACTOR, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EDGE_VISITS,
};
pub use sybil::SybilGuard;
