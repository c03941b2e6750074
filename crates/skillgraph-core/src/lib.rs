// crates/skillgraph-core/src/lib.rs
//
// skillgraph-core: Core types, error taxonomy, and store traits for the
// SkillGraph trust engine.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the user and trust-edge records, the staking transaction unit,
// the consistent read snapshot used by propagation, and the `GraphStore`
// trait that storage backends implement.

pub mod edge;
pub mod error;
pub mod skills;
pub mod traits;
pub mod transaction;
pub mod user;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use skillgraph_core::TrustEdge;`

// Graph records
pub use edge::{EdgeId, TrustEdge, VERIFICATION_EDGE_WEIGHT};
pub use user::{User, UserId, DEFAULT_STAKE_BALANCE};

// Transactions and snapshots
pub use transaction::{Adjacent, GraphSnapshot, StakeReceipt, StakeTransaction};

// Skill vectors
pub use skills::SkillVector;

// Error type
pub use error::SkillGraphError;

// Traits
pub use traits::GraphStore;
