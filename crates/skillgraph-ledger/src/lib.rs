// crates/skillgraph-ledger/src/lib.rs
//
// skillgraph-ledger: Staked verification for the SkillGraph trust engine.
//
// A verifier spends part of a non-refundable stake balance to vouch for a
// candidate's skill. The debit and the resulting trust edge commit together
// or not at all, and stakes by one verifier are serialized so the balance
// can never go negative.

pub mod ledger;
pub mod locks;
pub mod provisioning;

pub use ledger::StakeLedger;
pub use locks::VerifierLocks;
pub use provisioning::{ProvisioningPolicy, Resolved};
