// crates/skillgraph-cli/src/commands/mod.rs
//
// Command module declarations for the SkillGraph CLI.

pub mod graph;
pub mod reputation;
pub mod stake;
pub mod user;
