// crates/skillgraph-reputation/src/sybil.rs
//
// Seed validation: reputation may only originate from an explicit,
// caller-supplied seed set of users that actually exist.

use std::collections::HashSet;

use skillgraph_core::transaction::GraphSnapshot;
use skillgraph_core::UserId;

/// Filters a requested seed set down to the ids propagation may start from.
///
/// Seeds always come from the caller. The stored `is_seed` flag is never
/// scanned, so flipping that flag cannot widen the set of trust roots.
#[derive(Debug, Clone, Default)]
pub struct SybilGuard;

impl SybilGuard {
    pub fn new() -> Self {
        Self
    }

    /// Return the requested ids that exist in `snapshot`, in first-occurrence
    /// order with duplicates removed.
    ///
    /// Unknown ids are dropped, not rejected. An empty request yields an
    /// empty result, which callers treat as "no reputation anywhere".
    pub fn validate_seeds(&self, requested: &[UserId], snapshot: &GraphSnapshot) -> Vec<UserId> {
        let mut seen = HashSet::new();
        let mut valid = Vec::with_capacity(requested.len());

        for id in requested {
            if !seen.insert(id) {
                continue;
            }
            if snapshot.has_seed(id) {
                valid.push(id.clone());
            } else {
                tracing::debug!("Dropping unknown seed {}", id);
            }
        }

        valid
    }
}
