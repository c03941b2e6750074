// crates/skillgraph-store/src/state.rs
//
// GraphState: the in-memory arena shared by every store backend.
//
// Users are indexed by id; edges live in an append-only vector indexed by
// their uniqueness triple and by source (the outgoing adjacency list).
// Mutations are split into a fallible `check_*` step and an infallible
// `apply_*` step so a backend can persist between the two and still commit
// all-or-nothing.

use std::collections::{BTreeMap, HashMap};

use skillgraph_core::error::SkillGraphError;
use skillgraph_core::transaction::{Adjacent, GraphSnapshot, StakeReceipt, StakeTransaction};
use skillgraph_core::{TrustEdge, User, UserId};

type Triple = (UserId, UserId, String);

fn triple_of(edge: &TrustEdge) -> Triple {
    (
        edge.source_id.clone(),
        edge.target_id.clone(),
        edge.skill_tag.clone(),
    )
}

/// The committed contents of a trust graph.
#[derive(Debug, Default)]
pub struct GraphState {
    users: BTreeMap<UserId, User>,
    edges: Vec<TrustEdge>,
    triples: HashMap<Triple, usize>,
    outgoing: HashMap<UserId, Vec<usize>>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from previously persisted records.
    ///
    /// Edges must be supplied in creation order. A repeated triple keeps the
    /// first edge and drops the rest.
    pub fn from_records(users: Vec<User>, edges: Vec<TrustEdge>) -> Self {
        let mut state = Self::new();
        for user in users {
            state.users.insert(user.id.clone(), user);
        }
        for edge in edges {
            if state.triples.contains_key(&triple_of(&edge)) {
                tracing::warn!("Dropping duplicate persisted edge {}", edge.id);
                continue;
            }
            state.apply_edge(edge);
        }
        state
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn get_user(&self, id: &UserId) -> Result<User, SkillGraphError> {
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| SkillGraphError::UnknownUser(id.clone()))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn edges(&self) -> &[TrustEdge] {
        &self.edges
    }

    pub fn find_edge(&self, source: &UserId, target: &UserId, skill: &str) -> Option<&TrustEdge> {
        let key = (source.clone(), target.clone(), skill.to_string());
        self.triples.get(&key).map(|&idx| &self.edges[idx])
    }

    /// Insert a user if its id is not taken. Returns whether it was inserted.
    pub fn insert_user_if_absent(&mut self, user: User) -> bool {
        if self.users.contains_key(&user.id) {
            return false;
        }
        self.users.insert(user.id.clone(), user);
        true
    }

    /// Validate a standalone edge insert.
    pub fn check_edge(&self, edge: &TrustEdge) -> Result<(), SkillGraphError> {
        edge.validate()?;
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.users.contains_key(endpoint) {
                return Err(SkillGraphError::UnknownUser(endpoint.clone()));
            }
        }
        self.check_unique(edge)
    }

    fn check_unique(&self, edge: &TrustEdge) -> Result<(), SkillGraphError> {
        if self.triples.contains_key(&triple_of(edge)) {
            return Err(SkillGraphError::DuplicateEdge {
                source_id: edge.source_id.clone(),
                target_id: edge.target_id.clone(),
                skill: edge.skill_tag.clone(),
            });
        }
        Ok(())
    }

    /// Append an edge that already passed `check_edge`.
    pub fn apply_edge(&mut self, edge: TrustEdge) {
        let idx = self.edges.len();
        self.triples.insert(triple_of(&edge), idx);
        self.outgoing
            .entry(edge.source_id.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
    }

    /// Resolve a user either from committed state or from the users the
    /// transaction is about to provision.
    fn resolve_in_txn<'a>(&'a self, txn: &'a StakeTransaction, id: &UserId) -> Option<&'a User> {
        self.users
            .get(id)
            .or_else(|| txn.provision.iter().find(|u| &u.id == id))
    }

    /// Validate a stake transaction against committed state and return the
    /// verifier's balance after the debit.
    pub fn check_stake(&self, txn: &StakeTransaction) -> Result<u64, SkillGraphError> {
        let edge = &txn.edge;
        edge.validate()?;
        if edge.source_id != txn.verifier {
            return Err(SkillGraphError::InvalidInput(format!(
                "edge source {} does not match verifier {}",
                edge.source_id, txn.verifier
            )));
        }
        self.check_unique(edge)?;

        let verifier = self
            .resolve_in_txn(txn, &txn.verifier)
            .ok_or_else(|| SkillGraphError::UnknownUser(txn.verifier.clone()))?;
        if self.resolve_in_txn(txn, &edge.target_id).is_none() {
            return Err(SkillGraphError::UnknownUser(edge.target_id.clone()));
        }

        verifier
            .reputation_stake_balance
            .checked_sub(txn.debit)
            .ok_or_else(|| SkillGraphError::InsufficientStake {
                user: verifier.id.clone(),
                balance: verifier.reputation_stake_balance,
                requested: txn.debit,
            })
    }

    /// Users the transaction will write, with the verifier's balance already
    /// debited. Used by persistent backends to build their write batch.
    pub fn staged_users(&self, txn: &StakeTransaction, new_balance: u64) -> Vec<User> {
        let mut staged: Vec<User> = txn
            .provision
            .iter()
            .filter(|u| !self.users.contains_key(&u.id) && u.id != txn.verifier)
            .cloned()
            .collect();
        if let Some(mut verifier) = self.resolve_in_txn(txn, &txn.verifier).cloned() {
            verifier.reputation_stake_balance = new_balance;
            staged.push(verifier);
        }
        staged
    }

    /// Commit a transaction that already passed `check_stake`.
    pub fn apply_stake(&mut self, txn: StakeTransaction, new_balance: u64) -> StakeReceipt {
        for user in self.staged_users(&txn, new_balance) {
            self.users.insert(user.id.clone(), user);
        }
        let edge_id = txn.edge.id;
        self.apply_edge(txn.edge);
        StakeReceipt {
            new_balance,
            edge_id,
        }
    }

    /// Copy out the seeds and the full adjacency list.
    pub fn snapshot(&self, seed_ids: &[UserId]) -> GraphSnapshot {
        let seeds = seed_ids
            .iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect();
        let adjacency = self
            .outgoing
            .iter()
            .map(|(source, indices)| {
                let targets = indices
                    .iter()
                    .map(|&idx| Adjacent {
                        target: self.edges[idx].target_id.clone(),
                        weight: self.edges[idx].weight,
                    })
                    .collect();
                (source.clone(), targets)
            })
            .collect();
        GraphSnapshot {
            seeds,
            adjacency,
            user_count: self.users.len(),
        }
    }

    /// Users whose cached score differs from `scores` (absent means 0.0),
    /// with the new score applied.
    pub fn rescored_users(&self, scores: &[(UserId, f64)]) -> Vec<User> {
        let lookup: HashMap<&UserId, f64> = scores.iter().map(|(id, s)| (id, *s)).collect();
        self.users
            .values()
            .filter_map(|user| {
                let score = lookup.get(&user.id).copied().unwrap_or(0.0);
                if user.global_reputation_score == score {
                    return None;
                }
                let mut updated = user.clone();
                updated.global_reputation_score = score;
                Some(updated)
            })
            .collect()
    }

    /// Replace stored user records wholesale (ids must already exist).
    pub fn replace_users(&mut self, users: Vec<User>) {
        for user in users {
            if let Some(slot) = self.users.get_mut(&user.id) {
                *slot = user;
            }
        }
    }
}
