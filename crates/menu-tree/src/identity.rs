//! Node identity minting and repair
//!
//! Identifiers bind user expectations (exclusions, references, scripted
//! lookups) to nodes across regeneration passes, so they must stay stable
//! for a node's whole life and unique across the graph. Host-side cloning
//! can duplicate them and host data loss can blank them; [`IdentityStore::repair`]
//! heals both.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::{GeneratedGraph, NodeHandle};

/// Opaque per-node identifier, persisted by the host alongside the node.
///
/// Freshly minted identifiers are 32 lowercase hex characters (128 random
/// bits). A blank identifier marks a node that needs a fresh mint.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier loaded from the host.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The blank identifier (node needs a mint).
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record of one identifier reassignment performed by repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remint {
    /// The node whose identifier was replaced.
    pub node: NodeHandle,
    /// The identifier it carried before (blank or a duplicate).
    pub previous: NodeId,
    /// The freshly minted identifier.
    pub assigned: NodeId,
}

/// Mints unique node identifiers and repairs graphs where host-side
/// operations have duplicated or blanked them.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStore;

impl IdentityStore {
    pub fn new() -> Self {
        Self
    }

    /// Mint a fresh random identifier.
    pub fn mint(&self) -> NodeId {
        NodeId(Uuid::new_v4().simple().to_string())
    }

    /// Walk every node and remint blank or duplicated identifiers.
    ///
    /// The first occupant of a duplicated identifier (smallest handle)
    /// keeps it; later occupants are reminted. Running repair on an
    /// already-unique graph changes nothing, so the operation is
    /// idempotent.
    pub fn repair(&self, graph: &mut GeneratedGraph) -> Vec<Remint> {
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        let mut remints = Vec::new();

        for (handle, node) in graph.iter_mut() {
            if node.id.is_blank() || seen.contains(&node.id) {
                let mut assigned = self.mint();
                while seen.contains(&assigned) {
                    assigned = self.mint();
                }
                remints.push(Remint {
                    node: handle,
                    previous: node.id.clone(),
                    assigned: assigned.clone(),
                });
                node.id = assigned.clone();
                seen.insert(assigned);
            } else {
                seen.insert(node.id.clone());
            }
        }

        remints
    }
}
