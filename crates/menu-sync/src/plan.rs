//! Mutation plans
//!
//! A plan is the complete, ordered set of host operations one regeneration
//! pass intends to perform. Plans are computed against an immutable
//! snapshot and applied afterwards, so they can be inspected, logged, or
//! dry-run before anything changes.

use serde::{Deserialize, Serialize};

use menu_tree::{MenuPath, NodeContent, NodeHandle};

/// Reference to a node a mutation touches: either one that already exists
/// in the loaded graph, or one that an earlier `Create` in the same plan
/// will have produced by the time this mutation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRef {
    Existing(NodeHandle),
    Planned(MenuPath),
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existing(handle) => write!(f, "{handle}"),
            Self::Planned(path) => write!(f, "planned {path}"),
        }
    }
}

/// One step of a regeneration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Move a surviving node under a new parent: a rescue out of a dying
    /// subtree, or the healing of a host-side misplacement.
    Reparent {
        node: NodeHandle,
        new_parent: NodeRef,
    },
    /// Destroy a node and its whole subtree.
    Delete { node: NodeHandle },
    /// Materialize a new engine-owned node. The identifier is minted at
    /// apply time so dry runs stay side-effect free.
    Create {
        parent: NodeRef,
        path: MenuPath,
        content: NodeContent,
    },
    /// Rewrite a matched node's content and provenance.
    Update {
        node: NodeHandle,
        content: NodeContent,
    },
    /// Replace a parent's child order.
    Reorder {
        parent: NodeRef,
        order: Vec<NodeRef>,
    },
}

impl Mutation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reparent { .. } => "reparent",
            Self::Delete { .. } => "delete",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Reorder { .. } => "reorder",
        }
    }
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reparent { node, new_parent } => write!(f, "Reparent {node} under {new_parent}"),
            Self::Delete { node } => write!(f, "Delete {node}"),
            Self::Create { parent, path, .. } => write!(f, "Create {path} under {parent}"),
            Self::Update { node, content } => write!(f, "Update {node} ({})", content.source_path),
            Self::Reorder { parent, .. } => write!(f, "Reorder children of {parent}"),
        }
    }
}

/// An ordered list of mutations, safe to apply front to back.
///
/// Ordering guarantees: rescues precede the deletions that would otherwise
/// destroy them, deletions precede creations (a recreated path never
/// transiently collides with the node it replaces), creations are
/// parent-first, and reorders run last against each parent's final
/// membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationPlan {
    pub mutations: Vec<Mutation>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }

    /// Count of mutations of the given kind.
    pub fn count_of(&self, kind: &str) -> usize {
        self.mutations.iter().filter(|m| m.kind() == kind).count()
    }

    /// One-line summary, e.g. `"3 created, 1 deleted, 2 reordered"`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "no changes".to_string();
        }
        let mut parts = Vec::new();
        for (kind, label) in [
            ("create", "created"),
            ("delete", "deleted"),
            ("update", "updated"),
            ("reparent", "reparented"),
            ("reorder", "reordered"),
        ] {
            let count = self.count_of(kind);
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }
        parts.join(", ")
    }
}
