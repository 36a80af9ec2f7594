//! In-memory model of the host's generated object tree
//!
//! Nodes are addressed by session-local handles rather than by their
//! persisted identifiers, so graphs with duplicated or blank identifiers
//! (the states repair exists for) stay fully addressable. Handles are
//! ordered and the arena iterates in handle order, which keeps every
//! traversal deterministic.
//!
//! The graph is plain storage: it enforces structural consistency (links,
//! acyclicity) but no classification rules. Those live with the callers.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classification::Classification;
use crate::error::{Error, Result};
use crate::identity::NodeId;
use crate::metadata::NodeMetadata;

/// Session-local handle for one node in a loaded graph. Never persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeHandle(u64);

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the generated tree.
///
/// Parent and child links are managed by the owning [`GeneratedGraph`];
/// the data fields are freely writable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedNode {
    /// Persisted identity (see [`crate::identity`]).
    pub id: NodeId,
    /// Displayed label.
    pub name: String,
    pub classification: Classification,
    pub metadata: NodeMetadata,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl GeneratedNode {
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        classification: Classification,
        metadata: NodeMetadata,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            classification,
            metadata,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Ordered child handles.
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

/// Arena of generated nodes with ordered children and parent links.
///
/// Nodes without a parent are top-level; the generated root container is
/// usually the only one, but an excluded former root can sit beside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedGraph {
    nodes: BTreeMap<NodeHandle, GeneratedNode>,
    next_handle: u64,
}

impl GeneratedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&GeneratedNode> {
        self.nodes.get(&handle)
    }

    pub fn node(&self, handle: NodeHandle) -> Result<&GeneratedNode> {
        self.nodes.get(&handle).ok_or(Error::NodeNotFound { handle })
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Result<&mut GeneratedNode> {
        self.nodes
            .get_mut(&handle)
            .ok_or(Error::NodeNotFound { handle })
    }

    /// All handles in ascending order.
    pub fn handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &GeneratedNode)> {
        self.nodes.iter().map(|(&h, n)| (h, n))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeHandle, &mut GeneratedNode)> {
        self.nodes.iter_mut().map(|(&h, n)| (h, n))
    }

    /// Insert a node under `parent` (or at top level for `None`), appended
    /// at the end of the parent's children. Any links on the passed node
    /// are discarded; the graph owns them.
    pub fn insert(&mut self, parent: Option<NodeHandle>, node: GeneratedNode) -> Result<NodeHandle> {
        if let Some(p) = parent
            && !self.nodes.contains_key(&p)
        {
            return Err(Error::NodeNotFound { handle: p });
        }

        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;

        let mut node = node;
        node.parent = parent;
        node.children = Vec::new();
        self.nodes.insert(handle, node);

        if let Some(p) = parent
            && let Some(parent_node) = self.nodes.get_mut(&p)
        {
            parent_node.children.push(handle);
        }

        Ok(handle)
    }

    /// Remove a node and its whole subtree. Returns the removed handles in
    /// preorder.
    pub fn remove_subtree(&mut self, handle: NodeHandle) -> Result<Vec<NodeHandle>> {
        let removed = self.subtree(handle)?;

        if let Some(parent) = self.nodes.get(&handle).and_then(|n| n.parent)
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|&c| c != handle);
        }

        for h in &removed {
            self.nodes.remove(h);
        }
        Ok(removed)
    }

    /// Move a node under a new parent, appended at the end of the new
    /// parent's children (host append semantics, even when the parent is
    /// unchanged).
    pub fn reparent(&mut self, node: NodeHandle, new_parent: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(Error::NodeNotFound { handle: node });
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(Error::NodeNotFound { handle: new_parent });
        }
        if self.subtree(node)?.contains(&new_parent) {
            return Err(Error::WouldCycle { node, new_parent });
        }

        if let Some(old_parent) = self.nodes.get(&node).and_then(|n| n.parent)
            && let Some(old_parent_node) = self.nodes.get_mut(&old_parent)
        {
            old_parent_node.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(new_parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&new_parent) {
            parent_node.children.push(node);
        }
        Ok(())
    }

    /// Replace a parent's child order. The new order must be a permutation
    /// of the current children.
    pub fn reorder_children(&mut self, parent: NodeHandle, order: Vec<NodeHandle>) -> Result<()> {
        let current = self.children(parent)?;
        let mut want = order.clone();
        want.sort_unstable();
        let mut have = current.to_vec();
        have.sort_unstable();
        if want != have {
            return Err(Error::InvalidReorder {
                parent,
                message: "order must be a permutation of the current children".to_string(),
            });
        }
        if let Some(n) = self.nodes.get_mut(&parent) {
            n.children = order;
        }
        Ok(())
    }

    pub fn children(&self, handle: NodeHandle) -> Result<&[NodeHandle]> {
        self.nodes
            .get(&handle)
            .map(|n| n.children.as_slice())
            .ok_or(Error::NodeNotFound { handle })
    }

    pub fn parent(&self, handle: NodeHandle) -> Result<Option<NodeHandle>> {
        self.nodes
            .get(&handle)
            .map(|n| n.parent)
            .ok_or(Error::NodeNotFound { handle })
    }

    /// Handles of all parentless nodes, in handle order.
    pub fn top_level(&self) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(&h, _)| h)
            .collect()
    }

    /// The node and all its descendants, preorder.
    pub fn subtree(&self, handle: NodeHandle) -> Result<Vec<NodeHandle>> {
        if !self.nodes.contains_key(&handle) {
            return Err(Error::NodeNotFound { handle });
        }
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if !seen.insert(h) {
                continue;
            }
            out.push(h);
            if let Some(n) = self.nodes.get(&h) {
                for &c in n.children.iter().rev() {
                    stack.push(c);
                }
            }
        }
        Ok(out)
    }

    /// The unique node classified [`Classification::GeneratedRoot`], if any.
    pub fn generated_root(&self) -> Result<Option<NodeHandle>> {
        let roots: Vec<NodeHandle> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.classification == Classification::GeneratedRoot)
            .map(|(&h, _)| h)
            .collect();
        match roots.as_slice() {
            [] => Ok(None),
            [root] => Ok(Some(*root)),
            more => Err(Error::MultipleRoots { count: more.len() }),
        }
    }

    /// First node (in handle order) carrying `id`.
    pub fn find_by_id(&self, id: &NodeId) -> Option<NodeHandle> {
        self.nodes.iter().find(|(_, n)| &n.id == id).map(|(&h, _)| h)
    }

    /// Check structural consistency: parent/child links must agree in both
    /// directions, no child may be listed twice, and parent chains must be
    /// acyclic. Graphs built through this API always pass; graphs
    /// deserialized from a host adapter may not.
    pub fn validate(&self) -> Result<()> {
        for (&handle, node) in &self.nodes {
            let mut seen_children = BTreeSet::new();
            for &child in &node.children {
                if !seen_children.insert(child) {
                    return Err(Error::InconsistentLink {
                        handle,
                        message: format!("child {child} listed twice"),
                    });
                }
                match self.nodes.get(&child) {
                    None => {
                        return Err(Error::InconsistentLink {
                            handle,
                            message: format!("child {child} does not exist"),
                        });
                    }
                    Some(c) if c.parent != Some(handle) => {
                        return Err(Error::InconsistentLink {
                            handle: child,
                            message: format!("parent link does not point back to {handle}"),
                        });
                    }
                    Some(_) => {}
                }
            }
            if let Some(parent) = node.parent {
                match self.nodes.get(&parent) {
                    None => {
                        return Err(Error::InconsistentLink {
                            handle,
                            message: format!("parent {parent} does not exist"),
                        });
                    }
                    Some(p) if !p.children.contains(&handle) => {
                        return Err(Error::InconsistentLink {
                            handle,
                            message: format!("not listed among children of {parent}"),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for &handle in self.nodes.keys() {
            let mut steps = 0usize;
            let mut current = handle;
            while let Some(parent) = self.nodes.get(&current).and_then(|n| n.parent) {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(Error::CycleDetected { handle });
                }
                current = parent;
            }
        }

        Ok(())
    }
}
