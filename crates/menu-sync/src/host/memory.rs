//! In-process host implementations.
//!
//! [`InMemoryHost`] keeps a [`GeneratedGraph`] behind a mutex so a test can
//! hold one clone while the driver owns another. [`StaticSource`] serves a
//! fixed outline that can be swapped between passes.

use std::sync::{Arc, Mutex, MutexGuard};

use menu_tree::{
    Classification, GeneratedGraph, GeneratedNode, NodeContent, NodeHandle, NodeId, NodeMetadata,
    SourceTree,
};

use crate::error::{Error, Result};
use crate::host::{HostGraph, SourceProvider};

/// Menu host backed by an owned graph.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    graph: Arc<Mutex<GeneratedGraph>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, GeneratedGraph>> {
        self.graph
            .lock()
            .map_err(|_| Error::host("host state lock poisoned"))
    }

    /// Copy of the current graph.
    pub fn snapshot(&self) -> Result<GeneratedGraph> {
        Ok(self.lock()?.clone())
    }

    /// Inserts a prebuilt node, bypassing the mutation interface.
    ///
    /// Stands in for out-of-band edits a user makes in the host editor, such
    /// as dropping in a hand-built entry before marking it included.
    pub fn insert_node(
        &self,
        parent: Option<NodeHandle>,
        node: GeneratedNode,
    ) -> Result<NodeHandle> {
        Ok(self.lock()?.insert(parent, node)?)
    }

    /// Clones a subtree next to itself, keeping every identifier.
    ///
    /// Mirrors duplicating an entry with copy/paste in the host editor, the
    /// operation that produces the identifier collisions repair cleans up.
    pub fn duplicate_subtree(&self, node: NodeHandle) -> Result<NodeHandle> {
        let mut graph = self.lock()?;
        let parent = graph.parent(node)?;
        clone_level(&mut graph, node, parent)
    }
}

fn clone_level(
    graph: &mut GeneratedGraph,
    node: NodeHandle,
    parent: Option<NodeHandle>,
) -> Result<NodeHandle> {
    let original = graph.node(node)?.clone();
    let copy = graph.insert(
        parent,
        GeneratedNode::new(
            original.id.clone(),
            original.name.clone(),
            original.classification,
            original.metadata.clone(),
        ),
    )?;
    for &child in original.children() {
        clone_level(graph, child, Some(copy))?;
    }
    Ok(copy)
}

impl HostGraph for InMemoryHost {
    fn load_graph(&self) -> Result<GeneratedGraph> {
        self.snapshot()
    }

    fn create_node(
        &mut self,
        parent: Option<NodeHandle>,
        id: NodeId,
        classification: Classification,
        content: NodeContent,
    ) -> Result<NodeHandle> {
        let node = GeneratedNode::new(
            id,
            content.name.clone(),
            classification,
            NodeMetadata::from_content(&content),
        );
        Ok(self.lock()?.insert(parent, node)?)
    }

    fn destroy_node(&mut self, node: NodeHandle) -> Result<()> {
        self.lock()?.remove_subtree(node)?;
        Ok(())
    }

    fn reparent_node(&mut self, node: NodeHandle, new_parent: NodeHandle) -> Result<()> {
        Ok(self.lock()?.reparent(node, new_parent)?)
    }

    fn set_content(&mut self, node: NodeHandle, content: NodeContent) -> Result<()> {
        let mut graph = self.lock()?;
        let entry = graph.node_mut(node)?;
        entry.name = content.name.clone();
        entry.metadata = NodeMetadata::from_content(&content);
        Ok(())
    }

    fn set_classification(
        &mut self,
        node: NodeHandle,
        classification: Classification,
    ) -> Result<()> {
        self.lock()?.node_mut(node)?.classification = classification;
        Ok(())
    }

    fn set_identifier(&mut self, node: NodeHandle, id: NodeId) -> Result<()> {
        self.lock()?.node_mut(node)?.id = id;
        Ok(())
    }

    fn reorder_children(&mut self, parent: NodeHandle, order: Vec<NodeHandle>) -> Result<()> {
        Ok(self.lock()?.reorder_children(parent, order)?)
    }

    fn list_identifiers(&self) -> Result<Vec<NodeId>> {
        Ok(self.lock()?.iter().map(|(_, n)| n.id.clone()).collect())
    }
}

/// Source provider serving a fixed outline.
///
/// Cloning shares the underlying tree; [`set_tree`](StaticSource::set_tree)
/// swaps it for subsequent passes.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tree: Arc<Mutex<SourceTree>>,
}

impl StaticSource {
    pub fn new(tree: SourceTree) -> Self {
        Self {
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    /// Replaces the outline served to subsequent passes.
    pub fn set_tree(&self, tree: SourceTree) -> Result<()> {
        let mut current = self
            .tree
            .lock()
            .map_err(|_| Error::host("source lock poisoned"))?;
        *current = tree;
        Ok(())
    }
}

impl SourceProvider for StaticSource {
    fn load_tree(&self) -> Result<SourceTree> {
        self.tree
            .lock()
            .map(|tree| tree.clone())
            .map_err(|_| Error::host("source lock poisoned"))
    }
}
