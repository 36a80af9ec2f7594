//! Host abstraction
//!
//! The engine never edits a menu in place. Each pass loads a snapshot of the
//! generated graph through [`HostGraph::load_graph`], plans against the
//! snapshot, then applies the plan back through the mutation methods. The
//! outline comes from a [`SourceProvider`] the same way.
//!
//! [`memory`] provides in-process implementations used throughout the tests.

pub mod memory;

pub use memory::{InMemoryHost, StaticSource};

use menu_tree::{Classification, GeneratedGraph, NodeContent, NodeHandle, NodeId, SourceTree};

use crate::error::Result;

/// Trait for obtaining the declarative menu outline.
pub trait SourceProvider: Send + Sync {
    /// Load the current outline.
    ///
    /// Called once per regeneration pass. The engine validates the returned
    /// tree before planning any mutations.
    fn load_tree(&self) -> Result<SourceTree>;
}

/// Trait for the object graph a menu host exposes.
///
/// Handles are only meaningful against the snapshot returned by the most
/// recent [`load_graph`](HostGraph::load_graph) call. The driver reloads
/// between phases instead of holding handles across passes.
pub trait HostGraph: Send + Sync {
    /// Take a snapshot of the current graph.
    fn load_graph(&self) -> Result<GeneratedGraph>;

    /// Create a node and return its handle.
    ///
    /// `parent` of `None` places the node at the top level; the driver only
    /// does this when recreating the menu root container.
    fn create_node(
        &mut self,
        parent: Option<NodeHandle>,
        id: NodeId,
        classification: Classification,
        content: NodeContent,
    ) -> Result<NodeHandle>;

    /// Destroy a node together with its entire subtree.
    fn destroy_node(&mut self, node: NodeHandle) -> Result<()>;

    /// Move a node (with its subtree) under a new parent, appended after the
    /// parent's existing children.
    fn reparent_node(&mut self, node: NodeHandle, new_parent: NodeHandle) -> Result<()>;

    /// Replace a node's label and provenance metadata.
    fn set_content(&mut self, node: NodeHandle, content: NodeContent) -> Result<()>;

    /// Change a node's classification marker.
    ///
    /// The host stores whatever it is given; the transition rules are
    /// enforced by the caller (see [`Classification::transition`]).
    fn set_classification(&mut self, node: NodeHandle, classification: Classification)
    -> Result<()>;

    /// Overwrite a node's persistent identifier. Used by identifier repair.
    fn set_identifier(&mut self, node: NodeHandle, id: NodeId) -> Result<()>;

    /// Reorder a parent's direct children. `order` must be a permutation of
    /// the current children.
    fn reorder_children(&mut self, parent: NodeHandle, order: Vec<NodeHandle>) -> Result<()>;

    /// List every persistent identifier in the graph, including blanks.
    fn list_identifiers(&self) -> Result<Vec<NodeId>>;
}
