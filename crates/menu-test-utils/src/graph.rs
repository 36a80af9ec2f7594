//! Generated node constructors for test graphs.
//!
//! These build nodes in the states a synced host would hold them, so tests
//! can assemble graphs directly instead of running a full pass first.

use menu_tree::{
    Classification, GeneratedNode, IdentityStore, MenuPath, NodeContent, NodeId, NodeMetadata,
};

/// Engine-owned node recorded as produced by the outline path `path`.
pub fn engine_node(name: &str, path: &str) -> GeneratedNode {
    let content = NodeContent::new(name, MenuPath::parse(path).unwrap());
    GeneratedNode::new(
        IdentityStore::new().mint(),
        name,
        Classification::Generated,
        NodeMetadata::from_content(&content),
    )
}

/// Engine-owned node with a caller-chosen identifier, for identity
/// assertions across passes.
pub fn engine_node_with_id(id: impl Into<String>, name: &str, path: &str) -> GeneratedNode {
    let content = NodeContent::new(name, MenuPath::parse(path).unwrap());
    GeneratedNode::new(
        NodeId::new(id),
        name,
        Classification::Generated,
        NodeMetadata::from_content(&content),
    )
}

/// The root container node.
pub fn root_node() -> GeneratedNode {
    let content = NodeContent::new("Menu", MenuPath::root());
    GeneratedNode::new(
        IdentityStore::new().mint(),
        "Menu",
        Classification::GeneratedRoot,
        NodeMetadata::from_content(&content),
    )
}

/// A node a user excluded from regeneration.
pub fn excluded_node(name: &str) -> GeneratedNode {
    GeneratedNode::new(
        IdentityStore::new().mint(),
        name,
        Classification::Excluded,
        NodeMetadata::detached(),
    )
}

/// A hand-built node a user marked as included.
pub fn user_node(name: &str) -> GeneratedNode {
    GeneratedNode::new(
        IdentityStore::new().mint(),
        name,
        Classification::UserIncluded,
        NodeMetadata::detached(),
    )
}
