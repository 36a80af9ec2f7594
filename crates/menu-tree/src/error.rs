//! Error types for menu-tree

use crate::classification::Classification;
use crate::graph::NodeHandle;
use crate::path::MenuPath;

/// Result type for menu-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in menu-tree operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid name segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("Duplicate sibling name {name:?} under {parent:?}")]
    DuplicateSiblingName { parent: MenuPath, name: String },

    #[error("Node not found: {handle}")]
    NodeNotFound { handle: NodeHandle },

    #[error("Reparenting {node} under {new_parent} would create a cycle")]
    WouldCycle {
        node: NodeHandle,
        new_parent: NodeHandle,
    },

    #[error("Cycle detected in generated graph at {handle}")]
    CycleDetected { handle: NodeHandle },

    #[error("Inconsistent parent/child links at {handle}: {message}")]
    InconsistentLink { handle: NodeHandle, message: String },

    #[error("Invalid child order for {parent}: {message}")]
    InvalidReorder { parent: NodeHandle, message: String },

    #[error("Classification cannot change from {from:?} to {to:?}")]
    InvalidTransition {
        from: Classification,
        to: Classification,
    },

    #[error("Found {count} generated root containers, expected at most one")]
    MultipleRoots { count: usize },
}
