//! Node classification markers
//!
//! Every node in the generated graph carries exactly one classification,
//! which decides how regeneration treats it: engine-owned nodes are freely
//! created, updated, and destroyed; protected nodes are preserved untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ownership marker for a generated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Created by the engine from a source node; fully engine-owned.
    Generated,
    /// Authored by the user inside the generated tree; passed through
    /// untouched, never destroyed or repositioned by the engine.
    UserIncluded,
    /// Formerly generated, opted out by the user; never modified, destroyed,
    /// or recreated while excluded.
    Excluded,
    /// The container anchoring the whole generated subtree. At most one
    /// exists per graph.
    GeneratedRoot,
}

impl Classification {
    /// Whether the engine may create, update, move, or destroy this node.
    pub fn is_engine_owned(self) -> bool {
        matches!(self, Self::Generated | Self::GeneratedRoot)
    }

    /// Whether regeneration must leave the node (and its subtree) alone.
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Excluded | Self::UserIncluded)
    }

    /// Whether a user action may reclassify this node to `to`.
    ///
    /// Only engine-owned nodes can be excluded, and only excluded nodes can
    /// be brought back (as plain `Generated`, keeping their provenance).
    pub fn can_transition_to(self, to: Classification) -> bool {
        matches!(
            (self, to),
            (Self::Generated | Self::GeneratedRoot, Self::Excluded)
                | (Self::Excluded, Self::Generated)
        )
    }

    /// Checked reclassification, returning the new marker.
    pub fn transition(self, to: Classification) -> Result<Classification> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(Error::InvalidTransition { from: self, to })
        }
    }
}
