//! Declarative source outline
//!
//! A [`SourceTree`] is the read-only snapshot of the menu definition a
//! regeneration pass works from. The trunk is anonymous; top-level entries
//! are its children, so a node's path is simply the names along the way
//! down.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::{MenuPath, validate_segment};

/// One entry in the source outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Structural name; forms the node's path segment.
    pub name: String,
    /// Displayed label, when it differs from the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            children: Vec::new(),
        }
    }

    /// The label shown to users; falls back to the structural name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// A full source outline snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTree {
    /// Name of the defining document, recorded as provenance on generated
    /// nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default)]
    pub nodes: Vec<SourceNode>,
}

impl SourceTree {
    pub fn new(nodes: Vec<SourceNode>) -> Self {
        Self {
            document: None,
            nodes,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Check the outline is well-formed: every name is a valid segment and
    /// sibling names are unique (paths would collide otherwise). Matching
    /// is case-sensitive, so `"File"` and `"file"` are distinct siblings.
    pub fn validate(&self) -> Result<()> {
        validate_level(&MenuPath::root(), &self.nodes)
    }

    /// Total number of nodes in the outline.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[SourceNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.nodes)
    }
}

fn validate_level(parent: &MenuPath, nodes: &[SourceNode]) -> Result<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(nodes.len());
    for node in nodes {
        validate_segment(&node.name)?;
        if seen.contains(&node.name.as_str()) {
            return Err(Error::DuplicateSiblingName {
                parent: parent.clone(),
                name: node.name.clone(),
            });
        }
        seen.push(&node.name);
        validate_level(&parent.join(&node.name), &node.children)?;
    }
    Ok(())
}
