//! Provenance metadata and node content
//!
//! Engine-owned nodes remember which source path produced them; that record
//! is what lets the next pass match them again instead of destroying and
//! recreating. The stored content checksum gates update emission: a node
//! whose checksum still matches its source content needs nothing done.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::path::MenuPath;

/// The payload the engine materializes onto a generated node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    /// Displayed label.
    pub name: String,
    /// Source path this node mirrors.
    pub source_path: MenuPath,
    /// Originating source document, when known.
    pub aux_info: Option<String>,
}

impl NodeContent {
    pub fn new(name: impl Into<String>, source_path: MenuPath) -> Self {
        Self {
            name: name.into(),
            source_path,
            aux_info: None,
        }
    }

    pub fn with_aux(mut self, aux_info: impl Into<String>) -> Self {
        self.aux_info = Some(aux_info.into());
        self
    }

    /// Hex SHA-256 over the content fields.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.source_path.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.aux_info.as_deref().unwrap_or("").as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Provenance persisted on a generated node.
///
/// User-authored nodes carry no provenance at all ([`NodeMetadata::detached`]).
/// Excluded nodes keep the metadata they had when last generated, so
/// re-including them restores matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Source path that produced this node, if engine-generated.
    pub source_path: Option<MenuPath>,
    /// Originating source document, if recorded.
    pub aux_info: Option<String>,
    /// Checksum of the content last written by the engine.
    pub content_checksum: Option<String>,
    /// When the engine last wrote this node.
    pub synced_at: Option<DateTime<Utc>>,
}

impl NodeMetadata {
    /// Metadata for a node the engine does not own (all fields empty).
    pub fn detached() -> Self {
        Self::default()
    }

    /// Fresh provenance for content the engine is about to write.
    pub fn from_content(content: &NodeContent) -> Self {
        Self {
            source_path: Some(content.source_path.clone()),
            aux_info: content.aux_info.clone(),
            content_checksum: Some(content.checksum()),
            synced_at: Some(Utc::now()),
        }
    }

    /// Whether the stored checksum no longer matches `content`.
    ///
    /// Metadata with no checksum (never synced) always counts as drifted.
    pub fn has_drifted(&self, content: &NodeContent) -> bool {
        self.content_checksum.as_deref() != Some(content.checksum().as_str())
    }
}
