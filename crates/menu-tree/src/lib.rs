//! Data model for the menu regeneration engine
//!
//! This crate holds the shared vocabulary of the workspace:
//!
//! - **Source side**: [`SourceTree`]/[`SourceNode`] describe the declarative
//!   menu outline, keyed by [`MenuPath`]
//! - **Generated side**: [`GeneratedGraph`]/[`GeneratedNode`] model the
//!   host's runtime object tree, with [`Classification`] markers and
//!   [`NodeMetadata`] provenance on every node
//! - **Identity**: [`NodeId`] values minted and repaired by
//!   [`IdentityStore`], binding user expectations to nodes across
//!   regeneration passes
//!
//! The synchronization algorithm itself lives in `menu-sync`; this crate
//! stays free of engine policy so host adapters can depend on it alone.

pub mod classification;
pub mod error;
pub mod graph;
pub mod identity;
pub mod metadata;
pub mod path;
pub mod source;

pub use classification::Classification;
pub use error::{Error, Result};
pub use graph::{GeneratedGraph, GeneratedNode, NodeHandle};
pub use identity::{IdentityStore, NodeId, Remint};
pub use metadata::{NodeContent, NodeMetadata};
pub use path::MenuPath;
pub use source::{SourceNode, SourceTree};
