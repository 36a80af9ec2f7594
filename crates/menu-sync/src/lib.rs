//! Regeneration engine for Menu Manager
//!
//! This crate reconciles a declarative menu outline with the generated
//! object graph a host exposes, implementing:
//!
//! - **Diffing**: Path-keyed matching of graph nodes against the outline,
//!   producing an ordered [`MutationPlan`]
//! - **Driving**: Whole regeneration passes with dry-run support, root
//!   recovery and identifier repair
//! - **Host abstraction**: [`SourceProvider`] and [`HostGraph`] traits with
//!   in-memory reference implementations
//!
//! # Architecture
//!
//! `menu-sync` sits between the data model and whatever embeds the engine:
//!
//! ```text
//!      embedding host (editor plugin, CLI, tests)
//!                        |
//!                    menu-sync
//!                        |
//!                    menu-tree
//! ```
//!
//! A pass is synchronous and single-threaded: load, diff, apply, repair.
//! Matched nodes keep their persistent identifiers across passes; nodes a
//! user marked excluded or included are never edited, only moved out of
//! harm's way when their surroundings are deleted.

pub mod diff;
pub mod driver;
pub mod error;
pub mod host;
pub mod logging;
pub mod plan;
pub mod report;

pub use diff::TreeDiffEngine;
pub use driver::{PassState, RegenerateOptions, Regenerator};
pub use error::{Error, Result};
pub use host::{HostGraph, InMemoryHost, SourceProvider, StaticSource};
pub use plan::{Mutation, MutationPlan, NodeRef};
pub use report::{MutationFailure, PassOutcome, PassReport};
