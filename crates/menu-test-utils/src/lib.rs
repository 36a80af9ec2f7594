//! Shared test utilities for the menu-manager workspace.
//!
//! Standardised outline and graph fixtures to eliminate duplication across
//! crate test suites. Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`builder`]: outline construction helpers
//! - [`fixtures`]: outlines checked into `test-fixtures/menus/`
//! - [`graph`]: generated node constructors

pub mod builder;
pub mod fixtures;
pub mod graph;
