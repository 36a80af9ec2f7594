//! Regeneration pass reports.
//!
//! Fatal conditions (an invalid source tree, a corrupted graph) abort a pass
//! with an [`Error`](crate::Error). A mutation that fails while the plan is
//! being applied does not: the pass stops, everything applied so far stays
//! applied, and the failure is recorded here. Callers inspect the report to
//! decide whether to rerun.

use menu_tree::Remint;
use serde::{Deserialize, Serialize};

/// Terminal outcome of a regeneration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassOutcome {
    /// Every planned mutation was applied and identifiers were repaired.
    Completed,
    /// A mutation failed to apply; see [`PassReport::failure`].
    Failed,
}

/// A mutation that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationFailure {
    /// Zero-based position of the mutation in the plan. Mutations before it
    /// have already been applied and are not rolled back.
    pub index: usize,
    /// Description of the mutation that failed.
    pub mutation: String,
    /// What the host reported.
    pub reason: String,
}

/// What a regeneration pass did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    /// How the pass ended.
    pub outcome: PassOutcome,
    /// Human-readable record of the actions taken, in order.
    pub actions: Vec<String>,
    /// Number of mutations the diff produced.
    pub planned: usize,
    /// Number of mutations applied before the pass finished or stopped.
    pub applied: usize,
    /// The mutation that stopped the pass, if any.
    pub failure: Option<MutationFailure>,
    /// Identifier reassignments performed during repair.
    pub reminted: Vec<Remint>,
}

impl PassReport {
    /// Creates an empty report for a pass that has not hit a failure.
    pub fn completed() -> Self {
        Self {
            outcome: PassOutcome::Completed,
            actions: Vec::new(),
            planned: 0,
            applied: 0,
            failure: None,
            reminted: Vec::new(),
        }
    }

    /// Appends an action description.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// True when the pass completed without a mutation failure.
    pub fn is_success(&self) -> bool {
        self.outcome == PassOutcome::Completed
    }
}
