//! Regeneration driver
//!
//! The driver owns one regeneration pass end to end: load the outline and
//! the graph, diff, apply the plan through the host, then repair
//! identifiers. Passes are serialized by the `&mut self` receivers;
//! a host is never mutated by two passes at once.
//!
//! Fatal conditions (bad outline, corrupted graph) abort the pass with an
//! error before the host is touched. A mutation that fails mid-apply does
//! not: the pass stops, keeps everything applied so far, records the
//! failure in the [`PassReport`], and leaves the driver in
//! [`PassState::Failed`] until a later pass completes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use menu_tree::{
    Classification, GeneratedGraph, GeneratedNode, IdentityStore, MenuPath, NodeContent,
    NodeHandle, NodeId, NodeMetadata,
};

use crate::diff::TreeDiffEngine;
use crate::error::{Error, Result};
use crate::host::{HostGraph, SourceProvider};
use crate::plan::{Mutation, MutationPlan, NodeRef};
use crate::report::{MutationFailure, PassOutcome, PassReport};

/// Name of the root container the engine maintains in the host.
const ROOT_NAME: &str = "Menu";

/// Where a pass currently stands. Observable through
/// [`Regenerator::state`]; mostly useful in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassState {
    Idle,
    Loading,
    Diffing,
    Applying,
    Repairing,
    Failed,
}

/// Options for a regeneration pass.
#[derive(Debug, Clone, Default)]
pub struct RegenerateOptions {
    /// If true, plan and report without mutating the host.
    /// Actions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Drives regeneration passes against one source and one host.
pub struct Regenerator {
    source: Box<dyn SourceProvider>,
    host: Box<dyn HostGraph>,
    engine: TreeDiffEngine,
    identities: IdentityStore,
    state: PassState,
}

impl Regenerator {
    pub fn new(source: Box<dyn SourceProvider>, host: Box<dyn HostGraph>) -> Self {
        Self {
            source,
            host,
            engine: TreeDiffEngine::new(),
            identities: IdentityStore::new(),
            state: PassState::Idle,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Run one full regeneration pass.
    pub fn regenerate(&mut self) -> Result<PassReport> {
        self.regenerate_with_options(RegenerateOptions::default())
    }

    /// Run one regeneration pass with options.
    ///
    /// Ends in [`PassState::Idle`] when the pass completed, in
    /// [`PassState::Failed`] when it aborted or stopped on a mutation.
    pub fn regenerate_with_options(&mut self, options: RegenerateOptions) -> Result<PassReport> {
        let result = self.run_pass(options);
        match &result {
            Ok(report) if report.is_success() => self.transition(PassState::Idle),
            _ => self.transition(PassState::Failed),
        }
        result
    }

    /// Compute the plan a pass would apply, without applying it.
    pub fn plan(&mut self) -> Result<MutationPlan> {
        let result = self.plan_inner();
        match &result {
            Ok(_) => self.transition(PassState::Idle),
            Err(_) => self.transition(PassState::Failed),
        }
        result
    }

    /// Mark the node carrying `id` as excluded from regeneration.
    ///
    /// Only engine-owned nodes can be excluded; anything else is an
    /// invalid transition.
    pub fn mark_excluded(&mut self, id: &NodeId) -> Result<()> {
        self.set_marker(id, Classification::Excluded)
    }

    /// Return the excluded node carrying `id` to engine ownership.
    ///
    /// The node keeps its recorded source path, so the next pass matches
    /// it back up instead of recreating it.
    pub fn mark_included(&mut self, id: &NodeId) -> Result<()> {
        self.set_marker(id, Classification::Generated)
    }

    fn set_marker(&mut self, id: &NodeId, to: Classification) -> Result<()> {
        let graph = self.host.load_graph()?;
        let handle = graph
            .find_by_id(id)
            .ok_or_else(|| Error::UnknownIdentifier { id: id.clone() })?;
        let next = graph.node(handle)?.classification.transition(to)?;
        self.host.set_classification(handle, next)?;
        tracing::info!(node = %handle, marker = ?next, "updated classification");
        Ok(())
    }

    fn run_pass(&mut self, options: RegenerateOptions) -> Result<PassReport> {
        self.transition(PassState::Loading);
        let tree = self.source.load_tree()?;
        let graph = self.host.load_graph()?;

        self.transition(PassState::Diffing);
        // Fatal checks come before ensure_root so a bad outline never
        // mutates the host.
        tree.validate().map_err(Error::InvalidSourceTree)?;
        graph.validate()?;

        let mut report = PassReport::completed();
        let graph = self.ensure_root(graph, options.dry_run, &mut report)?;
        let plan = self.engine.diff(&tree, &graph)?;
        report.planned = plan.len();

        self.transition(PassState::Applying);
        if options.dry_run {
            for mutation in plan.iter() {
                report
                    .actions
                    .push(format!("[dry-run] Would apply: {mutation}"));
            }
            self.transition(PassState::Repairing);
            let repairable = count_repairable(&self.host.list_identifiers()?);
            if repairable > 0 {
                report
                    .actions
                    .push(format!("[dry-run] Would reassign {repairable} identifiers"));
            }
            return Ok(report);
        }

        if let Err(failure) = self.apply(&plan, &mut report) {
            report.outcome = PassOutcome::Failed;
            report.failure = Some(failure);
            return Ok(report);
        }

        self.transition(PassState::Repairing);
        self.repair(&mut report)?;
        Ok(report)
    }

    fn plan_inner(&mut self) -> Result<MutationPlan> {
        self.transition(PassState::Loading);
        let tree = self.source.load_tree()?;
        let mut graph = self.host.load_graph()?;

        self.transition(PassState::Diffing);
        tree.validate().map_err(Error::InvalidSourceTree)?;
        graph.validate()?;

        if graph.generated_root()?.is_none() {
            let content = NodeContent::new(ROOT_NAME, MenuPath::root());
            graph.insert(
                None,
                GeneratedNode::new(
                    self.identities.mint(),
                    ROOT_NAME,
                    Classification::GeneratedRoot,
                    NodeMetadata::from_content(&content),
                ),
            )?;
        }
        self.engine.diff(&tree, &graph)
    }

    /// Recreates the root container when the graph has none. The real
    /// mutation goes through the host and the graph is reloaded so the
    /// new handle is valid for the rest of the pass.
    fn ensure_root(
        &mut self,
        graph: GeneratedGraph,
        dry_run: bool,
        report: &mut PassReport,
    ) -> Result<GeneratedGraph> {
        if graph.generated_root()?.is_some() {
            return Ok(graph);
        }

        let content = NodeContent::new(ROOT_NAME, MenuPath::root());
        if dry_run {
            let mut graph = graph;
            graph.insert(
                None,
                GeneratedNode::new(
                    self.identities.mint(),
                    ROOT_NAME,
                    Classification::GeneratedRoot,
                    NodeMetadata::from_content(&content),
                ),
            )?;
            report
                .actions
                .push("[dry-run] Would create menu root container".to_string());
            Ok(graph)
        } else {
            self.host.create_node(
                None,
                self.identities.mint(),
                Classification::GeneratedRoot,
                content,
            )?;
            report.actions.push("Created menu root container".to_string());
            tracing::info!("created missing menu root container");
            self.host.load_graph()
        }
    }

    fn apply(
        &mut self,
        plan: &MutationPlan,
        report: &mut PassReport,
    ) -> std::result::Result<(), MutationFailure> {
        let mut planned_handles: BTreeMap<MenuPath, NodeHandle> = BTreeMap::new();
        for (index, mutation) in plan.iter().enumerate() {
            match self.apply_one(mutation, &mut planned_handles) {
                Ok(()) => {
                    report.actions.push(mutation.to_string());
                    report.applied += 1;
                }
                Err(error) => {
                    tracing::warn!(index, mutation = %mutation, error = %error, "mutation failed to apply");
                    return Err(MutationFailure {
                        index,
                        mutation: mutation.to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn apply_one(
        &mut self,
        mutation: &Mutation,
        planned_handles: &mut BTreeMap<MenuPath, NodeHandle>,
    ) -> Result<()> {
        match mutation {
            Mutation::Reparent { node, new_parent } => {
                let parent = resolve(planned_handles, new_parent)?;
                self.host.reparent_node(*node, parent)
            }
            Mutation::Delete { node } => self.host.destroy_node(*node),
            Mutation::Create {
                parent,
                path,
                content,
            } => {
                let parent = resolve(planned_handles, parent)?;
                let handle = self.host.create_node(
                    Some(parent),
                    self.identities.mint(),
                    Classification::Generated,
                    content.clone(),
                )?;
                planned_handles.insert(path.clone(), handle);
                Ok(())
            }
            Mutation::Update { node, content } => self.host.set_content(*node, content.clone()),
            Mutation::Reorder { parent, order } => {
                let parent = resolve(planned_handles, parent)?;
                let order = order
                    .iter()
                    .map(|entry| resolve(planned_handles, entry))
                    .collect::<Result<Vec<_>>>()?;
                self.host.reorder_children(parent, order)
            }
        }
    }

    fn repair(&mut self, report: &mut PassReport) -> Result<()> {
        let ids = self.host.list_identifiers()?;
        if count_repairable(&ids) == 0 {
            return Ok(());
        }

        let mut graph = self.host.load_graph()?;
        let remints = self.identities.repair(&mut graph);
        for remint in &remints {
            self.host.set_identifier(remint.node, remint.assigned.clone())?;
            report
                .actions
                .push(format!("Reassigned identifier for {}", remint.node));
        }
        tracing::info!(count = remints.len(), "reassigned colliding identifiers");
        report.reminted = remints;
        Ok(())
    }

    fn transition(&mut self, to: PassState) {
        tracing::debug!(from = ?self.state, to = ?to, "pass state");
        self.state = to;
    }
}

fn resolve(
    planned_handles: &BTreeMap<MenuPath, NodeHandle>,
    node_ref: &NodeRef,
) -> Result<NodeHandle> {
    match node_ref {
        NodeRef::Existing(handle) => Ok(*handle),
        NodeRef::Planned(path) => planned_handles
            .get(path)
            .copied()
            .ok_or_else(|| Error::host(format!("planned node {path} was not created"))),
    }
}

/// Blank identifiers plus every carrier of an already-seen identifier.
fn count_repairable(ids: &[NodeId]) -> usize {
    let mut seen = BTreeSet::new();
    let mut count = 0;
    for id in ids {
        if id.is_blank() || !seen.insert(id.clone()) {
            count += 1;
        }
    }
    count
}
